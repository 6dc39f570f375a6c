use super::{frame_type, PING_RESPONSE_SIZE, START_BYTE};
use crate::checksum::calculate_checksum;
use crate::endian::{read_u16_le, read_u32_be, write_u16_le};
use crate::error::{LengthMismatch, ProtocolError};

/// The answer of the bootloader to a ping.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct PingResponse {
	/// The version of the framing protocol implemented by the bootloader.
	pub version: u32,

	/// Protocol options.
	pub options: u16,
}

impl PingResponse {
	/// Decode a ping response from the payload of a ping response frame.
	pub fn decode(payload: &[u8]) -> Result<Self, ProtocolError> {
		LengthMismatch::check(PING_RESPONSE_SIZE - 4, payload.len())?;
		Ok(Self {
			version: read_u32_be(&payload[0..4]),
			options: read_u16_le(&payload[4..6]),
		})
	}

	/// Encode the complete ping response frame.
	pub fn encode(&self) -> [u8; PING_RESPONSE_SIZE] {
		let mut buffer = [0; PING_RESPONSE_SIZE];
		buffer[0] = START_BYTE;
		buffer[1] = frame_type::PING_RESPONSE;
		buffer[2..6].copy_from_slice(&self.version.to_be_bytes());
		write_u16_le(&mut buffer[6..], self.options);
		let crc = calculate_checksum(0, &buffer[..8]);
		write_u16_le(&mut buffer[8..], crc);
		buffer
	}
}

#[cfg(test)]
mod test {
	use super::*;
	use crate::packet::decode_frame;
	use assert2::{assert, let_assert};

	#[test]
	fn test_ping_response() {
		let response = PingResponse {
			version: 0x00020150,
			options: 0,
		};
		let frame = response.encode();
		assert!(frame == [0x5A, 0xA7, 0x00, 0x02, 0x01, 0x50, 0x00, 0x00, 0xAA, 0xEA]);

		let_assert!(Ok(frame) = decode_frame(&frame));
		let_assert!(Ok(decoded) = PingResponse::decode(&frame.payload));
		assert!(decoded == response);
	}
}
