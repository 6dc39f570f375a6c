//! Framing of packets on the serial line.
//!
//! Every frame starts with [`START_BYTE`] followed by a frame type.
//! Acknowledgements and the ping request consist of only those two bytes.
//! Command and data frames continue with a little endian payload length, a CRC-16 and the payload.
//! The ping response has a fixed size of ten bytes.

use crate::checksum::calculate_checksum;
use crate::endian::{read_u16_le, write_u16_le};
use crate::error::{InvalidChecksum, InvalidFrameType, InvalidStartByte, LengthMismatch, ProtocolError, TruncatedPayload};

mod command;
pub use command::{CommandPacket, CommandResponse, MAX_PARAMETERS};

mod ping;
pub use ping::PingResponse;

/// The first byte of every frame.
pub const START_BYTE: u8 = 0x5A;

/// The size of the header of a frame with a payload: start byte, type, length and CRC.
pub const FRAME_HEADER_SIZE: usize = 6;

/// The size of a ping response frame including the CRC.
pub const PING_RESPONSE_SIZE: usize = 10;

/// The largest payload a single frame can carry.
pub const MAX_PAYLOAD_SIZE: usize = u16::MAX as usize;

/// The maximum number of garbage bytes skipped while waiting for a start byte.
pub const MAX_LEADING_GARBAGE: usize = 50;

/// Frame type identifiers.
pub mod frame_type {
	pub const ACK: u8 = 0xA1;
	pub const NACK: u8 = 0xA2;
	pub const ABORT: u8 = 0xA3;
	pub const COMMAND: u8 = 0xA4;
	pub const DATA: u8 = 0xA5;
	pub const PING: u8 = 0xA6;
	pub const PING_RESPONSE: u8 = 0xA7;
}

/// The layout that follows the start byte and frame type.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub(crate) enum FrameLayout {
	/// Only the start byte and the frame type.
	Short,

	/// A length and CRC field followed by the payload.
	WithPayload,

	/// The fixed size ping response.
	PingResponse,
}

impl FrameLayout {
	/// Get the layout of a frame type.
	pub fn of(frame_type: u8) -> Result<Self, InvalidFrameType> {
		match frame_type {
			frame_type::ACK | frame_type::NACK | frame_type::ABORT | frame_type::PING => Ok(Self::Short),
			frame_type::COMMAND | frame_type::DATA => Ok(Self::WithPayload),
			frame_type::PING_RESPONSE => Ok(Self::PingResponse),
			actual => Err(InvalidFrameType { actual }),
		}
	}
}

/// A decoded frame.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Frame {
	/// The frame type, one of the [`frame_type`] constants.
	pub frame_type: u8,

	/// The payload of the frame, without header or CRC.
	///
	/// For a ping response this holds the six bytes between the frame type and the CRC.
	pub payload: Vec<u8>,
}

impl Frame {
	/// Check if the frame is of the expected type.
	pub fn expect_type(&self, expected: u8) -> Result<(), crate::error::UnexpectedPacket> {
		crate::error::UnexpectedPacket::check(self.frame_type, expected)
	}
}

/// Encode a frame with a length, CRC and payload.
///
/// The payload must not exceed [`MAX_PAYLOAD_SIZE`].
pub fn encode_frame(frame_type: u8, payload: &[u8]) -> Vec<u8> {
	debug_assert!(payload.len() <= MAX_PAYLOAD_SIZE);
	let mut buffer = vec![0; FRAME_HEADER_SIZE + payload.len()];
	buffer[0] = START_BYTE;
	buffer[1] = frame_type;
	write_u16_le(&mut buffer[2..], payload.len() as u16);
	buffer[FRAME_HEADER_SIZE..].copy_from_slice(payload);

	let crc = calculate_checksum(calculate_checksum(0, &buffer[..4]), payload);
	write_u16_le(&mut buffer[4..], crc);
	buffer
}

/// Encode a two byte frame without payload.
pub fn encode_short_frame(frame_type: u8) -> [u8; 2] {
	[START_BYTE, frame_type]
}

/// Decode a complete frame.
///
/// The start byte, the declared length and the CRC are all checked.
pub fn decode_frame(bytes: &[u8]) -> Result<Frame, ProtocolError> {
	TruncatedPayload::check(bytes.len(), 2)?;
	InvalidStartByte::check(bytes[0], START_BYTE)?;
	let frame_type = bytes[1];

	match FrameLayout::of(frame_type)? {
		FrameLayout::Short => {
			LengthMismatch::check(2, bytes.len())?;
			Ok(Frame {
				frame_type,
				payload: Vec::new(),
			})
		},
		FrameLayout::PingResponse => {
			LengthMismatch::check(PING_RESPONSE_SIZE, bytes.len())?;
			let crc_index = PING_RESPONSE_SIZE - 2;
			InvalidChecksum::check(read_u16_le(&bytes[crc_index..]), calculate_checksum(0, &bytes[..crc_index]))?;
			Ok(Frame {
				frame_type,
				payload: bytes[2..crc_index].to_vec(),
			})
		},
		FrameLayout::WithPayload => {
			TruncatedPayload::check(bytes.len(), FRAME_HEADER_SIZE)?;
			let declared = usize::from(read_u16_le(&bytes[2..]));
			let payload = &bytes[FRAME_HEADER_SIZE..];
			LengthMismatch::check(declared, payload.len())?;

			let computed = calculate_checksum(calculate_checksum(0, &bytes[..4]), payload);
			InvalidChecksum::check(read_u16_le(&bytes[4..]), computed)?;
			Ok(Frame {
				frame_type,
				payload: payload.to_vec(),
			})
		},
	}
}
