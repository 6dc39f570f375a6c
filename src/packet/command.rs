use crate::endian::{read_u32_le, write_u32_le};
use crate::error::{LengthMismatch, ProtocolError, TruncatedPayload};
use crate::StatusCode;

/// The maximum number of parameters in a command packet.
pub const MAX_PARAMETERS: usize = 7;

/// The size of the fixed header of a command or response payload.
const HEADER_SIZE: usize = 4;

/// Flag bit indicating that a data phase follows the packet.
pub const FLAG_HAS_DATA_PHASE: u8 = 0x01;

/// A command sent from the host to the bootloader.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct CommandPacket {
	/// The command tag.
	pub tag: u8,

	/// The command flags.
	pub flags: u8,

	/// The parameters of the command, at most [`MAX_PARAMETERS`].
	pub parameters: Vec<u32>,
}

/// A response sent by the bootloader for a command.
///
/// The status word is the first parameter on the wire, it is split off here.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct CommandResponse {
	/// The response tag.
	pub tag: u8,

	/// The response flags.
	pub flags: u8,

	/// The status of the command.
	pub status: StatusCode,

	/// The parameters following the status word.
	pub parameters: Vec<u32>,
}

impl CommandPacket {
	/// Create a command without data phase.
	pub fn new(tag: u8, parameters: &[u32]) -> Self {
		debug_assert!(parameters.len() <= MAX_PARAMETERS);
		Self {
			tag,
			flags: 0,
			parameters: parameters.to_vec(),
		}
	}

	/// Create a command that is followed by a data phase from the host.
	pub fn with_data_phase(tag: u8, parameters: &[u32]) -> Self {
		Self {
			flags: FLAG_HAS_DATA_PHASE,
			..Self::new(tag, parameters)
		}
	}

	/// Check if the command announces a data phase.
	pub fn has_data_phase(&self) -> bool {
		self.flags & FLAG_HAS_DATA_PHASE != 0
	}

	/// Get a parameter, or zero if the command has fewer parameters.
	pub fn parameter(&self, index: usize) -> u32 {
		self.parameters.get(index).copied().unwrap_or(0)
	}

	/// Encode the command into a frame payload.
	pub fn encode(&self) -> Vec<u8> {
		encode_payload(self.tag, self.flags, &self.parameters)
	}

	/// Decode a command from a frame payload.
	pub fn decode(payload: &[u8]) -> Result<Self, ProtocolError> {
		let (tag, flags, parameters) = decode_payload(payload)?;
		Ok(Self { tag, flags, parameters })
	}
}

impl CommandResponse {
	/// Check if the response announces a data phase from the device.
	pub fn has_data_phase(&self) -> bool {
		self.flags & FLAG_HAS_DATA_PHASE != 0
	}

	/// Encode the response into a frame payload.
	pub fn encode(&self) -> Vec<u8> {
		let mut words = Vec::with_capacity(self.parameters.len() + 1);
		words.push(self.status.0);
		words.extend_from_slice(&self.parameters);
		encode_payload(self.tag, self.flags, &words)
	}

	/// Decode a response from a frame payload.
	pub fn decode(payload: &[u8]) -> Result<Self, ProtocolError> {
		let (tag, flags, mut parameters) = decode_payload(payload)?;
		TruncatedPayload::check(parameters.len(), 1)?;
		let status = StatusCode(parameters.remove(0));
		Ok(Self {
			tag,
			flags,
			status,
			parameters,
		})
	}
}

fn encode_payload(tag: u8, flags: u8, words: &[u32]) -> Vec<u8> {
	let mut payload = vec![0; HEADER_SIZE + 4 * words.len()];
	payload[0] = tag;
	payload[1] = flags;
	payload[2] = 0;
	payload[3] = words.len() as u8;
	for (chunk, &word) in payload[HEADER_SIZE..].chunks_exact_mut(4).zip(words) {
		write_u32_le(chunk, word);
	}
	payload
}

fn decode_payload(payload: &[u8]) -> Result<(u8, u8, Vec<u32>), ProtocolError> {
	TruncatedPayload::check(payload.len(), HEADER_SIZE)?;
	let tag = payload[0];
	let flags = payload[1];
	let count = usize::from(payload[3]);

	let body = &payload[HEADER_SIZE..];
	LengthMismatch::check(count * 4, body.len())?;
	let words = body.chunks_exact(4).map(read_u32_le).collect();
	Ok((tag, flags, words))
}
