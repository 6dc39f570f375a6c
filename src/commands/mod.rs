//! The bootloader command set.
//!
//! Each command is implemented as a method on [`crate::Session`].

use crate::error::{DeviceError, ProtocolError, TruncatedPayload, UnexpectedResponse};
use crate::packet::{frame_type, CommandPacket, CommandResponse};
use crate::transport::Transport;
use crate::{Error, Response, SerialPort, Session, StatusCode};

mod control;
mod flash_erase;
mod get_property;
mod program_once;
mod read_memory;
mod write_memory;

pub use get_property::DEFAULT_MAX_PACKET_SIZE;

/// Command tags.
pub mod command_tag {
	pub const FLASH_ERASE_ALL: u8 = 0x01;
	pub const FLASH_ERASE_REGION: u8 = 0x02;
	pub const READ_MEMORY: u8 = 0x03;
	pub const WRITE_MEMORY: u8 = 0x04;
	pub const FILL_MEMORY: u8 = 0x05;
	pub const GET_PROPERTY: u8 = 0x07;
	pub const EXECUTE: u8 = 0x09;
	pub const CALL: u8 = 0x0A;
	pub const RESET: u8 = 0x0B;
	pub const SET_PROPERTY: u8 = 0x0C;
	pub const FLASH_ERASE_ALL_UNSECURE: u8 = 0x0D;
	pub const FLASH_PROGRAM_ONCE: u8 = 0x0E;
	pub const FLASH_READ_ONCE: u8 = 0x0F;
	pub const CONFIGURE_MEMORY: u8 = 0x11;
}

/// Response tags.
pub mod response_tag {
	pub const GENERIC: u8 = 0xA0;
	pub const READ_MEMORY: u8 = 0xA3;
	pub const GET_PROPERTY: u8 = 0xA7;
	pub const FLASH_READ_ONCE: u8 = 0xAF;
}

/// Send a command and wait for the device to acknowledge it.
///
/// Stale input is discarded first so it can not be mistaken for the response.
pub(crate) fn send_command<P: SerialPort>(transport: &mut Transport<P>, command: &CommandPacket) -> Result<(), Error<P::Error>> {
	transport.discard_input_buffer()?;
	transport.write_frame(frame_type::COMMAND, &command.encode())?;
	transport.read_ack()
}

/// Read the response to `command_tag` and acknowledge it.
///
/// A device that rejects a command may answer with a generic response instead of the `expected_tag` response.
/// That is reported as a [`DeviceError`], the exchange itself completed normally.
pub(crate) fn read_response<P: SerialPort>(
	transport: &mut Transport<P>,
	command_tag: u8,
	expected_tag: u8,
) -> Result<CommandResponse, Error<P::Error>> {
	let frame = transport.read_frame()?;
	frame.expect_type(frame_type::COMMAND)?;
	let response = CommandResponse::decode(&frame.payload)?;
	transport.write_ack()?;
	if response.tag == response_tag::GENERIC && expected_tag != response_tag::GENERIC && !response.status.is_success() {
		check_echoed_command(&response, command_tag)?;
		return Err(DeviceError {
			command: command_tag,
			status: response.status,
		}
		.into());
	}
	UnexpectedResponse::check(response.tag, expected_tag)?;
	Ok(response)
}

/// Read a generic response for `command_tag` and return the reported status.
pub(crate) fn read_generic_response<P: SerialPort>(transport: &mut Transport<P>, command_tag: u8) -> Result<StatusCode, Error<P::Error>> {
	let response = read_response(transport, command_tag, response_tag::GENERIC)?;
	check_echoed_command(&response, command_tag)?;
	Ok(response.status)
}

/// Check that a generic response names `command_tag` as its command.
fn check_echoed_command(response: &CommandResponse, command_tag: u8) -> Result<(), ProtocolError> {
	TruncatedPayload::check(response.parameters.len(), 1)?;
	// Values that do not fit a command tag can never match.
	let echoed = u8::try_from(response.parameters[0]).unwrap_or(u8::MAX);
	UnexpectedResponse::check(echoed, command_tag)?;
	Ok(())
}

impl<P> Session<P>
where
	P: SerialPort,
{
	/// Execute a command without data phase that is answered by a generic response.
	pub(crate) fn execute_simple(&mut self, tag: u8, parameters: &[u32]) -> Result<Response<()>, Error<P::Error>> {
		self.run(|transport| {
			send_command(transport, &CommandPacket::new(tag, parameters))?;
			let status = read_generic_response(transport, tag)?;
			DeviceError::check(tag, status)?;
			Ok(Response { status, data: () })
		})
	}
}
