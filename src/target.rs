//! Device side of the bootloader protocol.
//!
//! A [`Target`] receives commands from a [`crate::Session`] and answers them.
//! It can be used to emulate a bootloader, for example in tests.

use core::time::Duration;
use log::trace;

use crate::commands::response_tag;
use crate::error::{ProtocolError, UnexpectedPacket};
use crate::packet::{frame_type, CommandPacket, CommandResponse, PingResponse};
use crate::transport::Transport;
use crate::{Error, SerialPort, StatusCode};

/// The device side of a bootloader connection.
pub struct Target<P: SerialPort> {
	transport: Transport<P>,
	ping_response: PingResponse,
}

impl<P> core::fmt::Debug for Target<P>
where
	P: SerialPort + core::fmt::Debug,
{
	fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
		f.debug_struct("Target")
			.field("transport", &self.transport)
			.field("ping_response", &self.ping_response)
			.finish()
	}
}

impl<P> Target<P>
where
	P: SerialPort,
{
	/// Create a target on an open serial port.
	///
	/// The `timeout` limits how long each read waits for a frame.
	pub fn new(serial_port: P, timeout: Duration) -> Self {
		Self {
			transport: Transport::new(serial_port, timeout),
			ping_response: PingResponse {
				version: 0x0002_0150,
				options: 0,
			},
		}
	}

	/// Set the answer to ping requests.
	pub fn with_ping_response(self, ping_response: PingResponse) -> Self {
		Self { ping_response, ..self }
	}

	/// Get the underlying transport.
	pub fn transport(&mut self) -> &mut Transport<P> {
		&mut self.transport
	}

	/// Wait for the next command and acknowledge it.
	///
	/// Ping requests received while waiting are answered automatically.
	pub fn read_command(&mut self) -> Result<CommandPacket, Error<P::Error>> {
		let command = self.receive_command()?;
		self.transport.write_ack()?;
		Ok(command)
	}

	/// Wait for the next command without acknowledging it.
	///
	/// The caller must answer with an ACK or NACK frame itself.
	/// Ping requests received while waiting are answered automatically.
	pub fn receive_command(&mut self) -> Result<CommandPacket, Error<P::Error>> {
		loop {
			let frame = self.transport.read_frame()?;
			match frame.frame_type {
				frame_type::PING => {
					trace!("answering ping");
					self.transport.send(&self.ping_response.encode())?;
				},
				frame_type::COMMAND => return Ok(CommandPacket::decode(&frame.payload)?),
				actual => {
					return Err(UnexpectedPacket {
						actual,
						expected: frame_type::COMMAND,
					}
					.into())
				},
			}
		}
	}

	/// Send a response and wait for the host to acknowledge it.
	pub fn send_response(&mut self, response: &CommandResponse) -> Result<(), Error<P::Error>> {
		self.transport.write_frame(frame_type::COMMAND, &response.encode())?;
		self.transport.read_ack()
	}

	/// Send a generic response for the given command.
	pub fn send_generic_response(&mut self, command_tag: u8, status: StatusCode) -> Result<(), Error<P::Error>> {
		self.send_response(&CommandResponse {
			tag: response_tag::GENERIC,
			flags: 0,
			status,
			parameters: vec![u32::from(command_tag)],
		})
	}

	/// Receive `length` bytes in a data phase from the host.
	pub fn read_data_phase(&mut self, length: usize) -> Result<Vec<u8>, Error<P::Error>> {
		let mut data = Vec::with_capacity(length);
		while data.len() < length {
			let frame = self.transport.read_frame()?;
			frame.expect_type(frame_type::DATA)?;
			self.transport.write_ack()?;
			if frame.payload.is_empty() {
				return Err(ProtocolError::Aborted.into());
			}
			data.extend_from_slice(&frame.payload);
		}
		Ok(data)
	}

	/// Send data to the host in frames of at most `packet_size` bytes.
	pub fn send_data_phase(&mut self, data: &[u8], packet_size: usize) -> Result<(), Error<P::Error>> {
		for chunk in data.chunks(packet_size.max(1)) {
			self.transport.write_frame(frame_type::DATA, chunk)?;
			self.transport.read_ack()?;
		}
		Ok(())
	}
}
