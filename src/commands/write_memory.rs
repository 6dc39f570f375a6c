use log::debug;

use super::{command_tag, read_generic_response, send_command};
use crate::error::{DeviceError, ProtocolError, ResourceError};
use crate::packet::{frame_type, CommandPacket};
use crate::{Error, Response, SerialPort, Session};

impl<P> Session<P>
where
	P: SerialPort,
{
	/// Write `length` bytes of `data` to memory at `address`.
	///
	/// The `length` must equal `data.len()`.
	/// If it does not, a [`ResourceError`] is returned and nothing is sent to the device.
	///
	/// The data is sent in a data phase split into frames of [`Self::max_packet_size()`] bytes.
	pub fn write_memory(&mut self, address: u32, memory_id: u32, data: &[u8], length: usize) -> Result<Response<()>, Error<P::Error>> {
		ResourceError::check_length(length, data.len())?;
		let byte_count = ResourceError::check_fits_u32(length)?;
		let packet_size = self.max_packet_size()?;

		self.run(|transport| {
			let command = CommandPacket::with_data_phase(command_tag::WRITE_MEMORY, &[address, byte_count, memory_id]);
			send_command(transport, &command)?;

			// The device validates the command before accepting data.
			let status = read_generic_response(transport, command_tag::WRITE_MEMORY)?;
			DeviceError::check(command_tag::WRITE_MEMORY, status)?;

			let mut aborted = false;
			for chunk in data.chunks(packet_size) {
				transport.write_frame(frame_type::DATA, chunk)?;
				match transport.read_ack() {
					Ok(()) => (),
					Err(Error::Protocol(ProtocolError::Aborted)) => {
						debug!("device aborted the data phase");
						aborted = true;
						break;
					},
					Err(e) => return Err(e),
				}
			}

			let status = read_generic_response(transport, command_tag::WRITE_MEMORY)?;
			DeviceError::check(command_tag::WRITE_MEMORY, status)?;
			if aborted {
				return Err(ProtocolError::Aborted.into());
			}
			Ok(Response { status, data: () })
		})
	}
}
