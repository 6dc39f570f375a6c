use log::debug;

use super::{command_tag, read_generic_response, read_response, response_tag, send_command};
use crate::error::{DeviceError, LengthMismatch, ProtocolError, ResourceError, TruncatedPayload, UnexpectedPacket};
use crate::packet::{frame_type, CommandPacket, CommandResponse};
use crate::{Error, Response, ResponseBuffer, SerialPort, Session, StatusCode};

impl<P> Session<P>
where
	P: SerialPort,
{
	/// Read `length` bytes of memory starting at `address`.
	///
	/// On success the response holds exactly `length` bytes.
	/// If the device announces or sends a different number of bytes,
	/// a [`ProtocolError::LengthMismatch`] is returned.
	///
	/// Devices that refuse to read back blank pages report [`StatusCode::MEMORY_BLANK_PAGE_READ_DISALLOWED`].
	/// That status is not treated as a failure, it is returned in the response together with the data.
	pub fn read_memory(&mut self, address: u32, length: usize, memory_id: u32) -> Result<Response<ResponseBuffer<u8>>, Error<P::Error>> {
		let byte_count = ResourceError::check_fits_u32(length)?;

		self.run(|transport| {
			send_command(transport, &CommandPacket::new(command_tag::READ_MEMORY, &[address, byte_count, memory_id]))?;
			let response = read_response(transport, command_tag::READ_MEMORY, response_tag::READ_MEMORY)?;
			check_read_status(response.status)?;
			TruncatedPayload::check(response.parameters.len(), 1)?;
			LengthMismatch::check(length, response.parameters[0] as usize)?;

			let mut data = Vec::with_capacity(length);
			while data.len() < length {
				let frame = transport.read_frame()?;
				match frame.frame_type {
					frame_type::DATA => {
						transport.write_ack()?;
						if frame.payload.is_empty() {
							debug!("device aborted the data phase after {} bytes", data.len());
							return Err(ProtocolError::Aborted.into());
						}
						data.extend_from_slice(&frame.payload);
					},
					frame_type::COMMAND => {
						// The device ended the data phase early.
						let response = CommandResponse::decode(&frame.payload)?;
						transport.write_ack()?;
						check_read_status(response.status)?;
						return Err(LengthMismatch {
							declared: length,
							actual: data.len(),
						}
						.into());
					},
					actual => {
						return Err(UnexpectedPacket {
							actual,
							expected: frame_type::DATA,
						}
						.into())
					},
				}
			}
			LengthMismatch::check(length, data.len())?;

			let status = read_generic_response(transport, command_tag::READ_MEMORY)?;
			check_read_status(status)?;
			Ok(Response {
				status: if status.is_success() { response.status } else { status },
				data: ResponseBuffer::from(data),
			})
		})
	}
}

fn check_read_status(status: StatusCode) -> Result<(), DeviceError> {
	if status == StatusCode::MEMORY_BLANK_PAGE_READ_DISALLOWED {
		return Ok(());
	}
	DeviceError::check(command_tag::READ_MEMORY, status)
}
