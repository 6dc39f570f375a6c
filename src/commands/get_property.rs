use log::{debug, warn};

use super::{command_tag, read_response, response_tag, send_command};
use crate::error::DeviceError;
use crate::packet::{CommandPacket, MAX_PAYLOAD_SIZE};
use crate::property::property_tag;
use crate::{Error, Response, ResponseBuffer, SerialPort, Session};

/// Packet size used when the device does not report one.
pub const DEFAULT_MAX_PACKET_SIZE: usize = 32;

impl<P> Session<P>
where
	P: SerialPort,
{
	/// Read a property of the bootloader.
	///
	/// The `index` selects the memory for memory related properties and is zero otherwise.
	/// The response holds all property words reported by the device.
	pub fn get_property(&mut self, tag: u32, index: u32) -> Result<Response<ResponseBuffer<u32>>, Error<P::Error>> {
		self.run(|transport| {
			send_command(transport, &CommandPacket::new(command_tag::GET_PROPERTY, &[tag, index]))?;
			let response = read_response(transport, command_tag::GET_PROPERTY, response_tag::GET_PROPERTY)?;
			DeviceError::check(command_tag::GET_PROPERTY, response.status)?;
			Ok(Response {
				status: response.status,
				data: ResponseBuffer::from(response.parameters),
			})
		})
	}

	/// Change a writable property of the bootloader.
	pub fn set_property(&mut self, tag: u32, value: u32) -> Result<Response<()>, Error<P::Error>> {
		self.execute_simple(command_tag::SET_PROPERTY, &[tag, value])
	}

	/// Get the maximum payload size of a data phase frame.
	///
	/// The value is queried once and cached for the lifetime of the session.
	/// If the device rejects the query, [`DEFAULT_MAX_PACKET_SIZE`] is used.
	pub fn max_packet_size(&mut self) -> Result<usize, Error<P::Error>> {
		if let Some(size) = self.max_packet_size {
			return Ok(size);
		}

		let size = match self.get_property(property_tag::MAX_PACKET_SIZE, 0) {
			Ok(response) => match response.data.get(0) {
				Some(&0) | None => DEFAULT_MAX_PACKET_SIZE,
				Some(&size) => usize::try_from(size).unwrap_or(MAX_PAYLOAD_SIZE).min(MAX_PAYLOAD_SIZE),
			},
			Err(Error::Device(e)) => {
				warn!("failed to read maximum packet size ({}), using {} bytes", e, DEFAULT_MAX_PACKET_SIZE);
				DEFAULT_MAX_PACKET_SIZE
			},
			Err(e) => return Err(e),
		};
		debug!("maximum packet size: {} bytes", size);
		self.max_packet_size = Some(size);
		Ok(size)
	}
}
