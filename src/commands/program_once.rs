use log::warn;

use super::{command_tag, read_response, response_tag, send_command};
use crate::error::{DeviceError, LengthMismatch, TruncatedPayload};
use crate::packet::CommandPacket;
use crate::{Error, Response, ResponseBuffer, SerialPort, Session, StatusCode};

/// The program once index can carry flags in the upper byte, reads only use the lower 24 bits.
const PROGRAM_ONCE_INDEX_MASK: u32 = 0x00FF_FFFF;

impl<P> Session<P>
where
	P: SerialPort,
{
	/// Read `count` bytes from the one time programmable region (eFuse or OTP) at `index`.
	///
	/// The value is returned as 32 bit words.
	pub fn flash_read_once(&mut self, index: u32, count: u32) -> Result<Response<ResponseBuffer<u32>>, Error<P::Error>> {
		self.run(|transport| {
			send_command(transport, &CommandPacket::new(command_tag::FLASH_READ_ONCE, &[index, count]))?;
			let response = read_response(transport, command_tag::FLASH_READ_ONCE, response_tag::FLASH_READ_ONCE)?;
			DeviceError::check(command_tag::FLASH_READ_ONCE, response.status)?;

			TruncatedPayload::check(response.parameters.len(), 1)?;
			let byte_count = response.parameters[0];
			LengthMismatch::check(count as usize, byte_count as usize)?;
			let words = &response.parameters[1..];
			LengthMismatch::check((byte_count as usize + 3) / 4, words.len())?;

			Ok(Response {
				status: response.status,
				data: ResponseBuffer::from(words.to_vec()),
			})
		})
	}

	/// Program `count` bytes of `data` into the one time programmable region at `index`.
	///
	/// Programming can only set bits, never clear them.
	/// Some devices silently ignore writes to locked fields, so with `verify` set the value is read back.
	/// If any bit of `data` did not end up set, the response carries [`StatusCode::OTP_VERIFY_FAIL`].
	/// A failed verification is not an error.
	pub fn flash_program_once(&mut self, index: u32, count: u32, data: u32, verify: bool) -> Result<Response<()>, Error<P::Error>> {
		self.execute_simple(command_tag::FLASH_PROGRAM_ONCE, &[index, count, data])?;
		if !verify {
			return Ok(Response {
				status: StatusCode::SUCCESS,
				data: (),
			});
		}

		let read_back = self.flash_read_once(index & PROGRAM_ONCE_INDEX_MASK, count)?;
		let value = read_back.data.get(0).copied().unwrap_or(0);
		if value & data == data {
			Ok(Response {
				status: StatusCode::SUCCESS,
				data: (),
			})
		} else {
			warn!("program once index {:#X}: wrote {:#010X}, read back {:#010X}", index, data, value);
			Ok(Response {
				status: StatusCode::OTP_VERIFY_FAIL,
				data: (),
			})
		}
	}
}
