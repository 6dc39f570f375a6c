use super::command_tag;
use crate::{Error, Response, SerialPort, Session};

impl<P> Session<P>
where
	P: SerialPort,
{
	/// Erase the complete flash of a memory.
	///
	/// Erased flash reads back as `0xFF`.
	pub fn flash_erase_all(&mut self, memory_id: u32) -> Result<Response<()>, Error<P::Error>> {
		self.execute_simple(command_tag::FLASH_ERASE_ALL, &[memory_id])
	}

	/// Erase a region of flash.
	///
	/// The device may require the region to be aligned to its sector size.
	pub fn flash_erase_region(&mut self, address: u32, length: u32, memory_id: u32) -> Result<Response<()>, Error<P::Error>> {
		self.execute_simple(command_tag::FLASH_ERASE_REGION, &[address, length, memory_id])
	}

	/// Erase the complete internal flash and remove the flash security.
	pub fn flash_erase_all_unsecure(&mut self) -> Result<Response<()>, Error<P::Error>> {
		self.execute_simple(command_tag::FLASH_ERASE_ALL_UNSECURE, &[])
	}

	/// Configure an external memory.
	///
	/// The configuration block for the memory must already be stored at `address`, usually in RAM through [`Self::write_memory()`].
	/// After that the memory can be erased, written and read with the given `memory_id`.
	pub fn configure_memory(&mut self, memory_id: u32, address: u32) -> Result<Response<()>, Error<P::Error>> {
		self.execute_simple(command_tag::CONFIGURE_MEMORY, &[memory_id, address])
	}
}
