use super::command_tag;
use crate::{Error, Response, SerialPort, Session};

impl<P> Session<P>
where
	P: SerialPort,
{
	/// Fill a memory region with a repeated 32 bit pattern.
	pub fn fill_memory(&mut self, address: u32, length: u32, pattern: u32) -> Result<Response<()>, Error<P::Error>> {
		self.execute_simple(command_tag::FILL_MEMORY, &[address, length, pattern])
	}

	/// Reset the device.
	///
	/// The bootloader answers before resetting.
	/// The session stays open, but the device needs to be pinged again before it accepts new commands,
	/// so normally you should close the session afterwards.
	pub fn reset(&mut self) -> Result<Response<()>, Error<P::Error>> {
		self.execute_simple(command_tag::RESET, &[])
	}

	/// Jump to code at `address`, passing `argument` and using `stack_pointer` as new stack pointer.
	///
	/// The bootloader does not return after a successful jump.
	pub fn execute(&mut self, address: u32, argument: u32, stack_pointer: u32) -> Result<Response<()>, Error<P::Error>> {
		self.execute_simple(command_tag::EXECUTE, &[address, argument, stack_pointer])
	}

	/// Call a function at `address` with `argument`.
	pub fn call(&mut self, address: u32, argument: u32) -> Result<Response<()>, Error<P::Error>> {
		self.execute_simple(command_tag::CALL, &[address, argument])
	}
}
