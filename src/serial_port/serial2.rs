//! Bootloader UART on top of [`serial2::SerialPort`].
//!
//! `serial2` opens ports as 8N1 without flow control, which is what the bootloader expects.
//! The read deadline is turned into a read timeout before every read.

use std::io::ErrorKind;
use std::time::{Duration, Instant};

impl crate::SerialPort for serial2::SerialPort {
	type Error = std::io::Error;

	type Instant = Instant;

	fn baud_rate(&self) -> Result<u32, Self::Error> {
		self.get_configuration()?.get_baud_rate()
	}

	fn set_baud_rate(&mut self, baud_rate: u32) -> Result<(), Self::Error> {
		let mut settings = self.get_configuration()?;
		settings.set_baud_rate(baud_rate)?;
		self.set_configuration(&settings)
	}

	fn discard_input_buffer(&mut self) -> Result<(), Self::Error> {
		serial2::SerialPort::discard_input_buffer(self)
	}

	fn read(&mut self, buffer: &mut [u8], deadline: &Self::Instant) -> Result<usize, Self::Error> {
		let remaining = deadline
			.checked_duration_since(Instant::now())
			.filter(|remaining| !remaining.is_zero())
			.ok_or(ErrorKind::TimedOut)?;
		self.set_read_timeout(remaining)?;
		serial2::SerialPort::read(self, buffer)
	}

	fn write_all(&mut self, buffer: &[u8]) -> Result<(), Self::Error> {
		serial2::SerialPort::write_all(self, buffer)
	}

	fn make_deadline(&self, timeout: Duration) -> Self::Instant {
		Instant::now() + timeout
	}

	fn is_timeout_error(error: &Self::Error) -> bool {
		error.kind() == ErrorKind::TimedOut
	}
}
