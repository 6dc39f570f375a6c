use core::time::Duration;

/// Default baud rate of the bootloader UART.
pub const DEFAULT_BAUD_RATE: u32 = 57600;

/// Default time to wait for the device to answer.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// The physical transport used to reach the bootloader.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
#[non_exhaustive]
pub enum ProtocolKind {
	/// A serial port (UART).
	Uart,
}

/// Settings used when opening a session.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Config {
	/// The baud rate of the serial port.
	pub baud_rate: u32,

	/// Time to wait for each frame from the device.
	pub timeout: Duration,
}

impl Config {
	pub fn new() -> Self {
		Self {
			baud_rate: DEFAULT_BAUD_RATE,
			timeout: DEFAULT_TIMEOUT,
		}
	}

	pub fn with_baud_rate(self, baud_rate: u32) -> Self {
		Self { baud_rate, ..self }
	}

	pub fn with_timeout(self, timeout: Duration) -> Self {
		Self { timeout, ..self }
	}
}

impl Default for Config {
	fn default() -> Self {
		Self::new()
	}
}
