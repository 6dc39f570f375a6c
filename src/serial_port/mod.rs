//! The byte channel below [`crate::Transport`].
//!
//! Frames, acknowledgements and pings are built on top of the few primitives of [`SerialPort`].

use core::time::Duration;

#[cfg(feature = "serial2")]
pub mod serial2;

/// A UART connection to a bootloader.
///
/// The bootloader UART runs 8N1 without flow control, the implementor must set up the line that way.
/// The baud rate is set from [`crate::Config`] when a session is created.
/// Reads use deadlines instead of timeouts, so all reads of one frame share the frame timeout.
pub trait SerialPort {
	/// The error type returned by the serial port.
	type Error;

	/// A point in time used as a deadline for reads.
	type Instant: Copy;

	/// Get the current baud rate of the serial port.
	fn baud_rate(&self) -> Result<u32, Self::Error>;

	/// Set the baud rate of the serial port.
	fn set_baud_rate(&mut self, baud_rate: u32) -> Result<(), Self::Error>;

	/// Drop stale input.
	///
	/// Called before every command and before the ping handshake,
	/// so left over bytes of an earlier exchange are not taken for the response.
	fn discard_input_buffer(&mut self) -> Result<(), Self::Error>;

	/// Read the bytes that are available, waiting for at least one byte until `deadline`.
	///
	/// Returning `Ok(0)` is allowed, the transport keeps reading until the frame is complete.
	/// Once the deadline passed, an error must be returned for which [`Self::is_timeout_error()`] is true.
	fn read(&mut self, buffer: &mut [u8], deadline: &Self::Instant) -> Result<usize, Self::Error>;

	/// Write a complete frame.
	fn write_all(&mut self, buffer: &[u8]) -> Result<(), Self::Error>;

	/// Get the deadline for a frame that must arrive within `timeout`.
	fn make_deadline(&self, timeout: Duration) -> Self::Instant;

	/// Check if a read failed because the deadline passed.
	///
	/// These errors are reported as [`crate::TransportError::Timeout`].
	fn is_timeout_error(error: &Self::Error) -> bool;
}
