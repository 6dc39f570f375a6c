//! Byte transport to the bootloader with link level acknowledgements.

use core::time::Duration;
use log::{debug, trace};

use crate::endian::read_u16_le;
use crate::error::{InvalidStartByte, ProtocolError, TransportError, UnexpectedPacket};
use crate::packet::{
	decode_frame, encode_frame, encode_short_frame, frame_type, Frame, FrameLayout, PingResponse, FRAME_HEADER_SIZE,
	MAX_LEADING_GARBAGE, PING_RESPONSE_SIZE, START_BYTE,
};
use crate::{Error, SerialPort};

/// A framed connection over a [`SerialPort`].
///
/// The transport works in both directions.
/// It is used by [`crate::Session`] on the host and by [`crate::Target`] on the device side.
pub struct Transport<P: SerialPort> {
	/// The serial port, or `None` once the transport is closed.
	serial_port: Option<P>,

	/// Time to wait for a complete frame.
	timeout: Duration,
}

impl<P> core::fmt::Debug for Transport<P>
where
	P: SerialPort + core::fmt::Debug,
{
	fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
		f.debug_struct("Transport")
			.field("serial_port", &self.serial_port)
			.field("timeout", &self.timeout)
			.finish()
	}
}

#[cfg(feature = "serial2")]
impl Transport<serial2::SerialPort> {
	/// Open a serial port and perform the ping handshake.
	pub fn open(path: impl AsRef<std::path::Path>, config: &crate::Config) -> Result<Self, Error<std::io::Error>> {
		let path = path.as_ref();
		let serial_port = serial2::SerialPort::open(path, config.baud_rate).map_err(TransportError::Io)?;
		log::info!(
			"opened {} at {} baud with a timeout of {} ms",
			path.display(),
			config.baud_rate,
			config.timeout.as_millis()
		);
		let mut transport = Self::new(serial_port, config.timeout);
		transport.handshake()?;
		Ok(transport)
	}
}

impl<P> Transport<P>
where
	P: SerialPort,
{
	/// Wrap an already opened serial port.
	///
	/// No handshake is performed, use [`Self::handshake()`] when acting as host.
	pub fn new(serial_port: P, timeout: Duration) -> Self {
		Self {
			serial_port: Some(serial_port),
			timeout,
		}
	}

	/// Get the frame timeout.
	pub fn timeout(&self) -> Duration {
		self.timeout
	}

	/// Set the frame timeout.
	pub fn set_timeout(&mut self, timeout: Duration) {
		self.timeout = timeout;
	}

	/// Check if the transport has been closed.
	pub fn is_closed(&self) -> bool {
		self.serial_port.is_none()
	}

	/// Close the transport and release the serial port.
	///
	/// Closing an already closed transport does nothing.
	/// Returns `true` if the transport was still open.
	pub fn close(&mut self) -> bool {
		self.serial_port.take().is_some()
	}

	/// Get a reference to the serial port.
	pub fn serial_port(&self) -> Option<&P> {
		self.serial_port.as_ref()
	}

	fn port(&mut self) -> Result<&mut P, TransportError<P::Error>> {
		self.serial_port.as_mut().ok_or(TransportError::Closed)
	}

	/// Make a deadline that expires after the frame timeout.
	pub fn make_deadline(&mut self) -> Result<P::Instant, TransportError<P::Error>> {
		let timeout = self.timeout;
		Ok(self.port()?.make_deadline(timeout))
	}

	/// Discard bytes that were received but not read yet.
	pub fn discard_input_buffer(&mut self) -> Result<(), TransportError<P::Error>> {
		self.port()?.discard_input_buffer().map_err(TransportError::Io)
	}

	/// Write all bytes to the serial port.
	pub fn send(&mut self, bytes: &[u8]) -> Result<(), TransportError<P::Error>> {
		trace!("sending: {:02X?}", bytes);
		self.port()?.write_all(bytes).map_err(TransportError::Io)
	}

	/// Receive exactly `expected_length` bytes within the frame timeout.
	pub fn receive(&mut self, expected_length: usize) -> Result<Vec<u8>, TransportError<P::Error>> {
		let deadline = self.make_deadline()?;
		let mut buffer = vec![0; expected_length];
		self.receive_into(&mut buffer, &deadline)?;
		Ok(buffer)
	}

	/// Fill the whole buffer, or fail once the deadline expires.
	pub fn receive_into(&mut self, buffer: &mut [u8], deadline: &P::Instant) -> Result<(), TransportError<P::Error>> {
		let serial_port = self.port()?;
		let mut filled = 0;
		while filled < buffer.len() {
			filled += serial_port
				.read(&mut buffer[filled..], deadline)
				.map_err(TransportError::from_serial::<P>)?;
		}
		Ok(())
	}

	/// Write a frame with a payload.
	pub fn write_frame(&mut self, frame_type: u8, payload: &[u8]) -> Result<(), TransportError<P::Error>> {
		self.send(&encode_frame(frame_type, payload))
	}

	/// Write a two byte frame such as an ACK.
	pub fn write_short_frame(&mut self, frame_type: u8) -> Result<(), TransportError<P::Error>> {
		self.send(&encode_short_frame(frame_type))
	}

	/// Acknowledge the last received frame.
	pub fn write_ack(&mut self) -> Result<(), TransportError<P::Error>> {
		self.write_short_frame(frame_type::ACK)
	}

	/// Read one frame.
	///
	/// Leading garbage before the start byte is skipped, up to [`MAX_LEADING_GARBAGE`] bytes.
	pub fn read_frame(&mut self) -> Result<Frame, Error<P::Error>> {
		let deadline = self.make_deadline()?;

		let mut byte = [0u8];
		let mut garbage = 0;
		loop {
			self.receive_into(&mut byte, &deadline)?;
			if byte[0] == START_BYTE {
				break;
			}
			trace!("skipped garbage byte: {:#04X}", byte[0]);
			garbage += 1;
			if garbage > MAX_LEADING_GARBAGE {
				return Err(InvalidStartByte { actual: byte[0] }.into());
			}
		}
		if garbage > 0 {
			debug!("skipped {} bytes of leading garbage", garbage);
		}

		let mut raw = vec![START_BYTE, 0];
		self.receive_into(&mut raw[1..], &deadline)?;
		match FrameLayout::of(raw[1])? {
			FrameLayout::Short => (),
			FrameLayout::PingResponse => {
				raw.resize(PING_RESPONSE_SIZE, 0);
				self.receive_into(&mut raw[2..], &deadline)?;
			},
			FrameLayout::WithPayload => {
				raw.resize(FRAME_HEADER_SIZE, 0);
				self.receive_into(&mut raw[2..], &deadline)?;
				let payload_len = usize::from(read_u16_le(&raw[2..]));
				raw.resize(FRAME_HEADER_SIZE + payload_len, 0);
				self.receive_into(&mut raw[FRAME_HEADER_SIZE..], &deadline)?;
			},
		}

		trace!("received: {:02X?}", raw);
		Ok(decode_frame(&raw)?)
	}

	/// Wait for the other side to acknowledge the last frame.
	pub fn read_ack(&mut self) -> Result<(), Error<P::Error>> {
		let frame = self.read_frame()?;
		match frame.frame_type {
			frame_type::ACK => Ok(()),
			frame_type::NACK => Err(ProtocolError::Nack.into()),
			frame_type::ABORT => Err(ProtocolError::Aborted.into()),
			actual => Err(UnexpectedPacket {
				actual,
				expected: frame_type::ACK,
			}
			.into()),
		}
	}

	/// Ping the bootloader.
	pub fn ping(&mut self) -> Result<PingResponse, Error<P::Error>> {
		self.write_short_frame(frame_type::PING)?;
		let frame = self.read_frame()?;
		frame.expect_type(frame_type::PING_RESPONSE)?;
		Ok(PingResponse::decode(&frame.payload)?)
	}

	/// Synchronize with the bootloader by discarding stale input and sending a ping.
	pub fn handshake(&mut self) -> Result<PingResponse, Error<P::Error>> {
		self.discard_input_buffer()?;
		let response = self.ping()?;
		debug!(
			"bootloader answered ping with protocol version {:#010X}, options {:#06X}",
			response.version, response.options
		);
		Ok(response)
	}
}
