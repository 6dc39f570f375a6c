use log::{debug, info};

use crate::error::TransportError;
use crate::transport::Transport;
use crate::{Config, Error, SerialPort};

/// The lifecycle state of a [`Session`].
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SessionState {
	/// Commands can be executed.
	Open,

	/// A transport or protocol failure left the link in an unknown state.
	///
	/// Every operation fails with [`TransportError::Faulted`] until the session is closed.
	Faulted,

	/// The session was closed and the serial port released.
	Closed,
}

macro_rules! make_session_struct {
	($($DefaultSerialPort:ty)?) => {
		/// A connection to one bootloader.
		///
		/// Every operation takes `&mut self`, so only one command can be in flight at a time.
		/// Independent sessions can be used from different threads.
		///
		/// If the `"serial2"` feature is enabled, the `SerialPort` type argument defaults to [`serial2::SerialPort`].
		/// If it is not enabled, the `SerialPort` argument must always be specified.
		pub struct Session<SerialPort $(= $DefaultSerialPort)?>
		where
			SerialPort: crate::SerialPort,
		{
			pub(crate) transport: Transport<SerialPort>,
			state: SessionState,
			identifier: String,
			config: Config,
			pub(crate) max_packet_size: Option<usize>,
		}
	};
}

#[cfg(feature = "serial2")]
make_session_struct!(serial2::SerialPort);

#[cfg(not(feature = "serial2"))]
make_session_struct!();

impl<P> core::fmt::Debug for Session<P>
where
	P: SerialPort + core::fmt::Debug,
{
	fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
		f.debug_struct("Session")
			.field("identifier", &self.identifier)
			.field("state", &self.state)
			.field("config", &self.config)
			.field("transport", &self.transport)
			.finish_non_exhaustive()
	}
}

#[cfg(feature = "serial2")]
impl Session<serial2::SerialPort> {
	/// Open a serial port and connect to the bootloader on the other side.
	///
	/// Fails if the port can not be opened or if the bootloader does not answer the ping handshake.
	pub fn open(address: &str, protocol: crate::ProtocolKind, config: Config) -> Result<Self, Error<std::io::Error>> {
		let transport = match protocol {
			crate::ProtocolKind::Uart => Transport::open(address, &config)?,
		};
		Ok(Self::with_transport(transport, address.to_owned(), config))
	}
}

impl<P> Session<P>
where
	P: SerialPort,
{
	/// Connect to the bootloader over an already opened serial port.
	///
	/// The baud rate of the port is set from the configuration and the ping handshake is performed.
	pub fn with_serial_port(serial_port: P, identifier: impl Into<String>, config: Config) -> Result<Self, Error<P::Error>> {
		let mut serial_port = serial_port;
		serial_port.set_baud_rate(config.baud_rate).map_err(TransportError::Io)?;
		let mut transport = Transport::new(serial_port, config.timeout);
		transport.handshake()?;
		let identifier = identifier.into();
		info!("connected to bootloader on {}", identifier);
		Ok(Self::with_transport(transport, identifier, config))
	}

	fn with_transport(transport: Transport<P>, identifier: String, config: Config) -> Self {
		Self {
			transport,
			state: SessionState::Open,
			identifier,
			config,
			max_packet_size: None,
		}
	}

	/// Get the current state of the session.
	pub fn state(&self) -> SessionState {
		self.state
	}

	/// Get the address or name the session was opened with.
	pub fn identifier(&self) -> &str {
		&self.identifier
	}

	/// Get the configuration the session was opened with.
	pub fn config(&self) -> &Config {
		&self.config
	}

	/// Get a reference to the underlying serial port.
	///
	/// Returns `None` once the session is closed.
	pub fn serial_port(&self) -> Option<&P> {
		self.transport.serial_port()
	}

	/// Close the session and release the serial port.
	///
	/// Closing an already closed session does nothing.
	pub fn close(&mut self) {
		if self.state == SessionState::Closed {
			return;
		}
		self.transport.close();
		self.state = SessionState::Closed;
		info!("closed session on {}", self.identifier);
	}

	/// Run one exchange with the device, updating the session state on failure.
	pub(crate) fn run<T, F>(&mut self, exchange: F) -> Result<T, Error<P::Error>>
	where
		F: FnOnce(&mut Transport<P>) -> Result<T, Error<P::Error>>,
	{
		match self.state {
			SessionState::Open => (),
			SessionState::Faulted => return Err(TransportError::Faulted.into()),
			SessionState::Closed => return Err(TransportError::Closed.into()),
		}

		let result = exchange(&mut self.transport);
		if let Err(e) = &result {
			if e.faults_session() {
				debug!("session on {} faulted, status {}", self.identifier, e.status());
				self.state = SessionState::Faulted;
			}
		}
		result
	}
}

impl<P> Drop for Session<P>
where
	P: SerialPort,
{
	fn drop(&mut self) {
		self.close();
	}
}
