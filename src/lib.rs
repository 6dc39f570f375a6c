//! Host side driver for MCU bootloaders speaking the framed serial bootloader protocol.
//!
//! A [`Session`] owns the connection to one device.
//! It is created with [`Session::open()`] (or [`Session::with_serial_port()`] for an already opened port),
//! which performs a ping handshake before returning.
//! Commands are executed with methods like [`Session::get_property()`], [`Session::write_memory()`] and [`Session::read_memory()`].
//!
//! Variable length results are returned in an owned [`ResponseBuffer`],
//! released when dropped or explicitly with [`free_response_words()`] and [`free_read_memory_response()`].
//!
//! A transport or protocol failure leaves the session [`SessionState::Faulted`]:
//! the link is in an unknown state, so the session must be closed and opened again.
//! Failures reported by the device itself ([`DeviceError`]) leave the session usable.
//!
//! # Optional features
//!
//! * `serial2` (enabled by default): implement [`SerialPort`] for [`serial2::SerialPort`] and provide [`Session::open()`].
//!
//! # Example
//!
//! ```no_run
//! # #[cfg(feature = "serial2")]
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use mboot::{property_tag, Config, ProtocolKind, Session, Version};
//!
//! let mut session = Session::open("/dev/ttyUSB0", ProtocolKind::Uart, Config::default())?;
//! let response = session.get_property(property_tag::CURRENT_VERSION, 0)?;
//! if let Some(&word) = response.data.get(0) {
//! 	println!("bootloader version: {}", Version::from_word(word));
//! }
//! session.close();
//! # Ok(())
//! # }
//! # #[cfg(not(feature = "serial2"))]
//! # fn main() {}
//! ```

mod checksum;
mod endian;

pub mod commands;
pub mod error;
pub mod packet;
pub mod property;

mod config;
mod response;
mod serial_port;
mod session;
mod status;
mod target;
mod transport;

pub use commands::{command_tag, response_tag, DEFAULT_MAX_PACKET_SIZE};
pub use config::{Config, ProtocolKind, DEFAULT_BAUD_RATE, DEFAULT_TIMEOUT};
pub use error::{DeviceError, Error, ProtocolError, ResourceError, TransportError};
pub use property::{memory_id, property_tag, Version};
pub use response::{free_read_memory_response, free_response_words, Response, ResponseBuffer};
pub use serial_port::SerialPort;
pub use session::{Session, SessionState};
pub use status::StatusCode;
pub use target::Target;
pub use transport::Transport;

#[cfg(feature = "serial2")]
pub use serial2;
