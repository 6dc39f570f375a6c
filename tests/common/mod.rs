#![allow(dead_code)]

use log::debug;
use mboot::{Config, Error, Session, Target};
use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering::Relaxed;
use std::sync::Arc;
use std::time::Duration;

mod mock_bootloader;
mod mock_serial_port;

pub use mock_bootloader::{MockBootloader, FLASH_SIZE, LOCKED_OTP_INDEX, MAX_PACKET_SIZE, OTP_WORDS, VERSION};
pub use mock_serial_port::MockSerialPort;

pub fn test_config() -> Config {
	Config::default().with_timeout(Duration::from_secs(1))
}

/// Run a test against a simulated bootloader.
pub fn run_mock<F>(test: F)
where
	F: FnOnce(&mut Session<MockSerialPort>),
{
	run_with(MockBootloader::new, test)
}

/// Run a test against a customized simulated bootloader.
pub fn run_with<B, F>(make_bootloader: B, test: F)
where
	B: FnOnce(MockSerialPort) -> MockBootloader,
	F: FnOnce(&mut Session<MockSerialPort>),
{
	let host_port = MockSerialPort::new(57600);
	let kill_device = Arc::new(AtomicBool::new(false));
	let device_t = make_bootloader(host_port.device_port()).run(kill_device.clone());

	let mut session = Session::with_serial_port(host_port, "mock", test_config()).unwrap();
	test(&mut session);
	session.close();

	kill_device.store(true, Relaxed);
	device_t.join().unwrap();
}

/// Run a test against a hand written device.
///
/// The `device` closure is called repeatedly on the device thread, each call handles one exchange.
pub fn run_target<D, F>(mut device: D, test: F)
where
	D: FnMut(&mut Target<MockSerialPort>) -> Result<(), Error<std::io::Error>> + Send + 'static,
	F: FnOnce(&mut Session<MockSerialPort>),
{
	let host_port = MockSerialPort::new(57600);
	let kill_device = Arc::new(AtomicBool::new(false));
	let device_t = std::thread::spawn({
		let mut target = Target::new(host_port.device_port(), Duration::from_millis(200));
		let kill_device = kill_device.clone();
		move || {
			while !kill_device.load(Relaxed) {
				if let Err(e) = device(&mut target) {
					debug!("device exchange failed: {}", e);
				}
			}
		}
	});

	let mut session = Session::with_serial_port(host_port, "mock", test_config()).unwrap();
	test(&mut session);
	session.close();

	kill_device.store(true, Relaxed);
	device_t.join().unwrap();
}
