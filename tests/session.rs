use assert2::{assert, let_assert};
use mboot::packet::{frame_type, PingResponse};
use mboot::{property_tag, Error, Session, SessionState, Target, TransportError};
use std::time::Duration;
use test_log::test;

mod common;
use common::{run_mock, test_config, MockSerialPort};

/// Answer a single ping, optionally preceded by garbage, then stop responding.
fn answer_one_ping(serial_port: MockSerialPort, garbage: Vec<u8>) -> std::thread::JoinHandle<()> {
	std::thread::spawn(move || {
		let mut target = Target::new(serial_port, Duration::from_secs(1));
		let_assert!(Ok(frame) = target.transport().read_frame());
		assert!(frame.frame_type == frame_type::PING);
		let response = PingResponse {
			version: 0x0002_0150,
			options: 0,
		};
		assert!(let Ok(()) = target.transport().send(&garbage));
		assert!(let Ok(()) = target.transport().send(&response.encode()));
	})
}

#[test]
fn test_open_and_close() {
	run_mock(|session| {
		assert!(session.state() == SessionState::Open);
		assert!(session.identifier() == "mock");
		assert!(session.serial_port().is_some());

		session.close();
		assert!(session.state() == SessionState::Closed);
		assert!(session.serial_port().is_none());

		// Closing twice is fine.
		session.close();
		assert!(session.state() == SessionState::Closed);

		let_assert!(Err(e) = session.get_property(property_tag::CURRENT_VERSION, 0));
		assert!(let Error::Transport(TransportError::Closed) = e);
		assert!(e.status() == mboot::error::STATUS_SESSION_UNUSABLE);
	});
}

#[test]
fn test_handshake_skips_garbage() {
	let host_port = MockSerialPort::new(57600);
	let device_t = answer_one_ping(host_port.device_port(), vec![0x00, 0xFF, 0x13]);
	let_assert!(Ok(session) = Session::with_serial_port(host_port, "mock", test_config()));
	assert!(session.state() == SessionState::Open);
	device_t.join().unwrap();
}

#[test]
fn test_handshake_gives_up_on_too_much_garbage() {
	let host_port = MockSerialPort::new(57600);
	let device_t = answer_one_ping(host_port.device_port(), vec![0x00; 60]);
	let_assert!(Err(e) = Session::with_serial_port(host_port, "mock", test_config()));
	assert!(let Error::Protocol(_) = e);
	device_t.join().unwrap();
}

#[test]
fn test_handshake_timeout() {
	let host_port = MockSerialPort::new(57600);
	let config = test_config().with_timeout(Duration::from_millis(50));
	let_assert!(Err(e) = Session::with_serial_port(host_port, "mock", config));
	assert!(let Error::Transport(TransportError::Timeout) = e);
	assert!(e.status() == mboot::error::STATUS_TRANSPORT_ERROR);
}

#[test]
fn test_fault_isolation() {
	let host_port = MockSerialPort::new(57600);
	let observer = host_port.clone();
	let device_t = answer_one_ping(host_port.device_port(), Vec::new());
	let config = test_config().with_timeout(Duration::from_millis(100));
	let_assert!(Ok(mut session) = Session::with_serial_port(host_port, "mock", config));
	device_t.join().unwrap();

	// Nobody answers the command anymore.
	let_assert!(Err(e) = session.get_property(property_tag::CURRENT_VERSION, 0));
	assert!(let Error::Transport(TransportError::Timeout) = e);
	assert!(session.state() == SessionState::Faulted);

	let written = observer.pending_output();
	assert!(written > 0);

	let_assert!(Err(e) = session.get_property(property_tag::CURRENT_VERSION, 0));
	assert!(let Error::Transport(TransportError::Faulted) = e);
	let_assert!(Err(e) = session.flash_erase_all(0));
	assert!(let Error::Transport(TransportError::Faulted) = e);
	let_assert!(Err(e) = session.read_memory(0, 4, 0));
	assert!(let Error::Transport(TransportError::Faulted) = e);
	assert!(observer.pending_output() == written);

	session.close();
	assert!(session.state() == SessionState::Closed);
	let_assert!(Err(e) = session.reset());
	assert!(let Error::Transport(TransportError::Closed) = e);
}

#[test]
fn test_parallel_sessions() {
	let threads: Vec<_> = (0..2u8)
		.map(|i| {
			std::thread::spawn(move || {
				run_mock(|session| {
					let data = [i, i + 1, i + 2, i + 3];
					let address = 0x100 * u32::from(i);
					assert!(let Ok(_) = session.write_memory(address, 0, &data, data.len()));
					let_assert!(Ok(response) = session.read_memory(address, data.len(), 0));
					assert!(response.data[..] == data);
				});
			})
		})
		.collect();
	for thread in threads {
		thread.join().unwrap();
	}
}
