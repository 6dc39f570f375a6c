use log::{debug, trace};
use mboot::packet::{CommandPacket, CommandResponse};
use mboot::{command_tag, memory_id, property_tag, response_tag, Error, StatusCode, Target, TransportError};
use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering::Relaxed;
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use super::MockSerialPort;

pub const FLASH_SIZE: usize = 0x1000;
pub const VERSION: u32 = 0x5601_0203;
pub const MAX_PACKET_SIZE: u32 = 32;
pub const OTP_WORDS: usize = 16;

/// Program once index that ignores writes but still reports success.
pub const LOCKED_OTP_INDEX: u32 = 0x0F;

/// A simulated bootloader with a single block of flash starting at address zero.
pub struct MockBootloader {
	target: Target<MockSerialPort>,
	flash: Vec<u8>,
	max_packet_size: Option<u32>,
	short_read: bool,
	blank_page_reads: bool,
	otp: [u32; OTP_WORDS],
	configured_memories: Vec<u32>,
}

impl MockBootloader {
	pub fn new(serial_port: MockSerialPort) -> Self {
		Self {
			target: Target::new(serial_port, Duration::from_millis(200)),
			flash: vec![0xFF; FLASH_SIZE],
			max_packet_size: Some(MAX_PACKET_SIZE),
			short_read: false,
			blank_page_reads: false,
			otp: [0; OTP_WORDS],
			configured_memories: Vec::new(),
		}
	}

	/// Report no maximum packet size, like older bootloaders.
	pub fn without_max_packet_size(self) -> Self {
		Self {
			max_packet_size: None,
			..self
		}
	}

	/// Send one byte less than requested for every memory read.
	pub fn with_short_reads(self) -> Self {
		Self { short_read: true, ..self }
	}

	/// Report reads of fully erased memory with the blank page status.
	pub fn with_blank_page_reads(self) -> Self {
		Self {
			blank_page_reads: true,
			..self
		}
	}

	pub fn run(mut self, kill: Arc<AtomicBool>) -> JoinHandle<()> {
		std::thread::spawn(move || {
			while !kill.load(Relaxed) {
				let command = match self.target.read_command() {
					Ok(command) => command,
					Err(Error::Transport(TransportError::Timeout)) => continue,
					Err(e) => {
						debug!("bootloader failed to read command: {}", e);
						continue;
					},
				};
				trace!("bootloader received {:02X?}", command);
				if let Err(e) = self.handle(&command) {
					debug!("bootloader failed to handle command {:#04X}: {}", command.tag, e);
				}
			}
		})
	}

	fn range(&self, command: &CommandPacket) -> Result<std::ops::Range<usize>, StatusCode> {
		let start = command.parameter(0) as usize;
		let end = start.checked_add(command.parameter(1) as usize).ok_or(StatusCode::MEMORY_RANGE_INVALID)?;
		if end > self.flash.len() {
			return Err(StatusCode::MEMORY_RANGE_INVALID);
		}
		Ok(start..end)
	}

	fn handle(&mut self, command: &CommandPacket) -> Result<(), Error<std::io::Error>> {
		match command.tag {
			command_tag::GET_PROPERTY => {
				let values = match command.parameter(0) {
					property_tag::CURRENT_VERSION => Some(vec![VERSION]),
					property_tag::FLASH_START_ADDRESS => Some(vec![0]),
					property_tag::FLASH_SIZE => Some(vec![FLASH_SIZE as u32]),
					property_tag::MAX_PACKET_SIZE => self.max_packet_size.map(|size| vec![size]),
					_ => None,
				};
				let (status, parameters) = match values {
					Some(values) => (StatusCode::SUCCESS, values),
					None => (StatusCode::UNKNOWN_PROPERTY, Vec::new()),
				};
				self.target.send_response(&CommandResponse {
					tag: response_tag::GET_PROPERTY,
					flags: 0,
					status,
					parameters,
				})
			},
			command_tag::SET_PROPERTY => {
				let status = match command.parameter(0) {
					property_tag::VERIFY_WRITES => StatusCode::SUCCESS,
					_ => StatusCode::READ_ONLY_PROPERTY,
				};
				self.target.send_generic_response(command.tag, status)
			},
			command_tag::FLASH_ERASE_ALL => {
				let memory = command.parameter(0);
				let status = if memory == memory_id::INTERNAL {
					self.flash.fill(0xFF);
					StatusCode::SUCCESS
				} else if self.configured_memories.contains(&memory) {
					StatusCode::SUCCESS
				} else {
					StatusCode::MEMORY_NOT_CONFIGURED
				};
				self.target.send_generic_response(command.tag, status)
			},
			command_tag::FLASH_ERASE_ALL_UNSECURE => {
				self.flash.fill(0xFF);
				self.target.send_generic_response(command.tag, StatusCode::SUCCESS)
			},
			command_tag::FLASH_ERASE_REGION => {
				let status = match self.range(command) {
					Ok(range) => {
						self.flash[range].fill(0xFF);
						StatusCode::SUCCESS
					},
					Err(status) => status,
				};
				self.target.send_generic_response(command.tag, status)
			},
			command_tag::FILL_MEMORY => {
				let status = match self.range(command) {
					Ok(range) => {
						let pattern = command.parameter(2).to_le_bytes();
						for (byte, value) in self.flash[range].iter_mut().zip(pattern.iter().cycle()) {
							*byte = *value;
						}
						StatusCode::SUCCESS
					},
					Err(status) => status,
				};
				self.target.send_generic_response(command.tag, status)
			},
			command_tag::WRITE_MEMORY => {
				let range = match self.range(command) {
					Ok(range) => range,
					Err(status) => return self.target.send_generic_response(command.tag, status),
				};
				self.target.send_generic_response(command.tag, StatusCode::SUCCESS)?;
				let data = self.target.read_data_phase(range.len())?;
				self.flash[range].copy_from_slice(&data);
				self.target.send_generic_response(command.tag, StatusCode::SUCCESS)
			},
			command_tag::READ_MEMORY => {
				let range = match self.range(command) {
					Ok(range) => range,
					Err(status) => {
						return self.target.send_response(&CommandResponse {
							tag: response_tag::READ_MEMORY,
							flags: 0,
							status,
							parameters: vec![0],
						})
					},
				};
				let mut data = self.flash[range].to_vec();
				let status = if self.blank_page_reads && data.iter().all(|&byte| byte == 0xFF) {
					StatusCode::MEMORY_BLANK_PAGE_READ_DISALLOWED
				} else {
					StatusCode::SUCCESS
				};
				self.target.send_response(&CommandResponse {
					tag: response_tag::READ_MEMORY,
					flags: 0x01,
					status,
					parameters: vec![data.len() as u32],
				})?;
				if self.short_read {
					data.pop();
				}
				let packet_size = self.max_packet_size.unwrap_or(32) as usize;
				self.target.send_data_phase(&data, packet_size)?;
				self.target.send_generic_response(command.tag, StatusCode::SUCCESS)
			},
			command_tag::CONFIGURE_MEMORY => {
				let status = if command.parameter(0) != memory_id::SPI_NOR_EEPROM {
					StatusCode::MEMORY_NOT_CONFIGURED
				} else if command.parameter(1) as usize >= self.flash.len() {
					StatusCode::MEMORY_RANGE_INVALID
				} else {
					self.configured_memories.push(command.parameter(0));
					StatusCode::SUCCESS
				};
				self.target.send_generic_response(command.tag, status)
			},
			command_tag::FLASH_READ_ONCE => {
				let index = command.parameter(0) as usize;
				let count = command.parameter(1);
				let words = (count as usize + 3) / 4;
				let (status, parameters) = if count != 4 && count != 8 {
					(StatusCode::INVALID_ARGUMENT, vec![0])
				} else if index + words > OTP_WORDS {
					(StatusCode::OUT_OF_RANGE, vec![0])
				} else {
					let mut parameters = vec![count];
					parameters.extend_from_slice(&self.otp[index..index + words]);
					(StatusCode::SUCCESS, parameters)
				};
				self.target.send_response(&CommandResponse {
					tag: response_tag::FLASH_READ_ONCE,
					flags: 0,
					status,
					parameters,
				})
			},
			command_tag::FLASH_PROGRAM_ONCE => {
				let index = command.parameter(0);
				let status = if command.parameter(1) != 4 {
					StatusCode::INVALID_ARGUMENT
				} else if index as usize >= OTP_WORDS {
					StatusCode::OUT_OF_RANGE
				} else {
					if index != LOCKED_OTP_INDEX {
						self.otp[index as usize] |= command.parameter(2);
					}
					StatusCode::SUCCESS
				};
				self.target.send_generic_response(command.tag, status)
			},
			command_tag::RESET | command_tag::EXECUTE | command_tag::CALL => {
				self.target.send_generic_response(command.tag, StatusCode::SUCCESS)
			},
			_ => self.target.send_generic_response(command.tag, StatusCode::UNKNOWN_COMMAND),
		}
	}
}
