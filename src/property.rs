//! Bootloader property tags and helpers to interpret property values.

/// Well-known property tags for [`crate::Session::get_property`].
///
/// Property tags are opaque `u32` values, the device decides which ones it supports.
pub mod property_tag {
	pub const CURRENT_VERSION: u32 = 0x01;
	pub const AVAILABLE_PERIPHERALS: u32 = 0x02;
	pub const FLASH_START_ADDRESS: u32 = 0x03;
	pub const FLASH_SIZE: u32 = 0x04;
	pub const FLASH_SECTOR_SIZE: u32 = 0x05;
	pub const FLASH_BLOCK_COUNT: u32 = 0x06;
	pub const AVAILABLE_COMMANDS: u32 = 0x07;
	pub const VERIFY_WRITES: u32 = 0x0A;
	pub const MAX_PACKET_SIZE: u32 = 0x0B;
	pub const RESERVED_REGIONS: u32 = 0x0C;
	pub const RAM_START_ADDRESS: u32 = 0x0E;
	pub const RAM_SIZE: u32 = 0x0F;
	pub const SYSTEM_DEVICE_ID: u32 = 0x10;
	pub const FLASH_SECURITY_STATE: u32 = 0x11;
	pub const UNIQUE_DEVICE_ID: u32 = 0x12;
	pub const TARGET_VERSION: u32 = 0x18;
}

/// Well-known memory identifiers.
///
/// Zero selects the internal memory map, other values select external memories.
pub mod memory_id {
	pub const INTERNAL: u32 = 0x000;
	pub const QUAD_SPI0: u32 = 0x001;
	pub const SEMC_NOR: u32 = 0x008;
	pub const FLEX_SPI_NOR: u32 = 0x009;
	pub const SPIFI_NOR: u32 = 0x00A;
	pub const FLASH_EXEC_ONLY: u32 = 0x010;
	pub const SEMC_NAND: u32 = 0x100;
	pub const SPI_NAND: u32 = 0x101;
	pub const SPI_NOR_EEPROM: u32 = 0x110;
	pub const I2C_NOR_EEPROM: u32 = 0x111;
	pub const SD_CARD: u32 = 0x120;
	pub const MMC_CARD: u32 = 0x121;
}

/// A version word as reported by the bootloader.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Version {
	/// Identification character, `'\0'` if the device did not set one.
	pub mark: char,
	pub major: u8,
	pub minor: u8,
	pub fixation: u8,
}

impl Version {
	/// Decode a version from a property word.
	///
	/// The bytes of the word are, from most to least significant: mark, major, minor and fixation.
	pub fn from_word(word: u32) -> Self {
		let [mark, major, minor, fixation] = word.to_be_bytes();
		Self {
			mark: char::from(mark),
			major,
			minor,
			fixation,
		}
	}

	/// Encode the version back into a property word.
	pub fn to_word(self) -> u32 {
		let mark = u8::try_from(self.mark).unwrap_or(0);
		u32::from_be_bytes([mark, self.major, self.minor, self.fixation])
	}
}

impl std::fmt::Display for Version {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		if self.mark.is_ascii_graphic() {
			write!(f, "{}", self.mark)?;
		}
		write!(f, "{}.{}.{}", self.major, self.minor, self.fixation)
	}
}

#[cfg(test)]
mod test {
	use super::*;
	use assert2::assert;

	#[test]
	fn test_version_from_word() {
		let version = Version::from_word(0x56010203);
		assert!(version.mark == 'V');
		assert!(version.major == 1);
		assert!(version.minor == 2);
		assert!(version.fixation == 3);
		assert!(version.to_string() == "V1.2.3");
		assert!(version.to_word() == 0x56010203);
	}

	#[test]
	fn test_version_without_mark() {
		let version = Version::from_word(0x00020100);
		assert!(version.mark == '\0');
		assert!(version.to_string() == "2.1.0");
	}
}
