pub fn write_u16_le(buffer: &mut [u8], value: u16) {
	buffer[..2].copy_from_slice(&value.to_le_bytes());
}

pub fn write_u32_le(buffer: &mut [u8], value: u32) {
	buffer[..4].copy_from_slice(&value.to_le_bytes());
}

pub fn read_u16_le(buffer: &[u8]) -> u16 {
	u16::from_le_bytes([buffer[0], buffer[1]])
}

pub fn read_u32_le(buffer: &[u8]) -> u32 {
	u32::from_le_bytes([buffer[0], buffer[1], buffer[2], buffer[3]])
}

pub fn read_u32_be(buffer: &[u8]) -> u32 {
	u32::from_be_bytes([buffer[0], buffer[1], buffer[2], buffer[3]])
}

#[cfg(test)]
mod test {
	use super::*;
	use assert2::assert;

	#[test]
	fn test_little_endian_words() {
		let mut buffer = [0u8; 4];
		write_u32_le(&mut buffer, 0x12345678);
		assert!(buffer == [0x78, 0x56, 0x34, 0x12]);
		assert!(read_u32_le(&buffer) == 0x12345678);
		assert!(read_u16_le(&buffer) == 0x5678);
		assert!(read_u32_be(&buffer) == 0x78563412);

		write_u16_le(&mut buffer[2..], 0xABCD);
		assert!(buffer == [0x78, 0x56, 0xCD, 0xAB]);
	}
}
