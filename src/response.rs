use crate::StatusCode;

/// A successful response from the bootloader.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Response<T> {
	/// The status reported by the device.
	///
	/// Failed commands are reported as [`crate::DeviceError`] instead, so this is normally [`StatusCode::SUCCESS`].
	pub status: StatusCode,

	/// The data from the response.
	pub data: T,
}

/// An owned payload of a response.
///
/// The buffer is allocated with exactly the number of elements received and can not be resized.
/// It is released when dropped, or explicitly with [`free_response_words()`] or [`free_read_memory_response()`].
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct ResponseBuffer<T> {
	data: Box<[T]>,
}

impl<T> ResponseBuffer<T> {
	/// The number of elements in the buffer.
	pub fn len(&self) -> usize {
		self.data.len()
	}

	pub fn is_empty(&self) -> bool {
		self.data.is_empty()
	}

	/// Get an element, or `None` if the index is out of bounds.
	pub fn get(&self, index: usize) -> Option<&T> {
		self.data.get(index)
	}

	pub fn as_slice(&self) -> &[T] {
		&self.data
	}

	/// Take the underlying allocation.
	pub fn into_boxed_slice(self) -> Box<[T]> {
		self.data
	}
}

impl<T> From<Vec<T>> for ResponseBuffer<T> {
	fn from(other: Vec<T>) -> Self {
		Self {
			data: other.into_boxed_slice(),
		}
	}
}

impl<T> core::ops::Deref for ResponseBuffer<T> {
	type Target = [T];

	fn deref(&self) -> &Self::Target {
		&self.data
	}
}

impl<T> AsRef<[T]> for ResponseBuffer<T> {
	fn as_ref(&self) -> &[T] {
		&self.data
	}
}

impl<'a, T> IntoIterator for &'a ResponseBuffer<T> {
	type Item = &'a T;
	type IntoIter = core::slice::Iter<'a, T>;

	fn into_iter(self) -> Self::IntoIter {
		self.data.iter()
	}
}

/// Release the words of a [`get_property`](crate::Session::get_property) response.
///
/// The response is consumed, so it can not be released twice:
///
/// ```compile_fail
/// # fn release(response: mboot::Response<mboot::ResponseBuffer<u32>>) {
/// mboot::free_response_words(response);
/// mboot::free_response_words(response);
/// # }
/// ```
pub fn free_response_words(response: Response<ResponseBuffer<u32>>) {
	drop(response);
}

/// Release the bytes of a [`read_memory`](crate::Session::read_memory) response.
///
/// The response is consumed, so it can not be used after it has been released:
///
/// ```compile_fail
/// # fn release(response: mboot::Response<mboot::ResponseBuffer<u8>>) {
/// mboot::free_read_memory_response(response);
/// let first = response.data.get(0);
/// # }
/// ```
pub fn free_read_memory_response(response: Response<ResponseBuffer<u8>>) {
	drop(response);
}

#[cfg(test)]
mod test {
	use super::*;
	use assert2::assert;

	#[test]
	fn test_bounds_checked_access() {
		let buffer = ResponseBuffer::from(vec![0x12u8, 0x34, 0x56]);
		assert!(buffer.len() == 3);
		assert!(buffer.get(2) == Some(&0x56));
		assert!(buffer.get(3) == None);
		assert!(buffer[..] == [0x12, 0x34, 0x56]);

		let response = Response {
			status: StatusCode::SUCCESS,
			data: buffer,
		};
		free_read_memory_response(response);
	}

	#[test]
	fn test_empty_buffer() {
		let buffer = ResponseBuffer::<u32>::from(Vec::new());
		assert!(buffer.is_empty());
		assert!(buffer.get(0) == None);
		free_response_words(Response {
			status: StatusCode::SUCCESS,
			data: buffer,
		});
	}
}
