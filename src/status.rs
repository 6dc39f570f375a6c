/// Status word reported by the bootloader in every response.
///
/// Zero means success, any other value is a failure code.
/// Unknown codes are preserved as-is.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct StatusCode(pub u32);

impl StatusCode {
	pub const SUCCESS: Self = Self(0);
	pub const FAIL: Self = Self(1);
	pub const READ_ONLY: Self = Self(2);
	pub const OUT_OF_RANGE: Self = Self(3);
	pub const INVALID_ARGUMENT: Self = Self(4);
	pub const TIMEOUT: Self = Self(5);
	pub const NO_TRANSFER_IN_PROGRESS: Self = Self(6);

	pub const FLASH_SIZE_ERROR: Self = Self(100);
	pub const FLASH_ALIGNMENT_ERROR: Self = Self(101);
	pub const FLASH_ADDRESS_ERROR: Self = Self(102);
	pub const FLASH_ACCESS_ERROR: Self = Self(103);
	pub const FLASH_PROTECTION_VIOLATION: Self = Self(104);
	pub const FLASH_COMMAND_FAILURE: Self = Self(105);

	pub const UNKNOWN_COMMAND: Self = Self(10000);
	pub const SECURITY_VIOLATION: Self = Self(10001);
	pub const ABORT_DATA_PHASE: Self = Self(10002);
	pub const PING_ERROR: Self = Self(10003);
	pub const NO_RESPONSE: Self = Self(10004);
	pub const NO_RESPONSE_EXPECTED: Self = Self(10005);
	pub const UNSUPPORTED_COMMAND: Self = Self(10006);

	pub const MEMORY_RANGE_INVALID: Self = Self(10200);
	pub const MEMORY_READ_FAILED: Self = Self(10201);
	pub const MEMORY_WRITE_FAILED: Self = Self(10202);
	pub const MEMORY_CUMULATIVE_WRITE: Self = Self(10203);
	pub const MEMORY_APP_OVERLAP_WITH_EXECUTE_ONLY_REGION: Self = Self(10204);
	pub const MEMORY_NOT_CONFIGURED: Self = Self(10205);
	pub const MEMORY_ALIGNMENT_ERROR: Self = Self(10206);
	pub const MEMORY_VERIFY_FAILED: Self = Self(10207);
	pub const MEMORY_WRITE_PROTECTED: Self = Self(10208);
	pub const MEMORY_ADDRESS_ERROR: Self = Self(10209);
	pub const MEMORY_BLANK_CHECK_FAILED: Self = Self(10210);
	pub const MEMORY_BLANK_PAGE_READ_DISALLOWED: Self = Self(10211);
	pub const MEMORY_PROTECTED_PAGE_READ_DISALLOWED: Self = Self(10212);
	pub const MEMORY_UNSUPPORTED_COMMAND: Self = Self(10214);

	pub const UNKNOWN_PROPERTY: Self = Self(10300);
	pub const READ_ONLY_PROPERTY: Self = Self(10301);
	pub const INVALID_PROPERTY_VALUE: Self = Self(10302);

	/// Reported by [`crate::Session::flash_program_once()`] when the value did not read back.
	///
	/// The bootloader never sends this code itself.
	pub const OTP_VERIFY_FAIL: Self = Self(52009);

	/// Check if the status indicates success.
	pub fn is_success(self) -> bool {
		self == Self::SUCCESS
	}

	/// Get the status as a signed integer.
	///
	/// Device status codes are non-negative, negative values are reserved for host side errors.
	/// Codes above [`i32::MAX`] are saturated.
	pub fn as_i32(self) -> i32 {
		i32::try_from(self.0).unwrap_or(i32::MAX)
	}

	/// Get the name of a known status code.
	pub fn name(self) -> Option<&'static str> {
		let name = match self {
			Self::SUCCESS => "Success",
			Self::FAIL => "Fail",
			Self::READ_ONLY => "ReadOnly",
			Self::OUT_OF_RANGE => "OutOfRange",
			Self::INVALID_ARGUMENT => "InvalidArgument",
			Self::TIMEOUT => "Timeout",
			Self::NO_TRANSFER_IN_PROGRESS => "NoTransferInProgress",
			Self::FLASH_SIZE_ERROR => "FlashSizeError",
			Self::FLASH_ALIGNMENT_ERROR => "FlashAlignmentError",
			Self::FLASH_ADDRESS_ERROR => "FlashAddressError",
			Self::FLASH_ACCESS_ERROR => "FlashAccessError",
			Self::FLASH_PROTECTION_VIOLATION => "FlashProtectionViolation",
			Self::FLASH_COMMAND_FAILURE => "FlashCommandFailure",
			Self::UNKNOWN_COMMAND => "UnknownCommand",
			Self::SECURITY_VIOLATION => "SecurityViolation",
			Self::ABORT_DATA_PHASE => "AbortDataPhase",
			Self::PING_ERROR => "PingError",
			Self::NO_RESPONSE => "NoResponse",
			Self::NO_RESPONSE_EXPECTED => "NoResponseExpected",
			Self::UNSUPPORTED_COMMAND => "UnsupportedCommand",
			Self::MEMORY_RANGE_INVALID => "MemoryRangeInvalid",
			Self::MEMORY_READ_FAILED => "MemoryReadFailed",
			Self::MEMORY_WRITE_FAILED => "MemoryWriteFailed",
			Self::MEMORY_CUMULATIVE_WRITE => "MemoryCumulativeWrite",
			Self::MEMORY_APP_OVERLAP_WITH_EXECUTE_ONLY_REGION => "MemoryAppOverlapWithExecuteOnlyRegion",
			Self::MEMORY_NOT_CONFIGURED => "MemoryNotConfigured",
			Self::MEMORY_ALIGNMENT_ERROR => "MemoryAlignmentError",
			Self::MEMORY_VERIFY_FAILED => "MemoryVerifyFailed",
			Self::MEMORY_WRITE_PROTECTED => "MemoryWriteProtected",
			Self::MEMORY_ADDRESS_ERROR => "MemoryAddressError",
			Self::MEMORY_BLANK_CHECK_FAILED => "MemoryBlankCheckFailed",
			Self::MEMORY_BLANK_PAGE_READ_DISALLOWED => "MemoryBlankPageReadDisallowed",
			Self::MEMORY_PROTECTED_PAGE_READ_DISALLOWED => "MemoryProtectedPageReadDisallowed",
			Self::MEMORY_UNSUPPORTED_COMMAND => "MemoryUnsupportedCommand",
			Self::UNKNOWN_PROPERTY => "UnknownProperty",
			Self::READ_ONLY_PROPERTY => "ReadOnlyProperty",
			Self::INVALID_PROPERTY_VALUE => "InvalidPropertyValue",
			Self::OTP_VERIFY_FAIL => "OtpVerifyFail",
			_ => return None,
		};
		Some(name)
	}
}

impl From<u32> for StatusCode {
	fn from(other: u32) -> Self {
		Self(other)
	}
}

impl From<StatusCode> for u32 {
	fn from(other: StatusCode) -> Self {
		other.0
	}
}

impl std::fmt::Display for StatusCode {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		match self.name() {
			Some(name) => write!(f, "{} ({})", self.0, name),
			None => write!(f, "{} (unknown)", self.0),
		}
	}
}
