use crate::StatusCode;

/// Status value reported for transport failures.
pub const STATUS_TRANSPORT_ERROR: i32 = -3;

/// Status value reported for protocol failures.
pub const STATUS_PROTOCOL_ERROR: i32 = -4;

/// Status value reported for invalid caller supplied arguments.
pub const STATUS_RESOURCE_ERROR: i32 = -5;

/// Status value reported when the session no longer accepts commands.
pub const STATUS_SESSION_UNUSABLE: i32 = -6;

/// An error that can occur while executing a command.
///
/// The `E` parameter is the error type of the underlying [`crate::SerialPort`].
#[derive(Debug)]
pub enum Error<E> {
	/// The transport could not be opened, timed out or failed.
	Transport(TransportError<E>),

	/// The exchanged frames were corrupt or did not follow the protocol.
	Protocol(ProtocolError),

	/// The device answered with a failure status.
	Device(DeviceError),

	/// The caller supplied inconsistent arguments. Nothing was transmitted.
	Resource(ResourceError),
}

/// An error of the byte transport.
#[derive(Debug)]
pub enum TransportError<E> {
	/// The serial port reported an error.
	Io(E),

	/// The device did not send the expected bytes before the deadline.
	Timeout,

	/// An earlier transport or protocol failure left the session unusable.
	///
	/// Recreate the session to continue.
	Faulted,

	/// The transport has been closed.
	Closed,
}

/// The received data violates the framing or the command protocol.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum ProtocolError {
	/// The frame failed its start byte or integrity check.
	MalformedFrame(MalformedFrame),

	/// A declared length does not match the data that was actually received.
	LengthMismatch(LengthMismatch),

	/// A different kind of packet was received than expected.
	UnexpectedPacket(UnexpectedPacket),

	/// The response does not belong to the command that was sent.
	UnexpectedResponse(UnexpectedResponse),

	/// The other side rejected the last frame.
	Nack,

	/// The other side aborted the data phase.
	Aborted,
}

/// The frame could not be parsed.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum MalformedFrame {
	InvalidStartByte(InvalidStartByte),
	InvalidFrameType(InvalidFrameType),
	InvalidChecksum(InvalidChecksum),
	TruncatedPayload(TruncatedPayload),
}

/// The frame does not start with the synchronization byte.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct InvalidStartByte {
	pub actual: u8,
}

/// The frame type byte is not a known frame type.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct InvalidFrameType {
	pub actual: u8,
}

/// The frame has an invalid checksum value.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct InvalidChecksum {
	pub message: u16,
	pub computed: u16,
}

/// The payload is too short to hold the fixed fields.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct TruncatedPayload {
	pub actual: usize,
	pub minimum: usize,
}

/// A declared length differs from the actual length.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct LengthMismatch {
	pub declared: usize,
	pub actual: usize,
}

/// An unexpected packet type was received.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct UnexpectedPacket {
	pub actual: u8,
	pub expected: u8,
}

/// A response tag or echoed command tag does not match the command.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct UnexpectedResponse {
	pub actual: u8,
	pub expected: u8,
}

/// The device reported a failure status.
///
/// The raw status word is preserved in `status`.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct DeviceError {
	/// The command that failed.
	pub command: u8,

	/// The status reported by the device.
	pub status: StatusCode,
}

/// The caller supplied arguments that can not be sent.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum ResourceError {
	/// The length argument does not match the number of supplied bytes.
	LengthMismatch { declared: usize, supplied: usize },

	/// The length does not fit in a command parameter.
	TooLarge { length: usize },
}

impl InvalidStartByte {
	pub fn check(actual: u8, expected: u8) -> Result<(), Self> {
		if actual == expected {
			Ok(())
		} else {
			Err(Self { actual })
		}
	}
}

impl InvalidChecksum {
	pub fn check(message: u16, computed: u16) -> Result<(), Self> {
		if message == computed {
			Ok(())
		} else {
			Err(Self { message, computed })
		}
	}
}

impl TruncatedPayload {
	pub fn check(actual: usize, minimum: usize) -> Result<(), Self> {
		if actual >= minimum {
			Ok(())
		} else {
			Err(Self { actual, minimum })
		}
	}
}

impl LengthMismatch {
	pub fn check(declared: usize, actual: usize) -> Result<(), Self> {
		if declared == actual {
			Ok(())
		} else {
			Err(Self { declared, actual })
		}
	}
}

impl UnexpectedPacket {
	pub fn check(actual: u8, expected: u8) -> Result<(), Self> {
		if actual == expected {
			Ok(())
		} else {
			Err(Self { actual, expected })
		}
	}
}

impl UnexpectedResponse {
	pub fn check(actual: u8, expected: u8) -> Result<(), Self> {
		if actual == expected {
			Ok(())
		} else {
			Err(Self { actual, expected })
		}
	}
}

impl DeviceError {
	pub fn check(command: u8, status: StatusCode) -> Result<(), Self> {
		if status.is_success() {
			Ok(())
		} else {
			Err(Self { command, status })
		}
	}
}

impl ResourceError {
	pub fn check_length(declared: usize, supplied: usize) -> Result<(), Self> {
		if declared == supplied {
			Ok(())
		} else {
			Err(Self::LengthMismatch { declared, supplied })
		}
	}

	pub fn check_fits_u32(length: usize) -> Result<u32, Self> {
		u32::try_from(length).map_err(|_| Self::TooLarge { length })
	}
}

impl<E> Error<E> {
	/// Get the negative status value that represents this error.
	///
	/// Device failures report the negated device status, so the device code can still be recovered.
	pub fn status(&self) -> i32 {
		match self {
			Self::Transport(TransportError::Faulted | TransportError::Closed) => STATUS_SESSION_UNUSABLE,
			Self::Transport(_) => STATUS_TRANSPORT_ERROR,
			Self::Protocol(_) => STATUS_PROTOCOL_ERROR,
			Self::Resource(_) => STATUS_RESOURCE_ERROR,
			Self::Device(e) => e.status.as_i32().checked_neg().unwrap_or(i32::MIN),
		}
	}

	/// Check if this error leaves the session in the faulted state.
	pub(crate) fn faults_session(&self) -> bool {
		match self {
			Self::Transport(TransportError::Faulted | TransportError::Closed) => false,
			Self::Transport(_) | Self::Protocol(_) => true,
			Self::Device(_) | Self::Resource(_) => false,
		}
	}
}

impl<E> TransportError<E> {
	/// Map a serial port error, turning timeouts into [`TransportError::Timeout`].
	pub(crate) fn from_serial<P>(error: E) -> Self
	where
		P: crate::SerialPort<Error = E>,
	{
		if P::is_timeout_error(&error) {
			Self::Timeout
		} else {
			Self::Io(error)
		}
	}
}

impl<E> std::error::Error for Error<E> where E: std::fmt::Debug + std::fmt::Display {}
impl<E> std::error::Error for TransportError<E> where E: std::fmt::Debug + std::fmt::Display {}
impl std::error::Error for ProtocolError {}
impl std::error::Error for MalformedFrame {}
impl std::error::Error for InvalidStartByte {}
impl std::error::Error for InvalidFrameType {}
impl std::error::Error for InvalidChecksum {}
impl std::error::Error for TruncatedPayload {}
impl std::error::Error for LengthMismatch {}
impl std::error::Error for UnexpectedPacket {}
impl std::error::Error for UnexpectedResponse {}
impl std::error::Error for DeviceError {}
impl std::error::Error for ResourceError {}

impl<E> From<TransportError<E>> for Error<E> {
	fn from(other: TransportError<E>) -> Self {
		Self::Transport(other)
	}
}

impl<E> From<ProtocolError> for Error<E> {
	fn from(other: ProtocolError) -> Self {
		Self::Protocol(other)
	}
}

impl<E> From<DeviceError> for Error<E> {
	fn from(other: DeviceError) -> Self {
		Self::Device(other)
	}
}

impl<E> From<ResourceError> for Error<E> {
	fn from(other: ResourceError) -> Self {
		Self::Resource(other)
	}
}

impl<E> From<MalformedFrame> for Error<E> {
	fn from(other: MalformedFrame) -> Self {
		Self::Protocol(other.into())
	}
}

impl<E> From<InvalidStartByte> for Error<E> {
	fn from(other: InvalidStartByte) -> Self {
		Self::Protocol(other.into())
	}
}

impl<E> From<InvalidFrameType> for Error<E> {
	fn from(other: InvalidFrameType) -> Self {
		Self::Protocol(other.into())
	}
}

impl<E> From<TruncatedPayload> for Error<E> {
	fn from(other: TruncatedPayload) -> Self {
		Self::Protocol(other.into())
	}
}

impl<E> From<InvalidChecksum> for Error<E> {
	fn from(other: InvalidChecksum) -> Self {
		Self::Protocol(other.into())
	}
}

impl<E> From<LengthMismatch> for Error<E> {
	fn from(other: LengthMismatch) -> Self {
		Self::Protocol(other.into())
	}
}

impl<E> From<UnexpectedPacket> for Error<E> {
	fn from(other: UnexpectedPacket) -> Self {
		Self::Protocol(other.into())
	}
}

impl<E> From<UnexpectedResponse> for Error<E> {
	fn from(other: UnexpectedResponse) -> Self {
		Self::Protocol(other.into())
	}
}

impl From<MalformedFrame> for ProtocolError {
	fn from(other: MalformedFrame) -> Self {
		Self::MalformedFrame(other)
	}
}

impl From<InvalidStartByte> for ProtocolError {
	fn from(other: InvalidStartByte) -> Self {
		Self::MalformedFrame(other.into())
	}
}

impl From<InvalidFrameType> for ProtocolError {
	fn from(other: InvalidFrameType) -> Self {
		Self::MalformedFrame(other.into())
	}
}

impl From<InvalidChecksum> for ProtocolError {
	fn from(other: InvalidChecksum) -> Self {
		Self::MalformedFrame(other.into())
	}
}

impl From<TruncatedPayload> for ProtocolError {
	fn from(other: TruncatedPayload) -> Self {
		Self::MalformedFrame(other.into())
	}
}

impl From<LengthMismatch> for ProtocolError {
	fn from(other: LengthMismatch) -> Self {
		Self::LengthMismatch(other)
	}
}

impl From<UnexpectedPacket> for ProtocolError {
	fn from(other: UnexpectedPacket) -> Self {
		Self::UnexpectedPacket(other)
	}
}

impl From<UnexpectedResponse> for ProtocolError {
	fn from(other: UnexpectedResponse) -> Self {
		Self::UnexpectedResponse(other)
	}
}

impl From<InvalidStartByte> for MalformedFrame {
	fn from(other: InvalidStartByte) -> Self {
		Self::InvalidStartByte(other)
	}
}

impl From<InvalidFrameType> for MalformedFrame {
	fn from(other: InvalidFrameType) -> Self {
		Self::InvalidFrameType(other)
	}
}

impl From<InvalidChecksum> for MalformedFrame {
	fn from(other: InvalidChecksum) -> Self {
		Self::InvalidChecksum(other)
	}
}

impl From<TruncatedPayload> for MalformedFrame {
	fn from(other: TruncatedPayload) -> Self {
		Self::TruncatedPayload(other)
	}
}

impl<E> std::fmt::Display for Error<E>
where
	E: std::fmt::Display,
{
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		match self {
			Self::Transport(e) => write!(f, "{}", e),
			Self::Protocol(e) => write!(f, "{}", e),
			Self::Device(e) => write!(f, "{}", e),
			Self::Resource(e) => write!(f, "{}", e),
		}
	}
}

impl<E> std::fmt::Display for TransportError<E>
where
	E: std::fmt::Display,
{
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		match self {
			Self::Io(e) => write!(f, "serial port error: {}", e),
			Self::Timeout => write!(f, "timeout while waiting for the device"),
			Self::Faulted => write!(f, "session is faulted after an earlier communication failure"),
			Self::Closed => write!(f, "transport is closed"),
		}
	}
}

impl std::fmt::Display for ProtocolError {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		match self {
			Self::MalformedFrame(e) => write!(f, "{}", e),
			Self::LengthMismatch(e) => write!(f, "{}", e),
			Self::UnexpectedPacket(e) => write!(f, "{}", e),
			Self::UnexpectedResponse(e) => write!(f, "{}", e),
			Self::Nack => write!(f, "frame was rejected with a NACK"),
			Self::Aborted => write!(f, "data phase was aborted"),
		}
	}
}

impl std::fmt::Display for MalformedFrame {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		match self {
			Self::InvalidStartByte(e) => write!(f, "{}", e),
			Self::InvalidFrameType(e) => write!(f, "{}", e),
			Self::InvalidChecksum(e) => write!(f, "{}", e),
			Self::TruncatedPayload(e) => write!(f, "{}", e),
		}
	}
}

impl std::fmt::Display for InvalidStartByte {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		write!(f, "invalid frame start byte: {:#04X}", self.actual)
	}
}

impl std::fmt::Display for InvalidFrameType {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		write!(f, "invalid frame type: {:#04X}", self.actual)
	}
}

impl std::fmt::Display for InvalidChecksum {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		write!(
			f,
			"invalid checksum, message claims {:#06X}, computed {:#06X}",
			self.message, self.computed
		)
	}
}

impl std::fmt::Display for TruncatedPayload {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		write!(f, "payload too short, expected at least {} bytes, got {}", self.minimum, self.actual)
	}
}

impl std::fmt::Display for LengthMismatch {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		write!(f, "length mismatch, declared {}, got {}", self.declared, self.actual)
	}
}

impl std::fmt::Display for UnexpectedPacket {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		write!(f, "unexpected packet type, expected {:#04X}, got {:#04X}", self.expected, self.actual)
	}
}

impl std::fmt::Display for UnexpectedResponse {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		write!(f, "unexpected response, expected {:#04X}, got {:#04X}", self.expected, self.actual)
	}
}

impl std::fmt::Display for DeviceError {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		write!(f, "command {:#04X} failed with status {}", self.command, self.status)
	}
}

impl std::fmt::Display for ResourceError {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		match self {
			Self::LengthMismatch { declared, supplied } => {
				write!(f, "length argument is {} but {} bytes were supplied", declared, supplied)
			},
			Self::TooLarge { length } => write!(f, "length {} does not fit in 32 bits", length),
		}
	}
}
