//! Driver errors

use core::fmt;

/// Failure of a single driver operation.
///
/// `E` is the error type of the underlying bus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error<E> {
  /// The transport reported a failure (NACK, timeout, arbitration loss)
  Bus(E),
  /// The device returned fewer bytes than requested
  MalformedRead { expected: usize, received: usize },
}

impl<E> Error<E> {
  pub fn is_bus(&self) -> bool {
    match self {
      Error::Bus(_) => true,
      _ => false,
    }
  }
}

impl<E: fmt::Debug> fmt::Display for Error<E> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Error::Bus(e) => write!(f, "bus error: {:?}", e),
      Error::MalformedRead { expected, received } => write!(
        f,
        "malformed read: expected {} bytes, received {}",
        expected, received
      ),
    }
  }
}
