//! Error types
//!
//! The state machines themselves cannot fail; the only failure a button can
//! observe is its input line refusing to be configured or sampled.

use embedded_hal::digital::Error as _;

/// Errors that can occur when talking to the input line
///
/// Generic over the line's error type so callers can still match on the
/// underlying HAL error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error<E> {
    /// The line could not be configured or sampled
    Line(E),
}

impl<E> Error<E> {
    /// The wrapped line error
    pub fn into_inner(self) -> E {
        match self {
            Error::Line(e) => e,
        }
    }
}

impl<E: embedded_hal::digital::Error> core::fmt::Display for Error<E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::Line(e) => write!(f, "input line error: {}", e.kind()),
        }
    }
}

impl<E: embedded_hal::digital::Error> core::error::Error for Error<E> {}
