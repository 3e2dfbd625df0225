//! Error type shared by the engine and its backends.
//!
//! Every misuse of the declared tree surfaces as [`Error::InvalidOperation`].
//! The engine never recovers from it locally: it propagates to whoever called
//! `run`, `close`, or the typed accessor that triggered it.

use std::io;

/// Errors raised by the engine or a backend.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The declared tree was used in a way its current state does not allow.
    #[error("invalid operation: {0}")]
    InvalidOperation(String),
    /// Terminal I/O failed while a window was open.
    #[error("terminal i/o failed: {0}")]
    Io(#[from] io::Error),
}

impl Error {
    /// Build an [`Error::InvalidOperation`] from any message.
    pub fn invalid(message: impl Into<String>) -> Self {
        Error::InvalidOperation(message.into())
    }

    /// Whether this is an [`Error::InvalidOperation`].
    pub fn is_invalid_operation(&self) -> bool {
        matches!(self, Error::InvalidOperation(_))
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_operation_message() {
        let err = Error::invalid("closing a window before it is open");
        assert!(err.is_invalid_operation());
        assert_eq!(
            err.to_string(),
            "invalid operation: closing a window before it is open"
        );
    }

    #[test]
    fn io_error_converts() {
        let err: Error = io::Error::new(io::ErrorKind::Other, "tty gone").into();
        assert!(!err.is_invalid_operation());
        assert!(err.to_string().contains("tty gone"));
    }
}
