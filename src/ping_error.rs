use std::{error::Error, fmt};

pub type GenericError = Box<dyn Error + Send + Sync + 'static>;

pub type PingResult<T> = std::result::Result<T, PingError>;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PingErrorKind {
    /// The raw socket could not be opened, usually for lack of privileges. Fatal.
    SocketCreationFailed,
    /// The destination could not be resolved to an IPv4 address. Fatal.
    ResolutionFailed,
    SendFailed,
    ReceiveTimeout,
    ReceiveError,
    MalformedPacket,
}

#[derive(Debug)]
pub struct PingError {
    pub kind: PingErrorKind,
    pub message: String,
    // no chained error
}

impl PingError {
    pub(crate) fn new(kind: PingErrorKind, message: impl Into<String>) -> Self {
        PingError { kind, message: message.into() }
    }

    pub(crate) fn from_io(kind: PingErrorKind, error: &std::io::Error) -> Self {
        PingError { kind, message: error.to_string() }
    }
}

impl fmt::Display for PingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        write!(f, "PingError")?;
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        Ok(())
    }
}

impl Error for PingError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        None
    }
}

#[cfg(test)]
mod tests {
    use std::io::ErrorKind;

    use super::*;

    #[test]
    fn derive_debug() {
        let ping_error = PingError::new(PingErrorKind::SendFailed, "testing std::fmt::Debug");
        let fmt_debug_str = format!("{ping_error:?}");
        assert_eq!(
            "PingError { kind: SendFailed, message: \"testing std::fmt::Debug\" }",
            fmt_debug_str
        );
    }

    #[test]
    fn fmt_without_message() {
        let ping_error = PingError::new(PingErrorKind::MalformedPacket, "");
        let fmt_str = format!("{ping_error}");
        assert_eq!("PingError", fmt_str);
    }

    #[test]
    fn fmt_with_message() {
        let ping_error = PingError::new(PingErrorKind::ResolutionFailed, "testing std::fmt::Display");
        let fmt_str = format!("{}", ping_error);
        assert_eq!("PingError: testing std::fmt::Display", fmt_str);
    }

    #[test]
    fn source() {
        assert!(PingError::new(PingErrorKind::ReceiveError, String::new()).source().is_none());
    }

    #[test]
    fn ping_error_from_std_io_error_keeps_os_message() {
        let std_io_error = std::io::Error::new(ErrorKind::PermissionDenied, "Operation not permitted");
        let ping_error = PingError::from_io(PingErrorKind::SocketCreationFailed, &std_io_error);
        assert_eq!(PingErrorKind::SocketCreationFailed, ping_error.kind);
        assert_eq!("Operation not permitted", ping_error.message);
    }
}
