use std::fmt;
use std::io;

use mbgrab_event::EventError;
use mbgrab_frame::FrameError;

// Exit codes follow sysexits-style semantics.
pub const SUCCESS: i32 = 0;
pub const FAILURE: i32 = 1;
pub const PERMISSION_DENIED: i32 = 50;
pub const DATA_INVALID: i32 = 60;
pub const USAGE: i32 = 64;
pub const TIMEOUT: i32 = 124;
pub const INTERNAL: i32 = 125;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug)]
pub struct CliError {
    pub code: i32,
    pub message: String,
}

impl CliError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

pub fn io_error(context: &str, err: io::Error) -> CliError {
    let code = match err.kind() {
        io::ErrorKind::PermissionDenied => PERMISSION_DENIED,
        io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock => TIMEOUT,
        io::ErrorKind::ConnectionRefused
        | io::ErrorKind::ConnectionReset
        | io::ErrorKind::NotFound => FAILURE,
        _ => INTERNAL,
    };
    CliError::new(code, format!("{context}: {err}"))
}

pub fn frame_error(context: &str, err: FrameError) -> CliError {
    match err {
        FrameError::Io(source) => io_error(context, source),
        FrameError::ProtocolMismatch
        | FrameError::InvalidLength(_)
        | FrameError::BufferTooSmall { .. } => {
            CliError::new(DATA_INVALID, format!("{context}: {err}"))
        }
        FrameError::PayloadTooLarge { .. } => CliError::new(USAGE, format!("{context}: {err}")),
        FrameError::ConnectionClosed => CliError::new(FAILURE, format!("{context}: {err}")),
    }
}

pub fn event_error(context: &str, err: EventError) -> CliError {
    CliError::new(INTERNAL, format!("{context}: {err}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn protocol_errors_are_data_invalid() {
        assert_eq!(frame_error("decode", FrameError::ProtocolMismatch).code, DATA_INVALID);
        assert_eq!(
            frame_error(
                "decode",
                FrameError::BufferTooSmall {
                    required: 2048,
                    capacity: 1024
                }
            )
            .code,
            DATA_INVALID
        );
    }

    #[test]
    fn timeouts_map_to_124() {
        let err = FrameError::Io(io::Error::from(io::ErrorKind::WouldBlock));
        assert_eq!(frame_error("probe", err).code, TIMEOUT);
    }

    #[test]
    fn message_carries_context() {
        let err = frame_error("probe failed", FrameError::ConnectionClosed);
        assert_eq!(err.code, FAILURE);
        assert!(err.message.starts_with("probe failed: connection closed"));
    }
}
