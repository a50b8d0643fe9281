pub mod app;
pub mod cancel;
pub mod cli;
pub mod config;
pub mod serial;
pub mod state;
pub mod transfer;

use std::fmt;
use std::io;

pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can go wrong in a run, split the way the exit paths need:
/// bad invocations are reported with a usage hint before anything is opened,
/// everything else carries the OS error text for stderr.
#[derive(Debug)]
pub enum Error {
    /// Bad argument count, direction token, baud rate, or byte count.
    InvalidArgs(String),
    /// A device or file could not be opened or configured.
    Open { target: String, source: io::Error },
    /// Hard I/O failure on the port or file mid-transfer.
    Io(io::Error),
    /// The source file ran out before the requested byte count was read.
    Truncated { wanted: u64, got: u64 },
    /// The configured stall limit was hit without any progress.
    Stalled(u32),
    /// The run was cancelled from outside (SIGINT/SIGTERM).
    Interrupted,
    /// Signal handler registration failed.
    Signal(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidArgs(msg) => write!(f, "{msg}"),
            Error::Open { target, source } => write!(f, "unable to open {target}: {source}"),
            Error::Io(err) => write!(f, "I/O error: {err}"),
            Error::Truncated { wanted, got } => write!(
                f,
                "source file ended early: {wanted} bytes requested, only {got} available"
            ),
            Error::Stalled(limit) => {
                write!(f, "no progress after {limit} consecutive retries, giving up")
            }
            Error::Interrupted => write!(f, "interrupted"),
            Error::Signal(msg) => write!(f, "can't register signal handler: {msg}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Open { source, .. } => Some(source),
            Error::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::Io(err)
    }
}

impl Error {
    /// Usage errors exit 2, everything else 1.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::InvalidArgs(_) => 2,
            _ => 1,
        }
    }

    pub fn is_usage(&self) -> bool {
        matches!(self, Error::InvalidArgs(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn usage_errors_map_to_exit_2() {
        let err = Error::InvalidArgs("wrong number of arguments".into());
        assert_eq!(err.exit_code(), 2);
        assert!(err.is_usage());
    }

    #[test]
    fn runtime_errors_map_to_exit_1() {
        let err = Error::Io(io::Error::new(io::ErrorKind::BrokenPipe, "gone"));
        assert_eq!(err.exit_code(), 1);
        assert!(!err.is_usage());
        assert_eq!(Error::Interrupted.exit_code(), 1);
    }

    #[test]
    fn truncated_names_both_counts() {
        let err = Error::Truncated {
            wanted: 20,
            got: 10,
        };
        let text = format!("{err}");
        assert!(text.contains("20"));
        assert!(text.contains("10"));
    }
}
