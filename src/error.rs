// SPDX-License-Identifier: MPL-2.0
use std::fmt;

/// Errors surfaced by the crate.
///
/// Registry operations themselves are total: unknown ids are no-ops and
/// malformed options are defaulted. Errors only signal wiring mistakes
/// (using a toaster after shutdown, no async runtime) or configuration I/O.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    Io(String),
    Config(String),
    /// The toaster was shut down and can no longer be used.
    Closed,
    /// A toaster was created outside of a tokio runtime.
    NoRuntime,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(e) => write!(f, "I/O Error: {}", e),
            Error::Config(e) => write!(f, "Config Error: {}", e),
            Error::Closed => write!(f, "Toaster Error: used after shutdown"),
            Error::NoRuntime => write!(f, "Toaster Error: no tokio runtime available"),
        }
    }
}

impl std::error::Error for Error {}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for Error {
    fn from(err: toml::ser::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<tokio::runtime::TryCurrentError> for Error {
    fn from(_: tokio::runtime::TryCurrentError) -> Self {
        Error::NoRuntime
    }
}

pub type Result<T> = std::result::Result<T, Error>;
