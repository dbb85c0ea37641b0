use std::fmt::{Debug, Display};

pub type Result<T, E = Error> = ::core::result::Result<T, E>;

/// Boxed error coming out of an endpoint transport, kept as-is
pub type TransportError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Status reported alongside storage failures
pub const STORAGE_STATUS: u16 = 500;

/// An error returned by a builder
#[derive(Debug)]
pub struct BuilderError<T> {
    pub builder: T,
    pub err: Error,
}

/// An error of the `sdxl_endpoint` library
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Transport error: {0}")]
    Transport(#[source] TransportError),
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Missing field in endpoint response: `{0}`")]
    MissingField(&'static str),
    #[error("Base64 error: {0}")]
    Decode(#[from] base64::DecodeError),
    #[error("Storage error ({STORAGE_STATUS}): {0}")]
    Storage(#[from] std::io::Error),
}

impl Error {
    #[inline]
    pub fn validation<M: Display>(msg: M) -> Self {
        Self::Validation(msg.to_string())
    }

    #[inline]
    pub fn transport(err: impl Into<TransportError>) -> Self {
        Self::Transport(err.into())
    }

    /// Service-style status code, only reported for storage failures
    #[inline]
    pub fn status(&self) -> Option<u16> {
        return match self {
            Self::Storage(_) => Some(STORAGE_STATUS),
            _ => None,
        };
    }
}

impl From<reqwest::Error> for Error {
    #[inline]
    fn from(value: reqwest::Error) -> Self {
        Self::transport(value)
    }
}

impl<T> BuilderError<T> {
    #[inline]
    pub fn new(builder: T, error: impl Into<Error>) -> Self {
        return Self {
            builder,
            err: error.into(),
        };
    }

    #[inline]
    pub fn msg<M: Display>(builder: T, msg: M) -> Self {
        return Self {
            builder,
            err: Error::validation(msg),
        };
    }

    #[inline]
    pub fn into_inner(self) -> T {
        self.builder
    }

    #[inline]
    pub fn into_error(self) -> Error {
        self.err
    }
}

impl<T> From<BuilderError<T>> for Error {
    #[inline]
    fn from(value: BuilderError<T>) -> Self {
        value.into_error()
    }
}

impl<T> Display for BuilderError<T> {
    #[inline]
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.err, f)
    }
}

impl<T: Debug> std::error::Error for BuilderError<T> {
    #[inline]
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.err)
    }
}
