use std::fmt;

use gridnav_core::ReassemblyError;
use gridnav_raster::ProcessingError;

/// Failures of a classify or find-path request.
///
/// An unreachable goal is not an error; it yields an empty path.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// Missing, empty or malformed input, or coordinates outside the grid.
    #[error("invalid request: {0}")]
    Validation(String),
    #[error(transparent)]
    Processing(ProcessingError),
    #[error("cannot reassemble tiles: {0}")]
    Reassembly(#[from] ReassemblyError),
    #[error("request cancelled")]
    Cancelled,
    /// The background worker panicked or was torn down.
    #[error("worker failed: {0}")]
    Worker(String),
}

/// Coarse, stable classification of a [`ServiceError`], for mapping onto
/// transport status codes.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Validation,
    Processing,
    Reassembly,
    Cancelled,
    Internal,
}

impl ErrorKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::Processing => "processing",
            Self::Reassembly => "reassembly",
            Self::Cancelled => "cancelled",
            Self::Internal => "internal",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<ProcessingError> for ServiceError {
    fn from(err: ProcessingError) -> Self {
        match err {
            ProcessingError::Cancelled => Self::Cancelled,
            other => Self::Processing(other),
        }
    }
}

impl ServiceError {
    pub(crate) fn validation(msg: impl Into<String>) -> Self {
        let msg = msg.into();
        log::warn!("rejecting request: {msg}");
        Self::Validation(msg)
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::Processing(_) => ErrorKind::Processing,
            Self::Reassembly(_) => ErrorKind::Reassembly,
            Self::Cancelled => ErrorKind::Cancelled,
            Self::Worker(_) => ErrorKind::Internal,
        }
    }
}
