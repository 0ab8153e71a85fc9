use serde::{Deserialize, Serialize};
use std::fmt;

/// Platform-wide error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorCode {
    // Generic
    Internal,
    InvalidArgument,

    // Containers
    IndexOutOfRange,
    EmptyContainer,

    // Synchronization
    WouldBlock,

    // Randomness
    EntropyUnavailable,
}

impl ErrorCode {
    /// Returns a short string code suitable for logs and API responses.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::Internal => "INTERNAL",
            ErrorCode::InvalidArgument => "INVALID_ARGUMENT",
            ErrorCode::IndexOutOfRange => "INDEX_OUT_OF_RANGE",
            ErrorCode::EmptyContainer => "EMPTY_CONTAINER",
            ErrorCode::WouldBlock => "WOULD_BLOCK",
            ErrorCode::EntropyUnavailable => "ENTROPY_UNAVAILABLE",
        }
    }

    /// Whether retrying the same call later can succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, ErrorCode::WouldBlock)
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
