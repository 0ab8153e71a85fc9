use q_types::ErrorCode;
use std::time::Duration;
use thiserror::Error;

/// Errors produced by container operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArrayError {
    #[error("index {index} out of range for length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("container is empty")]
    EmptyContainer,

    #[error("lock not acquired within {0:?}")]
    WouldBlock(Duration),
}

impl ArrayError {
    /// Map to a platform error code.
    pub fn error_code(&self) -> ErrorCode {
        match self {
            ArrayError::IndexOutOfRange { .. } => ErrorCode::IndexOutOfRange,
            ArrayError::EmptyContainer => ErrorCode::EmptyContainer,
            ArrayError::WouldBlock(_) => ErrorCode::WouldBlock,
        }
    }
}

pub type ArrayResult<T> = Result<T, ArrayError>;
