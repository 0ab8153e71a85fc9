use crate::config::ConfigError;
use q_types::ErrorCode;
use std::time::Duration;
use thiserror::Error;

/// Errors produced by the random sources.
#[derive(Debug, Error)]
pub enum RandomError {
    #[error("bound must be non-zero")]
    ZeroBound,

    #[error("no buffered entropy within {0:?}")]
    WouldBlock(Duration),

    #[error("secure byte source failed: {0}")]
    Source(String),

    #[error("failed to spawn refill worker: {0}")]
    Spawn(#[from] std::io::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl RandomError {
    /// Map to a platform error code.
    pub fn error_code(&self) -> ErrorCode {
        match self {
            RandomError::ZeroBound => ErrorCode::InvalidArgument,
            RandomError::WouldBlock(_) => ErrorCode::WouldBlock,
            RandomError::Source(_) => ErrorCode::EntropyUnavailable,
            RandomError::Spawn(_) => ErrorCode::Internal,
            RandomError::Config(_) => ErrorCode::InvalidArgument,
        }
    }
}

pub type RandomResult<T> = Result<T, RandomError>;
