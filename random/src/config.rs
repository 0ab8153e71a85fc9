use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of buffered 32-bit words in the reference sizing.
pub const DEFAULT_CAPACITY: usize = 10_000;

/// Bytes read from the secure source per refill.
pub const DEFAULT_BLOCK_SIZE: usize = 1024;

/// Entropy buffer configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EntropyConfig {
    /// Maximum number of words held in the queue.
    pub capacity: usize,
    /// Size of each read from the secure byte source.
    pub block_size: usize,
    /// How words are carved out of each block.
    pub extraction: Extraction,
}

/// Word extraction scheme applied to every block read from the byte source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Extraction {
    /// Overlapping little-endian windows, then strided big-endian words over
    /// the same block. Yields roughly two words per input byte.
    #[default]
    TwoPass,
    /// Non-overlapping little-endian words; every input byte is used once.
    Clean,
}

impl fmt::Display for Extraction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Extraction::TwoPass => write!(f, "two-pass"),
            Extraction::Clean => write!(f, "clean"),
        }
    }
}

impl Default for EntropyConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            block_size: DEFAULT_BLOCK_SIZE,
            extraction: Extraction::TwoPass,
        }
    }
}

impl EntropyConfig {
    /// Parse a configuration from JSON; missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate that the configuration is self-consistent.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.capacity == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        if self.block_size < 4 {
            return Err(ConfigError::BlockTooSmall(self.block_size));
        }
        Ok(())
    }
}

/// Errors arising from entropy configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("buffer capacity must be at least one word")]
    ZeroCapacity,
    #[error("block size {0} is smaller than one 32-bit word")]
    BlockTooSmall(usize),
    #[error("malformed configuration: {0}")]
    Parse(#[from] serde_json::Error),
}
