//! Buffered secure entropy and the random helpers built on it.

mod buffer;
pub mod config;
pub mod error;
pub mod extract;
pub mod helpers;
mod queue;
pub mod source;
mod word;

pub use buffer::{intn, EntropyBuffer};
pub use config::{ConfigError, EntropyConfig, Extraction};
pub use error::{RandomError, RandomResult};
pub use queue::BoundedQueue;
pub use source::{ByteSource, OsByteSource};
pub use word::{reduce, FixedSource, SeededSource, SourceRng, WordSource};
