use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Concurrency-safety mode of a lock or container, fixed at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Safety {
    /// Reader/writer locking; contended callers block.
    #[default]
    Safe,
    /// No locking; the caller serializes access.
    Unsafe,
}

impl Safety {
    /// Mode selected by the conventional `unsafe` constructor flag.
    pub fn from_unsafe_flag(unsafe_: bool) -> Self {
        if unsafe_ {
            Safety::Unsafe
        } else {
            Safety::Safe
        }
    }

    pub fn is_safe(&self) -> bool {
        matches!(self, Safety::Safe)
    }
}

impl fmt::Display for Safety {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Safety::Safe => write!(f, "safe"),
            Safety::Unsafe => write!(f, "unsafe"),
        }
    }
}

/// Returned when a string does not name a [`Safety`] mode.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown safety mode: {0:?}")]
pub struct ParseSafetyError(pub String);

impl FromStr for Safety {
    type Err = ParseSafetyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "safe" => Ok(Safety::Safe),
            "unsafe" => Ok(Safety::Unsafe),
            other => Err(ParseSafetyError(other.to_string())),
        }
    }
}
