//! Reader/writer lock whose locking can be switched off at construction.

mod toggle;

pub use q_types::Safety;
pub use toggle::{ReadGuard, ToggleLock, WriteGuard};
