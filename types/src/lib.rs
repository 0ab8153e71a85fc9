mod error_code;
mod safety;

pub use error_code::ErrorCode;
pub use safety::{ParseSafetyError, Safety};
