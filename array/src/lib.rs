//! Dynamic arrays with construction-time selectable locking.
//!
//! ```
//! use q_array::IntArray;
//!
//! let a = IntArray::new_from(vec![5, 3, 5, 1], false);
//! a.unique().sort(false);
//! assert_eq!(a.slice(), vec![1, 3, 5]);
//! assert_eq!(a.sum(), 9);
//! ```

mod array;
mod error;
mod impls;
mod view;

pub use array::{Array, IntArray};
pub use error::{ArrayError, ArrayResult};
pub use q_random::WordSource;
pub use q_sync::Safety;
pub use view::View;
