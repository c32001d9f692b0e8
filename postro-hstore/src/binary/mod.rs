//! Hstore binary representation.
//!
//! All integers are big endian `i32`:
//!
//! ```text
//! pair_count
//! repeat pair_count {
//!     key_len   key_bytes
//!     value_len value_bytes  // value_len -1 for NULL, without value_bytes
//! }
//! ```
mod reader;
mod writer;

pub use reader::{Entries, entries, read};
pub use writer::write;
