//! Hstore text representation.
//!
//! ```text
//! "a"=>"1", "b"=>NULL, "c \"quoted\""=>"back\\slash"
//! ```
mod error;
mod scanner;
mod parser;
mod writer;

pub use error::{Expected, ParseError};
pub use parser::parse;
pub use writer::write;
