use std::fmt;

use crate::ext::ByteFmt;

/// An error when parsing hstore text representation.
#[derive(Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Found a byte other than the one required by the grammar.
    Unexpected {
        expected: u8,
        found: u8,
        pos: usize,
    },
    /// Input ended where more was required.
    UnexpectedEnd {
        expected: Expected,
    },
    /// Input ended inside a double quoted string.
    UnterminatedQuote,
    /// Backslash followed by byte other than `\` or `"`.
    InvalidEscape {
        found: u8,
        pos: usize,
    },
}

/// What the parser expect when input ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Expected {
    /// Opening double quote of a key.
    Quote,
    /// Pair separator `, `.
    PairSeparator,
    /// Key value separator `=>`.
    KvSeparator,
    /// Literal `NULL`.
    Null,
    /// Double quoted value or `NULL`.
    Value,
}

impl std::error::Error for ParseError { }

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !f.alternate() {
            f.write_str("failed to parse hstore, ")?;
        }
        match *self {
            Self::Unexpected { expected, found, pos } => {
                write!(f, "expected {}; found {} at {pos}", ByteFmt(expected), ByteFmt(found))
            },
            Self::UnexpectedEnd { expected } => write!(f, "expected {expected}; found end"),
            Self::UnterminatedQuote => f.write_str("found end before closing double-quote ('\"')"),
            Self::InvalidEscape { found, pos } => {
                write!(f, "unexpected escape in quoted string: found {} at {pos}", ByteFmt(found))
            },
        }
    }
}

impl fmt::Debug for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{self}\"")
    }
}

impl fmt::Display for Expected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Expected::Quote => "'\"'",
            Expected::PairSeparator => "pair separator ', '",
            Expected::KvSeparator => "key value separator '=>'",
            Expected::Null => "'NULL'",
            Expected::Value => "value",
        })
    }
}
