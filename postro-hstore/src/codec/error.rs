use bytes::Bytes;
use std::{fmt, str::Utf8Error, string::FromUtf8Error};

use crate::{ext::FmtExt, text::ParseError};

/// An error when decoding hstore value.
pub enum DecodeError {
    /// Postgres return non utf8 string.
    Utf8(Utf8Error),
    /// Malformed text representation.
    Parse(ParseError),
    /// Binary representation ended before a declared length, contains the remaining bytes.
    Incomplete(Bytes),
    /// Negative pair count or key length in binary representation.
    InvalidLength(i32),
    /// Value is `NULL` but target is not nullable.
    Null,
    /// Generic value is not text, contains the value type name.
    TypeMismatch(&'static str),
    /// Dynamic scan plan used with other target type than it was planned for.
    PlanMismatch,
}

/// An error when encoding hstore value.
pub enum EncodeError {
    /// Pair count or string length does not fit in `i32`.
    TooLarge(usize),
    /// Dynamic encode plan used with other value type than it was planned for.
    PlanMismatch,
}

impl std::error::Error for DecodeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Utf8(e) => Some(e),
            Self::Parse(e) => Some(e),
            _ => None,
        }
    }
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("failed to decode hstore, ")?;
        match self {
            Self::Utf8(e) => write!(f, "{e}"),
            Self::Parse(e) => write!(f, "{e:#}"),
            Self::Incomplete(rem) => write!(f, "incomplete binary value: {:?}", rem.lossy()),
            Self::InvalidLength(len) => write!(f, "invalid length: {len}"),
            Self::Null => write!(f, "unexpected NULL value"),
            Self::TypeMismatch(ty) => write!(f, "cannot scan {ty}"),
            Self::PlanMismatch => write!(f, "target type missmatch with scan plan"),
        }
    }
}

impl fmt::Debug for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{self}\"")
    }
}

impl std::error::Error for EncodeError { }

impl fmt::Display for EncodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("failed to encode hstore, ")?;
        match self {
            Self::TooLarge(len) => write!(f, "length too large for protocol: {len}"),
            Self::PlanMismatch => write!(f, "value type missmatch with encode plan"),
        }
    }
}

impl fmt::Debug for EncodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{self}\"")
    }
}

macro_rules! from {
    (<$ty:ty>$pat:pat => $body:expr) => {
        impl From<$ty> for DecodeError {
            fn from($pat: $ty) -> Self {
                $body
            }
        }
    };
}

from!(<Utf8Error>e => Self::Utf8(e));
from!(<FromUtf8Error>e => Self::Utf8(e.utf8_error()));
from!(<ParseError>e => Self::Parse(e));
