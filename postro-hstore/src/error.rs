//! `postro-hstore` error types.
use std::{backtrace::Backtrace, fmt};

use crate::{
    codec::{DecodeError, EncodeError},
    common::unit_error,
};

/// A specialized [`Result`] type for `postro-hstore` operation.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// All possible error from `postro-hstore` library.
pub struct Error {
    context: String,
    backtrace: Backtrace,
    kind: ErrorKind,
}

impl Error {
    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    pub fn backtrace(&self) -> &Backtrace {
        &self.backtrace
    }

    /// Returns `true` if the hstore extension is not installed in the database.
    pub fn is_not_installed(&self) -> bool {
        matches!(self.kind, ErrorKind::NotInstalled(_))
    }

    /// Prepend context message.
    pub fn context(mut self, context: impl Into<String>) -> Self {
        self.context = context.into();
        self
    }
}

/// All possible error kind from `postro-hstore` library.
pub enum ErrorKind {
    Decode(DecodeError),
    Encode(EncodeError),
    NotInstalled(HstoreNotInstalled),
    /// Type lookup query failed.
    Lookup(Box<dyn std::error::Error + Send + Sync>),
}

unit_error! {
    /// An error when the `hstore` type does not exist in the database.
    pub struct HstoreNotInstalled("postgres type hstore does not exist (the extension may not be loaded)");
}

macro_rules! from {
    (<$ty:ty>$pat:pat => $body:expr) => {
        impl From<$ty> for Error {
            fn from($pat: $ty) -> Self {
                let backtrace = std::backtrace::Backtrace::capture();
                Self { context: String::new(), backtrace, kind: $body }
            }
        }
    };
}

from!(<ErrorKind>e => e);
from!(<DecodeError>e => ErrorKind::Decode(e));
from!(<EncodeError>e => ErrorKind::Encode(e));
from!(<HstoreNotInstalled>e => ErrorKind::NotInstalled(e));

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &self.kind {
            ErrorKind::Decode(e) => Some(e),
            ErrorKind::Encode(e) => Some(e),
            ErrorKind::NotInstalled(e) => Some(e),
            ErrorKind::Lookup(e) => Some(&**e),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.context.is_empty() {
            write!(f, "{}: ", self.context)?;
        }

        fmt::Display::fmt(&self.kind, f)?;

        if let std::backtrace::BacktraceStatus::Captured = self.backtrace.status() {
            let mut backtrace = self.backtrace.to_string();
            write!(f, "\n\n")?;
            writeln!(f, "Stack backtrace:")?;
            backtrace.truncate(backtrace.trim_end().len());
            write!(f, "{}", backtrace)?;
        }

        Ok(())
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{self}\"")
    }
}

impl std::error::Error for ErrorKind { }

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Decode(e) => e.fmt(f),
            Self::Encode(e) => e.fmt(f),
            Self::NotInstalled(e) => e.fmt(f),
            Self::Lookup(e) => write!(f, "failed to lookup hstore oid, {e}"),
        }
    }
}

impl fmt::Debug for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{self}\"")
    }
}
