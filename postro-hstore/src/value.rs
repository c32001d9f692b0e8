//! Generic database value interface.
//!
//! Drivers which exchange values as a small set of primitive types write
//! hstore as text and only read hstore from text.
use crate::{
    codec::{DecodeError, HstoreScanner, HstoreValuer},
    common::ByteStr,
    text,
};

/// A database value in driver independent representation.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Bytes(Vec<u8>),
}

impl SqlValue {
    /// Returns the variant type name.
    pub const fn type_name(&self) -> &'static str {
        match self {
            SqlValue::Null => "null",
            SqlValue::Bool(_) => "bool",
            SqlValue::Int(_) => "int",
            SqlValue::Float(_) => "float",
            SqlValue::Text(_) => "text",
            SqlValue::Bytes(_) => "bytes",
        }
    }
}

/// A type that can be converted into [`SqlValue`].
pub trait ToSqlValue {
    /// Returns text representation, or [`SqlValue::Null`].
    fn to_sql_value(&self) -> SqlValue;
}

/// A type that can be scanned from [`SqlValue`].
pub trait ScanSqlValue {
    /// Scan from [`SqlValue::Null`] or [`SqlValue::Text`], other variant is an error.
    fn scan_sql_value(&mut self, src: SqlValue) -> Result<(), DecodeError>;
}

impl<V: HstoreValuer> ToSqlValue for V {
    fn to_sql_value(&self) -> SqlValue {
        to_text(self).map_or(SqlValue::Null, SqlValue::Text)
    }
}

impl<T: HstoreScanner> ScanSqlValue for T {
    fn scan_sql_value(&mut self, src: SqlValue) -> Result<(), DecodeError> {
        match src {
            SqlValue::Null => self.scan_hstore(None),
            SqlValue::Text(src) => {
                let hstore = text::parse(&ByteStr::from(src))?;
                self.scan_hstore(Some(hstore))
            },
            other => Err(DecodeError::TypeMismatch(other.type_name())),
        }
    }
}

/// Encode as text, [`None`] if value is `NULL`.
pub(crate) fn to_text<V: HstoreValuer + ?Sized>(value: &V) -> Option<String> {
    let pairs = value.hstore_value()?;
    let mut buf = Vec::<u8>::new();
    text::write(pairs, &mut buf);
    // SAFETY: only str and ascii delimiters are written
    Some(unsafe { String::from_utf8_unchecked(buf) })
}
