//! Hstore codec.
//!
//! - [`HstoreCodec`]
//! - [`HstoreValuer`]
//! - [`HstoreScanner`]
//! - [`EncodePlan`]
//! - [`ScanPlan`]
//!
//! Plans are chosen statically from the capability traits. At the driver
//! boundary where only `dyn Any` is known, use
//! [`plan_encode_any`][HstoreCodec::plan_encode_any] and
//! [`plan_scan_any`][HstoreCodec::plan_scan_any].
use bytes::{BufMut, Bytes, BytesMut};
use std::{collections::HashMap, fmt, marker::PhantomData};

use crate::{
    binary,
    common::{ByteStr, span, verbose},
    hstore::{Hstore, HstoreStr, Iter},
    postgres::{Oid, PgFormat},
    text,
    value::SqlValue,
};

mod any;
mod error;

pub use any::{AnyEncodePlan, AnyScanPlan};
pub use error::{DecodeError, EncodeError};

/// Codec for the postgres `hstore` extension type.
///
/// Since `hstore` oid differs between databases, the codec is created with
/// the oid resolved by [`query_hstore_oid`][crate::query_hstore_oid].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HstoreCodec {
    oid: Oid,
}

impl HstoreCodec {
    /// Create codec for hstore with the given oid.
    pub const fn new(oid: Oid) -> Self {
        Self { oid }
    }

    /// Returns hstore [`Oid`].
    pub const fn oid(&self) -> Oid {
        self.oid
    }

    /// Returns `true` if format code is supported, both text and binary are.
    pub const fn can_handle(&self, format_code: i16) -> bool {
        PgFormat::from_code(format_code).is_some()
    }

    /// Returns [`PgFormat::Binary`].
    pub const fn preferred_format(&self) -> PgFormat {
        PgFormat::Binary
    }

    /// Plan encoding of `V`.
    pub fn plan_encode<V: HstoreValuer + ?Sized>(&self, format: PgFormat) -> EncodePlan<V> {
        EncodePlan::new(format)
    }

    /// Plan scanning into `T`.
    pub fn plan_scan<T: HstoreScanner + ?Sized>(&self, format: PgFormat) -> ScanPlan<T> {
        ScanPlan::new(format)
    }

    /// Encode value into [`Encoded`] ready to be bound as parameter.
    pub fn encode<V: HstoreValuer + ?Sized>(&self, format: PgFormat, value: &V) -> Result<Encoded, EncodeError> {
        let mut buf = BytesMut::new();
        let value = match self.plan_encode(format).encode(value, &mut buf)? {
            IsNull::Yes => None,
            IsNull::No => Some(buf.freeze()),
        };
        Ok(Encoded { value, oid: self.oid, format })
    }

    /// Decode column value, [`None`] if it is `NULL`.
    pub fn decode_value<S: HstoreStr>(
        &self,
        format: PgFormat,
        src: Option<Bytes>,
    ) -> Result<Option<Hstore<S>>, DecodeError> {
        let mut hstore = None;
        self.plan_scan(format).scan(src, &mut hstore)?;
        Ok(hstore)
    }

    /// Decode column value into the generic text representation.
    ///
    /// Text format is only validated as utf8, binary format is decoded then
    /// encoded as text.
    pub fn decode_sql_value(&self, format: PgFormat, src: Option<Bytes>) -> Result<SqlValue, DecodeError> {
        let Some(src) = src else {
            return Ok(SqlValue::Null);
        };
        match format {
            PgFormat::Text => Ok(SqlValue::Text(String::from_utf8(src.into())?)),
            PgFormat::Binary => {
                let hstore = binary::read::<ByteStr>(src)?;
                Ok(crate::value::to_text(&hstore).map_or(SqlValue::Null, SqlValue::Text))
            },
        }
    }
}

/// Planned hstore encoding for `V`.
pub struct EncodePlan<V: ?Sized> {
    format: PgFormat,
    _v: PhantomData<fn(&V)>,
}

impl<V: HstoreValuer + ?Sized> EncodePlan<V> {
    pub(crate) fn new(format: PgFormat) -> Self {
        Self { format, _v: PhantomData }
    }

    /// Returns planned format.
    pub fn format(&self) -> PgFormat {
        self.format
    }

    /// Encode value into `buf`.
    ///
    /// Returns [`IsNull::Yes`] without writing anything if value is `NULL`.
    /// An empty hstore is not `NULL`, it is written as empty text or zero pair count.
    pub fn encode<B: BufMut>(&self, value: &V, buf: &mut B) -> Result<IsNull, EncodeError> {
        let Some(pairs) = value.hstore_value() else {
            return Ok(IsNull::Yes);
        };
        span!("hstore_encode", format = ?self.format, pairs = pairs.len());
        match self.format {
            PgFormat::Text => text::write(pairs, buf),
            PgFormat::Binary => binary::write(pairs, buf)?,
        }
        Ok(IsNull::No)
    }
}

impl<V: ?Sized> Clone for EncodePlan<V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<V: ?Sized> Copy for EncodePlan<V> { }

impl<V: ?Sized> fmt::Debug for EncodePlan<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EncodePlan")
            .field("format", &self.format)
            .field("value", &std::any::type_name::<V>())
            .finish()
    }
}

/// Planned hstore scanning into `T`.
pub struct ScanPlan<T: ?Sized> {
    format: PgFormat,
    _t: PhantomData<fn(&mut T)>,
}

impl<T: HstoreScanner + ?Sized> ScanPlan<T> {
    pub(crate) fn new(format: PgFormat) -> Self {
        Self { format, _t: PhantomData }
    }

    /// Returns planned format.
    pub fn format(&self) -> PgFormat {
        self.format
    }

    /// Decode `src` into `dst`, `src` is [`None`] if value is `NULL`.
    pub fn scan(&self, src: Option<Bytes>, dst: &mut T) -> Result<(), DecodeError> {
        let Some(src) = src else {
            return dst.scan_hstore(None);
        };
        span!("hstore_scan", format = ?self.format, len = src.len());
        let hstore = match self.format {
            PgFormat::Text => text::parse(&ByteStr::from_utf8(src)?)?,
            PgFormat::Binary => binary::read(src)?,
        };
        verbose!(pairs = hstore.len(), "hstore scanned");
        dst.scan_hstore(Some(hstore))
    }
}

impl<T: ?Sized> Clone for ScanPlan<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: ?Sized> Copy for ScanPlan<T> { }

impl<T: ?Sized> fmt::Debug for ScanPlan<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScanPlan")
            .field("format", &self.format)
            .field("target", &std::any::type_name::<T>())
            .finish()
    }
}

/// Whether encoded value is `NULL`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IsNull {
    /// Value is `NULL`, nothing is written.
    Yes,
    /// Value is written.
    No,
}

/// Postgres encoded hstore value.
#[derive(Debug, Clone)]
pub struct Encoded {
    value: Option<Bytes>,
    oid: Oid,
    format: PgFormat,
}

impl Encoded {
    /// Returns hstore [`Oid`].
    pub const fn oid(&self) -> Oid {
        self.oid
    }

    /// Returns encoded format.
    pub const fn format(&self) -> PgFormat {
        self.format
    }

    /// Return `true` if value is NULL.
    pub const fn is_null(&self) -> bool {
        self.value.is_none()
    }

    /// Extract the inner bytes as slice.
    ///
    /// Returns [`None`] if value is `NULL`.
    pub fn as_slice(&self) -> Option<&[u8]> {
        self.value.as_deref()
    }

    /// Consume self into the inner [`Bytes`].
    ///
    /// Returns [`None`] if value is `NULL`.
    pub fn into_value(self) -> Option<Bytes> {
        self.value
    }

    /// The length of the parameter value, in bytes.
    ///
    /// Can be zero. As a special case, -1 indicates a NULL parameter value.
    pub fn size(&self) -> Result<i32, EncodeError> {
        use crate::ext::UsizeExt;
        match &self.value {
            Some(value) => value.len().to_i32(),
            None => Ok(-1),
        }
    }
}

// ===== Traits =====

/// A type that can produce an hstore to encode.
pub trait HstoreValuer {
    /// Iterator of pairs.
    type Pairs<'a>: ExactSizeIterator<Item = (&'a str, Option<&'a str>)>
    where
        Self: 'a;

    /// Returns pairs to encode, [`None`] if value is `NULL`.
    fn hstore_value(&self) -> Option<Self::Pairs<'_>>;
}

/// A type that can be constructed from decoded hstore.
pub trait HstoreScanner {
    /// String type to decode into.
    type Str: HstoreStr;

    /// Store decoded hstore, `value` is [`None`] if it is `NULL`.
    fn scan_hstore(&mut self, value: Option<Hstore<Self::Str>>) -> Result<(), DecodeError>;
}

impl<S: HstoreStr> HstoreValuer for Hstore<S> {
    type Pairs<'a> = Iter<'a, S, S> where Self: 'a;

    fn hstore_value(&self) -> Option<Self::Pairs<'_>> {
        Some(self.iter())
    }
}

impl HstoreValuer for HashMap<String, Option<String>> {
    type Pairs<'a> = Iter<'a, String, String>;

    fn hstore_value(&self) -> Option<Self::Pairs<'_>> {
        Some(Iter::new(self.iter()))
    }
}

impl<T: HstoreValuer> HstoreValuer for Option<T> {
    type Pairs<'a> = T::Pairs<'a> where Self: 'a;

    fn hstore_value(&self) -> Option<Self::Pairs<'_>> {
        self.as_ref()?.hstore_value()
    }
}

impl<S: HstoreStr> HstoreScanner for Hstore<S> {
    type Str = S;

    fn scan_hstore(&mut self, value: Option<Hstore<S>>) -> Result<(), DecodeError> {
        *self = value.ok_or(DecodeError::Null)?;
        Ok(())
    }
}

impl<S: HstoreStr> HstoreScanner for Option<Hstore<S>> {
    type Str = S;

    fn scan_hstore(&mut self, value: Option<Hstore<S>>) -> Result<(), DecodeError> {
        *self = value;
        Ok(())
    }
}

impl HstoreScanner for HashMap<String, Option<String>> {
    type Str = String;

    fn scan_hstore(&mut self, value: Option<Hstore<String>>) -> Result<(), DecodeError> {
        *self = value.ok_or(DecodeError::Null)?.into_inner();
        Ok(())
    }
}

impl HstoreScanner for Option<HashMap<String, Option<String>>> {
    type Str = String;

    fn scan_hstore(&mut self, value: Option<Hstore<String>>) -> Result<(), DecodeError> {
        *self = value.map(Hstore::into_inner);
        Ok(())
    }
}
