//! Postgres `hstore` Codec
//!
//! Text and binary codec for the `hstore` extension type, a mapping from
//! string key to nullable string value.
//!
//! # Examples
//!
//! ```
//! use postro_hstore::{Hstore, HstoreCodec, PgFormat};
//!
//! # fn app() -> postro_hstore::Result<()> {
//! let codec = HstoreCodec::new(16_400);
//!
//! let mut hstore: Hstore = Hstore::new();
//! hstore.insert("a", Some("1"));
//! hstore.insert_null("b");
//!
//! let encoded = codec.encode(PgFormat::Binary, &hstore)?;
//! let decoded = codec.decode_value(PgFormat::Binary, encoded.into_value())?;
//!
//! assert_eq!(decoded, Some(hstore));
//! # Ok(())
//! # }
//! # app().unwrap();
//! ```
//!
//! Resolving the oid:
//!
//! ```
//! use std::collections::HashMap;
//! use postro_hstore::{HstoreCodec, Oid};
//!
//! # async fn app() -> postro_hstore::Result<()> {
//! let types = HashMap::from([(String::from("hstore"), 16_400)]);
//! let mut registry = HashMap::<Oid, HstoreCodec>::new();
//!
//! let codec = postro_hstore::register_hstore(&types, &mut registry).await?;
//! assert_eq!(codec.oid(), 16_400);
//! # Ok(())
//! # }
//! ```

pub mod common;
mod ext;

// Protocol
pub mod postgres;

// Representation
pub mod hstore;
pub mod text;
pub mod binary;

// Codec
pub mod codec;
pub mod value;
pub mod oid;

mod error;


pub use common::ByteStr;
pub use postgres::{Oid, PgFormat, HSTORE_TYPE_NAME};
pub use hstore::{Hstore, HstoreCompat, HstoreStr};
pub use codec::{HstoreCodec, HstoreValuer, HstoreScanner, DecodeError, EncodeError, Encoded, IsNull};
pub use value::{SqlValue, ToSqlValue, ScanSqlValue};
#[doc(inline)]
pub use oid::{query_hstore_oid, register_hstore, TypeLookup, TypeRegistry};
pub use error::{Error, ErrorKind, HstoreNotInstalled, Result};
