//! Postgres type and format identifiers.
mod pg_type;
mod pg_format;

pub use pg_type::{Oid, HSTORE_TYPE_NAME};
pub use pg_format::PgFormat;
