
/// Postgres object identifier.
///
/// The oid type is implemented as an unsigned four-byte integer.
///
/// <https://www.postgresql.org/docs/current/datatype-oid.html>
pub type Oid = u32;

/// `hstore` type name in `pg_type`.
///
/// `hstore` is an extension type, so unlike builtin types its oid is assigned
/// when the extension is created and differs between databases.
pub const HSTORE_TYPE_NAME: &str = "hstore";
