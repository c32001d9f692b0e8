//! Resolving and registering the hstore [`Oid`].
//!
//! `hstore` is an extension type, its oid is assigned when the extension is
//! created and differs between databases. The oid have to be resolved per
//! database before the codec can be registered.
use std::{collections::HashMap, convert::Infallible, future::Ready};

use crate::{
    Result,
    codec::HstoreCodec,
    error::{Error, ErrorKind, HstoreNotInstalled},
    postgres::{HSTORE_TYPE_NAME, Oid},
};

/// Query which returns the oid of type named by the first parameter.
pub const TYPE_OID_SQL: &str = "select oid from pg_type where typname = $1";

/// A type that can lookup postgres type oid by name, e.g. database connection.
pub trait TypeLookup {
    /// Lookup failure.
    type Error: Into<Box<dyn std::error::Error + Send + Sync>>;

    /// Future that resolve to the type oid, [`None`] if the type does not exist.
    type Future: Future<Output = Result<Option<Oid>, Self::Error>>;

    /// Lookup type oid by name, see [`TYPE_OID_SQL`].
    fn type_oid(self, name: &'static str) -> Self::Future;
}

/// A type that can bind a codec to a type oid, e.g. connection type map.
pub trait TypeRegistry {
    /// Register `codec` for type `name` with the given `oid`.
    fn register_type(&mut self, name: &'static str, oid: Oid, codec: HstoreCodec);
}

/// Lookup from already known type oids.
impl TypeLookup for &HashMap<String, Oid> {
    type Error = Infallible;

    type Future = Ready<Result<Option<Oid>, Infallible>>;

    fn type_oid(self, name: &'static str) -> Self::Future {
        std::future::ready(Ok(self.get(name).copied()))
    }
}

/// Codecs by oid.
impl TypeRegistry for HashMap<Oid, HstoreCodec> {
    fn register_type(&mut self, _: &'static str, oid: Oid, codec: HstoreCodec) {
        self.insert(oid, codec);
    }
}

/// Resolve the hstore [`Oid`].
///
/// Returns [`HstoreNotInstalled`] error if the type does not exist.
pub async fn query_hstore_oid<L: TypeLookup>(lookup: L) -> Result<Oid> {
    match lookup.type_oid(HSTORE_TYPE_NAME).await {
        Ok(Some(oid)) => Ok(oid),
        Ok(None) => Err(HstoreNotInstalled.into()),
        Err(err) => Err(Error::from(ErrorKind::Lookup(err.into())).context("query hstore oid")),
    }
}

/// Resolve the hstore [`Oid`] and register [`HstoreCodec`] for it.
pub async fn register_hstore<L, R>(lookup: L, registry: &mut R) -> Result<HstoreCodec>
where
    L: TypeLookup,
    R: TypeRegistry + ?Sized,
{
    let oid = query_hstore_oid(lookup).await?;
    let codec = HstoreCodec::new(oid);
    registry.register_type(HSTORE_TYPE_NAME, oid, codec);

    #[cfg(feature = "log")]
    log::debug!("registered {HSTORE_TYPE_NAME} codec with oid {oid}");

    Ok(codec)
}

#[cfg(test)]
mod test {
    use super::*;
    use std::{fmt, future::Ready};

    struct Failing;

    #[derive(Debug)]
    struct ConnectionClosed;

    impl std::error::Error for ConnectionClosed { }

    impl fmt::Display for ConnectionClosed {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("connection closed")
        }
    }

    impl TypeLookup for Failing {
        type Error = ConnectionClosed;

        type Future = Ready<Result<Option<Oid>, ConnectionClosed>>;

        fn type_oid(self, _: &'static str) -> Self::Future {
            std::future::ready(Err(ConnectionClosed))
        }
    }

    #[tokio::test]
    async fn resolve_oid() {
        let types = HashMap::from([(String::from("hstore"), 16_400)]);
        assert_eq!(query_hstore_oid(&types).await.unwrap(), 16_400);
    }

    #[tokio::test]
    async fn not_installed() {
        let types = HashMap::from([(String::from("text"), 25)]);
        let err = query_hstore_oid(&types).await.unwrap_err();
        assert!(err.is_not_installed());
        assert!(matches!(err.kind(), ErrorKind::NotInstalled(HstoreNotInstalled)));
    }

    #[tokio::test]
    async fn lookup_failure() {
        let err = query_hstore_oid(Failing).await.unwrap_err();
        assert!(!err.is_not_installed());
        assert!(matches!(err.kind(), ErrorKind::Lookup(_)));
        assert!(err.to_string().starts_with("query hstore oid: failed to lookup hstore oid, connection closed"));
    }

    #[tokio::test]
    async fn register() {
        let types = HashMap::from([(String::from("hstore"), 16_400)]);
        let mut registry = HashMap::<Oid, HstoreCodec>::new();
        let codec = register_hstore(&types, &mut registry).await.unwrap();
        assert_eq!(codec.oid(), 16_400);
        assert_eq!(registry.get(&16_400), Some(&codec));

        let mut registry = HashMap::<Oid, HstoreCodec>::new();
        let err = register_hstore(&HashMap::<String, Oid>::new(), &mut registry).await.unwrap_err();
        assert!(err.is_not_installed());
        assert!(registry.is_empty());
    }
}
