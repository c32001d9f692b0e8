use std::collections::HashMap;
use postro_hstore::{HstoreCodec, Oid, Result};

/// Resolve hstore oid from a known type table, as a connection would with
/// [`TYPE_OID_SQL`][postro_hstore::oid::TYPE_OID_SQL].
pub async fn main() -> Result<HstoreCodec> {
    let types = HashMap::from([
        (String::from("text"), 25),
        (String::from("hstore"), 16_400),
    ]);
    let mut registry = HashMap::<Oid, HstoreCodec>::new();

    let missing = postro_hstore::query_hstore_oid(&HashMap::<String, Oid>::new()).await;
    if let Err(err) = missing {
        assert!(err.is_not_installed());
        tracing::info!("{err}");
    }

    let codec = postro_hstore::register_hstore(&types, &mut registry).await?;
    tracing::info!(oid = codec.oid(), "hstore registered");

    Ok(codec)
}
