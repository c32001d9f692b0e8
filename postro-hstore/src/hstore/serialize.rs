//! Serialized as a map of string to optional string.
use serde::{
    Deserialize, Deserializer, Serialize, Serializer,
    de::{MapAccess, Visitor},
    ser::SerializeMap,
};
use std::{fmt, marker::PhantomData};

use super::{Hstore, HstoreStr};

impl<S: HstoreStr> Serialize for Hstore<S> {
    fn serialize<Se: Serializer>(&self, serializer: Se) -> Result<Se::Ok, Se::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (key, value) in self {
            map.serialize_entry(key, &value)?;
        }
        map.end()
    }
}

impl<'de, S: HstoreStr> Deserialize<'de> for Hstore<S> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(HstoreVisitor(PhantomData))
    }
}

struct HstoreVisitor<S>(PhantomData<S>);

impl<'de, S: HstoreStr> Visitor<'de> for HstoreVisitor<S> {
    type Value = Hstore<S>;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a map of string to optional string")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut hstore = Hstore::with_capacity(access.size_hint().unwrap_or(0).min(4096));
        while let Some((key, value)) = access.next_entry::<String, Option<String>>()? {
            hstore.put(S::from_owned(key), value.map(S::from_owned));
        }
        Ok(hstore)
    }
}

#[cfg(test)]
mod test {
    use crate::hstore::{Hstore, HstoreCompat};

    #[test]
    fn json_object() {
        let h: Hstore = [("a", Some("1")), ("b", None)].into_iter().collect();
        let json = serde_json::to_value(&h).unwrap();
        assert_eq!(json, serde_json::json!({ "a": "1", "b": null }));

        let back: HstoreCompat = serde_json::from_value(json).unwrap();
        assert_eq!(back.get("a"), Some(Some("1")));
        assert_eq!(back.get("b"), Some(None));

        assert!(serde_json::from_str::<Hstore>(r#"{"a": 1}"#).is_err());
    }
}
