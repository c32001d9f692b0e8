//! Conversion between [`Hstore`] representations.
//!
//! `NULL` values stay `NULL` and empty values stay empty in every direction.
use std::collections::HashMap;

use super::{Hstore, HstoreCompat};
use crate::common::ByteStr;

impl From<Hstore<ByteStr>> for HstoreCompat {
    fn from(value: Hstore<ByteStr>) -> Self {
        let mut map = HashMap::with_capacity(value.len());
        for (key, value) in value {
            map.insert(String::from(key), value.map(String::from));
        }
        Self { map }
    }
}

impl From<HstoreCompat> for Hstore<ByteStr> {
    fn from(value: HstoreCompat) -> Self {
        let mut map = HashMap::with_capacity(value.len());
        for (key, value) in value {
            map.insert(ByteStr::from(key), value.map(ByteStr::from));
        }
        Self { map }
    }
}

impl From<HashMap<String, Option<String>>> for HstoreCompat {
    fn from(map: HashMap<String, Option<String>>) -> Self {
        Self { map }
    }
}

impl From<HstoreCompat> for HashMap<String, Option<String>> {
    fn from(value: HstoreCompat) -> Self {
        value.map
    }
}

impl From<HashMap<String, Option<String>>> for Hstore<ByteStr> {
    fn from(map: HashMap<String, Option<String>>) -> Self {
        HstoreCompat::from(map).into()
    }
}

impl From<Hstore<ByteStr>> for HashMap<String, Option<String>> {
    fn from(value: Hstore<ByteStr>) -> Self {
        HstoreCompat::from(value).map
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn sample() -> Hstore {
        let mut h = Hstore::new();
        h.insert("present", Some("value"));
        h.insert("empty", Some(""));
        h.insert_null("null");
        h
    }

    #[test]
    fn compact_to_compat_and_back() {
        let compat = HstoreCompat::from(sample());
        assert_eq!(compat.get("present"), Some(Some("value")));
        assert_eq!(compat.get("empty"), Some(Some("")));
        assert_eq!(compat.get("null"), Some(None));

        assert_eq!(Hstore::<ByteStr>::from(compat), sample());
    }

    #[test]
    fn std_map_roundtrip() {
        let map = HashMap::<String, Option<String>>::from(sample());
        assert_eq!(map.get("empty"), Some(&Some(String::new())));
        assert_eq!(map.get("null"), Some(&None));
        assert_eq!(Hstore::<ByteStr>::from(map), sample());
    }

    #[test]
    fn empty_stays_empty() {
        let compat = HstoreCompat::from(Hstore::<ByteStr>::new());
        assert!(compat.is_empty());
        assert!(Hstore::<ByteStr>::from(compat).is_empty());
    }
}
