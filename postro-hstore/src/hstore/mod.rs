//! The [`Hstore`] mapping.
//!
//! Hstore is a mapping from string key to nullable string value. The whole
//! column can also be `NULL`, which is represented as `Option<Hstore>` rather
//! than an empty [`Hstore`].
//!
//! The string type is chosen by [`HstoreStr`]:
//!
//! - [`ByteStr`], every key and value is a view into the one buffer it was
//!   decoded from, no allocation per string.
//! - [`String`], every key and value is owned, compatible with the common
//!   `HashMap<String, Option<String>>` representation, see [`HstoreCompat`].
use bytes::Bytes;
use std::{
    borrow::Borrow,
    collections::{HashMap, hash_map},
    fmt,
    hash::Hash,
    str::FromStr,
};

use crate::{common::ByteStr, text};

mod compat;
#[cfg(feature = "serde")]
mod serialize;

/// Hstore with owned [`String`] keys and values.
pub type HstoreCompat = Hstore<String>;

/// String type that can be stored in [`Hstore`].
pub trait HstoreStr: AsRef<str> + Borrow<str> + Clone + Eq + Hash + Sized {
    /// Create string from `subset` which is contained in `buffer`.
    fn from_shared(buffer: &Bytes, subset: &str) -> Self;

    /// Create string from an already allocated string.
    fn from_owned(string: String) -> Self;
}

impl HstoreStr for ByteStr {
    fn from_shared(buffer: &Bytes, subset: &str) -> Self {
        ByteStr::slice_bytes_ref(buffer, subset)
    }

    fn from_owned(string: String) -> Self {
        ByteStr::from(string)
    }
}

impl HstoreStr for String {
    fn from_shared(_: &Bytes, subset: &str) -> Self {
        String::from(subset)
    }

    fn from_owned(string: String) -> Self {
        string
    }
}

/// Postgres `hstore` value.
///
/// Equality ignores pair order.
#[derive(Clone)]
pub struct Hstore<S = ByteStr> {
    map: HashMap<S, Option<S>>,
}

impl<S: HstoreStr> Hstore<S> {
    /// Create new empty hstore.
    pub fn new() -> Self {
        Self { map: HashMap::new() }
    }

    /// Create new empty hstore with at least the specified capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self { map: HashMap::with_capacity(capacity) }
    }

    /// Returns the number of pairs.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Returns `true` if hstore contains no pairs.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Returns the value of given key.
    ///
    /// Returns `Some(None)` if the key exists with `NULL` value.
    pub fn get(&self, key: &str) -> Option<Option<&str>> {
        self.map.get(key).map(|v|v.as_ref().map(AsRef::as_ref))
    }

    /// Returns `true` if hstore contains the given key.
    pub fn contains_key(&self, key: &str) -> bool {
        self.map.contains_key(key)
    }

    /// Insert a pair, replacing and returning the previous value of the key.
    pub fn insert<K, V>(&mut self, key: K, value: Option<V>) -> Option<Option<S>>
    where
        K: Into<S>,
        V: Into<S>,
    {
        self.map.insert(key.into(), value.map(Into::into))
    }

    /// Insert a key with `NULL` value.
    pub fn insert_null<K: Into<S>>(&mut self, key: K) -> Option<Option<S>> {
        self.map.insert(key.into(), None)
    }

    /// Remove a pair, returning its value.
    pub fn remove(&mut self, key: &str) -> Option<Option<S>> {
        self.map.remove(key)
    }

    /// Returns iterator of pairs, in arbitrary order.
    pub fn iter(&self) -> Iter<'_, S, S> {
        Iter::new(self.map.iter())
    }

    /// Returns iterator of keys, in arbitrary order.
    pub fn keys(&self) -> impl ExactSizeIterator<Item = &str> {
        self.map.keys().map(AsRef::as_ref)
    }

    /// Returns the underlying map.
    pub fn as_map(&self) -> &HashMap<S, Option<S>> {
        &self.map
    }

    /// Consume self into the underlying map.
    pub fn into_inner(self) -> HashMap<S, Option<S>> {
        self.map
    }

    /// Insert an already converted pair, used by decoders.
    pub(crate) fn put(&mut self, key: S, value: Option<S>) {
        self.map.insert(key, value);
    }
}

impl<S: HstoreStr> Default for Hstore<S> {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse hstore text representation.
///
/// The input is copied once, then every unescaped string is a view into that copy.
impl<S: HstoreStr> FromStr for Hstore<S> {
    type Err = text::ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        text::parse(&ByteStr::copy_from_str(s))
    }
}

impl<S: HstoreStr> PartialEq for Hstore<S> {
    fn eq(&self, other: &Self) -> bool {
        self.map == other.map
    }
}

impl<S: HstoreStr> Eq for Hstore<S> { }

impl<S: HstoreStr> fmt::Debug for Hstore<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut dbg = f.debug_map();
        for (key, value) in self.iter() {
            dbg.key(&key);
            match value {
                Some(value) => dbg.value(&value),
                None => dbg.value(&format_args!("NULL")),
            };
        }
        dbg.finish()
    }
}

impl<S, K, V> FromIterator<(K, Option<V>)> for Hstore<S>
where
    S: HstoreStr,
    K: Into<S>,
    V: Into<S>,
{
    fn from_iter<I: IntoIterator<Item = (K, Option<V>)>>(iter: I) -> Self {
        let mut me = Self::new();
        me.extend(iter);
        me
    }
}

impl<S, K, V> Extend<(K, Option<V>)> for Hstore<S>
where
    S: HstoreStr,
    K: Into<S>,
    V: Into<S>,
{
    fn extend<I: IntoIterator<Item = (K, Option<V>)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl<S> IntoIterator for Hstore<S> {
    type Item = (S, Option<S>);

    type IntoIter = hash_map::IntoIter<S, Option<S>>;

    fn into_iter(self) -> Self::IntoIter {
        self.map.into_iter()
    }
}

impl<'a, S: HstoreStr> IntoIterator for &'a Hstore<S> {
    type Item = (&'a str, Option<&'a str>);

    type IntoIter = Iter<'a, S, S>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator of hstore pairs as str.
#[derive(Clone)]
pub struct Iter<'a, K, V> {
    iter: hash_map::Iter<'a, K, Option<V>>,
}

impl<'a, K, V> Iter<'a, K, V> {
    pub(crate) fn new(iter: hash_map::Iter<'a, K, Option<V>>) -> Self {
        Self { iter }
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V>
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    type Item = (&'a str, Option<&'a str>);

    fn next(&mut self) -> Option<Self::Item> {
        let (key, value) = self.iter.next()?;
        Some((key.as_ref(), value.as_ref().map(AsRef::as_ref)))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.iter.size_hint()
    }
}

impl<K: AsRef<str>, V: AsRef<str>> ExactSizeIterator for Iter<'_, K, V> { }

impl<K, V> fmt::Debug for Iter<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Iter").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn null_value_is_not_missing_key() {
        let mut h = Hstore::<ByteStr>::new();
        h.insert("a", Some("100"));
        h.insert_null("b");

        assert_eq!(h.len(), 2);
        assert_eq!(h.get("a"), Some(Some("100")));
        assert_eq!(h.get("b"), Some(None));
        assert_eq!(h.get("c"), None);
        assert!(h.contains_key("b"));
    }

    #[test]
    fn insert_replaces() {
        let mut h = HstoreCompat::new();
        assert_eq!(h.insert("k", Some("1")), None);
        assert_eq!(h.insert("k", Some("2")), Some(Some(String::from("1"))));
        assert_eq!(h.get("k"), Some(Some("2")));
        assert_eq!(h.remove("k"), Some(Some(String::from("2"))));
        assert!(h.is_empty());
    }

    #[test]
    fn equality_ignores_order() {
        let a: HstoreCompat = [("x", Some("1")), ("y", None)].into_iter().collect();
        let b: HstoreCompat = [("y", None), ("x", Some("1"))].into_iter().collect();
        assert_eq!(a, b);

        let c: HstoreCompat = [("x", Some("1")), ("y", Some(""))].into_iter().collect();
        assert_ne!(a, c);
    }

    #[test]
    fn from_str() {
        let h: HstoreCompat = r#""a"=>"1", "b"=>NULL"#.parse().unwrap();
        assert_eq!(h.get("a"), Some(Some("1")));
        assert_eq!(h.get("b"), Some(None));
        assert!("\"a\"=>".parse::<Hstore>().is_err());
    }

    #[test]
    fn debug_shows_null() {
        let h: Hstore = [("b", None::<&'static str>)].into_iter().collect();
        assert_eq!(format!("{h:?}"), r#"{"b": NULL}"#);
    }
}
