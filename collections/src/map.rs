// Copyright 2024 Persistent Collections Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use std::hash::Hash;
use std::rc::Rc;

use imm_bitops::{next_owner_id, HashAlgorithm, OwnerId, SipHashAlgorithm};
use imm_hamt_trie::{Hamt, TransientHamt};
use log::trace;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map as JsonMap, Value};

use crate::error::Error;

/// A persistent, unordered key-value mapping.
///
/// Backed directly by [`imm_hamt_trie::Hamt`]. The optional `default`
/// callback is per-value configuration, carried on the value itself rather
/// than globally: it is consulted by [`Map::fetch_with`]/[`Map::fetch_or`]-style
/// lookups and never inserts on its own.
#[derive(Clone)]
pub struct Map<K, V, H = SipHashAlgorithm> {
    root: Hamt<K, V, H>,
    default: Option<Rc<dyn Fn(&K) -> V>>,
}

impl<K, V, H: HashAlgorithm> Map<K, V, H> {
    pub fn empty() -> Self {
        Map {
            root: Hamt::empty(),
            default: None,
        }
    }

    pub fn empty_with_default<F: Fn(&K) -> V + 'static>(default: F) -> Self {
        Map {
            root: Hamt::empty(),
            default: Some(Rc::new(default)),
        }
    }

    pub fn size(&self) -> usize {
        self.root.size()
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }
}

impl<K: Eq + Clone + Hash, V: Clone, H: HashAlgorithm> Map<K, V, H> {
    pub fn from_pairs<I: IntoIterator<Item = (K, V)>>(pairs: I) -> Self {
        let mut root = Hamt::empty();
        for (k, v) in pairs {
            root = root.set(k, v);
        }
        Map {
            root,
            default: None,
        }
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        self.root.get(key)
    }

    pub fn get_opt(&self, key: &K) -> Option<&V> {
        self.get(key)
    }

    pub fn fetch(&self, key: &K) -> Result<&V, Error> {
        self.root.fetch(key).map_err(Error::from)
    }

    /// Falls back to `default` when present, else errors with `KeyNotFound`.
    /// The fallback never inserts; it only returns a value to the caller.
    pub fn fetch_or(&self, key: &K, fallback: V) -> V {
        self.get(key).cloned().unwrap_or(fallback)
    }

    pub fn fetch_with<F: FnOnce() -> V>(&self, key: &K, fallback: F) -> V {
        self.get(key).cloned().unwrap_or_else(fallback)
    }

    /// Looks the key up via the value's own default callback, if any was
    /// configured via [`Map::empty_with_default`].
    pub fn fetch_default(&self, key: &K) -> Option<V> {
        match self.get(key) {
            Some(v) => Some(v.clone()),
            None => self.default.as_ref().map(|f| f(key)),
        }
    }

    pub fn has_key(&self, key: &K) -> bool {
        self.root.contains_key(key)
    }

    pub fn set(&self, key: K, value: V) -> Self {
        Map {
            root: self.root.set(key, value),
            default: self.default.clone(),
        }
    }

    pub fn delete(&self, key: &K) -> Result<Self, Error> {
        let root = self.root.delete(key).map_err(Error::from)?;
        Ok(Map {
            root,
            default: self.default.clone(),
        })
    }

    /// Right-biased union: entries in `other` win on key collision.
    pub fn merge(&self, other: &Self) -> Self {
        let mut root = self.root.clone();
        other.for_each(|k, v| {
            root = root.set(k.clone(), v.clone());
        });
        Map {
            root,
            default: self.default.clone(),
        }
    }

    pub fn merge_native<I: IntoIterator<Item = (K, V)>>(&self, pairs: I) -> Self {
        let mut root = self.root.clone();
        for (k, v) in pairs {
            root = root.set(k, v);
        }
        Map {
            root,
            default: self.default.clone(),
        }
    }

    pub fn each<F: FnMut(&K, &V)>(&self, mut f: F) {
        self.root.for_each(|k, v| f(k, v))
    }

    pub fn for_each<F: FnMut(&K, &V)>(&self, f: F) {
        self.each(f)
    }

    pub fn each_key<F: FnMut(&K)>(&self, mut f: F) {
        self.root.for_each(|k, _| f(k))
    }

    pub fn each_value<F: FnMut(&V)>(&self, mut f: F) {
        self.root.for_each(|_, v| f(v))
    }

    pub fn keys(&self) -> Vec<K> {
        let mut out = Vec::with_capacity(self.size());
        self.each_key(|k| out.push(k.clone()));
        out
    }

    pub fn values(&self) -> Vec<V> {
        let mut out = Vec::with_capacity(self.size());
        self.each_value(|v| out.push(v.clone()));
        out
    }

    pub fn iter(&self) -> imm_hamt_trie::Iter<'_, K, V> {
        self.root.iter()
    }

    pub fn to_transient(&self) -> Transient<K, V, H> {
        let owner = next_owner_id();
        trace!("spawning map transient with owner {owner:?}");
        Transient {
            state: TransientState::Active(self.root.transient(owner)),
            default: self.default.clone(),
            owner,
        }
    }

    pub fn transient<F: FnOnce(&mut Transient<K, V, H>)>(&self, f: F) -> Self {
        let mut t = self.to_transient();
        f(&mut t);
        trace!("persisting map transient with owner {:?}", t.owner);
        t.persist()
            .expect("the closure given to Map::transient must not outlive its own persist")
    }
}

impl<K: Eq + Hash, V: PartialEq, H: HashAlgorithm> PartialEq for Map<K, V, H> {
    fn eq(&self, other: &Self) -> bool {
        if self.size() != other.size() {
            return false;
        }
        let mut equal = true;
        self.root.for_each(|k, v| {
            if other.get(k) != Some(v) {
                equal = false;
            }
        });
        equal
    }
}

impl<K: Eq + Hash, V: Eq, H: HashAlgorithm> Eq for Map<K, V, H> {}

impl<K: Eq + Hash, V: Hash, H: HashAlgorithm> Hash for Map<K, V, H> {
    fn hash<Hs: std::hash::Hasher>(&self, state: &mut Hs) {
        // Order-independent: fold each pair's hash with a commutative op so
        // equal maps hash equal regardless of their internal slot order.
        let mut acc: u64 = 0;
        self.root.for_each(|k, v| {
            let mut hasher = std::collections::hash_map::DefaultHasher::new();
            (k, v).hash(&mut hasher);
            acc ^= std::hash::Hasher::finish(&hasher);
        });
        self.size().hash(state);
        acc.hash(state);
    }
}

impl<K: Eq + Serialize, V: Serialize, H: HashAlgorithm> Map<K, V, H> {
    pub fn to_native_mapping(&self) -> Value
    where
        K: ToString,
    {
        let mut obj = JsonMap::new();
        self.root.for_each(|k, v| {
            obj.insert(
                k.to_string(),
                serde_json::to_value(v).expect("V must serialize to JSON"),
            );
        });
        Value::Object(obj)
    }

    pub fn to_textual(&self) -> String
    where
        K: ToString,
    {
        format!("Map {}", self.to_native_mapping())
    }
}

impl<K: Eq + Clone + Hash + From<String>, V: Clone + DeserializeOwned, H: HashAlgorithm>
    Map<K, V, H>
{
    pub fn from_native_mapping(value: &Value) -> Result<Self, Error> {
        let obj = value
            .as_object()
            .ok_or_else(|| Error::BadArgument("expected a JSON object".to_string()))?;
        let mut root = Hamt::empty();
        for (k, v) in obj {
            let value: V = serde_json::from_value(v.clone())
                .map_err(|err| Error::BadArgument(err.to_string()))?;
            root = root.set(K::from(k.clone()), value);
        }
        Ok(Map {
            root,
            default: None,
        })
    }
}

impl<K: Eq + Clone + Hash, V: Clone, H: HashAlgorithm> FromIterator<(K, V)> for Map<K, V, H> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Map::from_pairs(iter)
    }
}

impl<K: Eq + Clone + Hash, V: Clone, H: HashAlgorithm> Extend<(K, V)> for Map<K, V, H> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        let mut result = self.clone();
        for (k, v) in iter {
            result = result.set(k, v);
        }
        *self = result;
    }
}

enum TransientState<K, V, H> {
    Active(TransientHamt<K, V, H>),
    Consumed,
}

/// A single-owner, in-place-mutable view over a [`Map`]. Mirrors
/// [`crate::vector::Transient`]'s runtime Active/Consumed handshake so that
/// a use-after-persist fails with [`Error::InvalidTransient`] at the call
/// site, not merely at compile time.
pub struct Transient<K, V, H = SipHashAlgorithm> {
    state: TransientState<K, V, H>,
    default: Option<Rc<dyn Fn(&K) -> V>>,
    owner: OwnerId,
}

impl<K, V, H: HashAlgorithm> Transient<K, V, H> {
    pub fn size(&self) -> usize {
        match &self.state {
            TransientState::Active(root) => root.size(),
            TransientState::Consumed => 0,
        }
    }
}

impl<K: Eq + Hash, V, H: HashAlgorithm> Transient<K, V, H> {
    pub fn get(&self, key: &K) -> Result<&V, Error> {
        match &self.state {
            TransientState::Active(root) => root.get(key).ok_or(Error::KeyNotFound),
            TransientState::Consumed => Err(Error::InvalidTransient),
        }
    }

    pub fn has_key(&self, key: &K) -> bool {
        matches!(&self.state, TransientState::Active(root) if root.contains_key(key))
    }
}

impl<K: Eq + Clone + Hash, V: Clone, H: HashAlgorithm> Transient<K, V, H> {
    pub fn set(&mut self, key: K, value: V) -> Result<(), Error> {
        match &mut self.state {
            TransientState::Active(root) => {
                root.set(key, value);
                Ok(())
            }
            TransientState::Consumed => Err(Error::InvalidTransient),
        }
    }

    pub fn delete(&mut self, key: &K) -> Result<V, Error> {
        match &mut self.state {
            TransientState::Active(root) => root.delete(key).map_err(Error::from),
            TransientState::Consumed => Err(Error::InvalidTransient),
        }
    }

    pub fn persist(&mut self) -> Result<Map<K, V, H>, Error> {
        match std::mem::replace(&mut self.state, TransientState::Consumed) {
            TransientState::Active(root) => Ok(Map {
                root: root.persist(),
                default: self.default.clone(),
            }),
            TransientState::Consumed => Err(Error::InvalidTransient),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_map_has_zero_size() {
        let m: Map<String, i32> = Map::empty();
        assert_eq!(m.size(), 0);
        assert!(m.is_empty());
    }

    #[test]
    fn scenario_set_overwrite_delete() {
        let m: Map<&str, i32> = Map::empty();
        let m = m.set("foo", 1).set("bar", 2).set("foo", 3);
        assert_eq!(m.size(), 2);
        assert_eq!(m.get(&"foo"), Some(&3));
        assert_eq!(m.get(&"bar"), Some(&2));

        let m = m.delete(&"bar").unwrap();
        assert_eq!(m.size(), 1);
        assert!(!m.has_key(&"bar"));
        assert!(matches!(m.delete(&"bar"), Err(Error::KeyNotFound)));
    }

    #[test]
    fn scenario_merge() {
        let a: Map<&str, i32> = Map::from_pairs([("foo", 1), ("bar", 2)]);
        let b: Map<&str, i32> = Map::from_pairs([("foo", 100), ("qux", 5)]);
        let merged = a.merge(&b);
        let expected: Map<&str, i32> = Map::from_pairs([("foo", 100), ("bar", 2), ("qux", 5)]);
        assert_eq!(merged, expected);
        assert_eq!(a.get(&"foo"), Some(&1));
        assert_eq!(b.get(&"bar"), None);
    }

    #[test]
    fn fetch_with_lazy_fallback_does_not_insert() {
        let m: Map<&str, i32> = Map::empty();
        let mut called = false;
        let value = m.fetch_with(&"missing", || {
            called = true;
            42
        });
        assert_eq!(value, 42);
        assert!(called);
        assert!(!m.has_key(&"missing"));
    }

    #[test]
    fn default_fallback_is_consulted_on_miss_only() {
        let m: Map<String, i32> = Map::empty_with_default(|k| k.len() as i32);
        assert_eq!(m.fetch_default(&"abcd".to_string()), Some(4));
        let m = m.set("abcd".to_string(), 99);
        assert_eq!(m.fetch_default(&"abcd".to_string()), Some(99));
    }

    #[test]
    fn transient_batch_matches_persistent() {
        let m: Map<String, i32> = Map::empty();
        let m = m.transient(|t| {
            for i in 0..200 {
                t.set(format!("k{i}"), i).unwrap();
            }
        });
        assert_eq!(m.size(), 200);
        for i in 0..200 {
            assert_eq!(m.get(&format!("k{i}")), Some(&i));
        }
    }

    #[test]
    fn persisted_transient_rejects_further_mutation() {
        let m: Map<&str, i32> = Map::empty();
        let mut t = m.to_transient();
        t.set("a", 1).unwrap();
        let persisted = t.persist().unwrap();
        assert_eq!(persisted.get(&"a"), Some(&1));
        assert!(matches!(t.set("b", 2), Err(Error::InvalidTransient)));
        assert!(matches!(t.persist(), Err(Error::InvalidTransient)));
    }

    #[test]
    fn textual_round_trip() {
        let m: Map<String, i32> = Map::from_pairs([("a".to_string(), 1), ("b".to_string(), 2)]);
        let native = m.to_native_mapping();
        let roundtripped: Map<String, i32> = Map::from_native_mapping(&native).unwrap();
        assert_eq!(m, roundtripped);
    }

    #[test]
    fn keys_and_values_cover_every_entry() {
        let m: Map<&str, i32> = Map::from_pairs([("a", 1), ("b", 2), ("c", 3)]);
        let mut keys = m.keys();
        keys.sort();
        assert_eq!(keys, vec!["a", "b", "c"]);
        let mut values = m.values();
        values.sort();
        assert_eq!(values, vec![1, 2, 3]);
    }

    #[quickcheck_macros::quickcheck]
    fn set_then_get_roundtrips(key: String, value: i32) -> bool {
        let m: Map<String, i32> = Map::empty();
        let m = m.set(key.clone(), value);
        m.get(&key) == Some(&value)
    }

    #[quickcheck_macros::quickcheck]
    fn delete_after_set_restores_prior_map(
        pairs: Vec<(String, i32)>,
        key: String,
        value: i32,
    ) -> quickcheck::TestResult {
        use std::collections::HashMap;
        let mut expected: HashMap<String, i32> = HashMap::new();
        let mut m: Map<String, i32> = Map::empty();
        for (k, v) in pairs {
            expected.insert(k.clone(), v);
            m = m.set(k, v);
        }
        if expected.contains_key(&key) {
            return quickcheck::TestResult::discard();
        }
        let with_key = m.set(key.clone(), value);
        let restored = with_key.delete(&key).unwrap();
        if restored.size() != m.size() {
            return quickcheck::TestResult::failed();
        }
        let ok = expected.iter().all(|(k, v)| restored.get(k) == Some(v));
        quickcheck::TestResult::from_bool(ok)
    }
}
