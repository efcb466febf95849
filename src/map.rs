// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Hashed key/value container that remembers insertion order.
//!
//! Like [`Tree`](crate::Tree), a [`Map`] is primarily a payload kind:
//! deep copy, teardown, and structural equality are the contracts that
//! matter. Lookup goes through a hash index; iteration and equality follow
//! insertion order, which keeps both deterministic.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::list::KeyTagError;
use crate::types::Tag;
use crate::value::Value;

/// An insertion-ordered hash map from tagged keys to tagged values.
#[derive(Debug, Clone)]
pub struct Map {
    key_tag: Tag,
    /// Insertion order; the source of truth for iteration and equality.
    entries: Vec<(Value, Value)>,
    /// Hash index over `entries` positions.
    index: HashMap<Value, usize>,
}

impl Map {
    pub fn new(key_tag: Tag) -> Self {
        Map {
            key_tag,
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }

    #[inline]
    pub fn key_tag(&self) -> Tag {
        self.key_tag
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Insert a key/value pair, replacing (and returning) any value already
    /// stored under an equal key. Same tag gate as keyed list insertion.
    pub fn insert<K, V>(&mut self, key: K, value: V) -> Result<Option<Value>, KeyTagError>
    where
        K: Into<Value>,
        V: Into<Value>,
    {
        let key = key.into();
        let found = key.tag();
        if found != self.key_tag {
            return Err(KeyTagError {
                expected: self.key_tag,
                found,
            });
        }
        let value = value.into();
        match self.index.get(&key).copied() {
            Some(position) => {
                let previous = std::mem::replace(&mut self.entries[position].1, value);
                Ok(Some(previous))
            }
            None => {
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push((key, value));
                Ok(None)
            }
        }
    }

    pub fn get(&self, key: &Value) -> Option<&Value> {
        let position = *self.index.get(key)?;
        Some(&self.entries[position].1)
    }

    pub fn contains_key(&self, key: &Value) -> bool {
        self.index.contains_key(key)
    }

    /// Remove an entry, preserving the order of the rest.
    pub fn remove(&mut self, key: &Value) -> Option<Value> {
        let position = self.index.remove(key)?;
        let (_, value) = self.entries.remove(position);
        // Entries after the removed one shifted left by one.
        for entry in self.index.values_mut() {
            if *entry > position {
                *entry -= 1;
            }
        }
        Some(value)
    }

    /// Iterate entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&Value, &Value)> {
        self.entries.iter().map(|(key, value)| (key, value))
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.index.clear();
    }

    /// Total order over maps: key tag, then entries in insertion order,
    /// then length.
    pub fn total_cmp(&self, other: &Map) -> Ordering {
        match self.key_tag.sort_key().cmp(&other.key_tag.sort_key()) {
            Ordering::Equal => {}
            unequal => return unequal,
        }
        for ((key_a, value_a), (key_b, value_b)) in self.entries.iter().zip(&other.entries) {
            match key_a.total_cmp(key_b) {
                Ordering::Equal => {}
                unequal => return unequal,
            }
            match value_a.total_cmp(value_b) {
                Ordering::Equal => {}
                unequal => return unequal,
            }
        }
        self.len().cmp(&other.len())
    }
}

impl PartialEq for Map {
    fn eq(&self, other: &Self) -> bool {
        self.key_tag == other.key_tag && self.entries == other.entries
    }
}

impl Eq for Map {}

impl Hash for Map {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key_tag.hash(state);
        state.write_usize(self.len());
        for (key, value) in &self.entries {
            key.hash(state);
            value.hash(state);
        }
    }
}

impl fmt::Display for Map {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (position, (key, value)) in self.iter().enumerate() {
            if position > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}={}", key, value)?;
        }
        f.write_str("}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Kind;

    #[test]
    fn lookup_and_insertion_order_iteration() {
        let mut map = Map::new(Tag::owned(Kind::Str));
        map.insert("z", 26i32).unwrap();
        map.insert("a", 1i32).unwrap();

        assert_eq!(map.get(&Value::from("z")), Some(&Value::from(26i32)));
        let keys: Vec<_> = map
            .iter()
            .map(|(key, _)| key.as_str().unwrap().to_owned())
            .collect();
        assert_eq!(keys, ["z", "a"], "iteration follows insertion order");
    }

    #[test]
    fn remove_keeps_index_consistent() {
        let mut map = Map::new(Tag::owned(Kind::Str));
        map.insert("a", 1i32).unwrap();
        map.insert("b", 2i32).unwrap();
        map.insert("c", 3i32).unwrap();

        assert_eq!(map.remove(&Value::from("a")), Some(Value::from(1i32)));
        assert!(!map.contains_key(&Value::from("a")));
        assert_eq!(map.get(&Value::from("b")), Some(&Value::from(2i32)));
        assert_eq!(map.get(&Value::from("c")), Some(&Value::from(3i32)));
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn gate_applies_to_map_keys() {
        let mut map = Map::new(Tag::owned(Kind::Str));
        let error = map.insert(1i32, "one").unwrap_err();
        assert_eq!(error.found, Tag::owned(Kind::I32));
        assert!(map.is_empty());
    }

    #[test]
    fn replacement_returns_previous_value() {
        let mut map = Map::new(Tag::owned(Kind::Str));
        assert_eq!(map.insert("k", 1i32), Ok(None));
        assert_eq!(map.insert("k", 2i32), Ok(Some(Value::from(1i32))));
        assert_eq!(map.len(), 1);
    }
}
