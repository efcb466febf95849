// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Ordered key/value container, sorted by the total value order.
//!
//! A [`Tree`] exists mostly to be stored *inside* other containers: it
//! carries the same deep-copy (`Clone`), teardown (`Drop`), and structural
//! equality contracts as every payload kind, plus a small map surface. Keys
//! pass the same exact-tag gate as list keys, so a tree only ever orders
//! keys of one kind. One value per key; inserting an existing key replaces
//! its value.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::list::KeyTagError;
use crate::types::Tag;
use crate::value::Value;

/// An ordered map from tagged keys to tagged values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tree {
    key_tag: Tag,
    /// Sorted by `Value::total_cmp` on the key.
    entries: Vec<(Value, Value)>,
}

impl Tree {
    pub fn new(key_tag: Tag) -> Self {
        Tree {
            key_tag,
            entries: Vec::new(),
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

    fn position(&self, key: &Value) -> Result<usize, usize> {
        self.entries
            .binary_search_by(|(existing, _)| existing.total_cmp(key))
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
        match self.position(&key) {
            Ok(index) => {
                let previous = std::mem::replace(&mut self.entries[index].1, value);
                Ok(Some(previous))
            }
            Err(index) => {
                self.entries.insert(index, (key, value));
                Ok(None)
            }
        }
    }

    pub fn get(&self, key: &Value) -> Option<&Value> {
        let index = self.position(key).ok()?;
        Some(&self.entries[index].1)
    }

    pub fn contains_key(&self, key: &Value) -> bool {
        self.position(key).is_ok()
    }

    pub fn remove(&mut self, key: &Value) -> Option<Value> {
        let index = self.position(key).ok()?;
        Some(self.entries.remove(index).1)
    }

    /// Smallest key's entry.
    pub fn first(&self) -> Option<(&Value, &Value)> {
        self.entries.first().map(|(key, value)| (key, value))
    }

    /// Largest key's entry.
    pub fn last(&self) -> Option<(&Value, &Value)> {
        self.entries.last().map(|(key, value)| (key, value))
    }

    /// Iterate entries in ascending key order.
    pub fn iter(&self) -> impl Iterator<Item = (&Value, &Value)> {
        self.entries.iter().map(|(key, value)| (key, value))
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Total order over trees: key tag, then entries, then length.
    pub fn total_cmp(&self, other: &Tree) -> Ordering {
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

impl Hash for Tree {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key_tag.hash(state);
        state.write_usize(self.len());
        for (key, value) in &self.entries {
            key.hash(state);
            value.hash(state);
        }
    }
}

impl fmt::Display for Tree {
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
    fn iterates_in_key_order() {
        let mut tree = Tree::new(Tag::owned(Kind::Str));
        tree.insert("banana", 2i32).unwrap();
        tree.insert("apple", 1i32).unwrap();
        tree.insert("cherry", 3i32).unwrap();

        let keys: Vec<_> = tree
            .iter()
            .map(|(key, _)| key.as_str().unwrap().to_owned())
            .collect();
        assert_eq!(keys, ["apple", "banana", "cherry"]);
        assert_eq!(tree.first().unwrap().0, &Value::from("apple"));
        assert_eq!(tree.last().unwrap().0, &Value::from("cherry"));
    }

    #[test]
    fn insert_replaces_existing_key() {
        let mut tree = Tree::new(Tag::owned(Kind::Str));
        assert_eq!(tree.insert("k", 1i32), Ok(None));
        assert_eq!(tree.insert("k", 2i32), Ok(Some(Value::from(1i32))));
        assert_eq!(tree.len(), 1);
        assert_eq!(tree.get(&Value::from("k")), Some(&Value::from(2i32)));
    }

    #[test]
    fn gate_applies_to_tree_keys() {
        let mut tree = Tree::new(Tag::owned(Kind::I32));
        let error = tree.insert("wrong", 1i32).unwrap_err();
        assert_eq!(error.expected, Tag::owned(Kind::I32));
        assert_eq!(error.found, Tag::owned(Kind::Str));
        assert!(tree.is_empty());
    }

    #[test]
    fn remove_returns_value() {
        let mut tree = Tree::new(Tag::owned(Kind::U64));
        tree.insert(4u64, "four").unwrap();
        assert!(tree.contains_key(&Value::from(4u64)));
        assert_eq!(tree.remove(&Value::from(4u64)), Some(Value::from("four")));
        assert_eq!(tree.remove(&Value::from(4u64)), None);
        assert!(!tree.contains_key(&Value::from(4u64)));
    }
}
