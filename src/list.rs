// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The keyed, heterogeneous, doubly-linked list.
//!
//! A [`List`] is an ordered sequence of nodes, each holding an optional
//! tagged key and a tagged value. The list declares one key tag at
//! construction and enforces it on every keyed insertion by **exact** tag
//! equality - same kind, same ownership - while value tags are free to vary
//! node to node. This is the base container of the crate: [`Queue`] and
//! [`Stack`] are thin façades over it, and every container here can itself
//! appear as a value inside a node.
//!
//! Nodes live in a slot arena and link to each other by [`NodeId`], so the
//! doubly-linked structure needs no raw pointers and removal is O(1) once
//! you hold a handle. Handles are generational: a removed node's handle
//! stops resolving instead of aliasing the slot's next tenant.
//!
//! # Invariants (the stuff that breaks if you ignore it)
//!
//! - Every present key's tag equals `key_tag`. Checked at the insertion
//!   gate; everything downstream trusts it.
//! - `len` equals the number of occupied slots, and the head→tail chain
//!   visits exactly the occupied slots. [`List::validate`] re-derives this
//!   from scratch when you need proof (after decoding a blob, say).
//! - A failed insertion mutates nothing. The gate runs before any slot is
//!   touched.
//!
//! [`Queue`]: crate::Queue
//! [`Stack`]: crate::Stack

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::contracts;
use crate::types::{NodeId, Tag};
use crate::value::{cmp_opt, Value};

// =============================================================================
// ERRORS
// =============================================================================

/// Rejected insertion: the key's tag does not equal the list's declared
/// key tag.
///
/// Carries both tags so the caller can see *how* the key was wrong. A kind
/// mismatch and an ownership mismatch report identically: both make the
/// tag incompatible.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyTagError {
    pub expected: Tag,
    pub found: Tag,
}

impl fmt::Display for KeyTagError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "key tag mismatch: container expects {}, got {}",
            self.expected, self.found
        )
    }
}

impl std::error::Error for KeyTagError {}

// =============================================================================
// NODES
// =============================================================================

/// One element of a list: an optional key, a value, and sequence links.
///
/// `key` is `None` for value-only insertions (queue and stack pushes).
#[derive(Debug, Clone)]
pub struct Node {
    key: Option<Value>,
    value: Value,
    prev: Option<NodeId>,
    next: Option<NodeId>,
}

impl Node {
    #[inline]
    pub fn key(&self) -> Option<&Value> {
        self.key.as_ref()
    }

    #[inline]
    pub fn value(&self) -> &Value {
        &self.value
    }

    #[inline]
    pub fn prev(&self) -> Option<NodeId> {
        self.prev
    }

    #[inline]
    pub fn next(&self) -> Option<NodeId> {
        self.next
    }
}

#[derive(Debug, Clone)]
struct NodeSlot {
    generation: u32,
    node: Option<Node>,
}

// =============================================================================
// LIST
// =============================================================================

/// An ordered, doubly-linked sequence of tagged key/value nodes with a
/// fixed key tag.
#[derive(Debug, Clone)]
pub struct List {
    key_tag: Tag,
    slots: Vec<NodeSlot>,
    free: Vec<u32>,
    head: Option<NodeId>,
    tail: Option<NodeId>,
    len: usize,
}

impl List {
    /// Create an empty list whose keys must carry `key_tag`.
    ///
    /// The key tag is fixed for the list's whole life.
    pub fn new(key_tag: Tag) -> Self {
        List {
            key_tag,
            slots: Vec::new(),
            free: Vec::new(),
            head: None,
            tail: None,
            len: 0,
        }
    }

    #[inline]
    pub fn key_tag(&self) -> Tag {
        self.key_tag
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    // -------------------------------------------------------------------------
    // Insertion
    // -------------------------------------------------------------------------

    /// Append a key/value pair at the tail.
    ///
    /// The key's tag must equal the list's key tag exactly; on mismatch the
    /// list is left completely untouched and the error reports both tags.
    /// The value's tag is never checked - values are heterogeneous on
    /// purpose.
    ///
    /// Each successful append becomes the new tail, so a sequence of
    /// appends traverses head→tail in call order.
    pub fn add_back<K, V>(&mut self, key: K, value: V) -> Result<NodeId, KeyTagError>
    where
        K: Into<Value>,
        V: Into<Value>,
    {
        let key = key.into();
        self.admit(&key)?;
        Ok(self.link_back(Some(key), value.into()))
    }

    /// Prepend a key/value pair at the head. Same gate as [`List::add_back`].
    pub fn add_front<K, V>(&mut self, key: K, value: V) -> Result<NodeId, KeyTagError>
    where
        K: Into<Value>,
        V: Into<Value>,
    {
        let key = key.into();
        self.admit(&key)?;
        Ok(self.link_front(Some(key), value.into()))
    }

    fn admit(&self, key: &Value) -> Result<(), KeyTagError> {
        let found = key.tag();
        if found != self.key_tag {
            return Err(KeyTagError {
                expected: self.key_tag,
                found,
            });
        }
        Ok(())
    }

    /// Key-less tail insertion, used by the queue façade.
    pub(crate) fn push_back_value(&mut self, value: Value) -> NodeId {
        self.link_back(None, value)
    }

    /// Key-less head insertion, used by the stack façade.
    pub(crate) fn push_front_value(&mut self, value: Value) -> NodeId {
        self.link_front(None, value)
    }

    fn alloc(&mut self, node: Node) -> NodeId {
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.node = Some(node);
            NodeId {
                index,
                generation: slot.generation,
            }
        } else {
            let index = self.slots.len() as u32;
            self.slots.push(NodeSlot {
                generation: 0,
                node: Some(node),
            });
            NodeId {
                index,
                generation: 0,
            }
        }
    }

    fn link_back(&mut self, key: Option<Value>, value: Value) -> NodeId {
        contracts::check_key_admissible(self.key_tag, key.as_ref());
        let prev = self.tail;
        let id = self.alloc(Node {
            key,
            value,
            prev,
            next: None,
        });
        match prev {
            Some(tail) => {
                if let Some(node) = self.node_mut(tail) {
                    node.next = Some(id);
                }
            }
            None => self.head = Some(id),
        }
        self.tail = Some(id);
        self.len += 1;
        contracts::check_ends(self);
        id
    }

    fn link_front(&mut self, key: Option<Value>, value: Value) -> NodeId {
        contracts::check_key_admissible(self.key_tag, key.as_ref());
        let next = self.head;
        let id = self.alloc(Node {
            key,
            value,
            prev: None,
            next,
        });
        match next {
            Some(head) => {
                if let Some(node) = self.node_mut(head) {
                    node.prev = Some(id);
                }
            }
            None => self.tail = Some(id),
        }
        self.head = Some(id);
        self.len += 1;
        contracts::check_ends(self);
        id
    }

    // -------------------------------------------------------------------------
    // Lookup
    // -------------------------------------------------------------------------

    /// Resolve a node handle. Returns `None` for stale or foreign handles.
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        let slot = self.slots.get(id.index())?;
        if slot.generation != id.generation {
            return None;
        }
        slot.node.as_ref()
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        let slot = self.slots.get_mut(id.index())?;
        if slot.generation != id.generation {
            return None;
        }
        slot.node.as_mut()
    }

    #[inline]
    pub fn front_id(&self) -> Option<NodeId> {
        self.head
    }

    #[inline]
    pub fn back_id(&self) -> Option<NodeId> {
        self.tail
    }

    pub fn front(&self) -> Option<&Node> {
        self.node(self.head?)
    }

    pub fn back(&self) -> Option<&Node> {
        self.node(self.tail?)
    }

    /// First node (head→tail) whose key equals `key`.
    ///
    /// Comparison is by data, not by tag: an owned probe finds a shared key
    /// with the same contents.
    pub fn find_forward(&self, key: &Value) -> Option<NodeId> {
        let mut cursor = self.head;
        while let Some(id) = cursor {
            let node = self.node(id)?;
            if node.key.as_ref() == Some(key) {
                return Some(id);
            }
            cursor = node.next;
        }
        None
    }

    /// First node (tail→head) whose key equals `key`.
    pub fn find_reverse(&self, key: &Value) -> Option<NodeId> {
        let mut cursor = self.tail;
        while let Some(id) = cursor {
            let node = self.node(id)?;
            if node.key.as_ref() == Some(key) {
                return Some(id);
            }
            cursor = node.prev;
        }
        None
    }

    // -------------------------------------------------------------------------
    // Removal
    // -------------------------------------------------------------------------

    /// Unlink the head node and hand its value back.
    pub fn remove_front(&mut self) -> Option<Value> {
        let id = self.head?;
        self.unlink(id).map(|node| node.value)
    }

    /// Unlink the tail node and hand its value back.
    pub fn remove_back(&mut self) -> Option<Value> {
        let id = self.tail?;
        self.unlink(id).map(|node| node.value)
    }

    /// Unlink a node by handle. Stale handles remove nothing.
    pub fn remove_node(&mut self, id: NodeId) -> Option<Value> {
        self.unlink(id).map(|node| node.value)
    }

    /// Unlink the first head→tail node whose key equals `key`.
    pub fn remove(&mut self, key: &Value) -> bool {
        match self.find_forward(key) {
            Some(id) => {
                self.unlink(id);
                true
            }
            None => false,
        }
    }

    fn unlink(&mut self, id: NodeId) -> Option<Node> {
        let node = {
            let slot = self.slots.get_mut(id.index())?;
            if slot.generation != id.generation {
                return None;
            }
            let node = slot.node.take()?;
            // Retire the handle before anyone can reuse the slot.
            slot.generation = slot.generation.wrapping_add(1);
            node
        };
        self.free.push(id.index);

        match node.prev {
            Some(prev) => {
                if let Some(prev_node) = self.node_mut(prev) {
                    prev_node.next = node.next;
                }
            }
            None => self.head = node.next,
        }
        match node.next {
            Some(next) => {
                if let Some(next_node) = self.node_mut(next) {
                    next_node.prev = node.prev;
                }
            }
            None => self.tail = node.prev,
        }
        self.len -= 1;
        contracts::check_ends(self);
        Some(node)
    }

    /// Tear down every node. Owned payloads are released; shared payloads
    /// only lose this list's reference. The key tag survives.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
        self.head = None;
        self.tail = None;
        self.len = 0;
    }

    // -------------------------------------------------------------------------
    // Traversal
    // -------------------------------------------------------------------------

    /// Number of occupied arena slots, counted the slow way.
    pub(crate) fn occupied_slots(&self) -> usize {
        self.slots.iter().filter(|slot| slot.node.is_some()).count()
    }

    /// Iterate nodes head→tail.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            list: self,
            cursor: self.head,
        }
    }

    /// Iterate values head→tail.
    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.iter().map(Node::value)
    }

    /// Total order over lists: key tag, then elementwise keys and values,
    /// then length.
    pub fn total_cmp(&self, other: &List) -> Ordering {
        match self.key_tag.sort_key().cmp(&other.key_tag.sort_key()) {
            Ordering::Equal => {}
            unequal => return unequal,
        }
        for (a, b) in self.iter().zip(other.iter()) {
            match cmp_opt(a.key(), b.key()) {
                Ordering::Equal => {}
                unequal => return unequal,
            }
            match a.value().total_cmp(b.value()) {
                Ordering::Equal => {}
                unequal => return unequal,
            }
        }
        self.len.cmp(&other.len)
    }
}

impl PartialEq for List {
    fn eq(&self, other: &Self) -> bool {
        self.total_cmp(other) == Ordering::Equal
    }
}

impl Eq for List {}

impl Hash for List {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key_tag.hash(state);
        state.write_usize(self.len);
        for node in self.iter() {
            node.key().hash(state);
            node.value().hash(state);
        }
    }
}

impl fmt::Display for List {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (position, node) in self.iter().enumerate() {
            if position > 0 {
                f.write_str(", ")?;
            }
            match node.key() {
                Some(key) => write!(f, "{}={}", key, node.value())?,
                None => write!(f, "{}", node.value())?,
            }
        }
        f.write_str("}")
    }
}

/// Head→tail node iterator.
pub struct Iter<'a> {
    list: &'a List,
    cursor: Option<NodeId>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<&'a Node> {
        let id = self.cursor?;
        let node = self.list.node(id)?;
        self.cursor = node.next;
        Some(node)
    }
}

impl<'a> IntoIterator for &'a List {
    type Item = &'a Node;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Iter<'a> {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Kind;
    use std::sync::Arc;

    fn str_list() -> List {
        List::new(Tag::owned(Kind::Str))
    }

    #[test]
    fn append_links_at_tail() {
        let mut list = str_list();
        let first = list.add_back("a", 1i32).unwrap();
        let second = list.add_back("b", 2i32).unwrap();

        assert_eq!(list.len(), 2);
        assert_eq!(list.front_id(), Some(first));
        assert_eq!(list.back_id(), Some(second));
        assert_eq!(list.node(first).unwrap().next(), Some(second));
        assert_eq!(list.node(second).unwrap().prev(), Some(first));
        assert_eq!(list.node(second).unwrap().next(), None);
    }

    #[test]
    fn add_front_links_at_head() {
        let mut list = str_list();
        list.add_back("b", 2i32).unwrap();
        let first = list.add_front("a", 1i32).unwrap();

        assert_eq!(list.front_id(), Some(first));
        let keys: Vec<_> = list
            .iter()
            .map(|node| node.key().unwrap().as_str().unwrap().to_owned())
            .collect();
        assert_eq!(keys, ["a", "b"]);
    }

    #[test]
    fn gate_rejects_wrong_kind() {
        let mut list = str_list();
        list.add_back("a", 1i32).unwrap();

        let error = list.add_back(5i32, 2i32).unwrap_err();
        assert_eq!(error.expected, Tag::owned(Kind::Str));
        assert_eq!(error.found, Tag::owned(Kind::I32));
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn gate_rejects_wrong_ownership_of_same_kind() {
        let mut list = str_list();
        let shared_key = Arc::new(String::from("a"));

        let error = list.add_back(Arc::clone(&shared_key), 1i32).unwrap_err();
        assert_eq!(error.found, Tag::shared(Kind::Str));
        assert!(list.is_empty());
    }

    #[test]
    fn removal_relinks_neighbors() {
        let mut list = str_list();
        list.add_back("a", 1i32).unwrap();
        let middle = list.add_back("b", 2i32).unwrap();
        list.add_back("c", 3i32).unwrap();

        assert_eq!(list.remove_node(middle), Some(Value::from(2i32)));
        assert_eq!(list.len(), 2);

        let keys: Vec<_> = list
            .iter()
            .map(|node| node.key().unwrap().as_str().unwrap().to_owned())
            .collect();
        assert_eq!(keys, ["a", "c"]);
        assert_eq!(list.front().unwrap().next(), list.back_id());
        assert_eq!(list.back().unwrap().prev(), list.front_id());
    }

    #[test]
    fn stale_handles_stop_resolving() {
        let mut list = str_list();
        let id = list.add_back("a", 1i32).unwrap();
        list.remove_node(id);

        // Slot gets reused, but the old handle must not see the new tenant.
        let replacement = list.add_back("b", 2i32).unwrap();
        assert_eq!(replacement.index, id.index);
        assert!(list.node(id).is_none());
        assert_eq!(list.remove_node(id), None);
        assert!(list.node(replacement).is_some());
    }

    #[test]
    fn remove_front_and_back_return_values() {
        let mut list = str_list();
        list.add_back("a", 1i32).unwrap();
        list.add_back("b", 2i32).unwrap();
        list.add_back("c", 3i32).unwrap();

        assert_eq!(list.remove_front(), Some(Value::from(1i32)));
        assert_eq!(list.remove_back(), Some(Value::from(3i32)));
        assert_eq!(list.len(), 1);
        assert_eq!(list.remove_front(), Some(Value::from(2i32)));
        assert_eq!(list.remove_front(), None);
    }

    #[test]
    fn find_forward_and_reverse_pick_different_duplicates() {
        let mut list = str_list();
        let first = list.add_back("dup", 1i32).unwrap();
        list.add_back("other", 2i32).unwrap();
        let last = list.add_back("dup", 3i32).unwrap();

        let probe = Value::from("dup");
        assert_eq!(list.find_forward(&probe), Some(first));
        assert_eq!(list.find_reverse(&probe), Some(last));
        assert_eq!(list.find_forward(&Value::from("missing")), None);
    }

    #[test]
    fn remove_by_key_takes_first_match_only() {
        let mut list = str_list();
        list.add_back("dup", 1i32).unwrap();
        list.add_back("dup", 2i32).unwrap();

        assert!(list.remove(&Value::from("dup")));
        assert_eq!(list.len(), 1);
        assert_eq!(list.front().unwrap().value(), &Value::from(2i32));
        assert!(!list.remove(&Value::from("missing")));
    }

    #[test]
    fn clear_keeps_key_tag() {
        let mut list = str_list();
        list.add_back("a", 1i32).unwrap();
        list.clear();

        assert!(list.is_empty());
        assert_eq!(list.key_tag(), Tag::owned(Kind::Str));
        list.add_back("again", 2i32).unwrap();
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn clone_is_independent() {
        let mut list = str_list();
        list.add_back("a", 1i32).unwrap();

        let mut copy = list.clone();
        copy.add_back("b", 2i32).unwrap();

        assert_eq!(list.len(), 1);
        assert_eq!(copy.len(), 2);
        assert_ne!(list, copy);
    }

    #[test]
    fn equality_is_structural() {
        let mut a = str_list();
        a.add_back("k", 1i32).unwrap();
        let mut b = str_list();
        b.add_back("k", 1i32).unwrap();

        assert_eq!(a, b);
        assert_ne!(a, List::new(Tag::owned(Kind::Str)));
        assert_ne!(List::new(Tag::owned(Kind::Str)), List::new(Tag::shared(Kind::Str)));
    }

    #[test]
    fn display_renders_pairs_in_order() {
        let mut list = str_list();
        list.add_back("a", 1i32).unwrap();
        list.add_back("b", true).unwrap();
        assert_eq!(list.to_string(), "{a=1, b=true}");
    }
}
