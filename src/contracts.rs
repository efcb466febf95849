//! Runtime contracts for the list's structural invariants.
//!
//! Two complementary layers:
//!
//! 1. **Debug contracts** (`check_*`) - `debug_assert!`-based spot checks
//!    sprinkled through the mutation paths. Zero-cost in release builds,
//!    early failure during development.
//! 2. **Full validation** ([`validate_list`]) - an O(n) walk that re-derives
//!    every invariant from scratch and reports the first violation. Run it
//!    on anything you didn't build yourself, like a freshly decoded blob.
//!
//! # INVARIANTS (DO NOT REMOVE THESE CHECKS)
//!
//! - Every present key's tag equals the list's key tag.
//! - The head→tail chain is consistent: each node's `next` points back via
//!   `prev`, the walk terminates at the tail, and it visits `len` nodes.
//! - `len` equals the number of occupied arena slots (no orphans).
//! - An empty list has neither head nor tail; a non-empty list has both.

use std::fmt;

use crate::list::List;
use crate::types::Tag;
use crate::value::Value;

// ============================================================================
// ERRORS
// ============================================================================

/// A structural invariant violation found by [`validate_list`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvariantError {
    /// A stored key's tag differs from the list's declared key tag.
    KeyTagViolation {
        position: usize,
        expected: Tag,
        found: Tag,
    },
    /// A node's neighbor links disagree (or the chain cycles).
    BrokenChain { position: usize },
    /// The stored length differs from the number of reachable nodes.
    LengthMismatch { stored: usize, counted: usize },
    /// Head/tail presence disagrees with emptiness.
    DanglingEnds,
    /// Occupied arena slots that the chain never reaches.
    OrphanNodes { stored: usize, occupied: usize },
}

impl fmt::Display for InvariantError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvariantError::KeyTagViolation {
                position,
                expected,
                found,
            } => {
                write!(
                    f,
                    "key at position {} is tagged {} in a container keyed by {}",
                    position, found, expected
                )
            }
            InvariantError::BrokenChain { position } => {
                write!(f, "node chain broken at position {}", position)
            }
            InvariantError::LengthMismatch { stored, counted } => {
                write!(f, "stored length {} but {} reachable nodes", stored, counted)
            }
            InvariantError::DanglingEnds => {
                write!(f, "head/tail presence disagrees with length")
            }
            InvariantError::OrphanNodes { stored, occupied } => {
                write!(
                    f,
                    "{} occupied slots for a chain of {} nodes",
                    occupied, stored
                )
            }
        }
    }
}

impl std::error::Error for InvariantError {}

// ============================================================================
// DEBUG CONTRACTS
// ============================================================================

/// Check that a key about to be linked is admissible for `key_tag`.
///
/// The public gate has already run (or the key is absent); this catches
/// internal callers that bypass it.
#[inline]
pub(crate) fn check_key_admissible(key_tag: Tag, key: Option<&Value>) {
    if let Some(key) = key {
        debug_assert!(
            key.tag() == key_tag,
            "contract violation: linking key tagged {} into a container keyed by {}",
            key.tag(),
            key_tag
        );
    }
}

/// Cheap post-mutation check of the end pointers.
#[inline]
pub(crate) fn check_ends(list: &List) {
    debug_assert_eq!(
        list.front_id().is_none(),
        list.is_empty(),
        "contract violation: head presence disagrees with emptiness"
    );
    debug_assert_eq!(
        list.back_id().is_none(),
        list.is_empty(),
        "contract violation: tail presence disagrees with emptiness"
    );
    if let Some(front) = list.front() {
        debug_assert!(
            front.prev().is_none(),
            "contract violation: head node has a predecessor"
        );
    }
    if let Some(back) = list.back() {
        debug_assert!(
            back.next().is_none(),
            "contract violation: tail node has a successor"
        );
    }
}

// ============================================================================
// FULL VALIDATION
// ============================================================================

/// Re-derive every structural invariant of `list` and report the first
/// violation.
///
/// O(n); intended for tests and for data that crossed a trust boundary
/// (blob decode), not for hot paths.
pub fn validate_list(list: &List) -> Result<(), InvariantError> {
    if (list.front_id().is_none() || list.back_id().is_none()) && !list.is_empty() {
        return Err(InvariantError::DanglingEnds);
    }
    if list.is_empty() && (list.front_id().is_some() || list.back_id().is_some()) {
        return Err(InvariantError::DanglingEnds);
    }

    let mut counted = 0usize;
    let mut previous = None;
    let mut cursor = list.front_id();

    while let Some(id) = cursor {
        // A chain longer than len is a cycle.
        if counted >= list.len() {
            return Err(InvariantError::LengthMismatch {
                stored: list.len(),
                counted: counted + 1,
            });
        }
        let node = match list.node(id) {
            Some(node) => node,
            None => return Err(InvariantError::BrokenChain { position: counted }),
        };
        if node.prev() != previous {
            return Err(InvariantError::BrokenChain { position: counted });
        }
        if let Some(key) = node.key() {
            if key.tag() != list.key_tag() {
                return Err(InvariantError::KeyTagViolation {
                    position: counted,
                    expected: list.key_tag(),
                    found: key.tag(),
                });
            }
        }
        previous = Some(id);
        cursor = node.next();
        counted += 1;
    }

    if previous != list.back_id() {
        return Err(InvariantError::BrokenChain { position: counted });
    }
    if counted != list.len() {
        return Err(InvariantError::LengthMismatch {
            stored: list.len(),
            counted,
        });
    }
    let occupied = list.occupied_slots();
    if occupied != list.len() {
        return Err(InvariantError::OrphanNodes {
            stored: list.len(),
            occupied,
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Kind, Tag};

    #[test]
    fn fresh_list_validates() {
        let list = List::new(Tag::owned(Kind::Str));
        assert_eq!(validate_list(&list), Ok(()));
    }

    #[test]
    fn mutated_list_validates() {
        let mut list = List::new(Tag::owned(Kind::Str));
        list.add_back("a", 1i32).unwrap();
        list.add_back("b", 2i32).unwrap();
        list.add_front("c", 3i32).unwrap();
        list.remove(&Value::from("a"));
        assert_eq!(validate_list(&list), Ok(()));

        list.clear();
        assert_eq!(validate_list(&list), Ok(()));
    }

    #[test]
    fn validation_survives_slot_reuse() {
        let mut list = List::new(Tag::owned(Kind::I64));
        let first = list.add_back(1i64, "one").unwrap();
        list.add_back(2i64, "two").unwrap();
        list.remove_node(first);
        list.add_back(3i64, "three").unwrap();
        assert_eq!(validate_list(&list), Ok(()));
    }
}
