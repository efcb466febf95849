// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The tag model: what a payload is, and who owns it.
//!
//! Every payload stored in a container carries a [`Tag`]: its [`Kind`] (the
//! concrete type of the data) and its [`Ownership`] (whether the container
//! holds its own copy or an alias into caller-managed storage). Keys are
//! checked against the container's declared key tag by **exact** tag equality:
//! an owned `i32` and a shared `i32` are different, incompatible tags.
//!
//! | Type        | Purpose                                         |
//! |-------------|-------------------------------------------------|
//! | `Kind`      | Closed enumeration of payload types             |
//! | `Ownership` | Owned copy vs. shared alias                     |
//! | `Tag`       | `{ kind, ownership }` - the unit of comparison  |
//! | `NodeId`    | Generational handle to a node inside a list     |
//!
//! # Invariants (the stuff that breaks if you ignore it)
//!
//! - `Kind` is closed and exhaustive. There is no extension point; the blob
//!   and JSON codecs, the total value order, and the conversion matrix all
//!   match on every variant.
//! - Ownership is an orthogonal field of `Tag`, never folded into `Kind`.
//!   Doubling the kind enumeration is how you end up maintaining a 2N-way
//!   matrix by hand.

use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// KIND
// =============================================================================

/// The concrete type of a tagged payload.
///
/// Discriminant values are stable and appear verbatim in the blob encoding,
/// so variants must never be reordered or renumbered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum Kind {
    Bool = 0,
    I8 = 1,
    U8 = 2,
    I16 = 3,
    U16 = 4,
    I32 = 5,
    U32 = 6,
    I64 = 7,
    U64 = 8,
    I128 = 9,
    U128 = 10,
    F32 = 11,
    F64 = 12,
    /// Extended-precision float tag. A distinct, non-interchangeable tag even
    /// though the payload is stored at `f64` width (the widest this platform
    /// offers).
    LongDouble = 13,
    Str = 14,
    Bytes = 15,
    List = 16,
    Queue = 17,
    Stack = 18,
    Tree = 19,
    Map = 20,
    Array = 21,
    /// Opaque pointer payload. Copies are shallow; the data behind it is
    /// never inspected by the library.
    Pointer = 22,
}

impl Kind {
    /// Stable one-byte code used in the blob encoding.
    #[inline]
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Inverse of [`Kind::code`]. Returns `None` for unknown codes.
    pub fn from_code(code: u8) -> Option<Self> {
        Some(match code {
            0 => Kind::Bool,
            1 => Kind::I8,
            2 => Kind::U8,
            3 => Kind::I16,
            4 => Kind::U16,
            5 => Kind::I32,
            6 => Kind::U32,
            7 => Kind::I64,
            8 => Kind::U64,
            9 => Kind::I128,
            10 => Kind::U128,
            11 => Kind::F32,
            12 => Kind::F64,
            13 => Kind::LongDouble,
            14 => Kind::Str,
            15 => Kind::Bytes,
            16 => Kind::List,
            17 => Kind::Queue,
            18 => Kind::Stack,
            19 => Kind::Tree,
            20 => Kind::Map,
            21 => Kind::Array,
            22 => Kind::Pointer,
            _ => return None,
        })
    }

    /// Human-readable name, used by `Display` impls and error messages.
    pub fn name(self) -> &'static str {
        match self {
            Kind::Bool => "bool",
            Kind::I8 => "i8",
            Kind::U8 => "u8",
            Kind::I16 => "i16",
            Kind::U16 => "u16",
            Kind::I32 => "i32",
            Kind::U32 => "u32",
            Kind::I64 => "i64",
            Kind::U64 => "u64",
            Kind::I128 => "i128",
            Kind::U128 => "u128",
            Kind::F32 => "f32",
            Kind::F64 => "f64",
            Kind::LongDouble => "longDouble",
            Kind::Str => "string",
            Kind::Bytes => "bytes",
            Kind::List => "list",
            Kind::Queue => "queue",
            Kind::Stack => "stack",
            Kind::Tree => "tree",
            Kind::Map => "map",
            Kind::Array => "array",
            Kind::Pointer => "pointer",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// =============================================================================
// OWNERSHIP
// =============================================================================

/// Who is responsible for a payload's storage.
///
/// `Owned` payloads are exclusive, container-managed copies: deep-copied in,
/// deep-copied on clone, released exactly once when the node goes away.
/// `Shared` payloads are non-owning aliases of caller-managed storage: the
/// container never deep-copies them and never releases the caller's data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum Ownership {
    Owned = 0,
    Shared = 1,
}

impl Ownership {
    pub fn name(self) -> &'static str {
        match self {
            Ownership::Owned => "owned",
            Ownership::Shared => "shared",
        }
    }
}

impl fmt::Display for Ownership {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// =============================================================================
// TAG
// =============================================================================

/// A kind plus an ownership mode. The unit of key compatibility.
///
/// Two tags are compatible only when **both** fields are equal. A list keyed
/// by `Tag::owned(Kind::Str)` rejects a `Tag::shared(Kind::Str)` key just as
/// it rejects an `i32` one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tag {
    pub kind: Kind,
    pub ownership: Ownership,
}

impl Tag {
    /// Tag for a container-owned payload of `kind`.
    #[inline]
    pub const fn owned(kind: Kind) -> Self {
        Tag {
            kind,
            ownership: Ownership::Owned,
        }
    }

    /// Tag for a shared (caller-owned) payload of `kind`.
    #[inline]
    pub const fn shared(kind: Kind) -> Self {
        Tag {
            kind,
            ownership: Ownership::Shared,
        }
    }

    #[inline]
    pub fn is_owned(self) -> bool {
        self.ownership == Ownership::Owned
    }

    #[inline]
    pub fn is_shared(self) -> bool {
        self.ownership == Ownership::Shared
    }

    /// Sort key for the total order over tagged values.
    #[inline]
    pub(crate) fn sort_key(self) -> (u8, u8) {
        (self.kind.code(), self.ownership as u8)
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.kind, self.ownership)
    }
}

// =============================================================================
// NODE HANDLES
// =============================================================================

/// Generational handle to a node inside a [`List`](crate::List).
///
/// Handles are only meaningful for the list that issued them. The generation
/// counter detects stale handles: once a node is removed, every handle that
/// pointed at it stops resolving instead of silently aliasing whatever node
/// reuses the slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId {
    pub(crate) index: u32,
    pub(crate) generation: u32,
}

impl NodeId {
    /// Slot index inside the owning list's arena.
    #[inline]
    pub(crate) fn index(self) -> usize {
        self.index as usize
    }
}
