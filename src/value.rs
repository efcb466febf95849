// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Runtime-tagged values: one payload, many concrete types, explicit ownership.
//!
//! A [`Value`] is one variant per [`Kind`](crate::Kind), each wrapping a
//! [`Slot`]: either `Owned` (the container's exclusive copy, stored inline or
//! in container-managed heap storage) or `Shared` (an `Arc` alias of storage
//! the caller manages). The tag of a value is derivable, never stored
//! separately, so a value and its tag cannot disagree.
//!
//! # Invariants (the stuff that breaks if you ignore it)
//!
//! - **Clone is the copy contract.** Cloning a value deep-copies `Owned`
//!   payloads (recursively, containers included) and alias-clones `Shared`
//!   payloads. Every container in this crate relies on that split; changing
//!   it changes who frees what.
//! - **Equality ignores ownership.** An owned `i32` 5 equals a shared `i32`
//!   5. Only tags distinguish ownership; comparisons look at the data.
//! - **Float equality is bit equality.** `total_cmp` is a total order, so
//!   values can key hash maps and ordered trees. The price: `0.0 != -0.0`,
//!   and NaN equals itself.

use std::any::Any;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::array::Array;
use crate::list::List;
use crate::map::Map;
use crate::queue::Queue;
use crate::stack::Stack;
use crate::tree::Tree;
use crate::types::{Kind, Ownership, Tag};

// =============================================================================
// SLOT: owned copy or shared alias
// =============================================================================

/// Storage for one payload: the container's own copy, or an alias.
///
/// `Owned` data lives and dies with the node that holds it. `Shared` data is
/// reference-counted and caller-managed; the container drops its reference on
/// teardown and never touches the allocation itself.
#[derive(Debug)]
pub enum Slot<T> {
    Owned(T),
    Shared(Arc<T>),
}

impl<T> Slot<T> {
    #[inline]
    pub fn ownership(&self) -> Ownership {
        match self {
            Slot::Owned(_) => Ownership::Owned,
            Slot::Shared(_) => Ownership::Shared,
        }
    }

    /// Borrow the payload, wherever it lives.
    #[inline]
    pub fn get(&self) -> &T {
        match self {
            Slot::Owned(value) => value,
            Slot::Shared(value) => value.as_ref(),
        }
    }

    /// The alias handle, if this slot is `Shared`.
    #[inline]
    pub fn as_shared(&self) -> Option<&Arc<T>> {
        match self {
            Slot::Owned(_) => None,
            Slot::Shared(value) => Some(value),
        }
    }

    /// Address of the aliased storage, if this slot is `Shared`.
    ///
    /// Useful for pointer-equality checks against the caller's own `Arc`.
    #[inline]
    pub fn alias_addr(&self) -> Option<usize> {
        match self {
            Slot::Owned(_) => None,
            Slot::Shared(value) => Some(Arc::as_ptr(value) as usize),
        }
    }

    /// Extract an owned payload, cloning out of a shared alias if needed.
    pub fn into_owned(self) -> T
    where
        T: Clone,
    {
        match self {
            Slot::Owned(value) => value,
            Slot::Shared(value) => value.as_ref().clone(),
        }
    }
}

impl<T: Clone> Clone for Slot<T> {
    fn clone(&self) -> Self {
        match self {
            // Deep copy: the clone owns its own storage.
            Slot::Owned(value) => Slot::Owned(value.clone()),
            // Alias clone: bump the refcount, never copy the data.
            Slot::Shared(value) => Slot::Shared(Arc::clone(value)),
        }
    }
}

// =============================================================================
// BYTES: length-managed byte storage
// =============================================================================

/// A byte buffer payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Bytes(Vec<u8>);

impl Bytes {
    pub fn new() -> Self {
        Bytes(Vec::new())
    }

    pub fn from_slice(data: &[u8]) -> Self {
        Bytes(data.to_vec())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }

    pub fn extend_from_slice(&mut self, data: &[u8]) {
        self.0.extend_from_slice(data);
    }

    pub fn push(&mut self, byte: u8) {
        self.0.push(byte);
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn into_vec(self) -> Vec<u8> {
        self.0
    }
}

impl From<Vec<u8>> for Bytes {
    fn from(data: Vec<u8>) -> Self {
        Bytes(data)
    }
}

impl From<&[u8]> for Bytes {
    fn from(data: &[u8]) -> Self {
        Bytes::from_slice(data)
    }
}

impl std::ops::Deref for Bytes {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for Bytes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from_utf8_lossy(&self.0))
    }
}

// =============================================================================
// OPAQUE: pointer payloads the library never inspects
// =============================================================================

/// An opaque, possibly-null pointer payload.
///
/// The library stores and compares these by address only; the data behind
/// them is never read, copied, or rendered. Copies are shallow by contract:
/// cloning an `Opaque` yields another handle to the same allocation.
#[derive(Clone, Default)]
pub struct Opaque(Option<Arc<dyn Any + Send + Sync>>);

impl Opaque {
    /// Wrap a value in a fresh opaque handle.
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Opaque(Some(Arc::new(value)))
    }

    pub fn from_arc(handle: Arc<dyn Any + Send + Sync>) -> Self {
        Opaque(Some(handle))
    }

    /// The null pointer.
    pub fn null() -> Self {
        Opaque(None)
    }

    #[inline]
    pub fn is_null(&self) -> bool {
        self.0.is_none()
    }

    /// Address of the allocation, or 0 for null.
    #[inline]
    pub fn addr(&self) -> usize {
        match &self.0 {
            Some(handle) => Arc::as_ptr(handle) as *const () as usize,
            None => 0,
        }
    }

    pub fn ptr_eq(&self, other: &Opaque) -> bool {
        self.addr() == other.addr()
    }

    /// Attempt to view the pointed-to data as a `T`.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.0.as_deref().and_then(|handle| handle.downcast_ref())
    }
}

impl fmt::Debug for Opaque {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Some(_) => write!(f, "Opaque({:#x})", self.addr()),
            None => f.write_str("Opaque(null)"),
        }
    }
}

impl fmt::Display for Opaque {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Some(_) => write!(f, "{:#x}", self.addr()),
            None => f.write_str("(null)"),
        }
    }
}

impl PartialEq for Opaque {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for Opaque {}

impl Hash for Opaque {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_usize(self.addr());
    }
}

// =============================================================================
// VALUE
// =============================================================================

/// A runtime-tagged payload: one variant per kind, each in an owned or
/// shared [`Slot`].
#[derive(Debug, Clone)]
pub enum Value {
    Bool(Slot<bool>),
    I8(Slot<i8>),
    U8(Slot<u8>),
    I16(Slot<i16>),
    U16(Slot<u16>),
    I32(Slot<i32>),
    U32(Slot<u32>),
    I64(Slot<i64>),
    U64(Slot<u64>),
    I128(Slot<i128>),
    U128(Slot<u128>),
    F32(Slot<f32>),
    F64(Slot<f64>),
    /// Extended-precision tag; payload stored at `f64` width.
    LongDouble(Slot<f64>),
    Str(Slot<String>),
    Bytes(Slot<Bytes>),
    List(Slot<List>),
    Queue(Slot<Queue>),
    Stack(Slot<Stack>),
    Tree(Slot<Tree>),
    Map(Slot<Map>),
    Array(Slot<Array>),
    Pointer(Slot<Opaque>),
}

/// Run `$body` with `$slot` bound to whatever slot this value holds.
///
/// The body must be polymorphic over the payload type.
macro_rules! with_slot {
    ($value:expr, $slot:pat => $body:expr) => {
        match $value {
            Value::Bool($slot) => $body,
            Value::I8($slot) => $body,
            Value::U8($slot) => $body,
            Value::I16($slot) => $body,
            Value::U16($slot) => $body,
            Value::I32($slot) => $body,
            Value::U32($slot) => $body,
            Value::I64($slot) => $body,
            Value::U64($slot) => $body,
            Value::I128($slot) => $body,
            Value::U128($slot) => $body,
            Value::F32($slot) => $body,
            Value::F64($slot) => $body,
            Value::LongDouble($slot) => $body,
            Value::Str($slot) => $body,
            Value::Bytes($slot) => $body,
            Value::List($slot) => $body,
            Value::Queue($slot) => $body,
            Value::Stack($slot) => $body,
            Value::Tree($slot) => $body,
            Value::Map($slot) => $body,
            Value::Array($slot) => $body,
            Value::Pointer($slot) => $body,
        }
    };
}

impl Value {
    /// The kind of this value.
    pub fn kind(&self) -> Kind {
        match self {
            Value::Bool(_) => Kind::Bool,
            Value::I8(_) => Kind::I8,
            Value::U8(_) => Kind::U8,
            Value::I16(_) => Kind::I16,
            Value::U16(_) => Kind::U16,
            Value::I32(_) => Kind::I32,
            Value::U32(_) => Kind::U32,
            Value::I64(_) => Kind::I64,
            Value::U64(_) => Kind::U64,
            Value::I128(_) => Kind::I128,
            Value::U128(_) => Kind::U128,
            Value::F32(_) => Kind::F32,
            Value::F64(_) => Kind::F64,
            Value::LongDouble(_) => Kind::LongDouble,
            Value::Str(_) => Kind::Str,
            Value::Bytes(_) => Kind::Bytes,
            Value::List(_) => Kind::List,
            Value::Queue(_) => Kind::Queue,
            Value::Stack(_) => Kind::Stack,
            Value::Tree(_) => Kind::Tree,
            Value::Map(_) => Kind::Map,
            Value::Array(_) => Kind::Array,
            Value::Pointer(_) => Kind::Pointer,
        }
    }

    /// The ownership mode of this value's slot.
    pub fn ownership(&self) -> Ownership {
        with_slot!(self, slot => slot.ownership())
    }

    /// The full tag: kind plus ownership.
    #[inline]
    pub fn tag(&self) -> Tag {
        Tag {
            kind: self.kind(),
            ownership: self.ownership(),
        }
    }

    /// Address of the aliased storage, if this value is shared.
    pub fn alias_addr(&self) -> Option<usize> {
        with_slot!(self, slot => slot.alias_addr())
    }

    /// An extended-precision value (distinct tag from [`Value::F64`]).
    pub fn long_double(value: f64) -> Self {
        Value::LongDouble(Slot::Owned(value))
    }

    /// A shared extended-precision value.
    pub fn long_double_shared(value: Arc<f64>) -> Self {
        Value::LongDouble(Slot::Shared(value))
    }

    /// The null opaque pointer.
    pub fn null() -> Self {
        Value::Pointer(Slot::Owned(Opaque::null()))
    }

    /// True for a null [`Value::Pointer`]; false for everything else.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Pointer(slot) if slot.get().is_null())
    }

    /// Total order over all values.
    ///
    /// Values of different kinds order by kind code. Values of the same kind
    /// compare by payload - numerically for scalars (floats via IEEE-754
    /// total ordering), lexicographically for strings and buffers,
    /// elementwise for containers, by address for pointers. Ownership never
    /// participates.
    pub fn total_cmp(&self, other: &Value) -> Ordering {
        use Value::*;
        match (self, other) {
            (Bool(a), Bool(b)) => a.get().cmp(b.get()),
            (I8(a), I8(b)) => a.get().cmp(b.get()),
            (U8(a), U8(b)) => a.get().cmp(b.get()),
            (I16(a), I16(b)) => a.get().cmp(b.get()),
            (U16(a), U16(b)) => a.get().cmp(b.get()),
            (I32(a), I32(b)) => a.get().cmp(b.get()),
            (U32(a), U32(b)) => a.get().cmp(b.get()),
            (I64(a), I64(b)) => a.get().cmp(b.get()),
            (U64(a), U64(b)) => a.get().cmp(b.get()),
            (I128(a), I128(b)) => a.get().cmp(b.get()),
            (U128(a), U128(b)) => a.get().cmp(b.get()),
            (F32(a), F32(b)) => a.get().total_cmp(b.get()),
            (F64(a), F64(b)) => a.get().total_cmp(b.get()),
            (LongDouble(a), LongDouble(b)) => a.get().total_cmp(b.get()),
            (Str(a), Str(b)) => a.get().cmp(b.get()),
            (Bytes(a), Bytes(b)) => a.get().cmp(b.get()),
            (List(a), List(b)) => a.get().total_cmp(b.get()),
            (Queue(a), Queue(b)) => a.get().total_cmp(b.get()),
            (Stack(a), Stack(b)) => a.get().total_cmp(b.get()),
            (Tree(a), Tree(b)) => a.get().total_cmp(b.get()),
            (Map(a), Map(b)) => a.get().total_cmp(b.get()),
            (Array(a), Array(b)) => a.get().total_cmp(b.get()),
            (Pointer(a), Pointer(b)) => a.get().addr().cmp(&b.get().addr()),
            _ => self.kind().code().cmp(&other.kind().code()),
        }
    }
}

/// Order two optional values: absent sorts before present.
pub(crate) fn cmp_opt(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(a), Some(b)) => a.total_cmp(b),
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.total_cmp(other) == Ordering::Equal
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u8(self.kind().code());
        use Value::*;
        match self {
            Bool(v) => v.get().hash(state),
            I8(v) => v.get().hash(state),
            U8(v) => v.get().hash(state),
            I16(v) => v.get().hash(state),
            U16(v) => v.get().hash(state),
            I32(v) => v.get().hash(state),
            U32(v) => v.get().hash(state),
            I64(v) => v.get().hash(state),
            U64(v) => v.get().hash(state),
            I128(v) => v.get().hash(state),
            U128(v) => v.get().hash(state),
            // Bit representation, to agree with total_cmp-based equality.
            F32(v) => state.write_u32(v.get().to_bits()),
            F64(v) | LongDouble(v) => state.write_u64(v.get().to_bits()),
            Str(v) => v.get().hash(state),
            Bytes(v) => v.get().hash(state),
            List(v) => v.get().hash(state),
            Queue(v) => v.get().hash(state),
            Stack(v) => v.get().hash(state),
            Tree(v) => v.get().hash(state),
            Map(v) => v.get().hash(state),
            Array(v) => v.get().hash(state),
            Pointer(v) => v.get().hash(state),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use Value::*;
        match self {
            Bool(v) => write!(f, "{}", v.get()),
            I8(v) => write!(f, "{}", v.get()),
            U8(v) => write!(f, "{}", v.get()),
            I16(v) => write!(f, "{}", v.get()),
            U16(v) => write!(f, "{}", v.get()),
            I32(v) => write!(f, "{}", v.get()),
            U32(v) => write!(f, "{}", v.get()),
            I64(v) => write!(f, "{}", v.get()),
            U64(v) => write!(f, "{}", v.get()),
            I128(v) => write!(f, "{}", v.get()),
            U128(v) => write!(f, "{}", v.get()),
            F32(v) => write!(f, "{}", v.get()),
            F64(v) | LongDouble(v) => write!(f, "{}", v.get()),
            Str(v) => f.write_str(v.get()),
            Bytes(v) => write!(f, "{}", v.get()),
            List(v) => write!(f, "{}", v.get()),
            Queue(v) => write!(f, "{}", v.get()),
            Stack(v) => write!(f, "{}", v.get()),
            Tree(v) => write!(f, "{}", v.get()),
            Map(v) => write!(f, "{}", v.get()),
            Array(v) => write!(f, "{}", v.get()),
            Pointer(v) => write!(f, "{}", v.get()),
        }
    }
}

// =============================================================================
// TYPED ACCESSORS
// =============================================================================

macro_rules! scalar_accessor {
    ($($(#[$doc:meta])* $name:ident: $ty:ty => $variant:ident),* $(,)?) => {$(
        $(#[$doc])*
        #[inline]
        pub fn $name(&self) -> Option<$ty> {
            match self {
                Value::$variant(slot) => Some(*slot.get()),
                _ => None,
            }
        }
    )*};
}

macro_rules! ref_accessor {
    ($($(#[$doc:meta])* $name:ident: $ty:ty => $variant:ident),* $(,)?) => {$(
        $(#[$doc])*
        #[inline]
        pub fn $name(&self) -> Option<&$ty> {
            match self {
                Value::$variant(slot) => Some(slot.get()),
                _ => None,
            }
        }
    )*};
}

impl Value {
    scalar_accessor! {
        as_bool: bool => Bool,
        as_i8: i8 => I8,
        as_u8: u8 => U8,
        as_i16: i16 => I16,
        as_u16: u16 => U16,
        as_i32: i32 => I32,
        as_u32: u32 => U32,
        as_i64: i64 => I64,
        as_u64: u64 => U64,
        as_i128: i128 => I128,
        as_u128: u128 => U128,
        as_f32: f32 => F32,
        as_f64: f64 => F64,
        /// Payload of a [`Value::LongDouble`], stored at `f64` width.
        as_long_double: f64 => LongDouble,
    }

    /// Payload of a [`Value::Str`].
    #[inline]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(slot) => Some(slot.get().as_str()),
            _ => None,
        }
    }

    ref_accessor! {
        as_bytes: Bytes => Bytes,
        as_list: List => List,
        as_queue: Queue => Queue,
        as_stack: Stack => Stack,
        as_tree: Tree => Tree,
        as_map: Map => Map,
        as_array: Array => Array,
        as_opaque: Opaque => Pointer,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Kind;

    #[test]
    fn tag_is_derived_from_slot() {
        let owned = Value::from(7i32);
        assert_eq!(owned.tag(), Tag::owned(Kind::I32));

        let shared = Value::from(Arc::new(7i32));
        assert_eq!(shared.tag(), Tag::shared(Kind::I32));
    }

    #[test]
    fn equality_ignores_ownership() {
        let owned = Value::from(7i32);
        let shared = Value::from(Arc::new(7i32));
        assert_eq!(owned, shared);
    }

    #[test]
    fn equality_is_kind_exact() {
        assert_ne!(Value::from(5i32), Value::from(5i64));
        assert_ne!(Value::from(1.0f64), Value::long_double(1.0));
    }

    #[test]
    fn long_double_constructors_carry_the_extended_tag() {
        assert_eq!(
            Value::long_double(1.5).tag(),
            Tag::owned(Kind::LongDouble)
        );
        let backing = Arc::new(1.5f64);
        let shared = Value::long_double_shared(Arc::clone(&backing));
        assert_eq!(shared.tag(), Tag::shared(Kind::LongDouble));
        assert_eq!(shared.alias_addr(), Some(Arc::as_ptr(&backing) as usize));
        assert_eq!(shared.as_long_double(), Some(1.5));
    }

    #[test]
    fn bytes_buffer_operations() {
        let mut buffer = Bytes::new();
        assert!(buffer.is_empty());
        buffer.extend_from_slice(&[1, 2]);
        buffer.push(3);
        assert_eq!(buffer.len(), 3);
        assert_eq!(buffer.as_slice(), &[1, 2, 3]);
        assert_eq!(&buffer[1..], &[2, 3]);

        buffer.clear();
        assert!(buffer.is_empty());
        assert_eq!(Bytes::from_slice(b"abc").into_vec(), b"abc".to_vec());
        assert_eq!(Bytes::from_slice(b"abc").to_string(), "abc");
    }

    #[test]
    fn float_equality_is_bitwise() {
        assert_ne!(Value::from(0.0f64), Value::from(-0.0f64));
        assert_eq!(Value::from(f64::NAN), Value::from(f64::NAN));
    }

    #[test]
    fn total_cmp_orders_across_kinds_by_code() {
        let bool_value = Value::from(true);
        let string_value = Value::from("a");
        assert_eq!(
            bool_value.total_cmp(&string_value),
            Ordering::Less,
            "bool code precedes string code"
        );
    }

    #[test]
    fn shared_clone_aliases_owned_clone_copies() {
        let backing = Arc::new(String::from("payload"));
        let shared = Value::from(Arc::clone(&backing));
        let shared_clone = shared.clone();
        assert_eq!(shared.alias_addr(), shared_clone.alias_addr());
        assert_eq!(shared.alias_addr(), Some(Arc::as_ptr(&backing) as usize));

        let owned = Value::from("payload");
        assert_eq!(owned.alias_addr(), None);
        assert_eq!(owned, shared);
    }

    #[test]
    fn opaque_compares_by_address() {
        let first = Opaque::new(42u32);
        let alias = first.clone();
        let second = Opaque::new(42u32);

        assert_eq!(first, alias);
        assert_ne!(first, second);
        assert!(Opaque::null().is_null());
        assert_eq!(Opaque::null(), Opaque::null());
        assert_eq!(first.downcast_ref::<u32>(), Some(&42));
        assert_eq!(first.downcast_ref::<i32>(), None);
    }

    #[test]
    fn null_pointer_value() {
        let null = Value::null();
        assert!(null.is_null());
        assert_eq!(null.tag(), Tag::owned(Kind::Pointer));
        assert!(!Value::from(0i32).is_null());
    }

    #[test]
    fn accessors_are_kind_strict() {
        let value = Value::from(3.5f64);
        assert_eq!(value.as_f64(), Some(3.5));
        assert_eq!(value.as_f32(), None);
        assert_eq!(value.as_long_double(), None);
        assert_eq!(value.as_str(), None);

        let text = Value::from("hello");
        assert_eq!(text.as_str(), Some("hello"));
    }

    #[test]
    fn into_owned_clones_out_of_shared() {
        let backing = Arc::new(String::from("shared text"));
        let slot = Slot::Shared(Arc::clone(&backing));
        let extracted: String = slot.into_owned();
        assert_eq!(extracted, "shared text");
        // The caller's allocation is untouched.
        assert_eq!(Arc::strong_count(&backing), 1);
    }
}
