// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The conversion matrix: from concrete Rust types to tagged [`Value`]s.
//!
//! Insertion surfaces take `impl Into<Value>`, so the compiler resolves the
//! right conversion from the argument's static type. Passing data **by
//! value** (or by plain reference, which deep-copies) produces an owned
//! value; passing an **`Arc`** produces a shared alias. There is
//! intentionally no shared conversion from a plain reference: an alias has
//! to outlive the call, and only a reference-counted handle can promise
//! that.
//!
//! One asymmetry to know about: `f64` converts to [`Value::F64`]. The
//! extended-precision tag is only reachable through [`Value::long_double`],
//! since both tags share Rust's widest float type.

use std::sync::Arc;

use crate::array::Array;
use crate::list::List;
use crate::map::Map;
use crate::queue::Queue;
use crate::stack::Stack;
use crate::tree::Tree;
use crate::value::{Bytes, Opaque, Slot, Value};

/// Conversions for `Copy` scalar payloads.
macro_rules! copy_conversions {
    ($($ty:ty => $variant:ident),* $(,)?) => {$(
        impl From<$ty> for Value {
            #[inline]
            fn from(value: $ty) -> Self {
                Value::$variant(Slot::Owned(value))
            }
        }

        impl From<&$ty> for Value {
            #[inline]
            fn from(value: &$ty) -> Self {
                Value::$variant(Slot::Owned(*value))
            }
        }

        impl From<Arc<$ty>> for Value {
            #[inline]
            fn from(value: Arc<$ty>) -> Self {
                Value::$variant(Slot::Shared(value))
            }
        }

        impl From<&Arc<$ty>> for Value {
            #[inline]
            fn from(value: &Arc<$ty>) -> Self {
                Value::$variant(Slot::Shared(Arc::clone(value)))
            }
        }
    )*};
}

/// Conversions for heap-backed payloads. Converting from a reference is a
/// deep copy; converting from an `Arc` is an alias.
macro_rules! clone_conversions {
    ($($ty:ty => $variant:ident),* $(,)?) => {$(
        impl From<$ty> for Value {
            #[inline]
            fn from(value: $ty) -> Self {
                Value::$variant(Slot::Owned(value))
            }
        }

        impl From<&$ty> for Value {
            #[inline]
            fn from(value: &$ty) -> Self {
                Value::$variant(Slot::Owned(value.clone()))
            }
        }

        impl From<Arc<$ty>> for Value {
            #[inline]
            fn from(value: Arc<$ty>) -> Self {
                Value::$variant(Slot::Shared(value))
            }
        }

        impl From<&Arc<$ty>> for Value {
            #[inline]
            fn from(value: &Arc<$ty>) -> Self {
                Value::$variant(Slot::Shared(Arc::clone(value)))
            }
        }
    )*};
}

copy_conversions! {
    bool => Bool,
    i8 => I8,
    u8 => U8,
    i16 => I16,
    u16 => U16,
    i32 => I32,
    u32 => U32,
    i64 => I64,
    u64 => U64,
    i128 => I128,
    u128 => U128,
    f32 => F32,
    f64 => F64,
}

clone_conversions! {
    String => Str,
    Bytes => Bytes,
    List => List,
    Queue => Queue,
    Stack => Stack,
    Tree => Tree,
    Map => Map,
    Array => Array,
    Opaque => Pointer,
}

impl From<&str> for Value {
    #[inline]
    fn from(value: &str) -> Self {
        Value::Str(Slot::Owned(value.to_owned()))
    }
}

impl From<&[u8]> for Value {
    #[inline]
    fn from(value: &[u8]) -> Self {
        Value::Bytes(Slot::Owned(Bytes::from_slice(value)))
    }
}

impl From<Vec<u8>> for Value {
    #[inline]
    fn from(value: Vec<u8>) -> Self {
        Value::Bytes(Slot::Owned(Bytes::from(value)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Kind, Tag};

    #[test]
    fn by_value_conversions_are_owned() {
        assert_eq!(Value::from(true).tag(), Tag::owned(Kind::Bool));
        assert_eq!(Value::from(1i8).tag(), Tag::owned(Kind::I8));
        assert_eq!(Value::from(1u16).tag(), Tag::owned(Kind::U16));
        assert_eq!(Value::from(1i128).tag(), Tag::owned(Kind::I128));
        assert_eq!(Value::from(1.5f32).tag(), Tag::owned(Kind::F32));
        assert_eq!(Value::from("text").tag(), Tag::owned(Kind::Str));
        assert_eq!(Value::from(vec![1u8, 2]).tag(), Tag::owned(Kind::Bytes));
    }

    #[test]
    fn arc_conversions_are_shared_aliases() {
        let number = Arc::new(9u64);
        let value = Value::from(Arc::clone(&number));
        assert_eq!(value.tag(), Tag::shared(Kind::U64));
        assert_eq!(value.alias_addr(), Some(Arc::as_ptr(&number) as usize));

        let text = Arc::new(String::from("alias me"));
        let value = Value::from(&text);
        assert_eq!(value.tag(), Tag::shared(Kind::Str));
        assert_eq!(value.alias_addr(), Some(Arc::as_ptr(&text) as usize));
    }

    #[test]
    fn reference_conversions_deep_copy() {
        let mut original = String::from("before");
        let stored = Value::from(&original);
        original.push_str(" after");
        assert_eq!(stored.as_str(), Some("before"));
    }

    #[test]
    fn f64_converts_to_double_not_long_double() {
        assert_eq!(Value::from(2.0f64).kind(), Kind::F64);
        assert_eq!(Value::long_double(2.0).kind(), Kind::LongDouble);
    }

    #[test]
    fn container_reference_conversion_copies_structure() {
        let mut list = List::new(Tag::owned(Kind::Str));
        list.add_back("k", 1i32).unwrap();

        let value = Value::from(&list);
        list.add_back("k2", 2i32).unwrap();

        let copied = value.as_list().unwrap();
        assert_eq!(copied.len(), 1);
        assert_eq!(list.len(), 2);
    }
}
