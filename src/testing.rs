//! Test utilities shared across unit and integration tests.
//!
//! This module is always compiled but hidden from documentation.
//! It provides canonical implementations of test helpers to avoid duplication.

#![doc(hidden)]

use std::sync::Arc;

use crate::array::Array;
use crate::list::List;
use crate::map::Map;
use crate::queue::Queue;
use crate::stack::Stack;
use crate::tree::Tree;
use crate::types::{Kind, Tag};
use crate::value::Value;

/// A string-keyed list exercising every persistable payload kind, owned and
/// shared. The canonical fixture for round-trip tests.
pub fn rich_list() -> List {
    let mut list = List::new(Tag::owned(Kind::Str));

    list.add_back("bool", true).unwrap();
    list.add_back("i8", -8i8).unwrap();
    list.add_back("u8", 8u8).unwrap();
    list.add_back("i16", -1600i16).unwrap();
    list.add_back("u16", 1600u16).unwrap();
    list.add_back("i32", -32_000i32).unwrap();
    list.add_back("u32", 32_000u32).unwrap();
    list.add_back("i64", -64_000_000i64).unwrap();
    list.add_back("u64", 64_000_000u64).unwrap();
    list.add_back("i128", i128::MIN).unwrap();
    list.add_back("u128", u128::MAX).unwrap();
    list.add_back("f32", 2.5f32).unwrap();
    list.add_back("f64", -0.125f64).unwrap();
    list.add_back("longDouble", Value::long_double(9.75)).unwrap();
    list.add_back("string", "text payload").unwrap();
    list.add_back("bytes", vec![0u8, 1, 2, 255]).unwrap();
    list.add_back("null", Value::null()).unwrap();

    // Shared flavors alias caller-style allocations.
    list.add_back("sharedInt", Arc::new(42i32)).unwrap();
    list.add_back("sharedText", Arc::new(String::from("aliased")))
        .unwrap();

    // One of each container kind as a value.
    let mut nested = List::new(Tag::owned(Kind::I64));
    nested.add_back(1i64, "one").unwrap();
    nested.add_back(2i64, "two").unwrap();
    list.add_back("list", nested).unwrap();

    let mut queue = Queue::new(Tag::owned(Kind::Str));
    queue.push(1i32);
    queue.push(2i32);
    list.add_back("queue", queue).unwrap();

    let mut stack = Stack::new(Tag::owned(Kind::Str));
    stack.push("bottom");
    stack.push("top");
    list.add_back("stack", stack).unwrap();

    let mut tree = Tree::new(Tag::owned(Kind::U32));
    tree.insert(2u32, "b").unwrap();
    tree.insert(1u32, "a").unwrap();
    list.add_back("tree", tree).unwrap();

    let mut map = Map::new(Tag::owned(Kind::Str));
    map.insert("k", 1i32).unwrap();
    list.add_back("map", map).unwrap();

    let mut array = Array::new();
    array.push(1i32);
    array.push("mixed");
    list.add_back("array", array).unwrap();

    list
}

/// A string-keyed list of integers, appended in slice order.
pub fn int_list(values: &[i64]) -> List {
    let mut list = List::new(Tag::owned(Kind::Str));
    for (position, value) in values.iter().enumerate() {
        list.add_back(format!("k{}", position).as_str(), *value)
            .unwrap();
    }
    list
}

/// Collect a list's values as `i64`s, panicking on other kinds.
pub fn collect_ints(list: &List) -> Vec<i64> {
    list.values()
        .map(|value| value.as_i64().expect("integer value"))
        .collect()
}
