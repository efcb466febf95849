//! Heterogeneous tagged data structures with explicit ownership.
//!
//! One container, many payload types, no guessing about who frees what.
//! Every stored payload is a [`Value`]: a closed set of kinds (scalars,
//! strings, buffers, nested containers, opaque pointers), each either
//! **owned** (the container's exclusive deep copy) or **shared** (an `Arc`
//! alias of caller-managed storage). Containers declare a key tag at
//! construction and enforce it on every keyed insertion by exact tag
//! equality, while values stay heterogeneous node to node.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐     ┌──────────────┐     ┌───────────────┐
//! │   types.rs   │────▶│   value.rs   │────▶│    list.rs    │
//! │  (Kind, Tag, │     │ (Slot, Value,│     │ (List, Node,  │
//! │   Ownership) │     │ Bytes,Opaque)│     │   add_back)   │
//! └──────────────┘     └──────────────┘     └───────────────┘
//!        │                    │                  │       │
//!        ▼                    ▼                  ▼       ▼
//! ┌──────────────────────────────────┐   ┌───────────────────┐
//! │           contracts.rs           │   │ queue.rs stack.rs │
//! │ (debug contracts, validate_list) │   │ tree.rs map.rs    │
//! └──────────────────────────────────┘   │ array.rs          │
//!        │                               └───────────────────┘
//!        ▼
//! ┌──────────────────────────────────┐
//! │      binary.rs    json.rs        │
//! │ (blob + JSON import and export)  │
//! └──────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```
//! use motley::{Kind, List, Tag};
//!
//! let mut list = List::new(Tag::owned(Kind::Str));
//! list.add_back("temperature", 21.5f64).unwrap();
//! list.add_back("online", true).unwrap();
//!
//! // Keys are gated by exact tag; values stay heterogeneous.
//! assert!(list.add_back(7i32, "wrong key kind").is_err());
//! assert_eq!(list.len(), 2);
//! ```
//!
//! # Ownership in one paragraph
//!
//! Insert by value (or plain reference) and the container deep-copies:
//! mutating your original afterwards cannot touch the stored copy, and the
//! copy is released when its node goes away. Insert an `Arc` and the
//! container aliases your allocation: no copy is made, the data is never
//! released by the container, and pointer identity is observable via
//! [`Value::alias_addr`]. The two modes are different tags, so a container
//! keyed by owned strings will not accept a shared string key.

// Module declarations
pub mod binary;
pub mod contracts;
pub mod testing;

mod array;
mod convert;
mod json;
mod list;
mod map;
mod queue;
mod stack;
mod tree;
mod types;
mod value;

// Re-exports for public API
pub use array::Array;
pub use contracts::{validate_list, InvariantError};
pub use json::JsonError;
pub use list::{Iter, KeyTagError, List, Node};
pub use map::Map;
pub use queue::Queue;
pub use stack::Stack;
pub use tree::Tree;
pub use types::{Kind, NodeId, Ownership, Tag};
pub use value::{Bytes, Opaque, Slot, Value};
