//! This crate provides a doubly-linked list of labelled value nodes, backed by
//! an index arena.
//!
//! The [`NodeList`] appends and prepends in constant time and reaches any
//! index by walking from whichever end of the list is nearer. Every element
//! is a [`Node`] holding one [`Value`] together with its [`ValueKind`], its
//! cardinality, the position it was placed at and a process-unique label.
//!
//! Here is a quick example showing how the list works.
//!
//! ```
//! use node_list::NodeList;
//! use serde_json::json;
//!
//! let mut list = NodeList::from([1, 2, 3]);
//!
//! list.insert(1, "x").unwrap(); // becomes [1, "x", 2, 3]
//! assert_eq!(list.get_value(1), Some(&json!("x")));
//!
//! assert_eq!(list.remove_at(-1), Ok(json!(3))); // becomes [1, "x", 2]
//! assert!(list.remove(&json!("x"))); // becomes [1, 2]
//!
//! list.reverse();
//! assert_eq!(list.to_values(), vec![json!(2), json!(1)]);
//! ```
//!
//! # Memory Layout
//!
//! The memory layout of the list is like the following graph:
//! ```text
//!   nodes: Vec<Option<Node>>
//!   ┌────────────┬────────────┬────────────┬────────────┐
//!   │   slot 0   │   slot 1   │   slot 2   │   slot 3   │
//!   │    Node    │    None    │    Node    │    Node    │
//!   │ prev: None │            │ prev: 0    │ prev: 2    │
//!   │ next: 2    │            │ next: 3    │ next: None │
//!   └────────────┴────────────┴────────────┴────────────┘
//!         ↑            ↑                          ↑
//!       head     free: [1]                      tail
//! ```
//! The `NodeList` contains:
//! - the arena `nodes`, whose occupied slots own the nodes;
//! - a free list of vacated slots, reused by the next insertion;
//! - the `head` and `tail` handles, both `None` for an empty list;
//! - a length field `len`.
//!
//! Each [`Node`] links to its neighbours through [`NodeId`] handles, which
//! are only written by the list that owns the node.
//!
//! # Positions
//!
//! A node records its index when it is placed: at the current length on
//! append, at 0 on prepend, at the target index on insert. Nodes already in
//! the list are not renumbered, so recorded positions are cached hints that
//! can go stale. [`NodeList::index_of`] and the cursors always report the
//! logical index, and [`NodeList::reindex`] refreshes every position.
//!
//! # Iteration
//!
//! [`NodeList::iter`] yields values and [`NodeList::nodes`] yields nodes,
//! both forward-only and starting a fresh traversal on every call.
//!
//! ```
//! use node_list::NodeList;
//! use serde_json::json;
//!
//! let list = NodeList::from(["a", "b"]);
//! let mut iter = list.iter();
//! assert_eq!(iter.next(), Some(&json!("a")));
//! assert_eq!(iter.next(), Some(&json!("b")));
//! assert_eq!(iter.next(), None);
//! assert_eq!(list.iter().count(), 2);
//! ```
//!
//! # Algorithms
//!
//! - [`map`], [`filter`], [`reduce`], [`slice`] and [`unique`] build new lists
//!   or values without touching the original;
//! - [`sort`] and [`sort_by`] rebuild the list from its sorted values;
//! - [`flip`] rewrites values in reversed order and leaves the links alone;
//! - [`reverse`] reverses the links in place.
//!
//! # Serialization
//!
//! [`NodeList::to_json`] (and the [`serde::Serialize`] impl) produce an
//! object mapping each label, in list order, to the node's
//! `{data, size, label, pos, type}` record. [`NodeList::from_json`] reads it
//! back.
//!
//! [`NodeList`]: crate::NodeList
//! [`map`]: crate::NodeList::map
//! [`filter`]: crate::NodeList::filter
//! [`reduce`]: crate::NodeList::reduce
//! [`slice`]: crate::NodeList::slice
//! [`unique`]: crate::NodeList::unique
//! [`sort`]: crate::NodeList::sort
//! [`sort_by`]: crate::NodeList::sort_by
//! [`flip`]: crate::NodeList::flip
//! [`reverse`]: crate::NodeList::reverse

#[doc(inline)]
pub use error::{Error, Result};
#[doc(inline)]
pub use list::iterator::{IntoIter, Iter, Nodes};
#[doc(inline)]
pub use list::{Element, Node, NodeId, NodeList, NodeRecord, UNPLACED};
pub use serde_json::Value;
#[doc(inline)]
pub use value::ValueKind;

pub mod list;
pub mod value;

mod error;
