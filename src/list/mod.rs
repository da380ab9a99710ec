use std::fmt::{Debug, Formatter};

use serde_json::Value;
use tracing::{debug, trace};

use crate::error::{Error, Result};
use crate::list::cursor::Cursor;
use crate::list::iterator::{Iter, NodeIds, Nodes};
use crate::value::loose_eq;

pub use node::{Element, Node, NodeRecord, UNPLACED};

pub mod cursor;
pub mod iterator;

mod algorithms;
mod node;
mod serialize;

/// Stable handle of a node inside the arena of a [`NodeList`].
///
/// A handle stays valid until its node is removed from the list. After that
/// the slot may be reused by another node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

/// The `NodeList` is a doubly-linked list of [`Node`]s, each holding one
/// [`Value`] together with its kind, cardinality, cached position and label.
///
/// Nodes are owned by an index arena inside the list; `head`, `tail` and the
/// `next`/`prev` links of every node are [`NodeId`] handles into it. Vacated
/// slots are recycled through a free list.
///
/// The list satisfies, after every operation:
/// - `head` is `None` if and only if `tail` is `None`, if and only if the
///   list is empty;
/// - walking `next` from `head` visits exactly `len` nodes and ends at `tail`;
/// - for adjacent nodes `a` and `b`, `a.next == b` and `b.prev == a`;
///   `head.prev` and `tail.next` are `None`.
///
/// # Naming Conventions
///
/// - *index*: the logical 0-based offset of a node from the head, always
///   correct;
/// - *position*: the index a node recorded when it was last placed, which
///   may go stale (see [`NodeList::reindex`]).
pub struct NodeList {
    nodes: Vec<Option<Node>>,
    free: Vec<usize>,
    head: Option<NodeId>,
    tail: Option<NodeId>,
    /// the length of the list
    len: usize,
}

// private methods
impl NodeList {
    pub(crate) fn slot(&self, id: NodeId) -> &Node {
        match self.nodes.get(id.0) {
            Some(Some(node)) => node,
            _ => panic!("dangling node handle {:?}", id),
        }
    }

    pub(crate) fn slot_mut(&mut self, id: NodeId) -> &mut Node {
        match self.nodes.get_mut(id.0) {
            Some(Some(node)) => node,
            _ => panic!("dangling node handle {:?}", id),
        }
    }

    fn alloc(&mut self, node: Node) -> NodeId {
        match self.free.pop() {
            Some(index) => {
                self.nodes[index] = Some(node);
                NodeId(index)
            }
            None => {
                self.nodes.push(Some(node));
                NodeId(self.nodes.len() - 1)
            }
        }
    }

    fn release(&mut self, id: NodeId) -> Node {
        let node = self.nodes[id.0]
            .take()
            .unwrap_or_else(|| panic!("dangling node handle {:?}", id));
        self.free.push(id.0);
        node
    }

    /// Link `prev` and `next` together. A `None` side stands for the list
    /// boundary, so the head or tail is updated instead.
    pub(crate) fn connect(&mut self, prev: Option<NodeId>, next: Option<NodeId>) {
        match prev {
            Some(prev) => self.slot_mut(prev).set_next(next),
            None => self.head = next,
        }
        match next {
            Some(next) => self.slot_mut(next).set_prev(prev),
            None => self.tail = prev,
        }
    }

    /// Attach a detached node to the list, between `prev` and `next`.
    ///
    /// `prev` and `next` must be adjacent (checked only in
    /// `#[cfg(debug_assertions)]`), otherwise the list becomes ill-formed.
    fn attach_node(&mut self, prev: Option<NodeId>, next: Option<NodeId>, node: Node) -> NodeId {
        #[cfg(debug_assertions)]
        self.assert_adjacent(prev, next);
        let id = self.alloc(node);
        self.connect(prev, Some(id));
        self.connect(Some(id), next);
        self.len += 1;
        #[cfg(debug_assertions)]
        {
            self.assert_adjacent(prev, Some(id));
            self.assert_adjacent(Some(id), next);
        }
        id
    }

    /// Detach the node `id` from the list, re-link its neighbours and
    /// return the node.
    fn detach_node(&mut self, id: NodeId) -> Node {
        let (prev, next) = {
            let node = self.slot(id);
            (node.prev(), node.next())
        };
        self.connect(prev, next);
        self.len -= 1;
        #[cfg(debug_assertions)]
        self.assert_adjacent(prev, next);
        let mut node = self.release(id);
        node.set_prev(None);
        node.set_next(None);
        node
    }

    /// Drop all nodes without touching them one by one.
    fn reset(&mut self) {
        self.nodes.clear();
        self.free.clear();
        self.head = None;
        self.tail = None;
        self.len = 0;
    }

    /// Convert a possibly negative index into an index inside the list.
    fn normalize(&self, index: isize) -> Option<usize> {
        let len = isize::try_from(self.len).ok()?;
        let index = if index < 0 { index + len } else { index };
        usize::try_from(index).ok().filter(|&index| index < self.len)
    }

    /// Find the node at `index` with nearest-end traversal.
    fn locate(&self, index: usize) -> Option<NodeId> {
        if index >= self.len {
            return None;
        }
        self.cursor(index).current_id()
    }

    fn out_of_bounds(&self, index: isize) -> Error {
        debug!(index, len = self.len, "rejected out-of-bounds index");
        Error::IndexOutOfBounds {
            index,
            len: self.len,
        }
    }

    pub(crate) fn ids(&self) -> NodeIds<'_> {
        NodeIds::new(self)
    }

    #[cfg(debug_assertions)]
    fn assert_adjacent(&self, prev: Option<NodeId>, next: Option<NodeId>) {
        let after_prev = prev.map_or(self.head, |prev| self.slot(prev).next());
        let before_next = next.map_or(self.tail, |next| self.slot(next).prev());
        assert_eq!(after_prev, next);
        assert_eq!(before_next, prev);
    }
}

impl NodeList {
    /// Create an empty `NodeList`.
    ///
    /// # Examples
    /// ```
    /// use node_list::NodeList;
    /// let list = NodeList::new();
    /// assert!(list.is_empty());
    /// ```
    #[inline]
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            free: Vec::new(),
            head: None,
            tail: None,
            len: 0,
        }
    }

    /// Returns `true` if the `NodeList` is empty.
    ///
    /// This operation should compute in *O*(1) time.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    /// Returns the number of nodes in the `NodeList`.
    ///
    /// This operation should compute in *O*(1) time.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// The first node, or `None` if the list is empty.
    pub fn head(&self) -> Option<&Node> {
        self.head.map(|id| self.slot(id))
    }

    /// The last node, or `None` if the list is empty.
    pub fn tail(&self) -> Option<&Node> {
        self.tail.map(|id| self.slot(id))
    }

    /// Handle of the first node, or `None` if the list is empty.
    pub fn head_id(&self) -> Option<NodeId> {
        self.head
    }

    /// Handle of the last node, or `None` if the list is empty.
    pub fn tail_id(&self) -> Option<NodeId> {
        self.tail
    }

    /// Resolve a handle, or return `None` if its node has been removed.
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0).and_then(Option::as_ref)
    }

    /// Removes all nodes from the `NodeList`.
    pub fn clear(&mut self) {
        self.reset();
    }

    /// Appends an element to the back of the list and returns the list for
    /// chaining.
    ///
    /// A plain value is wrapped into a new node; a pre-built [`Node`] is
    /// moved in and reused, keeping its label. Either way the node records
    /// the current length as its position.
    ///
    /// This operation should compute in *O*(1) time.
    ///
    /// # Examples
    ///
    /// ```
    /// use node_list::NodeList;
    /// use serde_json::json;
    ///
    /// let mut list = NodeList::new();
    /// list.append(1).append(2).append(3);
    /// assert_eq!(list.len(), 3);
    /// assert_eq!(list.get_value(0), Some(&json!(1)));
    /// assert_eq!(list.get_value(-1), Some(&json!(3)));
    /// ```
    pub fn append(&mut self, element: impl Into<Element>) -> &mut Self {
        let node = element.into().into_node(self.len);
        self.attach_node(self.tail, None, node);
        self
    }

    /// Adds an element first in the list and returns the list for chaining.
    ///
    /// The new node records position 0. Nodes already in the list keep
    /// their recorded positions.
    ///
    /// This operation should compute in *O*(1) time.
    ///
    /// # Examples
    ///
    /// ```
    /// use node_list::NodeList;
    /// use serde_json::json;
    ///
    /// let mut list = NodeList::new();
    /// list.prepend("b").prepend("a");
    /// assert_eq!(list.head().unwrap().value(), &json!("a"));
    /// assert_eq!(list.tail().unwrap().value(), &json!("b"));
    /// ```
    pub fn prepend(&mut self, element: impl Into<Element>) -> &mut Self {
        let node = element.into().into_node(0);
        self.attach_node(None, self.head, node);
        self
    }

    /// Adds an element at the given index in the list, splicing it in
    /// before the node currently at `index`.
    ///
    /// `index == 0` behaves like [`prepend`](NodeList::prepend) and
    /// `index == len` like [`append`](NodeList::append).
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(min(*i*, *n* - *i*)) time.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::IndexOutOfBounds`] if `index > len`.
    ///
    /// # Examples
    ///
    /// ```
    /// use node_list::NodeList;
    /// use serde_json::json;
    ///
    /// let mut list = NodeList::from([1, 2, 4]);
    /// list.insert(2, 3).unwrap();
    /// assert_eq!(list.to_values(), vec![json!(1), json!(2), json!(3), json!(4)]);
    /// assert!(list.insert(9, 5).is_err());
    /// ```
    pub fn insert(&mut self, index: usize, element: impl Into<Element>) -> Result<&mut Self> {
        if index > self.len {
            return Err(self.out_of_bounds(isize::try_from(index).unwrap_or(isize::MAX)));
        }
        if index == 0 {
            return Ok(self.prepend(element));
        }
        if index == self.len {
            return Ok(self.append(element));
        }
        let target = self
            .locate(index)
            .ok_or_else(|| self.out_of_bounds(index as isize))?;
        let prev = self.slot(target).prev();
        trace!(index, "splicing node before {:?}", target);
        let node = element.into().into_node(index);
        self.attach_node(prev, Some(target), node);
        Ok(self)
    }

    /// Provides the node at `index`, or `None` if it is out of range.
    /// Negative indices count from the end.
    ///
    /// Index 0 and `len - 1` are served without traversal; any other index
    /// walks from whichever end is nearer.
    ///
    /// # Examples
    ///
    /// ```
    /// use node_list::NodeList;
    /// use serde_json::json;
    ///
    /// let list = NodeList::from(["a", "b", "c"]);
    /// assert_eq!(list.get(1).unwrap().value(), &json!("b"));
    /// assert_eq!(list.get(-1).unwrap().value(), &json!("c"));
    /// assert!(list.get(3).is_none());
    /// assert!(list.get(-4).is_none());
    /// ```
    pub fn get(&self, index: isize) -> Option<&Node> {
        let id = self.normalize(index).and_then(|index| self.locate(index))?;
        Some(self.slot(id))
    }

    /// Like [`get`](NodeList::get), but provides the node's value.
    pub fn get_value(&self, index: isize) -> Option<&Value> {
        self.get(index).map(Node::value)
    }

    /// Replace the value at `index` and return the previous one.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::IndexOutOfBounds`] if `index` is out of range.
    pub fn replace(&mut self, index: isize, value: impl Into<Value>) -> Result<Value> {
        let id = self
            .normalize(index)
            .and_then(|index| self.locate(index))
            .ok_or_else(|| self.out_of_bounds(index))?;
        Ok(self.slot_mut(id).set_value(value))
    }

    /// Scan from the head for `value` and return the recorded position of
    /// the first matching node.
    ///
    /// `strict` selects structural equality; otherwise
    /// [loose equality](crate::value::loose_eq) is used. A `null` search
    /// value never matches.
    ///
    /// # Examples
    ///
    /// ```
    /// use node_list::NodeList;
    /// use serde_json::json;
    ///
    /// let list = NodeList::from([json!(1), json!("2"), json!(null)]);
    /// assert_eq!(list.find(&json!("2"), true), Some(1));
    /// assert_eq!(list.find(&json!(2), true), None);
    /// assert_eq!(list.find(&json!(2), false), Some(1));
    /// assert_eq!(list.find(&json!(null), false), None);
    /// ```
    pub fn find(&self, value: &Value, strict: bool) -> Option<usize> {
        if value.is_null() {
            return None;
        }
        let node = self.nodes().find(|node| {
            if strict {
                node.value() == value
            } else {
                loose_eq(node.value(), value)
            }
        })?;
        usize::try_from(node.position()).ok()
    }

    /// Logical index of the first node strictly equal to `value`.
    ///
    /// Unlike [`find`](NodeList::find), the result never depends on cached
    /// positions.
    pub fn index_of(&self, value: &Value) -> Option<usize> {
        self.iter().position(|v| v == value)
    }

    /// Returns `true` if the list holds a value loosely equal to `value`.
    pub fn contains(&self, value: &Value) -> bool {
        self.find(value, false).is_some()
    }

    /// Like [`contains`](NodeList::contains), for the value of `node`.
    pub fn contains_node(&self, node: &Node) -> bool {
        self.contains(node.value())
    }

    /// Remove the first node strictly equal to `value`. Returns `false` if
    /// there is none.
    ///
    /// # Examples
    ///
    /// ```
    /// use node_list::NodeList;
    /// use serde_json::json;
    ///
    /// let mut list = NodeList::from([1, 2]);
    /// assert!(list.remove(&json!(1)));
    /// assert!(!list.remove(&json!(1)));
    /// assert_eq!(list.len(), 1);
    /// assert_eq!(list.head_id(), list.tail_id());
    /// ```
    pub fn remove(&mut self, value: &Value) -> bool {
        let found = self.ids().find(|&id| self.slot(id).value() == value);
        match found {
            Some(id) => {
                trace!("removing node {:?}", id);
                self.detach_node(id);
                true
            }
            None => false,
        }
    }

    /// Remove the node at `index` and return its value. Negative indices
    /// count from the end.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::IndexOutOfBounds`] if `index` is out of range.
    pub fn remove_at(&mut self, index: isize) -> Result<Value> {
        let id = self
            .normalize(index)
            .and_then(|index| self.locate(index))
            .ok_or_else(|| self.out_of_bounds(index))?;
        trace!(index, "removing node {:?}", id);
        Ok(self.detach_node(id).into_value())
    }

    /// Removes the last node and returns its value, or `None` if the list
    /// is empty.
    pub fn pop(&mut self) -> Option<Value> {
        let id = self.tail?;
        Some(self.detach_node(id).into_value())
    }

    /// Removes the first node and returns its value, or `None` if the list
    /// is empty.
    pub fn shift(&mut self) -> Option<Value> {
        let id = self.head?;
        Some(self.detach_node(id).into_value())
    }

    /// Refresh every node's recorded position to its logical index.
    ///
    /// # Examples
    ///
    /// ```
    /// use node_list::NodeList;
    ///
    /// let mut list = NodeList::from(["b", "c"]);
    /// list.prepend("a");
    /// assert_eq!(list.get(1).unwrap().position(), 0);
    ///
    /// list.reindex();
    /// assert_eq!(list.get(1).unwrap().position(), 1);
    /// ```
    pub fn reindex(&mut self) {
        let mut current = self.head;
        let mut index = 0;
        while let Some(id) = current {
            let node = self.slot_mut(id);
            node.place(index);
            current = node.next();
            index += 1;
        }
    }

    /// Provides a cursor at the node with given index, located with
    /// nearest-end traversal.
    ///
    /// By convention, the cursor is past the end if `at == len`.
    ///
    /// # Panics
    ///
    /// Panics if `at > len`
    ///
    /// # Examples
    ///
    /// ```
    /// use node_list::NodeList;
    /// use serde_json::json;
    ///
    /// let list = NodeList::from([1, 2, 3]);
    /// assert_eq!(list.cursor(1).current().unwrap().value(), &json!(2));
    /// assert!(list.cursor(3).current().is_none());
    /// ```
    pub fn cursor(&self, at: usize) -> Cursor<'_> {
        assert!(at <= self.len, "Cannot create cursor at a nonexistent index");
        let mut cursor = self.cursor_start();
        if cursor.seek_to(at).is_err() {
            unreachable!("`at` was checked against the length");
        }
        cursor
    }

    /// Provides a cursor at the first node, or past the end if the list is
    /// empty.
    pub fn cursor_start(&self) -> Cursor<'_> {
        Cursor::new(self, self.head, 0)
    }

    /// Provides a cursor past the end of the list.
    pub fn cursor_end(&self) -> Cursor<'_> {
        Cursor::new(self, None, self.len)
    }

    /// Provides a forward iterator over the values.
    ///
    /// Every call starts a fresh traversal from the head.
    #[inline]
    pub fn iter(&self) -> Iter<'_> {
        Iter::new(self)
    }

    /// Provides a forward iterator over the nodes.
    #[inline]
    pub fn nodes(&self) -> Nodes<'_> {
        Nodes::new(self)
    }

    /// Copy the values into a vector, in list order.
    pub fn to_values(&self) -> Vec<Value> {
        self.iter().cloned().collect()
    }

    /// Check every structural invariant of the list.
    #[cfg(test)]
    pub(crate) fn assert_well_formed(&self) {
        assert_eq!(self.head.is_none(), self.tail.is_none());
        assert_eq!(self.head.is_none(), self.len == 0);
        let mut prev = None;
        let mut current = self.head;
        let mut count = 0;
        while let Some(id) = current {
            let node = self.slot(id);
            assert_eq!(node.prev(), prev);
            prev = current;
            current = node.next();
            count += 1;
        }
        assert_eq!(prev, self.tail);
        assert_eq!(count, self.len);
        assert_eq!(
            self.nodes.iter().filter(|slot| slot.is_some()).count(),
            self.len
        );
    }
}

impl Debug for NodeList {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl Default for NodeList {
    fn default() -> Self {
        Self::new()
    }
}
