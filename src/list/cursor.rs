use crate::list::{Node, NodeId, NodeList};
use std::fmt;
use std::fmt::Formatter;

/// A cursor over a `NodeList`.
///
/// A `Cursor` is like an iterator, except that it can freely seek back-and-forth.
///
/// In a list with length *n*, there are *n* + 1 valid locations for the cursor,
/// indexed by 0, 1, ..., *n*, where *n* is the location past the last node.
///
/// # Examples
///
/// ```
/// use node_list::NodeList;
/// use serde_json::json;
///
/// // Create a list: [ A B C D ]
/// let list = NodeList::from(["A", "B", "C", "D"]);
///
/// // Create a cursor at start: [|A B C D ] (index = 0)
/// let mut cursor = list.cursor_start();
/// assert_eq!(cursor.value(), Some(&json!("A")));
///
/// // Move cursor forward: [ A|B C D ] (index = 1)
/// assert!(cursor.move_next().is_ok());
/// assert_eq!(cursor.value(), Some(&json!("B")));
///
/// // Seek to the back, walking from the nearest end: [ A B C|D ] (index = 3)
/// assert!(cursor.seek_to(3).is_ok());
/// assert_eq!(cursor.value(), Some(&json!("D")));
///
/// // Move past the end: [ A B C D| ] (index = 4)
/// assert!(cursor.move_next().is_ok());
/// assert_eq!(cursor.current(), None);
/// assert!(cursor.move_next().is_err());
/// ```
#[derive(Clone)]
pub struct Cursor<'a> {
    index: usize,
    current: Option<NodeId>,
    list: &'a NodeList,
}

// private methods
impl<'a> Cursor<'a> {
    pub(crate) fn new(list: &'a NodeList, current: Option<NodeId>, index: usize) -> Self {
        Self {
            index,
            current,
            list,
        }
    }

    fn is_past_end(&self) -> bool {
        self.current.is_none()
    }

    fn is_front_node(&self) -> bool {
        self.current.is_some() && self.current == self.list.head_id()
    }

    /// Move forward by given steps, without checking whether the walk
    /// passes the end of the list.
    fn seek_forward_fast(&mut self, steps: usize) {
        self.index += steps;
        for _ in 0..steps {
            self.current = self.current.and_then(|id| self.list.slot(id).next());
        }
    }

    /// Move backward by given steps, without checking whether the walk
    /// passes the front of the list.
    fn seek_backward_fast(&mut self, steps: usize) {
        self.index -= steps;
        for _ in 0..steps {
            self.current = self.current.and_then(|id| self.list.slot(id).prev());
        }
    }

    fn move_to_back(&mut self) {
        self.index = self.list.len().saturating_sub(1);
        self.current = self.list.tail_id();
    }
}

impl<'a> Cursor<'a> {
    /// Return the index of the cursor
    pub fn index(&self) -> usize {
        self.index
    }

    /// Returns `true` if the `NodeList` is empty.
    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    /// Move the cursor to the next position, or return an error when it
    /// is already past the end.
    ///
    /// This operation should compute in *O*(*1*) time.
    pub fn move_next(&mut self) -> Result<(), &'static str> {
        if self.is_past_end() {
            return Err("`move_next` past the end of the list");
        }
        self.seek_forward_fast(1);
        Ok(())
    }

    /// Move the cursor to the previous position, or return an error when
    /// it is at the first node.
    ///
    /// Moving back from past the end lands on the last node.
    ///
    /// This operation should compute in *O*(*1*) time.
    pub fn move_prev(&mut self) -> Result<(), &'static str> {
        if self.is_empty() || self.is_front_node() {
            return Err("`move_prev` before the front of the list");
        }
        if self.is_past_end() {
            self.move_to_back();
        } else {
            self.seek_backward_fast(1);
        }
        Ok(())
    }

    /// Move the cursor to the given position `target`, or return an error
    /// when `target > len`.
    ///
    /// If an error occurs, the cursor will stay put.
    ///
    /// The walk starts from the head when `target <= len / 2` and from the
    /// tail otherwise, unless the cursor's own location is strictly nearer.
    ///
    /// This operation should compute in *O*(min(*i*, *n* - *i*)) time.
    ///
    /// # Examples
    ///
    /// ```
    /// use node_list::NodeList;
    /// use serde_json::json;
    ///
    /// let list = NodeList::from([1, 2, 3]);
    /// let mut cursor = list.cursor_start();
    ///
    /// assert!(cursor.seek_to(2).is_ok());
    /// assert_eq!(cursor.value(), Some(&json!(3)));
    ///
    /// // Forbid to move to a invalid place
    /// assert!(cursor.seek_to(5).is_err());
    /// assert_eq!(cursor.index(), 2);
    /// ```
    pub fn seek_to(&mut self, target: usize) -> Result<(), usize> {
        let len = self.list.len();
        match target {
            target if target > len => return Err(target - len),
            target if target == self.index => {}
            target if target == len => self.move_to_end(),
            _ => {
                // current=c, target=t, head=h, tail=e
                let from_head = target;
                let from_tail = len - target - 1;
                let from_current = if self.is_past_end() {
                    usize::MAX
                } else {
                    target.abs_diff(self.index)
                };
                if from_current < from_head.min(from_tail) {
                    // target is near the current node: [ h   c-->t     e ]
                    if target > self.index {
                        self.seek_forward_fast(from_current);
                    } else {
                        self.seek_backward_fast(from_current);
                    }
                } else if target <= len / 2 {
                    // target is in the front half: [ h-->t     e ]
                    self.move_to_start();
                    self.seek_forward_fast(from_head);
                } else {
                    // target is in the back half: [ h     t<--e ]
                    self.move_to_back();
                    self.seek_backward_fast(from_tail);
                }
            }
        }
        Ok(())
    }

    /// Set the cursor to the start of the list (i.e. the first node).
    ///
    /// This operation should compute in *O*(*1*) time.
    #[inline]
    pub fn move_to_start(&mut self) {
        self.index = 0;
        self.current = self.list.head_id();
    }

    /// Set the cursor past the end of the list.
    ///
    /// This operation should compute in *O*(*1*) time.
    #[inline]
    pub fn move_to_end(&mut self) {
        self.index = self.list.len();
        self.current = None;
    }

    /// Return the current node of the cursor, or `None` if it is past the
    /// end.
    pub fn current(&self) -> Option<&'a Node> {
        let list = self.list;
        self.current.map(|id| list.slot(id))
    }

    /// Return the handle of the current node.
    pub fn current_id(&self) -> Option<NodeId> {
        self.current
    }

    /// Return the value of the current node.
    pub fn value(&self) -> Option<&'a serde_json::Value> {
        self.current().map(Node::value)
    }
}

impl<'a> fmt::Debug for Cursor<'a> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cursor")
            .field("list", &self.list)
            .field("current", &self.value())
            .field("index", &self.index)
            .finish()
    }
}

impl<'a> PartialEq for Cursor<'a> {
    /// Only cursors over the same list at the same location are equal.
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.list, other.list) && self.index == other.index
    }
}

impl<'a> Eq for Cursor<'a> {}
