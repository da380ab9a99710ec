use crate::list::{Element, Node, NodeId, NodeList};
use serde_json::Value;
use std::fmt;
use std::iter::FusedIterator;

/// An iterator over the handles of a `NodeList`, from head to tail.
#[derive(Clone)]
pub(crate) struct NodeIds<'a> {
    list: &'a NodeList,
    next: Option<NodeId>,
    len: usize,
}

impl<'a> NodeIds<'a> {
    pub(crate) fn new(list: &'a NodeList) -> Self {
        Self {
            list,
            next: list.head_id(),
            len: list.len(),
        }
    }
}

impl<'a> Iterator for NodeIds<'a> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = self.list.slot(current).next();
        self.len -= 1;
        Some(current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.len, Some(self.len))
    }
}

impl<'a> ExactSizeIterator for NodeIds<'a> {}

impl<'a> FusedIterator for NodeIds<'a> {}

/// An iterator over the nodes of a `NodeList`.
///
/// It is forward-only and borrows the list immutably, so the list cannot
/// be mutated while the iterator is alive.
///
/// # Examples
///
/// ```compile_fail
/// use node_list::NodeList;
///
/// let mut list = NodeList::from([1, 2, 3]);
/// let mut nodes = list.nodes();
///
/// // Won't compile, because list is already borrowed immutably.
/// list.append(4);
/// println!("{:?}", nodes.next());
/// ```
#[derive(Clone)]
pub struct Nodes<'a> {
    ids: NodeIds<'a>,
}

impl<'a> Nodes<'a> {
    pub(crate) fn new(list: &'a NodeList) -> Self {
        Self {
            ids: NodeIds::new(list),
        }
    }
}

impl<'a> fmt::Debug for Nodes<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

impl<'a> Iterator for Nodes<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<Self::Item> {
        let list = self.ids.list;
        self.ids.next().map(|id| list.slot(id))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.ids.size_hint()
    }
}

impl<'a> ExactSizeIterator for Nodes<'a> {}

impl<'a> FusedIterator for Nodes<'a> {}

/// An iterator over the values of a `NodeList`.
///
/// Each call to [`NodeList::iter`] starts a fresh traversal; values are
/// produced one node at a time.
#[derive(Clone)]
pub struct Iter<'a> {
    nodes: Nodes<'a>,
}

impl<'a> Iter<'a> {
    pub(crate) fn new(list: &'a NodeList) -> Self {
        Self {
            nodes: Nodes::new(list),
        }
    }
}

impl<'a> fmt::Debug for Iter<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Iter").field(&self.clone().collect::<Vec<_>>()).finish()
    }
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a Value;

    fn next(&mut self) -> Option<Self::Item> {
        self.nodes.next().map(Node::value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.nodes.size_hint()
    }
}

impl<'a> ExactSizeIterator for Iter<'a> {}

impl<'a> FusedIterator for Iter<'a> {}

/// An owning iterator over the values of a `NodeList`.
pub struct IntoIter {
    list: NodeList,
}

impl fmt::Debug for IntoIter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("IntoIter").field(&self.list).finish()
    }
}

impl Iterator for IntoIter {
    type Item = Value;

    fn next(&mut self) -> Option<Self::Item> {
        self.list.shift()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.list.len(), Some(self.list.len()))
    }
}

impl ExactSizeIterator for IntoIter {}

impl FusedIterator for IntoIter {}

impl IntoIterator for NodeList {
    type Item = Value;
    type IntoIter = IntoIter;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter { list: self }
    }
}

impl<'a> IntoIterator for &'a NodeList {
    type Item = &'a Value;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<E: Into<Element>> FromIterator<E> for NodeList {
    fn from_iter<I: IntoIterator<Item = E>>(iter: I) -> Self {
        let mut list = Self::new();
        list.extend(iter);
        list
    }
}

impl<E: Into<Element>, const N: usize> From<[E; N]> for NodeList {
    fn from(elements: [E; N]) -> Self {
        Self::from_iter(elements)
    }
}

impl<E: Into<Element>> Extend<E> for NodeList {
    fn extend<I: IntoIterator<Item = E>>(&mut self, iter: I) {
        for element in iter {
            self.append(element);
        }
    }
}
