use crate::list::{Element, Node, NodeList};
use crate::value;
use serde_json::Value;
use std::cmp::Ordering;
use tracing::trace;

impl PartialEq for NodeList {
    /// Lists are equal when they hold strictly equal values in the same
    /// order. Labels and positions are not compared.
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other)
    }
}

impl Clone for NodeList {
    /// Build a new list by appending every value in order, so the copy has
    /// fresh nodes, labels and positions.
    fn clone(&self) -> Self {
        self.iter().cloned().collect()
    }
}

impl NodeList {
    /// Prepend every element of `iter` in iteration order, which leaves
    /// them in reversed order at the front of the list.
    ///
    /// # Examples
    ///
    /// ```
    /// use node_list::NodeList;
    /// use serde_json::json;
    ///
    /// let mut list = NodeList::from([3]);
    /// list.extend_front([2, 1]);
    /// assert_eq!(list.to_values(), vec![json!(1), json!(2), json!(3)]);
    /// ```
    pub fn extend_front<E, I>(&mut self, iter: I) -> &mut Self
    where
        E: Into<Element>,
        I: IntoIterator<Item = E>,
    {
        for element in iter {
            self.prepend(element);
        }
        self
    }

    /// Build a new list with `transform` applied to every value, preserving
    /// order.
    pub fn map<F>(&self, transform: F) -> NodeList
    where
        F: FnMut(&Value) -> Value,
    {
        self.iter().map(transform).collect()
    }

    /// Build a new list with the values of the nodes satisfying
    /// `predicate`.
    ///
    /// # Examples
    ///
    /// ```
    /// use node_list::{NodeList, ValueKind};
    /// use serde_json::json;
    ///
    /// let list = NodeList::from([json!(1), json!("a"), json!(2)]);
    /// let integers = list.filter(|node| node.kind() == ValueKind::Integer);
    /// assert_eq!(integers.to_values(), vec![json!(1), json!(2)]);
    /// ```
    pub fn filter<P>(&self, mut predicate: P) -> NodeList
    where
        P: FnMut(&Node) -> bool,
    {
        self.nodes()
            .filter(|&node| predicate(node))
            .map(|node| node.value().clone())
            .collect()
    }

    /// Fold the values from head to tail.
    ///
    /// # Examples
    ///
    /// ```
    /// use node_list::NodeList;
    ///
    /// let list = NodeList::from([1, 2, 3]);
    /// let sum = list.reduce(0, |acc, value| acc + value.as_i64().unwrap_or(0));
    /// assert_eq!(sum, 6);
    /// ```
    pub fn reduce<B, F>(&self, initial: B, combine: F) -> B
    where
        F: FnMut(B, &Value) -> B,
    {
        self.iter().fold(initial, combine)
    }

    /// Build a new list with up to `length` values starting at index
    /// `start`, or every value through the end if `length` is `None`.
    /// Negative `start` counts from the end; an out-of-range start yields
    /// an empty list.
    ///
    /// # Examples
    ///
    /// ```
    /// use node_list::NodeList;
    /// use serde_json::json;
    ///
    /// let list = NodeList::from_iter(0..6);
    /// assert_eq!(list.slice(1, Some(2)).to_values(), vec![json!(1), json!(2)]);
    /// assert_eq!(list.slice(-2, None).to_values(), vec![json!(4), json!(5)]);
    /// assert!(list.slice(6, None).is_empty());
    /// ```
    pub fn slice(&self, start: isize, length: Option<usize>) -> NodeList {
        let start = match self.normalize(start) {
            Some(start) => start,
            None => return NodeList::new(),
        };
        let length = length.unwrap_or(usize::MAX);
        let mut cursor = self.cursor(start);
        let mut slice = NodeList::new();
        while slice.len() < length {
            match cursor.value() {
                Some(value) => slice.append(value.clone()),
                None => break,
            };
            if cursor.move_next().is_err() {
                break;
            }
        }
        slice
    }

    /// Build a new list keeping the first occurrence of every distinct
    /// value, compared strictly.
    pub fn unique(&self) -> NodeList {
        let mut seen: Vec<&Value> = Vec::new();
        self.iter()
            .filter(|value| {
                if seen.contains(value) {
                    false
                } else {
                    seen.push(value);
                    true
                }
            })
            .cloned()
            .collect()
    }

    /// Sort the values by their [default ordering](crate::value::compare).
    ///
    /// The list is rebuilt from scratch: every node is replaced, so labels
    /// are regenerated and positions are renumbered.
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(*n* * log(*n*)) time and *O*(*n*) memory.
    ///
    /// # Examples
    ///
    /// ```
    /// use node_list::NodeList;
    /// use serde_json::json;
    ///
    /// let mut list = NodeList::from([json!(3), json!("a"), json!(1)]);
    /// list.sort(false);
    /// assert_eq!(list.to_values(), vec![json!(1), json!(3), json!("a")]);
    /// list.sort(true);
    /// assert_eq!(list.to_values(), vec![json!("a"), json!(3), json!(1)]);
    /// ```
    pub fn sort(&mut self, descending: bool) -> &mut Self {
        self.sort_by(value::compare, descending)
    }

    /// Sort the values with a comparator function, rebuilding the list.
    ///
    /// The sort is stable. With `descending`, the ascending result is
    /// reversed.
    pub fn sort_by<F>(&mut self, mut compare: F, descending: bool) -> &mut Self
    where
        F: FnMut(&Value, &Value) -> Ordering,
    {
        let mut values: Vec<Value> = std::mem::take(self).into_iter().collect();
        values.sort_by(|a, b| compare(a, b));
        if descending {
            values.reverse();
        }
        trace!(len = values.len(), descending, "rebuilding sorted list");
        self.extend(values);
        self
    }

    /// Rewrite the values in reversed order, leaving the links untouched.
    ///
    /// # Examples
    ///
    /// ```
    /// use node_list::NodeList;
    /// use serde_json::json;
    ///
    /// let mut list = NodeList::from([1, 2, 3]);
    /// let head = list.head_id();
    /// list.flip();
    /// assert_eq!(list.to_values(), vec![json!(3), json!(2), json!(1)]);
    /// assert_eq!(list.head_id(), head);
    /// ```
    pub fn flip(&mut self) -> &mut Self {
        self.flip_with(|value| value)
    }

    /// Like [`flip`](NodeList::flip), passing each value through `callback`
    /// before it is stored.
    pub fn flip_with<F>(&mut self, mut callback: F) -> &mut Self
    where
        F: FnMut(Value) -> Value,
    {
        let mut values = self.to_values();
        let ids: Vec<_> = self.ids().collect();
        for id in ids {
            if let Some(value) = values.pop() {
                self.slot_mut(id).set_value(callback(value));
            }
        }
        self
    }

    /// Reverse the structure of the list in place, in a single pass that
    /// swaps every node's `next` and `prev` links, then swaps head and tail.
    ///
    /// Nodes keep their labels and recorded positions.
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(*n*) time and *O*(1) memory.
    ///
    /// # Examples
    ///
    /// ```
    /// use node_list::NodeList;
    /// use serde_json::json;
    ///
    /// let mut list = NodeList::from([1, 2, 3]);
    /// let (head, tail) = (list.head_id(), list.tail_id());
    /// list.reverse();
    /// assert_eq!(list.to_values(), vec![json!(3), json!(2), json!(1)]);
    /// assert_eq!((list.head_id(), list.tail_id()), (tail, head));
    /// ```
    pub fn reverse(&mut self) -> &mut Self {
        let mut current = self.head;
        while let Some(id) = current {
            let node = self.slot_mut(id);
            let (prev, next) = (node.prev(), node.next());
            node.set_prev(next);
            node.set_next(prev);
            current = next;
        }
        std::mem::swap(&mut self.head, &mut self.tail);
        trace!(len = self.len(), "reversed list");
        self
    }
}

#[cfg(test)]
mod tests {
    use crate::list::{Node, NodeList};
    use crate::ValueKind;
    use serde_json::{json, Value};
    use std::cmp::Ordering;

    fn ints(list: &NodeList) -> Vec<i64> {
        list.iter().filter_map(Value::as_i64).collect()
    }

    #[test]
    fn list_eq_and_clone() {
        let list = NodeList::from([1, 2, 3]);
        let copy = list.clone();
        assert_eq!(list, copy);
        copy.assert_well_formed();
        for (a, b) in list.nodes().zip(copy.nodes()) {
            assert_ne!(a.label(), b.label());
            assert_eq!(a.position(), b.position());
        }
        assert_ne!(list, NodeList::from([1, 2]));
        assert_ne!(list, NodeList::from([json!(1), json!(2), json!(3.0)]));
    }

    #[test]
    fn list_extend_front() {
        let mut list = NodeList::new();
        list.extend_front(vec![1, 2, 3]);
        list.assert_well_formed();
        assert_eq!(ints(&list), vec![3, 2, 1]);
    }

    #[test]
    fn list_map() {
        let list = NodeList::from([1, 2, 3]);
        let doubled = list.map(|value| json!(value.as_i64().unwrap_or(0) * 2));
        assert_eq!(ints(&doubled), vec![2, 4, 6]);
        assert_eq!(ints(&list), vec![1, 2, 3]);
        assert!(NodeList::new().map(|value| value.clone()).is_empty());
    }

    #[test]
    fn list_filter() {
        let list = NodeList::from([json!(1), json!([1, 2]), json!("x"), json!([3])]);
        let sequences = list.filter(|node| node.kind() == ValueKind::Sequence);
        assert_eq!(sequences.to_values(), vec![json!([1, 2]), json!([3])]);
        let large = list.filter(|node| node.cardinality() > 1);
        assert_eq!(large.len(), 1);
        assert!(list.filter(|_| false).is_empty());
    }

    #[test]
    fn list_reduce() {
        let list = NodeList::from(["a", "b", "c"]);
        let joined = list.reduce(String::new(), |mut acc, value| {
            acc.push_str(value.as_str().unwrap_or_default());
            acc
        });
        assert_eq!(joined, "abc");
        assert_eq!(NodeList::new().reduce(7, |acc, _| acc + 1), 7);
    }

    #[test]
    fn list_slice() {
        let list = NodeList::from_iter(0..10);
        assert_eq!(ints(&list.slice(0, None)), (0..10).collect::<Vec<_>>());
        assert_eq!(ints(&list.slice(7, None)), vec![7, 8, 9]);
        assert_eq!(ints(&list.slice(7, Some(10))), vec![7, 8, 9]);
        assert_eq!(ints(&list.slice(2, Some(3))), vec![2, 3, 4]);
        assert_eq!(ints(&list.slice(-3, Some(1))), vec![7]);
        assert!(list.slice(3, Some(0)).is_empty());
        assert!(list.slice(10, None).is_empty());
        assert!(list.slice(-11, None).is_empty());
        list.slice(4, Some(4)).assert_well_formed();
    }

    #[test]
    fn list_unique() {
        let list = NodeList::from([json!(1), json!(2), json!(1), json!(1.0), json!("1"), json!(2)]);
        assert_eq!(
            list.unique().to_values(),
            vec![json!(1), json!(2), json!(1.0), json!("1")]
        );
    }

    #[test]
    fn list_sort() {
        let mut list = NodeList::from([5, 2, 4, 3, 1]);
        let labels: Vec<_> = list.nodes().map(|node| node.label().to_owned()).collect();
        list.sort(false);
        list.assert_well_formed();
        assert_eq!(ints(&list), vec![1, 2, 3, 4, 5]);
        let positions: Vec<_> = list.nodes().map(Node::position).collect();
        assert_eq!(positions, vec![0, 1, 2, 3, 4]);
        assert!(list
            .nodes()
            .all(|node| !labels.iter().any(|label| label == node.label())));

        list.sort(true);
        assert_eq!(ints(&list), vec![5, 4, 3, 2, 1]);
    }

    #[test]
    fn list_sort_by() {
        let mut list = NodeList::from(["bb", "a", "ccc", "dd"]);
        let by_len = |a: &Value, b: &Value| -> Ordering {
            let len = |v: &Value| v.as_str().map_or(0, str::len);
            len(a).cmp(&len(b))
        };
        list.sort_by(by_len, false);
        assert_eq!(
            list.to_values(),
            vec![json!("a"), json!("bb"), json!("dd"), json!("ccc")]
        );
        list.sort_by(by_len, true);
        assert_eq!(
            list.to_values(),
            vec![json!("ccc"), json!("dd"), json!("bb"), json!("a")]
        );
    }

    #[test]
    fn list_flip() {
        let mut list = NodeList::from([json!(1), json!("two"), json!([3])]);
        let labels: Vec<_> = list.nodes().map(|node| node.label().to_owned()).collect();
        list.flip();
        list.assert_well_formed();
        assert_eq!(list.to_values(), vec![json!([3]), json!("two"), json!(1)]);
        assert_eq!(list.head().unwrap().kind(), ValueKind::Sequence);
        let after: Vec<_> = list.nodes().map(|node| node.label().to_owned()).collect();
        assert_eq!(labels, after);

        list.flip_with(|value| json!([value]));
        assert_eq!(list.to_values(), vec![json!([1]), json!(["two"]), json!([[3]])]);
    }

    #[test]
    fn list_reverse() {
        for len in 0..6 {
            let mut list = NodeList::from_iter(0..len);
            let (head, tail) = (list.head_id(), list.tail_id());
            list.reverse();
            list.assert_well_formed();
            assert_eq!(ints(&list), (0..len).rev().collect::<Vec<_>>());
            assert_eq!(list.head_id(), tail);
            assert_eq!(list.tail_id(), head);
            list.reverse();
            assert_eq!(ints(&list), (0..len).collect::<Vec<_>>());
            assert_eq!(list.head_id(), head);
        }
    }

    #[test]
    fn list_reverse_then_mutate() {
        let mut list = NodeList::from([1, 2, 3]);
        list.reverse().append(0).prepend(4);
        list.insert(2, 9).unwrap();
        list.assert_well_formed();
        assert_eq!(ints(&list), vec![4, 3, 9, 2, 1, 0]);
        assert_eq!(list.remove_at(-2), Ok(json!(1)));
        list.assert_well_formed();
    }
}
