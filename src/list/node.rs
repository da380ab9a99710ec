use crate::error::{Error, Result};
use crate::list::NodeId;
use crate::value::{cardinality, ValueKind};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};
use std::sync::atomic::{self, AtomicU64};

/// Position of a node that has not been placed in a list yet.
pub const UNPLACED: i64 = -1;

static LABEL_SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// Stamp a process-unique label of the form `{kind}_{suffix}`.
fn next_label(kind: ValueKind) -> String {
    let suffix = LABEL_SEQUENCE.fetch_add(1, atomic::Ordering::Relaxed);
    format!("{}_{:06x}", kind, suffix)
}

/// Move the label sequence past the hexadecimal suffix of a label restored
/// from elsewhere, so it is never minted again in this process.
fn reserve_label(label: &str) {
    let suffix = match label.rsplit_once('_') {
        Some((_, suffix)) => suffix,
        None => return,
    };
    if let Ok(taken) = u64::from_str_radix(suffix, 16) {
        LABEL_SEQUENCE.fetch_max(taken.saturating_add(1), atomic::Ordering::Relaxed);
    }
}

/// A single value with its positional and type bookkeeping.
///
/// A `Node` lives either on its own (freshly built or duplicated) or inside
/// the arena of a [`NodeList`](crate::NodeList). Its `next` and `prev`
/// links are handles into that arena; they are only ever written by the
/// owning list, so a detached node always reports no neighbours.
///
/// # Examples
///
/// ```
/// use node_list::{Node, ValueKind};
/// use serde_json::json;
///
/// let node = Node::new(json!([1, 2, 3]));
/// assert_eq!(node.kind(), ValueKind::Sequence);
/// assert_eq!(node.cardinality(), 3);
/// assert_eq!(node.position(), -1);
/// assert!(node.label().starts_with("sequence_"));
/// ```
#[derive(Debug, PartialEq)]
pub struct Node {
    value: Value,
    kind: ValueKind,
    cardinality: usize,
    position: i64,
    label: String,
    next: Option<NodeId>,
    prev: Option<NodeId>,
}

/// The serialized form of a [`Node`].
///
/// Field names are part of the serialized contract of
/// [`NodeList::to_json`](crate::NodeList::to_json).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NodeRecord {
    pub data: Value,
    pub size: usize,
    pub label: String,
    pub pos: i64,
    #[serde(rename = "type")]
    pub kind: ValueKind,
}

impl Node {
    /// Create an unplaced node holding `value`.
    pub fn new(value: impl Into<Value>) -> Self {
        let value = value.into();
        let kind = ValueKind::of(&value);
        Self {
            cardinality: cardinality(&value),
            label: next_label(kind),
            position: UNPLACED,
            next: None,
            prev: None,
            kind,
            value,
        }
    }

    /// Create a node holding `value` at the given position.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::InvalidArgument`] if `position` is below the
    /// [`UNPLACED`] sentinel.
    pub fn with_position(value: impl Into<Value>, position: i64) -> Result<Self> {
        let mut node = Node::new(value);
        node.set_position(position)?;
        Ok(node)
    }

    pub(crate) fn from_record(record: NodeRecord) -> Result<Self> {
        let mut node = Node::with_position(record.data, record.pos)?;
        if record.label.is_empty() {
            return Err(Error::invalid("node record has an empty label"));
        }
        reserve_label(&record.label);
        node.label = record.label;
        Ok(node)
    }

    /// The stored value.
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Consume the node, returning its value.
    pub fn into_value(self) -> Value {
        self.value
    }

    /// The kind inferred from the value when it was last set.
    pub fn kind(&self) -> ValueKind {
        self.kind
    }

    /// Number of elements of a sequence or mapping value, 1 for anything
    /// else.
    ///
    /// # Examples
    ///
    /// ```
    /// use node_list::Node;
    /// use serde_json::json;
    ///
    /// assert_eq!(Node::new(json!({"a": 1, "b": 2})).cardinality(), 2);
    /// assert_eq!(Node::new(json!([])).cardinality(), 0);
    /// assert_eq!(Node::new("abc").cardinality(), 1);
    /// ```
    pub fn cardinality(&self) -> usize {
        self.cardinality
    }

    /// The logical index recorded when the node was last placed, or
    /// [`UNPLACED`].
    ///
    /// This is a cached hint: prepending or inserting before a node does not
    /// renumber it. See [`NodeList::reindex`](crate::NodeList::reindex).
    pub fn position(&self) -> i64 {
        self.position
    }

    /// Returns `true` unless the position is the [`UNPLACED`] sentinel.
    pub fn is_placed(&self) -> bool {
        self.position != UNPLACED
    }

    /// The process-unique label, `{kind}_{suffix}` for minted labels.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Handle of the following node in the owning list.
    pub fn next(&self) -> Option<NodeId> {
        self.next
    }

    /// Handle of the preceding node in the owning list.
    pub fn prev(&self) -> Option<NodeId> {
        self.prev
    }

    /// Replace the value, re-inferring its kind and cardinality. Returns the
    /// previous value.
    pub fn set_value(&mut self, value: impl Into<Value>) -> Value {
        let value = value.into();
        self.kind = ValueKind::of(&value);
        self.cardinality = cardinality(&value);
        std::mem::replace(&mut self.value, value)
    }

    /// Overwrite the recorded position.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::InvalidArgument`] if `position` is below the
    /// [`UNPLACED`] sentinel.
    pub fn set_position(&mut self, position: i64) -> Result<()> {
        if position < UNPLACED {
            return Err(Error::invalid(format!(
                "position {} is below the unplaced sentinel {}",
                position, UNPLACED
            )));
        }
        self.position = position;
        Ok(())
    }

    pub(crate) fn place(&mut self, position: usize) {
        self.position = i64::try_from(position).unwrap_or(i64::MAX);
    }

    pub(crate) fn set_next(&mut self, next: Option<NodeId>) {
        self.next = next;
    }

    pub(crate) fn set_prev(&mut self, prev: Option<NodeId>) {
        self.prev = prev;
    }

    /// Copy the node's value into a new unplaced, unlinked node with a
    /// fresh label.
    ///
    /// # Examples
    ///
    /// ```
    /// use node_list::Node;
    ///
    /// let node = Node::with_position("a", 4).unwrap();
    /// let copy = node.duplicate();
    /// assert_eq!(copy.value(), node.value());
    /// assert_eq!(copy.position(), -1);
    /// assert_ne!(copy.label(), node.label());
    /// ```
    pub fn duplicate(&self) -> Self {
        Self {
            value: self.value.clone(),
            kind: self.kind,
            cardinality: self.cardinality,
            position: UNPLACED,
            label: next_label(self.kind),
            next: None,
            prev: None,
        }
    }

    /// Snapshot the node as its serialized record.
    pub fn to_record(&self) -> NodeRecord {
        NodeRecord {
            data: self.value.clone(),
            size: self.cardinality,
            label: self.label.clone(),
            pos: self.position,
            kind: self.kind,
        }
    }

    /// Read an attribute by its serialized name.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::UndefinedAttribute`] for any name other than
    /// `data`, `size`, `label`, `pos` and `type`.
    pub fn attribute(&self, name: &str) -> Result<Value> {
        match name {
            "data" => Ok(self.value.clone()),
            "size" => Ok(Value::from(self.cardinality)),
            "label" => Ok(Value::from(self.label.as_str())),
            "pos" => Ok(Value::from(self.position)),
            "type" => Ok(Value::from(self.kind.as_str())),
            _ => Err(Error::UndefinedAttribute {
                name: name.to_owned(),
            }),
        }
    }
}

impl Serialize for Node {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.to_record().serialize(serializer)
    }
}

/// Input accepted by the inserting operations of a
/// [`NodeList`](crate::NodeList): either a plain value, wrapped into a new
/// node, or a pre-built [`Node`], which is reused as is.
#[derive(Debug)]
pub enum Element {
    Value(Value),
    Node(Node),
}

impl Element {
    /// Turn the element into a node placed at `position`.
    pub(crate) fn into_node(self, position: usize) -> Node {
        let mut node = match self {
            Element::Value(value) => Node::new(value),
            Element::Node(mut node) => {
                node.set_next(None);
                node.set_prev(None);
                node
            }
        };
        node.place(position);
        node
    }
}

impl From<Node> for Element {
    fn from(node: Node) -> Self {
        Element::Node(node)
    }
}

macro_rules! impl_element_from_value {
    ($($TYPE:ty),* $(,)?) => {
        $(
            impl From<$TYPE> for Element {
                fn from(value: $TYPE) -> Self {
                    Element::Value(Value::from(value))
                }
            }
        )*
    };
}

impl_element_from_value!(
    Value,
    bool,
    i8,
    i16,
    i32,
    i64,
    isize,
    u8,
    u16,
    u32,
    u64,
    usize,
    f32,
    f64,
    String,
    Vec<Value>,
    Map<String, Value>,
);

impl<'a> From<&'a str> for Element {
    fn from(value: &'a str) -> Self {
        Element::Value(Value::from(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn node_create() {
        let node = Node::new(42);
        assert_eq!(node.value(), &json!(42));
        assert_eq!(node.kind(), ValueKind::Integer);
        assert_eq!(node.cardinality(), 1);
        assert!(!node.is_placed());
        assert_eq!(node.next(), None);
        assert_eq!(node.prev(), None);
        assert!(node.label().starts_with("integer_"));
    }

    #[test]
    fn node_labels_are_unique() {
        let a = Node::new("x");
        let b = Node::new("x");
        assert_ne!(a.label(), b.label());
        assert_ne!(a.duplicate().label(), a.label());
    }

    #[test]
    fn node_set_value() {
        let mut node = Node::new("text");
        assert_eq!(node.kind(), ValueKind::String);
        let old = node.set_value(json!({"a": 1, "b": 2}));
        assert_eq!(old, json!("text"));
        assert_eq!(node.kind(), ValueKind::Mapping);
        assert_eq!(node.cardinality(), 2);
    }

    #[test]
    fn node_set_position() {
        let mut node = Node::new(1.5);
        assert!(node.set_position(3).is_ok());
        assert_eq!(node.position(), 3);
        assert!(node.set_position(UNPLACED).is_ok());
        assert!(!node.is_placed());

        let err = node.set_position(-2).unwrap_err();
        assert!(err.is_invalid_argument());
        assert_eq!(node.position(), UNPLACED);

        assert!(Node::with_position(true, -7).is_err());
    }

    #[test]
    fn node_duplicate() {
        let node = Node::with_position(json!(["a", "b"]), 2).unwrap();
        let copy = node.duplicate();
        assert_eq!(copy.value(), node.value());
        assert_eq!(copy.kind(), node.kind());
        assert_eq!(copy.cardinality(), 2);
        assert_eq!(copy.position(), UNPLACED);
        assert_ne!(copy.label(), node.label());
    }

    #[test]
    fn node_record() {
        let node = Node::with_position(json!([1, 2]), 5).unwrap();
        let record = node.to_record();
        assert_eq!(record.data, json!([1, 2]));
        assert_eq!(record.size, 2);
        assert_eq!(record.pos, 5);
        assert_eq!(record.kind, ValueKind::Sequence);

        let serialized = serde_json::to_value(&node).unwrap();
        assert_eq!(
            serialized,
            json!({
                "data": [1, 2],
                "size": 2,
                "label": node.label(),
                "pos": 5,
                "type": "sequence",
            })
        );
        let keys: Vec<_> = serialized.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, ["data", "size", "label", "pos", "type"]);
    }

    #[test]
    fn node_from_record() {
        let record = NodeRecord {
            data: json!("v"),
            size: 1,
            label: "string_restored".into(),
            pos: 0,
            kind: ValueKind::String,
        };
        let node = Node::from_record(record.clone()).unwrap();
        assert_eq!(node.label(), "string_restored");
        assert_eq!(node.to_record(), record);

        let empty = NodeRecord {
            label: String::new(),
            ..record
        };
        assert!(Node::from_record(empty).is_err());
    }

    #[test]
    fn node_from_record_reserves_label() {
        let minted = Node::new(0).label().to_owned();
        let (_, suffix) = minted.rsplit_once('_').unwrap();
        let taken = u64::from_str_radix(suffix, 16).unwrap() + 4;
        let record = NodeRecord {
            data: json!(1),
            size: 1,
            label: format!("integer_{:06x}", taken),
            pos: 0,
            kind: ValueKind::Integer,
        };
        let restored = Node::from_record(record).unwrap();

        for _ in 0..8 {
            assert_ne!(Node::new(1).label(), restored.label());
        }
    }

    #[test]
    fn node_attributes() {
        let node = Node::new("abc");
        assert_eq!(node.attribute("data").unwrap(), json!("abc"));
        assert_eq!(node.attribute("size").unwrap(), json!(1));
        assert_eq!(node.attribute("pos").unwrap(), json!(-1));
        assert_eq!(node.attribute("type").unwrap(), json!("string"));
        assert_eq!(node.attribute("label").unwrap(), json!(node.label()));

        let err = node.attribute("colour").unwrap_err();
        assert!(err.is_out_of_bounds());
    }

    #[test]
    fn element_into_node() {
        let node = Element::from("x").into_node(3);
        assert_eq!(node.position(), 3);

        let original = Node::new(7);
        let label = original.label().to_owned();
        let reused = Element::from(original).into_node(0);
        assert_eq!(reused.label(), label);
        assert_eq!(reused.position(), 0);
    }
}
