//! Serialized form of a [`NodeList`]: a JSON object mapping each node's
//! label, in list order, to its [`NodeRecord`].

use crate::error::{Error, Result};
use crate::list::{Node, NodeList, NodeRecord};
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::Value;
use tracing::debug;

impl Serialize for NodeList {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for node in self.nodes() {
            map.serialize_entry(node.label(), node)?;
        }
        map.end()
    }
}

impl NodeList {
    /// Serialize the list into a JSON object keyed by node labels, through
    /// the [`Serialize`] impl of the list.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::Serialization`] if `serde_json` rejects the
    /// output.
    ///
    /// # Examples
    ///
    /// ```
    /// use node_list::NodeList;
    /// use serde_json::json;
    ///
    /// let list = NodeList::from([json!([1, 2])]);
    /// let label = list.head().unwrap().label();
    /// let json = list.to_json().unwrap();
    /// assert_eq!(
    ///     json[label],
    ///     json!({ "data": [1, 2], "size": 2, "label": label, "pos": 0, "type": "sequence" })
    /// );
    /// ```
    pub fn to_json(&self) -> Result<Value> {
        serde_json::to_value(self).map_err(|err| {
            debug!(%err, "failed to serialize list");
            Error::Serialization(err.to_string())
        })
    }

    /// Rebuild a list from the output of [`to_json`](NodeList::to_json).
    ///
    /// Node order, labels, values and recorded positions are restored;
    /// kinds and cardinalities are re-inferred from the values. Labels stay
    /// unique: keys of a JSON object are distinct, every label must equal its
    /// key, and labels minted afterwards never repeat a restored one.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::InvalidArgument`] if `json` is not an object of
    /// node records, if a record's label differs from its key, or if a
    /// record is unplaced (negative position).
    pub fn from_json(json: &Value) -> Result<NodeList> {
        let entries = json.as_object().ok_or_else(|| {
            debug!("refusing non-object serialized list");
            Error::invalid("serialized list must be a JSON object")
        })?;
        let mut list = NodeList::new();
        for (key, entry) in entries {
            let record: NodeRecord = serde_json::from_value(entry.clone()).map_err(|err| {
                debug!(key = key.as_str(), %err, "refusing malformed node record");
                Error::invalid(format!("malformed node record `{}`: {}", key, err))
            })?;
            if &record.label != key {
                return Err(Error::invalid(format!(
                    "node record label `{}` does not match its key `{}`",
                    record.label, key
                )));
            }
            if record.pos < 0 {
                debug!(key = key.as_str(), pos = record.pos, "refusing unplaced node record");
                return Err(Error::invalid(format!(
                    "node record `{}` has negative position {}",
                    key, record.pos
                )));
            }
            let position = record.pos;
            let node = Node::from_record(record)?;
            list.append(node);
            // appending places the node at the current length; keep the
            // recorded position instead
            if let Some(id) = list.tail_id() {
                list.slot_mut(id).set_position(position)?;
            }
        }
        Ok(list)
    }
}

#[cfg(test)]
mod tests {
    use crate::list::NodeList;
    use serde_json::{json, Value};

    #[test]
    fn serialize_in_list_order() {
        let mut list = NodeList::from([json!(1), json!("b"), json!({"k": true})]);
        list.prepend(0);
        let json = list.to_json().unwrap();
        let labels: Vec<_> = list.nodes().map(|node| node.label().to_owned()).collect();
        let keys: Vec<_> = json.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, labels);

        let head = &json[labels[0].as_str()];
        assert_eq!(head["data"], json!(0));
        assert_eq!(head["pos"], json!(0));
        assert_eq!(head["type"], json!("integer"));
        let tail = &json[labels[3].as_str()];
        assert_eq!(tail["size"], json!(1));
        assert_eq!(tail["type"], json!("mapping"));
        assert_eq!(tail["pos"], json!(2));

        // the serde impl and `to_json` agree
        assert_eq!(serde_json::to_value(&list).unwrap(), json);
    }

    #[test]
    fn serialize_empty() {
        assert_eq!(NodeList::new().to_json().unwrap(), json!({}));
        assert_eq!(serde_json::to_string(&NodeList::new()).unwrap(), "{}");
    }

    #[test]
    fn deserialize_restores_the_list() {
        let mut list = NodeList::from([json!("a"), json!([1, 2]), json!(null)]);
        list.prepend(json!(3.5));
        let json = list.to_json().unwrap();

        let restored = NodeList::from_json(&json).unwrap();
        restored.assert_well_formed();
        assert_eq!(restored, list);
        for (a, b) in list.nodes().zip(restored.nodes()) {
            assert_eq!(a.to_record(), b.to_record());
        }
        assert_eq!(restored.to_json().unwrap(), json);
    }

    #[test]
    fn deserialize_rejects_malformed_input() {
        assert!(NodeList::from_json(&json!([1, 2])).is_err());
        assert!(NodeList::from_json(&json!({"a": 1})).is_err());

        let mismatched = json!({
            "integer_x": {"data": 1, "size": 1, "label": "integer_y", "pos": 0, "type": "integer"}
        });
        let err = NodeList::from_json(&mismatched).unwrap_err();
        assert!(err.is_invalid_argument());

        let bad_position = json!({
            "integer_x": {"data": 1, "size": 1, "label": "integer_x", "pos": -5, "type": "integer"}
        });
        assert!(NodeList::from_json(&bad_position).is_err());

        // nodes inside a list are always placed
        let unplaced = json!({
            "string_a": {"data": "x", "size": 1, "label": "string_a", "pos": -1, "type": "string"}
        });
        let err = NodeList::from_json(&unplaced).unwrap_err();
        assert!(err.is_invalid_argument());
        assert!(NodeList::from_json(&Value::Null)
            .unwrap_err()
            .is_invalid_argument());
    }

    #[test]
    fn deserialize_then_append_keeps_labels_unique() {
        let minted = crate::list::Node::new(0).label().to_owned();
        let suffix = minted.rsplit('_').next().unwrap();
        let next = u64::from_str_radix(suffix, 16).unwrap() + 1;
        let label = format!("integer_{:06x}", next);
        let json = json!({
            label.as_str(): {"data": 1, "size": 1, "label": label.as_str(), "pos": 0, "type": "integer"}
        });

        let mut list = NodeList::from_json(&json).unwrap();
        list.append(2).append(3);
        let labels: Vec<_> = list.nodes().map(|node| node.label().to_owned()).collect();
        assert_eq!(labels[0], label);
        assert_ne!(labels[1], labels[0]);
        assert_ne!(labels[2], labels[0]);

        let json = list.to_json().unwrap();
        assert_eq!(json.as_object().unwrap().len(), list.len());
        assert_eq!(NodeList::from_json(&json).unwrap(), list);
    }
}
