// Author: Dustin Pilgrim
// License: MIT

use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};
use serde_json::json;

use crate::ast::{Node, REF_KEY};
use crate::RefError;

/// Convert a node back to plain JSON.
///
/// - Scalars, arrays and objects map directly, keeping key order
/// - Tagged objects keep their `$type` field where it was
/// - References still present (cycles) become `{"$ref": "<raw>"}`
pub fn node_to_json(node: &Node) -> serde_json::Value {
    match node {
        Node::Null => serde_json::Value::Null,
        Node::Bool(b) => json!(b),
        Node::Number(n) => serde_json::Value::Number(n.clone()),
        Node::String(s) => json!(s),
        Node::Array(items) => serde_json::Value::Array(items.iter().map(node_to_json).collect()),
        Node::Object(fields) | Node::Tagged { fields, .. } => serde_json::Value::Object(
            fields.iter().map(|(k, v)| (k.clone(), node_to_json(v))).collect(),
        ),
        Node::Reference(reference) => {
            let mut map = serde_json::Map::new();
            map.insert(REF_KEY.to_string(), json!(reference.raw()));
            serde_json::Value::Object(map)
        }
    }
}

/// Export a node as pretty-printed JSON.
///
/// # Examples
/// ```no_run
/// use refgraph::export::export_node_to_json;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let root = refgraph::load("model.json")?;
/// for s in refgraph::find_by_type(&root, "Struct") {
///     println!("{}", export_node_to_json(s)?);
/// }
/// # Ok(())
/// # }
/// ```
pub fn export_node_to_json(node: &Node) -> Result<String, RefError> {
    serde_json::to_string_pretty(node).map_err(serialize_error)
}

fn serialize_error(e: serde_json::Error) -> RefError {
    RefError::ParseError {
        message: format!("Failed to serialize node: {}", e),
        path: String::new(),
        line: 0,
        column: 0,
        hint: None,
        code: Some(500),
    }
}

/// Load, resolve and export a file in one call.
///
/// # Errors
/// Returns error if any document in the graph is unreadable, is not JSON,
/// or contains a reference that cannot be resolved.
pub fn export_ref_file(path: &str) -> Result<String, RefError> {
    let root = crate::load(path)?;
    export_node_to_json(&root)
}

impl Serialize for Node {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Node::Null => serializer.serialize_unit(),
            Node::Bool(b) => serializer.serialize_bool(*b),
            Node::Number(n) => n.serialize(serializer),
            Node::String(s) => serializer.serialize_str(s),
            Node::Array(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Node::Object(fields) | Node::Tagged { fields, .. } => {
                let mut map = serializer.serialize_map(Some(fields.len()))?;
                for (k, v) in fields {
                    map.serialize_entry(k, v)?;
                }
                map.end()
            }
            Node::Reference(reference) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry(REF_KEY, reference.raw())?;
                map.end()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_node_to_json_preserves_order_and_type() {
        let source = json!({"name": "X", "$type": "Struct", "fields": [1, 2.5, null, true]});
        let node = Node::from_json(source.clone()).unwrap();
        let back = node_to_json(&node);
        assert_eq!(back, source);

        let keys: Vec<&String> = back.as_object().unwrap().keys().collect();
        assert_eq!(keys, vec!["name", "$type", "fields"]);
    }

    #[test]
    fn test_serialize_matches_node_to_json() {
        let node = Node::from_json(json!({"a": {"$ref": "other.json#/x"}, "b": "c"})).unwrap();
        let via_serde: serde_json::Value = serde_json::to_value(&node).unwrap();
        assert_eq!(via_serde, node_to_json(&node));
        assert_eq!(via_serde["a"]["$ref"], "other.json#/x");
    }

    #[test]
    fn test_export_pretty() {
        let node = Node::from_json(json!({"$type": "Struct", "name": "X"})).unwrap();
        let text = export_node_to_json(&node).unwrap();
        assert!(text.contains('\n'));
        let parsed: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed["name"], "X");
    }

    #[test]
    fn test_serialize_error_code() {
        let source = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = serialize_error(source);
        assert!(matches!(err, RefError::ParseError { code: Some(500), .. }));
        assert!(err.to_string().contains("Failed to serialize node"));
    }
}
