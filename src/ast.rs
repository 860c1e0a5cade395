use indexmap::IndexMap;
use serde_json::Number;

use crate::RefError;

pub const REF_KEY: &str = "$ref";
pub const TYPE_KEY: &str = "$type";

/// Object fields in document order.
pub type Fields = IndexMap<String, Node>;

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    Array(Vec<Node>),
    Object(Fields),
    /// An object carrying a string `$type`. `fields` still holds the `$type` entry.
    Tagged { type_name: String, fields: Fields },
    Reference(Reference),
}

/// A `{"$ref": "<uri>#<pointer>"}` site waiting to be substituted.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Reference {
    raw: String,
    uri: String,
    pointer: String,
}

impl Reference {
    /// Split at the first `#`. Without a `#` the whole value is the uri.
    pub fn parse(raw: &str) -> Self {
        let (uri, pointer) = raw.split_once('#').unwrap_or((raw, ""));
        Self {
            raw: raw.to_string(),
            uri: uri.to_string(),
            pointer: pointer.to_string(),
        }
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// The file part, `None` for same-document references.
    pub fn uri(&self) -> Option<&str> {
        if self.uri.is_empty() { None } else { Some(&self.uri) }
    }

    pub fn pointer(&self) -> &str {
        &self.pointer
    }
}

impl Node {
    /// Decode a parsed JSON value, classifying objects by their reserved keys.
    pub fn from_json(value: serde_json::Value) -> Result<Node, RefError> {
        use serde_json::Value as Json;

        Ok(match value {
            Json::Null => Node::Null,
            Json::Bool(b) => Node::Bool(b),
            Json::Number(n) => Node::Number(n),
            Json::String(s) => Node::String(s),
            Json::Array(items) => Node::Array(
                items.into_iter().map(Node::from_json).collect::<Result<_, _>>()?,
            ),
            Json::Object(map) => {
                if let Some(target) = map.get(REF_KEY) {
                    return match target {
                        Json::String(raw) => Ok(Node::Reference(Reference::parse(raw))),
                        other => Err(RefError::ParseError {
                            message: format!("`$ref` must be a string, got {}", other),
                            path: String::new(),
                            line: 0,
                            column: 0,
                            hint: Some("Write references as \"file.json#/path\" or \"#/path\"".into()),
                            code: Some(311),
                        }),
                    };
                }

                let type_name = match map.get(TYPE_KEY) {
                    Some(Json::String(t)) => Some(t.clone()),
                    _ => None,
                };

                let mut fields = Fields::with_capacity(map.len());
                for (k, v) in map {
                    fields.insert(k, Node::from_json(v)?);
                }

                match type_name {
                    Some(type_name) => Node::Tagged { type_name, fields },
                    None => Node::Object(fields),
                }
            }
        })
    }

    /// The `$type` tag, if this node is a tagged object.
    pub fn type_name(&self) -> Option<&str> {
        match self {
            Node::Tagged { type_name, .. } => Some(type_name),
            _ => None,
        }
    }

    pub fn fields(&self) -> Option<&Fields> {
        match self {
            Node::Object(fields) | Node::Tagged { fields, .. } => Some(fields),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&Vec<Node>> {
        if let Node::Array(items) = self {
            Some(items)
        } else {
            None
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        if let Node::String(s) = self {
            Some(s)
        } else {
            None
        }
    }

    /// Attribute lookup on plain or tagged objects.
    pub fn get(&self, key: &str) -> Option<&Node> {
        self.fields().and_then(|fields| fields.get(key))
    }

    pub fn is_reference(&self) -> bool {
        matches!(self, Node::Reference(_))
    }

    pub fn is_scalar(&self) -> bool {
        matches!(self, Node::Null | Node::Bool(_) | Node::Number(_) | Node::String(_))
    }

    /// Whether any `$ref` site is still reachable from this node.
    pub fn has_references(&self) -> bool {
        match self {
            Node::Reference(_) => true,
            Node::Array(items) => items.iter().any(Node::has_references),
            Node::Object(fields) | Node::Tagged { fields, .. } => {
                fields.values().any(Node::has_references)
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_reference_split_at_first_hash() {
        let r = Reference::parse("other.json#/defs/a#b");
        assert_eq!(r.uri(), Some("other.json"));
        assert_eq!(r.pointer(), "/defs/a#b");

        let local = Reference::parse("#/b");
        assert_eq!(local.uri(), None);
        assert_eq!(local.pointer(), "/b");

        let bare = Reference::parse("other.json");
        assert_eq!(bare.uri(), Some("other.json"));
        assert_eq!(bare.pointer(), "");
    }

    #[test]
    fn test_decode_classifies_reserved_keys() {
        let node = Node::from_json(json!({
            "plain": {"a": 1},
            "tagged": {"$type": "Struct", "name": "X"},
            "link": {"$ref": "#/plain", "ignored": true},
            "odd": {"$type": 3}
        }))
        .unwrap();

        assert!(matches!(node.get("plain"), Some(Node::Object(_))));
        assert_eq!(node.get("tagged").and_then(Node::type_name), Some("Struct"));
        assert!(node.get("link").unwrap().is_reference());
        assert!(matches!(node.get("odd"), Some(Node::Object(_))));
        assert!(node.has_references());
    }

    #[test]
    fn test_tagged_fields_keep_type_entry_in_order() {
        let node = Node::from_json(json!({"name": "X", "$type": "Struct"})).unwrap();
        let keys: Vec<&str> = node.fields().unwrap().keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["name", "$type"]);
    }

    #[test]
    fn test_non_string_ref_is_parse_error() {
        let err = Node::from_json(json!({"a": {"$ref": 42}})).unwrap_err();
        assert_eq!(err.code(), Some(311));
    }
}
