// Author: Dustin Pilgrim
// License: MIT

use indexmap::IndexMap;

use crate::ast::Node;
use crate::RefError;

fn type_error(message: String, hint: Option<&str>, code: u32) -> RefError {
    RefError::TypeError {
        message,
        pointer: String::new(),
        hint: hint.map(Into::into),
        code: Some(code),
    }
}

impl TryFrom<Node> for String {
    type Error = RefError;

    fn try_from(value: Node) -> Result<Self, Self::Error> {
        match value {
            Node::String(s) => Ok(s),
            _ => Err(type_error(
                format!("Expected string, got {:?}", value),
                Some("Use a string value in your document"),
                401,
            )),
        }
    }
}

impl TryFrom<Node> for f64 {
    type Error = RefError;

    fn try_from(value: Node) -> Result<Self, Self::Error> {
        match &value {
            Node::Number(n) => n.as_f64().ok_or_else(|| {
                type_error(format!("Number {} is not representable as f64", n), None, 402)
            }),
            _ => Err(type_error(
                format!("Expected number, got {:?}", value),
                Some("Use a number value in your document"),
                402,
            )),
        }
    }
}

impl TryFrom<Node> for i64 {
    type Error = RefError;

    fn try_from(value: Node) -> Result<Self, Self::Error> {
        match &value {
            Node::Number(n) => n.as_i64().ok_or_else(|| {
                type_error(
                    format!("Number {} out of range for i64", n),
                    Some("Use an integer within i64 range"),
                    402,
                )
            }),
            _ => Err(type_error(format!("Expected number, got {:?}", value), None, 402)),
        }
    }
}

impl TryFrom<Node> for u64 {
    type Error = RefError;

    fn try_from(value: Node) -> Result<Self, Self::Error> {
        match &value {
            Node::Number(n) => n.as_u64().ok_or_else(|| {
                type_error(
                    format!("Number {} out of range for u64", n),
                    Some("Use a non-negative integer within u64 range"),
                    403,
                )
            }),
            _ => Err(type_error(format!("Expected number, got {:?}", value), None, 402)),
        }
    }
}

impl TryFrom<Node> for bool {
    type Error = RefError;

    fn try_from(value: Node) -> Result<Self, Self::Error> {
        match value {
            Node::Bool(b) => Ok(b),
            Node::String(ref s) if s.eq_ignore_ascii_case("true") || s.eq_ignore_ascii_case("false") => {
                Err(type_error(
                    format!("Expected boolean, got string \"{}\"", s),
                    Some("Write true/false without quotes"),
                    404,
                ))
            }
            _ => Err(type_error(format!("Expected boolean, got {:?}", value), None, 404)),
        }
    }
}

impl<T> TryFrom<Node> for Vec<T>
where
    T: TryFrom<Node, Error = RefError>,
{
    type Error = RefError;

    fn try_from(value: Node) -> Result<Self, Self::Error> {
        match value {
            Node::Array(arr) => {
                let mut result = Vec::with_capacity(arr.len());
                for item in arr {
                    result.push(T::try_from(item)?);
                }
                Ok(result)
            }
            _ => Err(type_error(
                format!("Expected array, got {:?}", value),
                Some("Use an array [...] in your document"),
                405,
            )),
        }
    }
}

/// Objects convert to an ordered map; tagged objects keep their `$type` entry.
impl<T> TryFrom<Node> for IndexMap<String, T>
where
    T: TryFrom<Node, Error = RefError>,
{
    type Error = RefError;

    fn try_from(value: Node) -> Result<Self, Self::Error> {
        match value {
            Node::Object(fields) | Node::Tagged { fields, .. } => {
                let mut map = IndexMap::with_capacity(fields.len());
                for (k, v) in fields {
                    map.insert(k, T::try_from(v)?);
                }
                Ok(map)
            }
            _ => Err(type_error(
                format!("Expected object, got {:?}", value),
                Some("Use an object {...} in your document"),
                406,
            )),
        }
    }
}
