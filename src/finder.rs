use crate::ast::Node;

/// Collect every node tagged `"$type": type_name`, depth-first pre-order.
///
/// Matches are borrows into `root`. Children of a matching node are searched too.
pub fn find_by_type<'a>(root: &'a Node, type_name: &str) -> Vec<&'a Node> {
    fn find<'a>(node: &'a Node, type_name: &str, result: &mut Vec<&'a Node>) {
        match node {
            Node::Tagged { type_name: tag, fields } => {
                if tag == type_name {
                    result.push(node);
                }
                for child in fields.values() {
                    find(child, type_name, result);
                }
            }
            Node::Object(fields) => {
                for child in fields.values() {
                    find(child, type_name, result);
                }
            }
            Node::Array(items) => {
                for child in items {
                    find(child, type_name, result);
                }
            }
            _ => {}
        }
    }

    let mut result = Vec::new();
    find(root, type_name, &mut result);
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn node(value: serde_json::Value) -> Node {
        Node::from_json(value).unwrap()
    }

    fn names<'a>(found: &[&'a Node]) -> Vec<&'a str> {
        found.iter().filter_map(|n| n.get("name").and_then(Node::as_str)).collect()
    }

    #[test]
    fn test_pre_order_including_nested_matches() {
        let root = node(json!({
            "outer": {
                "$type": "Struct",
                "name": "Outer",
                "inner": {"$type": "Struct", "name": "Inner"}
            },
            "list": [
                {"$type": "Enum", "name": "Skip"},
                {"wrapper": {"$type": "Struct", "name": "Listed"}}
            ],
            "last": {"$type": "Struct", "name": "Last"}
        }));

        let found = find_by_type(&root, "Struct");
        assert_eq!(names(&found), vec!["Outer", "Inner", "Listed", "Last"]);
    }

    #[test]
    fn test_no_matches_is_empty() {
        let root = node(json!({"a": {"$type": "Enum"}, "b": [1, "two", null]}));
        assert!(find_by_type(&root, "Struct").is_empty());
    }

    #[test]
    fn test_root_itself_can_match() {
        let root = node(json!({"$type": "Model", "parts": [{"$type": "Model"}]}));
        let found = find_by_type(&root, "Model");
        assert_eq!(found.len(), 2);
        assert!(std::ptr::eq(found[0], &root));
    }

    #[test]
    fn test_scalar_root() {
        let root = node(json!("Struct"));
        assert!(find_by_type(&root, "Struct").is_empty());
    }

    #[test]
    fn test_matches_are_live_borrows() {
        let root = node(json!({"b": {"$type": "Struct", "name": "X"}}));
        let found = find_by_type(&root, "Struct");
        assert!(std::ptr::eq(found[0], root.get("b").unwrap()));
    }
}
