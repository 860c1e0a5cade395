use super::*;

use crate::ast::Fields;
use crate::finder;
use crate::resolver::resolve_path;

impl RefDocument {
    /// Borrow the node a pointer addresses in the resolved graph.
    ///
    /// `"/"` is the root itself.
    pub fn get_node(&self, pointer: &str) -> Result<&Node, RefError> {
        resolve_path(&self.root, pointer)
    }

    /// Get a typed value from the document.
    ///
    /// # Examples
    /// ```no_run
    /// # use refgraph::RefDocument;
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// # let doc = RefDocument::from_file("model.json")?;
    /// let name: String = doc.get("/types[0]/name")?;
    /// let fields: Vec<String> = doc.get("/types[0]/field_names")?;
    /// # Ok(())
    /// # }
    /// ```
    ///
    /// # Errors
    /// Returns error if the pointer doesn't resolve or the value can't be converted to `T`.
    pub fn get<T>(&self, pointer: &str) -> Result<T, RefError>
    where
        T: TryFrom<Node, Error = RefError>,
    {
        let node = self.get_node(pointer)?.clone();
        T::try_from(node).map_err(|e| with_pointer(e, pointer))
    }

    /// Get an optional typed value - returns `None` if the path doesn't exist.
    pub fn get_optional<T>(&self, pointer: &str) -> Result<Option<T>, RefError>
    where
        T: TryFrom<Node, Error = RefError>,
    {
        match self.get(pointer) {
            Ok(value) => Ok(Some(value)),
            Err(RefError::PathError { code: Some(502), .. })
            | Err(RefError::IndexError { code: Some(510), .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Get a value with a fallback default.
    pub fn get_or<T>(&self, pointer: &str, default: T) -> T
    where
        T: TryFrom<Node, Error = RefError>,
    {
        self.get(pointer).unwrap_or(default)
    }

    /// Fields of the object at `pointer` as raw nodes, `$type` included.
    pub fn get_fields(&self, pointer: &str) -> Result<Fields, RefError> {
        self.get_node(pointer)?.fields().cloned().ok_or_else(|| RefError::TypeError {
            message: format!("Path '{}' is not an object", pointer),
            pointer: pointer.to_string(),
            hint: Some("Only objects have fields".into()),
            code: Some(406),
        })
    }

    /// Keys of the object at `pointer`, in document order.
    pub fn get_keys(&self, pointer: &str) -> Result<Vec<String>, RefError> {
        match self.get_node(pointer)?.fields() {
            Some(fields) => Ok(fields.keys().cloned().collect()),
            None => Err(RefError::TypeError {
                message: format!("Path '{}' is not an object", pointer),
                pointer: pointer.to_string(),
                hint: Some("Only objects have keys".into()),
                code: Some(406),
            }),
        }
    }

    pub fn has(&self, pointer: &str) -> bool {
        self.get_node(pointer).is_ok()
    }

    /// Every node tagged with `type_name`, depth-first pre-order.
    pub fn find_by_type(&self, type_name: &str) -> Vec<&Node> {
        finder::find_by_type(&self.root, type_name)
    }
}

fn with_pointer(e: RefError, at: &str) -> RefError {
    match e {
        RefError::TypeError { message, hint, code, .. } => RefError::TypeError {
            message,
            pointer: at.to_string(),
            hint,
            code,
        },
        other => other,
    }
}
