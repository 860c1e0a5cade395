use std::fmt;
use std::path::Path;

/// The main error type for loading and resolving `$ref` documents.
#[derive(Debug, Clone, PartialEq)]
pub enum RefError {
    /// Raised when a document cannot be read from disk.
    IoError {
        message: String,
        path: String,
        hint: Option<String>,
        code: Option<u32>,
    },
    /// Raised for malformed JSON and for `$ref` values that are not strings.
    ParseError {
        message: String,
        path: String,
        line: usize,
        column: usize,
        hint: Option<String>,
        code: Option<u32>,
    },
    /// Raised when a pointer is malformed or names a missing attribute.
    PathError {
        message: String,
        pointer: String,
        segment: String,
        document: Option<String>,
        hint: Option<String>,
        code: Option<u32>,
    },
    /// Raised when an `name[idx]` segment cannot be indexed.
    IndexError {
        message: String,
        pointer: String,
        index: usize,
        document: Option<String>,
        hint: Option<String>,
        code: Option<u32>,
    },
    /// Raised by typed accessors on a resolved document.
    TypeError {
        message: String,
        pointer: String,
        hint: Option<String>,
        code: Option<u32>,
    },
}

impl RefError {
    /// Numeric code attached to the error, if any.
    pub fn code(&self) -> Option<u32> {
        match self {
            RefError::IoError { code, .. }
            | RefError::ParseError { code, .. }
            | RefError::PathError { code, .. }
            | RefError::IndexError { code, .. }
            | RefError::TypeError { code, .. } => *code,
        }
    }

    pub fn is_io(&self) -> bool {
        matches!(self, RefError::IoError { .. })
    }

    /// Attach the document a pointer was evaluated against.
    ///
    /// Only path and index errors carry a document; other variants pass through.
    pub(crate) fn in_document(self, doc_path: &Path) -> RefError {
        let shown = doc_path.to_string_lossy().to_string();
        match self {
            RefError::PathError { message, pointer, segment, document: None, hint, code } => {
                RefError::PathError { message, pointer, segment, document: Some(shown), hint, code }
            }
            RefError::IndexError { message, pointer, index, document: None, hint, code } => {
                RefError::IndexError { message, pointer, index, document: Some(shown), hint, code }
            }
            other => other,
        }
    }

    /// Replace the placeholder path of a decode error with the file it came from.
    pub(crate) fn in_file(self, file: &Path) -> RefError {
        match self {
            RefError::ParseError { message, line, column, hint, code, .. } => RefError::ParseError {
                message,
                path: file.to_string_lossy().to_string(),
                line,
                column,
                hint,
                code,
            },
            other => other,
        }
    }
}

fn suffix(hint: &Option<String>, code: &Option<u32>) -> String {
    format!(
        "{}{}",
        hint.as_ref().map_or(String::new(), |h| format!(" Hint: {}", h)),
        code.map_or(String::new(), |c| format!(" Code: {}", c))
    )
}

impl fmt::Display for RefError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RefError::IoError { message, path, hint, code } =>
                write!(f, "[REF] IO Error '{}': {}{}", path, message, suffix(hint, code)),
            RefError::ParseError { message, path, line, column, hint, code } =>
                write!(f, "[REF] Parse Error in '{}' at {}:{}: {}{}",
                    path, line, column, message, suffix(hint, code)
                ),
            RefError::PathError { message, pointer, segment, document, hint, code } =>
                write!(f, "[REF] Path Error at '{}' in pointer '{}'{}: {}{}",
                    segment, pointer,
                    document.as_ref().map_or(String::new(), |d| format!(" ({})", d)),
                    message, suffix(hint, code)
                ),
            RefError::IndexError { message, pointer, index, document, hint, code } =>
                write!(f, "[REF] Index Error [{}] in pointer '{}'{}: {}{}",
                    index, pointer,
                    document.as_ref().map_or(String::new(), |d| format!(" ({})", d)),
                    message, suffix(hint, code)
                ),
            RefError::TypeError { message, pointer, hint, code } =>
                write!(f, "[REF] Type Error at '{}': {}{}", pointer, message, suffix(hint, code)),
        }
    }
}

impl std::error::Error for RefError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_path_error_names_segment_and_pointer() {
        let err = RefError::PathError {
            message: "missing not found".into(),
            pointer: "/a/missing".into(),
            segment: "missing".into(),
            document: Some("/tmp/main.json".into()),
            hint: None,
            code: Some(502),
        };
        let shown = err.to_string();
        assert!(shown.contains("'missing'"));
        assert!(shown.contains("'/a/missing'"));
        assert!(shown.contains("/tmp/main.json"));
        assert!(shown.ends_with("Code: 502"));
    }

    #[test]
    fn test_in_document_keeps_existing_document() {
        let err = RefError::IndexError {
            message: "out of bounds".into(),
            pointer: "/items[9]".into(),
            index: 9,
            document: Some("first.json".into()),
            hint: None,
            code: Some(510),
        };
        match err.in_document(Path::new("second.json")) {
            RefError::IndexError { document, .. } => assert_eq!(document.as_deref(), Some("first.json")),
            other => panic!("Expected IndexError, got {:?}", other),
        }
    }
}
