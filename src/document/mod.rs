// Author: Dustin Pilgrim
// License: MIT

use std::path::{Path, PathBuf};

use crate::ast::Node;
use crate::resolver::{self, LoadOptions, Resolution};
use crate::RefError;

mod access;
mod conversion;

/// A fully resolved document graph together with the files it was built from.
#[derive(Debug, Clone, PartialEq)]
pub struct RefDocument {
    root: Node,
    files: Vec<PathBuf>,
}

impl RefDocument {
    /// Load a JSON file and resolve every `$ref` it reaches.
    ///
    /// # Example
    /// ```ignore
    /// let doc = RefDocument::from_file("model/main.json")?;
    /// ```
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, RefError> {
        Self::from_file_with_options(path, &LoadOptions::default())
    }

    pub fn from_file_with_options<P: AsRef<Path>>(path: P, options: &LoadOptions) -> Result<Self, RefError> {
        resolver::resolve_file(path.as_ref(), options).map(Self::from_resolution)
    }

    /// Load a document with fallback support
    ///
    /// Tries the primary path first. Only when the primary file itself cannot be
    /// read is the fallback loaded; errors inside an existing primary (bad JSON,
    /// missing referenced files, broken pointers) are returned as-is.
    pub fn from_file_with_fallback<P: AsRef<Path>>(primary: P, fallback: P) -> Result<Self, RefError> {
        match Self::from_file(&primary) {
            Ok(doc) => Ok(doc),
            Err(RefError::IoError { code: Some(301), .. }) => {
                Self::from_file(&fallback).map_err(|e| match e {
                    RefError::IoError { message, code: Some(301), .. } => RefError::IoError {
                        message: format!(
                            "Failed to load document from primary path '{}' or fallback path '{}': {}",
                            primary.as_ref().display(),
                            fallback.as_ref().display(),
                            message
                        ),
                        path: format!(
                            "{} (fallback: {})",
                            primary.as_ref().display(),
                            fallback.as_ref().display()
                        ),
                        hint: Some("Check that at least one of the documents exists".into()),
                        code: Some(301),
                    },
                    other => other,
                })
            }
            Err(other) => Err(other),
        }
    }

    /// Resolve a JSON string. File references are relative to the current directory.
    pub fn from_str(content: &str) -> Result<Self, RefError> {
        Self::from_str_with_options(content, &LoadOptions::default())
    }

    pub fn from_str_with_options(content: &str, options: &LoadOptions) -> Result<Self, RefError> {
        resolver::resolve_str(content, options).map(Self::from_resolution)
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    pub fn into_root(self) -> Node {
        self.root
    }

    /// Every file read while resolving, in the order they were first loaded.
    pub fn loaded_files(&self) -> &[PathBuf] {
        &self.files
    }
}

impl RefDocument {
    fn from_resolution(resolution: Resolution) -> Self {
        Self {
            root: resolution.root,
            files: resolution.files,
        }
    }
}
