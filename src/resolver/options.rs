use std::env;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::utils::normalize_path;
use crate::RefError;

/// Which document a same-document reference (`"#/..."`) is evaluated against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocalRefs {
    /// The file `load` was called with, even for references inside other files.
    #[default]
    SessionRoot,
    /// The file that contains the reference.
    EnclosingDocument,
}

/// Settings for one resolution session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoadOptions {
    /// Base for a relative root path and for in-memory roots.
    /// Falls back to the process working directory.
    pub working_dir: Option<PathBuf>,
    pub local_refs: LocalRefs,
}

impl LoadOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_working_dir<P: AsRef<Path>>(mut self, dir: P) -> Self {
        self.working_dir = Some(dir.as_ref().to_path_buf());
        self
    }

    pub fn with_local_refs(mut self, local_refs: LocalRefs) -> Self {
        self.local_refs = local_refs;
        self
    }

    /// Parse options from JSON, e.g. `{"working_dir": "models", "local_refs": "enclosing_document"}`.
    pub fn from_json_str(content: &str) -> Result<Self, RefError> {
        serde_json::from_str(content).map_err(|e| RefError::ParseError {
            message: format!("Invalid load options: {}", e),
            path: "<options>".into(),
            line: e.line(),
            column: e.column(),
            hint: Some("Known keys are working_dir and local_refs".into()),
            code: Some(310),
        })
    }

    /// Absolute, normalized base directory for this session.
    pub(crate) fn base_dir(&self) -> Result<PathBuf, RefError> {
        let cwd = || {
            env::current_dir().map_err(|e| RefError::IoError {
                message: format!("Failed to determine working directory: {}", e),
                path: ".".into(),
                hint: Some("Set LoadOptions::working_dir explicitly".into()),
                code: Some(301),
            })
        };

        let dir = match &self.working_dir {
            Some(dir) if dir.is_absolute() => dir.clone(),
            Some(dir) => cwd()?.join(dir),
            None => cwd()?,
        };
        Ok(normalize_path(&dir))
    }
}
