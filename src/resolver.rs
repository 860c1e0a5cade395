// Author: Dustin Pilgrim
// License: MIT

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use tracing::{debug, info, trace, warn};

use crate::ast::{Fields, Node, Reference};
use crate::utils::{base_dir_of, normalize_path, resolve_file_path};
use crate::RefError;

mod options;
mod pointer;

pub use options::{LoadOptions, LocalRefs};
pub use pointer::{Pointer, Walk, resolve_path};
use pointer::unresolved_walk;

/// Placeholder file name for roots that did not come from disk.
const INLINE_ROOT: &str = "<inline>";

/// Load `path` and substitute every `$ref` reachable from it.
///
/// Relative paths are taken from the current working directory.
///
/// # Example
/// ```no_run
/// let root = refgraph::load("model/main.json")?;
/// let structs = refgraph::find_by_type(&root, "Struct");
/// # Ok::<(), refgraph::RefError>(())
/// ```
pub fn load<P: AsRef<Path>>(path: P) -> Result<Node, RefError> {
    load_with_options(path, &LoadOptions::default())
}

pub fn load_with_options<P: AsRef<Path>>(path: P, options: &LoadOptions) -> Result<Node, RefError> {
    Ok(resolve_file(path.as_ref(), options)?.root)
}

/// Resolve an in-memory root. File references are taken relative to the
/// options' working directory.
pub fn load_str(content: &str, options: &LoadOptions) -> Result<Node, RefError> {
    Ok(resolve_str(content, options)?.root)
}

/// A finished session: the resolved root and every file it read, root first.
pub(crate) struct Resolution {
    pub root: Node,
    pub files: Vec<PathBuf>,
}

pub(crate) fn resolve_file(path: &Path, options: &LoadOptions) -> Result<Resolution, RefError> {
    let root_path = normalize_path(&options.base_dir()?.join(path));
    info!("processing {}", root_path.display());

    let root = read_document(&root_path, 301)?;
    Session::new(root_path, options.local_refs).run(root)
}

pub(crate) fn resolve_str(content: &str, options: &LoadOptions) -> Result<Resolution, RefError> {
    let root_path = options.base_dir()?.join(INLINE_ROOT);
    info!("processing inline document");

    let root = parse_document(content.as_bytes(), &root_path)?;
    let mut resolution = Session::new(root_path.clone(), options.local_refs).run(root)?;
    resolution.files.retain(|p| p != &root_path);
    Ok(resolution)
}

fn read_document(path: &Path, code: u32) -> Result<Node, RefError> {
    let content = fs::read(path).map_err(|e| RefError::IoError {
        message: format!("Failed to read file: {}", e),
        path: path.to_string_lossy().to_string(),
        hint: Some("Check that the file exists and is readable".into()),
        code: Some(code),
    })?;
    parse_document(&content, path)
}

/// Decode UTF-8 JSON bytes; bad encoding is a parse error, not an I/O one.
fn parse_document(content: &[u8], path: &Path) -> Result<Node, RefError> {
    let json: serde_json::Value = serde_json::from_slice(content).map_err(|e| RefError::ParseError {
        message: e.to_string(),
        path: path.to_string_lossy().to_string(),
        line: e.line(),
        column: e.column(),
        hint: Some("Check that the document is valid JSON".into()),
        code: Some(310),
    })?;
    Node::from_json(json).map_err(|e| e.in_file(path))
}

/// Cache entry for one file of the session.
enum DocState {
    /// Parsed, references not yet substituted.
    Loading(Node),
    Loaded(Node),
}

impl DocState {
    fn node(&self) -> &Node {
        match self {
            DocState::Loading(node) | DocState::Loaded(node) => node,
        }
    }

    fn is_loaded(&self) -> bool {
        matches!(self, DocState::Loaded(_))
    }
}

/// What a pointer walk produced, detached from the cache borrow.
enum Target {
    Node(Node),
    Through { reference: Reference, next: usize },
}

struct Session {
    root_path: PathBuf,
    local_refs: LocalRefs,
    documents: IndexMap<PathBuf, DocState>,
    /// (file, pointer) pairs currently being resolved.
    active: HashSet<(PathBuf, String)>,
}

impl Session {
    fn new(root_path: PathBuf, local_refs: LocalRefs) -> Self {
        Self {
            root_path,
            local_refs,
            documents: IndexMap::new(),
            active: HashSet::new(),
        }
    }

    fn run(mut self, root: Node) -> Result<Resolution, RefError> {
        let root_path = self.root_path.clone();
        self.documents.insert(root_path.clone(), DocState::Loading(root.clone()));
        let resolved = self.resolve_node(root, &root_path)?;

        Ok(Resolution {
            root: resolved,
            files: self.documents.into_keys().collect(),
        })
    }

    /// Read, register and resolve a referenced file unless the session already has it.
    fn load_document(&mut self, path: &Path) -> Result<(), RefError> {
        if self.documents.contains_key(path) {
            return Ok(());
        }

        debug!("inner processing {}", path.display());
        let node = read_document(path, 302)?;

        // Registered before recursing so file-level cycles find it.
        self.documents.insert(path.to_path_buf(), DocState::Loading(node.clone()));
        let resolved = self.resolve_node(node, path)?;
        self.documents.insert(path.to_path_buf(), DocState::Loaded(resolved));
        Ok(())
    }

    fn resolve_node(&mut self, node: Node, base: &Path) -> Result<Node, RefError> {
        match node {
            Node::Reference(reference) => self.resolve_reference(&reference, base),
            Node::Array(items) => {
                let mut out = Vec::with_capacity(items.len());
                for item in items {
                    out.push(self.resolve_node(item, base)?);
                }
                Ok(Node::Array(out))
            }
            Node::Object(fields) => Ok(Node::Object(self.resolve_fields(fields, base)?)),
            Node::Tagged { type_name, fields } => Ok(Node::Tagged {
                type_name,
                fields: self.resolve_fields(fields, base)?,
            }),
            scalar => Ok(scalar),
        }
    }

    fn resolve_fields(&mut self, fields: Fields, base: &Path) -> Result<Fields, RefError> {
        let mut out = Fields::with_capacity(fields.len());
        for (key, value) in fields {
            let value = self.resolve_node(value, base)?;
            out.insert(key, value);
        }
        Ok(out)
    }

    fn resolve_reference(&mut self, reference: &Reference, base: &Path) -> Result<Node, RefError> {
        let doc_path = match reference.uri() {
            None => match self.local_refs {
                LocalRefs::SessionRoot => self.root_path.clone(),
                LocalRefs::EnclosingDocument => base.to_path_buf(),
            },
            Some(uri) => {
                let target = resolve_file_path(uri, base_dir_of(base))?;
                self.load_document(&target)?;
                target
            }
        };

        let pointer = Pointer::parse(reference.pointer()).map_err(|e| e.in_document(base))?;
        trace!("resolving {} in {}", reference.raw(), doc_path.display());
        self.lookup(reference, &doc_path, &pointer)
    }

    fn lookup(&mut self, origin: &Reference, doc_path: &Path, pointer: &Pointer) -> Result<Node, RefError> {
        let (target, settled) = {
            let state = self.documents.get(doc_path).ok_or_else(|| RefError::IoError {
                message: "document is not part of this resolution session".into(),
                path: doc_path.to_string_lossy().to_string(),
                hint: None,
                code: Some(304),
            })?;
            let target = match pointer.walk(state.node(), 0).map_err(|e| e.in_document(doc_path))? {
                Walk::Found(node) => Target::Node(node.clone()),
                Walk::Blocked { reference, next } => Target::Through { reference: reference.clone(), next },
            };
            (target, state.is_loaded())
        };

        // Loaded documents are fully resolved already.
        let target = match (target, settled) {
            (Target::Node(node), true) => return Ok(node),
            (target, _) => target,
        };

        let key = (doc_path.to_path_buf(), pointer.as_str().to_string());
        if self.active.contains(&key) {
            warn!(
                "reference cycle through {}#{}; leaving it unresolved",
                doc_path.display(),
                pointer.as_str()
            );
            return Ok(match target {
                Target::Node(node) => node,
                Target::Through { .. } => Node::Reference(origin.clone()),
            });
        }

        self.active.insert(key.clone());
        let result = match target {
            Target::Node(node) => self.resolve_node(node, doc_path),
            Target::Through { reference, next } => self.continue_through(&reference, doc_path, pointer, next),
        };
        self.active.remove(&key);
        result
    }

    /// Resolve the reference a walk stopped at, then finish the walk inside it.
    fn continue_through(
        &mut self,
        reference: &Reference,
        doc_path: &Path,
        pointer: &Pointer,
        next: usize,
    ) -> Result<Node, RefError> {
        let resolved = self.resolve_reference(reference, doc_path)?;
        match pointer.walk(&resolved, next).map_err(|e| e.in_document(doc_path))? {
            Walk::Found(node) => Ok(node.clone()),
            Walk::Blocked { reference, .. } => {
                Err(unresolved_walk(pointer, reference).in_document(doc_path))
            }
        }
    }
}
