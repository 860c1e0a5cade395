// Author: Dustin Pilgrim
// License: MIT

use once_cell::sync::Lazy;
use regex::Regex;

use crate::ast::{Node, Reference};
use crate::RefError;

static INDEXED_SEGMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\w+)\[([0-9]+)\]$").expect("indexed segment pattern is valid"));

#[derive(Debug, Clone, PartialEq, Eq)]
enum Step {
    Key(String),
    Index { index: usize, segment: String },
}

/// A parsed `/a/b[2]/c` pointer. `name[idx]` segments become a key step
/// followed by an index step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pointer {
    raw: String,
    steps: Vec<Step>,
}

/// Outcome of walking a pointer over a tree that may still hold `$ref` sites.
#[derive(Debug)]
pub enum Walk<'a> {
    Found(&'a Node),
    /// The walk reached an unsubstituted reference; continue at step `next`
    /// inside whatever it resolves to.
    Blocked { reference: &'a Reference, next: usize },
}

impl Pointer {
    pub fn parse(raw: &str) -> Result<Pointer, RefError> {
        let rest = raw.strip_prefix('/').ok_or_else(|| RefError::PathError {
            message: "path must start with /".into(),
            pointer: raw.to_string(),
            segment: raw.to_string(),
            document: None,
            hint: Some("Write pointers as \"#/name/child\"".into()),
            code: Some(501),
        })?;

        let mut steps = Vec::new();
        if !rest.is_empty() {
            for segment in rest.split('/') {
                match INDEXED_SEGMENT.captures(segment) {
                    Some(caps) => match caps[2].parse::<usize>() {
                        Ok(index) => {
                            steps.push(Step::Key(caps[1].to_string()));
                            steps.push(Step::Index { index, segment: segment.to_string() });
                        }
                        Err(_) => {
                            return Err(RefError::IndexError {
                                message: format!("{} is out of bounds", segment),
                                pointer: raw.to_string(),
                                index: usize::MAX,
                                document: None,
                                hint: None,
                                code: Some(510),
                            });
                        }
                    },
                    None => steps.push(Step::Key(segment.to_string())),
                }
            }
        }

        Ok(Pointer { raw: raw.to_string(), steps })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// `true` for `/`, which addresses the document itself.
    pub fn is_root(&self) -> bool {
        self.steps.is_empty()
    }

    /// Walk from step `from`, stopping early at a reference that still has
    /// steps left to apply.
    pub fn walk<'a>(&self, node: &'a Node, from: usize) -> Result<Walk<'a>, RefError> {
        let mut current = node;
        for (i, step) in self.steps.iter().enumerate().skip(from) {
            if let Node::Reference(reference) = current {
                return Ok(Walk::Blocked { reference, next: i });
            }
            current = self.apply(current, step)?;
        }
        Ok(Walk::Found(current))
    }

    fn apply<'a>(&self, current: &'a Node, step: &Step) -> Result<&'a Node, RefError> {
        match step {
            Step::Key(name) => match current {
                Node::Object(fields) | Node::Tagged { fields, .. } => {
                    fields.get(name).ok_or_else(|| self.not_found(name))
                }
                Node::Array(items) => match name.parse::<usize>() {
                    Ok(index) => items.get(index).ok_or_else(|| RefError::IndexError {
                        message: format!("index {} out of bounds (len {})", index, items.len()),
                        pointer: self.raw.clone(),
                        index,
                        document: None,
                        hint: None,
                        code: Some(510),
                    }),
                    Err(_) => Err(self.not_found(name)),
                },
                _ => Err(self.not_found(name)),
            },
            Step::Index { index, segment } => match current {
                Node::Array(items) => items.get(*index).ok_or_else(|| RefError::IndexError {
                    message: format!("{} is out of bounds (len {})", segment, items.len()),
                    pointer: self.raw.clone(),
                    index: *index,
                    document: None,
                    hint: None,
                    code: Some(510),
                }),
                _ => Err(RefError::IndexError {
                    message: format!("{} indexes a value that is not an array", segment),
                    pointer: self.raw.clone(),
                    index: *index,
                    document: None,
                    hint: Some("Only arrays accept name[idx] segments".into()),
                    code: Some(511),
                }),
            },
        }
    }

    fn not_found(&self, name: &str) -> RefError {
        RefError::PathError {
            message: format!("{} not found, as part of {}", name, self.raw),
            pointer: self.raw.clone(),
            segment: name.to_string(),
            document: None,
            hint: Some("Check that the path exists in the target document".into()),
            code: Some(502),
        }
    }
}

/// Resolve a pointer inside an already-resolved tree.
///
/// `"/"` returns `doc` itself.
pub fn resolve_path<'a>(doc: &'a Node, pointer: &str) -> Result<&'a Node, RefError> {
    let parsed = Pointer::parse(pointer)?;
    match parsed.walk(doc, 0)? {
        Walk::Found(node) => Ok(node),
        Walk::Blocked { reference, .. } => Err(unresolved_walk(&parsed, reference)),
    }
}

pub(crate) fn unresolved_walk(pointer: &Pointer, reference: &Reference) -> RefError {
    RefError::PathError {
        message: format!("walk reached unresolved reference '{}'", reference.raw()),
        pointer: pointer.as_str().to_string(),
        segment: reference.raw().to_string(),
        document: None,
        hint: Some("Load the document so references are substituted first".into()),
        code: Some(503),
    }
}
