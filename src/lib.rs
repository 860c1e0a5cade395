pub mod ast;
pub mod document;
pub mod error;
pub mod export;
pub mod finder;
pub mod resolver;
pub mod utils;

pub use ast::{Fields, Node, Reference};
pub use document::RefDocument;
pub use error::RefError;
pub use finder::find_by_type;
pub use resolver::{LoadOptions, LocalRefs, load, load_str, load_with_options, resolve_path};
