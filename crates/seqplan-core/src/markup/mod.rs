//! Markup tree: a small closed node model and the parser that builds it.

pub mod node;
pub mod parser;

pub use node::{Attribute, Element, Node};
pub use parser::{MarkupError, parse_document};
