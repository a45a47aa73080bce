//! Minimal XML tree used for master and territory files
//!
//! Parsing and writing go through `quick-xml`; the tree itself is an arena
//! so nodes can be looked up once and appended to later without borrowing
//! the whole document.

mod document;
mod writer;

pub use document::{Document, NodeId, NodeKind};
pub use writer::INDENT_WIDTH;
