//! Valve Data Format (KeyValues): a hierarchical key/value format with a
//! human-readable text encoding and a packed binary encoding.
//!
//! Text parsed with [`Document::from_text`] renders back byte-for-byte,
//! comments and quoting included, even after parts of the tree are edited.
//! [`Document::clear_formatting`] switches a tree to the canonical style.
//!
//! ```
//! use vdf::Document;
//!
//! let mut doc = Document::from_text("// game\n\"cfg\" { fov 90 }\n").unwrap();
//! let cfg = doc.root().first_by_name("cfg");
//! let fov = cfg.first_by_name("fov").id().unwrap();
//! doc.node_mut(fov).set_int(100);
//! assert_eq!(doc.to_text(), "// game\n\"cfg\" { fov 100 }\n");
//!
//! doc.clear_formatting();
//! assert_eq!(doc.to_text(), "\"cfg\"\n{\n\t\"fov\" \"100\"\n}\n");
//!
//! let packed = doc.to_binary();
//! assert_eq!(Document::from_binary(&packed).unwrap().to_binary(), packed);
//! ```

pub mod binary;
mod document;
pub mod json;
mod node;
mod print;
pub mod text;
mod value;

pub use binary::BinaryError;
pub use document::{Children, Document, NodeMut, NodeRef};
pub use node::NodeId;
pub use text::TextError;
pub use value::{Color, Value};

/// Deepest nesting of `{` blocks or packed interior nodes either codec accepts.
///
/// Parsing and rendering recurse once per level, so a document at this depth
/// still fits the default 2 MiB stack of a spawned thread in debug builds.
pub const MAX_DEPTH: usize = 256;
