//! Arena slot storage for a single node.

use crate::value::Value;

/// Handle to a node inside a [`Document`](crate::Document).
///
/// Handles are only meaningful for the document that issued them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// Position of the node in its document's arena.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// How a key or value token was written in the source text.
///
/// Raw bytes are kept only when re-rendering the decoded text would not
/// reproduce them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Quoting {
    /// Bare. Holds the source bytes when they were not valid UTF-8.
    Bare(Option<Vec<u8>>),
    /// Quoted. Holds the raw bytes between the quotes when canonical escaping
    /// of the decoded text would not reproduce them (e.g. `\'` written as `'`).
    Quoted(Option<Vec<u8>>),
}

impl Default for Quoting {
    fn default() -> Self {
        Quoting::Quoted(None)
    }
}

/// Source bytes surrounding a node that was parsed from text.
///
/// Leaf layout: `before key between value condition [cond] after`.
/// Interior layout: `before key condition [cond] between children after`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Formatting {
    pub(crate) before: Vec<u8>,
    pub(crate) key: Quoting,
    pub(crate) between: Vec<u8>,
    pub(crate) value: Quoting,
    pub(crate) condition: Vec<u8>,
    /// Source bytes between the brackets of a parsed conditional, kept even
    /// for an empty `[]`.
    pub(crate) condition_src: Option<Vec<u8>>,
    pub(crate) after: Vec<u8>,
}

impl Formatting {
    /// Rewrites separators after a leaf gained children.
    pub(crate) fn leaf_to_interior(&mut self) {
        self.between.extend_from_slice(b"\n{\n");
        self.after.extend_from_slice(b"\n}\n");
    }

    /// Rewrites separators after an interior node became a leaf.
    pub(crate) fn interior_to_leaf(&mut self) {
        self.between = b" ".to_vec();
        self.value = Quoting::default();
        self.after = b"\n".to_vec();
    }
}

#[derive(Debug, Clone)]
pub(crate) struct NodeData {
    pub(crate) name: String,
    pub(crate) condition: String,
    pub(crate) value: Value,
    pub(crate) parent: Option<NodeId>,
    pub(crate) prev: Option<NodeId>,
    pub(crate) next: Option<NodeId>,
    pub(crate) first: Option<NodeId>,
    pub(crate) last: Option<NodeId>,
    pub(crate) format: Option<Box<Formatting>>,
}

impl NodeData {
    pub(crate) const EMPTY: NodeData = NodeData {
        name: String::new(),
        condition: String::new(),
        value: Value::None,
        parent: None,
        prev: None,
        next: None,
        first: None,
        last: None,
        format: None,
    };

    pub(crate) fn new(name: String) -> Self {
        Self {
            name,
            ..Self::EMPTY
        }
    }
}

/// Target of every read through an absent node reference.
pub(crate) static EMPTY_NODE: NodeData = NodeData::EMPTY;
