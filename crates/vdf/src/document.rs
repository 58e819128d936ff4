//! The node tree: an arena of nodes linked into ordered sibling lists.
//!
//! Every node lives in a [`Document`] and is addressed by a [`NodeId`].
//! Each arena slot stores optional `parent`, `prev`, `next`, `first` and
//! `last` handles, so appending a child and detaching a node are both O(1).
//! Detached nodes stay in the arena as independent parentless trees and can
//! be appended somewhere else later.
//!
//! Reads go through [`NodeRef`], a `Copy` handle that may be absent. Every
//! read on an absent reference behaves exactly like the same read on a fresh
//! empty node, so navigation chains never need intermediate checks:
//!
//! ```
//! use vdf::Document;
//!
//! let doc = Document::from_text("\"a\" { \"b\" \"7\" }").unwrap();
//! assert_eq!(doc.root().first_by_name("A").first_by_name("b").int(), 7);
//! assert_eq!(doc.root().first_by_name("missing").first_child().int(), 0);
//! ```
//!
//! Writes go through [`NodeMut`], which borrows the document mutably.

use std::borrow::Cow;
use std::fmt;

use crate::binary::{BinaryDecoder, BinaryEncoder, BinaryError};
use crate::node::{Formatting, NodeData, NodeId, EMPTY_NODE};
use crate::text::{TextEncoder, TextError, TextParser};
use crate::value::{Color, Value};

const ROOT: NodeId = NodeId(0);

/// An arena-backed KeyValues tree.
///
/// The root is an interior node with an empty name; its children are the
/// top-level nodes of the text or binary encoding.
#[derive(Debug, Clone)]
pub struct Document {
    pub(crate) nodes: Vec<NodeData>,
    /// Bytes after the last top-level node of parsed text.
    pub(crate) trailer: Option<Vec<u8>>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Creates a document holding only an empty root.
    pub fn new() -> Self {
        Self {
            nodes: vec![NodeData::new(String::new())],
            trailer: None,
        }
    }

    /// Parses the text encoding, recording formatting for byte-exact replay.
    ///
    /// The input may be in any ASCII-compatible encoding; see [`TextParser`].
    pub fn from_text(input: impl AsRef<[u8]>) -> Result<Self, TextError> {
        TextParser::new().parse(input)
    }

    /// Renders the text encoding.
    ///
    /// Nodes that still carry parsed formatting are replayed byte-for-byte;
    /// all other nodes use the canonical tab-indented style.
    ///
    /// Source bytes that are not valid UTF-8 come out as U+FFFD; use
    /// [`Document::to_text_bytes`] to get them back unchanged.
    pub fn to_text(&self) -> String {
        TextEncoder::new().encode(self)
    }

    /// Renders the text encoding as raw bytes. For a document parsed from
    /// text and not edited since, this is exactly the parsed input.
    pub fn to_text_bytes(&self) -> Vec<u8> {
        TextEncoder::new().encode_bytes(self)
    }

    /// Decodes the packed binary encoding.
    pub fn from_binary(data: &[u8]) -> Result<Self, BinaryError> {
        BinaryDecoder::new().decode(data)
    }

    /// Encodes the top-level nodes in the packed binary encoding.
    pub fn to_binary(&self) -> Vec<u8> {
        BinaryEncoder::new().encode(self)
    }

    /// Converts the top-level nodes to a JSON object.
    pub fn to_json(&self) -> serde_json::Value {
        crate::json::to_json(self.root())
    }

    pub fn root_id(&self) -> NodeId {
        ROOT
    }

    pub fn root(&self) -> NodeRef<'_> {
        self.node(ROOT)
    }

    pub fn root_mut(&mut self) -> NodeMut<'_> {
        self.node_mut(ROOT)
    }

    /// Returns a read handle; a handle not issued by this document reads as absent.
    pub fn node(&self, id: NodeId) -> NodeRef<'_> {
        self.get(Some(id))
    }

    /// Returns a read handle that may be absent.
    pub fn get(&self, id: Option<NodeId>) -> NodeRef<'_> {
        NodeRef {
            doc: self,
            id: id.filter(|id| id.index() < self.nodes.len()),
        }
    }

    /// Returns a write handle.
    ///
    /// # Panics
    ///
    /// Panics if `id` was not issued by this document.
    pub fn node_mut(&mut self, id: NodeId) -> NodeMut<'_> {
        assert!(
            id.index() < self.nodes.len(),
            "vdf: node handle {} does not belong to this document",
            id.index()
        );
        NodeMut { doc: self, id }
    }

    /// Creates a detached, empty interior node.
    pub fn create_node(&mut self, name: impl Into<String>) -> NodeId {
        self.push_node(NodeData::new(name.into()))
    }

    /// Creates a detached leaf node.
    pub fn create_leaf(&mut self, name: impl Into<String>, value: impl Into<Value>) -> NodeId {
        let id = self.create_node(name);
        self.nodes[id.index()].value = value.into();
        id
    }

    /// Shortcut for `self.node_mut(parent).append(child)`.
    pub fn append(&mut self, parent: NodeId, child: NodeId) {
        self.node_mut(parent).append(child);
    }

    /// Shortcut for `self.node_mut(id).remove()`.
    pub fn remove(&mut self, id: NodeId) {
        self.node_mut(id).remove();
    }

    /// Discards all recorded formatting, switching the whole document to the
    /// canonical text style.
    pub fn clear_formatting(&mut self) {
        self.root_mut().clear_formatting();
    }

    /// Number of arena slots, including detached nodes and the root.
    ///
    /// Slots are never reclaimed, so this only grows.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub(crate) fn data(&self, id: NodeId) -> &NodeData {
        &self.nodes[id.index()]
    }

    pub(crate) fn data_mut(&mut self, id: NodeId) -> &mut NodeData {
        &mut self.nodes[id.index()]
    }

    pub(crate) fn push_node(&mut self, data: NodeData) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(data);
        id
    }

    /// Links a parentless `child` as the last child of `parent` without any
    /// validation or value bookkeeping.
    pub(crate) fn link_last(&mut self, parent: NodeId, child: NodeId) {
        let prev = self.data(parent).last;
        {
            let c = self.data_mut(child);
            c.parent = Some(parent);
            c.prev = prev;
            c.next = None;
        }
        match prev {
            Some(prev) => self.data_mut(prev).next = Some(child),
            None => self.data_mut(parent).first = Some(child),
        }
        self.data_mut(parent).last = Some(child);
    }

    fn unlink(&mut self, id: NodeId) {
        let n = self.data_mut(id);
        let (parent, prev, next) = (n.parent.take(), n.prev.take(), n.next.take());
        let Some(parent) = parent else {
            return;
        };
        match prev {
            Some(prev) => self.data_mut(prev).next = next,
            None => self.data_mut(parent).first = next,
        }
        match next {
            Some(next) => self.data_mut(next).prev = prev,
            None => self.data_mut(parent).last = prev,
        }
    }

    fn detach_children(&mut self, id: NodeId) {
        let mut cursor = self.data(id).first;
        while let Some(child) = cursor {
            let c = self.data_mut(child);
            cursor = c.next.take();
            c.parent = None;
            c.prev = None;
        }
        let n = self.data_mut(id);
        n.first = None;
        n.last = None;
    }

    fn is_ancestor_or_self(&self, candidate: NodeId, mut id: NodeId) -> bool {
        loop {
            if id == candidate {
                return true;
            }
            match self.data(id).parent {
                Some(parent) => id = parent,
                None => return false,
            }
        }
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}

impl std::str::FromStr for Document {
    type Err = TextError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_text(s)
    }
}

/// Case-insensitive name comparison used by the by-name navigation helpers.
fn names_match(a: &str, b: &str) -> bool {
    if a.is_ascii() && b.is_ascii() {
        return a.eq_ignore_ascii_case(b);
    }
    a.chars()
        .flat_map(char::to_lowercase)
        .eq(b.chars().flat_map(char::to_lowercase))
}

/// A possibly-absent read handle to a node.
#[derive(Clone, Copy)]
pub struct NodeRef<'a> {
    doc: &'a Document,
    id: Option<NodeId>,
}

impl fmt::Debug for NodeRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeRef")
            .field("id", &self.id)
            .field("name", &self.name())
            .field("value", self.value())
            .finish()
    }
}

impl PartialEq for NodeRef<'_> {
    /// Identity comparison: same document and same node.
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.doc, other.doc) && self.id == other.id
    }
}

impl Eq for NodeRef<'_> {}

impl<'a> NodeRef<'a> {
    fn data(&self) -> &'a NodeData {
        match self.id {
            Some(id) => self.doc.data(id),
            None => &EMPTY_NODE,
        }
    }

    fn at(&self, id: Option<NodeId>) -> NodeRef<'a> {
        NodeRef { doc: self.doc, id }
    }

    pub fn id(&self) -> Option<NodeId> {
        self.id
    }

    pub fn exists(&self) -> bool {
        self.id.is_some()
    }

    pub fn document(&self) -> &'a Document {
        self.doc
    }

    pub fn name(&self) -> &'a str {
        &self.data().name
    }

    /// The condition tag without brackets; empty when there is none.
    pub fn condition(&self) -> &'a str {
        &self.data().condition
    }

    pub fn value(&self) -> &'a Value {
        &self.data().value
    }

    pub fn is_leaf(&self) -> bool {
        !self.data().value.is_none()
    }

    /// True for nodes without a value, including empty blocks.
    pub fn is_interior(&self) -> bool {
        self.data().value.is_none()
    }

    pub fn has_formatting(&self) -> bool {
        self.data().format.is_some()
    }

    pub(crate) fn formatting(&self) -> Option<&'a Formatting> {
        self.data().format.as_deref()
    }

    pub fn parent(&self) -> NodeRef<'a> {
        self.at(self.data().parent)
    }

    pub fn first_child(&self) -> NodeRef<'a> {
        self.at(self.data().first)
    }

    pub fn next_child(&self) -> NodeRef<'a> {
        self.at(self.data().next)
    }

    pub fn prev_child(&self) -> NodeRef<'a> {
        self.at(self.data().prev)
    }

    pub fn last_child(&self) -> NodeRef<'a> {
        self.at(self.data().last)
    }

    /// Iterates over the children in order.
    pub fn children(&self) -> Children<'a> {
        Children {
            doc: self.doc,
            next: self.data().first,
        }
    }

    fn advance(self, want_leaf: bool) -> NodeRef<'a> {
        let mut cur = self;
        while cur.exists() && cur.is_leaf() != want_leaf {
            cur = cur.next_child();
        }
        cur
    }

    /// First child without a value.
    pub fn first_subtree(&self) -> NodeRef<'a> {
        self.first_child().advance(false)
    }

    pub fn next_subtree(&self) -> NodeRef<'a> {
        self.next_child().advance(false)
    }

    /// First child holding a value.
    pub fn first_value(&self) -> NodeRef<'a> {
        self.first_child().advance(true)
    }

    pub fn next_value(&self) -> NodeRef<'a> {
        self.next_child().advance(true)
    }

    fn find_from(self, name: &str) -> NodeRef<'a> {
        let mut cur = self;
        while cur.exists() && !names_match(cur.name(), name) {
            cur = cur.next_child();
        }
        cur
    }

    /// First child whose name matches `name`, ignoring case.
    pub fn first_by_name(&self, name: &str) -> NodeRef<'a> {
        self.first_child().find_from(name)
    }

    /// Next sibling whose name matches `name`, ignoring case.
    pub fn next_by_name(&self, name: &str) -> NodeRef<'a> {
        self.next_child().find_from(name)
    }

    pub fn string(&self) -> Cow<'a, str> {
        self.data().value.to_text()
    }

    pub fn int(&self) -> i32 {
        self.data().value.to_int()
    }

    pub fn float(&self) -> f32 {
        self.data().value.to_float()
    }

    pub fn ptr(&self) -> u32 {
        self.data().value.to_ptr()
    }

    pub fn wstring(&self) -> Vec<u16> {
        self.data().value.to_wstring()
    }

    pub fn color(&self) -> Color {
        self.data().value.to_color()
    }

    pub fn uint64(&self) -> u64 {
        self.data().value.to_uint64()
    }

    /// Renders this node and its descendants as text, at depth zero.
    pub fn to_text(&self) -> String {
        TextEncoder::new().encode_node(*self)
    }

    pub fn to_json(&self) -> serde_json::Value {
        crate::json::to_json(*self)
    }

    /// Box-drawing dump of this subtree for debugging.
    pub fn print_tree(&self, tab: &str) -> String {
        crate::print::print_node(*self, tab)
    }
}

/// Iterator over the children of a node.
#[derive(Debug, Clone)]
pub struct Children<'a> {
    doc: &'a Document,
    next: Option<NodeId>,
}

impl<'a> Iterator for Children<'a> {
    type Item = NodeRef<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.next?;
        self.next = self.doc.data(id).next;
        Some(self.doc.node(id))
    }
}

/// A write handle to a node.
///
/// Holding a `NodeMut` borrows the whole document mutably, which is what
/// makes mutation exclusive with every concurrent read.
#[derive(Debug)]
pub struct NodeMut<'a> {
    doc: &'a mut Document,
    id: NodeId,
}

impl NodeMut<'_> {
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Read view of this node.
    pub fn as_node(&self) -> NodeRef<'_> {
        self.doc.node(self.id)
    }

    fn data(&mut self) -> &mut NodeData {
        self.doc.data_mut(self.id)
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.data().name = name.into();
    }

    /// Sets the condition tag, without brackets. An empty string removes it.
    ///
    /// # Panics
    ///
    /// Panics if `condition` contains whitespace, `"`, `{` or `}`.
    pub fn set_condition(&mut self, condition: impl Into<String>) {
        let condition = condition.into();
        if condition.chars().any(char::is_whitespace) {
            panic!("vdf: condition cannot contain spaces");
        }
        if condition.contains(['"', '{', '}']) {
            panic!("vdf: condition cannot contain \", {{, or }}");
        }
        let data = self.data();
        if let Some(format) = data.format.as_deref_mut() {
            format.condition_src = None;
            if condition.is_empty() {
                format.condition.clear();
            } else if format.condition.is_empty() {
                format.condition.push(b' ');
            }
        }
        data.condition = condition;
    }

    /// Stores `value`, detaching any children first.
    ///
    /// Storing [`Value::None`] turns the node into an empty interior node.
    /// Detached children keep their arena slots for the life of the
    /// document, like nodes passed to [`NodeMut::remove`]; their handles
    /// stay valid and can be appended again.
    pub fn set_value(&mut self, value: impl Into<Value>) {
        let value = value.into();
        self.doc.detach_children(self.id);
        let data = self.data();
        if let Some(format) = data.format.as_deref_mut() {
            match (data.value.is_none(), value.is_none()) {
                (true, false) => format.interior_to_leaf(),
                (false, true) => format.leaf_to_interior(),
                _ => {}
            }
        }
        data.value = value;
    }

    pub fn set_string(&mut self, v: impl Into<String>) {
        self.set_value(Value::String(v.into()));
    }

    pub fn set_int(&mut self, v: i32) {
        self.set_value(Value::Int(v));
    }

    pub fn set_float(&mut self, v: f32) {
        self.set_value(Value::Float(v));
    }

    pub fn set_ptr(&mut self, v: u32) {
        self.set_value(Value::Ptr(v));
    }

    pub fn set_wstring(&mut self, v: &[u16]) {
        self.set_value(Value::WString(v.to_vec()));
    }

    pub fn set_color(&mut self, v: Color) {
        self.set_value(Value::Color(v));
    }

    pub fn set_uint64(&mut self, v: u64) {
        self.set_value(Value::Uint64(v));
    }

    /// Attaches `child` as the last child, dropping any value this node held.
    ///
    /// # Panics
    ///
    /// Panics if `child` already has a parent, is the document root, or is
    /// this node or one of its ancestors.
    pub fn append(&mut self, child: NodeId) {
        let doc = &mut *self.doc;
        assert!(
            child.index() < doc.nodes.len(),
            "vdf: node handle {} does not belong to this document",
            child.index()
        );
        if doc.data(child).parent.is_some() {
            panic!("vdf: cannot append a node that already has a parent");
        }
        if child == ROOT {
            panic!("vdf: cannot append the document root");
        }
        if doc.is_ancestor_or_self(child, self.id) {
            panic!("vdf: cannot append a node to itself or its descendant");
        }
        doc.link_last(self.id, child);
        let data = doc.data_mut(self.id);
        if !data.value.is_none() {
            if let Some(format) = data.format.as_deref_mut() {
                format.leaf_to_interior();
            }
            data.value = Value::None;
        }
    }

    /// Detaches this node from its parent and siblings. The subtree stays
    /// intact and can be appended elsewhere. Does nothing on a parentless node.
    ///
    /// The arena does not reclaim the subtree's slots; a document that keeps
    /// removing nodes grows until it is dropped.
    pub fn remove(&mut self) {
        self.doc.unlink(self.id);
    }

    /// Discards recorded formatting on this node and all of its descendants.
    pub fn clear_formatting(&mut self) {
        if self.id == ROOT {
            self.doc.trailer = None;
        }
        let mut stack = vec![self.id];
        while let Some(id) = stack.pop() {
            let data = self.doc.data_mut(id);
            data.format = None;
            let mut cursor = data.first;
            while let Some(child) = cursor {
                stack.push(child);
                cursor = self.doc.data(child).next;
            }
        }
    }
}
