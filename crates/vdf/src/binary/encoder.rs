//! Packed binary encoder.

use log::{debug, warn};
use vdf_buffers::Writer;

use super::constants::{PackType, NULL_MARKER};
use crate::document::{Document, NodeRef};
use crate::value::Value;

/// Encodes trees in the packed binary encoding.
///
/// The encoding cannot represent an embedded NUL in a name or string, nor a
/// wide string longer than `u16::MAX` code units; such data is truncated and
/// a warning is logged.
pub struct BinaryEncoder {
    pub writer: Writer,
}

impl Default for BinaryEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl BinaryEncoder {
    pub fn new() -> Self {
        Self {
            writer: Writer::new(),
        }
    }

    /// Encodes the top-level nodes followed by the closing sentinel.
    pub fn encode(&mut self, doc: &Document) -> Vec<u8> {
        self.writer.reset();
        self.write_list(doc.root());
        debug!("encoded {} nodes into {} binary bytes", doc.node_count() - 1, self.writer.len());
        self.writer.flush()
    }

    /// Encodes `node` as the only entry of a top-level list.
    pub fn encode_node(&mut self, node: NodeRef<'_>) -> Vec<u8> {
        self.writer.reset();
        if node.exists() {
            self.write_node(node);
        }
        self.writer.u8(NULL_MARKER);
        self.writer.flush()
    }

    fn write_list(&mut self, parent: NodeRef<'_>) {
        for child in parent.children() {
            self.write_node(child);
        }
        self.writer.u8(NULL_MARKER);
    }

    fn write_node(&mut self, node: NodeRef<'_>) {
        let value = node.value();
        self.writer.u8(PackType::of(value) as u8);
        self.write_str(node.name(), "name");
        match value {
            Value::None => self.write_list(node),
            Value::String(s) => self.write_str(s, "string"),
            Value::Int(v) => self.writer.i32(*v),
            Value::Float(v) => self.writer.f32(*v),
            Value::Ptr(v) => self.writer.u32(*v),
            Value::WString(units) => self.write_wstring(node.name(), units),
            Value::Color(c) => self.writer.buf(&[c.r, c.g, c.b, c.a]),
            Value::Uint64(v) => self.writer.u64(*v),
        }
    }

    fn write_str(&mut self, s: &str, what: &str) {
        let bytes = s.as_bytes();
        let end = match bytes.iter().position(|&b| b == 0) {
            Some(i) => {
                warn!("vdf: {} {:?} truncated at embedded NUL", what, s);
                i
            }
            None => bytes.len(),
        };
        self.writer.cstr(&bytes[..end]);
    }

    fn write_wstring(&mut self, name: &str, units: &[u16]) {
        let count = match u16::try_from(units.len()) {
            Ok(count) => count,
            Err(_) => {
                warn!(
                    "vdf: wide string {:?} truncated from {} to {} code units",
                    name,
                    units.len(),
                    u16::MAX
                );
                u16::MAX
            }
        };
        self.writer.u16(count);
        for &unit in &units[..count as usize] {
            self.writer.u16(unit);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Color;

    #[test]
    fn leaf_payloads() {
        let mut doc = Document::new();
        let root = doc.root_id();
        let leaves = [
            doc.create_leaf("s", "hi"),
            doc.create_leaf("i", -2),
            doc.create_leaf("f", 1.5f32),
            doc.create_leaf("p", 0xDEAD_BEEFu32),
            doc.create_leaf("w", vec![0x41u16, 0x263A]),
            doc.create_leaf("c", Color::new(1, 2, 3, 4)),
            doc.create_leaf("u", 5u64),
        ];
        for leaf in leaves {
            doc.append(root, leaf);
        }
        let mut expected = Vec::new();
        expected.extend_from_slice(b"\x01s\x00hi\x00");
        expected.extend_from_slice(b"\x02i\x00\xFE\xFF\xFF\xFF");
        expected.extend_from_slice(b"\x03f\x00\x00\x00\xC0\x3F");
        expected.extend_from_slice(b"\x04p\x00\xEF\xBE\xAD\xDE");
        expected.extend_from_slice(b"\x05w\x00\x02\x00\x41\x00\x3A\x26");
        expected.extend_from_slice(b"\x06c\x00\x01\x02\x03\x04");
        expected.extend_from_slice(b"\x07u\x00\x05\x00\x00\x00\x00\x00\x00\x00");
        expected.push(NULL_MARKER);
        assert_eq!(BinaryEncoder::new().encode(&doc), expected);
    }

    #[test]
    fn embedded_nul_is_truncated() {
        let mut doc = Document::new();
        let root = doc.root_id();
        let leaf = doc.create_leaf("a\0b", "c\0d");
        doc.append(root, leaf);
        assert_eq!(doc.to_binary(), b"\x01a\x00c\x00\x08");
    }

    #[test]
    fn oversized_wide_string_is_truncated() {
        let mut doc = Document::new();
        let root = doc.root_id();
        let leaf = doc.create_leaf("w", vec![7u16; u16::MAX as usize + 3]);
        doc.append(root, leaf);
        let bytes = doc.to_binary();
        assert_eq!(&bytes[3..5], &[0xFF, 0xFF]);
        assert_eq!(bytes.len(), 3 + 2 + 2 * u16::MAX as usize + 1);
        let back = Document::from_binary(&bytes).unwrap();
        assert_eq!(back.root().first_child().wstring().len(), u16::MAX as usize);
    }

    #[test]
    fn single_node() {
        let mut doc = Document::new();
        let root = doc.root_id();
        let outer = doc.create_node("o");
        let inner = doc.create_leaf("k", 1);
        doc.append(root, outer);
        doc.append(outer, inner);
        let mut encoder = BinaryEncoder::new();
        assert_eq!(
            encoder.encode_node(doc.node(inner)),
            b"\x02k\x00\x01\x00\x00\x00\x08"
        );
        assert_eq!(encoder.encode_node(doc.root().next_child()), [NULL_MARKER]);
    }
}
