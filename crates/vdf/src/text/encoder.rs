//! Text encoder with two render paths: replay of recorded source formatting,
//! and the canonical tab-indented style for nodes without formatting.

use super::escape::{escape, unescape_bytes};
use super::lexer::is_bare_safe;
use crate::document::{Document, NodeRef};
use crate::node::{Formatting, Quoting};

/// Renders documents and subtrees as text.
///
/// Canonical style, used for nodes that were built programmatically or
/// had their formatting cleared:
///
/// ```text
/// "name" "value" [$COND]
/// "block" [$COND]
/// {
/// 	"child" "1"
/// }
/// ```
///
/// Replayed formatting may hold bytes that are not UTF-8 when the source
/// was in a legacy encoding. [`TextEncoder::encode_bytes`] reproduces them
/// exactly; the `String` methods replace them with U+FFFD.
#[derive(Debug, Default)]
pub struct TextEncoder {
    out: Vec<u8>,
}

fn into_string(bytes: Vec<u8>) -> String {
    String::from_utf8(bytes).unwrap_or_else(|e| String::from_utf8_lossy(e.as_bytes()).into_owned())
}

impl TextEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Renders the top-level nodes and any bytes that trailed them in the source.
    pub fn encode_bytes(&mut self, doc: &Document) -> Vec<u8> {
        self.out.clear();
        for node in doc.root().children() {
            self.write_node(node, 0);
        }
        if let Some(trailer) = &doc.trailer {
            self.out.extend_from_slice(trailer);
        }
        std::mem::take(&mut self.out)
    }

    pub fn encode(&mut self, doc: &Document) -> String {
        into_string(self.encode_bytes(doc))
    }

    /// Renders a single node and its descendants at depth zero.
    pub fn encode_node(&mut self, node: NodeRef<'_>) -> String {
        self.out.clear();
        if node.exists() {
            self.write_node(node, 0);
        }
        into_string(std::mem::take(&mut self.out))
    }

    fn write_node(&mut self, node: NodeRef<'_>, indent: usize) {
        match node.formatting() {
            Some(format) => self.write_replay(node, format, indent),
            None => self.write_canonical(node, indent),
        }
    }

    fn write_children(&mut self, node: NodeRef<'_>, indent: usize) {
        for child in node.children() {
            self.write_node(child, indent);
        }
    }

    fn write_indent(&mut self, indent: usize) {
        self.out.extend(std::iter::repeat(b'\t').take(indent));
    }

    fn write_str(&mut self, s: &str) {
        self.out.extend_from_slice(s.as_bytes());
    }

    fn write_quoted(&mut self, s: &str) {
        self.out.push(b'"');
        self.write_str(&escape(s));
        self.out.push(b'"');
    }

    /// Writes `text` the way the source wrote it, as long as that still
    /// reads back as `text`.
    fn write_token(&mut self, text: &str, quoting: &Quoting) {
        match quoting {
            Quoting::Bare(Some(raw)) if String::from_utf8_lossy(raw) == text => {
                self.out.extend_from_slice(raw)
            }
            Quoting::Bare(_) if is_bare_safe(text) => self.write_str(text),
            Quoting::Quoted(Some(raw)) if unescape_bytes(raw) == text => {
                self.out.push(b'"');
                self.out.extend_from_slice(raw);
                self.out.push(b'"');
            }
            _ => self.write_quoted(text),
        }
    }

    /// Writes `[condition]`, reusing the source bytes while they still decode
    /// to `condition`. A parsed `[]` is written back even though it is empty.
    fn write_condition(&mut self, condition: &str, src: Option<&[u8]>) {
        self.out.push(b'[');
        match src {
            Some(src) if String::from_utf8_lossy(src) == condition => {
                self.out.extend_from_slice(src)
            }
            _ => self.write_str(condition),
        }
        self.out.push(b']');
    }

    fn write_replay_condition(&mut self, node: NodeRef<'_>, format: &Formatting) {
        self.out.extend_from_slice(&format.condition);
        let src = format.condition_src.as_deref();
        if !node.condition().is_empty() || src.is_some_and(|s| s.is_empty()) {
            self.write_condition(node.condition(), src);
        }
    }

    fn write_replay(&mut self, node: NodeRef<'_>, format: &Formatting, indent: usize) {
        self.out.extend_from_slice(&format.before);
        self.write_token(node.name(), &format.key);
        if node.is_leaf() {
            self.out.extend_from_slice(&format.between);
            self.write_token(&node.string(), &format.value);
            self.write_replay_condition(node, format);
        } else {
            self.write_replay_condition(node, format);
            self.out.extend_from_slice(&format.between);
            self.write_children(node, indent + 1);
        }
        self.out.extend_from_slice(&format.after);
    }

    fn write_canonical(&mut self, node: NodeRef<'_>, indent: usize) {
        self.write_indent(indent);
        self.write_quoted(node.name());
        if node.is_leaf() {
            self.out.push(b' ');
            self.write_quoted(&node.string());
            if !node.condition().is_empty() {
                self.out.push(b' ');
                self.write_condition(node.condition(), None);
            }
            self.out.push(b'\n');
            return;
        }
        if !node.condition().is_empty() {
            self.out.push(b' ');
            self.write_condition(node.condition(), None);
        }
        self.out.push(b'\n');
        self.write_indent(indent);
        self.out.extend_from_slice(b"{\n");
        self.write_children(node, indent + 1);
        self.write_indent(indent);
        self.out.extend_from_slice(b"}\n");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Color;

    #[test]
    fn canonical_layout() {
        let mut doc = Document::new();
        let root = doc.root_id();
        let block = doc.create_node("block");
        let leaf = doc.create_leaf("say \"hi\"", "a\tb");
        let color = doc.create_leaf("tint", Color::new(1, 2, 3, 4));
        doc.append(root, block);
        doc.append(block, leaf);
        doc.append(block, color);
        doc.node_mut(color).set_condition("$X360");
        doc.node_mut(block).set_condition("!$OSX");

        assert_eq!(
            doc.to_text(),
            "\"block\" [!$OSX]\n{\n\t\"say \\\"hi\\\"\" \"a\\tb\"\n\t\"tint\" \"1 2 3 4\" [$X360]\n}\n"
        );
    }

    #[test]
    fn empty_block() {
        let mut doc = Document::new();
        let root = doc.root_id();
        let outer = doc.create_node("outer");
        let inner = doc.create_node("inner");
        doc.append(root, outer);
        doc.append(outer, inner);
        assert_eq!(
            doc.to_text(),
            "\"outer\"\n{\n\t\"inner\"\n\t{\n\t}\n}\n"
        );
    }

    #[test]
    fn subtree_render_starts_at_depth_zero() {
        let mut doc = Document::new();
        let root = doc.root_id();
        let a = doc.create_node("a");
        let b = doc.create_node("b");
        let c = doc.create_leaf("c", 1);
        doc.append(root, a);
        doc.append(a, b);
        doc.append(b, c);
        assert_eq!(doc.node(b).to_text(), "\"b\"\n{\n\t\"c\" \"1\"\n}\n");
    }

    #[test]
    fn bare_tokens_fall_back_to_quotes_when_unsafe() {
        let mut doc = Document::from_text("key value\n").unwrap();
        let id = doc.root().first_child().id().unwrap();
        doc.node_mut(id).set_string("two words");
        assert_eq!(doc.to_text(), "key \"two words\"\n");
        doc.node_mut(id).set_name("");
        doc.node_mut(id).set_int(7);
        assert_eq!(doc.to_text(), "\"\" 7\n");
    }

    #[test]
    fn raw_quoted_source_is_kept_until_the_text_changes() {
        let src = "\"path\" \"C:\\Games\\it's\"\n";
        let mut doc = Document::from_text(src).unwrap();
        assert_eq!(doc.root().first_child().string(), "C:\\Games\\it's");
        assert_eq!(doc.to_text(), src);

        let id = doc.root().first_child().id().unwrap();
        doc.node_mut(id).set_string("D:\\it's");
        assert_eq!(doc.to_text(), "\"path\" \"D:\\\\it\\'s\"\n");
    }

    #[test]
    fn empty_conditional_is_replayed_until_cleared() {
        let mut doc = Document::from_text("a []{}\n\"k\" \"v\" []\n").unwrap();
        assert_eq!(doc.root().first_child().condition(), "");
        assert_eq!(doc.to_text(), "a []{}\n\"k\" \"v\" []\n");

        let k = doc.root().last_child().id().unwrap();
        doc.node_mut(k).set_condition("");
        assert_eq!(doc.to_text(), "a []{}\n\"k\" \"v\"\n");
        doc.node_mut(k).set_condition("$X");
        assert_eq!(doc.to_text(), "a []{}\n\"k\" \"v\" [$X]\n");
    }

    #[test]
    fn legacy_bytes_replay_exactly() {
        let src = b"caf\xe9 \"na\xefve\" [\xe9]\n// \xa9\n";
        let mut doc = Document::from_text(src).unwrap();
        assert_eq!(TextEncoder::new().encode_bytes(&doc), src);
        assert_eq!(doc.to_text(), "caf\u{fffd} \"na\u{fffd}ve\" [\u{fffd}]\n// \u{fffd}\n");

        let id = doc.root().first_child().id().unwrap();
        doc.node_mut(id).set_string("plain");
        assert_eq!(
            TextEncoder::new().encode_bytes(&doc),
            b"caf\xe9 \"plain\" [\xe9]\n// \xa9\n"
        );
    }
}
