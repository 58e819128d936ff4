//! Packed binary decoder.

use log::{debug, trace};
use vdf_buffers::{BufferError, Reader};

use super::constants::{PackType, NULL_MARKER};
use super::BinaryError;
use crate::document::Document;
use crate::node::{NodeData, NodeId};
use crate::value::{Color, Value};
use crate::MAX_DEPTH;

/// Decodes the packed binary encoding into a [`Document`].
///
/// Decoding stops at the sentinel that closes the top-level list; any bytes
/// after it are left unread.
///
/// # Example
///
/// ```
/// use vdf::binary::BinaryDecoder;
///
/// let data = b"\x02hp\x00\x64\x00\x00\x00\x08";
/// let doc = BinaryDecoder::new().decode(data).unwrap();
/// assert_eq!(doc.root().first_by_name("hp").int(), 100);
/// ```
#[derive(Debug, Clone)]
pub struct BinaryDecoder {
    max_depth: usize,
}

impl Default for BinaryDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl BinaryDecoder {
    pub fn new() -> Self {
        Self {
            max_depth: MAX_DEPTH,
        }
    }

    /// Limits how many interior nodes may be nested inside each other.
    pub fn with_max_depth(max_depth: usize) -> Self {
        Self { max_depth }
    }

    pub fn decode(&self, data: &[u8]) -> Result<Document, BinaryError> {
        self.decode_with_consumed(data).map(|(doc, _)| doc)
    }

    /// Decodes a document and reports how many bytes it occupied, sentinel
    /// included.
    pub fn decode_with_consumed(&self, data: &[u8]) -> Result<(Document, usize), BinaryError> {
        let mut run = DecodeRun {
            reader: Reader::new(data),
            doc: Document::new(),
            max_depth: self.max_depth,
        };
        let root = run.doc.root_id();
        run.read_list(root, 0)?;
        let consumed = run.reader.x;
        debug!(
            "decoded {} of {} binary bytes into {} nodes",
            consumed,
            data.len(),
            run.doc.node_count() - 1
        );
        Ok((run.doc, consumed))
    }
}

/// Maps a failed read starting at `offset` to a decode error.
fn truncated(offset: usize) -> impl FnOnce(BufferError) -> BinaryError {
    move |_| BinaryError::UnexpectedEof { offset }
}

struct DecodeRun<'a> {
    reader: Reader<'a>,
    doc: Document,
    max_depth: usize,
}

impl DecodeRun<'_> {
    fn read_list(&mut self, parent: NodeId, depth: usize) -> Result<(), BinaryError> {
        loop {
            let offset = self.reader.x;
            let tag = self.reader.u8().map_err(truncated(offset))?;
            if tag == NULL_MARKER {
                return Ok(());
            }
            let pack_type = PackType::try_from(tag)
                .map_err(|tag| BinaryError::UnknownPackType { tag, offset })?;
            let name = self.read_str("name")?;
            trace!("binary node {:?} ({:?}) at byte {}", name, pack_type, offset);

            let id = self.doc.push_node(NodeData::new(name));
            self.doc.link_last(parent, id);
            if pack_type == PackType::None {
                if depth >= self.max_depth {
                    return Err(BinaryError::TooDeep {
                        max_depth: self.max_depth,
                        offset,
                    });
                }
                self.read_list(id, depth + 1)?;
            } else {
                let value = self.read_value(pack_type)?;
                self.doc.data_mut(id).value = value;
            }
        }
    }

    fn read_str(&mut self, what: &'static str) -> Result<String, BinaryError> {
        let offset = self.reader.x;
        let bytes = self.reader.cstr().map_err(truncated(offset))?;
        std::str::from_utf8(bytes)
            .map(str::to_owned)
            .map_err(|e| BinaryError::InvalidUtf8 {
                what,
                offset: offset + e.valid_up_to(),
            })
    }

    fn read_value(&mut self, pack_type: PackType) -> Result<Value, BinaryError> {
        if pack_type == PackType::String {
            return self.read_str("string").map(Value::String);
        }
        let offset = self.reader.x;
        let eof = truncated(offset);
        let reader = &mut self.reader;
        Ok(match pack_type {
            PackType::None | PackType::String => Value::None,
            PackType::Int => Value::Int(reader.i32().map_err(eof)?),
            PackType::Float => Value::Float(reader.f32().map_err(eof)?),
            PackType::Ptr => Value::Ptr(reader.u32().map_err(eof)?),
            PackType::WString => {
                let count = reader.u16().map_err(truncated(offset))? as usize;
                let units = reader.buf(count * 2).map_err(eof)?;
                Value::WString(
                    units
                        .chunks_exact(2)
                        .map(|c| u16::from_le_bytes([c[0], c[1]]))
                        .collect(),
                )
            }
            PackType::Color => {
                let [r, g, b, a] = reader.u32().map_err(eof)?.to_le_bytes();
                Value::Color(Color::new(r, g, b, a))
            }
            PackType::Uint64 => Value::Uint64(reader.u64().map_err(eof)?),
        })
    }
}
