//! Binary decoder error type.

use thiserror::Error;

/// Structural error in the packed binary encoding. Offsets are byte
/// positions in the input.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BinaryError {
    #[error("vdf: unknown pack type {tag} at byte {offset}")]
    UnknownPackType { tag: u8, offset: usize },
    #[error("vdf: unexpected end of input at byte {offset}")]
    UnexpectedEof { offset: usize },
    #[error("vdf: invalid UTF-8 in {what} at byte {offset}")]
    InvalidUtf8 { what: &'static str, offset: usize },
    #[error("vdf: nesting deeper than {max_depth} at byte {offset}")]
    TooDeep { max_depth: usize, offset: usize },
}

impl BinaryError {
    /// Byte offset the error points at.
    pub fn offset(&self) -> usize {
        match self {
            BinaryError::UnknownPackType { offset, .. }
            | BinaryError::UnexpectedEof { offset }
            | BinaryError::InvalidUtf8 { offset, .. }
            | BinaryError::TooDeep { offset, .. } => *offset,
        }
    }
}
