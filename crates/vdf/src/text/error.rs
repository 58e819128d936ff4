//! Text parser error type.

use thiserror::Error;

/// Structural error in the text encoding. Offsets are byte positions in the input.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TextError {
    #[error("vdf: unexpected {token} at byte {offset}")]
    UnexpectedToken { token: char, offset: usize },
    #[error("vdf: unexpected conditional {condition:?} at byte {offset}")]
    UnexpectedConditional { condition: String, offset: usize },
    #[error("vdf: missing {{ at byte {offset}")]
    MissingOpenBrace { offset: usize },
    #[error("vdf: missing }} for the {{ at byte {offset}")]
    MissingCloseBrace { offset: usize },
    #[error("vdf: unexpected end of input at byte {offset}, expected a value")]
    UnexpectedEof { offset: usize },
    #[error("vdf: unterminated string starting at byte {offset}")]
    UnterminatedString { offset: usize },
    #[error("vdf: nesting deeper than {max_depth} at byte {offset}")]
    TooDeep { max_depth: usize, offset: usize },
}

impl TextError {
    /// Byte offset the error points at.
    pub fn offset(&self) -> usize {
        match self {
            TextError::UnexpectedToken { offset, .. }
            | TextError::UnexpectedConditional { offset, .. }
            | TextError::MissingOpenBrace { offset }
            | TextError::MissingCloseBrace { offset }
            | TextError::UnexpectedEof { offset }
            | TextError::UnterminatedString { offset }
            | TextError::TooDeep { offset, .. } => *offset,
        }
    }
}
