//! Byte buffer utilities for the packed KeyValues format.
//!
//! Every multi-byte quantity in the packed format is little-endian, and every
//! read must fail cleanly on truncated input instead of panicking, so this
//! crate provides:
//!
//! - [`Reader`] - Reads little-endian data from a byte slice with cursor tracking
//! - [`Writer`] - Writes little-endian data to an auto-growing buffer
//!
//! # Example
//!
//! ```
//! use vdf_buffers::{Reader, Writer};
//!
//! let mut writer = Writer::new();
//! writer.u8(0x01);
//! writer.u16(0x0203);
//! writer.cstr(b"hello");
//! let data = writer.flush();
//!
//! let mut reader = Reader::new(&data);
//! assert_eq!(reader.u8(), Ok(0x01));
//! assert_eq!(reader.u16(), Ok(0x0203));
//! assert_eq!(reader.cstr(), Ok(&b"hello"[..]));
//! assert!(reader.is_empty());
//! ```

mod reader;
mod writer;

pub use reader::Reader;
pub use writer::Writer;

/// Error type for buffer operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferError {
    /// Attempted to read past the end of the buffer.
    EndOfBuffer,
    /// A NUL-terminated string had no terminator before the end of the buffer.
    MissingTerminator,
}

impl std::fmt::Display for BufferError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BufferError::EndOfBuffer => write!(f, "end of buffer"),
            BufferError::MissingTerminator => write!(f, "missing NUL terminator"),
        }
    }
}

impl std::error::Error for BufferError {}
