//! Packed binary encoding: a tagged union per node, sibling lists closed by
//! a sentinel tag, all integers little-endian.

mod constants;
mod decoder;
mod encoder;
mod error;

pub use constants::{PackType, NULL_MARKER};
pub use decoder::BinaryDecoder;
pub use encoder::BinaryEncoder;
pub use error::BinaryError;
