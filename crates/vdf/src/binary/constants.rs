//! Wire tags.

use crate::value::Value;

/// Tag byte that ends a sibling list. It carries no name or payload.
pub const NULL_MARKER: u8 = 8;

/// Tag byte identifying the payload type of a packed node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum PackType {
    /// Interior node; the payload is its child list.
    None = 0,
    String = 1,
    Int = 2,
    Float = 3,
    Ptr = 4,
    WString = 5,
    Color = 6,
    Uint64 = 7,
}

impl PackType {
    /// Tag for a node holding `value`.
    pub fn of(value: &Value) -> Self {
        match value {
            Value::None => PackType::None,
            Value::String(_) => PackType::String,
            Value::Int(_) => PackType::Int,
            Value::Float(_) => PackType::Float,
            Value::Ptr(_) => PackType::Ptr,
            Value::WString(_) => PackType::WString,
            Value::Color(_) => PackType::Color,
            Value::Uint64(_) => PackType::Uint64,
        }
    }
}

impl TryFrom<u8> for PackType {
    type Error = u8;

    fn try_from(tag: u8) -> Result<Self, u8> {
        Ok(match tag {
            0 => PackType::None,
            1 => PackType::String,
            2 => PackType::Int,
            3 => PackType::Float,
            4 => PackType::Ptr,
            5 => PackType::WString,
            6 => PackType::Color,
            7 => PackType::Uint64,
            _ => return Err(tag),
        })
    }
}
