//! Little-endian byte reader with cursor tracking.

use crate::BufferError;

/// A bounds-checked reader over a byte slice.
///
/// All integer reads are little-endian. A read that would run past the end
/// of the slice returns [`BufferError::EndOfBuffer`] and leaves the cursor
/// where it was.
///
/// # Example
///
/// ```
/// use vdf_buffers::{BufferError, Reader};
///
/// let data = [0x01, 0x02, 0x03];
/// let mut reader = Reader::new(&data);
///
/// assert_eq!(reader.u16(), Ok(0x0201));
/// assert_eq!(reader.u16(), Err(BufferError::EndOfBuffer));
/// assert_eq!(reader.u8(), Ok(0x03));
/// ```
#[derive(Debug, Clone)]
pub struct Reader<'a> {
    /// The underlying byte slice.
    pub uint8: &'a [u8],
    /// Current cursor position.
    pub x: usize,
}

impl<'a> Reader<'a> {
    /// Creates a new reader positioned at the start of `uint8`.
    pub fn new(uint8: &'a [u8]) -> Self {
        Self { uint8, x: 0 }
    }

    /// Returns the number of remaining bytes.
    pub fn size(&self) -> usize {
        self.uint8.len() - self.x
    }

    /// Returns `true` when every byte has been consumed.
    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    /// Peeks at the current byte without advancing the cursor.
    pub fn peek(&self) -> Option<u8> {
        self.uint8.get(self.x).copied()
    }

    /// Returns the next `size` bytes and advances the cursor.
    pub fn buf(&mut self, size: usize) -> Result<&'a [u8], BufferError> {
        if size > self.size() {
            return Err(BufferError::EndOfBuffer);
        }
        let start = self.x;
        self.x += size;
        Ok(&self.uint8[start..self.x])
    }

    fn array<const N: usize>(&mut self) -> Result<[u8; N], BufferError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.buf(N)?);
        Ok(out)
    }

    /// Reads an unsigned 8-bit integer.
    #[inline]
    pub fn u8(&mut self) -> Result<u8, BufferError> {
        let val = self.peek().ok_or(BufferError::EndOfBuffer)?;
        self.x += 1;
        Ok(val)
    }

    /// Reads an unsigned 16-bit integer.
    #[inline]
    pub fn u16(&mut self) -> Result<u16, BufferError> {
        self.array().map(u16::from_le_bytes)
    }

    /// Reads an unsigned 32-bit integer.
    #[inline]
    pub fn u32(&mut self) -> Result<u32, BufferError> {
        self.array().map(u32::from_le_bytes)
    }

    /// Reads a signed 32-bit integer.
    #[inline]
    pub fn i32(&mut self) -> Result<i32, BufferError> {
        self.array().map(i32::from_le_bytes)
    }

    /// Reads an unsigned 64-bit integer.
    #[inline]
    pub fn u64(&mut self) -> Result<u64, BufferError> {
        self.array().map(u64::from_le_bytes)
    }

    /// Reads a 32-bit IEEE-754 float, bit pattern preserved.
    #[inline]
    pub fn f32(&mut self) -> Result<f32, BufferError> {
        self.array().map(f32::from_le_bytes)
    }

    /// Reads a NUL-terminated byte string and advances past the terminator.
    ///
    /// The returned slice does not include the NUL.
    pub fn cstr(&mut self) -> Result<&'a [u8], BufferError> {
        let rest = &self.uint8[self.x..];
        let len = rest
            .iter()
            .position(|&b| b == 0)
            .ok_or(BufferError::MissingTerminator)?;
        self.x += len + 1;
        Ok(&rest[..len])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_u8() {
        let data = [0x01, 0x02];
        let mut reader = Reader::new(&data);
        assert_eq!(reader.u8(), Ok(0x01));
        assert_eq!(reader.u8(), Ok(0x02));
        assert_eq!(reader.u8(), Err(BufferError::EndOfBuffer));
    }

    #[test]
    fn test_u32_little_endian() {
        let data = [0x04, 0x03, 0x02, 0x01];
        let mut reader = Reader::new(&data);
        assert_eq!(reader.u32(), Ok(0x01020304));
        assert!(reader.is_empty());
    }

    #[test]
    fn test_short_read_keeps_cursor() {
        let data = [0xff, 0xff, 0xff];
        let mut reader = Reader::new(&data);
        assert_eq!(reader.u32(), Err(BufferError::EndOfBuffer));
        assert_eq!(reader.x, 0);
        assert_eq!(reader.size(), 3);
    }

    #[test]
    fn test_cstr() {
        let data = b"ab\0\0c";
        let mut reader = Reader::new(data);
        assert_eq!(reader.cstr(), Ok(&b"ab"[..]));
        assert_eq!(reader.cstr(), Ok(&b""[..]));
        assert_eq!(reader.cstr(), Err(BufferError::MissingTerminator));
        assert_eq!(reader.x, 4);
    }
}
