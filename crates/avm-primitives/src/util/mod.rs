//! Utility types for binary serialization.
//!
//! Every integer on the AVM wire is big-endian and every variable-length
//! field carries an explicit `u16` or `u32` length prefix. `AvmReader` and
//! `AvmWriter` are the cursor types used by all `read_from` / `write_to`
//! implementations; the free functions cover one-off offset-based access.

use crate::PrimitivesError;

// ---------------------------------------------------------------------------
// Offset-based helpers
// ---------------------------------------------------------------------------

/// Copy `buf[start..end]` into a new vector, checking bounds.
///
/// # Arguments
/// * `buf` - Source buffer.
/// * `start` - Inclusive start offset.
/// * `end` - Exclusive end offset.
///
/// # Returns
/// The copied bytes, or `BufferBounds` if the range does not fit.
pub fn copy_range(buf: &[u8], start: usize, end: usize) -> Result<Vec<u8>, PrimitivesError> {
    if start > end || end > buf.len() {
        return Err(PrimitivesError::BufferBounds {
            offset: start,
            wanted: end.saturating_sub(start),
            available: buf.len().saturating_sub(start),
        });
    }
    Ok(buf[start..end].to_vec())
}

/// Read a big-endian u16 at `offset`.
pub fn read_u16_be(buf: &[u8], offset: usize) -> Result<u16, PrimitivesError> {
    let mut reader = AvmReader::new(buf);
    reader.skip(offset)?;
    reader.read_u16_be()
}

/// Read a big-endian u32 at `offset`.
pub fn read_u32_be(buf: &[u8], offset: usize) -> Result<u32, PrimitivesError> {
    let mut reader = AvmReader::new(buf);
    reader.skip(offset)?;
    reader.read_u32_be()
}

/// Append a big-endian u16 to `buf`.
pub fn write_u16_be(buf: &mut Vec<u8>, value: u16) {
    buf.extend_from_slice(&value.to_be_bytes());
}

/// Append a big-endian u32 to `buf`.
pub fn write_u32_be(buf: &mut Vec<u8>, value: u32) {
    buf.extend_from_slice(&value.to_be_bytes());
}

// ---------------------------------------------------------------------------
// AvmReader
// ---------------------------------------------------------------------------

/// A cursor-based reader for AVM binary data.
///
/// Wraps a byte slice and maintains a read position. All multi-byte
/// integers are decoded big-endian, and every read is bounds-checked.
pub struct AvmReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> AvmReader<'a> {
    /// Create a new reader over the given byte slice.
    ///
    /// # Arguments
    /// * `data` - The byte slice to read from.
    ///
    /// # Returns
    /// An `AvmReader` positioned at the start of the data.
    pub fn new(data: &'a [u8]) -> Self {
        AvmReader { data, pos: 0 }
    }

    /// Read `n` bytes and advance the position.
    ///
    /// # Arguments
    /// * `n` - Number of bytes to read.
    ///
    /// # Returns
    /// A byte slice of length `n`, or `BufferBounds` if insufficient data remains.
    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8], PrimitivesError> {
        if n > self.remaining() {
            return Err(PrimitivesError::BufferBounds {
                offset: self.pos,
                wanted: n,
                available: self.remaining(),
            });
        }
        let slice = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    /// Read exactly `N` bytes into a fixed-size array.
    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N], PrimitivesError> {
        let bytes = self.read_bytes(N)?;
        let mut out = [0u8; N];
        out.copy_from_slice(bytes);
        Ok(out)
    }

    /// Advance the position by `n` bytes without returning them.
    pub fn skip(&mut self, n: usize) -> Result<(), PrimitivesError> {
        self.read_bytes(n).map(|_| ())
    }

    /// Read a single byte and advance the position.
    pub fn read_u8(&mut self) -> Result<u8, PrimitivesError> {
        Ok(self.read_array::<1>()?[0])
    }

    /// Read a big-endian u16 and advance the position by 2 bytes.
    pub fn read_u16_be(&mut self) -> Result<u16, PrimitivesError> {
        Ok(u16::from_be_bytes(self.read_array()?))
    }

    /// Read a big-endian u32 and advance the position by 4 bytes.
    pub fn read_u32_be(&mut self) -> Result<u32, PrimitivesError> {
        Ok(u32::from_be_bytes(self.read_array()?))
    }

    /// Read a big-endian signed i32 and advance the position by 4 bytes.
    pub fn read_i32_be(&mut self) -> Result<i32, PrimitivesError> {
        Ok(i32::from_be_bytes(self.read_array()?))
    }

    /// Read a big-endian u64 and advance the position by 8 bytes.
    pub fn read_u64_be(&mut self) -> Result<u64, PrimitivesError> {
        Ok(u64::from_be_bytes(self.read_array()?))
    }

    /// Read a `u16` length prefix followed by that many bytes.
    pub fn read_u16_prefixed(&mut self) -> Result<&'a [u8], PrimitivesError> {
        let len = self.read_u16_be()? as usize;
        self.read_bytes(len)
    }

    /// Read a `u32` length prefix followed by that many bytes.
    pub fn read_u32_prefixed(&mut self) -> Result<&'a [u8], PrimitivesError> {
        let len = self.read_u32_be()? as usize;
        self.read_bytes(len)
    }

    /// Return the number of bytes remaining.
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    /// Return the current read offset.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Return the unread tail of the buffer without consuming it.
    pub fn rest(&self) -> &'a [u8] {
        &self.data[self.pos..]
    }
}

// ---------------------------------------------------------------------------
// AvmWriter
// ---------------------------------------------------------------------------

/// A buffer-based writer for AVM binary data.
///
/// Wraps a `Vec<u8>` and appends big-endian integers and length-prefixed
/// byte strings.
pub struct AvmWriter {
    buf: Vec<u8>,
}

impl AvmWriter {
    /// Create a new empty writer.
    pub fn new() -> Self {
        AvmWriter { buf: Vec::new() }
    }

    /// Create a new writer with a pre-allocated capacity.
    ///
    /// # Arguments
    /// * `capacity` - Initial byte capacity of the internal buffer.
    pub fn with_capacity(capacity: usize) -> Self {
        AvmWriter { buf: Vec::with_capacity(capacity) }
    }

    /// Append raw bytes to the buffer.
    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// Append a single byte to the buffer.
    pub fn write_u8(&mut self, val: u8) {
        self.buf.push(val);
    }

    /// Append a big-endian u16 (2 bytes) to the buffer.
    pub fn write_u16_be(&mut self, val: u16) {
        write_u16_be(&mut self.buf, val);
    }

    /// Append a big-endian u32 (4 bytes) to the buffer.
    pub fn write_u32_be(&mut self, val: u32) {
        write_u32_be(&mut self.buf, val);
    }

    /// Append a big-endian i32 (4 bytes) to the buffer.
    pub fn write_i32_be(&mut self, val: i32) {
        self.buf.extend_from_slice(&val.to_be_bytes());
    }

    /// Append a big-endian u64 (8 bytes) to the buffer.
    pub fn write_u64_be(&mut self, val: u64) {
        self.buf.extend_from_slice(&val.to_be_bytes());
    }

    /// Append a `u16` length prefix followed by the bytes.
    ///
    /// Callers validate that `bytes` fits in a `u16` before writing.
    pub fn write_u16_prefixed(&mut self, bytes: &[u8]) {
        self.write_u16_be(bytes.len() as u16);
        self.write_bytes(bytes);
    }

    /// Append a `u32` length prefix followed by the bytes.
    pub fn write_u32_prefixed(&mut self, bytes: &[u8]) {
        self.write_u32_be(bytes.len() as u32);
        self.write_bytes(bytes);
    }

    /// Consume the writer and return the accumulated bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    /// Return a reference to the current buffer contents.
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Return the current length of the buffer.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Check if the buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }
}

impl Default for AvmWriter {
    fn default() -> Self {
        Self::new()
    }
}
