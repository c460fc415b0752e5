use super::error::{SerError, SerKind, SerResult};

/// Bounds-checked little-endian reader over certificate bytes.
///
/// The reader remembers the section it is in (see [`ByteReader::enter`]);
/// errors are tagged with that section.
#[derive(Debug, Clone, Copy)]
pub struct ByteReader<'a> {
    bytes: &'a [u8],
    offset: usize,
    section: SerKind,
}

impl<'a> ByteReader<'a> {
    /// Reader at offset zero, in the [`SerKind::Certificate`] section.
    pub fn new(bytes: &'a [u8]) -> Self {
        Self {
            bytes,
            offset: 0,
            section: SerKind::Certificate,
        }
    }

    /// Switches to `section` and returns the section that was active.
    pub fn enter(&mut self, section: SerKind) -> SerKind {
        core::mem::replace(&mut self.section, section)
    }

    /// Bytes consumed so far.
    pub fn position(&self) -> usize {
        self.offset
    }

    pub fn remaining(&self) -> usize {
        self.bytes.len() - self.offset
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Error for an unknown discriminant in the current section.
    pub fn invalid_value(&self, field: &'static str) -> SerError {
        SerError::invalid_value(self.section, field)
    }

    /// Error for an impossible length in the current section.
    pub fn invalid_length(&self, field: &'static str) -> SerError {
        SerError::invalid_length(self.section, field)
    }

    fn take(&mut self, len: usize, field: &'static str) -> SerResult<&'a [u8]> {
        if len > self.remaining() {
            return Err(SerError::unexpected_end(self.section, field));
        }
        let taken = &self.bytes[self.offset..self.offset + len];
        self.offset += len;
        Ok(taken)
    }

    fn array<const N: usize>(&mut self, field: &'static str) -> SerResult<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N, field)?);
        Ok(out)
    }

    pub fn read_u8(&mut self, field: &'static str) -> SerResult<u8> {
        Ok(self.take(1, field)?[0])
    }

    pub fn read_u32(&mut self, field: &'static str) -> SerResult<u32> {
        self.array(field).map(u32::from_le_bytes)
    }

    pub fn read_i32(&mut self, field: &'static str) -> SerResult<i32> {
        self.array(field).map(i32::from_le_bytes)
    }

    /// Presence flag: `0` or `1`, anything else is invalid.
    pub fn read_flag(&mut self, field: &'static str) -> SerResult<bool> {
        match self.read_u8(field)? {
            0 => Ok(false),
            1 => Ok(true),
            _ => Err(self.invalid_value(field)),
        }
    }

    /// Reads a `u32`-prefixed run of cells.
    pub fn read_cells(&mut self, field: &'static str) -> SerResult<Vec<u8>> {
        let len = self.read_u32(field)? as usize;
        self.take(len, field).map(<[u8]>::to_vec)
    }

    /// Reads a `u32` item count and checks that `count` items of at least
    /// `min_item_len` bytes each can still follow.
    pub fn read_count(&mut self, field: &'static str, min_item_len: usize) -> SerResult<usize> {
        let count = self.read_u32(field)? as usize;
        match count.checked_mul(min_item_len) {
            Some(needed) if needed <= self.remaining() => Ok(count),
            _ => Err(self.invalid_length(field)),
        }
    }

    /// Succeeds only when every byte has been consumed.
    pub fn finish(&self) -> SerResult<()> {
        match self.remaining() {
            0 => Ok(()),
            remaining => Err(SerError::trailing_bytes(
                SerKind::Certificate,
                self.offset,
                remaining,
            )),
        }
    }
}
