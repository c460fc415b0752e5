use super::error::{SerError, SerKind, SerResult};

/// Little-endian output buffer, the encoding twin of
/// [`ByteReader`](super::ByteReader).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ByteWriter {
    out: Vec<u8>,
    section: SerKind,
}

impl Default for ByteWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl ByteWriter {
    /// Empty buffer in the [`SerKind::Certificate`] section.
    pub fn new() -> Self {
        Self {
            out: Vec::new(),
            section: SerKind::Certificate,
        }
    }

    /// Switches to `section` and returns the section that was active.
    pub fn enter(&mut self, section: SerKind) -> SerKind {
        core::mem::replace(&mut self.section, section)
    }

    /// Bytes written so far.
    pub fn as_bytes(&self) -> &[u8] {
        &self.out
    }

    pub fn len(&self) -> usize {
        self.out.len()
    }

    pub fn is_empty(&self) -> bool {
        self.out.is_empty()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.out
    }

    pub fn write_u8(&mut self, value: u8) {
        self.out.push(value);
    }

    pub fn write_u32(&mut self, value: u32) {
        self.out.extend_from_slice(&value.to_le_bytes());
    }

    pub fn write_i32(&mut self, value: i32) {
        self.out.extend_from_slice(&value.to_le_bytes());
    }

    pub fn write_flag(&mut self, value: bool) {
        self.write_u8(u8::from(value));
    }

    /// Writes a length or item count as a `u32`.
    pub fn write_count(&mut self, field: &'static str, count: usize) -> SerResult<()> {
        let count =
            u32::try_from(count).map_err(|_| SerError::invalid_length(self.section, field))?;
        self.write_u32(count);
        Ok(())
    }

    /// Writes a `u32`-prefixed run of cells.
    pub fn write_cells(&mut self, field: &'static str, cells: &[u8]) -> SerResult<()> {
        self.write_count(field, cells.len())?;
        self.out.extend_from_slice(cells);
        Ok(())
    }
}
