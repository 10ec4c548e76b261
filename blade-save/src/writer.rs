//! Output buffer for save bodies
//!
//! Mirror of [`crate::reader::TagReader`]: little-endian numbers and
//! length-prefixed strings, plus reserve/patch support for length fields
//! that precede the data they measure.

use crate::error::{Result, SaveError};
use crate::tree::size::string_size;

/// Growable output buffer
#[derive(Debug, Default)]
pub struct TagWriter {
    buf: Vec<u8>,
}

impl TagWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
        }
    }

    /// Current length of the output, which is where the next write lands
    pub fn position(&self) -> usize {
        self.buf.len()
    }

    pub fn write_i32(&mut self, value: i32) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    pub fn write_u32(&mut self, value: u32) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    pub fn write_f32(&mut self, value: f32) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    pub fn write_u8(&mut self, value: u8) {
        self.buf.push(value);
    }

    pub fn write_bool(&mut self, value: bool) {
        self.buf.push(u8::from(value));
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// Length-prefixed string; the empty string is a bare zero length
    pub fn write_string(&mut self, value: &str) -> Result<()> {
        if value.is_empty() {
            self.write_i32(0);
            return Ok(());
        }
        self.write_i32(string_length_field(value.len())?);
        self.buf.extend_from_slice(value.as_bytes());
        self.buf.push(0);
        debug_assert_eq!(string_size(value), 4 + value.len() + 1);
        Ok(())
    }

    /// Reserve a 4-byte slot to be filled by [`TagWriter::patch_i32`]
    pub fn reserve_i32(&mut self) -> usize {
        let at = self.position();
        self.write_i32(0);
        at
    }

    /// Overwrite a slot returned by [`TagWriter::reserve_i32`]
    pub fn patch_i32(&mut self, at: usize, value: i32) {
        self.buf[at..at + 4].copy_from_slice(&value.to_le_bytes());
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.buf
    }

    pub fn into_inner(self) -> Vec<u8> {
        self.buf
    }
}

/// Length field of a non-empty string, which counts the NUL terminator
fn string_length_field(len: usize) -> Result<i32> {
    len.checked_add(1)
        .and_then(|n| i32::try_from(n).ok())
        .ok_or(SaveError::StringTooLong { len })
}
