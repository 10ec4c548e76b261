//! Cursor over a decrypted save body
//!
//! All numbers are little-endian. Strings are length-prefixed: a 4-byte
//! length `N` that counts the trailing NUL, `N - 1` UTF-8 bytes and the NUL.
//! A length of 0 is the empty string with nothing after it.

use std::io::{Cursor, Read};

use crate::error::{Result, SaveError};

/// Reads primitive values and strings from a byte slice.
pub struct TagReader<'a> {
    cursor: Cursor<&'a [u8]>,
    /// Start of the most recent string read, cleared by any other read
    last_string: Option<u64>,
}

impl<'a> TagReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            cursor: Cursor::new(data),
            last_string: None,
        }
    }

    /// Reader positioned at `offset`
    pub fn at(data: &'a [u8], offset: usize) -> Self {
        let mut reader = Self::new(data);
        reader.cursor.set_position(offset as u64);
        reader
    }

    /// Current byte offset
    pub fn position(&self) -> usize {
        self.cursor.position() as usize
    }

    pub fn len(&self) -> usize {
        self.cursor.get_ref().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Bytes left after the cursor
    pub fn remaining(&self) -> usize {
        self.len().saturating_sub(self.position())
    }

    pub fn is_eof(&self) -> bool {
        self.remaining() == 0
    }

    /// Signed 32-bit integer.
    ///
    /// Negative values other than -1 come back as `i32::MAX`; saves use
    /// that pattern for overflowed counters and the game reads them the
    /// same way.
    pub fn read_i32(&mut self) -> Result<i32> {
        let value = i32::from_le_bytes(self.read_array()?);
        if value < 0 && value != -1 {
            return Ok(i32::MAX);
        }
        Ok(value)
    }

    /// Signed 32-bit integer without the overflow clamp
    pub fn read_raw_i32(&mut self) -> Result<i32> {
        Ok(i32::from_le_bytes(self.read_array()?))
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        Ok(u32::from_le_bytes(self.read_array()?))
    }

    pub fn read_f32(&mut self) -> Result<f32> {
        Ok(f32::from_le_bytes(self.read_array()?))
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        let [byte] = self.read_array::<1>()?;
        Ok(byte)
    }

    pub fn read_bool(&mut self) -> Result<bool> {
        Ok(self.read_u8()? != 0)
    }

    /// Length-prefixed string
    pub fn read_string(&mut self) -> Result<String> {
        let start = self.cursor.position();
        let offset = self.position();
        let len = self.read_raw_i32()?;

        let value = match len {
            0 => String::new(),
            len if len < 0 => {
                return Err(SaveError::InvalidString {
                    offset,
                    reason: format!("negative length {len} (wide strings are not supported)"),
                });
            }
            len => {
                let len = len as usize;
                if len > self.remaining() {
                    return Err(SaveError::UnexpectedEof {
                        offset: self.position(),
                        wanted: len,
                    });
                }
                let mut bytes = vec![0u8; len];
                self.fill(&mut bytes)?;
                if bytes.pop() != Some(0) {
                    return Err(SaveError::InvalidString {
                        offset,
                        reason: "missing NUL terminator".to_string(),
                    });
                }
                String::from_utf8(bytes).map_err(|e| SaveError::InvalidString {
                    offset,
                    reason: e.to_string(),
                })?
            }
        };

        self.last_string = Some(start);
        Ok(value)
    }

    /// Read the next string without moving the cursor
    pub fn peek_string(&mut self) -> Result<String> {
        let position = self.cursor.position();
        let last_string = self.last_string;
        let result = self.read_string();
        self.cursor.set_position(position);
        self.last_string = last_string;
        result
    }

    /// Undo the string token that was just read.
    ///
    /// Only the most recent read can be undone, and only if it was a string;
    /// otherwise this does nothing and returns `false`.
    pub fn revert_position(&mut self) -> bool {
        match self.last_string.take() {
            Some(start) => {
                self.cursor.set_position(start);
                true
            }
            None => false,
        }
    }

    fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut buf = [0u8; N];
        self.fill(&mut buf)?;
        Ok(buf)
    }

    fn fill(&mut self, buf: &mut [u8]) -> Result<()> {
        let offset = self.position();
        self.last_string = None;
        self.cursor
            .read_exact(buf)
            .map_err(|_| SaveError::UnexpectedEof {
                offset,
                wanted: buf.len(),
            })
    }
}
