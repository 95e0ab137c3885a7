use std::io::{ErrorKind, Read};

use crate::harness::Harness;

/// Fixed-capacity, zero-initialised input buffer for a single harness run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputBuffer {
    bytes: Vec<u8>,
    filled: usize,
}

impl InputBuffer {
    pub fn zeroed(capacity: usize) -> Self {
        Self {
            bytes: vec![0u8; capacity],
            filled: 0,
        }
    }

    /// Fill a fresh buffer for `harness` from `reader`.
    ///
    /// Reads until `harness.read_len` bytes have arrived or the stream ends. A short stream is
    /// not an error; the unread tail stays zero. A read error ends the stream and keeps whatever
    /// arrived before it.
    pub fn read_from<R: Read>(reader: &mut R, harness: &Harness) -> Self {
        let mut buffer = Self::zeroed(harness.capacity);
        let limit = harness.read_len.min(harness.capacity);

        while buffer.filled < limit {
            match reader.read(&mut buffer.bytes[buffer.filled..limit]) {
                Ok(0) => break,
                Ok(n) => buffer.filled += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(_) => break,
            }
        }

        buffer
    }

    /// Fill a fresh buffer for `harness` from an in-memory input, truncated at `harness.read_len`.
    pub fn from_bytes(harness: &Harness, data: &[u8]) -> Self {
        let mut buffer = Self::zeroed(harness.capacity);
        let len = data.len().min(harness.read_len).min(harness.capacity);
        buffer.bytes[..len].copy_from_slice(&data[..len]);
        buffer.filled = len;
        buffer
    }

    /// Number of bytes actually read into the buffer.
    pub fn filled(&self) -> usize {
        self.filled
    }

    pub fn capacity(&self) -> usize {
        self.bytes.len()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn byte(&self, offset: usize) -> Option<u8> {
        self.bytes.get(offset).copied()
    }

    pub fn slice(&self, offset: usize, len: usize) -> Option<&[u8]> {
        self.bytes.get(offset..offset.checked_add(len)?)
    }

    pub fn u16_le(&self, offset: usize) -> Option<u16> {
        let b = self.slice(offset, 2)?;
        Some(u16::from_le_bytes([b[0], b[1]]))
    }

    pub fn u32_le(&self, offset: usize) -> Option<u32> {
        let b = self.slice(offset, 4)?;
        Some(u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }
}
