//! Minimal byte buffer for serializing pattern parameters
//!
//! Values are stored little-endian in the order they are written.

use crate::error::PondError;

#[derive(Debug, Clone, Default)]
pub struct BinBuffer {
    bytes: Vec<u8>,
    cursor: usize,
}

impl BinBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap existing bytes for reading
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self { bytes, cursor: 0 }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Bytes left to read
    pub fn remaining(&self) -> usize {
        self.bytes.len() - self.cursor
    }

    pub fn write_f32(&mut self, value: f32) {
        self.bytes.extend_from_slice(&value.to_le_bytes());
    }

    pub fn read_f32(&mut self) -> Result<f32, PondError> {
        let bytes = self.take::<4>()?;
        Ok(f32::from_le_bytes(bytes))
    }

    fn take<const N: usize>(&mut self) -> Result<[u8; N], PondError> {
        let remaining = self.remaining();
        if remaining < N {
            return Err(PondError::UnexpectedEnd {
                needed: N,
                remaining,
            });
        }

        let mut out = [0u8; N];
        out.copy_from_slice(&self.bytes[self.cursor..self.cursor + N]);
        self.cursor += N;
        Ok(out)
    }
}
