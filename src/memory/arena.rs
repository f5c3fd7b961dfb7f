//! The simulated byte buffer that blocks describe

use super::errors::MemoryError;
use std::ops::Range;

/// A fixed-length run of bytes. The length is set once and never changes.
#[derive(Debug, Clone)]
pub struct Arena {
    bytes: Vec<u8>,
}

impl Arena {
    pub fn new(size: usize) -> Result<Self, MemoryError> {
        if size == 0 {
            return Err(MemoryError::invalid(
                "Arena size must be a positive number of bytes",
            ));
        }
        Ok(Arena {
            bytes: vec![0; size],
        })
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Always false; an arena holds at least one byte
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Zero a span and store `value` in its last byte
    pub fn store_in_span(&mut self, span: Range<usize>, value: u8) -> Result<(), MemoryError> {
        if span.is_empty() || span.end > self.bytes.len() {
            return Err(MemoryError::invalid(format!(
                "Span {}..{} is outside the arena of {} bytes",
                span.start,
                span.end,
                self.bytes.len()
            )));
        }
        let last = span.end - 1;
        self.bytes[span].fill(0);
        self.bytes[last] = value;
        Ok(())
    }
}
