//! Error types for the allocator engine
//!
//! This module defines [`MemoryError`], the single error type returned by every
//! arena, block table, registry and command operation.
//!
//! No memory error is fatal. Each one is reported back to the front-end, which
//! decides how to render it, and the simulation keeps running.

use std::fmt;

/// Errors that can occur while operating on the simulated memory
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemoryError {
    /// A pointer, command or key is absent (or a pointer does not own a block)
    NotFound { what: String },

    /// A size, value, index or numeric argument is outside its domain
    InvalidArgument { message: String },

    /// No free block is large enough for the request
    OutOfMemory { requested: usize, largest_free: usize },

    /// The block table would exceed its capacity (one block per arena byte)
    StructuralLimit { blocks: usize, capacity: usize },

    /// Generic failure when no more specific reason is known
    AllocationFailed { message: String },
}

impl MemoryError {
    pub fn not_found(what: impl Into<String>) -> Self {
        MemoryError::NotFound { what: what.into() }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        MemoryError::InvalidArgument {
            message: message.into(),
        }
    }

    /// Short category label used by the status bar and batch output
    pub fn kind(&self) -> &'static str {
        match self {
            MemoryError::NotFound { .. } => "not found",
            MemoryError::InvalidArgument { .. } => "invalid argument",
            MemoryError::OutOfMemory { .. } => "out of memory",
            MemoryError::StructuralLimit { .. } => "structural limit",
            MemoryError::AllocationFailed { .. } => "allocation failed",
        }
    }
}

impl fmt::Display for MemoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MemoryError::NotFound { what } => write!(f, "Could not locate {}", what),
            MemoryError::InvalidArgument { message } => write!(f, "{}", message),
            MemoryError::OutOfMemory {
                requested,
                largest_free,
            } => {
                write!(
                    f,
                    "Out of memory: requested {} byte{}, largest free block is {}",
                    requested,
                    if *requested == 1 { "" } else { "s" },
                    largest_free
                )
            }
            MemoryError::StructuralLimit { blocks, capacity } => {
                write!(
                    f,
                    "Block table is full: {} blocks, capacity is {}",
                    blocks, capacity
                )
            }
            MemoryError::AllocationFailed { message } => {
                write!(f, "Allocation failed: {}", message)
            }
        }
    }
}

impl std::error::Error for MemoryError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_out_of_memory_message() {
        let err = MemoryError::OutOfMemory {
            requested: 1,
            largest_free: 0,
        };
        assert_eq!(
            err.to_string(),
            "Out of memory: requested 1 byte, largest free block is 0"
        );
        assert_eq!(err.kind(), "out of memory");
    }

    #[test]
    fn test_not_found_message() {
        let err = MemoryError::not_found("pointer 'p'");
        assert_eq!(err.to_string(), "Could not locate pointer 'p'");
    }
}
