//! Simulated memory for the allocator
//!
//! This module provides the allocator engine:
//! - [`arena`]: the fixed-size byte buffer
//! - [`block`]: the block metadata table with split / merge / shift mechanics
//! - [`allocator`]: best-fit allocation, free with coalescing, value writes
//! - [`pointer`]: named pointers and their registry
//! - [`errors`]: the [`MemoryError`] type shared by all of the above
//!
//! [`Memory`] owns one of each and is passed by reference to every operation;
//! nothing here lives in global state.
//!
//! # Byte Rendering
//!
//! ```text
//! __ __ __ __  ** ** **  00 00 C8  __
//! free         allocated  used     free
//!              (never written)
//! ```

pub mod allocator;
pub mod arena;
pub mod block;
pub mod errors;
pub mod pointer;

use crate::map::{InsertOutcome, Overwrite};
use arena::Arena;
use block::{BlockState, BlockTable};
use errors::MemoryError;
use log::{info, warn};
use pointer::{undeclared, Pointer, PointerRegistry};

/// Read-only view of one block, as listed by `visualize_blocks`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockInfo {
    pub index: usize,
    pub size: usize,
    pub start_index: usize,
    pub free: bool,
    pub initialized: bool,
}

/// How a single arena byte is displayed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteView {
    Free,
    Uninitialized,
    Value(u8),
}

/// Summary numbers for the status bar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemoryStats {
    pub size: usize,
    pub blocks: usize,
    pub capacity: usize,
    pub used_bytes: usize,
    pub free_bytes: usize,
    pub largest_free: usize,
    pub pointers: usize,
    pub pointer_buckets: usize,
    /// Worst-case lookup cost in the pointer registry
    pub longest_chain: usize,
}

/// The arena, its block table and the named pointers into it
pub struct Memory {
    arena: Arena,
    table: BlockTable,
    pointers: PointerRegistry,
}

impl Memory {
    /// Create `size` bytes of memory described by a single free block
    pub fn new(size: usize, pointer_buckets: usize) -> Result<Self, MemoryError> {
        let arena = Arena::new(size)?;
        Ok(Memory {
            table: BlockTable::new(arena.len()),
            arena,
            pointers: PointerRegistry::new(pointer_buckets)?,
        })
    }

    pub fn size(&self) -> usize {
        self.arena.len()
    }

    pub fn arena(&self) -> &Arena {
        &self.arena
    }

    pub fn table(&self) -> &BlockTable {
        &self.table
    }

    pub fn pointers(&self) -> &PointerRegistry {
        &self.pointers
    }

    /// Declare an unbound pointer called `name`
    pub fn declare_pointer(
        &mut self,
        name: &str,
        overwrite: Overwrite<'_>,
    ) -> Result<InsertOutcome, MemoryError> {
        if name.is_empty() || name.chars().any(char::is_whitespace) {
            return Err(MemoryError::invalid(format!(
                "Pointer name '{}' must be a single non-empty word",
                name
            )));
        }
        let outcome = self.pointers.declare(name, overwrite);
        match outcome {
            InsertOutcome::Inserted => info!("declared pointer {}", name),
            InsertOutcome::Replaced => info!("redeclared pointer {}", name),
            InsertOutcome::Kept => info!("kept previous pointer {}", name),
        }
        Ok(outcome)
    }

    /// Allocate `size` bytes and bind the declared pointer `name` to them
    pub fn allocate(&mut self, size: usize, name: &str) -> Result<Pointer, MemoryError> {
        let previous = self.pointers.get(name).ok_or_else(|| undeclared(name))?;

        let ptr = self.allocate_bytes(size)?;
        if self.resolve(previous).is_ok() {
            warn!(
                "pointer {} moved off its block at {}, that block is now unreachable",
                name, previous.start_index
            );
        }
        self.pointers.bind(name, ptr)?;
        Ok(ptr)
    }

    /// Free the block `name` points at and forget the name
    pub fn free(&mut self, name: &str) -> Result<Pointer, MemoryError> {
        let ptr = self.pointers.get(name).ok_or_else(|| undeclared(name))?;
        self.free_pointer(ptr)?;
        self.pointers.release(name)
    }

    /// Store `value` in the block `name` points at
    pub fn write_value(&mut self, value: u8, name: &str) -> Result<Pointer, MemoryError> {
        let ptr = self.pointers.get(name).ok_or_else(|| undeclared(name))?;
        self.write_pointer(ptr, value)?;
        Ok(ptr)
    }

    /// Block metadata in arena order
    pub fn list_blocks(&self) -> Vec<BlockInfo> {
        self.table
            .blocks()
            .iter()
            .enumerate()
            .map(|(index, block)| BlockInfo {
                index,
                size: block.size,
                start_index: block.start_index,
                free: block.is_free(),
                initialized: block.is_initialized(),
            })
            .collect()
    }

    /// One entry per arena byte, tagged by the state of its block
    pub fn list_bytes(&self) -> Vec<ByteView> {
        let bytes = self.arena.bytes();
        let mut views = Vec::with_capacity(bytes.len());
        for block in self.table.blocks() {
            let span = &bytes[block.start_index..block.end()];
            match block.state {
                BlockState::Free => views.extend(span.iter().map(|_| ByteView::Free)),
                BlockState::AllocatedUninitialized => {
                    views.extend(span.iter().map(|_| ByteView::Uninitialized))
                }
                BlockState::AllocatedUsed => views.extend(span.iter().map(|&b| ByteView::Value(b))),
            }
        }
        views
    }

    pub fn stats(&self) -> MemoryStats {
        let free_bytes = self.table.free_bytes();
        MemoryStats {
            size: self.arena.len(),
            blocks: self.table.len(),
            capacity: self.table.capacity(),
            used_bytes: self.arena.len() - free_bytes,
            free_bytes,
            largest_free: self.table.largest_free(),
            pointers: self.pointers.len(),
            pointer_buckets: self.pointers.bucket_count(),
            longest_chain: self.pointers.longest_chain(),
        }
    }

    pub fn check_invariants(&self) -> Result<(), String> {
        self.table.check_invariants(self.arena.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_memory() {
        let memory = Memory::new(16, 10).unwrap();
        assert_eq!(memory.size(), 16);
        assert_eq!(
            memory.list_blocks(),
            vec![BlockInfo {
                index: 0,
                size: 16,
                start_index: 0,
                free: true,
                initialized: false,
            }]
        );
        assert!(memory.list_bytes().iter().all(|b| *b == ByteView::Free));
        assert!(Memory::new(0, 10).is_err());
    }

    #[test]
    fn test_declare_rejects_bad_names() {
        let mut memory = Memory::new(4, 10).unwrap();
        assert!(memory.declare_pointer("", Overwrite::Never).is_err());
        assert!(memory.declare_pointer("two words", Overwrite::Never).is_err());
        assert!(memory.pointers().is_empty());
    }

    #[test]
    fn test_list_bytes_tags() {
        let mut memory = Memory::new(6, 10).unwrap();
        memory.declare_pointer("a", Overwrite::Never).unwrap();
        memory.declare_pointer("b", Overwrite::Never).unwrap();
        memory.allocate(2, "a").unwrap();
        memory.allocate(3, "b").unwrap();
        memory.write_value(0xC8, "b").unwrap();

        assert_eq!(
            memory.list_bytes(),
            vec![
                ByteView::Uninitialized,
                ByteView::Uninitialized,
                ByteView::Value(0),
                ByteView::Value(0),
                ByteView::Value(0xC8),
                ByteView::Free,
            ]
        );
    }

    #[test]
    fn test_stats() {
        let mut memory = Memory::new(10, 10).unwrap();
        memory.declare_pointer("a", Overwrite::Never).unwrap();
        memory.allocate(4, "a").unwrap();

        let stats = memory.stats();
        assert_eq!(stats.blocks, 2);
        assert_eq!(stats.used_bytes, 4);
        assert_eq!(stats.free_bytes, 6);
        assert_eq!(stats.largest_free, 6);
        assert_eq!(stats.pointers, 1);
        assert_eq!(stats.pointer_buckets, 10);
        assert_eq!(stats.longest_chain, 1);
    }

    #[test]
    fn test_reallocating_a_bound_pointer_leaks() {
        let mut memory = Memory::new(10, 10).unwrap();
        memory.declare_pointer("p", Overwrite::Never).unwrap();
        memory.allocate(2, "p").unwrap();
        let ptr = memory.allocate(3, "p").unwrap();

        assert_eq!(ptr.start_index, 2);
        // The first block stays allocated with nothing pointing at it
        let blocks = memory.list_blocks();
        assert_eq!(blocks.len(), 3);
        assert!(!blocks[0].free);
        assert!(!blocks[1].free);
    }
}
