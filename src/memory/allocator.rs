//! Best-fit allocation over the block table
//!
//! - `allocate_bytes(size)`: an exact-size free block wins immediately and is
//!   reused without splitting; otherwise the smallest free block larger than
//!   `size` is split (ties go to the first one in arena order)
//! - `free_pointer(ptr)`: marks the owning block free, then merges it with a
//!   free successor and a free predecessor
//! - `write_pointer(ptr, value)`: zeroes the block and stores `value` in its
//!   last byte
//!
//! All methods are implemented on [`Memory`] and work on raw [`Pointer`]s;
//! the named variants in the parent module look the pointer up first.

use super::block::{Block, BlockState, BlockTable};
use super::errors::MemoryError;
use super::pointer::Pointer;
use super::Memory;
use log::{debug, info};

impl Memory {
    /// Index of the free block best suited to hold `size` bytes
    pub fn best_fit(&self, size: usize) -> Option<usize> {
        let mut best: Option<(usize, usize)> = None;
        for (index, block) in self.table.blocks().iter().enumerate() {
            if !block.is_free() {
                continue;
            }
            if block.size == size {
                return Some(index);
            }
            if block.size > size && best.map_or(true, |(_, best_size)| block.size < best_size) {
                best = Some((index, block.size));
            }
        }
        best.map(|(index, _)| index)
    }

    /// Allocate `size` bytes and return a pointer to the start of the block
    pub fn allocate_bytes(&mut self, size: usize) -> Result<Pointer, MemoryError> {
        if size == 0 {
            return Err(MemoryError::invalid(
                "Allocation size must be a positive number of bytes",
            ));
        }

        let index = self.best_fit(size).ok_or_else(|| MemoryError::OutOfMemory {
            requested: size,
            largest_free: self.table.largest_free(),
        })?;
        let block = self
            .table
            .get(index)
            .ok_or_else(|| MemoryError::AllocationFailed {
                message: format!("best fit chose missing block {}", index),
            })?;
        let (start, block_size) = (block.start_index, block.size);

        if block_size == size {
            self.table
                .set_state(index, BlockState::AllocatedUninitialized)?;
        } else {
            self.table.split(index, size)?;
        }

        info!(
            "allocated {} bytes at {} (block {}, best fit of {})",
            size, start, index, block_size
        );
        Ok(Pointer::at(start))
    }

    /// Find the allocated block `ptr` points into
    pub fn resolve(&self, ptr: Pointer) -> Result<(usize, &Block), MemoryError> {
        if !ptr.is_bound() {
            return Err(MemoryError::not_found(
                "an allocation for an unbound pointer. Allocate it with malloc first",
            ));
        }
        self.table.find_block(ptr.start_index).ok_or_else(|| {
            MemoryError::not_found(format!(
                "allocated block at index {} (in the byte array)",
                ptr.start_index
            ))
        })
    }

    /// Free the block `ptr` points into and coalesce it with free neighbours.
    ///
    /// At most one new free block appears per call, so a single merge on each
    /// side is enough to keep adjacent free blocks from piling up.
    pub fn free_pointer(&mut self, ptr: Pointer) -> Result<(), MemoryError> {
        let (index, block) = self.resolve(ptr)?;
        let (prev, next, size) = (block.prev, block.next, block.size);

        self.table.set_state(index, BlockState::Free)?;
        info!("freed {} bytes at {}", size, ptr.start_index);

        let is_free = |table: &BlockTable, at: Option<usize>| {
            at.and_then(|i| table.get(i)).is_some_and(Block::is_free)
        };

        if is_free(&self.table, next) {
            debug!("coalescing block {} with its successor", index);
            self.table.merge_right(index)?;
        }
        if let Some(prev) = prev.filter(|&p| is_free(&self.table, Some(p))) {
            debug!("coalescing block {} with its predecessor", index);
            self.table.merge_right(prev)?;
        }
        Ok(())
    }

    /// Zero the block `ptr` points into and store `value` in its last byte
    pub fn write_pointer(&mut self, ptr: Pointer, value: u8) -> Result<(), MemoryError> {
        let (index, block) = self.resolve(ptr)?;
        let span = block.start_index..block.end();

        self.arena.store_in_span(span, value)?;
        self.table.set_state(index, BlockState::AllocatedUsed)?;
        debug!("wrote {} to block {}", value, index);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout(memory: &Memory) -> Vec<(usize, usize, bool)> {
        memory
            .list_blocks()
            .iter()
            .map(|b| (b.start_index, b.size, b.free))
            .collect()
    }

    #[test]
    fn test_allocate_whole_arena() {
        let mut memory = Memory::new(10, 10).unwrap();
        let ptr = memory.allocate_bytes(10).unwrap();

        assert_eq!(ptr.start_index, 0);
        assert_eq!(layout(&memory), vec![(0, 10, false)]);
    }

    #[test]
    fn test_allocate_zero_and_oversize() {
        let mut memory = Memory::new(10, 10).unwrap();
        assert!(matches!(
            memory.allocate_bytes(0),
            Err(MemoryError::InvalidArgument { .. })
        ));
        assert_eq!(
            memory.allocate_bytes(11),
            Err(MemoryError::OutOfMemory {
                requested: 11,
                largest_free: 10
            })
        );
        assert_eq!(layout(&memory), vec![(0, 10, true)]);
    }

    #[test]
    fn test_best_fit_prefers_smallest_larger_block() {
        let mut memory = Memory::new(20, 10).unwrap();
        // Carve [5][1][3][1][10]: free the 5 and the 3 to leave two holes
        let a = memory.allocate_bytes(5).unwrap();
        memory.allocate_bytes(1).unwrap();
        let c = memory.allocate_bytes(3).unwrap();
        memory.allocate_bytes(1).unwrap();
        memory.free_pointer(a).unwrap();
        memory.free_pointer(c).unwrap();

        // 2 fits in the 3-byte hole, not the 5-byte hole or the tail
        let ptr = memory.allocate_bytes(2).unwrap();
        assert_eq!(ptr.start_index, 6);
    }

    #[test]
    fn test_exact_fit_wins_without_split() {
        let mut memory = Memory::new(20, 10).unwrap();
        let a = memory.allocate_bytes(4).unwrap();
        memory.allocate_bytes(1).unwrap();
        memory.free_pointer(a).unwrap();
        let blocks_before = memory.table().len();

        // The tail (15 bytes) comes after, but the exact 4-byte hole wins
        let ptr = memory.allocate_bytes(4).unwrap();
        assert_eq!(ptr.start_index, 0);
        assert_eq!(memory.table().len(), blocks_before);
    }

    #[test]
    fn test_best_fit_tie_goes_to_first() {
        let mut memory = Memory::new(12, 10).unwrap();
        let a = memory.allocate_bytes(3).unwrap();
        memory.allocate_bytes(1).unwrap();
        let c = memory.allocate_bytes(3).unwrap();
        memory.allocate_bytes(5).unwrap();
        memory.free_pointer(a).unwrap();
        memory.free_pointer(c).unwrap();

        assert_eq!(memory.best_fit(2), Some(0));
        assert_eq!(memory.best_fit(6), None);
    }

    #[test]
    fn test_free_merges_both_sides() {
        let mut memory = Memory::new(9, 10).unwrap();
        let a = memory.allocate_bytes(3).unwrap();
        let b = memory.allocate_bytes(3).unwrap();
        let c = memory.allocate_bytes(3).unwrap();
        memory.free_pointer(a).unwrap();
        memory.free_pointer(c).unwrap();
        assert_eq!(
            layout(&memory),
            vec![(0, 3, true), (3, 3, false), (6, 3, true)]
        );

        memory.free_pointer(b).unwrap();
        assert_eq!(layout(&memory), vec![(0, 9, true)]);
        memory.check_invariants().unwrap();
    }

    #[test]
    fn test_double_free() {
        let mut memory = Memory::new(8, 10).unwrap();
        let a = memory.allocate_bytes(4).unwrap();
        memory.free_pointer(a).unwrap();
        assert!(matches!(
            memory.free_pointer(a),
            Err(MemoryError::NotFound { .. })
        ));
        assert_eq!(layout(&memory), vec![(0, 8, true)]);
    }

    #[test]
    fn test_unbound_pointer_never_resolves() {
        let mut memory = Memory::new(8, 10).unwrap();
        memory.allocate_bytes(4).unwrap();
        // Offset 0 is allocated, but the placeholder must not reach it
        assert!(memory.resolve(Pointer::unbound()).is_err());
        assert!(memory.free_pointer(Pointer::unbound()).is_err());
        assert!(memory.write_pointer(Pointer::unbound(), 1).is_err());
        assert_eq!(memory.table().len(), 2);
    }

    #[test]
    fn test_write_pointer() {
        let mut memory = Memory::new(6, 10).unwrap();
        memory.allocate_bytes(2).unwrap();
        let b = memory.allocate_bytes(4).unwrap();
        memory.write_pointer(b, 200).unwrap();

        assert_eq!(&memory.arena().bytes()[2..6], &[0, 0, 0, 200]);
        assert!(memory.list_blocks()[1].initialized);
        assert!(!memory.list_blocks()[0].initialized);
    }

    #[test]
    fn test_freed_block_is_uninitialized_again() {
        let mut memory = Memory::new(4, 10).unwrap();
        let a = memory.allocate_bytes(4).unwrap();
        memory.write_pointer(a, 7).unwrap();
        memory.free_pointer(a).unwrap();
        let b = memory.allocate_bytes(4).unwrap();

        assert_eq!(b.start_index, 0);
        assert!(!memory.list_blocks()[0].initialized);
    }
}
