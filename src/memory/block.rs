//! Block metadata table
//!
//! The arena is described by an ordered list of [`Block`] records. The list is
//! doubly linked (`prev` / `next`) but the records are stored contiguously in
//! a vector indexed by list position, so a link is just the position of the
//! neighbouring record.
//!
//! Inserting or removing a record moves every record after it by one slot.
//! [`BlockTable::shift_right`] and [`BlockTable::shift_left`] adjust the links
//! of the moved records by the same offset *before* the physical move, then
//! re-point the two boundary neighbours at their new positions.
//!
//! # Invariants
//!
//! After every public operation except a bare shift:
//! - blocks partition the arena: contiguous, non-overlapping, sizes sum to the
//!   arena length, every size is non-zero
//! - vector order is ascending `start_index`
//! - `blocks[i].prev == i - 1` and `blocks[i].next == i + 1` (none at the ends)
//! - the table never holds more blocks than the arena has bytes
//!
//! [`BlockTable::check_invariants`] verifies all of the above.

use super::errors::MemoryError;
use log::debug;

/// Allocation state of a block. A free block is always uninitialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockState {
    Free,
    AllocatedUninitialized,
    AllocatedUsed,
}

/// Metadata for one contiguous span of the arena
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub size: usize,
    pub start_index: usize,
    pub state: BlockState,
    pub prev: Option<usize>,
    pub next: Option<usize>,
}

impl Block {
    pub fn is_free(&self) -> bool {
        self.state == BlockState::Free
    }

    pub fn is_initialized(&self) -> bool {
        self.state == BlockState::AllocatedUsed
    }

    /// One past the last arena byte covered by this block
    pub fn end(&self) -> usize {
        self.start_index + self.size
    }
}

/// Array-backed doubly-linked list of blocks in arena order
#[derive(Debug, Clone)]
pub struct BlockTable {
    blocks: Vec<Block>,
    capacity: usize,
}

impl BlockTable {
    /// A table holding one free block that spans the whole arena.
    /// Capacity is one block per arena byte.
    pub fn new(arena_len: usize) -> Self {
        BlockTable {
            blocks: vec![Block {
                size: arena_len,
                start_index: 0,
                state: BlockState::Free,
                prev: None,
                next: None,
            }],
            capacity: arena_len,
        }
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn get(&self, index: usize) -> Option<&Block> {
        self.blocks.get(index)
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Size of the largest free block, 0 if none
    pub fn largest_free(&self) -> usize {
        self.blocks
            .iter()
            .filter(|b| b.is_free())
            .map(|b| b.size)
            .max()
            .unwrap_or(0)
    }

    pub fn free_bytes(&self) -> usize {
        self.blocks
            .iter()
            .filter(|b| b.is_free())
            .map(|b| b.size)
            .sum()
    }

    pub fn set_state(&mut self, index: usize, state: BlockState) -> Result<(), MemoryError> {
        let len = self.blocks.len();
        let block = self
            .blocks
            .get_mut(index)
            .ok_or_else(|| out_of_bounds(index, len))?;
        block.state = state;
        Ok(())
    }

    /// Find the allocated block that owns arena byte `offset`.
    ///
    /// Walks the table summing sizes until the running end passes `offset`.
    /// A free block at that offset means nothing is allocated there, so it is
    /// reported as `None` just like an offset past the arena.
    pub fn find_block(&self, offset: usize) -> Option<(usize, &Block)> {
        let mut end = 0;
        for (index, block) in self.blocks.iter().enumerate() {
            end += block.size;
            if offset < end {
                if block.is_free() {
                    return None;
                }
                return Some((index, block));
            }
        }
        None
    }

    /// Split the block at `index` into an allocated head of `size` bytes and
    /// a free remainder placed right after it. Both halves start uninitialized.
    pub fn split(&mut self, index: usize, size: usize) -> Result<(), MemoryError> {
        let block = self
            .blocks
            .get(index)
            .ok_or_else(|| out_of_bounds(index, self.blocks.len()))?;
        if self.blocks.len() >= self.capacity {
            return Err(MemoryError::StructuralLimit {
                blocks: self.blocks.len(),
                capacity: self.capacity,
            });
        }
        if size == 0 || size >= block.size {
            return Err(MemoryError::invalid(format!(
                "Cannot split block {} of {} bytes at size {}",
                index, block.size, size
            )));
        }
        let remainder = block.size - size;
        let start = block.start_index;

        self.shift_right(index + 1)?;

        let head = &mut self.blocks[index];
        head.size = size;
        head.state = BlockState::AllocatedUninitialized;

        let tail = &mut self.blocks[index + 1];
        tail.size = remainder;
        tail.start_index = start + size;
        tail.state = BlockState::Free;

        debug!(
            "split block {} into {}@{} and free {}@{}",
            index,
            size,
            start,
            remainder,
            start + size
        );
        Ok(())
    }

    /// Fold the block at `index + 1` into the block at `index`.
    ///
    /// The merged block is marked free whatever the successor held; callers
    /// must check the successor is free first or its contents are lost.
    pub fn merge_right(&mut self, index: usize) -> Result<(), MemoryError> {
        let len = self.blocks.len();
        if index + 1 >= len {
            return Err(MemoryError::invalid(format!(
                "Block {} has no successor to merge with ({} blocks)",
                index, len
            )));
        }

        let absorbed = self.blocks[index + 1].size;
        let after = self.blocks[index + 1].next;

        let block = &mut self.blocks[index];
        block.size += absorbed;
        block.state = BlockState::Free;
        block.next = after;
        if let Some(after) = after {
            self.blocks[after].prev = Some(index);
        }

        self.shift_left(index + 1)?;

        debug!(
            "merged {} bytes into block {}, now {} bytes",
            absorbed, index, self.blocks[index].size
        );
        Ok(())
    }

    /// Remove the slot at `index`, moving every later block one slot left
    pub fn shift_left(&mut self, index: usize) -> Result<(), MemoryError> {
        let len = self.blocks.len();
        if index >= len {
            return Err(out_of_bounds(index, len));
        }

        // Links are positions, so fix them up before anything moves
        let moved = |link: Option<usize>| {
            link.and_then(|pos| if pos >= index { pos.checked_sub(1) } else { Some(pos) })
        };
        for block in &mut self.blocks[index + 1..] {
            block.prev = moved(block.prev);
            block.next = moved(block.next);
        }

        self.blocks.remove(index);

        let len = self.blocks.len();
        if index > 0 {
            self.blocks[index - 1].next = (index < len).then_some(index);
        }
        if index < len {
            self.blocks[index].prev = index.checked_sub(1);
        }

        debug!("shifted blocks left from slot {}, {} blocks", index, len);
        Ok(())
    }

    /// Open an empty slot at `index`, moving every later block one slot right.
    ///
    /// The new slot is a zero-sized placeholder that the caller must fill.
    /// Fails when the table is already at capacity.
    pub fn shift_right(&mut self, index: usize) -> Result<(), MemoryError> {
        let len = self.blocks.len();
        if index > len {
            return Err(out_of_bounds(index, len));
        }
        if len >= self.capacity {
            return Err(MemoryError::StructuralLimit {
                blocks: len,
                capacity: self.capacity,
            });
        }

        let moved = |link: Option<usize>| link.map(|pos| if pos >= index { pos + 1 } else { pos });
        for block in &mut self.blocks[index..] {
            block.prev = moved(block.prev);
            block.next = moved(block.next);
        }

        let start_index = match index.checked_sub(1) {
            Some(before) => self.blocks[before].end(),
            None => 0,
        };
        self.blocks.insert(
            index,
            Block {
                size: 0,
                start_index,
                state: BlockState::Free,
                prev: index.checked_sub(1),
                next: None,
            },
        );

        let len = self.blocks.len();
        if index + 1 < len {
            self.blocks[index].next = Some(index + 1);
            self.blocks[index + 1].prev = Some(index);
        }
        if index > 0 {
            self.blocks[index - 1].next = Some(index);
        }

        debug!("shifted blocks right from slot {}, {} blocks", index, len);
        Ok(())
    }

    /// Verify the partition, ordering, link and capacity invariants
    pub fn check_invariants(&self, arena_len: usize) -> Result<(), String> {
        if self.blocks.is_empty() {
            return Err("block table is empty".to_string());
        }
        if self.blocks.len() > self.capacity {
            return Err(format!(
                "{} blocks exceed capacity {}",
                self.blocks.len(),
                self.capacity
            ));
        }

        let last = self.blocks.len() - 1;
        let mut expected_start = 0;
        for (i, block) in self.blocks.iter().enumerate() {
            if block.size == 0 {
                return Err(format!("block {} has zero size", i));
            }
            if block.start_index != expected_start {
                return Err(format!(
                    "block {} starts at {}, expected {}",
                    i, block.start_index, expected_start
                ));
            }
            let prev = i.checked_sub(1);
            let next = (i < last).then_some(i + 1);
            if block.prev != prev || block.next != next {
                return Err(format!(
                    "block {} links are {:?}/{:?}, expected {:?}/{:?}",
                    i, block.prev, block.next, prev, next
                ));
            }
            expected_start = block.end();
        }

        if expected_start != arena_len {
            return Err(format!(
                "blocks cover {} bytes, arena has {}",
                expected_start, arena_len
            ));
        }
        Ok(())
    }
}

fn out_of_bounds(index: usize, len: usize) -> MemoryError {
    MemoryError::invalid(format!(
        "Block index {} is out of bounds ({} blocks)",
        index, len
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table_with_splits(arena_len: usize, sizes: &[usize]) -> BlockTable {
        let mut table = BlockTable::new(arena_len);
        for (i, &size) in sizes.iter().enumerate() {
            table.split(i, size).unwrap();
        }
        table
    }

    fn layout(table: &BlockTable) -> Vec<(usize, usize, BlockState)> {
        table
            .blocks()
            .iter()
            .map(|b| (b.start_index, b.size, b.state))
            .collect()
    }

    #[test]
    fn test_new_table() {
        let table = BlockTable::new(10);
        assert_eq!(table.len(), 1);
        assert_eq!(table.capacity(), 10);
        assert_eq!(layout(&table), vec![(0, 10, BlockState::Free)]);
        table.check_invariants(10).unwrap();
    }

    #[test]
    fn test_split() {
        let mut table = BlockTable::new(10);
        table.split(0, 4).unwrap();

        assert_eq!(
            layout(&table),
            vec![
                (0, 4, BlockState::AllocatedUninitialized),
                (4, 6, BlockState::Free),
            ]
        );
        table.check_invariants(10).unwrap();
    }

    #[test]
    fn test_split_middle_block_relinks_neighbours() {
        let mut table = table_with_splits(10, &[2, 3]);
        // [2 used][3 used][5 free] -> free the middle and split it again
        table.set_state(1, BlockState::Free).unwrap();
        table.split(1, 1).unwrap();

        assert_eq!(
            layout(&table),
            vec![
                (0, 2, BlockState::AllocatedUninitialized),
                (2, 1, BlockState::AllocatedUninitialized),
                (3, 2, BlockState::Free),
                (5, 5, BlockState::Free),
            ]
        );
        table.check_invariants(10).unwrap();
    }

    #[test]
    fn test_split_rejects_bad_sizes() {
        let mut table = BlockTable::new(4);
        assert!(table.split(0, 0).is_err());
        assert!(table.split(0, 4).is_err());
        assert!(table.split(0, 5).is_err());
        assert!(table.split(3, 1).is_err());
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_find_block() {
        let mut table = table_with_splits(10, &[4, 3]);
        // [0..4 used][4..7 used][7..10 free]
        assert_eq!(table.find_block(0).map(|(i, _)| i), Some(0));
        assert_eq!(table.find_block(3).map(|(i, _)| i), Some(0));
        assert_eq!(table.find_block(4).map(|(i, _)| i), Some(1));
        assert_eq!(table.find_block(6).map(|(i, _)| i), Some(1));
        assert!(table.find_block(7).is_none(), "free space has no owner");
        assert!(table.find_block(10).is_none());

        table.set_state(0, BlockState::Free).unwrap();
        assert!(table.find_block(0).is_none());
    }

    #[test]
    fn test_merge_right() {
        let mut table = table_with_splits(10, &[4, 3]);
        table.set_state(1, BlockState::Free).unwrap();
        table.merge_right(1).unwrap();

        assert_eq!(
            layout(&table),
            vec![
                (0, 4, BlockState::AllocatedUninitialized),
                (4, 6, BlockState::Free),
            ]
        );
        table.check_invariants(10).unwrap();
    }

    #[test]
    fn test_merge_right_in_the_middle() {
        let mut table = table_with_splits(10, &[1, 1, 1]);
        // [1][1][1][7 free]: merge slot 0 with slot 1
        table.merge_right(0).unwrap();

        assert_eq!(
            layout(&table),
            vec![
                (0, 2, BlockState::Free),
                (2, 1, BlockState::AllocatedUninitialized),
                (3, 7, BlockState::Free),
            ]
        );
        table.check_invariants(10).unwrap();
    }

    #[test]
    fn test_merge_right_without_successor() {
        let mut table = BlockTable::new(5);
        assert!(matches!(
            table.merge_right(0),
            Err(MemoryError::InvalidArgument { .. })
        ));
    }

    #[test]
    fn test_shift_right_at_capacity() {
        // Three one-byte blocks fill a three-byte arena
        let mut table = table_with_splits(3, &[1, 1]);
        assert_eq!(table.len(), 3);
        assert!(matches!(
            table.shift_right(1),
            Err(MemoryError::StructuralLimit {
                blocks: 3,
                capacity: 3
            })
        ));
        table.check_invariants(3).unwrap();
    }

    #[test]
    fn test_split_on_full_table() {
        let mut table = table_with_splits(3, &[1, 1]);
        table.set_state(1, BlockState::Free).unwrap();
        let before = layout(&table);

        assert!(matches!(
            table.split(1, 1),
            Err(MemoryError::StructuralLimit {
                blocks: 3,
                capacity: 3
            })
        ));
        assert_eq!(layout(&table), before);
        table.check_invariants(3).unwrap();
    }

    #[test]
    fn test_shift_out_of_bounds() {
        let mut table = BlockTable::new(4);
        assert!(table.shift_left(1).is_err());
        assert!(table.shift_right(2).is_err());
        table.check_invariants(4).unwrap();
    }

    #[test]
    fn test_shift_pair_restores_links() {
        let mut table = table_with_splits(10, &[2, 2]);
        let before = table.blocks().to_vec();

        table.shift_right(1).unwrap();
        assert_eq!(table.len(), 4);
        for (i, block) in table.blocks().iter().enumerate() {
            assert_eq!(block.prev, i.checked_sub(1));
            assert_eq!(block.next, (i + 1 < 4).then_some(i + 1));
        }

        table.shift_left(1).unwrap();
        assert_eq!(table.blocks(), before.as_slice());
        table.check_invariants(10).unwrap();
    }

    #[test]
    fn test_shift_left_last_slot() {
        let mut table = table_with_splits(10, &[2]);
        table.shift_right(2).unwrap();
        assert_eq!(table.blocks()[1].next, Some(2));
        table.shift_left(2).unwrap();
        assert_eq!(table.blocks()[1].next, None);
        table.check_invariants(10).unwrap();
    }
}
