//! Named pointers
//!
//! A [`Pointer`] is just an arena offset. It holds no reference to the block
//! it points into, so blocks can be split, merged and shifted freely; the
//! owning block is looked up again through the block table on every use.

use super::errors::MemoryError;
use crate::map::{ChainedMap, InsertOutcome, Overwrite};
use rustc_hash::FxHashMap;

/// Handle to an arena offset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pointer {
    pub start_index: usize,
    bound: bool,
}

impl Pointer {
    /// The placeholder created by `new_pointer`: offset 0, not yet bound to
    /// any allocation, never resolves to a block
    pub fn unbound() -> Self {
        Pointer {
            start_index: 0,
            bound: false,
        }
    }

    pub fn at(start_index: usize) -> Self {
        Pointer {
            start_index,
            bound: true,
        }
    }

    pub fn is_bound(&self) -> bool {
        self.bound
    }
}

/// Maps user-chosen names to pointers
pub struct PointerRegistry {
    pointers: ChainedMap<Pointer>,
}

impl PointerRegistry {
    pub fn new(bucket_count: usize) -> Result<Self, MemoryError> {
        Ok(PointerRegistry {
            pointers: ChainedMap::new(bucket_count)?,
        })
    }

    /// Create an unbound pointer called `name`
    pub fn declare(&mut self, name: &str, overwrite: Overwrite<'_>) -> InsertOutcome {
        self.pointers.insert(name, Pointer::unbound(), overwrite)
    }

    pub fn get(&self, name: &str) -> Option<Pointer> {
        self.pointers.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.pointers.contains_key(name)
    }

    /// Point an already declared name at `pointer`
    pub fn bind(&mut self, name: &str, pointer: Pointer) -> Result<(), MemoryError> {
        let slot = self
            .pointers
            .get_mut(name)
            .ok_or_else(|| undeclared(name))?;
        *slot = pointer;
        Ok(())
    }

    /// Forget `name`
    pub fn release(&mut self, name: &str) -> Result<Pointer, MemoryError> {
        self.pointers
            .remove(name, true)?
            .ok_or_else(|| undeclared(name))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Pointer)> {
        self.pointers.iter().map(|(name, ptr)| (name, *ptr))
    }

    /// Names grouped by the offset they are bound to, sorted by name
    pub fn names_by_offset(&self) -> FxHashMap<usize, Vec<&str>> {
        let mut by_offset: FxHashMap<usize, Vec<&str>> = FxHashMap::default();
        for (name, ptr) in self.iter().filter(|(_, ptr)| ptr.is_bound()) {
            by_offset.entry(ptr.start_index).or_default().push(name);
        }
        for names in by_offset.values_mut() {
            names.sort_unstable();
        }
        by_offset
    }

    pub fn len(&self) -> usize {
        self.pointers.len()
    }

    pub fn bucket_count(&self) -> usize {
        self.pointers.bucket_count()
    }

    /// Entries in the fullest bucket
    pub fn longest_chain(&self) -> usize {
        self.pointers.longest_chain()
    }

    pub fn is_empty(&self) -> bool {
        self.pointers.is_empty()
    }
}

pub(crate) fn undeclared(name: &str) -> MemoryError {
    MemoryError::not_found(format!(
        "pointer {}. Please create a pointer with the command new_pointer",
        name
    ))
}
