//! String-keyed map with separate chaining
//!
//! [`ChainedMap`] backs both the command table and the named-pointer registry.
//! It is generic over its value type, so each use site gets its own typed map
//! instead of sharing one store of untyped payloads.
//!
//! # Layout
//!
//! ```text
//! buckets[0] -> None
//! buckets[1] -> Node("free") -> Node("malloc") -> None
//! buckets[2] -> Node("p") -> None
//! ```
//!
//! Keys are hashed with DJB2 and reduced modulo the bucket count. New entries
//! are pushed at the head of their chain.
//!
//! # Scalability
//!
//! The bucket count is fixed at construction and the map never resizes, so a
//! lookup costs O(chain length). With many more keys than buckets lookups
//! degrade towards a linear scan.

use crate::memory::errors::MemoryError;

/// What to do when inserting a key that is already present
pub enum Overwrite<'a> {
    /// Replace the old entry silently
    Always,
    /// Keep the old entry; the insert becomes a no-op
    Never,
    /// Let the caller decide; the callback receives the key and returns
    /// `true` to replace
    Ask(&'a mut dyn FnMut(&str) -> bool),
}

/// Result of [`ChainedMap::insert`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    Inserted,
    Replaced,
    Kept,
}

struct Node<V> {
    key: String,
    value: V,
    next: Option<Box<Node<V>>>,
}

/// Fixed-bucket hash map with singly-linked chains
pub struct ChainedMap<V> {
    buckets: Vec<Option<Box<Node<V>>>>,
    len: usize,
}

/// DJB2 string hash reduced to a bucket index
pub fn bucket_index(key: &str, bucket_count: usize) -> usize {
    let hash = key
        .bytes()
        .fold(5381u64, |hash, c| hash.wrapping_mul(33).wrapping_add(c as u64));
    (hash % bucket_count as u64) as usize
}

impl<V> ChainedMap<V> {
    /// Create a map with `bucket_count` chains
    pub fn new(bucket_count: usize) -> Result<Self, MemoryError> {
        if bucket_count == 0 {
            return Err(MemoryError::invalid("Bucket count must be at least 1"));
        }
        let mut buckets = Vec::with_capacity(bucket_count);
        buckets.resize_with(bucket_count, || None);
        Ok(ChainedMap { buckets, len: 0 })
    }

    /// Insert `value` under `key`, consulting `policy` if the key exists
    pub fn insert(&mut self, key: &str, value: V, policy: Overwrite<'_>) -> InsertOutcome {
        let outcome = if self.contains_key(key) {
            let replace = match policy {
                Overwrite::Always => true,
                Overwrite::Never => false,
                Overwrite::Ask(confirm) => confirm(key),
            };
            if !replace {
                return InsertOutcome::Kept;
            }
            let index = self.bucket_of(key);
            if Self::unlink(&mut self.buckets[index], key).is_some() {
                self.len -= 1;
            }
            InsertOutcome::Replaced
        } else {
            InsertOutcome::Inserted
        };

        let index = self.bucket_of(key);
        let head = self.buckets[index].take();
        self.buckets[index] = Some(Box::new(Node {
            key: key.to_string(),
            value,
            next: head,
        }));
        self.len += 1;
        outcome
    }

    /// Look up the value stored under `key`
    pub fn get(&self, key: &str) -> Option<&V> {
        let mut current = self.buckets[self.bucket_of(key)].as_deref();
        while let Some(node) = current {
            if node.key == key {
                return Some(&node.value);
            }
            current = node.next.as_deref();
        }
        None
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut V> {
        let index = self.bucket_of(key);
        let mut current = self.buckets[index].as_deref_mut();
        while let Some(node) = current {
            let Node {
                key: node_key,
                value,
                next,
            } = node;
            if node_key.as_str() == key {
                return Some(value);
            }
            current = next.as_deref_mut();
        }
        None
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Remove `key` and return its value.
    ///
    /// A missing key is an error unless `silent` is set, in which case
    /// `Ok(None)` is returned.
    pub fn remove(&mut self, key: &str, silent: bool) -> Result<Option<V>, MemoryError> {
        let index = self.bucket_of(key);
        match Self::unlink(&mut self.buckets[index], key) {
            Some(node) => {
                self.len -= 1;
                Ok(Some(node.value))
            }
            None if silent => Ok(None),
            None => Err(MemoryError::not_found(format!("key '{}'", key))),
        }
    }

    /// Iterate over all entries, bucket by bucket, each chain head to tail
    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.buckets.iter().flat_map(|head| Chain {
            current: head.as_deref(),
        })
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Length of the longest chain, i.e. the worst-case lookup cost
    pub fn longest_chain(&self) -> usize {
        self.buckets
            .iter()
            .map(|head| {
                Chain {
                    current: head.as_deref(),
                }
                .count()
            })
            .max()
            .unwrap_or(0)
    }

    fn bucket_of(&self, key: &str) -> usize {
        bucket_index(key, self.buckets.len())
    }

    fn unlink(link: &mut Option<Box<Node<V>>>, key: &str) -> Option<Box<Node<V>>> {
        if link.as_ref()?.key == key {
            let mut removed = link.take()?;
            *link = removed.next.take();
            return Some(removed);
        }
        Self::unlink(&mut link.as_mut()?.next, key)
    }
}

struct Chain<'a, V> {
    current: Option<&'a Node<V>>,
}

impl<'a, V> Iterator for Chain<'a, V> {
    type Item = (&'a str, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.current?;
        self.current = node.next.as_deref();
        Some((node.key.as_str(), &node.value))
    }
}
