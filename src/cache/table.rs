//! Ordered Key Table Module
//!
//! Resident entries paired with their recency order.
//!
//! Entries live in a `Vec<Node>` arena linked into a doubly-linked list by
//! index, and a `HashMap` maps each key to its slot. Touch, insert, remove
//! and LRU eviction are all O(1); removed slots are recycled.

use std::collections::HashMap;

use crate::cache::CacheEntry;

/// Null link in the recency list.
const NIL: usize = usize::MAX;

#[derive(Debug)]
struct Node {
    key: String,
    /// `None` while the slot sits on the free list
    entry: Option<CacheEntry>,
    prev: usize,
    next: usize,
}

// == Ordered Table ==
/// Resident entries ordered from most recently used (head) to least
/// recently used (tail).
#[derive(Debug)]
pub struct OrderedTable {
    /// Key to arena slot
    index: HashMap<String, usize>,
    /// Node arena
    slots: Vec<Node>,
    /// Recycled slots
    free: Vec<usize>,
    /// Most recently used slot
    head: usize,
    /// Least recently used slot
    tail: usize,
}

impl Default for OrderedTable {
    fn default() -> Self {
        Self::new()
    }
}

impl OrderedTable {
    // == Constructor ==
    /// Creates a new empty table.
    pub fn new() -> Self {
        Self {
            index: HashMap::new(),
            slots: Vec::new(),
            free: Vec::new(),
            head: NIL,
            tail: NIL,
        }
    }

    // == Length ==
    /// Returns the number of resident entries.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    // == Peek ==
    /// Returns the entry for `key` without changing recency.
    pub fn get(&self, key: &str) -> Option<&CacheEntry> {
        self.index
            .get(key)
            .and_then(|&idx| self.slots[idx].entry.as_ref())
    }

    // == Touch ==
    /// Moves `key` to the MRU position. No-op if absent.
    ///
    /// Returns whether the key was resident.
    pub fn touch(&mut self, key: &str) -> bool {
        match self.index.get(key) {
            Some(&idx) => {
                self.move_to_head(idx);
                true
            }
            None => false,
        }
    }

    // == Insert ==
    /// Inserts or replaces `key` at the MRU position.
    ///
    /// Returns the previous entry when the key was already resident.
    pub fn insert(&mut self, key: String, entry: CacheEntry) -> Option<CacheEntry> {
        if let Some(&idx) = self.index.get(&key) {
            let previous = self.slots[idx].entry.replace(entry);
            self.move_to_head(idx);
            return previous;
        }

        let idx = self.alloc(key.clone(), entry);
        self.push_head(idx);
        self.index.insert(key, idx);
        None
    }

    // == Bounded Insert ==
    /// Inserts `key` while keeping at most `max_size` resident entries.
    ///
    /// A new key evicts from the LRU tail until there is room for it. An
    /// overwrite only evicts when the table already exceeds `max_size` (after
    /// the bound was lowered). Under a constant bound this evicts at most one
    /// entry. Evicted pairs are returned in eviction order.
    pub fn insert_bounded(
        &mut self,
        key: String,
        entry: CacheEntry,
        max_size: usize,
    ) -> Vec<(String, CacheEntry)> {
        let max_size = max_size.max(1);
        let mut evicted = Vec::new();

        if self.contains(&key) {
            self.insert(key, entry);
            while self.len() > max_size {
                match self.pop_lru() {
                    Some(pair) => evicted.push(pair),
                    None => break,
                }
            }
        } else {
            while self.len() >= max_size {
                match self.pop_lru() {
                    Some(pair) => evicted.push(pair),
                    None => break,
                }
            }
            self.insert(key, entry);
        }

        evicted
    }

    // == Remove ==
    /// Removes `key`, returning its entry if it was resident.
    pub fn remove(&mut self, key: &str) -> Option<CacheEntry> {
        let idx = self.index.remove(key)?;
        self.unlink(idx);
        self.release(idx).map(|(_, entry)| entry)
    }

    // == Pop LRU ==
    /// Removes and returns the least recently used entry.
    pub fn pop_lru(&mut self) -> Option<(String, CacheEntry)> {
        if self.tail == NIL {
            return None;
        }
        let idx = self.tail;
        self.unlink(idx);
        let (key, entry) = self.release(idx)?;
        self.index.remove(&key);
        Some((key, entry))
    }

    /// Returns the least recently used key without removing it.
    pub fn peek_lru(&self) -> Option<&str> {
        (self.tail != NIL).then(|| self.slots[self.tail].key.as_str())
    }

    // == Remove Where ==
    /// Removes every entry matching `predicate`, returning the removed keys
    /// in LRU to MRU order.
    pub fn remove_where<F>(&mut self, mut predicate: F) -> Vec<String>
    where
        F: FnMut(&str, &CacheEntry) -> bool,
    {
        let mut doomed = Vec::new();
        let mut current = self.tail;
        while current != NIL {
            let node = &self.slots[current];
            if let Some(entry) = node.entry.as_ref() {
                if predicate(&node.key, entry) {
                    doomed.push(node.key.clone());
                }
            }
            current = node.prev;
        }

        for key in &doomed {
            self.remove(key);
        }
        doomed
    }

    // == Clear ==
    pub fn clear(&mut self) {
        self.index.clear();
        self.slots.clear();
        self.free.clear();
        self.head = NIL;
        self.tail = NIL;
    }

    // == Iteration ==
    /// Iterates entries from MRU to LRU.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            slots: &self.slots,
            current: self.head,
            remaining: self.index.len(),
        }
    }

    /// Returns the resident entries, MRU first.
    pub fn snapshot(&self) -> Vec<(String, CacheEntry)> {
        self.iter()
            .map(|(key, entry)| (key.to_string(), entry.clone()))
            .collect()
    }

    /// Returns the resident keys, MRU first.
    pub fn keys(&self) -> Vec<String> {
        self.iter().map(|(key, _)| key.to_string()).collect()
    }

    // == Linked List Internals ==
    fn alloc(&mut self, key: String, entry: CacheEntry) -> usize {
        let node = Node {
            key,
            entry: Some(entry),
            prev: NIL,
            next: NIL,
        };
        match self.free.pop() {
            Some(idx) => {
                self.slots[idx] = node;
                idx
            }
            None => {
                self.slots.push(node);
                self.slots.len() - 1
            }
        }
    }

    /// Frees an unlinked slot and hands back its contents.
    fn release(&mut self, idx: usize) -> Option<(String, CacheEntry)> {
        let node = &mut self.slots[idx];
        let entry = node.entry.take()?;
        let key = std::mem::take(&mut node.key);
        self.free.push(idx);
        Some((key, entry))
    }

    fn unlink(&mut self, idx: usize) {
        let prev = self.slots[idx].prev;
        let next = self.slots[idx].next;

        if prev != NIL {
            self.slots[prev].next = next;
        } else {
            self.head = next;
        }

        if next != NIL {
            self.slots[next].prev = prev;
        } else {
            self.tail = prev;
        }

        self.slots[idx].prev = NIL;
        self.slots[idx].next = NIL;
    }

    fn push_head(&mut self, idx: usize) {
        self.slots[idx].prev = NIL;
        self.slots[idx].next = self.head;

        if self.head != NIL {
            self.slots[self.head].prev = idx;
        }
        self.head = idx;

        if self.tail == NIL {
            self.tail = idx;
        }
    }

    fn move_to_head(&mut self, idx: usize) {
        if self.head == idx {
            return;
        }
        self.unlink(idx);
        self.push_head(idx);
    }
}

// == Iterator ==
/// MRU to LRU iterator over `(key, entry)` pairs.
pub struct Iter<'a> {
    slots: &'a [Node],
    current: usize,
    remaining: usize,
}

impl<'a> Iterator for Iter<'a> {
    type Item = (&'a str, &'a CacheEntry);

    fn next(&mut self) -> Option<Self::Item> {
        if self.current == NIL || self.remaining == 0 {
            return None;
        }
        let node = &self.slots[self.current];
        self.current = node.next;
        self.remaining -= 1;
        node.entry.as_ref().map(|entry| (node.key.as_str(), entry))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}
