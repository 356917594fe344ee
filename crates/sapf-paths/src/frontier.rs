use std::cmp::Ordering;
use std::collections::BinaryHeap;

use sapf_core::Coord;

/// Heap entry ordered by `key`, ties broken by insertion order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Entry<K> {
    pub(crate) key: K,
    pub(crate) seq: u64,
    pub(crate) pos: Coord,
}

impl<K: Ord> Ord for Entry<K> {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse so BinaryHeap (max-heap) pops smallest key, then oldest entry.
        other
            .key
            .cmp(&self.key)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl<K: Ord> PartialOrd for Entry<K> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Min-priority queue with a monotonically increasing insertion counter.
///
/// Entries are never updated in place: callers push a fresh entry when a
/// priority improves and discard stale ones on pop.
#[derive(Debug)]
pub(crate) struct Frontier<K> {
    heap: BinaryHeap<Entry<K>>,
    counter: u64,
}

impl<K: Ord> Frontier<K> {
    pub(crate) fn new() -> Self {
        Self {
            heap: BinaryHeap::new(),
            counter: 0,
        }
    }

    pub(crate) fn push(&mut self, key: K, pos: Coord) {
        self.heap.push(Entry {
            key,
            seq: self.counter,
            pos,
        });
        self.counter += 1;
    }

    pub(crate) fn pop(&mut self) -> Option<Entry<K>> {
        self.heap.pop()
    }

    pub(crate) fn peek(&self) -> Option<&Entry<K>> {
        self.heap.peek()
    }
}
