//! Bounded priority queue with FIFO tie-break.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

struct Entry<T> {
    priority: i32,
    seq: u64,
    item: T,
}

impl<T> PartialEq for Entry<T> {
    fn eq(&self, other: &Self) -> bool {
        self.priority == other.priority && self.seq == other.seq
    }
}

impl<T> Eq for Entry<T> {}

impl<T> PartialOrd for Entry<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Entry<T> {
    // Max-heap: higher priority first, then lower sequence number.
    fn cmp(&self, other: &Self) -> Ordering {
        self.priority
            .cmp(&other.priority)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Pending requests ordered by `(priority desc, enqueue order asc)`.
///
/// Equal priorities never reorder: every push takes a fresh sequence number, so ordering
/// does not depend on heap stability.
pub struct RequestQueue<T> {
    heap: BinaryHeap<Entry<T>>,
    next_seq: u64,
    capacity: usize,
}

impl<T> RequestQueue<T> {
    pub fn new(capacity: usize) -> Self {
        Self {
            heap: BinaryHeap::new(),
            next_seq: 0,
            capacity: capacity.max(1),
        }
    }

    /// Enqueue unless full; a full queue hands the item back.
    pub fn try_push(&mut self, priority: i32, item: T) -> std::result::Result<(), T> {
        if self.heap.len() >= self.capacity {
            return Err(item);
        }
        self.push_unbounded(priority, item);
        Ok(())
    }

    /// Enqueue regardless of capacity. Used for retries of already-admitted requests.
    pub fn push_unbounded(&mut self, priority: i32, item: T) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(Entry {
            priority,
            seq,
            item,
        });
    }

    pub fn pop(&mut self) -> Option<T> {
        self.heap.pop().map(|e| e.item)
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Remove everything, in dispatch order.
    pub fn drain(&mut self) -> Vec<T> {
        let mut out = Vec::with_capacity(self.heap.len());
        while let Some(item) = self.pop() {
            out.push(item);
        }
        out
    }
}
