// SPDX-License-Identifier: MPL-2.0
//! Fixed-size journal storage.
//!
//! The diagnostics journal must not grow with the number of notifications a
//! long-running application shows, so it keeps the newest N events and
//! counts how many older ones were overwritten.

use std::collections::VecDeque;

pub use crate::domain::diagnostics::BufferCapacity;

/// Ring buffer holding the newest `capacity` items, oldest first.
///
/// # Example
///
/// ```
/// use toast_registry::diagnostics::CircularBuffer;
///
/// let mut journal = CircularBuffer::with_raw_capacity(2);
/// journal.push("added toast-1");
/// journal.push("added toast-2");
/// let overwritten = journal.push("added toast-3");
///
/// assert_eq!(overwritten, Some("added toast-1"));
/// assert_eq!(journal.overwritten(), 1);
/// assert_eq!(journal.recent(1).collect::<Vec<_>>(), [&"added toast-3"]);
/// ```
#[derive(Debug, Clone)]
pub struct CircularBuffer<T> {
    items: VecDeque<T>,
    capacity: usize,
    overwritten: u64,
}

impl<T> CircularBuffer<T> {
    /// Creates a buffer sized by a validated [`BufferCapacity`].
    #[must_use]
    pub fn new(capacity: BufferCapacity) -> Self {
        Self::with_raw_capacity(capacity.value())
    }

    /// Creates a buffer without the [`BufferCapacity`] bounds.
    ///
    /// A capacity of zero holds one item.
    #[must_use]
    pub fn with_raw_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            items: VecDeque::with_capacity(capacity),
            capacity,
            overwritten: 0,
        }
    }

    /// Appends `item`, returning the oldest item when the buffer was full.
    pub fn push(&mut self, item: T) -> Option<T> {
        let dropped = if self.items.len() == self.capacity {
            self.overwritten += 1;
            self.items.pop_front()
        } else {
            None
        };
        self.items.push_back(item);
        dropped
    }

    /// Oldest to newest.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &T> {
        self.items.iter()
    }

    /// The `count` newest items, newest first.
    pub fn recent(&self, count: usize) -> impl Iterator<Item = &T> {
        self.items.iter().rev().take(count)
    }

    #[must_use]
    pub fn last(&self) -> Option<&T> {
        self.items.back()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Items pushed out since creation or the last [`clear`](Self::clear).
    #[must_use]
    pub fn overwritten(&self) -> u64 {
        self.overwritten
    }

    /// Empties the buffer and resets the overwrite counter.
    pub fn clear(&mut self) {
        self.items.clear();
        self.overwritten = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_newest_items_in_order() {
        let mut journal = CircularBuffer::with_raw_capacity(3);
        for id in 1..=5 {
            journal.push(format!("toast-{id}"));
        }

        let kept: Vec<&str> = journal.iter().map(String::as_str).collect();
        assert_eq!(kept, ["toast-3", "toast-4", "toast-5"]);
        assert_eq!(journal.overwritten(), 2);
        assert_eq!(journal.last().map(String::as_str), Some("toast-5"));
    }

    #[test]
    fn push_reports_overwritten_item_only_when_full() {
        let mut journal = CircularBuffer::with_raw_capacity(2);
        assert_eq!(journal.push('a'), None);
        assert_eq!(journal.push('b'), None);
        assert_eq!(journal.push('c'), Some('a'));
    }

    #[test]
    fn recent_is_newest_first_and_bounded() {
        let mut journal = CircularBuffer::with_raw_capacity(4);
        for n in 0..4 {
            journal.push(n);
        }
        assert_eq!(journal.recent(2).copied().collect::<Vec<_>>(), [3, 2]);
        assert_eq!(journal.recent(10).count(), 4);
    }

    #[test]
    fn clear_resets_contents_and_counter() {
        let mut journal = CircularBuffer::with_raw_capacity(1);
        journal.push(1);
        journal.push(2);
        journal.clear();

        assert!(journal.is_empty());
        assert_eq!(journal.overwritten(), 0);
        assert_eq!(journal.capacity(), 1);
    }

    #[test]
    fn zero_raw_capacity_still_holds_one_item() {
        let mut journal = CircularBuffer::with_raw_capacity(0);
        journal.push("only");
        assert_eq!(journal.len(), 1);
        assert_eq!(journal.capacity(), 1);
    }

    #[test]
    fn validated_capacity_is_clamped() {
        let journal: CircularBuffer<u8> = CircularBuffer::new(BufferCapacity::new(1));
        assert_eq!(
            journal.capacity(),
            crate::domain::diagnostics::buffer_capacity_bounds::MIN
        );
    }
}
