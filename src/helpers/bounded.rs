//! Bounded request log
//!
//! Fixed-capacity buffer that evicts the oldest entry once full. Used for the
//! per-session request history, where the newest entries are the ones looked
//! up and updated when a response comes back.

use std::collections::VecDeque;

/// A bounded buffer with FIFO eviction
#[derive(Clone, Debug)]
pub struct BoundedLog<T> {
    cap: usize,
    buf: VecDeque<T>,
}

impl<T> BoundedLog<T> {
    /// Create a log holding at most `cap` entries. With `cap == 0` pushes are no-ops.
    pub fn new(cap: usize) -> Self {
        Self {
            cap,
            buf: VecDeque::with_capacity(cap.min(1024)),
        }
    }

    /// Append an entry, evicting the oldest if at capacity
    pub fn push(&mut self, value: T) {
        if self.cap == 0 {
            return;
        }
        if self.buf.len() == self.cap {
            self.buf.pop_front();
        }
        self.buf.push_back(value);
    }

    /// Newest first
    pub fn iter_rev(&self) -> impl Iterator<Item = &T> {
        self.buf.iter().rev()
    }

    /// Newest matching entry, searched from the back
    pub fn find_latest_mut(&mut self, mut pred: impl FnMut(&T) -> bool) -> Option<&mut T> {
        self.buf.iter_mut().rev().find(|item| pred(item))
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn last(&self) -> Option<&T> {
        self.buf.back()
    }
}

impl<T> Default for BoundedLog<T> {
    fn default() -> Self {
        Self::new(crate::constants::REQUEST_HISTORY_CAPACITY)
    }
}
