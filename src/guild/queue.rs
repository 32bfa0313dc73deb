//! FIFO of items to play with an explicit "now playing" slot

use std::collections::VecDeque;

/// Pending items plus the one currently playing
///
/// A completion callback calls [`advance`](Self::advance) to finish the
/// current item and start the next one.
#[derive(Debug, Clone)]
pub struct PlaybackQueue<T> {
    pending: VecDeque<T>,
    current: Option<T>,
}

impl<T> Default for PlaybackQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> PlaybackQueue<T> {
    pub fn new() -> Self {
        Self {
            pending: VecDeque::new(),
            current: None,
        }
    }

    /// Append an item to the back of the queue
    pub fn enqueue(&mut self, item: T) {
        self.pending.push_back(item);
    }

    /// Finish the current item and start the next; returns the new current
    pub fn advance(&mut self) -> Option<&T> {
        self.current = self.pending.pop_front();
        self.current.as_ref()
    }

    /// Stop the current item without starting another; returns it
    pub fn skip(&mut self) -> Option<T> {
        self.current.take()
    }

    /// Item playing now
    pub fn current(&self) -> Option<&T> {
        self.current.as_ref()
    }

    /// Whether something is playing
    pub fn is_playing(&self) -> bool {
        self.current.is_some()
    }

    /// Items waiting, front first
    pub fn pending(&self) -> impl Iterator<Item = &T> {
        self.pending.iter()
    }

    /// Number of items waiting
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Drop everything, including the current item
    pub fn clear(&mut self) {
        self.pending.clear();
        self.current = None;
    }
}
