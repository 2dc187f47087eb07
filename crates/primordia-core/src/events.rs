//! Bounded, newest-first narrative event log.

use std::collections::VecDeque;
use std::collections::vec_deque;

use primordia_types::{EventKind, NarrativeEvent};

/// Keeps the most recent narrative events, newest first.
///
/// Pushing onto a full log drops the oldest entry.
#[derive(Debug, Clone)]
pub struct EventLog {
    entries: VecDeque<NarrativeEvent>,
    capacity: usize,
}

impl EventLog {
    /// Create an empty log holding at most `capacity` entries (minimum 1).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Stamp `kind` with `tick` and record it.
    pub fn record(&mut self, tick: u64, kind: EventKind) {
        self.push(NarrativeEvent::new(tick, kind));
    }

    /// Record an already-stamped event.
    pub fn push(&mut self, event: NarrativeEvent) {
        self.entries.push_front(event);
        self.entries.truncate(self.capacity);
    }

    /// Drop every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Iterate newest first.
    pub fn iter(&self) -> vec_deque::Iter<'_, NarrativeEvent> {
        self.entries.iter()
    }

    /// The most recent entry.
    pub fn latest(&self) -> Option<&NarrativeEvent> {
        self.entries.front()
    }

    /// Clone the entries into a newest-first vector.
    pub fn to_vec(&self) -> Vec<NarrativeEvent> {
        self.entries.iter().cloned().collect()
    }

    /// Number of entries held.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the log is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Maximum number of entries held.
    pub const fn capacity(&self) -> usize {
        self.capacity
    }
}

impl<'a> IntoIterator for &'a EventLog {
    type Item = &'a NarrativeEvent;
    type IntoIter = vec_deque::Iter<'a, NarrativeEvent>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
