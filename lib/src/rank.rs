use std::slice;

use crate::Entry;

/// Measured entries ordered by size, largest first.
/// Entries of equal size keep their discovery order.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RankedList {
    entries: Vec<Entry>,
}

impl RankedList {
    pub fn new(mut entries: Vec<Entry>) -> Self {
        entries.sort_by(|a, b| b.size.cmp(&a.size));
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> slice::Iter<'_, Entry> {
        self.entries.iter()
    }

    /// The first `limit` entries, or all of them if there are fewer.
    pub fn top(&self, limit: usize) -> &[Entry] {
        &self.entries[..limit.min(self.entries.len())]
    }
}
