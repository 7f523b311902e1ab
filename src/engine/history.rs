use std::collections::VecDeque;

use crate::model::position::Position;

pub(crate) const DEFAULT_LIMIT: usize = 10;

/// Recently selected positions, newest first, without duplicates.
///
/// Cell-granularity extension uses it to tell a walk that is retracing its
/// steps from one that is turning a corner.
#[derive(Debug, Clone)]
pub struct SelectionHistory {
    entries: VecDeque<Position>,
    limit: usize,
}

impl Default for SelectionHistory {
    fn default() -> Self {
        Self::new(DEFAULT_LIMIT)
    }
}

impl SelectionHistory {
    pub fn new(limit: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(limit),
            limit,
        }
    }

    /// Remember `pos` unless it is already remembered.
    pub fn record(&mut self, pos: Position) {
        if self.limit == 0 || self.entries.contains(&pos) {
            return;
        }
        self.entries.push_front(pos);
        self.entries.truncate(self.limit);
    }

    /// `n`th most recent entry, 0 being the newest.
    pub fn get(&self, n: usize) -> Option<Position> {
        self.entries.get(n).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
