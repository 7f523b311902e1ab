use super::position::Position;

/// Pivot for range operations.
#[derive(Debug, Clone, Default)]
pub struct AnchorTracker {
    anchor: Option<Position>,
}

impl AnchorTracker {
    pub fn get(&self) -> Option<Position> {
        self.anchor
    }

    pub fn row(&self) -> Option<usize> {
        self.anchor.map(|a| a.row)
    }

    pub fn is_set(&self) -> bool {
        self.anchor.is_some()
    }

    pub fn set(&mut self, pos: Position) {
        self.anchor = Some(pos);
    }

    pub fn clear(&mut self) {
        self.anchor = None;
    }

    /// Drop the anchor if it no longer fits inside `len` rows.
    pub fn retain_within(&mut self, len: usize) {
        if self.anchor.is_some_and(|a| a.row >= len) {
            self.anchor = None;
        }
    }

    /// Follow a permutation of the rows.
    pub fn permute(&mut self, new_index_of: &[usize]) {
        if let Some(anchor) = self.anchor {
            self.anchor = new_index_of.get(anchor.row).map(|&row| anchor.with_row(row));
        }
    }

    /// Remap the anchor column, e.g. when its column is hidden.
    pub fn map_column(&mut self, f: impl FnOnce(Position) -> Option<Position>) {
        if let Some(anchor) = self.anchor {
            self.anchor = f(anchor);
        }
    }
}
