use super::position::{ColumnId, Position};

/// Focus moved from `previous` to `current`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FocusChange {
    pub previous: Option<Position>,
    pub current: Option<Position>,
}

/// Tracks the single focused row or cell.
#[derive(Debug, Clone, Default)]
pub struct FocusController {
    focused: Option<Position>,
    /// Focus before the first unreported change.
    reported: Option<Option<Position>>,
}

impl FocusController {
    pub fn focused(&self) -> Option<Position> {
        self.focused
    }

    pub fn focused_index(&self) -> Option<usize> {
        self.focused.map(|p| p.row)
    }

    pub fn is_focused(&self, pos: Position) -> bool {
        self.focused == Some(pos)
    }

    /// Focus `pos` if its row lies inside `len` rows. Returns whether
    /// focus changed.
    pub fn focus(&mut self, pos: Position, len: usize) -> bool {
        if pos.row >= len {
            return false;
        }
        self.set(Some(pos))
    }

    pub fn clear(&mut self) -> bool {
        self.set(None)
    }

    /// Row reached by moving `delta` rows, or `None` if that leaves `[0, len)`.
    pub fn offset_row(&self, delta: isize, len: usize) -> Option<usize> {
        let row = self.focused?.row.checked_add_signed(delta)?;
        (row < len).then_some(row)
    }

    /// Row reached by moving `delta` rows, pinned to `[0, len)`.
    pub fn offset_row_clamped(&self, delta: isize, len: usize) -> Option<usize> {
        let last = len.checked_sub(1)?;
        Some(self.focused?.row.saturating_add_signed(delta).min(last))
    }

    // ── Reactions to collection mutation ─────────────────────────

    /// `count` rows were inserted at `at`.
    pub fn rows_inserted(&mut self, at: usize, count: usize) {
        if let Some(pos) = self.focused
            && pos.row >= at
        {
            self.set(Some(pos.with_row(pos.row + count)));
        }
    }

    /// `count` rows starting at `at` were removed; `len` is the new length.
    pub fn rows_removed(&mut self, at: usize, count: usize, len: usize) {
        let Some(pos) = self.focused else {
            return;
        };
        if pos.row < at {
            return;
        }
        if pos.row >= at + count {
            self.set(Some(pos.with_row(pos.row - count)));
        } else if len == 0 {
            self.set(None);
        } else {
            // The row sliding into the removed slot takes over focus.
            self.set(Some(pos.with_row(at.min(len - 1))));
        }
    }

    pub fn rows_permuted(&mut self, new_index_of: &[usize]) {
        if let Some(pos) = self.focused {
            let moved = new_index_of.get(pos.row).map(|&row| pos.with_row(row));
            self.set(moved);
        }
    }

    /// Wholesale replacement: keep focus on a retained row, otherwise fall
    /// back to the first row.
    pub fn rows_replaced(&mut self, len: usize, retained: &[usize]) {
        let next = match self.focused {
            Some(pos) if retained.contains(&pos.row) => Some(pos),
            _ if len > 0 => Some(Position::row(0).with_column(self.focused.and_then(|p| p.column))),
            _ => None,
        };
        self.set(next);
    }

    /// Move focus off column `from` (hidden or removed) onto `to`.
    pub fn retarget_column(&mut self, from: ColumnId, to: Option<ColumnId>) {
        if let Some(pos) = self.focused
            && pos.column == Some(from)
        {
            self.set(Some(pos.with_column(to)));
        }
    }

    /// Pending change since the last call, if focus actually moved.
    pub fn take_change(&mut self) -> Option<FocusChange> {
        let previous = self.reported.take()?;
        (previous != self.focused).then_some(FocusChange {
            previous,
            current: self.focused,
        })
    }

    fn set(&mut self, next: Option<Position>) -> bool {
        if self.focused == next {
            return false;
        }
        if self.reported.is_none() {
            self.reported = Some(self.focused);
        }
        self.focused = next;
        true
    }
}
