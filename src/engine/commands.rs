use crate::model::mode::{Granularity, SelectionMode};
use crate::model::position::Position;
use crate::model::selection::SelectionModel;
use crate::msg::{Command, Modifiers, Step};

use super::{Outcome, SelectionEngine};

impl<T, M: SelectionModel> SelectionEngine<T, M> {
    /// Apply one classified key command.
    ///
    /// Navigation that would leave the list is a no-op: nothing changes and
    /// nobody is notified.
    pub fn apply(&mut self, command: Command, modifiers: Modifiers) -> Outcome {
        self.dispatch(command, modifiers);
        self.finish(command, modifiers)
    }

    pub(super) fn finish(&mut self, command: Command, modifiers: Modifiers) -> Outcome {
        let changed = self.flush();
        tracing::debug!(?command, ?modifiers, changed, "command applied");
        if changed {
            Outcome::Changed
        } else {
            Outcome::Unchanged
        }
    }

    fn dispatch(&mut self, command: Command, modifiers: Modifiers) {
        let len = self.items.len();
        match command {
            Command::MoveLine(step) => {
                if self.extends_cells(modifiers) {
                    self.extend_cells_vertically(step.delta());
                } else if let Some(row) = self.line_target(step.delta()) {
                    self.navigate_to(row, modifiers);
                }
            }
            Command::MoveAxis(step) => self.move_axis(step.delta(), modifiers),
            Command::MoveHome => {
                if len > 0 {
                    self.navigate_to(0, modifiers);
                }
            }
            Command::MoveEnd => {
                if len > 0 {
                    self.navigate_to(len - 1, modifiers);
                }
            }
            Command::MovePage { step, rows } => {
                if let Some(row) = self.page_target(step, rows) {
                    self.navigate_to(row, modifiers);
                }
            }
            Command::ToggleAtFocus => self.toggle_at_focus(modifiers),
            Command::SelectAll => self.select_all_inner(),
            Command::ClearSelection => {
                self.selection.clear_selection();
                self.clear_anchor();
            }
        }
    }

    /// Plain Shift in multiple cell selection walks cell by cell.
    fn extends_cells(&self, modifiers: Modifiers) -> bool {
        modifiers.shift
            && !modifiers.primary
            && self.selection.granularity() == Granularity::Cell
            && self.selection.mode() == SelectionMode::Multiple
    }

    /// Row one line away from focus. With nothing focused, the first row.
    fn line_target(&self, delta: isize) -> Option<usize> {
        let len = self.items.len();
        match self.focus.focused() {
            None => (len > 0).then_some(0),
            Some(_) => self.focus.offset_row(delta, len),
        }
    }

    /// Row a page away, pinned to the list. `None` when already pinned.
    fn page_target(&self, step: Step, rows: usize) -> Option<usize> {
        let len = self.items.len();
        let Some(current) = self.focus.focused_index() else {
            return (len > 0).then_some(0);
        };
        let rows = isize::try_from(rows).unwrap_or(isize::MAX);
        let delta = step.delta().saturating_mul(rows);
        self.focus
            .offset_row_clamped(delta, len)
            .filter(|&row| row != current)
    }

    /// Move to `row`, with the row-axis semantics of each modifier set.
    pub(super) fn navigate_to(&mut self, row: usize, modifiers: Modifiers) {
        let pos = Position {
            row,
            column: self.focus_column(),
        };
        let single = self.selection.mode() == SelectionMode::Single;
        match (modifiers.shift, modifiers.primary) {
            (false, false) => self.select_only(pos),
            (false, true) => {
                self.focus.focus(pos, self.items.len());
            }
            (true, _) if single => {
                self.selection.clear_and_select(pos);
                self.focus.focus(pos, self.items.len());
            }
            (true, false) => self.extend_to(pos),
            (true, true) => self.add_span_to(pos),
        }
    }

    /// Anchor row, establishing the anchor at the current focus (or at
    /// `fallback`) when there is none.
    pub(super) fn anchor_row_or_focus(&mut self, fallback: Position) -> usize {
        if let Some(anchor) = self.anchor.get() {
            return anchor.row;
        }
        let pivot = self.focus.focused().unwrap_or(fallback);
        self.move_anchor(pivot);
        pivot.row
    }

    /// Contiguous extension: the span `[anchor, pos]` becomes selected, and
    /// rows of the previous span `[anchor, old focus]` that fall outside it
    /// are released. Selections outside the old span survive.
    fn extend_to(&mut self, pos: Position) {
        let old = self.focus.focused_index().unwrap_or(pos.row);
        let anchor = self.anchor_row_or_focus(pos);
        let (lo, hi) = span(anchor, old);
        let (new_lo, new_hi) = span(anchor, pos.row);

        for row in (lo..=hi).filter(|&row| row < new_lo || row > new_hi) {
            self.selection.deselect(Position {
                row,
                column: pos.column,
            });
        }
        self.selection.select_range(new_lo..new_hi + 1, pos.column);
        self.focus.focus(pos, self.items.len());
    }

    /// Discontiguous extension: everything between anchor and `pos` is
    /// added, nothing is removed.
    fn add_span_to(&mut self, pos: Position) {
        let anchor = self.anchor_row_or_focus(pos);
        let (lo, hi) = span(anchor, pos.row);
        self.selection.select_range(lo..hi + 1, pos.column);
        self.focus.focus(pos, self.items.len());
    }

    fn toggle_at_focus(&mut self, modifiers: Modifiers) {
        let Some(focus) = self.focus.focused() else {
            return;
        };
        match (modifiers.shift, modifiers.primary) {
            (false, false) => {
                self.selection.select(focus);
                self.move_anchor(focus);
            }
            (false, true) => {
                self.selection.toggle(focus);
                self.move_anchor(focus);
            }
            (true, primary) => {
                let anchor = self.anchor.get().unwrap_or(focus);
                if self.selection.mode() == SelectionMode::Single {
                    self.selection.clear_and_select(focus);
                } else {
                    self.selection.clear_selection();
                    self.select_block(anchor, focus);
                }
                if primary || !self.anchor.is_set() {
                    self.move_anchor(if primary { focus } else { anchor });
                }
            }
        }
    }

    /// Select the rectangle spanned by two corners. Row positions, or cells
    /// without both columns, select whole rows.
    fn select_block(&mut self, from: Position, to: Position) {
        let (lo, hi) = span(from.row, to.row);
        let columns = match (from.column, to.column) {
            (Some(a), Some(b)) => self.column_span(a, b),
            _ => None,
        };
        match columns {
            Some(columns) => {
                for row in lo..=hi {
                    for &column in &columns {
                        self.selection.select(Position::cell(row, column));
                    }
                }
            }
            None => {
                self.selection.select_range(lo..hi + 1, None);
            }
        }
    }
}

/// `(min, max)` of two rows.
pub(super) fn span(a: usize, b: usize) -> (usize, usize) {
    if a <= b { (a, b) } else { (b, a) }
}
