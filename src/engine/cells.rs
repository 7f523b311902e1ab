//! Cell-granularity extension.
//!
//! A Shift walk starts as a straight line from the anchor along one axis.
//! While it stays on the anchor's row or column, each step re-selects the
//! span from the anchor. Once it turns a corner the path is "deviated" and
//! each step just adds the next cell, so retracing a step can release the
//! far end of the walk instead of the whole span.

use crate::model::mode::{Granularity, SelectionMode};
use crate::model::position::{ColumnId, Position};
use crate::model::selection::SelectionModel;
use crate::msg::Modifiers;

use super::SelectionEngine;
use super::commands::span;

impl<T, M: SelectionModel> SelectionEngine<T, M> {
    /// Left / right in cell granularity. Row granularity ignores it.
    pub(super) fn move_axis(&mut self, delta: isize, modifiers: Modifiers) {
        if self.selection.granularity() != Granularity::Cell || self.items.is_empty() {
            return;
        }
        let focus = self.focus.focused().unwrap_or(Position::row(0));
        let target = match focus.column {
            Some(column) => self.columns.step(column, delta),
            None => self.columns.visible_at(0),
        };
        let Some(target) = target else {
            return;
        };
        let target = Position::cell(focus.row, target);
        let single = self.selection.mode() == SelectionMode::Single;

        match (modifiers.shift, modifiers.primary) {
            (false, false) => self.select_only(target),
            (false, true) => {
                self.focus.focus(target, self.items.len());
            }
            (true, _) if single => {
                self.selection.clear_and_select(target);
                self.focus.focus(target, self.items.len());
            }
            (true, false) => self.extend_cells_horizontally(focus, target),
            (true, true) => {
                self.anchor_row_or_focus(target);
                let from = self.anchor.get().and_then(|a| a.column);
                self.select_row_span(target.row, from, target);
                self.focus.focus(target, self.items.len());
            }
        }
    }

    fn extend_cells_horizontally(&mut self, focus: Position, target: Position) {
        if focus.column.is_none() {
            self.selection.select(target);
            self.focus.focus(target, self.items.len());
            return;
        }
        if self.selection.is_selected(target) {
            self.step_onto_selected(focus, target);
        } else if let Some(anchor) = self.anchor.get()
            && !self.path_deviated
        {
            self.select_row_span(focus.row, anchor.column, target);
            self.focus.focus(target, self.items.len());
        } else {
            self.selection.select(focus);
            self.selection.select(target);
            self.focus.focus(target, self.items.len());
        }
    }

    /// Shift + up / down in multiple cell selection. Only cells of the
    /// focused column are added or released.
    pub(super) fn extend_cells_vertically(&mut self, delta: isize) {
        let len = self.items.len();
        let Some(focus) = self.focus.focused() else {
            if len > 0 {
                let column = self.columns.visible_at(0);
                self.select_only(Position { row: 0, column });
            }
            return;
        };
        let Some(column) = focus.column.or_else(|| self.columns.visible_at(0)) else {
            return;
        };
        let Some(row) = self.focus.offset_row(delta, len) else {
            return;
        };
        let focus = Position::cell(focus.row, column);
        let target = Position::cell(row, column);

        if self.selection.is_selected(target) {
            self.step_onto_selected(focus, target);
        } else if let Some(anchor) = self.anchor.get()
            && !self.path_deviated
        {
            let (lo, hi) = span(anchor.row, row);
            if self.selection.selected_indices().len() > 1 {
                let outside: Vec<Position> = self
                    .selection
                    .selected_cells()
                    .iter()
                    .copied()
                    .filter(|p| p.column == Some(column) && (p.row < lo || p.row > hi))
                    .collect();
                for pos in outside {
                    self.selection.deselect(pos);
                }
            }
            self.selection.select_range(lo..hi + 1, Some(column));
            self.focus.focus(target, len);
        } else {
            self.selection.select(focus);
            self.selection.select(target);
            self.focus.focus(target, len);
        }
    }

    /// The neighbour is already selected: the walk is shrinking. Release
    /// the cell being left, unless the walk turned a corner and is not
    /// retracing its last step, in which case the neighbour goes.
    fn step_onto_selected(&mut self, focus: Position, target: Position) {
        let backtracking = self.history.get(1) == Some(target);
        let release = if self.path_deviated && !backtracking {
            target
        } else {
            focus
        };
        self.selection.deselect(release);
        self.focus.focus(target, self.items.len());
    }

    /// Select cells of `row` between column `from` (or `to`'s column when
    /// absent) and `to`, left to right.
    fn select_row_span(&mut self, row: usize, from: Option<ColumnId>, to: Position) {
        let Some(to_column) = to.column else {
            return;
        };
        let Some(columns) = self.column_span(from.unwrap_or(to_column), to_column) else {
            return;
        };
        for column in columns {
            self.selection.select(Position::cell(row, column));
        }
    }

    /// Visible columns from `a` to `b` inclusive, in display order. `None`
    /// if either is hidden.
    pub(super) fn column_span(&self, a: ColumnId, b: ColumnId) -> Option<Vec<ColumnId>> {
        let a = self.columns.visible_index(a)?;
        let b = self.columns.visible_index(b)?;
        let (lo, hi) = span(a, b);
        Some((lo..=hi).filter_map(|i| self.columns.visible_at(i)).collect())
    }
}
