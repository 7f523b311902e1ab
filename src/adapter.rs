//! Translates collection and column mutations into index shifts for the
//! focus controller, the selection model and the anchor.

use crate::model::anchor::AnchorTracker;
use crate::model::focus::FocusController;
use crate::model::items::ListChange;
use crate::model::position::{ColumnId, Position};
use crate::model::selection::SelectionModel;

pub struct CollectionMutationAdapter<'a, M: SelectionModel + ?Sized> {
    pub focus: &'a mut FocusController,
    pub anchor: &'a mut AnchorTracker,
    pub selection: &'a mut M,
    /// Visible columns, passed through to the selection bounds.
    pub columns: &'a [ColumnId],
}

impl<M: SelectionModel + ?Sized> CollectionMutationAdapter<'_, M> {
    /// Apply one list change, given the row count before it. Returns the row
    /// count after it.
    pub fn apply(&mut self, len: usize, change: &ListChange) -> usize {
        let len = match change {
            ListChange::Inserted { at, count } => {
                let (at, count) = (*at, *count);
                let len = len + count;
                self.selection.set_bounds(len, self.columns);
                self.selection.remap(&mut |p: Position| {
                    Some(if p.row >= at { p.with_row(p.row + count) } else { p })
                });
                self.focus.rows_inserted(at, count);
                tracing::debug!(at, count, len, "rows inserted");
                len
            }
            ListChange::Removed { at, count } => {
                let (at, count) = (*at, *count);
                let len = len.saturating_sub(count);
                self.selection.set_bounds(len, self.columns);
                self.selection.remap(&mut |p: Position| {
                    if p.row < at {
                        Some(p)
                    } else if p.row >= at + count {
                        Some(p.with_row(p.row - count))
                    } else {
                        None
                    }
                });
                self.focus.rows_removed(at, count, len);
                self.anchor.retain_within(len);
                tracing::debug!(at, count, len, "rows removed");
                len
            }
            ListChange::Updated { index } => {
                let index = *index;
                self.selection
                    .remap(&mut |p: Position| (p.row != index).then_some(p));
                tracing::debug!(index, "row replaced");
                len
            }
            ListChange::Permuted { new_index_of } => {
                self.selection
                    .remap(&mut |p: Position| new_index_of.get(p.row).map(|&row| p.with_row(row)));
                self.focus.rows_permuted(new_index_of);
                self.anchor.permute(new_index_of);
                tracing::debug!(rows = new_index_of.len(), "rows permuted");
                len
            }
            ListChange::Replaced { len, retained } => {
                let len = *len;
                self.selection.set_bounds(len, self.columns);
                self.selection
                    .remap(&mut |p: Position| retained.contains(&p.row).then_some(p));
                self.focus.rows_replaced(len, retained);
                if !self.anchor.row().is_some_and(|row| retained.contains(&row)) {
                    self.anchor.clear();
                }
                tracing::debug!(len, retained = retained.len(), "rows replaced");
                len
            }
        };

        if len == 0 {
            self.selection.clear_selection();
            self.focus.clear();
            self.anchor.clear();
        }
        len
    }

    /// Column `hidden` left the visible set; `fallback` is where focus and
    /// anchor move if they were on it.
    pub fn column_hidden(&mut self, rows: usize, hidden: ColumnId, fallback: Option<ColumnId>) {
        self.selection.set_bounds(rows, self.columns);
        self.selection.remap(&mut |p: Position| (p.column != Some(hidden)).then_some(p));
        self.focus.retarget_column(hidden, fallback);
        self.anchor.map_column(|a| {
            Some(if a.column == Some(hidden) {
                a.with_column(fallback)
            } else {
                a
            })
        });
        tracing::debug!(%hidden, ?fallback, "column hidden");
    }

    /// Visible column order changed without any column disappearing.
    pub fn columns_reordered(&mut self, rows: usize) {
        self.selection.set_bounds(rows, self.columns);
    }
}
