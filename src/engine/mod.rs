//! The selection engine: owns the items, the selection model, focus and
//! anchor, and turns classified key commands into state changes.
//!
//! Every public mutator and every [`SelectionEngine::apply`] call is one
//! batch: listeners hear about it at most once per kind, after the whole
//! batch has been applied.

mod cells;
mod commands;
mod history;
mod tree;
mod view;

pub use history::SelectionHistory;
pub use tree::TreeRow;
pub use view::SelectionView;

use crate::adapter::CollectionMutationAdapter;
use crate::error::{Result, SelectionError};
use crate::model::anchor::AnchorTracker;
use crate::model::columns::ColumnSet;
use crate::model::focus::{FocusChange, FocusController};
use crate::model::items::ObservableList;
use crate::model::mode::{Granularity, SelectionMode};
use crate::model::position::{ColumnId, Position};
use crate::model::selection::{SelectionChange, SelectionModel, SelectionStore};
use crate::notify::{Observers, Subscription};

pub type SelectionListener<T> = dyn FnMut(&SelectionChange, &SelectionView<'_, T>);
pub type FocusListener<T> = dyn FnMut(&FocusChange, &SelectionView<'_, T>);

/// Construction-time settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineOptions {
    pub mode: SelectionMode,
    pub granularity: Granularity,
    /// Cells remembered for backtracking detection in cell granularity.
    pub history_limit: usize,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            mode: SelectionMode::Single,
            granularity: Granularity::Row,
            history_limit: history::DEFAULT_LIMIT,
        }
    }
}

/// Result of a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Nothing observable changed.
    Unchanged,
    /// Selection, focus or anchor changed.
    Changed,
    /// The collaborator should collapse the branch at this row.
    Collapse(usize),
    /// The collaborator should expand the branch at this row.
    Expand(usize),
}

impl Outcome {
    pub fn is_changed(self) -> bool {
        self == Outcome::Changed
    }
}

pub struct SelectionEngine<T, M: SelectionModel = SelectionStore> {
    items: ObservableList<T>,
    columns: ColumnSet,
    selection: M,
    focus: FocusController,
    anchor: AnchorTracker,
    history: SelectionHistory,
    /// Set once a cell-granularity extension leaves the anchor's row and
    /// column; reset whenever the anchor moves.
    path_deviated: bool,
    anchor_moved: bool,
    selection_observers: Observers<SelectionListener<T>>,
    focus_observers: Observers<FocusListener<T>>,
}

impl<T> SelectionEngine<T> {
    /// Single-selection, row-granularity engine over `items`.
    pub fn new(items: Vec<T>) -> Self {
        Self::with_options(items, ColumnSet::new(), EngineOptions::default())
    }

    pub fn with_options(items: Vec<T>, columns: ColumnSet, options: EngineOptions) -> Self {
        let store = SelectionStore::new(options.mode, options.granularity);
        Self::with_model(items, columns, store, options.history_limit)
    }
}

impl<T, M: SelectionModel> SelectionEngine<T, M> {
    /// Engine driving a caller-supplied selection model.
    pub fn with_model(items: Vec<T>, columns: ColumnSet, mut selection: M, history_limit: usize) -> Self {
        let items = ObservableList::from_vec(items);
        selection.set_bounds(items.len(), &columns.visible());
        selection.take_change();
        Self {
            items,
            columns,
            selection,
            focus: FocusController::default(),
            anchor: AnchorTracker::default(),
            history: SelectionHistory::new(history_limit),
            path_deviated: false,
            anchor_moved: false,
            selection_observers: Observers::default(),
            focus_observers: Observers::default(),
        }
    }

    // ── Queries ──────────────────────────────────────────────────

    pub fn items(&self) -> &[T] {
        self.items.as_slice()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn columns(&self) -> &ColumnSet {
        &self.columns
    }

    pub fn selection(&self) -> &M {
        &self.selection
    }

    pub fn mode(&self) -> SelectionMode {
        self.selection.mode()
    }

    pub fn granularity(&self) -> Granularity {
        self.selection.granularity()
    }

    pub fn anchor(&self) -> Option<Position> {
        self.anchor.get()
    }

    pub fn focused(&self) -> Option<Position> {
        self.focus.focused()
    }

    pub fn focused_index(&self) -> Option<usize> {
        self.focus.focused_index()
    }

    pub fn focused_item(&self) -> Option<&T> {
        self.items.get(self.focus.focused_index()?)
    }

    pub fn is_focused(&self, pos: Position) -> bool {
        self.focus.is_focused(pos)
    }

    pub fn is_selected(&self, pos: Position) -> bool {
        self.selection.is_selected(pos)
    }

    pub fn selected_indices(&self) -> Vec<usize> {
        self.selection.selected_indices()
    }

    pub fn selected_items(&self) -> Vec<&T> {
        self.view().selected_items()
    }

    pub fn selected_cells(&self) -> &[Position] {
        self.selection.selected_cells()
    }

    pub fn history(&self) -> &SelectionHistory {
        &self.history
    }

    /// Read-only snapshot of the current state.
    pub fn view(&self) -> SelectionView<'_, T> {
        SelectionView::new(
            self.items.as_slice(),
            &self.selection,
            self.focus.focused(),
            self.anchor.get(),
        )
    }

    // ── Settings ─────────────────────────────────────────────────

    /// Switching to single mode keeps only the most recently selected
    /// position.
    pub fn set_mode(&mut self, mode: SelectionMode) {
        if self.selection.mode() == mode {
            return;
        }
        self.selection.set_mode(mode);
        tracing::debug!(mode = mode.label(), "selection mode changed");
        self.flush();
    }

    /// Changing granularity clears the selection, anchor and history.
    pub fn set_granularity(&mut self, granularity: Granularity) {
        if self.selection.granularity() == granularity {
            return;
        }
        self.selection.set_granularity(granularity);
        self.clear_anchor();
        self.history.clear();
        let focus = self.focus.focused().map(|p| self.aligned(p));
        if let Some(pos) = focus {
            self.focus.focus(pos, self.items.len());
        }
        tracing::debug!(granularity = granularity.label(), "granularity changed");
        self.flush();
    }

    // ── Direct mutators ──────────────────────────────────────────

    /// Select `pos` and focus it. Out-of-range rows are ignored.
    pub fn select(&mut self, pos: Position) -> Result<bool> {
        let pos = self.validated(pos)?;
        if pos.row >= self.items.len() {
            return Ok(false);
        }
        self.selection.select(pos);
        self.focus.focus(pos, self.items.len());
        Ok(self.flush())
    }

    pub fn deselect(&mut self, pos: Position) -> Result<bool> {
        let pos = self.validated(pos)?;
        self.selection.deselect(pos);
        Ok(self.flush())
    }

    /// Flip `pos`; selecting it also focuses it.
    pub fn toggle(&mut self, pos: Position) -> Result<bool> {
        let pos = self.validated(pos)?;
        if pos.row >= self.items.len() {
            return Ok(false);
        }
        if self.selection.is_selected(pos) {
            self.selection.deselect(pos);
        } else {
            self.selection.select(pos);
            self.focus.focus(pos, self.items.len());
        }
        Ok(self.flush())
    }

    /// Clear everything, select `pos`, focus it and make it the anchor.
    pub fn clear_and_select(&mut self, pos: Position) -> Result<bool> {
        let pos = self.validated(pos)?;
        if pos.row >= self.items.len() {
            return Ok(false);
        }
        self.select_only(pos);
        Ok(self.flush())
    }

    /// Select rows `[from, to)`, focusing the last one. The anchor is left
    /// alone.
    pub fn select_range(&mut self, from: usize, to: usize) -> bool {
        let to = to.min(self.items.len());
        if from >= to {
            return false;
        }
        let column = self.focus_column();
        self.selection.select_range(from..to, column);
        self.focus.focus(Position { row: to - 1, column }, self.items.len());
        self.flush()
    }

    /// Select every row or cell; in single mode only the focused one.
    pub fn select_all(&mut self) -> bool {
        self.select_all_inner();
        self.flush()
    }

    /// Clear the selection and destroy the anchor. Focus is kept.
    pub fn clear_selection(&mut self) -> bool {
        self.selection.clear_selection();
        self.clear_anchor();
        self.flush()
    }

    /// Move focus without touching the selection.
    pub fn focus(&mut self, pos: Position) -> Result<bool> {
        let pos = self.validated(pos)?;
        self.focus.focus(pos, self.items.len());
        Ok(self.flush())
    }

    pub fn clear_focus(&mut self) -> bool {
        self.focus.clear();
        self.flush()
    }

    /// Make `pos` the range pivot. Out-of-range rows are ignored.
    pub fn set_anchor(&mut self, pos: Position) -> Result<bool> {
        let pos = self.validated(pos)?;
        if pos.row >= self.items.len() || self.anchor.get() == Some(pos) {
            return Ok(false);
        }
        self.move_anchor(pos);
        self.flush();
        Ok(true)
    }

    // ── Collection and column collaborators ──────────────────────

    /// Mutate the backing list. Queued structural changes are replayed
    /// through the mutation adapter before listeners are notified.
    pub fn mutate_items<R>(&mut self, f: impl FnOnce(&mut ObservableList<T>) -> R) -> R {
        let len = self.items.len();
        let result = f(&mut self.items);
        if self.replay_changes(len) {
            self.deliver(false);
        }
        result
    }

    /// Feed queued list changes through the mutation adapter. Returns
    /// whether there were any.
    fn replay_changes(&mut self, mut len: usize) -> bool {
        let changes = self.items.drain_changes();
        if changes.is_empty() {
            return false;
        }
        let visible = self.columns.visible();
        let mut adapter = CollectionMutationAdapter {
            focus: &mut self.focus,
            anchor: &mut self.anchor,
            selection: &mut self.selection,
            columns: &visible,
        };
        for change in &changes {
            len = adapter.apply(len, change);
        }
        debug_assert_eq!(len, self.items.len());
        self.history.clear();
        if !self.anchor.is_set() {
            self.path_deviated = false;
        }
        true
    }

    pub fn add_column(&mut self, id: ColumnId, title: impl Into<String>) -> Result<()> {
        self.columns.add(id, title)?;
        self.selection.set_bounds(self.items.len(), &self.columns.visible());
        tracing::debug!(%id, "column added");
        Ok(())
    }

    /// Show or hide a column. Returns whether visibility changed.
    pub fn set_column_visible(&mut self, id: ColumnId, visible: bool) -> Result<bool> {
        let fallback = if visible {
            None
        } else {
            self.columns.nearest_visible(id)
        };
        if !self.columns.set_visible(id, visible)? {
            return Ok(false);
        }
        let columns = self.columns.visible();
        let rows = self.items.len();
        let mut adapter = CollectionMutationAdapter {
            focus: &mut self.focus,
            anchor: &mut self.anchor,
            selection: &mut self.selection,
            columns: &columns,
        };
        if visible {
            adapter.columns_reordered(rows);
        } else {
            adapter.column_hidden(rows, id, fallback);
        }
        self.history.clear();
        self.deliver(false);
        Ok(true)
    }

    pub fn move_column(&mut self, id: ColumnId, to: usize) -> Result<()> {
        self.columns.move_to(id, to)?;
        let columns = self.columns.visible();
        CollectionMutationAdapter {
            focus: &mut self.focus,
            anchor: &mut self.anchor,
            selection: &mut self.selection,
            columns: &columns,
        }
        .columns_reordered(self.items.len());
        Ok(())
    }

    pub fn remove_column(&mut self, id: ColumnId) -> Result<()> {
        if self.columns.is_visible(id) {
            self.set_column_visible(id, false)?;
        }
        self.columns.remove(id)?;
        Ok(())
    }

    // ── Observers ────────────────────────────────────────────────

    pub fn on_selection_change(
        &mut self,
        listener: impl FnMut(&SelectionChange, &SelectionView<'_, T>) + 'static,
    ) -> Subscription {
        self.selection_observers.subscribe(Box::new(listener))
    }

    pub fn on_focus_change(
        &mut self,
        listener: impl FnMut(&FocusChange, &SelectionView<'_, T>) + 'static,
    ) -> Subscription {
        self.focus_observers.subscribe(Box::new(listener))
    }

    /// Returns whether the subscription was live.
    pub fn unsubscribe(&mut self, key: Subscription) -> bool {
        self.selection_observers.unsubscribe(key) || self.focus_observers.unsubscribe(key)
    }

    // ── Internals shared by the command handlers ─────────────────

    /// Fail on unregistered columns and align `pos` with the granularity.
    fn validated(&self, pos: Position) -> Result<Position> {
        if let Some(id) = pos.column
            && !self.columns.contains(id)
        {
            return Err(SelectionError::UnknownColumn(id));
        }
        Ok(self.aligned(pos))
    }

    /// Row granularity drops columns. Cell granularity keeps `pos` as given,
    /// so a row-only position stands for every visible cell of its row.
    fn aligned(&self, pos: Position) -> Position {
        match self.selection.granularity() {
            Granularity::Row => pos.to_row(),
            Granularity::Cell => pos,
        }
    }

    /// Column commands should operate in: the focused column in cell
    /// granularity, falling back to the first visible column.
    fn focus_column(&self) -> Option<ColumnId> {
        match self.selection.granularity() {
            Granularity::Row => None,
            Granularity::Cell => self
                .focus
                .focused()
                .and_then(|p| p.column)
                .or_else(|| self.columns.visible_at(0)),
        }
    }

    fn move_anchor(&mut self, pos: Position) {
        if self.anchor.get() != Some(pos) {
            self.anchor.set(pos);
            self.anchor_moved = true;
        }
        self.path_deviated = false;
    }

    fn clear_anchor(&mut self) {
        if self.anchor.is_set() {
            self.anchor_moved = true;
        }
        self.anchor.clear();
        self.path_deviated = false;
    }

    /// Clear, select, focus and anchor `pos`.
    fn select_only(&mut self, pos: Position) {
        self.selection.clear_and_select(pos);
        self.focus.focus(pos, self.items.len());
        self.move_anchor(pos);
    }

    fn select_all_inner(&mut self) {
        if self.items.is_empty() {
            return;
        }
        match self.selection.mode() {
            SelectionMode::Multiple => {
                self.selection.select_all();
            }
            SelectionMode::Single => {
                if let Some(pos) = self.focus.focused() {
                    self.selection.select(pos);
                }
            }
        }
    }

    /// Deliver pending notifications. Returns whether anything observable
    /// changed since the last flush.
    fn flush(&mut self) -> bool {
        self.deliver(true)
    }

    /// `track` is false for index shifts caused by collection or column
    /// mutation, which are not new selections.
    fn deliver(&mut self, track: bool) -> bool {
        let selection_change = self.selection.take_change();
        let focus_change = self.focus.take_change();

        if track && let Some(change) = &selection_change {
            self.track_history(change);
        }
        let anchor_moved = std::mem::take(&mut self.anchor_moved);

        let view = SelectionView::new(
            self.items.as_slice(),
            &self.selection,
            self.focus.focused(),
            self.anchor.get(),
        );
        if let Some(change) = &selection_change {
            tracing::trace!(
                added = change.added.len(),
                removed = change.removed.len(),
                "selection changed"
            );
            for listener in self.selection_observers.iter_mut() {
                listener(change, &view);
            }
        }
        if let Some(change) = &focus_change {
            for listener in self.focus_observers.iter_mut() {
                listener(change, &view);
            }
        }

        selection_change.is_some() || focus_change.is_some() || anchor_moved
    }

    /// Record newly selected cells in the history, anchor the newest of them
    /// when there is no anchor, and note when a cell walk leaves the anchor's
    /// row and column.
    fn track_history(&mut self, change: &SelectionChange) {
        let mut newest = None;
        for &pos in &change.added {
            if !self.selection.is_selected(pos) {
                continue;
            }
            self.history.record(pos);
            newest = Some(pos);
            if self.selection.granularity() == Granularity::Cell
                && !self.path_deviated
                && let Some(anchor) = self.anchor.get()
                && anchor.row != pos.row
                && anchor.column != pos.column
            {
                self.path_deviated = true;
            }
        }
        if !self.anchor.is_set()
            && let Some(pos) = newest
        {
            self.anchor.set(pos);
            self.anchor_moved = true;
            self.path_deviated = false;
        }
    }
}

impl<T: std::fmt::Debug, M: SelectionModel + std::fmt::Debug> std::fmt::Debug
    for SelectionEngine<T, M>
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SelectionEngine")
            .field("items", &self.items)
            .field("selection", &self.selection)
            .field("focus", &self.focus)
            .field("anchor", &self.anchor)
            .field("path_deviated", &self.path_deviated)
            .finish()
    }
}
