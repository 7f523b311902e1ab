use std::collections::HashSet;
use std::ops::Range;

use smallvec::SmallVec;

use super::mode::{Granularity, SelectionMode};
use super::position::{ColumnId, Position};

pub type Positions = SmallVec<[Position; 4]>;

/// One batched membership change.
///
/// The lists are owned by the record, so a listener can walk `removed`
/// and then `added` (or the other way round) regardless of what happens to
/// the store afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionChange {
    pub added: Positions,
    pub removed: Positions,
    /// Selected rows after the change, in selection order.
    pub selected_indices: Vec<usize>,
}

impl SelectionChange {
    pub fn added_rows(&self) -> impl Iterator<Item = usize> + '_ {
        self.added.iter().map(|p| p.row)
    }

    pub fn removed_rows(&self) -> impl Iterator<Item = usize> + '_ {
        self.removed.iter().map(|p| p.row)
    }
}

/// Selection capability consumed by the engine.
///
/// [`SelectionStore`] is the default implementation; an alternative model can
/// be swapped in as long as it keeps the same observable behaviour. Mutators
/// return whether membership changed, and out-of-range positions are ignored.
pub trait SelectionModel {
    fn mode(&self) -> SelectionMode;
    fn set_mode(&mut self, mode: SelectionMode);
    fn granularity(&self) -> Granularity;
    fn set_granularity(&mut self, granularity: Granularity);

    /// Adds `pos`; in single mode it replaces the current selection.
    fn select(&mut self, pos: Position) -> bool;
    fn deselect(&mut self, pos: Position) -> bool;
    fn clear_and_select(&mut self, pos: Position) -> bool;
    /// Selects `rows`, restricted to `column` in cell granularity.
    fn select_range(&mut self, rows: Range<usize>, column: Option<ColumnId>) -> bool;
    /// Selects every row or cell. Single mode leaves this to the caller.
    fn select_all(&mut self) -> bool;
    fn clear_selection(&mut self) -> bool;

    fn toggle(&mut self, pos: Position) -> bool {
        if self.is_selected(pos) {
            self.deselect(pos)
        } else {
            self.select(pos)
        }
    }

    fn is_selected(&self, pos: Position) -> bool;
    fn selected_cells(&self) -> &[Position];
    fn selected_indices(&self) -> Vec<usize>;

    fn len(&self) -> usize {
        self.selected_cells().len()
    }

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Change accumulated since the last call, if membership moved.
    fn take_change(&mut self) -> Option<SelectionChange>;

    /// Current row count and visible columns.
    fn set_bounds(&mut self, rows: usize, columns: &[ColumnId]);

    /// Rewrite every member through `f`; `None` drops it. Used for index
    /// shifts after collection or column mutation.
    fn remap(&mut self, f: &mut dyn FnMut(Position) -> Option<Position>);
}

/// Default [`SelectionModel`]: members kept in selection order.
#[derive(Debug, Clone, Default)]
pub struct SelectionStore {
    mode: SelectionMode,
    granularity: Granularity,
    members: Vec<Position>,
    lookup: HashSet<Position>,
    rows: usize,
    columns: Vec<ColumnId>,
    pending: Pending,
}

/// Membership delta of the open batch. An opposite change cancels an entry
/// through the sets; the stale list slot is dropped on drain.
#[derive(Debug, Clone, Default)]
struct Pending {
    added: Vec<Position>,
    removed: Vec<Position>,
    added_set: HashSet<Position>,
    removed_set: HashSet<Position>,
}

impl Pending {
    fn record_added(&mut self, pos: Position) {
        if !self.removed_set.remove(&pos) && self.added_set.insert(pos) {
            self.added.push(pos);
        }
    }

    fn record_removed(&mut self, pos: Position) {
        if !self.added_set.remove(&pos) && self.removed_set.insert(pos) {
            self.removed.push(pos);
        }
    }

    fn drain(self) -> (Positions, Positions) {
        let Pending {
            added,
            removed,
            mut added_set,
            mut removed_set,
        } = self;
        let added = added.into_iter().filter(|p| added_set.remove(p)).collect();
        let removed = removed
            .into_iter()
            .filter(|p| removed_set.remove(p))
            .collect();
        (added, removed)
    }
}

impl SelectionStore {
    pub fn new(mode: SelectionMode, granularity: Granularity) -> Self {
        Self {
            mode,
            granularity,
            ..Self::default()
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> &[ColumnId] {
        &self.columns
    }

    /// Most recently selected position still in the store.
    pub fn last_selected(&self) -> Option<Position> {
        self.members.last().copied()
    }

    fn in_bounds(&self, pos: Position) -> bool {
        if pos.row >= self.rows {
            return false;
        }
        match (self.granularity, pos.column) {
            (Granularity::Cell, Some(column)) => self.columns.contains(&column),
            _ => true,
        }
    }

    /// Concrete members `pos` stands for under the current granularity.
    fn expand(&self, pos: Position) -> SmallVec<[Position; 8]> {
        if !self.in_bounds(pos) {
            return SmallVec::new();
        }
        match (self.granularity, pos.column) {
            (Granularity::Row, _) => smallvec::smallvec![pos.to_row()],
            (Granularity::Cell, Some(_)) => smallvec::smallvec![pos],
            (Granularity::Cell, None) => self
                .columns
                .iter()
                .map(|&column| Position::cell(pos.row, column))
                .collect(),
        }
    }

    fn insert(&mut self, pos: Position) -> bool {
        if !self.lookup.insert(pos) {
            return false;
        }
        self.members.push(pos);
        self.pending.record_added(pos);
        true
    }

    fn remove(&mut self, pos: Position) -> bool {
        if !self.lookup.remove(&pos) {
            return false;
        }
        self.members.retain(|p| *p != pos);
        self.pending.record_removed(pos);
        true
    }

    /// Drops every member not in `keep` in a single pass over the store.
    fn remove_all_except(&mut self, keep: &[Position]) -> bool {
        let before = self.members.len();
        let Self {
            members,
            lookup,
            pending,
            ..
        } = self;
        members.retain(|&pos| {
            if keep.contains(&pos) {
                return true;
            }
            lookup.remove(&pos);
            pending.record_removed(pos);
            false
        });
        self.members.len() != before
    }
}

impl SelectionModel for SelectionStore {
    fn mode(&self) -> SelectionMode {
        self.mode
    }

    fn set_mode(&mut self, mode: SelectionMode) {
        if self.mode == mode {
            return;
        }
        self.mode = mode;
        if mode == SelectionMode::Single
            && let Some(last) = self.last_selected()
        {
            self.remove_all_except(&[last]);
        }
    }

    fn granularity(&self) -> Granularity {
        self.granularity
    }

    fn set_granularity(&mut self, granularity: Granularity) {
        if self.granularity == granularity {
            return;
        }
        self.clear_selection();
        self.granularity = granularity;
    }

    fn select(&mut self, pos: Position) -> bool {
        let targets = self.expand(pos);
        if targets.is_empty() {
            return false;
        }
        match self.mode {
            SelectionMode::Single => {
                // One member only: a whole-row request in cell granularity
                // lands on its first visible cell.
                let target = targets[0];
                let removed = self.remove_all_except(&[target]);
                self.insert(target) || removed
            }
            SelectionMode::Multiple => {
                let mut changed = false;
                for target in targets {
                    changed |= self.insert(target);
                }
                changed
            }
        }
    }

    fn deselect(&mut self, pos: Position) -> bool {
        match (self.granularity, pos.column) {
            (Granularity::Row, _) => self.remove(pos.to_row()),
            (Granularity::Cell, Some(_)) => self.remove(pos),
            (Granularity::Cell, None) => {
                let row: Vec<Position> = self
                    .members
                    .iter()
                    .copied()
                    .filter(|p| p.row == pos.row)
                    .collect();
                let mut changed = false;
                for p in row {
                    changed |= self.remove(p);
                }
                changed
            }
        }
    }

    fn clear_and_select(&mut self, pos: Position) -> bool {
        let mut targets = self.expand(pos);
        if targets.is_empty() {
            return false;
        }
        if self.mode == SelectionMode::Single {
            targets.truncate(1);
        }
        let mut changed = self.remove_all_except(&targets);
        for target in targets {
            changed |= self.insert(target);
        }
        changed
    }

    fn select_range(&mut self, rows: Range<usize>, column: Option<ColumnId>) -> bool {
        let end = rows.end.min(self.rows);
        if rows.start >= end {
            return false;
        }
        if self.mode == SelectionMode::Single {
            return self.select(Position {
                row: end - 1,
                column,
            });
        }
        let mut changed = false;
        for row in rows.start..end {
            changed |= self.select(Position { row, column });
        }
        changed
    }

    fn select_all(&mut self) -> bool {
        if self.mode == SelectionMode::Single {
            return false;
        }
        self.select_range(0..self.rows, None)
    }

    fn clear_selection(&mut self) -> bool {
        self.remove_all_except(&[])
    }

    fn is_selected(&self, pos: Position) -> bool {
        match (self.granularity, pos.column) {
            (Granularity::Row, _) => self.lookup.contains(&pos.to_row()),
            (Granularity::Cell, Some(_)) => self.lookup.contains(&pos),
            (Granularity::Cell, None) => self.members.iter().any(|p| p.row == pos.row),
        }
    }

    fn selected_cells(&self) -> &[Position] {
        &self.members
    }

    fn selected_indices(&self) -> Vec<usize> {
        let mut seen = HashSet::new();
        self.members
            .iter()
            .map(|p| p.row)
            .filter(|row| seen.insert(*row))
            .collect()
    }

    fn take_change(&mut self) -> Option<SelectionChange> {
        let (added, removed) = std::mem::take(&mut self.pending).drain();
        if added.is_empty() && removed.is_empty() {
            return None;
        }
        Some(SelectionChange {
            added,
            removed,
            selected_indices: self.selected_indices(),
        })
    }

    fn set_bounds(&mut self, rows: usize, columns: &[ColumnId]) {
        self.rows = rows;
        self.columns = columns.to_vec();
    }

    fn remap(&mut self, f: &mut dyn FnMut(Position) -> Option<Position>) {
        let old = std::mem::take(&mut self.members);
        let mut next = Vec::with_capacity(old.len());
        let mut next_lookup = HashSet::with_capacity(old.len());
        for pos in &old {
            if let Some(moved) = f(*pos)
                && self.in_bounds(moved)
                && next_lookup.insert(moved)
            {
                next.push(moved);
            }
        }

        for &pos in old.iter().filter(|p| !next_lookup.contains(p)) {
            self.pending.record_removed(pos);
        }
        for &pos in next.iter().filter(|p| !self.lookup.contains(p)) {
            self.pending.record_added(pos);
        }

        self.members = next;
        self.lookup = next_lookup;
    }
}
