use crate::error::{Result, SelectionError};

use super::position::ColumnId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub id: ColumnId,
    pub title: String,
    pub visible: bool,
}

/// Ordered set of registered columns, some possibly hidden.
///
/// Horizontal navigation only ever sees the visible columns, in order.
#[derive(Debug, Clone, Default)]
pub struct ColumnSet {
    columns: Vec<Column>,
}

impl ColumnSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a set of visible columns with sequential ids starting at 0.
    pub fn from_titles<I, S>(titles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let columns = titles
            .into_iter()
            .enumerate()
            .map(|(i, title)| Column {
                id: ColumnId(i as u32),
                title: title.into(),
                visible: true,
            })
            .collect();
        Self { columns }
    }

    pub fn add(&mut self, id: ColumnId, title: impl Into<String>) -> Result<()> {
        if self.contains(id) {
            return Err(SelectionError::DuplicateColumn(id));
        }
        self.columns.push(Column {
            id,
            title: title.into(),
            visible: true,
        });
        Ok(())
    }

    pub fn remove(&mut self, id: ColumnId) -> Result<Column> {
        let idx = self.position_of(id)?;
        Ok(self.columns.remove(idx))
    }

    /// Returns whether visibility changed.
    pub fn set_visible(&mut self, id: ColumnId, visible: bool) -> Result<bool> {
        let idx = self.position_of(id)?;
        let column = &mut self.columns[idx];
        if column.visible == visible {
            return Ok(false);
        }
        column.visible = visible;
        Ok(true)
    }

    /// Move a column to `to` within the full (visible and hidden) order.
    pub fn move_to(&mut self, id: ColumnId, to: usize) -> Result<()> {
        let idx = self.position_of(id)?;
        let column = self.columns.remove(idx);
        let to = to.min(self.columns.len());
        self.columns.insert(to, column);
        Ok(())
    }

    pub fn contains(&self, id: ColumnId) -> bool {
        self.columns.iter().any(|c| c.id == id)
    }

    pub fn get(&self, id: ColumnId) -> Option<&Column> {
        self.columns.iter().find(|c| c.id == id)
    }

    pub fn is_visible(&self, id: ColumnId) -> bool {
        self.get(id).is_some_and(|c| c.visible)
    }

    /// Fail if `id` was never registered.
    pub fn check(&self, id: ColumnId) -> Result<()> {
        self.position_of(id).map(|_| ())
    }

    pub fn visible(&self) -> Vec<ColumnId> {
        self.columns
            .iter()
            .filter(|c| c.visible)
            .map(|c| c.id)
            .collect()
    }

    pub fn visible_len(&self) -> usize {
        self.columns.iter().filter(|c| c.visible).count()
    }

    pub fn visible_index(&self, id: ColumnId) -> Option<usize> {
        self.columns
            .iter()
            .filter(|c| c.visible)
            .position(|c| c.id == id)
    }

    pub fn visible_at(&self, index: usize) -> Option<ColumnId> {
        self.columns
            .iter()
            .filter(|c| c.visible)
            .nth(index)
            .map(|c| c.id)
    }

    /// Visible column `delta` steps away from `id`, if any.
    pub fn step(&self, id: ColumnId, delta: isize) -> Option<ColumnId> {
        let idx = self.visible_index(id)?.checked_add_signed(delta)?;
        self.visible_at(idx)
    }

    /// Closest visible column to where `id` sits in the full order,
    /// preferring the ones after it. Used when `id` becomes hidden.
    pub fn nearest_visible(&self, id: ColumnId) -> Option<ColumnId> {
        let idx = self.columns.iter().position(|c| c.id == id)?;
        let after = self.columns[idx + 1..].iter().find(|c| c.visible);
        let before = self.columns[..idx].iter().rev().find(|c| c.visible);
        after.or(before).map(|c| c.id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Column> {
        self.columns.iter()
    }

    fn position_of(&self, id: ColumnId) -> Result<usize> {
        self.columns
            .iter()
            .position(|c| c.id == id)
            .ok_or(SelectionError::UnknownColumn(id))
    }
}
