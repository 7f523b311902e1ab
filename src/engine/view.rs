use crate::model::position::Position;
use crate::model::selection::SelectionModel;

/// Read-only view of fully applied engine state, handed to listeners.
pub struct SelectionView<'a, T> {
    items: &'a [T],
    selection: &'a dyn SelectionModel,
    focus: Option<Position>,
    anchor: Option<Position>,
}

impl<'a, T> SelectionView<'a, T> {
    pub(crate) fn new(
        items: &'a [T],
        selection: &'a dyn SelectionModel,
        focus: Option<Position>,
        anchor: Option<Position>,
    ) -> Self {
        Self {
            items,
            selection,
            focus,
            anchor,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> &'a [T] {
        self.items
    }

    pub fn is_selected(&self, pos: Position) -> bool {
        self.selection.is_selected(pos)
    }

    pub fn selected_indices(&self) -> Vec<usize> {
        self.selection.selected_indices()
    }

    pub fn selected_items(&self) -> Vec<&'a T> {
        let items = self.items;
        self.selection
            .selected_indices()
            .into_iter()
            .filter_map(|row| items.get(row))
            .collect()
    }

    pub fn selected_cells(&self) -> &'a [Position] {
        self.selection.selected_cells()
    }

    pub fn focused(&self) -> Option<Position> {
        self.focus
    }

    pub fn focused_index(&self) -> Option<usize> {
        self.focus.map(|p| p.row)
    }

    pub fn focused_item(&self) -> Option<&'a T> {
        self.items.get(self.focus?.row)
    }

    pub fn anchor(&self) -> Option<Position> {
        self.anchor
    }
}
