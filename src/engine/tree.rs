use crate::model::items::ObservableList;
use crate::model::position::Position;
use crate::model::selection::SelectionModel;
use crate::msg::{Command, Modifiers, Step};

use super::{Outcome, SelectionEngine};

/// A row of a flattened tree: depth-first order, collapsed subtrees absent.
pub trait TreeRow {
    /// 0 for roots.
    fn depth(&self) -> usize;
    /// Whether the row can have children, loaded or not.
    fn is_branch(&self) -> bool;
    fn is_expanded(&self) -> bool;
}

impl<T: TreeRow, M: SelectionModel> SelectionEngine<T, M> {
    /// [`apply`](Self::apply) with left / right meaning collapse / expand.
    ///
    /// Left on an expanded branch and right on a collapsed one are returned
    /// to the caller as [`Outcome::Collapse`] / [`Outcome::Expand`] without
    /// touching any state; the caller owns the tree and reports the rows it
    /// removes or inserts through [`collapse_branch`](Self::collapse_branch)
    /// or [`mutate_items`](Self::mutate_items). Otherwise left goes to the
    /// parent row and right to the first child, like a line move.
    pub fn apply_tree(&mut self, command: Command, modifiers: Modifiers) -> Outcome {
        let Command::MoveAxis(step) = command else {
            return self.apply(command, modifiers);
        };
        let Some(row) = self.focus.focused_index() else {
            return self.apply(Command::MoveLine(step), modifiers);
        };
        let Some(item) = self.items.get(row) else {
            return Outcome::Unchanged;
        };

        let target = match step {
            Step::Back if item.is_branch() && item.is_expanded() => {
                return Outcome::Collapse(row);
            }
            Step::Back => self.parent_of(row),
            Step::Forward if item.is_branch() && !item.is_expanded() => {
                return Outcome::Expand(row);
            }
            Step::Forward => self.first_child_of(row),
        };
        if let Some(target) = target {
            self.navigate_to(target, modifiers);
        }
        self.finish(command, modifiers)
    }

    /// Nearest preceding row one level up.
    pub fn parent_of(&self, row: usize) -> Option<usize> {
        let depth = self.items.get(row)?.depth();
        (0..row).rev().find(|&r| self.items[r].depth() < depth)
    }

    pub fn first_child_of(&self, row: usize) -> Option<usize> {
        let depth = self.items.get(row)?.depth();
        let next = self.items.get(row + 1)?;
        (next.depth() > depth).then_some(row + 1)
    }

    /// Rows currently shown beneath `row`.
    pub fn descendants_of(&self, row: usize) -> std::ops::Range<usize> {
        let Some(item) = self.items.get(row) else {
            return row..row;
        };
        let depth = item.depth();
        let end = (row + 1..self.items.len())
            .find(|&r| self.items[r].depth() <= depth)
            .unwrap_or(self.items.len());
        row + 1..end
    }

    /// Collapse the branch at `row`. `f` updates the tree and removes the
    /// branch's visible descendants from the list; focus that was inside
    /// them moves up to the branch itself. Selection is only touched by the
    /// removal.
    pub fn collapse_branch<R>(&mut self, row: usize, f: impl FnOnce(&mut ObservableList<T>) -> R) -> R {
        let inside = self.descendants_of(row);
        let focus = self.focus.focused().filter(|p| inside.contains(&p.row));
        let len = self.items.len();
        let result = f(&mut self.items);
        self.replay_changes(len);
        if let Some(focus) = focus {
            self.focus.focus(Position { row, ..focus }, self.items.len());
        }
        tracing::debug!(row, hidden = inside.len(), "branch collapsed");
        self.deliver(false);
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::EngineOptions;
    use crate::model::columns::ColumnSet;
    use crate::model::mode::SelectionMode;

    #[derive(Debug, Clone, PartialEq)]
    struct Node {
        depth: usize,
        branch: bool,
        expanded: bool,
    }

    impl TreeRow for Node {
        fn depth(&self) -> usize {
            self.depth
        }
        fn is_branch(&self) -> bool {
            self.branch
        }
        fn is_expanded(&self) -> bool {
            self.expanded
        }
    }

    fn node(depth: usize, branch: bool, expanded: bool) -> Node {
        Node {
            depth,
            branch,
            expanded,
        }
    }

    // root
    //   a
    //     a1
    //     a2
    //   b
    fn tree() -> SelectionEngine<Node> {
        SelectionEngine::with_options(
            vec![
                node(0, true, true),
                node(1, true, true),
                node(2, false, false),
                node(2, false, false),
                node(1, true, false),
            ],
            ColumnSet::new(),
            EngineOptions {
                mode: SelectionMode::Multiple,
                ..EngineOptions::default()
            },
        )
    }

    #[test]
    fn left_on_leaf_goes_to_parent() {
        let mut e = tree();
        e.clear_and_select(Position::row(3)).unwrap();
        let outcome = e.apply_tree(Command::MoveAxis(Step::Back), Modifiers::NONE);
        assert_eq!(outcome, Outcome::Changed);
        assert_eq!(e.focused_index(), Some(1));
        assert_eq!(e.selected_indices(), vec![1]);
    }

    #[test]
    fn left_on_expanded_branch_asks_for_collapse() {
        let mut e = tree();
        e.clear_and_select(Position::row(1)).unwrap();
        let outcome = e.apply_tree(Command::MoveAxis(Step::Back), Modifiers::NONE);
        assert_eq!(outcome, Outcome::Collapse(1));
        assert_eq!(e.selected_indices(), vec![1]);
    }

    #[test]
    fn right_expands_then_descends() {
        let mut e = tree();
        e.clear_and_select(Position::row(4)).unwrap();
        assert_eq!(
            e.apply_tree(Command::MoveAxis(Step::Forward), Modifiers::NONE),
            Outcome::Expand(4)
        );

        e.clear_and_select(Position::row(1)).unwrap();
        e.apply_tree(Command::MoveAxis(Step::Forward), Modifiers::PRIMARY);
        assert_eq!(e.focused_index(), Some(2));
        assert_eq!(e.selected_indices(), vec![1]);
    }

    #[test]
    fn collapsing_pulls_focus_to_branch_without_selecting_it() {
        let mut e = tree();
        e.clear_and_select(Position::row(0)).unwrap();
        e.focus(Position::row(3)).unwrap();
        assert_eq!(e.descendants_of(1), 2..4);

        e.collapse_branch(1, |items| {
            items.remove_range(2..4);
        });
        assert_eq!(e.len(), 3);
        assert_eq!(e.focused_index(), Some(1));
        assert_eq!(e.selected_indices(), vec![0]);
    }
}
