mod common;

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use common::*;
use selgrid::{ColumnId, Command, Modifiers, Outcome, Position, SelectionEngine};

/// Counts selection and focus notifications.
fn counters(e: &mut SelectionEngine<String>) -> (Rc<Cell<usize>>, Rc<Cell<usize>>) {
    let selections = Rc::new(Cell::new(0));
    let focuses = Rc::new(Cell::new(0));
    let s = Rc::clone(&selections);
    e.on_selection_change(move |_, _| s.set(s.get() + 1));
    let f = Rc::clone(&focuses);
    e.on_focus_change(move |_, _| f.set(f.get() + 1));
    (selections, focuses)
}

#[test]
fn insert_before_selection_shifts_it() {
    let mut e = list(10);
    e.clear_and_select(Position::row(5)).unwrap();
    e.mutate_items(|items| items.insert(2, "new".to_string()));
    assert_eq!(e.len(), 11);
    assert_eq!(e.selected_indices(), vec![6]);
    assert_eq!(e.focused_index(), Some(6));
    assert_eq!(e.focused_item().map(String::as_str), Some("Row 5"));
}

#[test]
fn insert_after_selection_changes_nothing_observable() {
    let mut e = list(10);
    e.clear_and_select(Position::row(2)).unwrap();
    let (selections, focuses) = counters(&mut e);
    e.mutate_items(|items| items.push("tail".to_string()));
    assert_eq!(e.selected_indices(), vec![2]);
    assert_eq!(selections.get(), 0);
    assert_eq!(focuses.get(), 0);
}

#[test]
fn removing_focused_row_hands_focus_to_successor() {
    let mut e = list(5);
    e.clear_and_select(Position::row(3)).unwrap();
    let removed = e.mutate_items(|items| items.remove(3));
    assert_eq!(removed.as_deref(), Some("Row 3"));
    assert!(e.selected_indices().is_empty());
    assert_eq!(e.focused_index(), Some(3));
    assert_eq!(e.focused_item().map(String::as_str), Some("Row 4"));

    let mut e = list(5);
    e.clear_and_select(Position::row(4)).unwrap();
    e.mutate_items(|items| items.remove(4));
    assert_eq!(e.focused_index(), Some(3));
}

#[test]
fn removing_rows_above_shifts_selection_down() {
    let mut e = list(10);
    e.clear_and_select(Position::row(6)).unwrap();
    e.apply(DOWN, Modifiers::SHIFT);
    e.mutate_items(|items| {
        items.remove_range(1..3);
    });
    assert_eq!(selected(&e), vec![4, 5]);
    assert_eq!(e.focused_index(), Some(5));
}

#[test]
fn sort_moves_selection_with_items() {
    let mut e = list(10);
    e.clear_and_select(Position::row(2)).unwrap();
    e.mutate_items(|items| items.sort_by(|a, b| b.cmp(a)));
    assert_eq!(e.selected_indices(), vec![7]);
    assert_eq!(e.focused_index(), Some(7));
    assert_eq!(anchor_row(&e), Some(7));
    assert_eq!(e.focused_item().map(String::as_str), Some("Row 2"));
}

#[test]
fn updating_a_selected_row_deselects_it() {
    let mut e = list(6);
    e.clear_and_select(Position::row(1)).unwrap();
    press(&mut e, DOWN, Modifiers::SHIFT, 2);
    let (selections, _) = counters(&mut e);

    e.mutate_items(|items| items.set(2, "Row 2".to_string()));
    assert_eq!(selections.get(), 0);

    e.mutate_items(|items| items.set(2, "changed".to_string()));
    assert_eq!(selected(&e), vec![1, 3]);
    assert_eq!(e.focused_index(), Some(3));
    assert_eq!(selections.get(), 1);
}

#[test]
fn set_all_keeps_retained_rows() {
    let mut e = list(5);
    e.clear_and_select(Position::row(0)).unwrap();
    e.apply(Command::MoveEnd, Modifiers::PRIMARY);
    e.apply(Command::ToggleAtFocus, Modifiers::PRIMARY);
    assert_eq!(selected(&e), vec![0, 4]);

    let mut next = rows(5);
    next[4] = "replaced".to_string();
    e.mutate_items(|items| items.set_all(next));
    assert_eq!(e.selected_indices(), vec![0]);
    assert_eq!(e.focused_index(), Some(0));
    assert_eq!(e.anchor(), None);
}

#[test]
fn emptying_the_list_resets_everything() {
    let mut e = list(4);
    e.clear_and_select(Position::row(1)).unwrap();
    e.mutate_items(|items| items.clear());
    assert!(e.is_empty());
    assert!(e.selected_indices().is_empty());
    assert_eq!(e.focused(), None);
    assert_eq!(e.anchor(), None);
    assert_eq!(e.apply(DOWN, Modifiers::NONE), Outcome::Unchanged);
    assert_eq!(e.apply(Command::SelectAll, Modifiers::PRIMARY), Outcome::Unchanged);
}

#[test]
fn one_notification_per_batch() {
    let mut e = list(10);
    e.clear_and_select(Position::row(0)).unwrap();
    let (selections, focuses) = counters(&mut e);

    e.apply(Command::MoveEnd, Modifiers::SHIFT);
    assert_eq!(selections.get(), 1);
    assert_eq!(focuses.get(), 1);

    e.mutate_items(|items| {
        items.insert(0, "a".to_string());
        items.insert(0, "b".to_string());
        items.remove(5);
    });
    assert_eq!(selections.get(), 2);
    assert_eq!(focuses.get(), 2);

    e.select_all();
    assert_eq!(selections.get(), 3);
}

#[test]
fn no_op_commands_are_silent() {
    let mut e = list(5);
    e.clear_and_select(Position::row(0)).unwrap();
    let (selections, focuses) = counters(&mut e);

    assert_eq!(e.apply(UP, Modifiers::NONE), Outcome::Unchanged);
    assert_eq!(e.apply(UP, Modifiers::SHIFT), Outcome::Unchanged);
    assert_eq!(e.apply(Command::MoveHome, Modifiers::NONE), Outcome::Unchanged);
    assert!(!e.clear_and_select(Position::row(0)).unwrap());
    assert!(!e.select(Position::row(17)).unwrap());
    e.mutate_items(|_| ());
    assert_eq!(selections.get(), 0);
    assert_eq!(focuses.get(), 0);
}

#[test]
fn add_then_remove_in_one_batch_cancels() {
    let mut e = list(5);
    e.clear_and_select(Position::row(2)).unwrap();
    let (selections, _) = counters(&mut e);
    assert_eq!(
        e.apply(Command::ToggleAtFocus, Modifiers::SHIFT),
        Outcome::Unchanged
    );
    assert_eq!(selections.get(), 0);
}

#[test]
fn listener_sees_applied_state_and_owned_lists() {
    let mut e = list(5);
    e.clear_and_select(Position::row(1)).unwrap();
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    e.on_selection_change(move |change, view| {
        let mut log = sink.borrow_mut();
        for row in change.removed_rows() {
            log.push(format!("-{row}"));
        }
        for row in change.added_rows() {
            log.push(format!("+{row}"));
        }
        log.push(format!("focus {:?}", view.focused_index()));
        log.push(format!("items {:?}", view.selected_items()));
        assert_eq!(change.selected_indices, view.selected_indices());
    });

    e.apply(DOWN, Modifiers::NONE);
    assert_eq!(
        *seen.borrow(),
        vec!["-1", "+2", "focus Some(2)", "items [\"Row 2\"]"]
    );
}

#[test]
fn focus_change_reports_both_ends() {
    let mut e = list(5);
    e.clear_and_select(Position::row(1)).unwrap();
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    e.on_focus_change(move |change, _| sink.borrow_mut().push((change.previous, change.current)));

    e.apply(Command::MoveEnd, Modifiers::PRIMARY);
    e.clear_focus();
    assert_eq!(
        *seen.borrow(),
        vec![
            (Some(Position::row(1)), Some(Position::row(4))),
            (Some(Position::row(4)), None),
        ]
    );
}

#[test]
fn unsubscribed_listeners_stay_quiet() {
    let mut e = list(5);
    let hits = Rc::new(Cell::new(0));
    let h = Rc::clone(&hits);
    let key = e.on_selection_change(move |_, _| h.set(h.get() + 1));

    e.clear_and_select(Position::row(0)).unwrap();
    assert!(e.unsubscribe(key));
    assert!(!e.unsubscribe(key));
    e.apply(DOWN, Modifiers::NONE);
    assert_eq!(hits.get(), 1);
}

#[test]
fn hiding_focused_column_moves_focus_and_anchor() {
    let mut e = table(5, 3);
    e.clear_and_select(cell(1, 1)).unwrap();
    let (selections, focuses) = counters(&mut e);

    assert!(e.set_column_visible(ColumnId(1), false).unwrap());
    assert!(e.selected_cells().is_empty());
    assert_eq!(e.focused().map(|p| p.row), Some(1));
    assert_ne!(e.focused().and_then(|p| p.column), Some(ColumnId(1)));
    assert_ne!(e.anchor().and_then(|p| p.column), Some(ColumnId(1)));
    assert_eq!(selections.get(), 1);
    assert_eq!(focuses.get(), 1);

    assert!(!e.set_column_visible(ColumnId(1), false).unwrap());
    assert!(e.set_column_visible(ColumnId(9), true).is_err());
}

#[test]
fn removed_column_becomes_unknown() {
    let mut e = table(5, 3);
    e.clear_and_select(cell(0, 2)).unwrap();
    e.remove_column(ColumnId(2)).unwrap();
    assert!(e.selected_cells().is_empty());
    assert!(e.select(cell(0, 2)).is_err());

    e.add_column(ColumnId(2), "again").unwrap();
    assert!(e.add_column(ColumnId(2), "twice").is_err());
    assert!(e.select(cell(0, 2)).unwrap());
}
