#![allow(dead_code)]

use selgrid::{
    ColumnId, ColumnSet, Command, EngineOptions, Granularity, Modifiers, Position,
    SelectionEngine, SelectionMode, Step,
};

pub const UP: Command = Command::MoveLine(Step::Back);
pub const DOWN: Command = Command::MoveLine(Step::Forward);
pub const LEFT: Command = Command::MoveAxis(Step::Back);
pub const RIGHT: Command = Command::MoveAxis(Step::Forward);

pub fn rows(len: usize) -> Vec<String> {
    (0..len).map(|i| format!("Row {i}")).collect()
}

/// Multiple selection over `len` rows.
pub fn list(len: usize) -> SelectionEngine<String> {
    list_with_mode(len, SelectionMode::Multiple)
}

pub fn list_with_mode(len: usize, mode: SelectionMode) -> SelectionEngine<String> {
    SelectionEngine::with_options(
        rows(len),
        ColumnSet::new(),
        EngineOptions {
            mode,
            ..EngineOptions::default()
        },
    )
}

/// Multiple cell selection over `len` rows and `columns` columns.
pub fn table(len: usize, columns: u32) -> SelectionEngine<String> {
    SelectionEngine::with_options(
        rows(len),
        ColumnSet::from_titles((0..columns).map(|c| format!("col{c}"))),
        EngineOptions {
            mode: SelectionMode::Multiple,
            granularity: Granularity::Cell,
            ..EngineOptions::default()
        },
    )
}

pub fn cell(row: usize, column: u32) -> Position {
    Position::cell(row, ColumnId(column))
}

pub fn press(engine: &mut SelectionEngine<String>, command: Command, modifiers: Modifiers, times: usize) {
    for _ in 0..times {
        engine.apply(command, modifiers);
    }
}

/// Selected rows in ascending order.
pub fn selected(engine: &SelectionEngine<String>) -> Vec<usize> {
    let mut rows = engine.selected_indices();
    rows.sort_unstable();
    rows
}

pub fn anchor_row(engine: &SelectionEngine<String>) -> Option<usize> {
    engine.anchor().map(|a| a.row)
}
