use std::fmt;

/// Identifier of a registered column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ColumnId(pub u32);

impl fmt::Display for ColumnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A row, or a single cell when `column` is set.
///
/// "No position" is expressed as `Option<Position>` by the holders
/// (focus, anchor) rather than as a sentinel row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub row: usize,
    pub column: Option<ColumnId>,
}

impl Position {
    /// A row-level position.
    pub const fn row(row: usize) -> Self {
        Self { row, column: None }
    }

    /// A cell-level position.
    pub const fn cell(row: usize, column: ColumnId) -> Self {
        Self {
            row,
            column: Some(column),
        }
    }

    pub fn is_cell(&self) -> bool {
        self.column.is_some()
    }

    /// Same column, different row.
    pub fn with_row(self, row: usize) -> Self {
        Self { row, ..self }
    }

    /// Same row, different column.
    pub fn with_column(self, column: Option<ColumnId>) -> Self {
        Self { column, ..self }
    }

    /// Drop the column, keeping the row.
    pub fn to_row(self) -> Self {
        Self::row(self.row)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.column {
            Some(column) => write!(f, "({}, {column})", self.row),
            None => write!(f, "({})", self.row),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_and_cell_positions_differ() {
        let row = Position::row(3);
        let cell = Position::cell(3, ColumnId(1));
        assert_ne!(row, cell);
        assert_eq!(cell.to_row(), row);
        assert!(cell.is_cell());
        assert!(!row.is_cell());
    }

    #[test]
    fn with_row_keeps_column() {
        let cell = Position::cell(2, ColumnId(4)).with_row(7);
        assert_eq!(cell, Position::cell(7, ColumnId(4)));
    }

    #[test]
    fn display_formats() {
        assert_eq!(Position::row(5).to_string(), "(5)");
        assert_eq!(Position::cell(5, ColumnId(2)).to_string(), "(5, #2)");
    }
}
