use serde::Deserialize;

/// How many positions may be selected at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionMode {
    /// At most one position.
    #[default]
    Single,
    /// Any number of positions.
    Multiple,
}

/// Whether selection tracks whole rows or individual cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Granularity {
    #[default]
    Row,
    Cell,
}

impl SelectionMode {
    pub fn label(&self) -> &'static str {
        match self {
            SelectionMode::Single => "SINGLE",
            SelectionMode::Multiple => "MULTIPLE",
        }
    }
}

impl Granularity {
    pub fn label(&self) -> &'static str {
        match self {
            Granularity::Row => "ROW",
            Granularity::Cell => "CELL",
        }
    }
}
