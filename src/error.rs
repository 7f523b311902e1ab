use thiserror::Error;

use crate::model::position::ColumnId;

/// Failures reported by the selection engine.
///
/// Rows or columns that are merely out of range are never errors; those
/// requests are ignored. Only contract violations by a collaborator end up
/// here.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    #[error("column {0} was never registered")]
    UnknownColumn(ColumnId),

    #[error("column {0} is already registered")]
    DuplicateColumn(ColumnId),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, SelectionError>;
