//! Error type shared by the store, the grid geometry and the drag identity helpers.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TimetableError {
    #[error("invalid day label: {0}")]
    InvalidDay(String),

    #[error("point ({x}, {y}) is outside the grid")]
    OutOfBounds { x: i32, y: i32 },

    #[error("invalid slot range: {0}")]
    InvalidRange(String),

    #[error("unknown table: {0}")]
    UnknownTable(String),

    #[error("table {0} is listed more than once")]
    DuplicateTable(String),

    #[error("invalid table id: {0:?}")]
    InvalidTableId(String),

    #[error("index {index} out of range for table {table} ({len} entries)")]
    IndexOutOfRange {
        table: String,
        index: usize,
        len: usize,
    },

    #[error("no entry {entry} in table {table}")]
    UnknownEntry { table: String, entry: u64 },

    #[error("malformed drag id: {0:?}")]
    MalformedDragId(String),
}

pub type Result<T> = std::result::Result<T, TimetableError>;
