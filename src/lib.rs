pub mod data;
pub mod error;
pub mod grid;
pub mod ui;

pub use error::{Result, TimetableError};
