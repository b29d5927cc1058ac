//! Data model for tabular data representation

mod grid;
mod schema;
mod table;

pub use grid::Grid;
pub use schema::Column;
pub use table::{CellValue, Row, Table};
