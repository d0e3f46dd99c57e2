pub mod grid;

pub use grid::{CellGrid, GridError, Region};
