//! Forward-rate volatility grid.
//!
//! - [`TimeGrid`]: integer expiry/tenor discretisation and bucket breaks
//! - [`TriangularLayout`]: `(row, col) -> offset` mapping for triangular arenas
//! - [`InterestRateVolatilities`]: per-cell factor-loading vectors

mod grid;
mod time_grid;

pub use grid::InterestRateVolatilities;
pub use time_grid::{TimeGrid, TriangularLayout};
