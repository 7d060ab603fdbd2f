//! Mathematical building blocks.
//!
//! - `vector`: dense small-vector arithmetic (dot products, accumulation,
//!   in-place scaling) used on per-cell factor-loading vectors

pub mod vector;
