//! Triangular grid of factor-loading vectors.

use pricer_core::math::vector::{axpy, dot, fill_zero, norm, scale_in_place, zeros};

use super::time_grid::{TimeGrid, TriangularLayout};
use crate::calibration::InstrumentWeights;
use crate::error::ModelError;

/// Instantaneous forward-rate volatilities as per-cell factor loadings.
///
/// Row `i` is the zero-based volatility period and holds `MaxTenor - i`
/// cells. Cell `(i, col)` is the loading vector, of length `factors`, of
/// forward `i + col` during period `i`. All cells live in one flat buffer
/// addressed through a [`TriangularLayout`].
///
/// Cells are never resized. After construction they change only through
/// [`scale`](Self::scale) or [`set_cell`](Self::set_cell).
///
/// # Examples
///
/// ```
/// use pricer_models::volatility::{InterestRateVolatilities, TimeGrid};
///
/// let grid = TimeGrid::uniform(2, 2).unwrap();
/// let mut vols = InterestRateVolatilities::from_cells(&grid, 1, |_, _| vec![0.2]).unwrap();
/// vols.scale(0, 0, 1.25);
/// assert!((vols.cell(0, 0)[0] - 0.25).abs() < 1e-15);
/// assert_eq!(vols.row_len(1), 1);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct InterestRateVolatilities {
    layout: TriangularLayout,
    max_tenor: usize,
    factors: usize,
    data: Vec<f64>,
}

impl InterestRateVolatilities {
    /// Grid of zero loadings.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::InvalidFactorCount`] if `factors == 0`.
    pub fn zeros(grid: &TimeGrid, factors: usize) -> Result<Self, ModelError> {
        if factors == 0 {
            return Err(ModelError::invalid_factor_count(1, 0));
        }
        let layout = grid.layout();
        let data = zeros(layout.len() * factors);
        Ok(Self {
            layout,
            max_tenor: grid.max_tenor(),
            factors,
            data,
        })
    }

    /// Grid populated cell by cell.
    ///
    /// `loading(row, col)` is called once per cell in row-major order.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::InvalidFactorCount`] if `factors == 0` or a
    /// returned vector does not have `factors` components.
    pub fn from_cells<F>(grid: &TimeGrid, factors: usize, mut loading: F) -> Result<Self, ModelError>
    where
        F: FnMut(usize, usize) -> Vec<f64>,
    {
        let mut vols = Self::zeros(grid, factors)?;
        for row in 0..vols.rows() {
            for col in 0..vols.row_len(row) {
                vols.set_cell(row, col, &loading(row, col))?;
            }
        }
        Ok(vols)
    }

    /// Piecewise-constant grid from per-bucket loading vectors.
    ///
    /// `loadings[e][t]` is the loading of every cell whose period falls in
    /// expiry bucket `e` and whose tenor offset falls in tenor bucket `t`.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::ShapeMismatch`] if the table does not have
    /// `expiry_count x tenor_count` entries, or
    /// [`ModelError::InvalidFactorCount`] if the vectors differ in length.
    pub fn from_bucket_loadings(
        grid: &TimeGrid,
        loadings: &[Vec<Vec<f64>>],
    ) -> Result<Self, ModelError> {
        if loadings.len() != grid.expiry_count() {
            return Err(ModelError::shape_mismatch(format!(
                "expected {} expiry buckets of loadings, got {}",
                grid.expiry_count(),
                loadings.len()
            )));
        }
        if let Some((e, row)) = loadings
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() != grid.tenor_count())
        {
            return Err(ModelError::shape_mismatch(format!(
                "expiry bucket {} has {} tenor buckets, expected {}",
                e,
                row.len(),
                grid.tenor_count()
            )));
        }

        let factors = loadings
            .first()
            .and_then(|row| row.first())
            .map_or(0, Vec::len);
        let mut vols = Self::zeros(grid, factors)?;
        for row in 0..vols.rows() {
            for col in 0..vols.row_len(row) {
                let (e, t) = match (grid.expiry_bucket(row), grid.tenor_bucket(col)) {
                    (Some(e), Some(t)) => (e, t),
                    _ => {
                        return Err(ModelError::shape_mismatch(format!(
                            "cell ({}, {}) has no bucket",
                            row, col
                        )))
                    }
                };
                vols.set_cell(row, col, &loadings[e][t])?;
            }
        }
        Ok(vols)
    }

    #[inline]
    fn offset(&self, row: usize, col: usize) -> usize {
        match self.layout.index(row, col) {
            Some(index) => index * self.factors,
            None => panic!(
                "cell ({}, {}) outside the volatility grid ({} rows, max tenor {})",
                row,
                col,
                self.rows(),
                self.max_tenor
            ),
        }
    }

    /// Number of rows (`MaxExpiry`).
    #[inline]
    pub fn rows(&self) -> usize {
        self.layout.rows()
    }

    /// Number of cells in `row` (`MaxTenor - row`).
    #[inline]
    pub fn row_len(&self, row: usize) -> usize {
        self.layout.row_len(row)
    }

    /// Number of forwards the grid was built for.
    #[inline]
    pub fn max_tenor(&self) -> usize {
        self.max_tenor
    }

    /// Length of every loading vector.
    #[inline]
    pub fn factors(&self) -> usize {
        self.factors
    }

    /// Returns `true` if the grid has the shape `grid` describes.
    pub fn matches_grid(&self, grid: &TimeGrid) -> bool {
        self.rows() == grid.max_expiry() && self.max_tenor == grid.max_tenor()
    }

    /// Loading vector of cell `(row, col)`.
    ///
    /// # Panics
    ///
    /// Panics if the cell lies outside the triangular grid.
    #[inline]
    pub fn cell(&self, row: usize, col: usize) -> &[f64] {
        let start = self.offset(row, col);
        &self.data[start..start + self.factors]
    }

    /// Overwrites cell `(row, col)`.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::InvalidFactorCount`] if `loading` has the wrong
    /// length.
    ///
    /// # Panics
    ///
    /// Panics if the cell lies outside the triangular grid.
    pub fn set_cell(&mut self, row: usize, col: usize, loading: &[f64]) -> Result<(), ModelError> {
        if loading.len() != self.factors {
            return Err(ModelError::invalid_factor_count(self.factors, loading.len()));
        }
        let start = self.offset(row, col);
        self.data[start..start + self.factors].copy_from_slice(loading);
        Ok(())
    }

    /// Multiplies every component of cell `(row, col)` by `factor`.
    ///
    /// # Panics
    ///
    /// Panics if the cell lies outside the triangular grid.
    #[inline]
    pub fn scale(&mut self, row: usize, col: usize, factor: f64) {
        let start = self.offset(row, col);
        scale_in_place(&mut self.data[start..start + self.factors], factor);
    }

    /// Euclidean size of cell `(row, col)`: the scalar volatility of that
    /// forward in that period.
    #[inline]
    pub fn cell_norm(&self, row: usize, col: usize) -> f64 {
        norm(self.cell(row, col))
    }

    /// Cell sizes row by row.
    pub fn norm_surface(&self) -> Vec<Vec<f64>> {
        (0..self.rows())
            .map(|row| (0..self.row_len(row)).map(|col| self.cell_norm(row, col)).collect())
            .collect()
    }

    /// Returns `true` if every component of every cell is finite.
    pub fn is_finite(&self) -> bool {
        self.data.iter().all(|v| v.is_finite())
    }

    /// Model implied volatility of the instrument `(expiry, tenor)`.
    ///
    /// Projects each period's cells onto the instrument with the frozen
    /// weights and averages the resulting variance over the expiry:
    ///
    /// ```text
    /// sigma^2 = sum_i | sum_j W_j cell(i, j + exp - i) |^2 / expiry
    /// ```
    ///
    /// # Panics
    ///
    /// Panics if `(expiry, tenor)` lies outside the grid.
    pub fn implied_volatility<W>(&self, weights: &W, expiry: usize, tenor: usize) -> f64
    where
        W: InstrumentWeights + ?Sized,
    {
        assert!(
            expiry >= 1 && expiry <= self.rows() && tenor >= 1 && tenor + expiry <= self.max_tenor + 1,
            "instrument ({}, {}) outside the volatility grid",
            expiry,
            tenor
        );
        let exp = expiry - 1;
        let mut projected = zeros(self.factors);
        let mut variance = 0.0;
        for row in 0..=exp {
            fill_zero(&mut projected);
            for j in 0..tenor {
                let w = weights.weight(expiry, tenor, j + 1);
                axpy(w, self.cell(row, j + exp - row), &mut projected);
            }
            variance += dot(&projected, &projected);
        }
        (variance / expiry as f64).sqrt()
    }
}
