//! Expiry/tenor discretisation.
//!
//! A [`TimeGrid`] fixes the number of volatility periods (`MaxExpiry`) and
//! forward rates (`MaxTenor`) and groups them into piecewise-constant
//! buckets. Every 1-based `(expiry, tenor)` pair used elsewhere satisfies
//! `1 <= expiry <= MaxExpiry` and `1 <= tenor <= MaxTenor - expiry + 1`.

use crate::error::ModelError;

/// Bucket break points used by default when only the grid size is known.
///
/// Fine buckets at the short end, widening to ten and twenty periods.
pub const STANDARD_BREAKS: [usize; 20] = [
    0, 1, 2, 3, 4, 6, 8, 10, 12, 16, 20, 24, 28, 34, 40, 50, 60, 80, 100, 120,
];

/// Offset mapping for triangular arenas.
///
/// Row `i` (zero-based) holds `max_tenor - i` entries, laid out row after
/// row in one contiguous block. The same layout serves the volatility grid,
/// the cascade lock state and the calibration targets (row `expiry - 1`,
/// column `tenor - 1`).
///
/// # Examples
///
/// ```
/// use pricer_models::volatility::TriangularLayout;
///
/// let layout = TriangularLayout::new(2, 3);
/// assert_eq!(layout.len(), 3 + 2);
/// assert_eq!(layout.index(1, 0), Some(3));
/// assert_eq!(layout.index(1, 2), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriangularLayout {
    max_tenor: usize,
    row_starts: Vec<usize>,
}

impl TriangularLayout {
    /// Layout with `rows` rows for a grid of `max_tenor` forwards.
    ///
    /// # Panics
    ///
    /// Panics if `rows > max_tenor`.
    pub fn new(rows: usize, max_tenor: usize) -> Self {
        assert!(rows <= max_tenor, "triangular layout needs rows <= max_tenor");
        let mut row_starts = Vec::with_capacity(rows + 1);
        let mut start = 0;
        row_starts.push(start);
        for row in 0..rows {
            start += max_tenor - row;
            row_starts.push(start);
        }
        Self {
            max_tenor,
            row_starts,
        }
    }

    /// Number of rows.
    #[inline]
    pub fn rows(&self) -> usize {
        self.row_starts.len() - 1
    }

    /// Number of entries in `row`, zero past the last row.
    #[inline]
    pub fn row_len(&self, row: usize) -> usize {
        if row < self.rows() {
            self.max_tenor - row
        } else {
            0
        }
    }

    /// Total number of entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.row_starts[self.rows()]
    }

    /// Returns `true` if the layout has no entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Offset of `(row, col)`, or `None` outside the triangle.
    #[inline]
    pub fn index(&self, row: usize, col: usize) -> Option<usize> {
        (col < self.row_len(row)).then(|| self.row_starts[row] + col)
    }
}

/// Integer time discretisation of the volatility grid.
///
/// # Examples
///
/// ```
/// use pricer_models::volatility::TimeGrid;
///
/// let grid = TimeGrid::new(vec![0, 1, 2, 4], vec![0, 1, 2, 4, 8]).unwrap();
/// assert_eq!(grid.max_expiry(), 4);
/// assert_eq!(grid.max_tenor(), 8);
/// assert_eq!(grid.expiry_bucket(3), Some(2));
/// assert_eq!(grid.tenor_bucket(5), Some(3));
/// assert!(grid.contains(4, 5));
/// assert!(!grid.contains(4, 6));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeGrid {
    expiry_breaks: Vec<usize>,
    tenor_breaks: Vec<usize>,
    expiry_buckets: Vec<usize>,
    tenor_buckets: Vec<usize>,
}

impl TimeGrid {
    /// Grid with one bucket per period.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::InvalidTimeGrid`] if `max_expiry == 0` or
    /// `max_tenor < max_expiry`.
    pub fn uniform(max_expiry: usize, max_tenor: usize) -> Result<Self, ModelError> {
        Self::new((0..=max_expiry).collect(), (0..=max_tenor).collect())
    }

    /// Grid bucketed with [`STANDARD_BREAKS`], truncated to the grid size.
    ///
    /// # Errors
    ///
    /// Same conditions as [`TimeGrid::uniform`].
    pub fn standard(max_expiry: usize, max_tenor: usize) -> Result<Self, ModelError> {
        Self::new(
            Self::truncated_breaks(max_expiry),
            Self::truncated_breaks(max_tenor),
        )
    }

    /// Grid from explicit bucket break points.
    ///
    /// Each break vector starts at 0 and is strictly increasing. The last
    /// expiry break is `MaxExpiry` and the last tenor break is `MaxTenor`.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::InvalidTimeGrid`] if either vector is malformed
    /// or `MaxTenor < MaxExpiry`.
    pub fn new(expiry_breaks: Vec<usize>, tenor_breaks: Vec<usize>) -> Result<Self, ModelError> {
        Self::validate_breaks("expiry", &expiry_breaks)?;
        Self::validate_breaks("tenor", &tenor_breaks)?;

        let max_expiry = expiry_breaks[expiry_breaks.len() - 1];
        let max_tenor = tenor_breaks[tenor_breaks.len() - 1];
        if max_tenor < max_expiry {
            return Err(ModelError::invalid_time_grid(format!(
                "max tenor {} is shorter than max expiry {}",
                max_tenor, max_expiry
            )));
        }

        let expiry_buckets = Self::bucket_table(&expiry_breaks);
        let tenor_buckets = Self::bucket_table(&tenor_breaks);
        Ok(Self {
            expiry_breaks,
            tenor_breaks,
            expiry_buckets,
            tenor_buckets,
        })
    }

    fn truncated_breaks(max: usize) -> Vec<usize> {
        let mut breaks: Vec<usize> = STANDARD_BREAKS
            .iter()
            .copied()
            .take_while(|&b| b < max)
            .collect();
        if breaks.is_empty() {
            breaks.push(0);
        }
        breaks.push(max);
        breaks
    }

    fn validate_breaks(name: &str, breaks: &[usize]) -> Result<(), ModelError> {
        if breaks.len() < 2 {
            return Err(ModelError::invalid_time_grid(format!(
                "{} breaks need at least two points, got {}",
                name,
                breaks.len()
            )));
        }
        if breaks[0] != 0 {
            return Err(ModelError::invalid_time_grid(format!(
                "{} breaks must start at 0, got {}",
                name, breaks[0]
            )));
        }
        if let Some(w) = breaks.windows(2).find(|w| w[1] <= w[0]) {
            return Err(ModelError::invalid_time_grid(format!(
                "{} breaks must be strictly increasing ({} then {})",
                name, w[0], w[1]
            )));
        }
        Ok(())
    }

    fn bucket_table(breaks: &[usize]) -> Vec<usize> {
        breaks
            .windows(2)
            .enumerate()
            .flat_map(|(bucket, w)| std::iter::repeat(bucket).take(w[1] - w[0]))
            .collect()
    }

    /// Number of volatility periods.
    #[inline]
    pub fn max_expiry(&self) -> usize {
        self.expiry_breaks[self.expiry_breaks.len() - 1]
    }

    /// Number of forward rates.
    #[inline]
    pub fn max_tenor(&self) -> usize {
        self.tenor_breaks[self.tenor_breaks.len() - 1]
    }

    /// Expiry bucket break points.
    pub fn expiry_breaks(&self) -> &[usize] {
        &self.expiry_breaks
    }

    /// Tenor bucket break points.
    pub fn tenor_breaks(&self) -> &[usize] {
        &self.tenor_breaks
    }

    /// Number of expiry buckets.
    #[inline]
    pub fn expiry_count(&self) -> usize {
        self.expiry_breaks.len() - 1
    }

    /// Number of tenor buckets.
    #[inline]
    pub fn tenor_count(&self) -> usize {
        self.tenor_breaks.len() - 1
    }

    /// Bucket of the zero-based `period`, or `None` past `MaxExpiry`.
    #[inline]
    pub fn expiry_bucket(&self, period: usize) -> Option<usize> {
        self.expiry_buckets.get(period).copied()
    }

    /// Bucket of the zero-based tenor `offset`, or `None` past `MaxTenor`.
    #[inline]
    pub fn tenor_bucket(&self, offset: usize) -> Option<usize> {
        self.tenor_buckets.get(offset).copied()
    }

    /// Longest tenor available at `expiry`: `MaxTenor - expiry + 1`.
    ///
    /// Zero when `expiry` is 0 or past `MaxExpiry`.
    #[inline]
    pub fn max_tenor_for(&self, expiry: usize) -> usize {
        if expiry == 0 || expiry > self.max_expiry() {
            0
        } else {
            self.max_tenor() - expiry + 1
        }
    }

    /// Returns `true` if the 1-based pair lies in the triangular grid.
    #[inline]
    pub fn contains(&self, expiry: usize, tenor: usize) -> bool {
        tenor >= 1 && tenor <= self.max_tenor_for(expiry)
    }

    /// Offset layout of the volatility grid: `MaxExpiry` rows.
    pub fn layout(&self) -> TriangularLayout {
        TriangularLayout::new(self.max_expiry(), self.max_tenor())
    }

    /// Iterates every instrument in calibration order.
    ///
    /// Expiry-major, tenor-minor: the caplet of each expiry comes before
    /// its swaptions and shorter expiries come first.
    pub fn instruments(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        (1..=self.max_expiry())
            .flat_map(move |expiry| (1..=self.max_tenor_for(expiry)).map(move |t| (expiry, t)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ========================================
    // Layout Tests
    // ========================================

    #[test]
    fn test_layout_offsets_are_contiguous() {
        let layout = TriangularLayout::new(3, 4);
        let mut expected = 0;
        for row in 0..3 {
            for col in 0..layout.row_len(row) {
                assert_eq!(layout.index(row, col), Some(expected));
                expected += 1;
            }
        }
        assert_eq!(layout.len(), expected);
        assert_eq!(layout.len(), 4 + 3 + 2);
    }

    #[test]
    fn test_layout_out_of_bounds() {
        let layout = TriangularLayout::new(2, 2);
        assert_eq!(layout.index(0, 2), None);
        assert_eq!(layout.index(1, 1), None);
        assert_eq!(layout.index(2, 0), None);
        assert_eq!(layout.row_len(5), 0);
    }

    #[test]
    #[should_panic(expected = "rows <= max_tenor")]
    fn test_layout_rejects_too_many_rows() {
        let _ = TriangularLayout::new(3, 2);
    }

    // ========================================
    // Construction Tests
    // ========================================

    #[test]
    fn test_uniform_grid() {
        let grid = TimeGrid::uniform(3, 5).unwrap();
        assert_eq!(grid.max_expiry(), 3);
        assert_eq!(grid.max_tenor(), 5);
        assert_eq!(grid.expiry_count(), 3);
        assert_eq!(grid.tenor_count(), 5);
        assert_eq!(grid.expiry_bucket(2), Some(2));
        assert_eq!(grid.expiry_bucket(3), None);
    }

    #[test]
    fn test_uniform_rejects_invalid_sizes() {
        assert!(TimeGrid::uniform(0, 3).unwrap_err().is_invalid_time_grid());
        assert!(TimeGrid::uniform(4, 3).unwrap_err().is_invalid_time_grid());
    }

    #[test]
    fn test_new_rejects_malformed_breaks() {
        assert!(TimeGrid::new(vec![1, 2], vec![0, 2]).is_err());
        assert!(TimeGrid::new(vec![0, 2, 2], vec![0, 4]).is_err());
        assert!(TimeGrid::new(vec![0], vec![0, 4]).is_err());
        assert!(TimeGrid::new(vec![0, 2], vec![0, 1]).is_err());
    }

    #[test]
    fn test_standard_grid_truncates_breaks() {
        let grid = TimeGrid::standard(5, 13).unwrap();
        assert_eq!(grid.expiry_breaks(), &[0, 1, 2, 3, 4, 5]);
        assert_eq!(grid.tenor_breaks(), &[0, 1, 2, 3, 4, 6, 8, 10, 12, 13]);
        assert_eq!(grid.tenor_bucket(5), Some(4));
        assert_eq!(grid.tenor_bucket(12), Some(8));
    }

    #[test]
    fn test_standard_grid_matches_breaks_exactly() {
        let grid = TimeGrid::standard(4, 120).unwrap();
        assert_eq!(grid.tenor_breaks(), &STANDARD_BREAKS[..]);
        assert_eq!(grid.tenor_count(), STANDARD_BREAKS.len() - 1);
    }

    // ========================================
    // Bucket Lookup Tests
    // ========================================

    #[test]
    fn test_bucket_lookup_covers_every_period() {
        let grid = TimeGrid::new(vec![0, 1, 3, 6], vec![0, 2, 6]).unwrap();
        let expiry: Vec<_> = (0..6).map(|p| grid.expiry_bucket(p).unwrap()).collect();
        assert_eq!(expiry, vec![0, 1, 1, 2, 2, 2]);
        let tenor: Vec<_> = (0..6).map(|p| grid.tenor_bucket(p).unwrap()).collect();
        assert_eq!(tenor, vec![0, 0, 1, 1, 1, 1]);
        assert_eq!(grid.tenor_bucket(6), None);
    }

    // ========================================
    // Triangular Bound Tests
    // ========================================

    #[test]
    fn test_triangular_bounds() {
        let grid = TimeGrid::uniform(3, 4).unwrap();
        assert_eq!(grid.max_tenor_for(1), 4);
        assert_eq!(grid.max_tenor_for(3), 2);
        assert_eq!(grid.max_tenor_for(0), 0);
        assert_eq!(grid.max_tenor_for(4), 0);
        assert!(grid.contains(1, 4));
        assert!(grid.contains(3, 2));
        assert!(!grid.contains(3, 3));
        assert!(!grid.contains(2, 0));
        assert!(!grid.contains(0, 1));
    }

    #[test]
    fn test_instruments_order() {
        let grid = TimeGrid::uniform(2, 3).unwrap();
        let order: Vec<_> = grid.instruments().collect();
        assert_eq!(order, vec![(1, 1), (1, 2), (1, 3), (2, 1), (2, 2)]);
    }

    #[test]
    fn test_grid_layout_shape() {
        let grid = TimeGrid::uniform(3, 5).unwrap();
        let layout = grid.layout();
        assert_eq!(layout.rows(), 3);
        assert_eq!(layout.row_len(0), 5);
        assert_eq!(layout.row_len(2), 3);
    }
}
