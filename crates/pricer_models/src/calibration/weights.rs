//! Frozen swap-rate weights.
//!
//! A swaption on forwards `k = exp .. exp + n - 1` is priced off the swap
//! rate, which is a weighted sum of those forwards. With the weights frozen
//! at today's curve, the swap-rate volatility becomes a weighted sum of the
//! forward loadings. This module stores one weight vector per instrument of
//! the triangular grid.

use super::lookup::InstrumentWeights;
use crate::error::ModelError;
use crate::volatility::{TimeGrid, TriangularLayout};

/// Per-instrument weight vectors, indexed by 1-based
/// `(expiry, tenor, sub_index)` with `1 <= sub_index <= tenor`.
///
/// # Examples
///
/// ```
/// use pricer_models::calibration::SwaptionWeights;
/// use pricer_models::volatility::TimeGrid;
///
/// let grid = TimeGrid::uniform(2, 4).unwrap();
/// let weights = SwaptionWeights::equal(&grid);
/// assert_eq!(weights.weight(1, 4, 2), 0.25);
/// assert_eq!(weights.weight(1, 4, 5), 0.0);
/// assert_eq!(weights.weight(2, 1, 1), 1.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SwaptionWeights {
    layout: TriangularLayout,
    max_expiry: usize,
    max_tenor: usize,
    starts: Vec<usize>,
    data: Vec<f64>,
}

impl SwaptionWeights {
    /// Weight table from a closure `f(expiry, tenor, sub_index)`.
    ///
    /// Rows are built per expiry, in parallel with the `parallel` feature.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::InvalidWeights`] if any weight is not finite.
    pub fn new<F>(grid: &TimeGrid, f: F) -> Result<Self, ModelError>
    where
        F: Fn(usize, usize, usize) -> f64 + Sync,
    {
        let weights = Self::build(grid, f);
        if let Some(pos) = weights.data.iter().position(|w| !w.is_finite()) {
            return Err(ModelError::invalid_weights(format!(
                "weight #{} is not finite",
                pos
            )));
        }
        Ok(weights)
    }

    /// Equal weights `1 / tenor`. Caplets get weight 1.
    pub fn equal(grid: &TimeGrid) -> Self {
        Self::build(grid, |_, tenor, _| 1.0 / tenor as f64)
    }

    /// Swap-rate weights from a discount curve.
    ///
    /// `discounts[k]` is the discount factor to the start of forward period
    /// `k` (`k = 0..=MaxTenor`), `accruals[k]` its accrual fraction and
    /// `shift` a constant displacement applied to every forward and swap
    /// rate. For the instrument `(expiry, tenor)` with `e = expiry - 1`:
    ///
    /// ```text
    /// F_k = (P_k / P_{k+1} - 1) / tau_k
    /// A   = sum_{k=e}^{e+n-1} tau_k P_{k+1}
    /// S   = (P_e - P_{e+n}) / A
    /// W_j = tau_k P_{k+1} (F_k + shift) / (A (S + shift)),  k = e + j - 1
    /// ```
    ///
    /// The weights of one instrument sum to 1.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::InvalidWeights`] if
    /// - fewer than `MaxTenor + 1` discount factors or `MaxTenor` accruals
    ///   are given
    /// - a discount factor or accrual is not positive and finite
    /// - `shift` is not finite
    /// - a shifted swap rate `S + shift` is not positive
    pub fn from_discount_factors(
        grid: &TimeGrid,
        discounts: &[f64],
        accruals: &[f64],
        shift: f64,
    ) -> Result<Self, ModelError> {
        let max_tenor = grid.max_tenor();
        if discounts.len() < max_tenor + 1 {
            return Err(ModelError::invalid_weights(format!(
                "need {} discount factors, got {}",
                max_tenor + 1,
                discounts.len()
            )));
        }
        if accruals.len() < max_tenor {
            return Err(ModelError::invalid_weights(format!(
                "need {} accrual fractions, got {}",
                max_tenor,
                accruals.len()
            )));
        }
        if let Some((k, p)) = discounts[..=max_tenor]
            .iter()
            .enumerate()
            .find(|(_, p)| !(p.is_finite() && **p > 0.0))
        {
            return Err(ModelError::invalid_weights(format!(
                "discount factor {} is {}",
                k, p
            )));
        }
        if let Some((k, tau)) = accruals[..max_tenor]
            .iter()
            .enumerate()
            .find(|(_, tau)| !(tau.is_finite() && **tau > 0.0))
        {
            return Err(ModelError::invalid_weights(format!(
                "accrual fraction {} is {}",
                k, tau
            )));
        }
        if !shift.is_finite() {
            return Err(ModelError::invalid_weights("shift is not finite"));
        }

        // shifted forward contributions tau_k P_{k+1} (F_k + shift)
        let contributions: Vec<f64> = (0..max_tenor)
            .map(|k| discounts[k] - discounts[k + 1] + shift * accruals[k] * discounts[k + 1])
            .collect();
        let mut annuity = Vec::with_capacity(max_tenor + 1);
        annuity.push(0.0);
        for k in 0..max_tenor {
            annuity.push(annuity[k] + accruals[k] * discounts[k + 1]);
        }

        for (expiry, tenor) in grid.instruments() {
            let e = expiry - 1;
            let a = annuity[e + tenor] - annuity[e];
            let shifted_rate = (discounts[e] - discounts[e + tenor]) / a + shift;
            if !(shifted_rate.is_finite() && shifted_rate > 0.0) {
                return Err(ModelError::invalid_weights(format!(
                    "shifted swap rate of ({}, {}) is {}",
                    expiry, tenor, shifted_rate
                )));
            }
        }

        Self::new(grid, |expiry, tenor, sub| {
            let e = expiry - 1;
            let a = annuity[e + tenor] - annuity[e];
            let shifted_rate = (discounts[e] - discounts[e + tenor]) / a + shift;
            contributions[e + sub - 1] / (a * shifted_rate)
        })
    }

    fn build<F>(grid: &TimeGrid, f: F) -> Self
    where
        F: Fn(usize, usize, usize) -> f64 + Sync,
    {
        let max_expiry = grid.max_expiry();
        let max_tenor = grid.max_tenor();
        let f = &f;
        let row = move |expiry: usize| -> Vec<f64> {
            (1..=max_tenor - expiry + 1)
                .flat_map(move |tenor| (1..=tenor).map(move |sub| f(expiry, tenor, sub)))
                .collect()
        };

        #[cfg(feature = "parallel")]
        let rows: Vec<Vec<f64>> = {
            use rayon::prelude::*;
            (1..=max_expiry).into_par_iter().map(row).collect()
        };
        #[cfg(not(feature = "parallel"))]
        let rows: Vec<Vec<f64>> = (1..=max_expiry).map(row).collect();

        let mut starts = Vec::with_capacity(grid.layout().len() + 1);
        let mut start = 0;
        for (_, tenor) in grid.instruments() {
            starts.push(start);
            start += tenor;
        }
        starts.push(start);

        Self {
            layout: grid.layout(),
            max_expiry,
            max_tenor,
            starts,
            data: rows.concat(),
        }
    }

    /// Weight vector of `(expiry, tenor)`, or `None` outside the grid.
    pub fn instrument_weights(&self, expiry: usize, tenor: usize) -> Option<&[f64]> {
        if expiry == 0 || tenor == 0 {
            return None;
        }
        let i = self.layout.index(expiry - 1, tenor - 1)?;
        Some(&self.data[self.starts[i]..self.starts[i + 1]])
    }

    /// Weight of `sub_index` within `(expiry, tenor)`, `0.0` out of range.
    #[inline]
    pub fn weight(&self, expiry: usize, tenor: usize, sub_index: usize) -> f64 {
        match self.instrument_weights(expiry, tenor) {
            Some(w) if sub_index >= 1 && sub_index <= w.len() => w[sub_index - 1],
            _ => 0.0,
        }
    }

    /// Grid maximum expiry.
    pub fn max_expiry(&self) -> usize {
        self.max_expiry
    }

    /// Grid maximum tenor.
    pub fn max_tenor(&self) -> usize {
        self.max_tenor
    }
}

impl InstrumentWeights for SwaptionWeights {
    fn weight(&self, expiry: usize, tenor: usize, sub_index: usize) -> f64 {
        SwaptionWeights::weight(self, expiry, tenor, sub_index)
    }

    fn dimensions(&self) -> Option<(usize, usize)> {
        Some((self.max_expiry, self.max_tenor))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    fn grid() -> TimeGrid {
        TimeGrid::uniform(3, 5).unwrap()
    }

    fn flat_curve(rate: f64, periods: usize) -> Vec<f64> {
        (0..=periods).map(|k| (1.0 + rate).powi(-(k as i32))).collect()
    }

    // ========================================
    // Closure Construction Tests
    // ========================================

    #[test]
    fn test_new_from_closure() {
        let weights =
            SwaptionWeights::new(&grid(), |e, t, s| (100 * e + 10 * t + s) as f64).unwrap();
        assert_eq!(weights.weight(2, 3, 1), 231.0);
        assert_eq!(weights.weight(3, 3, 3), 333.0);
        assert_eq!(weights.instrument_weights(1, 5).map(<[f64]>::len), Some(5));
    }

    #[test]
    fn test_new_rejects_non_finite() {
        let err = SwaptionWeights::new(&grid(), |e, _, _| if e == 3 { f64::NAN } else { 0.5 })
            .unwrap_err();
        assert!(err.is_invalid_weights());
    }

    #[test]
    fn test_out_of_range_lookup_is_zero() {
        let weights = SwaptionWeights::equal(&grid());
        assert_eq!(weights.weight(1, 2, 0), 0.0);
        assert_eq!(weights.weight(1, 2, 3), 0.0);
        assert_eq!(weights.weight(3, 4, 1), 0.0);
        assert_eq!(weights.weight(4, 1, 1), 0.0);
        assert_eq!(weights.weight(0, 1, 1), 0.0);
        assert!(weights.instrument_weights(3, 4).is_none());
    }

    #[test]
    fn test_equal_weights_sum_to_one() {
        let g = grid();
        let weights = SwaptionWeights::equal(&g);
        for (expiry, tenor) in g.instruments() {
            let sum: f64 = weights.instrument_weights(expiry, tenor).unwrap().iter().sum();
            assert_relative_eq!(sum, 1.0, epsilon = 1e-14);
        }
        assert_eq!(InstrumentWeights::dimensions(&weights), Some((3, 5)));
    }

    // ========================================
    // Discount Factor Tests
    // ========================================

    #[test]
    fn test_flat_curve_weights_follow_discounting() {
        let g = grid();
        let discounts = flat_curve(0.04, 5);
        let accruals = vec![1.0; 5];
        let weights = SwaptionWeights::from_discount_factors(&g, &discounts, &accruals, 0.0).unwrap();

        // equal forwards: W_j = P_{k+1} / A
        let a = discounts[2] + discounts[3] + discounts[4];
        assert_relative_eq!(weights.weight(2, 3, 1), discounts[2] / a, epsilon = 1e-14);
        assert_relative_eq!(weights.weight(2, 3, 3), discounts[4] / a, epsilon = 1e-14);
        assert!(weights.weight(2, 3, 1) > weights.weight(2, 3, 3));
    }

    #[test]
    fn test_caplet_weight_is_one() {
        let g = grid();
        let weights =
            SwaptionWeights::from_discount_factors(&g, &flat_curve(0.03, 5), &[0.5; 5], 0.01)
                .unwrap();
        for expiry in 1..=3 {
            assert_relative_eq!(weights.weight(expiry, 1, 1), 1.0, epsilon = 1e-14);
        }
    }

    #[test]
    fn test_discount_validation() {
        let g = grid();
        let good = flat_curve(0.03, 5);
        let taus = vec![1.0; 5];

        assert!(SwaptionWeights::from_discount_factors(&g, &good[..5], &taus, 0.0)
            .unwrap_err()
            .is_invalid_weights());
        assert!(SwaptionWeights::from_discount_factors(&g, &good, &taus[..4], 0.0).is_err());

        let mut negative = good.clone();
        negative[3] = -0.9;
        assert!(SwaptionWeights::from_discount_factors(&g, &negative, &taus, 0.0).is_err());

        let mut zero_tau = taus.clone();
        zero_tau[1] = 0.0;
        assert!(SwaptionWeights::from_discount_factors(&g, &good, &zero_tau, 0.0).is_err());

        assert!(SwaptionWeights::from_discount_factors(&g, &good, &taus, f64::NAN).is_err());
    }

    #[test]
    fn test_negative_swap_rate_needs_shift() {
        let g = TimeGrid::uniform(1, 2).unwrap();
        let rising = vec![1.0, 1.01, 1.02];
        let taus = vec![1.0, 1.0];
        let err = SwaptionWeights::from_discount_factors(&g, &rising, &taus, 0.0).unwrap_err();
        assert!(err.to_string().contains("shifted swap rate"));

        let shifted = SwaptionWeights::from_discount_factors(&g, &rising, &taus, 0.05).unwrap();
        let sum: f64 = shifted.instrument_weights(1, 2).unwrap().iter().sum();
        assert_relative_eq!(sum, 1.0, epsilon = 1e-14);
    }

    // ========================================
    // Property Tests
    // ========================================

    proptest! {
        #[test]
        fn prop_discount_weights_sum_to_one(
            rates in proptest::collection::vec(0.001_f64..0.08, 6),
            shift in 0.0_f64..0.03,
        ) {
            let g = TimeGrid::uniform(3, 6).unwrap();
            let mut discounts = vec![1.0];
            for r in &rates {
                let last = discounts[discounts.len() - 1];
                discounts.push(last / (1.0 + 0.5 * r));
            }
            let weights =
                SwaptionWeights::from_discount_factors(&g, &discounts, &[0.5; 6], shift).unwrap();
            for (expiry, tenor) in g.instruments() {
                let sum: f64 = weights.instrument_weights(expiry, tenor).unwrap().iter().sum();
                prop_assert!((sum - 1.0).abs() < 1e-12);
            }
        }
    }
}
