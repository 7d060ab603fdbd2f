//! Day count conventions and regular accrual schedules.
//!
//! Swaption weights need the accrual fraction `τ_k` of every forward
//! period. When a calibration input gives a start date and a payment
//! frequency instead of explicit fractions, [`accrual_fractions`] rolls the
//! schedule and measures each period with a [`YearFraction`]
//! implementation.
//!
//! # Examples
//!
//! ```
//! use chrono::NaiveDate;
//! use pricer_core::types::time::{accrual_fractions, DayCountConvention};
//!
//! let start = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
//! let taus = accrual_fractions(start, 6, 4, &DayCountConvention::Thirty360).unwrap();
//! assert_eq!(taus, vec![0.5, 0.5, 0.5, 0.5]);
//! ```

use chrono::{Datelike, Months, NaiveDate};
use std::fmt;
use std::str::FromStr;

use super::error::CoreError;

/// Measures the time between two dates in years.
///
/// Implementations return a negative fraction when `start > end` and never
/// panic.
pub trait YearFraction {
    /// Year fraction from `start` to `end`.
    fn year_fraction(&self, start: NaiveDate, end: NaiveDate) -> f64;
}

/// Day count convention for accrual fractions.
///
/// # Examples
///
/// ```
/// use pricer_core::types::time::DayCountConvention;
///
/// let dc: DayCountConvention = "act/360".parse().unwrap();
/// assert_eq!(dc, DayCountConvention::Act360);
/// assert_eq!(dc.to_string(), "ACT/360");
/// ```
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DayCountConvention {
    /// Actual/360: actual_days / 360.0
    ///
    /// Money market and floating-rate legs.
    #[default]
    Act360,

    /// Actual/365 Fixed: actual_days / 365.0
    Act365Fixed,

    /// 30/360 US Bond Basis.
    ///
    /// Each month is treated as having 30 days, and the year as 360 days.
    Thirty360,
}

impl DayCountConvention {
    /// Returns the standard convention name.
    ///
    /// # Examples
    ///
    /// ```
    /// use pricer_core::types::time::DayCountConvention;
    ///
    /// assert_eq!(DayCountConvention::Act365Fixed.name(), "ACT/365");
    /// assert_eq!(DayCountConvention::Thirty360.name(), "30/360");
    /// ```
    pub fn name(&self) -> &'static str {
        match self {
            DayCountConvention::Act360 => "ACT/360",
            DayCountConvention::Act365Fixed => "ACT/365",
            DayCountConvention::Thirty360 => "30/360",
        }
    }

    fn thirty_360_days(start: NaiveDate, end: NaiveDate) -> i32 {
        let d1 = start.day().min(30);
        let d2 = if end.day() == 31 && d1 == 30 {
            30
        } else {
            end.day()
        };

        360 * (end.year() - start.year())
            + 30 * (end.month() as i32 - start.month() as i32)
            + (d2 as i32 - d1 as i32)
    }
}

impl YearFraction for DayCountConvention {
    fn year_fraction(&self, start: NaiveDate, end: NaiveDate) -> f64 {
        match self {
            DayCountConvention::Act360 => (end - start).num_days() as f64 / 360.0,
            DayCountConvention::Act365Fixed => (end - start).num_days() as f64 / 365.0,
            DayCountConvention::Thirty360 => {
                if start <= end {
                    Self::thirty_360_days(start, end) as f64 / 360.0
                } else {
                    -(Self::thirty_360_days(end, start) as f64) / 360.0
                }
            }
        }
    }
}

impl FromStr for DayCountConvention {
    type Err = CoreError;

    /// Parses day count convention from string (case-insensitive).
    ///
    /// Supports multiple aliases for each convention:
    /// - ACT/360: "ACT/360", "Actual/360", "Act360", "A360"
    /// - ACT/365: "ACT/365", "ACT/365F", "Actual/365", "A365"
    /// - 30/360: "30/360", "Thirty360", "30360"
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().replace(['/', ' '], "").as_str() {
            "ACT360" | "ACTUAL360" | "A360" => Ok(DayCountConvention::Act360),
            "ACT365" | "ACT365F" | "ACTUAL365" | "A365" => Ok(DayCountConvention::Act365Fixed),
            "30360" | "THIRTY360" => Ok(DayCountConvention::Thirty360),
            _ => Err(CoreError::UnknownDayCount(s.to_string())),
        }
    }
}

impl fmt::Display for DayCountConvention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(feature = "serde")]
mod serde_impl {
    use super::DayCountConvention;
    use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
    use std::str::FromStr;

    impl Serialize for DayCountConvention {
        fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            serializer.serialize_str(self.name())
        }
    }

    impl<'de> Deserialize<'de> for DayCountConvention {
        fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
        where
            D: Deserializer<'de>,
        {
            let s = String::deserialize(deserializer)?;
            DayCountConvention::from_str(&s).map_err(de::Error::custom)
        }
    }
}

/// Accrual fractions of a regular schedule.
///
/// Rolls `periods` periods of `months_per_period` months each from `start`
/// (unadjusted, end-of-month clamped by chrono) and measures each one with
/// `day_count`.
///
/// # Errors
///
/// Returns [`CoreError::InvalidInput`] if `months_per_period` or `periods`
/// is zero, or if the schedule runs past the supported date range.
pub fn accrual_fractions<D: YearFraction + ?Sized>(
    start: NaiveDate,
    months_per_period: u32,
    periods: usize,
    day_count: &D,
) -> Result<Vec<f64>, CoreError> {
    if months_per_period == 0 {
        return Err(CoreError::invalid_input("months per period must be positive"));
    }
    if periods == 0 {
        return Err(CoreError::invalid_input("schedule needs at least one period"));
    }

    let mut fractions = Vec::with_capacity(periods);
    let mut period_start = start;
    for k in 1..=periods {
        let offset = u32::try_from(k)
            .ok()
            .and_then(|k| k.checked_mul(months_per_period))
            .ok_or_else(|| CoreError::invalid_input("schedule too long"))?;
        let period_end = start
            .checked_add_months(Months::new(offset))
            .ok_or_else(|| CoreError::invalid_input("schedule exceeds date range"))?;
        fractions.push(day_count.year_fraction(period_start, period_end));
        period_start = period_end;
    }
    Ok(fractions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    // ========================================
    // Day Count Tests
    // ========================================

    #[test]
    fn test_act_360() {
        let yf = DayCountConvention::Act360.year_fraction(date(2024, 1, 1), date(2024, 7, 1));
        assert_relative_eq!(yf, 182.0 / 360.0, epsilon = 1e-15);
    }

    #[test]
    fn test_act_365_fixed() {
        let yf =
            DayCountConvention::Act365Fixed.year_fraction(date(2024, 1, 1), date(2025, 1, 1));
        assert_relative_eq!(yf, 366.0 / 365.0, epsilon = 1e-15);
    }

    #[test]
    fn test_thirty_360_month_end() {
        let yf = DayCountConvention::Thirty360.year_fraction(date(2024, 1, 31), date(2024, 3, 31));
        assert_relative_eq!(yf, 60.0 / 360.0, epsilon = 1e-15);
    }

    #[test]
    fn test_reversed_dates_are_negative() {
        for dc in [
            DayCountConvention::Act360,
            DayCountConvention::Act365Fixed,
            DayCountConvention::Thirty360,
        ] {
            let fwd = dc.year_fraction(date(2024, 2, 10), date(2024, 8, 10));
            let bwd = dc.year_fraction(date(2024, 8, 10), date(2024, 2, 10));
            assert!(fwd > 0.0);
            assert_relative_eq!(fwd, -bwd, epsilon = 1e-15);
        }
    }

    // ========================================
    // Parsing Tests
    // ========================================

    #[test]
    fn test_from_str_aliases() {
        assert_eq!("ACT/360".parse::<DayCountConvention>().unwrap(), DayCountConvention::Act360);
        assert_eq!("a365".parse::<DayCountConvention>().unwrap(), DayCountConvention::Act365Fixed);
        assert_eq!("Actual/365".parse::<DayCountConvention>().unwrap(), DayCountConvention::Act365Fixed);
        assert_eq!("30/360".parse::<DayCountConvention>().unwrap(), DayCountConvention::Thirty360);
    }

    #[test]
    fn test_from_str_unknown() {
        let err = "BUS/252".parse::<DayCountConvention>().unwrap_err();
        assert!(matches!(err, CoreError::UnknownDayCount(_)));
    }

    #[test]
    fn test_display_round_trips() {
        let dc = DayCountConvention::Thirty360;
        assert_eq!(dc.to_string().parse::<DayCountConvention>().unwrap(), dc);
    }

    // ========================================
    // Schedule Tests
    // ========================================

    #[test]
    fn test_accrual_fractions_semiannual_act360() {
        let taus = accrual_fractions(date(2024, 1, 1), 6, 2, &DayCountConvention::Act360).unwrap();
        assert_eq!(taus.len(), 2);
        assert_relative_eq!(taus[0], 182.0 / 360.0, epsilon = 1e-15);
        assert_relative_eq!(taus[1], 184.0 / 360.0, epsilon = 1e-15);
    }

    #[test]
    fn test_accrual_fractions_month_end_clamped() {
        // Jan 31 + 1M clamps to Feb 29, + 2M back to Mar 31.
        let taus = accrual_fractions(date(2024, 1, 31), 1, 2, &DayCountConvention::Act365Fixed)
            .unwrap();
        assert_relative_eq!(taus[0], 29.0 / 365.0, epsilon = 1e-15);
        assert_relative_eq!(taus[1], 31.0 / 365.0, epsilon = 1e-15);
    }

    #[test]
    fn test_accrual_fractions_rejects_empty() {
        assert!(accrual_fractions(date(2024, 1, 1), 0, 4, &DayCountConvention::Act360).is_err());
        assert!(accrual_fractions(date(2024, 1, 1), 6, 0, &DayCountConvention::Act360).is_err());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serde_uses_names() {
        let json = serde_json::to_string(&DayCountConvention::Act365Fixed).unwrap();
        assert_eq!(json, "\"ACT/365\"");
        let back: DayCountConvention = serde_json::from_str("\"30/360\"").unwrap();
        assert_eq!(back, DayCountConvention::Thirty360);
    }
}
