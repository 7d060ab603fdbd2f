//! Cascade configuration.

use pricer_models::calibration::InstrumentKind;

use super::error::CascadeError;

/// Default bound on a single caplet scale step.
pub const DEFAULT_CAPLET_MAX_SCALE: f64 = 1.20;

/// Default bound on a single swaption scale step.
pub const DEFAULT_SWAPTION_MAX_SCALE: f64 = 1.10;

/// Configuration for the cascade calibration.
///
/// Every scale factor applied for a caplet is clamped to
/// `[1 / caplet_max_scale, caplet_max_scale]`, and likewise for swaptions.
///
/// # Examples
///
/// ```
/// use pricer_optimiser::cascade::CascadeParameters;
///
/// // Use default configuration
/// let params = CascadeParameters::default();
/// assert_eq!(params.caplet_max_scale, 1.20);
///
/// // Custom configuration
/// let params = CascadeParameters::builder()
///     .swaption_max_scale(1.5)
///     .use_caplets(false)
///     .build();
/// assert!(params.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CascadeParameters {
    /// Largest relative rescaling of a cell by one caplet.
    ///
    /// Must be finite and greater than 1.
    /// Default: 1.20
    pub caplet_max_scale: f64,

    /// Largest relative rescaling of a cell by one swaption.
    ///
    /// Must be finite and greater than 1.
    /// Default: 1.10
    pub swaption_max_scale: f64,

    /// Calibrate to caplet quotes.
    ///
    /// When false, caplet quotes are treated as absent.
    /// Default: true
    pub use_caplets: bool,

    /// Calibrate to swaption quotes.
    ///
    /// When false, swaption quotes are treated as absent.
    /// Default: true
    pub use_swaptions: bool,
}

impl Default for CascadeParameters {
    fn default() -> Self {
        Self {
            caplet_max_scale: DEFAULT_CAPLET_MAX_SCALE,
            swaption_max_scale: DEFAULT_SWAPTION_MAX_SCALE,
            use_caplets: true,
            use_swaptions: true,
        }
    }
}

impl CascadeParameters {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a configuration builder for fluent construction.
    pub fn builder() -> CascadeParametersBuilder {
        CascadeParametersBuilder::new()
    }

    /// Set the caplet scale bound.
    pub fn with_caplet_max_scale(mut self, bound: f64) -> Self {
        self.caplet_max_scale = bound;
        self
    }

    /// Set the swaption scale bound.
    pub fn with_swaption_max_scale(mut self, bound: f64) -> Self {
        self.swaption_max_scale = bound;
        self
    }

    /// Enable or disable caplet calibration.
    pub fn with_caplets(mut self, enabled: bool) -> Self {
        self.use_caplets = enabled;
        self
    }

    /// Enable or disable swaption calibration.
    pub fn with_swaptions(mut self, enabled: bool) -> Self {
        self.use_swaptions = enabled;
        self
    }

    /// Scale bound applicable to an instrument class.
    #[inline]
    pub fn bound_for(&self, kind: InstrumentKind) -> f64 {
        match kind {
            InstrumentKind::Caplet => self.caplet_max_scale,
            InstrumentKind::Swaption => self.swaption_max_scale,
        }
    }

    /// Returns `true` if quotes of this class are calibrated.
    #[inline]
    pub fn is_enabled(&self, kind: InstrumentKind) -> bool {
        match kind {
            InstrumentKind::Caplet => self.use_caplets,
            InstrumentKind::Swaption => self.use_swaptions,
        }
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`CascadeError::InvalidParameters`] if a bound is not finite
    /// or not greater than 1.
    pub fn validate(&self) -> Result<(), CascadeError> {
        for (name, bound) in [
            ("caplet_max_scale", self.caplet_max_scale),
            ("swaption_max_scale", self.swaption_max_scale),
        ] {
            if !(bound.is_finite() && bound > 1.0) {
                return Err(CascadeError::invalid_parameters(format!(
                    "{} must be finite and greater than 1, got {}",
                    name, bound
                )));
            }
        }
        Ok(())
    }
}

/// Builder for `CascadeParameters`.
///
/// Provides a fluent interface for constructing cascade configurations.
#[derive(Debug, Clone)]
pub struct CascadeParametersBuilder {
    params: CascadeParameters,
}

impl CascadeParametersBuilder {
    /// Create a new builder with default values.
    pub fn new() -> Self {
        Self {
            params: CascadeParameters::default(),
        }
    }

    /// Set the caplet scale bound.
    pub fn caplet_max_scale(mut self, bound: f64) -> Self {
        self.params.caplet_max_scale = bound;
        self
    }

    /// Set the swaption scale bound.
    pub fn swaption_max_scale(mut self, bound: f64) -> Self {
        self.params.swaption_max_scale = bound;
        self
    }

    /// Set whether caplets are calibrated.
    pub fn use_caplets(mut self, enabled: bool) -> Self {
        self.params.use_caplets = enabled;
        self
    }

    /// Set whether swaptions are calibrated.
    pub fn use_swaptions(mut self, enabled: bool) -> Self {
        self.params.use_swaptions = enabled;
        self
    }

    /// Build the configuration.
    pub fn build(self) -> CascadeParameters {
        self.params
    }
}

impl Default for CascadeParametersBuilder {
    fn default() -> Self {
        Self::new()
    }
}
