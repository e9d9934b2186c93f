//! Configuration for mask edge detection.

use serde::{Deserialize, Serialize};

/// How the gradient magnitude is computed from its X and Y components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MagnitudeMode {
    /// Euclidean length, `hypot(gx, gy)`.
    #[default]
    Exact,
    /// Manhattan length, `|gx| + |gy|`. Cheaper, overestimates diagonals.
    Approximate,
}

impl MagnitudeMode {
    #[inline]
    pub fn magnitude(self, gx: f32, gy: f32) -> f32 {
        match self {
            MagnitudeMode::Exact => gx.hypot(gy),
            MagnitudeMode::Approximate => gx.abs() + gy.abs(),
        }
    }
}

/// Edge detector parameters.
///
/// Magnitudes are compared as integers after scaling by
/// [`magnitude_scale`](Self::magnitude_scale), so thresholds are expressed in
/// unscaled gradient units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EdgeDetectorConfig {
    // ------------------------------------------------------------------------
    // Smoothing
    // ------------------------------------------------------------------------
    /// Gaussian sigma of the smoothing kernel, in pixels.
    pub gaussian_kernel_radius: f32,
    /// Maximum number of kernel taps (center included). At least 2.
    pub gaussian_kernel_width: usize,
    /// Taps beyond the second whose Gaussian value falls to or below this are dropped.
    pub gaussian_cut_off: f32,

    // ------------------------------------------------------------------------
    // Thresholds
    // ------------------------------------------------------------------------
    /// Weakest magnitude a pixel may have to join an edge seeded elsewhere.
    pub low_threshold: f32,
    /// Minimum magnitude for a pixel to seed an edge.
    pub high_threshold: f32,

    // ------------------------------------------------------------------------
    // Magnitude encoding
    // ------------------------------------------------------------------------
    /// Factor applied to gradient magnitudes before rounding to integers.
    pub magnitude_scale: f32,
    /// Upper bound on unscaled magnitudes.
    pub magnitude_limit: f32,
    pub magnitude_mode: MagnitudeMode,
}

impl Default for EdgeDetectorConfig {
    fn default() -> Self {
        Self {
            gaussian_kernel_radius: 1.0,
            gaussian_kernel_width: 2,
            gaussian_cut_off: 0.005,
            low_threshold: 0.5,
            high_threshold: 1.0,
            magnitude_scale: 100.0,
            magnitude_limit: 1000.0,
            magnitude_mode: MagnitudeMode::Exact,
        }
    }
}

impl EdgeDetectorConfig {
    /// Default parameters with the `|gx| + |gy|` magnitude.
    pub fn fast() -> Self {
        Self {
            magnitude_mode: MagnitudeMode::Approximate,
            ..Self::default()
        }
    }

    /// Panics if any parameter is out of range.
    pub fn validate(&self) {
        assert!(
            self.gaussian_kernel_radius > 0.0,
            "gaussian_kernel_radius must be positive, got {}",
            self.gaussian_kernel_radius
        );
        assert!(
            self.gaussian_kernel_width >= 2,
            "gaussian_kernel_width must be at least 2, got {}",
            self.gaussian_kernel_width
        );
        assert!(
            self.gaussian_cut_off >= 0.0,
            "gaussian_cut_off must be non-negative, got {}",
            self.gaussian_cut_off
        );
        assert!(
            self.low_threshold >= 0.0,
            "low_threshold must be non-negative, got {}",
            self.low_threshold
        );
        assert!(
            self.low_threshold <= self.high_threshold,
            "low_threshold ({}) must not exceed high_threshold ({})",
            self.low_threshold,
            self.high_threshold
        );
        assert!(
            self.magnitude_scale > 0.0,
            "magnitude_scale must be positive, got {}",
            self.magnitude_scale
        );
        assert!(
            self.magnitude_limit > 0.0,
            "magnitude_limit must be positive, got {}",
            self.magnitude_limit
        );
    }

    #[inline]
    pub fn low_threshold_scaled(&self) -> i32 {
        (self.low_threshold * self.magnitude_scale).round() as i32
    }

    #[inline]
    pub fn high_threshold_scaled(&self) -> i32 {
        (self.high_threshold * self.magnitude_scale).round() as i32
    }

    /// Largest integer magnitude a pixel can store.
    #[inline]
    pub fn magnitude_max(&self) -> i32 {
        (self.magnitude_scale * self.magnitude_limit) as i32
    }
}
