use std::f32::consts::PI;

use super::config::EdgeDetectorConfig;

/// One-sided Gaussian smoothing kernel and its matching derivative kernel.
///
/// Tap 0 is the center. Only the first [`width`](Self::width) taps are used;
/// the derivative center tap is always zero.
#[derive(Debug, Clone)]
pub(super) struct GaussianKernels {
    pub smoothing: Vec<f32>,
    pub derivative: Vec<f32>,
    width: usize,
}

impl GaussianKernels {
    pub fn new(config: &EdgeDetectorConfig) -> Self {
        let radius = config.gaussian_kernel_radius;
        let max_width = config.gaussian_kernel_width;
        let norm = 2.0 * PI * radius * radius;

        let mut smoothing = vec![0.0f32; max_width];
        let mut derivative = vec![0.0f32; max_width];
        let mut width = 0;
        while width < max_width {
            let tap = width as f64;
            let center = gaussian(tap, radius);
            if center <= config.gaussian_cut_off && width >= 2 {
                break;
            }
            let left = gaussian(tap - 0.5, radius);
            let right = gaussian(tap + 0.5, radius);
            smoothing[width] = (center + left + right) / 3.0 / norm;
            derivative[width] = right - left;
            width += 1;
        }

        Self {
            smoothing,
            derivative,
            width,
        }
    }

    /// Number of taps in use, center included.
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }
}

#[inline]
fn gaussian(x: f64, sigma: f32) -> f32 {
    let sigma = sigma as f64;
    (-(x * x) / (2.0 * sigma * sigma)).exp() as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_kernels() {
        let kernels = GaussianKernels::new(&EdgeDetectorConfig::default());

        assert_eq!(kernels.width(), 2);
        assert!((kernels.smoothing[0] - 0.146_687_46).abs() < 1e-6);
        assert!((kernels.smoothing[1] - 0.096_218_71).abs() < 1e-6);
        assert_eq!(kernels.derivative[0], 0.0);
        assert!((kernels.derivative[1] + 0.557_844_4).abs() < 1e-6);
    }

    #[test]
    fn test_cut_off_truncates_after_two_taps() {
        let wide = EdgeDetectorConfig {
            gaussian_kernel_width: 6,
            ..EdgeDetectorConfig::default()
        };
        // exp(-4.5) ~ 0.011 survives 0.005, exp(-8) ~ 0.0003 does not
        assert_eq!(GaussianKernels::new(&wide).width(), 4);

        let coarse = EdgeDetectorConfig {
            gaussian_cut_off: 0.02,
            ..wide
        };
        assert_eq!(GaussianKernels::new(&coarse).width(), 3);

        let never = EdgeDetectorConfig {
            gaussian_cut_off: 1.0,
            ..wide
        };
        assert_eq!(GaussianKernels::new(&never).width(), 2);
    }
}
