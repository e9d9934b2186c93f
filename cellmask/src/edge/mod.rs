//! Canny-style edge extraction for binary object masks.
//!
//! The mask is copied into a frame with a 3-pixel zero border, smoothed and
//! differentiated with separable Gaussian kernels, thinned by non-maximal
//! suppression and linked by hysteresis. Masks are column-major
//! (`x * height + y`), the same layout as a bounding box's mask bits.
//!
//! On the left, top and bottom sides of an object the gradient peak lands one
//! pixel outside the object, on the neighboring background pixel, so edge
//! pixels always touch the mask but are not always part of it. For an object
//! reaching the left or bottom image boundary that background pixel lies in
//! the border. The border column left of the image is folded onto column 0
//! and the border row below it onto the last row, so a solid rectangle that
//! fills the image still yields its complete boundary ring.

#[cfg(test)]
mod tests;

mod config;
mod gradient;
mod hysteresis;
mod kernel;
mod suppression;

pub use config::{EdgeDetectorConfig, MagnitudeMode};

use common::bit_buffer::BitBuffer;

use gradient::compute_gradients;
use hysteresis::link_edges;
use kernel::GaussianKernels;
use suppression::suppress_non_maxima;

/// Intensity of a foreground mask pixel in the working frame.
const FOREGROUND: f32 = 255.0;

/// Dimensions of the zero-padded working frame, row-major.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Frame {
    width: usize,
    height: usize,
}

impl Frame {
    const BORDER: usize = 3;

    fn around(width: usize, height: usize) -> Self {
        Self {
            width: width + 2 * Self::BORDER,
            height: height + 2 * Self::BORDER,
        }
    }

    #[inline]
    fn len(&self) -> usize {
        self.width * self.height
    }

    /// Frame index of image pixel `(x, y)`; `-1..` reaches into the border.
    #[inline]
    fn image_index(&self, x: isize, y: isize) -> usize {
        let border = Self::BORDER as isize;
        ((border + x) + (border + y) * self.width as isize) as usize
    }
}

/// Stateless edge detector. Each call allocates its own scratch buffers, so
/// one detector may be shared across threads.
#[derive(Debug, Clone, Default)]
pub struct EdgeDetector {
    config: EdgeDetectorConfig,
}

impl EdgeDetector {
    /// Panics if `config` is invalid.
    pub fn new(config: EdgeDetectorConfig) -> Self {
        config.validate();
        Self { config }
    }

    pub fn config(&self) -> &EdgeDetectorConfig {
        &self.config
    }

    /// Edge mask of `mask`, same size and layout.
    ///
    /// Panics if `mask` does not hold exactly `width * height` bits.
    pub fn detect(&self, mask: &BitBuffer, width: usize, height: usize) -> BitBuffer {
        self.detect_impl(mask, width, height, false)
    }

    /// Like [`detect`](Self::detect), but each edge pixel also sets the 2x2
    /// block it anchors, shifted back inside the image at the right and
    /// bottom borders. Intended for display.
    pub fn detect_thickened(&self, mask: &BitBuffer, width: usize, height: usize) -> BitBuffer {
        self.detect_impl(mask, width, height, true)
    }

    fn detect_impl(
        &self,
        mask: &BitBuffer,
        width: usize,
        height: usize,
        thicken: bool,
    ) -> BitBuffer {
        assert_eq!(
            mask.len(),
            width * height,
            "Mask has {} bits, expected {}x{}",
            mask.len(),
            width,
            height
        );
        if mask.is_empty() {
            return BitBuffer::new_default(0);
        }

        let frame = Frame::around(width, height);
        let intensities = self.edge_intensities(mask, width, height, frame);

        let mut edges = BitBuffer::new_default(width * height);
        for x in 0..width {
            for y in 0..height {
                if intensities[frame.image_index(x as isize, y as isize)] <= 0 {
                    continue;
                }
                if thicken {
                    set_block(&mut edges, x, y, width, height);
                } else {
                    edges.set(x * height + y, true);
                }
            }
        }

        tracing::trace!(
            width,
            height,
            edge_pixels = edges.count_ones(),
            "Detected mask edges"
        );
        edges
    }

    /// Linked edge intensities over the whole frame with the border column
    /// and row folded onto the image.
    fn edge_intensities(
        &self,
        mask: &BitBuffer,
        width: usize,
        height: usize,
        frame: Frame,
    ) -> Vec<i32> {
        let mut data = vec![0.0f32; frame.len()];
        for bit in mask.iter_ones() {
            let (x, y) = (bit / height, bit % height);
            data[frame.image_index(x as isize, y as isize)] = FOREGROUND;
        }

        let kernels = GaussianKernels::new(&self.config);
        let gradients = compute_gradients(&data, frame, &kernels);
        let magnitudes = suppress_non_maxima(&gradients, frame, kernels.width(), &self.config);
        let mut intensities = link_edges(
            &magnitudes,
            frame,
            self.config.low_threshold_scaled(),
            self.config.high_threshold_scaled(),
        );

        let last_row = height as isize - 1;
        for x in 0..width as isize {
            let below = intensities[frame.image_index(x, last_row + 1)];
            intensities[frame.image_index(x, last_row)] += below;
        }
        for y in 0..height as isize {
            let left = intensities[frame.image_index(-1, y)];
            intensities[frame.image_index(0, y)] += left;
        }
        intensities
    }
}

/// Set the 2x2 block at `(x, y)`, moved left/up when it would leave the image.
fn set_block(edges: &mut BitBuffer, x: usize, y: usize, width: usize, height: usize) {
    let x0 = if x + 1 == width && x > 0 { x - 1 } else { x };
    let y0 = if y + 1 == height && y > 0 { y - 1 } else { y };
    for bx in x0..=(x0 + 1).min(width - 1) {
        for by in y0..=(y0 + 1).min(height - 1) {
            edges.set(bx * height + by, true);
        }
    }
}
