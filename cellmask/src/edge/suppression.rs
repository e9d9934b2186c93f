//! Non-maximal suppression along the gradient direction.

use super::config::EdgeDetectorConfig;
use super::gradient::Gradients;
use super::Frame;

/// Integer edge magnitudes of pixels that are local maxima along their
/// gradient; every other pixel is zero.
///
/// The neighbor magnitude on each side is interpolated between the two
/// neighbors the gradient points between, selected by the sign of `gx * gy`
/// and by whether `|gx| >= |gy|`. A pixel must be `>=` the forward
/// interpolation and strictly `>` the backward one, so of two equal pixels
/// on a plateau only one survives.
pub(super) fn suppress_non_maxima(
    gradients: &Gradients,
    frame: Frame,
    kernel_width: usize,
    config: &EdgeDetectorConfig,
) -> Vec<i32> {
    let mode = config.magnitude_mode;
    let scale = config.magnitude_scale;
    let max_magnitude = config.magnitude_max();
    let stride = frame.width;
    let magnitude_at = |idx: usize| mode.magnitude(gradients.x[idx], gradients.y[idx]);

    let mut magnitudes = vec![0i32; frame.len()];
    for x in kernel_width..frame.width.saturating_sub(kernel_width) {
        for y in kernel_width..frame.height.saturating_sub(kernel_width) {
            let idx = x + y * stride;
            let gx = gradients.x[idx];
            let gy = gradients.y[idx];
            let grad = mode.magnitude(gx, gy);

            let north = idx - stride;
            let south = idx + stride;
            let neighbors = Neighbors {
                n: magnitude_at(north),
                s: magnitude_at(south),
                w: magnitude_at(idx - 1),
                e: magnitude_at(idx + 1),
                ne: magnitude_at(north + 1),
                se: magnitude_at(south + 1),
                sw: magnitude_at(south - 1),
                nw: magnitude_at(north - 1),
            };

            if is_local_maximum(gx, gy, grad, &neighbors) {
                magnitudes[idx] = ((grad * scale).round() as i32).min(max_magnitude);
            }
        }
    }
    magnitudes
}

struct Neighbors {
    n: f32,
    s: f32,
    w: f32,
    e: f32,
    ne: f32,
    se: f32,
    sw: f32,
    nw: f32,
}

#[inline]
fn is_local_maximum(gx: f32, gy: f32, grad: f32, nb: &Neighbors) -> bool {
    if gx * gy <= 0.0 {
        if gx.abs() >= gy.abs() {
            let tmp = (gx * grad).abs();
            tmp >= (gy * nb.ne - (gx + gy) * nb.e).abs()
                && tmp > (gy * nb.sw - (gx + gy) * nb.w).abs()
        } else {
            let tmp = (gy * grad).abs();
            tmp >= (gx * nb.ne - (gy + gx) * nb.n).abs()
                && tmp > (gx * nb.sw - (gy + gx) * nb.s).abs()
        }
    } else if gx.abs() >= gy.abs() {
        let tmp = (gx * grad).abs();
        tmp >= (gy * nb.se + (gx - gy) * nb.e).abs()
            && tmp > (gy * nb.nw + (gx - gy) * nb.w).abs()
    } else {
        let tmp = (gy * grad).abs();
        tmp >= (gx * nb.se + (gy - gx) * nb.s).abs()
            && tmp > (gx * nb.nw + (gy - gx) * nb.n).abs()
    }
}
