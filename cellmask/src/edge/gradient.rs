//! Separable smoothing and cross-axis differentiation on the padded frame.

use super::kernel::GaussianKernels;
use super::Frame;

/// Per-pixel gradient components over the padded frame.
///
/// Pixels outside the ranges the kernels can reach stay zero.
#[derive(Debug)]
pub(super) struct Gradients {
    pub x: Vec<f32>,
    pub y: Vec<f32>,
}

/// Smooth along one axis, then differentiate along the other.
///
/// The X gradient is taken from the Y-smoothed image and the Y gradient from
/// the X-smoothed image, which together approximate the derivative of a 2D
/// Gaussian without building a 2D kernel.
pub(super) fn compute_gradients(
    data: &[f32],
    frame: Frame,
    kernels: &GaussianKernels,
) -> Gradients {
    assert_eq!(data.len(), frame.len(), "Frame buffer size mismatch");

    let kw = kernels.width();
    let stride = frame.width;
    let smoothing = &kernels.smoothing[..kw];
    let derivative = &kernels.derivative[..kw];

    let x_range = (kw - 1)..frame.width.saturating_sub(kw - 1);
    let y_range = (kw - 1)..frame.height.saturating_sub(kw - 1);

    let mut x_conv = vec![0.0f32; frame.len()];
    let mut y_conv = vec![0.0f32; frame.len()];
    for x in x_range.clone() {
        for y in y_range.clone() {
            let idx = x + y * stride;
            let mut sum_x = data[idx] * smoothing[0];
            let mut sum_y = sum_x;
            for (offset, &k) in smoothing.iter().enumerate().skip(1) {
                sum_y += k * (data[idx - offset * stride] + data[idx + offset * stride]);
                sum_x += k * (data[idx - offset] + data[idx + offset]);
            }
            x_conv[idx] = sum_x;
            y_conv[idx] = sum_y;
        }
    }

    let mut x_grad = vec![0.0f32; frame.len()];
    for x in x_range {
        for y in y_range.clone() {
            let idx = x + y * stride;
            let mut sum = 0.0f32;
            for (offset, &d) in derivative.iter().enumerate().skip(1) {
                sum += d * (y_conv[idx - offset] - y_conv[idx + offset]);
            }
            x_grad[idx] = sum;
        }
    }

    let mut y_grad = vec![0.0f32; frame.len()];
    for x in kw..frame.width.saturating_sub(kw) {
        for y in y_range.clone() {
            let idx = x + y * stride;
            let mut sum = 0.0f32;
            for (offset, &d) in derivative.iter().enumerate().skip(1) {
                sum += d * (x_conv[idx - offset * stride] - x_conv[idx + offset * stride]);
            }
            y_grad[idx] = sum;
        }
    }

    Gradients {
        x: x_grad,
        y: y_grad,
    }
}
