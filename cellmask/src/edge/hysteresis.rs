//! Two-threshold edge linking.

use super::Frame;

/// Keep pixels reachable from a seed of magnitude `>= high` through
/// 8-connected pixels of magnitude `>= low`. Kept pixels carry their
/// magnitude; all others are zero.
///
/// Seeds are scanned in raster order and each flood runs on an explicit stack.
pub(super) fn link_edges(magnitudes: &[i32], frame: Frame, low: i32, high: i32) -> Vec<i32> {
    assert_eq!(magnitudes.len(), frame.len(), "Frame buffer size mismatch");

    let mut output = vec![0i32; frame.len()];
    let mut visited = vec![false; frame.len()];
    let mut stack: Vec<(usize, usize)> = Vec::new();

    for y in 0..frame.height {
        for x in 0..frame.width {
            let idx = x + y * frame.width;
            if visited[idx] || magnitudes[idx] < high {
                continue;
            }
            visited[idx] = true;
            output[idx] = magnitudes[idx];
            stack.push((x, y));

            while let Some((cx, cy)) = stack.pop() {
                let x0 = cx.saturating_sub(1);
                let x1 = (cx + 1).min(frame.width - 1);
                let y0 = cy.saturating_sub(1);
                let y1 = (cy + 1).min(frame.height - 1);
                for nx in x0..=x1 {
                    for ny in y0..=y1 {
                        let n_idx = nx + ny * frame.width;
                        if !visited[n_idx] && magnitudes[n_idx] >= low {
                            visited[n_idx] = true;
                            output[n_idx] = magnitudes[n_idx];
                            stack.push((nx, ny));
                        }
                    }
                }
            }
        }
    }
    output
}
