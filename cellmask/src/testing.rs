//! Test helpers shared across module tests.

use common::bit_buffer::BitBuffer;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::bbox::BoundingBox;

pub fn seeded_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Non-empty box of up to 40x40 pixels somewhere around the origin.
pub fn random_box(rng: &mut StdRng) -> BoundingBox {
    let min_x = rng.random_range(-50i16..50);
    let min_y = rng.random_range(-50i16..50);
    let width = rng.random_range(1i16..=40);
    let height = rng.random_range(1i16..=40);
    BoundingBox::new(min_x, min_y, min_x + width - 1, min_y + height - 1).unwrap()
}

/// Random column-major mask with roughly `density` of its pixels set.
pub fn random_mask(rng: &mut StdRng, width: usize, height: usize, density: f64) -> BitBuffer {
    let bits: Vec<bool> = (0..width * height)
        .map(|_| rng.random_bool(density))
        .collect();
    BitBuffer::from_slice(&bits)
}

/// Column-major mask from rows of `#` (set) and `.` (clear).
pub fn parse_mask(rows: &[&str]) -> (BitBuffer, usize, usize) {
    let height = rows.len();
    let width = rows.first().map_or(0, |row| row.len());
    let mut mask = BitBuffer::new_default(width * height);
    for (y, row) in rows.iter().enumerate() {
        assert_eq!(row.len(), width, "ragged mask row {}", y);
        for (x, c) in row.chars().enumerate() {
            mask.set(x * height + y, c == '#');
        }
    }
    (mask, width, height)
}

/// Render a column-major mask as rows of `#` and `.`.
pub fn render_mask(mask: &BitBuffer, width: usize, height: usize) -> Vec<String> {
    (0..height)
        .map(|y| {
            (0..width)
                .map(|x| if mask.get(x * height + y) { '#' } else { '.' })
                .collect()
        })
        .collect()
}

/// Column-major filled disc mask.
pub fn disc_mask(width: usize, height: usize, cx: f32, cy: f32, radius: f32) -> BitBuffer {
    let mut mask = BitBuffer::new_default(width * height);
    for x in 0..width {
        for y in 0..height {
            let dx = x as f32 - cx;
            let dy = y as f32 - cy;
            if dx * dx + dy * dy <= radius * radius {
                mask.set(x * height + y, true);
            }
        }
    }
    mask
}
