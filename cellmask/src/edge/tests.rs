use common::bit_buffer::BitBuffer;
use common::log_setup::setup_test_logging;
use rand::Rng;

use super::*;
use crate::testing::{disc_mask, parse_mask, random_mask, render_mask, seeded_rng};

fn boundary_ring(width: usize, height: usize) -> Vec<String> {
    (0..height)
        .map(|y| {
            (0..width)
                .map(|x| {
                    if x == 0 || y == 0 || x + 1 == width || y + 1 == height {
                        '#'
                    } else {
                        '.'
                    }
                })
                .collect()
        })
        .collect()
}

fn detector_with_thresholds(low: f32, high: f32) -> EdgeDetector {
    EdgeDetector::new(EdgeDetectorConfig {
        low_threshold: low,
        high_threshold: high,
        ..EdgeDetectorConfig::default()
    })
}

#[test]
fn test_filled_square_yields_boundary_ring() {
    setup_test_logging();
    let mask = BitBuffer::new_filled(100, true);

    let edges = EdgeDetector::default().detect(&mask, 10, 10);

    assert_eq!(render_mask(&edges, 10, 10), boundary_ring(10, 10));
    assert_eq!(edges.count_ones(), 36);
}

#[test]
fn test_filled_rectangles_yield_boundary_ring() {
    let detector = EdgeDetector::default();
    for (width, height) in [(3, 4), (7, 3), (4, 9)] {
        let mask = BitBuffer::new_filled(width * height, true);

        let edges = detector.detect(&mask, width, height);

        assert_eq!(
            render_mask(&edges, width, height),
            boundary_ring(width, height),
            "{}x{}",
            width,
            height
        );
    }
}

#[test]
fn test_thin_masks_are_all_edge() {
    let detector = EdgeDetector::default();
    for (width, height) in [(1, 1), (1, 5), (5, 1)] {
        let mask = BitBuffer::new_filled(width * height, true);

        let edges = detector.detect(&mask, width, height);

        assert_eq!(edges, mask, "{}x{}", width, height);
    }
}

#[test]
fn test_empty_mask_has_no_edges() {
    let detector = EdgeDetector::default();

    let edges = detector.detect(&BitBuffer::new_default(64), 8, 8);
    assert_eq!(edges.len(), 64);
    assert_eq!(edges.count_ones(), 0);

    assert!(detector.detect(&BitBuffer::new_default(0), 0, 7).is_empty());
}

#[test]
fn test_disc_outline() {
    let mask = disc_mask(12, 12, 5.5, 5.5, 5.0);

    let edges = EdgeDetector::default().detect(&mask, 12, 12);

    let expected = [
        "............",
        "...######...",
        "..#......#..",
        ".#........#.",
        ".#........#.",
        "#.........#.",
        "#.........#.",
        ".#........#.",
        ".#........#.",
        "..#......#..",
        "...##..##...",
        ".....##.....",
    ];
    assert_eq!(render_mask(&edges, 12, 12), expected);

    // Left, top and bottom peaks sit on the background pixel next to the
    // object, but every edge pixel touches it.
    let background_edges = edges.iter_ones().filter(|&bit| !mask.get(bit)).count();
    assert_eq!(background_edges, 12);
    for bit in edges.iter_ones() {
        let (x, y) = ((bit / 12) as isize, (bit % 12) as isize);
        let touches = (-1..=1).any(|dx| {
            (-1..=1).any(|dy| {
                let (nx, ny) = (x + dx, y + dy);
                (0..12).contains(&nx)
                    && (0..12).contains(&ny)
                    && mask.get((nx * 12 + ny) as usize)
            })
        });
        assert!(touches, "edge pixel ({}, {}) is detached from the mask", x, y);
    }
}

#[test]
fn test_approximate_magnitude_matches_on_simple_shapes() {
    let exact = EdgeDetector::default();
    let fast = EdgeDetector::new(EdgeDetectorConfig::fast());

    let square = BitBuffer::new_filled(100, true);
    assert_eq!(fast.detect(&square, 10, 10), exact.detect(&square, 10, 10));

    let disc = disc_mask(12, 12, 5.5, 5.5, 5.0);
    assert_eq!(fast.detect(&disc, 12, 12).count_ones(), 28);
}

#[test]
fn test_thickened_square() {
    let mask = BitBuffer::new_filled(100, true);

    let edges = EdgeDetector::default().detect_thickened(&mask, 10, 10);

    let rendered = render_mask(&edges, 10, 10);
    for (y, row) in rendered.iter().enumerate() {
        for (x, c) in row.chars().enumerate() {
            let on_band = x < 2 || x > 7 || y < 2 || y > 7;
            assert_eq!(c == '#', on_band, "pixel ({}, {})", x, y);
        }
    }
    assert_eq!(edges.count_ones(), 64);
}

#[test]
fn test_thickened_contains_plain_edges() {
    let detector = EdgeDetector::default();
    let mut rng = seeded_rng(3);
    for _ in 0..10 {
        let mask = random_mask(&mut rng, 9, 13, 0.6);

        let plain = detector.detect(&mask, 9, 13);
        let thick = detector.detect_thickened(&mask, 9, 13);

        for bit in plain.iter_ones() {
            assert!(thick.get(bit));
        }
    }
}

#[test]
fn test_thickened_block_stays_inside_image() {
    let (mask, width, height) = parse_mask(&["#"]);

    let edges = EdgeDetector::default().detect_thickened(&mask, width, height);

    assert_eq!(edges, mask);
}

#[test]
fn test_deterministic() {
    let detector = EdgeDetector::default();
    let mut rng = seeded_rng(42);
    for _ in 0..10 {
        let mask = random_mask(&mut rng, 17, 11, 0.5);
        assert_eq!(detector.detect(&mask, 17, 11), detector.detect(&mask, 17, 11));
    }
}

#[test]
fn test_raising_thresholds_never_adds_edges() {
    let thresholds = [(0.5, 1.0), (2.0, 5.0), (20.0, 40.0)];
    let detectors: Vec<EdgeDetector> = thresholds
        .iter()
        .map(|&(low, high)| detector_with_thresholds(low, high))
        .collect();

    let mut rng = seeded_rng(5);
    for _ in 0..30 {
        let width = rng.random_range(1..20);
        let height = rng.random_range(1..20);
        let mask = random_mask(&mut rng, width, height, 0.5);

        let results: Vec<BitBuffer> = detectors
            .iter()
            .map(|d| d.detect(&mask, width, height))
            .collect();

        for pair in results.windows(2) {
            assert!(pair[1].count_ones() <= pair[0].count_ones());
            for bit in pair[1].iter_ones() {
                assert!(pair[0].get(bit));
            }
        }
    }
}

#[test]
fn test_thresholds_bracket_square_magnitude() {
    // Boundary magnitudes of a filled square lie between 48 and 49.
    let mask = BitBuffer::new_filled(100, true);
    let edge_count = |low, high| {
        detector_with_thresholds(low, high)
            .detect(&mask, 10, 10)
            .count_ones()
    };

    assert_eq!(edge_count(0.6, 0.6), 36);
    assert_eq!(edge_count(48.0, 48.0), 36);
    assert_eq!(edge_count(1.0, 50.0), 0);
    assert_eq!(edge_count(50.0, 50.0), 0);
}

#[test]
#[should_panic(expected = "Mask has 10 bits")]
fn test_dimension_mismatch_panics() {
    EdgeDetector::default().detect(&BitBuffer::new_default(10), 3, 3);
}

#[test]
#[should_panic(expected = "low_threshold")]
fn test_inverted_thresholds_rejected() {
    detector_with_thresholds(2.0, 1.0);
}

#[test]
fn test_config_defaults() {
    let config = EdgeDetectorConfig::default();
    config.validate();
    assert_eq!(config.low_threshold_scaled(), 50);
    assert_eq!(config.high_threshold_scaled(), 100);
    assert_eq!(config.magnitude_max(), 100_000);
    assert_eq!(config.magnitude_mode, MagnitudeMode::Exact);
    assert_eq!(EdgeDetectorConfig::fast().magnitude_mode, MagnitudeMode::Approximate);
}

#[test]
fn test_config_from_partial_yaml() {
    let yaml = "low_threshold: 0.25\nmagnitude_mode: approximate\n";

    let config: EdgeDetectorConfig = serde_yml::from_str(yaml).unwrap();

    assert_eq!(config.low_threshold, 0.25);
    assert_eq!(config.magnitude_mode, MagnitudeMode::Approximate);
    assert_eq!(config.high_threshold, 1.0);
    assert_eq!(config.gaussian_kernel_width, 2);
}

#[test]
fn test_config_json_roundtrip() {
    let config = EdgeDetectorConfig {
        gaussian_kernel_width: 4,
        ..EdgeDetectorConfig::fast()
    };

    let json = serde_json::to_string(&config).unwrap();
    let restored: EdgeDetectorConfig = serde_json::from_str(&json).unwrap();

    assert_eq!(restored, config);
}

#[test]
fn test_frame_indexing() {
    let frame = Frame::around(4, 2);
    assert_eq!((frame.width, frame.height), (10, 8));
    assert_eq!(frame.len(), 80);
    assert_eq!(frame.image_index(0, 0), 33);
    assert_eq!(frame.image_index(-1, 0), 32);
    assert_eq!(frame.image_index(3, 2), 56);
}
