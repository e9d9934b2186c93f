//! Cellmask - per-object segmentation masks for imaging screens.
//!
//! This library provides the core of storing and analyzing segmented objects:
//! - Word-aligned packing of variable-size object masks into one buffer
//! - Canny-style edge extraction on binary masks
//! - Parent/child object tracking tables with adjacency queries
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use cellmask::{pack_objects, unpack_objects, EdgeDetector, EdgeMasks, SegmentedObject};
//!
//! let mut objects = vec![SegmentedObject::from_points([(3, 4), (4, 4), (4, 5)])?];
//! let detector = EdgeDetector::default();
//! let packed = pack_objects(&mut objects, EdgeMasks::Skip, &detector)?;
//!
//! // ... persist `packed.boxes` and `packed.masks.as_bytes()` ...
//!
//! let mut segmentation = unpack_objects(&packed)?;
//! let (index, _) = segmentation.find_object(4, 5).unwrap();
//! let edges = segmentation.edge_mask(index, &detector).unwrap()?;
//! ```

pub mod bbox;
pub mod edge;
pub mod error;
pub mod object;
pub mod packing;
pub mod segmentation;
pub mod tracking;

#[cfg(test)]
pub(crate) mod testing;

pub use common::bit_buffer::BitBuffer;

// ============================================================================
// Masks and packing
// ============================================================================

pub use bbox::BoundingBox;
pub use error::{Error, ErrorKind, Result};
pub use object::SegmentedObject;
pub use packing::PackedBuffer;
pub use segmentation::{
    pack_objects, unpack_objects, EdgeMasks, ImageSegmentation, PackedSegmentation,
};

// ============================================================================
// Edge detection
// ============================================================================

pub use edge::{EdgeDetector, EdgeDetectorConfig, MagnitudeMode};

// ============================================================================
// Tracking
// ============================================================================

pub use tracking::{IndexList, IndexWidth, LinkTable, ObjectTracking, ObjectTrackingBuilder};
