//! Packing a batch of objects for storage and reading it back.
//!
//! Writing is two-pass: every mask is validated and every box gets its word
//! offset before the first mask is written, so the storage layer knows the
//! total buffer size up front. Edge masks, when persisted, go into a second
//! buffer at the same word offsets as the masks.

use common::bit_buffer::BitBuffer;
use serde::{Deserialize, Serialize};

use crate::bbox::BoundingBox;
use crate::edge::EdgeDetector;
use crate::error::Result;
use crate::object::SegmentedObject;
use crate::packing::{assign_offsets, PackedBuffer};

/// Whether edge masks are written alongside the masks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeMasks {
    /// Leave edge masks to be computed when read.
    #[default]
    Skip,
    /// Compute and persist an edge mask for every object.
    Precompute,
}

/// Everything the storage layer persists for one image's objects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackedSegmentation {
    pub boxes: Vec<BoundingBox>,
    pub masks: PackedBuffer,
    pub edges: Option<PackedBuffer>,
}

/// Assign storage offsets to `objects` and pack their masks.
///
/// Boxes are frozen by this call. On error nothing has been frozen.
pub fn pack_objects(
    objects: &mut [SegmentedObject],
    edge_masks: EdgeMasks,
    detector: &EdgeDetector,
) -> Result<PackedSegmentation> {
    for object in objects.iter() {
        object.validate_mask()?;
    }
    let total_words = assign_offsets(objects.iter_mut().map(|object| object.bbox_mut()))?;

    let mut masks = PackedBuffer::with_total_words(total_words);
    let mut edges = match edge_masks {
        EdgeMasks::Skip => None,
        EdgeMasks::Precompute => Some(PackedBuffer::with_total_words(total_words)),
    };
    for object in objects.iter_mut() {
        let bbox = *object.bbox();
        masks.write_mask(&bbox, object.mask())?;
        if let Some(edges) = edges.as_mut() {
            edges.write_mask(&bbox, object.edge_mask(detector)?)?;
        }
    }

    tracing::debug!(
        objects = objects.len(),
        total_words,
        edge_masks = ?edge_masks,
        "Packed segmentation"
    );
    Ok(PackedSegmentation {
        boxes: objects.iter().map(|object| *object.bbox()).collect(),
        masks,
        edges,
    })
}

/// Rebuild the objects of a packed segmentation.
pub fn unpack_objects(packed: &PackedSegmentation) -> Result<ImageSegmentation> {
    let objects = packed
        .boxes
        .iter()
        .map(|bbox| {
            let mut object = SegmentedObject::from_parts(*bbox, packed.masks.read_mask(bbox)?)?;
            if let Some(edges) = &packed.edges {
                object.set_edge_mask(edges.read_mask(bbox)?)?;
            }
            Ok(object)
        })
        .collect::<Result<Vec<_>>>()?;

    tracing::debug!(
        objects = objects.len(),
        persisted_edges = packed.edges.is_some(),
        "Unpacked segmentation"
    );
    Ok(ImageSegmentation { objects })
}

/// The objects of one image, addressed by their index.
#[derive(Debug, Clone, Default)]
pub struct ImageSegmentation {
    objects: Vec<SegmentedObject>,
}

impl ImageSegmentation {
    pub fn new(objects: Vec<SegmentedObject>) -> Self {
        Self { objects }
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn object(&self, index: usize) -> Option<&SegmentedObject> {
        self.objects.get(index)
    }

    pub fn objects(&self) -> &[SegmentedObject] {
        &self.objects
    }

    /// First object whose mask contains `(x, y)`, with its index.
    pub fn find_object(&self, x: i32, y: i32) -> Option<(usize, &SegmentedObject)> {
        self.objects
            .iter()
            .enumerate()
            .find(|(_, object)| object.mask_point(x, y))
    }

    /// Edge mask of object `index`, computed if it was not persisted.
    /// `None` if there is no such object.
    pub fn edge_mask(
        &mut self,
        index: usize,
        detector: &EdgeDetector,
    ) -> Option<Result<&BitBuffer>> {
        self.objects
            .get_mut(index)
            .map(|object| object.edge_mask(detector))
    }
}
