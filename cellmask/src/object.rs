//! One segmented object: its bounding box, pixel mask and optional edge mask.

use common::bit_buffer::BitBuffer;

use crate::bbox::BoundingBox;
use crate::edge::EdgeDetector;
use crate::error::{Error, Result};
use crate::packing::{check_mask_fits, point_of_bit, relative_bit_index};

/// A bounding box plus a column-major mask of `size_in_pixels` bits.
///
/// The edge mask, when present, has the same size and layout as the mask. It
/// is either supplied from storage or computed on first request and cached.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SegmentedObject {
    bbox: BoundingBox,
    mask: BitBuffer,
    edge_mask: Option<BitBuffer>,
}

impl SegmentedObject {
    /// Object with an empty box and no pixels.
    pub fn new() -> Self {
        Self::default()
    }

    /// Object covering the given bounds with an all-clear mask.
    pub fn with_bounds(min_x: i16, min_y: i16, max_x: i16, max_y: i16) -> Result<Self> {
        let bbox = BoundingBox::new(min_x, min_y, max_x, max_y)?;
        let mask = BitBuffer::new_default(bbox.size_in_pixels()?);
        Ok(Self {
            bbox,
            mask,
            edge_mask: None,
        })
    }

    /// Adopt an existing box and mask, e.g. read back from a packed buffer.
    ///
    /// The mask is resized to the box; set bits past the box are an error.
    pub fn from_parts(bbox: BoundingBox, mask: BitBuffer) -> Result<Self> {
        check_mask_fits(&bbox, &mask)?;
        let size_in_pixels = bbox.size_in_pixels()?;
        let mask = if mask.len() == size_in_pixels {
            mask
        } else {
            let mut resized = BitBuffer::new_default(size_in_pixels);
            for bit in mask.iter_ones() {
                resized.set(bit, true);
            }
            resized
        };
        Ok(Self {
            bbox,
            mask,
            edge_mask: None,
        })
    }

    /// Object whose box is the tight bounds of `points` and whose mask has
    /// exactly those pixels set.
    pub fn from_points<I>(points: I) -> Result<Self>
    where
        I: IntoIterator<Item = (i32, i32)>,
        I::IntoIter: Clone,
    {
        let points = points.into_iter();
        let mut bbox = BoundingBox::empty();
        for (x, y) in points.clone() {
            bbox.include(x, y)?;
        }
        if bbox.is_empty() {
            return Ok(Self::new());
        }

        let mut mask = BitBuffer::new_default(bbox.size_in_pixels()?);
        for (x, y) in points {
            mask.set(relative_bit_index(&bbox, x, y)?, true);
        }
        Ok(Self {
            bbox,
            mask,
            edge_mask: None,
        })
    }

    #[inline]
    pub fn bbox(&self) -> &BoundingBox {
        &self.bbox
    }

    pub(crate) fn bbox_mut(&mut self) -> &mut BoundingBox {
        &mut self.bbox
    }

    #[inline]
    pub fn mask(&self) -> &BitBuffer {
        &self.mask
    }

    #[inline]
    pub fn width(&self) -> Result<usize> {
        self.bbox.width()
    }

    #[inline]
    pub fn height(&self) -> Result<usize> {
        self.bbox.height()
    }

    /// Set pixel `(x, y)`, growing the box if needed.
    ///
    /// Growing re-lays out the existing mask for the new height and drops any
    /// cached edge mask. Fails with [`Error::FrozenBox`] once the object has a
    /// storage offset.
    pub fn add_point(&mut self, x: i32, y: i32) -> Result<()> {
        if !self.bbox.contains(x, y) {
            let old_bbox = self.bbox;
            let mut grown = self.bbox;
            grown.include(x, y)?;

            let mut mask = BitBuffer::new_default(grown.size_in_pixels()?);
            if !old_bbox.is_empty() {
                let old_height = old_bbox.height()?;
                for bit in self.mask.iter_ones() {
                    let (px, py) = point_of_bit(&old_bbox, old_height, bit);
                    mask.set(relative_bit_index(&grown, px, py)?, true);
                }
            }
            self.bbox = grown;
            self.mask = mask;
        }
        self.set_mask_point(x, y)
    }

    /// Set pixel `(x, y)` inside the current box.
    pub fn set_mask_point(&mut self, x: i32, y: i32) -> Result<()> {
        let bit = relative_bit_index(&self.bbox, x, y)?;
        self.mask.set(bit, true);
        self.edge_mask = None;
        Ok(())
    }

    /// Whether pixel `(x, y)` is set. Pixels outside the box are not.
    pub fn mask_point(&self, x: i32, y: i32) -> bool {
        match relative_bit_index(&self.bbox, x, y) {
            Ok(bit) => self.mask.get(bit),
            Err(_) => false,
        }
    }

    /// Absolute coordinates of all set pixels, column by column.
    pub fn mask_points(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        let height = self.bbox.height().unwrap_or(1);
        self.mask
            .iter_ones()
            .map(move |bit| point_of_bit(&self.bbox, height, bit))
    }

    #[inline]
    pub fn pixel_count(&self) -> usize {
        self.mask.count_ones()
    }

    /// Fails if the mask has bits past the box.
    pub fn validate_mask(&self) -> Result<()> {
        check_mask_fits(&self.bbox, &self.mask)
    }

    /// Edge mask, computed with `detector` and cached on first use.
    pub fn edge_mask(&mut self, detector: &EdgeDetector) -> Result<&BitBuffer> {
        let edges = match self.edge_mask.take() {
            Some(edges) => edges,
            None => detector.detect(&self.mask, self.width()?, self.height()?),
        };
        Ok(self.edge_mask.insert(edges))
    }

    /// Attach a persisted edge mask.
    pub fn set_edge_mask(&mut self, edge_mask: BitBuffer) -> Result<()> {
        if edge_mask.len() != self.mask.len() {
            return Err(Error::EdgeMaskSizeMismatch {
                expected: self.mask.len(),
                actual: edge_mask.len(),
            });
        }
        self.edge_mask = Some(edge_mask);
        Ok(())
    }

    #[inline]
    pub fn cached_edge_mask(&self) -> Option<&BitBuffer> {
        self.edge_mask.as_ref()
    }

    /// Whether `(x, y)` is an edge pixel, computing the edge mask if needed.
    pub fn edge_mask_point(&mut self, x: i32, y: i32, detector: &EdgeDetector) -> Result<bool> {
        let Ok(bit) = relative_bit_index(&self.bbox, x, y) else {
            return Ok(false);
        };
        Ok(self.edge_mask(detector)?.get(bit))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_points_tight_box() {
        let points = vec![(3, 4), (5, 4), (4, 6)];

        let object = SegmentedObject::from_points(points.iter().copied()).unwrap();

        assert_eq!(object.bbox(), &BoundingBox::new(3, 4, 5, 6).unwrap());
        assert_eq!(object.pixel_count(), 3);
        for &(x, y) in &points {
            assert!(object.mask_point(x, y));
        }
        assert!(!object.mask_point(4, 4));
        assert!(object.validate_mask().is_ok());
    }

    #[test]
    fn test_from_no_points_is_empty() {
        let object = SegmentedObject::from_points(std::iter::empty()).unwrap();
        assert!(object.bbox().is_empty());
        assert_eq!(object.pixel_count(), 0);
    }

    #[test]
    fn test_mask_point_outside_box_is_false() {
        let mut object = SegmentedObject::with_bounds(10, 10, 19, 19).unwrap();
        object.set_mask_point(10, 10).unwrap();

        assert!(object.mask_point(10, 10));
        assert!(!object.mask_point(9, 10));
        assert!(!object.mask_point(20, 20));
        assert!(!SegmentedObject::new().mask_point(0, 0));
    }

    #[test]
    fn test_set_mask_point_outside_box_fails() {
        let mut object = SegmentedObject::with_bounds(0, 0, 4, 4).unwrap();
        assert!(matches!(
            object.set_mask_point(5, 0),
            Err(Error::OutOfBounds { x: 5, y: 0, .. })
        ));
    }

    #[test]
    fn test_add_point_grows_and_preserves_pixels() {
        let mut object = SegmentedObject::new();
        object.add_point(2, 2).unwrap();
        object.add_point(3, 2).unwrap();
        object.add_point(0, 5).unwrap();
        object.add_point(1, 1).unwrap();

        assert_eq!(object.bbox(), &BoundingBox::new(0, 1, 3, 5).unwrap());
        let mut points: Vec<_> = object.mask_points().collect();
        points.sort_unstable();
        assert_eq!(points, vec![(0, 5), (1, 1), (2, 2), (3, 2)]);
    }

    #[test]
    fn test_mask_points_column_major_order() {
        let object = SegmentedObject::from_points([(1, 0), (0, 1), (0, 0)]).unwrap();
        let points: Vec<_> = object.mask_points().collect();
        assert_eq!(points, vec![(0, 0), (0, 1), (1, 0)]);
    }

    #[test]
    fn test_add_point_on_frozen_box_fails() {
        let mut object = SegmentedObject::with_bounds(0, 0, 1, 1).unwrap();
        object.bbox_mut().set_bit_offset(0);

        object.add_point(1, 1).unwrap();
        assert!(matches!(
            object.add_point(2, 2),
            Err(Error::FrozenBox { .. })
        ));
    }

    #[test]
    fn test_edge_mask_is_cached_and_invalidated() {
        let detector = EdgeDetector::default();
        let mut object = SegmentedObject::with_bounds(0, 0, 9, 9).unwrap();
        for x in 0..10 {
            for y in 0..10 {
                object.set_mask_point(x, y).unwrap();
            }
        }
        assert!(object.cached_edge_mask().is_none());

        assert_eq!(object.edge_mask(&detector).unwrap().count_ones(), 36);
        assert!(object.cached_edge_mask().is_some());
        assert!(object.edge_mask_point(0, 4, &detector).unwrap());
        assert!(!object.edge_mask_point(4, 4, &detector).unwrap());
        assert!(!object.edge_mask_point(40, 4, &detector).unwrap());

        object.add_point(10, 0).unwrap();
        assert!(object.cached_edge_mask().is_none());
    }

    #[test]
    fn test_set_edge_mask_size_checked() {
        let mut object = SegmentedObject::with_bounds(0, 0, 2, 2).unwrap();

        assert_eq!(
            object.set_edge_mask(BitBuffer::new_default(4)),
            Err(Error::EdgeMaskSizeMismatch {
                expected: 9,
                actual: 4
            })
        );

        let mut edges = BitBuffer::new_default(9);
        edges.set(4, true);
        object.set_edge_mask(edges).unwrap();
        assert!(object.edge_mask_point(1, 1, &EdgeDetector::default()).unwrap());
    }

    #[test]
    fn test_from_parts_resizes_and_checks_bits() {
        let bbox = BoundingBox::new(0, 0, 2, 2).unwrap();
        let mut padded = BitBuffer::new_default(64);
        padded.set(8, true);

        let object = SegmentedObject::from_parts(bbox, padded.clone()).unwrap();
        assert_eq!(object.mask().len(), 9);
        assert!(object.mask_point(2, 2));

        padded.set(9, true);
        assert!(matches!(
            SegmentedObject::from_parts(bbox, padded),
            Err(Error::MaskExceedsBoundingBox { .. })
        ));
    }
}
