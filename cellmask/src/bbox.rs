//! Axis-aligned bounding box of one segmented object.

use std::fmt;

use common::bit_buffer::BITS_PER_WORD;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Inclusive pixel-space bounds of an object plus its storage placement.
///
/// An empty box (see [`BoundingBox::empty`]) has inverted bounds so that the
/// first [`include`](BoundingBox::include) sets them. Geometry queries on an
/// empty box fail with [`Error::UninitializedBox`]. Once a bit offset has been
/// assigned the box is frozen and can no longer grow.
///
/// Deserialization re-checks the bounds and requires a word-aligned offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "StoredBoundingBox")]
pub struct BoundingBox {
    min_x: i16,
    min_y: i16,
    max_x: i16,
    max_y: i16,
    bit_offset: Option<usize>,
}

impl BoundingBox {
    pub fn new(min_x: i16, min_y: i16, max_x: i16, max_y: i16) -> Result<Self> {
        if min_x > max_x || min_y > max_y {
            return Err(Error::InvalidBounds {
                min_x,
                min_y,
                max_x,
                max_y,
            });
        }
        Ok(Self {
            min_x,
            min_y,
            max_x,
            max_y,
            bit_offset: None,
        })
    }

    /// Sentinel box that has not seen any point yet.
    pub const fn empty() -> Self {
        Self {
            min_x: i16::MAX,
            min_y: i16::MAX,
            max_x: i16::MIN,
            max_y: i16::MIN,
            bit_offset: None,
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.min_x > self.max_x
    }

    /// Grow the box so that it contains `(x, y)`.
    pub fn include(&mut self, x: i32, y: i32) -> Result<()> {
        if self.bit_offset.is_some() {
            return Err(Error::FrozenBox { bbox: *self });
        }
        let (px, py) = match (i16::try_from(x), i16::try_from(y)) {
            (Ok(px), Ok(py)) => (px, py),
            _ => return Err(Error::CoordinateOverflow { x, y }),
        };
        self.min_x = self.min_x.min(px);
        self.min_y = self.min_y.min(py);
        self.max_x = self.max_x.max(px);
        self.max_y = self.max_y.max(py);
        Ok(())
    }

    #[inline]
    pub fn contains(&self, x: i32, y: i32) -> bool {
        !self.is_empty()
            && x >= self.min_x as i32
            && x <= self.max_x as i32
            && y >= self.min_y as i32
            && y <= self.max_y as i32
    }

    #[inline]
    pub fn min_x(&self) -> i16 {
        self.min_x
    }

    #[inline]
    pub fn min_y(&self) -> i16 {
        self.min_y
    }

    #[inline]
    pub fn max_x(&self) -> i16 {
        self.max_x
    }

    #[inline]
    pub fn max_y(&self) -> i16 {
        self.max_y
    }

    pub fn width(&self) -> Result<usize> {
        self.ensure_initialized()?;
        Ok((self.max_x as i32 - self.min_x as i32 + 1) as usize)
    }

    pub fn height(&self) -> Result<usize> {
        self.ensure_initialized()?;
        Ok((self.max_y as i32 - self.min_y as i32 + 1) as usize)
    }

    pub fn size_in_pixels(&self) -> Result<usize> {
        Ok(self.width()? * self.height()?)
    }

    /// First bit of this object's mask in the packed buffer, once assigned.
    #[inline]
    pub fn bit_offset(&self) -> Option<usize> {
        self.bit_offset
    }

    #[inline]
    pub fn offset_in_words(&self) -> Option<usize> {
        self.bit_offset.map(crate::packing::word_index_of)
    }

    #[inline]
    pub fn is_frozen(&self) -> bool {
        self.bit_offset.is_some()
    }

    pub(crate) fn set_bit_offset(&mut self, bit_offset: usize) {
        self.bit_offset = Some(bit_offset);
    }

    pub(crate) fn ensure_initialized(&self) -> Result<()> {
        if self.is_empty() {
            Err(Error::UninitializedBox)
        } else {
            Ok(())
        }
    }
}

/// Unchecked field layout of a persisted [`BoundingBox`].
#[derive(Deserialize)]
struct StoredBoundingBox {
    min_x: i16,
    min_y: i16,
    max_x: i16,
    max_y: i16,
    bit_offset: Option<usize>,
}

impl TryFrom<StoredBoundingBox> for BoundingBox {
    type Error = Error;

    fn try_from(stored: StoredBoundingBox) -> Result<Self> {
        let empty = Self::empty();
        let is_sentinel = (stored.min_x, stored.min_y, stored.max_x, stored.max_y)
            == (empty.min_x, empty.min_y, empty.max_x, empty.max_y);

        let mut bbox = if is_sentinel {
            if stored.bit_offset.is_some() {
                return Err(Error::UninitializedBox);
            }
            empty
        } else {
            Self::new(stored.min_x, stored.min_y, stored.max_x, stored.max_y)?
        };
        if let Some(bit_offset) = stored.bit_offset {
            if bit_offset % BITS_PER_WORD != 0 {
                return Err(Error::MisalignedOffset { bit_offset });
            }
            bbox.set_bit_offset(bit_offset);
        }
        Ok(bbox)
    }
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::empty()
    }
}

impl fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            write!(f, "<empty>")
        } else {
            write!(
                f,
                "[{}..={}] x [{}..={}]",
                self.min_x, self.max_x, self.min_y, self.max_y
            )
        }
    }
}
