//! Word-aligned placement of per-object masks in one packed bit buffer.
//!
//! Each object's mask occupies `size_in_words` whole 64-bit words starting at a
//! word boundary. Offsets depend on the cumulative size of every preceding
//! object, so they are assigned for a whole batch before anything is written
//! and the storage layer learns the total length up front.
//!
//! Inside an object's region pixel `(x, y)` lives at bit
//! `(x - min_x) * height + (y - min_y)`: column-major, y running fastest.

use common::bit_buffer::{BitBuffer, BITS_PER_WORD};
use serde::{Deserialize, Serialize};

use crate::bbox::BoundingBox;
use crate::error::{Error, Result};

#[inline]
pub fn word_index_of(bit_index: usize) -> usize {
    bit_index / BITS_PER_WORD
}

/// Number of words an object's mask occupies in the packed buffer.
pub fn size_in_words(bbox: &BoundingBox) -> Result<usize> {
    Ok(word_index_of(bbox.size_in_pixels()? - 1) + 1)
}

/// Assign word-aligned bit offsets to `boxes` in iteration order.
///
/// Returns the total number of words the packed buffer needs. All boxes are
/// validated before any of them is modified, so on error nothing is frozen.
/// A box that already has an offset fails with [`Error::FrozenBox`].
pub fn assign_offsets<'a, I>(boxes: I) -> Result<usize>
where
    I: IntoIterator<Item = &'a mut BoundingBox>,
{
    let mut boxes: Vec<&mut BoundingBox> = boxes.into_iter().collect();
    let sizes = boxes
        .iter()
        .map(|bbox| {
            if bbox.is_frozen() {
                return Err(Error::FrozenBox { bbox: **bbox });
            }
            size_in_words(bbox)
        })
        .collect::<Result<Vec<_>>>()?;

    let mut cursor_in_words = 0usize;
    for (bbox, words) in boxes.iter_mut().zip(sizes) {
        bbox.set_bit_offset(cursor_in_words * BITS_PER_WORD);
        cursor_in_words += words;
    }

    tracing::debug!(
        objects = boxes.len(),
        total_words = cursor_in_words,
        "Assigned packed mask offsets"
    );
    Ok(cursor_in_words)
}

/// Bit index of `(x, y)` relative to the start of the box's mask.
pub fn relative_bit_index(bbox: &BoundingBox, x: i32, y: i32) -> Result<usize> {
    bbox.ensure_initialized()?;
    if !bbox.contains(x, y) {
        return Err(Error::OutOfBounds { x, y, bbox: *bbox });
    }
    let height = bbox.height()?;
    Ok((x - bbox.min_x() as i32) as usize * height + (y - bbox.min_y() as i32) as usize)
}

/// Bit index of `(x, y)` in the packed buffer.
pub fn absolute_bit_index(bbox: &BoundingBox, x: i32, y: i32) -> Result<usize> {
    let relative = relative_bit_index(bbox, x, y)?;
    let offset = bbox
        .bit_offset()
        .ok_or(Error::MissingOffset { bbox: *bbox })?;
    Ok(offset + relative)
}

/// Inverse of [`relative_bit_index`] for a box of the given height.
#[inline]
pub(crate) fn point_of_bit(bbox: &BoundingBox, height: usize, bit: usize) -> (i32, i32) {
    (
        bbox.min_x() as i32 + (bit / height) as i32,
        bbox.min_y() as i32 + (bit % height) as i32,
    )
}

/// Fails if `mask` has a set bit outside the box's pixel range.
pub fn check_mask_fits(bbox: &BoundingBox, mask: &BitBuffer) -> Result<()> {
    let size_in_pixels = bbox.size_in_pixels()?;
    match mask.last_set_bit() {
        Some(highest_bit) if highest_bit >= size_in_pixels => Err(Error::MaskExceedsBoundingBox {
            highest_bit,
            size_in_pixels,
        }),
        _ => Ok(()),
    }
}

/// Concatenated masks of a batch of objects, one word-aligned region each.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PackedBuffer {
    words: Vec<u64>,
}

impl PackedBuffer {
    pub fn with_total_words(total_words: usize) -> Self {
        Self {
            words: vec![0; total_words],
        }
    }

    pub fn from_words(words: Vec<u64>) -> Self {
        Self { words }
    }

    /// Rebuild from bytes produced by [`as_bytes`](Self::as_bytes) on a
    /// machine of the same byte order.
    pub fn from_ne_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() % 8 != 0 {
            return Err(Error::MisalignedBytes { len: bytes.len() });
        }
        let words = bytes
            .chunks_exact(8)
            .map(|chunk| {
                let mut word = [0u8; 8];
                word.copy_from_slice(chunk);
                u64::from_ne_bytes(word)
            })
            .collect();
        Ok(Self { words })
    }

    #[inline]
    pub fn total_words(&self) -> usize {
        self.words.len()
    }

    #[inline]
    pub fn words(&self) -> &[u64] {
        &self.words
    }

    /// Raw storage bytes in native byte order, 8 per word.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.words)
    }

    /// Write `mask` into the region assigned to `bbox`.
    pub fn write_mask(&mut self, bbox: &BoundingBox, mask: &BitBuffer) -> Result<()> {
        check_mask_fits(bbox, mask)?;
        let (start, end) = self.region(bbox)?;
        let region = &mut self.words[start..end];
        region.fill(0);
        let copied = mask.num_words().min(region.len());
        region[..copied].copy_from_slice(&mask.words()[..copied]);
        Ok(())
    }

    /// Extract the mask stored for `bbox`.
    pub fn read_mask(&self, bbox: &BoundingBox) -> Result<BitBuffer> {
        let (start, _) = self.region(bbox)?;
        Ok(BitBuffer::from_word_slice(
            &self.words,
            start,
            bbox.size_in_pixels()?,
        ))
    }

    fn region(&self, bbox: &BoundingBox) -> Result<(usize, usize)> {
        let start = bbox
            .offset_in_words()
            .ok_or(Error::MissingOffset { bbox: *bbox })?;
        let end = start + size_in_words(bbox)?;
        if end > self.words.len() {
            return Err(Error::PackedBufferTooSmall {
                required: end,
                available: self.words.len(),
            });
        }
        Ok((start, end))
    }
}
