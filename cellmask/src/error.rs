//! Error types for mask addressing, segmentation packing and tracking tables.

use thiserror::Error;

use crate::bbox::BoundingBox;

/// Coarse classification of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Data was supplied in a shape that cannot be valid: a point outside its
    /// box, a mask larger than its box, a malformed link table.
    InputShape,
    /// Something was queried or serialized before it was ever set up.
    Uninitialized,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("Point ({x}, {y}) is outside bounding box {bbox}")]
    OutOfBounds { x: i32, y: i32, bbox: BoundingBox },

    #[error("Mask bit {highest_bit} exceeds bounding box of {size_in_pixels} pixels")]
    MaskExceedsBoundingBox {
        highest_bit: usize,
        size_in_pixels: usize,
    },

    #[error("Invalid bounds: min ({min_x}, {min_y}) > max ({max_x}, {max_y})")]
    InvalidBounds {
        min_x: i16,
        min_y: i16,
        max_x: i16,
        max_y: i16,
    },

    #[error("Coordinate ({x}, {y}) does not fit into a 16-bit bounding box")]
    CoordinateOverflow { x: i32, y: i32 },

    #[error("Bounding box {bbox} is frozen, its storage offset is already assigned")]
    FrozenBox { bbox: BoundingBox },

    #[error("Edge mask has {actual} bits, object mask has {expected}")]
    EdgeMaskSizeMismatch { expected: usize, actual: usize },

    #[error("Packed buffer holds {available} words, {required} required")]
    PackedBufferTooSmall { required: usize, available: usize },

    #[error("Byte buffer of length {len} is not a whole number of 64-bit words")]
    MisalignedBytes { len: usize },

    #[error("Bit offset {bit_offset} does not start at a 64-bit word boundary")]
    MisalignedOffset { bit_offset: usize },

    #[error("Link table needs exactly two columns, {columns} found ({values} values)")]
    InvalidLinkTableShape { columns: usize, values: usize },

    #[error("Link table row {row} is not strictly ordered after its predecessor")]
    UnsortedLinkTable { row: usize },

    #[error("Bounding box has never been grown by a point")]
    UninitializedBox,

    #[error("Bounding box {bbox} has no storage offset assigned")]
    MissingOffset { bbox: BoundingBox },
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::UninitializedBox | Self::MissingOffset { .. } => ErrorKind::Uninitialized,
            _ => ErrorKind::InputShape,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
