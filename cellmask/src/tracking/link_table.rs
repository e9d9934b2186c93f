use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

use super::{LinkRow, CHILD_COL, PARENT_COL};

/// Smallest unsigned integer type that holds every id of a table.
///
/// Advisory only: storage may pick it to shrink the on-disk table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndexWidth {
    U8,
    U16,
    U32,
}

impl IndexWidth {
    pub fn for_max_index(max_index: u32) -> Self {
        if max_index < 1 << 8 {
            IndexWidth::U8
        } else if max_index < 1 << 16 {
            IndexWidth::U16
        } else {
            IndexWidth::U32
        }
    }

    pub fn bytes_per_index(self) -> usize {
        match self {
            IndexWidth::U8 => 1,
            IndexWidth::U16 => 2,
            IndexWidth::U32 => 4,
        }
    }
}

/// Finalized parent/child links, strictly ascending by `(parent, child)`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "Vec<LinkRow>", into = "Vec<LinkRow>")]
pub struct LinkTable {
    rows: Vec<LinkRow>,
}

impl LinkTable {
    /// Caller guarantees `rows` is strictly ascending.
    pub(crate) fn from_sorted_unchecked(rows: Vec<LinkRow>) -> Self {
        debug_assert!(rows.windows(2).all(|w| w[0] < w[1]));
        Self { rows }
    }

    /// Adopt rows that were finalized earlier, e.g. read from storage.
    ///
    /// Fails with [`Error::UnsortedLinkTable`] at the first row that is not
    /// strictly greater than its predecessor.
    pub fn from_sorted_rows(rows: Vec<LinkRow>) -> Result<Self> {
        if let Some(pos) = rows.windows(2).position(|w| w[0] >= w[1]) {
            return Err(Error::UnsortedLinkTable { row: pos + 1 });
        }
        Ok(Self { rows })
    }

    /// Adopt a row-major table of `columns` columns.
    pub fn from_flat(values: &[u32], columns: usize) -> Result<Self> {
        if columns != 2 || values.len() % columns != 0 {
            return Err(Error::InvalidLinkTableShape {
                columns,
                values: values.len(),
            });
        }
        let rows = values
            .chunks_exact(2)
            .map(|pair| [pair[PARENT_COL], pair[CHILD_COL]])
            .collect();
        Self::from_sorted_rows(rows)
    }

    #[inline]
    pub fn rows(&self) -> &[LinkRow] {
        &self.rows
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Row-major `[parent0, child0, parent1, child1, ...]`.
    pub fn to_flat(&self) -> Vec<u32> {
        self.rows.iter().flatten().copied().collect()
    }

    /// Largest id in either column, 0 for an empty table.
    pub fn max_index(&self) -> u32 {
        self.rows.iter().flatten().copied().max().unwrap_or(0)
    }

    pub fn index_width(&self) -> IndexWidth {
        IndexWidth::for_max_index(self.max_index())
    }
}

impl TryFrom<Vec<LinkRow>> for LinkTable {
    type Error = Error;

    fn try_from(rows: Vec<LinkRow>) -> Result<Self> {
        Self::from_sorted_rows(rows)
    }
}

impl From<LinkTable> for Vec<LinkRow> {
    fn from(table: LinkTable) -> Self {
        table.rows
    }
}
