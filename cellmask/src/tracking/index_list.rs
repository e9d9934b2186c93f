use std::fmt;
use std::iter::FusedIterator;
use std::slice;

use super::row_sort::binary_row_search;
use super::LinkRow;

/// Borrowed view of one column over a run of link rows.
///
/// The rows share the same key in the other column and are sorted by
/// `column`, so lookups are binary searches.
#[derive(Debug, Clone, Copy)]
pub struct IndexList<'a> {
    rows: &'a [LinkRow],
    column: usize,
}

impl<'a> IndexList<'a> {
    pub(crate) fn new(rows: &'a [LinkRow], column: usize) -> Self {
        Self { rows, column }
    }

    pub(crate) fn empty(column: usize) -> Self {
        Self { rows: &[], column }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<u32> {
        self.rows.get(index).map(|row| row[self.column])
    }

    pub fn contains(&self, id: u32) -> bool {
        binary_row_search(self.rows, self.column, id).is_ok()
    }

    pub fn iter(&self) -> IndexListIter<'a> {
        IndexListIter {
            rows: self.rows.iter(),
            column: self.column,
        }
    }

    pub fn to_vec(&self) -> Vec<u32> {
        self.iter().collect()
    }
}

impl<'a> IntoIterator for IndexList<'a> {
    type Item = u32;
    type IntoIter = IndexListIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a> IntoIterator for &IndexList<'a> {
    type Item = u32;
    type IntoIter = IndexListIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl fmt::Display for IndexList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "IndexList [")?;
        for (i, id) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", id)?;
        }
        write!(f, "]")
    }
}

#[derive(Debug, Clone)]
pub struct IndexListIter<'a> {
    rows: slice::Iter<'a, LinkRow>,
    column: usize,
}

impl Iterator for IndexListIter<'_> {
    type Item = u32;

    #[inline]
    fn next(&mut self) -> Option<u32> {
        self.rows.next().map(|row| row[self.column])
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.rows.size_hint()
    }
}

impl DoubleEndedIterator for IndexListIter<'_> {
    #[inline]
    fn next_back(&mut self) -> Option<u32> {
        self.rows.next_back().map(|row| row[self.column])
    }
}

impl ExactSizeIterator for IndexListIter<'_> {}

impl FusedIterator for IndexListIter<'_> {}
