use super::link_table::{IndexWidth, LinkTable};
use super::row_sort::two_step_sort;
use super::{LinkRow, CHILD_COL, PARENT_COL};

/// Accumulates parent/child links in any order, duplicates allowed.
///
/// Builders filled on different threads can be combined with
/// [`merge`](Self::merge) before finalizing.
#[derive(Debug, Clone, Default)]
pub struct ObjectTrackingBuilder {
    rows: Vec<LinkRow>,
    max_index: u32,
}

impl ObjectTrackingBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            rows: Vec::with_capacity(capacity),
            max_index: 0,
        }
    }

    pub fn add_link(&mut self, parent: u32, child: u32) {
        let mut row = [0; 2];
        row[PARENT_COL] = parent;
        row[CHILD_COL] = child;
        self.rows.push(row);
        self.max_index = self.max_index.max(parent).max(child);
    }

    /// Number of links added so far, duplicates included.
    #[inline]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Largest id seen in either role, 0 before the first link.
    #[inline]
    pub fn max_index(&self) -> u32 {
        self.max_index
    }

    pub fn index_width(&self) -> IndexWidth {
        IndexWidth::for_max_index(self.max_index)
    }

    pub fn merge(&mut self, other: ObjectTrackingBuilder) {
        self.rows.extend(other.rows);
        self.max_index = self.max_index.max(other.max_index);
    }

    /// Sort by `(parent, child)` and drop duplicate links.
    pub fn finalize(self) -> LinkTable {
        let added = self.rows.len();
        let mut rows = self.rows;
        two_step_sort(&mut rows, PARENT_COL, CHILD_COL);
        rows.dedup();

        tracing::debug!(
            added,
            distinct = rows.len(),
            index_width = ?IndexWidth::for_max_index(self.max_index),
            "Finalized link table"
        );
        LinkTable::from_sorted_unchecked(rows)
    }
}

impl Extend<(u32, u32)> for ObjectTrackingBuilder {
    fn extend<I: IntoIterator<Item = (u32, u32)>>(&mut self, iter: I) {
        for (parent, child) in iter {
            self.add_link(parent, child);
        }
    }
}

impl FromIterator<(u32, u32)> for ObjectTrackingBuilder {
    fn from_iter<I: IntoIterator<Item = (u32, u32)>>(iter: I) -> Self {
        let mut builder = Self::new();
        builder.extend(iter);
        builder
    }
}
