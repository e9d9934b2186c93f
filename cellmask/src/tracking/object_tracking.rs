use std::sync::OnceLock;

use super::index_list::IndexList;
use super::link_table::LinkTable;
use super::row_sort::{binary_row_search, run_end, two_step_sort};
use super::{LinkRow, CHILD_COL, PARENT_COL};

/// Adjacency queries over a finalized link table.
///
/// The table sorted by `(child, parent)` needed for [`parents_of`] is built
/// on the first such query and kept.
///
/// [`parents_of`]: Self::parents_of
#[derive(Debug, Clone)]
pub struct ObjectTracking {
    links: LinkTable,
    by_child: OnceLock<Vec<LinkRow>>,
}

impl ObjectTracking {
    pub fn new(links: LinkTable) -> Self {
        Self {
            links,
            by_child: OnceLock::new(),
        }
    }

    #[inline]
    pub fn links(&self) -> &LinkTable {
        &self.links
    }

    /// Children of `parent` in ascending order; empty if it has none.
    pub fn children_of(&self, parent: u32) -> IndexList<'_> {
        run_view(self.links.rows(), PARENT_COL, CHILD_COL, parent)
    }

    /// Parents of `child` in ascending order; empty if it has none.
    pub fn parents_of(&self, child: u32) -> IndexList<'_> {
        run_view(self.rows_by_child(), CHILD_COL, PARENT_COL, child)
    }

    fn rows_by_child(&self) -> &[LinkRow] {
        self.by_child.get_or_init(|| {
            let mut rows = self.links.rows().to_vec();
            two_step_sort(&mut rows, CHILD_COL, PARENT_COL);
            tracing::trace!(rows = rows.len(), "Built child-sorted link index");
            rows
        })
    }
}

impl From<LinkTable> for ObjectTracking {
    fn from(links: LinkTable) -> Self {
        Self::new(links)
    }
}

fn run_view(rows: &[LinkRow], key_column: usize, value_column: usize, key: u32) -> IndexList<'_> {
    match binary_row_search(rows, key_column, key) {
        Ok(start) => {
            let end = run_end(rows, key_column, start);
            IndexList::new(&rows[start..end], value_column)
        }
        Err(_) => IndexList::empty(value_column),
    }
}
