//! Parent/child links between objects and the queries over them.
//!
//! Links are accumulated in an [`ObjectTrackingBuilder`], finalized into a
//! sorted and deduplicated [`LinkTable`], and queried through
//! [`ObjectTracking`]. Ids are caller-assigned object indices.


mod builder;
mod index_list;
mod link_table;
mod object_tracking;
pub mod row_sort;

pub use builder::ObjectTrackingBuilder;
pub use index_list::{IndexList, IndexListIter};
pub use link_table::{IndexWidth, LinkTable};
pub use object_tracking::ObjectTracking;

/// One `(parent, child)` link.
pub type LinkRow = [u32; 2];

pub const PARENT_COL: usize = 0;
pub const CHILD_COL: usize = 1;
