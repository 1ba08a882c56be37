//! Screen-space block grid and object-to-block assignment.
//!
//! - [`layout`]: uniform grid of cells tiling the normalized image plane.
//! - [`bounds`]: project a bounding box and convert it to a cell range.
//! - [`assign`]: collect, per cell, the objects whose range covers it.
//!
//! Assignment is a bounding-box overlap test. Objects whose box covers a cell
//! are recorded even if their actual mesh never touches it.

pub mod assign;
pub mod bounds;
pub mod layout;

pub use assign::{assign_blocks, BlockAssignment, SkipReason};
pub use bounds::{cell_range, map_bounds, screen_extent, CellRange, ScreenRect};
pub use layout::{build_grid, CellIndex, CellRect, Grid};
