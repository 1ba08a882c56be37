//! Projected bounding box → inclusive cell-index range.

use super::layout::{CellIndex, Grid};
use crate::projection::project_points;
use crate::types::{Aabb, Camera};
use serde::Serialize;

/// Screen-space extent of a projected box after clamping to `[0,1]`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct ScreenRect {
    pub left: f64,
    pub right: f64,
    pub top: f64,
    pub bottom: f64,
}

/// Inclusive range of cells, already clipped to the grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct CellRange {
    pub row_min: usize,
    pub row_max: usize,
    pub col_min: usize,
    pub col_max: usize,
}

impl CellRange {
    pub fn contains(&self, idx: CellIndex) -> bool {
        (self.row_min..=self.row_max).contains(&idx.row)
            && (self.col_min..=self.col_max).contains(&idx.col)
    }

    pub fn cell_count(&self) -> usize {
        (self.row_max - self.row_min + 1) * (self.col_max - self.col_min + 1)
    }

    /// Row-major walk over every cell in the range.
    pub fn cells(&self) -> impl Iterator<Item = CellIndex> + '_ {
        (self.row_min..=self.row_max)
            .flat_map(move |row| (self.col_min..=self.col_max).map(move |col| CellIndex { row, col }))
    }
}

/// Project the 8 box corners and clamp the resulting extent.
///
/// A minimum outside `[0,1)` falls back to 0 and a maximum outside `(0,1]`
/// falls back to 1, so a box lying entirely off one side of the view covers
/// the whole axis instead of vanishing.
pub fn screen_extent(bbox: &Aabb, camera: &Camera) -> ScreenRect {
    let projected = project_points(camera, &bbox.corners());

    let mut left = f64::INFINITY;
    let mut right = f64::NEG_INFINITY;
    let mut top = f64::INFINITY;
    let mut bottom = f64::NEG_INFINITY;
    let mut finite = true;
    for [x, y] in projected {
        if !x.is_finite() || !y.is_finite() {
            finite = false;
            break;
        }
        left = left.min(x);
        right = right.max(x);
        top = top.min(y);
        bottom = bottom.max(y);
    }
    if !finite {
        return ScreenRect {
            left: 0.0,
            right: 1.0,
            top: 0.0,
            bottom: 1.0,
        };
    }

    ScreenRect {
        left: clamp_min(left),
        right: clamp_max(right),
        top: clamp_min(top),
        bottom: clamp_max(bottom),
    }
}

fn clamp_min(v: f64) -> f64 {
    if !(0.0..1.0).contains(&v) {
        0.0
    } else {
        v
    }
}

fn clamp_max(v: f64) -> f64 {
    if v > 1.0 || v <= 0.0 {
        1.0
    } else {
        v
    }
}

/// Convert a clamped extent into grid cells, dilated by `border` cells.
///
/// The max side always reaches one cell past the cell holding the extent's
/// edge. Both sides are clipped to the grid.
pub fn cell_range(rect: &ScreenRect, grid: &Grid, border: u32) -> CellRange {
    let cols = grid.cols as i64;
    let rows = grid.rows as i64;
    let border = border as i64;

    let col_min = (rect.left * cols as f64).floor() as i64 - border;
    let col_max = (rect.right * cols as f64).floor() as i64 + 1 + border;
    let row_min = (rect.top * rows as f64).floor() as i64 - border;
    let row_max = (rect.bottom * rows as f64).floor() as i64 + 1 + border;

    let clip = |v: i64, n: i64| v.clamp(0, n - 1) as usize;
    CellRange {
        row_min: clip(row_min, rows),
        row_max: clip(row_max, rows),
        col_min: clip(col_min, cols),
        col_max: clip(col_max, cols),
    }
}

/// Full bounds mapping for one object's box.
pub fn map_bounds(bbox: &Aabb, camera: &Camera, grid: &Grid, border: u32) -> CellRange {
    cell_range(&screen_extent(bbox, camera), grid, border)
}
