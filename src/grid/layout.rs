use crate::error::{CaptionError, Result};
use serde::Serialize;

/// Normalized screen-space rectangle of one cell.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct CellRect {
    pub left: f64,
    pub right: f64,
    pub top: f64,
    pub bottom: f64,
}

/// Row/column position of a cell; row 0 is the top of the image.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct CellIndex {
    pub row: usize,
    pub col: usize,
}

impl CellIndex {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

/// Uniform grid of image blocks in normalized screen space.
#[derive(Clone, Debug, Serialize)]
pub struct Grid {
    pub resolution: (u32, u32),
    pub block_dim: (u32, u32),
    pub rows: usize,
    pub cols: usize,
    cells: Vec<Vec<CellRect>>,
}

impl Grid {
    /// Rows of cells, top to bottom.
    pub fn rows_iter(&self) -> impl Iterator<Item = &[CellRect]> {
        self.cells.iter().map(Vec::as_slice)
    }

    pub fn cell(&self, idx: CellIndex) -> Option<&CellRect> {
        self.cells.get(idx.row)?.get(idx.col)
    }

    pub fn len(&self) -> usize {
        self.rows * self.cols
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// 1-based raster index used to name cell outputs.
    pub fn raster_index(&self, idx: CellIndex) -> usize {
        idx.row * self.cols + idx.col + 1
    }

    /// Pixel-space centre of a cell, used as the caption sample point.
    pub fn sample_pixel(&self, idx: CellIndex) -> [f64; 2] {
        let (bw, bh) = (self.block_dim.0 as f64, self.block_dim.1 as f64);
        [bw * (idx.col as f64 + 0.5), bh * (idx.row as f64 + 0.5)]
    }
}

/// Split `resolution` into `floor(W/bw) × floor(H/bh)` abutting cells.
///
/// Partial blocks at the right/bottom edge are dropped from the count, but
/// the cells are stretched so they still tile the unit square.
pub fn build_grid(resolution: (i64, i64), block_dim: (i64, i64)) -> Result<Grid> {
    let (w, h) = resolution;
    let (bw, bh) = block_dim;
    if w <= 0 || h <= 0 {
        return Err(CaptionError::InvalidConfiguration(format!(
            "resolution must be positive, got {w}x{h}"
        )));
    }
    if bw <= 0 || bh <= 0 {
        return Err(CaptionError::InvalidConfiguration(format!(
            "block dimension must be positive, got {bw}x{bh}"
        )));
    }
    let to_u32 = |v: i64, what: &str| {
        u32::try_from(v).map_err(|_| {
            CaptionError::InvalidConfiguration(format!("{what} {v} does not fit in 32 bits"))
        })
    };
    let resolution = (to_u32(w, "image width")?, to_u32(h, "image height")?);
    let block_dim = (to_u32(bw, "block width")?, to_u32(bh, "block height")?);

    let cols = (w / bw) as usize;
    let rows = (h / bh) as usize;
    if cols == 0 || rows == 0 {
        return Err(CaptionError::InvalidConfiguration(format!(
            "block {bw}x{bh} is larger than the {w}x{h} image"
        )));
    }

    let cells = (0..rows)
        .map(|i| {
            let top = i as f64 / rows as f64;
            let bottom = (i + 1) as f64 / rows as f64;
            (0..cols)
                .map(|j| CellRect {
                    left: j as f64 / cols as f64,
                    right: (j + 1) as f64 / cols as f64,
                    top,
                    bottom,
                })
                .collect()
        })
        .collect();

    Ok(Grid {
        resolution,
        block_dim,
        rows,
        cols,
        cells,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cells_tile_unit_square() {
        for &(res, dim) in &[
            ((128, 128), (64, 64)),
            ((1920, 1080), (64, 64)),
            ((640, 480), (32, 48)),
            ((100, 30), (7, 11)),
        ] {
            let grid = build_grid(res, dim).unwrap();
            assert_eq!(grid.cols, (res.0 / dim.0) as usize);
            assert_eq!(grid.rows, (res.1 / dim.1) as usize);
            assert_eq!(grid.rows_iter().map(|r| r.len()).sum::<usize>(), grid.len());

            for (i, row) in grid.rows_iter().enumerate() {
                assert_eq!(row.first().unwrap().left, 0.0);
                assert_eq!(row.last().unwrap().right, 1.0);
                for pair in row.windows(2) {
                    assert_eq!(pair[0].right, pair[1].left, "gap in row {i}");
                }
                for cell in row {
                    assert!(cell.left < cell.right && cell.top < cell.bottom);
                    if i > 0 {
                        let above = grid.cell(CellIndex::new(i - 1, 0)).unwrap();
                        assert_eq!(above.bottom, cell.top);
                    }
                }
            }
            let first = grid.cell(CellIndex::new(0, 0)).unwrap();
            let last = grid.cell(CellIndex::new(grid.rows - 1, grid.cols - 1)).unwrap();
            assert_eq!(first.top, 0.0);
            assert_eq!(last.bottom, 1.0);
        }
    }

    #[test]
    fn rejects_non_positive_dimensions() {
        for (res, dim) in [
            ((0, 128), (64, 64)),
            ((128, -1), (64, 64)),
            ((128, 128), (0, 64)),
            ((128, 128), (64, -8)),
            ((32, 32), (64, 64)),
            ((u32::MAX as i64 + 1, 128), (64, 64)),
            ((128, 128), (64, u32::MAX as i64 + 64)),
        ] {
            let err = build_grid(res, dim).unwrap_err();
            assert!(
                matches!(err, CaptionError::InvalidConfiguration(_)),
                "unexpected error for {res:?}/{dim:?}: {err}"
            );
        }
    }

    #[test]
    fn raster_index_and_sample_pixel() {
        let grid = build_grid((192, 128), (64, 64)).unwrap();
        assert_eq!((grid.rows, grid.cols), (2, 3));
        assert_eq!(grid.raster_index(CellIndex::new(0, 0)), 1);
        assert_eq!(grid.raster_index(CellIndex::new(1, 2)), 6);
        assert_eq!(grid.sample_pixel(CellIndex::new(1, 2)), [160.0, 96.0]);
    }
}
