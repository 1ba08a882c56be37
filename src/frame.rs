//! One frame, end to end: grid, block assignment, captions.
//!
//! Assignment for the whole frame completes before any caption is built,
//! since a cell's text depends on its final object set.

use crate::diagnostics::FrameReport;
use crate::error::Result;
use crate::grid::{assign_blocks, build_grid, CellIndex};
use crate::semantics::{extract_captions, join_captions, CaptionStyle};
use crate::types::FrameSnapshot;
use log::debug;
use serde::Serialize;
use std::collections::BTreeMap;
use std::time::Instant;

/// Per-run parameters handed to every frame by value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameContext {
    pub resolution: (u32, u32),
    pub block_dim: (u32, u32),
    pub border: u32,
    pub style: CaptionStyle,
}

impl FrameContext {
    /// Square blocks, plain captions.
    pub fn new(resolution: (u32, u32), block_dim: u32, border: u32) -> Self {
        Self {
            resolution,
            block_dim: (block_dim, block_dim),
            border,
            style: CaptionStyle::Plain,
        }
    }

    pub fn with_style(mut self, style: CaptionStyle) -> Self {
        self.style = style;
        self
    }
}

/// Caption text per non-empty cell, keyed by 1-based raster index.
#[derive(Clone, Debug, Serialize)]
pub struct FrameCaptions {
    pub frame: u32,
    pub rows: usize,
    pub cols: usize,
    pub cells: BTreeMap<usize, String>,
    #[serde(skip)]
    pub report: FrameReport,
}

impl FrameCaptions {
    pub fn get(&self, raster_index: usize) -> Option<&str> {
        self.cells.get(&raster_index).map(String::as_str)
    }

    pub fn cell_at(&self, idx: CellIndex) -> Option<&str> {
        self.get(idx.row * self.cols + idx.col + 1)
    }
}

pub fn process_frame(ctx: FrameContext, snapshot: &FrameSnapshot) -> Result<FrameCaptions> {
    let started = Instant::now();
    let mut report = FrameReport {
        frame: snapshot.frame,
        objects_total: snapshot.objects.len(),
        ..Default::default()
    };

    let t = Instant::now();
    let grid = build_grid(
        (ctx.resolution.0 as i64, ctx.resolution.1 as i64),
        (ctx.block_dim.0 as i64, ctx.block_dim.1 as i64),
    )?;
    report.rows = grid.rows;
    report.cols = grid.cols;
    report.timing.push("grid", elapsed_ms(t));

    let t = Instant::now();
    let assignment = assign_blocks(&snapshot.objects, &snapshot.camera, &grid, ctx.border);
    report.objects_skipped = assignment.skipped().len();
    report.objects_assigned = report.objects_total - report.objects_skipped;
    report.timing.push("assign", elapsed_ms(t));

    let t = Instant::now();
    let mut cells = BTreeMap::new();
    for (cell, objects) in assignment.iter() {
        let captions = extract_captions(cell, objects, snapshot, &grid, ctx.style)?;
        let raster = grid.raster_index(cell);
        debug!(
            "frame {:03} cell {:03} ({},{}): {} object(s)",
            snapshot.frame,
            raster,
            cell.row,
            cell.col,
            captions.len()
        );
        cells.insert(raster, join_captions(&captions));
    }
    report.timing.push("captions", elapsed_ms(t));

    report.cells_captioned = cells.len();
    report.cells = cells.keys().copied().collect();
    report.timing.total_ms = elapsed_ms(started);

    Ok(FrameCaptions {
        frame: snapshot.frame,
        rows: grid.rows,
        cols: grid.cols,
        cells,
        report,
    })
}

fn elapsed_ms(since: Instant) -> f64 {
    since.elapsed().as_secs_f64() * 1000.0
}
