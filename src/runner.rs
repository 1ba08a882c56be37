//! Batch driver over a frame range.
//!
//! Frames are independent: each one pulls its own snapshot from the provider
//! and owns its output directory. In parallel mode the captions are computed
//! on the rayon pool, then written in frame order so that a failure stops the
//! run at the same frame as a sequential run would.

use crate::config::RunParams;
use crate::diagnostics::{FrameFailure, FrameReport, RunReport};
use crate::error::Result;
use crate::frame::{process_frame, FrameCaptions, FrameContext};
use crate::output::{write_frame, write_json_file};
use crate::scene::SceneSnapshotProvider;
use log::{error, info};
use rayon::prelude::*;
use std::time::Instant;

/// Process one frame and persist its cell files.
pub fn run_frame<P: SceneSnapshotProvider + ?Sized>(
    provider: &P,
    ctx: FrameContext,
    frame: u32,
    params: &RunParams,
) -> Result<(FrameReport, usize)> {
    let captions = capture_frame(provider, ctx, frame)?;
    persist_frame(params, captions)
}

fn capture_frame<P: SceneSnapshotProvider + ?Sized>(
    provider: &P,
    ctx: FrameContext,
    frame: u32,
) -> Result<FrameCaptions> {
    info!("Processing frame {frame:03}");
    let snapshot = provider.snapshot(frame)?;
    process_frame(ctx, &snapshot)
}

fn persist_frame(params: &RunParams, captions: FrameCaptions) -> Result<(FrameReport, usize)> {
    let written = write_frame(&params.output_dir, &captions)?;
    Ok((captions.report, written.len()))
}

/// Run every frame of `params.frames` and write the optional JSON report.
pub fn run<P: SceneSnapshotProvider + ?Sized>(provider: &P, params: &RunParams) -> Result<RunReport> {
    let started = Instant::now();
    let ctx = FrameContext {
        resolution: provider.resolution(),
        block_dim: (params.block_dim, params.block_dim),
        border: params.border,
        style: params.style,
    };
    // Fail on a bad resolution/block size before touching any frame.
    crate::grid::build_grid(
        (ctx.resolution.0 as i64, ctx.resolution.1 as i64),
        (ctx.block_dim.0 as i64, ctx.block_dim.1 as i64),
    )?;

    let frames: Vec<u32> = params.frames.iter().collect();
    let mut outcomes: Vec<(u32, Result<(FrameReport, usize)>)> = Vec::with_capacity(frames.len());
    // Records one frame; true when the run must stop here.
    let mut record = |frame: u32, outcome: Result<(FrameReport, usize)>| {
        let stop = outcome.is_err() && !params.skip_failed_frames;
        outcomes.push((frame, outcome));
        stop
    };
    if params.parallel {
        let captured: Vec<(u32, Result<FrameCaptions>)> = frames
            .par_iter()
            .map(|&f| (f, capture_frame(provider, ctx, f)))
            .collect();
        for (f, captions) in captured {
            if record(f, captions.and_then(|c| persist_frame(params, c))) {
                break;
            }
        }
    } else {
        for &f in &frames {
            if record(f, run_frame(provider, ctx, f, params)) {
                break;
            }
        }
    }

    let mut report = RunReport::default();
    for (frame, outcome) in outcomes {
        match outcome {
            Ok((frame_report, files)) => {
                report.files_written += files;
                report.frames.push(frame_report);
            }
            Err(err) if params.skip_failed_frames => {
                error!("frame {frame:03} skipped: {err}");
                report.failures.push(FrameFailure {
                    frame,
                    error: err.to_string(),
                });
            }
            Err(err) => {
                error!("frame {frame:03} failed: {err}");
                return Err(err);
            }
        }
    }
    report.total_ms = started.elapsed().as_secs_f64() * 1000.0;
    info!(
        "{} frame(s) processed, {} failed, {} file(s) written in {:.1} ms",
        report.frames.len(),
        report.failures.len(),
        report.files_written,
        report.total_ms
    );

    if let Some(path) = &params.report_json {
        write_json_file(path, &report)?;
    }
    Ok(report)
}
