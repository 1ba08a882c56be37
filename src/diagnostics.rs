//! Serializable per-frame and per-run reports.

use serde::{Deserialize, Serialize};

/// Timing entry describing a single stage of frame processing.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageTiming {
    pub label: String,
    pub elapsed_ms: f64,
}

impl StageTiming {
    pub fn new(label: impl Into<String>, elapsed_ms: f64) -> Self {
        Self {
            label: label.into(),
            elapsed_ms,
        }
    }
}

/// Aggregated timing trace for one frame.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimingBreakdown {
    pub total_ms: f64,
    pub stages: Vec<StageTiming>,
}

impl TimingBreakdown {
    pub fn push(&mut self, label: impl Into<String>, elapsed_ms: f64) {
        self.stages.push(StageTiming::new(label, elapsed_ms));
    }
}

/// Counters and timings gathered while processing one frame.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameReport {
    pub frame: u32,
    pub rows: usize,
    pub cols: usize,
    pub objects_total: usize,
    pub objects_assigned: usize,
    pub objects_skipped: usize,
    pub cells_captioned: usize,
    /// Raster indices of the cells that received a caption.
    pub cells: Vec<usize>,
    pub timing: TimingBreakdown,
}

/// Frame that could not be processed; kept when the run skips failures.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameFailure {
    pub frame: u32,
    pub error: String,
}

/// Outcome of a whole run over a frame range, frames in ascending order.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunReport {
    pub frames: Vec<FrameReport>,
    pub failures: Vec<FrameFailure>,
    pub files_written: usize,
    pub total_ms: f64,
}
