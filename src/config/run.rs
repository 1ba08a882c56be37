use crate::error::{CaptionError, Result};
use crate::semantics::CaptionStyle;
use log::warn;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_START_FRAME: i64 = 1;
pub const DEFAULT_END_FRAME: i64 = 1;
pub const DEFAULT_STEP: i64 = 1;
pub const DEFAULT_BORDER: i64 = 0;
pub const DEFAULT_BLOCK_DIM: i64 = 64;

/// Run configuration as read from JSON.
#[derive(Clone, Debug, Deserialize)]
pub struct RunConfig {
    /// Scene dump consumed by [`crate::scene::JsonSceneProvider`].
    pub scene: PathBuf,
    #[serde(default)]
    pub frames: FramesConfig,
    #[serde(default)]
    pub blocks: BlocksConfig,
    pub output: OutputConfig,
    #[serde(default)]
    pub caption_style: CaptionStyle,
    /// Process frames on the rayon pool.
    #[serde(default)]
    pub parallel: bool,
    /// Log and record failing frames instead of aborting the run.
    #[serde(default)]
    pub skip_failed_frames: bool,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct FramesConfig {
    pub start: Option<i64>,
    pub end: Option<i64>,
    pub step: Option<i64>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct BlocksConfig {
    /// Block edge in pixels; a power of 2 is recommended.
    pub dim: Option<i64>,
    /// Extra cells added on every side of an object's range.
    pub border: Option<i64>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct OutputConfig {
    pub dir: PathBuf,
    #[serde(default)]
    pub report_json: Option<PathBuf>,
}

/// Inclusive frame range walked with a fixed step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameRange {
    pub start: u32,
    pub end: u32,
    pub step: u32,
}

impl FrameRange {
    pub fn new(start: u32, end: u32, step: u32) -> Result<Self> {
        if start < 1 {
            return Err(CaptionError::InvalidConfiguration(format!(
                "start frame must be >= 1, got {start}"
            )));
        }
        if end < start {
            return Err(CaptionError::InvalidConfiguration(format!(
                "end frame {end} is before start frame {start}"
            )));
        }
        if step < 1 {
            return Err(CaptionError::InvalidConfiguration(format!(
                "frame step must be >= 1, got {step}"
            )));
        }
        Ok(Self { start, end, step })
    }

    pub fn iter(&self) -> impl Iterator<Item = u32> {
        (self.start..=self.end).step_by(self.step as usize)
    }
}

/// Validated parameters for [`crate::runner::run`].
#[derive(Clone, Debug)]
pub struct RunParams {
    pub frames: FrameRange,
    pub block_dim: u32,
    pub border: u32,
    pub style: CaptionStyle,
    pub output_dir: PathBuf,
    pub report_json: Option<PathBuf>,
    pub parallel: bool,
    pub skip_failed_frames: bool,
}

impl RunConfig {
    /// Apply defaults, validate, and resolve relative paths against `base`.
    pub fn resolve(&self, base: &Path) -> Result<RunParams> {
        let start = or_default(self.frames.start, DEFAULT_START_FRAME, "start frame");
        let end = or_default(self.frames.end, DEFAULT_END_FRAME, "end frame");
        let step = or_default(self.frames.step, DEFAULT_STEP, "frame step");
        let dim = or_default(self.blocks.dim, DEFAULT_BLOCK_DIM, "block dimension");
        let border = match self.blocks.border {
            Some(b) if b >= 0 => b,
            Some(b) => {
                warn!("border {b} is negative; default border ({DEFAULT_BORDER}) used");
                DEFAULT_BORDER
            }
            None => or_default(None, DEFAULT_BORDER, "border"),
        };

        let frames = FrameRange::new(
            to_u32(start, "start frame")?,
            to_u32(end, "end frame")?,
            to_u32(step, "frame step")?,
        )?;
        if dim <= 0 {
            return Err(CaptionError::InvalidConfiguration(format!(
                "block dimension must be > 0, got {dim}"
            )));
        }
        if !(dim as u64).is_power_of_two() {
            warn!("block dimension {dim} is not a power of 2");
        }

        Ok(RunParams {
            frames,
            block_dim: to_u32(dim, "block dimension")?,
            border: to_u32(border, "border")?,
            style: self.caption_style,
            output_dir: rebase(base, &self.output.dir),
            report_json: self.output.report_json.as_ref().map(|p| rebase(base, p)),
            parallel: self.parallel,
            skip_failed_frames: self.skip_failed_frames,
        })
    }

    pub fn scene_path(&self, base: &Path) -> PathBuf {
        rebase(base, &self.scene)
    }
}

fn or_default(value: Option<i64>, default: i64, what: &str) -> i64 {
    value.unwrap_or_else(|| {
        warn!("default {what} ({default}) used");
        default
    })
}

fn to_u32(value: i64, what: &str) -> Result<u32> {
    u32::try_from(value).map_err(|_| {
        CaptionError::InvalidConfiguration(format!("{what} {value} is out of range"))
    })
}

fn rebase(base: &Path, p: &Path) -> PathBuf {
    if p.is_absolute() {
        p.to_path_buf()
    } else {
        base.join(p)
    }
}

pub fn load_config(path: &Path) -> Result<RunConfig> {
    let data = fs::read_to_string(path).map_err(|e| CaptionError::Config {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    parse_config(&data).map_err(|message| CaptionError::Config {
        path: path.to_path_buf(),
        message,
    })
}

pub fn parse_config(data: &str) -> Result<RunConfig, String> {
    serde_json::from_str(data).map_err(|e| format!("Failed to parse config: {e}"))
}
