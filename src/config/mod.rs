//! JSON configuration for batch runs.

pub mod run;

pub use run::{load_config, parse_config, FrameRange, RunConfig, RunParams};
