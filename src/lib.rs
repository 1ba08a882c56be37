//! Screen-space block assignment and per-block captions for rendered frames.
//!
//! Each frame's image plane is split into a uniform grid of blocks. Every
//! mesh's world-space bounding box is projected through the active camera,
//! mapped to the blocks it overlaps, and each non-empty block gets a caption
//! listing its objects and their distance from the block's sample point.

// Core, IO-free.
pub mod error;
pub mod frame;
pub mod grid;
pub mod projection;
pub mod semantics;
pub mod types;

// Batch surface.
pub mod config;
pub mod diagnostics;
pub mod output;
pub mod runner;
pub mod scene;

// --- High-level re-exports -------------------------------------------------

pub use crate::error::{CaptionError, Result};
pub use crate::frame::{process_frame, FrameCaptions, FrameContext};
pub use crate::scene::{InMemoryScene, JsonSceneProvider, SceneSnapshotProvider};
pub use crate::types::{Aabb, Camera, FrameSnapshot, ObjectKind, SceneObject};

// --- Prelude ---------------------------------------------------------------

/// Small prelude for quick experiments.
///
/// ```
/// use block_semantics::prelude::*;
/// use nalgebra::{Point3, Vector3};
///
/// # fn main() -> Result<(), CaptionError> {
/// let camera = Camera::look_at(
///     Point3::new(0.0, 0.0, 10.0),
///     Point3::origin(),
///     Vector3::y(),
///     1.0,
///     1.0,
///     0.1,
///     100.0,
/// );
/// let center = Vector3::new(0.0, 0.0, 0.0);
/// let snapshot = FrameSnapshot {
///     frame: 1,
///     camera,
///     objects: vec![SceneObject::mesh("pCube1", center, Aabb::around(center, 0.5))],
/// };
/// let captions = process_frame(FrameContext::new((256, 256), 64, 0), &snapshot)?;
/// for (cell, text) in &captions.cells {
///     println!("{cell:03}: {text}");
/// }
/// # Ok(())
/// # }
/// ```
pub mod prelude {
    pub use crate::semantics::CaptionStyle;
    pub use crate::{
        process_frame, Aabb, Camera, CaptionError, FrameContext, FrameSnapshot, SceneObject,
    };
}
