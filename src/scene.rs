//! Scene data sources.
//!
//! The core never talks to a 3D host directly. Everything it needs per frame
//! (active camera and mesh list) comes from a [`SceneSnapshotProvider`].

use crate::error::{CaptionError, Result};
use crate::types::{Camera, FrameSnapshot, SceneObject};
use log::debug;
use nalgebra::Matrix4;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Supplies render resolution and per-frame scene state.
///
/// Implementations must be shareable across worker threads; each call
/// returns an owned snapshot so frames never share mutable state.
pub trait SceneSnapshotProvider: Sync {
    fn resolution(&self) -> (u32, u32);

    fn snapshot(&self, frame: u32) -> Result<FrameSnapshot>;
}

/// Fixed set of frames held in memory.
#[derive(Clone, Debug, Default)]
pub struct InMemoryScene {
    resolution: (u32, u32),
    frames: BTreeMap<u32, (Camera, Vec<SceneObject>)>,
}

impl InMemoryScene {
    pub fn new(resolution: (u32, u32)) -> Self {
        Self {
            resolution,
            frames: BTreeMap::new(),
        }
    }

    pub fn insert(&mut self, frame: u32, camera: Camera, objects: Vec<SceneObject>) {
        self.frames.insert(frame, (camera, objects));
    }

    pub fn with_frame(mut self, frame: u32, camera: Camera, objects: Vec<SceneObject>) -> Self {
        self.insert(frame, camera, objects);
        self
    }

    pub fn frame_numbers(&self) -> impl Iterator<Item = u32> + '_ {
        self.frames.keys().copied()
    }
}

impl SceneSnapshotProvider for InMemoryScene {
    fn resolution(&self) -> (u32, u32) {
        self.resolution
    }

    fn snapshot(&self, frame: u32) -> Result<FrameSnapshot> {
        let (camera, objects) = self
            .frames
            .get(&frame)
            .ok_or_else(|| CaptionError::Scene(format!("frame {frame:03} is not in the scene")))?;
        Ok(FrameSnapshot {
            frame,
            camera: camera.clone(),
            objects: objects.clone(),
        })
    }
}

/// Scene exported from a 3D host as JSON.
///
/// ```json
/// { "resolution": [1920, 1080],
///   "frames": [ { "frame": 1,
///                 "camera": { "world_inverse": [[1,0,0,0], ...], "projection": [[...]] },
///                 "objects": [ { "id": "pCube1", "translation": [0,0,0],
///                                "bbox": { "min": [-1,-1,-1], "max": [1,1,1] } } ] } ] }
/// ```
///
/// Camera matrices are written row by row in the column-vector convention.
#[derive(Debug, Deserialize)]
struct SceneFile {
    resolution: [u32; 2],
    frames: Vec<FrameEntry>,
}

#[derive(Debug, Deserialize)]
struct FrameEntry {
    frame: u32,
    camera: CameraEntry,
    #[serde(default)]
    objects: Vec<SceneObject>,
}

#[derive(Debug, Deserialize)]
struct CameraEntry {
    world_inverse: [[f64; 4]; 4],
    projection: [[f64; 4]; 4],
}

fn matrix_from_rows(rows: &[[f64; 4]; 4]) -> Matrix4<f64> {
    Matrix4::from_fn(|r, c| rows[r][c])
}

/// Provider backed by a scene dump file; the whole file is loaded up front.
#[derive(Clone, Debug)]
pub struct JsonSceneProvider {
    inner: InMemoryScene,
}

impl JsonSceneProvider {
    pub fn load(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path).map_err(|e| CaptionError::io(path, e))?;
        Self::from_json_str(&data)
            .map_err(|e| CaptionError::Scene(format!("{}: {e}", path.display())))
    }

    pub fn from_json_str(data: &str) -> Result<Self, String> {
        let file: SceneFile = serde_json::from_str(data).map_err(|e| e.to_string())?;
        let mut inner = InMemoryScene::new((file.resolution[0], file.resolution[1]));
        for entry in file.frames {
            let camera = Camera::new(
                matrix_from_rows(&entry.camera.world_inverse),
                matrix_from_rows(&entry.camera.projection),
            );
            if inner.frames.contains_key(&entry.frame) {
                return Err(format!("frame {:03} listed twice", entry.frame));
            }
            inner.insert(entry.frame, camera, entry.objects);
        }
        debug!(
            "JsonSceneProvider: {} frame(s) at {}x{}",
            inner.frames.len(),
            inner.resolution.0,
            inner.resolution.1
        );
        Ok(Self { inner })
    }

    pub fn frame_numbers(&self) -> impl Iterator<Item = u32> + '_ {
        self.inner.frame_numbers()
    }
}

impl SceneSnapshotProvider for JsonSceneProvider {
    fn resolution(&self) -> (u32, u32) {
        self.inner.resolution()
    }

    fn snapshot(&self, frame: u32) -> Result<FrameSnapshot> {
        self.inner.snapshot(frame)
    }
}
