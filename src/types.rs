use crate::error::{CaptionError, Result};
use nalgebra::{Matrix4, Point3, Vector3};
use serde::{Deserialize, Serialize};

/// World-space axis-aligned bounding box.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vector3<f64>,
    pub max: Vector3<f64>,
}

impl Aabb {
    pub fn new(min: Vector3<f64>, max: Vector3<f64>) -> Self {
        Self { min, max }
    }

    /// Box of half-extent `half` around `center`.
    pub fn around(center: Vector3<f64>, half: f64) -> Self {
        let h = Vector3::repeat(half);
        Self {
            min: center - h,
            max: center + h,
        }
    }

    /// The 8 corners, x-major: (xmin,ymin,zmin), (xmin,ymin,zmax), ...
    pub fn corners(&self) -> [Point3<f64>; 8] {
        let (lo, hi) = (&self.min, &self.max);
        [
            Point3::new(lo.x, lo.y, lo.z),
            Point3::new(lo.x, lo.y, hi.z),
            Point3::new(lo.x, hi.y, lo.z),
            Point3::new(lo.x, hi.y, hi.z),
            Point3::new(hi.x, lo.y, lo.z),
            Point3::new(hi.x, lo.y, hi.z),
            Point3::new(hi.x, hi.y, lo.z),
            Point3::new(hi.x, hi.y, hi.z),
        ]
    }

    /// Finite, not inverted, and not collapsed to a single point.
    pub fn is_usable(&self) -> bool {
        let finite = self.min.iter().chain(self.max.iter()).all(|v| v.is_finite());
        if !finite {
            return false;
        }
        let extent = self.max - self.min;
        extent.iter().all(|&e| e >= 0.0) && extent.iter().any(|&e| e > 0.0)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectKind {
    #[default]
    Mesh,
    Other,
}

/// One scene node as seen at a given frame.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SceneObject {
    pub id: String,
    #[serde(default)]
    pub kind: ObjectKind,
    pub translation: Vector3<f64>,
    #[serde(default = "zero_vec")]
    pub rotation: Vector3<f64>,
    #[serde(default = "unit_scale")]
    pub scale: Vector3<f64>,
    #[serde(default)]
    pub bbox: Option<Aabb>,
}

fn zero_vec() -> Vector3<f64> {
    Vector3::zeros()
}

fn unit_scale() -> Vector3<f64> {
    Vector3::repeat(1.0)
}

impl SceneObject {
    /// Mesh at `translation` with identity rotation/scale and the given box.
    pub fn mesh(id: impl Into<String>, translation: Vector3<f64>, bbox: Aabb) -> Self {
        Self {
            id: id.into(),
            kind: ObjectKind::Mesh,
            translation,
            rotation: Vector3::zeros(),
            scale: unit_scale(),
            bbox: Some(bbox),
        }
    }

    /// The bounding box, if it can take part in block assignment.
    pub fn usable_bbox(&self) -> Result<Aabb> {
        self.bbox
            .filter(Aabb::is_usable)
            .ok_or_else(|| CaptionError::MissingGeometry {
                object: self.id.clone(),
            })
    }

    pub fn position(&self) -> Point3<f64> {
        Point3::from(self.translation)
    }
}

/// Active viewpoint for one frame.
///
/// Matrices use the column-vector convention:
/// `clip = projection * world_inverse * p`.
#[derive(Clone, Debug, PartialEq)]
pub struct Camera {
    pub world_inverse: Matrix4<f64>,
    pub projection: Matrix4<f64>,
}

impl Camera {
    pub fn new(world_inverse: Matrix4<f64>, projection: Matrix4<f64>) -> Self {
        Self {
            world_inverse,
            projection,
        }
    }

    /// Right-handed perspective camera at `eye` looking at `target`.
    pub fn look_at(
        eye: Point3<f64>,
        target: Point3<f64>,
        up: Vector3<f64>,
        fovy_rad: f64,
        aspect: f64,
        near: f64,
        far: f64,
    ) -> Self {
        Self {
            world_inverse: Matrix4::look_at_rh(&eye, &target, &up),
            projection: Matrix4::new_perspective(aspect, fovy_rad, near, far),
        }
    }

    pub fn view_projection(&self) -> Matrix4<f64> {
        self.projection * self.world_inverse
    }

    pub fn inverse_view_projection(&self) -> Option<Matrix4<f64>> {
        self.view_projection().try_inverse()
    }
}

/// Everything the core needs about one frame.
#[derive(Clone, Debug)]
pub struct FrameSnapshot {
    pub frame: u32,
    pub camera: Camera,
    pub objects: Vec<SceneObject>,
}
