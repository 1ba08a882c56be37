//! World ↔ screen mapping through a camera's view and projection matrices.
//!
//! Screen space is normalized to `[0,1]×[0,1]` with the origin at the top
//! left, so row 0 of a grid is the visual top of the image.

use crate::types::Camera;
use nalgebra::{Matrix4, Point3, Vector4};

const EPS: f64 = 1e-12;

/// Map a world point to normalized screen coordinates.
///
/// No clipping is done: points behind the camera or outside the frustum
/// produce coordinates outside `[0,1]`, and `w = 0` yields non-finite values.
pub fn world_to_screen(p: &Point3<f64>, camera: &Camera) -> [f64; 2] {
    project_with(&camera.view_projection(), p)
}

/// Project many points sharing one camera.
pub fn project_points(camera: &Camera, pts: &[Point3<f64>]) -> Vec<[f64; 2]> {
    let vp = camera.view_projection();
    pts.iter().map(|p| project_with(&vp, p)).collect()
}

fn project_with(vp: &Matrix4<f64>, p: &Point3<f64>) -> [f64; 2] {
    let v = vp * p.to_homogeneous();
    let w = v[3];
    let x = v[0] / w / 2.0 + 0.5;
    let y = 1.0 - (v[1] / w / 2.0 + 0.5);
    [x, y]
}

/// Inverse mapping from image pixels to world points on the near plane.
#[derive(Clone, Debug)]
pub struct Unprojector {
    inv_vp: Matrix4<f64>,
    width: f64,
    height: f64,
}

impl Unprojector {
    /// `None` when the camera's view-projection is singular or the
    /// resolution is empty.
    pub fn new(camera: &Camera, resolution: (u32, u32)) -> Option<Self> {
        if resolution.0 == 0 || resolution.1 == 0 {
            return None;
        }
        let inv_vp = camera.inverse_view_projection()?;
        Some(Self {
            inv_vp,
            width: resolution.0 as f64,
            height: resolution.1 as f64,
        })
    }

    /// World point on the near plane under pixel `(x, y)`.
    pub fn pixel_to_world(&self, pixel: [f64; 2]) -> Option<Point3<f64>> {
        let u = pixel[0] / self.width;
        let v = pixel[1] / self.height;
        self.screen_to_world([u, v])
    }

    /// World point on the near plane under normalized screen `(u, v)`.
    pub fn screen_to_world(&self, uv: [f64; 2]) -> Option<Point3<f64>> {
        let ndc = Vector4::new(2.0 * uv[0] - 1.0, 1.0 - 2.0 * uv[1], -1.0, 1.0);
        let h = self.inv_vp * ndc;
        let w = h[3];
        if !w.is_finite() || w.abs() <= EPS {
            return None;
        }
        let p = Point3::new(h[0] / w, h[1] / w, h[2] / w);
        if p.iter().all(|c| c.is_finite()) {
            Some(p)
        } else {
            None
        }
    }
}

/// One-shot pixel unprojection; prefer [`Unprojector`] for repeated use.
pub fn screen_to_world(
    pixel: [f64; 2],
    resolution: (u32, u32),
    camera: &Camera,
) -> Option<Point3<f64>> {
    Unprojector::new(camera, resolution)?.pixel_to_world(pixel)
}
