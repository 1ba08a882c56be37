use block_semantics::{Aabb, Camera, InMemoryScene, SceneObject};
use nalgebra::{Point3, Vector3};
use std::path::PathBuf;

/// Perspective camera 10 units up +z looking at the origin, 60° vertical fov.
///
/// On the z=0 plane the view spans `±10·tan(30°) ≈ ±5.77` units on both axes
/// for a square image.
pub fn front_camera() -> Camera {
    Camera::look_at(
        Point3::new(0.0, 0.0, 10.0),
        Point3::origin(),
        Vector3::y(),
        std::f64::consts::FRAC_PI_3,
        1.0,
        0.1,
        100.0,
    )
}

/// Half-width of the view on the z=0 plane for [`front_camera`].
pub fn half_view() -> f64 {
    10.0 * (std::f64::consts::FRAC_PI_6).tan()
}

/// World point on z=0 that projects to normalized screen `(u, v)`.
pub fn on_screen(u: f64, v: f64) -> Vector3<f64> {
    let h = half_view();
    Vector3::new((2.0 * u - 1.0) * h, (1.0 - 2.0 * v) * h, 0.0)
}

pub fn cube(id: &str, center: Vector3<f64>, half: f64) -> SceneObject {
    SceneObject::mesh(id, center, Aabb::around(center, half))
}

/// A few meshes spread over the view plus one without geometry.
pub fn busy_objects(shift: f64) -> Vec<SceneObject> {
    let mut ghost = cube("ghost", on_screen(0.5, 0.5), 0.1);
    ghost.bbox = None;
    vec![
        cube("pCube1", on_screen(0.2 + shift, 0.3), 0.4),
        cube("pSphere1", on_screen(0.7, 0.6 - shift), 0.8),
        cube("pCone1", on_screen(0.55, 0.55), 0.1),
        ghost,
        cube("pPlane1", Vector3::new(0.0, -2.0, -3.0), 1.5),
    ]
}

/// Frames 1..=frames of [`busy_objects`], drifting a little every frame.
pub fn animated_scene(resolution: (u32, u32), frames: u32) -> InMemoryScene {
    let mut scene = InMemoryScene::new(resolution);
    for f in 1..=frames {
        scene.insert(f, front_camera(), busy_objects(f as f64 * 0.02));
    }
    scene
}

/// Fresh, empty directory under the system temp dir.
pub fn scratch_dir(tag: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "block_semantics_it_{tag}_{}",
        std::process::id()
    ));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).expect("create scratch dir");
    dir
}
