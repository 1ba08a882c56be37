//! Per-cell caption text.
//!
//! A caption line describes one object assigned to a cell, together with its
//! distance from the world point under the cell's centre pixel. Lines for the
//! same cell are joined with [`CAPTION_SEPARATOR`].

use crate::error::{CaptionError, Result};
use crate::grid::{CellIndex, Grid};
use crate::projection::Unprojector;
use crate::types::{FrameSnapshot, SceneObject};
use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};

pub const CAPTION_SEPARATOR: &str = " and ";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaptionStyle {
    /// `"<id> with dist <micro-units>"`.
    #[default]
    Plain,
    /// Distance plus the object's translation, rotation pivot and scale.
    Detailed,
}

/// Caption strings for the objects of one cell, in assignment order.
///
/// `objects` indexes into `snapshot.objects`. The cell's sample pixel is
/// unprojected through the snapshot camera; a camera that cannot be inverted
/// fails with [`CaptionError::DegenerateCamera`].
pub fn extract_captions(
    cell: CellIndex,
    objects: &[usize],
    snapshot: &FrameSnapshot,
    grid: &Grid,
    style: CaptionStyle,
) -> Result<Vec<String>> {
    let degenerate = || CaptionError::DegenerateCamera {
        frame: snapshot.frame,
    };
    let sample = Unprojector::new(&snapshot.camera, grid.resolution)
        .and_then(|un| un.pixel_to_world(grid.sample_pixel(cell)))
        .ok_or_else(degenerate)?;
    let captions = objects
        .iter()
        .filter_map(|&idx| snapshot.objects.get(idx))
        .map(|obj| caption_for(obj, distance(&obj.position(), &sample), style))
        .collect();
    Ok(captions)
}

fn caption_for(obj: &SceneObject, dist: f64, style: CaptionStyle) -> String {
    match style {
        CaptionStyle::Plain => plain_caption(&obj.id, dist),
        CaptionStyle::Detailed => detailed_caption(obj, dist),
    }
}

pub fn distance(a: &Point3<f64>, b: &Point3<f64>) -> f64 {
    nalgebra::distance(a, b)
}

/// `"<id> with dist <d * 1e6>"`, truncated and zero-padded to 6 digits.
pub fn plain_caption(id: &str, dist: f64) -> String {
    let micro = (dist * 1e6) as u64;
    format!("{id} with dist {micro:06}")
}

pub fn detailed_caption(obj: &SceneObject, dist: f64) -> String {
    format!(
        "{} : [d : {:.3}, t : {}, r : {}, s : {}]",
        obj.id,
        dist,
        fmt_vec3(&obj.translation),
        fmt_vec3(&obj.rotation),
        fmt_vec3(&obj.scale),
    )
}

fn fmt_vec3(v: &Vector3<f64>) -> String {
    format!(
        "[{:.3}, {:.3}, {:.3}]",
        clean_zero(v.x),
        clean_zero(v.y),
        clean_zero(v.z)
    )
}

/// Values that round to zero at 6 decimals become `0.0`, dropping the sign.
fn clean_zero(v: f64) -> f64 {
    if v.abs() < 5e-7 {
        0.0
    } else {
        v
    }
}

/// Join one cell's captions into its output line.
pub fn join_captions(captions: &[String]) -> String {
    captions.join(CAPTION_SEPARATOR)
}
