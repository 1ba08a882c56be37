use super::bounds::{map_bounds, CellRange};
use super::layout::{CellIndex, Grid};
use crate::types::{Camera, ObjectKind, SceneObject};
use log::{debug, warn};
use std::collections::BTreeMap;

/// Why an object took no part in block assignment.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SkipReason {
    NotMesh,
    MissingGeometry,
}

/// Objects per cell for one frame.
///
/// Values are indices into the object slice given to [`assign_blocks`]; each
/// list keeps object order and holds an object at most once.
#[derive(Clone, Debug, Default)]
pub struct BlockAssignment {
    cells: BTreeMap<CellIndex, Vec<usize>>,
    ranges: Vec<Option<CellRange>>,
    skipped: Vec<(usize, SkipReason)>,
}

impl BlockAssignment {
    fn insert(&mut self, cell: CellIndex, object: usize) {
        let list = self.cells.entry(cell).or_default();
        if !list.contains(&object) {
            list.push(object);
        }
    }

    /// Objects recorded for `cell`, empty when none.
    pub fn objects_in(&self, cell: CellIndex) -> &[usize] {
        self.cells.get(&cell).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Non-empty cells in raster order.
    pub fn iter(&self) -> impl Iterator<Item = (CellIndex, &[usize])> {
        self.cells
            .iter()
            .filter(|(_, objs)| !objs.is_empty())
            .map(|(cell, objs)| (*cell, objs.as_slice()))
    }

    pub fn occupied_cells(&self) -> usize {
        self.iter().count()
    }

    /// Cell range computed for object `idx`, `None` if it was skipped.
    pub fn range_of(&self, idx: usize) -> Option<CellRange> {
        self.ranges.get(idx).copied().flatten()
    }

    pub fn skipped(&self) -> &[(usize, SkipReason)] {
        &self.skipped
    }
}

/// Record every object into each cell its projected box overlaps.
pub fn assign_blocks(
    objects: &[SceneObject],
    camera: &Camera,
    grid: &Grid,
    border: u32,
) -> BlockAssignment {
    let mut out = BlockAssignment {
        ranges: Vec::with_capacity(objects.len()),
        ..Default::default()
    };

    for (idx, obj) in objects.iter().enumerate() {
        if obj.kind != ObjectKind::Mesh {
            debug!("assign_blocks: '{}' is not a mesh, skipped", obj.id);
            out.skipped.push((idx, SkipReason::NotMesh));
            out.ranges.push(None);
            continue;
        }
        let bbox = match obj.usable_bbox() {
            Ok(bbox) => bbox,
            Err(err) => {
                warn!("assign_blocks: {err}, skipped");
                out.skipped.push((idx, SkipReason::MissingGeometry));
                out.ranges.push(None);
                continue;
            }
        };

        let range = map_bounds(&bbox, camera, grid, border);
        debug!(
            "assign_blocks: '{}' -> rows {}..={} cols {}..={}",
            obj.id, range.row_min, range.row_max, range.col_min, range.col_max
        );
        for cell in range.cells() {
            out.insert(cell, idx);
        }
        out.ranges.push(Some(range));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::build_grid;
    use crate::types::Aabb;
    use nalgebra::{Matrix4, Vector3};

    fn ortho_camera() -> Camera {
        Camera::new(
            Matrix4::identity(),
            Matrix4::new_orthographic(-1.0, 1.0, -1.0, 1.0, -10.0, 10.0),
        )
    }

    fn cube(id: &str, x: f64, y: f64, half: f64) -> SceneObject {
        let center = Vector3::new(x, y, 0.0);
        SceneObject::mesh(id, center, Aabb::around(center, half))
    }

    fn scene() -> Vec<SceneObject> {
        vec![
            cube("a", 0.5, -0.5, 0.05),
            cube("b", -0.6, 0.6, 0.2),
            cube("c", 0.1, 0.0, 0.4),
        ]
    }

    #[test]
    fn assigned_cells_lie_inside_recomputed_range() {
        let grid = build_grid((512, 256), (32, 32)).unwrap();
        let cam = ortho_camera();
        let objects = scene();
        let assignment = assign_blocks(&objects, &cam, &grid, 1);
        assert!(assignment.occupied_cells() > 0);
        for (cell, objs) in assignment.iter() {
            for &idx in objs {
                let bbox = objects[idx].bbox.unwrap();
                let range = map_bounds(&bbox, &cam, &grid, 1);
                assert!(range.contains(cell), "{} assigned outside its range", objects[idx].id);
                assert_eq!(assignment.range_of(idx), Some(range));
            }
        }
    }

    #[test]
    fn larger_border_never_assigns_fewer_cells() {
        let grid = build_grid((512, 512), (32, 32)).unwrap();
        let cam = ortho_camera();
        let objects = scene();
        let tight = assign_blocks(&objects, &cam, &grid, 0);
        let wide = assign_blocks(&objects, &cam, &grid, 2);
        for idx in 0..objects.len() {
            let t = tight.range_of(idx).unwrap();
            let w = wide.range_of(idx).unwrap();
            assert!(t.cell_count() <= w.cell_count());
        }
        for (cell, objs) in tight.iter() {
            for obj in objs {
                assert!(wide.objects_in(cell).contains(obj));
            }
        }
    }

    #[test]
    fn duplicate_ids_and_order_are_stable() {
        let grid = build_grid((128, 128), (64, 64)).unwrap();
        let cam = ortho_camera();
        let objects = scene();
        let assignment = assign_blocks(&objects, &cam, &grid, 3);
        for (_, objs) in assignment.iter() {
            let mut sorted = objs.to_vec();
            sorted.sort_unstable();
            assert_eq!(sorted, objs, "insertion order must follow object order");
            sorted.dedup();
            assert_eq!(sorted.len(), objs.len());
        }
    }

    #[test]
    fn objects_without_geometry_are_skipped() {
        let grid = build_grid((128, 128), (64, 64)).unwrap();
        let cam = ortho_camera();
        let mut objects = scene();
        objects[0].bbox = None;
        objects[1].kind = ObjectKind::Other;
        objects[2].bbox = Some(Aabb::new(Vector3::repeat(0.2), Vector3::repeat(0.2)));
        let assignment = assign_blocks(&objects, &cam, &grid, 0);
        assert_eq!(assignment.occupied_cells(), 0);
        assert_eq!(
            assignment.skipped(),
            &[
                (0, SkipReason::MissingGeometry),
                (1, SkipReason::NotMesh),
                (2, SkipReason::MissingGeometry)
            ]
        );
        assert!(assignment.range_of(0).is_none());
    }
}
