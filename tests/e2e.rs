mod common;

use block_semantics::grid::CellIndex;
use block_semantics::output::write_frame;
use block_semantics::projection::screen_to_world;
use block_semantics::semantics::plain_caption;
use block_semantics::{process_frame, FrameContext, FrameSnapshot};
use common::synthetic_scene::{busy_objects, cube, front_camera, on_screen, scratch_dir};
use std::fs;

#[test]
fn small_object_in_bottom_right_quadrant_lands_in_cell_four() {
    let _ = env_logger::builder().is_test(true).try_init();
    let center = on_screen(0.75, 0.75);
    let snapshot = FrameSnapshot {
        frame: 1,
        camera: front_camera(),
        objects: vec![cube("objA", center, 0.2)],
    };

    let out = process_frame(FrameContext::new((128, 128), 64, 0), &snapshot).unwrap();
    assert_eq!((out.rows, out.cols), (2, 2));
    assert_eq!(out.cells.keys().copied().collect::<Vec<_>>(), vec![4]);

    // Distance is measured from the near-plane point under pixel (96, 96).
    let sample = screen_to_world([96.0, 96.0], (128, 128), &snapshot.camera).unwrap();
    let dist = nalgebra::distance(&sample, &nalgebra::Point3::from(center));
    assert_eq!(out.get(4).unwrap(), plain_caption("objA", dist));
}

#[test]
fn two_objects_in_one_cell_share_a_single_line() {
    let snapshot = FrameSnapshot {
        frame: 1,
        camera: front_camera(),
        objects: vec![
            cube("objA", on_screen(0.7, 0.7), 0.1),
            cube("objB", on_screen(0.8, 0.8), 0.1),
        ],
    };
    let out = process_frame(FrameContext::new((128, 128), 64, 0), &snapshot).unwrap();
    let text = out.cell_at(CellIndex::new(1, 1)).unwrap();
    assert!(!text.contains('\n'));
    let parts: Vec<&str> = text.split(" and ").collect();
    assert_eq!(parts.len(), 2, "{text}");
    assert!(parts[0].starts_with("objA with dist "));
    assert!(parts[1].starts_with("objB with dist "));
}

#[test]
fn reprocessing_a_frame_is_byte_identical() {
    let snapshot = FrameSnapshot {
        frame: 12,
        camera: front_camera(),
        objects: busy_objects(0.0),
    };
    let ctx = FrameContext::new((512, 512), 64, 1);

    let first_root = scratch_dir("determinism_a");
    let second_root = scratch_dir("determinism_b");
    let first = write_frame(&first_root, &process_frame(ctx, &snapshot).unwrap()).unwrap();
    let second = write_frame(&second_root, &process_frame(ctx, &snapshot).unwrap()).unwrap();

    assert!(!first.is_empty());
    assert_eq!(first.len(), second.len());
    for (a, b) in first.iter().zip(&second) {
        assert_eq!(a.file_name(), b.file_name());
        assert_eq!(fs::read(a).unwrap(), fs::read(b).unwrap());
    }
    let _ = fs::remove_dir_all(&first_root);
    let _ = fs::remove_dir_all(&second_root);
}

#[test]
fn wider_border_only_adds_cells() {
    let snapshot = FrameSnapshot {
        frame: 1,
        camera: front_camera(),
        objects: busy_objects(0.0),
    };
    let tight = process_frame(FrameContext::new((512, 512), 64, 0), &snapshot).unwrap();
    let wide = process_frame(FrameContext::new((512, 512), 64, 2), &snapshot).unwrap();

    assert!(tight.cells.len() <= wide.cells.len());
    for (cell, text) in &tight.cells {
        let wide_text = wide.get(*cell).expect("cell kept with a wider border");
        for part in text.split(" and ") {
            let id = part.split(" with dist ").next().unwrap();
            assert!(wide_text.contains(id), "{id} lost from cell {cell}");
        }
    }
    // The mesh without a bounding box never shows up.
    assert!(wide.cells.values().all(|t| !t.contains("ghost")));
    assert_eq!(wide.report.objects_skipped, 1);
}

#[test]
fn object_entirely_off_screen_still_gets_assigned() {
    let snapshot = FrameSnapshot {
        frame: 1,
        camera: front_camera(),
        objects: vec![cube("offscreen", on_screen(1.6, 0.25), 0.2)],
    };
    let out = process_frame(FrameContext::new((256, 256), 64, 0), &snapshot).unwrap();
    // Off the right edge: every column of the rows it spans.
    let cols: Vec<usize> = out.cells.keys().map(|r| (r - 1) % out.cols).collect();
    assert!(!out.cells.is_empty());
    for c in 0..out.cols {
        assert!(cols.contains(&c), "column {c} missing");
    }
}
