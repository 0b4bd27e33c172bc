mod support;

use contourcast::build::{build_and_export, build_model, BuildConfig};
use contourcast::contour::{extract_outlines, ContourConfig, Outline};
use contourcast::errors::BuildError;
use nalgebra::Point2;
use support::{approx_eq, bounding_box, frame_with_rects, rect_outline};

fn config_at(path: std::path::PathBuf) -> BuildConfig {
    BuildConfig {
        model_path: path,
        ..BuildConfig::default()
    }
}

#[test]
fn single_square_extrudes_to_the_expected_prism() {
    // 100x100 px at scale 0.1 -> 10x10 units, 10 units tall.
    let outlines = vec![rect_outline(0.0, 0.0, 100.0, 100.0)];
    let mesh = build_model(&outlines, &BuildConfig::default()).unwrap();

    assert!(
        approx_eq(mesh.volume(), 1000.0, 1e-6),
        "prism volume was {}",
        mesh.volume()
    );
    let bb = bounding_box(&mesh);
    assert!(approx_eq(bb[2], 0.0, 1e-9) && approx_eq(bb[5], 10.0, 1e-9));
}

#[test]
fn disjoint_squares_union_to_the_sum_of_volumes() {
    let outlines = vec![
        rect_outline(0.0, 0.0, 100.0, 100.0),
        rect_outline(300.0, 0.0, 100.0, 100.0),
    ];
    let mesh = build_model(&outlines, &BuildConfig::default()).unwrap();
    assert!(
        approx_eq(mesh.volume(), 2000.0, 1e-6),
        "disjoint union volume was {}",
        mesh.volume()
    );
}

#[test]
fn overlapping_squares_do_not_double_count_volume() {
    // Two 10x10 squares (after scaling) overlapping by 5x10.
    let outlines = vec![
        rect_outline(0.0, 0.0, 100.0, 100.0),
        rect_outline(50.0, 0.0, 100.0, 100.0),
    ];
    let mesh = build_model(&outlines, &BuildConfig::default()).unwrap();
    assert!(
        approx_eq(mesh.volume(), 1500.0, 1e-4),
        "overlapping union volume was {}",
        mesh.volume()
    );
}

#[test]
fn union_is_order_independent() {
    let a = rect_outline(0.0, 0.0, 100.0, 100.0);
    let b = rect_outline(50.0, 30.0, 100.0, 100.0);
    let config = BuildConfig::default();

    let ab = build_model(&[a.clone(), b.clone()], &config).unwrap();
    let ba = build_model(&[b, a], &config).unwrap();
    assert!(
        approx_eq(ab.volume(), ba.volume(), 1e-6),
        "union volume depends on order: {} vs {}",
        ab.volume(),
        ba.volume()
    );
}

#[test]
fn repeated_builds_of_one_snapshot_are_byte_identical() {
    let dir = tempfile::tempdir().unwrap();
    let outlines = vec![
        rect_outline(0.0, 0.0, 100.0, 100.0),
        rect_outline(50.0, 30.0, 100.0, 100.0),
    ];

    let config = config_at(dir.path().join("first.stl"));
    build_and_export(&outlines, &config).unwrap();
    let first = std::fs::read(&config.model_path).unwrap();

    let config = config_at(dir.path().join("second.stl"));
    build_and_export(&outlines, &config).unwrap();
    let second = std::fs::read(&config.model_path).unwrap();

    assert_eq!(first, second, "same outlines must serialize identically");
}

#[test]
fn empty_snapshot_reports_no_shapes() {
    let result = build_model(&[], &BuildConfig::default());
    assert!(matches!(result, Err(BuildError::NoShapes)));
}

#[test]
fn self_intersecting_outline_fails_the_whole_snapshot() {
    let good = rect_outline(0.0, 0.0, 100.0, 100.0);
    let bowtie = Outline {
        points: vec![
            Point2::new(0.0, 0.0),
            Point2::new(100.0, 0.0),
            Point2::new(20.0, 60.0),
            Point2::new(80.0, 60.0),
        ],
    };
    let result = build_model(&[good, bowtie], &BuildConfig::default());
    assert!(matches!(result, Err(BuildError::Geometry(_))));
}

#[test]
fn export_writes_a_readable_stl() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_at(dir.path().join("model.stl"));
    let outlines = vec![rect_outline(0.0, 0.0, 100.0, 100.0)];

    let report = build_and_export(&outlines, &config).unwrap();
    assert_eq!(report.solids, 1);
    assert!(report.triangles >= 12, "a prism needs at least 12 facets");

    let bytes = std::fs::read(&config.model_path).unwrap();
    let mesh = contourcast::mesh::Mesh::from_stl(&bytes).unwrap();
    assert!(approx_eq(mesh.volume(), 1000.0, 1e-2));
}

#[test]
fn camera_frame_to_solid_end_to_end() {
    // 80x80 px bright square -> one outline -> 8x8x10 prism, give or
    // take the couple of pixels the traced edge ring sits off the shape.
    let frame = frame_with_rects(200, 200, &[(60, 60, 80, 80)]);
    let outlines = extract_outlines(&frame, &ContourConfig::default());
    assert_eq!(outlines.len(), 1);
    // The trace follows the staircased outer rim of the blurred edge
    // band. Its corner bevels deviate a few pixels at most, well under
    // the 2 %-of-perimeter tolerance, so simplification lands on the
    // four corners.
    assert_eq!(
        outlines[0].points.len(),
        4,
        "square outline kept {} points",
        outlines[0].points.len()
    );

    let mesh = build_model(&outlines, &BuildConfig::default()).unwrap();
    let volume = mesh.volume();
    assert!(
        (500.0..800.0).contains(&volume),
        "end-to-end volume {volume} strayed too far from 640"
    );
    let bb = bounding_box(&mesh);
    assert!(approx_eq(bb[5] - bb[2], 10.0, 1e-9), "thickness must be exact");
}

#[test]
fn failed_build_leaves_prior_model_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_at(dir.path().join("model.stl"));

    let outlines = vec![rect_outline(0.0, 0.0, 100.0, 100.0)];
    build_and_export(&outlines, &config).unwrap();
    let before = std::fs::read(&config.model_path).unwrap();

    let degenerate = Outline {
        points: vec![
            Point2::new(0.0, 0.0),
            Point2::new(50.0, 0.0),
            Point2::new(100.0, 0.0),
        ],
    };
    assert!(build_and_export(&[degenerate], &config).is_err());

    let after = std::fs::read(&config.model_path).unwrap();
    assert_eq!(before, after, "a failed snapshot must not touch the file");
}
