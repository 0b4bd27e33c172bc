mod support;

use contourcast::build::{build_and_export, BuildConfig};
use contourcast::errors::PreviewError;
use contourcast::preview::{fit_distance, load_model, spin_angle, spin_transform};
use std::time::Duration;
use support::{approx_eq, bounding_box, rect_outline};

fn exported_model(dir: &tempfile::TempDir) -> std::path::PathBuf {
    let config = BuildConfig {
        model_path: dir.path().join("model.stl"),
        ..BuildConfig::default()
    };
    build_and_export(&[rect_outline(0.0, 0.0, 100.0, 100.0)], &config).unwrap();
    config.model_path
}

#[test]
fn loaded_model_is_centered_on_the_origin() {
    let dir = tempfile::tempdir().unwrap();
    let mesh = load_model(&exported_model(&dir)).unwrap();
    let bb = bounding_box(&mesh);
    assert!(approx_eq(bb[0], -bb[3], 1e-3));
    assert!(approx_eq(bb[1], -bb[4], 1e-3));
    assert!(approx_eq(bb[2], -bb[5], 1e-3));
}

#[test]
fn fit_distance_is_twice_the_largest_extent() {
    let dir = tempfile::tempdir().unwrap();
    let mesh = load_model(&exported_model(&dir)).unwrap();
    // The prism spans 10 units on every axis.
    assert!(approx_eq(fit_distance(&mesh), 20.0, 1e-2));
}

#[test]
fn fit_distance_scales_linearly_with_model_size() {
    use contourcast::build::build_model;
    // 10x10x10 and 20x20x10 prisms: doubling the largest extent must
    // double the camera distance.
    let small = build_model(&[rect_outline(0.0, 0.0, 100.0, 100.0)], &BuildConfig::default())
        .unwrap();
    let large = build_model(&[rect_outline(0.0, 0.0, 200.0, 200.0)], &BuildConfig::default())
        .unwrap();
    assert!(approx_eq(fit_distance(&large), 2.0 * fit_distance(&small), 1e-9));
}

#[test]
fn missing_model_file_is_a_load_error() {
    let dir = tempfile::tempdir().unwrap();
    let result = load_model(&dir.path().join("nope.stl"));
    assert!(matches!(result, Err(PreviewError::Load { .. })));
}

#[test]
fn garbage_bytes_are_a_load_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("garbage.stl");
    std::fs::write(&path, b"not an stl").unwrap();
    assert!(matches!(load_model(&path), Err(PreviewError::Load { .. })));
}

#[test]
fn spin_rate_is_sixty_degrees_per_second() {
    assert!(approx_eq(spin_angle(Duration::from_millis(500)), 30.0, 1e-9));
    assert!(approx_eq(spin_angle(Duration::from_secs(2)), 120.0, 1e-9));
    // Wraps cleanly after a full turn.
    assert!(approx_eq(spin_angle(Duration::from_secs(7)), 60.0, 1e-9));
}

#[test]
fn spin_transform_rotates_in_the_horizontal_plane() {
    let m = spin_transform(90.0);
    let x = m.transform_vector(&nalgebra::Vector3::x());
    assert!((x - nalgebra::Vector3::y()).norm() < 1e-12);
}
