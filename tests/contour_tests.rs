mod support;

use contourcast::contour::{extract_outlines, ContourConfig};
use support::frame_with_rects;

#[test]
fn single_bright_shape_yields_one_outline() {
    let frame = frame_with_rects(200, 200, &[(40, 40, 100, 100)]);
    let outlines = extract_outlines(&frame, &ContourConfig::default());

    assert_eq!(outlines.len(), 1, "expected exactly one external outline");
    let area = outlines[0].area();
    // The traced border sits within a couple of pixels of the filled
    // square, so the area lands near 100x100.
    assert!(
        area > 8_000.0 && area < 12_000.0,
        "outline area {area} should approximate the square"
    );
}

#[test]
fn blank_frame_yields_nothing() {
    let frame = frame_with_rects(200, 200, &[]);
    let outlines = extract_outlines(&frame, &ContourConfig::default());
    assert!(outlines.is_empty());
}

#[test]
fn small_specks_are_filtered_by_area() {
    // 10x10 = 100 px^2, well under the 1000 px^2 floor.
    let frame = frame_with_rects(200, 200, &[(20, 20, 10, 10)]);
    let outlines = extract_outlines(&frame, &ContourConfig::default());
    assert!(outlines.is_empty(), "speck below min_area must be dropped");

    let mut config = ContourConfig::default();
    config.min_area = 20.0;
    let outlines = extract_outlines(&frame, &config);
    assert_eq!(outlines.len(), 1, "lowering min_area keeps the speck");
}

#[test]
fn two_disjoint_shapes_yield_two_outlines() {
    let frame = frame_with_rects(300, 200, &[(20, 40, 80, 80), (170, 40, 80, 80)]);
    let outlines = extract_outlines(&frame, &ContourConfig::default());
    assert_eq!(outlines.len(), 2);
}

#[test]
fn nested_edge_rings_keep_only_the_external_outline() {
    // A filled square's edge map is a thin ring; tracing it yields an
    // outer and an inner contour. Only the outer one survives.
    let frame = frame_with_rects(200, 200, &[(40, 40, 100, 100)]);
    let outlines = extract_outlines(&frame, &ContourConfig::default());

    assert_eq!(outlines.len(), 1);
    for other in &outlines[1..] {
        assert!(other.area() < outlines[0].area());
    }
}

#[test]
fn simplification_keeps_outline_count_low() {
    let frame = frame_with_rects(200, 200, &[(40, 40, 100, 100)]);
    let outlines = extract_outlines(&frame, &ContourConfig::default());
    assert_eq!(outlines.len(), 1);
    // An axis-aligned square should collapse to near its four corners.
    assert!(
        outlines[0].points.len() <= 12,
        "square outline kept {} points after simplification",
        outlines[0].points.len()
    );
}
