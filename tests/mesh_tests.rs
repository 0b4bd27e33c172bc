mod support;

use contourcast::build::{build_model, BuildConfig};
use contourcast::mesh::Mesh;
use support::{approx_eq, bounding_box, rect_outline};

fn unit_prism() -> Mesh {
    build_model(&[rect_outline(0.0, 0.0, 100.0, 100.0)], &BuildConfig::default()).unwrap()
}

#[test]
fn union_with_empty_is_identity() {
    let prism = unit_prism();
    let glued = prism.union(&Mesh::new());
    assert!(approx_eq(glued.volume(), prism.volume(), 1e-9));

    let glued = Mesh::new().union(&prism);
    assert!(approx_eq(glued.volume(), prism.volume(), 1e-9));
}

#[test]
fn translate_moves_the_bounding_box() {
    let moved = unit_prism().translate(5.0, -2.0, 1.0);
    let bb = bounding_box(&moved);
    assert!(approx_eq(bb[0], 5.0, 1e-9));
    assert!(approx_eq(bb[1], -2.0, 1e-9));
    assert!(approx_eq(bb[2], 1.0, 1e-9));
    assert!(approx_eq(moved.volume(), 1000.0, 1e-6));
}

#[test]
fn rotation_preserves_volume() {
    let spun = unit_prism().rotate_z(37.0);
    assert!(
        approx_eq(spun.volume(), 1000.0, 1e-6),
        "rotation changed volume to {}",
        spun.volume()
    );
}

#[test]
fn center_puts_the_bounding_box_around_the_origin() {
    let centered = unit_prism().center();
    let bb = bounding_box(&centered);
    assert!(approx_eq(bb[0], -bb[3], 1e-9), "x extents not symmetric");
    assert!(approx_eq(bb[1], -bb[4], 1e-9), "y extents not symmetric");
    assert!(approx_eq(bb[2], -bb[5], 1e-9), "z extents not symmetric");
}

#[test]
fn every_facet_normal_points_away_from_the_solid() {
    // For a convex solid centered at the origin, each outward normal has
    // a positive dot product with the vector from center to the facet.
    let centered = unit_prism().center();
    for poly in &centered.polygons {
        let n = poly.plane.normal();
        let c = poly
            .vertices
            .iter()
            .fold(nalgebra::Vector3::zeros(), |acc, v| acc + v.pos.coords)
            / poly.vertices.len() as f64;
        assert!(
            n.dot(&c) > 0.0,
            "facet at {c:?} has an inward-facing normal {n:?}"
        );
    }
}

#[test]
fn stl_binary_round_trip_preserves_shape() {
    let prism = unit_prism();
    let bytes = prism.to_stl_binary("prism").unwrap();
    let back = Mesh::from_stl(&bytes).unwrap();

    assert!(approx_eq(back.volume(), prism.volume(), 1e-2));
    let (a, b) = (bounding_box(&prism), bounding_box(&back));
    for i in 0..6 {
        assert!(approx_eq(a[i], b[i], 1e-3), "bbox component {i} differs");
    }
}

#[test]
fn stl_ascii_mentions_every_facet() {
    let prism = unit_prism();
    let ascii = prism.to_stl_ascii("prism");
    assert!(ascii.starts_with("solid prism"));
    assert!(ascii.trim_end().ends_with("endsolid prism"));
    assert_eq!(
        ascii.matches("facet normal").count(),
        prism.triangles().len()
    );
}
