//! Shared helpers for the integration tests.

#![allow(dead_code)]

use contourcast::contour::Outline;
use contourcast::float_types::Real;
use contourcast::mesh::Mesh;
use contourcast::Frame;
use image::Rgb;
use nalgebra::Point2;

/// Compare floats with an explicit tolerance.
pub fn approx_eq(a: Real, b: Real, eps: Real) -> bool {
    (a - b).abs() < eps
}

/// Bounding box `[min_x, min_y, min_z, max_x, max_y, max_z]` of a mesh.
pub fn bounding_box(mesh: &Mesh) -> [Real; 6] {
    let bb = mesh.bounding_box();
    [
        bb.mins.x, bb.mins.y, bb.mins.z, bb.maxs.x, bb.maxs.y, bb.maxs.z,
    ]
}

/// An axis-aligned rectangular outline in pixel coordinates.
pub fn rect_outline(x0: Real, y0: Real, w: Real, h: Real) -> Outline {
    Outline {
        points: vec![
            Point2::new(x0, y0),
            Point2::new(x0 + w, y0),
            Point2::new(x0 + w, y0 + h),
            Point2::new(x0, y0 + h),
        ],
    }
}

/// Black frame with one or more filled white rectangles, the synthetic
/// stand-in for a camera pointed at bright shapes.
pub fn frame_with_rects(width: u32, height: u32, rects: &[(u32, u32, u32, u32)]) -> Frame {
    let mut frame = Frame::from_pixel(width, height, Rgb([0, 0, 0]));
    for &(x0, y0, w, h) in rects {
        for y in y0..(y0 + h).min(height) {
            for x in x0..(x0 + w).min(width) {
                frame.put_pixel(x, y, Rgb([255, 255, 255]));
            }
        }
    }
    frame
}
