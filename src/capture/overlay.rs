//! Outline overlay painting, done in-place on the captured frame.

use crate::contour::Outline;
use crate::Frame;
use image::Rgb;

const OUTLINE_COLOR: Rgb<u8> = Rgb([0, 255, 0]);

/// Paint every outline onto the frame as a closed green polyline.
pub fn draw_outlines(frame: &mut Frame, outlines: &[Outline]) {
    for outline in outlines {
        let pts = &outline.points;
        for i in 0..pts.len() {
            let a = pts[i];
            let b = pts[(i + 1) % pts.len()];
            draw_segment(
                frame,
                (a.x.round() as i64, a.y.round() as i64),
                (b.x.round() as i64, b.y.round() as i64),
            );
        }
    }
}

fn put(frame: &mut Frame, x: i64, y: i64) {
    if x >= 0 && y >= 0 && (x as u32) < frame.width() && (y as u32) < frame.height() {
        frame.put_pixel(x as u32, y as u32, OUTLINE_COLOR);
    }
}

// Bresenham, with a one-pixel widening so the outline reads at a glance.
fn draw_segment(frame: &mut Frame, (x0, y0): (i64, i64), (x1, y1): (i64, i64)) {
    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;
    let (mut x, mut y) = (x0, y0);
    loop {
        put(frame, x, y);
        put(frame, x + 1, y);
        put(frame, x, y + 1);
        if x == x1 && y == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            err += dx;
            y += sy;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point2;

    #[test]
    fn paints_closed_ring() {
        let mut frame = Frame::new(32, 32);
        let outline = Outline {
            points: vec![
                Point2::new(4.0, 4.0),
                Point2::new(20.0, 4.0),
                Point2::new(20.0, 20.0),
                Point2::new(4.0, 20.0),
            ],
        };
        draw_outlines(&mut frame, &[outline]);
        // Corners and the closing edge back to the first point are painted.
        assert_eq!(*frame.get_pixel(4, 4), Rgb([0, 255, 0]));
        assert_eq!(*frame.get_pixel(20, 20), Rgb([0, 255, 0]));
        assert_eq!(*frame.get_pixel(4, 12), Rgb([0, 255, 0]));
    }

    #[test]
    fn clips_points_outside_frame() {
        let mut frame = Frame::new(8, 8);
        let outline = Outline {
            points: vec![
                Point2::new(-5.0, 2.0),
                Point2::new(12.0, 2.0),
                Point2::new(4.0, 14.0),
            ],
        };
        draw_outlines(&mut frame, &[outline]);
        assert_eq!(*frame.get_pixel(3, 2), Rgb([0, 255, 0]));
    }
}
