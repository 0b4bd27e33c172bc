//! Contour extraction: one raster frame in, simplified closed outlines out.
//!
//! Pure and stateless: grayscale → Gaussian blur → Sobel edge map → fixed
//! threshold → traced contours → external-only, area-filtered, simplified
//! polygons in pixel space.

use crate::Frame;
use crate::float_types::Real;
use geo::{LineString, Simplify, coord};
use image::GrayImage;
use nalgebra::Point2;

/// Tunables for the extraction pipeline. Defaults match the live capture
/// setup; there is no runtime configuration surface.
#[derive(Debug, Clone)]
pub struct ContourConfig {
    /// Minimum enclosed area in pixel² for an outline to survive.
    pub min_area: Real,
    /// Sigma of the pre-smoothing Gaussian blur.
    pub blur_sigma: f32,
    /// Binarization threshold applied to the Sobel gradient magnitude.
    pub edge_threshold: u8,
    /// Simplification tolerance as a fraction of contour perimeter.
    pub simplify_ratio: Real,
}

impl Default for ContourConfig {
    fn default() -> Self {
        ContourConfig {
            min_area: 1000.0,
            blur_sigma: 1.4,
            edge_threshold: 80,
            simplify_ratio: 0.02,
        }
    }
}

/// A closed polygon in pixel space; the last point connects back to the
/// first implicitly. Guaranteed ≥3 vertices and area ≥ `min_area` when
/// produced by [`extract_outlines`].
#[derive(Debug, Clone, PartialEq)]
pub struct Outline {
    pub points: Vec<Point2<Real>>,
}

impl Outline {
    pub fn new(points: Vec<Point2<Real>>) -> Self {
        Outline { points }
    }

    /// Enclosed area by the shoelace formula (unsigned).
    pub fn area(&self) -> Real {
        shoelace(&self.points).abs()
    }

    /// Closed-loop perimeter.
    pub fn perimeter(&self) -> Real {
        let n = self.points.len();
        (0..n)
            .map(|i| (self.points[(i + 1) % n] - self.points[i]).norm())
            .sum()
    }

    /// Ray-casting point containment test, used to reject hole boundaries.
    fn contains(&self, p: &Point2<Real>) -> bool {
        let n = self.points.len();
        let mut inside = false;
        let mut j = n - 1;
        for i in 0..n {
            let a = self.points[i];
            let b = self.points[j];
            if (a.y > p.y) != (b.y > p.y)
                && p.x < (b.x - a.x) * (p.y - a.y) / (b.y - a.y) + a.x
            {
                inside = !inside;
            }
            j = i;
        }
        inside
    }
}

/// Absolute Ramer-Douglas-Peucker tolerance for a contour of the given
/// perimeter: it scales linearly, so noisy boundaries of any size collapse
/// to a comparable vertex count.
pub fn simplify_tolerance(perimeter: Real, ratio: Real) -> Real {
    ratio * perimeter
}

/// Detect closed polygonal shapes in `frame`.
///
/// Holes inside shapes are ignored: only outermost boundaries are kept,
/// selected by a containment test against every other traced contour.
/// Output may be empty; no other failure mode exists.
pub fn extract_outlines(frame: &Frame, config: &ContourConfig) -> Vec<Outline> {
    let gray = image::imageops::grayscale(frame);
    let blurred = image::imageops::blur(&gray, config.blur_sigma);
    let edges = sobel_magnitude(&blurred);
    let bits = binarize(&edges, config.edge_threshold);

    let svg_path = contour_tracing::array::bits_to_paths(bits, true);
    let raw: Vec<Outline> = parse_path_into_polylines(&svg_path)
        .into_iter()
        .filter(|pl| pl.len() >= 3)
        .map(|pl| Outline::new(pl.into_iter().map(|(x, y)| Point2::new(x, y)).collect()))
        .filter(|outline| outline.area() >= config.min_area)
        .collect();

    raw.iter()
        .enumerate()
        .filter(|(i, outline)| is_external(outline, *i, &raw))
        .filter_map(|(_, outline)| simplify_outline(outline, config))
        .collect()
}

/// True if no other traced contour encloses this one. Nested boundaries
/// (holes, shapes inside holes) are discarded.
fn is_external(outline: &Outline, index: usize, all: &[Outline]) -> bool {
    let probe = outline.points[0];
    all.iter()
        .enumerate()
        .filter(|(j, _)| *j != index)
        .all(|(_, other)| !other.contains(&probe))
}

fn simplify_outline(outline: &Outline, config: &ContourConfig) -> Option<Outline> {
    let tolerance = simplify_tolerance(outline.perimeter(), config.simplify_ratio);

    // Close the ring explicitly so simplification preserves the loop.
    let mut coords: Vec<_> = outline
        .points
        .iter()
        .map(|p| coord! { x: p.x, y: p.y })
        .collect();
    coords.push(coords[0]);

    let simplified = LineString::new(coords).simplify(&tolerance);
    let mut points: Vec<Point2<Real>> = simplified
        .0
        .iter()
        .map(|c| Point2::new(c.x, c.y))
        .collect();
    // drop duplicated closing points
    while points.len() >= 2 && points.first() == points.last() {
        points.pop();
    }

    (points.len() >= 3).then(|| Outline::new(points))
}

/// Gradient magnitude of the Sobel operator. `filter3x3` on `Luma<u8>`
/// clamps negative responses to zero, so the two kernels are applied by
/// hand in signed arithmetic.
fn sobel_magnitude(img: &GrayImage) -> GrayImage {
    let (width, height) = img.dimensions();
    let mut out = GrayImage::new(width, height);
    if width < 3 || height < 3 {
        return out;
    }

    for y in 1..height - 1 {
        for x in 1..width - 1 {
            let px = |dx: i32, dy: i32| -> i32 {
                img.get_pixel((x as i32 + dx) as u32, (y as i32 + dy) as u32)[0] as i32
            };
            let gx = -px(-1, -1) - 2 * px(-1, 0) - px(-1, 1)
                + px(1, -1)
                + 2 * px(1, 0)
                + px(1, 1);
            let gy = -px(-1, -1) - 2 * px(0, -1) - px(1, -1)
                + px(-1, 1)
                + 2 * px(0, 1)
                + px(1, 1);
            let mag = (((gx * gx + gy * gy) as f64).sqrt()).min(255.0) as u8;
            out.put_pixel(x, y, image::Luma([mag]));
        }
    }
    out
}

/// Threshold the edge map into the bit matrix `contour_tracing` expects.
fn binarize(img: &GrayImage, threshold: u8) -> Vec<Vec<i8>> {
    let (width, height) = img.dimensions();
    let mut bits = Vec::with_capacity(height as usize);
    for y in 0..height {
        let mut row = Vec::with_capacity(width as usize);
        for x in 0..width {
            row.push((img.get_pixel(x, y)[0] >= threshold) as i8);
        }
        bits.push(row);
    }
    bits
}

/// Parse the minimal SVG subset `bits_to_paths` emits (absolute M/H/V plus
/// Z) into closed polylines.
fn parse_path_into_polylines(path: &str) -> Vec<Vec<(Real, Real)>> {
    let mut polylines = Vec::new();
    let mut current: Vec<(Real, Real)> = Vec::new();
    let (mut x, mut y) = (0.0, 0.0);
    let mut chars = path.chars().peekable();

    fn read_number(chars: &mut std::iter::Peekable<std::str::Chars>) -> Option<Real> {
        while chars.peek().is_some_and(|c| c.is_whitespace()) {
            chars.next();
        }
        let mut buf = String::new();
        while let Some(&c) = chars.peek() {
            if c.is_ascii_digit() || c == '.' || c == '-' {
                buf.push(c);
                chars.next();
            } else {
                break;
            }
        }
        buf.parse().ok()
    }

    while let Some(command) = chars.next() {
        match command {
            'M' | 'm' => {
                if !current.is_empty() {
                    polylines.push(std::mem::take(&mut current));
                }
                x = read_number(&mut chars).unwrap_or(x);
                y = read_number(&mut chars).unwrap_or(y);
                current.push((x, y));
            },
            'H' | 'h' => {
                x = read_number(&mut chars).unwrap_or(x);
                current.push((x, y));
            },
            'V' | 'v' => {
                y = read_number(&mut chars).unwrap_or(y);
                current.push((x, y));
            },
            'Z' | 'z' => {
                if !current.is_empty() {
                    polylines.push(std::mem::take(&mut current));
                }
            },
            _ => {},
        }
    }
    if !current.is_empty() {
        polylines.push(current);
    }
    polylines
}

fn shoelace(points: &[Point2<Real>]) -> Real {
    let n = points.len();
    let mut sum = 0.0;
    for i in 0..n {
        let a = points[i];
        let b = points[(i + 1) % n];
        sum += a.x * b.y - b.x * a.y;
    }
    sum * 0.5
}
