//! Scaled 2-D profiles and their linear extrusion into solids.

use crate::contour::Outline;
use crate::errors::GeometryError;
use crate::float_types::{EPSILON, Real};
use crate::mesh::Mesh;
use crate::mesh::polygon::Polygon;
use crate::mesh::vertex::Vertex;
use geo::{Coord, LineString, Polygon as GeoPolygon, TriangulateEarcut};
use nalgebra::{Point2, Point3, Vector3};

/// A simple (non-self-intersecting) closed profile in physical units,
/// normalized to counter-clockwise winding. The only way to obtain one is
/// [`Profile::from_outline`], so extrusion can assume validity.
#[derive(Debug, Clone)]
pub struct Profile {
    ring: Vec<Point2<Real>>,
}

impl Profile {
    /// Scale a pixel-space outline by `scale` and validate it as an
    /// extrudable profile. Fails fast on anything that would make the
    /// extrusion non-manifold.
    pub fn from_outline(outline: &Outline, scale: Real) -> Result<Self, GeometryError> {
        let mut ring: Vec<Point2<Real>> = Vec::with_capacity(outline.points.len());
        for p in &outline.points {
            let scaled = Point2::new(p.x * scale, p.y * scale);
            // collapse consecutive duplicates introduced by scaling
            if ring
                .last()
                .is_none_or(|prev: &Point2<Real>| (scaled - prev).norm() > EPSILON)
            {
                ring.push(scaled);
            }
        }
        if ring.len() > 1 && (ring[0] - ring[ring.len() - 1]).norm() <= EPSILON {
            ring.pop();
        }

        if ring.len() < 3 {
            return Err(GeometryError::TooFewPoints { count: ring.len() });
        }

        let area = signed_area(&ring);
        if area.abs() < EPSILON {
            return Err(GeometryError::Degenerate);
        }
        // normalize to CCW so cap and side windings are predictable
        if area < 0.0 {
            ring.reverse();
        }

        if let Some(p) = first_self_intersection(&ring) {
            return Err(GeometryError::SelfIntersection { x: p.x, y: p.y });
        }

        Ok(Profile { ring })
    }

    pub fn points(&self) -> &[Point2<Real>] {
        &self.ring
    }

    pub fn area(&self) -> Real {
        signed_area(&self.ring).abs()
    }

    /// Linearly extrude the profile along +Z by `thickness`, producing a
    /// closed solid: earcut-triangulated bottom and top caps plus one quad
    /// per ring edge.
    pub fn extrude(&self, thickness: Real) -> Mesh {
        if thickness.abs() < EPSILON {
            return Mesh::new();
        }

        let exterior: LineString<Real> = self
            .ring
            .iter()
            .map(|p| Coord { x: p.x, y: p.y })
            .collect();
        let polygon = GeoPolygon::new(exterior, vec![]);

        let triangulation = polygon.earcut_triangles_raw();
        let verts = &triangulation.vertices;
        let mut out: Vec<Polygon> = Vec::new();

        for tri in triangulation.triangle_indices.chunks_exact(3) {
            let pts = [
                Point2::new(verts[2 * tri[0]], verts[2 * tri[0] + 1]),
                Point2::new(verts[2 * tri[1]], verts[2 * tri[1] + 1]),
                Point2::new(verts[2 * tri[2]], verts[2 * tri[2] + 1]),
            ];
            out.push(cap_triangle(&pts, 0.0, false));
            out.push(cap_triangle(&pts, thickness, true));
        }

        // side quads; winding b_i -> b_j -> t_j -> t_i faces outward for a
        // CCW ring
        let n = self.ring.len();
        for i in 0..n {
            let a = self.ring[i];
            let b = self.ring[(i + 1) % n];
            let edge = b - a;
            if edge.norm() <= EPSILON {
                continue;
            }
            let normal = Vector3::new(edge.x, edge.y, 0.0)
                .cross(&Vector3::z())
                .normalize();
            let b_i = Point3::new(a.x, a.y, 0.0);
            let b_j = Point3::new(b.x, b.y, 0.0);
            let t_j = Point3::new(b.x, b.y, thickness);
            let t_i = Point3::new(a.x, a.y, thickness);
            out.push(Polygon::new(vec![
                Vertex::new(b_i, normal),
                Vertex::new(b_j, normal),
                Vertex::new(t_j, normal),
                Vertex::new(t_i, normal),
            ]));
        }

        Mesh::from_polygons(out)
    }
}

/// Build one cap triangle at height `z`, wound so its normal points along
/// -Z (`upward == false`, bottom cap) or +Z (top cap).
fn cap_triangle(pts: &[Point2<Real>; 3], z: Real, upward: bool) -> Polygon {
    let cross = (pts[1] - pts[0]).perp(&(pts[2] - pts[0]));
    let ccw = cross > 0.0;
    // CCW in the plane gives a +Z normal; flip the order when that is not
    // what this cap needs.
    let order: [usize; 3] = if ccw == upward { [0, 1, 2] } else { [0, 2, 1] };
    let normal = if upward { Vector3::z() } else { -Vector3::z() };
    Polygon::new(
        order
            .iter()
            .map(|&i| Vertex::new(Point3::new(pts[i].x, pts[i].y, z), normal))
            .collect(),
    )
}

fn signed_area(ring: &[Point2<Real>]) -> Real {
    let n = ring.len();
    let mut sum = 0.0;
    for i in 0..n {
        let a = ring[i];
        let b = ring[(i + 1) % n];
        sum += a.x * b.y - b.x * a.y;
    }
    sum * 0.5
}

/// First proper crossing between two non-adjacent ring edges, if any.
fn first_self_intersection(ring: &[Point2<Real>]) -> Option<Point2<Real>> {
    let n = ring.len();
    for i in 0..n {
        for j in i + 1..n {
            // skip adjacent edges (they share an endpoint by construction)
            if j == i || (j + 1) % n == i || (i + 1) % n == j {
                continue;
            }
            let (a1, a2) = (ring[i], ring[(i + 1) % n]);
            let (b1, b2) = (ring[j], ring[(j + 1) % n]);
            if let Some(p) = segment_crossing(a1, a2, b1, b2) {
                return Some(p);
            }
        }
    }
    None
}

fn segment_crossing(
    a1: Point2<Real>,
    a2: Point2<Real>,
    b1: Point2<Real>,
    b2: Point2<Real>,
) -> Option<Point2<Real>> {
    let d1 = a2 - a1;
    let d2 = b2 - b1;
    let denom = d1.perp(&d2);
    if denom.abs() < EPSILON {
        return None; // parallel or collinear
    }
    let t = (b1 - a1).perp(&d2) / denom;
    let u = (b1 - a1).perp(&d1) / denom;
    let strict = EPSILON..=(1.0 - EPSILON);
    (strict.contains(&t) && strict.contains(&u)).then(|| a1 + d1 * t)
}
