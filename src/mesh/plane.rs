//! Oriented planes and polygon splitting, the workhorse of the BSP
//! operations.

use crate::float_types::{EPSILON, Real};
use crate::mesh::polygon::Polygon;
use crate::mesh::vertex::Vertex;
use nalgebra::{Point3, Vector3};

// Classification of geometry relative to a plane. FRONT | BACK == SPANNING.
pub const COPLANAR: i8 = 0;
pub const FRONT: i8 = 1;
pub const BACK: i8 = 2;
pub const SPANNING: i8 = 3;

/// A plane in normal/offset form: `normal · p = w` for points `p` on the
/// plane.
#[derive(Debug, Clone, PartialEq)]
pub struct Plane {
    normal: Vector3<Real>,
    w: Real,
}

impl Plane {
    pub fn from_normal(normal: Vector3<Real>, w: Real) -> Self {
        Plane {
            normal: normal.normalize(),
            w,
        }
    }

    /// Best-fit plane of a closed vertex loop via Newell's method, which
    /// stays stable for near-collinear triplets where a cross product of
    /// the first three vertices would not.
    pub fn from_vertices(vertices: &[Vertex]) -> Self {
        let n = vertices.len();
        if n < 3 {
            return Plane {
                normal: Vector3::z(),
                w: 0.0,
            };
        }

        let mut normal = Vector3::zeros();
        for i in 0..n {
            let a = vertices[i].pos;
            let b = vertices[(i + 1) % n].pos;
            normal.x += (a.y - b.y) * (a.z + b.z);
            normal.y += (a.z - b.z) * (a.x + b.x);
            normal.z += (a.x - b.x) * (a.y + b.y);
        }

        if normal.norm_squared() < EPSILON * EPSILON {
            return Plane {
                normal: Vector3::z(),
                w: 0.0,
            };
        }

        let normal = normal.normalize();
        let w = normal.dot(&vertices[0].pos.coords);
        Plane { normal, w }
    }

    pub const fn normal(&self) -> Vector3<Real> {
        self.normal
    }

    pub const fn offset(&self) -> Real {
        self.w
    }

    pub fn flip(&mut self) {
        self.normal = -self.normal;
        self.w = -self.w;
    }

    /// Classify a point as FRONT, BACK or COPLANAR relative to this plane.
    pub fn orient_point(&self, point: &Point3<Real>) -> i8 {
        let distance = self.normal.dot(&point.coords) - self.w;
        if distance > EPSILON {
            FRONT
        } else if distance < -EPSILON {
            BACK
        } else {
            COPLANAR
        }
    }

    /// Orientation of a coplanar polygon's plane relative to this one.
    pub fn orient_plane(&self, other: &Plane) -> i8 {
        if self.normal.dot(&other.normal) > 0.0 {
            FRONT
        } else {
            BACK
        }
    }

    /// Bitmask classification of a whole polygon.
    pub fn classify_polygon(&self, polygon: &Polygon) -> i8 {
        polygon
            .vertices
            .iter()
            .fold(COPLANAR, |acc, v| acc | self.orient_point(&v.pos))
    }

    /// Split `polygon` by this plane into four buckets:
    /// `(coplanar_front, coplanar_back, front, back)`.
    ///
    /// Spanning polygons gain interpolated vertices on the plane; fragments
    /// with fewer than three vertices are dropped.
    #[allow(clippy::type_complexity)]
    pub fn split_polygon(
        &self,
        polygon: &Polygon,
    ) -> (Vec<Polygon>, Vec<Polygon>, Vec<Polygon>, Vec<Polygon>) {
        let mut coplanar_front = Vec::new();
        let mut coplanar_back = Vec::new();
        let mut front = Vec::new();
        let mut back = Vec::new();

        let types: Vec<i8> = polygon
            .vertices
            .iter()
            .map(|v| self.orient_point(&v.pos))
            .collect();
        let polygon_type = types.iter().fold(COPLANAR, |acc, &t| acc | t);

        match polygon_type {
            COPLANAR => {
                if self.orient_plane(&polygon.plane) == FRONT {
                    coplanar_front.push(polygon.clone());
                } else {
                    coplanar_back.push(polygon.clone());
                }
            },
            FRONT => front.push(polygon.clone()),
            BACK => back.push(polygon.clone()),
            _ => {
                let mut split_front: Vec<Vertex> = Vec::with_capacity(polygon.vertices.len() + 2);
                let mut split_back: Vec<Vertex> = Vec::with_capacity(polygon.vertices.len() + 2);

                for i in 0..polygon.vertices.len() {
                    let j = (i + 1) % polygon.vertices.len();
                    let type_i = types[i];
                    let type_j = types[j];
                    let vertex_i = &polygon.vertices[i];
                    let vertex_j = &polygon.vertices[j];

                    if type_i != BACK {
                        split_front.push(vertex_i.clone());
                    }
                    if type_i != FRONT {
                        split_back.push(vertex_i.clone());
                    }

                    // Edge crosses the plane: interpolate the crossing
                    // vertex and add it to both sides.
                    if (type_i | type_j) == SPANNING {
                        let denom = self.normal.dot(&(vertex_j.pos - vertex_i.pos));
                        if denom.abs() > EPSILON {
                            let t = (self.w - self.normal.dot(&vertex_i.pos.coords)) / denom;
                            let crossing = vertex_i.interpolate(vertex_j, t);
                            split_front.push(crossing.clone());
                            split_back.push(crossing);
                        }
                    }
                }

                if split_front.len() >= 3 {
                    front.push(Polygon::with_plane(split_front, polygon.plane.clone()));
                }
                if split_back.len() >= 3 {
                    back.push(Polygon::with_plane(split_back, polygon.plane.clone()));
                }
            },
        }

        (coplanar_front, coplanar_back, front, back)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square_at_z(z: Real) -> Polygon {
        Polygon::new(vec![
            Vertex::new(Point3::new(0.0, 0.0, z), Vector3::z()),
            Vertex::new(Point3::new(1.0, 0.0, z), Vector3::z()),
            Vertex::new(Point3::new(1.0, 1.0, z), Vector3::z()),
            Vertex::new(Point3::new(0.0, 1.0, z), Vector3::z()),
        ])
    }

    #[test]
    fn newell_plane_of_ccw_square_points_up() {
        let poly = square_at_z(2.0);
        assert!((poly.plane.normal() - Vector3::z()).norm() < 1e-12);
        assert!((poly.plane.offset() - 2.0).abs() < 1e-12);
    }

    #[test]
    fn split_spanning_polygon_produces_both_sides() {
        // Vertical wall crossing the z=0 plane.
        let wall = Polygon::new(vec![
            Vertex::new(Point3::new(0.0, 0.0, -1.0), Vector3::y()),
            Vertex::new(Point3::new(1.0, 0.0, -1.0), Vector3::y()),
            Vertex::new(Point3::new(1.0, 0.0, 1.0), Vector3::y()),
            Vertex::new(Point3::new(0.0, 0.0, 1.0), Vector3::y()),
        ]);
        let plane = Plane::from_normal(Vector3::z(), 0.0);
        let (cf, cb, front, back) = plane.split_polygon(&wall);
        assert!(cf.is_empty() && cb.is_empty());
        assert_eq!(front.len(), 1);
        assert_eq!(back.len(), 1);
        for v in &front[0].vertices {
            assert!(v.pos.z >= -EPSILON);
        }
        for v in &back[0].vertices {
            assert!(v.pos.z <= EPSILON);
        }
    }
}
