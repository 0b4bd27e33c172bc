//! Planar polygons built from [`Vertex`] loops.

use crate::float_types::Real;
use crate::mesh::aabb::Aabb;
use crate::mesh::plane::Plane;
use crate::mesh::vertex::Vertex;
use nalgebra::Point3;

/// A convex planar polygon. Everything the kernel produces is convex:
/// earcut caps are triangles, extruded sides are planar quads, and BSP
/// splitting preserves convexity, so fan triangulation is exact.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    pub vertices: Vec<Vertex>,
    pub plane: Plane,
}

impl Polygon {
    /// Build a polygon, computing its plane from the vertex loop.
    ///
    /// # Panics
    /// If `vertices` has fewer than three entries.
    pub fn new(vertices: Vec<Vertex>) -> Self {
        assert!(vertices.len() >= 3, "degenerate polygon");
        let plane = Plane::from_vertices(&vertices);
        Polygon { vertices, plane }
    }

    /// Build a polygon reusing a known plane (BSP splits keep the parent
    /// plane rather than re-deriving it from split vertices).
    pub fn with_plane(vertices: Vec<Vertex>, plane: Plane) -> Self {
        Polygon { vertices, plane }
    }

    /// Reverse winding, flip vertex normals and the plane.
    pub fn flip(&mut self) {
        self.vertices.reverse();
        for v in &mut self.vertices {
            v.flip();
        }
        self.plane.flip();
    }

    /// Recompute the plane from current vertex positions and assign its
    /// normal to every vertex.
    pub fn set_new_normal(&mut self) {
        self.plane = Plane::from_vertices(&self.vertices);
        let normal = self.plane.normal();
        for v in &mut self.vertices {
            v.normal = normal;
        }
    }

    /// Fan-triangulate into triangles of vertex positions.
    pub fn triangulate(&self) -> Vec<[Point3<Real>; 3]> {
        let mut triangles = Vec::with_capacity(self.vertices.len().saturating_sub(2));
        for i in 1..self.vertices.len() - 1 {
            triangles.push([
                self.vertices[0].pos,
                self.vertices[i].pos,
                self.vertices[i + 1].pos,
            ]);
        }
        triangles
    }

    pub fn bounding_box(&self) -> Aabb {
        Aabb::from_points(self.vertices.iter().map(|v| &v.pos)).unwrap_or_else(Aabb::zero)
    }

    /// Surface area, summed over the fan triangles.
    pub fn area(&self) -> Real {
        self.triangulate()
            .iter()
            .map(|tri| (tri[1] - tri[0]).cross(&(tri[2] - tri[0])).norm() * 0.5)
            .sum()
    }
}
