//! Solid kernel: the [`Mesh`] type and its boolean/affine operations.

use crate::float_types::{EPSILON, Real};
use crate::mesh::aabb::Aabb;
use crate::mesh::bsp::Node;
use crate::mesh::plane::Plane;
use crate::mesh::polygon::Polygon;
use crate::mesh::vertex::Vertex;
use nalgebra::{Matrix4, Point3, Rotation3, Translation3, Vector3};
use std::sync::OnceLock;

pub mod aabb;
pub mod bsp;
pub mod plane;
pub mod polygon;
pub mod vertex;

/// A 3-D solid represented as a polygon soup with outward normals.
#[derive(Debug, Clone)]
pub struct Mesh {
    pub polygons: Vec<Polygon>,

    /// Lazily calculated AABB spanning `polygons`.
    bounding_box: OnceLock<Aabb>,
}

impl Mesh {
    pub fn new() -> Self {
        Mesh {
            polygons: Vec::new(),
            bounding_box: OnceLock::new(),
        }
    }

    pub fn from_polygons(polygons: Vec<Polygon>) -> Self {
        Mesh {
            polygons,
            bounding_box: OnceLock::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.polygons.is_empty()
    }

    /// Split polygons into (may_touch, cannot_touch) via bounding-box tests,
    /// so union only runs BSP clipping on faces that can interact.
    fn partition_polys(polys: &[Polygon], other_bb: &Aabb) -> (Vec<Polygon>, Vec<Polygon>) {
        let mut maybe = Vec::new();
        let mut never = Vec::new();
        for p in polys {
            if p.bounding_box().intersects(other_bb) {
                maybe.push(p.clone());
            } else {
                never.push(p.clone());
            }
        }
        (maybe, never)
    }

    /// Boolean union of two solids. Associative and commutative up to
    /// polygon splitting, so sequential folding over a snapshot is fine.
    pub fn union(&self, other: &Mesh) -> Mesh {
        if self.is_empty() {
            return other.clone();
        }
        if other.is_empty() {
            return self.clone();
        }

        let (a_clip, a_passthru) = Self::partition_polys(&self.polygons, &other.bounding_box());
        let (b_clip, b_passthru) = Self::partition_polys(&other.polygons, &self.bounding_box());

        let mut a = Node::from_polygons(&a_clip);
        let mut b = Node::from_polygons(&b_clip);

        a.clip_to(&b);
        b.clip_to(&a);
        b.invert();
        b.clip_to(&a);
        b.invert();
        a.build(&b.all_polygons());

        let mut final_polys = a.all_polygons();
        final_polys.extend(a_passthru);
        final_polys.extend(b_passthru);

        Mesh::from_polygons(final_polys)
    }

    /// Apply an arbitrary affine transform. Normals use the
    /// inverse-transpose so shears and non-uniform scales stay correct.
    pub fn transform(&self, mat: &Matrix4<Real>) -> Mesh {
        let Some(inv) = mat.try_inverse() else {
            // Singular transforms would flatten the solid; refuse silently
            // and keep the mesh as-is.
            return self.clone();
        };
        let normal_mat = inv.transpose();

        let mut mesh = self.clone();
        for poly in &mut mesh.polygons {
            for vert in &mut poly.vertices {
                let homog = mat * vert.pos.to_homogeneous();
                if let Some(p) = Point3::from_homogeneous(homog) {
                    vert.pos = p;
                }
                let n = normal_mat.transform_vector(&vert.normal);
                if n.norm_squared() > EPSILON * EPSILON {
                    vert.normal = n.normalize();
                }
            }
            // keep the cached plane consistent with the new positions
            poly.plane = Plane::from_vertices(&poly.vertices);
        }
        mesh.bounding_box = OnceLock::new();
        mesh
    }

    pub fn translate(&self, x: Real, y: Real, z: Real) -> Mesh {
        self.transform(&Translation3::new(x, y, z).to_homogeneous())
    }

    /// Rotate about +Z by `degrees`.
    pub fn rotate_z(&self, degrees: Real) -> Mesh {
        let rot = Rotation3::from_axis_angle(&Vector3::z_axis(), degrees.to_radians());
        self.transform(&rot.to_homogeneous())
    }

    /// Translate so the bounding-box center lands at the origin.
    pub fn center(&self) -> Mesh {
        let c = self.bounding_box().center();
        self.translate(-c.x, -c.y, -c.z)
    }

    pub fn bounding_box(&self) -> Aabb {
        *self.bounding_box.get_or_init(|| {
            Aabb::from_points(self.polygons.iter().flat_map(|p| p.vertices.iter().map(|v| &v.pos)))
                .unwrap_or_else(Aabb::zero)
        })
    }

    /// Triangles of the whole mesh, fan-triangulated per polygon.
    pub fn triangles(&self) -> Vec<[Point3<Real>; 3]> {
        self.polygons.iter().flat_map(|p| p.triangulate()).collect()
    }

    /// Enclosed volume via the divergence theorem. Assumes a closed mesh
    /// with outward normals.
    pub fn volume(&self) -> Real {
        let mut total: Real = 0.0;
        for tri in self.triangles() {
            let cross = (tri[1] - tri[0]).cross(&(tri[2] - tri[0]));
            let area = cross.norm() * 0.5;
            if area > EPSILON {
                let normal = cross.normalize();
                let centroid = (tri[0].coords + tri[1].coords + tri[2].coords) / 3.0;
                total += centroid.dot(&normal) * area / 3.0;
            }
        }
        total.abs()
    }

    /// Re-derive every polygon's plane and vertex normals from positions.
    pub fn renormalize(&mut self) {
        for poly in &mut self.polygons {
            poly.set_new_normal();
        }
        self.bounding_box = OnceLock::new();
    }

    /// All vertices of the mesh.
    pub fn vertices(&self) -> Vec<Vertex> {
        self.polygons
            .iter()
            .flat_map(|p| p.vertices.clone())
            .collect()
    }
}

impl Default for Mesh {
    fn default() -> Self {
        Self::new()
    }
}
