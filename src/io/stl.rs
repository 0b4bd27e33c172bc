//! STL interchange: the only channel between the solid builder and the
//! preview renderer.

use crate::float_types::Real;
use crate::mesh::Mesh;
use crate::mesh::polygon::Polygon;
use crate::mesh::vertex::Vertex;
use nalgebra::{Point3, Vector3};
use std::io::Cursor;

impl Mesh {
    /// Serialize to an ASCII STL string with the given solid `name`.
    pub fn to_stl_ascii(&self, name: &str) -> String {
        let mut out = String::new();
        out.push_str(&format!("solid {name}\n"));

        for poly in &self.polygons {
            let n = poly.plane.normal();
            for tri in poly.triangulate() {
                out.push_str(&format!(
                    "  facet normal {:.6} {:.6} {:.6}\n",
                    n.x, n.y, n.z
                ));
                out.push_str("    outer loop\n");
                for p in &tri {
                    out.push_str(&format!(
                        "      vertex {:.6} {:.6} {:.6}\n",
                        p.x, p.y, p.z
                    ));
                }
                out.push_str("    endloop\n");
                out.push_str("  endfacet\n");
            }
        }

        out.push_str(&format!("endsolid {name}\n"));
        out
    }

    /// Serialize to a binary STL byte vector. The bytes are assembled
    /// fully in memory so callers can make file replacement all-or-nothing.
    pub fn to_stl_binary(&self, _name: &str) -> std::io::Result<Vec<u8>> {
        use stl_io::{Normal, Triangle, Vertex as StlVertex, write_stl};

        let mut triangles = Vec::<Triangle>::new();
        for poly in &self.polygons {
            let n = poly.plane.normal();
            for tri in poly.triangulate() {
                triangles.push(Triangle {
                    normal: Normal::new([n.x as f32, n.y as f32, n.z as f32]),
                    vertices: tri
                        .map(|p| StlVertex::new([p.x as f32, p.y as f32, p.z as f32])),
                });
            }
        }

        let mut cursor = Cursor::new(Vec::new());
        write_stl(&mut cursor, triangles.iter())?;
        Ok(cursor.into_inner())
    }

    /// Parse a binary or ASCII STL byte slice into a triangle mesh.
    /// Stored facet normals are ignored; planes and normals are re-derived
    /// from vertex positions so imports from other tools stay consistent.
    pub fn from_stl(stl_data: &[u8]) -> std::io::Result<Mesh> {
        let mut cursor = Cursor::new(stl_data);
        let indexed = stl_io::read_stl(&mut cursor)?;

        let polygons: Vec<Polygon> = indexed
            .faces
            .iter()
            .filter_map(|face| {
                let pts: Vec<Point3<Real>> = face
                    .vertices
                    .iter()
                    .map(|&i| {
                        let v = indexed.vertices[i];
                        Point3::new(v[0] as Real, v[1] as Real, v[2] as Real)
                    })
                    .collect();
                // reject degenerate facets instead of panicking on them
                (pts.len() == 3 && (pts[1] - pts[0]).cross(&(pts[2] - pts[0])).norm() > 0.0)
                    .then(|| {
                        let mut poly = Polygon::new(
                            pts.into_iter().map(|p| Vertex::new(p, Vector3::z())).collect(),
                        );
                        poly.set_new_normal();
                        poly
                    })
            })
            .collect();

        Ok(Mesh::from_polygons(polygons))
    }
}

#[cfg(test)]
mod tests {
    use crate::contour::Outline;
    use crate::mesh::Mesh;
    use crate::sketch::Profile;
    use nalgebra::Point2;

    fn block() -> Mesh {
        let square = Outline::new(vec![
            Point2::new(0.0, 0.0),
            Point2::new(4.0, 0.0),
            Point2::new(4.0, 4.0),
            Point2::new(0.0, 4.0),
        ]);
        Profile::from_outline(&square, 1.0)
            .expect("simple square")
            .extrude(2.0)
    }

    #[test]
    fn ascii_export_has_expected_framing() {
        let stl = block().to_stl_ascii("block");
        assert!(stl.starts_with("solid block"));
        assert!(stl.trim_end().ends_with("endsolid block"));
        assert!(stl.contains("facet normal"));
    }

    #[test]
    fn binary_round_trip_preserves_volume() {
        let mesh = block();
        let bytes = mesh.to_stl_binary("block").expect("serialize");
        let back = Mesh::from_stl(&bytes).expect("parse");
        assert!((mesh.volume() - back.volume()).abs() < 1e-3);
        assert_eq!(back.polygons.len(), mesh.triangles().len());
    }
}
