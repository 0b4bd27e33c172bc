//! Model preview: load the interchange STL, frame it, and spin it.
//!
//! The math lives here so it can be tested headless; the windowed
//! renderer in [`viewer`] is a thin consumer behind the `viewer` feature.

#[cfg(feature = "viewer")]
pub mod viewer;

#[cfg(feature = "stl-io")]
use crate::errors::PreviewError;
use crate::float_types::Real;
use crate::mesh::Mesh;
use nalgebra::{Matrix4, Point3, Vector3};
#[cfg(feature = "stl-io")]
use std::path::Path;
use std::time::Duration;

/// Degrees of model spin per second, one full turn every six seconds.
pub const ROTATION_DEG_PER_SEC: Real = 60.0;
/// Camera elevation above the model's equator.
pub const ELEVATION_DEG: Real = 45.0;
/// Preview window size in logical pixels.
pub const WINDOW_SIZE: (u32, u32) = (800, 800);
/// Preview window top-left corner, clear of the capture overlay at the origin.
pub const WINDOW_OFFSET: (i32, i32) = (700, 100);

/// Read the interchange file and recenter the model on the origin.
///
/// An empty or unreadable model is a hard error; the preview process has
/// nothing else to show.
#[cfg(feature = "stl-io")]
pub fn load_model(path: &Path) -> Result<Mesh, PreviewError> {
    let bytes = std::fs::read(path).map_err(|e| PreviewError::Load {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    let mesh = Mesh::from_stl(&bytes).map_err(|e| PreviewError::Load {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    if mesh.is_empty() {
        return Err(PreviewError::EmptyModel {
            path: path.to_path_buf(),
        });
    }
    Ok(mesh.center())
}

/// Camera distance that keeps the whole model in frame: twice the
/// largest bounding-box extent. Models under half a unit across hit the
/// 1.0 floor instead, so a near-degenerate solid still renders at a
/// usable distance.
pub fn fit_distance(mesh: &Mesh) -> Real {
    let extent = mesh.bounding_box().max_extent();
    (2.0 * extent).max(1.0)
}

/// Spin angle in degrees for a given wall-clock time since preview start.
pub fn spin_angle(elapsed: Duration) -> Real {
    (elapsed.as_secs_f64() * ROTATION_DEG_PER_SEC) % 360.0
}

/// Model matrix for the given spin angle about the vertical axis.
pub fn spin_transform(angle_deg: Real) -> Matrix4<Real> {
    Matrix4::from_axis_angle(&Vector3::z_axis(), angle_deg.to_radians())
}

/// View matrix: camera orbit-locked at [`ELEVATION_DEG`] above the
/// horizon, looking at the origin from `distance` away.
pub fn view_matrix(distance: Real) -> Matrix4<Real> {
    let elev = ELEVATION_DEG.to_radians();
    let eye = Point3::new(0.0, -distance * elev.cos(), distance * elev.sin());
    Matrix4::look_at_rh(&eye, &Point3::origin(), &Vector3::z())
}

/// Perspective projection sized for the preview window.
pub fn projection_matrix(aspect: Real, distance: Real) -> Matrix4<Real> {
    let near = (distance * 0.01).max(0.01);
    let far = distance * 10.0;
    Matrix4::new_perspective(aspect, 45.0_f64.to_radians(), near, far)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spin_completes_one_turn_in_six_seconds() {
        assert!(spin_angle(Duration::from_secs(6)) < 1e-9);
        assert!((spin_angle(Duration::from_secs(3)) - 180.0).abs() < 1e-9);
    }

    #[test]
    fn spin_transform_preserves_vertical_axis() {
        let m = spin_transform(123.0);
        let z = m.transform_vector(&Vector3::z());
        assert!((z - Vector3::z()).norm() < 1e-12);
    }

    #[test]
    fn view_matrix_keeps_origin_ahead_of_camera() {
        let v = view_matrix(20.0);
        let origin = v.transform_point(&Point3::origin());
        // Right-handed view space looks down -Z.
        assert!(origin.z < 0.0);
        assert!((origin.coords.norm() - 20.0).abs() < 1e-9);
    }
}
