//! Solid builder: outlines from one snapshot in, one unioned solid out,
//! serialized wholesale to the interchange file.

use crate::contour::Outline;
use crate::errors::BuildError;
use crate::float_types::Real;
use crate::mesh::Mesh;
use crate::sketch::Profile;
use std::path::PathBuf;

/// Fixed defaults of the snapshot pipeline; overridable only in code.
#[derive(Debug, Clone)]
pub struct BuildConfig {
    /// Pixel → physical-unit factor applied before extrusion.
    pub scale: Real,
    /// Extrusion height in physical units.
    pub thickness: Real,
    /// Interchange file written on success, untouched on any failure.
    pub model_path: PathBuf,
}

impl Default for BuildConfig {
    fn default() -> Self {
        BuildConfig {
            scale: 0.1,
            thickness: 10.0,
            model_path: PathBuf::from("live_model.stl"),
        }
    }
}

/// Summary of a successful build, for operator feedback.
#[derive(Debug, Clone)]
pub struct BuildReport {
    pub solids: usize,
    pub triangles: usize,
    pub path: PathBuf,
}

/// Extrude and union one snapshot's outlines into a single solid.
///
/// Fail-fast: the first malformed profile aborts the whole batch with a
/// [`GeometryError`](crate::errors::GeometryError); an empty input reports
/// [`BuildError::NoShapes`]. Union order does not affect the result.
pub fn build_model(outlines: &[Outline], config: &BuildConfig) -> Result<Mesh, BuildError> {
    if outlines.is_empty() {
        return Err(BuildError::NoShapes);
    }

    let mut combined = Mesh::new();
    for outline in outlines {
        let profile = Profile::from_outline(outline, config.scale)?;
        let solid = profile.extrude(config.thickness);
        combined = combined.union(&solid);
    }
    Ok(combined)
}

/// Build and export one snapshot. All geometry and the full STL byte
/// buffer are produced before the filesystem is touched, so a failure
/// leaves any prior interchange file byte-identical.
#[cfg(feature = "stl-io")]
pub fn build_and_export(
    outlines: &[Outline],
    config: &BuildConfig,
) -> Result<BuildReport, BuildError> {
    let combined = build_model(outlines, config)?;
    let bytes = combined.to_stl_binary("live_model")?;
    std::fs::write(&config.model_path, bytes)?;

    let report = BuildReport {
        solids: outlines.len(),
        triangles: combined.triangles().len(),
        path: config.model_path.clone(),
    };
    tracing::info!(
        solids = report.solids,
        triangles = report.triangles,
        path = %report.path.display(),
        "exported combined model"
    );
    Ok(report)
}

/// Convenience for callers that already hold a path.
#[cfg(feature = "stl-io")]
pub fn export_model(mesh: &Mesh, path: &std::path::Path) -> Result<(), BuildError> {
    let bytes = mesh.to_stl_binary("live_model")?;
    std::fs::write(path, bytes)?;
    Ok(())
}
