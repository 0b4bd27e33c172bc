//! Error taxonomy for the capture → build → preview pipeline.
//!
//! Geometry and preview errors are contained at their origin and surfaced
//! as diagnostics; only a device-open failure terminates the process.

use crate::float_types::Real;
use std::path::PathBuf;

/// The capture device could not be opened at startup. Fatal: the loop
/// never starts.
#[derive(Debug, thiserror::Error)]
pub enum DeviceError {
    #[error("cannot open capture device {index}: {reason}")]
    OpenFailed { index: u32, reason: String },
}

/// A single per-tick frame read failed. The capture loop ends gracefully.
#[derive(Debug, thiserror::Error)]
#[error("frame read failed: {reason}")]
pub struct FrameReadError {
    pub reason: String,
}

/// A profile handed to the extruder was not a simple closed polygon.
/// Any of these fails the whole snapshot, fail-fast, with no partial write.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GeometryError {
    /// Fewer than three distinct points after scaling.
    #[error("profile has fewer than 3 distinct points ({count})")]
    TooFewPoints { count: usize },

    /// Two non-adjacent edges of the profile cross each other.
    #[error("profile self-intersects near ({x:.3}, {y:.3})")]
    SelfIntersection { x: Real, y: Real },

    /// The profile encloses no area (collinear or repeated points).
    #[error("profile is degenerate: encloses no area")]
    Degenerate,
}

/// Outcome classification for one solid-builder run.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    /// Snapshot requested with zero valid outlines. Nothing is written;
    /// a prior interchange file is left untouched.
    #[error("no valid shapes to export")]
    NoShapes,

    #[error("extrusion failed: {0}")]
    Geometry(#[from] GeometryError),

    #[error("failed to write model file: {0}")]
    Io(#[from] std::io::Error),
}

/// Failures inside the isolated preview renderer. Caught and reported in
/// that process; never propagate to the orchestrator.
#[derive(Debug, thiserror::Error)]
pub enum PreviewError {
    #[error("cannot load model from {}: {reason}", path.display())]
    Load { path: PathBuf, reason: String },

    #[error("model at {} contains no triangles", path.display())]
    EmptyModel { path: PathBuf },

    #[error("render failure: {0}")]
    Render(String),
}

/// Overlay window failures (surface lost, window creation).
#[derive(Debug, thiserror::Error)]
#[error("overlay display failure: {reason}")]
pub struct DisplayError {
    pub reason: String,
}
