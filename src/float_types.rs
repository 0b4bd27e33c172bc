//! Scalar type and numeric constants used across the crate.

/// Our Real scalar type.
pub type Real = f64;

/// Tolerance for geometric comparisons: point classification against
/// planes, degenerate-edge rejection, coincident-vertex tests.
pub const EPSILON: Real = 1e-8;

/// Archimedes' constant (π)
pub const PI: Real = core::f64::consts::PI;

/// The full circle constant (τ)
pub const TAU: Real = core::f64::consts::TAU;
