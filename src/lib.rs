//! Live camera contours turned into an extruded, unioned solid with a
//! spinning 3D preview.
//!
//! The pipeline runs as a loop: grab a frame, trace and filter closed
//! outlines, paint them back onto the frame for the operator, and on
//! request extrude every outline to a prism, union the prisms into one
//! solid stored as [BSP](mesh::bsp)-tree polygons, write it to an STL
//! interchange file, and hand that file to an isolated preview process.
//!
//! # Features
//! #### Default
//! - [**stl-io**](https://en.wikipedia.org/wiki/STL_(file_format)): `.stl` import/export
//!
//! #### Optional
//! - **camera**: webcam capture via `nokhwa`
//! - **viewer**: overlay and preview windows via `winit` + `wgpu`
//! - **live**: the full interactive session (**camera** + **viewer**)

#![forbid(unsafe_code)]
#![deny(unused)]
#![warn(clippy::missing_const_for_fn, clippy::approx_constant, clippy::all)]

pub mod build;
pub mod capture;
pub mod contour;
pub mod errors;
pub mod float_types;
pub mod io;
pub mod mesh;
pub mod preview;
pub mod sketch;

/// An RGB camera frame, row-major, origin at the top-left.
pub type Frame = image::RgbImage;
