#[cfg(feature = "stl-io")]
pub mod stl;
