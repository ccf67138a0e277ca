// src/geometry/mod.rs
pub mod centroid;
pub mod raster;

pub use centroid::{weighted_centroid, weighted_centroid_of_outline, weighted_centroid_with_mass};
pub use raster::{ScanlineSpan, rasterize_outline};
