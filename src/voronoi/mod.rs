// src/voronoi/mod.rs
pub mod builder;

pub use builder::{BoundedVoronoi, BoundedVoronoiBuilder, Region};
