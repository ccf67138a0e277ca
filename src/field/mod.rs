// src/field/mod.rs
pub mod density;
pub mod sampling;

pub use density::DensityField;
