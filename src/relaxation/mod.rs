// src/relaxation/mod.rs
pub mod lloyd;

pub use lloyd::{LloydConfig, LloydRelaxation, LloydStats, LloydStep};
