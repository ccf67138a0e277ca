//! Gewichtete Voronoi-Relaxation (Lloyd) über einem 2D-Dichtefeld.
//!
//! Aus einem Raster nicht-negativer Gewichte und einer initialen Punktmenge
//! entsteht durch wiederholtes Verschieben jedes Punktes in den
//! massegewichteten Schwerpunkt seiner Voronoi-Zelle eine Punktverteilung,
//! die der Dichte statistisch folgt (Stippling).

pub mod error;
pub mod field;
pub mod geometry;
pub mod relaxation;
pub mod types;
pub mod utils;
pub mod voronoi;

// Re-exports für einfache Verwendung
pub use error::{StippleError, StippleResult};
pub use types::*;

// Öffentliche API
pub mod prelude {
    pub use super::{
        error::{StippleError, StippleResult},
        field::{density::DensityField, sampling},
        geometry::{
            centroid::{weighted_centroid, weighted_centroid_of_outline, weighted_centroid_with_mass},
            raster::{ScanlineSpan, rasterize_outline},
        },
        relaxation::lloyd::{LloydConfig, LloydRelaxation, LloydStats, LloydStep},
        types::*,
        voronoi::builder::{BoundedVoronoi, BoundedVoronoiBuilder, Region},
    };
}
