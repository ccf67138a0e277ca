// src/utils.rs

/// Mathematische Konstanten
pub mod constants {
    pub const EPSILON: f32 = 1e-6;
    pub const EPSILON_SQUARED: f32 = EPSILON * EPSILON; // Für Vergleiche mit Längenquadraten
}
