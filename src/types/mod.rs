// src/types/mod.rs
pub mod bounds;

pub use bounds::*;

// Re-export häufig verwendete externe Typen
pub use glam::Vec2;
pub use spade::Point2;

// Einheitliche Typen für das gesamte Crate
pub type Point2D = Vec2;
pub type SpadePoint = Point2<f64>;
