// src/field/density.rs

use crate::{
    error::{StippleError, StippleResult},
    types::{Bounds2D, Point2D},
};

/// Unterhalb dieser Spannweite gilt ein Luminanzraster als flach
/// und wird auf ein Nullfeld normalisiert.
const FLAT_RANGE: f64 = 1e-5;

/// Zweidimensionales Raster nicht-negativer Gewichte mit vorberechneten
/// Momenttabellen. Speicherung zeilenweise (row-major), einmal gebaut
/// und danach unveränderlich.
///
/// Pro Zeile hält `prefix` die laufende Summe P der Gewichte und
/// `double_prefix` die laufende Summe Q von P. Damit lassen sich Masse
/// und erstes x-Moment eines beliebigen Spaltenintervalls in O(1)
/// abfragen (Momenttabelle).
#[derive(Debug, Clone)]
pub struct DensityField {
    weights: Vec<f64>,
    prefix: Vec<f64>,
    double_prefix: Vec<f64>,
    width: usize,
    height: usize,
    total_mass: f64,
    max_weight: f64,
}

impl DensityField {
    /// Baut ein Dichtefeld aus rohen Gewichten (row-major, Länge `width * height`).
    /// Alle Gewichte müssen endlich und nicht-negativ sein.
    pub fn from_weights(width: usize, height: usize, weights: Vec<f64>) -> StippleResult<Self> {
        if width == 0 || height == 0 {
            return Err(StippleError::InvalidDensity {
                message: format!("Grid dimensions must be non-zero, got {}x{}", width, height),
            });
        }
        if weights.len() != width * height {
            return Err(StippleError::InvalidDensity {
                message: format!(
                    "Weight buffer length {} does not match {}x{} grid",
                    weights.len(),
                    width,
                    height
                ),
            });
        }
        if let Some(w) = weights.iter().find(|w| !w.is_finite() || **w < 0.0) {
            return Err(StippleError::InvalidDensity {
                message: format!("Weights must be finite and >= 0, found {}", w),
            });
        }

        let mut prefix = vec![0.0; weights.len()];
        let mut double_prefix = vec![0.0; weights.len()];
        for y in 0..height {
            let row = y * width;
            let mut running = 0.0;
            let mut running2 = 0.0;
            for x in 0..width {
                running += weights[row + x];
                prefix[row + x] = running;
                running2 += running;
                double_prefix[row + x] = running2;
            }
        }

        let total_mass = weights.iter().sum();
        let max_weight = weights.iter().cloned().fold(0.0, f64::max);

        Ok(Self {
            weights,
            prefix,
            double_prefix,
            width,
            height,
            total_mass,
            max_weight,
        })
    }

    /// Baut ein Dichtefeld aus einem Luminanzraster: normalisiert auf [0, 1]
    /// und invertiert, so dass dunkle Bereiche hohes Gewicht tragen.
    /// Ein (nahezu) flaches Raster ergibt ein Nullfeld.
    pub fn from_luminance(width: usize, height: usize, luminance: &[f64]) -> StippleResult<Self> {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for &v in luminance {
            min = min.min(v);
            max = max.max(v);
        }

        let weights = if luminance.is_empty() || max - min <= FLAT_RANGE {
            vec![0.0; luminance.len()]
        } else {
            let range = max - min;
            luminance.iter().map(|v| 1.0 - (v - min) / range).collect()
        };

        Self::from_weights(width, height, weights)
    }

    #[inline]
    fn idx(&self, x: usize, y: usize) -> usize {
        y * self.width + x
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Gewicht an Zelle (x, y)
    pub fn weight(&self, x: usize, y: usize) -> f64 {
        self.weights[self.idx(x, y)]
    }

    /// Zeilenweise Präfixsumme P: Summe der Gewichte der Zeile `y` bis Spalte `x` (inklusive)
    pub fn prefix(&self, x: usize, y: usize) -> f64 {
        self.prefix[self.idx(x, y)]
    }

    /// Doppelte Präfixsumme Q: Summe von P der Zeile `y` bis Spalte `x` (inklusive)
    pub fn double_prefix(&self, x: usize, y: usize) -> f64 {
        self.double_prefix[self.idx(x, y)]
    }

    /// Gesamtmasse des Feldes
    pub fn total_mass(&self) -> f64 {
        self.total_mass
    }

    /// Größtes Einzelgewicht des Feldes
    pub fn max_weight(&self) -> f64 {
        self.max_weight
    }

    /// Rechteckige Domäne des Feldes in Pixelkoordinaten: [0, W] x [0, H]
    pub fn bounds(&self) -> Bounds2D {
        Bounds2D::from_points(
            Point2D::ZERO,
            Point2D::new(self.width as f32, self.height as f32),
        )
    }
}
