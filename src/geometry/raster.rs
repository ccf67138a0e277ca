// src/geometry/raster.rs

use crate::types::Point2D;
use serde::{Deserialize, Serialize};

/// Gefülltes Pixelintervall einer Rasterzeile: Spalten `x_start..x_end` auf Zeile `y`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanlineSpan {
    pub x_start: i32,
    pub x_end: i32,
    pub y: i32,
}

/// Scanline-Rasterisierung eines (implizit geschlossenen) Polygonumrisses.
///
/// Für jede ganzzahlige Zeile zwischen `ceil(min Y)` und `floor(max Y)` werden
/// die x-Schnittpunkte aller nicht-horizontalen Kanten gesammelt, sortiert und
/// paarweise zu Spans verbunden (Even-Odd-Füllregel). Eine Kante schneidet die
/// Zeile `y`, wenn `y1 <= y < y2` gilt; nur die oberste Zeile akzeptiert
/// zusätzlich `y1 < y <= y2`, damit sie nicht verloren geht.
///
/// Degenerierte Umrisse (weniger als 3 Eckpunkte, kollinear ohne vertikale
/// Ausdehnung) ergeben eine leere Span-Liste.
pub fn rasterize_outline(outline: &[Point2D]) -> Vec<ScanlineSpan> {
    let n = outline.len();
    if n < 3 {
        return Vec::new();
    }

    let mut y_min = f64::INFINITY;
    let mut y_max = f64::NEG_INFINITY;
    for v in outline {
        y_min = y_min.min(v.y as f64);
        y_max = y_max.max(v.y as f64);
    }
    let y_lo = y_min.ceil() as i32;
    let y_hi = y_max.floor() as i32;
    if y_hi < y_lo {
        return Vec::new();
    }

    let mut spans = Vec::with_capacity((y_hi - y_lo + 1) as usize);
    let mut intercepts: Vec<f64> = Vec::new();

    for y in y_lo..=y_hi {
        let fy = y as f64;
        intercepts.clear();

        for i in 0..n {
            let a = outline[(i + n - 1) % n];
            let b = outline[i];
            let (mut x1, mut y1) = (a.x as f64, a.y as f64);
            let (mut x2, mut y2) = (b.x as f64, b.y as f64);
            if y1 > y2 {
                std::mem::swap(&mut y1, &mut y2);
                std::mem::swap(&mut x1, &mut x2);
            } else if y1 == y2 {
                // Horizontale Kanten liefern keinen Schnittpunkt.
                continue;
            }

            if (y1 <= fy && fy < y2) || (y == y_hi && y1 < fy && fy <= y2) {
                intercepts.push((fy - y1) * (x2 - x1) / (y2 - y1) + x1);
            }
        }

        intercepts.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        // Paarweise verbinden; ein unpaarer Rest wird verworfen (Even-Odd).
        for pair in intercepts.chunks_exact(2) {
            spans.push(ScanlineSpan {
                x_start: pair[0].ceil() as i32,
                x_end: pair[1].ceil() as i32,
                y,
            });
        }
    }

    spans
}
