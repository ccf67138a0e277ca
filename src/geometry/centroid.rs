// src/geometry/centroid.rs

use crate::{
    field::density::DensityField,
    geometry::raster::{ScanlineSpan, rasterize_outline},
    types::Point2D,
};

/// Massegewichteter Schwerpunkt einer rasterisierten Region.
///
/// Pro Span kostet die Auswertung O(1): aus der Präfixsumme P und der
/// doppelten Präfixsumme Q des Feldes folgt mit
/// `(b·P[b] - Q[b]) - (a·P[a] - Q[a]) = Σ_{k=a+1}^{b} (k-1)·w_k`
/// das x-Moment eines Spaltenintervalls ohne Pixelschleife; die Gesamtkosten
/// sind damit O(Zeilenanzahl) statt O(Fläche). Die inklusive
/// Präfix-Konvention verortet Pixel k dabei bei Koordinate k-1.
///
/// Span-Indizes werden auf die Gittergrenzen geklemmt (Eckpunkte exakt auf
/// oder minimal außerhalb des Rasters sind kein Fehler). Bei Masse Null
/// liefert die dokumentierte Rückfallregel die rohen, unnormierten Momente
/// (für eine leere Span-Liste also den Ursprung).
pub fn weighted_centroid_with_mass(spans: &[ScanlineSpan], field: &DensityField) -> (Point2D, f64) {
    let max_x = field.width() as i32 - 1;
    let max_y = field.height() as i32 - 1;

    let mut mass = 0.0_f64;
    let mut x_moment = 0.0_f64;
    let mut y_moment = 0.0_f64;

    for span in spans {
        let y = span.y.clamp(0, max_y) as usize;
        let x1 = span.x_start.clamp(0, max_x) as usize;
        let x2 = span.x_end.clamp(0, max_x) as usize;

        let p1 = field.prefix(x1, y);
        let p2 = field.prefix(x2, y);
        let q1 = field.double_prefix(x1, y);
        let q2 = field.double_prefix(x2, y);

        mass += p2 - p1;
        x_moment += (x2 as f64 * p2 - q2) - (x1 as f64 * p1 - q1);
        y_moment += y as f64 * (p2 - p1);
    }

    if mass > 0.0 {
        (
            Point2D::new((x_moment / mass) as f32, (y_moment / mass) as f32),
            mass,
        )
    } else {
        (Point2D::new(x_moment as f32, y_moment as f32), mass)
    }
}

/// Wie [`weighted_centroid_with_mass`], ohne die Masse zurückzugeben.
pub fn weighted_centroid(spans: &[ScanlineSpan], field: &DensityField) -> Point2D {
    weighted_centroid_with_mass(spans, field).0
}

/// Rasterisiert einen Polygonumriss und liefert dessen gewichteten Schwerpunkt.
pub fn weighted_centroid_of_outline(outline: &[Point2D], field: &DensityField) -> Point2D {
    weighted_centroid(&rasterize_outline(outline), field)
}
