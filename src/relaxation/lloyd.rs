// src/relaxation/lloyd.rs

use crate::{
    error::StippleResult,
    field::density::DensityField,
    geometry::{centroid::weighted_centroid, raster::rasterize_outline},
    types::Point2D,
    utils::constants,
    voronoi::builder::{BoundedVoronoi, BoundedVoronoiBuilder},
};
use serde::{Deserialize, Serialize};

/// Konfiguration für die Lloyd-Relaxation über einem Dichtefeld.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LloydConfig {
    /// Anzahl der Iterationen; wird ohne Konvergenzkriterium immer voll
    /// ausgeschöpft.
    pub iterations: usize,
    /// Optionales Abbruchkriterium: maximale Punktverschiebung einer
    /// Iteration. `None` (Standard) erhält das Referenzverhalten mit
    /// fester Iterationszahl.
    pub convergence_tolerance: Option<f32>,
    /// Entfernt Punkte, deren Zelle beim Filtern verloren ging, statt sie
    /// an ihrer alten Position zu belassen. Damit kann die Punktmenge über
    /// Iterationen schrumpfen (Referenzverhalten, opt-in).
    pub drop_lost_sites: bool,
}

impl Default for LloydConfig {
    fn default() -> Self {
        Self {
            iterations: 10,
            convergence_tolerance: None,
            drop_lost_sites: false,
        }
    }
}

impl LloydConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    pub fn with_convergence_tolerance(mut self, tolerance: f32) -> Self {
        self.convergence_tolerance = Some(tolerance);
        self
    }

    pub fn with_drop_lost_sites(mut self, drop: bool) -> Self {
        self.drop_lost_sites = drop;
        self
    }
}

/// Statistiken eines Relaxationsdurchlaufs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LloydStats {
    pub iterations_performed: usize,
    pub max_movement_last_iteration: f32,
    pub mean_movement_last_iteration: f32,
    pub converged: bool,
}

/// Ergebnis eines einzelnen Relaxationsschritts. Das Diagramm erlaubt
/// Aufrufern, Zwischenzustände zu visualisieren oder zu exportieren.
#[derive(Debug, Clone)]
pub struct LloydStep {
    pub diagram: BoundedVoronoi,
    pub points: Vec<Point2D>,
    pub max_displacement: f32,
    pub mean_displacement: f32,
}

/// Treibt eine Punktmenge iterativ in die massegewichteten Schwerpunkte
/// ihrer Voronoi-Zellen (Lloyd-Relaxation, zentroidale Voronoi-Tessellation).
///
/// Ein Schritt: Diagramm bauen, jede Region rasterisieren, Schwerpunkt aus
/// den Momenttabellen des Feldes bestimmen, Punktmenge ersetzen. Iterationen
/// sind strikt sequentiell; das Feld bleibt unverändert und wird nur gelesen.
pub struct LloydRelaxation {
    config: LloydConfig,
}

impl LloydRelaxation {
    pub fn new(config: LloydConfig) -> Self {
        Self { config }
    }

    /// Führt einen Relaxationsschritt aus.
    ///
    /// Standardmäßig behält ein Punkt, dessen Zelle vom Diagrammfilter
    /// verworfen wurde, seine bisherige Position; mit `drop_lost_sites`
    /// besteht die Ausgabe nur aus den Schwerpunkten der überlebenden
    /// Regionen. Ein fataler Diagrammfehler bricht den Schritt ab.
    pub fn step(&self, points: &[Point2D], field: &DensityField) -> StippleResult<LloydStep> {
        let builder = BoundedVoronoiBuilder::new(field.bounds())?;
        let diagram = builder.build(points)?;

        let mut new_points = if self.config.drop_lost_sites {
            Vec::with_capacity(diagram.regions.len())
        } else {
            points.to_vec()
        };
        let mut max_displacement_sq = 0.0_f32;
        let mut total_displacement = 0.0_f32;
        let mut moved = 0_usize;

        for region in &diagram.regions {
            let outline = diagram.outline(region);
            let spans = rasterize_outline(&outline);
            let centroid = weighted_centroid(&spans, field);

            let displacement_sq = points[region.site].distance_squared(centroid);
            max_displacement_sq = max_displacement_sq.max(displacement_sq);
            if displacement_sq > constants::EPSILON_SQUARED {
                total_displacement += displacement_sq.sqrt();
                moved += 1;
            }

            if self.config.drop_lost_sites {
                new_points.push(centroid);
            } else {
                new_points[region.site] = centroid;
            }
        }

        let mean_displacement = if moved > 0 {
            total_displacement / moved as f32
        } else {
            0.0
        };

        Ok(LloydStep {
            diagram,
            points: new_points,
            max_displacement: max_displacement_sq.sqrt(),
            mean_displacement,
        })
    }

    /// Relaxiert `initial` für die konfigurierte Iterationszahl.
    ///
    /// Ohne Konvergenztoleranz läuft die Schleife immer vollständig durch;
    /// mit Toleranz endet sie, sobald die maximale Verschiebung einer
    /// Iteration darunter fällt.
    pub fn relax(
        &self,
        initial: &[Point2D],
        field: &DensityField,
    ) -> StippleResult<(Vec<Point2D>, LloydStats)> {
        let mut points = initial.to_vec();
        let mut stats = LloydStats::default();

        for iteration in 0..self.config.iterations {
            let step = self.step(&points, field)?;
            points = step.points;
            stats.iterations_performed = iteration + 1;
            stats.max_movement_last_iteration = step.max_displacement;
            stats.mean_movement_last_iteration = step.mean_displacement;
            log::debug!(
                "lloyd iteration {}/{}: {} regions, max displacement {:.4}",
                iteration + 1,
                self.config.iterations,
                step.diagram.regions.len(),
                step.max_displacement
            );

            if let Some(tolerance) = self.config.convergence_tolerance {
                if step.max_displacement <= tolerance {
                    stats.converged = true;
                    break;
                }
            }
        }

        Ok((points, stats))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn uniform_field(size: usize) -> DensityField {
        DensityField::from_weights(size, size, vec![1.0; size * size]).unwrap()
    }

    /// Continuous (shoelace) polygon centroid, for coarse comparison.
    fn polygon_centroid(outline: &[Point2D]) -> Point2D {
        let n = outline.len();
        let mut area2 = 0.0_f32;
        let mut cx = 0.0_f32;
        let mut cy = 0.0_f32;
        for i in 0..n {
            let a = outline[i];
            let b = outline[(i + 1) % n];
            let cross = a.x * b.y - b.x * a.y;
            area2 += cross;
            cx += (a.x + b.x) * cross;
            cy += (a.y + b.y) * cross;
        }
        Point2D::new(cx / (3.0 * area2), cy / (3.0 * area2))
    }

    #[test]
    fn test_uniform_step_moves_points_to_cell_centroids() {
        // Scenario: uniform density, 4 points in general position. After one
        // step every point sits at its cell's centroid; the discrete result
        // agrees with the continuous polygon centroid at pixel scale.
        let field = uniform_field(10);
        let points = [
            Point2D::new(2.0, 2.0),
            Point2D::new(7.0, 3.0),
            Point2D::new(3.0, 7.0),
            Point2D::new(8.0, 8.0),
        ];
        let relaxation = LloydRelaxation::new(LloydConfig::default());
        let step = relaxation.step(&points, &field).unwrap();

        assert_eq!(step.diagram.regions.len(), 4);
        for region in &step.diagram.regions {
            let outline = step.diagram.outline(region);
            let expected = polygon_centroid(&outline);
            let actual = step.points[region.site];
            assert!(
                actual.distance(expected) < 1.0,
                "site {}: engine {:?} vs polygon centroid {:?}",
                region.site,
                actual,
                expected
            );
        }
    }

    #[test]
    fn test_full_field_centroid_and_idempotence() {
        // Scenario: a single point owns the whole box, so its centroid is the
        // mass-weighted centroid of the entire field, verified by direct
        // summation. A second step from that centroid is a fixed point.
        let size = 12;
        let mut weights = vec![0.0; size * size];
        for y in 1..size - 1 {
            for x in 1..size - 1 {
                // Zero border ring so direct summation and the span
                // accounting cover the same pixels.
                weights[y * size + x] = (x * y) as f64 * 0.1 + 0.3;
            }
        }
        let field = DensityField::from_weights(size, size, weights.clone()).unwrap();

        let relaxation = LloydRelaxation::new(LloydConfig::default());
        let step = relaxation
            .step(&[Point2D::new(4.5, 7.2)], &field)
            .unwrap();
        assert_eq!(step.points.len(), 1);
        let centroid = step.points[0];

        // Direct summation; pixel k contributes at x-coordinate k-1 under
        // the inclusive-prefix convention of the moment tables.
        let mut mass = 0.0;
        let mut mx = 0.0;
        let mut my = 0.0;
        for y in 0..size {
            for x in 0..size {
                let w = weights[y * size + x];
                mass += w;
                mx += (x as f64 - 1.0) * w;
                my += y as f64 * w;
            }
        }
        assert_relative_eq!(centroid.x as f64, mx / mass, epsilon = 1e-4);
        assert_relative_eq!(centroid.y as f64, my / mass, epsilon = 1e-4);

        // The cell is the whole box wherever the point sits, so the centroid
        // is a fixed point of the iteration.
        let again = relaxation.step(&[centroid], &field).unwrap();
        assert_eq!(again.points.len(), 1);
        assert!(again.points[0].distance(centroid) < 1e-5);
        assert!(again.max_displacement < 1e-5);
    }

    #[test]
    fn test_mass_concentrated_on_single_pixel() {
        // Scenario: all mass on one pixel. The region holding that pixel
        // settles at or adjacent to it; zero-mass regions fall back to the
        // raw moments (the origin) instead of erroring.
        let mut weights = vec![0.0; 100];
        weights[6 * 10 + 3] = 1.0;
        let field = DensityField::from_weights(10, 10, weights).unwrap();
        let points = [
            Point2D::new(2.0, 5.0),
            Point2D::new(8.0, 2.0),
            Point2D::new(5.0, 8.5),
            Point2D::new(8.0, 8.0),
        ];
        let relaxation = LloydRelaxation::new(LloydConfig::default().with_iterations(5));
        let (relaxed, _) = relaxation.relax(&points, &field).unwrap();

        let hot = Point2D::new(3.0, 6.0);
        assert!(
            relaxed.iter().any(|p| p.distance(hot) <= 1.0),
            "no point settled near the hot pixel: {:?}",
            relaxed
        );
    }

    #[test]
    fn test_zero_iterations_return_input_unchanged() {
        let field = uniform_field(8);
        let points = vec![Point2D::new(2.0, 2.0), Point2D::new(6.0, 5.0)];
        let relaxation = LloydRelaxation::new(LloydConfig::default().with_iterations(0));
        let (out, stats) = relaxation.relax(&points, &field).unwrap();
        assert_eq!(out, points);
        assert_eq!(stats.iterations_performed, 0);
        assert!(!stats.converged);
    }

    #[test]
    fn test_fixed_iteration_count_is_exhausted_by_default() {
        let field = uniform_field(10);
        let points = [
            Point2D::new(2.0, 2.0),
            Point2D::new(7.0, 3.0),
            Point2D::new(3.0, 7.0),
        ];
        let relaxation = LloydRelaxation::new(LloydConfig::default().with_iterations(4));
        let (_, stats) = relaxation.relax(&points, &field).unwrap();
        // No convergence predicate: all configured iterations run even if
        // movement becomes tiny.
        assert_eq!(stats.iterations_performed, 4);
        assert!(!stats.converged);
    }

    #[test]
    fn test_convergence_tolerance_stops_early() {
        let field = uniform_field(10);
        let points = [
            Point2D::new(2.0, 2.0),
            Point2D::new(7.0, 3.0),
            Point2D::new(3.0, 7.0),
        ];
        let config = LloydConfig::default()
            .with_iterations(50)
            .with_convergence_tolerance(100.0); // always satisfied
        let relaxation = LloydRelaxation::new(config);
        let (_, stats) = relaxation.relax(&points, &field).unwrap();
        assert!(stats.converged);
        assert_eq!(stats.iterations_performed, 1);
    }

    #[test]
    fn test_lost_sites_keep_position_by_default() {
        let field = uniform_field(10);
        // One point outside the domain never gets a region.
        let outside = Point2D::new(15.0, 5.0);
        let points = [
            Point2D::new(2.0, 2.0),
            outside,
            Point2D::new(7.0, 3.0),
            Point2D::new(3.0, 7.0),
        ];

        let keep = LloydRelaxation::new(LloydConfig::default().with_iterations(2));
        let (kept, _) = keep.relax(&points, &field).unwrap();
        assert_eq!(kept.len(), 4);
        assert_eq!(kept[1], outside);

        let drop = LloydRelaxation::new(
            LloydConfig::default().with_iterations(1).with_drop_lost_sites(true),
        );
        let (dropped, _) = drop.relax(&points, &field).unwrap();
        assert_eq!(dropped.len(), 3);
    }

    #[test]
    fn test_fatal_diagram_failure_aborts_run() {
        let field = uniform_field(10);
        let relaxation = LloydRelaxation::new(LloydConfig::default());
        // No point inside the domain: diagram construction fails, the run
        // surfaces the error instead of a partial result.
        assert!(relaxation.relax(&[Point2D::new(20.0, 20.0)], &field).is_err());
    }
}
