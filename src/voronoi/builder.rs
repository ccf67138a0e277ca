// src/voronoi/builder.rs

use crate::{
    error::{StippleError, StippleResult},
    types::{Bounds2D, Point2D, SpadePoint},
};
use serde::{Deserialize, Serialize};
use spade::{DelaunayTriangulation, Triangulation};
use std::collections::HashMap;

/// Toleranz, um die die Domäne beim Filtern der Zell-Eckpunkte vergrößert
/// wird. Fängt numerisches Rauschen an Zellen ab, die exakt auf dem Rand
/// enden.
const CELL_FILTER_MARGIN: f32 = 0.1;

/// Toleranz, innerhalb derer Zell-Eckpunkte auf die Domänenkanten
/// eingerastet werden. Umkreismittelpunkte, die rechnerisch exakt auf einer
/// Kante liegen, kommen mit Rauschen in der Größenordnung von 1e-15 heraus;
/// die ceil-basierte Rasterung würde dadurch um eine ganze Pixelspalte
/// verrutschen.
const VERTEX_SNAP_EPSILON: f64 = 1e-6;

/// Herkunft eines Sites in der kombinierten (gespiegelten) Punktmenge.
/// Die explizite Markierung macht das Aussortieren der Phantomzellen
/// nachvollziehbar, statt sich auf Indexarithmetik zu verlassen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SiteKind {
    /// Originalpunkt mit seinem Index in der Eingabeliste
    Real(usize),
    MirrorLeft,
    MirrorRight,
    MirrorDown,
    MirrorUp,
}

/// Voronoi-Zelle eines Eingabepunktes: zyklisch geordnete Indizes in die
/// gemeinsame Vertex-Tabelle des Diagramms.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Region {
    /// Index des erzeugenden Punktes in der Eingabeliste
    pub site: usize,
    /// Eckpunkte der Zelle in CCW-Reihenfolge, als Indizes in [`BoundedVoronoi::vertices`]
    pub vertex_indices: Vec<usize>,
}

/// Begrenztes Voronoi-Diagramm: gemeinsame Vertex-Tabelle plus eine Region
/// je überlebendem Site. Benachbarte Regionen teilen sich Vertex-Indizes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BoundedVoronoi {
    pub vertices: Vec<Point2D>,
    pub regions: Vec<Region>,
}

impl BoundedVoronoi {
    /// Löst die Vertex-Indizes einer Region zu einem Polygonumriss auf.
    pub fn outline(&self, region: &Region) -> Vec<Point2D> {
        region
            .vertex_indices
            .iter()
            .map(|&index| self.vertices[index])
            .collect()
    }
}

/// Berechnet endliche Voronoi-Zellen für eine Punktmenge innerhalb einer
/// rechteckigen Domäne.
///
/// Jeder Punkt innerhalb der Domäne wird an allen vier Kanten gespiegelt;
/// die Phantom-Sites außerhalb zwingen jede echte Zelle in ein endliches
/// Polygon. Über der kombinierten Punktmenge wird eine
/// Delaunay-Triangulation gebaut, deren Umkreismittelpunkte die
/// Zell-Eckpunkte liefern. Zellen, die das äußere Face berühren oder deren
/// Eckpunkte die (um die Toleranz vergrößerte) Domäne verlassen, werden
/// verworfen, darunter alle Phantomzellen.
pub struct BoundedVoronoiBuilder {
    bounds: Bounds2D,
}

impl BoundedVoronoiBuilder {
    pub fn new(bounds: Bounds2D) -> StippleResult<Self> {
        if !bounds.is_valid() {
            return Err(StippleError::InvalidConfiguration {
                message: format!("Voronoi domain bounds are invalid: {:?}", bounds),
            });
        }
        Ok(Self { bounds })
    }

    pub fn bounds(&self) -> &Bounds2D {
        &self.bounds
    }

    /// Baut das begrenzte Diagramm für `points`.
    ///
    /// Punkte außerhalb der Domäne werden ignoriert; für sie entsteht keine
    /// Region. Eine degenerierte Site-Konfiguration (keine Punkte in der
    /// Domäne, alle Sites kollinear oder identisch) ist ein fataler Fehler,
    /// da keine Zelle des Diagramms verwertbar wäre.
    pub fn build(&self, points: &[Point2D]) -> StippleResult<BoundedVoronoi> {
        let kept: Vec<(usize, Point2D)> = points
            .iter()
            .copied()
            .enumerate()
            .filter(|(_, p)| self.bounds.contains_point(*p))
            .collect();
        if kept.is_empty() {
            return Err(StippleError::InsufficientPoints {
                expected: 1,
                actual: 0,
            });
        }

        // Kombinierte Punktmenge: erst alle echten Sites, dann die Spiegel.
        // Bei Duplikaten (Punkt exakt auf einer Kante spiegelt auf sich
        // selbst) behält der zuerst eingefügte Vertex seine Zuordnung.
        let mut triangulation = DelaunayTriangulation::<SpadePoint>::new();
        let mut kinds: Vec<SiteKind> = Vec::with_capacity(kept.len() * 5);
        for (kind, position) in self.mirrored_sites(&kept) {
            match triangulation.insert(position) {
                Ok(handle) => {
                    if handle.index() == kinds.len() {
                        kinds.push(kind);
                    }
                }
                Err(e) => {
                    return Err(StippleError::TriangulationFailed {
                        reason: e.to_string(),
                    });
                }
            }
        }
        if triangulation.num_inner_faces() == 0 {
            return Err(StippleError::TriangulationFailed {
                reason: format!(
                    "degenerate site configuration: {} vertices, no inner faces",
                    triangulation.num_vertices()
                ),
            });
        }

        let expanded = self.bounds.expanded(CELL_FILTER_MARGIN);
        let mut vertex_ids: HashMap<usize, usize> = HashMap::new();
        let mut diagram = BoundedVoronoi::default();

        'sites: for vertex in triangulation.vertices() {
            let SiteKind::Real(site) = kinds[vertex.fix().index()] else {
                continue;
            };
            let generator = vertex.position();

            // Umkreismittelpunkte der anliegenden Dreiecke, mit Face-Index
            // als stabilem Schlüssel in die Vertex-Tabelle.
            let mut cell: Vec<(usize, SpadePoint)> = Vec::new();
            for edge in vertex.out_edges() {
                let face = edge.face();
                let Some(inner) = face.as_inner() else {
                    // Zelle berührt das äußere Face, also unbegrenzt.
                    log::debug!("voronoi: dropping unbounded cell for site {}", site);
                    continue 'sites;
                };
                let circumcenter = Self::snap_to_edges(&self.bounds, inner.circumcenter());
                if !Self::within(&expanded, &circumcenter) {
                    log::debug!(
                        "voronoi: dropping cell for site {} (vertex outside domain)",
                        site
                    );
                    continue 'sites;
                }
                cell.push((inner.fix().index(), circumcenter));
            }
            if cell.len() < 3 {
                log::debug!(
                    "voronoi: dropping cell for site {} with only {} vertices",
                    site,
                    cell.len()
                );
                continue;
            }

            // CCW um den Generator sortieren
            cell.sort_unstable_by(|a, b| {
                let angle_a = (a.1.y - generator.y).atan2(a.1.x - generator.x);
                let angle_b = (b.1.y - generator.y).atan2(b.1.x - generator.x);
                angle_a
                    .partial_cmp(&angle_b)
                    .unwrap_or(std::cmp::Ordering::Equal)
            });

            let mut vertex_indices = Vec::with_capacity(cell.len());
            for (face_index, position) in cell {
                let vertices = &mut diagram.vertices;
                let id = *vertex_ids.entry(face_index).or_insert_with(|| {
                    vertices.push(Point2D::new(position.x as f32, position.y as f32));
                    vertices.len() - 1
                });
                vertex_indices.push(id);
            }
            diagram.regions.push(Region {
                site,
                vertex_indices,
            });
        }

        Ok(diagram)
    }

    /// Echte Sites plus ihre Spiegelungen an den vier Domänenkanten.
    fn mirrored_sites(&self, kept: &[(usize, Point2D)]) -> Vec<(SiteKind, SpadePoint)> {
        let min = self.bounds.min;
        let max = self.bounds.max;
        let mut sites = Vec::with_capacity(kept.len() * 5);
        for &(index, p) in kept {
            sites.push((SiteKind::Real(index), to_spade(p.x, p.y)));
        }
        for &(_, p) in kept {
            sites.push((SiteKind::MirrorLeft, to_spade(2.0 * min.x - p.x, p.y)));
        }
        for &(_, p) in kept {
            sites.push((SiteKind::MirrorRight, to_spade(2.0 * max.x - p.x, p.y)));
        }
        for &(_, p) in kept {
            sites.push((SiteKind::MirrorDown, to_spade(p.x, 2.0 * min.y - p.y)));
        }
        for &(_, p) in kept {
            sites.push((SiteKind::MirrorUp, to_spade(p.x, 2.0 * max.y - p.y)));
        }
        sites
    }

    /// Zieht Koordinaten, die innerhalb von [`VERTEX_SNAP_EPSILON`] an einer
    /// Domänenkante liegen, exakt auf die Kante.
    fn snap_to_edges(bounds: &Bounds2D, p: SpadePoint) -> SpadePoint {
        let snap = |v: f64, edge: f64| {
            if (v - edge).abs() <= VERTEX_SNAP_EPSILON {
                edge
            } else {
                v
            }
        };
        let x = snap(snap(p.x, bounds.min.x as f64), bounds.max.x as f64);
        let y = snap(snap(p.y, bounds.min.y as f64), bounds.max.y as f64);
        SpadePoint::new(x, y)
    }

    fn within(bounds: &Bounds2D, p: &SpadePoint) -> bool {
        p.x >= bounds.min.x as f64
            && p.x <= bounds.max.x as f64
            && p.y >= bounds.min.y as f64
            && p.y <= bounds.max.y as f64
    }
}

fn to_spade(x: f32, y: f32) -> SpadePoint {
    SpadePoint::new(x as f64, y as f64)
}
