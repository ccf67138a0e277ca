// src/types/bounds.rs

use crate::{error::*, types::*};

/// 2D Bounding Box (Axis-Aligned Bounding Box)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds2D {
    pub min: Point2D,
    pub max: Point2D,
}

impl Bounds2D {
    /// Erstellt eine neue Bounding Box
    pub fn new(min: Point2D, max: Point2D) -> StippleResult<Self> {
        if min.x > max.x || min.y > max.y {
            return Err(StippleError::InvalidConfiguration {
                message: format!("Invalid bounds: min {:?} > max {:?}", min, max),
            });
        }

        Ok(Self { min, max })
    }

    /// Erstellt eine Bounding Box aus zwei beliebigen Punkten
    pub fn from_points(p1: Point2D, p2: Point2D) -> Self {
        Self {
            min: Point2D::new(p1.x.min(p2.x), p1.y.min(p2.y)),
            max: Point2D::new(p1.x.max(p2.x), p1.y.max(p2.y)),
        }
    }

    /// Prüft ob die Bounding Box gültig ist
    pub fn is_valid(&self) -> bool {
        self.min.x <= self.max.x
            && self.min.y <= self.max.y
            && self.min.x.is_finite()
            && self.min.y.is_finite()
            && self.max.x.is_finite()
            && self.max.y.is_finite()
    }

    /// Breite der Bounding Box
    pub fn width(&self) -> f32 {
        (self.max.x - self.min.x).max(0.0)
    }

    /// Höhe der Bounding Box
    pub fn height(&self) -> f32 {
        (self.max.y - self.min.y).max(0.0)
    }

    /// Größe der Bounding Box
    pub fn size(&self) -> Point2D {
        Point2D::new(self.width(), self.height())
    }

    /// Zentrum der Bounding Box
    pub fn center(&self) -> Point2D {
        (self.min + self.max) * 0.5
    }

    /// Prüft ob ein Punkt in der Bounding Box liegt (Ränder inklusive)
    pub fn contains_point(&self, point: Point2D) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
    }

    /// Um `margin` in alle Richtungen vergrößerte Bounding Box
    pub fn expanded(&self, margin: f32) -> Self {
        Self {
            min: self.min - Point2D::splat(margin),
            max: self.max + Point2D::splat(margin),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_inverted_bounds() {
        assert!(Bounds2D::new(Point2D::new(1.0, 0.0), Point2D::new(0.0, 1.0)).is_err());
        assert!(Bounds2D::new(Point2D::ZERO, Point2D::new(2.0, 3.0)).is_ok());
    }

    #[test]
    fn test_contains_point_is_boundary_inclusive() {
        let bounds = Bounds2D::from_points(Point2D::ZERO, Point2D::new(10.0, 5.0));
        assert!(bounds.contains_point(Point2D::new(0.0, 0.0)));
        assert!(bounds.contains_point(Point2D::new(10.0, 5.0)));
        assert!(bounds.contains_point(Point2D::new(4.2, 1.7)));
        assert!(!bounds.contains_point(Point2D::new(10.01, 5.0)));
        assert!(!bounds.contains_point(Point2D::new(5.0, -0.01)));
    }

    #[test]
    fn test_expanded() {
        let bounds = Bounds2D::from_points(Point2D::ZERO, Point2D::new(4.0, 4.0));
        let expanded = bounds.expanded(0.1);
        assert!(expanded.contains_point(Point2D::new(-0.05, 4.05)));
        assert_eq!(expanded.width(), 4.2);
    }
}
