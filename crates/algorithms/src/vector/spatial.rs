//! Axis-aligned extents

use geo::Point;

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl BoundingBox {
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self { min_x, min_y, max_x, max_y }
    }

    /// Smallest box containing every point. `None` for an empty iterator.
    pub fn from_points<I: IntoIterator<Item = Point<f64>>>(points: I) -> Option<Self> {
        points.into_iter().fold(None, |acc, p| {
            let (x, y) = (p.x(), p.y());
            Some(match acc {
                None => Self::new(x, y, x, y),
                Some(bb) => Self::new(
                    bb.min_x.min(x),
                    bb.min_y.min(y),
                    bb.max_x.max(x),
                    bb.max_y.max(y),
                ),
            })
        })
    }

    pub fn center(&self) -> (f64, f64) {
        ((self.min_x + self.max_x) / 2.0, (self.min_y + self.max_y) / 2.0)
    }
}
