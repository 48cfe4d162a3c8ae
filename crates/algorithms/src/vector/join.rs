//! Spatial join of a point grid onto a hexagon grid
//!
//! Every hexagon gathers the values of the source points that lie inside it
//! and reduces them to their arithmetic mean. Hexagons that receive no
//! point get no joined value.
//!
//! Containment uses the crossing-number rule with half-open edges: a point
//! exactly on an edge shared by two hexagons belongs to exactly one of
//! them, so every source point is counted at most once.

use geo::{Coord, LineString, Polygon};
use nitramap_core::{Error, Grid, GridKind, JoinedCell, JoinedGrid, Result};
use tracing::debug;

use crate::interpolation::{KdTree, SamplePoint};
use crate::maybe_rayon::*;

/// Join the values of `source` onto the hexagons of `target`.
///
/// # Errors
/// `InvalidParameter` if `target` is not a hexagon grid.
pub fn spatial_join(target: &Grid, source: &Grid) -> Result<JoinedGrid> {
    if target.kind != GridKind::Hex {
        return Err(Error::invalid_parameter(
            "target",
            format!("{:?} grid", target.kind),
            "join target must be a hexagon grid",
        ));
    }

    let samples: Vec<SamplePoint> = source
        .iter()
        .filter(|c| c.value.is_finite())
        .map(|c| SamplePoint::new(c.center.x(), c.center.y(), c.value))
        .collect();
    let tree = KdTree::build(&samples);

    let cells: Vec<JoinedCell> = target
        .cells
        .par_iter()
        .map(|cell| {
            let (sum, count) = match &cell.boundary {
                Some(hex) => {
                    let (cx, cy) = (cell.center.x(), cell.center.y());
                    tree.within_radius(cx, cy, reach(hex, cx, cy))
                        .into_iter()
                        .filter(|r| polygon_contains(hex, r.point.x, r.point.y))
                        .fold((0.0, 0usize), |(s, n), r| (s + r.point.value, n + 1))
                }
                None => (0.0, 0),
            };
            JoinedCell {
                center: cell.center,
                boundary: cell.boundary.clone(),
                value: cell.value,
                joined: (count > 0).then(|| sum / count as f64),
                joined_count: count,
                predicted: None,
                residual: None,
            }
        })
        .collect();

    let matched = cells.iter().filter(|c| c.joined.is_some()).count();
    debug!(
        target_attribute = %target.attribute,
        source_attribute = %source.attribute,
        cells = cells.len(),
        matched,
        "joined grids"
    );

    Ok(JoinedGrid {
        attribute: target.attribute.clone(),
        joined_attribute: source.attribute.clone(),
        cell_size_km: target.cell_size_km,
        cells,
    })
}

/// Whether (x, y) lies inside the polygon (holes excluded).
///
/// Edges are half-open, see the module docs.
pub fn polygon_contains(polygon: &Polygon<f64>, x: f64, y: f64) -> bool {
    let p = Coord { x, y };
    ring_contains(polygon.exterior(), p) && !polygon.interiors().iter().any(|r| ring_contains(r, p))
}

/// Even-odd crossing test. A crossing is counted when the edge spans the
/// ray's y with one endpoint strictly above, and the crossing is strictly
/// right of the point.
fn ring_contains(ring: &LineString<f64>, p: Coord<f64>) -> bool {
    let mut inside = false;
    for line in ring.lines() {
        let (a, b) = (line.start, line.end);
        if (a.y > p.y) != (b.y > p.y) {
            let x_cross = a.x + (p.y - a.y) * (b.x - a.x) / (b.y - a.y);
            if p.x < x_cross {
                inside = !inside;
            }
        }
    }
    inside
}

/// Distance from the center to the farthest vertex
fn reach(polygon: &Polygon<f64>, cx: f64, cy: f64) -> f64 {
    polygon
        .exterior()
        .0
        .iter()
        .map(|c| ((c.x - cx).powi(2) + (c.y - cy).powi(2)).sqrt())
        .fold(0.0, f64::max)
}
