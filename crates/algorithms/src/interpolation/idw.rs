//! Inverse Distance Weighting (IDW) interpolation onto hexagon or point grids
//!
//! Estimates the value at each cell center as a weighted average of all
//! sample points, where weights are inversely proportional to the
//! great-circle distance raised to a decay exponent.
//!
//! Reference:
//! Shepard, D. (1968). A two-dimensional interpolation function for
//! irregularly-spaced data. ACM National Conference.

use std::ops::RangeInclusive;

use geo::Point;
use nitramap_core::{Error, Grid, GridCell, GridKind, ObservationPoint, Result};
use tracing::debug;

use super::grid::{build_cells, cell_size_from_area, haversine_km};
use super::SamplePoint;
use crate::maybe_rayon::*;
use crate::vector::BoundingBox;

/// Accepted cell areas, in km²
pub const CELL_AREA_RANGE_KM2: RangeInclusive<f64> = 6.0..=90.0;

/// Accepted distance-decay exponents
pub const DECAY_EXPONENT_RANGE: RangeInclusive<f64> = 0.0..=100.0;

/// Parameters for IDW interpolation
#[derive(Debug, Clone, PartialEq)]
pub struct IdwParams {
    /// Distance-decay exponent (default: 2.0).
    /// Higher values give more weight to nearby points.
    pub decay_exponent: f64,
    /// Area of one hexagon cell in km² (default: 10.0). For point grids the
    /// lattice spacing equals the side of a hexagon of this area.
    pub cell_area_km2: f64,
    /// Output cell shape (default: hexagons)
    pub grid_kind: GridKind,
    /// A sample closer than this (km) to a cell center gives that cell its
    /// value directly.
    pub snap_distance_km: f64,
}

impl Default for IdwParams {
    fn default() -> Self {
        Self {
            decay_exponent: 2.0,
            cell_area_km2: 10.0,
            grid_kind: GridKind::Hex,
            snap_distance_km: 0.0,
        }
    }
}

impl IdwParams {
    /// Check both user-facing parameters against their accepted ranges.
    pub fn validate(&self) -> Result<()> {
        if !CELL_AREA_RANGE_KM2.contains(&self.cell_area_km2) {
            return Err(Error::invalid_parameter(
                "cell_area_km2",
                self.cell_area_km2,
                "must be within [6, 90] km²",
            ));
        }
        if !DECAY_EXPONENT_RANGE.contains(&self.decay_exponent) {
            return Err(Error::invalid_parameter(
                "decay_exponent",
                self.decay_exponent,
                "must be within [0, 100]",
            ));
        }
        if !(self.snap_distance_km >= 0.0) {
            return Err(Error::invalid_parameter(
                "snap_distance_km",
                self.snap_distance_km,
                "must be zero or positive",
            ));
        }
        Ok(())
    }
}

/// IDW estimate at a single location.
///
/// ```text
/// z(c) = Σ(wi * zi) / Σ(wi)
/// where wi = 1 / d(c, pi)^p
/// ```
///
/// `d` is the great-circle distance in km. The first sample within
/// `snap_distance_km` of `location` (distance zero when the snap distance
/// is zero) returns its own value. Returns `None` for an empty sample set.
///
/// Weights are scaled by the nearest distance, `(d_min / di)^p`, which
/// leaves the weight ratios unchanged and keeps them finite for large
/// exponents.
pub fn idw_at(
    points: &[SamplePoint],
    location: Point<f64>,
    decay_exponent: f64,
    snap_distance_km: f64,
) -> Option<f64> {
    let mut distances = Vec::with_capacity(points.len());
    let mut d_min = f64::INFINITY;

    for pt in points {
        let d = haversine_km(location, Point::new(pt.x, pt.y));
        if d <= snap_distance_km {
            return Some(pt.value);
        }
        d_min = d_min.min(d);
        distances.push(d);
    }

    let mut sum_w = 0.0;
    let mut sum_wz = 0.0;
    for (pt, d) in points.iter().zip(distances) {
        let w = (d_min / d).powf(decay_exponent);
        sum_w += w;
        sum_wz += w * pt.value;
    }

    if sum_w > 0.0 {
        Some(sum_wz / sum_w)
    } else {
        None
    }
}

/// Interpolate `attribute` of the observations onto a regular grid.
///
/// The grid covers the bounding box of the observations plus one cell of
/// margin. Observations without a finite numeric `attribute` are ignored.
///
/// # Errors
/// - `InvalidParameter` if the cell area or decay exponent is out of range
/// - `EmptyInput` if no observation carries the attribute
pub fn interpolate(
    points: &[ObservationPoint],
    attribute: &str,
    params: &IdwParams,
) -> Result<Grid> {
    params.validate()?;

    let samples: Vec<SamplePoint> = points
        .iter()
        .filter_map(|p| {
            p.attribute(attribute)
                .filter(|v| v.is_finite())
                .map(|v| SamplePoint::new(p.location.x(), p.location.y(), v))
        })
        .collect();

    if samples.is_empty() {
        return Err(Error::EmptyInput(format!(
            "no observation carries a numeric '{}'",
            attribute
        )));
    }
    if samples.len() < points.len() {
        debug!(
            attribute,
            skipped = points.len() - samples.len(),
            "ignoring observations without a numeric value"
        );
    }

    let bbox = BoundingBox::from_points(samples.iter().map(|s| Point::new(s.x, s.y)))
        .ok_or_else(|| Error::EmptyInput("no sample locations".into()))?;
    let cell_size = cell_size_from_area(params.cell_area_km2);
    let templates = build_cells(params.grid_kind, &bbox, cell_size)?;

    let power = params.decay_exponent;
    let snap = params.snap_distance_km;
    let cells: Vec<GridCell> = templates
        .into_par_iter()
        .map(|t| {
            // samples is non-empty, so a value always exists
            let value = idw_at(&samples, t.center, power, snap).unwrap_or(f64::NAN);
            GridCell {
                center: t.center,
                boundary: t.boundary,
                value,
            }
        })
        .collect();

    debug!(
        attribute,
        kind = ?params.grid_kind,
        samples = samples.len(),
        cells = cells.len(),
        cell_size_km = cell_size,
        "interpolated grid"
    );

    Ok(Grid {
        kind: params.grid_kind,
        attribute: attribute.to_string(),
        cell_size_km: cell_size,
        cells,
    })
}
