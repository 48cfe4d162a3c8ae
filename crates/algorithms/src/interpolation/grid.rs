//! Regular grid construction in a local kilometer plane
//!
//! Cells are laid out on an equirectangular plane centred on the extent of
//! the input points, then mapped back to (lon, lat). The mapping is affine,
//! so containment tests done in degrees agree with the planar layout.
//!
//! Hexagons are flat-topped with side `s`: columns are `1.5·s` apart, rows
//! `√3·s` apart and odd columns are shifted up by half a row. The point
//! lattice is square with spacing `s`.

use geo::{Coord, Distance, Haversine, LineString, Point, Polygon};
use nitramap_core::{Error, GridKind, Result};

use crate::vector::BoundingBox;

/// Mean earth radius in kilometers (IUGG)
pub const EARTH_RADIUS_KM: f64 = 6371.0088;

/// Refuse to allocate grids larger than this
const MAX_CELLS: usize = 4_000_000;

/// Great-circle distance between two (lon, lat) points, in kilometers.
#[inline]
pub fn haversine_km(a: Point<f64>, b: Point<f64>) -> f64 {
    Haversine::distance(a, b) / 1000.0
}

/// Side length (km) of a regular hexagon with the given area (km²).
///
/// The point lattice uses the same value as its spacing.
pub fn cell_size_from_area(area_km2: f64) -> f64 {
    (2.0 * area_km2 / (3.0 * 3f64.sqrt())).sqrt()
}

/// Equirectangular projection about a reference point, in kilometers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocalProjection {
    lon0: f64,
    lat0: f64,
    /// km per degree of longitude at `lat0`
    kx: f64,
    /// km per degree of latitude
    ky: f64,
}

impl LocalProjection {
    /// Projection centred on the middle of `bbox`.
    pub fn centered_on(bbox: &BoundingBox) -> Result<Self> {
        let (lon0, lat0) = bbox.center();
        if !lon0.is_finite() || !lat0.is_finite() {
            return Err(Error::Algorithm("grid extent is not finite".into()));
        }
        let ky = EARTH_RADIUS_KM.to_radians();
        let kx = ky * lat0.to_radians().cos();
        if kx < 1e-6 {
            return Err(Error::Algorithm(format!(
                "grid extent centred at latitude {} is too close to a pole",
                lat0
            )));
        }
        Ok(Self { lon0, lat0, kx, ky })
    }

    /// (lon, lat) to plane (x, y) in km
    pub fn forward(&self, lon: f64, lat: f64) -> (f64, f64) {
        ((lon - self.lon0) * self.kx, (lat - self.lat0) * self.ky)
    }

    /// Plane (x, y) in km to (lon, lat)
    pub fn inverse(&self, x: f64, y: f64) -> Coord<f64> {
        Coord {
            x: self.lon0 + x / self.kx,
            y: self.lat0 + y / self.ky,
        }
    }
}

/// Geometry of one grid cell before a value is assigned
#[derive(Debug, Clone, PartialEq)]
pub struct CellTemplate {
    pub center: Point<f64>,
    pub boundary: Option<Polygon<f64>>,
}

/// Lay out cells of side/spacing `cell_size_km` covering `bbox` plus a
/// margin of one cell on every side.
///
/// Cells are returned column by column, bottom to top.
pub fn build_cells(kind: GridKind, bbox: &BoundingBox, cell_size_km: f64) -> Result<Vec<CellTemplate>> {
    if !(cell_size_km > 0.0) || !cell_size_km.is_finite() {
        return Err(Error::invalid_parameter(
            "cell_size_km",
            cell_size_km,
            "must be a positive number",
        ));
    }

    let proj = LocalProjection::centered_on(bbox)?;
    let (x0, y0) = proj.forward(bbox.min_x, bbox.min_y);
    let (x1, y1) = proj.forward(bbox.max_x, bbox.max_y);
    let s = cell_size_km;
    let (x0, y0, x1, y1) = (x0 - s, y0 - s, x1 + s, y1 + s);

    let (step_x, step_y) = match kind {
        GridKind::Hex => (1.5 * s, 3f64.sqrt() * s),
        GridKind::Point => (s, s),
    };
    let ncols = ((x1 - x0) / step_x).ceil() as usize + 1;
    let nrows = ((y1 - y0) / step_y).ceil() as usize + 1;

    let total = ncols.saturating_mul(nrows);
    if total > MAX_CELLS {
        return Err(Error::Algorithm(format!(
            "grid of {}x{} cells exceeds the limit of {} cells",
            ncols, nrows, MAX_CELLS
        )));
    }

    let mut cells = Vec::with_capacity(total);
    for col in 0..ncols {
        let cx = x0 + col as f64 * step_x;
        let offset = match kind {
            GridKind::Hex if col % 2 == 1 => step_y / 2.0,
            _ => 0.0,
        };
        for row in 0..nrows {
            let cy = y0 + row as f64 * step_y + offset;
            let boundary = match kind {
                GridKind::Hex => Some(hexagon(&proj, cx, cy, s)),
                GridKind::Point => None,
            };
            cells.push(CellTemplate {
                center: Point::from(proj.inverse(cx, cy)),
                boundary,
            });
        }
    }

    Ok(cells)
}

fn hexagon(proj: &LocalProjection, cx: f64, cy: f64, side: f64) -> Polygon<f64> {
    let ring: Vec<Coord<f64>> = (0..6)
        .map(|k| {
            let theta = (60.0 * k as f64).to_radians();
            proj.inverse(cx + side * theta.cos(), cy + side * theta.sin())
        })
        .collect();
    Polygon::new(LineString::from(ring), vec![])
}
