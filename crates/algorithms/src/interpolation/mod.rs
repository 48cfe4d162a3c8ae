//! Spatial interpolation onto regular grids
//!
//! - Grid construction: flat-topped hexagons or a square point lattice
//!   laid out in a local kilometer plane around the sample points
//! - IDW: Inverse Distance Weighting with great-circle distances
//! - k-d tree: radius queries over scattered points

mod grid;
mod idw;
pub mod kdtree;

pub use grid::{
    build_cells, cell_size_from_area, haversine_km, CellTemplate, LocalProjection,
    EARTH_RADIUS_KM,
};
pub use idw::{
    idw_at, interpolate, IdwParams, CELL_AREA_RANGE_KM2, DECAY_EXPONENT_RANGE,
};
pub use kdtree::{KdTree, RadiusMatch};

/// A sample point with x, y coordinates and a value.
///
/// For geographic data `x` is longitude and `y` latitude, in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplePoint {
    pub x: f64,
    pub y: f64,
    pub value: f64,
}

impl SamplePoint {
    pub fn new(x: f64, y: f64, value: f64) -> Self {
        Self { x, y, value }
    }

    /// Squared Euclidean distance to another point
    #[inline]
    pub fn dist_sq(&self, other_x: f64, other_y: f64) -> f64 {
        let dx = self.x - other_x;
        let dy = self.y - other_y;
        dx * dx + dy * dy
    }
}
