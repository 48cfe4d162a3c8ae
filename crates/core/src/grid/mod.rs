//! Interpolated grids
//!
//! A [`Grid`] is what the interpolator produces: an ordered set of hexagon
//! cells or lattice points, each holding the value estimated at its center.
//! A [`JoinedGrid`] is a hexagon grid that additionally carries the mean of
//! a second grid's values inside each cell and, once a regression has been
//! fitted, the prediction and residual for that cell.

use geo_types::{Point, Polygon};
use serde::{Deserialize, Serialize};

/// Shape of the cells in a grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GridKind {
    /// Flat-topped hexagons
    Hex,
    /// Regular lattice of points
    Point,
}

/// One cell of an interpolated grid
#[derive(Debug, Clone, PartialEq)]
pub struct GridCell {
    /// Cell center (lon, lat)
    pub center: Point<f64>,
    /// Cell outline; `None` for lattice points
    pub boundary: Option<Polygon<f64>>,
    /// Interpolated value at the center
    pub value: f64,
}

/// A regular grid of interpolated values
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    pub kind: GridKind,
    /// Name of the attribute the values were interpolated from
    pub attribute: String,
    /// Hexagon side length or lattice spacing, in kilometers
    pub cell_size_km: f64,
    pub cells: Vec<GridCell>,
}

impl Grid {
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &GridCell> {
        self.cells.iter()
    }

    /// Cell values in grid order
    pub fn values(&self) -> Vec<f64> {
        self.cells.iter().map(|c| c.value).collect()
    }
}

/// A hexagon cell carrying two variables
#[derive(Debug, Clone, PartialEq)]
pub struct JoinedCell {
    pub center: Point<f64>,
    pub boundary: Option<Polygon<f64>>,
    /// Value of the target grid (the explanatory variable)
    pub value: f64,
    /// Mean of the source values inside the cell; `None` when no source
    /// point fell inside it
    pub joined: Option<f64>,
    /// Number of source points averaged into `joined`
    pub joined_count: usize,
    /// Regression prediction of `joined` from `value`, once a model has
    /// been fitted
    pub predicted: Option<f64>,
    /// `predicted - joined`, once a model has been fitted
    pub residual: Option<f64>,
}

impl JoinedCell {
    /// `(value, joined)` when the cell has a joined value
    pub fn pair(&self) -> Option<(f64, f64)> {
        self.joined.map(|y| (self.value, y))
    }
}

/// A hexagon grid joined with a second variable
#[derive(Debug, Clone, PartialEq)]
pub struct JoinedGrid {
    /// Attribute of the target grid values
    pub attribute: String,
    /// Attribute of the joined (source) values
    pub joined_attribute: String,
    pub cell_size_km: f64,
    pub cells: Vec<JoinedCell>,
}

impl JoinedGrid {
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// `(value, joined)` pairs of every cell that has a joined value,
    /// in grid order
    pub fn pairs(&self) -> Vec<(f64, f64)> {
        self.cells.iter().filter_map(JoinedCell::pair).collect()
    }

    /// Joined values of every cell that has one
    pub fn joined_values(&self) -> Vec<f64> {
        self.cells.iter().filter_map(|c| c.joined).collect()
    }

    /// Residuals of every cell that has one
    pub fn residuals(&self) -> Vec<f64> {
        self.cells.iter().filter_map(|c| c.residual).collect()
    }
}
