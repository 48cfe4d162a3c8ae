//! # NitraMap Core
//!
//! Core types and I/O for the nitrate/cancer hexbin pipeline.
//!
//! This crate provides:
//! - `Feature` / `FeatureCollection`: raw GeoJSON-like input features
//! - `ObservationPoint`: a located point with attributes
//! - `Grid` / `GridCell`: interpolated hexagon or point-lattice surfaces
//! - `JoinedGrid` / `JoinedCell`: a hex grid carrying a second, joined variable
//! - GeoJSON reading and writing

pub mod error;
pub mod grid;
pub mod io;
pub mod vector;

pub use error::{Error, Result};
pub use grid::{Grid, GridCell, GridKind, JoinedCell, JoinedGrid};
pub use vector::{AttributeValue, Feature, FeatureCollection, ObservationPoint, Properties};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::grid::{Grid, GridCell, GridKind, JoinedCell, JoinedGrid};
    pub use crate::vector::{
        AttributeValue, Feature, FeatureCollection, ObservationPoint, Properties,
    };
}
