//! # NitraMap Algorithms
//!
//! The numerical core behind the nitrate and cancer-rate hexbin maps.
//!
//! ## Available Algorithm Categories
//!
//! - **vector**: tract centroids, bounding boxes, point-in-hexagon mean join
//! - **interpolation**: IDW onto hexagon and point grids, k-d tree
//! - **classification**: ckmeans clusters and standard-deviation bands
//! - **statistics**: OLS regression, R² and residuals

pub mod classification;
pub mod interpolation;
mod maybe_rayon;
pub mod statistics;
pub mod vector;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::classification::{
        ckmeans, ckmeans_breaks, deviation_breaks, ClassBreaks, ClassRange,
        ClassificationMethod,
    };
    pub use crate::interpolation::{interpolate, IdwParams, SamplePoint};
    pub use crate::statistics::{apply_model, linear_regression, RegressionModel};
    pub use crate::vector::{extract_centroids, spatial_join, BoundingBox, CentroidExtraction};
    pub use nitramap_core::prelude::*;
}
