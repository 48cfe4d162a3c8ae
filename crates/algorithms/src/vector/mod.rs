//! Vector operations
//!
//! - Centroid: area-weighted polygon centroids as observation points
//! - Spatial join: mean of point values inside each hexagon
//! - Bounding box: axis-aligned extent

mod centroid;
mod join;
mod spatial;

pub use centroid::{extract_centroids, polygon_centroid, CentroidExtraction};
pub use join::{polygon_contains, spatial_join};
pub use spatial::BoundingBox;
