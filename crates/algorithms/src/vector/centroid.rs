//! Polygon centroids as observation points
//!
//! Census tracts are reduced to their area-weighted centroid so they can be
//! interpolated like point samples. Holes are subtracted from the weighting;
//! multipolygons are weighted over all of their parts.

use geo::{Area, Centroid, Geometry};
use nitramap_core::{Error, Feature, FeatureCollection, ObservationPoint, Result};
use tracing::warn;

/// Centroids of a feature collection plus the number of features skipped
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CentroidExtraction {
    pub points: Vec<ObservationPoint>,
    pub skipped: usize,
}

/// Area-weighted centroid of a polygon feature, carrying its attributes.
///
/// # Errors
/// `DegenerateGeometry` when the feature has no geometry, is not a
/// (multi)polygon, or encloses zero area.
pub fn polygon_centroid(feature: &Feature) -> Result<ObservationPoint> {
    let (area, centroid) = match &feature.geometry {
        Some(Geometry::Polygon(p)) => (p.unsigned_area(), p.centroid()),
        Some(Geometry::MultiPolygon(mp)) => (mp.unsigned_area(), mp.centroid()),
        Some(other) => {
            return Err(Error::DegenerateGeometry(format!(
                "expected a polygon, found {}",
                geometry_name(other)
            )))
        }
        None => return Err(Error::DegenerateGeometry("feature has no geometry".into())),
    };

    if !(area > 0.0) {
        return Err(Error::DegenerateGeometry("polygon has zero area".into()));
    }

    centroid
        .filter(|c| c.x().is_finite() && c.y().is_finite())
        .map(|c| ObservationPoint::new(c, feature.properties.clone()))
        .ok_or_else(|| Error::DegenerateGeometry("polygon has no centroid".into()))
}

/// Centroids of every polygon feature, in collection order.
///
/// Degenerate features are skipped with a warning.
pub fn extract_centroids(collection: &FeatureCollection) -> CentroidExtraction {
    let mut out = CentroidExtraction::default();
    for (i, feature) in collection.iter().enumerate() {
        match polygon_centroid(feature) {
            Ok(point) => out.points.push(point),
            Err(e) => {
                warn!(index = i, id = ?feature.id, error = %e, "skipping feature");
                out.skipped += 1;
            }
        }
    }
    out
}

fn geometry_name(geom: &Geometry<f64>) -> &'static str {
    match geom {
        Geometry::Point(_) => "Point",
        Geometry::MultiPoint(_) => "MultiPoint",
        Geometry::LineString(_) | Geometry::Line(_) => "LineString",
        Geometry::MultiLineString(_) => "MultiLineString",
        _ => "another geometry type",
    }
}
