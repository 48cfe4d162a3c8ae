//! GeoJSON FeatureCollection reading and writing
//!
//! Supports the geometry types the pipeline meets in practice: Point,
//! MultiPoint, LineString, Polygon and MultiPolygon. Positions may carry
//! extra ordinates (altitude), which are dropped.

use std::fs;
use std::path::Path;

use geo_types::{Coord, Geometry, LineString, MultiPoint, MultiPolygon, Point, Polygon};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::vector::{Feature, FeatureCollection, Properties};

type Position = Vec<f64>;

#[derive(Debug, Serialize, Deserialize)]
struct RawCollection {
    #[serde(rename = "type")]
    kind: String,
    features: Vec<RawFeature>,
}

#[derive(Debug, Serialize, Deserialize)]
struct RawFeature {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<serde_json::Value>,
    geometry: Option<RawGeometry>,
    #[serde(default)]
    properties: Option<Properties>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "type")]
enum RawGeometry {
    Point { coordinates: Position },
    MultiPoint { coordinates: Vec<Position> },
    LineString { coordinates: Vec<Position> },
    Polygon { coordinates: Vec<Vec<Position>> },
    MultiPolygon { coordinates: Vec<Vec<Vec<Position>>> },
}

/// Parse a GeoJSON FeatureCollection from a string.
pub fn parse_feature_collection(json: &str) -> Result<FeatureCollection> {
    let raw: RawCollection = serde_json::from_str(json)?;
    if raw.kind != "FeatureCollection" {
        return Err(Error::GeoJson(format!(
            "expected a FeatureCollection, found {}",
            raw.kind
        )));
    }

    raw.features
        .into_iter()
        .enumerate()
        .map(|(i, f)| {
            feature_from_raw(f).map_err(|e| Error::GeoJson(format!("feature {}: {}", i, e)))
        })
        .collect::<Result<Vec<_>>>()
        .map(|features| FeatureCollection { features })
}

/// Read a GeoJSON FeatureCollection from a file.
pub fn read_feature_collection<P: AsRef<Path>>(path: P) -> Result<FeatureCollection> {
    let text = fs::read_to_string(path)?;
    parse_feature_collection(&text)
}

/// Serialize a FeatureCollection as GeoJSON.
pub fn feature_collection_to_string(collection: &FeatureCollection) -> Result<String> {
    let features = collection
        .iter()
        .map(feature_to_raw)
        .collect::<Result<Vec<_>>>()?;
    let raw = RawCollection {
        kind: "FeatureCollection".into(),
        features,
    };
    Ok(serde_json::to_string(&raw)?)
}

/// Write a FeatureCollection to a GeoJSON file.
pub fn write_feature_collection<P: AsRef<Path>>(
    collection: &FeatureCollection,
    path: P,
) -> Result<()> {
    fs::write(path, feature_collection_to_string(collection)?)?;
    Ok(())
}

fn feature_from_raw(raw: RawFeature) -> Result<Feature> {
    if raw.kind != "Feature" {
        return Err(Error::GeoJson(format!("expected a Feature, found {}", raw.kind)));
    }
    let id = raw.id.map(|v| match v {
        serde_json::Value::String(s) => s,
        other => other.to_string(),
    });
    Ok(Feature {
        geometry: raw.geometry.map(geometry_from_raw).transpose()?,
        properties: raw.properties.unwrap_or_default(),
        id,
    })
}

fn feature_to_raw(feature: &Feature) -> Result<RawFeature> {
    Ok(RawFeature {
        kind: "Feature".into(),
        id: feature.id.clone().map(serde_json::Value::String),
        geometry: feature.geometry.as_ref().map(geometry_to_raw).transpose()?,
        properties: Some(feature.properties.clone()),
    })
}

fn coord(pos: &[f64]) -> Result<Coord<f64>> {
    match pos {
        [x, y, ..] => Ok(Coord { x: *x, y: *y }),
        _ => Err(Error::GeoJson(format!(
            "position needs at least 2 numbers, got {}",
            pos.len()
        ))),
    }
}

fn line(positions: &[Position]) -> Result<LineString<f64>> {
    positions
        .iter()
        .map(|p| coord(p))
        .collect::<Result<Vec<_>>>()
        .map(LineString::from)
}

fn polygon(rings: &[Vec<Position>]) -> Result<Polygon<f64>> {
    let (exterior, interiors) = rings
        .split_first()
        .ok_or_else(|| Error::GeoJson("polygon without rings".into()))?;
    Ok(Polygon::new(
        line(exterior)?,
        interiors.iter().map(|r| line(r)).collect::<Result<Vec<_>>>()?,
    ))
}

fn geometry_from_raw(raw: RawGeometry) -> Result<Geometry<f64>> {
    Ok(match raw {
        RawGeometry::Point { coordinates } => Geometry::Point(Point::from(coord(&coordinates)?)),
        RawGeometry::MultiPoint { coordinates } => Geometry::MultiPoint(MultiPoint::new(
            coordinates
                .iter()
                .map(|p| coord(p).map(Point::from))
                .collect::<Result<Vec<_>>>()?,
        )),
        RawGeometry::LineString { coordinates } => Geometry::LineString(line(&coordinates)?),
        RawGeometry::Polygon { coordinates } => Geometry::Polygon(polygon(&coordinates)?),
        RawGeometry::MultiPolygon { coordinates } => Geometry::MultiPolygon(MultiPolygon::new(
            coordinates
                .iter()
                .map(|rings| polygon(rings))
                .collect::<Result<Vec<_>>>()?,
        )),
    })
}

fn position(c: &Coord<f64>) -> Position {
    vec![c.x, c.y]
}

fn positions(ls: &LineString<f64>) -> Vec<Position> {
    ls.0.iter().map(position).collect()
}

fn rings(p: &Polygon<f64>) -> Vec<Vec<Position>> {
    std::iter::once(p.exterior())
        .chain(p.interiors())
        .map(positions)
        .collect()
}

fn geometry_to_raw(geom: &Geometry<f64>) -> Result<RawGeometry> {
    Ok(match geom {
        Geometry::Point(p) => RawGeometry::Point {
            coordinates: position(&p.0),
        },
        Geometry::MultiPoint(mp) => RawGeometry::MultiPoint {
            coordinates: mp.0.iter().map(|p| position(&p.0)).collect(),
        },
        Geometry::LineString(ls) => RawGeometry::LineString {
            coordinates: positions(ls),
        },
        Geometry::Polygon(p) => RawGeometry::Polygon { coordinates: rings(p) },
        Geometry::MultiPolygon(mp) => RawGeometry::MultiPolygon {
            coordinates: mp.0.iter().map(rings).collect(),
        },
        other => {
            return Err(Error::GeoJson(format!(
                "unsupported geometry for output: {:?}",
                other
            )))
        }
    })
}
