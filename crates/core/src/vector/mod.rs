//! Vector data structures: features, feature collections and observation points

use geo_types::{Geometry, Point};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Attribute value types
///
/// Deserializes untagged, so GeoJSON `properties` map directly onto it:
/// integral numbers become `Int`, other numbers `Float`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    /// Arrays and nested objects, kept verbatim
    Other(serde_json::Value),
}

impl AttributeValue {
    /// Numeric view of the value.
    ///
    /// Strings are parsed, so `"0.12"` yields `Some(0.12)`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            AttributeValue::Int(i) => Some(*i as f64),
            AttributeValue::Float(f) => Some(*f),
            AttributeValue::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

impl From<f64> for AttributeValue {
    fn from(v: f64) -> Self {
        AttributeValue::Float(v)
    }
}

impl From<i64> for AttributeValue {
    fn from(v: i64) -> Self {
        AttributeValue::Int(v)
    }
}

impl From<&str> for AttributeValue {
    fn from(v: &str) -> Self {
        AttributeValue::String(v.to_string())
    }
}

/// Ordered attribute table. Ordering keeps serialized output stable.
pub type Properties = BTreeMap<String, AttributeValue>;

/// A geographic feature with geometry and attributes
#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    /// Feature geometry
    pub geometry: Option<Geometry<f64>>,
    /// Feature attributes
    pub properties: Properties,
    /// Optional feature ID
    pub id: Option<String>,
}

impl Feature {
    /// Create a new feature with geometry
    pub fn new(geometry: impl Into<Geometry<f64>>) -> Self {
        Self {
            geometry: Some(geometry.into()),
            properties: Properties::new(),
            id: None,
        }
    }

    /// Create a feature with no geometry
    pub fn empty() -> Self {
        Self {
            geometry: None,
            properties: Properties::new(),
            id: None,
        }
    }

    /// Builder-style attribute setter
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        self.set_property(key, value.into());
        self
    }

    /// Set an attribute
    pub fn set_property(&mut self, key: impl Into<String>, value: AttributeValue) {
        self.properties.insert(key.into(), value);
    }

    /// Get an attribute
    pub fn get_property(&self, key: &str) -> Option<&AttributeValue> {
        self.properties.get(key)
    }

    /// Get an attribute as a number
    pub fn numeric_property(&self, key: &str) -> Option<f64> {
        self.get_property(key).and_then(AttributeValue::as_f64)
    }
}

/// Collection of features
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureCollection {
    pub features: Vec<Feature>,
}

impl FeatureCollection {
    pub fn new() -> Self {
        Self { features: Vec::new() }
    }

    pub fn push(&mut self, feature: Feature) {
        self.features.push(feature);
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Feature> {
        self.features.iter()
    }

    /// Numeric values of `attribute`, in feature order, skipping features
    /// where it is missing or not numeric.
    pub fn numeric_values(&self, attribute: &str) -> Vec<f64> {
        self.features
            .iter()
            .filter_map(|f| f.numeric_property(attribute))
            .filter(|v| v.is_finite())
            .collect()
    }

    /// Point features as observation points; other geometries are skipped.
    pub fn observation_points(&self) -> Vec<ObservationPoint> {
        self.features
            .iter()
            .filter_map(ObservationPoint::from_feature)
            .collect()
    }
}

impl FromIterator<Feature> for FeatureCollection {
    fn from_iter<I: IntoIterator<Item = Feature>>(iter: I) -> Self {
        Self {
            features: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for FeatureCollection {
    type Item = Feature;
    type IntoIter = std::vec::IntoIter<Feature>;

    fn into_iter(self) -> Self::IntoIter {
        self.features.into_iter()
    }
}

/// A located observation (a well, or a tract centroid) with its attributes.
#[derive(Debug, Clone, PartialEq)]
pub struct ObservationPoint {
    /// (lon, lat)
    pub location: Point<f64>,
    pub properties: Properties,
}

impl ObservationPoint {
    pub fn new(location: Point<f64>, properties: Properties) -> Self {
        Self { location, properties }
    }

    /// Observation from a point feature. `None` for any other geometry.
    pub fn from_feature(feature: &Feature) -> Option<Self> {
        match feature.geometry {
            Some(Geometry::Point(p)) => Some(Self::new(p, feature.properties.clone())),
            _ => None,
        }
    }

    /// Numeric value of an attribute
    pub fn attribute(&self, key: &str) -> Option<f64> {
        self.properties.get(key).and_then(AttributeValue::as_f64)
    }

    pub fn into_feature(self) -> Feature {
        Feature {
            geometry: Some(Geometry::Point(self.location)),
            properties: self.properties,
            id: None,
        }
    }
}
