//! GeoJSON export of classified layers and run outputs
//!
//! Every exported feature carries its value(s), a `class` index (null when
//! unclassified) and a `fill` color for the renderer.

use geo_types::{Point, Polygon};
use nitramap_algorithms::classification::ClassBreaks;
use std::str::FromStr;

use nitramap_colormap::{legend_entries, ClassPalette, LegendEntry};
use nitramap_core::io::feature_collection_to_string;
use nitramap_core::{AttributeValue, Error, Feature, FeatureCollection, Grid, JoinedCell, Result};
use serde::Serialize;

use crate::orchestrator::{
    BaseLayers, ClassifiedLayer, JoinedStage, Pipeline, RegressedStage, RunOutput,
};

/// The map layers the pipeline produces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Layer {
    Wells,
    Tracts,
    Nitrate,
    Joined,
    Residuals,
}

impl Layer {
    pub fn palette(&self) -> ClassPalette {
        match self {
            Layer::Wells | Layer::Nitrate => ClassPalette::Nitrate,
            Layer::Tracts | Layer::Joined => ClassPalette::CancerRate,
            Layer::Residuals => ClassPalette::Residual,
        }
    }
}

impl FromStr for Layer {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "wells" => Ok(Layer::Wells),
            "tracts" => Ok(Layer::Tracts),
            "nitrate" => Ok(Layer::Nitrate),
            "joined" => Ok(Layer::Joined),
            "residuals" => Ok(Layer::Residuals),
            _ => Err(Error::invalid_parameter("layer", s, "unknown layer")),
        }
    }
}

/// Scalar regression results for display
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RegressionSummary {
    pub slope: f64,
    pub intercept: f64,
    pub r_squared: f64,
    pub pairs: usize,
}

impl RegressedStage {
    pub fn summary(&self) -> RegressionSummary {
        RegressionSummary {
            slope: self.model.slope,
            intercept: self.model.intercept,
            r_squared: self.model.r_squared,
            pairs: self.pairs,
        }
    }
}

fn optional(value: Option<f64>) -> AttributeValue {
    value.map_or(AttributeValue::Null, AttributeValue::Float)
}

fn set_class(feature: &mut Feature, class: Option<usize>, palette: ClassPalette) {
    let class_value = class.map_or(AttributeValue::Null, |c| AttributeValue::Int(c as i64));
    feature.set_property("class", class_value);
    feature.set_property("fill", AttributeValue::String(palette.color(class).to_hex()));
}

fn cell_feature(center: Point<f64>, boundary: Option<&Polygon<f64>>) -> Feature {
    match boundary {
        Some(hex) => Feature::new(hex.clone()),
        None => Feature::new(center),
    }
}

/// Raw features with their class and fill
pub fn layer_collection(layer: &ClassifiedLayer, palette: ClassPalette) -> FeatureCollection {
    layer
        .features
        .iter()
        .zip(&layer.classes)
        .map(|(feature, &class)| {
            let mut f = feature.clone();
            set_class(&mut f, class, palette);
            f
        })
        .collect()
}

/// Grid cells with their value, class and fill
pub fn grid_collection(grid: &Grid, breaks: &ClassBreaks, palette: ClassPalette) -> FeatureCollection {
    grid.iter()
        .map(|cell| {
            let mut f = cell_feature(cell.center, cell.boundary.as_ref());
            f.set_property(grid.attribute.clone(), AttributeValue::Float(cell.value));
            set_class(&mut f, breaks.classify(cell.value), palette);
            f
        })
        .collect()
}

fn joined_feature(cell: &JoinedCell, attribute: &str, joined_attribute: &str) -> Feature {
    let mut f = cell_feature(cell.center, cell.boundary.as_ref());
    f.set_property(attribute, AttributeValue::Float(cell.value));
    f.set_property(joined_attribute, optional(cell.joined));
    f.set_property("joined_count", AttributeValue::Int(cell.joined_count as i64));
    f
}

/// Joined hexagons, classified by their joined (cancer) value
pub fn joined_collection(stage: &JoinedStage, palette: ClassPalette) -> FeatureCollection {
    let grid = &stage.grid;
    grid.cells
        .iter()
        .map(|cell| {
            let mut f = joined_feature(cell, &grid.attribute, &grid.joined_attribute);
            let class = match (&stage.breaks, cell.joined) {
                (Some(breaks), Some(v)) => breaks.classify(v),
                _ => None,
            };
            set_class(&mut f, class, palette);
            f
        })
        .collect()
}

/// Regressed hexagons with prediction and residual, classified by residual
pub fn residual_collection(stage: &RegressedStage, palette: ClassPalette) -> FeatureCollection {
    let grid = &stage.grid;
    grid.cells
        .iter()
        .map(|cell| {
            let mut f = joined_feature(cell, &grid.attribute, &grid.joined_attribute);
            f.set_property("predicted", optional(cell.predicted));
            f.set_property("residual", optional(cell.residual));
            let class = cell.residual.and_then(|r| stage.residual_breaks.classify(r));
            set_class(&mut f, class, palette);
            f
        })
        .collect()
}

impl BaseLayers {
    pub fn wells_collection(&self) -> FeatureCollection {
        layer_collection(&self.wells, ClassPalette::Nitrate)
    }

    pub fn tracts_collection(&self) -> FeatureCollection {
        layer_collection(&self.tracts, ClassPalette::CancerRate)
    }

    pub fn wells_geojson(&self) -> Result<String> {
        feature_collection_to_string(&self.wells_collection())
    }

    pub fn tracts_geojson(&self) -> Result<String> {
        feature_collection_to_string(&self.tracts_collection())
    }
}

impl RunOutput {
    pub fn nitrate_collection(&self) -> FeatureCollection {
        let stage = &self.interpolated;
        grid_collection(&stage.nitrate, &stage.nitrate_breaks, ClassPalette::Nitrate)
    }

    pub fn joined_collection(&self) -> Option<FeatureCollection> {
        self.joined
            .as_ref()
            .map(|stage| joined_collection(stage, ClassPalette::CancerRate))
    }

    pub fn residual_collection(&self) -> Option<FeatureCollection> {
        self.regressed
            .as_ref()
            .map(|stage| residual_collection(stage, ClassPalette::Residual))
    }

    pub fn summary(&self) -> Option<RegressionSummary> {
        self.regressed.as_ref().map(RegressedStage::summary)
    }

    pub fn nitrate_geojson(&self) -> Result<String> {
        feature_collection_to_string(&self.nitrate_collection())
    }

    pub fn joined_geojson(&self) -> Result<Option<String>> {
        self.joined_collection()
            .map(|fc| feature_collection_to_string(&fc))
            .transpose()
    }

    pub fn residuals_geojson(&self) -> Result<Option<String>> {
        self.residual_collection()
            .map(|fc| feature_collection_to_string(&fc))
            .transpose()
    }

    pub fn summary_json(&self) -> Result<Option<String>> {
        Ok(self.summary().map(|s| serde_json::to_string(&s)).transpose()?)
    }
}

impl Pipeline {
    /// Legend rows of `layer`, or `None` while that layer does not exist
    pub fn legend(&self, layer: Layer) -> Option<Vec<LegendEntry>> {
        let base = self.base_layers();
        let run = self.output();
        let breaks = match layer {
            Layer::Wells => Some(&base.wells.breaks),
            Layer::Tracts => Some(&base.tracts.breaks),
            Layer::Nitrate => run.map(|r| &r.interpolated.nitrate_breaks),
            Layer::Joined => run
                .and_then(|r| r.joined.as_ref())
                .and_then(|j| j.breaks.as_ref()),
            Layer::Residuals => run
                .and_then(|r| r.regressed.as_ref())
                .map(|r| &r.residual_breaks),
        }?;
        Some(legend_entries(breaks, layer.palette()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo_types::polygon;
    use nitramap_algorithms::classification::ClassRange;
    use nitramap_algorithms::statistics::RegressionModel;
    use nitramap_core::{GridCell, GridKind, JoinedGrid};

    fn hex() -> Polygon<f64> {
        polygon![(x: 0.0, y: 0.0), (x: 1.0, y: 0.0), (x: 1.0, y: 1.0), (x: 0.0, y: 1.0)]
    }

    fn joined_cell(value: f64, joined: Option<f64>) -> JoinedCell {
        JoinedCell {
            center: Point::new(0.5, 0.5),
            boundary: Some(hex()),
            value,
            joined,
            joined_count: joined.map_or(0, |_| 2),
            predicted: None,
            residual: None,
        }
    }

    #[test]
    fn test_layer_names() {
        assert_eq!("Residuals".parse::<Layer>().unwrap(), Layer::Residuals);
        assert_eq!(" joined ".parse::<Layer>().unwrap(), Layer::Joined);
        assert!("hexes".parse::<Layer>().is_err());
        assert_eq!(Layer::Wells.palette(), ClassPalette::Nitrate);
    }

    #[test]
    fn test_grid_collection() {
        let grid = Grid {
            kind: GridKind::Point,
            attribute: "canrate".into(),
            cell_size_km: 1.0,
            cells: vec![
                GridCell { center: Point::new(1.0, 2.0), boundary: None, value: 0.1 },
                GridCell { center: Point::new(2.0, 2.0), boundary: None, value: 0.9 },
            ],
        };
        let breaks = ClassBreaks::Clusters {
            ranges: vec![ClassRange::new(0.1, 0.1), ClassRange::new(0.9, 0.9)],
        };
        let fc = grid_collection(&grid, &breaks, ClassPalette::CancerRate);
        assert_eq!(fc.len(), 2);
        let f = &fc.features[1];
        assert!(matches!(f.geometry, Some(geo_types::Geometry::Point(_))));
        assert_eq!(f.numeric_property("canrate"), Some(0.9));
        assert_eq!(f.get_property("class"), Some(&AttributeValue::Int(1)));
        assert_eq!(
            f.get_property("fill"),
            Some(&AttributeValue::String("#bdc9e1".into()))
        );
    }

    #[test]
    fn test_unjoined_cells_are_unclassified() {
        let stage = JoinedStage {
            grid: JoinedGrid {
                attribute: "nitr_ran".into(),
                joined_attribute: "canrate".into(),
                cell_size_km: 1.0,
                cells: vec![joined_cell(3.0, Some(0.2)), joined_cell(4.0, None)],
            },
            breaks: Some(ClassBreaks::Clusters {
                ranges: vec![ClassRange::new(0.2, 0.2)],
            }),
        };
        let fc = joined_collection(&stage, ClassPalette::CancerRate);
        let a = &fc.features[0];
        let b = &fc.features[1];
        assert!(matches!(a.geometry, Some(geo_types::Geometry::Polygon(_))));
        assert_eq!(a.get_property("class"), Some(&AttributeValue::Int(0)));
        assert_eq!(a.get_property("joined_count"), Some(&AttributeValue::Int(2)));
        assert_eq!(b.get_property("canrate"), Some(&AttributeValue::Null));
        assert_eq!(b.get_property("class"), Some(&AttributeValue::Null));
        assert_eq!(
            b.get_property("fill"),
            Some(&AttributeValue::String(nitramap_colormap::NO_CLASS.to_hex()))
        );
    }

    #[test]
    fn test_residuals_and_summary() {
        let mut cell = joined_cell(2.0, Some(5.0));
        cell.predicted = Some(7.0);
        cell.residual = Some(2.0);
        let stage = RegressedStage {
            grid: JoinedGrid {
                attribute: "nitr_ran".into(),
                joined_attribute: "canrate".into(),
                cell_size_km: 1.0,
                cells: vec![cell],
            },
            model: RegressionModel { slope: 3.0, intercept: 1.0, r_squared: 0.5 },
            pairs: 1,
            residual_breaks: ClassBreaks::Deviation { sigma: 1.0, cuts: [-2.0, -1.0, 1.0, 2.0] },
        };
        let fc = residual_collection(&stage, ClassPalette::Residual);
        let f = &fc.features[0];
        assert_eq!(f.numeric_property("residual"), Some(2.0));
        assert_eq!(f.numeric_property("predicted"), Some(7.0));
        assert_eq!(f.get_property("class"), Some(&AttributeValue::Int(3)));

        let json = serde_json::to_value(stage.summary()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"slope": 3.0, "intercept": 1.0, "r_squared": 0.5, "pairs": 1})
        );
    }
}
