//! WebAssembly bindings for the nitrate/cancer hexbin pipeline.
//!
//! The map front end fetches the two GeoJSON datasets, hands them to a
//! [`MapSession`] in whatever order they arrive, and renders the GeoJSON
//! strings the session returns. All computation happens on the calling
//! thread.

use wasm_bindgen::prelude::*;

use nitramap_core::io::parse_feature_collection;
use nitramap_pipeline::{DatasetSlots, Layer, Pipeline, PipelineConfig};

/// Helper: map a library error into a JS exception value
macro_rules! js_try {
    ($expr:expr) => {
        $expr.map_err(|e| JsValue::from_str(&e.to_string()))?
    };
}

/// One map page's pipeline and its input datasets
#[wasm_bindgen]
pub struct MapSession {
    config: PipelineConfig,
    slots: DatasetSlots,
    pipeline: Option<Pipeline>,
}

impl Default for MapSession {
    fn default() -> Self {
        Self::new()
    }
}

#[wasm_bindgen]
impl MapSession {
    /// Session with the default attribute names (`nitr_ran`, `canrate`)
    #[wasm_bindgen(constructor)]
    pub fn new() -> MapSession {
        MapSession {
            config: PipelineConfig::default(),
            slots: DatasetSlots::new(),
            pipeline: None,
        }
    }

    /// Session configured from a JSON `PipelineConfig`
    pub fn with_config(config_json: &str) -> Result<MapSession, JsValue> {
        let config = js_try!(PipelineConfig::from_json(config_json));
        Ok(MapSession {
            config,
            slots: DatasetSlots::new(),
            pipeline: None,
        })
    }

    /// Load the well points (GeoJSON FeatureCollection)
    pub fn load_wells(&mut self, geojson: &str) -> Result<(), JsValue> {
        let wells = js_try!(parse_feature_collection(geojson));
        self.slots.provide_wells(wells);
        self.rebuild()
    }

    /// Load the census-tract polygons (GeoJSON FeatureCollection)
    pub fn load_tracts(&mut self, geojson: &str) -> Result<(), JsValue> {
        let tracts = js_try!(parse_feature_collection(geojson));
        self.slots.provide_tracts(tracts);
        self.rebuild()
    }

    /// True once both datasets are loaded and classified
    pub fn is_ready(&self) -> bool {
        self.pipeline.is_some()
    }

    /// Run the pipeline on raw form input and return the state reached.
    ///
    /// Rejected input throws; the session is then back at its default
    /// parameters and the `initial` state.
    pub fn submit(&mut self, decay_exponent: &str, cell_area_km2: &str) -> Result<String, JsValue> {
        let pipeline = self.ready_pipeline()?;
        let state = js_try!(pipeline.submit_raw(decay_exponent, cell_area_km2));
        Ok(state.name().to_string())
    }

    /// Discard derived layers and restore the default parameters
    pub fn reset(&mut self) {
        if let Some(p) = self.pipeline.as_mut() {
            p.reset();
        }
    }

    /// `initial`, `interpolated`, `joined` or `regressed`
    pub fn state(&self) -> String {
        self.pipeline
            .as_ref()
            .map_or("initial", |p| p.state().name())
            .to_string()
    }

    /// Current parameters as JSON
    pub fn params(&self) -> Result<String, JsValue> {
        let params = self
            .pipeline
            .as_ref()
            .map_or(self.config.defaults, Pipeline::params);
        Ok(js_try!(serde_json::to_string(&params)))
    }

    /// Classified wells
    pub fn wells_geojson(&self) -> Result<Option<String>, JsValue> {
        match &self.pipeline {
            Some(p) => Ok(Some(js_try!(p.base_layers().wells_geojson()))),
            None => Ok(None),
        }
    }

    /// Classified tracts
    pub fn tracts_geojson(&self) -> Result<Option<String>, JsValue> {
        match &self.pipeline {
            Some(p) => Ok(Some(js_try!(p.base_layers().tracts_geojson()))),
            None => Ok(None),
        }
    }

    /// Interpolated nitrate hexagons
    pub fn nitrate_geojson(&self) -> Result<Option<String>, JsValue> {
        match self.pipeline.as_ref().and_then(Pipeline::output) {
            Some(out) => Ok(Some(js_try!(out.nitrate_geojson()))),
            None => Ok(None),
        }
    }

    /// Hexagons with averaged cancer rates
    pub fn joined_geojson(&self) -> Result<Option<String>, JsValue> {
        match self.pipeline.as_ref().and_then(Pipeline::output) {
            Some(out) => Ok(js_try!(out.joined_geojson())),
            None => Ok(None),
        }
    }

    /// Hexagons with regression residuals
    pub fn residuals_geojson(&self) -> Result<Option<String>, JsValue> {
        match self.pipeline.as_ref().and_then(Pipeline::output) {
            Some(out) => Ok(js_try!(out.residuals_geojson())),
            None => Ok(None),
        }
    }

    /// `{slope, intercept, r_squared, pairs}` of the last fitted regression
    pub fn regression_summary(&self) -> Result<Option<String>, JsValue> {
        match self.pipeline.as_ref().and_then(Pipeline::output) {
            Some(out) => Ok(js_try!(out.summary_json())),
            None => Ok(None),
        }
    }

    /// Legend rows of `layer` (`wells`, `tracts`, `nitrate`, `joined` or
    /// `residuals`) as a JSON array, or nothing while the layer is absent
    pub fn legend(&self, layer: &str) -> Result<Option<String>, JsValue> {
        let layer = js_try!(layer.parse::<Layer>());
        match self.pipeline.as_ref().and_then(|p| p.legend(layer)) {
            Some(rows) => Ok(Some(js_try!(serde_json::to_string(&rows)))),
            None => Ok(None),
        }
    }
}

impl MapSession {
    fn rebuild(&mut self) -> Result<(), JsValue> {
        js_try!(self.rebuild_pipeline());
        Ok(())
    }

    /// Drop the current pipeline and build a new one once both datasets
    /// are present. A failed build leaves the session not ready.
    fn rebuild_pipeline(&mut self) -> nitramap_core::Result<()> {
        self.pipeline = None;
        if !self.slots.is_ready() {
            return Ok(());
        }
        let datasets = self.slots.datasets()?;
        self.pipeline = Some(Pipeline::with_config(datasets, self.config.clone())?);
        Ok(())
    }

    fn ready_pipeline(&mut self) -> Result<&mut Pipeline, JsValue> {
        self.pipeline
            .as_mut()
            .ok_or_else(|| JsValue::from_str("datasets not loaded"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WELLS: &str = r#"{"type":"FeatureCollection","features":[
        {"type":"Feature","geometry":{"type":"Point","coordinates":[-89.60,44.00]},"properties":{"nitr_ran":1.2}},
        {"type":"Feature","geometry":{"type":"Point","coordinates":[-89.50,44.05]},"properties":{"nitr_ran":3.4}},
        {"type":"Feature","geometry":{"type":"Point","coordinates":[-89.45,44.12]},"properties":{"nitr_ran":6.1}},
        {"type":"Feature","geometry":{"type":"Point","coordinates":[-89.58,44.15]},"properties":{"nitr_ran":2.0}}
    ]}"#;

    const TRACTS: &str = r#"{"type":"FeatureCollection","features":[
        {"type":"Feature","geometry":{"type":"Polygon","coordinates":[[[-89.60,44.00],[-89.52,44.00],[-89.52,44.08],[-89.60,44.08],[-89.60,44.00]]]},"properties":{"canrate":0.08}},
        {"type":"Feature","geometry":{"type":"Polygon","coordinates":[[[-89.52,44.00],[-89.44,44.00],[-89.44,44.08],[-89.52,44.08],[-89.52,44.00]]]},"properties":{"canrate":0.15}},
        {"type":"Feature","geometry":{"type":"Polygon","coordinates":[[[-89.60,44.08],[-89.52,44.08],[-89.52,44.16],[-89.60,44.16],[-89.60,44.08]]]},"properties":{"canrate":0.11}},
        {"type":"Feature","geometry":{"type":"Polygon","coordinates":[[[-89.52,44.08],[-89.44,44.08],[-89.44,44.16],[-89.52,44.16],[-89.52,44.08]]]},"properties":{"canrate":0.21}}
    ]}"#;

    #[test]
    fn session_lifecycle() {
        let mut session = MapSession::new();
        assert!(!session.is_ready());
        assert_eq!(session.state(), "initial");

        session.load_tracts(TRACTS).unwrap();
        assert!(!session.is_ready());
        session.load_wells(WELLS).unwrap();
        assert!(session.is_ready());
        assert!(session.wells_geojson().unwrap().is_some());
        assert!(session.nitrate_geojson().unwrap().is_none());

        assert_eq!(session.submit("2", "10").unwrap(), "regressed");
        assert!(session.residuals_geojson().unwrap().is_some());
        assert!(session.regression_summary().unwrap().is_some());
        assert!(session.legend("residuals").unwrap().is_some());

        session.reset();
        assert_eq!(session.state(), "initial");
        assert!(session.joined_geojson().unwrap().is_none());
    }

    #[test]
    fn unusable_reload_drops_the_pipeline() {
        let mut session = MapSession::new();
        session.load_wells(WELLS).unwrap();
        session.load_tracts(TRACTS).unwrap();
        assert_eq!(session.submit("2", "10").unwrap(), "regressed");

        // Wells without a nitrate value cannot be classified
        let bare = r#"{"type":"FeatureCollection","features":[
            {"type":"Feature","geometry":{"type":"Point","coordinates":[-89.60,44.00]},"properties":{}}
        ]}"#;
        session
            .slots
            .provide_wells(parse_feature_collection(bare).unwrap());
        assert!(session.rebuild_pipeline().is_err());
        assert!(!session.is_ready());
        assert_eq!(session.state(), "initial");
        assert!(session.wells_geojson().unwrap().is_none());
        assert!(session.nitrate_geojson().unwrap().is_none());
    }
}
