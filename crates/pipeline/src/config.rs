//! Pipeline configuration and user parameters

use nitramap_algorithms::interpolation::{IdwParams, CELL_AREA_RANGE_KM2, DECAY_EXPONENT_RANGE};
use nitramap_core::{Error, GridKind, Result};
use serde::{Deserialize, Serialize};

/// The two user-facing parameters of a run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PipelineParams {
    /// Distance-decay exponent, within [0, 100] (default: 2.0)
    pub decay_exponent: f64,
    /// Hexagon area in km², within [6, 90] (default: 10.0)
    pub cell_area_km2: f64,
}

impl Default for PipelineParams {
    fn default() -> Self {
        Self {
            decay_exponent: 2.0,
            cell_area_km2: 10.0,
        }
    }
}

impl PipelineParams {
    pub fn new(decay_exponent: f64, cell_area_km2: f64) -> Self {
        Self {
            decay_exponent,
            cell_area_km2,
        }
    }

    /// Parse raw form input into validated parameters.
    ///
    /// Surrounding whitespace is ignored. Non-numeric or out-of-range input
    /// fails with `InvalidParameter`.
    pub fn parse(decay_exponent: &str, cell_area_km2: &str) -> Result<Self> {
        let params = Self::new(
            parse_number("decay_exponent", decay_exponent)?,
            parse_number("cell_area_km2", cell_area_km2)?,
        );
        params.validate()?;
        Ok(params)
    }

    pub fn validate(&self) -> Result<()> {
        if !DECAY_EXPONENT_RANGE.contains(&self.decay_exponent) {
            return Err(Error::invalid_parameter(
                "decay_exponent",
                self.decay_exponent,
                "must be within [0, 100]",
            ));
        }
        if !CELL_AREA_RANGE_KM2.contains(&self.cell_area_km2) {
            return Err(Error::invalid_parameter(
                "cell_area_km2",
                self.cell_area_km2,
                "must be within [6, 90] km²",
            ));
        }
        Ok(())
    }

    /// Interpolation parameters for a grid of `kind`
    pub fn idw_params(&self, kind: GridKind) -> IdwParams {
        IdwParams {
            decay_exponent: self.decay_exponent,
            cell_area_km2: self.cell_area_km2,
            grid_kind: kind,
            ..IdwParams::default()
        }
    }
}

fn parse_number(name: &'static str, raw: &str) -> Result<f64> {
    let trimmed = raw.trim();
    match trimmed.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(Error::invalid_parameter(name, format!("{:?}", raw), "not a number")),
    }
}

/// Dataset attribute names and classification settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Nitrate attribute on well points
    pub nitrate_attribute: String,
    /// Cancer-rate attribute on tract polygons
    pub cancer_attribute: String,
    /// Number of ckmeans classes
    pub class_count: usize,
    /// Parameters restored on reset or after rejected input
    pub defaults: PipelineParams,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            nitrate_attribute: "nitr_ran".to_string(),
            cancer_attribute: "canrate".to_string(),
            class_count: 5,
            defaults: PipelineParams::default(),
        }
    }
}

impl PipelineConfig {
    /// Load from JSON; missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.class_count == 0 {
            return Err(Error::invalid_parameter(
                "class_count",
                self.class_count,
                "at least one class is required",
            ));
        }
        if self.nitrate_attribute.is_empty() {
            return Err(Error::invalid_parameter("nitrate_attribute", "\"\"", "must not be empty"));
        }
        if self.cancer_attribute.is_empty() {
            return Err(Error::invalid_parameter("cancer_attribute", "\"\"", "must not be empty"));
        }
        self.defaults.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        let p = PipelineParams::parse(" 3.5", "12 ").unwrap();
        assert_eq!(p, PipelineParams::new(3.5, 12.0));

        assert!(matches!(
            PipelineParams::parse("abc", "10"),
            Err(Error::InvalidParameter { name: "decay_exponent", .. })
        ));
        assert!(matches!(
            PipelineParams::parse("2", ""),
            Err(Error::InvalidParameter { name: "cell_area_km2", .. })
        ));
        assert!(matches!(
            PipelineParams::parse("2", "NaN"),
            Err(Error::InvalidParameter { .. })
        ));
    }

    #[test]
    fn test_ranges() {
        assert!(PipelineParams::new(0.0, 6.0).validate().is_ok());
        assert!(PipelineParams::new(100.0, 90.0).validate().is_ok());
        assert!(PipelineParams::new(-0.1, 10.0).validate().is_err());
        assert!(PipelineParams::new(100.5, 10.0).validate().is_err());
        let err = PipelineParams::parse("2", "5").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid parameter: cell_area_km2 = 5 (must be within [6, 90] km²)"
        );
    }

    #[test]
    fn test_idw_params() {
        let idw = PipelineParams::new(3.0, 20.0).idw_params(GridKind::Point);
        assert_eq!(idw.decay_exponent, 3.0);
        assert_eq!(idw.cell_area_km2, 20.0);
        assert_eq!(idw.grid_kind, GridKind::Point);
    }

    #[test]
    fn test_config_json() {
        let c = PipelineConfig::from_json(r#"{"class_count": 4}"#).unwrap();
        assert_eq!(c.class_count, 4);
        assert_eq!(c.nitrate_attribute, "nitr_ran");
        assert_eq!(c.defaults, PipelineParams::default());

        let c = PipelineConfig::from_json(
            r#"{"cancer_attribute": "rate", "defaults": {"decay_exponent": 1.5, "cell_area_km2": 30}}"#,
        )
        .unwrap();
        assert_eq!(c.cancer_attribute, "rate");
        assert_eq!(c.defaults, PipelineParams::new(1.5, 30.0));

        assert!(PipelineConfig::from_json(r#"{"class_count": 0}"#).is_err());
        assert!(matches!(
            PipelineConfig::from_json("{"),
            Err(Error::Json(_))
        ));
    }
}
