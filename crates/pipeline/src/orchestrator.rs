//! Pipeline orchestrator
//!
//! `Initial → Interpolated → Joined → Regressed`, driven by [`Pipeline::submit`]
//! and returned to `Initial` by [`Pipeline::reset`].
//!
//! Every submit recomputes from the raw datasets into fresh storage, so
//! identical parameters always give identical output. A stage's output is
//! committed only when the stage succeeds; a failed first stage leaves the
//! previous run untouched.

use nitramap_algorithms::classification::{ClassBreaks, ClassificationMethod};
use nitramap_algorithms::interpolation::interpolate;
use nitramap_algorithms::statistics::{apply_model, linear_regression, RegressionModel};
use nitramap_algorithms::vector::{extract_centroids, spatial_join};
use nitramap_core::{
    Error, FeatureCollection, Grid, GridKind, JoinedGrid, ObservationPoint, Result,
};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::{PipelineConfig, PipelineParams};
use crate::datasets::Datasets;
use crate::events::{StageEvent, StageObserver};

/// How far the current run got
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineState {
    /// Raw layers only
    Initial,
    /// Nitrate hexagons and cancer lattice built
    Interpolated,
    /// Cancer values averaged onto the nitrate hexagons
    Joined,
    /// Regression fitted and residuals computed
    Regressed,
}

impl PipelineState {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Initial => "initial",
            Self::Interpolated => "interpolated",
            Self::Joined => "joined",
            Self::Regressed => "regressed",
        }
    }
}

/// A raw input layer with a class for each feature
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifiedLayer {
    pub attribute: String,
    pub features: FeatureCollection,
    /// Class of each feature, `None` where the attribute is missing
    pub classes: Vec<Option<usize>>,
    pub breaks: ClassBreaks,
}

impl ClassifiedLayer {
    fn classify(
        features: FeatureCollection,
        attribute: &str,
        method: ClassificationMethod,
    ) -> Result<Self> {
        let breaks = method.breaks(&features.numeric_values(attribute))?;
        let classes = features
            .iter()
            .map(|f| f.numeric_property(attribute).and_then(|v| breaks.classify(v)))
            .collect();
        Ok(Self {
            attribute: attribute.to_string(),
            features,
            classes,
            breaks,
        })
    }
}

/// Classified raw layers, computed once per dataset pair
#[derive(Debug, Clone, PartialEq)]
pub struct BaseLayers {
    pub wells: ClassifiedLayer,
    pub tracts: ClassifiedLayer,
}

/// Output of the interpolation stage
#[derive(Debug, Clone, PartialEq)]
pub struct InterpolatedStage {
    /// Nitrate interpolated onto hexagons
    pub nitrate: Grid,
    pub nitrate_breaks: ClassBreaks,
    /// Cancer rate interpolated onto the point lattice
    pub cancer: Grid,
}

/// Output of the join stage
#[derive(Debug, Clone, PartialEq)]
pub struct JoinedStage {
    pub grid: JoinedGrid,
    /// Breaks over the joined cancer values; `None` when no hexagon
    /// received any
    pub breaks: Option<ClassBreaks>,
}

/// Output of the regression stage
#[derive(Debug, Clone, PartialEq)]
pub struct RegressedStage {
    /// Joined grid with predictions and residuals
    pub grid: JoinedGrid,
    pub model: RegressionModel,
    /// Number of `(nitrate, cancer)` pairs fitted
    pub pairs: usize,
    pub residual_breaks: ClassBreaks,
}

/// Everything derived by one submit
#[derive(Debug, Clone, PartialEq)]
pub struct RunOutput {
    pub params: PipelineParams,
    pub interpolated: InterpolatedStage,
    pub joined: Option<JoinedStage>,
    pub regressed: Option<RegressedStage>,
}

impl RunOutput {
    pub fn state(&self) -> PipelineState {
        if self.regressed.is_some() {
            PipelineState::Regressed
        } else if self.joined.is_some() {
            PipelineState::Joined
        } else {
            PipelineState::Interpolated
        }
    }
}

/// The nitrate/cancer pipeline over one pair of datasets.
///
/// Not reentrant: `submit` and `reset` take `&mut self`.
pub struct Pipeline {
    config: PipelineConfig,
    params: PipelineParams,
    base: BaseLayers,
    wells: Vec<ObservationPoint>,
    tract_centroids: Vec<ObservationPoint>,
    run: Option<RunOutput>,
    observers: Vec<Box<dyn StageObserver>>,
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("config", &self.config)
            .field("params", &self.params)
            .field("state", &self.state())
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl Pipeline {
    /// Build a pipeline with the default configuration
    pub fn new(datasets: Datasets) -> Result<Self> {
        Self::with_config(datasets, PipelineConfig::default())
    }

    /// Build a pipeline: extract tract centroids and classify both raw
    /// layers.
    ///
    /// # Errors
    /// - `InvalidParameter` for an invalid configuration
    /// - `EmptyInput` when either layer has no numeric values to classify
    pub fn with_config(datasets: Datasets, config: PipelineConfig) -> Result<Self> {
        config.validate()?;
        let method = ClassificationMethod::Ckmeans {
            classes: config.class_count,
        };

        let wells = datasets.wells.observation_points();
        let extraction = extract_centroids(&datasets.tracts);
        if extraction.skipped > 0 {
            warn!(skipped = extraction.skipped, "tracts without a usable centroid");
        }

        let base = BaseLayers {
            wells: ClassifiedLayer::classify(datasets.wells, &config.nitrate_attribute, method)?,
            tracts: ClassifiedLayer::classify(datasets.tracts, &config.cancer_attribute, method)?,
        };

        info!(
            wells = wells.len(),
            tracts = extraction.points.len(),
            "pipeline ready"
        );

        Ok(Self {
            params: config.defaults,
            config,
            base,
            wells,
            tract_centroids: extraction.points,
            run: None,
            observers: Vec::new(),
        })
    }

    /// Register an observer for stage events
    pub fn add_observer(&mut self, observer: impl StageObserver + 'static) {
        self.observers.push(Box::new(observer));
    }

    pub fn state(&self) -> PipelineState {
        self.run
            .as_ref()
            .map_or(PipelineState::Initial, RunOutput::state)
    }

    /// Parameters of the current run, or the defaults before the first one
    pub fn params(&self) -> PipelineParams {
        self.params
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn base_layers(&self) -> &BaseLayers {
        &self.base
    }

    /// Tract centroids used as cancer samples
    pub fn tract_centroids(&self) -> &[ObservationPoint] {
        &self.tract_centroids
    }

    pub fn output(&self) -> Option<&RunOutput> {
        self.run.as_ref()
    }

    /// Parse raw form input and submit it.
    ///
    /// Unparsable input is rejected the same way as out-of-range input.
    pub fn submit_raw(&mut self, decay_exponent: &str, cell_area_km2: &str) -> Result<PipelineState> {
        match PipelineParams::parse(decay_exponent, cell_area_km2) {
            Ok(params) => self.submit(params),
            Err(e) => Err(self.reject(e)),
        }
    }

    /// Run every stage for `params`.
    ///
    /// Returns the state reached. A regression that cannot be fitted is not
    /// an error: the run stops at `Joined` and a `RegressionSkipped` event
    /// carries the reason.
    ///
    /// # Errors
    /// - `InvalidParameter`: defaults are restored and the state returns to
    ///   `Initial`
    /// - interpolation failures: the previous run is kept
    /// - join failures: the interpolated grids are committed, the run stops
    ///   at `Interpolated`
    pub fn submit(&mut self, params: PipelineParams) -> Result<PipelineState> {
        if let Err(e) = params.validate() {
            return Err(self.reject(e));
        }
        debug!(
            decay_exponent = params.decay_exponent,
            cell_area_km2 = params.cell_area_km2,
            "submit"
        );

        let interpolated = match self.interpolate(&params) {
            Ok(stage) => stage,
            Err(e) => {
                warn!(error = %e, "interpolation failed, keeping previous output");
                return Err(e);
            }
        };

        let mut run = RunOutput {
            params,
            interpolated,
            joined: None,
            regressed: None,
        };
        let mut failure = None;
        let mut notice = None;

        match self.join(&run.interpolated) {
            Ok(joined) => {
                match self.regress(&joined.grid) {
                    Ok(regressed) => run.regressed = Some(regressed),
                    Err(e) => {
                        warn!(error = %e, "regression skipped");
                        notice = Some(e.to_string());
                    }
                }
                run.joined = Some(joined);
            }
            Err(e) => {
                warn!(error = %e, "join failed");
                failure = Some(e);
            }
        }

        let events = stage_events(&run, notice);
        self.params = params;
        self.run = Some(run);
        for event in &events {
            self.emit(event);
        }

        match failure {
            Some(e) => Err(e),
            None => Ok(self.state()),
        }
    }

    /// Discard all derived grids and restore the default parameters
    pub fn reset(&mut self) {
        self.run = None;
        self.params = self.config.defaults;
        info!("pipeline reset");
        self.emit(&StageEvent::Reset);
    }

    fn reject(&mut self, error: Error) -> Error {
        warn!(error = %error, "parameters rejected, restoring defaults");
        self.run = None;
        self.params = self.config.defaults;
        self.emit(&StageEvent::ParametersRejected {
            message: error.to_string(),
        });
        error
    }

    fn emit(&mut self, event: &StageEvent) {
        for observer in &mut self.observers {
            observer.on_event(event);
        }
    }

    fn method(&self) -> ClassificationMethod {
        ClassificationMethod::Ckmeans {
            classes: self.config.class_count,
        }
    }

    fn interpolate(&self, params: &PipelineParams) -> Result<InterpolatedStage> {
        let nitrate = interpolate(
            &self.wells,
            &self.config.nitrate_attribute,
            &params.idw_params(GridKind::Hex),
        )?;
        let nitrate_breaks = self.method().breaks(&nitrate.values())?;
        let cancer = interpolate(
            &self.tract_centroids,
            &self.config.cancer_attribute,
            &params.idw_params(GridKind::Point),
        )?;

        debug!(
            hex_cells = nitrate.len(),
            lattice_points = cancer.len(),
            "interpolation stage complete"
        );
        Ok(InterpolatedStage {
            nitrate,
            nitrate_breaks,
            cancer,
        })
    }

    fn join(&self, stage: &InterpolatedStage) -> Result<JoinedStage> {
        let grid = spatial_join(&stage.nitrate, &stage.cancer)?;
        let values = grid.joined_values();
        let breaks = if values.is_empty() {
            None
        } else {
            Some(self.method().breaks(&values)?)
        };
        Ok(JoinedStage { grid, breaks })
    }

    fn regress(&self, grid: &JoinedGrid) -> Result<RegressedStage> {
        let pairs = grid.pairs();
        let model = linear_regression(&pairs)?;
        let annotated = apply_model(grid, &model);
        let residual_breaks = ClassificationMethod::DeviationBands.breaks(&annotated.residuals())?;

        info!(
            slope = model.slope,
            intercept = model.intercept,
            r_squared = model.r_squared,
            pairs = pairs.len(),
            "regression fitted"
        );
        Ok(RegressedStage {
            grid: annotated,
            model,
            pairs: pairs.len(),
            residual_breaks,
        })
    }
}

fn stage_events(run: &RunOutput, notice: Option<String>) -> Vec<StageEvent> {
    let mut events = vec![StageEvent::Interpolated {
        hex_cells: run.interpolated.nitrate.len(),
        lattice_points: run.interpolated.cancer.len(),
    }];
    if let Some(joined) = &run.joined {
        events.push(StageEvent::Joined {
            matched_cells: joined.grid.pairs().len(),
        });
    }
    if let Some(regressed) = &run.regressed {
        events.push(StageEvent::Regressed {
            model: regressed.model,
            pairs: regressed.pairs,
        });
    } else if let Some(notice) = notice {
        events.push(StageEvent::RegressionSkipped { notice });
    }
    events
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_names() {
        assert_eq!(PipelineState::Initial.name(), "initial");
        assert_eq!(PipelineState::Regressed.name(), "regressed");
        assert_eq!(
            serde_json::to_string(&PipelineState::Joined).unwrap(),
            "\"joined\""
        );
    }
}
