//! # NitraMap Pipeline
//!
//! Sequences the algorithms over the well and tract datasets:
//!
//! 1. classify the raw layers (once per dataset pair)
//! 2. interpolate nitrate onto hexagons and cancer rate onto a point lattice
//! 3. average the lattice onto the hexagons
//! 4. fit cancer rate against nitrate and classify the residuals
//!
//! ```ignore
//! use nitramap_pipeline::{DatasetSlots, Pipeline, PipelineParams};
//!
//! let mut slots = DatasetSlots::new();
//! slots.provide_tracts(tracts);
//! slots.provide_wells(wells);
//! let mut pipeline = Pipeline::new(slots.into_datasets()?)?;
//! pipeline.submit(PipelineParams::new(2.0, 10.0))?;
//! ```

pub mod config;
pub mod datasets;
pub mod events;
pub mod export;
pub mod orchestrator;

pub use config::{PipelineConfig, PipelineParams};
pub use datasets::{DatasetSlots, Datasets};
pub use events::{EventLog, StageEvent, StageObserver};
pub use export::{
    grid_collection, joined_collection, layer_collection, residual_collection, Layer,
    RegressionSummary,
};
pub use orchestrator::{
    BaseLayers, ClassifiedLayer, InterpolatedStage, JoinedStage, Pipeline, PipelineState,
    RegressedStage, RunOutput,
};
