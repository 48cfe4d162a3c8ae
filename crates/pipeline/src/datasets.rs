//! Readiness barrier for the two input datasets
//!
//! Wells and tracts arrive independently and in either order. A pipeline
//! can only be built once both are present.

use nitramap_core::{Error, FeatureCollection, Result};
use tracing::debug;

/// Both raw input datasets
#[derive(Debug, Clone, PartialEq)]
pub struct Datasets {
    /// Well points carrying the nitrate attribute
    pub wells: FeatureCollection,
    /// Census-tract polygons carrying the cancer-rate attribute
    pub tracts: FeatureCollection,
}

/// Slots filled as each dataset finishes loading
#[derive(Debug, Clone, Default)]
pub struct DatasetSlots {
    wells: Option<FeatureCollection>,
    tracts: Option<FeatureCollection>,
}

impl DatasetSlots {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store the wells, replacing any earlier copy
    pub fn provide_wells(&mut self, wells: FeatureCollection) {
        debug!(features = wells.len(), "wells loaded");
        self.wells = Some(wells);
    }

    /// Store the tracts, replacing any earlier copy
    pub fn provide_tracts(&mut self, tracts: FeatureCollection) {
        debug!(features = tracts.len(), "tracts loaded");
        self.tracts = Some(tracts);
    }

    pub fn is_ready(&self) -> bool {
        self.wells.is_some() && self.tracts.is_some()
    }

    /// Copy of both datasets, or `NotReady` naming the first missing one
    pub fn datasets(&self) -> Result<Datasets> {
        match (&self.wells, &self.tracts) {
            (Some(wells), Some(tracts)) => Ok(Datasets {
                wells: wells.clone(),
                tracts: tracts.clone(),
            }),
            (None, _) => Err(Error::NotReady("wells")),
            (_, None) => Err(Error::NotReady("tracts")),
        }
    }

    /// Both datasets, or `NotReady` naming the first missing one
    pub fn into_datasets(self) -> Result<Datasets> {
        match (self.wells, self.tracts) {
            (Some(wells), Some(tracts)) => Ok(Datasets { wells, tracts }),
            (None, _) => Err(Error::NotReady("wells")),
            (_, None) => Err(Error::NotReady("tracts")),
        }
    }
}

impl TryFrom<DatasetSlots> for Datasets {
    type Error = Error;

    fn try_from(slots: DatasetSlots) -> Result<Self> {
        slots.into_datasets()
    }
}
