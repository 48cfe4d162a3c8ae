//! Stage-completion events
//!
//! The orchestrator only produces data. Renderers register a
//! [`StageObserver`] and redraw when a stage commits.

use std::cell::RefCell;
use std::rc::Rc;

use nitramap_algorithms::statistics::RegressionModel;

/// Something the orchestrator just did
#[derive(Debug, Clone, PartialEq)]
pub enum StageEvent {
    /// Derived grids were discarded and defaults restored
    Reset,
    /// Nitrate hexagons and cancer lattice were rebuilt
    Interpolated { hex_cells: usize, lattice_points: usize },
    /// Cancer values were averaged onto the nitrate hexagons
    Joined { matched_cells: usize },
    /// A regression model was fitted and residuals computed
    Regressed { model: RegressionModel, pairs: usize },
    /// Input parameters were refused; defaults were restored
    ParametersRejected { message: String },
    /// The regression could not be fitted; the joined grid stays current
    RegressionSkipped { notice: String },
}

pub trait StageObserver {
    fn on_event(&mut self, event: &StageEvent);
}

impl<T: StageObserver> StageObserver for Rc<RefCell<T>> {
    fn on_event(&mut self, event: &StageEvent) {
        self.borrow_mut().on_event(event)
    }
}

/// Observer that records every event in order
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    pub events: Vec<StageEvent>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drain the recorded events
    pub fn take(&mut self) -> Vec<StageEvent> {
        std::mem::take(&mut self.events)
    }
}

impl StageObserver for EventLog {
    fn on_event(&mut self, event: &StageEvent) {
        self.events.push(event.clone());
    }
}
