//! The stage checker.
//!
//! Runs first in the pipeline: assigns BOARDING on the first sample of the
//! session, evaluates the transition table once per sample, and owns the
//! flare bookkeeping while on final approach.

use crate::aircraft::Aircraft;
use crate::flight::Flight;
use crate::logger::FlightLogger;
use crate::stage::{next_stage, Stage};
use crate::state::AircraftState;

use super::StateChecker;

/// Radio altitude above which an armed flare is cancelled.
const FLARE_CANCEL_FT: f64 = 200.0;

/// Radio altitude below which the flare begins.
const FLARE_BEGIN_FT: f64 = 150.0;

pub struct StageChecker;

impl StageChecker {
    pub fn new() -> Self {
        Self
    }
}

impl Default for StageChecker {
    fn default() -> Self {
        Self::new()
    }
}

impl StateChecker for StageChecker {
    fn name(&self) -> &str {
        "stage"
    }

    fn check(
        &mut self,
        flight: &mut Flight,
        aircraft: &dyn Aircraft,
        logger: &mut FlightLogger,
        _previous: Option<&AircraftState>,
        current: &AircraftState,
    ) {
        let timestamp = current.timestamp;

        let Some(stage) = flight.stage() else {
            flight.set_stage(timestamp, Stage::initial(), logger);
            return;
        };

        let ended = aircraft.flight_ended(flight, current);
        let cruise = flight.config().cruise_altitude_ft;
        if let Some(next) = next_stage(stage, current, cruise, ended) {
            flight.set_stage(timestamp, next, logger);
        }

        // Touchdown ends a timed flare even when the same sample also left
        // the LANDING stage.
        if flight.flare_active() && current.on_the_ground {
            if let Some(duration) = flight.complete_flare(timestamp) {
                logger.message(timestamp, &format!("Flare time: {duration:.1} s"));
            }
        }

        if flight.stage() == Some(Stage::Landing) && !current.on_the_ground {
            if current.radio_altitude > FLARE_CANCEL_FT {
                flight.cancel_flare();
            } else if current.radio_altitude < FLARE_BEGIN_FT {
                // Only the first qualifying sample of the episode latches
                // the references.
                flight.begin_flare(timestamp);
            }
        }
    }
}
