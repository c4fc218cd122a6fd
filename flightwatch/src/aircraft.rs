//! Aircraft profiles.
//!
//! An [`Aircraft`] contributes the type-specific pieces of monitoring: its
//! limits, its fault detectors, and the end-of-flight predicate the stage
//! machine consults. [`GenericAircraft`] is the profile used when nothing
//! more specific is known about the airframe.

use crate::checkers::{
    BankChecker, GearSpeedChecker, HardLandingChecker, OverspeedChecker, PitotHeatChecker,
    ReverserChecker, StallChecker, StateChecker, TakeoffLightsChecker,
};
use crate::flight::Flight;
use crate::state::AircraftState;

/// Default maximum IAS with the gear extended, knots.
const DEFAULT_MAX_GEAR_EXTENDED_IAS: f64 = 250.0;

/// Type-specific monitoring profile.
pub trait Aircraft: Send + Sync {
    /// Human-readable type name for logs and reports.
    fn name(&self) -> &str;

    /// Maximum IAS with the gear extended, knots.
    fn max_gear_extended_ias(&self) -> f64 {
        DEFAULT_MAX_GEAR_EXTENDED_IAS
    }

    /// Whether the flight is over.
    ///
    /// Consulted on every sample while in PARKING; returning `true` moves
    /// the stage machine to the terminal stage.
    fn flight_ended(&self, flight: &Flight, state: &AircraftState) -> bool;

    /// The fault detectors this type contributes to the pipeline.
    fn checkers(&self) -> Vec<Box<dyn StateChecker>>;
}

/// Profile used when no type-specific one is registered.
///
/// The flight is over once the parking brake is set and all engines have
/// stopped; the full standard fault battery applies.
#[derive(Debug, Default)]
pub struct GenericAircraft;

impl GenericAircraft {
    pub fn new() -> Self {
        Self
    }
}

impl Aircraft for GenericAircraft {
    fn name(&self) -> &str {
        "generic"
    }

    fn flight_ended(&self, _flight: &Flight, state: &AircraftState) -> bool {
        state.parking && state.engines_stopped()
    }

    fn checkers(&self) -> Vec<Box<dyn StateChecker>> {
        vec![
            Box::new(OverspeedChecker::new()),
            Box::new(StallChecker::new()),
            Box::new(BankChecker::new()),
            Box::new(HardLandingChecker::new()),
            Box::new(GearSpeedChecker::new()),
            Box::new(PitotHeatChecker::new()),
            Box::new(ReverserChecker::new()),
            Box::new(TakeoffLightsChecker::new()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FlightConfig;

    #[test]
    fn test_generic_flight_ended() {
        let aircraft = GenericAircraft::new();
        let flight = Flight::new(FlightConfig::default());

        let mut parked = AircraftState::parked(10.0);
        parked.n1 = Some(vec![0.0, 0.0]);
        assert!(aircraft.flight_ended(&flight, &parked));

        let mut running = parked.clone();
        running.n1 = Some(vec![24.0, 23.0]);
        assert!(!aircraft.flight_ended(&flight, &running));

        let mut rolling = parked.clone();
        rolling.parking = false;
        assert!(!aircraft.flight_ended(&flight, &rolling));
    }

    #[test]
    fn test_generic_checker_battery() {
        let aircraft = GenericAircraft::new();
        let checkers = aircraft.checkers();
        assert_eq!(checkers.len(), 8);
    }

    #[test]
    fn test_default_gear_speed_limit() {
        let aircraft = GenericAircraft::new();
        assert_eq!(aircraft.max_gear_extended_ias(), 250.0);
    }
}
