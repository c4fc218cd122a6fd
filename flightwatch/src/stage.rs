//! Flight stage classification.
//!
//! A flight advances through an ordered sequence of stages, with side
//! transitions for a rejected takeoff and a go-around:
//!
//! ```text
//! BOARDING → PUSHANDTAXI → TAKEOFF → CLIMB → CRUISE
//!                 ▲           │ ▲       │       │ ▲
//!                 │           ▼ │       ▼       ▼ │
//!                 │          RTO        LANDING ◄─ DESCENT
//!                 │                     │  ▲ │
//!                 │                     │  │ ▼
//!                 │                     │  GOAROUND
//!                 ▼                     ▼
//!               PARKING ◄─ TAXIAFTERLAND
//!                 │
//!                 ▼
//!                END
//! ```
//!
//! [`next_stage`] is a pure function over one sample; the stage checker in
//! the pipeline applies it and owns the side effects (logging, flare
//! bookkeeping, end notification). `End` is absorbing.

use crate::state::AircraftState;

/// Named phase of flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    /// Parked at the gate before pushback.
    Boarding,
    /// Pushback and taxi to the runway.
    PushAndTaxi,
    /// Takeoff roll and initial rotation.
    Takeoff,
    /// Rejected takeoff, back to taxi speed on the ground.
    Rto,
    /// Initial climb to cruise.
    Climb,
    /// Level flight near the filed cruise altitude.
    Cruise,
    /// Descent from cruise.
    Descent,
    /// Final approach with gear down.
    Landing,
    /// Aborted approach, climbing out.
    GoAround,
    /// Rollout and taxi to the stand.
    TaxiAfterLand,
    /// Parked after the flight.
    Parking,
    /// Flight is over; terminal.
    End,
}

impl Stage {
    /// Stage assigned when the first sample of a session arrives.
    pub fn initial() -> Self {
        Stage::Boarding
    }

    /// Whether this stage is terminal.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Stage::End)
    }

    /// Canonical upper-case name used in flight log stage lines.
    pub fn log_name(&self) -> &'static str {
        match self {
            Stage::Boarding => "BOARDING",
            Stage::PushAndTaxi => "PUSHANDTAXI",
            Stage::Takeoff => "TAKEOFF",
            Stage::Rto => "RTO",
            Stage::Climb => "CLIMB",
            Stage::Cruise => "CRUISE",
            Stage::Descent => "DESCENT",
            Stage::Landing => "LANDING",
            Stage::GoAround => "GOAROUND",
            Stage::TaxiAfterLand => "TAXIAFTERLAND",
            Stage::Parking => "PARKING",
            Stage::End => "END",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.log_name())
    }
}

/// Evaluate the transition rules for one sample.
///
/// Returns the stage to enter, or `None` when no rule matches. Rules are
/// evaluated in table order; the first match wins.
///
/// # Arguments
///
/// * `current` - Stage before this sample
/// * `state` - The new sample
/// * `cruise_altitude_ft` - Filed cruise altitude
/// * `flight_ended` - The aircraft-defined flight-end predicate, evaluated
///   by the caller (only consulted from `Parking`)
pub fn next_stage(
    current: Stage,
    state: &AircraftState,
    cruise_altitude_ft: f64,
    flight_ended: bool,
) -> Option<Stage> {
    let gears_down = state.gears_are_down();

    match current {
        Stage::Boarding => {
            if !state.parking || (!state.trick_mode && state.ground_speed > 5.0) {
                return Some(Stage::PushAndTaxi);
            }
        }
        Stage::PushAndTaxi | Stage::Rto => {
            if state.landing_lights_on || state.strobe_lights_on || state.ground_speed > 80.0 {
                return Some(Stage::Takeoff);
            }
        }
        Stage::Takeoff => {
            if !gears_down || (state.radio_altitude > 3000.0 && state.vs > 0.0) {
                return Some(Stage::Climb);
            }
            if !state.landing_lights_on
                && !state.strobe_lights_on
                && state.on_the_ground
                && state.ground_speed < 50.0
            {
                return Some(Stage::Rto);
            }
        }
        Stage::Climb => {
            if state.altitude + 2000.0 > cruise_altitude_ft {
                return Some(Stage::Cruise);
            }
            if state.radio_altitude < 2000.0 && state.vs < 0.0 && gears_down {
                return Some(Stage::Landing);
            }
        }
        Stage::Cruise => {
            if state.altitude + 2000.0 < cruise_altitude_ft {
                return Some(Stage::Descent);
            }
        }
        Stage::Descent | Stage::GoAround => {
            // Descending with gear out is the approach; a level or climbing
            // go-around with the gear cycled back down stays where it is.
            if gears_down && state.radio_altitude < 2000.0 && state.vs < 0.0 {
                return Some(Stage::Landing);
            }
            if state.altitude + 2000.0 > cruise_altitude_ft {
                return Some(Stage::Cruise);
            }
        }
        Stage::Landing => {
            if state.on_the_ground && state.ground_speed < 50.0 {
                return Some(Stage::TaxiAfterLand);
            }
            if !gears_down {
                return Some(Stage::GoAround);
            }
        }
        Stage::TaxiAfterLand => {
            if state.parking {
                return Some(Stage::Parking);
            }
        }
        Stage::Parking => {
            if flight_ended {
                return Some(Stage::End);
            }
        }
        Stage::End => {}
    }

    None
}
