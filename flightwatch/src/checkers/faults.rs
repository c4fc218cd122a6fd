//! Fault detectors.
//!
//! Each detector watches one hazard across consecutive samples and reports
//! it to the [`FlightLogger`] as a fault or a no-go. Detectors are
//! edge-triggered: a sustained condition is reported once per episode, not
//! once per sample.
//!
//! Entrance-exam mode widens the bank and touchdown vertical-speed margins
//! by 25%; every other limit is unaffected.

use crate::aircraft::Aircraft;
use crate::flight::Flight;
use crate::logger::FlightLogger;
use crate::stage::Stage;
use crate::state::AircraftState;

use super::change::{ChangeDetector, ChangeOutcome, ChangePolicy, Observed};
use super::StateChecker;

/// Score decrement for an overspeed episode.
const OVERSPEED_PENALTY: f64 = 20.0;

/// Score decrement for a stall with ground clearance.
const STALL_PENALTY: f64 = 40.0;

/// Ground clearance below which a stall is unrecoverable.
const STALL_NO_GO_FT: f64 = 50.0;

/// Bank angle that logs a fault.
const BANK_FAULT_DEG: f64 = 35.0;

/// Bank angle that is a no-go close to the ground.
const BANK_NO_GO_DEG: f64 = 45.0;

const BANK_PENALTY: f64 = 5.0;

/// Touchdown sink rate that starts faulting, ft/min.
const HARD_LANDING_FAULT_FPM: f64 = 500.0;

/// Touchdown sink rate that is a no-go, ft/min.
const HARD_LANDING_NO_GO_FPM: f64 = 1000.0;

const GEAR_SPEED_PENALTY: f64 = 10.0;

/// Debounce for the gear speed-limit condition.
const GEAR_SPEED_DELAY_SECS: f64 = 2.0;

const PITOT_HEAT_PENALTY: f64 = 5.0;

/// Debounce for the pitot-heat condition.
const PITOT_HEAT_DELAY_SECS: f64 = 10.0;

/// IAS above which flying without pitot heat is faulted.
const PITOT_HEAT_IAS_KT: f64 = 100.0;

const TAKEOFF_LIGHTS_PENALTY: f64 = 3.0;

/// Ground speed at which the takeoff roll counts as started.
const TAKEOFF_ROLL_KT: f64 = 50.0;

/// Margin multiplier for the relaxed limits in entrance-exam mode.
fn exam_margin(flight: &Flight) -> f64 {
    if flight.config().entrance_exam {
        1.25
    } else {
        1.0
    }
}

/// Reports the simulator's overspeed warning, once per episode.
#[derive(Debug, Default)]
pub struct OverspeedChecker {
    active: bool,
}

impl OverspeedChecker {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StateChecker for OverspeedChecker {
    fn name(&self) -> &str {
        "overspeed"
    }

    fn check(
        &mut self,
        _flight: &mut Flight,
        _aircraft: &dyn Aircraft,
        logger: &mut FlightLogger,
        _previous: Option<&AircraftState>,
        current: &AircraftState,
    ) {
        if current.overspeed && !self.active {
            logger.fault(current.timestamp, "Overspeed", OVERSPEED_PENALTY);
        }
        self.active = current.overspeed;
    }
}

/// Reports the simulator's stall warning.
///
/// A stall with less than 50 ft of ground clearance is unrecoverable and
/// ends the rating; higher up it costs points.
#[derive(Debug, Default)]
pub struct StallChecker {
    active: bool,
}

impl StallChecker {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StateChecker for StallChecker {
    fn name(&self) -> &str {
        "stall"
    }

    fn check(
        &mut self,
        _flight: &mut Flight,
        _aircraft: &dyn Aircraft,
        logger: &mut FlightLogger,
        _previous: Option<&AircraftState>,
        current: &AircraftState,
    ) {
        let stalled = current.stalled && !current.on_the_ground;
        if stalled && !self.active {
            if current.radio_altitude < STALL_NO_GO_FT {
                logger.no_go(
                    current.timestamp,
                    &format!("Stalled at {:.0} feet", current.radio_altitude),
                );
            } else {
                logger.fault(current.timestamp, "Stalled", STALL_PENALTY);
            }
        }
        self.active = stalled;
    }
}

/// Excessive bank angle.
///
/// Over 35° logs a fault once per episode; over 45° during TAKEOFF or
/// LANDING is a no-go. Entrance-exam mode widens both limits.
#[derive(Debug, Default)]
pub struct BankChecker {
    active: bool,
    no_go_reported: bool,
}

impl BankChecker {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StateChecker for BankChecker {
    fn name(&self) -> &str {
        "bank"
    }

    fn check(
        &mut self,
        flight: &mut Flight,
        _aircraft: &dyn Aircraft,
        logger: &mut FlightLogger,
        _previous: Option<&AircraftState>,
        current: &AircraftState,
    ) {
        let margin = exam_margin(flight);
        let bank = current.bank.abs();

        let near_ground = matches!(flight.stage(), Some(Stage::Takeoff | Stage::Landing));
        if near_ground && bank > BANK_NO_GO_DEG * margin && !self.no_go_reported {
            logger.no_go(
                current.timestamp,
                &format!("Bank {bank:.0} degrees close to the ground"),
            );
            self.no_go_reported = true;
        }

        let excessive = bank > BANK_FAULT_DEG * margin;
        if excessive && !self.active {
            logger.fault(current.timestamp, "Excessive bank", BANK_PENALTY);
        }
        self.active = excessive;
    }
}

/// Touchdown sink rate.
///
/// Fires on the airborne-to-ground transition during LANDING or
/// TAXIAFTERLAND, using the smoothed vertical speed of the last airborne
/// sample. The fault grows linearly from 10 points at the fault limit to
/// 40 at the no-go limit.
#[derive(Debug, Default)]
pub struct HardLandingChecker;

impl HardLandingChecker {
    pub fn new() -> Self {
        Self
    }
}

impl StateChecker for HardLandingChecker {
    fn name(&self) -> &str {
        "hard-landing"
    }

    fn check(
        &mut self,
        flight: &mut Flight,
        _aircraft: &dyn Aircraft,
        logger: &mut FlightLogger,
        previous: Option<&AircraftState>,
        current: &AircraftState,
    ) {
        let Some(previous) = previous else {
            return;
        };
        if previous.on_the_ground || !current.on_the_ground {
            return;
        }
        if !matches!(flight.stage(), Some(Stage::Landing | Stage::TaxiAfterLand)) {
            return;
        }

        let margin = exam_margin(flight);
        let fault_limit = HARD_LANDING_FAULT_FPM * margin;
        let no_go_limit = HARD_LANDING_NO_GO_FPM * margin;
        let sink = -previous.smoothed_vs;

        if sink > no_go_limit {
            logger.no_go(
                current.timestamp,
                &format!("Crashed into the runway at {sink:.0} ft/min"),
            );
        } else if sink > fault_limit {
            let penalty = 10.0 + 30.0 * (sink - fault_limit) / (no_go_limit - fault_limit);
            logger.fault(
                current.timestamp,
                &format!("Hard landing at {sink:.0} ft/min"),
                penalty.round(),
            );
        }
    }
}

/// Gear extended above the aircraft's gear speed limit.
///
/// The condition is debounced for 2 seconds of sample time so a momentary
/// gust through the limit does not fault.
pub struct GearSpeedChecker {
    condition: ChangeDetector,
}

impl GearSpeedChecker {
    pub fn new() -> Self {
        Self {
            condition: ChangeDetector::new(ChangePolicy::Delayed {
                delay: GEAR_SPEED_DELAY_SECS,
            }),
        }
    }
}

impl Default for GearSpeedChecker {
    fn default() -> Self {
        Self::new()
    }
}

impl StateChecker for GearSpeedChecker {
    fn name(&self) -> &str {
        "gear-speed"
    }

    fn check(
        &mut self,
        _flight: &mut Flight,
        aircraft: &dyn Aircraft,
        logger: &mut FlightLogger,
        _previous: Option<&AircraftState>,
        current: &AircraftState,
    ) {
        let violating = current.gears_are_down() && current.ias > aircraft.max_gear_extended_ias();
        let outcome = self
            .condition
            .observe(current.timestamp, Observed::Bool(violating));
        if outcome == ChangeOutcome::Changed && violating {
            logger.fault(
                current.timestamp,
                &format!("Gear extended at {:.0} knots", current.ias),
                GEAR_SPEED_PENALTY,
            );
        }
    }
}

/// Pitot heat off while airborne above 100 kt, debounced 10 seconds.
pub struct PitotHeatChecker {
    condition: ChangeDetector,
}

impl PitotHeatChecker {
    pub fn new() -> Self {
        Self {
            condition: ChangeDetector::new(ChangePolicy::Delayed {
                delay: PITOT_HEAT_DELAY_SECS,
            }),
        }
    }
}

impl Default for PitotHeatChecker {
    fn default() -> Self {
        Self::new()
    }
}

impl StateChecker for PitotHeatChecker {
    fn name(&self) -> &str {
        "pitot-heat"
    }

    fn check(
        &mut self,
        _flight: &mut Flight,
        _aircraft: &dyn Aircraft,
        logger: &mut FlightLogger,
        _previous: Option<&AircraftState>,
        current: &AircraftState,
    ) {
        let violating =
            !current.on_the_ground && current.ias > PITOT_HEAT_IAS_KT && !current.pitot_heat_on;
        let outcome = self
            .condition
            .observe(current.timestamp, Observed::Bool(violating));
        if outcome == ChangeOutcome::Changed && violating {
            logger.fault(current.timestamp, "Pitot heat off", PITOT_HEAT_PENALTY);
        }
    }
}

/// Reverser deployed while airborne.
#[derive(Debug, Default)]
pub struct ReverserChecker {
    reported: bool,
}

impl ReverserChecker {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StateChecker for ReverserChecker {
    fn name(&self) -> &str {
        "reverser"
    }

    fn check(
        &mut self,
        _flight: &mut Flight,
        _aircraft: &dyn Aircraft,
        logger: &mut FlightLogger,
        _previous: Option<&AircraftState>,
        current: &AircraftState,
    ) {
        if self.reported || current.on_the_ground {
            return;
        }
        if current.reverser_deployed() {
            logger.no_go(current.timestamp, "Reverser deployed while airborne");
            self.reported = true;
        }
    }
}

/// Light discipline on the takeoff roll.
///
/// Once the aircraft accelerates through 50 kt on the runway during
/// TAKEOFF, strobe and landing lights must be on; each dark set costs
/// 3 points, once per flight.
#[derive(Debug, Default)]
pub struct TakeoffLightsChecker {
    strobe_reported: bool,
    landing_reported: bool,
}

impl TakeoffLightsChecker {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StateChecker for TakeoffLightsChecker {
    fn name(&self) -> &str {
        "takeoff-lights"
    }

    fn check(
        &mut self,
        flight: &mut Flight,
        _aircraft: &dyn Aircraft,
        logger: &mut FlightLogger,
        _previous: Option<&AircraftState>,
        current: &AircraftState,
    ) {
        if flight.stage() != Some(Stage::Takeoff)
            || !current.on_the_ground
            || current.ground_speed <= TAKEOFF_ROLL_KT
        {
            return;
        }

        if !current.strobe_lights_on && !self.strobe_reported {
            logger.fault(
                current.timestamp,
                "Strobe lights off on the takeoff roll",
                TAKEOFF_LIGHTS_PENALTY,
            );
            self.strobe_reported = true;
        }
        if !current.landing_lights_on && !self.landing_reported {
            logger.fault(
                current.timestamp,
                "Landing lights off on the takeoff roll",
                TAKEOFF_LIGHTS_PENALTY,
            );
            self.landing_reported = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aircraft::GenericAircraft;
    use crate::config::FlightConfig;

    fn feed(
        checker: &mut dyn StateChecker,
        flight: &mut Flight,
        logger: &mut FlightLogger,
        previous: Option<&AircraftState>,
        current: &AircraftState,
    ) {
        let aircraft = GenericAircraft::default();
        checker.check(flight, &aircraft, logger, previous, current);
    }

    #[test]
    fn test_overspeed_once_per_episode() {
        let mut checker = OverspeedChecker::new();
        let mut flight = Flight::new(FlightConfig::default());
        let mut logger = FlightLogger::new();

        let mut fast = AircraftState::parked(10.0);
        fast.overspeed = true;
        feed(&mut checker, &mut flight, &mut logger, None, &fast);
        feed(&mut checker, &mut flight, &mut logger, None, &fast.advanced(11.0));
        assert_eq!(logger.score(), 80.0);
        assert_eq!(logger.lines().len(), 1);

        // Clearing and re-entering the condition is a new episode.
        let mut ok = fast.advanced(12.0);
        ok.overspeed = false;
        feed(&mut checker, &mut flight, &mut logger, None, &ok);
        feed(&mut checker, &mut flight, &mut logger, None, &fast.advanced(13.0));
        assert_eq!(logger.score(), 60.0);
    }

    #[test]
    fn test_stall_high_is_fault() {
        let mut checker = StallChecker::new();
        let mut flight = Flight::new(FlightConfig::default());
        let mut logger = FlightLogger::new();

        let mut stalled = AircraftState::parked(10.0);
        stalled.on_the_ground = false;
        stalled.stalled = true;
        stalled.radio_altitude = 3000.0;
        feed(&mut checker, &mut flight, &mut logger, None, &stalled);

        assert_eq!(logger.score(), 60.0);
        assert!(!logger.is_no_go());
    }

    #[test]
    fn test_stall_low_is_no_go() {
        let mut checker = StallChecker::new();
        let mut flight = Flight::new(FlightConfig::default());
        let mut logger = FlightLogger::new();

        let mut stalled = AircraftState::parked(10.0);
        stalled.on_the_ground = false;
        stalled.stalled = true;
        stalled.radio_altitude = 30.0;
        feed(&mut checker, &mut flight, &mut logger, None, &stalled);

        assert!(logger.is_no_go());
        assert_eq!(logger.lines()[0].text, "Stalled at 30 feet (NO GO)");
    }

    #[test]
    fn test_stall_flag_on_ground_ignored() {
        let mut checker = StallChecker::new();
        let mut flight = Flight::new(FlightConfig::default());
        let mut logger = FlightLogger::new();

        let mut parked = AircraftState::parked(10.0);
        parked.stalled = true;
        feed(&mut checker, &mut flight, &mut logger, None, &parked);

        assert_eq!(logger.score(), 100.0);
    }

    #[test]
    fn test_bank_fault_in_cruise() {
        let mut checker = BankChecker::new();
        let mut flight = Flight::new(FlightConfig::default());
        let mut logger = FlightLogger::new();
        flight.set_stage(5.0, Stage::Cruise, &mut logger);

        let mut steep = AircraftState::parked(10.0);
        steep.on_the_ground = false;
        steep.bank = -38.0;
        feed(&mut checker, &mut flight, &mut logger, None, &steep);
        feed(&mut checker, &mut flight, &mut logger, None, &steep.advanced(11.0));

        assert_eq!(logger.score(), 95.0);
        assert!(!logger.is_no_go());
    }

    #[test]
    fn test_bank_no_go_during_landing() {
        let mut checker = BankChecker::new();
        let mut flight = Flight::new(FlightConfig::default());
        let mut logger = FlightLogger::new();
        flight.set_stage(5.0, Stage::Landing, &mut logger);

        let mut steep = AircraftState::parked(10.0);
        steep.on_the_ground = false;
        steep.bank = 50.0;
        feed(&mut checker, &mut flight, &mut logger, None, &steep);

        assert!(logger.is_no_go());
    }

    #[test]
    fn test_bank_relaxed_in_entrance_exam() {
        let mut checker = BankChecker::new();
        let config = FlightConfig {
            entrance_exam: true,
            ..FlightConfig::default()
        };
        let mut flight = Flight::new(config);
        let mut logger = FlightLogger::new();
        flight.set_stage(5.0, Stage::Cruise, &mut logger);

        // 38 degrees is over the normal limit but inside the widened one.
        let mut steep = AircraftState::parked(10.0);
        steep.on_the_ground = false;
        steep.bank = 38.0;
        feed(&mut checker, &mut flight, &mut logger, None, &steep);
        assert_eq!(logger.score(), 100.0);

        let mut steeper = steep.advanced(11.0);
        steeper.bank = 46.0;
        feed(&mut checker, &mut flight, &mut logger, None, &steeper);
        assert_eq!(logger.score(), 95.0);
    }

    fn touchdown_pair(sink_fpm: f64) -> (AircraftState, AircraftState) {
        let mut airborne = AircraftState::parked(100.0);
        airborne.on_the_ground = false;
        airborne.radio_altitude = 5.0;
        airborne.smoothed_vs = -sink_fpm;

        let mut down = airborne.advanced(101.0);
        down.on_the_ground = true;
        down.radio_altitude = 0.0;
        (airborne, down)
    }

    #[test]
    fn test_soft_touchdown_clean() {
        let mut checker = HardLandingChecker::new();
        let mut flight = Flight::new(FlightConfig::default());
        let mut logger = FlightLogger::new();
        flight.set_stage(5.0, Stage::Landing, &mut logger);

        let (airborne, down) = touchdown_pair(180.0);
        feed(&mut checker, &mut flight, &mut logger, Some(&airborne), &down);
        assert_eq!(logger.score(), 100.0);
    }

    #[test]
    fn test_hard_landing_scales_with_sink_rate() {
        let mut checker = HardLandingChecker::new();
        let mut flight = Flight::new(FlightConfig::default());
        let mut logger = FlightLogger::new();
        flight.set_stage(5.0, Stage::Landing, &mut logger);

        // Midway between the limits: 10 + 30 * 0.5 = 25 points.
        let (airborne, down) = touchdown_pair(750.0);
        feed(&mut checker, &mut flight, &mut logger, Some(&airborne), &down);
        assert_eq!(logger.score(), 75.0);
        assert_eq!(logger.lines()[1].text, "Hard landing at 750 ft/min (-25)");
    }

    #[test]
    fn test_crash_landing_is_no_go() {
        let mut checker = HardLandingChecker::new();
        let mut flight = Flight::new(FlightConfig::default());
        let mut logger = FlightLogger::new();
        flight.set_stage(5.0, Stage::Landing, &mut logger);

        let (airborne, down) = touchdown_pair(1200.0);
        feed(&mut checker, &mut flight, &mut logger, Some(&airborne), &down);
        assert!(logger.is_no_go());
    }

    #[test]
    fn test_hard_landing_relaxed_in_entrance_exam() {
        let mut checker = HardLandingChecker::new();
        let config = FlightConfig {
            entrance_exam: true,
            ..FlightConfig::default()
        };
        let mut flight = Flight::new(config);
        let mut logger = FlightLogger::new();
        flight.set_stage(5.0, Stage::Landing, &mut logger);

        // 600 ft/min faults normally but is inside the widened margin.
        let (airborne, down) = touchdown_pair(600.0);
        feed(&mut checker, &mut flight, &mut logger, Some(&airborne), &down);
        assert_eq!(logger.score(), 100.0);
    }

    #[test]
    fn test_hard_landing_ignored_outside_landing_stages() {
        let mut checker = HardLandingChecker::new();
        let mut flight = Flight::new(FlightConfig::default());
        let mut logger = FlightLogger::new();
        flight.set_stage(5.0, Stage::Takeoff, &mut logger);

        let (airborne, down) = touchdown_pair(800.0);
        feed(&mut checker, &mut flight, &mut logger, Some(&airborne), &down);
        assert_eq!(logger.score(), 100.0);
    }

    #[test]
    fn test_gear_speed_debounced() {
        let mut checker = GearSpeedChecker::new();
        let mut flight = Flight::new(FlightConfig::default());
        let mut logger = FlightLogger::new();

        let mut slow = AircraftState::parked(0.0);
        slow.on_the_ground = false;
        slow.ias = 200.0;
        feed(&mut checker, &mut flight, &mut logger, None, &slow);

        // A one-sample excursion through the limit does not fault.
        let mut gust = slow.advanced(1.0);
        gust.ias = 260.0;
        feed(&mut checker, &mut flight, &mut logger, None, &gust);
        feed(&mut checker, &mut flight, &mut logger, None, &slow.advanced(2.0));
        assert_eq!(logger.score(), 100.0);

        // Sustained for over two seconds it does.
        feed(&mut checker, &mut flight, &mut logger, None, &gust.advanced(3.0));
        feed(&mut checker, &mut flight, &mut logger, None, &gust.advanced(6.0));
        assert_eq!(logger.score(), 90.0);
        assert_eq!(logger.lines()[0].text, "Gear extended at 260 knots (-10)");
    }

    #[test]
    fn test_gear_speed_clean_when_gears_up() {
        let mut checker = GearSpeedChecker::new();
        let mut flight = Flight::new(FlightConfig::default());
        let mut logger = FlightLogger::new();

        let mut fast = AircraftState::parked(0.0);
        fast.on_the_ground = false;
        fast.gears_down = 0.0;
        fast.ias = 320.0;
        feed(&mut checker, &mut flight, &mut logger, None, &fast);
        feed(&mut checker, &mut flight, &mut logger, None, &fast.advanced(10.0));

        assert_eq!(logger.score(), 100.0);
    }

    #[test]
    fn test_pitot_heat_debounced() {
        let mut checker = PitotHeatChecker::new();
        let mut flight = Flight::new(FlightConfig::default());
        let mut logger = FlightLogger::new();

        let mut cold = AircraftState::parked(0.0);
        cold.on_the_ground = false;
        cold.ias = 250.0;
        cold.pitot_heat_on = true;
        feed(&mut checker, &mut flight, &mut logger, None, &cold);

        let mut off = cold.advanced(5.0);
        off.pitot_heat_on = false;
        feed(&mut checker, &mut flight, &mut logger, None, &off);
        assert_eq!(logger.score(), 100.0);

        feed(&mut checker, &mut flight, &mut logger, None, &off.advanced(16.0));
        assert_eq!(logger.score(), 95.0);
        assert_eq!(logger.lines()[0].text, "Pitot heat off (-5)");
    }

    #[test]
    fn test_reverser_airborne_no_go() {
        let mut checker = ReverserChecker::new();
        let mut flight = Flight::new(FlightConfig::default());
        let mut logger = FlightLogger::new();

        let mut airborne = AircraftState::parked(10.0);
        airborne.on_the_ground = false;
        airborne.reverser = vec![true, false];
        feed(&mut checker, &mut flight, &mut logger, None, &airborne);
        feed(&mut checker, &mut flight, &mut logger, None, &airborne.advanced(11.0));

        assert!(logger.is_no_go());
        assert_eq!(logger.lines().len(), 1);
    }

    #[test]
    fn test_reverser_on_rollout_fine() {
        let mut checker = ReverserChecker::new();
        let mut flight = Flight::new(FlightConfig::default());
        let mut logger = FlightLogger::new();

        let mut rollout = AircraftState::parked(10.0);
        rollout.ground_speed = 110.0;
        rollout.reverser = vec![true, true];
        feed(&mut checker, &mut flight, &mut logger, None, &rollout);

        assert!(!logger.is_no_go());
        assert!(logger.lines().is_empty());
    }

    #[test]
    fn test_takeoff_lights_faults_each_set_once() {
        let mut checker = TakeoffLightsChecker::new();
        let mut flight = Flight::new(FlightConfig::default());
        let mut logger = FlightLogger::new();
        flight.set_stage(5.0, Stage::Takeoff, &mut logger);

        let mut rolling = AircraftState::parked(10.0);
        rolling.ground_speed = 80.0;
        feed(&mut checker, &mut flight, &mut logger, None, &rolling);
        feed(&mut checker, &mut flight, &mut logger, None, &rolling.advanced(11.0));

        // Strobe and landing lights, 3 points each, reported once.
        assert_eq!(logger.score(), 94.0);
    }

    #[test]
    fn test_takeoff_lights_quiet_when_on() {
        let mut checker = TakeoffLightsChecker::new();
        let mut flight = Flight::new(FlightConfig::default());
        let mut logger = FlightLogger::new();
        flight.set_stage(5.0, Stage::Takeoff, &mut logger);

        let mut rolling = AircraftState::parked(10.0);
        rolling.ground_speed = 80.0;
        rolling.strobe_lights_on = true;
        rolling.landing_lights_on = true;
        feed(&mut checker, &mut flight, &mut logger, None, &rolling);

        assert_eq!(logger.score(), 100.0);
    }

    #[test]
    fn test_takeoff_lights_quiet_while_slow() {
        let mut checker = TakeoffLightsChecker::new();
        let mut flight = Flight::new(FlightConfig::default());
        let mut logger = FlightLogger::new();
        flight.set_stage(5.0, Stage::Takeoff, &mut logger);

        let mut lining_up = AircraftState::parked(10.0);
        lining_up.ground_speed = 20.0;
        feed(&mut checker, &mut flight, &mut logger, None, &lining_up);

        assert_eq!(logger.score(), 100.0);
    }
}
