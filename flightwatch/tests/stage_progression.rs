//! Full-flight integration tests: the checker pipeline driving the stage
//! machine through complete sample sequences.

use flightwatch::aircraft::{Aircraft, GenericAircraft};
use flightwatch::checkers::CheckerPipeline;
use flightwatch::config::{FlareTimeSource, FlightConfig};
use flightwatch::flight::Flight;
use flightwatch::logger::FlightLogger;
use flightwatch::stage::Stage;
use flightwatch::state::AircraftState;

struct Session {
    pipeline: CheckerPipeline,
    flight: Flight,
    logger: FlightLogger,
    aircraft: GenericAircraft,
}

impl Session {
    fn new(config: FlightConfig) -> Self {
        let aircraft = GenericAircraft::new();
        Self {
            pipeline: CheckerPipeline::standard(&aircraft),
            flight: Flight::new(config),
            logger: FlightLogger::new(),
            aircraft,
        }
    }

    fn feed(&mut self, state: AircraftState) {
        self.pipeline
            .handle_sample(&mut self.flight, &self.aircraft, &mut self.logger, state);
    }

    fn stage_lines(&self) -> Vec<String> {
        self.logger
            .lines()
            .iter()
            .filter(|l| l.text.starts_with("--- "))
            .map(|l| l.text.clone())
            .collect()
    }
}

#[test]
fn test_complete_flight() {
    let mut session = Session::new(FlightConfig {
        flare_time_source: FlareTimeSource::Simulator,
        ..FlightConfig::default()
    });

    // At the gate.
    session.feed(AircraftState::parked(0.0));

    // Pushback.
    let mut taxi = AircraftState::parked(10.0);
    taxi.parking = false;
    taxi.ground_speed = 8.0;
    session.feed(taxi.clone());

    // Lights on, lined up.
    let mut lineup = taxi.advanced(20.0);
    lineup.ground_speed = 4.0;
    lineup.strobe_lights_on = true;
    lineup.landing_lights_on = true;
    session.feed(lineup.clone());

    // Takeoff roll.
    let mut roll = lineup.advanced(30.0);
    roll.ground_speed = 140.0;
    roll.ias = 135.0;
    session.feed(roll.clone());

    // Airborne, gear up.
    let mut climb = roll.advanced(40.0);
    climb.on_the_ground = false;
    climb.gears_down = 0.0;
    climb.gear_control_down = false;
    climb.ias = 180.0;
    climb.ground_speed = 190.0;
    climb.vs = 2500.0;
    climb.radio_altitude = 500.0;
    climb.altitude = 2000.0;
    climb.pitot_heat_on = true;
    session.feed(climb.clone());

    // Level near the filed altitude.
    let mut cruise = climb.advanced(50.0);
    cruise.vs = 0.0;
    cruise.altitude = 16500.0;
    cruise.radio_altitude = 16000.0;
    session.feed(cruise.clone());

    // Down again.
    let mut descent = cruise.advanced(60.0);
    descent.vs = -1800.0;
    descent.altitude = 12000.0;
    descent.radio_altitude = 11000.0;
    session.feed(descent.clone());

    // Gear out on the approach.
    let mut approach = descent.advanced(70.0);
    approach.gears_down = 1.0;
    approach.gear_control_down = true;
    approach.vs = -800.0;
    approach.ias = 170.0;
    approach.ground_speed = 175.0;
    approach.altitude = 3000.0;
    approach.radio_altitude = 1500.0;
    session.feed(approach.clone());

    // Short final: the flare begins below 150 ft.
    let mut flare = approach.advanced(80.0);
    flare.vs = -600.0;
    flare.smoothed_vs = -250.0;
    flare.ias = 140.0;
    flare.ground_speed = 145.0;
    flare.altitude = 1600.0;
    flare.radio_altitude = 100.0;
    session.feed(flare.clone());

    // Touchdown and rollout below taxi speed.
    let mut rollout = flare.advanced(84.0);
    rollout.on_the_ground = true;
    rollout.vs = 0.0;
    rollout.smoothed_vs = 0.0;
    rollout.ias = 35.0;
    rollout.ground_speed = 40.0;
    rollout.altitude = 1500.0;
    rollout.radio_altitude = 0.0;
    session.feed(rollout.clone());

    // Parked at the stand, engines winding down.
    let mut stand = rollout.advanced(90.0);
    stand.parking = true;
    stand.ground_speed = 0.0;
    stand.ias = 0.0;
    stand.strobe_lights_on = false;
    stand.landing_lights_on = false;
    stand.n1 = Some(vec![30.0, 30.0]);
    session.feed(stand.clone());

    // Engines stopped: flight over.
    let mut cold = stand.advanced(100.0);
    cold.n1 = Some(vec![0.0, 0.0]);
    session.feed(cold);

    assert_eq!(
        session.stage_lines(),
        vec![
            "--- BOARDING ---",
            "--- PUSHANDTAXI ---",
            "--- TAKEOFF ---",
            "--- CLIMB ---",
            "--- CRUISE ---",
            "--- DESCENT ---",
            "--- LANDING ---",
            "--- TAXIAFTERLAND ---",
            "--- PARKING ---",
            "--- END ---",
        ]
    );

    // A clean flight keeps the full rating.
    assert_eq!(session.logger.score(), 100.0);
    assert!(!session.logger.is_no_go());

    assert_eq!(session.flight.block_start(), Some(10.0));
    assert_eq!(session.flight.flight_start(), Some(20.0));
    assert_eq!(session.flight.flight_end(), Some(84.0));
    assert_eq!(session.flight.block_end(), Some(100.0));

    // Flare from 80.0 to touchdown at 84.0, simulator time base.
    assert!(session
        .logger
        .lines()
        .iter()
        .any(|l| l.text == "Flare time: 4.0 s"));

    assert!(session.flight.end_handle().is_ended());
}

#[test]
fn test_rejected_takeoff_cycle() {
    let mut session = Session::new(FlightConfig::default());

    session.feed(AircraftState::parked(0.0));

    let mut taxi = AircraftState::parked(10.0);
    taxi.parking = false;
    taxi.ground_speed = 10.0;
    session.feed(taxi.clone());

    // First attempt: rolling fast with lights on.
    let mut roll = taxi.advanced(20.0);
    roll.strobe_lights_on = true;
    roll.landing_lights_on = true;
    roll.ground_speed = 90.0;
    roll.ias = 85.0;
    session.feed(roll.clone());
    assert_eq!(session.flight.stage(), Some(Stage::Takeoff));

    // Aborted: lights out, slowed below 50 kt on the ground.
    let mut abort = roll.advanced(30.0);
    abort.strobe_lights_on = false;
    abort.landing_lights_on = false;
    abort.ground_speed = 35.0;
    abort.ias = 30.0;
    session.feed(abort.clone());
    assert_eq!(session.flight.stage(), Some(Stage::Rto));

    // Second attempt from the RTO state.
    let mut again = abort.advanced(40.0);
    again.strobe_lights_on = true;
    again.landing_lights_on = true;
    again.ground_speed = 95.0;
    again.ias = 90.0;
    session.feed(again);
    assert_eq!(session.flight.stage(), Some(Stage::Takeoff));

    assert_eq!(
        session.stage_lines(),
        vec![
            "--- BOARDING ---",
            "--- PUSHANDTAXI ---",
            "--- TAKEOFF ---",
            "--- RTO ---",
            "--- TAKEOFF ---",
        ]
    );
    assert_eq!(session.logger.score(), 100.0);

    // TAKEOFF was entered twice; the flight time reference keeps the first.
    assert_eq!(session.flight.flight_start(), Some(20.0));
}

#[test]
fn test_goaround_with_gear_back_down_stays_goaround() {
    let mut session = Session::new(FlightConfig::default());

    session.feed(AircraftState::parked(0.0));

    // Approach configuration.
    let mut approach = AircraftState::parked(10.0);
    approach.parking = false;
    approach.on_the_ground = false;
    approach.gears_down = 1.0;
    approach.vs = -750.0;
    approach.ias = 150.0;
    approach.ground_speed = 155.0;
    approach.altitude = 2500.0;
    approach.radio_altitude = 1200.0;
    approach.pitot_heat_on = true;
    session.feed(approach.clone()); // BOARDING -> PUSHANDTAXI rule won't fire airborne...

    // Walk the machine to LANDING through its normal path.
    session.flight.set_stage(10.0, Stage::Landing, &mut session.logger);

    // Gear retracting: go-around.
    let mut climb_out = approach.advanced(20.0);
    climb_out.gears_down = 0.3;
    climb_out.vs = 1800.0;
    climb_out.radio_altitude = 900.0;
    session.feed(climb_out.clone());
    assert_eq!(session.flight.stage(), Some(Stage::GoAround));

    // Gear cycled back down, level at pattern height: still the go-around,
    // not a new approach.
    let mut level = climb_out.advanced(30.0);
    level.gears_down = 1.0;
    level.vs = 0.0;
    level.radio_altitude = 1500.0;
    level.altitude = 2800.0;
    session.feed(level.clone());
    assert_eq!(session.flight.stage(), Some(Stage::GoAround));

    // Descending again with gear down: the second approach.
    let mut second = level.advanced(40.0);
    second.vs = -700.0;
    second.radio_altitude = 1400.0;
    session.feed(second);
    assert_eq!(session.flight.stage(), Some(Stage::Landing));
}

#[test]
fn test_flight_end_predicate_consulted_only_in_parking() {
    let aircraft = GenericAircraft::new();
    let flight = Flight::new(FlightConfig::default());

    // Cold and dark at the gate would satisfy the predicate...
    let parked = AircraftState::parked(0.0);
    assert!(aircraft.flight_ended(&flight, &parked));

    // ...but a fresh session still starts at BOARDING, not END.
    let mut session = Session::new(FlightConfig::default());
    session.feed(parked.clone());
    session.feed(parked.advanced(1.0));
    assert_eq!(session.flight.stage(), Some(Stage::Boarding));
}
