//! Flightwatch CLI - Command-line interface
//!
//! Replays a scripted demo flight through the full monitoring stack: the
//! simulator I/O worker reads samples from a replay adapter, the checker
//! pipeline follows the flight through its stages, and the scored flight
//! log is printed at the end.

use std::process;
use std::time::Duration;

use clap::Parser;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use flightwatch::aircraft::GenericAircraft;
use flightwatch::checkers::CheckerPipeline;
use flightwatch::config::{FlareTimeSource, FlightConfig};
use flightwatch::flight::Flight;
use flightwatch::logger::{FlightLogger, MemorySink, TracingSink, NO_GO_SCORE};
use flightwatch::logging;
use flightwatch::sim::{
    PreparedRequest, SimAdapter, SimConnection, SimError, SimHandler, SimListener, SimValue,
    SimVar,
};
use flightwatch::state::AircraftState;

#[derive(Parser)]
#[command(name = "flightwatch")]
#[command(about = "Replay a demo flight and print the scored flight log", long_about = None)]
struct Args {
    /// Filed cruise altitude in feet
    #[arg(long, default_value = "18000")]
    cruise_altitude: f64,

    /// Entrance-exam mode (widened bank and touchdown margins)
    #[arg(long)]
    entrance_exam: bool,

    /// Sample period of the fast-path periodic read, in milliseconds
    #[arg(long, default_value = "250")]
    sample_period_ms: u64,

    /// Directory for diagnostic log files
    #[arg(long, default_value = "logs")]
    log_dir: String,
}

/// Order of the fast-path variables; encode and decode must agree on it.
const FAST_PATH: &[&str] = &[
    "TIMESTAMP",
    "PARKING BRAKE",
    "SIM ON GROUND",
    "GROUND SPEED",
    "AIRSPEED INDICATED",
    "VERTICAL SPEED",
    "VERTICAL SPEED SMOOTHED",
    "ALTITUDE",
    "RADIO HEIGHT",
    "GEAR POSITION",
    "LIGHT STROBE",
    "LIGHT LANDING",
    "PITOT HEAT",
    "KOHLSMAN SETTING",
    "TRANSPONDER CODE",
    "NAV1 ACTIVE FREQUENCY",
    "NAV2 ACTIVE FREQUENCY",
    "PLANE LATITUDE",
    "PLANE LONGITUDE",
    "ENG N1",
];

fn fast_path_request() -> Vec<SimVar> {
    FAST_PATH.iter().map(|name| SimVar::new(*name)).collect()
}

fn encode(state: &AircraftState) -> Vec<SimValue> {
    let n1 = state
        .n1
        .as_ref()
        .and_then(|engines| engines.first().copied())
        .unwrap_or(0.0);
    vec![
        SimValue::Float(state.timestamp),
        SimValue::Bool(state.parking),
        SimValue::Bool(state.on_the_ground),
        SimValue::Float(state.ground_speed),
        SimValue::Float(state.ias),
        SimValue::Float(state.vs),
        SimValue::Float(state.smoothed_vs),
        SimValue::Float(state.altitude),
        SimValue::Float(state.radio_altitude),
        SimValue::Float(state.gears_down),
        SimValue::Bool(state.strobe_lights_on),
        SimValue::Bool(state.landing_lights_on),
        SimValue::Bool(state.pitot_heat_on),
        SimValue::Float(state.altimeter),
        SimValue::Text(state.squawk.clone()),
        SimValue::Text(state.nav1.clone()),
        SimValue::Text(state.nav2.clone()),
        SimValue::Float(state.latitude),
        SimValue::Float(state.longitude),
        SimValue::Float(n1),
    ]
}

fn decode(values: &[SimValue]) -> Option<AircraftState> {
    fn float(value: &SimValue) -> Option<f64> {
        match value {
            SimValue::Float(v) => Some(*v),
            _ => None,
        }
    }
    fn boolean(value: &SimValue) -> Option<bool> {
        match value {
            SimValue::Bool(v) => Some(*v),
            _ => None,
        }
    }
    fn text(value: &SimValue) -> Option<String> {
        match value {
            SimValue::Text(v) => Some(v.clone()),
            _ => None,
        }
    }

    if values.len() != FAST_PATH.len() {
        return None;
    }

    let mut state = AircraftState::parked(float(&values[0])?);
    state.parking = boolean(&values[1])?;
    state.on_the_ground = boolean(&values[2])?;
    state.ground_speed = float(&values[3])?;
    state.ias = float(&values[4])?;
    state.vs = float(&values[5])?;
    state.smoothed_vs = float(&values[6])?;
    state.altitude = float(&values[7])?;
    state.radio_altitude = float(&values[8])?;
    state.gears_down = float(&values[9])?;
    state.strobe_lights_on = boolean(&values[10])?;
    state.landing_lights_on = boolean(&values[11])?;
    state.pitot_heat_on = boolean(&values[12])?;
    state.altimeter = float(&values[13])?;
    state.squawk = text(&values[14])?;
    state.nav1 = text(&values[15])?;
    state.nav2 = text(&values[16])?;
    state.latitude = float(&values[17])?;
    state.longitude = float(&values[18])?;
    let n1 = float(&values[19])?;
    state.n1 = Some(vec![n1, n1]);
    Some(state)
}

/// Replay adapter: serves the scripted samples one per read, holding the
/// last one once the script is exhausted.
struct ReplayAdapter {
    script: Vec<AircraftState>,
    cursor: usize,
}

impl ReplayAdapter {
    fn new(script: Vec<AircraftState>) -> Self {
        Self { script, cursor: 0 }
    }
}

impl SimAdapter for ReplayAdapter {
    async fn open(&mut self) -> Result<SimConnection, SimError> {
        Ok(SimConnection {
            sim_kind: "Replay".into(),
            descriptor: format!("scripted demo flight, {} samples", self.script.len()),
        })
    }

    async fn close(&mut self) {}

    async fn read(&mut self, _request: &PreparedRequest) -> Result<Vec<SimValue>, SimError> {
        let sample = self
            .script
            .get(self.cursor)
            .or_else(|| self.script.last())
            .ok_or(SimError::Read("empty replay script".into()))?;
        let values = encode(sample);
        self.cursor += 1;
        Ok(values)
    }

    async fn write(&mut self, _updates: &[(SimVar, SimValue)]) -> Result<(), SimError> {
        Ok(())
    }
}

struct LogListener;

impl SimListener for LogListener {
    fn connected(&self, connection: &SimConnection) {
        tracing::info!(
            sim = %connection.sim_kind,
            descriptor = %connection.descriptor,
            "Simulator connected"
        );
    }

    fn disconnected(&self) {
        tracing::info!("Simulator disconnected");
    }
}

/// A short but complete flight: LHBP to a nearby field and back to a stand.
fn demo_script() -> Vec<AircraftState> {
    let mut script = Vec::new();

    let mut gate = AircraftState::parked(0.0);
    gate.latitude = 47.4399;
    gate.longitude = 19.2556;
    gate.n1 = Some(vec![22.0, 22.0]);
    script.push(gate.clone());

    let mut taxi = gate.advanced(10.0);
    taxi.parking = false;
    taxi.ground_speed = 12.0;
    script.push(taxi.clone());

    let mut lineup = taxi.advanced(25.0);
    lineup.ground_speed = 5.0;
    lineup.strobe_lights_on = true;
    lineup.landing_lights_on = true;
    lineup.squawk = String::from("2200");
    script.push(lineup.clone());

    let mut roll = lineup.advanced(40.0);
    roll.ground_speed = 145.0;
    roll.ias = 140.0;
    roll.n1 = Some(vec![95.0, 95.0]);
    script.push(roll.clone());

    let mut climb = roll.advanced(55.0);
    climb.on_the_ground = false;
    climb.gears_down = 0.0;
    climb.gear_control_down = false;
    climb.ias = 190.0;
    climb.ground_speed = 200.0;
    climb.vs = 2400.0;
    climb.altitude = 3500.0;
    climb.radio_altitude = 3100.0;
    climb.pitot_heat_on = true;
    climb.latitude = 47.50;
    climb.longitude = 19.10;
    script.push(climb.clone());

    let mut cruise = climb.advanced(120.0);
    cruise.vs = 0.0;
    cruise.altitude = 17000.0;
    cruise.radio_altitude = 16200.0;
    cruise.ias = 280.0;
    cruise.ground_speed = 300.0;
    cruise.latitude = 47.80;
    cruise.longitude = 18.60;
    cruise.n1 = Some(vec![82.0, 82.0]);
    script.push(cruise.clone());

    let mut descent = cruise.advanced(240.0);
    descent.vs = -1800.0;
    descent.altitude = 11000.0;
    descent.radio_altitude = 10300.0;
    descent.ias = 250.0;
    descent.ground_speed = 270.0;
    descent.latitude = 48.00;
    descent.longitude = 17.90;
    script.push(descent.clone());

    let mut approach = descent.advanced(330.0);
    approach.gears_down = 1.0;
    approach.gear_control_down = true;
    approach.vs = -750.0;
    approach.ias = 165.0;
    approach.ground_speed = 170.0;
    approach.altitude = 2200.0;
    approach.radio_altitude = 1600.0;
    approach.latitude = 48.15;
    approach.longitude = 17.55;
    script.push(approach.clone());

    let mut flare = approach.advanced(390.0);
    flare.vs = -550.0;
    flare.smoothed_vs = -220.0;
    flare.ias = 138.0;
    flare.ground_speed = 142.0;
    flare.altitude = 700.0;
    flare.radio_altitude = 95.0;
    flare.latitude = 48.168;
    flare.longitude = 17.52;
    script.push(flare.clone());

    let mut rollout = flare.advanced(396.0);
    rollout.on_the_ground = true;
    rollout.vs = 0.0;
    rollout.smoothed_vs = 0.0;
    rollout.ias = 40.0;
    rollout.ground_speed = 45.0;
    rollout.altitude = 620.0;
    rollout.radio_altitude = 0.0;
    script.push(rollout.clone());

    let mut stand = rollout.advanced(460.0);
    stand.parking = true;
    stand.ground_speed = 0.0;
    stand.ias = 0.0;
    stand.strobe_lights_on = false;
    stand.landing_lights_on = false;
    stand.n1 = Some(vec![24.0, 24.0]);
    script.push(stand.clone());

    let mut cold = stand.advanced(480.0);
    cold.n1 = Some(vec![0.0, 0.0]);
    script.push(cold);

    script
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let _guard = match logging::init_logging(&args.log_dir, logging::default_log_file()) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Error initialising logging: {e}");
            process::exit(1);
        }
    };

    tracing::info!(version = flightwatch::VERSION, "Flightwatch starting");

    let config = FlightConfig {
        cruise_altitude_ft: args.cruise_altitude,
        flare_time_source: FlareTimeSource::Simulator,
        entrance_exam: args.entrance_exam,
        zfw_kg: 0.0,
    };

    let aircraft = GenericAircraft::new();
    let mut pipeline = CheckerPipeline::standard(&aircraft);
    let mut flight = Flight::new(config);
    let mut logger = FlightLogger::new();

    let report = MemorySink::default();
    logger.add_sink(Box::new(TracingSink));
    logger.add_sink(Box::new(report.clone()));

    let shutdown = CancellationToken::new();
    let (handler, worker) = SimHandler::spawn(
        ReplayAdapter::new(demo_script()),
        LogListener,
        shutdown.clone(),
    );

    let (sample_tx, mut samples) = mpsc::unbounded_channel();
    handler.connect();
    handler.request_periodic_read(
        Duration::from_millis(args.sample_period_ms),
        fast_path_request(),
        move |values| {
            if let Some(state) = decode(values) {
                let _ = sample_tx.send(state);
            }
        },
    );

    let end = flight.end_handle();
    while !end.is_ended() {
        let Some(state) = samples.recv().await else {
            break;
        };
        pipeline.handle_sample(&mut flight, &aircraft, &mut logger, state);
    }

    handler.disconnect();
    shutdown.cancel();
    let _ = worker.await;

    println!();
    println!("Flight log");
    println!("----------");
    for line in report.snapshot() {
        println!("{:>8.1}  {}", line.timestamp, line.text);
    }
    println!();
    if logger.score() == NO_GO_SCORE {
        println!("Result: NO GO");
    } else {
        println!("Score: {:.0} / 100", logger.score());
    }
    println!("Distance flown: {:.1} nm", flight.flown_distance_nm());

    process::exit(if logger.is_no_go() { 1 } else { 0 });
}
