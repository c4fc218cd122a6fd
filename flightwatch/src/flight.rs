//! The per-session flight object.
//!
//! One [`Flight`] exists per monitored session. It holds the mutable state
//! of the flight: the current [`Stage`], block and flight time references,
//! flown distance, fuel totals, and the flare timing references. The checker
//! pipeline is its only writer; other observers read snapshots or wait on
//! the end signal.
//!
//! # Flare timing
//!
//! When the stage checker detects the flare beginning during LANDING it
//! latches two references, one against the wall clock and one against
//! simulator stream time. Which one the reported duration uses is selected
//! by [`FlareTimeSource`](crate::config::FlareTimeSource). The wall clock is
//! injected so tests can drive it deterministically.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use tokio::sync::Notify;

use crate::config::{FlareTimeSource, FlightConfig};
use crate::logger::FlightLogger;
use crate::stage::Stage;
use crate::state::AircraftState;

/// Mean Earth radius in nautical miles, for flown-distance integration.
const EARTH_RADIUS_NM: f64 = 3440.065;

/// Wall-clock source, seconds since the Unix epoch.
pub type WallClock = Box<dyn Fn() -> f64 + Send + Sync>;

fn system_wall_clock() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64())
        .unwrap_or(0.0)
}

/// Shared handle for waiting on the end of the flight.
///
/// Cloneable; `wait` resolves once the flight reaches the terminal stage,
/// immediately if it already has.
#[derive(Clone)]
pub struct FlightEnd {
    inner: Arc<EndSignal>,
}

struct EndSignal {
    notify: Notify,
    ended: AtomicBool,
}

impl FlightEnd {
    fn new() -> Self {
        Self {
            inner: Arc::new(EndSignal {
                notify: Notify::new(),
                ended: AtomicBool::new(false),
            }),
        }
    }

    /// Whether the flight has reached the terminal stage.
    pub fn is_ended(&self) -> bool {
        self.inner.ended.load(Ordering::Acquire)
    }

    /// Wait until the flight reaches the terminal stage.
    pub async fn wait(&self) {
        while !self.is_ended() {
            let notified = self.inner.notify.notified();
            if self.is_ended() {
                return;
            }
            notified.await;
        }
    }

    fn fire(&self) {
        self.inner.ended.store(true, Ordering::Release);
        self.inner.notify.notify_waiters();
    }
}

#[derive(Debug, Clone, Copy)]
struct FlareRefs {
    wall_start: f64,
    sim_start: f64,
}

/// Mutable state of one monitored flight.
pub struct Flight {
    config: FlightConfig,
    stage: Option<Stage>,

    block_start: Option<f64>,
    flight_start: Option<f64>,
    flight_end: Option<f64>,
    block_end: Option<f64>,

    flown_distance_nm: f64,
    last_position: Option<(f64, f64)>,

    start_fuel_kg: Option<f64>,
    end_fuel_kg: Option<f64>,

    flare: Option<FlareRefs>,
    last_flare_duration: Option<f64>,

    end: FlightEnd,
    wall_clock: WallClock,
}

impl Flight {
    pub fn new(config: FlightConfig) -> Self {
        Self {
            config,
            stage: None,
            block_start: None,
            flight_start: None,
            flight_end: None,
            block_end: None,
            flown_distance_nm: 0.0,
            last_position: None,
            start_fuel_kg: None,
            end_fuel_kg: None,
            flare: None,
            last_flare_duration: None,
            end: FlightEnd::new(),
            wall_clock: Box::new(system_wall_clock),
        }
    }

    /// Replace the wall-clock source. Test hook for flare timing.
    pub fn with_wall_clock(mut self, clock: WallClock) -> Self {
        self.wall_clock = clock;
        self
    }

    pub fn config(&self) -> &FlightConfig {
        &self.config
    }

    /// Current stage; `None` until the first sample arrives.
    pub fn stage(&self) -> Option<Stage> {
        self.stage
    }

    /// Handle for waiting on the terminal stage.
    pub fn end_handle(&self) -> FlightEnd {
        self.end.clone()
    }

    pub fn block_start(&self) -> Option<f64> {
        self.block_start
    }

    pub fn flight_start(&self) -> Option<f64> {
        self.flight_start
    }

    pub fn flight_end(&self) -> Option<f64> {
        self.flight_end
    }

    pub fn block_end(&self) -> Option<f64> {
        self.block_end
    }

    /// Distance flown so far in nautical miles.
    pub fn flown_distance_nm(&self) -> f64 {
        self.flown_distance_nm
    }

    pub fn start_fuel_kg(&self) -> Option<f64> {
        self.start_fuel_kg
    }

    pub fn end_fuel_kg(&self) -> Option<f64> {
        self.end_fuel_kg
    }

    /// Duration of the last completed flare, in the configured time base.
    pub fn last_flare_duration(&self) -> Option<f64> {
        self.last_flare_duration
    }

    /// Enter a stage.
    ///
    /// Re-assignments of the current stage are no-ops, and nothing changes
    /// once the terminal stage has been reached. A real transition logs the
    /// stage line, updates the time references, and fires the end signal
    /// when the terminal stage is entered.
    pub fn set_stage(&mut self, timestamp: f64, stage: Stage, logger: &mut FlightLogger) {
        if self.stage == Some(stage) || self.stage == Some(Stage::End) {
            return;
        }

        tracing::info!(
            from = self.stage.map(|s| s.log_name()).unwrap_or("-"),
            to = stage.log_name(),
            timestamp,
            "Stage change"
        );

        self.stage = Some(stage);
        logger.stage(timestamp, stage);

        match stage {
            Stage::PushAndTaxi => {
                self.block_start.get_or_insert(timestamp);
            }
            Stage::Takeoff => {
                self.flight_start.get_or_insert(timestamp);
            }
            Stage::TaxiAfterLand => {
                self.flight_end = Some(timestamp);
            }
            Stage::End => {
                self.block_end = Some(timestamp);
                self.end.fire();
            }
            _ => {}
        }
    }

    /// Fold a sample into the session bookkeeping: flown distance and fuel
    /// totals. Called once per sample, before the checkers run.
    pub fn observe_sample(&mut self, state: &AircraftState) {
        if !state.fuel.is_empty() {
            let total = state.total_fuel_kg();
            self.start_fuel_kg.get_or_insert(total);
            self.end_fuel_kg = Some(total);
        }

        let position = (state.latitude, state.longitude);
        if let Some(last) = self.last_position {
            self.flown_distance_nm += great_circle_nm(last, position);
        }
        self.last_position = Some(position);
    }

    /// Whether a flare is currently being timed.
    pub fn flare_active(&self) -> bool {
        self.flare.is_some()
    }

    /// Latch the flare references, if not already latched this episode.
    pub fn begin_flare(&mut self, sim_time: f64) {
        if self.flare.is_none() {
            self.flare = Some(FlareRefs {
                wall_start: (self.wall_clock)(),
                sim_start: sim_time,
            });
        }
    }

    /// Drop the flare references without reporting a duration.
    pub fn cancel_flare(&mut self) {
        self.flare = None;
    }

    /// Finish the flare at touchdown and return its duration in the
    /// configured time base. Returns `None` if no flare was being timed.
    pub fn complete_flare(&mut self, sim_time: f64) -> Option<f64> {
        let refs = self.flare.take()?;
        let duration = match self.config.flare_time_source {
            FlareTimeSource::Simulator => sim_time - refs.sim_start,
            FlareTimeSource::WallClock => (self.wall_clock)() - refs.wall_start,
        };
        self.last_flare_duration = Some(duration);
        Some(duration)
    }
}

/// Great-circle distance between two lat/lon points in nautical miles.
fn great_circle_nm(from: (f64, f64), to: (f64, f64)) -> f64 {
    let (lat1, lon1) = (from.0.to_radians(), from.1.to_radians());
    let (lat2, lon2) = (to.0.to_radians(), to.1.to_radians());

    let dlat = lat2 - lat1;
    let dlon = lon2 - lon1;

    let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().asin();

    EARTH_RADIUS_NM * c
}
