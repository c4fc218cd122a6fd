//! Core sample type for aircraft monitoring.
//!
//! An [`AircraftState`] is an immutable snapshot of the aircraft at one
//! instant of the simulator stream. The I/O handler produces one sample per
//! fast-path periodic read; the checker pipeline consumes consecutive pairs
//! of samples to detect changes.
//!
//! # Timestamps
//!
//! `timestamp` is seconds of simulator stream time. Samples delivered to the
//! pipeline are non-decreasing in `timestamp`; duplicates are permitted and
//! produce no output downstream.

/// Fuel on board for one tank.
///
/// Tank layout is aircraft-dependent; the core only sums the amounts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FuelTank {
    /// Tank index in the aircraft's layout.
    pub tank: u8,
    /// Fuel mass in kilograms.
    pub amount_kg: f64,
}

/// Snapshot of the aircraft at one instant.
///
/// Every field is populated by the simulator adapter's fast-path read. The
/// pipeline assumes the fields it uses are meaningful; unknown values default
/// to zero/false/empty rather than being modelled as options, matching what
/// the adapters actually deliver.
#[derive(Debug, Clone, PartialEq)]
pub struct AircraftState {
    /// Seconds of simulator stream time, monotonic per stream.
    pub timestamp: f64,

    /// Simulator is paused.
    pub paused: bool,
    /// Slew/trick mode is active (position being repositioned, not flown).
    pub trick_mode: bool,
    /// Simulator's overspeed warning flag.
    pub overspeed: bool,
    /// Simulator's stall warning flag.
    pub stalled: bool,
    /// Weight on wheels.
    pub on_the_ground: bool,
    /// Parking brake set.
    pub parking: bool,

    /// Gross weight in kilograms.
    pub gross_weight_kg: f64,
    /// Zero-fuel weight in kilograms.
    pub zfw_kg: f64,

    /// Heading in degrees, `[0, 360)`.
    pub heading: f64,
    /// Pitch in degrees, positive nose up.
    pub pitch: f64,
    /// Bank in degrees, positive right wing down.
    pub bank: f64,

    /// Indicated airspeed in knots.
    pub ias: f64,
    /// Mach number.
    pub mach: f64,
    /// Ground speed in knots.
    pub ground_speed: f64,
    /// IAS smoothed over the last few samples (adapter-provided).
    pub smoothed_ias: f64,

    /// Vertical speed in feet per minute.
    pub vs: f64,
    /// Vertical speed smoothed over the last few samples (adapter-provided).
    pub smoothed_vs: f64,

    /// Altitude MSL in feet.
    pub altitude: f64,
    /// Altitude above ground in feet.
    pub radio_altitude: f64,

    /// Load factor.
    pub g_load: f64,

    /// Selected flaps detent index.
    pub flaps_set: u8,
    /// Actual flaps deflection in degrees.
    pub flaps: f64,

    /// Altimeter setting in hPa.
    pub altimeter: f64,

    /// Transponder code, four digits.
    pub squawk: String,
    /// NAV1 frequency, `XXX.XX`.
    pub nav1: String,
    /// NAV2 frequency, `XXX.XX`.
    pub nav2: String,

    pub nav_lights_on: bool,
    pub anti_collision_lights_on: bool,
    pub strobe_lights_on: bool,
    pub landing_lights_on: bool,
    pub pitot_heat_on: bool,

    /// Gear lever position.
    pub gear_control_down: bool,
    /// Gear extension as a fraction, 1.0 = down and locked.
    pub gears_down: f64,

    pub spoilers_armed: bool,
    /// Spoilers extension as a fraction or fractional detent index.
    pub spoilers_extension: f64,

    /// Fuel on board, ordered by the aircraft's tank layout.
    pub fuel: Vec<FuelTank>,

    /// Per-engine N1 percentages (turbines); mutually exclusive with `rpm`.
    pub n1: Option<Vec<f64>>,
    /// Per-engine RPM (pistons); mutually exclusive with `n1`.
    pub rpm: Option<Vec<f64>>,
    /// Per-engine reverser deployed flags.
    pub reverser: Vec<bool>,

    /// Wind speed in knots.
    pub wind_speed: f64,
    /// Wind direction in degrees.
    pub wind_direction: f64,
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
}

impl AircraftState {
    /// Baseline sample for an aircraft parked at the gate.
    ///
    /// Used by tests and replay adapters as a starting point; fields are
    /// public, so callers adjust what a given sample needs.
    pub fn parked(timestamp: f64) -> Self {
        Self {
            timestamp,
            paused: false,
            trick_mode: false,
            overspeed: false,
            stalled: false,
            on_the_ground: true,
            parking: true,
            gross_weight_kg: 0.0,
            zfw_kg: 0.0,
            heading: 0.0,
            pitch: 0.0,
            bank: 0.0,
            ias: 0.0,
            mach: 0.0,
            ground_speed: 0.0,
            smoothed_ias: 0.0,
            vs: 0.0,
            smoothed_vs: 0.0,
            altitude: 0.0,
            radio_altitude: 0.0,
            g_load: 1.0,
            flaps_set: 0,
            flaps: 0.0,
            altimeter: 1013.0,
            squawk: String::from("2000"),
            nav1: String::from("110.50"),
            nav2: String::from("110.50"),
            nav_lights_on: false,
            anti_collision_lights_on: false,
            strobe_lights_on: false,
            landing_lights_on: false,
            pitot_heat_on: false,
            gear_control_down: true,
            gears_down: 1.0,
            spoilers_armed: false,
            spoilers_extension: 0.0,
            fuel: Vec::new(),
            n1: None,
            rpm: None,
            reverser: Vec::new(),
            wind_speed: 0.0,
            wind_direction: 0.0,
            latitude: 0.0,
            longitude: 0.0,
        }
    }

    /// Clone this sample with a later timestamp.
    ///
    /// Replay sources evolve a flight by cloning the previous sample and
    /// adjusting the handful of fields that changed.
    pub fn advanced(&self, timestamp: f64) -> Self {
        let mut next = self.clone();
        next.timestamp = timestamp;
        next
    }

    /// Whether the gear is down and locked.
    pub fn gears_are_down(&self) -> bool {
        self.gears_down >= 1.0
    }

    /// Total fuel on board in kilograms.
    pub fn total_fuel_kg(&self) -> f64 {
        self.fuel.iter().map(|t| t.amount_kg).sum()
    }

    /// Whether all engines are stopped.
    ///
    /// Checks whichever of N1/RPM the aircraft reports. An aircraft
    /// reporting neither counts as stopped.
    pub fn engines_stopped(&self) -> bool {
        match (&self.n1, &self.rpm) {
            (Some(n1), _) => n1.iter().all(|v| *v < 2.0),
            (None, Some(rpm)) => rpm.iter().all(|v| *v < 50.0),
            (None, None) => true,
        }
    }

    /// Whether any reverser is deployed.
    pub fn reverser_deployed(&self) -> bool {
        self.reverser.iter().any(|r| *r)
    }

    /// Speed to report in taxi-sensitive log lines.
    ///
    /// Ground speed below 80 kt (taxiing), IAS above.
    pub fn reference_speed_kt(&self) -> f64 {
        if self.ground_speed < 80.0 {
            self.ground_speed
        } else {
            self.ias
        }
    }
}
