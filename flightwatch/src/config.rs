//! Per-flight configuration recognised by the monitoring core.
//!
//! Everything here is in-memory for the session; persisting settings is the
//! shell's concern. Options not listed are passed through to collaborators
//! untouched.

/// Which clock the flare duration is measured against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FlareTimeSource {
    /// Real wall-clock time.
    #[default]
    WallClock,
    /// Simulator stream time (tracks sim rate changes and pauses).
    Simulator,
}

/// Configuration for one monitored flight.
#[derive(Debug, Clone)]
pub struct FlightConfig {
    /// Filed cruise altitude in feet.
    pub cruise_altitude_ft: f64,

    /// Clock used for flare timing.
    pub flare_time_source: FlareTimeSource,

    /// Entrance-exam mode: relaxes some fault detectors. The exact
    /// relaxation is aircraft-specific.
    pub entrance_exam: bool,

    /// Planned zero-fuel weight in kilograms.
    pub zfw_kg: f64,
}

impl Default for FlightConfig {
    fn default() -> Self {
        Self {
            cruise_altitude_ft: 18000.0,
            flare_time_source: FlareTimeSource::WallClock,
            entrance_exam: false,
            zfw_kg: 0.0,
        }
    }
}
