//! The standard value loggers.
//!
//! Each one is a [`ValueChecker`] with its own selector, change policy,
//! formatter, and log-initial flag. The set and its order are fixed; the
//! aircraft contributes its fault detectors separately.

use crate::state::AircraftState;

use super::change::{ChangePolicy, Observed, ValueChecker, DEFAULT_DELAY_SECS};
use super::StateChecker;

/// Altimeter setting, debounced, reported with the current altitude.
pub fn altimeter_logger() -> ValueChecker {
    ValueChecker::new(
        "altimeter",
        ChangePolicy::Delayed {
            delay: DEFAULT_DELAY_SECS,
        },
        true,
        Box::new(|s: &AircraftState| Observed::Float(s.altimeter)),
        Box::new(|v, s| match v {
            Observed::Float(hpa) => {
                format!("Altimeter: {hpa:.0} hPa at {:.0} feet", s.altitude)
            }
            other => format!("Altimeter: {other}"),
        }),
    )
}

/// NAV1 frequency, immediate.
pub fn nav1_logger() -> ValueChecker {
    ValueChecker::new(
        "nav1",
        ChangePolicy::Immediate,
        true,
        Box::new(|s: &AircraftState| Observed::Text(s.nav1.clone())),
        Box::new(|v, _| format!("NAV1: {v}")),
    )
}

/// NAV2 frequency, immediate.
pub fn nav2_logger() -> ValueChecker {
    ValueChecker::new(
        "nav2",
        ChangePolicy::Immediate,
        true,
        Box::new(|s: &AircraftState| Observed::Text(s.nav2.clone())),
        Box::new(|v, _| format!("NAV2: {v}")),
    )
}

/// Transponder code, debounced so dialling through codes stays quiet.
pub fn squawk_logger() -> ValueChecker {
    ValueChecker::new(
        "squawk",
        ChangePolicy::Delayed {
            delay: DEFAULT_DELAY_SECS,
        },
        false,
        Box::new(|s: &AircraftState| Observed::Text(s.squawk.clone())),
        Box::new(|v, _| format!("Squawk code: {v}")),
    )
}

fn light_logger(
    name: &'static str,
    label: &'static str,
    selector: fn(&AircraftState) -> bool,
) -> ValueChecker {
    ValueChecker::new(
        name,
        ChangePolicy::Immediate,
        false,
        Box::new(move |s: &AircraftState| Observed::Bool(selector(s))),
        Box::new(move |v, _| format!("{label} {v}")),
    )
}

pub fn nav_lights_logger() -> ValueChecker {
    light_logger("nav-lights", "Navigation lights", |s| s.nav_lights_on)
}

pub fn anti_collision_lights_logger() -> ValueChecker {
    light_logger("anti-collision-lights", "Anti-collision lights", |s| {
        s.anti_collision_lights_on
    })
}

pub fn strobe_lights_logger() -> ValueChecker {
    light_logger("strobe-lights", "Strobe lights", |s| s.strobe_lights_on)
}

pub fn landing_lights_logger() -> ValueChecker {
    light_logger("landing-lights", "Landing lights", |s| s.landing_lights_on)
}

/// Flaps detent, reported with ground speed while taxiing and IAS in flight.
pub fn flaps_logger() -> ValueChecker {
    ValueChecker::new(
        "flaps",
        ChangePolicy::Immediate,
        false,
        Box::new(|s: &AircraftState| Observed::Int(i64::from(s.flaps_set))),
        Box::new(|v, s| format!("Flaps {v} at {:.0} knots", s.reference_speed_kt())),
    )
}

/// Gear position, reported with IAS and altitude.
pub fn gears_logger() -> ValueChecker {
    ValueChecker::new(
        "gears",
        ChangePolicy::Immediate,
        false,
        Box::new(|s: &AircraftState| Observed::Bool(s.gears_are_down())),
        Box::new(|v, s| {
            let direction = match v {
                Observed::Bool(true) => "DOWN",
                _ => "UP",
            };
            format!(
                "Gears {direction} at {:.0} knots, {:.0} feet",
                s.ias, s.altitude
            )
        }),
    )
}

/// The standard logger sequence, in pipeline order.
pub fn standard_loggers() -> Vec<Box<dyn StateChecker>> {
    vec![
        Box::new(altimeter_logger()),
        Box::new(nav1_logger()),
        Box::new(nav2_logger()),
        Box::new(squawk_logger()),
        Box::new(nav_lights_logger()),
        Box::new(anti_collision_lights_logger()),
        Box::new(strobe_lights_logger()),
        Box::new(landing_lights_logger()),
        Box::new(flaps_logger()),
        Box::new(gears_logger()),
    ]
}
