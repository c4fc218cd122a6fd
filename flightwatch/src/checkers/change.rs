//! Change detection for sampled values.
//!
//! [`ChangeDetector`] compares a value between consecutive samples under a
//! [`ChangePolicy`]. The delayed policy debounces noisy values: a new value
//! counts as changed only once it has persisted for the configured duration
//! of sample time. A value that reverts before the delay elapses produces
//! nothing.
//!
//! [`ValueChecker`] combines a detector with a value selector and a message
//! formatter into a complete pipeline checker; every concrete change logger
//! in [`super::loggers`] is one of these with different knobs.

use crate::aircraft::Aircraft;
use crate::flight::Flight;
use crate::logger::FlightLogger;
use crate::state::AircraftState;

use super::StateChecker;

/// A value observed on a sample, in whichever shape the selector produced.
#[derive(Debug, Clone, PartialEq)]
pub enum Observed {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl std::fmt::Display for Observed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Observed::Bool(v) => write!(f, "{}", if *v { "ON" } else { "OFF" }),
            Observed::Int(v) => write!(f, "{v}"),
            Observed::Float(v) => write!(f, "{v:.2}"),
            Observed::Text(v) => f.write_str(v),
        }
    }
}

/// When a differing value counts as changed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ChangePolicy {
    /// Every transition counts immediately.
    Immediate,
    /// A transition counts once the new value has persisted for `delay`
    /// seconds of sample time.
    Delayed { delay: f64 },
}

/// Default debounce used by the delayed-change loggers.
pub const DEFAULT_DELAY_SECS: f64 = 10.0;

/// Outcome of feeding one observation to a [`ChangeDetector`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeOutcome {
    /// First observation of the stream; the reference value is now set.
    First,
    /// No committed change.
    Unchanged,
    /// The value changed (and, under a delayed policy, persisted).
    Changed,
}

/// Tracks one value across consecutive samples.
#[derive(Debug)]
pub struct ChangeDetector {
    policy: ChangePolicy,
    reference: Option<Observed>,
    first_disagreement: Option<f64>,
}

impl ChangeDetector {
    pub fn new(policy: ChangePolicy) -> Self {
        Self {
            policy,
            reference: None,
            first_disagreement: None,
        }
    }

    /// The value a change is currently measured against.
    pub fn reference(&self) -> Option<&Observed> {
        self.reference.as_ref()
    }

    /// Feed one observation.
    ///
    /// Under the delayed policy the disagreement timestamp is latched at the
    /// first differing sample; a revert to the reference value clears it,
    /// and the change commits on the first sample at or past the deadline.
    /// The committed reference is the value of the committing sample.
    pub fn observe(&mut self, timestamp: f64, value: Observed) -> ChangeOutcome {
        let Some(reference) = &self.reference else {
            self.reference = Some(value);
            return ChangeOutcome::First;
        };

        if *reference == value {
            self.first_disagreement = None;
            return ChangeOutcome::Unchanged;
        }

        match self.policy {
            ChangePolicy::Immediate => {
                self.reference = Some(value);
                ChangeOutcome::Changed
            }
            ChangePolicy::Delayed { delay } => {
                let since = *self.first_disagreement.get_or_insert(timestamp);
                if timestamp >= since + delay {
                    self.reference = Some(value);
                    self.first_disagreement = None;
                    ChangeOutcome::Changed
                } else {
                    ChangeOutcome::Unchanged
                }
            }
        }
    }
}

/// Extracts the watched value from a sample.
pub type Selector = Box<dyn Fn(&AircraftState) -> Observed + Send>;

/// Renders the log message for a committed value.
///
/// Receives the committing sample as well, for messages that mix in other
/// state fields (speed, altitude).
pub type Formatter = Box<dyn Fn(&Observed, &AircraftState) -> String + Send>;

/// A complete change-logging checker: selector + policy + formatter +
/// log-initial flag.
pub struct ValueChecker {
    name: &'static str,
    selector: Selector,
    formatter: Formatter,
    detector: ChangeDetector,
    log_initial: bool,
}

impl ValueChecker {
    pub fn new(
        name: &'static str,
        policy: ChangePolicy,
        log_initial: bool,
        selector: Selector,
        formatter: Formatter,
    ) -> Self {
        Self {
            name,
            selector,
            formatter,
            detector: ChangeDetector::new(policy),
            log_initial,
        }
    }
}

impl StateChecker for ValueChecker {
    fn name(&self) -> &str {
        self.name
    }

    fn check(
        &mut self,
        _flight: &mut Flight,
        _aircraft: &dyn Aircraft,
        logger: &mut FlightLogger,
        _previous: Option<&AircraftState>,
        current: &AircraftState,
    ) {
        let value = (self.selector)(current);
        match self.detector.observe(current.timestamp, value.clone()) {
            ChangeOutcome::First if self.log_initial => {
                let text = (self.formatter)(&value, current);
                logger.message(current.timestamp, &text);
            }
            ChangeOutcome::Changed => {
                let text = (self.formatter)(&value, current);
                logger.message(current.timestamp, &text);
            }
            _ => {}
        }
    }
}
