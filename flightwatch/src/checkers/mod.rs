//! The state-change checker pipeline.
//!
//! Every incoming [`AircraftState`] sample is dispatched through a fixed,
//! ordered sequence of checkers. The stage checker runs first so later
//! checkers can predicate on the freshly updated stage; the value loggers
//! follow; aircraft-specific fault detectors run last.
//!
//! The pipeline is single-threaded per flight: all checkers for sample N
//! complete before sample N+1 is dispatched, and log lines for a sample
//! appear before any line of the next one.
//!
//! A checker that panics is caught at the pipeline boundary, reported at
//! debug level, and skipped for that sample; the rest of the pipeline
//! continues.

mod change;
mod faults;
mod loggers;
mod stage;

pub use change::{
    ChangeDetector, ChangeOutcome, ChangePolicy, Formatter, Observed, Selector, ValueChecker,
    DEFAULT_DELAY_SECS,
};
pub use faults::{
    BankChecker, GearSpeedChecker, HardLandingChecker, OverspeedChecker, PitotHeatChecker,
    ReverserChecker, StallChecker, TakeoffLightsChecker,
};
pub use loggers::standard_loggers;
pub use stage::StageChecker;

use std::panic::{catch_unwind, AssertUnwindSafe};

use crate::aircraft::Aircraft;
use crate::flight::Flight;
use crate::logger::FlightLogger;
use crate::state::AircraftState;

/// One observer in the pipeline.
///
/// Checkers are stateless or lightly stateful; whatever they remember
/// belongs to the current flight only.
pub trait StateChecker: Send {
    /// Name used in diagnostics when the checker misbehaves.
    fn name(&self) -> &str;

    /// Inspect the new sample against the previous one.
    ///
    /// `previous` is `None` for the first sample of the session.
    fn check(
        &mut self,
        flight: &mut Flight,
        aircraft: &dyn Aircraft,
        logger: &mut FlightLogger,
        previous: Option<&AircraftState>,
        current: &AircraftState,
    );
}

/// The fixed, ordered checker sequence for one flight.
pub struct CheckerPipeline {
    checkers: Vec<Box<dyn StateChecker>>,
    previous: Option<AircraftState>,
}

impl CheckerPipeline {
    /// Build a pipeline from an explicit checker sequence.
    pub fn new(checkers: Vec<Box<dyn StateChecker>>) -> Self {
        Self {
            checkers,
            previous: None,
        }
    }

    /// The canonical pipeline: stage checker, the standard value loggers,
    /// then the aircraft's own fault detectors.
    pub fn standard(aircraft: &dyn Aircraft) -> Self {
        let mut checkers: Vec<Box<dyn StateChecker>> = vec![Box::new(StageChecker::new())];
        checkers.extend(standard_loggers());
        checkers.extend(aircraft.checkers());
        Self::new(checkers)
    }

    /// Dispatch one sample through the pipeline.
    ///
    /// Samples must arrive in non-decreasing timestamp order; an
    /// out-of-order sample is dropped with a warning.
    pub fn handle_sample(
        &mut self,
        flight: &mut Flight,
        aircraft: &dyn Aircraft,
        logger: &mut FlightLogger,
        current: AircraftState,
    ) {
        if let Some(previous) = &self.previous {
            if current.timestamp < previous.timestamp {
                tracing::warn!(
                    previous = previous.timestamp,
                    current = current.timestamp,
                    "Dropping out-of-order sample"
                );
                return;
            }
        }

        flight.observe_sample(&current);

        for checker in &mut self.checkers {
            let previous = self.previous.as_ref();
            let result = catch_unwind(AssertUnwindSafe(|| {
                checker.check(flight, aircraft, logger, previous, &current);
            }));
            if result.is_err() {
                tracing::debug!(checker = checker.name(), "Checker panicked; continuing");
                logger.debug(
                    current.timestamp,
                    &format!("checker '{}' failed on this sample", checker.name()),
                );
            }
        }

        self.previous = Some(current);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aircraft::GenericAircraft;
    use crate::config::FlightConfig;

    struct PanickyChecker;

    impl StateChecker for PanickyChecker {
        fn name(&self) -> &str {
            "panicky"
        }

        fn check(
            &mut self,
            _flight: &mut Flight,
            _aircraft: &dyn Aircraft,
            _logger: &mut FlightLogger,
            _previous: Option<&AircraftState>,
            _current: &AircraftState,
        ) {
            panic!("boom");
        }
    }

    struct CountingChecker {
        calls: std::sync::Arc<std::sync::atomic::AtomicUsize>,
    }

    impl StateChecker for CountingChecker {
        fn name(&self) -> &str {
            "counting"
        }

        fn check(
            &mut self,
            _flight: &mut Flight,
            _aircraft: &dyn Aircraft,
            _logger: &mut FlightLogger,
            _previous: Option<&AircraftState>,
            _current: &AircraftState,
        ) {
            self.calls
                .fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        }
    }

    #[test]
    fn test_panicking_checker_does_not_stop_pipeline() {
        let calls = std::sync::Arc::new(std::sync::atomic::AtomicUsize::new(0));
        let mut pipeline = CheckerPipeline::new(vec![
            Box::new(PanickyChecker),
            Box::new(CountingChecker {
                calls: calls.clone(),
            }),
        ]);

        let aircraft = GenericAircraft::default();
        let mut flight = Flight::new(FlightConfig::default());
        let mut logger = FlightLogger::new();

        pipeline.handle_sample(
            &mut flight,
            &aircraft,
            &mut logger,
            AircraftState::parked(1.0),
        );

        assert_eq!(calls.load(std::sync::atomic::Ordering::SeqCst), 1);
    }

    #[test]
    fn test_out_of_order_sample_dropped() {
        let calls = std::sync::Arc::new(std::sync::atomic::AtomicUsize::new(0));
        let mut pipeline = CheckerPipeline::new(vec![Box::new(CountingChecker {
            calls: calls.clone(),
        })]);

        let aircraft = GenericAircraft::default();
        let mut flight = Flight::new(FlightConfig::default());
        let mut logger = FlightLogger::new();

        pipeline.handle_sample(
            &mut flight,
            &aircraft,
            &mut logger,
            AircraftState::parked(10.0),
        );
        pipeline.handle_sample(
            &mut flight,
            &aircraft,
            &mut logger,
            AircraftState::parked(5.0),
        );

        assert_eq!(calls.load(std::sync::atomic::Ordering::SeqCst), 1);
    }

    #[test]
    fn test_duplicate_timestamp_allowed() {
        let calls = std::sync::Arc::new(std::sync::atomic::AtomicUsize::new(0));
        let mut pipeline = CheckerPipeline::new(vec![Box::new(CountingChecker {
            calls: calls.clone(),
        })]);

        let aircraft = GenericAircraft::default();
        let mut flight = Flight::new(FlightConfig::default());
        let mut logger = FlightLogger::new();

        pipeline.handle_sample(
            &mut flight,
            &aircraft,
            &mut logger,
            AircraftState::parked(10.0),
        );
        pipeline.handle_sample(
            &mut flight,
            &aircraft,
            &mut logger,
            AircraftState::parked(10.0),
        );

        assert_eq!(calls.load(std::sync::atomic::Ordering::SeqCst), 2);
    }
}
