//! Flightwatch - flight monitoring core for virtual airline clients
//!
//! This library watches a running flight simulator, follows the flight
//! through its stages from boarding to shutdown, and produces a scored,
//! pilot-visible log of everything notable that happened along the way.
//!
//! # Architecture
//!
//! Three layers, one writer each:
//!
//! - [`sim`]: the I/O worker. Owns a [`sim::SimAdapter`] backend, keeps the
//!   connection alive with reconnect/backoff, and services one-shot and
//!   periodic read requests from a single task.
//! - [`stage`] + [`flight`]: the stage state machine and the per-session
//!   [`flight::Flight`] bookkeeping it drives.
//! - [`checkers`]: the pipeline that turns consecutive state samples into
//!   stage transitions, log lines, and score changes on the
//!   [`logger::FlightLogger`].
//!
//! A typical session wires a periodic read of the fast-path variables into
//! [`checkers::CheckerPipeline::handle_sample`] and waits on
//! [`flight::FlightEnd`] for the terminal stage.

pub mod aircraft;
pub mod checkers;
pub mod config;
pub mod flight;
pub mod logger;
pub mod logging;
pub mod sim;
pub mod stage;
pub mod state;

/// Version of the Flightwatch library and CLI.
///
/// This is synchronized across all components in the workspace.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
