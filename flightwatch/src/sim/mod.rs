//! Simulator I/O.
//!
//! Everything between the monitoring core and a running simulator: the
//! [`SimAdapter`] backend trait, the wire value types, and the
//! [`SimHandler`] worker that owns an adapter and services connect,
//! one-shot, and periodic-read requests from a single task.

mod adapter;
mod handler;

pub use adapter::{
    PreparedRequest, SimAdapter, SimConnection, SimError, SimListener, SimRequest, SimValue,
    SimVar,
};
pub use handler::{PeriodicCallback, PeriodicId, ReadCallback, SimHandler, WriteCallback};
