//! Simulator adapter trait and wire types.
//!
//! The [`SimAdapter`] trait abstracts over simulator connections (FSUIPC,
//! X-Plane UDP, replay files), allowing the I/O worker to drive any backend
//! that can resolve named variables and move values. Adapters are owned by
//! the worker and accessed from its task only.

use std::future::Future;

use thiserror::Error;

/// A simulator variable, identified by name.
///
/// Names are adapter-scoped; the core never interprets them.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SimVar {
    pub name: String,
}

impl SimVar {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl std::fmt::Display for SimVar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)
    }
}

/// A value read from or written to the simulator.
#[derive(Debug, Clone, PartialEq)]
pub enum SimValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

/// An ordered set of variables to read in one batch.
pub type SimRequest = Vec<SimVar>;

/// An adapter-validated request, cached by the worker between reads.
///
/// The default [`SimAdapter::prepare`] wraps the variables unchanged;
/// adapters with an expensive resolution step (offset lookup, dataref
/// registration) override it.
#[derive(Debug, Clone)]
pub struct PreparedRequest {
    vars: Vec<SimVar>,
}

impl PreparedRequest {
    pub fn new(vars: Vec<SimVar>) -> Self {
        Self { vars }
    }

    pub fn vars(&self) -> &[SimVar] {
        &self.vars
    }
}

/// Identity of an established simulator connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimConnection {
    /// Simulator family, e.g. "MSFS" or "X-Plane".
    pub sim_kind: String,
    /// Human-readable connection descriptor (version, transport).
    pub descriptor: String,
}

/// Errors produced by simulator adapters.
#[derive(Debug, Error)]
pub enum SimError {
    #[error("failed to connect to the simulator: {0}")]
    Connect(String),

    #[error("read failed: {0}")]
    Read(String),

    #[error("write failed: {0}")]
    Write(String),

    #[error("unknown variable '{0}'")]
    UnknownVariable(String),

    #[error("not connected to a simulator")]
    NotConnected,
}

/// A simulator backend.
///
/// All methods take `&mut self`: the worker is the only caller and drives
/// the adapter sequentially.
pub trait SimAdapter: Send {
    /// Establish the connection, returning its identity.
    fn open(&mut self) -> impl Future<Output = Result<SimConnection, SimError>> + Send;

    /// Tear the connection down. Idempotent.
    fn close(&mut self) -> impl Future<Output = ()> + Send;

    /// Validate a request for this connection.
    ///
    /// Called lazily before the first read of a request after each
    /// (re)connect; the result is not reused across connections.
    fn prepare(&mut self, request: &SimRequest) -> Result<PreparedRequest, SimError> {
        Ok(PreparedRequest::new(request.clone()))
    }

    /// Read the values of a prepared request, in request order.
    fn read(
        &mut self,
        request: &PreparedRequest,
    ) -> impl Future<Output = Result<Vec<SimValue>, SimError>> + Send;

    /// Write values to the simulator.
    fn write(
        &mut self,
        updates: &[(SimVar, SimValue)],
    ) -> impl Future<Output = Result<(), SimError>> + Send;
}

/// Observer of connection state transitions.
///
/// The worker guarantees exactly one `connected` per established connection
/// and exactly one `disconnected` per loss or explicit disconnect.
pub trait SimListener: Send {
    fn connected(&self, connection: &SimConnection);
    fn disconnected(&self);
}
