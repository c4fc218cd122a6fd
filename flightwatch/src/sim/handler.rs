//! Simulator I/O worker and its public handle.
//!
//! [`SimHandler`] is the cloneable front door: callers queue connect,
//! one-shot read/write, and periodic-read requests on it. A single worker
//! task owns the adapter and services everything sequentially, so adapter
//! backends never see concurrent calls.
//!
//! # Scheduling
//!
//! Periodic reads are ordered by next fire time with the registration id as
//! tie-break, so coincident deadlines fire in registration order. One-shot
//! requests run in FIFO order between periodic work. Requests queued while
//! the connection is down are served once it is back; a request whose
//! adapter call fails is dropped, not retried.
//!
//! # Reconnection
//!
//! A failed adapter call drops the connection (and, for a one-shot, the
//! failing request with it), notifies the listener once, and re-enters the
//! connect loop with exponential backoff. On reconnect every periodic
//! schedule is rebased to "now": a prompt first tick, then the strict
//! period cadence.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use super::adapter::{
    PreparedRequest, SimAdapter, SimConnection, SimListener, SimRequest, SimValue, SimVar,
};

/// Maximum reconnect backoff.
const MAX_BACKOFF: Duration = Duration::from_secs(60);

/// Calculate exponential backoff: 2^n seconds, capped at MAX_BACKOFF.
fn calculate_backoff(consecutive_failures: u32) -> Duration {
    let secs = 2u64.saturating_pow(consecutive_failures.min(20));
    Duration::from_secs(secs).min(MAX_BACKOFF)
}

/// Identifier of a registered periodic read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PeriodicId(u64);

/// Completion callback of a one-shot read.
pub type ReadCallback = Box<dyn FnOnce(Vec<SimValue>) + Send>;

/// Completion callback of a one-shot write.
pub type WriteCallback = Box<dyn FnOnce() + Send>;

/// Callback invoked on every tick of a periodic read.
pub type PeriodicCallback = Box<dyn FnMut(&[SimValue]) + Send>;

enum Command {
    Connect,
    Disconnect,
    Read {
        request: SimRequest,
        callback: ReadCallback,
    },
    Write {
        updates: Vec<(SimVar, SimValue)>,
        callback: WriteCallback,
    },
    Periodic {
        id: PeriodicId,
        period: Duration,
        request: SimRequest,
        callback: PeriodicCallback,
    },
    ClearPeriodic {
        id: PeriodicId,
        reply: oneshot::Sender<bool>,
    },
}

/// Cloneable handle to the simulator I/O worker.
#[derive(Clone)]
pub struct SimHandler {
    commands: mpsc::UnboundedSender<Command>,
    next_id: Arc<AtomicU64>,
}

impl SimHandler {
    /// Spawn the worker task for an adapter and return its handle.
    ///
    /// The worker starts disconnected; nothing touches the adapter until
    /// [`connect`](Self::connect) is called.
    pub fn spawn<A, L>(
        adapter: A,
        listener: L,
        shutdown: CancellationToken,
    ) -> (Self, JoinHandle<()>)
    where
        A: SimAdapter + 'static,
        L: SimListener + 'static,
    {
        let (tx, rx) = mpsc::unbounded_channel();
        let worker = SimWorker {
            adapter,
            listener,
            commands: rx,
            desired: false,
            connection: None,
            one_shots: VecDeque::new(),
            periodics: HashMap::new(),
            schedule: BinaryHeap::new(),
        };
        let join = tokio::spawn(worker.run(shutdown));
        (
            Self {
                commands: tx,
                next_id: Arc::new(AtomicU64::new(1)),
            },
            join,
        )
    }

    fn send(&self, command: Command) {
        if self.commands.send(command).is_err() {
            tracing::debug!("Simulator I/O worker is gone, dropping command");
        }
    }

    /// Ask the worker to establish (and keep) a connection.
    pub fn connect(&self) {
        self.send(Command::Connect);
    }

    /// Ask the worker to drop the connection and stop reconnecting.
    pub fn disconnect(&self) {
        self.send(Command::Disconnect);
    }

    /// Queue a one-shot read.
    ///
    /// Requests wait for a connection if necessary. The callback fires when
    /// the read succeeds; a read that fails in flight is dropped.
    pub fn request_read(
        &self,
        request: SimRequest,
        callback: impl FnOnce(Vec<SimValue>) + Send + 'static,
    ) {
        self.send(Command::Read {
            request,
            callback: Box::new(callback),
        });
    }

    /// Queue a one-shot write, ordered with the reads.
    pub fn request_write(
        &self,
        updates: Vec<(SimVar, SimValue)>,
        callback: impl FnOnce() + Send + 'static,
    ) {
        self.send(Command::Write {
            updates,
            callback: Box::new(callback),
        });
    }

    /// Register a periodic read and return its id.
    ///
    /// The first tick is prompt; subsequent ticks follow the period.
    pub fn request_periodic_read(
        &self,
        period: Duration,
        request: SimRequest,
        callback: impl FnMut(&[SimValue]) + Send + 'static,
    ) -> PeriodicId {
        let id = PeriodicId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.send(Command::Periodic {
            id,
            period,
            request,
            callback: Box::new(callback),
        });
        id
    }

    /// Remove a periodic read.
    ///
    /// Returns whether the id was registered. A callback already being
    /// delivered is not interrupted, but no further ticks follow.
    pub async fn clear_periodic(&self, id: PeriodicId) -> bool {
        let (reply, answer) = oneshot::channel();
        self.send(Command::ClearPeriodic { id, reply });
        answer.await.unwrap_or(false)
    }
}

struct Periodic {
    period: Duration,
    request: SimRequest,
    prepared: Option<PreparedRequest>,
    callback: PeriodicCallback,
    next_fire: Instant,
}

enum OneShot {
    Read {
        request: SimRequest,
        callback: ReadCallback,
    },
    Write {
        updates: Vec<(SimVar, SimValue)>,
        callback: WriteCallback,
    },
}

struct SimWorker<A, L> {
    adapter: A,
    listener: L,
    commands: mpsc::UnboundedReceiver<Command>,

    /// Whether the caller wants a connection.
    desired: bool,
    connection: Option<SimConnection>,

    one_shots: VecDeque<OneShot>,
    periodics: HashMap<u64, Periodic>,
    /// Min-heap of (next fire, id); stale entries are skipped on pop.
    schedule: BinaryHeap<Reverse<(Instant, u64)>>,
}

impl<A: SimAdapter, L: SimListener> SimWorker<A, L> {
    async fn run(mut self, shutdown: CancellationToken) {
        tracing::info!("Simulator I/O worker started");

        loop {
            if self.desired && self.connection.is_none() {
                if !self.connect_loop(&shutdown).await {
                    break;
                }
                continue;
            }

            if self.connection.is_some() {
                if !self.service_connected(&shutdown).await {
                    break;
                }
            } else {
                tokio::select! {
                    _ = shutdown.cancelled() => break,
                    command = self.commands.recv() => match command {
                        Some(command) => self.handle_command(command).await,
                        None => break,
                    },
                }
            }
        }

        if self.connection.take().is_some() {
            self.adapter.close().await;
            self.listener.disconnected();
        }
        tracing::info!("Simulator I/O worker stopped");
    }

    /// Attempt to connect until it succeeds, the caller gives up, or the
    /// worker shuts down. Returns `false` on shutdown.
    async fn connect_loop(&mut self, shutdown: &CancellationToken) -> bool {
        let mut consecutive_failures: u32 = 0;

        while self.desired {
            match self.adapter.open().await {
                Ok(connection) => {
                    tracing::info!(
                        sim = %connection.sim_kind,
                        descriptor = %connection.descriptor,
                        "Connected to simulator"
                    );
                    self.listener.connected(&connection);
                    self.connection = Some(connection);
                    self.rebase_periodics();
                    return true;
                }
                Err(e) => {
                    consecutive_failures += 1;
                    let backoff = calculate_backoff(consecutive_failures);
                    tracing::warn!(
                        error = %e,
                        consecutive_failures,
                        backoff_secs = backoff.as_secs(),
                        "Simulator connection failed"
                    );
                    tokio::select! {
                        _ = shutdown.cancelled() => return false,
                        command = self.commands.recv() => match command {
                            Some(command) => self.handle_command(command).await,
                            None => return false,
                        },
                        _ = tokio::time::sleep(backoff) => {}
                    }
                }
            }
        }
        true
    }

    /// One service round while connected: due periodics, queued one-shots,
    /// then wait for the next event. Returns `false` on shutdown.
    async fn service_connected(&mut self, shutdown: &CancellationToken) -> bool {
        let now = Instant::now();
        while let Some(&Reverse((deadline, id))) = self.schedule.peek() {
            if deadline > now {
                break;
            }
            self.schedule.pop();
            // Stale entries: cleared ids, or deadlines superseded by a rebase.
            if self.periodics.get(&id).map(|p| p.next_fire) != Some(deadline) {
                continue;
            }
            if !self.fire_periodic(id, now).await {
                self.drop_connection().await;
                return true;
            }
        }

        while self.connection.is_some() {
            let Some(op) = self.one_shots.pop_front() else {
                break;
            };
            if !self.serve_one_shot(op).await {
                self.drop_connection().await;
                return true;
            }
        }

        let deadline = self.schedule.peek().map(|Reverse((d, _))| *d);
        tokio::select! {
            biased;
            _ = shutdown.cancelled() => return false,
            command = self.commands.recv() => match command {
                Some(command) => self.handle_command(command).await,
                None => return false,
            },
            _ = sleep_until_opt(deadline) => {}
        }
        true
    }

    /// Serve one queued request. Returns `false` on a connection error;
    /// the failing request is dropped either way, not retried.
    async fn serve_one_shot(&mut self, op: OneShot) -> bool {
        match op {
            OneShot::Read { request, callback } => {
                let prepared = match self.adapter.prepare(&request) {
                    Ok(prepared) => prepared,
                    Err(e) => {
                        tracing::warn!(error = %e, "Dropping unservable read request");
                        return true;
                    }
                };
                match self.adapter.read(&prepared).await {
                    Ok(values) => {
                        callback(values);
                        true
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "One-shot read failed, dropping it");
                        false
                    }
                }
            }
            OneShot::Write { updates, callback } => match self.adapter.write(&updates).await {
                Ok(()) => {
                    callback();
                    true
                }
                Err(e) => {
                    tracing::warn!(error = %e, "One-shot write failed, dropping it");
                    false
                }
            },
        }
    }

    /// Fire one due periodic. Returns `false` on a connection error.
    async fn fire_periodic(&mut self, id: u64, now: Instant) -> bool {
        let Some(mut periodic) = self.periodics.remove(&id) else {
            return true;
        };

        let prepared = match &periodic.prepared {
            Some(prepared) => prepared.clone(),
            None => match self.adapter.prepare(&periodic.request) {
                Ok(prepared) => {
                    periodic.prepared = Some(prepared.clone());
                    prepared
                }
                Err(e) => {
                    tracing::warn!(id, error = %e, "Dropping unservable periodic read");
                    return true;
                }
            },
        };

        match self.adapter.read(&prepared).await {
            Ok(values) => {
                (periodic.callback)(&values);
                // Advance past now so a stalled worker does not burst-fire.
                while periodic.next_fire <= now {
                    periodic.next_fire += periodic.period;
                }
                self.schedule.push(Reverse((periodic.next_fire, id)));
                self.periodics.insert(id, periodic);
                true
            }
            Err(e) => {
                tracing::warn!(id, error = %e, "Periodic read failed");
                self.periodics.insert(id, periodic);
                false
            }
        }
    }

    /// Rebase every periodic to fire promptly on the fresh connection.
    ///
    /// Prepared requests are connection-scoped and re-validated lazily.
    fn rebase_periodics(&mut self) {
        let now = Instant::now();
        self.schedule.clear();
        for (id, periodic) in &mut self.periodics {
            periodic.prepared = None;
            periodic.next_fire = now;
            self.schedule.push(Reverse((now, *id)));
        }
    }

    async fn drop_connection(&mut self) {
        if self.connection.take().is_some() {
            self.adapter.close().await;
            self.listener.disconnected();
            tracing::warn!("Simulator connection lost");
        }
    }

    async fn handle_command(&mut self, command: Command) {
        match command {
            Command::Connect => {
                self.desired = true;
            }
            Command::Disconnect => {
                self.desired = false;
                if self.connection.take().is_some() {
                    self.adapter.close().await;
                    self.listener.disconnected();
                    tracing::info!("Disconnected from simulator");
                }
            }
            Command::Read { request, callback } => {
                self.one_shots.push_back(OneShot::Read { request, callback });
            }
            Command::Write { updates, callback } => {
                self.one_shots.push_back(OneShot::Write { updates, callback });
            }
            Command::Periodic {
                id,
                period,
                request,
                callback,
            } => {
                let next_fire = Instant::now();
                self.schedule.push(Reverse((next_fire, id.0)));
                self.periodics.insert(
                    id.0,
                    Periodic {
                        period,
                        request,
                        prepared: None,
                        callback,
                        next_fire,
                    },
                );
            }
            Command::ClearPeriodic { id, reply } => {
                let existed = self.periodics.remove(&id.0).is_some();
                let _ = reply.send(existed);
            }
        }
    }
}

async fn sleep_until_opt(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}
