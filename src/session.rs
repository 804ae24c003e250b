//! Last-request-wins holder for the route currently on screen.
//!
//! Every request takes a [`Ticket`] carrying a generation number. Only the
//! ticket from the most recent [`RouteSession::begin`] may commit; results of
//! superseded requests are dropped when they arrive.

use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};
use tracing::{debug, warn};

use crate::error::RouteError;
use crate::planner::{RoutePlanner, RouteRequest, RouteResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ticket(u64);

impl Ticket {
    pub fn generation(&self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    Idle,
    Fetching,
    Success(RouteResult),
    Failed(RouteError),
}

impl SessionState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, SessionState::Success(_) | SessionState::Failed(_))
    }
}

struct Slot {
    generation: u64,
    state: SessionState,
    discarded: u64,
}

pub struct RouteSession {
    planner: Arc<RoutePlanner>,
    slot: Mutex<Slot>,
    settled: Condvar,
}

impl RouteSession {
    pub fn new(planner: Arc<RoutePlanner>) -> Self {
        Self {
            planner,
            slot: Mutex::new(Slot {
                generation: 0,
                state: SessionState::Idle,
                discarded: 0,
            }),
            settled: Condvar::new(),
        }
    }

    /// Starts a new request, superseding any still in flight.
    pub fn begin(&self) -> Ticket {
        let mut slot = self.slot.lock();
        slot.generation += 1;
        slot.state = SessionState::Fetching;
        Ticket(slot.generation)
    }

    /// Commits an outcome if `ticket` is still the latest. Returns whether it was kept.
    pub fn complete(&self, ticket: Ticket, outcome: Result<RouteResult, RouteError>) -> bool {
        let mut slot = self.slot.lock();
        if ticket.0 != slot.generation {
            slot.discarded += 1;
            debug!(
                stale = ticket.0,
                latest = slot.generation,
                "discarding superseded route result"
            );
            return false;
        }

        slot.state = match outcome {
            Ok(result) => SessionState::Success(result),
            Err(err) => {
                warn!(error = %err, "route request failed");
                SessionState::Failed(err)
            }
        };
        self.settled.notify_all();
        true
    }

    /// Runs `request` on a worker thread and commits through [`complete`](Self::complete).
    pub fn submit(self: &Arc<Self>, request: RouteRequest) -> Ticket {
        let ticket = self.begin();
        let session = Arc::clone(self);
        let spawned = std::thread::Builder::new()
            .name(format!("route-request-{}", ticket.0))
            .spawn(move || {
                let outcome = session.planner.compute(&request);
                session.complete(ticket, outcome);
            });

        if let Err(err) = spawned {
            self.complete(
                ticket,
                Err(RouteError::ProviderUnavailable(format!(
                    "could not start worker: {}",
                    err
                ))),
            );
        }
        ticket
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.slot.lock().generation == ticket.0
    }

    pub fn snapshot(&self) -> SessionState {
        self.slot.lock().state.clone()
    }

    /// Number of results dropped because a newer request had started.
    pub fn discarded(&self) -> u64 {
        self.slot.lock().discarded
    }

    /// Blocks until the latest request is terminal or `timeout` elapses.
    pub fn wait_settled(&self, timeout: Duration) -> SessionState {
        let deadline = Instant::now() + timeout;
        let mut slot = self.slot.lock();
        while matches!(slot.state, SessionState::Fetching) {
            if self.settled.wait_until(&mut slot, deadline).timed_out() {
                break;
            }
        }
        slot.state.clone()
    }
}
