//! The task-side half of a subscription.
//!
//! Every write from a feed task (state change or tick) happens while holding
//! the subscription's status lock and only if teardown has not run yet.
//! Teardown sets `cancelled` under the same lock, so once it returns nothing
//! from the old task can reach the consumer.

use std::sync::mpsc::Sender;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::domain::{ConnectionState, MarketTick};

#[derive(Debug, Default)]
pub(crate) struct SharedStatus {
    pub(crate) state: ConnectionState,
    pub(crate) cancelled: bool,
}

pub(crate) type StatusCell = Arc<Mutex<SharedStatus>>;

pub(crate) fn lock_status(cell: &StatusCell) -> MutexGuard<'_, SharedStatus> {
    cell.lock().unwrap_or_else(PoisonError::into_inner)
}

pub(crate) struct TickSink {
    status: StatusCell,
    tx: Sender<MarketTick>,
}

impl TickSink {
    pub(crate) fn new(status: StatusCell, tx: Sender<MarketTick>) -> Self {
        Self { status, tx }
    }

    /// Returns false once the subscription is gone; the task should stop.
    pub(crate) fn emit(&self, tick: MarketTick) -> bool {
        let status = lock_status(&self.status);
        if status.cancelled {
            return false;
        }
        self.tx.send(tick).is_ok()
    }

    pub(crate) fn mark_connected(&self) -> bool {
        self.set_state(ConnectionState::Connected)
    }

    pub(crate) fn mark_disconnected(&self) {
        self.set_state(ConnectionState::Disconnected);
    }

    fn set_state(&self, state: ConnectionState) -> bool {
        let mut status = lock_status(&self.status);
        if status.cancelled {
            return false;
        }
        status.state = state;
        true
    }
}
