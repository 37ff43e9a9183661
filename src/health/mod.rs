//! Periodic backend health ping.
//!
//! The poller runs on its own thread and never touches dashboard panels:
//! every result goes to a caller-supplied sink (usually the activity log).
//! Unlike a bare page timer it has an explicit lifecycle:
//! [`HealthPoller::start`] returns a [`PollerHandle`], and stopping or
//! dropping the handle ends the thread before returning.

use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::api::{Transport, endpoints};

/// One health ping result.
#[derive(Debug, Clone, PartialEq)]
pub struct HealthReport {
    pub checked_at: DateTime<Utc>,
    /// Parsed body, or the failure message.
    pub outcome: Result<Value, String>,
}

impl HealthReport {
    pub fn is_ok(&self) -> bool {
        self.outcome.is_ok()
    }
}

/// Ping `/health` once.
pub fn check_once(transport: &dyn Transport) -> HealthReport {
    let outcome = transport
        .get_json(endpoints::HEALTH)
        .map_err(|e| e.to_string());
    HealthReport {
        checked_at: Utc::now(),
        outcome,
    }
}

/// Fixed-interval health poller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HealthPoller {
    interval: Duration,
}

impl HealthPoller {
    /// Intervals shorter than one millisecond are raised to one.
    pub fn new(interval: Duration) -> Self {
        Self {
            interval: interval.max(Duration::from_millis(1)),
        }
    }

    pub fn from_secs(secs: u64) -> Self {
        Self::new(Duration::from_secs(secs.max(1)))
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Start polling on a background thread.
    ///
    /// The first ping happens one interval after start. Later pings keep to
    /// the start-time grid, so a slow ping does not push the schedule back;
    /// ticks missed while a ping was in flight are skipped, not replayed.
    /// Polling continues until the handle is stopped or dropped.
    pub fn start<T, F>(self, transport: T, mut sink: F) -> PollerHandle
    where
        T: Transport + Send + 'static,
        F: FnMut(HealthReport) + Send + 'static,
    {
        let (stop_tx, stop_rx) = mpsc::channel::<()>();
        let interval = self.interval;

        let join = thread::spawn(move || {
            let mut due = Instant::now() + interval;
            loop {
                match stop_rx.recv_timeout(due.saturating_duration_since(Instant::now())) {
                    Err(RecvTimeoutError::Timeout) => {
                        sink(check_once(&transport));
                        due = next_tick(due, interval, Instant::now());
                    }
                    Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                }
            }
        });

        PollerHandle {
            stop_tx: Some(stop_tx),
            join: Some(join),
        }
    }
}

/// First tick on the `due + k * interval` grid that is still ahead of `now`.
fn next_tick(due: Instant, interval: Duration, now: Instant) -> Instant {
    let mut next = due + interval;
    while next <= now {
        next += interval;
    }
    next
}

/// Running poller. Stops on [`stop`](Self::stop) or drop.
#[derive(Debug)]
pub struct PollerHandle {
    stop_tx: Option<Sender<()>>,
    join: Option<JoinHandle<()>>,
}

impl PollerHandle {
    /// Stop the poller and wait for its thread. A ping already in flight
    /// finishes first.
    pub fn stop(mut self) {
        self.shutdown();
    }

    pub fn is_running(&self) -> bool {
        self.join.as_ref().is_some_and(|j| !j.is_finished())
    }

    fn shutdown(&mut self) {
        if let Some(tx) = self.stop_tx.take() {
            let _ = tx.send(());
        }
        if let Some(join) = self.join.take() {
            let _ = join.join();
        }
    }
}

impl Drop for PollerHandle {
    fn drop(&mut self) {
        self.shutdown();
    }
}
