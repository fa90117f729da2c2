//! The per-cycle status state machine.
//!
//! ```text
//! gate closed ──────────────────────────────► GatedOff  (render Off)
//! gate open ─► Fetching ─► Evaluating ──────► Resolved  (render Busy/Free)
//!                 │             │
//!                 └─────────────┴──── error ─► Failed    (notify, display untouched)
//! ```
//!
//! Cycles are independent: nothing but configuration survives from one to the
//! next, and a failed cycle is not retried until the next tick.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use shared::{CycleState, Status, TimeWindow};
use std::sync::Arc;

use crate::error::{IndicatorError, IndicatorResult};
use crate::gate::TimeWindowGate;
use crate::overlap;
use crate::traits::{CalendarFetcher, DisplayAdapter, NotificationAdapter};

pub const DEFAULT_LOOKAHEAD_MINUTES: i64 = 30;

/// Outcome of one cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CycleReport {
    pub at: DateTime<Utc>,
    pub state: CycleState,
    pub status: Status,
}

pub struct StatusEvaluator {
    gate: TimeWindowGate,
    fetcher: Arc<dyn CalendarFetcher>,
    display: Arc<dyn DisplayAdapter>,
    notifier: Arc<dyn NotificationAdapter>,
    lookahead: Duration,
    fetch_deadline: Option<std::time::Duration>,
}

impl StatusEvaluator {
    pub fn new(
        gate: TimeWindowGate,
        fetcher: Arc<dyn CalendarFetcher>,
        display: Arc<dyn DisplayAdapter>,
        notifier: Arc<dyn NotificationAdapter>,
    ) -> Self {
        Self {
            gate,
            fetcher,
            display,
            notifier,
            lookahead: Duration::minutes(DEFAULT_LOOKAHEAD_MINUTES),
            fetch_deadline: None,
        }
    }

    pub fn with_lookahead(mut self, lookahead: Duration) -> Self {
        self.lookahead = lookahead;
        self
    }

    /// Upper bound on the whole fetch step, on top of per-request timeouts.
    pub fn with_fetch_deadline(mut self, deadline: std::time::Duration) -> Self {
        self.fetch_deadline = Some(deadline);
        self
    }

    pub fn display(&self) -> Arc<dyn DisplayAdapter> {
        Arc::clone(&self.display)
    }

    /// Gate, fetch and overlap without touching the display or notifier.
    ///
    /// `Ok(Status::Off)` means the cycle was gated; the calendar was not contacted.
    pub async fn decide(&self, now: DateTime<Utc>) -> IndicatorResult<Status> {
        if !self.gate.should_evaluate(now) {
            return Ok(Status::Off);
        }

        let window = TimeWindow::lookahead(now, self.lookahead);
        tracing::debug!("Cycle state: {}", CycleState::Fetching);
        let events = self.fetch(window).await?;

        tracing::debug!("Cycle state: {} ({} events)", CycleState::Evaluating, events.len());
        if overlap::is_active(now, &events) {
            Ok(Status::Busy)
        } else {
            Ok(Status::Free)
        }
    }

    /// Run one full cycle at `now`; errors end up in the notifier, never in the caller.
    pub async fn run_cycle(&self, now: DateTime<Utc>) -> CycleReport {
        match self.decide(now).await {
            Ok(status) => {
                let state = if status == Status::Off {
                    CycleState::GatedOff
                } else {
                    CycleState::Resolved
                };
                tracing::info!("Cycle {}: status {}", state, status);
                self.display.render(status).await;
                CycleReport {
                    at: now,
                    state,
                    status,
                }
            }
            Err(e) => {
                tracing::error!("Cycle {} ({}): {}", CycleState::Failed, e.kind(), e);
                self.notifier
                    .notify(&format!("Failed to update meeting status: {}", e))
                    .await;
                CycleReport {
                    at: now,
                    state: CycleState::Failed,
                    status: Status::Error,
                }
            }
        }
    }

    pub async fn tick(&self) -> CycleReport {
        self.run_cycle(Utc::now()).await
    }

    async fn fetch(&self, window: TimeWindow) -> IndicatorResult<Vec<shared::CalendarEvent>> {
        match self.fetch_deadline {
            Some(deadline) => tokio::time::timeout(deadline, self.fetcher.fetch(window))
                .await
                .map_err(|_| {
                    IndicatorError::network(format!(
                        "calendar fetch exceeded {}s",
                        deadline.as_secs_f32()
                    ))
                })?,
            None => self.fetcher.fetch(window).await,
        }
    }
}
