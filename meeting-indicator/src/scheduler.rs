use std::sync::Arc;
use std::time::Duration;
use tokio::time::{self, MissedTickBehavior};

use crate::evaluator::{CycleReport, StatusEvaluator};

/// Drives the evaluator on a fixed cadence.
///
/// The first tick fires immediately. Each cycle is awaited before the next
/// tick is taken, and ticks missed while a slow cycle ran are skipped, so
/// two cycles never touch the display at once.
pub struct IndicatorScheduler {
    evaluator: Arc<StatusEvaluator>,
    interval: Duration,
}

impl IndicatorScheduler {
    pub fn new(evaluator: Arc<StatusEvaluator>, interval: Duration) -> Self {
        Self {
            evaluator,
            interval,
        }
    }

    pub async fn run(&self) {
        self.run_cycles(None).await;
    }

    /// Run at most `limit` cycles (forever when `None`) and return their reports.
    pub async fn run_cycles(&self, limit: Option<usize>) -> Vec<CycleReport> {
        let mut ticker = time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        tracing::info!("Indicator scheduler started (interval: {:?})", self.interval);

        let mut reports = Vec::new();
        loop {
            if limit.is_some_and(|limit| reports.len() >= limit) {
                return reports;
            }

            ticker.tick().await;
            tracing::debug!("Running status cycle");

            let report = self.evaluator.tick().await;
            if limit.is_some() {
                reports.push(report);
            }
        }
    }
}
