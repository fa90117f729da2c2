//! Meeting indicator: every tick, decide whether the user is in a meeting,
//! free, or off duty, and show it on the desk display.

pub mod config;
pub mod display;
pub mod error;
pub mod evaluator;
pub mod gate;
pub mod graph;
pub mod notify;
pub mod overlap;
pub mod scheduler;
pub mod shutdown;
pub mod traits;

use std::sync::Arc;

pub use config::{IndicatorConfig, WorkingHours};
pub use error::{IndicatorError, IndicatorResult};
pub use evaluator::{CycleReport, StatusEvaluator};
pub use gate::TimeWindowGate;
pub use scheduler::IndicatorScheduler;
pub use traits::{AuthProvider, CalendarFetcher, DisplayAdapter, NotificationAdapter};

use crate::graph::{build_http_client, ClientCredentialsAuth, GraphCalendarClient};
use crate::notify::{LogNotifier, PushoverNotifier};

/// Wire the Graph calendar, the configured notifier and `display` into an evaluator.
pub fn build_evaluator(
    config: &IndicatorConfig,
    display: Arc<dyn DisplayAdapter>,
) -> IndicatorResult<StatusEvaluator> {
    let http = build_http_client(config.request_timeout)?;

    let auth = Arc::new(ClientCredentialsAuth::new(http.clone(), &config.graph));
    let fetcher = Arc::new(GraphCalendarClient::new(
        http.clone(),
        auth,
        config.graph.api_base.clone(),
        config.calendar_id.clone(),
    ));

    let notifier: Arc<dyn NotificationAdapter> = match &config.pushover {
        Some(pushover) => Arc::new(PushoverNotifier::new(http, pushover.clone())),
        None => {
            tracing::warn!("PUSHOVER_TOKEN/PUSHOVER_USER not set; failures will only be logged");
            Arc::new(LogNotifier)
        }
    };

    Ok(StatusEvaluator::new(
        TimeWindowGate::new(config.working_hours),
        fetcher,
        display,
        notifier,
    )
    .with_lookahead(config.lookahead)
    .with_fetch_deadline(config.tick_interval / 2))
}
