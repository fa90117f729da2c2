//! Seams between the evaluator and the outside world.

use async_trait::async_trait;
use shared::{CalendarEvent, Status, TimeWindow};

use crate::error::IndicatorResult;

/// Returns calendar entries overlapping a time window
#[async_trait]
pub trait CalendarFetcher: Send + Sync {
    async fn fetch(&self, window: TimeWindow) -> IndicatorResult<Vec<CalendarEvent>>;
}

/// Supplies bearer tokens for the calendar API
#[async_trait]
pub trait AuthProvider: Send + Sync {
    async fn token(&self) -> IndicatorResult<String>;
}

/// Single-owner output device showing the current status
#[async_trait]
pub trait DisplayAdapter: Send + Sync {
    async fn render(&self, status: Status);

    /// Clear the screen and switch the backlight off before exit.
    async fn power_off(&self);
}

/// Out-of-band alert sink. Delivery is best-effort; implementations swallow their own errors.
#[async_trait]
pub trait NotificationAdapter: Send + Sync {
    async fn notify(&self, message: &str);
}
