//! Working-day / working-hours gate.
//!
//! A cycle only contacts the calendar when `now` falls on a weekday and
//! inside the configured working window. Both bounds of the window are
//! inclusive.

use chrono::{
    DateTime, Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc, Weekday,
};
use chrono_tz::Tz;
use shared::TimeWindow;

use crate::config::WorkingHours;

#[derive(Debug, Clone, Copy)]
pub struct TimeWindowGate {
    hours: WorkingHours,
}

impl TimeWindowGate {
    pub fn new(hours: WorkingHours) -> Self {
        Self { hours }
    }

    pub fn hours(&self) -> &WorkingHours {
        &self.hours
    }

    /// `false` on weekends and outside working hours.
    pub fn should_evaluate(&self, now: DateTime<Utc>) -> bool {
        let local = now.with_timezone(&self.hours.timezone);

        if matches!(local.weekday(), Weekday::Sat | Weekday::Sun) {
            tracing::debug!("Gated: {} is a weekend day", local.weekday());
            return false;
        }

        match self.working_window(now) {
            Some(window) if window.contains(now) => true,
            Some(window) => {
                tracing::debug!(
                    "Gated: {} is outside working hours {} - {}",
                    now,
                    window.start(),
                    window.end()
                );
                false
            }
            None => {
                tracing::warn!("Could not resolve working hours for {}", local.date_naive());
                false
            }
        }
    }

    /// The working window, as UTC instants, for the local calendar date of `now`.
    pub fn working_window(&self, now: DateTime<Utc>) -> Option<TimeWindow> {
        let tz = self.hours.timezone;
        let date = now.with_timezone(&tz).date_naive();
        let start = resolve_local(tz, date, self.hours.start)?;
        let end = resolve_local(tz, date, self.hours.end)?;
        TimeWindow::new(start, end)
    }
}

/// Map a local wall-clock time to UTC.
///
/// Ambiguous times (DST fall-back) take the earlier instant; times inside a
/// spring-forward gap move to the first minute that exists.
fn resolve_local(tz: Tz, date: NaiveDate, time: NaiveTime) -> Option<DateTime<Utc>> {
    let naive = NaiveDateTime::new(date, time);
    (0..=180)
        .map(|minutes| naive + Duration::minutes(minutes))
        .find_map(|candidate| tz.from_local_datetime(&candidate).earliest())
        .map(|local| local.with_timezone(&Utc))
}
