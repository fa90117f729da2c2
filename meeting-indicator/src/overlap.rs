//! Decides whether any fetched calendar entry covers "now".

use chrono::{DateTime, Utc};
use shared::{CalendarEvent, MeetingEvent};

/// Parse the fetched entries, dropping any with missing or malformed times.
pub fn meetings_from(events: &[CalendarEvent]) -> Vec<MeetingEvent> {
    events
        .iter()
        .filter_map(|event| match MeetingEvent::try_from(event) {
            Ok(meeting) => Some(meeting),
            Err(e) => {
                tracing::warn!(
                    "Ignoring calendar event {}: {}",
                    event.id.as_deref().unwrap_or("<no id>"),
                    e
                );
                None
            }
        })
        .collect()
}

/// `true` iff some well-formed entry satisfies `start <= now <= end`.
pub fn is_active(now: DateTime<Utc>, events: &[CalendarEvent]) -> bool {
    any_active(now, &meetings_from(events))
}

pub fn any_active(now: DateTime<Utc>, meetings: &[MeetingEvent]) -> bool {
    meetings.iter().any(|meeting| meeting.is_active_at(now))
}
