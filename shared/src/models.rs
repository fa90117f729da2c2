use std::fmt;

use chrono::{DateTime, Duration, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::api::{CalendarEvent, EventDateTime};

/// Graph returns `dateTime` without an offset and up to seven fractional digits.
const GRAPH_DATE_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// Display state produced by one evaluation cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    /// Outside working days or hours; the screen is blanked
    Off,
    /// A meeting is in progress right now
    Busy,
    /// Working hours and no meeting in progress
    Free,
    /// The cycle failed; the display keeps whatever it showed before
    Error,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Status::Off => "off",
            Status::Busy => "busy",
            Status::Free => "free",
            Status::Error => "error",
        };
        f.write_str(name)
    }
}

/// Where the evaluator ended up for the current cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CycleState {
    GatedOff,
    Fetching,
    Evaluating,
    Resolved,
    Failed,
}

impl fmt::Display for CycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CycleState::GatedOff => "gated_off",
            CycleState::Fetching => "fetching",
            CycleState::Evaluating => "evaluating",
            CycleState::Resolved => "resolved",
            CycleState::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// A closed span of UTC instants with `start <= end`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl TimeWindow {
    /// Returns `None` when `end` precedes `start`.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Option<Self> {
        (start <= end).then_some(Self { start, end })
    }

    /// The query window `[now, now + horizon)`.
    ///
    /// Negative horizons collapse to an empty window at `now`.
    pub fn lookahead(now: DateTime<Utc>, horizon: Duration) -> Self {
        let end = now + horizon.max(Duration::zero());
        Self { start: now, end }
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    /// Inclusive at both ends.
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant <= self.end
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }
}

/// Why a calendar entry could not be turned into a [`MeetingEvent`]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MalformedEvent {
    #[error("event has no {0} time")]
    MissingTime(&'static str),

    #[error("unparseable {field} time {value:?}")]
    UnparseableTime { field: &'static str, value: String },

    #[error("unknown time zone {0:?}")]
    UnknownTimeZone(String),

    #[error("{field} time {value:?} does not exist in {zone}")]
    NonexistentLocalTime {
        field: &'static str,
        value: String,
        zone: String,
    },

    #[error("event ends ({end}) before it starts ({start})")]
    EndsBeforeStart {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
}

/// The only part of a calendar entry the indicator cares about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeetingEvent {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl MeetingEvent {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// Closed-interval check: a meeting starting or ending exactly at `now` counts.
    pub fn is_active_at(&self, now: DateTime<Utc>) -> bool {
        self.start <= now && now <= self.end
    }
}

impl TryFrom<&CalendarEvent> for MeetingEvent {
    type Error = MalformedEvent;

    fn try_from(event: &CalendarEvent) -> Result<Self, Self::Error> {
        let start = event
            .start
            .as_ref()
            .ok_or(MalformedEvent::MissingTime("start"))
            .and_then(|start| parse_event_time("start", start))?;
        let end = event
            .end
            .as_ref()
            .ok_or(MalformedEvent::MissingTime("end"))
            .and_then(|end| parse_event_time("end", end))?;

        if end < start {
            return Err(MalformedEvent::EndsBeforeStart { start, end });
        }

        Ok(Self { start, end })
    }
}

/// Normalise a Graph `{dateTime, timeZone}` pair to a UTC instant.
///
/// Values carrying their own offset win over `timeZone`; a missing zone means UTC.
pub fn parse_event_time(
    field: &'static str,
    value: &EventDateTime,
) -> Result<DateTime<Utc>, MalformedEvent> {
    let raw = value.date_time.trim();

    if let Ok(with_offset) = DateTime::parse_from_rfc3339(raw) {
        return Ok(with_offset.with_timezone(&Utc));
    }

    let naive = NaiveDateTime::parse_from_str(raw, GRAPH_DATE_TIME_FORMAT).map_err(|_| {
        MalformedEvent::UnparseableTime {
            field,
            value: raw.to_string(),
        }
    })?;

    match value.time_zone.as_deref().map(str::trim) {
        None | Some("") => Ok(naive.and_utc()),
        Some(zone) if zone.eq_ignore_ascii_case("utc") => Ok(naive.and_utc()),
        Some(zone) => {
            let tz: Tz = zone
                .parse()
                .map_err(|_| MalformedEvent::UnknownTimeZone(zone.to_string()))?;
            tz.from_local_datetime(&naive)
                .earliest()
                .map(|local| local.with_timezone(&Utc))
                .ok_or_else(|| MalformedEvent::NonexistentLocalTime {
                    field,
                    value: raw.to_string(),
                    zone: zone.to_string(),
                })
        }
    }
}
