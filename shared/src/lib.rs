//! Types shared between the meeting indicator service and its adapters.

pub mod api;
pub mod models;

pub use api::{
    CalendarEvent, CalendarViewResponse, EventDateTime, GraphErrorResponse, GraphUser,
    TokenResponse, UserListResponse,
};
pub use models::{parse_event_time, CycleState, MalformedEvent, MeetingEvent, Status, TimeWindow};
