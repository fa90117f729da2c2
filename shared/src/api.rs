use serde::{Deserialize, Serialize};

// ============================================================================
// Calendar API Types
// ============================================================================

/// A `{dateTime, timeZone}` pair as Microsoft Graph returns it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDateTime {
    pub date_time: String,
    #[serde(default)]
    pub time_zone: Option<String>,
}

/// Calendar entry as received; every field may be absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarEvent {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub start: Option<EventDateTime>,
    #[serde(default)]
    pub end: Option<EventDateTime>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarViewResponse {
    #[serde(default)]
    pub value: Vec<CalendarEvent>,
    /// Absolute URL of the next page, when the view spans more than one
    #[serde(rename = "@odata.nextLink", default, skip_serializing_if = "Option::is_none")]
    pub next_link: Option<String>,
}

// ============================================================================
// Directory API Types
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphUser {
    pub id: String,
    #[serde(default)]
    pub display_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserListResponse {
    #[serde(default)]
    pub value: Vec<GraphUser>,
}

// ============================================================================
// Auth API Types
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub expires_in: Option<i64>,
}

// ============================================================================
// Error Types
// ============================================================================

/// Graph wraps failures as `{"error": {"code": ..., "message": ...}}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphErrorResponse {
    pub error: GraphErrorDetail,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphErrorDetail {
    pub code: String,
    #[serde(default)]
    pub message: Option<String>,
}

impl GraphErrorResponse {
    /// Best-effort one-line summary of an error body.
    ///
    /// Falls back to the raw text when the body is not Graph-shaped.
    pub fn summarize(body: &str) -> String {
        match serde_json::from_str::<GraphErrorResponse>(body) {
            Ok(parsed) => match parsed.error.message {
                Some(message) => format!("{}: {}", parsed.error.code, message),
                None => parsed.error.code,
            },
            Err(_) => body.trim().to_string(),
        }
    }
}
