use async_trait::async_trait;
use chrono::SecondsFormat;
use reqwest::Client;
use shared::{CalendarEvent, CalendarViewResponse, TimeWindow, UserListResponse};
use std::sync::Arc;

use super::ensure_success;
use crate::error::{IndicatorError, IndicatorResult};
use crate::traits::{AuthProvider, CalendarFetcher};

const OUTLOOK_TIMEZONE_HEADER: &str = r#"outlook.timezone="UTC""#;
/// Guards against a server that keeps handing out `@odata.nextLink`s.
const MAX_PAGES: usize = 20;

/// Reads one calendar's `calendarview` through Microsoft Graph
pub struct GraphCalendarClient {
    http: Client,
    auth: Arc<dyn AuthProvider>,
    api_base: String,
    calendar_id: String,
}

impl GraphCalendarClient {
    pub fn new(
        http: Client,
        auth: Arc<dyn AuthProvider>,
        api_base: impl Into<String>,
        calendar_id: impl Into<String>,
    ) -> Self {
        Self {
            http,
            auth,
            api_base: api_base.into().trim_end_matches('/').to_string(),
            calendar_id: calendar_id.into(),
        }
    }

    /// Look up the id of the user whose calendar is read (first entry of `/users`).
    pub async fn resolve_user_id(&self, token: &str) -> IndicatorResult<String> {
        let response = self
            .http
            .get(format!("{}/users", self.api_base))
            .bearer_auth(token)
            .send()
            .await?;

        let users: UserListResponse = ensure_success(response).await?.json().await?;

        users
            .value
            .into_iter()
            .next()
            .map(|user| user.id)
            .ok_or_else(|| IndicatorError::api(404, "User lookup returned no users"))
    }

    async fn fetch_page(
        &self,
        url: &str,
        token: &str,
        window: Option<TimeWindow>,
    ) -> IndicatorResult<CalendarViewResponse> {
        let mut request = self
            .http
            .get(url)
            .bearer_auth(token)
            .header("Prefer", OUTLOOK_TIMEZONE_HEADER);

        if let Some(window) = window {
            request = request.query(&[
                (
                    "startdatetime",
                    window.start().to_rfc3339_opts(SecondsFormat::Secs, true),
                ),
                (
                    "enddatetime",
                    window.end().to_rfc3339_opts(SecondsFormat::Secs, true),
                ),
            ]);
        }

        let response = request.send().await?;
        Ok(ensure_success(response).await?.json().await?)
    }
}

#[async_trait]
impl CalendarFetcher for GraphCalendarClient {
    async fn fetch(&self, window: TimeWindow) -> IndicatorResult<Vec<CalendarEvent>> {
        let token = self.auth.token().await?;
        let user_id = self.resolve_user_id(&token).await?;

        let url = format!(
            "{}/users/{}/calendars/{}/calendarview",
            self.api_base,
            urlencoding::encode(&user_id),
            urlencoding::encode(&self.calendar_id)
        );

        tracing::debug!(
            "Fetching calendar view {} - {}",
            window.start(),
            window.end()
        );

        let mut page = self.fetch_page(&url, &token, Some(window)).await?;
        let mut events = std::mem::take(&mut page.value);
        let mut pages = 1;

        while let Some(next_link) = page.next_link.take() {
            if pages >= MAX_PAGES {
                tracing::warn!("Calendar view still paging after {} pages, stopping", pages);
                break;
            }
            page = self.fetch_page(&next_link, &token, None).await?;
            events.append(&mut page.value);
            pages += 1;
        }

        tracing::debug!("Fetched {} calendar events", events.len());
        Ok(events)
    }
}
