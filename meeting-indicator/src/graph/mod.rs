//! Microsoft Graph adapters: client-credentials auth and the calendar view.

mod auth;
mod client;

pub use auth::ClientCredentialsAuth;
pub use client::GraphCalendarClient;

use reqwest::{Client, Response};
use shared::GraphErrorResponse;
use std::time::Duration;

use crate::error::{IndicatorError, IndicatorResult};

/// HTTP client shared by every outbound call; `timeout` bounds each request.
pub fn build_http_client(timeout: Duration) -> IndicatorResult<Client> {
    Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| IndicatorError::Config(format!("Failed to build HTTP client: {}", e)))
}

/// Turn a non-2xx response into an `Api` error carrying Graph's own message.
async fn ensure_success(response: Response) -> IndicatorResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string());
    Err(IndicatorError::api(
        status.as_u16(),
        GraphErrorResponse::summarize(&body),
    ))
}
