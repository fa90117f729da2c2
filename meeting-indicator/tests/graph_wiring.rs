//! Full stack: configuration -> token -> user lookup -> calendar view -> LCD.

use chrono::{TimeZone, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use wiremock::matchers::{method, path, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

use meeting_indicator::display::{Backlight, SimulatedLcd};
use meeting_indicator::{build_evaluator, IndicatorConfig};
use shared::{CycleState, Status};

fn config_for(server: &MockServer, extra: &[(&'static str, String)]) -> IndicatorConfig {
    let mut vars: HashMap<&'static str, String> = HashMap::from([
        ("OUTLOOK_CALENDAR_ID", "cal-1".to_string()),
        ("AZURE_TENANT_ID", "contoso".to_string()),
        ("AZURE_CLIENT_ID", "client".to_string()),
        ("AZURE_CLIENT_SECRET", "secret".to_string()),
        ("AUTHORITY_HOST", server.uri()),
        ("GRAPH_API_BASE", server.uri()),
        ("REQUEST_TIMEOUT_SECS", "2".to_string()),
    ]);
    vars.extend(extra.iter().cloned());
    IndicatorConfig::from_lookup(|key| vars.get(key).cloned()).expect("valid config")
}

async fn mount_auth_and_user(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/contoso/oauth2/v2.0/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "token_type": "Bearer",
            "expires_in": 3599,
            "access_token": "token-abc"
        })))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "value": [{"id": "user-42"}]
        })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_busy_meeting_lights_red() {
    let server = MockServer::start().await;
    mount_auth_and_user(&server).await;

    Mock::given(method("GET"))
        .and(path("/users/user-42/calendars/cal-1/calendarview"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "value": [{
                "id": "evt-1",
                "start": {"dateTime": "2024-01-09T09:50:00.0000000", "timeZone": "UTC"},
                "end": {"dateTime": "2024-01-09T10:05:00.0000000", "timeZone": "UTC"}
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let lcd = Arc::new(SimulatedLcd::new());
    let evaluator = build_evaluator(&config_for(&server, &[]), lcd.clone()).unwrap();

    let now = Utc.with_ymd_and_hms(2024, 1, 9, 10, 0, 0).unwrap();
    let report = evaluator.run_cycle(now).await;

    assert_eq!(report.state, CycleState::Resolved);
    assert_eq!(report.status, Status::Busy);
    let frame = lcd.frame().await;
    assert_eq!(frame.backlight, Backlight::Red);
    assert_eq!(frame.text(), "Meeting in\nProgress!");
}

#[tokio::test]
async fn test_calendar_outage_alerts_through_pushover() {
    let server = MockServer::start().await;
    mount_auth_and_user(&server).await;

    Mock::given(method("GET"))
        .and(path_regex(r"^/users/user-42/calendars/.+/calendarview$"))
        .respond_with(ResponseTemplate::new(503).set_body_string("Service Unavailable"))
        .mount(&server)
        .await;

    let pushover = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"status": 1})))
        .expect(1)
        .mount(&pushover)
        .await;

    let config = config_for(
        &server,
        &[
            ("PUSHOVER_TOKEN", "app".to_string()),
            ("PUSHOVER_USER", "me".to_string()),
            ("PUSHOVER_API_URL", format!("{}/1/messages.json", pushover.uri())),
        ],
    );
    let lcd = Arc::new(SimulatedLcd::new());
    let evaluator = build_evaluator(&config, lcd.clone()).unwrap();

    let now = Utc.with_ymd_and_hms(2024, 1, 9, 10, 0, 0).unwrap();
    let report = evaluator.run_cycle(now).await;

    assert_eq!(report.state, CycleState::Failed);
    assert_eq!(report.status, Status::Error);
    assert_eq!(lcd.frame().await.backlight, Backlight::Off);
}
