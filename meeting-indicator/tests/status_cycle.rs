use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use std::sync::{Arc, Mutex};

use meeting_indicator::{
    CalendarFetcher, DisplayAdapter, IndicatorError, IndicatorResult, NotificationAdapter,
    StatusEvaluator, TimeWindowGate, WorkingHours,
};
use shared::{CalendarEvent, CycleState, EventDateTime, Status, TimeWindow};

// ============================================================================
// Test doubles
// ============================================================================

struct FixedFetcher {
    events: Vec<CalendarEvent>,
    calls: Mutex<usize>,
}

impl FixedFetcher {
    fn new(events: Vec<CalendarEvent>) -> Self {
        Self {
            events,
            calls: Mutex::new(0),
        }
    }

    fn calls(&self) -> usize {
        *self.calls.lock().unwrap()
    }
}

#[async_trait]
impl CalendarFetcher for FixedFetcher {
    async fn fetch(&self, _window: TimeWindow) -> IndicatorResult<Vec<CalendarEvent>> {
        *self.calls.lock().unwrap() += 1;
        Ok(self.events.clone())
    }
}

struct FailingFetcher;

#[async_trait]
impl CalendarFetcher for FailingFetcher {
    async fn fetch(&self, _window: TimeWindow) -> IndicatorResult<Vec<CalendarEvent>> {
        Err(IndicatorError::network("connection reset by peer"))
    }
}

#[derive(Default)]
struct RecordingDisplay {
    rendered: Mutex<Vec<Status>>,
}

impl RecordingDisplay {
    fn rendered(&self) -> Vec<Status> {
        self.rendered.lock().unwrap().clone()
    }
}

#[async_trait]
impl DisplayAdapter for RecordingDisplay {
    async fn render(&self, status: Status) {
        self.rendered.lock().unwrap().push(status);
    }

    async fn power_off(&self) {}
}

#[derive(Default)]
struct RecordingNotifier {
    messages: Mutex<Vec<String>>,
}

impl RecordingNotifier {
    fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }
}

#[async_trait]
impl NotificationAdapter for RecordingNotifier {
    async fn notify(&self, message: &str) {
        self.messages.lock().unwrap().push(message.to_string());
    }
}

struct Harness {
    evaluator: StatusEvaluator,
    display: Arc<RecordingDisplay>,
    notifier: Arc<RecordingNotifier>,
}

fn harness(fetcher: Arc<dyn CalendarFetcher>) -> Harness {
    let display = Arc::new(RecordingDisplay::default());
    let notifier = Arc::new(RecordingNotifier::default());
    let evaluator = StatusEvaluator::new(
        TimeWindowGate::new(WorkingHours::default()),
        fetcher,
        display.clone(),
        notifier.clone(),
    );
    Harness {
        evaluator,
        display,
        notifier,
    }
}

fn utc(day: u32, h: u32, m: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, day, h, m, 0).unwrap()
}

fn graph_event(start: DateTime<Utc>, end: DateTime<Utc>) -> CalendarEvent {
    let wire = |t: DateTime<Utc>| EventDateTime {
        date_time: format!("{}.0000000", t.format("%Y-%m-%dT%H:%M:%S")),
        time_zone: Some("UTC".to_string()),
    };
    CalendarEvent {
        id: Some(format!("evt-{}", start.timestamp())),
        subject: Some("Sync".to_string()),
        start: Some(wire(start)),
        end: Some(wire(end)),
    }
}

// 2024-01-09 is a Tuesday, 2024-01-13 a Saturday.
const TUESDAY: u32 = 9;
const SATURDAY: u32 = 13;

// ============================================================================
// Scenarios
// ============================================================================

#[tokio::test]
async fn test_tuesday_meeting_in_progress_is_busy() {
    let fetcher = Arc::new(FixedFetcher::new(vec![graph_event(
        utc(TUESDAY, 9, 50),
        utc(TUESDAY, 10, 5),
    )]));
    let h = harness(fetcher);

    let report = h.evaluator.run_cycle(utc(TUESDAY, 10, 0)).await;

    assert_eq!(report.state, CycleState::Resolved);
    assert_eq!(report.status, Status::Busy);
    assert_eq!(h.display.rendered(), vec![Status::Busy]);
    assert!(h.notifier.messages().is_empty());
}

#[tokio::test]
async fn test_tuesday_without_meetings_is_free() {
    let h = harness(Arc::new(FixedFetcher::new(vec![])));

    let report = h.evaluator.run_cycle(utc(TUESDAY, 10, 0)).await;

    assert_eq!(report.status, Status::Free);
    assert_eq!(h.display.rendered(), vec![Status::Free]);
}

#[tokio::test]
async fn test_saturday_is_off_regardless_of_events() {
    let fetcher = Arc::new(FixedFetcher::new(vec![graph_event(
        utc(SATURDAY, 9, 50),
        utc(SATURDAY, 10, 5),
    )]));
    let h = harness(fetcher.clone());

    let report = h.evaluator.run_cycle(utc(SATURDAY, 10, 0)).await;

    assert_eq!(report.state, CycleState::GatedOff);
    assert_eq!(report.status, Status::Off);
    assert_eq!(h.display.rendered(), vec![Status::Off]);
    assert_eq!(fetcher.calls(), 0);
}

#[tokio::test]
async fn test_fetch_failure_notifies_once_and_leaves_display() {
    let h = harness(Arc::new(FailingFetcher));

    let report = h.evaluator.run_cycle(utc(TUESDAY, 10, 0)).await;

    assert_eq!(report.state, CycleState::Failed);
    assert_eq!(report.status, Status::Error);
    assert!(h.display.rendered().is_empty());

    let messages = h.notifier.messages();
    assert_eq!(messages.len(), 1);
    assert!(messages[0].contains("connection reset by peer"));
}

#[tokio::test]
async fn test_same_inputs_give_same_status() {
    let fetcher = Arc::new(FixedFetcher::new(vec![graph_event(
        utc(TUESDAY, 9, 50),
        utc(TUESDAY, 10, 5),
    )]));
    let h = harness(fetcher.clone());
    let now = utc(TUESDAY, 10, 0);

    let first = h.evaluator.run_cycle(now).await;
    let second = h.evaluator.run_cycle(now).await;

    assert_eq!(first, second);
    assert_eq!(h.display.rendered(), vec![Status::Busy, Status::Busy]);
    assert_eq!(fetcher.calls(), 2);
}

#[tokio::test]
async fn test_malformed_event_does_not_fail_cycle() {
    let broken = CalendarEvent {
        id: Some("broken".to_string()),
        start: Some(EventDateTime {
            date_time: "garbage".to_string(),
            time_zone: None,
        }),
        ..Default::default()
    };
    let fetcher = Arc::new(FixedFetcher::new(vec![
        broken,
        graph_event(utc(TUESDAY, 10, 0), utc(TUESDAY, 10, 30)),
    ]));
    let h = harness(fetcher);

    let report = h.evaluator.run_cycle(utc(TUESDAY, 10, 0)).await;

    assert_eq!(report.status, Status::Busy);
    assert!(h.notifier.messages().is_empty());
}

#[tokio::test]
async fn test_failure_after_success_keeps_last_status() {
    let display = Arc::new(RecordingDisplay::default());
    let notifier = Arc::new(RecordingNotifier::default());
    let gate = TimeWindowGate::new(WorkingHours::default());

    let healthy = StatusEvaluator::new(
        gate,
        Arc::new(FixedFetcher::new(vec![])),
        display.clone(),
        notifier.clone(),
    );
    let broken = StatusEvaluator::new(
        gate,
        Arc::new(FailingFetcher),
        display.clone(),
        notifier.clone(),
    );

    healthy.run_cycle(utc(TUESDAY, 10, 0)).await;
    broken.run_cycle(utc(TUESDAY, 10, 15)).await;

    assert_eq!(display.rendered(), vec![Status::Free]);
    assert_eq!(notifier.messages().len(), 1);
}
