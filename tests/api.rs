use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tokio::sync::{mpsc, watch};
use tower::ServiceExt;

use look_away::{
    api::create_router,
    scheduler::{CancellationToken, Event, NotificationSurface, ReminderAction},
    services::NoticeBoard,
    settings::{Settings, SharedSettings},
    state::{AppState, SchedulerStatus},
};

struct TestApi {
    router: Router,
    events: mpsc::UnboundedReceiver<Event>,
    notices: NoticeBoard,
    settings: SharedSettings,
}

impl TestApi {
    fn new() -> Self {
        let (tx, events) = mpsc::unbounded_channel();
        let (_status_tx, status_rx) = watch::channel(SchedulerStatus::new());
        let notices = NoticeBoard::new();
        let settings = SharedSettings::new(Settings::default());

        let state = Arc::new(AppState::new(
            20554,
            "127.0.0.1".to_string(),
            tx,
            status_rx,
            notices.clone(),
            settings.clone(),
        ));

        Self {
            router: create_router(state),
            events,
            notices,
            settings,
        }
    }

    async fn request(&self, method: &str, path: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(path);
        let body = match body {
            Some(body) => {
                builder = builder.header("content-type", "application/json");
                Body::from(body.to_string())
            }
            None => Body::empty(),
        };

        let response = self
            .router
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, value)
    }

    fn next_event(&mut self) -> Option<Event> {
        self.events.try_recv().ok()
    }
}

#[tokio::test]
async fn commands_are_queued_for_the_scheduler() {
    let mut api = TestApi::new();

    for (path, event) in [
        ("/skip", Event::Skip),
        ("/pause", Event::Pause),
        ("/resume", Event::Resume),
    ] {
        let (status, body) = api.request("POST", path, None).await;
        assert_eq!(status, StatusCode::ACCEPTED);
        assert_eq!(body["status"], "accepted");
        assert_eq!(api.next_event(), Some(event));
    }
    assert_eq!(api.next_event(), None);
}

#[tokio::test]
async fn answering_without_a_prompt_is_not_found() {
    let mut api = TestApi::new();

    let (status, body) = api.request("POST", "/reminder/start", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["status"], "error");
    assert_eq!(api.next_event(), None);
}

#[tokio::test]
async fn prompt_is_answered_once() {
    let mut api = TestApi::new();
    let prompt = api.notices.clone().show_warning("look away", &ReminderAction::ALL);

    let (status, _) = api.request("POST", "/reminder/start", None).await;
    assert_eq!(status, StatusCode::ACCEPTED);
    assert_eq!(
        api.next_event(),
        Some(Event::ReminderAnswered {
            prompt,
            action: Some(ReminderAction::StartBreak),
        })
    );

    let (status, _) = api.request("POST", "/reminder/skip", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(api.next_event(), None);
}

#[tokio::test]
async fn dismiss_answers_without_an_action() {
    let mut api = TestApi::new();
    let prompt = api.notices.clone().show_warning("look away", &ReminderAction::ALL);

    let (status, _) = api.request("POST", "/reminder/dismiss", None).await;
    assert_eq!(status, StatusCode::ACCEPTED);
    assert_eq!(
        api.next_event(),
        Some(Event::ReminderAnswered { prompt, action: None })
    );
}

#[tokio::test]
async fn break_cancel_sets_token_and_queues_event() {
    let mut api = TestApi::new();

    let (status, _) = api.request("POST", "/break/cancel", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let token = CancellationToken::new();
    let progress = api.notices.clone().begin_progress("break", token.clone());

    let (status, _) = api.request("POST", "/break/cancel", None).await;
    assert_eq!(status, StatusCode::ACCEPTED);
    assert!(token.is_cancelled());
    assert_eq!(api.next_event(), Some(Event::ProgressCancelled(progress)));
}

#[tokio::test]
async fn settings_update_notifies_only_on_change() {
    let mut api = TestApi::new();
    let update = json!({"enabled": true, "intervalMinutes": 5, "durationSeconds": 30});

    let (status, body) = api.request("PUT", "/settings", Some(update.clone())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["changed"], true);
    assert_eq!(api.next_event(), Some(Event::SettingsChanged));
    assert_eq!(api.settings.get().unwrap(), Settings::new(true, 5.0, 30));

    let (status, body) = api.request("PUT", "/settings", Some(update)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["changed"], false);
    assert_eq!(api.next_event(), None);

    let (status, body) = api.request("GET", "/settings", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["intervalMinutes"], 5.0);
}

#[tokio::test]
async fn invalid_settings_are_rejected() {
    let mut api = TestApi::new();

    let (status, body) = api
        .request("PUT", "/settings", Some(json!({"intervalMinutes": 0})))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], "error");

    let (status, _) = api
        .request("PUT", "/settings", Some(json!({"durationSeconds": 0})))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    assert_eq!(api.next_event(), None);
    assert_eq!(api.settings.get().unwrap(), Settings::default());
}

#[tokio::test]
async fn status_reports_scheduler_and_notices() {
    let mut api = TestApi::new();
    api.notices.clone().show_info("hello");
    api.request("POST", "/pause", None).await;
    api.next_event();

    let (status, body) = api.request("GET", "/status", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["scheduler"]["phase"], "idle");
    assert_eq!(body["notices"]["messages"][0]["text"], "hello");
    assert_eq!(body["settings"]["durationSeconds"], 20);
    assert_eq!(body["last_action"], "pause");
    assert_eq!(body["port"], 20554);
}

#[tokio::test]
async fn health_check() {
    let api = TestApi::new();
    let (status, body) = api.request("GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}
