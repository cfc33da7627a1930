use std::sync::Arc;

use axum::{
    body::{to_bytes, Body, BodyDataStream},
    http::{header, Request, StatusCode},
    Router,
};
use futures::StreamExt;
use serde_json::Value;
use tower::ServiceExt;

use focus_timer::{create_router, services::Silent, AppState};

fn app() -> Router {
    app_with_state().1
}

fn app_with_state() -> (Arc<AppState>, Router) {
    let state = Arc::new(AppState::new(20554, "127.0.0.1".to_string(), Box::new(Silent)));
    (Arc::clone(&state), create_router(state))
}

/// Splits a server-sent event body into `(event, data)` pairs
struct EventReader {
    body: BodyDataStream,
    buf: String,
}

impl EventReader {
    fn new(body: Body) -> Self {
        Self { body: body.into_data_stream(), buf: String::new() }
    }

    async fn next(&mut self) -> (String, String) {
        loop {
            if let Some(end) = self.buf.find("\n\n") {
                let raw: String = self.buf.drain(..end + 2).collect();
                let mut name = String::new();
                let mut data = String::new();
                for line in raw.lines() {
                    if let Some(value) = line.strip_prefix("event:") {
                        name = value.trim().to_string();
                    } else if let Some(value) = line.strip_prefix("data:") {
                        data.push_str(value.trim());
                    }
                }
                // Keep-alive comments carry neither field.
                if name.is_empty() && data.is_empty() {
                    continue;
                }
                return (name, data);
            }

            let chunk = self.body.next().await.expect("stream open").expect("chunk");
            self.buf.push_str(std::str::from_utf8(&chunk).expect("utf8"));
        }
    }

    /// Skip events until one named `name` satisfies `accept`
    async fn find(&mut self, name: &str, accept: impl Fn(&str) -> bool) -> String {
        for _ in 0..10 {
            let (event, data) = self.next().await;
            if event == name && accept(&data) {
                return data;
            }
        }
        panic!("no matching {} event", name);
    }
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            request = request.header(header::CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(request.body(body).expect("request"))
        .await
        .expect("response");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("body");
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

#[tokio::test]
async fn fresh_timer_shows_default_focus() {
    let app = app();
    let (status, timer) = send(&app, "GET", "/timer", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(timer["display"], "25:00");
    assert_eq!(timer["status"], "idle");
    assert_eq!(timer["label"], "Focus");
    assert_eq!(timer["total_duration_seconds"], 1500);
    assert_eq!(timer["progress"], 0.0);
}

#[tokio::test]
async fn duration_is_clamped() {
    let app = app();
    let (status, body) = send(&app, "POST", "/timer/duration", Some(serde_json::json!({ "minutes": 90 }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["timer"]["display"], "60:00");

    let (_, body) = send(&app, "POST", "/timer/duration", Some(serde_json::json!({ "minutes": -3 }))).await;
    assert_eq!(body["timer"]["display"], "01:00");
}

#[tokio::test(start_paused = true)]
async fn preset_mid_run_stops_countdown() {
    let app = app();
    let (_, body) = send(&app, "POST", "/timer/start", None).await;
    assert_eq!(body["status"], "running");

    let (status, body) = send(&app, "POST", "/timer/preset/break-5", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "idle");
    assert_eq!(body["timer"]["display"], "05:00");
    assert_eq!(body["timer"]["label"], "Break");
}

#[tokio::test]
async fn unknown_preset_is_not_found() {
    let app = app();
    let (status, _) = send(&app, "POST", "/timer/preset/lunch-90", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn custom_duration_is_labelled() {
    let app = app();
    let (_, body) = send(&app, "POST", "/timer/custom", Some(serde_json::json!({ "minutes": 12 }))).await;
    assert_eq!(body["timer"]["label"], "Custom");
    assert_eq!(body["timer"]["display"], "12:00");
}

#[tokio::test(start_paused = true)]
async fn pause_twice_matches_pause_once() {
    let app = app();
    send(&app, "POST", "/timer/start", None).await;
    let (_, once) = send(&app, "POST", "/timer/pause", None).await;
    let (_, twice) = send(&app, "POST", "/timer/pause", None).await;

    assert_eq!(once["status"], "paused");
    assert_eq!(once["timer"], twice["timer"]);
}

#[tokio::test]
async fn presets_are_listed() {
    let app = app();
    let (status, body) = send(&app, "GET", "/presets", None).await;

    assert_eq!(status, StatusCode::OK);
    let presets = body["presets"].as_array().expect("presets array");
    assert_eq!(presets.len(), 5);
    assert_eq!(presets[0]["id"], "focus-25");
}

#[tokio::test]
async fn status_reports_last_action() {
    let app = app();
    send(&app, "POST", "/timer/reset", None).await;
    let (status, body) = send(&app, "GET", "/status", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["last_action"], "reset");
    assert_eq!(body["last_action_ago"], "0s ago");
    assert_eq!(body["last_completed"], Value::Null);
    assert_eq!(body["port"], 20554);
}

#[tokio::test]
async fn health_is_ok() {
    let app = app();
    let (status, body) = send(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test(start_paused = true)]
async fn event_stream_carries_timer_changes_and_refresh_pulses() {
    let (state, app) = app_with_state();
    let response = app
        .clone()
        .oneshot(Request::get("/events").body(Body::empty()).expect("request"))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    let mut events = EventReader::new(response.into_body());

    let (name, data) = events.next().await;
    assert_eq!(name, "timer");
    let initial: Value = serde_json::from_str(&data).expect("timer json");
    assert_eq!(initial["display"], "25:00");
    assert_eq!(initial["status"], "idle");

    send(&app, "POST", "/timer/start", None).await;
    let data = events
        .find("timer", |data| {
            serde_json::from_str::<Value>(data).map(|t| t["display"] == "24:59").unwrap_or(false)
        })
        .await;
    let ticked: Value = serde_json::from_str(&data).expect("timer json");
    assert_eq!(ticked["status"], "running");

    state.pause().unwrap();
    state.refresh_tx.send(7).expect("stream subscribed");
    let pulse = events.find("refresh", |_| true).await;
    assert_eq!(pulse, "7");
}
