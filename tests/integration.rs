//! End-to-end tests for the HTTP API.
//!
//! The router is built from the shipped `config/` directory and the
//! `data/knowledge.json` seed, with scripted stand-ins for the generative
//! model and the messaging platform. Covered:
//! - webhook verification and delivery
//! - price short-circuit and broad-context replies
//! - question intake with rule fallback
//! - payroll computation and persisted runs
//! - attendance codes, punches and lockout
//! - error cases

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use serde_json::{Value, json};
use tokio::sync::mpsc;
use tower::ServiceExt;

use innkeeper::api::{AccessTokens, AppState, EVENT_RECEIVED, create_router};
use innkeeper::config::ConfigLoader;
use innkeeper::error::{ServiceError, ServiceResult};
use innkeeper::llm::TextGenerator;
use innkeeper::messenger::MessageSender;
use innkeeper::models::ReplySource;
use innkeeper::store::MemoryStore;

const ADMIN: &str = "Bearer test-admin";

// =============================================================================
// Test Helpers
// =============================================================================

/// Replies with a fixed text, or fails when `reply` is `None`.
struct ScriptedGenerator {
    reply: Option<String>,
    prompts: Mutex<Vec<String>>,
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    async fn generate(&self, prompt: &str) -> ServiceResult<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.reply
            .clone()
            .ok_or_else(|| ServiceError::upstream("gemini", "scripted failure"))
    }
}

struct ChannelSender {
    outbox: mpsc::UnboundedSender<(String, String)>,
}

#[async_trait]
impl MessageSender for ChannelSender {
    async fn send_text(&self, recipient_id: &str, text: &str) -> ServiceResult<()> {
        let _ = self.outbox.send((recipient_id.to_string(), text.to_string()));
        Ok(())
    }
}

struct Harness {
    router: Router,
    store: Arc<MemoryStore>,
    generator: Arc<ScriptedGenerator>,
    outbox: mpsc::UnboundedReceiver<(String, String)>,
}

fn harness(reply: Option<&str>) -> Harness {
    let config = ConfigLoader::load("./config").expect("Failed to load config");
    let store = Arc::new(
        MemoryStore::from_seed_file("./data/knowledge.json").expect("Failed to load seed"),
    );
    let generator = Arc::new(ScriptedGenerator {
        reply: reply.map(str::to_string),
        prompts: Mutex::new(Vec::new()),
    });
    let (tx, rx) = mpsc::unbounded_channel();

    let state = AppState::new(
        config,
        AccessTokens {
            verify_token: "test-verify".to_string(),
            admin_token: "test-admin".to_string(),
        },
        store.clone(),
        generator.clone(),
        Arc::new(ChannelSender { outbox: tx }),
    );

    Harness {
        router: create_router(state),
        store,
        generator,
        outbox: rx,
    }
}

async fn send(
    router: &Router,
    method: &str,
    uri: &str,
    auth: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Vec<u8>) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(auth) = auth {
        builder = builder.header("Authorization", auth);
    }
    let body = match body {
        Some(value) => {
            builder = builder.header("Content-Type", "application/json");
            Body::from(value.to_string())
        }
        None => Body::empty(),
    };

    let response = router
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, bytes.to_vec())
}

async fn send_json(
    router: &Router,
    method: &str,
    uri: &str,
    auth: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let (status, bytes) = send(router, method, uri, auth, body).await;
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn page_event(sender_id: &str, text: &str) -> Value {
    json!({
        "object": "page",
        "entry": [{
            "id": "page-1",
            "time": 1700000000,
            "messaging": [{
                "sender": {"id": sender_id},
                "recipient": {"id": "page-1"},
                "message": {"mid": "m1", "text": text}
            }]
        }]
    })
}

async fn next_reply(outbox: &mut mpsc::UnboundedReceiver<(String, String)>) -> (String, String) {
    tokio::time::timeout(Duration::from_secs(5), outbox.recv())
        .await
        .expect("reply not delivered in time")
        .expect("sender dropped")
}

async fn wait_for_logs(store: &MemoryStore, count: usize) {
    for _ in 0..100 {
        if store.conversations().await.len() >= count {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("conversation log not written");
}

fn daily_input(employee_id: &str) -> Value {
    json!({
        "employee_id": employee_id,
        "daily_rate": "500",
        "days_worked": "13"
    })
}

// =============================================================================
// Health & Webhook
// =============================================================================

#[tokio::test]
async fn test_health_reports_version() {
    let h = harness(None);
    let (status, body) = send_json(&h.router, "GET", "/health", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_webhook_verification_echoes_challenge() {
    let h = harness(None);
    let (status, body) = send(
        &h.router,
        "GET",
        "/webhook?hub.mode=subscribe&hub.verify_token=test-verify&hub.challenge=1158201444",
        None,
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"1158201444");
}

#[tokio::test]
async fn test_webhook_verification_rejects_wrong_token() {
    let h = harness(None);
    let (status, _) = send(
        &h.router,
        "GET",
        "/webhook?hub.mode=subscribe&hub.verify_token=nope&hub.challenge=1",
        None,
        None,
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_webhook_ignores_non_page_objects() {
    let h = harness(None);
    let (status, _) = send(
        &h.router,
        "POST",
        "/webhook",
        None,
        Some(json!({"object": "instagram", "entry": []})),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_price_question_is_answered_without_generation() {
    let mut h = harness(Some("should not be used"));
    let (status, body) = send(
        &h.router,
        "POST",
        "/webhook",
        None,
        Some(page_event("guest-1", "how much at bicotel?")),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, EVENT_RECEIVED.as_bytes());

    let (recipient, text) = next_reply(&mut h.outbox).await;
    assert_eq!(recipient, "guest-1");
    assert!(text.contains("Standard Room"), "unexpected reply: {}", text);
    assert!(text.contains("1,500"), "unexpected reply: {}", text);
    assert!(h.generator.prompts.lock().unwrap().is_empty());

    wait_for_logs(&h.store, 1).await;
    let logs = h.store.conversations().await;
    assert_eq!(logs[0].hotel_id.as_deref(), Some("dmariners"));
    assert_eq!(logs[0].source, ReplySource::PriceAnswer);
}

#[tokio::test]
async fn test_unmatched_question_uses_whole_knowledge_base() {
    let mut h = harness(Some("Seabreeze Resort has a pool open until 9 PM."));
    send(
        &h.router,
        "POST",
        "/webhook",
        None,
        Some(page_event("guest-2", "do you have a pool anywhere?")),
    )
    .await;

    let (_, text) = next_reply(&mut h.outbox).await;
    assert_eq!(text, "Seabreeze Resort has a pool open until 9 PM.");

    let prompts = h.generator.prompts.lock().unwrap().clone();
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].contains("Seabreeze Resort"));
    assert!(prompts[0].contains("Balanga City Inn"));
    assert!(prompts[0].contains("cancellation"));

    wait_for_logs(&h.store, 1).await;
    assert_eq!(h.store.conversations().await[0].source, ReplySource::BroadContext);
}

#[tokio::test]
async fn test_generation_failure_sends_configured_apology() {
    let mut h = harness(None);
    send(
        &h.router,
        "POST",
        "/webhook",
        None,
        Some(page_event("guest-3", "is the seabreeze resort pet friendly?")),
    )
    .await;

    let (_, text) = next_reply(&mut h.outbox).await;
    assert!(text.starts_with("Sorry"), "unexpected reply: {}", text);

    wait_for_logs(&h.store, 1).await;
    let log = &h.store.conversations().await[0];
    assert_eq!(log.source, ReplySource::Fallback);
    assert_eq!(log.hotel_id.as_deref(), Some("seabreeze"));
}

// =============================================================================
// Question intake
// =============================================================================

#[tokio::test]
async fn test_question_falls_back_to_rules_when_model_fails() {
    let h = harness(None);
    let (status, body) = send_json(
        &h.router,
        "POST",
        "/questions",
        None,
        Some(json!({"question": "What is the cancellation policy?"})),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["category"], "policies");
    assert_eq!(body["source"], "rules");

    let saved = h.store.questions().await;
    assert_eq!(saved.len(), 1);
    assert_eq!(saved[0].question, "What is the cancellation policy?");
}

#[tokio::test]
async fn test_question_uses_model_category() {
    let h = harness(Some("Directions"));
    let (status, body) = send_json(
        &h.router,
        "POST",
        "/questions",
        None,
        Some(json!({"question": "Paano pumunta sa hotel?", "hotel_id": "dmariners"})),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["category"], "directions");
    assert_eq!(body["source"], "model");
    assert_eq!(h.store.questions().await[0].hotel_id.as_deref(), Some("dmariners"));
}

#[tokio::test]
async fn test_blank_question_is_rejected() {
    let h = harness(None);
    let (status, body) = send_json(
        &h.router,
        "POST",
        "/questions",
        None,
        Some(json!({"question": "   "})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

// =============================================================================
// Payroll
// =============================================================================

#[tokio::test]
async fn test_payroll_daily_rate_with_flat_deductions() {
    let h = harness(None);
    let (status, body) = send_json(
        &h.router,
        "POST",
        "/payroll/compute",
        Some(ADMIN),
        Some(daily_input("emp_001")),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["gross"]["cents"], 650000);
    assert_eq!(body["gross"]["amount"], "6500.00");
    // 4.5% + 2.5% + 2% of 6500.00
    assert_eq!(body["total_deductions"]["cents"], 58500);
    assert_eq!(body["net"]["cents"], 591500);
    assert_eq!(body["contributions"][0]["scheme"], "pension");
    assert_eq!(body["contributions"][0]["basis"], "flat_percentage");

    let steps = body["audit_trace"]["steps"].as_array().unwrap();
    assert_eq!(steps[0]["rule_id"], "base_pay");
}

#[tokio::test]
async fn test_payroll_monthly_salary_half_period() {
    let h = harness(None);
    let (status, body) = send_json(
        &h.router,
        "POST",
        "/payroll/compute",
        Some(ADMIN),
        Some(json!({
            "employee_id": "emp_002",
            "daily_rate": "1000",
            "days_worked": "13",
            "monthly_salary": "30000",
            "period_factor": "0.5"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let contributions = body["contributions"].as_array().unwrap();
    assert_eq!(contributions[0]["employee"]["cents"], 75000);
    assert_eq!(contributions[0]["employer"]["cents"], 150000);
    assert_eq!(contributions[1]["employee"]["cents"], 37500);
    assert_eq!(contributions[2]["employee"]["cents"], 10000);
    assert_eq!(contributions[0]["basis"], "monthly_salary");
}

#[tokio::test]
async fn test_payroll_rejects_negative_hours() {
    let h = harness(None);
    let (status, body) = send_json(
        &h.router,
        "POST",
        "/payroll/compute",
        Some(ADMIN),
        Some(json!({
            "employee_id": "emp_001",
            "daily_rate": "500",
            "days_worked": "13",
            "overtime_hours": "-2"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_PAYROLL_INPUT");
}

#[tokio::test]
async fn test_payroll_rejects_out_of_range_daily_rate() {
    let h = harness(None);
    let (status, body) = send_json(
        &h.router,
        "POST",
        "/payroll/compute",
        Some(ADMIN),
        Some(json!({
            "employee_id": "emp_001",
            "daily_rate": "1000000000000000000000000000",
            "days_worked": "1"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_PAYROLL_INPUT");
    assert_eq!(body["details"], "Check the 'daily_rate' field of the payroll input");
}

#[tokio::test]
async fn test_payroll_requires_admin_token() {
    let h = harness(None);
    let (status, body) = send_json(
        &h.router,
        "POST",
        "/payroll/compute",
        None,
        Some(daily_input("emp_001")),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn test_payroll_run_is_saved_and_fetched() {
    let h = harness(None);
    let (status, created) = send_json(
        &h.router,
        "POST",
        "/payroll/runs",
        Some(ADMIN),
        Some(json!({
            "label": "October 1-15",
            "period_start": "2024-10-01",
            "period_end": "2024-10-15",
            "lines": [daily_input("emp_001"), daily_input("emp_002")]
        })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["totals"]["gross"]["cents"], 1300000);
    assert_eq!(created["totals"]["net"]["cents"], 1183000);

    let run_id = created["id"].as_str().unwrap();
    let (status, fetched) = send_json(
        &h.router,
        "GET",
        &format!("/payroll/runs/{}", run_id),
        Some(ADMIN),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["label"], "October 1-15");
    assert_eq!(fetched["lines"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_unknown_payroll_run_is_not_found() {
    let h = harness(None);
    let (status, body) = send_json(
        &h.router,
        "GET",
        "/payroll/runs/6f1c1d2e-7d43-4a43-9a0f-2f6e0b1b9c11",
        Some(ADMIN),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");
}

// =============================================================================
// Attendance
// =============================================================================

async fn issue_code(router: &Router) -> String {
    let (status, body) = send_json(
        router,
        "POST",
        "/attendance/codes",
        Some(ADMIN),
        Some(json!({"issued_by": "front-desk"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["issued_by"], "front-desk");
    body["code"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_check_in_and_out() {
    let h = harness(None);
    let code = issue_code(&h.router).await;
    let punch = json!({"employee_id": "emp_001", "code": code});

    let (status, body) =
        send_json(&h.router, "POST", "/attendance/check-in", None, Some(punch.clone())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["record"]["employee_id"], "emp_001");
    assert!(body["record"]["checked_out_at"].is_null());

    let (status, body) =
        send_json(&h.router, "POST", "/attendance/check-in", None, Some(punch.clone())).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "DUPLICATE_CHECK_IN");

    let (status, body) =
        send_json(&h.router, "POST", "/attendance/check-out", None, Some(punch)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["worked_minutes"], 0);

    let saved = h.store.attendance().await;
    assert_eq!(saved.len(), 1);
    assert!(saved[0].checked_out_at.is_some());
}

#[tokio::test]
async fn test_check_out_without_check_in() {
    let h = harness(None);
    let code = issue_code(&h.router).await;

    let (status, body) = send_json(
        &h.router,
        "POST",
        "/attendance/check-out",
        None,
        Some(json!({"employee_id": "emp_002", "code": code})),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "NOT_CHECKED_IN");
}

#[tokio::test]
async fn test_inactive_employee_cannot_check_in() {
    let h = harness(None);
    let code = issue_code(&h.router).await;

    let (status, body) = send_json(
        &h.router,
        "POST",
        "/attendance/check-in",
        None,
        Some(json!({"employee_id": "emp_003", "code": code})),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "UNKNOWN_EMPLOYEE");
}

#[tokio::test]
async fn test_repeated_bad_codes_lock_the_client() {
    let h = harness(None);
    let punch = json!({"employee_id": "emp_001", "code": "not-a-code", "client_id": "kiosk-9"});

    for _ in 0..5 {
        let (status, body) =
            send_json(&h.router, "POST", "/attendance/check-in", None, Some(punch.clone())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "INVALID_ATTENDANCE_CODE");
    }

    let (status, body) =
        send_json(&h.router, "POST", "/attendance/check-in", None, Some(punch)).await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(body["code"], "ATTENDANCE_LOCKED");

    // A different terminal is unaffected.
    let code = issue_code(&h.router).await;
    let (status, _) = send_json(
        &h.router,
        "POST",
        "/attendance/check-in",
        None,
        Some(json!({"employee_id": "emp_001", "code": code, "client_id": "kiosk-1"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}
