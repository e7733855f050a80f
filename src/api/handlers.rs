//! HTTP request handlers.
//!
//! This module contains the handler functions for all API endpoints and the
//! router that wires them together.

use std::time::Instant;

use axum::{
    Json, Router,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::Utc;
use serde::Serialize;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use uuid::Uuid;

use crate::attendance::Punch;
use crate::calculation::compute_payroll_line;
use crate::concierge::Concierge;
use crate::error::{ServiceError, ServiceResult};
use crate::knowledge::CategoryClassifier;
use crate::models::{PayrollInput, PayrollLine, PayrollRun, PayrollRunTotals, QuestionRecord};

use super::request::{
    AttendanceCodeRequest, PayrollRunRequest, PunchRequest, QuestionRequest, WebhookEnvelope,
    WebhookVerifyParams,
};
use super::response::{
    ApiError, ApiErrorResponse, AttendanceCodeResponse, HealthResponse, PunchResponse,
    QuestionResponse,
};
use super::state::AppState;

/// Acknowledgement body the messaging platform expects.
pub const EVENT_RECEIVED: &str = "EVENT_RECEIVED";

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/webhook", get(verify_webhook_handler).post(receive_webhook_handler))
        .route("/questions", post(question_handler))
        .route("/payroll/compute", post(payroll_compute_handler))
        .route("/payroll/runs", post(payroll_run_handler))
        .route("/payroll/runs/:run_id", get(payroll_run_lookup_handler))
        .route("/attendance/codes", post(attendance_code_handler))
        .route("/attendance/check-in", post(check_in_handler))
        .route("/attendance/check-out", post(check_out_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    (status, [(header::CONTENT_TYPE, "application/json")], Json(body)).into_response()
}

fn error_response(correlation_id: Uuid, err: ServiceError) -> Response {
    warn!(correlation_id = %correlation_id, error = %err, "Request failed");
    let api_error: ApiErrorResponse = err.into();
    json_response(api_error.status, api_error.error)
}

/// Unwraps a JSON body, mapping extractor rejections to a 400 response.
fn parse_body<T>(
    payload: Result<Json<T>, JsonRejection>,
    correlation_id: Uuid,
) -> Result<T, Response> {
    let rejection = match payload {
        Ok(Json(body)) => return Ok(body),
        Err(rejection) => rejection,
    };

    let error = match rejection {
        JsonRejection::JsonDataError(err) => {
            let body_text = err.body_text();
            warn!(correlation_id = %correlation_id, error = %body_text, "JSON data error");
            if body_text.contains("missing field") {
                ApiError::validation_error(body_text)
            } else {
                ApiError::malformed_json(body_text)
            }
        }
        JsonRejection::JsonSyntaxError(err) => {
            warn!(correlation_id = %correlation_id, error = %err, "JSON syntax error");
            ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
        }
        JsonRejection::MissingJsonContentType(_) => {
            ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
        }
        _ => ApiError::malformed_json("Failed to parse request body"),
    };
    Err(json_response(StatusCode::BAD_REQUEST, error))
}

/// Checks `Authorization: Bearer <token>` against the admin token.
fn require_admin(headers: &HeaderMap, state: &AppState) -> ServiceResult<()> {
    let presented = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim);

    match presented {
        Some(token) if !token.is_empty() && token == state.tokens().admin_token => Ok(()),
        _ => Err(ServiceError::Unauthorized),
    }
}

/// Handler for GET /health.
async fn health_handler() -> impl IntoResponse {
    json_response(
        StatusCode::OK,
        HealthResponse {
            status: "ok".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
    )
}

/// Handler for GET /webhook.
///
/// Echoes `hub.challenge` when the verify token matches, otherwise 403.
async fn verify_webhook_handler(
    State(state): State<AppState>,
    Query(params): Query<WebhookVerifyParams>,
) -> Response {
    match params.accepted_challenge(&state.tokens().verify_token) {
        Some(challenge) => {
            info!("Webhook verified");
            (StatusCode::OK, challenge.to_string()).into_response()
        }
        None => {
            warn!(mode = ?params.mode, "Webhook verification rejected");
            StatusCode::FORBIDDEN.into_response()
        }
    }
}

/// Handler for POST /webhook.
///
/// Acknowledges immediately; each text message is answered in its own task.
async fn receive_webhook_handler(
    State(state): State<AppState>,
    payload: Result<Json<WebhookEnvelope>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let envelope = match parse_body(payload, correlation_id) {
        Ok(envelope) => envelope,
        Err(response) => return response,
    };

    if !envelope.is_page() {
        warn!(correlation_id = %correlation_id, object = %envelope.object, "Ignoring non-page webhook");
        return StatusCode::NOT_FOUND.into_response();
    }

    let messages = envelope.text_messages();
    info!(correlation_id = %correlation_id, messages = messages.len(), "Webhook received");

    for (sender_id, text) in messages {
        let state = state.clone();
        tokio::spawn(async move {
            let started = Instant::now();
            let concierge =
                Concierge::new(state.store(), state.generator(), state.config().concierge());
            let reply = concierge.handle_message(state.sender(), &sender_id, &text).await;
            info!(
                correlation_id = %correlation_id,
                sender_id = %sender_id,
                source = ?reply.source,
                duration_us = started.elapsed().as_micros() as u64,
                "Message answered"
            );
        });
    }

    (StatusCode::OK, EVENT_RECEIVED).into_response()
}

/// Handler for POST /questions.
async fn question_handler(
    State(state): State<AppState>,
    payload: Result<Json<QuestionRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let request = match parse_body(payload, correlation_id) {
        Ok(request) => request,
        Err(response) => return response,
    };

    let question = request.question.trim();
    if question.is_empty() {
        return json_response(
            StatusCode::BAD_REQUEST,
            ApiError::validation_error("question must not be empty"),
        );
    }

    let classification = CategoryClassifier::new(state.generator()).classify(question).await;
    let record = QuestionRecord {
        id: Uuid::new_v4(),
        question: question.to_string(),
        hotel_id: request.hotel_id,
        category: classification.category,
        created_at: Utc::now(),
    };
    let id = record.id;

    if let Err(err) = state.store().save_question(record).await {
        return error_response(correlation_id, err);
    }

    info!(
        correlation_id = %correlation_id,
        category = classification.category.as_str(),
        source = ?classification.source,
        "Question saved"
    );
    json_response(
        StatusCode::CREATED,
        QuestionResponse {
            id,
            category: classification.category,
            source: classification.source,
        },
    )
}

/// Handler for POST /payroll/compute.
async fn payroll_compute_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<PayrollInput>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    if let Err(err) = require_admin(&headers, &state) {
        return error_response(correlation_id, err);
    }
    let input = match parse_body(payload, correlation_id) {
        Ok(input) => input,
        Err(response) => return response,
    };

    match compute_payroll_line(&input, state.config().payroll()) {
        Ok(line) => {
            info!(
                correlation_id = %correlation_id,
                employee_id = %line.employee_id,
                gross = %line.gross,
                net = %line.net,
                duration_us = line.audit_trace.duration_us,
                "Payroll line computed"
            );
            json_response(StatusCode::OK, line)
        }
        Err(err) => error_response(correlation_id, err),
    }
}

/// Computes every line of a run request.
fn build_payroll_run(request: PayrollRunRequest, state: &AppState) -> ServiceResult<PayrollRun> {
    if request.period_end < request.period_start {
        return Err(ServiceError::invalid_input(
            "period_end",
            "must not be before period_start",
        ));
    }
    if request.lines.is_empty() {
        return Err(ServiceError::invalid_input(
            "lines",
            "a payroll run needs at least one employee",
        ));
    }

    let lines = request
        .lines
        .iter()
        .map(|input| compute_payroll_line(input, state.config().payroll()))
        .collect::<ServiceResult<Vec<PayrollLine>>>()?;

    Ok(PayrollRun {
        id: Uuid::new_v4(),
        label: request.label,
        period_start: request.period_start,
        period_end: request.period_end,
        created_at: Utc::now(),
        totals: PayrollRunTotals::from_lines(&lines),
        lines,
    })
}

/// Handler for POST /payroll/runs.
async fn payroll_run_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<PayrollRunRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    if let Err(err) = require_admin(&headers, &state) {
        return error_response(correlation_id, err);
    }
    let request = match parse_body(payload, correlation_id) {
        Ok(request) => request,
        Err(response) => return response,
    };

    let run = match build_payroll_run(request, &state) {
        Ok(run) => run,
        Err(err) => return error_response(correlation_id, err),
    };
    if let Err(err) = state.store().save_payroll_run(run.clone()).await {
        return error_response(correlation_id, err);
    }

    info!(
        correlation_id = %correlation_id,
        run_id = %run.id,
        lines = run.lines.len(),
        net = %run.totals.net,
        "Payroll run saved"
    );
    json_response(StatusCode::CREATED, run)
}

/// Handler for GET /payroll/runs/:run_id.
async fn payroll_run_lookup_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(run_id): Path<Uuid>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    if let Err(err) = require_admin(&headers, &state) {
        return error_response(correlation_id, err);
    }

    match state.store().get_payroll_run(run_id).await {
        Ok(Some(run)) => json_response(StatusCode::OK, run),
        Ok(None) => error_response(
            correlation_id,
            ServiceError::NotFound {
                kind: "payroll run".to_string(),
                id: run_id.to_string(),
            },
        ),
        Err(err) => error_response(correlation_id, err),
    }
}

/// Handler for POST /attendance/codes.
async fn attendance_code_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<AttendanceCodeRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    if let Err(err) = require_admin(&headers, &state) {
        return error_response(correlation_id, err);
    }
    let request = match parse_body(payload, correlation_id) {
        Ok(request) => request,
        Err(response) => return response,
    };

    let issued_by = request
        .issued_by
        .filter(|label| !label.trim().is_empty())
        .unwrap_or_else(|| "admin".to_string());
    let code = state.attendance().issue_code(&issued_by).await;
    json_response(StatusCode::CREATED, AttendanceCodeResponse { code })
}

async fn punch(
    state: AppState,
    payload: Result<Json<PunchRequest>, JsonRejection>,
    punch: Punch,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let request = match parse_body(payload, correlation_id) {
        Ok(request) => request,
        Err(response) => return response,
    };

    let result = state
        .attendance()
        .punch(
            state.store(),
            request.attempt_key(),
            &request.employee_id,
            &request.code,
            punch,
        )
        .await;

    match result {
        Ok(record) => {
            let worked_minutes = record.worked_minutes();
            json_response(StatusCode::OK, PunchResponse { record, worked_minutes })
        }
        Err(err) => error_response(correlation_id, err),
    }
}

/// Handler for POST /attendance/check-in.
async fn check_in_handler(
    State(state): State<AppState>,
    payload: Result<Json<PunchRequest>, JsonRejection>,
) -> Response {
    punch(state, payload, Punch::In).await
}

/// Handler for POST /attendance/check-out.
async fn check_out_handler(
    State(state): State<AppState>,
    payload: Result<Json<PunchRequest>, JsonRejection>,
) -> Response {
    punch(state, payload, Punch::Out).await
}
