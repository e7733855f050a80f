//! HTTP API.
//!
//! This module exposes the messaging webhook, question intake, admin payroll
//! and staff attendance endpoints.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::{EVENT_RECEIVED, create_router};
pub use request::{
    AttendanceCodeRequest, PayrollRunRequest, PunchRequest, QuestionRequest, WebhookEnvelope,
    WebhookVerifyParams,
};
pub use response::{ApiError, ApiErrorResponse, HealthResponse};
pub use state::{AccessTokens, AppState};
