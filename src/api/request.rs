//! Request types for the HTTP API.
//!
//! This module defines the query strings and JSON bodies accepted by the
//! webhook, question intake, payroll and attendance endpoints.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::PayrollInput;

/// Query string of the webhook verification handshake.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WebhookVerifyParams {
    /// Expected to be `subscribe`.
    #[serde(rename = "hub.mode")]
    pub mode: Option<String>,
    /// Compared against the configured verify token.
    #[serde(rename = "hub.verify_token")]
    pub verify_token: Option<String>,
    /// Echoed back on success.
    #[serde(rename = "hub.challenge")]
    pub challenge: Option<String>,
}

impl WebhookVerifyParams {
    /// Returns the challenge when the handshake is valid for `expected_token`.
    pub fn accepted_challenge(&self, expected_token: &str) -> Option<&str> {
        match (self.mode.as_deref(), self.verify_token.as_deref()) {
            (Some("subscribe"), Some(token)) if token == expected_token => {
                Some(self.challenge.as_deref().unwrap_or_default())
            }
            _ => None,
        }
    }
}

/// Body of a messaging-platform webhook delivery.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookEnvelope {
    /// `page` for page subscriptions.
    pub object: String,
    /// Batched entries.
    #[serde(default)]
    pub entry: Vec<WebhookEntry>,
}

/// One entry of a webhook delivery.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookEntry {
    /// Messaging events in this entry.
    #[serde(default)]
    pub messaging: Vec<MessagingEvent>,
}

/// A single messaging event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessagingEvent {
    /// Who sent it.
    pub sender: Participant,
    /// The message, absent for deliveries, reads and postbacks.
    #[serde(default)]
    pub message: Option<InboundMessage>,
}

/// A messaging participant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Participant {
    /// Page-scoped ID.
    pub id: String,
}

/// An inbound message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InboundMessage {
    /// Message text; absent for attachments.
    #[serde(default)]
    pub text: Option<String>,
    /// Set on messages the page itself sent.
    #[serde(default)]
    pub is_echo: bool,
}

impl WebhookEnvelope {
    /// Returns true for page subscriptions.
    pub fn is_page(&self) -> bool {
        self.object == "page"
    }

    /// Yields `(sender_id, text)` for every answerable text message.
    ///
    /// Echoes, attachments and blank messages are skipped.
    pub fn text_messages(&self) -> Vec<(String, String)> {
        self.entry
            .iter()
            .flat_map(|entry| entry.messaging.iter())
            .filter_map(|event| {
                let message = event.message.as_ref().filter(|m| !m.is_echo)?;
                let text = message.text.as_deref().map(str::trim).filter(|t| !t.is_empty())?;
                Some((event.sender.id.clone(), text.to_string()))
            })
            .collect()
    }
}

/// Body of `POST /questions`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionRequest {
    /// The raw question.
    pub question: String,
    /// Hotel the question is about, if known.
    #[serde(default)]
    pub hotel_id: Option<String>,
}

/// Body of `POST /payroll/runs`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayrollRunRequest {
    /// Free-text label.
    pub label: String,
    /// First day of the period.
    pub period_start: NaiveDate,
    /// Last day of the period.
    pub period_end: NaiveDate,
    /// One input per employee.
    pub lines: Vec<PayrollInput>,
}

/// Body of `POST /attendance/codes`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AttendanceCodeRequest {
    /// Label of the issuing admin or terminal.
    #[serde(default)]
    pub issued_by: Option<String>,
}

/// Body of the check-in and check-out endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PunchRequest {
    /// The employee punching.
    pub employee_id: String,
    /// Code scanned from the terminal.
    pub code: String,
    /// Identifies the device for failed-attempt tracking.
    #[serde(default)]
    pub client_id: Option<String>,
}

impl PunchRequest {
    /// The key failed attempts are counted against.
    pub fn attempt_key(&self) -> &str {
        self.client_id
            .as_deref()
            .filter(|c| !c.trim().is_empty())
            .unwrap_or(&self.employee_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verify_params_accept_matching_token() {
        let params = WebhookVerifyParams {
            mode: Some("subscribe".to_string()),
            verify_token: Some("secret".to_string()),
            challenge: Some("1158201444".to_string()),
        };
        assert_eq!(params.accepted_challenge("secret"), Some("1158201444"));
        assert_eq!(params.accepted_challenge("other"), None);
    }

    #[test]
    fn test_verify_params_require_subscribe_mode() {
        let params = WebhookVerifyParams {
            mode: Some("unsubscribe".to_string()),
            verify_token: Some("secret".to_string()),
            challenge: Some("1".to_string()),
        };
        assert_eq!(params.accepted_challenge("secret"), None);
    }

    #[test]
    fn test_text_messages_skip_echoes_and_attachments() {
        let envelope: WebhookEnvelope = serde_json::from_value(serde_json::json!({
            "object": "page",
            "entry": [{
                "messaging": [
                    {"sender": {"id": "u1"}, "message": {"text": "rates at bicotel?"}},
                    {"sender": {"id": "page"}, "message": {"text": "echo", "is_echo": true}},
                    {"sender": {"id": "u2"}, "message": {"attachments": []}},
                    {"sender": {"id": "u3"}, "delivery": {"watermark": 1}},
                    {"sender": {"id": "u4"}, "message": {"text": "   "}}
                ]
            }]
        }))
        .unwrap();

        assert!(envelope.is_page());
        assert_eq!(
            envelope.text_messages(),
            vec![("u1".to_string(), "rates at bicotel?".to_string())]
        );
    }

    #[test]
    fn test_attempt_key_falls_back_to_employee() {
        let mut request = PunchRequest {
            employee_id: "emp_001".to_string(),
            code: "abc".to_string(),
            client_id: None,
        };
        assert_eq!(request.attempt_key(), "emp_001");
        request.client_id = Some("terminal-2".to_string());
        assert_eq!(request.attempt_key(), "terminal-2");
    }
}
