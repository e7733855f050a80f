//! Outbound message delivery.

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use tracing::debug;

use crate::config::MessengerSettings;
use crate::error::{ServiceError, ServiceResult};

const SERVICE: &str = "messenger";

/// Delivers a text reply to a guest.
#[async_trait]
pub trait MessageSender: Send + Sync {
    /// Sends `text` to the recipient.
    async fn send_text(&self, recipient_id: &str, text: &str) -> ServiceResult<()>;
}

/// Client for the Messenger Send API.
#[derive(Clone)]
pub struct MessengerClient {
    client: Client,
    settings: MessengerSettings,
}

#[derive(Serialize)]
struct SendRequest<'a> {
    recipient: Recipient<'a>,
    message: OutboundMessage<'a>,
}

#[derive(Serialize)]
struct Recipient<'a> {
    id: &'a str,
}

#[derive(Serialize)]
struct OutboundMessage<'a> {
    text: &'a str,
}

impl MessengerClient {
    /// Creates a client sharing the given connection pool.
    pub fn new(client: Client, settings: MessengerSettings) -> Self {
        Self { client, settings }
    }

    fn endpoint(&self) -> String {
        format!("{}/me/messages", self.settings.graph_base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl MessageSender for MessengerClient {
    async fn send_text(&self, recipient_id: &str, text: &str) -> ServiceResult<()> {
        let body = SendRequest {
            recipient: Recipient { id: recipient_id },
            message: OutboundMessage { text },
        };

        self.client
            .post(self.endpoint())
            .query(&[("access_token", self.settings.page_access_token.as_str())])
            .json(&body)
            .send()
            .await
            .map_err(|e| ServiceError::upstream(SERVICE, e.to_string()))?
            .error_for_status()
            .map_err(|e| ServiceError::upstream(SERVICE, e.to_string()))?;

        debug!(recipient_id = %recipient_id, chars = text.len(), "Reply delivered");
        Ok(())
    }
}
