//! Conversation moderation and message polling.

use atrium_api_client::{ApiClient, ApiError, ApiResult, RequestOptions};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::interval;
use tracing::{debug, warn};

use crate::envelope::{unwrap_data, unwrap_unit};
use crate::{fill_candidates, ListQuery};

const CONVERSATIONS: &[&str] = &["/admin/chats", "/chats", "/conversations"];
const MESSAGES: &[&str] = &["/admin/chats/:chat_id/messages", "/chats/:chat_id/messages"];
const MESSAGE: &[&str] = &[
    "/admin/chats/:chat_id/messages/:id",
    "/chats/:chat_id/messages/:id",
];

/// A conversation between platform users.
#[derive(Debug, Clone, Deserialize)]
pub struct Conversation {
    pub id: u64,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub participant_ids: Vec<u64>,
    #[serde(default)]
    pub last_message_at: Option<String>,
}

/// One message inside a conversation.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatMessage {
    pub id: u64,
    pub sender_id: u64,
    pub body: String,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Chat moderation operations.
#[derive(Clone)]
pub struct ChatApi {
    client: Arc<ApiClient>,
}

impl ChatApi {
    pub(crate) fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    pub async fn list_conversations(&self, list: &ListQuery) -> ApiResult<Vec<Conversation>> {
        let payload = self
            .client
            .request_with_fallback(
                CONVERSATIONS,
                RequestOptions::get().with_query(list.to_query()),
            )
            .await?;
        unwrap_data(payload)
    }

    pub async fn messages(&self, chat_id: u64, list: &ListQuery) -> ApiResult<Vec<ChatMessage>> {
        let candidates = fill_candidates(MESSAGES, &[("chat_id", &chat_id.to_string())]);
        let payload = self
            .client
            .request_with_fallback(&candidates, RequestOptions::get().with_query(list.to_query()))
            .await?;
        unwrap_data(payload)
    }

    /// Send a message into a conversation as the platform.
    pub async fn send(&self, chat_id: u64, body: &str) -> ApiResult<ChatMessage> {
        let candidates = fill_candidates(MESSAGES, &[("chat_id", &chat_id.to_string())]);
        let payload = self
            .client
            .request_with_fallback(&candidates, RequestOptions::post(json!({ "body": body })))
            .await?;
        unwrap_data(payload)
    }

    /// Remove a message from a conversation.
    pub async fn delete_message(&self, chat_id: u64, id: u64) -> ApiResult<()> {
        let candidates = fill_candidates(
            MESSAGE,
            &[("chat_id", &chat_id.to_string()), ("id", &id.to_string())],
        );
        let payload = self
            .client
            .request_with_fallback(&candidates, RequestOptions::delete())
            .await?;
        unwrap_unit(payload)
    }

    /// Start re-fetching a conversation on a fixed interval.
    ///
    /// Each tick is an independent fetch delivered on the returned
    /// channel; consumers keep the latest page (last write wins). Polling
    /// stops when the handle is stopped or dropped, when the consumer
    /// goes away, or when the session expires.
    pub fn poll_messages(
        &self,
        chat_id: u64,
        every: Duration,
    ) -> (MessagePoller, mpsc::Receiver<Vec<ChatMessage>>) {
        let (tx, rx) = mpsc::channel(8);
        let api = self.clone();

        let handle = tokio::spawn(async move {
            let mut ticker = interval(every);
            loop {
                ticker.tick().await;
                match api.messages(chat_id, &ListQuery::new()).await {
                    Ok(messages) => {
                        debug!(chat_id, count = messages.len(), "Message poll tick");
                        if tx.send(messages).await.is_err() {
                            break;
                        }
                    }
                    Err(ApiError::Unauthorized) => {
                        warn!(chat_id, "Signed out, stopping message poll");
                        break;
                    }
                    Err(err) => {
                        warn!(chat_id, error = %err, "Message poll failed");
                    }
                }
            }
        });

        (MessagePoller { handle }, rx)
    }
}

/// Handle over a running message poll.
pub struct MessagePoller {
    handle: tokio::task::JoinHandle<()>,
}

impl MessagePoller {
    /// Stop polling. Dropping the handle has the same effect.
    pub fn stop(&self) {
        self.handle.abort();
    }
}

impl Drop for MessagePoller {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
