//! Slack Web API client.
//!
//! Token-authenticated calls against `https://slack.com/api`. Every response
//! carries the `ok`/`error` envelope; `ok: false` is mapped to a structured
//! error rather than surfacing as a deserialization failure.

use serde::Deserialize;
use tracing::{debug, instrument};

use crate::blocks::Block;
use crate::errors::{ChatError, DeliveryStep};

/// A resolved chat user.
#[derive(Clone, Debug, Deserialize)]
pub struct UserHandle {
    /// Slack user id (`U…`).
    pub id: String,
    /// Display name, informational only.
    #[serde(default)]
    pub name: String,
}

/// Slack error code for an email with no matching account.
const USERS_NOT_FOUND: &str = "users_not_found";

#[derive(Deserialize)]
struct LookupUserResponse {
    ok: bool,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    user: Option<UserHandle>,
}

#[derive(Deserialize)]
struct OpenConversationResponse {
    ok: bool,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    channel: Option<ChannelHandle>,
}

#[derive(Deserialize)]
struct ChannelHandle {
    id: String,
}

#[derive(Deserialize)]
struct PostMessageResponse {
    ok: bool,
    #[serde(default)]
    error: Option<String>,
}

/// Token-authenticated Slack client.
pub struct ChatClient {
    http: reqwest::Client,
    base_url: String,
    token: String,
}

impl ChatClient {
    /// Create a client against the production endpoint.
    #[must_use]
    pub fn new(token: &str) -> Self {
        Self::with_base_url(token, "https://slack.com/api")
    }

    /// Create a client against a specific endpoint (tests, proxies).
    #[must_use]
    pub fn with_base_url(token: &str, base_url: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
        }
    }

    /// Resolve a user from an email address via `users.lookupByEmail`.
    #[instrument(skip_all, fields(email = %email))]
    pub async fn lookup_user_by_email(&self, email: &str) -> Result<UserHandle, ChatError> {
        let url = format!("{}/users.lookupByEmail", self.base_url);
        let resp: LookupUserResponse = self
            .http
            .get(&url)
            .bearer_auth(&self.token)
            .query(&[("email", email)])
            .send()
            .await?
            .json()
            .await?;

        if !resp.ok {
            let code = resp.error.unwrap_or_default();
            if code == USERS_NOT_FOUND {
                return Err(ChatError::UserNotFound {
                    email: email.to_string(),
                });
            }
            return Err(ChatError::Api {
                method: "users.lookupByEmail".to_string(),
                code,
            });
        }

        resp.user.ok_or_else(|| ChatError::Api {
            method: "users.lookupByEmail".to_string(),
            code: "missing user in response".to_string(),
        })
    }

    /// Open (or reuse) a one-to-one conversation via `conversations.open`.
    #[instrument(skip_all, fields(user_id = %user_id))]
    pub async fn open_conversation(&self, user_id: &str) -> Result<String, ChatError> {
        let url = format!("{}/conversations.open", self.base_url);
        let resp: OpenConversationResponse = self
            .http
            .post(&url)
            .bearer_auth(&self.token)
            .json(&serde_json::json!({ "users": user_id }))
            .send()
            .await?
            .json()
            .await?;

        if !resp.ok {
            return Err(ChatError::Api {
                method: "conversations.open".to_string(),
                code: resp.error.unwrap_or_default(),
            });
        }

        resp.channel.map(|c| c.id).ok_or_else(|| ChatError::Api {
            method: "conversations.open".to_string(),
            code: "missing channel in response".to_string(),
        })
    }

    /// Post blocks to a channel via `chat.postMessage`.
    #[instrument(skip_all, fields(channel = %channel_id))]
    pub async fn post_message(
        &self,
        channel_id: &str,
        blocks: &[Block],
    ) -> Result<(), ChatError> {
        let url = format!("{}/chat.postMessage", self.base_url);
        let resp: PostMessageResponse = self
            .http
            .post(&url)
            .bearer_auth(&self.token)
            .json(&serde_json::json!({
                "channel": channel_id,
                "blocks": blocks,
            }))
            .send()
            .await?
            .json()
            .await?;

        if !resp.ok {
            return Err(ChatError::Api {
                method: "chat.postMessage".to_string(),
                code: resp.error.unwrap_or_default(),
            });
        }
        Ok(())
    }

    /// Deliver a direct message: resolve the email, open the conversation,
    /// post the blocks. The failing step is recorded on the error.
    #[instrument(skip_all, fields(email = %email))]
    pub async fn send_direct_message(
        &self,
        email: &str,
        blocks: &[Block],
    ) -> Result<(), ChatError> {
        let user = self
            .lookup_user_by_email(email)
            .await
            .map_err(|e| e.at_step(email, DeliveryStep::Lookup))?;

        let channel_id = self
            .open_conversation(&user.id)
            .await
            .map_err(|e| e.at_step(email, DeliveryStep::OpenConversation))?;

        self.post_message(&channel_id, blocks)
            .await
            .map_err(|e| e.at_step(email, DeliveryStep::PostMessage))?;

        debug!(user_id = %user.id, channel = %channel_id, "direct message delivered");
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
