//! Chat error types.

/// Which delivery step failed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeliveryStep {
    /// Resolving the user id from the email address.
    Lookup,
    /// Opening the one-to-one conversation.
    OpenConversation,
    /// Posting the message.
    PostMessage,
}

impl std::fmt::Display for DeliveryStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Lookup => write!(f, "lookup"),
            Self::OpenConversation => write!(f, "open_conversation"),
            Self::PostMessage => write!(f, "post_message"),
        }
    }
}

/// Errors from the chat client.
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    /// HTTP transport failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// No chat account matches the email address.
    #[error("no chat user found for email: {email}")]
    UserNotFound {
        /// The email that failed to resolve.
        email: String,
    },

    /// The API returned `ok: false` for a call.
    #[error("chat API error in {method}: {code}")]
    Api {
        /// API method name (e.g. `conversations.open`).
        method: String,
        /// Slack error code (e.g. `channel_not_found`).
        code: String,
    },

    /// A direct-message delivery failed, tagged with the failing step.
    #[error("delivery to {email} failed at {step}: {source}")]
    Delivery {
        /// Recipient email.
        email: String,
        /// The step that failed.
        step: DeliveryStep,
        /// Underlying cause.
        #[source]
        source: Box<ChatError>,
    },
}

impl ChatError {
    /// Wrap an error as a delivery failure at `step` for `email`.
    #[must_use]
    pub fn at_step(self, email: &str, step: DeliveryStep) -> Self {
        Self::Delivery {
            email: email.to_string(),
            step,
            source: Box::new(self),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
