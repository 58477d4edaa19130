//! Graph error types.

/// Errors from the Graph client, the upstream side of the run.
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    /// HTTP transport failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Token endpoint rejected the client-credentials request.
    #[error("auth error ({status}): {message}")]
    Auth {
        /// HTTP status code.
        status: u16,
        /// Response body (identity platform error JSON).
        message: String,
        /// Server-requested delay from the `Retry-After` header, if sent.
        retry_after_ms: Option<u64>,
    },

    /// Graph rejected a resource request.
    #[error("Graph API error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Response body.
        message: String,
    },
}

impl GraphError {
    /// Whether the auth retry loop should try again after this error.
    ///
    /// Transport failures, throttling, and server errors are retryable;
    /// 4xx auth rejections (bad credentials) are not.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Http(_) => true,
            Self::Auth { status, .. } | Self::Api { status, .. } => {
                *status == 429 || (500..=599).contains(status)
            }
        }
    }

    /// The server-requested retry delay, when the response carried one.
    #[must_use]
    pub fn retry_after_ms(&self) -> Option<u64> {
        match self {
            Self::Auth { retry_after_ms, .. } => *retry_after_ms,
            Self::Http(_) | Self::Api { .. } => None,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_error_display() {
        let err = GraphError::Auth {
            status: 401,
            message: "invalid_client".to_string(),
            retry_after_ms: None,
        };
        assert_eq!(err.to_string(), "auth error (401): invalid_client");
    }

    #[test]
    fn retryable_statuses() {
        let retryable = GraphError::Auth {
            status: 503,
            message: String::new(),
            retry_after_ms: None,
        };
        assert!(retryable.is_retryable());

        let throttled = GraphError::Api {
            status: 429,
            message: String::new(),
        };
        assert!(throttled.is_retryable());

        let rejected = GraphError::Auth {
            status: 400,
            message: String::new(),
            retry_after_ms: None,
        };
        assert!(!rejected.is_retryable());

        let forbidden = GraphError::Api {
            status: 403,
            message: String::new(),
        };
        assert!(!forbidden.is_retryable());
    }

    #[test]
    fn retry_after_only_on_auth_errors() {
        let throttled = GraphError::Auth {
            status: 429,
            message: String::new(),
            retry_after_ms: Some(2000),
        };
        assert_eq!(throttled.retry_after_ms(), Some(2000));

        let api = GraphError::Api {
            status: 429,
            message: String::new(),
        };
        assert_eq!(api.retry_after_ms(), None);
    }
}
