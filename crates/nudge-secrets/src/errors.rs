//! Secrets error types.

/// Errors that can occur while acquiring credentials.
#[derive(Debug, thiserror::Error)]
pub enum SecretsError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Env file loaded but a required variable is missing or empty.
    #[error("missing required environment variable: {0}")]
    MissingVar(String),

    /// Metadata server rejected the token request.
    #[error("metadata token error ({status}): {message}")]
    Metadata {
        /// HTTP status code.
        status: u16,
        /// Error description.
        message: String,
    },

    /// Secret Manager rejected a secret access request.
    #[error("secret access error for '{name}' ({status}): {message}")]
    Secret {
        /// Secret name that failed.
        name: String,
        /// HTTP status code.
        status: u16,
        /// Error description.
        message: String,
    },

    /// Secret payload was not valid base64.
    #[error("secret payload decode error: {0}")]
    Decode(#[from] base64::DecodeError),

    /// Secret payload was not valid UTF-8.
    #[error("secret payload is not UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    /// No fallback source is configured (env file failed and no GCP project set).
    #[error("no credential source available: {0}")]
    NotConfigured(String),
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_var_display() {
        let err = SecretsError::MissingVar("TENANT_ID".to_string());
        assert_eq!(
            err.to_string(),
            "missing required environment variable: TENANT_ID"
        );
    }

    #[test]
    fn secret_error_names_the_secret() {
        let err = SecretsError::Secret {
            name: "clientSecret".to_string(),
            status: 403,
            message: "permission denied".to_string(),
        };
        let text = err.to_string();
        assert!(text.contains("clientSecret"));
        assert!(text.contains("403"));
    }

    #[test]
    fn not_configured_display() {
        let err = SecretsError::NotConfigured("env file unreadable and gcpProject empty".into());
        assert!(err.to_string().starts_with("no credential source available"));
    }
}
