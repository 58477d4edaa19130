//! # nudge-secrets
//!
//! Credential acquisition for the nudge bot.
//!
//! Two sources, tried in order:
//! 1. **Env file**: `dotenvy` loads the configured `.env` file into the
//!    process environment, then `TENANT_ID` / `CLIENT_ID` / `CLIENT_SECRET`
//!    / `SLACK_TOKEN` are read directly.
//! 2. **Google Secret Manager**: if the file cannot be loaded, each secret
//!    is fetched from `projects/<project>/secrets/<name>/versions/latest`
//!    via the REST API, authenticated with a bearer token from the GCE
//!    metadata server. The first fetch failure short-circuits.

#![deny(unsafe_code)]

pub mod env_file;
pub mod errors;
pub mod gcp;

pub use errors::SecretsError;
pub use gcp::SecretManagerClient;

use std::path::Path;

use tracing::{info, warn};

/// The four secrets every run needs.
#[derive(Clone)]
pub struct Credentials {
    /// Directory tenant id.
    pub tenant_id: String,
    /// OAuth client id.
    pub client_id: String,
    /// OAuth client secret.
    pub client_secret: String,
    /// Chat API token.
    pub slack_token: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("tenant_id", &self.tenant_id)
            .field("client_id", &self.client_id)
            .field("client_secret", &"[redacted]")
            .field("slack_token", &"[redacted]")
            .finish()
    }
}

/// Where to look for credentials.
///
/// Built by the binary from settings; URLs are overridable so tests can
/// point at a mock server.
#[derive(Clone, Debug)]
pub struct SecretsConfig {
    /// Env file path tried first.
    pub env_file: String,
    /// GCP project for the Secret Manager fallback (empty = unavailable).
    pub gcp_project: String,
    /// Secret names: tenant id, client id, client secret, chat token.
    pub secret_names: [String; 4],
    /// Secret Manager base URL.
    pub secret_manager_url: String,
    /// Metadata server base URL.
    pub metadata_url: String,
}

impl Default for SecretsConfig {
    fn default() -> Self {
        Self {
            env_file: ".env".to_string(),
            gcp_project: String::new(),
            secret_names: [
                "tenantId".to_string(),
                "clientId".to_string(),
                "clientSecret".to_string(),
                "slackToken".to_string(),
            ],
            secret_manager_url: gcp::DEFAULT_SECRET_MANAGER_URL.to_string(),
            metadata_url: gcp::DEFAULT_METADATA_URL.to_string(),
        }
    }
}

/// Load credentials from the env file, falling back to Secret Manager.
///
/// The fallback is only taken when the env *file* cannot be loaded; a file
/// that loads but leaves a variable unset is a configuration error and is
/// reported as such.
#[tracing::instrument(skip_all)]
pub async fn load_credentials(config: &SecretsConfig) -> Result<Credentials, SecretsError> {
    match env_file::load(Path::new(&config.env_file)) {
        Ok(credentials) => {
            info!(file = %config.env_file, "credentials loaded from env file");
            Ok(credentials)
        }
        Err(env_file::EnvFileError::Missing(name)) => Err(SecretsError::MissingVar(name)),
        Err(env_file::EnvFileError::Load(cause)) => {
            warn!(file = %config.env_file, %cause, "env file unavailable, falling back to Secret Manager");
            if config.gcp_project.is_empty() {
                return Err(SecretsError::NotConfigured(format!(
                    "env file '{}' unreadable and no gcpProject configured",
                    config.env_file
                )));
            }
            let client = SecretManagerClient::new(
                &config.gcp_project,
                &config.secret_manager_url,
                &config.metadata_url,
            );
            client.load_credentials(&config.secret_names).await
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
    fn debug_redacts_secrets() {
        let credentials = Credentials {
            tenant_id: "t".to_string(),
            client_id: "c".to_string(),
            client_secret: "super-secret".to_string(),
            slack_token: "xoxb-123".to_string(),
        };
        let out = format!("{credentials:?}");
        assert!(!out.contains("super-secret"));
        assert!(!out.contains("xoxb-123"));
        assert!(out.contains("[redacted]"));
    }

    #[tokio::test]
    async fn missing_file_without_project_is_not_configured() {
        let config = SecretsConfig {
            env_file: "/nonexistent/creds.env".to_string(),
            ..SecretsConfig::default()
        };
        let err = load_credentials(&config).await.unwrap_err();
        assert!(matches!(err, SecretsError::NotConfigured(_)));
    }
}
