//! Google Secret Manager REST client.
//!
//! Authenticates with a bearer token fetched from the GCE metadata server
//! (the bot runs as a scheduled job on Google infrastructure). Secrets are
//! addressed by the fixed convention
//! `projects/{project}/secrets/{name}/versions/latest`.

use base64::Engine as _;
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::errors::SecretsError;
use crate::Credentials;

/// Production Secret Manager endpoint.
pub const DEFAULT_SECRET_MANAGER_URL: &str = "https://secretmanager.googleapis.com";

/// Production metadata server endpoint.
pub const DEFAULT_METADATA_URL: &str = "http://metadata.google.internal";

/// Metadata path serving a service-account access token.
const METADATA_TOKEN_PATH: &str = "/computeMetadata/v1/instance/service-accounts/default/token";

/// Secret Manager client for the credential fallback path.
pub struct SecretManagerClient {
    http: reqwest::Client,
    project: String,
    base_url: String,
    metadata_url: String,
}

/// Metadata token response.
#[derive(Deserialize)]
struct MetadataToken {
    access_token: String,
}

/// `secrets.versions.access` response.
#[derive(Deserialize)]
struct AccessSecretVersionResponse {
    payload: SecretPayload,
}

#[derive(Deserialize)]
struct SecretPayload {
    /// Base64-encoded secret bytes.
    data: String,
}

impl SecretManagerClient {
    /// Create a client for `project`, with overridable endpoints.
    #[must_use]
    pub fn new(project: &str, base_url: &str, metadata_url: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            project: project.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
            metadata_url: metadata_url.trim_end_matches('/').to_string(),
        }
    }

    /// Fetch a service-account access token from the metadata server.
    #[instrument(skip_all)]
    pub async fn fetch_access_token(&self) -> Result<String, SecretsError> {
        let url = format!("{}{METADATA_TOKEN_PATH}", self.metadata_url);
        let resp = self
            .http
            .get(&url)
            .header("Metadata-Flavor", "Google")
            .send()
            .await?;

        let status = resp.status().as_u16();
        if status != 200 {
            let message = resp.text().await.unwrap_or_default();
            return Err(SecretsError::Metadata { status, message });
        }

        let token: MetadataToken = resp.json().await?;
        Ok(token.access_token)
    }

    /// Access the latest version of `name` and return its UTF-8 payload.
    #[instrument(skip_all, fields(secret = name))]
    pub async fn access_secret(&self, name: &str, token: &str) -> Result<String, SecretsError> {
        let url = format!(
            "{}/v1/projects/{}/secrets/{}/versions/latest:access",
            self.base_url, self.project, name
        );
        let resp = self.http.get(&url).bearer_auth(token).send().await?;

        let status = resp.status().as_u16();
        if status != 200 {
            let message = resp.text().await.unwrap_or_default();
            return Err(SecretsError::Secret {
                name: name.to_string(),
                status,
                message,
            });
        }

        let body: AccessSecretVersionResponse = resp.json().await?;
        let bytes = base64::engine::general_purpose::STANDARD.decode(body.payload.data)?;
        debug!("secret payload decoded");
        Ok(String::from_utf8(bytes)?)
    }

    /// Fetch the four credentials, in order, short-circuiting on the first
    /// failure.
    ///
    /// `names` order: tenant id, client id, client secret, chat token.
    #[instrument(skip_all, fields(project = %self.project))]
    pub async fn load_credentials(
        &self,
        names: &[String; 4],
    ) -> Result<Credentials, SecretsError> {
        let token = self.fetch_access_token().await?;
        Ok(Credentials {
            tenant_id: self.access_secret(&names[0], &token).await?,
            client_id: self.access_secret(&names[1], &token).await?,
            client_secret: self.access_secret(&names[2], &token).await?,
            slack_token: self.access_secret(&names[3], &token).await?,
        })
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
