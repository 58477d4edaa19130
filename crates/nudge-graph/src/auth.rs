//! Client-credentials authentication against the Microsoft identity platform.
//!
//! One POST to `{login_url}/{tenant}/oauth2/v2.0/token` per run, wrapped in
//! a retry loop that mirrors the transport policy the Graph SDK applies by
//! default: bounded attempts, exponential backoff with jitter, 30s cap.

use nudge_core::{RetryConfig, calculate_backoff_delay, parse_retry_after_header};
use nudge_secrets::Credentials;
use serde::Deserialize;
use tracing::{debug, instrument, warn};

use crate::errors::GraphError;

/// Graph scope for the client-credentials grant.
pub const GRAPH_SCOPE: &str = "https://graph.microsoft.com/.default";

/// Token endpoint response.
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    /// Bearer token for Graph requests.
    pub access_token: String,
    /// Lifetime in seconds.
    #[serde(default)]
    pub expires_in: i64,
}

/// Perform one token request.
#[instrument(skip_all, fields(tenant = %credentials.tenant_id))]
pub async fn request_token(
    http: &reqwest::Client,
    login_url: &str,
    credentials: &Credentials,
) -> Result<TokenResponse, GraphError> {
    let url = format!(
        "{}/{}/oauth2/v2.0/token",
        login_url.trim_end_matches('/'),
        credentials.tenant_id
    );

    let resp = http
        .post(&url)
        .form(&[
            ("grant_type", "client_credentials"),
            ("client_id", credentials.client_id.as_str()),
            ("client_secret", credentials.client_secret.as_str()),
            ("scope", GRAPH_SCOPE),
        ])
        .send()
        .await?;

    let status = resp.status().as_u16();
    if status != 200 {
        let retry_after_ms = resp
            .headers()
            .get(reqwest::header::RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(parse_retry_after_header);
        let message = resp.text().await.unwrap_or_default();
        return Err(GraphError::Auth {
            status,
            message,
            retry_after_ms,
        });
    }

    let token: TokenResponse = resp.json().await?;
    debug!(expires_in = token.expires_in, "token acquired");
    Ok(token)
}

/// Token request with the configured retry policy.
///
/// Retries only retryable failures (transport, 429, 5xx); a credential
/// rejection is returned immediately. When the response carries a
/// `Retry-After` header its delay is used instead of computed backoff.
#[instrument(skip_all, fields(max_retries = retry.max_retries))]
pub async fn request_token_with_retry(
    http: &reqwest::Client,
    login_url: &str,
    credentials: &Credentials,
    retry: &RetryConfig,
) -> Result<TokenResponse, GraphError> {
    let mut attempt = 0u32;
    loop {
        match request_token(http, login_url, credentials).await {
            Ok(token) => return Ok(token),
            Err(err) if err.is_retryable() && attempt < retry.max_retries => {
                // A server-requested delay wins over computed backoff,
                // still capped at the configured maximum.
                let delay_ms = err.retry_after_ms().map_or_else(
                    || {
                        calculate_backoff_delay(
                            attempt,
                            retry.base_delay_ms,
                            retry.max_delay_ms,
                            retry.jitter_factor,
                            rand::random::<f64>(),
                        )
                    },
                    |requested| requested.min(retry.max_delay_ms),
                );
                warn!(attempt, delay_ms, %err, "token request failed, retrying");
                tokio::time::sleep(std::time::Duration::from_millis(delay_ms)).await;
                attempt += 1;
            }
            Err(err) => return Err(err),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
