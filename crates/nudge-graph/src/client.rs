//! Authenticated Graph client and device-management reads.

use nudge_core::{DeviceComplianceStatus, ManagedDevice, Policy, RetryConfig};
use nudge_secrets::Credentials;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use crate::auth::request_token_with_retry;
use crate::errors::GraphError;

/// Graph endpoints and auth retry policy.
///
/// URLs are overridable so tests can point at a mock server.
#[derive(Clone, Debug)]
pub struct GraphConfig {
    /// Graph REST base URL (includes the API version segment).
    pub base_url: String,
    /// Identity platform base URL.
    pub login_url: String,
    /// Retry policy for the token request.
    pub auth_retry: RetryConfig,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            base_url: "https://graph.microsoft.com/v1.0".to_string(),
            login_url: "https://login.microsoftonline.com".to_string(),
            auth_retry: RetryConfig::default(),
        }
    }
}

/// Graph `value` collection envelope (first page only; the bot does not
/// follow `@odata.nextLink`).
#[derive(Deserialize)]
struct CollectionResponse<T> {
    #[serde(default = "Vec::new")]
    value: Vec<T>,
}

/// Authenticated Microsoft Graph client.
///
/// Holds the bearer token for the process lifetime; a run is far shorter
/// than the token's validity window, so there is no refresh path.
pub struct GraphClient {
    http: reqwest::Client,
    base_url: String,
    access_token: String,
}

impl GraphClient {
    /// Authenticate with the client-credentials grant and return a ready
    /// client. The token request is retried per `config.auth_retry`.
    #[instrument(skip_all)]
    pub async fn connect(
        config: &GraphConfig,
        credentials: &Credentials,
    ) -> Result<Self, GraphError> {
        let http = reqwest::Client::new();
        let token =
            request_token_with_retry(&http, &config.login_url, credentials, &config.auth_retry)
                .await?;
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            access_token: token.access_token,
        })
    }

    /// List device compliance policies (one collection page).
    #[instrument(skip_all)]
    pub async fn list_compliance_policies(&self) -> Result<Vec<Policy>, GraphError> {
        let policies: CollectionResponse<Policy> = self
            .get_json("/deviceManagement/deviceCompliancePolicies")
            .await?;
        debug!(count = policies.value.len(), "compliance policies fetched");
        Ok(policies.value)
    }

    /// List device compliance statuses for one policy (one collection page).
    #[instrument(skip_all, fields(policy_id = %policy_id))]
    pub async fn list_device_statuses(
        &self,
        policy_id: &str,
    ) -> Result<Vec<DeviceComplianceStatus>, GraphError> {
        let statuses: CollectionResponse<DeviceComplianceStatus> = self
            .get_json(&format!(
                "/deviceManagement/deviceCompliancePolicies/{policy_id}/deviceStatuses"
            ))
            .await?;
        debug!(count = statuses.value.len(), "device statuses fetched");
        Ok(statuses.value)
    }

    /// List managed devices (one collection page).
    #[instrument(skip_all)]
    pub async fn list_devices(&self) -> Result<Vec<ManagedDevice>, GraphError> {
        let devices: CollectionResponse<ManagedDevice> =
            self.get_json("/deviceManagement/managedDevices").await?;
        Ok(devices.value)
    }

    /// Fetch one managed device by id.
    #[instrument(skip_all, fields(device_id = %device_id))]
    pub async fn get_device(&self, device_id: &str) -> Result<ManagedDevice, GraphError> {
        self.get_json(&format!("/deviceManagement/managedDevices/{device_id}"))
            .await
    }

    /// GET a Graph path and deserialize the 200 body; any other status
    /// becomes [`GraphError::Api`] carrying the response text.
    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, GraphError> {
        let url = format!("{}{path}", self.base_url);
        let resp = self
            .http
            .get(&url)
            .bearer_auth(&self.access_token)
            .send()
            .await?;

        let status = resp.status().as_u16();
        if status != 200 {
            let message = resp.text().await.unwrap_or_default();
            return Err(GraphError::Api { status, message });
        }

        Ok(resp.json().await?)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use nudge_core::ComplianceState;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_credentials() -> Credentials {
        Credentials {
            tenant_id: "tenant-1".to_string(),
            client_id: "client-1".to_string(),
            client_secret: "s3cret".to_string(),
            slack_token: "xoxb-1".to_string(),
        }
    }

    fn test_config(server: &MockServer) -> GraphConfig {
        GraphConfig {
            base_url: server.uri(),
            login_url: server.uri(),
            auth_retry: RetryConfig {
                max_retries: 0,
                base_delay_ms: 1,
                max_delay_ms: 1,
                jitter_factor: 0.0,
            },
        }
    }

    async fn mock_token(server: &MockServer) {
        Mock::given(method("POST"))
            .and(path("/tenant-1/oauth2/v2.0/token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "access_token": "graph-token",
                "expires_in": 3599
            })))
            .mount(server)
            .await;
    }

    async fn connected_client(server: &MockServer) -> GraphClient {
        mock_token(server).await;
        GraphClient::connect(&test_config(server), &test_credentials())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn connect_acquires_token() {
        let server = MockServer::start().await;
        let client = connected_client(&server).await;
        assert_eq!(client.access_token, "graph-token");
    }

    #[tokio::test]
    async fn list_policies_parses_collection() {
        let server = MockServer::start().await;
        let client = connected_client(&server).await;

        Mock::given(method("GET"))
            .and(path("/deviceManagement/deviceCompliancePolicies"))
            .and(header("authorization", "Bearer graph-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "@odata.context": "https://graph.microsoft.com/v1.0/$metadata#policies",
                "value": [
                    {"id": "p-1", "description": "Encrypt disks", "displayName": "Baseline"},
                    {"id": "p-2", "description": "PIN required", "displayName": "Mobile"}
                ]
            })))
            .mount(&server)
            .await;

        let policies = client.list_compliance_policies().await.unwrap();
        assert_eq!(policies.len(), 2);
        assert_eq!(policies[0].id, "p-1");
        assert_eq!(policies[1].display_name, "Mobile");
    }

    #[tokio::test]
    async fn list_policies_empty_collection() {
        let server = MockServer::start().await;
        let client = connected_client(&server).await;

        Mock::given(method("GET"))
            .and(path("/deviceManagement/deviceCompliancePolicies"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"value": []})),
            )
            .mount(&server)
            .await;

        let policies = client.list_compliance_policies().await.unwrap();
        assert!(policies.is_empty());
    }

    #[tokio::test]
    async fn list_device_statuses_scoped_to_policy() {
        let server = MockServer::start().await;
        let client = connected_client(&server).await;

        Mock::given(method("GET"))
            .and(path(
                "/deviceManagement/deviceCompliancePolicies/p-1/deviceStatuses",
            ))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "value": [
                    {
                        "status": "compliant",
                        "deviceDisplayName": "alice-mbp",
                        "deviceModel": "MacBookPro18,3",
                        "userName": "alice@example.com"
                    },
                    {
                        "status": "nonCompliant",
                        "deviceDisplayName": "bob-pc",
                        "deviceModel": "Surface",
                        "userName": "bob@example.com"
                    }
                ]
            })))
            .mount(&server)
            .await;

        let statuses = client.list_device_statuses("p-1").await.unwrap();
        assert_eq!(statuses.len(), 2);
        assert_eq!(statuses[0].status, ComplianceState::Compliant);
        assert_eq!(statuses[1].status, ComplianceState::NonCompliant);
    }

    #[tokio::test]
    async fn get_device_by_id() {
        let server = MockServer::start().await;
        let client = connected_client(&server).await;

        Mock::given(method("GET"))
            .and(path("/deviceManagement/managedDevices/dev-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "dev-1",
                "deviceName": "alice-mbp",
                "userId": "u-1",
                "emailAddress": "alice@example.com",
                "serialNumber": "C02XYZ",
                "manufacturer": "Apple",
                "isEncrypted": true
            })))
            .mount(&server)
            .await;

        let device = client.get_device("dev-1").await.unwrap();
        assert_eq!(device.device_name, "alice-mbp");
        assert!(device.is_encrypted);
    }

    #[tokio::test]
    async fn request_failure_is_api_error() {
        let server = MockServer::start().await;
        let client = connected_client(&server).await;

        Mock::given(method("GET"))
            .and(path("/deviceManagement/managedDevices"))
            .respond_with(
                ResponseTemplate::new(403)
                    .set_body_string(r#"{"error":{"code":"Authorization_RequestDenied"}}"#),
            )
            .mount(&server)
            .await;

        let err = client.list_devices().await.unwrap_err();
        match err {
            GraphError::Api { status, message } => {
                assert_eq!(status, 403);
                assert!(message.contains("Authorization_RequestDenied"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
