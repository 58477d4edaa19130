//! Settings type definitions.
//!
//! All types use `#[serde(rename_all = "camelCase")]` to match the JSON wire
//! format. Each type implements [`Default`] with production default values,
//! and `#[serde(default)]` allows partial JSON; missing fields get their
//! default value during deserialization.

use nudge_core::RetryConfig;
use serde::{Deserialize, Serialize};

/// Default message title (bilingual, shown as the first block of every DM).
const DEFAULT_MESSAGE_TITLE: &str = "このボットは端末 :computer: をチェックし、推奨を提案する社内ツールです。各推奨事項を確認してください。\n\n Hello, This internal bot checks the device and provides our recommendations. Please check each items";

/// Default message footer (bilingual, shown as the last block of every DM).
const DEFAULT_MESSAGE_FOOTER: &str = "対応方法など詳細はこちらをご確認ください (https://google.com)\n\nCheck the details here (https://google.com)";

/// Root settings type for the nudge bot.
///
/// Loaded from `~/.nudge/settings.json` with defaults applied for missing
/// fields. Environment variables can override specific values.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NudgeSettings {
    /// Settings schema version.
    pub version: String,
    /// Application name.
    pub name: String,
    /// Notification message text and policy filtering.
    pub message: MessageSettings,
    /// Where credentials are sourced from.
    pub secrets: SecretsSettings,
    /// Microsoft Graph endpoints and auth retry policy.
    pub graph: GraphSettings,
    /// Chat (Slack) endpoint.
    pub chat: ChatSettings,
    /// Delivery failure policy.
    pub delivery: DeliverySettings,
    /// Logging configuration.
    pub logging: LoggingSettings,
}

impl Default for NudgeSettings {
    fn default() -> Self {
        Self {
            version: "0.1.0".to_string(),
            name: "nudge".to_string(),
            message: MessageSettings::default(),
            secrets: SecretsSettings::default(),
            graph: GraphSettings::default(),
            chat: ChatSettings::default(),
            delivery: DeliverySettings::default(),
            logging: LoggingSettings::default(),
        }
    }
}

/// Notification message configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MessageSettings {
    /// Fixed title block text.
    pub title: String,
    /// Fixed footer block text.
    pub footer: String,
    /// Optional display-name prefix filter for compliance policies.
    /// Empty (the default) disables filtering.
    pub policy_name_prefix: String,
}

impl Default for MessageSettings {
    fn default() -> Self {
        Self {
            title: DEFAULT_MESSAGE_TITLE.to_string(),
            footer: DEFAULT_MESSAGE_FOOTER.to_string(),
            policy_name_prefix: String::new(),
        }
    }
}

/// Credential source configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SecretsSettings {
    /// Path of the env file tried first (relative to the working directory).
    pub env_file: String,
    /// Google Cloud project holding the fallback secrets. Empty means the
    /// Secret Manager fallback is unavailable.
    pub gcp_project: String,
    /// Secret names under the project, by role.
    pub names: SecretNames,
}

impl Default for SecretsSettings {
    fn default() -> Self {
        Self {
            env_file: ".env".to_string(),
            gcp_project: String::new(),
            names: SecretNames::default(),
        }
    }
}

/// Secret Manager secret names for the four credentials.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SecretNames {
    /// Directory tenant id secret name.
    pub tenant_id: String,
    /// OAuth client id secret name.
    pub client_id: String,
    /// OAuth client secret secret name.
    pub client_secret: String,
    /// Chat API token secret name.
    pub slack_token: String,
}

impl Default for SecretNames {
    fn default() -> Self {
        Self {
            tenant_id: "tenantId".to_string(),
            client_id: "clientId".to_string(),
            client_secret: "clientSecret".to_string(),
            slack_token: "slackToken".to_string(),
        }
    }
}

/// Microsoft Graph configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GraphSettings {
    /// Graph REST base URL.
    pub base_url: String,
    /// Identity platform base URL (token endpoint host).
    pub login_url: String,
    /// Retry policy for the token request.
    pub auth_retry: RetryConfig,
}

impl Default for GraphSettings {
    fn default() -> Self {
        Self {
            base_url: "https://graph.microsoft.com/v1.0".to_string(),
            login_url: "https://login.microsoftonline.com".to_string(),
            auth_retry: RetryConfig::default(),
        }
    }
}

/// Chat API configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChatSettings {
    /// Slack Web API base URL.
    pub base_url: String,
}

impl Default for ChatSettings {
    fn default() -> Self {
        Self {
            base_url: "https://slack.com/api".to_string(),
        }
    }
}

/// Delivery failure policy.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DeliverySettings {
    /// Abort the delivery loop on the first failed send. When `false`
    /// (the default), per-owner failures are logged and counted, remaining
    /// owners are still processed, and the run fails afterwards if any
    /// send failed.
    pub fail_fast: bool,
}

/// Logging configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoggingSettings {
    /// Default tracing filter directive (`NUDGE_LOG` overrides).
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
