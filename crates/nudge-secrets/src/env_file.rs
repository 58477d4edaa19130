//! Env-file credential source.
//!
//! `dotenvy` merges the file's `key=value` pairs into the process
//! environment (existing variables win), then the four credential variables
//! are read back out. An unreadable file is distinguished from a readable
//! file with a missing variable so the caller can decide whether the
//! Secret Manager fallback applies.

use std::path::Path;

use crate::Credentials;

/// Env var holding the directory tenant id.
pub const TENANT_ID_VAR: &str = "TENANT_ID";
/// Env var holding the OAuth client id.
pub const CLIENT_ID_VAR: &str = "CLIENT_ID";
/// Env var holding the OAuth client secret.
pub const CLIENT_SECRET_VAR: &str = "CLIENT_SECRET";
/// Env var holding the chat API token.
pub const SLACK_TOKEN_VAR: &str = "SLACK_TOKEN";

/// Why the env-file source failed.
#[derive(Debug)]
pub enum EnvFileError {
    /// The file itself could not be loaded (fallback applies).
    Load(dotenvy::Error),
    /// The file loaded but a variable is missing or empty (hard error).
    Missing(String),
}

/// Load the env file at `path` and read the four credential variables.
pub fn load(path: &Path) -> Result<Credentials, EnvFileError> {
    // Existing process env takes precedence over file values, matching
    // dotenv conventions.
    let _ = dotenvy::from_path(path).map_err(EnvFileError::Load)?;

    Ok(Credentials {
        tenant_id: required(TENANT_ID_VAR)?,
        client_id: required(CLIENT_ID_VAR)?,
        client_secret: required(CLIENT_SECRET_VAR)?,
        slack_token: required(SLACK_TOKEN_VAR)?,
    })
}

fn required(name: &str) -> Result<String, EnvFileError> {
    std::env::var(name)
        .ok()
        .filter(|v| !v.is_empty())
        .ok_or_else(|| EnvFileError::Missing(name.to_string()))
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
