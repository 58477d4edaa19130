//! Retry configuration and backoff calculation.
//!
//! Portable, sync-only building blocks: the async retry loop lives in
//! `nudge-graph` (which has access to tokio and a PRNG), while this module
//! provides:
//!
//! - [`RetryConfig`]: retry parameters (max retries, backoff, jitter)
//! - [`calculate_backoff_delay`]: exponential backoff with explicit jitter
//! - [`parse_retry_after_header`]: parse `Retry-After` HTTP headers

use serde::{Deserialize, Serialize};

/// Default maximum retries (Graph auth transport policy).
pub const DEFAULT_MAX_RETRIES: u32 = 3;
/// Default base delay in milliseconds.
pub const DEFAULT_BASE_DELAY_MS: u64 = 1000;
/// Default maximum delay in milliseconds.
pub const DEFAULT_MAX_DELAY_MS: u64 = 30_000;
/// Default jitter factor (0.0–1.0).
pub const DEFAULT_JITTER_FACTOR: f64 = 0.2;

/// Configuration for retry logic.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RetryConfig {
    /// Maximum number of retry attempts (default: 3).
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// Base delay for exponential backoff in ms (default: 1000).
    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,
    /// Maximum delay between retries in ms (default: 30000).
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,
    /// Jitter factor 0.0–1.0 (default: 0.2).
    #[serde(default = "default_jitter_factor")]
    pub jitter_factor: f64,
}

fn default_max_retries() -> u32 {
    DEFAULT_MAX_RETRIES
}
fn default_base_delay_ms() -> u64 {
    DEFAULT_BASE_DELAY_MS
}
fn default_max_delay_ms() -> u64 {
    DEFAULT_MAX_DELAY_MS
}
fn default_jitter_factor() -> f64 {
    DEFAULT_JITTER_FACTOR
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            base_delay_ms: DEFAULT_BASE_DELAY_MS,
            max_delay_ms: DEFAULT_MAX_DELAY_MS,
            jitter_factor: DEFAULT_JITTER_FACTOR,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Backoff calculation
// ─────────────────────────────────────────────────────────────────────────────

/// Calculate exponential backoff delay with explicit randomness.
///
/// Formula: `min(max_delay, base_delay * 2^attempt) * (1 + (random*2-1) * jitter)`
///
/// `random` should be a value in `[0.0, 1.0)` from a PRNG; the jitter factor
/// is applied symmetrically, so a factor of 0.2 varies the delay by ±20%.
///
/// # Arguments
///
/// * `attempt`: zero-based attempt index (0 for first retry)
#[must_use]
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
pub fn calculate_backoff_delay(
    attempt: u32,
    base_delay_ms: u64,
    max_delay_ms: u64,
    jitter_factor: f64,
    random: f64,
) -> u64 {
    let exponential = base_delay_ms.saturating_mul(1u64 << attempt.min(31));
    let capped = exponential.min(max_delay_ms);

    // Maps random [0,1) to [-jitter, +jitter]
    let jitter = 1.0 + (random * 2.0 - 1.0) * jitter_factor;
    let with_jitter = (capped as f64) * jitter;

    with_jitter.round().max(0.0) as u64
}

// ─────────────────────────────────────────────────────────────────────────────
// Retry-After header parsing
// ─────────────────────────────────────────────────────────────────────────────

/// Parse a `Retry-After` HTTP header value.
///
/// The value can be either:
/// - a number of seconds (e.g. `"120"`)
/// - an HTTP-date (e.g. `"Thu, 01 Dec 2025 16:00:00 GMT"`)
///
/// Returns the delay in milliseconds, or `None` if parsing fails.
#[must_use]
pub fn parse_retry_after_header(value: &str) -> Option<u64> {
    if let Ok(seconds) = value.parse::<u64>() {
        return Some(seconds * 1000);
    }

    if let Ok(date) = chrono::DateTime::parse_from_rfc2822(value) {
        let now = chrono::Utc::now();
        let delay_ms = date.signed_duration_since(now).num_milliseconds();
        #[allow(clippy::cast_sign_loss)]
        return Some(if delay_ms > 0 { delay_ms as u64 } else { 0 });
    }

    None
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    // ── RetryConfig ─────────────────────────────────────────────────

    #[test]
    fn default_config_matches_transport_policy() {
        let cfg = RetryConfig::default();
        assert_eq!(cfg.max_retries, 3);
        assert_eq!(cfg.base_delay_ms, 1000);
        assert_eq!(cfg.max_delay_ms, 30_000);
        assert!((cfg.jitter_factor - 0.2).abs() < f64::EPSILON);
    }

    #[test]
    fn config_partial_json_fills_defaults() {
        let cfg: RetryConfig = serde_json::from_str(r#"{"maxRetries": 5}"#).unwrap();
        assert_eq!(cfg.max_retries, 5);
        assert_eq!(cfg.max_delay_ms, 30_000);
    }

    // ── calculate_backoff_delay ─────────────────────────────────────

    #[test]
    fn backoff_doubles_per_attempt_without_jitter() {
        assert_eq!(calculate_backoff_delay(0, 1000, 30_000, 0.0, 0.5), 1000);
        assert_eq!(calculate_backoff_delay(1, 1000, 30_000, 0.0, 0.5), 2000);
        assert_eq!(calculate_backoff_delay(2, 1000, 30_000, 0.0, 0.5), 4000);
        assert_eq!(calculate_backoff_delay(3, 1000, 30_000, 0.0, 0.5), 8000);
    }

    #[test]
    fn backoff_caps_at_max_delay() {
        assert_eq!(calculate_backoff_delay(10, 1000, 30_000, 0.0, 0.5), 30_000);
        assert_eq!(calculate_backoff_delay(63, 1000, 30_000, 0.0, 0.5), 30_000);
    }

    #[test]
    fn backoff_jitter_bounds() {
        // random = 0.0 → -20%, random ~1.0 → +20%
        assert_eq!(calculate_backoff_delay(0, 1000, 30_000, 0.2, 0.0), 800);
        assert_eq!(calculate_backoff_delay(0, 1000, 30_000, 0.2, 1.0), 1200);
        // midpoint random cancels jitter
        assert_eq!(calculate_backoff_delay(0, 1000, 30_000, 0.2, 0.5), 1000);
    }

    #[test]
    fn backoff_huge_attempt_does_not_overflow() {
        let delay = calculate_backoff_delay(u32::MAX, 1000, 30_000, 0.2, 0.5);
        assert_eq!(delay, 30_000);
    }

    // ── parse_retry_after_header ────────────────────────────────────

    #[test]
    fn retry_after_seconds() {
        assert_eq!(parse_retry_after_header("120"), Some(120_000));
        assert_eq!(parse_retry_after_header("0"), Some(0));
    }

    #[test]
    fn retry_after_http_date_in_past_is_zero() {
        let past = "Thu, 01 Dec 1994 16:00:00 GMT";
        assert_eq!(parse_retry_after_header(past), Some(0));
    }

    #[test]
    fn retry_after_future_date() {
        let future = chrono::Utc::now() + chrono::Duration::seconds(60);
        let value = future.to_rfc2822();
        let parsed = parse_retry_after_header(&value).unwrap();
        assert!(parsed > 55_000 && parsed <= 60_000, "got {parsed}");
    }

    #[test]
    fn retry_after_garbage_is_none() {
        assert_eq!(parse_retry_after_header("soon"), None);
        assert_eq!(parse_retry_after_header(""), None);
        assert_eq!(parse_retry_after_header("-5"), None);
    }
}
