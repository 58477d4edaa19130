//! The fetch → filter → aggregate → notify pipeline.
//!
//! Three steps, run strictly in sequence:
//! 1. [`filter_policies`]: optional display-name prefix filter
//! 2. [`collect_message_book`]: per-policy device statuses, compliant
//!    devices grouped under their owner (fail-fast across policies)
//! 3. [`deliver`]: one DM per owner, with a configurable failure policy

use nudge_chat::{ChatClient, ChatError, render_device_report};
use nudge_core::{MessageBook, Policy, format_fragment};
use nudge_graph::{GraphClient, GraphError};
use tracing::{debug, error, info, instrument};

/// Outcome of the delivery loop under per-owner failure isolation.
#[derive(Debug, Default)]
pub struct DeliveryReport {
    /// Owners successfully messaged.
    pub sent: usize,
    /// Owners whose delivery failed, with the cause.
    pub failed: Vec<(String, ChatError)>,
}

impl DeliveryReport {
    /// Whether every delivery succeeded.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Keep only policies whose display name starts with `prefix`.
///
/// An empty prefix keeps everything.
#[must_use]
pub fn filter_policies(policies: Vec<Policy>, prefix: &str) -> Vec<Policy> {
    if prefix.is_empty() {
        return policies;
    }
    policies
        .into_iter()
        .filter(|p| p.display_name.starts_with(prefix))
        .collect()
}

/// Walk every policy's device statuses and file a fragment per compliant
/// device under the owning user.
///
/// The first Graph error aborts the walk; there is no per-policy error
/// isolation on the upstream side.
#[instrument(skip_all, fields(policies = policies.len()))]
pub async fn collect_message_book(
    graph: &GraphClient,
    policies: &[Policy],
) -> Result<MessageBook, GraphError> {
    let mut book = MessageBook::new();
    for policy in policies {
        let statuses = graph.list_device_statuses(&policy.id).await?;
        for status in &statuses {
            if !status.status.is_compliant() {
                continue;
            }
            book.record(&status.user_name, format_fragment(policy, status));
        }
        debug!(policy = %policy.id, statuses = statuses.len(), "policy checked");
    }
    info!(owners = book.len(), "message book collected");
    Ok(book)
}

/// Send one rendered report per owner.
///
/// With `fail_fast` the loop aborts on the first failed send (the remaining
/// owners are skipped). Otherwise each failure is logged and recorded, the
/// loop continues, and the caller decides what a dirty report means for the
/// run.
#[instrument(skip_all, fields(owners = book.len(), fail_fast = fail_fast))]
pub async fn deliver(
    chat: &ChatClient,
    book: &MessageBook,
    title: &str,
    footer: &str,
    fail_fast: bool,
) -> Result<DeliveryReport, ChatError> {
    let mut report = DeliveryReport::default();
    for (owner, fragments) in book {
        let blocks = render_device_report(title, fragments, footer);
        match chat.send_direct_message(owner, &blocks).await {
            Ok(()) => {
                info!(owner, fragments = fragments.len(), "notification sent");
                report.sent += 1;
            }
            Err(err) if fail_fast => return Err(err),
            Err(err) => {
                error!(owner, %err, "notification failed, continuing");
                report.failed.push((owner.to_string(), err));
            }
        }
    }
    Ok(report)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn policy(id: &str, name: &str) -> Policy {
        Policy {
            id: id.to_string(),
            description: String::new(),
            display_name: name.to_string(),
        }
    }

    // ── filter_policies ─────────────────────────────────────────────

    #[test]
    fn empty_prefix_keeps_all() {
        let policies = vec![policy("1", "Baseline"), policy("2", "Mobile")];
        assert_eq!(filter_policies(policies, "").len(), 2);
    }

    #[test]
    fn prefix_filters_by_display_name() {
        let policies = vec![
            policy("1", "prod-baseline"),
            policy("2", "test-baseline"),
            policy("3", "prod-mobile"),
        ];
        let kept = filter_policies(policies, "prod-");
        assert_eq!(kept.len(), 2);
        assert!(kept.iter().all(|p| p.display_name.starts_with("prod-")));
    }

    #[test]
    fn prefix_match_is_case_sensitive() {
        let policies = vec![policy("1", "Prod-baseline")];
        assert!(filter_policies(policies, "prod-").is_empty());
    }

    // ── DeliveryReport ──────────────────────────────────────────────

    #[test]
    fn empty_report_is_clean() {
        assert!(DeliveryReport::default().is_clean());
    }

    #[test]
    fn failed_delivery_dirties_report() {
        let mut report = DeliveryReport::default();
        report.failed.push((
            "a@x.com".to_string(),
            ChatError::UserNotFound {
                email: "a@x.com".to_string(),
            },
        ));
        assert!(!report.is_clean());
    }
}
