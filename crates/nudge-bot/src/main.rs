//! # nudge-bot
//!
//! Scheduled device-compliance notification bot. One run:
//! load credentials → authenticate → fetch policies → collect compliant
//! devices per owner → deliver one Slack DM per owner. Any failure exits
//! non-zero so the scheduler can alert on it.

#![deny(unsafe_code)]

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{Instrument, error, info};
use tracing_subscriber::EnvFilter;

use nudge_bot::pipeline::{collect_message_book, deliver, filter_policies};
use nudge_chat::ChatClient;
use nudge_graph::{GraphClient, GraphConfig};
use nudge_secrets::{SecretsConfig, load_credentials};
use nudge_settings::NudgeSettings;

/// Device-compliance notification bot.
#[derive(Parser, Debug)]
#[command(name = "nudge-bot", about = "Checks device compliance and DMs device owners")]
struct Cli {
    /// Settings file path (defaults to `NUDGE_SETTINGS` or
    /// `~/.nudge/settings.json`).
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Env file holding the credentials (overrides settings).
    #[arg(long)]
    env_file: Option<String>,

    /// Abort the delivery loop on the first failed send (overrides settings).
    #[arg(long)]
    fail_fast: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();

    // Settings load before logging init; the default filter lives there.
    let settings_path = args
        .settings
        .clone()
        .or_else(|| std::env::var("NUDGE_SETTINGS").ok().map(PathBuf::from))
        .unwrap_or_else(nudge_settings::settings_path);
    let mut settings = nudge_settings::load_settings_from_path(&settings_path)
        .with_context(|| format!("loading settings from {}", settings_path.display()))?;
    if let Some(env_file) = args.env_file {
        settings.secrets.env_file = env_file;
    }
    if args.fail_fast {
        settings.delivery.fail_fast = true;
    }

    let filter = EnvFilter::try_from_env("NUDGE_LOG")
        .unwrap_or_else(|_| EnvFilter::new(&settings.logging.level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let run_id = uuid::Uuid::now_v7();
    let result = run(settings)
        .instrument(tracing::info_span!("run", %run_id))
        .await;
    if let Err(ref err) = result {
        error!(error = format!("{err:#}"), "run failed");
    }
    result
}

/// One full fetch → filter → aggregate → notify cycle.
async fn run(settings: NudgeSettings) -> Result<()> {
    let secrets_config = SecretsConfig {
        env_file: settings.secrets.env_file.clone(),
        gcp_project: settings.secrets.gcp_project.clone(),
        secret_names: [
            settings.secrets.names.tenant_id.clone(),
            settings.secrets.names.client_id.clone(),
            settings.secrets.names.client_secret.clone(),
            settings.secrets.names.slack_token.clone(),
        ],
        ..SecretsConfig::default()
    };
    let credentials = load_credentials(&secrets_config)
        .await
        .context("loading credentials")?;

    let graph_config = GraphConfig {
        base_url: settings.graph.base_url.clone(),
        login_url: settings.graph.login_url.clone(),
        auth_retry: settings.graph.auth_retry.clone(),
    };
    let graph = GraphClient::connect(&graph_config, &credentials)
        .await
        .context("authenticating with Microsoft Graph")?;
    let chat = ChatClient::with_base_url(&credentials.slack_token, &settings.chat.base_url);

    let policies = graph
        .list_compliance_policies()
        .await
        .context("listing compliance policies")?;
    let policies = filter_policies(policies, &settings.message.policy_name_prefix);
    info!(policies = policies.len(), "compliance policies to check");

    let book = collect_message_book(&graph, &policies)
        .await
        .context("checking device statuses")?;
    if book.is_empty() {
        info!("no compliant devices found, nothing to send");
        return Ok(());
    }

    let report = deliver(
        &chat,
        &book,
        &settings.message.title,
        &settings.message.footer,
        settings.delivery.fail_fast,
    )
    .await
    .context("delivering notifications")?;

    if !report.is_clean() {
        anyhow::bail!(
            "{} of {} deliveries failed",
            report.failed.len(),
            report.failed.len() + report.sent
        );
    }
    info!(sent = report.sent, "run complete");
    Ok(())
}
