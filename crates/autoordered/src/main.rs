//! `autoordered` - sort an inbox into folders by sender domain.
//!
//! Loads the sort settings and the mailbox snapshot, runs one sort and
//! writes the updated mailbox back.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

use std::path::PathBuf;

use anyhow::Context;
use autoordered_core::{InMemoryHost, MailboxSnapshot, SortConfig, Sorter};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "autoordered=info,autoordered_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting autoordered");

    let settings_path = config_dir().join("settings.json");
    let config = SortConfig::load(&settings_path)
        .await
        .with_context(|| format!("Failed to load settings from {}", settings_path.display()))?;

    let mailbox_path = data_dir().join("mailbox.json");
    let snapshot = MailboxSnapshot::load(&mailbox_path)
        .await
        .with_context(|| format!("Failed to load mailbox from {}", mailbox_path.display()))?;

    let host = InMemoryHost::new(snapshot);
    let report = Sorter::new(&host, &config)
        .run()
        .await
        .context("Sort run failed")?;

    host.into_snapshot()
        .save(&mailbox_path)
        .await
        .with_context(|| format!("Failed to save mailbox to {}", mailbox_path.display()))?;

    if report.has_failures() {
        warn!(moved = report.messages_moved(), "Sort finished with failures");
    } else {
        info!(moved = report.messages_moved(), "Sort finished");
    }
    info!(
        "Run report:\n{}",
        serde_json::to_string_pretty(&report).context("Failed to serialize report")?
    );

    Ok(())
}

fn config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("autoordered")
}

fn data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("autoordered")
}
