use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use drawdown_alert::business_logic::config::MonitorConfig;
use drawdown_alert::business_logic::message::render_mention_test;
use drawdown_alert::services::issues::{GhCliTracker, IssueTracker};

/// Files a single test issue so the mention target can confirm delivery
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let (writer, _guard) = tracing_appender::non_blocking(std::io::stdout());
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "drawdown_alert=info,test_mention=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(writer))
        .init();

    let config = MonitorConfig::from_env().context("invalid configuration")?;
    let issue = render_mention_test(&config.mention_id, &config.issue_label, chrono::Utc::now());

    GhCliTracker::new(config.github_repo.clone())
        .create_issue(&issue)
        .await
        .context("failed to create test issue")?;

    tracing::info!("Created test issue for @{}", config.mention_id);
    Ok(())
}
