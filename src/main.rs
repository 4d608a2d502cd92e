use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use drawdown_alert::business_logic::config::MonitorConfig;
use drawdown_alert::services::issues::GhCliTracker;
use drawdown_alert::services::monitor::MonitorService;
use drawdown_alert::services::state_store::StateStore;
use drawdown_alert::services::yahoo::YahooClient;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let (writer, _guard) = tracing_appender::non_blocking(std::io::stdout());
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "drawdown_alert=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(writer))
        .init();

    let config = MonitorConfig::from_env().context("invalid configuration")?;
    let store = StateStore::new(config.state_path.clone());
    let mut state = store.load().context("failed to load state")?;

    let prices = YahooClient::new().context("failed to build market-data client")?;
    let tracker = GhCliTracker::new(config.github_repo.clone());
    let monitor = MonitorService::new(config, prices, tracker);

    tracing::info!(
        "Checking {} symbols, state at {}",
        monitor.config().rules.len(),
        store.path().display()
    );

    let now = chrono::Utc::now();
    let report = monitor
        .run_once(&mut state, now)
        .await
        .context("drawdown check failed")?;

    store.save(&state).context("failed to save state")?;

    tracing::info!(
        "Checked {} symbols, filed {} alerts",
        report.snapshots.len(),
        report.alerts.len()
    );
    // always echoed to the job log, whatever the log filter
    println!("{}", state.to_pretty_json().context("failed to encode state")?);

    Ok(())
}
