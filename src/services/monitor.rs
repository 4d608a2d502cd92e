use chrono::{DateTime, Utc};

use crate::business_logic::alert::{evaluate, Alert};
use crate::business_logic::config::{MonitorConfig, SymbolRule};
use crate::business_logic::drawdown::summarize;
use crate::business_logic::message::render_alert;
use crate::errors::AppError;
use crate::models::snapshot::Snapshot;
use crate::models::state::AppState;
use crate::services::issues::IssueTracker;
use crate::services::yahoo::PriceSource;

/// What one run did
#[derive(Debug, Default)]
pub struct RunReport {
    pub snapshots: Vec<Snapshot>,
    pub alerts: Vec<Alert>,
}

/// Runs the drawdown check over every configured symbol
pub struct MonitorService<P, T> {
    config: MonitorConfig,
    prices: P,
    tracker: T,
}

impl<P: PriceSource, T: IssueTracker> MonitorService<P, T> {
    pub fn new(config: MonitorConfig, prices: P, tracker: T) -> Self {
        Self {
            config,
            prices,
            tracker,
        }
    }

    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    /// Process symbols in order, updating `state` in place.
    ///
    /// The first failure aborts the run; the caller must not persist `state`
    /// in that case.
    pub async fn run_once(
        &self,
        state: &mut AppState,
        now: DateTime<Utc>,
    ) -> Result<RunReport, AppError> {
        let mut report = RunReport::default();

        for rule in &self.config.rules {
            let (snapshot, alert) = self.process_symbol(rule, state, now).await?;
            if let Some(alert) = alert {
                report.alerts.push(alert);
            }
            report.snapshots.push(snapshot);
        }

        Ok(report)
    }

    async fn process_symbol(
        &self,
        rule: &SymbolRule,
        state: &mut AppState,
        now: DateTime<Utc>,
    ) -> Result<(Snapshot, Option<Alert>), AppError> {
        let symbol = rule.symbol.as_str();

        let closes = self
            .prices
            .fetch_daily_closes(symbol, &self.config.history_range)
            .await?;
        let snapshot = summarize(
            symbol,
            &closes,
            self.config.lookback_days,
            self.config.min_observations,
        )?;

        let evaluation = evaluate(&rule.thresholds, &snapshot, state.symbols.get(symbol), now);

        tracing::info!(
            "{}: last {:.2} on {}, peak {:.2} on {}, drawdown {:.2}%, level {:?}",
            symbol,
            snapshot.last_close,
            snapshot.last_date,
            snapshot.peak_value,
            snapshot.peak_date,
            snapshot.drawdown * 100.0,
            evaluation.hit_level
        );

        if let Some(ref alert) = evaluation.alert {
            tracing::warn!(
                "{} crossed L{} ({:.0}%) since peak on {}",
                symbol,
                alert.level,
                alert.threshold * 100.0,
                snapshot.peak_date
            );
            let issue = render_alert(
                rule,
                alert,
                &snapshot,
                &self.config.mention_id,
                &self.config.issue_label,
            );
            self.tracker.create_issue(&issue).await?;
        }

        state.symbols.insert(symbol.to_string(), evaluation.next);
        Ok((snapshot, evaluation.alert))
    }
}
