use chrono::{DateTime, Utc};

use crate::business_logic::thresholds::decide_level;
use crate::models::snapshot::Snapshot;
use crate::models::state::SymbolState;

/// A level crossing that has not been alerted yet in the current epoch
#[derive(Debug, Clone, PartialEq)]
pub struct Alert {
    pub symbol: String,
    pub level: usize,
    pub threshold: f64,
}

/// Outcome of evaluating one symbol
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub hit_level: Option<usize>,
    pub alert: Option<Alert>,
    /// State to persist once the alert (if any) has been delivered
    pub next: SymbolState,
}

/// Decide whether `snapshot` owes a new alert given what was stored last run.
///
/// The alert epoch is keyed by peak date: when the trailing high moves, the
/// notified level restarts from 0. Within an epoch only a level deeper than
/// the one already notified fires, and it fires once at the deepest level
/// reached (no catch-up alerts for skipped levels).
pub fn evaluate(
    ladder: &[f64],
    snapshot: &Snapshot,
    previous: Option<&SymbolState>,
    now: DateTime<Utc>,
) -> Evaluation {
    let mut next = previous.cloned().unwrap_or_default();
    let effective = next.epoch_level(snapshot.peak_date);
    next.notified_level = effective;

    let hit_level = decide_level(snapshot.drawdown, ladder);

    let alert = match hit_level {
        Some(level) if level > effective => {
            next.notified_level = level;
            Some(Alert {
                symbol: snapshot.symbol.clone(),
                level,
                threshold: ladder[level - 1],
            })
        }
        _ => None,
    };

    next.mirror(snapshot, now);

    Evaluation {
        hit_level,
        alert,
        next,
    }
}
