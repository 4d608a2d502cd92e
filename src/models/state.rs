use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::models::snapshot::Snapshot;

pub const STATE_VERSION: u32 = 1;

/// Persisted alert memory for one symbol
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SymbolState {
    #[serde(default)]
    pub peak_date: Option<NaiveDate>,
    #[serde(default)]
    pub peak_value: Option<f64>,
    #[serde(default)]
    pub last_date: Option<NaiveDate>,
    #[serde(default)]
    pub last_close: Option<f64>,
    #[serde(default)]
    pub drawdown: Option<f64>,
    /// Deepest level already alerted within the epoch of `peak_date`
    #[serde(default, deserialize_with = "deserialize_null_as_zero")]
    pub notified_level: usize,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl SymbolState {
    /// Notified level that still counts for an epoch starting at `peak_date`.
    /// A different (or unknown) stored peak means a new epoch, so nothing has
    /// been alerted in it yet.
    pub fn epoch_level(&self, peak_date: NaiveDate) -> usize {
        match self.peak_date {
            Some(stored) if stored == peak_date => self.notified_level,
            _ => 0,
        }
    }

    pub fn mirror(&mut self, snapshot: &Snapshot, now: DateTime<Utc>) {
        self.peak_date = Some(snapshot.peak_date);
        self.peak_value = Some(snapshot.peak_value);
        self.last_date = Some(snapshot.last_date);
        self.last_close = Some(snapshot.last_close);
        self.drawdown = Some(snapshot.drawdown);
        self.updated_at = Some(now);
    }
}

/// Whole state document, one per state file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppState {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub symbols: BTreeMap<String, SymbolState>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            version: STATE_VERSION,
            symbols: BTreeMap::new(),
        }
    }
}

impl AppState {
    /// Pretty JSON, the same shape written to the state file
    pub fn to_pretty_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

fn default_version() -> u32 {
    STATE_VERSION
}

fn deserialize_null_as_zero<'de, D>(deserializer: D) -> Result<usize, D::Error>
where
    D: Deserializer<'de>,
{
    let level: Option<usize> = Deserialize::deserialize(deserializer)?;
    Ok(level.unwrap_or(0))
}
