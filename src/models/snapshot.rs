use chrono::NaiveDate;

/// Drawdown picture of one symbol as of its latest close.
///
/// Recomputed on every run from freshly fetched closes; never persisted
/// directly (see [`crate::models::state::SymbolState`] for the stored mirror).
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub symbol: String,
    pub last_date: NaiveDate,
    pub last_close: f64,
    /// Earliest date in the lookback window with the maximum close
    pub peak_date: NaiveDate,
    pub peak_value: f64,
    /// `last_close / peak_value - 1`, always <= 0
    pub drawdown: f64,
}
