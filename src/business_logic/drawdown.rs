use crate::errors::AppError;
use crate::models::price::DailyClose;
use crate::models::snapshot::Snapshot;

/// Reduce a date-ordered close series to a [`Snapshot`].
///
/// The peak is the maximum close over the last `lookback` observations; on
/// ties the earliest date wins so the peak date (and with it the alert epoch)
/// stays stable across runs.
pub fn summarize(
    symbol: &str,
    closes: &[DailyClose],
    lookback: usize,
    min_observations: usize,
) -> Result<Snapshot, AppError> {
    if closes.is_empty() {
        return Err(AppError::unavailable(symbol, "empty close series"));
    }
    if closes.len() < min_observations {
        return Err(AppError::DataInsufficient {
            symbol: symbol.to_string(),
            count: closes.len(),
            required: min_observations,
        });
    }

    let window = &closes[closes.len().saturating_sub(lookback.max(1))..];

    let mut peak = window[0];
    for obs in &window[1..] {
        if obs.close > peak.close {
            peak = *obs;
        }
    }
    let last = window[window.len() - 1];

    Ok(Snapshot {
        symbol: symbol.to_string(),
        last_date: last.date,
        last_close: last.close,
        peak_date: peak.date,
        peak_value: peak.close,
        drawdown: last.close / peak.close - 1.0,
    })
}
