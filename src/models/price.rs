use chrono::NaiveDate;

/// One valid daily close, dated in the exchange's local calendar
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DailyClose {
    pub date: NaiveDate,
    pub close: f64,
}

impl DailyClose {
    pub fn new(date: NaiveDate, close: f64) -> Self {
        Self { date, close }
    }

    /// Missing, non-finite and non-positive closes are not usable observations
    pub fn is_valid_close(close: f64) -> bool {
        close.is_finite() && close > 0.0
    }
}
