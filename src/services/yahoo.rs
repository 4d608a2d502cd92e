use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};
use reqwest::StatusCode;
use serde::Deserialize;

use crate::errors::AppError;
use crate::models::price::DailyClose;

const YAHOO_CHART_URL: &str = "https://query1.finance.yahoo.com/v8/finance/chart";
const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0 Safari/537.36";

/// Source of daily closing prices
#[async_trait]
pub trait PriceSource: Send + Sync {
    /// Valid daily closes for `symbol` over `history_range` (e.g. "2y"),
    /// oldest first, adjusted for splits and dividends when available
    async fn fetch_daily_closes(
        &self,
        symbol: &str,
        history_range: &str,
    ) -> Result<Vec<DailyClose>, AppError>;
}

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: Chart,
}

#[derive(Debug, Deserialize)]
struct Chart {
    result: Option<Vec<ChartResult>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: Option<String>,
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    #[serde(default)]
    meta: Option<ChartMeta>,
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct ChartMeta {
    #[serde(default)]
    gmtoffset: Option<i32>,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    #[serde(default)]
    quote: Vec<Quote>,
    #[serde(default)]
    adjclose: Option<Vec<AdjClose>>,
}

#[derive(Debug, Deserialize)]
struct Quote {
    #[serde(default)]
    close: Option<Vec<Option<f64>>>,
}

#[derive(Debug, Deserialize)]
struct AdjClose {
    #[serde(default)]
    adjclose: Option<Vec<Option<f64>>>,
}

#[derive(Clone)]
pub struct YahooClient {
    client: reqwest::Client,
}

impl YahooClient {
    pub fn new() -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl PriceSource for YahooClient {
    async fn fetch_daily_closes(
        &self,
        symbol: &str,
        history_range: &str,
    ) -> Result<Vec<DailyClose>, AppError> {
        let url = format!("{}/{}", YAHOO_CHART_URL, symbol);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("range", history_range),
                ("interval", "1d"),
                ("events", "div,splits"),
                ("includeAdjustedClose", "true"),
            ])
            .send()
            .await?;

        check_status(symbol, response.status())?;

        let body = response.json::<ChartResponse>().await?;
        let closes = parse_closes(symbol, body)?;
        tracing::debug!("Fetched {} daily closes for {}", closes.len(), symbol);
        Ok(closes)
    }
}

fn check_status(symbol: &str, status: StatusCode) -> Result<(), AppError> {
    if status == StatusCode::NOT_FOUND {
        return Err(AppError::unavailable(symbol, "symbol not found"));
    }
    if !status.is_success() {
        return Err(AppError::Upstream(format!(
            "{} chart request returned HTTP {}",
            symbol, status
        )));
    }
    Ok(())
}

/// Prefer the adjusted close series, fall back to raw closes, drop gaps
fn parse_closes(symbol: &str, response: ChartResponse) -> Result<Vec<DailyClose>, AppError> {
    if let Some(error) = response.chart.error {
        let reason = error
            .description
            .or(error.code)
            .unwrap_or_else(|| "provider error".to_string());
        return Err(AppError::unavailable(symbol, reason));
    }

    let result = response
        .chart
        .result
        .and_then(|mut results| results.pop())
        .ok_or_else(|| AppError::unavailable(symbol, "no chart result"))?;

    if result.timestamp.is_empty() {
        return Err(AppError::unavailable(symbol, "no rows returned"));
    }

    let adjusted = result
        .indicators
        .adjclose
        .and_then(|mut series| series.pop())
        .and_then(|series| series.adjclose);
    let raw = result
        .indicators
        .quote
        .into_iter()
        .next()
        .and_then(|quote| quote.close);
    let values = adjusted
        .or(raw)
        .ok_or_else(|| AppError::unavailable(symbol, "no close column"))?;

    let offset_secs = result.meta.and_then(|m| m.gmtoffset).unwrap_or(0);
    let offset = FixedOffset::east_opt(offset_secs)
        .ok_or_else(|| AppError::Upstream(format!("{symbol}: bad gmtoffset {offset_secs}")))?;

    let mut closes: Vec<DailyClose> = result
        .timestamp
        .iter()
        .zip(values)
        .filter_map(|(ts, close)| {
            let close = close.filter(|c| DailyClose::is_valid_close(*c))?;
            let date = DateTime::from_timestamp(*ts, 0)?
                .with_timezone(&offset)
                .date_naive();
            Some(DailyClose::new(date, close))
        })
        .collect();

    closes.sort_by_key(|obs| obs.date);
    closes.dedup_by_key(|obs| obs.date);
    Ok(closes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn parse(raw: &str) -> Result<Vec<DailyClose>, AppError> {
        let response: ChartResponse = serde_json::from_str(raw).unwrap();
        parse_closes("TQQQ", response)
    }

    // 2024-01-02, 2024-01-03, 2024-01-04 at 09:30 New York (UTC-5)
    const TIMESTAMPS: &str = "[1704205800, 1704292200, 1704378600]";

    #[test]
    fn prefers_adjusted_close_and_drops_gaps() {
        let raw = format!(
            r#"{{"chart": {{"result": [{{
                "meta": {{"gmtoffset": -18000}},
                "timestamp": {TIMESTAMPS},
                "indicators": {{
                    "quote": [{{"close": [51.0, 52.0, 53.0]}}],
                    "adjclose": [{{"adjclose": [50.5, null, 52.5]}}]
                }}
            }}], "error": null}}}}"#
        );
        let closes = parse(&raw).unwrap();
        assert_eq!(closes.len(), 2);
        assert_eq!(closes[0].date, NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
        assert_eq!(closes[0].close, 50.5);
        assert_eq!(closes[1].date, NaiveDate::from_ymd_opt(2024, 1, 4).unwrap());
        assert_eq!(closes[1].close, 52.5);
    }

    #[test]
    fn falls_back_to_raw_close() {
        let raw = format!(
            r#"{{"chart": {{"result": [{{
                "timestamp": {TIMESTAMPS},
                "indicators": {{"quote": [{{"close": [51.0, 52.0, 0.0]}}]}}
            }}], "error": null}}}}"#
        );
        let closes = parse(&raw).unwrap();
        assert_eq!(
            closes.iter().map(|c| c.close).collect::<Vec<_>>(),
            vec![51.0, 52.0]
        );
    }

    #[test]
    fn http_status_mapping() {
        assert!(check_status("TQQQ", StatusCode::OK).is_ok());
        assert!(matches!(
            check_status("TQQQ", StatusCode::NOT_FOUND),
            Err(AppError::DataUnavailable { .. })
        ));
        assert!(matches!(
            check_status("TQQQ", StatusCode::TOO_MANY_REQUESTS),
            Err(AppError::Upstream(_))
        ));
        assert!(matches!(
            check_status("TQQQ", StatusCode::BAD_GATEWAY),
            Err(AppError::Upstream(_))
        ));
    }

    #[test]
    fn missing_close_column_is_unavailable() {
        let raw = format!(
            r#"{{"chart": {{"result": [{{
                "timestamp": {TIMESTAMPS},
                "indicators": {{"quote": [{{}}]}}
            }}], "error": null}}}}"#
        );
        assert!(matches!(parse(&raw), Err(AppError::DataUnavailable { .. })));
    }

    #[test]
    fn empty_result_is_unavailable() {
        let raw = r#"{"chart": {"result": [{"indicators": {"quote": []}}], "error": null}}"#;
        assert!(matches!(parse(raw), Err(AppError::DataUnavailable { .. })));

        let raw = r#"{"chart": {"result": null, "error": {"code": "Not Found", "description": "No data found, symbol may be delisted"}}}"#;
        match parse(raw) {
            Err(AppError::DataUnavailable { reason, .. }) => {
                assert!(reason.contains("delisted"))
            }
            other => panic!("unexpected: {other:?}"),
        }
    }
}
