use std::env;
use std::path::PathBuf;

use validator::{Validate, ValidationError};

use crate::business_logic::thresholds::ladder_is_monotonic;
use crate::errors::AppError;

pub const DEFAULT_MENTION_ID: &str = "BiscuitBlueBear";
pub const DEFAULT_STATE_PATH: &str = ".state/drawdown_state.json";
pub const ISSUE_LABEL: &str = "drawdown-alert";

/// Drawdown ladder for one symbol, shallow to deep (e.g. -0.30, -0.55, -0.75)
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct SymbolRule {
    pub symbol: String,
    pub thresholds: Vec<f64>,
}

impl SymbolRule {
    pub fn new(symbol: &str, thresholds: &[f64]) -> Self {
        Self {
            symbol: symbol.to_string(),
            thresholds: thresholds.to_vec(),
        }
    }
}

/// Configuration for a monitoring run
#[derive(Debug, Clone, Validate)]
pub struct MonitorConfig {
    /// Symbols in processing order, each with its ladder
    #[validate(custom(function = "validate_rules"))]
    pub rules: Vec<SymbolRule>,
    /// Trading days in the trailing peak window
    #[validate(range(min = 1))]
    pub lookback_days: usize,
    /// Valid closes required before a symbol is evaluated
    #[validate(range(min = 1))]
    pub min_observations: usize,
    /// Calendar span requested from the provider; must cover `lookback_days`
    #[validate(length(min = 1))]
    pub history_range: String,
    pub state_path: PathBuf,
    #[validate(length(min = 1))]
    pub mention_id: String,
    #[validate(length(min = 1))]
    pub issue_label: String,
    /// `owner/name` passed to `gh --repo`; the current checkout when unset
    pub github_repo: Option<String>,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            rules: vec![
                SymbolRule::new("TQQQ", &[-0.30, -0.55, -0.75]),
                SymbolRule::new("SOXL", &[-0.45, -0.65, -0.85]),
                SymbolRule::new("TECL", &[-0.25, -0.50, -0.75]),
            ],
            lookback_days: 252,
            min_observations: 60,
            history_range: "2y".to_string(),
            state_path: PathBuf::from(DEFAULT_STATE_PATH),
            mention_id: DEFAULT_MENTION_ID.to_string(),
            issue_label: ISSUE_LABEL.to_string(),
            github_repo: None,
        }
    }
}

impl MonitorConfig {
    /// Defaults with environment overrides applied, validated
    pub fn from_env() -> Result<Self, AppError> {
        let defaults = Self::default();
        let config = Self {
            lookback_days: env_usize("DRAWDOWN_LOOKBACK_DAYS", defaults.lookback_days),
            min_observations: env_usize("DRAWDOWN_MIN_OBSERVATIONS", defaults.min_observations),
            history_range: env_str("DRAWDOWN_HISTORY_RANGE", &defaults.history_range),
            state_path: PathBuf::from(env_str("DRAWDOWN_STATE_PATH", DEFAULT_STATE_PATH)),
            mention_id: env_str("MENTION_ID", DEFAULT_MENTION_ID),
            github_repo: env_opt("GH_REPO"),
            ..defaults
        };
        config.check()?;
        Ok(config)
    }

    /// Validate, and warn about ladders whose levels are not deepening
    pub fn check(&self) -> Result<(), AppError> {
        self.validate()
            .map_err(|err| AppError::Validation(err.to_string()))?;

        for rule in &self.rules {
            if !ladder_is_monotonic(&rule.thresholds) {
                tracing::warn!(
                    "{} ladder {:?} is not shallow-to-deep; levels are evaluated as listed",
                    rule.symbol,
                    rule.thresholds
                );
            }
        }
        Ok(())
    }
}

pub fn validate_rules(rules: &[SymbolRule]) -> Result<(), ValidationError> {
    if rules.is_empty() {
        return Err(rule_error("no_rules", "at least one symbol must be configured".into()));
    }
    for rule in rules {
        if rule.symbol.trim().is_empty() {
            return Err(rule_error("empty_symbol", "symbol must not be empty".into()));
        }
        if rule.thresholds.is_empty() {
            return Err(rule_error(
                "empty_ladder",
                format!("{} has no thresholds", rule.symbol),
            ));
        }
        if let Some(bad) = rule
            .thresholds
            .iter()
            .find(|t| !(t.is_finite() && **t < 0.0 && **t > -1.0))
        {
            return Err(rule_error(
                "threshold_out_of_range",
                format!("{} threshold {} must lie in (-1, 0)", rule.symbol, bad),
            ));
        }
    }

    let mut seen = std::collections::HashSet::new();
    for rule in rules {
        if !seen.insert(rule.symbol.as_str()) {
            return Err(rule_error(
                "duplicate_symbol",
                format!("{} is configured more than once", rule.symbol),
            ));
        }
    }
    Ok(())
}

fn rule_error(code: &'static str, message: String) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(message.into());
    error
}

fn env_opt(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn env_str(name: &str, default: &str) -> String {
    env_opt(name).unwrap_or_else(|| default.to_string())
}

fn env_usize(name: &str, default: usize) -> usize {
    match env_opt(name) {
        Some(raw) => parse_usize_or(name, &raw, default),
        None => default,
    }
}

fn parse_usize_or(name: &str, raw: &str, default: usize) -> usize {
    raw.parse().unwrap_or_else(|_| {
        tracing::warn!("{}={:?} is not a whole number, using {}", name, raw, default);
        default
    })
}
