use chrono::{DateTime, SecondsFormat, Utc};

use crate::business_logic::alert::Alert;
use crate::business_logic::config::SymbolRule;
use crate::models::issue::IssueDraft;
use crate::models::snapshot::Snapshot;

/// Build the issue for an alert.
///
/// The title carries the peak date so a new epoch never collides with an
/// issue filed for an earlier peak.
pub fn render_alert(
    rule: &SymbolRule,
    alert: &Alert,
    snapshot: &Snapshot,
    mention_id: &str,
    label: &str,
) -> IssueDraft {
    let symbol = &snapshot.symbol;
    let title = format!(
        "[DD Alert] {} L{} since {} (<= {}%)",
        symbol,
        alert.level,
        snapshot.peak_date,
        format_pct(alert.threshold)
    );

    let ladder = rule
        .thresholds
        .iter()
        .map(|t| format!("{}%", format_pct(*t)))
        .collect::<Vec<_>>()
        .join(", ");

    let body = format!(
        "@{mention}\n\n\
         **{symbol}** has fallen from its 1-year high to a configured drawdown level.\n\n\
         - Level: **L{level}** (threshold {threshold}%)\n\
         - Peak (1Y): **{peak:.2}** on {peak_date}\n\
         - Last: **{last:.2}** on {last_date}\n\
         - Drawdown: **{drawdown:.2}%**\n\n\
         Rule:\n\
         - {symbol}: {ladder}\n",
        mention = mention_id,
        symbol = symbol,
        level = alert.level,
        threshold = format_pct(alert.threshold),
        peak = snapshot.peak_value,
        peak_date = snapshot.peak_date,
        last = snapshot.last_close,
        last_date = snapshot.last_date,
        drawdown = snapshot.drawdown * 100.0,
        ladder = ladder,
    );

    IssueDraft {
        title,
        body,
        labels: vec![label.to_string()],
    }
}

/// Issue used to check that mentions reach the recipient
pub fn render_mention_test(mention_id: &str, label: &str, now: DateTime<Utc>) -> IssueDraft {
    IssueDraft {
        title: format!(
            "[TEST] Drawdown mention test {}",
            now.to_rfc3339_opts(SecondsFormat::Secs, false)
        ),
        body: format!("@{mention_id}\n\nThis is a notification test."),
        labels: vec![label.to_string()],
    }
}

/// Whole-number percentage of a fraction, e.g. -0.55 -> "-55"
fn format_pct(fraction: f64) -> String {
    format!("{:.0}", fraction * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone};

    fn snapshot() -> Snapshot {
        Snapshot {
            symbol: "TQQQ".to_string(),
            last_date: NaiveDate::from_ymd_opt(2024, 4, 19).unwrap(),
            last_close: 44.1,
            peak_date: NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
            peak_value: 100.0,
            drawdown: -0.559,
        }
    }

    fn alert() -> Alert {
        Alert {
            symbol: "TQQQ".to_string(),
            level: 2,
            threshold: -0.55,
        }
    }

    #[test]
    fn title_embeds_level_peak_date_and_threshold() {
        let rule = SymbolRule::new("TQQQ", &[-0.30, -0.55, -0.75]);
        let draft = render_alert(&rule, &alert(), &snapshot(), "someone", "drawdown-alert");
        assert_eq!(draft.title, "[DD Alert] TQQQ L2 since 2024-01-10 (<= -55%)");
        assert_eq!(draft.labels, vec!["drawdown-alert".to_string()]);
    }

    #[test]
    fn body_summarizes_figures_and_rule() {
        let rule = SymbolRule::new("TQQQ", &[-0.30, -0.55, -0.75]);
        let draft = render_alert(&rule, &alert(), &snapshot(), "someone", "drawdown-alert");

        assert!(draft.body.starts_with("@someone\n\n"));
        assert!(draft.body.contains("- Level: **L2** (threshold -55%)"));
        assert!(draft.body.contains("- Peak (1Y): **100.00** on 2024-01-10"));
        assert!(draft.body.contains("- Last: **44.10** on 2024-04-19"));
        assert!(draft.body.contains("- Drawdown: **-55.90%**"));
        assert!(draft.body.contains("- TQQQ: -30%, -55%, -75%"));
    }

    #[test]
    fn different_peaks_give_different_titles() {
        let rule = SymbolRule::new("TQQQ", &[-0.30, -0.55, -0.75]);
        let mut later = snapshot();
        later.peak_date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();

        let a = render_alert(&rule, &alert(), &snapshot(), "x", "l");
        let b = render_alert(&rule, &alert(), &later, "x", "l");
        assert_ne!(a.title, b.title);
    }

    #[test]
    fn mention_test_issue() {
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 9, 30, 15).unwrap();
        let draft = render_mention_test("someone", "drawdown-alert", now);
        assert_eq!(draft.title, "[TEST] Drawdown mention test 2024-05-01T09:30:15+00:00");
        assert!(draft.body.starts_with("@someone"));
    }
}
