//! Formatted terminal output.
//!
//! We keep formatting code in one place so:
//! - the evaluation code stays clean and testable
//! - output changes are localized (and covered by the snapshot tests below)

use crate::domain::{Block, ScoreReport, Series, StrategyScores};
use crate::error::EvalError;
use crate::report::Ranking;

/// `name: [overall] s1, s2, ...` with the aggregate at 3 decimals and each
/// step at 1 decimal.
pub fn format_summary_line(name: &str, report: &ScoreReport) -> String {
    let steps: Vec<String> = report.per_step.iter().map(|s| format!("{s:.1}")).collect();
    format!("{name}: [{:.3}] {}", report.overall, steps.join(", "))
}

/// Dataset and window summary printed before the scores.
pub fn format_run_header(source: &str, series: &Series, train: &[Block], test: &[Block]) -> String {
    let mut out = String::new();

    out.push_str("=== pwf - Walk-forward Weekly Forecast Evaluation ===\n");
    out.push_str(&format!("Source: {source}\n"));
    out.push_str(&format!("Target: {}\n", series.target_name()));
    if let (Some(first), Some(last)) = (series.rows.first(), series.rows.last()) {
        out.push_str(&format!("Rows: n={} | {} .. {}\n", series.len(), first.date, last.date));
    }
    out.push_str(&format!("Train: {}\n", describe_blocks(train)));
    out.push_str(&format!("Test : {}\n", describe_blocks(test)));

    out
}

fn describe_blocks(blocks: &[Block]) -> String {
    match (blocks.first(), blocks.last()) {
        (Some(first), Some(last)) => format!(
            "{} weeks | {} .. {}",
            blocks.len(),
            first.first_date(),
            last.rows()[last.rows().len() - 1].date
        ),
        _ => "0 weeks".to_string(),
    }
}

/// One summary line per strategy, in the given order.
pub fn format_scores(scores: &[StrategyScores]) -> String {
    let mut out = String::new();
    for s in scores {
        out.push_str(&format_summary_line(&s.name, &s.report));
        out.push('\n');
    }
    out
}

/// Per-step RMSE table with a column per step label.
pub fn format_score_table(scores: &[StrategyScores], step_labels: &[String]) -> String {
    let mut out = String::new();

    let mut header = format!("{:<12} {:>10}", "strategy", "rmse");
    let mut rule = format!("{:-<12} {:-<10}", "", "");
    for label in step_labels {
        header.push_str(&format!(" {:>8}", truncate(label, 8)));
        rule.push_str(&format!(" {:-<8}", ""));
    }
    out.push_str(header.trim_end());
    out.push('\n');
    out.push_str(rule.trim_end());
    out.push('\n');

    for s in scores {
        let mut line = format!("{:<12} {:>10.3}", truncate(&s.name, 12), s.report.overall);
        for v in &s.report.per_step {
            line.push_str(&format!(" {v:>8.1}"));
        }
        out.push_str(line.trim_end());
        out.push('\n');
    }

    out
}

/// Ranking table: position, name, aggregate RMSE, best and worst day.
pub fn format_rankings(rankings: &[Ranking], step_labels: &[String]) -> String {
    let mut out = String::new();

    out.push_str(
        format!("{:>4} {:<12} {:>10} {:<6} {:<6}", "rank", "strategy", "rmse", "best", "worst").trim_end(),
    );
    out.push('\n');
    out.push_str(format!("{:-<4} {:-<12} {:-<10} {:-<6} {:-<6}", "", "", "", "", "").trim_end());
    out.push('\n');

    for r in rankings {
        out.push_str(
            format!(
                "{:>4} {:<12} {:>10.3} {:<6} {:<6}",
                r.rank,
                truncate(&r.name, 12),
                r.overall,
                step_label(step_labels, r.best_step),
                step_label(step_labels, r.worst_step),
            )
            .trim_end(),
        );
        out.push('\n');
    }

    out
}

/// One line per failed strategy, naming the week and error kind.
pub fn format_failures(failures: &[(&str, &EvalError)]) -> String {
    let mut out = String::new();
    for (name, err) in failures {
        out.push_str(&format!("FAILED {name}: {err}\n"));
    }
    out
}

fn step_label(labels: &[String], step: usize) -> String {
    labels
        .get(step)
        .cloned()
        .unwrap_or_else(|| format!("d{}", step + 1))
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
    out.push('.');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ForecastError;
    use crate::report::rank_strategies;

    fn labels() -> Vec<String> {
        ["sun", "mon", "tue", "wed", "thu", "fri", "sat"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    fn weekly() -> StrategyScores {
        StrategyScores {
            name: "weekly".to_string(),
            report: ScoreReport {
                overall: 465.25,
                per_step: vec![452.5, 424.375, 396.0, 471.5, 442.0, 401.5, 551.125],
            },
        }
    }

    #[test]
    fn summary_line_matches_console_format() {
        let line = format_summary_line("weekly", &weekly().report);
        assert_eq!(
            line,
            "weekly: [465.250] 452.5, 424.4, 396.0, 471.5, 442.0, 401.5, 551.1"
        );
    }

    #[test]
    fn score_table_snapshot() {
        let txt = format_score_table(&[weekly()], &labels());
        let expected = concat!(
            "strategy           rmse      sun      mon      tue      wed      thu      fri      sat\n",
            "------------ ---------- -------- -------- -------- -------- -------- -------- --------\n",
            "weekly          465.250    452.5    424.4    396.0    471.5    442.0    401.5    551.1\n",
        );
        assert_eq!(txt, expected);
    }

    #[test]
    fn rankings_use_step_labels() {
        let ranked = rank_strategies(&[weekly()]);
        let txt = format_rankings(&ranked, &labels());
        let last = txt.lines().last().unwrap();
        assert_eq!(last, "   1 weekly          465.250 tue    sat");
    }

    #[test]
    fn failures_name_week_and_kind() {
        let err = EvalError::Strategy {
            strategy: "ar".to_string(),
            week: 3,
            recorded: 3,
            source: ForecastError::SingularFit,
        };
        let txt = format_failures(&[("ar", &err)]);
        assert!(txt.starts_with("FAILED ar: "));
        assert!(txt.contains("test week 3"));
        assert!(txt.contains("singular"));
    }

    #[test]
    fn long_names_are_truncated() {
        assert_eq!(truncate("year-ago-persistence", 12), "year-ago-pe.");
        assert_eq!(truncate("ar", 12), "ar");
    }
}
