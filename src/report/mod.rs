//! Reporting utilities: rankings and formatted terminal output.

use std::cmp::Ordering;

use crate::domain::StrategyScores;

pub mod format;

pub use format::*;

/// One row of the strategy ranking.
#[derive(Debug, Clone, PartialEq)]
pub struct Ranking {
    /// 1-based position, lowest aggregate RMSE first.
    pub rank: usize,
    pub name: String,
    pub overall: f64,
    /// Index of the day offset with the lowest RMSE.
    pub best_step: usize,
    /// Index of the day offset with the highest RMSE.
    pub worst_step: usize,
}

/// Rank strategies by aggregate RMSE (ascending). Ties keep input order.
pub fn rank_strategies(scores: &[StrategyScores]) -> Vec<Ranking> {
    let mut sorted: Vec<&StrategyScores> = scores.iter().collect();
    sorted.sort_by(|a, b| {
        a.report
            .overall
            .partial_cmp(&b.report.overall)
            .unwrap_or(Ordering::Equal)
    });

    sorted
        .into_iter()
        .enumerate()
        .map(|(i, s)| Ranking {
            rank: i + 1,
            name: s.name.clone(),
            overall: s.report.overall,
            best_step: arg_extreme(&s.report.per_step, Ordering::Less),
            worst_step: arg_extreme(&s.report.per_step, Ordering::Greater),
        })
        .collect()
}

/// First index whose value compares `want` against every earlier candidate.
fn arg_extreme(values: &[f64], want: Ordering) -> usize {
    let mut best = 0;
    for (i, v) in values.iter().enumerate().skip(1) {
        if v.partial_cmp(&values[best]) == Some(want) {
            best = i;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ScoreReport;

    fn scores(name: &str, overall: f64, per_step: Vec<f64>) -> StrategyScores {
        StrategyScores {
            name: name.to_string(),
            report: ScoreReport { overall, per_step },
        }
    }

    #[test]
    fn ranks_by_aggregate_rmse() {
        let input = vec![
            scores("daily", 520.0, vec![3.0, 1.0, 2.0, 5.0, 4.0, 4.0, 2.0]),
            scores("weekly", 465.0, vec![1.0; 7]),
            scores("ar", 401.0, vec![2.0, 2.0, 2.0, 2.0, 9.0, 0.5, 2.0]),
        ];

        let ranked = rank_strategies(&input);
        let names: Vec<&str> = ranked.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["ar", "weekly", "daily"]);
        assert_eq!(ranked[0].rank, 1);
        assert_eq!(ranked[0].best_step, 5);
        assert_eq!(ranked[0].worst_step, 4);
        assert_eq!(ranked[2].best_step, 1);
        // First maximum wins on ties.
        assert_eq!(ranked[2].worst_step, 3);
    }

    #[test]
    fn ties_keep_input_order() {
        let input = vec![scores("b", 1.0, vec![1.0; 7]), scores("a", 1.0, vec![1.0; 7])];
        let ranked = rank_strategies(&input);
        assert_eq!(ranked[0].name, "b");
        assert_eq!(ranked[1].name, "a");
    }
}
