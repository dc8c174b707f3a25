//! Aggregate calculator: the statistics bundle over a normalized subset.

use super::perspective::{NormalizedMatch, Outcome};
use super::{mean, percentage};
use crate::models::AggregateResult;

/// Compute the statistics bundle for one fencer's normalized rows.
///
/// Bouts without a decidable outcome (tie, missing touches) count in
/// `matches` and `undecided` but not in `total`. Touch means use every row
/// that carries the touch count, decided or not.
pub fn compute(rows: &[NormalizedMatch<'_>]) -> AggregateResult {
    let mut stats = AggregateResult {
        matches: rows.len() as u32,
        ..Default::default()
    };

    let (mut scored_sum, mut scored_n) = (0u64, 0u32);
    let (mut conceded_sum, mut conceded_n) = (0u64, 0u32);
    let mut scored_on_loss = 0u64;
    let mut conceded_on_win = 0u64;

    for row in rows {
        if let Some(s) = row.scored {
            scored_sum += s as u64;
            scored_n += 1;
        }
        if let Some(c) = row.conceded {
            conceded_sum += c as u64;
            conceded_n += 1;
        }

        match row.outcome {
            Outcome::Win => {
                stats.wins += 1;
                conceded_on_win += row.conceded.unwrap_or(0) as u64;
            }
            Outcome::Loss => {
                stats.losses += 1;
                scored_on_loss += row.scored.unwrap_or(0) as u64;
            }
            Outcome::Undecided => stats.undecided += 1,
        }
    }

    stats.total = stats.wins + stats.losses;
    stats.win_pct = percentage(stats.wins, stats.total);
    stats.mean_scored = mean(scored_sum, scored_n);
    stats.mean_conceded = mean(conceded_sum, conceded_n);
    stats.mean_scored_on_loss = mean(scored_on_loss, stats.losses);
    stats.mean_conceded_on_win = mean(conceded_on_win, stats.wins);
    stats
}
