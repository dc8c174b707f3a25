//! Leaderboard calculator.

use tracing::debug;

use super::ranking::{sort_best_first, PopulationIndex};
use crate::config::EngineConfig;
use crate::models::{
    FilterContext, Leaderboard, LeaderboardRow, MatchRecord, Metric, RankPosition,
    SelectedPosition,
};

/// Full metric bundle of every fencer with enough bouts, sorted on `metric`.
///
/// Eligibility uses the global leaderboard threshold over all phases.
pub fn leaderboard(
    table: &[MatchRecord],
    ctx: &FilterContext,
    metric: Metric,
    selected: Option<&str>,
    config: &EngineConfig,
) -> Leaderboard {
    let index = PopulationIndex::build(table, ctx, None, &config.pool_marker);
    from_index(&index, metric, selected, config.leaderboard_min_matches)
}

/// Build a leaderboard from an existing population index.
pub fn from_index(
    index: &PopulationIndex<'_>,
    metric: Metric,
    selected: Option<&str>,
    min_matches: u32,
) -> Leaderboard {
    let mut rows: Vec<LeaderboardRow> = index
        .aggregates(min_matches)
        .into_iter()
        .map(|(fencer, stats)| LeaderboardRow {
            fencer: fencer.to_string(),
            stats,
        })
        .collect();
    sort_best_first(&mut rows, metric, |r| &r.stats);

    debug!("Leaderboard on {} with {} eligible fencers", metric, rows.len());

    let field_size = rows.len() as u32;
    let selected = selected.map(|name| {
        match rows.iter().position(|r| r.fencer == name) {
            Some(i) => SelectedPosition {
                fencer: name.to_string(),
                position: RankPosition::new(i as u32 + 1, field_size),
                value: Some(metric.value(&rows[i].stats)),
            },
            None => SelectedPosition {
                fencer: name.to_string(),
                position: RankPosition::undefined(),
                value: None,
            },
        }
    });

    Leaderboard {
        metric,
        min_matches,
        rows,
        selected,
    }
}
