//! Fencer report: one fencer's statistics per phase class, ranked.

use tracing::debug;

use super::aggregate::compute;
use super::filter;
use super::perspective::NormalizedView;
use super::ranking::{position_of, rank_aggregates, PopulationIndex};
use crate::config::EngineConfig;
use crate::models::{AggregateResult, FencerReport, FilterContext, MatchRecord, Metric, PhaseClass};

/// Overall, pool and bracket aggregates of `fencer` under `ctx`.
///
/// Each aggregate carries the fencer's position for every metric among the
/// same filtered population: overall ranks use the leaderboard threshold,
/// pool and bracket ranks their own class threshold.
pub fn fencer_report(
    table: &[MatchRecord],
    fencer: &str,
    ctx: &FilterContext,
    config: &EngineConfig,
) -> FencerReport {
    let marker = config.pool_marker.as_str();
    let view = NormalizedView::build(filter::apply(table, ctx, marker), fencer, marker);

    let mut overall = compute(&view.rows);
    let mut pool = compute(&view.of_class(PhaseClass::Pool));
    let mut bracket = compute(&view.of_class(PhaseClass::Bracket));

    let sections: [(&mut AggregateResult, Option<PhaseClass>, u32); 3] = [
        (&mut overall, None, config.leaderboard_min_matches),
        (&mut pool, Some(PhaseClass::Pool), config.pool_min_matches),
        (&mut bracket, Some(PhaseClass::Bracket), config.bracket_min_matches),
    ];
    for (stats, class, min_matches) in sections {
        let index = PopulationIndex::build(table, ctx, class, marker);
        let eligible = index.aggregates(min_matches);
        for metric in Metric::ALL {
            let ranks = rank_aggregates(&eligible, metric);
            stats.rank_by_metric.insert(metric, position_of(&ranks, fencer));
        }
    }

    debug!("Report for {}: {} bouts", fencer, overall.matches);

    FencerReport {
        fencer: fencer.to_string(),
        overall,
        pool,
        bracket,
        rejected: view.rejected,
    }
}
