//! Ranking calculator.
//!
//! Ranks a fencer against every other fencer under the same filters: the
//! context-filtered table is normalized once for the whole population, then
//! each eligible fencer's metric is sorted best-first.

use std::collections::BTreeMap;

use tracing::{debug, warn};

use super::aggregate::compute;
use super::filter;
use super::perspective::{normalize, NormalizedMatch};
use crate::config::EngineConfig;
use crate::models::{
    AggregateResult, FilterContext, MatchRecord, Metric, PhaseClass, RankPosition, RejectedRow,
    Standing,
};

/// Normalized rows of every fencer for one (context, phase class).
///
/// Built once per query and reused for every metric ranked in it.
#[derive(Debug, Clone)]
pub struct PopulationIndex<'a> {
    class: Option<PhaseClass>,
    rows: BTreeMap<&'a str, Vec<NormalizedMatch<'a>>>,
    rejected: Vec<RejectedRow>,
}

impl<'a> PopulationIndex<'a> {
    /// Index the filtered table; `class = None` keeps every phase.
    pub fn build(
        table: &'a [MatchRecord],
        ctx: &FilterContext,
        class: Option<PhaseClass>,
        pool_marker: &str,
    ) -> Self {
        let mut rows: BTreeMap<&'a str, Vec<NormalizedMatch<'a>>> = BTreeMap::new();
        let mut rejected = Vec::new();

        for record in filter::apply(table, ctx, pool_marker) {
            if class.is_some() && record.phase_class(pool_marker) != class {
                continue;
            }

            match (
                normalize(record, &record.fencer_a),
                normalize(record, &record.fencer_b),
            ) {
                (Ok(a), Ok(b)) => {
                    rows.entry(record.fencer_a.as_str())
                        .or_default()
                        .push(NormalizedMatch::new(record, a, pool_marker));
                    rows.entry(record.fencer_b.as_str())
                        .or_default()
                        .push(NormalizedMatch::new(record, b, pool_marker));
                }
                (Err(e), _) | (_, Err(e)) => {
                    warn!("Excluding row from population: {}", e);
                    rejected.extend(e.rejected_row());
                }
            }
        }

        debug!(
            "Indexed {} fencers for class {:?} ({} rows rejected)",
            rows.len(),
            class,
            rejected.len()
        );

        Self {
            class,
            rows,
            rejected,
        }
    }

    pub fn class(&self) -> Option<PhaseClass> {
        self.class
    }

    /// Fencers with at least one row, in name order.
    pub fn fencers(&self) -> impl Iterator<Item = &'a str> + '_ {
        self.rows.keys().copied()
    }

    pub fn rows_for(&self, fencer: &str) -> &[NormalizedMatch<'a>] {
        self.rows.get(fencer).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn rejected(&self) -> &[RejectedRow] {
        &self.rejected
    }

    /// Aggregate of every fencer with at least `min_matches` rows, in name order.
    pub fn aggregates(&self, min_matches: u32) -> Vec<(&'a str, AggregateResult)> {
        self.rows
            .iter()
            .filter(|(_, rows)| rows.len() as u32 >= min_matches)
            .map(|(name, rows)| (*name, compute(rows)))
            .collect()
    }

    /// Position of every eligible fencer for `metric`.
    pub fn rank(&self, metric: Metric, min_matches: u32) -> BTreeMap<String, RankPosition> {
        rank_aggregates(&self.aggregates(min_matches), metric)
    }
}

/// Sort eligible aggregates best-first for `metric`.
///
/// The sort is stable, so equal values keep the input (name) order.
pub fn sort_best_first<T>(entries: &mut [T], metric: Metric, stats: impl Fn(&T) -> &AggregateResult) {
    entries.sort_by(|a, b| metric.best_first(metric.value(stats(a)), metric.value(stats(b))));
}

/// Positions from a list of eligible (fencer, aggregate) pairs.
pub fn rank_aggregates(
    eligible: &[(&str, AggregateResult)],
    metric: Metric,
) -> BTreeMap<String, RankPosition> {
    let mut order: Vec<&(&str, AggregateResult)> = eligible.iter().collect();
    sort_best_first(&mut order, metric, |e| &e.1);

    let field_size = order.len() as u32;
    order
        .iter()
        .enumerate()
        .map(|(i, (name, _))| (name.to_string(), RankPosition::new(i as u32 + 1, field_size)))
        .collect()
}

/// Rank every fencer of the filtered population on `metric` within one phase
/// class, applying that class's minimum-sample threshold.
pub fn rank(
    table: &[MatchRecord],
    ctx: &FilterContext,
    class: PhaseClass,
    metric: Metric,
    config: &EngineConfig,
) -> BTreeMap<String, RankPosition> {
    let index = PopulationIndex::build(table, ctx, Some(class), &config.pool_marker);
    index.rank(metric, config.min_matches_for(class))
}

/// Ranking table of one phase class, best first.
pub fn standings(
    table: &[MatchRecord],
    ctx: &FilterContext,
    class: PhaseClass,
    metric: Metric,
    config: &EngineConfig,
) -> Vec<Standing> {
    let index = PopulationIndex::build(table, ctx, Some(class), &config.pool_marker);
    let mut eligible = index.aggregates(config.min_matches_for(class));
    sort_best_first(&mut eligible, metric, |e| &e.1);

    let field_size = eligible.len() as u32;
    eligible
        .into_iter()
        .enumerate()
        .map(|(i, (fencer, stats))| Standing {
            fencer: fencer.to_string(),
            position: RankPosition::new(i as u32 + 1, field_size),
            value: metric.value(&stats),
            matches: stats.matches,
        })
        .collect()
}

/// Look up one fencer, returning the undefined sentinel when absent.
pub fn position_of(ranks: &BTreeMap<String, RankPosition>, fencer: &str) -> RankPosition {
    ranks.get(fencer).copied().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculate::fixtures::{bracket, pool, MARKER};

    fn config() -> EngineConfig {
        EngineConfig::default()
    }

    /// Five pool bouts per fencer among Alice, Bea and Chloe, plus Dana with
    /// three bracket bouts and no pool bouts.
    fn table() -> Vec<MatchRecord> {
        let mut t = Vec::new();
        for _ in 0..3 {
            t.push(pool("Alice", "Bea", 5, 2));
            t.push(pool("Alice", "Chloe", 5, 4));
            t.push(pool("Bea", "Chloe", 5, 1));
        }
        t.push(bracket("Dana", "Alice", 15, 9));
        t.push(bracket("Dana", "Bea", 15, 12));
        t.push(bracket("Chloe", "Dana", 15, 14));
        t
    }

    #[test]
    fn test_pool_ranking_by_win_pct() {
        let ranks = rank(&table(), &FilterContext::default(), PhaseClass::Pool, Metric::WinPct, &config());

        assert_eq!(position_of(&ranks, "Alice"), RankPosition::new(1, 3));
        assert_eq!(position_of(&ranks, "Bea"), RankPosition::new(2, 3));
        assert_eq!(position_of(&ranks, "Chloe"), RankPosition::new(3, 3));
    }

    #[test]
    fn test_pool_threshold_excludes_bracket_only_fencer() {
        let t = table();
        let ctx = FilterContext::default();
        let pool_ranks = rank(&t, &ctx, PhaseClass::Pool, Metric::WinPct, &config());
        assert_eq!(position_of(&pool_ranks, "Dana"), RankPosition::undefined());
        assert!(pool_ranks.values().all(|p| p.field_size == 3));

        let bracket_ranks = rank(&t, &ctx, PhaseClass::Bracket, Metric::WinPct, &config());
        assert!(position_of(&bracket_ranks, "Dana").is_defined());
        assert_eq!(position_of(&bracket_ranks, "Dana").field_size, 4);
    }

    #[test]
    fn test_pool_threshold_counts_rows() {
        // Alice 5 pool bouts, Bea 4, Chloe 1.
        let mut t = Vec::new();
        for _ in 0..4 {
            t.push(pool("Alice", "Bea", 5, 3));
        }
        t.push(pool("Chloe", "Alice", 5, 3));
        let ranks = rank(&t, &FilterContext::default(), PhaseClass::Pool, Metric::WinPct, &config());

        assert_eq!(position_of(&ranks, "Alice"), RankPosition::new(1, 1));
        assert_eq!(position_of(&ranks, "Bea"), RankPosition::undefined());
        assert_eq!(position_of(&ranks, "Chloe"), RankPosition::undefined());
    }

    #[test]
    fn test_lower_is_better_sorts_ascending() {
        let ranks = rank(
            &table(),
            &FilterContext::default(),
            PhaseClass::Pool,
            Metric::MeanConceded,
            &config(),
        );
        // Mean conceded: Alice 3.0, Bea 3.0 (tie, name order), Chloe 5.0
        assert_eq!(position_of(&ranks, "Alice").position, 1);
        assert_eq!(position_of(&ranks, "Bea").position, 2);
        assert_eq!(position_of(&ranks, "Chloe").position, 3);
    }

    #[test]
    fn test_ties_keep_name_order() {
        let mut t = Vec::new();
        for _ in 0..5 {
            t.push(pool("Zoe", "Xena", 5, 0));
            t.push(pool("Yann", "Walt", 5, 0));
        }
        let ranks = rank(&t, &FilterContext::default(), PhaseClass::Pool, Metric::WinPct, &config());

        assert_eq!(position_of(&ranks, "Yann").position, 1);
        assert_eq!(position_of(&ranks, "Zoe").position, 2);
        assert_eq!(position_of(&ranks, "Walt").position, 3);
        assert_eq!(position_of(&ranks, "Xena").position, 4);
    }

    #[test]
    fn test_rank_monotonic() {
        let t = table();
        let index = PopulationIndex::build(&t, &FilterContext::default(), Some(PhaseClass::Pool), MARKER);
        let eligible = index.aggregates(5);
        let ranks = rank_aggregates(&eligible, Metric::MeanScored);

        for (a, sa) in &eligible {
            for (b, sb) in &eligible {
                if sa.mean_scored > sb.mean_scored {
                    assert!(ranks[*a].position < ranks[*b].position);
                }
            }
        }
    }

    #[test]
    fn test_standings_match_rank() {
        let t = table();
        let ctx = FilterContext::default();
        let rows = standings(&t, &ctx, PhaseClass::Pool, Metric::WinPct, &config());
        let ranks = rank(&t, &ctx, PhaseClass::Pool, Metric::WinPct, &config());

        let names: Vec<&str> = rows.iter().map(|s| s.fencer.as_str()).collect();
        assert_eq!(names, vec!["Alice", "Bea", "Chloe"]);
        for s in &rows {
            assert_eq!(s.position, position_of(&ranks, &s.fencer));
        }
        assert_eq!(rows[0].matches, 6);
    }

    #[test]
    fn test_empty_population() {
        let ranks = rank(&[], &FilterContext::default(), PhaseClass::Pool, Metric::WinPct, &config());
        assert!(ranks.is_empty());
        assert_eq!(position_of(&ranks, "Alice"), RankPosition::undefined());
    }

    #[test]
    fn test_index_rejects_invalid_rows_once() {
        let mut t = table();
        t.push(pool("Alice", "Bea", 5, 1).with_winner(Some("Bea")));
        let index = PopulationIndex::build(&t, &FilterContext::default(), None, MARKER);

        assert_eq!(index.rejected().len(), 1);
        assert_eq!(index.rows_for("Alice").len(), 7);
        assert_eq!(index.fencers().count(), 4);
        assert!(index.class().is_none());
    }

    #[test]
    fn test_index_rejects_self_bout() {
        let mut t = table();
        t.push(pool("Alice", "Alice", 5, 3));
        let index = PopulationIndex::build(&t, &FilterContext::default(), None, MARKER);

        assert_eq!(index.rejected().len(), 1);
        assert_eq!(index.rows_for("Alice").len(), 7);
    }

    #[test]
    fn test_rank_repeatable() {
        let t = table();
        let ctx = FilterContext::default();
        let first = rank(&t, &ctx, PhaseClass::Pool, Metric::MeanConceded, &config());
        let second = rank(&t, &ctx, PhaseClass::Pool, Metric::MeanConceded, &config());
        assert_eq!(first, second);
    }
}
