//! Filter engine.
//!
//! Applies the conjunction of a [`FilterContext`]'s predicates to a table,
//! preserving input order and never touching the source rows.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::debug;

use crate::models::{CompetitionType, FilterContext, MatchRecord, RankingRecord};

/// Whether one match row satisfies every predicate of `ctx`.
pub fn matches_record(ctx: &FilterContext, record: &MatchRecord, pool_marker: &str) -> bool {
    let sides = [&record.fencer_a, &record.fencer_b];

    ctx.date_in_range(record.date)
        && ctx.season_in_range(record.season)
        && ctx.competitions.accepts(&record.competition)
        && ctx.competition_types.accepts(&record.competition_type)
        && ctx.categories.accepts(&record.category)
        && (ctx.phases.is_any()
            || record
                .phase
                .as_ref()
                .is_some_and(|p| ctx.phases.accepts(p)))
        && ctx
            .phase_class
            .map_or(true, |class| record.phase_class(pool_marker) == Some(class))
        && ctx.fencers.accepts_any(sides)
        && ctx.opponents.accepts_any(sides)
        && (ctx.winners.is_any()
            || record
                .winner
                .as_ref()
                .is_some_and(|w| ctx.winners.accepts(w)))
}

/// Rows of `table` matching `ctx`, in table order.
pub fn apply<'a>(
    table: &'a [MatchRecord],
    ctx: &FilterContext,
    pool_marker: &str,
) -> Vec<&'a MatchRecord> {
    let subset: Vec<_> = table
        .iter()
        .filter(|r| matches_record(ctx, r, pool_marker))
        .collect();
    debug!("Filtered {} of {} match rows", subset.len(), table.len());
    subset
}

/// Whether one ranking row satisfies the predicates that apply to rankings.
///
/// Phase, opponent and winner predicates have no meaning for a final
/// placement and are ignored.
pub fn matches_ranking(ctx: &FilterContext, record: &RankingRecord) -> bool {
    ctx.date_in_range(record.date)
        && ctx.season_in_range(record.season)
        && ctx.competitions.accepts(&record.competition)
        && ctx.competition_types.accepts(&record.competition_type)
        && ctx.categories.accepts(&record.category)
        && ctx.fencers.accepts(&record.fencer)
}

/// Ranking rows of `table` matching `ctx`, in table order.
pub fn apply_rankings<'a>(table: &'a [RankingRecord], ctx: &FilterContext) -> Vec<&'a RankingRecord> {
    table.iter().filter(|r| matches_ranking(ctx, r)).collect()
}

/// Distinct values available for each filter field.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FilterOptions {
    pub date_min: Option<NaiveDate>,
    pub date_max: Option<NaiveDate>,
    pub seasons: Vec<i32>,
    pub competitions: Vec<String>,
    pub competition_types: Vec<CompetitionType>,
    pub categories: Vec<String>,
    pub phases: Vec<String>,
    pub fencers: Vec<String>,
    pub winners: Vec<String>,
}

impl FilterOptions {
    /// Collect sorted distinct values from the match table.
    pub fn from_matches(table: &[MatchRecord]) -> Self {
        let mut seasons = BTreeSet::new();
        let mut competitions = BTreeSet::new();
        let mut competition_types = BTreeSet::new();
        let mut categories = BTreeSet::new();
        let mut phases = BTreeSet::new();
        let mut fencers = BTreeSet::new();
        let mut winners = BTreeSet::new();

        for r in table {
            seasons.insert(r.season);
            competitions.insert(r.competition.clone());
            competition_types.insert(r.competition_type);
            categories.insert(r.category.clone());
            if let Some(ref p) = r.phase {
                phases.insert(p.clone());
            }
            fencers.insert(r.fencer_a.clone());
            fencers.insert(r.fencer_b.clone());
            if let Some(ref w) = r.winner {
                winners.insert(w.clone());
            }
        }

        Self {
            date_min: table.iter().map(|r| r.date).min(),
            date_max: table.iter().map(|r| r.date).max(),
            seasons: seasons.into_iter().collect(),
            competitions: competitions.into_iter().collect(),
            competition_types: competition_types.into_iter().collect(),
            categories: categories.into_iter().collect(),
            phases: phases.into_iter().collect(),
            fencers: fencers.into_iter().collect(),
            winners: winners.into_iter().collect(),
        }
    }
}
