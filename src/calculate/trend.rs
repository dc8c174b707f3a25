//! Season trend calculator.

use std::collections::BTreeMap;

use super::perspective::{NormalizedMatch, NormalizedView, Outcome};
use super::{filter, percentage};
use crate::models::{FilterContext, MatchRecord, PhaseClass, SeasonTrendPoint};

#[derive(Default)]
struct ClassCounts {
    matches: u32,
    wins: u32,
    decided: u32,
}

impl ClassCounts {
    fn add(&mut self, outcome: Outcome) {
        self.matches += 1;
        match outcome {
            Outcome::Win => {
                self.wins += 1;
                self.decided += 1;
            }
            Outcome::Loss => self.decided += 1,
            Outcome::Undecided => {}
        }
    }

    /// `None` when nothing was decided, so "no data" stays distinct from 0%.
    fn win_pct(&self) -> Option<f64> {
        (self.decided > 0).then(|| percentage(self.wins, self.decided))
    }
}

/// Pool and bracket win counts per season, ascending by season.
///
/// Every season present in `rows` gets a point, even when all its bouts
/// lack a phase.
pub fn season_trend(rows: &[NormalizedMatch<'_>]) -> Vec<SeasonTrendPoint> {
    let mut seasons: BTreeMap<i32, (ClassCounts, ClassCounts)> = BTreeMap::new();

    for row in rows {
        let (pool, bracket) = seasons.entry(row.record.season).or_default();
        match row.class {
            Some(PhaseClass::Pool) => pool.add(row.outcome),
            Some(PhaseClass::Bracket) => bracket.add(row.outcome),
            None => {}
        }
    }

    seasons
        .into_iter()
        .map(|(season, (pool, bracket))| SeasonTrendPoint {
            season,
            pool_matches: pool.matches,
            pool_wins: pool.wins,
            pool_win_pct: pool.win_pct(),
            bracket_matches: bracket.matches,
            bracket_wins: bracket.wins,
            bracket_win_pct: bracket.win_pct(),
        })
        .collect()
}

/// Season trend of `fencer` over the context-filtered table.
pub fn trend(
    table: &[MatchRecord],
    fencer: &str,
    ctx: &FilterContext,
    pool_marker: &str,
) -> Vec<SeasonTrendPoint> {
    let view = NormalizedView::build(filter::apply(table, ctx, pool_marker), fencer, pool_marker);
    season_trend(&view.rows)
}
