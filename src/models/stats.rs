//! Derived statistics models.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{CompetitionType, MatchId, Metric};

/// A fencer's position among the ranked field.
///
/// `(0, 0)` is the "rank undefined" sentinel: empty population, below the
/// sample threshold, or absent from the eligible set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankPosition {
    /// 1-based position, 1 = best
    pub position: u32,
    /// Number of fencers ranked
    pub field_size: u32,
}

impl RankPosition {
    pub fn new(position: u32, field_size: u32) -> Self {
        Self {
            position,
            field_size,
        }
    }

    pub fn undefined() -> Self {
        Self::default()
    }

    pub fn is_defined(&self) -> bool {
        self.position > 0 && self.field_size > 0
    }

    /// Percentile within the field, 100 = best. `None` when undefined.
    pub fn percentile(&self) -> Option<f64> {
        if !self.is_defined() {
            return None;
        }
        if self.field_size == 1 {
            return Some(100.0);
        }
        let behind = (self.field_size - self.position) as f64;
        Some(behind / (self.field_size - 1) as f64 * 100.0)
    }
}

/// A row excluded from a computation because it broke a record invariant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RejectedRow {
    pub id: MatchId,
    pub reason: String,
}

/// Statistics bundle for one fencer over one subset of bouts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AggregateResult {
    /// Rows in the subset
    pub matches: u32,

    pub wins: u32,
    pub losses: u32,

    /// Ties and bouts with missing touches
    pub undecided: u32,

    /// Decided bouts (wins + losses)
    pub total: u32,

    /// Win percentage over decided bouts (0 to 100)
    pub win_pct: f64,

    pub mean_scored: f64,
    pub mean_conceded: f64,
    pub mean_scored_on_loss: f64,
    pub mean_conceded_on_win: f64,

    /// Position among all fencers for each ranked metric
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub rank_by_metric: BTreeMap<Metric, RankPosition>,
}

impl AggregateResult {
    pub fn rank(&self, metric: Metric) -> RankPosition {
        self.rank_by_metric.get(&metric).copied().unwrap_or_default()
    }
}

/// One fencer's line in a leaderboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardRow {
    pub fencer: String,

    #[serde(flatten)]
    pub stats: AggregateResult,
}

/// Where the requested fencer sits in a leaderboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectedPosition {
    pub fencer: String,
    pub position: RankPosition,
    /// Metric value, `None` when the fencer is not eligible
    pub value: Option<f64>,
}

/// Full leaderboard for one metric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Leaderboard {
    pub metric: Metric,
    pub min_matches: u32,
    pub rows: Vec<LeaderboardRow>,
    pub selected: Option<SelectedPosition>,
}

/// One line of a per-phase ranking table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Standing {
    pub fencer: String,
    pub position: RankPosition,
    pub value: f64,
    pub matches: u32,
}

/// Bout and win counts of a pair within one phase class.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairWins {
    pub bouts: u32,
    pub wins_x: u32,
    pub wins_y: u32,
}

impl PairWins {
    pub fn swapped(self) -> Self {
        Self {
            bouts: self.bouts,
            wins_x: self.wins_y,
            wins_y: self.wins_x,
        }
    }
}

/// Mutual record of two fencers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HeadToHeadResult {
    pub fencer_x: String,
    pub fencer_y: String,

    pub bouts: u32,
    pub wins_x: u32,
    pub wins_y: u32,
    pub pct_x: f64,
    pub pct_y: f64,

    pub pool: PairWins,
    pub bracket: PairWins,

    /// Touches scored by each fencer across the whole subset
    pub touches_x: u32,
    pub touches_y: u32,

    /// Mean touches scored by y in bracket bouts x won
    pub mean_loser_touches_when_x_wins: f64,
    /// Mean touches scored by x in bracket bouts y won
    pub mean_loser_touches_when_y_wins: f64,

    pub rejected: Vec<RejectedRow>,
}

/// Win counts and percentages for one season.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeasonTrendPoint {
    pub season: i32,
    pub pool_matches: u32,
    pub pool_wins: u32,
    /// `None` when no decided pool bout exists that season
    pub pool_win_pct: Option<f64>,
    pub bracket_matches: u32,
    pub bracket_wins: u32,
    /// `None` when no decided bracket bout exists that season
    pub bracket_win_pct: Option<f64>,
}

/// Overall, pool and bracket statistics of one fencer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FencerReport {
    pub fencer: String,
    pub overall: AggregateResult,
    pub pool: AggregateResult,
    pub bracket: AggregateResult,
    pub rejected: Vec<RejectedRow>,
}

/// One placement with the size of its field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacementEntry {
    pub date: NaiveDate,
    pub season: i32,
    pub competition: String,
    pub category: String,
    pub competition_type: CompetitionType,
    pub placement: u32,
    pub field_size: u32,
    /// Share of the field finishing at or behind this placement (0 to 100)
    pub percentile: f64,
}

impl PlacementEntry {
    pub fn is_title(&self) -> bool {
        self.placement == 1
    }

    /// Medal placement. Fencing awards two bronze medals, so 3rd is shared.
    pub fn is_podium(&self) -> bool {
        self.placement <= 3
    }

    /// Upper half of the field, `p <= N / 2` with integer division.
    pub fn is_top_half(&self) -> bool {
        self.field_size > 0 && self.placement <= self.field_size / 2
    }
}

/// Placement count breakdown.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlacementSummary {
    pub fencer: String,
    pub competitions: u32,
    pub best: Option<u32>,
    pub mean_placement: f64,
    pub titles: u32,
    pub podiums: u32,
    pub top_8: u32,
    pub top_half: u32,
    pub mean_percentile: f64,
}
