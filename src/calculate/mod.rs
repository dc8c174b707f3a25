//! Statistics calculation engine.
//!
//! Pure functions over the loaded match and ranking tables:
//! - Perspective normalization of bouts for one fencer
//! - Filtering by a [`FilterContext`](crate::models::FilterContext)
//! - Aggregates, rankings and leaderboards across the fencer population
//! - Head-to-head records, season trends and placement summaries
//!
//! Nothing here holds state between calls; identical inputs give identical
//! outputs.

pub mod aggregate;
pub mod filter;
pub mod head_to_head;
pub mod leaderboard;
pub mod perspective;
pub mod placements;
pub mod ranking;
pub mod report;
pub mod trend;

use thiserror::Error;

use crate::models::{MatchId, RejectedRow};

pub use aggregate::compute;
pub use filter::{apply, apply_rankings, FilterOptions};
pub use head_to_head::versus;
pub use leaderboard::leaderboard;
pub use perspective::{normalize, NormalizedMatch, NormalizedView, Outcome, Perspective};
pub use placements::{placement_history, placement_summary};
pub use ranking::{rank, standings, PopulationIndex};
pub use report::fencer_report;
pub use trend::{season_trend, trend};

/// Errors raised by the calculators.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CalcError {
    #[error("Invalid record {id}: {reason}")]
    InvalidRecord { id: MatchId, reason: String },

    #[error("Head-to-head needs two distinct fencers, got {0} twice")]
    SameFencer(String),
}

impl CalcError {
    /// The excluded-row entry for an invalid record.
    pub fn rejected_row(&self) -> Option<RejectedRow> {
        match self {
            CalcError::InvalidRecord { id, reason } => Some(RejectedRow {
                id: id.clone(),
                reason: reason.clone(),
            }),
            CalcError::SameFencer(_) => None,
        }
    }
}

/// `part / whole` as a percentage, 0 when `whole` is 0.
pub fn percentage(part: u32, whole: u32) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}

/// Arithmetic mean from a running sum, 0 when `count` is 0.
pub fn mean(sum: u64, count: u32) -> f64 {
    if count == 0 {
        0.0
    } else {
        sum as f64 / count as f64
    }
}
