//! Head-to-head calculator.
//!
//! Wins here come from the recorded winner rather than the touch comparison:
//! both participants are fixed, so a recorded winner is unambiguous.

use tracing::{debug, warn};

use super::{filter, mean, percentage, CalcError};
use crate::models::{
    FilterContext, HeadToHeadResult, MatchRecord, PairWins, PhaseClass, RejectedRow,
};

/// Mutual record of `x` and `y` over the context-filtered table.
pub fn versus(
    table: &[MatchRecord],
    x: &str,
    y: &str,
    ctx: &FilterContext,
    pool_marker: &str,
) -> Result<HeadToHeadResult, CalcError> {
    if x == y {
        return Err(CalcError::SameFencer(x.to_string()));
    }

    let mut result = HeadToHeadResult {
        fencer_x: x.to_string(),
        fencer_y: y.to_string(),
        ..Default::default()
    };

    let (mut loser_sum_x_wins, mut bracket_wins_x) = (0u64, 0u32);
    let (mut loser_sum_y_wins, mut bracket_wins_y) = (0u64, 0u32);

    let subset = filter::apply(table, ctx, pool_marker)
        .into_iter()
        .filter(|r| r.is_between(x, y));

    for record in subset {
        let winner = record.winner.as_deref();
        if let Some(w) = winner {
            if w != x && w != y {
                warn!("Excluding head-to-head row {}: winner {} is neither fencer", record.id(), w);
                result.rejected.push(RejectedRow {
                    id: record.id(),
                    reason: format!("winner {} is neither fencer", w),
                });
                continue;
            }
        }

        let (touches_x, touches_y) = if record.fencer_a == x {
            (record.touches_a, record.touches_b)
        } else {
            (record.touches_b, record.touches_a)
        };
        result.touches_x += touches_x.unwrap_or(0);
        result.touches_y += touches_y.unwrap_or(0);
        result.bouts += 1;

        let x_won = winner == Some(x);
        let y_won = winner == Some(y);
        if x_won {
            result.wins_x += 1;
        }
        if y_won {
            result.wins_y += 1;
        }

        let class = record.phase_class(pool_marker);
        let bucket = match class {
            Some(PhaseClass::Pool) => &mut result.pool,
            Some(PhaseClass::Bracket) => &mut result.bracket,
            None => continue,
        };
        bucket.bouts += 1;
        bucket.wins_x += x_won as u32;
        bucket.wins_y += y_won as u32;

        if class == Some(PhaseClass::Bracket) {
            if x_won {
                bracket_wins_x += 1;
                loser_sum_x_wins += touches_y.unwrap_or(0) as u64;
            } else if y_won {
                bracket_wins_y += 1;
                loser_sum_y_wins += touches_x.unwrap_or(0) as u64;
            }
        }
    }

    let decided = result.wins_x + result.wins_y;
    result.pct_x = percentage(result.wins_x, decided);
    result.pct_y = percentage(result.wins_y, decided);
    result.mean_loser_touches_when_x_wins = mean(loser_sum_x_wins, bracket_wins_x);
    result.mean_loser_touches_when_y_wins = mean(loser_sum_y_wins, bracket_wins_y);

    debug!("{} vs {}: {} bouts, {}-{}", x, y, result.bouts, result.wins_x, result.wins_y);
    Ok(result)
}

impl HeadToHeadResult {
    /// The same record seen from the other fencer.
    pub fn swapped(&self) -> Self {
        Self {
            fencer_x: self.fencer_y.clone(),
            fencer_y: self.fencer_x.clone(),
            bouts: self.bouts,
            wins_x: self.wins_y,
            wins_y: self.wins_x,
            pct_x: self.pct_y,
            pct_y: self.pct_x,
            pool: self.pool.swapped(),
            bracket: self.bracket.swapped(),
            touches_x: self.touches_y,
            touches_y: self.touches_x,
            mean_loser_touches_when_x_wins: self.mean_loser_touches_when_y_wins,
            mean_loser_touches_when_y_wins: self.mean_loser_touches_when_x_wins,
            rejected: self.rejected.clone(),
        }
    }
}
