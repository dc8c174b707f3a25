//! Perspective normalization.
//!
//! A match row is symmetric between its two sides. These functions re-express
//! it from one fencer's point of view as (scored, conceded, outcome).

use std::cmp::Ordering;

use serde::Serialize;
use tracing::{debug, warn};

use super::CalcError;
use crate::models::{MatchRecord, PhaseClass, RejectedRow, Side};

/// Result of a bout from one fencer's side.
///
/// The touch comparison decides the outcome; a tie or a missing touch count
/// leaves the bout undecided.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Win,
    Loss,
    Undecided,
}

/// A bout seen from one fencer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Perspective {
    pub scored: Option<u32>,
    pub conceded: Option<u32>,
    pub outcome: Outcome,
}

impl Perspective {
    pub fn won(&self) -> bool {
        self.outcome == Outcome::Win
    }
}

fn invalid(record: &MatchRecord, reason: String) -> CalcError {
    CalcError::InvalidRecord {
        id: record.id(),
        reason,
    }
}

/// Side favoured by the touch counts, if both are known and differ.
fn touch_leader(record: &MatchRecord) -> Option<Option<Side>> {
    let (a, b) = (record.touches_a?, record.touches_b?);
    Some(match a.cmp(&b) {
        Ordering::Greater => Some(Side::A),
        Ordering::Less => Some(Side::B),
        Ordering::Equal => None,
    })
}

/// Check the recorded winner against the sides and the touch counts.
pub fn check_winner(record: &MatchRecord) -> Result<(), CalcError> {
    let Some(winner) = record.winner.as_deref() else {
        return Ok(());
    };

    let winner_side = record
        .side_of(winner)
        .ok_or_else(|| invalid(record, format!("winner {} is neither fencer", winner)))?;

    match touch_leader(record) {
        Some(None) => Err(invalid(record, "winner recorded on a tied score".to_string())),
        Some(Some(side)) if side != winner_side => Err(invalid(
            record,
            format!("winner {} disagrees with the touch counts", winner),
        )),
        _ => Ok(()),
    }
}

/// Express `record` from `fencer`'s point of view.
pub fn normalize(record: &MatchRecord, fencer: &str) -> Result<Perspective, CalcError> {
    if record.fencer_a == record.fencer_b {
        return Err(invalid(record, format!("{} is on both sides", record.fencer_a)));
    }
    let side = record
        .side_of(fencer)
        .ok_or_else(|| invalid(record, format!("{} fenced on neither side", fencer)))?;
    check_winner(record)?;

    let (scored, conceded) = match side {
        Side::A => (record.touches_a, record.touches_b),
        Side::B => (record.touches_b, record.touches_a),
    };

    let outcome = match (scored, conceded) {
        (Some(s), Some(c)) => match s.cmp(&c) {
            Ordering::Greater => Outcome::Win,
            Ordering::Less => Outcome::Loss,
            Ordering::Equal => Outcome::Undecided,
        },
        _ => Outcome::Undecided,
    };

    Ok(Perspective {
        scored,
        conceded,
        outcome,
    })
}

/// A normalized bout carrying its source row and phase class.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalizedMatch<'a> {
    pub record: &'a MatchRecord,
    pub scored: Option<u32>,
    pub conceded: Option<u32>,
    pub outcome: Outcome,
    pub class: Option<PhaseClass>,
}

impl<'a> NormalizedMatch<'a> {
    pub fn new(record: &'a MatchRecord, perspective: Perspective, pool_marker: &str) -> Self {
        Self {
            record,
            scored: perspective.scored,
            conceded: perspective.conceded,
            outcome: perspective.outcome,
            class: record.phase_class(pool_marker),
        }
    }
}

/// Every bout of one fencer in a subset, normalized once.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedView<'a> {
    pub fencer: String,
    pub rows: Vec<NormalizedMatch<'a>>,
    /// Rows of the fencer that broke a record invariant
    pub rejected: Vec<RejectedRow>,
}

impl<'a> NormalizedView<'a> {
    /// Normalize the rows of `subset` that involve `fencer`; other rows are skipped.
    pub fn build<I>(subset: I, fencer: &str, pool_marker: &str) -> Self
    where
        I: IntoIterator<Item = &'a MatchRecord>,
    {
        let mut rows = Vec::new();
        let mut rejected = Vec::new();

        for record in subset.into_iter().filter(|r| r.involves(fencer)) {
            match normalize(record, fencer) {
                Ok(p) => rows.push(NormalizedMatch::new(record, p, pool_marker)),
                Err(e) => {
                    warn!("Excluding row for {}: {}", fencer, e);
                    rejected.extend(e.rejected_row());
                }
            }
        }

        debug!(
            "Normalized {} rows for {} ({} rejected)",
            rows.len(),
            fencer,
            rejected.len()
        );

        Self {
            fencer: fencer.to_string(),
            rows,
            rejected,
        }
    }

    /// Rows of one phase class.
    pub fn of_class(&self, class: PhaseClass) -> Vec<NormalizedMatch<'a>> {
        self.rows
            .iter()
            .filter(|r| r.class == Some(class))
            .copied()
            .collect()
    }
}
