//! Rankable metrics and their sort direction.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::AggregateResult;

/// Whether larger metric values rank better.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    HigherBetter,
    LowerBetter,
}

/// A metric of the aggregate bundle that fencers can be ranked on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    WinPct,
    MeanScored,
    MeanConceded,
    MeanConcededOnWin,
    MeanScoredOnLoss,
    Wins,
    Matches,
}

impl Metric {
    pub const ALL: [Metric; 7] = [
        Metric::WinPct,
        Metric::MeanScored,
        Metric::MeanConceded,
        Metric::MeanConcededOnWin,
        Metric::MeanScoredOnLoss,
        Metric::Wins,
        Metric::Matches,
    ];

    pub fn direction(&self) -> Direction {
        match self {
            Metric::MeanConceded | Metric::MeanConcededOnWin => Direction::LowerBetter,
            _ => Direction::HigherBetter,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Metric::WinPct => "win_pct",
            Metric::MeanScored => "mean_scored",
            Metric::MeanConceded => "mean_conceded",
            Metric::MeanConcededOnWin => "mean_conceded_on_win",
            Metric::MeanScoredOnLoss => "mean_scored_on_loss",
            Metric::Wins => "wins",
            Metric::Matches => "matches",
        }
    }

    /// Read this metric out of an aggregate bundle.
    pub fn value(&self, stats: &AggregateResult) -> f64 {
        match self {
            Metric::WinPct => stats.win_pct,
            Metric::MeanScored => stats.mean_scored,
            Metric::MeanConceded => stats.mean_conceded,
            Metric::MeanConcededOnWin => stats.mean_conceded_on_win,
            Metric::MeanScoredOnLoss => stats.mean_scored_on_loss,
            Metric::Wins => stats.wins as f64,
            Metric::Matches => stats.matches as f64,
        }
    }

    /// Ordering that puts the better value first.
    pub fn best_first(&self, a: f64, b: f64) -> Ordering {
        match self.direction() {
            Direction::HigherBetter => b.total_cmp(&a),
            Direction::LowerBetter => a.total_cmp(&b),
        }
    }
}

impl FromStr for Metric {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase().replace('-', "_");
        Metric::ALL
            .iter()
            .copied()
            .find(|m| m.as_str() == wanted)
            .ok_or_else(|| format!("unknown metric: {}", s))
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directions() {
        assert_eq!(Metric::WinPct.direction(), Direction::HigherBetter);
        assert_eq!(Metric::MeanScoredOnLoss.direction(), Direction::HigherBetter);
        assert_eq!(Metric::MeanConceded.direction(), Direction::LowerBetter);
        assert_eq!(Metric::MeanConcededOnWin.direction(), Direction::LowerBetter);
    }

    #[test]
    fn test_best_first() {
        assert_eq!(Metric::WinPct.best_first(70.0, 50.0), Ordering::Less);
        assert_eq!(Metric::MeanConceded.best_first(2.0, 3.5), Ordering::Less);
        assert_eq!(Metric::Wins.best_first(4.0, 4.0), Ordering::Equal);
    }

    #[test]
    fn test_parse() {
        assert_eq!("win_pct".parse::<Metric>(), Ok(Metric::WinPct));
        assert_eq!("Mean-Conceded-On-Win".parse::<Metric>(), Ok(Metric::MeanConcededOnWin));
        assert!("elo".parse::<Metric>().is_err());
    }

    #[test]
    fn test_names_round_trip_through_serde() {
        for m in Metric::ALL {
            let json = serde_json::to_string(&m).unwrap();
            assert_eq!(json, format!("\"{}\"", m.as_str()));
        }
    }
}
