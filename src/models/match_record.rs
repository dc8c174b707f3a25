//! Match record model: one bout between two fencers.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{MatchId, RecordId};

/// Competition type tag ("CN / CdF" in the source spreadsheet).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CompetitionType {
    /// Circuit national (CN)
    NationalCircuit,
    /// Championnat de France (CdF)
    NationalChampionship,
    Other,
}

impl CompetitionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CompetitionType::NationalCircuit => "national-circuit",
            CompetitionType::NationalChampionship => "national-championship",
            CompetitionType::Other => "other",
        }
    }

    fn parse_known(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "cn" | "national-circuit" => Some(CompetitionType::NationalCircuit),
            "cdf" | "national-championship" => Some(CompetitionType::NationalChampionship),
            "other" => Some(CompetitionType::Other),
            _ => None,
        }
    }
}

impl From<String> for CompetitionType {
    /// Lenient conversion for stored data: unknown tags become `Other`.
    fn from(s: String) -> Self {
        Self::parse_known(&s).unwrap_or(CompetitionType::Other)
    }
}

impl From<CompetitionType> for String {
    fn from(t: CompetitionType) -> Self {
        t.as_str().to_string()
    }
}

impl FromStr for CompetitionType {
    type Err = String;

    /// Strict conversion for user input.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_known(s).ok_or_else(|| format!("unknown competition type: {}", s))
    }
}

impl fmt::Display for CompetitionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Phase class of a bout: round-robin pool or elimination bracket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PhaseClass {
    Pool,
    Bracket,
}

impl PhaseClass {
    /// Classify a phase label. A missing label belongs to neither class.
    pub fn classify(phase: Option<&str>, pool_marker: &str) -> Option<Self> {
        let phase = phase?;
        if phase.starts_with(pool_marker) {
            Some(PhaseClass::Pool)
        } else {
            Some(PhaseClass::Bracket)
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PhaseClass::Pool => "pool",
            PhaseClass::Bracket => "bracket",
        }
    }
}

impl FromStr for PhaseClass {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pool" | "poule" => Ok(PhaseClass::Pool),
            "bracket" | "tableau" => Ok(PhaseClass::Bracket),
            other => Err(format!("unknown phase class: {}", other)),
        }
    }
}

impl fmt::Display for PhaseClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Which side of the record a fencer occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    A,
    B,
}

/// A single bout between two fencers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    /// Competition date
    pub date: NaiveDate,

    /// Season code (e.g. 2024 for the 2023-2024 season)
    pub season: i32,

    /// Competition name
    pub competition: String,

    /// Competition type tag
    pub competition_type: CompetitionType,

    /// Age/gender category
    pub category: String,

    /// Phase label, e.g. "Poule 3" or "Tableau de 32"
    #[serde(default)]
    pub phase: Option<String>,

    /// Fencer on side A
    pub fencer_a: String,

    /// Fencer on side B
    pub fencer_b: String,

    /// Touches scored by side A
    #[serde(default)]
    pub touches_a: Option<u32>,

    /// Touches scored by side B
    #[serde(default)]
    pub touches_b: Option<u32>,

    /// Recorded winner name
    #[serde(default)]
    pub winner: Option<String>,
}

impl MatchRecord {
    /// Create a bare record; phase, touches and winner are set with builders.
    pub fn new(
        date: NaiveDate,
        season: i32,
        competition: String,
        category: String,
        fencer_a: String,
        fencer_b: String,
    ) -> Self {
        Self {
            date,
            season,
            competition,
            competition_type: CompetitionType::Other,
            category,
            phase: None,
            fencer_a,
            fencer_b,
            touches_a: None,
            touches_b: None,
            winner: None,
        }
    }

    pub fn with_competition_type(mut self, competition_type: CompetitionType) -> Self {
        self.competition_type = competition_type;
        self
    }

    pub fn with_phase(mut self, phase: &str) -> Self {
        self.phase = Some(phase.to_string());
        self
    }

    /// Set both touch counts and record the side with more touches as winner.
    pub fn with_score(mut self, touches_a: u32, touches_b: u32) -> Self {
        self.touches_a = Some(touches_a);
        self.touches_b = Some(touches_b);
        self.winner = match touches_a.cmp(&touches_b) {
            std::cmp::Ordering::Greater => Some(self.fencer_a.clone()),
            std::cmp::Ordering::Less => Some(self.fencer_b.clone()),
            std::cmp::Ordering::Equal => None,
        };
        self
    }

    pub fn with_winner(mut self, winner: Option<&str>) -> Self {
        self.winner = winner.map(str::to_string);
        self
    }

    /// Content ID naming the row in rejection reports.
    pub fn id(&self) -> MatchId {
        RecordId::generate(&[
            &self.date.to_string(),
            &self.competition,
            &self.category,
            self.phase.as_deref().unwrap_or(""),
            &self.fencer_a,
            &self.fencer_b,
        ])
    }

    pub fn phase_class(&self, pool_marker: &str) -> Option<PhaseClass> {
        PhaseClass::classify(self.phase.as_deref(), pool_marker)
    }

    pub fn is_pool(&self, pool_marker: &str) -> bool {
        self.phase_class(pool_marker) == Some(PhaseClass::Pool)
    }

    pub fn is_bracket(&self, pool_marker: &str) -> bool {
        self.phase_class(pool_marker) == Some(PhaseClass::Bracket)
    }

    pub fn side_of(&self, fencer: &str) -> Option<Side> {
        if self.fencer_a == fencer {
            Some(Side::A)
        } else if self.fencer_b == fencer {
            Some(Side::B)
        } else {
            None
        }
    }

    pub fn involves(&self, fencer: &str) -> bool {
        self.side_of(fencer).is_some()
    }

    /// True when the two sides are exactly {x, y}, in either order.
    pub fn is_between(&self, x: &str, y: &str) -> bool {
        (self.fencer_a == x && self.fencer_b == y) || (self.fencer_a == y && self.fencer_b == x)
    }
}
