//! Competition ranking model: a fencer's final placement.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{CompetitionType, RankingId, RecordId};

/// A fencer's final placement at one competition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingRecord {
    pub date: NaiveDate,
    pub season: i32,

    /// Competitor name
    pub fencer: String,

    pub competition: String,
    pub category: String,
    pub competition_type: CompetitionType,

    /// Final placement (1 = winner)
    pub placement: u32,
}

impl RankingRecord {
    pub fn new(
        date: NaiveDate,
        season: i32,
        fencer: String,
        competition: String,
        category: String,
        placement: u32,
    ) -> Self {
        Self {
            date,
            season,
            fencer,
            competition,
            category,
            competition_type: CompetitionType::Other,
            placement,
        }
    }

    pub fn with_competition_type(mut self, competition_type: CompetitionType) -> Self {
        self.competition_type = competition_type;
        self
    }

    /// Content ID; one placement per fencer and competition.
    pub fn id(&self) -> RankingId {
        RecordId::generate(&[
            &self.date.to_string(),
            &self.competition,
            &self.category,
            &self.fencer,
        ])
    }

    /// Key of the (date, competition, category) group this placement belongs to.
    pub fn group_key(&self) -> (NaiveDate, &str, &str) {
        (self.date, &self.competition, &self.category)
    }
}
