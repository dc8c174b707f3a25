//! Filter context: the predicate set of one query.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{CompetitionType, PhaseClass};

/// A multi-valued filter field.
///
/// `Any` is the "any value accepted" sentinel. An empty `OneOf` behaves like
/// `Any`: clearing every value in a multi-select means "no constraint".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Selection<T> {
    Any,
    OneOf(Vec<T>),
}

impl<T> Default for Selection<T> {
    fn default() -> Self {
        Selection::Any
    }
}

impl<T: PartialEq> Selection<T> {
    pub fn one_of(values: Vec<T>) -> Self {
        if values.is_empty() {
            Selection::Any
        } else {
            Selection::OneOf(values)
        }
    }

    pub fn is_any(&self) -> bool {
        match self {
            Selection::Any => true,
            Selection::OneOf(values) => values.is_empty(),
        }
    }

    pub fn accepts(&self, value: &T) -> bool {
        match self {
            Selection::Any => true,
            Selection::OneOf(values) => values.is_empty() || values.contains(value),
        }
    }

    /// True when any of the given values is accepted (disjunction).
    pub fn accepts_any<'a, I>(&self, values: I) -> bool
    where
        I: IntoIterator<Item = &'a T>,
        T: 'a,
    {
        if self.is_any() {
            return true;
        }
        values.into_iter().any(|v| self.accepts(v))
    }
}

fn strings<I, S>(values: I) -> Selection<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    Selection::one_of(values.into_iter().map(Into::into).collect())
}

/// Active predicate set for one query. `Default` is fully unconstrained.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterContext {
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub season_from: Option<i32>,
    pub season_to: Option<i32>,
    pub seasons: Selection<i32>,
    pub competitions: Selection<String>,
    pub competition_types: Selection<CompetitionType>,
    pub categories: Selection<String>,
    /// Exact phase labels
    pub phases: Selection<String>,
    pub phase_class: Option<PhaseClass>,
    /// Matches where any selected fencer is on either side
    pub fencers: Selection<String>,
    /// Matches where any selected opponent is on either side
    pub opponents: Selection<String>,
    pub winners: Selection<String>,
}

impl FilterContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_date_range(mut self, from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        self.date_from = from;
        self.date_to = to;
        self
    }

    pub fn with_season_range(mut self, from: Option<i32>, to: Option<i32>) -> Self {
        self.season_from = from;
        self.season_to = to;
        self
    }

    pub fn with_seasons(mut self, seasons: Vec<i32>) -> Self {
        self.seasons = Selection::one_of(seasons);
        self
    }

    pub fn with_competitions<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.competitions = strings(values);
        self
    }

    pub fn with_competition_types(mut self, types: Vec<CompetitionType>) -> Self {
        self.competition_types = Selection::one_of(types);
        self
    }

    pub fn with_categories<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.categories = strings(values);
        self
    }

    pub fn with_phases<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.phases = strings(values);
        self
    }

    pub fn with_phase_class(mut self, class: Option<PhaseClass>) -> Self {
        self.phase_class = class;
        self
    }

    pub fn with_fencers<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fencers = strings(values);
        self
    }

    pub fn with_opponents<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.opponents = strings(values);
        self
    }

    pub fn with_winners<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.winners = strings(values);
        self
    }

    /// Inclusive date bounds check.
    pub fn date_in_range(&self, date: NaiveDate) -> bool {
        self.date_from.map_or(true, |from| date >= from) && self.date_to.map_or(true, |to| date <= to)
    }

    /// Inclusive season bounds check, plus the explicit season selection.
    pub fn season_in_range(&self, season: i32) -> bool {
        self.season_from.map_or(true, |from| season >= from)
            && self.season_to.map_or(true, |to| season <= to)
            && self.seasons.accepts(&season)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selection_any_and_empty() {
        let any: Selection<String> = Selection::Any;
        assert!(any.accepts(&"x".to_string()));
        let empty: Selection<String> = Selection::OneOf(vec![]);
        assert!(empty.is_any());
        assert!(empty.accepts(&"x".to_string()));
        assert_eq!(Selection::<i32>::one_of(vec![]), Selection::Any);
    }

    #[test]
    fn test_selection_one_of() {
        let sel = Selection::one_of(vec![2023, 2024]);
        assert!(sel.accepts(&2024));
        assert!(!sel.accepts(&2022));
        assert!(sel.accepts_any(&[2019, 2023]));
        assert!(!sel.accepts_any(&[2019, 2020]));
    }

    #[test]
    fn test_ranges_inclusive() {
        let d = |m, day| NaiveDate::from_ymd_opt(2024, m, day).unwrap();
        let ctx = FilterContext::new()
            .with_date_range(Some(d(1, 1)), Some(d(1, 31)))
            .with_season_range(Some(2023), Some(2024));
        assert!(ctx.date_in_range(d(1, 1)));
        assert!(ctx.date_in_range(d(1, 31)));
        assert!(!ctx.date_in_range(d(2, 1)));
        assert!(ctx.season_in_range(2023));
        assert!(ctx.season_in_range(2024));
        assert!(!ctx.season_in_range(2025));
    }

    #[test]
    fn test_default_is_unconstrained() {
        let ctx = FilterContext::default();
        assert!(ctx.fencers.is_any());
        assert!(ctx.phase_class.is_none());
        assert!(ctx.season_in_range(1990));
    }
}
