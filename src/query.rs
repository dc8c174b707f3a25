//! Filter parameters shared by the CLI and the HTTP API.
//!
//! Lists are comma-separated (`--fencers "Alice,Bea"` or `?fencers=Alice,Bea`).

use chrono::NaiveDate;
use clap::Args;
use serde::Deserialize;
use thiserror::Error;

use crate::models::{CompetitionType, FilterContext, PhaseClass};
use crate::parse_list;

/// Errors raised while turning raw parameters into a filter context.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum QueryError {
    #[error("Invalid date '{0}' (expected YYYY-MM-DD)")]
    InvalidDate(String),

    #[error("Invalid season '{0}'")]
    InvalidSeason(String),

    #[error("{0}")]
    InvalidValue(String),
}

/// Raw filter parameters.
#[derive(Debug, Clone, Default, Args, Deserialize)]
pub struct QueryFilters {
    /// First date included (YYYY-MM-DD)
    #[arg(long)]
    pub from: Option<String>,

    /// Last date included (YYYY-MM-DD)
    #[arg(long)]
    pub to: Option<String>,

    /// First season included
    #[arg(long)]
    pub season_from: Option<i32>,

    /// Last season included
    #[arg(long)]
    pub season_to: Option<i32>,

    /// Seasons to keep
    #[arg(long)]
    pub seasons: Option<String>,

    /// Competition names to keep
    #[arg(long)]
    pub competitions: Option<String>,

    /// Competition types to keep (national-circuit, national-championship, other)
    #[arg(long)]
    pub types: Option<String>,

    /// Categories to keep
    #[arg(long)]
    pub categories: Option<String>,

    /// Exact phase labels to keep
    #[arg(long)]
    pub phases: Option<String>,

    /// Keep only pool or bracket bouts
    #[arg(long)]
    pub phase_class: Option<String>,

    /// Keep bouts involving any of these fencers
    #[arg(long)]
    pub fencers: Option<String>,

    /// Keep bouts involving any of these opponents
    #[arg(long)]
    pub opponents: Option<String>,

    /// Keep bouts won by any of these fencers
    #[arg(long)]
    pub winners: Option<String>,
}

impl QueryFilters {
    /// Validate the parameters and build the filter context.
    pub fn to_context(&self) -> Result<FilterContext, QueryError> {
        let mut ctx = FilterContext::new()
            .with_date_range(parse_date(&self.from)?, parse_date(&self.to)?)
            .with_season_range(self.season_from, self.season_to);

        if let Some(ref raw) = self.seasons {
            let seasons = parse_list(raw)
                .iter()
                .map(|s| s.parse::<i32>().map_err(|_| QueryError::InvalidSeason(s.clone())))
                .collect::<Result<Vec<_>, _>>()?;
            ctx = ctx.with_seasons(seasons);
        }
        if let Some(ref raw) = self.types {
            let types = parse_list(raw)
                .iter()
                .map(|s| s.parse::<CompetitionType>().map_err(QueryError::InvalidValue))
                .collect::<Result<Vec<_>, _>>()?;
            ctx = ctx.with_competition_types(types);
        }
        if let Some(ref raw) = self.phase_class {
            let class = raw.parse::<PhaseClass>().map_err(QueryError::InvalidValue)?;
            ctx = ctx.with_phase_class(Some(class));
        }

        if let Some(ref raw) = self.competitions {
            ctx = ctx.with_competitions(parse_list(raw));
        }
        if let Some(ref raw) = self.categories {
            ctx = ctx.with_categories(parse_list(raw));
        }
        if let Some(ref raw) = self.phases {
            ctx = ctx.with_phases(parse_list(raw));
        }
        if let Some(ref raw) = self.fencers {
            ctx = ctx.with_fencers(parse_list(raw));
        }
        if let Some(ref raw) = self.opponents {
            ctx = ctx.with_opponents(parse_list(raw));
        }
        if let Some(ref raw) = self.winners {
            ctx = ctx.with_winners(parse_list(raw));
        }

        Ok(ctx)
    }
}

fn parse_date(raw: &Option<String>) -> Result<Option<NaiveDate>, QueryError> {
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| QueryError::InvalidDate(s.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Selection;

    #[test]
    fn test_empty_filters_are_unconstrained() {
        let ctx = QueryFilters::default().to_context().unwrap();
        assert_eq!(ctx, FilterContext::default());
    }

    #[test]
    fn test_full_context() {
        let filters = QueryFilters {
            from: Some("2023-09-01".to_string()),
            season_to: Some(2024),
            seasons: Some("2023, 2024".to_string()),
            types: Some("CN,national-championship".to_string()),
            phase_class: Some("pool".to_string()),
            fencers: Some("Alice,Bea".to_string()),
            ..Default::default()
        };
        let ctx = filters.to_context().unwrap();

        assert_eq!(ctx.date_from, NaiveDate::from_ymd_opt(2023, 9, 1));
        assert_eq!(ctx.date_to, None);
        assert_eq!(ctx.season_to, Some(2024));
        assert_eq!(ctx.seasons, Selection::OneOf(vec![2023, 2024]));
        assert_eq!(
            ctx.competition_types,
            Selection::OneOf(vec![
                CompetitionType::NationalCircuit,
                CompetitionType::NationalChampionship
            ])
        );
        assert_eq!(ctx.phase_class, Some(PhaseClass::Pool));
        assert!(ctx.fencers.accepts(&"Bea".to_string()));
        assert!(ctx.opponents.is_any());
    }

    #[test]
    fn test_invalid_values() {
        let bad_date = QueryFilters {
            to: Some("04/11/2023".to_string()),
            ..Default::default()
        };
        assert_eq!(
            bad_date.to_context().unwrap_err(),
            QueryError::InvalidDate("04/11/2023".to_string())
        );

        let bad_season = QueryFilters {
            seasons: Some("2024,next".to_string()),
            ..Default::default()
        };
        assert_eq!(
            bad_season.to_context().unwrap_err(),
            QueryError::InvalidSeason("next".to_string())
        );

        let bad_class = QueryFilters {
            phase_class: Some("final".to_string()),
            ..Default::default()
        };
        assert!(matches!(bad_class.to_context(), Err(QueryError::InvalidValue(_))));
    }
}
