use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::state::AppState;
use crate::api::{ApiError, Pagination, PaginationMeta};
use crate::calculate::{self, FilterOptions};
use crate::models::MatchRecord;
use crate::query::QueryFilters;

#[derive(Debug, Deserialize)]
pub struct PageParams {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

/// A match as displayed in the results table.
#[derive(Debug, Serialize)]
pub struct MatchRow {
    pub id: String,
    pub date: String,
    pub season: i32,
    pub competition: String,
    pub competition_type: String,
    pub category: String,
    pub phase: Option<String>,
    pub fencer_a: String,
    pub fencer_b: String,
    pub touches_a: Option<u32>,
    pub touches_b: Option<u32>,
    pub winner: Option<String>,
}

impl From<&MatchRecord> for MatchRow {
    fn from(m: &MatchRecord) -> Self {
        Self {
            id: m.id().to_string(),
            date: m.date.format("%Y-%m-%d").to_string(),
            season: m.season,
            competition: m.competition.clone(),
            competition_type: m.competition_type.to_string(),
            category: m.category.clone(),
            phase: m.phase.clone(),
            fencer_a: m.fencer_a.clone(),
            fencer_b: m.fencer_b.clone(),
            touches_a: m.touches_a,
            touches_b: m.touches_b,
            winner: m.winner.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MatchListResponse {
    pub matches: Vec<MatchRow>,
    pub pagination: PaginationMeta,
}

pub async fn options(State(state): State<AppState>) -> Json<FilterOptions> {
    Json(FilterOptions::from_matches(&state.dataset.matches))
}

pub async fn list_matches(
    State(state): State<AppState>,
    Query(page): Query<PageParams>,
    Query(filters): Query<QueryFilters>,
) -> Result<Json<MatchListResponse>, ApiError> {
    let ctx = filters.to_context()?;
    let subset = calculate::apply(&state.dataset.matches, &ctx, &state.engine.pool_marker);

    let pagination = Pagination::new(page.page, page.page_size);
    let meta = PaginationMeta::new(&pagination, subset.len() as u32);
    let matches = pagination
        .slice(&subset)
        .iter()
        .map(|m| MatchRow::from(*m))
        .collect();

    Ok(Json(MatchListResponse {
        matches,
        pagination: meta,
    }))
}

#[cfg(test)]
mod tests {
    use crate::api::routes::testing::{app, get_json};
    use axum::http::StatusCode;

    #[tokio::test]
    async fn test_options() {
        let (status, json) = get_json(app(), "/api/options").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["fencers"], serde_json::json!(["Alice", "Bea", "Chloe"]));
        assert_eq!(json["seasons"], serde_json::json!([2023, 2024]));
        assert_eq!(json["competition_types"], serde_json::json!(["national-circuit"]));
        assert_eq!(json["date_min"], "2022-11-04");
    }

    #[tokio::test]
    async fn test_list_filtered_matches() {
        let (status, json) = get_json(app(), "/api/matches?fencers=Alice&opponents=Bea&page_size=2").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["pagination"]["total_items"], 5);
        assert_eq!(json["pagination"]["total_pages"], 3);
        assert_eq!(json["matches"].as_array().unwrap().len(), 2);
        assert_eq!(json["matches"][0]["date"], "2022-11-04");
    }

    #[tokio::test]
    async fn test_list_bad_date() {
        let (status, json) = get_json(app(), "/api/matches?from=yesterday").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"]["code"], "BAD_REQUEST");
    }
}
