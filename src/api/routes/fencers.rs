use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Serialize;

use crate::api::state::AppState;
use crate::api::{require_fencer, ApiError};
use crate::calculate;
use crate::models::{FencerReport, PlacementEntry, PlacementSummary, SeasonTrendPoint};
use crate::query::QueryFilters;

#[derive(Debug, Serialize)]
pub struct TrendResponse {
    pub fencer: String,
    pub seasons: Vec<SeasonTrendPoint>,
}

#[derive(Debug, Serialize)]
pub struct PlacementsResponse {
    pub summary: PlacementSummary,
    pub history: Vec<PlacementEntry>,
}

pub async fn report(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Query(filters): Query<QueryFilters>,
) -> Result<Json<FencerReport>, ApiError> {
    require_fencer(&state, &name)?;
    let ctx = filters.to_context()?;
    Ok(Json(calculate::fencer_report(
        &state.dataset.matches,
        &name,
        &ctx,
        &state.engine,
    )))
}

pub async fn trend(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Query(filters): Query<QueryFilters>,
) -> Result<Json<TrendResponse>, ApiError> {
    require_fencer(&state, &name)?;
    let ctx = filters.to_context()?;
    let seasons = calculate::trend(&state.dataset.matches, &name, &ctx, &state.engine.pool_marker);
    Ok(Json(TrendResponse {
        fencer: name,
        seasons,
    }))
}

pub async fn placements(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Query(filters): Query<QueryFilters>,
) -> Result<Json<PlacementsResponse>, ApiError> {
    require_fencer(&state, &name)?;
    let ctx = filters.to_context()?;
    let rankings = &state.dataset.rankings;
    Ok(Json(PlacementsResponse {
        summary: calculate::placement_summary(rankings, &name, &ctx),
        history: calculate::placement_history(rankings, &name, &ctx),
    }))
}

#[cfg(test)]
mod tests {
    use crate::api::routes::testing::{app, get_json};
    use axum::http::StatusCode;

    #[tokio::test]
    async fn test_report() {
        let (status, json) = get_json(app(), "/api/fencers/Bea/report").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["fencer"], "Bea");
        assert_eq!(json["overall"]["matches"], 10);
        assert_eq!(json["pool"]["wins"], 6);
        assert_eq!(json["bracket"]["wins"], 1);
        assert_eq!(json["pool"]["rank_by_metric"]["win_pct"]["position"], 1);
        assert_eq!(json["pool"]["rank_by_metric"]["win_pct"]["field_size"], 2);
    }

    #[tokio::test]
    async fn test_report_unknown_fencer() {
        let (status, json) = get_json(app(), "/api/fencers/Zoe/report").await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["error"]["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_trend() {
        let (status, json) = get_json(app(), "/api/fencers/Alice/trend").await;

        assert_eq!(status, StatusCode::OK);
        let seasons = json["seasons"].as_array().unwrap();
        assert_eq!(seasons.len(), 2);
        assert_eq!(seasons[0]["season"], 2023);
        assert_eq!(seasons[0]["pool_win_pct"], 50.0);
        assert_eq!(seasons[0]["bracket_win_pct"], serde_json::Value::Null);
        assert_eq!(seasons[1]["bracket_wins"], 2);
    }

    #[tokio::test]
    async fn test_placements() {
        let (status, json) = get_json(app(), "/api/fencers/Alice/placements?seasons=2024").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["summary"]["competitions"], 1);
        assert_eq!(json["summary"]["titles"], 1);
        assert_eq!(json["history"][0]["field_size"], 16);
    }
}
