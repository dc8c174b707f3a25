use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::state::AppState;
use crate::api::{parse_metric, ApiError};
use crate::calculate;
use crate::models::{Leaderboard, Metric, PhaseClass, Standing};
use crate::query::QueryFilters;

#[derive(Debug, Deserialize)]
pub struct RankingParams {
    pub metric: Option<String>,
    pub phase: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RankingsResponse {
    pub metric: Metric,
    pub phase: PhaseClass,
    pub min_matches: u32,
    pub standings: Vec<Standing>,
}

#[derive(Debug, Deserialize)]
pub struct LeaderboardParams {
    pub metric: Option<String>,
    pub fencer: Option<String>,
}

pub async fn rankings(
    State(state): State<AppState>,
    Query(params): Query<RankingParams>,
    Query(filters): Query<QueryFilters>,
) -> Result<Json<RankingsResponse>, ApiError> {
    let metric = parse_metric(params.metric.as_deref())?;
    let phase = match params.phase.as_deref() {
        None | Some("") => PhaseClass::Pool,
        Some(s) => s.parse().map_err(ApiError::BadRequest)?,
    };
    let ctx = filters.to_context()?;

    let standings = calculate::standings(&state.dataset.matches, &ctx, phase, metric, &state.engine);
    Ok(Json(RankingsResponse {
        metric,
        phase,
        min_matches: state.engine.min_matches_for(phase),
        standings,
    }))
}

pub async fn leaderboard(
    State(state): State<AppState>,
    Query(params): Query<LeaderboardParams>,
    Query(filters): Query<QueryFilters>,
) -> Result<Json<Leaderboard>, ApiError> {
    let metric = parse_metric(params.metric.as_deref())?;
    let ctx = filters.to_context()?;

    Ok(Json(calculate::leaderboard(
        &state.dataset.matches,
        &ctx,
        metric,
        params.fencer.as_deref(),
        &state.engine,
    )))
}

#[cfg(test)]
mod tests {
    use crate::api::routes::testing::{app, get_json};
    use axum::http::StatusCode;

    #[tokio::test]
    async fn test_pool_rankings() {
        let (status, json) = get_json(app(), "/api/rankings?metric=win_pct&phase=pool").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["min_matches"], 5);
        let standings = json["standings"].as_array().unwrap();
        assert_eq!(standings.len(), 2);
        assert_eq!(standings[0]["fencer"], "Bea");
        assert_eq!(standings[1]["fencer"], "Chloe");
        assert_eq!(standings[1]["position"]["position"], 2);
    }

    #[tokio::test]
    async fn test_bracket_rankings_lower_is_better() {
        let (status, json) =
            get_json(app(), "/api/rankings?metric=mean_conceded&phase=bracket").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["phase"], "bracket");
        // Alice concedes (12 + 15 + 9) / 3 = 12, Bea (15 + 13 + 15) / 3
        assert_eq!(json["standings"][0]["fencer"], "Alice");
        assert_eq!(json["standings"][0]["value"], 12.0);
    }

    #[tokio::test]
    async fn test_rankings_bad_metric() {
        let (status, _) = get_json(app(), "/api/rankings?metric=elo").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = get_json(app(), "/api/rankings?phase=final").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_leaderboard_selected_fencer() {
        let (status, json) = get_json(app(), "/api/leaderboard?metric=matches&fencer=Bea").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["rows"].as_array().unwrap().len(), 1);
        assert_eq!(json["selected"]["position"]["position"], 1);
        assert_eq!(json["selected"]["value"], 10.0);
    }

    #[tokio::test]
    async fn test_leaderboard_ineligible_fencer() {
        let (status, json) = get_json(app(), "/api/leaderboard?fencer=Alice").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["selected"]["position"]["position"], 0);
        assert_eq!(json["selected"]["value"], serde_json::Value::Null);
    }
}
