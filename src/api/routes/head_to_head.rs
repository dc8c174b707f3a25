use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;

use crate::api::state::AppState;
use crate::api::{require_fencer, ApiError};
use crate::calculate;
use crate::models::HeadToHeadResult;
use crate::query::QueryFilters;

#[derive(Debug, Deserialize)]
pub struct PairParams {
    pub x: Option<String>,
    pub y: Option<String>,
}

pub async fn head_to_head(
    State(state): State<AppState>,
    Query(pair): Query<PairParams>,
    Query(filters): Query<QueryFilters>,
) -> Result<Json<HeadToHeadResult>, ApiError> {
    let (x, y) = match (pair.x, pair.y) {
        (Some(x), Some(y)) => (x, y),
        _ => return Err(ApiError::BadRequest("both x and y are required".to_string())),
    };
    require_fencer(&state, &x)?;
    require_fencer(&state, &y)?;
    let ctx = filters.to_context()?;

    let result = calculate::versus(&state.dataset.matches, &x, &y, &ctx, &state.engine.pool_marker)?;
    Ok(Json(result))
}

#[cfg(test)]
mod tests {
    use crate::api::routes::testing::{app, get_json};
    use axum::http::StatusCode;

    #[tokio::test]
    async fn test_head_to_head() {
        let (status, json) = get_json(app(), "/api/head-to-head?x=Alice&y=Bea").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["bouts"], 5);
        assert_eq!(json["wins_x"], 3);
        assert_eq!(json["wins_y"], 2);
        assert_eq!(json["pct_x"], 60.0);
        assert_eq!(json["bracket"]["wins_x"], 2);
    }

    #[tokio::test]
    async fn test_head_to_head_with_filters() {
        let (status, json) = get_json(app(), "/api/head-to-head?x=Bea&y=Alice&seasons=2023").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["bouts"], 2);
        assert_eq!(json["pool"]["wins_x"], 1);
    }

    #[tokio::test]
    async fn test_head_to_head_errors() {
        let (status, _) = get_json(app(), "/api/head-to-head?x=Alice").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = get_json(app(), "/api/head-to-head?x=Alice&y=Alice").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = get_json(app(), "/api/head-to-head?x=Alice&y=Zoe").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
