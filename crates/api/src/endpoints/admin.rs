//! Admin endpoints.

use axum::{Json, Router, extract::State, routing::post};
use schoolboard_common::AppResult;
use serde::{Deserialize, Serialize};

use crate::{extractors::QueryParams, middleware::AppState};

#[derive(Debug, Deserialize)]
pub struct CheckQuery {
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct AccessResponse {
    pub access: bool,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/check", post(check))
}

/// Check the admin passphrase.
async fn check(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<CheckQuery>,
) -> AppResult<Json<AccessResponse>> {
    state.admin_gate.check(&query.password)?;
    Ok(Json(AccessResponse { access: true }))
}
