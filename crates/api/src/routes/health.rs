use axum::extract::State;
use axum::Json;
use chrono::Utc;

use super::AppState;
use crate::utils::health::HealthReport;

pub async fn health(State(ctx): State<AppState>) -> Json<HealthReport> {
    Json(HealthReport::healthy(ctx.environment, Utc::now()))
}
