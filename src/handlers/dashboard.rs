// src/handlers/dashboard.rs

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::Utc;

use crate::{
    common::error::ApiError,
    config::AppState,
    middleware::tenancy::MessContext,
    models::{
        activity::{Activity, ActivityQuery},
        dashboard::{DashboardStats, MessReport},
    },
};

// GET /api/dashboard
#[utoipa::path(
    get,
    path = "/api/dashboard",
    tag = "Dashboard",
    responses(
        (status = 200, description = "Cards do dashboard (growth = null quando o mês anterior não teve despesas)", body = DashboardStats),
        (status = 401, description = "Não autorizado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_dashboard(
    State(app_state): State<AppState>,
    MessContext(scope): MessContext,
) -> Result<impl IntoResponse, ApiError> {
    let today = Utc::now().date_naive();
    let stats = app_state.report_service.dashboard(&scope, today).await?;
    Ok((StatusCode::OK, Json(stats)))
}

// GET /api/reports
#[utoipa::path(
    get,
    path = "/api/reports",
    tag = "Dashboard",
    responses((status = 200, description = "Despesas por categoria e por mês, alertas e atividades recentes", body = MessReport)),
    security(("api_jwt" = []))
)]
pub async fn get_report(
    State(app_state): State<AppState>,
    MessContext(scope): MessContext,
) -> Result<impl IntoResponse, ApiError> {
    let report = app_state.report_service.report(&scope).await?;
    Ok((StatusCode::OK, Json(report)))
}

// GET /api/activities
#[utoipa::path(
    get,
    path = "/api/activities",
    tag = "Dashboard",
    params(ActivityQuery),
    responses((status = 200, description = "Log de atividades, mais recentes primeiro", body = Vec<Activity>)),
    security(("api_jwt" = []))
)]
pub async fn list_activities(
    State(app_state): State<AppState>,
    MessContext(scope): MessContext,
    Query(query): Query<ActivityQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let activities = app_state.activity_logger.recent(&scope, query.limit()).await?;
    Ok((StatusCode::OK, Json(activities)))
}
