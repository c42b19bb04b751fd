// src/handlers/members.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

use crate::{
    common::error::ApiError,
    config::AppState,
    middleware::tenancy::MessContext,
    models::tenancy::{MemberFilter, MemberPatch, Profile},
};

#[utoipa::path(
    get,
    path = "/api/members",
    tag = "Members",
    params(MemberFilter),
    responses((status = 200, description = "Membros do mess", body = Vec<Profile>)),
    security(("api_jwt" = []))
)]
pub async fn list_members(
    State(app_state): State<AppState>,
    MessContext(scope): MessContext,
    Query(filter): Query<MemberFilter>,
) -> Result<impl IntoResponse, ApiError> {
    let members = app_state.member_service.list(&scope, &filter).await?;
    Ok((StatusCode::OK, Json(members)))
}

#[utoipa::path(
    put,
    path = "/api/members/{id}",
    tag = "Members",
    params(("id" = Uuid, Path, description = "ID do perfil")),
    request_body = MemberPatch,
    responses(
        (status = 200, description = "Membro atualizado", body = Profile),
        (status = 403, description = "Cargo insuficiente"),
        (status = 404, description = "Membro não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_member(
    State(app_state): State<AppState>,
    MessContext(scope): MessContext,
    Path(member_id): Path<Uuid>,
    Json(payload): Json<MemberPatch>,
) -> Result<impl IntoResponse, ApiError> {
    let member = app_state.member_service.update(&scope, member_id, payload).await?;
    Ok((StatusCode::OK, Json(member)))
}

#[utoipa::path(
    delete,
    path = "/api/members/{id}",
    tag = "Members",
    params(("id" = Uuid, Path, description = "ID do perfil")),
    responses(
        (status = 204, description = "Membro removido do mess"),
        (status = 400, description = "O mess ficaria sem admin"),
        (status = 403, description = "Só admin")
    ),
    security(("api_jwt" = []))
)]
pub async fn remove_member(
    State(app_state): State<AppState>,
    MessContext(scope): MessContext,
    Path(member_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    app_state.member_service.remove(&scope, member_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
