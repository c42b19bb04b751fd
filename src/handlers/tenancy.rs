// src/handlers/tenancy.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

use crate::{
    common::error::ApiError,
    config::AppState,
    middleware::{auth::AuthenticatedUser, tenancy::MessContext},
    models::{
        auth::MeResponse,
        tenancy::{Mess, MessPatch, NewMess, Profile, ProfileUpdate},
    },
};

// GET /api/me
#[utoipa::path(
    get,
    path = "/api/me",
    tag = "Tenancy",
    responses(
        (status = 200, description = "Perfil do usuário e o mess atual (se houver)", body = MeResponse),
        (status = 401, description = "Não autorizado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_me(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<impl IntoResponse, ApiError> {
    let me = app_state.mess_service.me(&user).await?;
    Ok((StatusCode::OK, Json(me)))
}

// PUT /api/me
#[utoipa::path(
    put,
    path = "/api/me",
    tag = "Tenancy",
    request_body = ProfileUpdate,
    responses(
        (status = 200, description = "Perfil atualizado", body = Profile),
        (status = 422, description = "Dados inválidos")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_me(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<ProfileUpdate>,
) -> Result<impl IntoResponse, ApiError> {
    let profile = app_state.mess_service.update_me(&user, payload).await?;
    Ok((StatusCode::OK, Json(profile)))
}

// GET /api/messes
#[utoipa::path(
    get,
    path = "/api/messes",
    tag = "Tenancy",
    responses(
        (status = 200, description = "Messes disponíveis para entrar", body = Vec<Mess>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_available(
    State(app_state): State<AppState>,
    AuthenticatedUser(_user): AuthenticatedUser,
) -> Result<impl IntoResponse, ApiError> {
    let messes = app_state.mess_service.available().await?;
    Ok((StatusCode::OK, Json(messes)))
}

// POST /api/messes
#[utoipa::path(
    post,
    path = "/api/messes",
    tag = "Tenancy",
    request_body = NewMess,
    responses(
        (status = 201, description = "Mess criado; o criador vira admin", body = Mess),
        (status = 400, description = "Usuário já pertence a um mess"),
        (status = 422, description = "Dados inválidos")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_mess(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<NewMess>,
) -> Result<impl IntoResponse, ApiError> {
    let mess = app_state.mess_service.create(&user, payload).await?;
    Ok((StatusCode::CREATED, Json(mess)))
}

// POST /api/messes/{id}/join
#[utoipa::path(
    post,
    path = "/api/messes/{id}/join",
    tag = "Tenancy",
    params(("id" = Uuid, Path, description = "ID do mess")),
    responses(
        (status = 200, description = "Entrou no mess como membro", body = Profile),
        (status = 400, description = "Usuário já pertence a um mess"),
        (status = 404, description = "Mess não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn join_mess(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(mess_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let profile = app_state.mess_service.join(&user, mess_id).await?;
    Ok((StatusCode::OK, Json(profile)))
}

// GET /api/mess
#[utoipa::path(
    get,
    path = "/api/mess",
    tag = "Tenancy",
    responses(
        (status = 200, description = "Mess atual", body = Mess),
        (status = 404, description = "Usuário sem mess")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_current(
    State(app_state): State<AppState>,
    MessContext(scope): MessContext,
) -> Result<impl IntoResponse, ApiError> {
    let mess = app_state.mess_service.current(&scope).await?;
    Ok((StatusCode::OK, Json(mess)))
}

// PUT /api/mess
#[utoipa::path(
    put,
    path = "/api/mess",
    tag = "Tenancy",
    request_body = MessPatch,
    responses(
        (status = 200, description = "Mess atualizado", body = Mess),
        (status = 403, description = "Só admin")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_current(
    State(app_state): State<AppState>,
    MessContext(scope): MessContext,
    Json(payload): Json<MessPatch>,
) -> Result<impl IntoResponse, ApiError> {
    let mess = app_state.mess_service.update(&scope, payload).await?;
    Ok((StatusCode::OK, Json(mess)))
}
