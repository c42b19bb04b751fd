// src/handlers/menu.rs

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
    models::menu::{DayMenu, MenuFilter, MenuItem, MenuPatch, NewMenuItem},
};

#[utoipa::path(
    get,
    path = "/api/menu",
    tag = "Menu",
    params(MenuFilter),
    responses((status = 200, description = "Pratos do cardápio", body = Vec<MenuItem>)),
    security(("api_jwt" = []))
)]
pub async fn list_dishes(
    State(app_state): State<AppState>,
    MessContext(scope): MessContext,
    Query(filter): Query<MenuFilter>,
) -> Result<impl IntoResponse, ApiError> {
    let dishes = app_state.menu_service.list(&scope, &filter).await?;
    Ok((StatusCode::OK, Json(dishes)))
}

#[utoipa::path(
    post,
    path = "/api/menu",
    tag = "Menu",
    request_body = NewMenuItem,
    responses(
        (status = 201, description = "Prato cadastrado", body = MenuItem),
        (status = 422, description = "Dia da semana fora de 0..6")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_dish(
    State(app_state): State<AppState>,
    MessContext(scope): MessContext,
    Json(payload): Json<NewMenuItem>,
) -> Result<impl IntoResponse, ApiError> {
    let dish = app_state.menu_service.create(&scope, payload).await?;
    Ok((StatusCode::CREATED, Json(dish)))
}

#[utoipa::path(
    get,
    path = "/api/menu/weekly",
    tag = "Menu",
    responses((status = 200, description = "Sete dias, domingo primeiro, só pratos ativos", body = Vec<DayMenu>)),
    security(("api_jwt" = []))
)]
pub async fn get_weekly(
    State(app_state): State<AppState>,
    MessContext(scope): MessContext,
) -> Result<impl IntoResponse, ApiError> {
    let week = app_state.menu_service.weekly(&scope).await?;
    Ok((StatusCode::OK, Json(week)))
}

#[utoipa::path(
    get,
    path = "/api/menu/{id}",
    tag = "Menu",
    params(("id" = Uuid, Path, description = "ID do prato")),
    responses(
        (status = 200, description = "Prato", body = MenuItem),
        (status = 404, description = "Não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_dish(
    State(app_state): State<AppState>,
    MessContext(scope): MessContext,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let dish = app_state.menu_service.get(&scope, id).await?;
    Ok((StatusCode::OK, Json(dish)))
}

#[utoipa::path(
    put,
    path = "/api/menu/{id}",
    tag = "Menu",
    params(("id" = Uuid, Path, description = "ID do prato")),
    request_body = MenuPatch,
    responses(
        (status = 200, description = "Prato atualizado", body = MenuItem),
        (status = 404, description = "Não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_dish(
    State(app_state): State<AppState>,
    MessContext(scope): MessContext,
    Path(id): Path<Uuid>,
    Json(payload): Json<MenuPatch>,
) -> Result<impl IntoResponse, ApiError> {
    let dish = app_state.menu_service.update(&scope, id, payload).await?;
    Ok((StatusCode::OK, Json(dish)))
}

#[utoipa::path(
    delete,
    path = "/api/menu/{id}",
    tag = "Menu",
    params(("id" = Uuid, Path, description = "ID do prato")),
    responses(
        (status = 204, description = "Prato removido"),
        (status = 404, description = "Não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_dish(
    State(app_state): State<AppState>,
    MessContext(scope): MessContext,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    app_state.menu_service.delete(&scope, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
