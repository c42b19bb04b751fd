// src/handlers/inventory.rs

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
    models::inventory::{InventoryFilter, InventoryItem, InventoryOverview, InventoryPatch, NewInventoryItem},
};

#[utoipa::path(
    get,
    path = "/api/inventory",
    tag = "Inventory",
    params(InventoryFilter),
    responses((status = 200, description = "Itens de estoque, por nome", body = Vec<InventoryItem>)),
    security(("api_jwt" = []))
)]
pub async fn list_items(
    State(app_state): State<AppState>,
    MessContext(scope): MessContext,
    Query(filter): Query<InventoryFilter>,
) -> Result<impl IntoResponse, ApiError> {
    let items = app_state.inventory_service.list(&scope, &filter).await?;
    Ok((StatusCode::OK, Json(items)))
}

#[utoipa::path(
    post,
    path = "/api/inventory",
    tag = "Inventory",
    request_body = NewInventoryItem,
    responses(
        (status = 201, description = "Item cadastrado", body = InventoryItem),
        (status = 403, description = "Exige gerente"),
        (status = 422, description = "Dados inválidos")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_item(
    State(app_state): State<AppState>,
    MessContext(scope): MessContext,
    Json(payload): Json<NewInventoryItem>,
) -> Result<impl IntoResponse, ApiError> {
    let item = app_state.inventory_service.create(&scope, payload).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

#[utoipa::path(
    get,
    path = "/api/inventory/overview",
    tag = "Inventory",
    responses((status = 200, description = "Alertas de estoque, valor total e contagem por categoria", body = InventoryOverview)),
    security(("api_jwt" = []))
)]
pub async fn get_overview(
    State(app_state): State<AppState>,
    MessContext(scope): MessContext,
) -> Result<impl IntoResponse, ApiError> {
    let overview = app_state.inventory_service.overview(&scope).await?;
    Ok((StatusCode::OK, Json(overview)))
}

#[utoipa::path(
    get,
    path = "/api/inventory/{id}",
    tag = "Inventory",
    params(("id" = Uuid, Path, description = "ID do item")),
    responses(
        (status = 200, description = "Item", body = InventoryItem),
        (status = 404, description = "Não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_item(
    State(app_state): State<AppState>,
    MessContext(scope): MessContext,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let item = app_state.inventory_service.get(&scope, id).await?;
    Ok((StatusCode::OK, Json(item)))
}

#[utoipa::path(
    put,
    path = "/api/inventory/{id}",
    tag = "Inventory",
    params(("id" = Uuid, Path, description = "ID do item")),
    request_body = InventoryPatch,
    responses(
        (status = 200, description = "Item atualizado", body = InventoryItem),
        (status = 400, description = "Estoque negativo"),
        (status = 404, description = "Não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_item(
    State(app_state): State<AppState>,
    MessContext(scope): MessContext,
    Path(id): Path<Uuid>,
    Json(payload): Json<InventoryPatch>,
) -> Result<impl IntoResponse, ApiError> {
    let item = app_state.inventory_service.update(&scope, id, payload).await?;
    Ok((StatusCode::OK, Json(item)))
}

#[utoipa::path(
    delete,
    path = "/api/inventory/{id}",
    tag = "Inventory",
    params(("id" = Uuid, Path, description = "ID do item")),
    responses(
        (status = 204, description = "Item removido"),
        (status = 404, description = "Não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_item(
    State(app_state): State<AppState>,
    MessContext(scope): MessContext,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    app_state.inventory_service.delete(&scope, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
