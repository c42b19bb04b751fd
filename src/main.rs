//src/main.rs

use axum::{
    middleware as axum_middleware,
    routing::{get, post, put},
    Router,
};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod common;
mod config;
mod db;
mod docs;
mod handlers;
mod middleware;
mod models;
mod services;
#[cfg(test)]
mod test_utils;

use crate::config::{AppConfig, AppState};
use crate::docs::ApiDoc;
use crate::middleware::auth::auth_guard;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .compact()
        .init();

    let config = AppConfig::from_env()?;
    let app_state = AppState::new(&config).await?;

    // Faz o app rodar as migrações do SQLx na inicialização
    sqlx::migrate!().run(&app_state.db_pool).await?;
    tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

    // Sem mess: perfil e onboarding
    let onboarding_routes = Router::new()
        .route("/me", get(handlers::tenancy::get_me).put(handlers::tenancy::update_me))
        .route(
            "/messes",
            get(handlers::tenancy::list_available).post(handlers::tenancy::create_mess),
        )
        .route("/messes/{id}/join", post(handlers::tenancy::join_mess));

    // Com mess: o MessContext resolve o escopo em cada handler
    let mess_routes = Router::new()
        .route(
            "/mess",
            get(handlers::tenancy::get_current).put(handlers::tenancy::update_current),
        )
        .route("/members", get(handlers::members::list_members))
        .route(
            "/members/{id}",
            put(handlers::members::update_member).delete(handlers::members::remove_member),
        )
        .route(
            "/expenses",
            get(handlers::finance::list_expenses).post(handlers::finance::create_expense),
        )
        .route(
            "/expenses/{id}",
            get(handlers::finance::get_expense)
                .put(handlers::finance::update_expense)
                .delete(handlers::finance::delete_expense),
        )
        .route(
            "/payments",
            get(handlers::finance::list_payments).post(handlers::finance::record_payment),
        )
        .route(
            "/payments/{id}",
            get(handlers::finance::get_payment)
                .put(handlers::finance::update_payment)
                .delete(handlers::finance::delete_payment),
        )
        .route("/finance/summary", get(handlers::finance::get_summary))
        .route("/finance/me", get(handlers::finance::get_my_costs))
        .route("/budgets", get(handlers::finance::get_budget_report))
        .route(
            "/budgets/{category}",
            put(handlers::finance::set_budget).delete(handlers::finance::delete_budget),
        )
        .route(
            "/inventory",
            get(handlers::inventory::list_items).post(handlers::inventory::create_item),
        )
        .route("/inventory/overview", get(handlers::inventory::get_overview))
        .route(
            "/inventory/{id}",
            get(handlers::inventory::get_item)
                .put(handlers::inventory::update_item)
                .delete(handlers::inventory::delete_item),
        )
        .route("/menu", get(handlers::menu::list_dishes).post(handlers::menu::create_dish))
        .route("/menu/weekly", get(handlers::menu::get_weekly))
        .route(
            "/menu/{id}",
            get(handlers::menu::get_dish)
                .put(handlers::menu::update_dish)
                .delete(handlers::menu::delete_dish),
        )
        .route("/reports", get(handlers::dashboard::get_report))
        .route("/dashboard", get(handlers::dashboard::get_dashboard))
        .route("/activities", get(handlers::dashboard::list_activities))
        .route("/notifications", get(handlers::notifications::list_notifications))
        .route("/notifications/read-all", post(handlers::notifications::mark_all_read))
        .route("/notifications/{id}/read", post(handlers::notifications::mark_read));

    let api_routes = onboarding_routes
        .merge(mess_routes)
        .layer(axum_middleware::from_fn_with_state(app_state.clone(), auth_guard));

    let app = Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/api/health", get(|| async { "OK" }))
        .nest("/api", api_routes)
        .with_state(app_state);

    let listener = TcpListener::bind(config.bind_addr).await?;
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}
