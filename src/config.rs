// src/config.rs

use std::{env, net::SocketAddr, sync::Arc, time::Duration};

use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::{
    db::{
        ActivityRepository, BudgetRepository, ExpenseRepository, InventoryRepository,
        MenuRepository, MessRepository, PaymentRepository, ProfileDirectory, ProfileRepository,
    },
    services::{
        activity_service::ActivityLogger, audit::Audited, auth::AuthService,
        change_feed::ChangeFeed, finance_service::FinanceService,
        inventory_service::InventoryService, member_service::MemberService,
        menu_service::MenuService, notification_service::NotificationCenter,
        report_cache::ReportCache, report_service::ReportService,
        tenancy_service::{MessService, TenantResolver},
    },
};

// ---
// Configuração lida do ambiente (.env em desenvolvimento)
// ---
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt_secret: String,
    pub jwt_audience: Option<String>,
    pub bind_addr: SocketAddr,
    pub db_max_connections: u32,
    pub db_acquire_timeout: Duration,
    pub report_cache_ttl: Duration,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Monta a configuração a partir de qualquer fonte chave => valor.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let required = |key: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .with_context(|| format!("{} deve ser definida", key))
        };
        let parsed = |key: &str, default: u64| -> anyhow::Result<u64> {
            match lookup(key) {
                Some(raw) => raw.trim().parse().with_context(|| format!("{} inválida: '{}'", key, raw)),
                None => Ok(default),
            }
        };

        let bind_addr = lookup("BIND_ADDR").unwrap_or_else(|| "0.0.0.0:3000".into());

        Ok(Self {
            database_url: required("DATABASE_URL")?,
            jwt_secret: required("JWT_SECRET")?,
            jwt_audience: lookup("JWT_AUDIENCE").filter(|v| !v.trim().is_empty()),
            bind_addr: bind_addr
                .parse()
                .with_context(|| format!("BIND_ADDR inválido: '{}'", bind_addr))?,
            db_max_connections: u32::try_from(parsed("DB_MAX_CONNECTIONS", 5)?)
                .context("DB_MAX_CONNECTIONS fora do intervalo")?,
            db_acquire_timeout: Duration::from_secs(parsed("DB_ACQUIRE_TIMEOUT_SECS", 3)?),
            report_cache_ttl: Duration::from_secs(parsed("REPORT_CACHE_TTL_SECS", 60)?),
        })
    }
}

// ---
// Estado compartilhado pelos handlers
// ---
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub auth_service: AuthService,
    pub resolver: TenantResolver,
    pub mess_service: MessService,
    pub member_service: MemberService,
    pub finance_service: FinanceService,
    pub inventory_service: InventoryService,
    pub menu_service: MenuService,
    pub report_service: ReportService,
    pub activity_logger: ActivityLogger,
    pub notifications: Arc<NotificationCenter>,
}

impl AppState {
    pub async fn new(config: &AppConfig) -> anyhow::Result<Self> {
        let db_pool = PgPoolOptions::new()
            .max_connections(config.db_max_connections)
            .acquire_timeout(config.db_acquire_timeout)
            .connect(&config.database_url)
            .await
            .context("Falha ao conectar ao banco de dados")?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        // --- Infra compartilhada ---
        let cache = ReportCache::new(config.report_cache_ttl);
        let activity_logger = ActivityLogger::new(Arc::new(ActivityRepository::new(db_pool.clone())), cache.clone());
        let feed = ChangeFeed::new();
        let notifications = Arc::new(NotificationCenter::new());
        notifications.spawn_listener(&feed);

        // --- Repositórios (mutações passam pelo Audited) ---
        let profiles = ProfileRepository::new(db_pool.clone());
        let directory: Arc<dyn ProfileDirectory> = Arc::new(profiles.clone());
        let members = Arc::new(Audited::new(profiles, activity_logger.clone(), cache.clone(), feed.clone()));
        let expenses = Arc::new(Audited::new(
            ExpenseRepository::new(db_pool.clone()),
            activity_logger.clone(),
            cache.clone(),
            feed.clone(),
        ));
        let payments = Arc::new(Audited::new(
            PaymentRepository::new(db_pool.clone()),
            activity_logger.clone(),
            cache.clone(),
            feed.clone(),
        ));
        let inventory = Arc::new(Audited::new(
            InventoryRepository::new(db_pool.clone()),
            activity_logger.clone(),
            cache.clone(),
            feed.clone(),
        ));
        let menu = Arc::new(Audited::new(
            MenuRepository::new(db_pool.clone()),
            activity_logger.clone(),
            cache.clone(),
            feed,
        ));

        // --- Serviços ---
        let mess_service = MessService::new(
            Arc::new(MessRepository::new(db_pool.clone())),
            directory.clone(),
            activity_logger.clone(),
            cache.clone(),
        );
        let finance_service = FinanceService::new(
            expenses.clone(),
            payments,
            members.clone(),
            Arc::new(BudgetRepository::new(db_pool.clone())),
            cache.clone(),
        );
        let report_service = ReportService::new(
            expenses,
            members.clone(),
            inventory.clone(),
            menu.clone(),
            activity_logger.clone(),
            cache,
        );

        Ok(Self {
            auth_service: AuthService::new(&config.jwt_secret, config.jwt_audience.as_deref()),
            resolver: TenantResolver::new(directory),
            mess_service,
            member_service: MemberService::new(members),
            finance_service,
            inventory_service: InventoryService::new(inventory),
            menu_service: MenuService::new(menu),
            report_service,
            activity_logger,
            notifications,
            db_pool,
        })
    }
}
