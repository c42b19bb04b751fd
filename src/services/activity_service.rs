// src/services/activity_service.rs

use std::sync::Arc;

use tokio::task::JoinHandle;

use crate::{
    common::error::AppError,
    db::ActivityStore,
    models::{
        activity::{Activity, NewActivity},
        tenancy::MessScope,
    },
    services::report_cache::ReportCache,
};

/// Log de auditoria "best-effort": a gravação roda em background e uma falha
/// só gera um warning. A mutação que originou o registro nunca é desfeita nem bloqueada.
#[derive(Clone)]
pub struct ActivityLogger {
    store: Arc<dyn ActivityStore>,
    cache: ReportCache,
}

impl ActivityLogger {
    pub fn new(store: Arc<dyn ActivityStore>, cache: ReportCache) -> Self {
        Self { store, cache }
    }

    pub fn record(&self, activity: NewActivity) -> JoinHandle<()> {
        let store = self.store.clone();
        let cache = self.cache.clone();
        tokio::spawn(async move {
            let action = activity.action.clone();
            let mess_id = activity.mess_id;
            if let Err(e) = store.append(activity).await {
                tracing::warn!("Falha ao registrar a atividade '{}' do mess {}: {}", action, mess_id, e);
            }
            // Relatórios calculados antes da gravação não podem ficar sem esta atividade.
            cache.invalidate(mess_id);
        })
    }

    pub async fn recent(&self, scope: &MessScope, limit: i64) -> Result<Vec<Activity>, AppError> {
        self.store.list_recent(scope, limit).await
    }
}
