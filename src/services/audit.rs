// src/services/audit.rs

use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::repository::{Entity, Repository},
    models::{
        activity::NewActivity,
        notification::{ChangeEvent, ChangeKind},
        tenancy::MessScope,
    },
    services::{activity_service::ActivityLogger, change_feed::ChangeFeed, report_cache::ReportCache},
};

/// Decorador de repositório: depois de cada mutação bem-sucedida registra exatamente
/// uma atividade, invalida o cache de relatórios do mess e publica no feed de mudanças.
/// Leituras passam direto; mutações que falham não geram nada.
pub struct Audited<R> {
    inner: R,
    logger: ActivityLogger,
    cache: ReportCache,
    feed: ChangeFeed,
}

impl<R: Repository> Audited<R> {
    pub fn new(inner: R, logger: ActivityLogger, cache: ReportCache, feed: ChangeFeed) -> Self {
        Self { inner, logger, cache, feed }
    }

    fn after_mutation(&self, scope: &MessScope, kind: ChangeKind, record: &R::Record) {
        let verb = match kind {
            ChangeKind::Insert => "Cadastro",
            ChangeKind::Update => "Alteração",
            ChangeKind::Delete => "Remoção",
        };
        let name = <R::Record as Entity>::NAME;

        self.logger.record(
            NewActivity::new(
                scope.mess_id(),
                scope.user_id(),
                format!("{}_{}", name, kind.verb()),
                format!("{} de {}: {}", verb, <R::Record as Entity>::LABEL, record.summary()),
            )
            .with_entity(name, record.id()),
        );

        self.cache.invalidate(scope.mess_id());

        self.feed.publish(ChangeEvent {
            table: <R::Record as Entity>::TABLE,
            kind,
            mess_id: scope.mess_id(),
            user_id: scope.user_id(),
            record: record.to_change(),
        });
    }
}

#[async_trait]
impl<R: Repository> Repository for Audited<R> {
    type Record = R::Record;
    type New = R::New;
    type Patch = R::Patch;
    type Filter = R::Filter;

    async fn list(&self, scope: &MessScope, filter: &Self::Filter) -> Result<Vec<Self::Record>, AppError> {
        self.inner.list(scope, filter).await
    }

    async fn get(&self, scope: &MessScope, id: Uuid) -> Result<Self::Record, AppError> {
        self.inner.get(scope, id).await
    }

    async fn insert(&self, scope: &MessScope, new: Self::New) -> Result<Self::Record, AppError> {
        let record = self.inner.insert(scope, new).await?;
        self.after_mutation(scope, ChangeKind::Insert, &record);
        Ok(record)
    }

    async fn update(&self, scope: &MessScope, id: Uuid, patch: Self::Patch) -> Result<Self::Record, AppError> {
        let record = self.inner.update(scope, id, patch).await?;
        self.after_mutation(scope, ChangeKind::Update, &record);
        Ok(record)
    }

    async fn delete(&self, scope: &MessScope, id: Uuid) -> Result<(), AppError> {
        // Estado anterior: descrição da atividade e payload do evento.
        let record = self.inner.get(scope, id).await?;
        self.inner.delete(scope, id).await?;
        self.after_mutation(scope, ChangeKind::Delete, &record);
        Ok(())
    }
}
