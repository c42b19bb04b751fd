// src/services/report_cache.rs

use std::{
    any::{Any, TypeId},
    collections::HashMap,
    future::Future,
    sync::{Arc, PoisonError, RwLock},
    time::Duration,
};

use moka::future::Cache;
use uuid::Uuid;

use crate::common::error::AppError;

const MAX_VIEWS: u64 = 10_000;

// (mess, geração, tipo do agregado)
type ViewKey = (Uuid, u64, TypeId);

/// Cache dos agregados derivados (relatório, dashboard) por mess.
/// Invalidado explicitamente a cada mutação; o TTL cobre escritas feitas fora da aplicação.
#[derive(Clone)]
pub struct ReportCache {
    views: Cache<ViewKey, Arc<dyn Any + Send + Sync>>,
    // Incrementada a cada invalidação. A geração faz parte da chave, então um
    // cálculo iniciado antes da invalidação grava numa chave que ninguém mais lê.
    generations: Arc<RwLock<HashMap<Uuid, u64>>>,
}

impl ReportCache {
    pub fn new(ttl: Duration) -> Self {
        let views = Cache::builder()
            .max_capacity(MAX_VIEWS)
            .time_to_live(ttl)
            .support_invalidation_closures()
            .build();

        Self {
            views,
            generations: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub async fn get_or_compute<T, F, Fut>(&self, mess_id: Uuid, compute: F) -> Result<T, AppError>
    where
        T: Clone + Send + Sync + 'static,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, AppError>>,
    {
        let key = (mess_id, self.generation(mess_id), TypeId::of::<T>());
        if let Some(hit) = self.views.get(&key).await.and_then(|v| v.downcast_ref::<T>().cloned()) {
            tracing::debug!("Cache hit para o mess {}", mess_id);
            return Ok(hit);
        }

        let value = compute().await?;
        self.views.insert(key, Arc::new(value.clone())).await;
        Ok(value)
    }

    pub fn invalidate(&self, mess_id: Uuid) {
        {
            let mut generations = self.generations.write().unwrap_or_else(PoisonError::into_inner);
            *generations.entry(mess_id).or_default() += 1;
        }

        // As chaves antigas já ficaram inalcançáveis; isto só libera a memória.
        if let Err(e) = self.views.invalidate_entries_if(move |key: &ViewKey, _| key.0 == mess_id) {
            tracing::warn!("Falha ao descartar o cache do mess {}: {:?}", mess_id, e);
        }
    }

    fn generation(&self, mess_id: Uuid) -> u64 {
        let generations = self.generations.read().unwrap_or_else(PoisonError::into_inner);
        generations.get(&mess_id).copied().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    async fn compute_counted(cache: &ReportCache, mess_id: Uuid, calls: &AtomicUsize) -> u32 {
        cache
            .get_or_compute(mess_id, || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok::<u32, AppError>(42)
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn second_read_is_a_hit() {
        let cache = ReportCache::new(Duration::from_secs(60));
        let calls = AtomicUsize::new(0);
        let mess_id = Uuid::new_v4();

        assert_eq!(compute_counted(&cache, mess_id, &calls).await, 42);
        assert_eq!(compute_counted(&cache, mess_id, &calls).await, 42);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn invalidate_forces_recompute_only_for_that_mess() {
        let cache = ReportCache::new(Duration::from_secs(60));
        let calls = AtomicUsize::new(0);
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());

        compute_counted(&cache, a, &calls).await;
        compute_counted(&cache, b, &calls).await;
        cache.invalidate(a);
        compute_counted(&cache, a, &calls).await;
        compute_counted(&cache, b, &calls).await;

        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn expired_entries_are_recomputed() {
        let cache = ReportCache::new(Duration::from_millis(50));
        let calls = AtomicUsize::new(0);
        let mess_id = Uuid::new_v4();

        compute_counted(&cache, mess_id, &calls).await;
        tokio::time::sleep(Duration::from_millis(120)).await;
        compute_counted(&cache, mess_id, &calls).await;
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn value_computed_across_an_invalidation_is_not_stored() {
        let cache = ReportCache::new(Duration::from_secs(60));
        let mess_id = Uuid::new_v4();

        let stale = cache
            .get_or_compute(mess_id, || async {
                cache.invalidate(mess_id);
                Ok::<u32, AppError>(1)
            })
            .await
            .unwrap();
        assert_eq!(stale, 1);

        let fresh = cache
            .get_or_compute(mess_id, || async { Ok::<u32, AppError>(2) })
            .await
            .unwrap();
        assert_eq!(fresh, 2);
    }

    #[tokio::test]
    async fn errors_are_not_cached() {
        let cache = ReportCache::new(Duration::from_secs(60));
        let mess_id = Uuid::new_v4();

        let failed = cache
            .get_or_compute(mess_id, || async { Err::<u32, AppError>(AppError::NetworkFailure("x".into())) })
            .await;
        assert!(failed.is_err());

        let ok = cache
            .get_or_compute(mess_id, || async { Ok::<u32, AppError>(7) })
            .await
            .unwrap();
        assert_eq!(ok, 7);
    }
}
