// src/db/activity_repo.rs

use async_trait::async_trait;
use sqlx::PgPool;

use crate::{
    common::{db_utils::begin_scoped, error::AppError},
    db::repository::ActivityStore,
    models::{
        activity::{Activity, NewActivity},
        tenancy::MessScope,
    },
};

#[derive(Clone)]
pub struct ActivityRepository {
    pool: PgPool,
}

impl ActivityRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ActivityStore for ActivityRepository {
    async fn append(&self, activity: NewActivity) -> Result<Activity, AppError> {
        let mut tx = self.pool.begin().await?;

        // A policy RLS de `activities` também vale como WITH CHECK no INSERT.
        sqlx::query("SELECT set_config('app.mess_id', $1, true)")
            .bind(activity.mess_id.to_string())
            .execute(&mut *tx)
            .await?;

        let row = sqlx::query_as::<_, Activity>(
            r#"
            INSERT INTO activities (mess_id, user_id, action, description, entity_type, entity_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
            .bind(activity.mess_id)
            .bind(activity.user_id)
            .bind(activity.action)
            .bind(activity.description)
            .bind(activity.entity_type)
            .bind(activity.entity_id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(row)
    }

    async fn list_recent(&self, scope: &MessScope, limit: i64) -> Result<Vec<Activity>, AppError> {
        let mut tx = begin_scoped(&self.pool, scope).await?;

        let rows = sqlx::query_as::<_, Activity>(
            "SELECT * FROM activities WHERE mess_id = $1 ORDER BY created_at DESC LIMIT $2",
        )
            .bind(scope.mess_id())
            .bind(limit)
            .fetch_all(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(rows)
    }
}
