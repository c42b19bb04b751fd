// src/db/mess_repo.rs

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::{db_utils::begin_for_user, error::AppError},
    db::repository::MessStore,
    models::tenancy::{Mess, MessPatch, NewMess, Profile, Role},
};

#[derive(Clone)]
pub struct MessRepository {
    pool: PgPool,
}

impl MessRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MessStore for MessRepository {
    async fn get(&self, id: Uuid) -> Result<Mess, AppError> {
        sqlx::query_as::<_, Mess>("SELECT * FROM mess WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(AppError::NotFound("mess"))
    }

    async fn list_available(&self, limit: i64) -> Result<Vec<Mess>, AppError> {
        let messes = sqlx::query_as::<_, Mess>(
            "SELECT * FROM mess ORDER BY created_at DESC LIMIT $1",
        )
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;
        Ok(messes)
    }

    /// LÓGICA ATÔMICA: cria o mess e promove o criador a admin.
    /// Se qualquer passo falhar a transação é desfeita e nada fica pela metade.
    async fn create_with_admin(&self, user_id: Uuid, new: NewMess) -> Result<(Mess, Profile), AppError> {
        new.validate()?;

        // 1. Inicia a transação
        let mut tx = begin_for_user(&self.pool, user_id).await?;

        // 2. Cria o mess
        let mess = sqlx::query_as::<_, Mess>(
            r#"
            INSERT INTO mess (name, description, address, created_by)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
            .bind(new.name.trim())
            .bind(new.description)
            .bind(new.address)
            .bind(user_id)
            .fetch_one(&mut *tx)
            .await?;

        // 3. Vincula o criador como admin (só se ele ainda não tiver mess)
        let profile = sqlx::query_as::<_, Profile>(
            r#"
            UPDATE profiles
            SET mess_id = $2, role = $3, updated_at = NOW()
            WHERE user_id = $1 AND mess_id IS NULL
            RETURNING *
            "#,
        )
            .bind(user_id)
            .bind(mess.id)
            .bind(Role::Admin)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| AppError::ConstraintViolation("Você já pertence a um mess.".into()))?;

        // 4. Commit
        tx.commit().await?;

        tracing::info!("Mess '{}' ({}) criado por {}", mess.name, mess.id, user_id);
        Ok((mess, profile))
    }

    async fn update(&self, id: Uuid, patch: MessPatch) -> Result<Mess, AppError> {
        patch.validate()?;

        let mess = sqlx::query_as::<_, Mess>(
            r#"
            UPDATE mess
            SET name = COALESCE($2, name),
                description = COALESCE($3, description),
                address = COALESCE($4, address),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
            .bind(id)
            .bind(patch.name.as_deref().map(str::trim))
            .bind(patch.description)
            .bind(patch.address)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(AppError::NotFound("mess"))?;

        Ok(mess)
    }
}
