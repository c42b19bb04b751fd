// src/db/budget_repo.rs

use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::{
    common::{db_utils::begin_scoped, error::AppError, validation::ensure_not_negative},
    db::repository::BudgetStore,
    models::{finance::CategoryBudget, tenancy::MessScope},
};

#[derive(Clone)]
pub struct BudgetRepository {
    pool: PgPool,
}

impl BudgetRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BudgetStore for BudgetRepository {
    async fn all(&self, scope: &MessScope) -> Result<Vec<CategoryBudget>, AppError> {
        let mut tx = begin_scoped(&self.pool, scope).await?;

        let budgets = sqlx::query_as::<_, CategoryBudget>(
            "SELECT * FROM category_budgets WHERE mess_id = $1 ORDER BY category ASC",
        )
            .bind(scope.mess_id())
            .fetch_all(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(budgets)
    }

    async fn upsert(&self, scope: &MessScope, category: &str, monthly_amount: Decimal) -> Result<CategoryBudget, AppError> {
        ensure_not_negative("monthlyAmount", monthly_amount)?;
        let mut tx = begin_scoped(&self.pool, scope).await?;

        let budget = sqlx::query_as::<_, CategoryBudget>(
            r#"
            INSERT INTO category_budgets (mess_id, category, monthly_amount)
            VALUES ($1, $2, $3)
            ON CONFLICT (mess_id, category) DO UPDATE
            SET monthly_amount = EXCLUDED.monthly_amount, updated_at = NOW()
            RETURNING *
            "#,
        )
            .bind(scope.mess_id())
            .bind(category)
            .bind(monthly_amount)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(budget)
    }

    async fn remove(&self, scope: &MessScope, category: &str) -> Result<(), AppError> {
        let mut tx = begin_scoped(&self.pool, scope).await?;

        let result = sqlx::query("DELETE FROM category_budgets WHERE mess_id = $1 AND category = $2")
            .bind(scope.mess_id())
            .bind(category)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("orçamento"));
        }

        tx.commit().await?;
        Ok(())
    }
}
