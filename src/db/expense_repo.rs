// src/db/expense_repo.rs

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::{
        db_utils::begin_scoped,
        error::AppError,
        validation::{ensure_not_negative, normalize_category},
    },
    db::repository::{Entity, Patch, Repository},
    models::{
        finance::{Expense, ExpenseFilter, ExpensePatch, NewExpense},
        notification::{ChangedRecord, Table},
        tenancy::MessScope,
    },
};

impl Entity for Expense {
    const NAME: &'static str = "expense";
    const LABEL: &'static str = "despesa";
    const TABLE: Table = Table::Expenses;

    fn id(&self) -> Uuid {
        self.id
    }

    fn summary(&self) -> String {
        format!("{} ({})", self.title, self.amount)
    }

    fn check(&self) -> Result<(), AppError> {
        if self.title.trim().is_empty() {
            return Err(AppError::ConstraintViolation("O título é obrigatório.".into()));
        }
        ensure_not_negative("amount", self.amount)
    }

    fn to_change(&self) -> ChangedRecord {
        ChangedRecord::Expense(self.clone())
    }
}

impl Patch<Expense> for ExpensePatch {
    fn apply(self, expense: &mut Expense) {
        if let Some(title) = self.title {
            expense.title = title;
        }
        if let Some(description) = self.description {
            expense.description = Some(description);
        }
        if let Some(amount) = self.amount {
            expense.amount = amount;
        }
        if let Some(category) = self.category {
            expense.category = normalize_category(Some(&category));
        }
        if let Some(expense_date) = self.expense_date {
            expense.expense_date = expense_date;
        }
        if let Some(receipt_url) = self.receipt_url {
            expense.receipt_url = Some(receipt_url);
        }
    }
}

#[derive(Clone)]
pub struct ExpenseRepository {
    pool: PgPool,
}

impl ExpenseRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Repository for ExpenseRepository {
    type Record = Expense;
    type New = NewExpense;
    type Patch = ExpensePatch;
    type Filter = ExpenseFilter;

    async fn list(&self, scope: &MessScope, filter: &ExpenseFilter) -> Result<Vec<Expense>, AppError> {
        let mut tx = begin_scoped(&self.pool, scope).await?;

        let mut qb = QueryBuilder::<Postgres>::new("SELECT * FROM expenses WHERE mess_id = ");
        qb.push_bind(scope.mess_id());
        if let Some(since) = filter.since {
            qb.push(" AND expense_date >= ").push_bind(since);
        }
        if let Some(until) = filter.until {
            qb.push(" AND expense_date <= ").push_bind(until);
        }
        if let Some(category) = filter.category.as_deref() {
            qb.push(" AND category = ").push_bind(normalize_category(Some(category)));
        }
        qb.push(" ORDER BY expense_date DESC, created_at DESC");

        let expenses = qb.build_query_as::<Expense>().fetch_all(&mut *tx).await?;
        tx.commit().await?;
        Ok(expenses)
    }

    async fn get(&self, scope: &MessScope, id: Uuid) -> Result<Expense, AppError> {
        let mut tx = begin_scoped(&self.pool, scope).await?;

        let expense = sqlx::query_as::<_, Expense>(
            "SELECT * FROM expenses WHERE id = $1 AND mess_id = $2",
        )
            .bind(id)
            .bind(scope.mess_id())
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(AppError::NotFound(Expense::LABEL))?;

        tx.commit().await?;
        Ok(expense)
    }

    async fn insert(&self, scope: &MessScope, new: NewExpense) -> Result<Expense, AppError> {
        new.validate()?;
        let mut tx = begin_scoped(&self.pool, scope).await?;

        let expense = sqlx::query_as::<_, Expense>(
            r#"
            INSERT INTO expenses (mess_id, added_by, title, description, amount, category, expense_date, receipt_url)
            VALUES ($1, $2, $3, $4, $5, $6, COALESCE($7, CURRENT_DATE), $8)
            RETURNING *
            "#,
        )
            .bind(scope.mess_id())
            .bind(scope.user_id())
            .bind(new.title.trim())
            .bind(new.description)
            .bind(new.amount)
            .bind(normalize_category(new.category.as_deref()))
            .bind(new.expense_date)
            .bind(new.receipt_url)
            .fetch_one(&mut *tx)
            .await?;

        // Mesmas invariantes do update.
        expense.check()?;

        tx.commit().await?;
        Ok(expense)
    }

    async fn update(&self, scope: &MessScope, id: Uuid, patch: ExpensePatch) -> Result<Expense, AppError> {
        let mut tx = begin_scoped(&self.pool, scope).await?;

        // Trava a linha: o patch é aplicado em memória e gravado inteiro.
        let mut expense = sqlx::query_as::<_, Expense>(
            "SELECT * FROM expenses WHERE id = $1 AND mess_id = $2 FOR UPDATE",
        )
            .bind(id)
            .bind(scope.mess_id())
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(AppError::NotFound(Expense::LABEL))?;

        patch.apply(&mut expense);
        expense.check()?;

        let updated = sqlx::query_as::<_, Expense>(
            r#"
            UPDATE expenses
            SET title = $3, description = $4, amount = $5, category = $6,
                expense_date = $7, receipt_url = $8, updated_at = NOW()
            WHERE id = $1 AND mess_id = $2
            RETURNING *
            "#,
        )
            .bind(id)
            .bind(scope.mess_id())
            .bind(&expense.title)
            .bind(&expense.description)
            .bind(expense.amount)
            .bind(&expense.category)
            .bind(expense.expense_date)
            .bind(&expense.receipt_url)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(updated)
    }

    async fn delete(&self, scope: &MessScope, id: Uuid) -> Result<(), AppError> {
        let mut tx = begin_scoped(&self.pool, scope).await?;

        let result = sqlx::query("DELETE FROM expenses WHERE id = $1 AND mess_id = $2")
            .bind(id)
            .bind(scope.mess_id())
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(Expense::LABEL));
        }

        tx.commit().await?;
        Ok(())
    }
}
