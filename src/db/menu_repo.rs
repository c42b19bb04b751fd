// src/db/menu_repo.rs

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::{db_utils::begin_scoped, error::AppError},
    db::repository::{Entity, Patch, Repository},
    models::{
        menu::{MenuFilter, MenuItem, MenuPatch, NewMenuItem},
        notification::{ChangedRecord, Table},
        tenancy::MessScope,
    },
    services::aggregation::day_name,
};

impl Entity for MenuItem {
    const NAME: &'static str = "menu_item";
    const LABEL: &'static str = "prato do cardápio";
    const TABLE: Table = Table::MenuItems;

    fn id(&self) -> Uuid {
        self.id
    }

    fn summary(&self) -> String {
        format!("{} ({}, {})", self.name, day_name(self.day_of_week), self.category.as_str())
    }

    fn check(&self) -> Result<(), AppError> {
        if self.name.trim().is_empty() {
            return Err(AppError::ConstraintViolation("O nome do prato é obrigatório.".into()));
        }
        if !(0..=6).contains(&self.day_of_week) {
            return Err(AppError::ConstraintViolation(
                "O dia da semana deve estar entre 0 e 6.".into(),
            ));
        }
        Ok(())
    }

    fn to_change(&self) -> ChangedRecord {
        ChangedRecord::Menu(self.clone())
    }
}

impl Patch<MenuItem> for MenuPatch {
    fn apply(self, item: &mut MenuItem) {
        if let Some(name) = self.name {
            item.name = name;
        }
        if let Some(description) = self.description {
            item.description = Some(description);
        }
        if let Some(category) = self.category {
            item.category = category;
        }
        if let Some(day) = self.day_of_week {
            item.day_of_week = day;
        }
        if let Some(active) = self.is_active {
            item.is_active = active;
        }
    }
}

#[derive(Clone)]
pub struct MenuRepository {
    pool: PgPool,
}

impl MenuRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Repository for MenuRepository {
    type Record = MenuItem;
    type New = NewMenuItem;
    type Patch = MenuPatch;
    type Filter = MenuFilter;

    async fn list(&self, scope: &MessScope, filter: &MenuFilter) -> Result<Vec<MenuItem>, AppError> {
        let mut tx = begin_scoped(&self.pool, scope).await?;

        let mut qb = QueryBuilder::<Postgres>::new("SELECT * FROM menu_items WHERE mess_id = ");
        qb.push_bind(scope.mess_id());
        if filter.active_only {
            qb.push(" AND is_active");
        }
        if let Some(day) = filter.day {
            qb.push(" AND day_of_week = ").push_bind(day);
        }
        // O enum meal_category ordena na ordem de declaração (café, almoço, jantar, lanche)
        qb.push(" ORDER BY day_of_week, category, name");

        let items = qb.build_query_as::<MenuItem>().fetch_all(&mut *tx).await?;
        tx.commit().await?;
        Ok(items)
    }

    async fn get(&self, scope: &MessScope, id: Uuid) -> Result<MenuItem, AppError> {
        let mut tx = begin_scoped(&self.pool, scope).await?;

        let item = sqlx::query_as::<_, MenuItem>(
            "SELECT * FROM menu_items WHERE id = $1 AND mess_id = $2",
        )
            .bind(id)
            .bind(scope.mess_id())
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(AppError::NotFound(MenuItem::LABEL))?;

        tx.commit().await?;
        Ok(item)
    }

    async fn insert(&self, scope: &MessScope, new: NewMenuItem) -> Result<MenuItem, AppError> {
        new.validate()?;
        let mut tx = begin_scoped(&self.pool, scope).await?;

        let item = sqlx::query_as::<_, MenuItem>(
            r#"
            INSERT INTO menu_items (mess_id, name, description, category, day_of_week, is_active)
            VALUES ($1, $2, $3, $4, $5, COALESCE($6, TRUE))
            RETURNING *
            "#,
        )
            .bind(scope.mess_id())
            .bind(new.name.trim())
            .bind(new.description)
            .bind(new.category)
            .bind(new.day_of_week)
            .bind(new.is_active)
            .fetch_one(&mut *tx)
            .await?;

        item.check()?;

        tx.commit().await?;
        Ok(item)
    }

    async fn update(&self, scope: &MessScope, id: Uuid, patch: MenuPatch) -> Result<MenuItem, AppError> {
        let mut tx = begin_scoped(&self.pool, scope).await?;

        let mut item = sqlx::query_as::<_, MenuItem>(
            "SELECT * FROM menu_items WHERE id = $1 AND mess_id = $2 FOR UPDATE",
        )
            .bind(id)
            .bind(scope.mess_id())
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(AppError::NotFound(MenuItem::LABEL))?;

        patch.apply(&mut item);
        item.check()?;

        let updated = sqlx::query_as::<_, MenuItem>(
            r#"
            UPDATE menu_items
            SET name = $3, description = $4, category = $5, day_of_week = $6,
                is_active = $7, updated_at = NOW()
            WHERE id = $1 AND mess_id = $2
            RETURNING *
            "#,
        )
            .bind(id)
            .bind(scope.mess_id())
            .bind(&item.name)
            .bind(&item.description)
            .bind(item.category)
            .bind(item.day_of_week)
            .bind(item.is_active)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(updated)
    }

    async fn delete(&self, scope: &MessScope, id: Uuid) -> Result<(), AppError> {
        let mut tx = begin_scoped(&self.pool, scope).await?;

        let result = sqlx::query("DELETE FROM menu_items WHERE id = $1 AND mess_id = $2")
            .bind(id)
            .bind(scope.mess_id())
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(MenuItem::LABEL));
        }

        tx.commit().await?;
        Ok(())
    }
}
