// src/db/inventory_repo.rs

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::{db_utils::begin_scoped, error::AppError, validation::ensure_not_negative},
    db::repository::{Entity, Patch, Repository},
    models::{
        inventory::{InventoryFilter, InventoryItem, InventoryPatch, NewInventoryItem, StockLevel},
        notification::{ChangedRecord, Table},
        tenancy::MessScope,
    },
};

fn or_default(value: Option<&str>, default: &str) -> String {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or(default)
        .to_string()
}

impl Entity for InventoryItem {
    const NAME: &'static str = "inventory_item";
    const LABEL: &'static str = "item de estoque";
    const TABLE: Table = Table::InventoryItems;

    fn id(&self) -> Uuid {
        self.id
    }

    fn summary(&self) -> String {
        format!("{} ({} {})", self.name, self.current_stock, self.unit)
    }

    fn check(&self) -> Result<(), AppError> {
        if self.name.trim().is_empty() {
            return Err(AppError::ConstraintViolation("O nome do item é obrigatório.".into()));
        }
        ensure_not_negative("currentStock", self.current_stock)?;
        ensure_not_negative("minimumStock", self.minimum_stock)?;
        ensure_not_negative("costPerUnit", self.cost_per_unit)
    }

    fn to_change(&self) -> ChangedRecord {
        ChangedRecord::Inventory(self.clone())
    }
}

impl Patch<InventoryItem> for InventoryPatch {
    fn apply(self, item: &mut InventoryItem) {
        if let Some(name) = self.name {
            item.name = name;
        }
        if let Some(category) = self.category {
            item.category = or_default(Some(&category), "groceries");
        }
        if let Some(unit) = self.unit {
            item.unit = or_default(Some(&unit), "kg");
        }
        if let Some(current) = self.current_stock {
            item.current_stock = current;
        }
        if let Some(minimum) = self.minimum_stock {
            item.minimum_stock = minimum;
        }
        if let Some(cost) = self.cost_per_unit {
            item.cost_per_unit = cost;
        }
        if let Some(supplier) = self.supplier {
            item.supplier = Some(supplier);
        }
        if let Some(last_purchased) = self.last_purchased {
            item.last_purchased = Some(last_purchased);
        }
    }
}

#[derive(Clone)]
pub struct InventoryRepository {
    pool: PgPool,
}

impl InventoryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Repository for InventoryRepository {
    type Record = InventoryItem;
    type New = NewInventoryItem;
    type Patch = InventoryPatch;
    type Filter = InventoryFilter;

    async fn list(&self, scope: &MessScope, filter: &InventoryFilter) -> Result<Vec<InventoryItem>, AppError> {
        let mut tx = begin_scoped(&self.pool, scope).await?;

        let mut qb = QueryBuilder::<Postgres>::new("SELECT * FROM inventory_items WHERE mess_id = ");
        qb.push_bind(scope.mess_id());
        if let Some(category) = filter.category.as_deref() {
            qb.push(" AND category = ").push_bind(category.trim().to_string());
        }
        match filter.stock {
            Some(StockLevel::Low) => {
                qb.push(" AND current_stock <= minimum_stock");
            }
            Some(StockLevel::Out) => {
                qb.push(" AND current_stock = 0");
            }
            None => {}
        }
        qb.push(" ORDER BY name ASC");

        let items = qb.build_query_as::<InventoryItem>().fetch_all(&mut *tx).await?;
        tx.commit().await?;
        Ok(items)
    }

    async fn get(&self, scope: &MessScope, id: Uuid) -> Result<InventoryItem, AppError> {
        let mut tx = begin_scoped(&self.pool, scope).await?;

        let item = sqlx::query_as::<_, InventoryItem>(
            "SELECT * FROM inventory_items WHERE id = $1 AND mess_id = $2",
        )
            .bind(id)
            .bind(scope.mess_id())
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(AppError::NotFound(InventoryItem::LABEL))?;

        tx.commit().await?;
        Ok(item)
    }

    async fn insert(&self, scope: &MessScope, new: NewInventoryItem) -> Result<InventoryItem, AppError> {
        new.validate()?;
        let mut tx = begin_scoped(&self.pool, scope).await?;

        let item = sqlx::query_as::<_, InventoryItem>(
            r#"
            INSERT INTO inventory_items
                (mess_id, name, category, unit, current_stock, minimum_stock, cost_per_unit, supplier, last_purchased)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *
            "#,
        )
            .bind(scope.mess_id())
            .bind(new.name.trim())
            .bind(or_default(new.category.as_deref(), "groceries"))
            .bind(or_default(new.unit.as_deref(), "kg"))
            .bind(new.current_stock)
            .bind(new.minimum_stock)
            .bind(new.cost_per_unit)
            .bind(new.supplier)
            .bind(new.last_purchased)
            .fetch_one(&mut *tx)
            .await?;

        item.check()?;

        tx.commit().await?;
        Ok(item)
    }

    async fn update(&self, scope: &MessScope, id: Uuid, patch: InventoryPatch) -> Result<InventoryItem, AppError> {
        let mut tx = begin_scoped(&self.pool, scope).await?;

        let mut item = sqlx::query_as::<_, InventoryItem>(
            "SELECT * FROM inventory_items WHERE id = $1 AND mess_id = $2 FOR UPDATE",
        )
            .bind(id)
            .bind(scope.mess_id())
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(AppError::NotFound(InventoryItem::LABEL))?;

        patch.apply(&mut item);
        item.check()?;

        let updated = sqlx::query_as::<_, InventoryItem>(
            r#"
            UPDATE inventory_items
            SET name = $3, category = $4, unit = $5, current_stock = $6, minimum_stock = $7,
                cost_per_unit = $8, supplier = $9, last_purchased = $10, updated_at = NOW()
            WHERE id = $1 AND mess_id = $2
            RETURNING *
            "#,
        )
            .bind(id)
            .bind(scope.mess_id())
            .bind(&item.name)
            .bind(&item.category)
            .bind(&item.unit)
            .bind(item.current_stock)
            .bind(item.minimum_stock)
            .bind(item.cost_per_unit)
            .bind(&item.supplier)
            .bind(item.last_purchased)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(updated)
    }

    async fn delete(&self, scope: &MessScope, id: Uuid) -> Result<(), AppError> {
        let mut tx = begin_scoped(&self.pool, scope).await?;

        let result = sqlx::query("DELETE FROM inventory_items WHERE id = $1 AND mess_id = $2")
            .bind(id)
            .bind(scope.mess_id())
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(InventoryItem::LABEL));
        }

        tx.commit().await?;
        Ok(())
    }
}
