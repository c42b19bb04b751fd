// src/services/inventory_service.rs

use std::collections::BTreeMap;

use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{InventoryRepo, Repository},
    models::{
        inventory::{
            CategoryCount, InventoryFilter, InventoryItem, InventoryOverview, InventoryPatch,
            NewInventoryItem,
        },
        tenancy::{MessScope, Role},
    },
    services::aggregation::{inventory_value, low_stock_filter, out_of_stock_filter},
};

#[derive(Clone)]
pub struct InventoryService {
    items: InventoryRepo,
}

impl InventoryService {
    pub fn new(items: InventoryRepo) -> Self {
        Self { items }
    }

    pub async fn list(&self, scope: &MessScope, filter: &InventoryFilter) -> Result<Vec<InventoryItem>, AppError> {
        self.items.list(scope, filter).await
    }

    pub async fn get(&self, scope: &MessScope, id: Uuid) -> Result<InventoryItem, AppError> {
        self.items.get(scope, id).await
    }

    pub async fn create(&self, scope: &MessScope, new: NewInventoryItem) -> Result<InventoryItem, AppError> {
        scope.ensure_role(Role::Manager)?;
        self.items.insert(scope, new).await
    }

    pub async fn update(&self, scope: &MessScope, id: Uuid, patch: InventoryPatch) -> Result<InventoryItem, AppError> {
        scope.ensure_role(Role::Manager)?;
        self.items.update(scope, id, patch).await
    }

    pub async fn delete(&self, scope: &MessScope, id: Uuid) -> Result<(), AppError> {
        scope.ensure_role(Role::Manager)?;
        self.items.delete(scope, id).await
    }

    pub async fn overview(&self, scope: &MessScope) -> Result<InventoryOverview, AppError> {
        let items = self.items.list(scope, &InventoryFilter::default()).await?;

        let mut per_category: BTreeMap<&str, usize> = BTreeMap::new();
        for item in &items {
            *per_category.entry(item.category.as_str()).or_default() += 1;
        }
        let categories = per_category
            .into_iter()
            .map(|(category, count)| CategoryCount { category: category.to_string(), count })
            .collect();

        let low_stock_items = low_stock_filter(&items);
        let out_of_stock_items = out_of_stock_filter(&items);

        Ok(InventoryOverview {
            total_items: items.len(),
            low_stock_count: low_stock_items.len(),
            out_of_stock_count: out_of_stock_items.len(),
            total_value: inventory_value(&items),
            low_stock_items,
            out_of_stock_items,
            categories,
        })
    }
}
