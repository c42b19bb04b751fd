// src/services/menu_service.rs

use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{MenuRepo, Repository},
    models::{
        menu::{DayMenu, MenuFilter, MenuItem, MenuPatch, NewMenuItem},
        tenancy::{MessScope, Role},
    },
    services::aggregation::group_by_day,
};

#[derive(Clone)]
pub struct MenuService {
    items: MenuRepo,
}

impl MenuService {
    pub fn new(items: MenuRepo) -> Self {
        Self { items }
    }

    pub async fn list(&self, scope: &MessScope, filter: &MenuFilter) -> Result<Vec<MenuItem>, AppError> {
        self.items.list(scope, filter).await
    }

    pub async fn get(&self, scope: &MessScope, id: Uuid) -> Result<MenuItem, AppError> {
        self.items.get(scope, id).await
    }

    pub async fn create(&self, scope: &MessScope, new: NewMenuItem) -> Result<MenuItem, AppError> {
        scope.ensure_role(Role::Manager)?;
        self.items.insert(scope, new).await
    }

    pub async fn update(&self, scope: &MessScope, id: Uuid, patch: MenuPatch) -> Result<MenuItem, AppError> {
        scope.ensure_role(Role::Manager)?;
        self.items.update(scope, id, patch).await
    }

    pub async fn delete(&self, scope: &MessScope, id: Uuid) -> Result<(), AppError> {
        scope.ensure_role(Role::Manager)?;
        self.items.delete(scope, id).await
    }

    /// Cardápio da semana (só pratos ativos), domingo a sábado.
    pub async fn weekly(&self, scope: &MessScope) -> Result<Vec<DayMenu>, AppError> {
        let active = self
            .items
            .list(scope, &MenuFilter { active_only: true, day: None })
            .await?;
        Ok(group_by_day(&active))
    }
}
