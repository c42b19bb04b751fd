// src/models/inventory.rs

use serde::{Serialize, Deserialize};
use chrono::{DateTime, Utc, NaiveDate};
use rust_decimal::Decimal;
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::common::validation::validate_not_negative;

// --- 1. Item de estoque da cozinha ---
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItem {
    pub id: Uuid,

    #[schema(ignore)]
    pub mess_id: Uuid,

    #[schema(example = "Arroz")]
    pub name: String,

    #[schema(example = "groceries")]
    pub category: String,

    #[schema(example = "kg")]
    pub unit: String,

    pub current_stock: Decimal,
    pub minimum_stock: Decimal,
    pub cost_per_unit: Decimal,

    pub supplier: Option<String>,

    #[schema(value_type = Option<String>, format = Date)]
    pub last_purchased: Option<NaiveDate>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl InventoryItem {
    // Estoque baixo: inclui o limite exato (current == minimum).
    pub fn is_low_stock(&self) -> bool {
        self.current_stock <= self.minimum_stock
    }

    pub fn is_out_of_stock(&self) -> bool {
        self.current_stock.is_zero()
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewInventoryItem {
    #[validate(length(min = 1, message = "O nome do item é obrigatório."))]
    pub name: String,

    // Vazio => "groceries"
    pub category: Option<String>,

    // Vazio => "kg"
    pub unit: Option<String>,

    #[serde(default)]
    #[validate(custom(function = "validate_not_negative"))]
    pub current_stock: Decimal,

    #[serde(default)]
    #[validate(custom(function = "validate_not_negative"))]
    pub minimum_stock: Decimal,

    #[serde(default)]
    #[validate(custom(function = "validate_not_negative"))]
    pub cost_per_unit: Decimal,

    pub supplier: Option<String>,

    #[schema(value_type = Option<String>, format = Date)]
    pub last_purchased: Option<NaiveDate>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InventoryPatch {
    pub name: Option<String>,
    pub category: Option<String>,
    pub unit: Option<String>,
    pub current_stock: Option<Decimal>,
    pub minimum_stock: Option<Decimal>,
    pub cost_per_unit: Option<Decimal>,
    pub supplier: Option<String>,
    #[schema(value_type = Option<String>, format = Date)]
    pub last_purchased: Option<NaiveDate>,
}

// --- 2. Situação do estoque ---
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum StockStatus {
    InStock,
    Low,
    OutOfStock,
}

// Filtro da listagem (?stock=low | ?stock=out)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum StockLevel {
    Low,
    Out,
}

#[derive(Debug, Default, Clone, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct InventoryFilter {
    pub category: Option<String>,
    pub stock: Option<StockLevel>,
}

// --- 3. Visão geral do estoque ---
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryCount {
    pub category: String,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InventoryOverview {
    pub total_items: usize,
    pub low_stock_count: usize,
    pub out_of_stock_count: usize,
    pub total_value: Decimal,
    pub low_stock_items: Vec<InventoryItem>,
    pub out_of_stock_items: Vec<InventoryItem>,
    pub categories: Vec<CategoryCount>,
}
