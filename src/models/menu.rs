// src/models/menu.rs

use serde::{Serialize, Deserialize};
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "meal_category", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum MealCategory {
    Breakfast,
    Lunch,
    Dinner,
    Snacks,
}

impl MealCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            MealCategory::Breakfast => "breakfast",
            MealCategory::Lunch => "lunch",
            MealCategory::Dinner => "dinner",
            MealCategory::Snacks => "snacks",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
    pub id: Uuid,

    #[schema(ignore)]
    pub mess_id: Uuid,

    #[schema(example = "Dal Makhani")]
    pub name: String,

    pub description: Option<String>,

    pub category: MealCategory,

    // 0 = domingo ... 6 = sábado
    #[schema(minimum = 0, maximum = 6)]
    pub day_of_week: i16,

    pub is_active: bool,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewMenuItem {
    #[validate(length(min = 1, message = "O nome do prato é obrigatório."))]
    pub name: String,

    pub description: Option<String>,

    pub category: MealCategory,

    #[validate(range(min = 0, max = 6, message = "O dia da semana deve estar entre 0 e 6."))]
    pub day_of_week: i16,

    pub is_active: Option<bool>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MenuPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<MealCategory>,
    pub day_of_week: Option<i16>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Default, Clone, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct MenuFilter {
    #[serde(default)]
    pub active_only: bool,
    pub day: Option<i16>,
}

// Um dia do cardápio semanal
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DayMenu {
    pub day_of_week: i16,
    #[schema(value_type = String, example = "Monday")]
    pub day_name: &'static str,
    pub items: Vec<MenuItem>,
}
