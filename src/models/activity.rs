// src/models/activity.rs

use serde::{Serialize, Deserialize};
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

// Linha do log de auditoria (somente inserção).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub id: Uuid,
    #[schema(ignore)]
    pub mess_id: Uuid,
    pub user_id: Uuid,
    #[schema(example = "expense_created")]
    pub action: String,
    #[schema(example = "Despesa 'Arroz 25kg' criada")]
    pub description: String,
    #[schema(example = "expense")]
    pub entity_type: Option<String>,
    pub entity_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewActivity {
    pub mess_id: Uuid,
    pub user_id: Uuid,
    pub action: String,
    pub description: String,
    pub entity_type: Option<String>,
    pub entity_id: Option<Uuid>,
}

#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ActivityQuery {
    /// Padrão 20, máximo 100
    pub limit: Option<i64>,
}

impl ActivityQuery {
    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(20).clamp(1, 100)
    }
}

impl NewActivity {
    pub fn new(
        mess_id: Uuid,
        user_id: Uuid,
        action: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            mess_id,
            user_id,
            action: action.into(),
            description: description.into(),
            entity_type: None,
            entity_id: None,
        }
    }

    pub fn with_entity(mut self, entity_type: &str, entity_id: Uuid) -> Self {
        self.entity_type = Some(entity_type.to_string());
        self.entity_id = Some(entity_id);
        self
    }
}
