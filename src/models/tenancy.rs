// src/models/tenancy.rs

use serde::{Serialize, Deserialize};
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::common::error::AppError;

// ---
// 1. Mess (o "Tenant")
// ---
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Mess {
    pub id: Uuid,
    #[schema(example = "ITD Mess")]
    pub name: String,
    pub description: Option<String>,
    #[schema(example = "Hostel 4, Campus Road")]
    pub address: Option<String>,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewMess {
    #[validate(length(min = 1, message = "O nome do mess é obrigatório."))]
    pub name: String,
    pub description: Option<String>,
    pub address: Option<String>,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MessPatch {
    #[validate(length(min = 1, message = "O nome do mess não pode ficar vazio."))]
    pub name: Option<String>,
    pub description: Option<String>,
    pub address: Option<String>,
}

// ---
// 2. Role (cargo dentro do mess)
// ---
// A ordem de declaração define a hierarquia: member < manager < admin.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "member_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Member,
    Manager,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Member => "member",
            Role::Manager => "manager",
            Role::Admin => "admin",
        }
    }
}

// ---
// 3. Profile (o "Membro")
// ---
// Criado no primeiro login; `mess_id = None` significa "sem mess" (onboarding).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub id: Uuid,
    pub user_id: Uuid,
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub role: Role,
    pub mess_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Profile {
    pub fn display_name(&self) -> String {
        self.full_name
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| self.user_id.to_string())
    }
}

// Membros não são criados pelo repositório de membros: entram pelo join do mess.
#[derive(Debug, Validate)]
pub struct NewMember {
    pub user_id: Uuid,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MemberPatch {
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub role: Option<Role>,
}

// Dados que o próprio usuário pode alterar no seu perfil (tela de Settings).
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    #[validate(length(min = 1, message = "O nome não pode ficar vazio."))]
    pub full_name: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Default, Clone, Deserialize, utoipa::IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct MemberFilter {
    pub role: Option<Role>,
}

// ---
// 4. MessScope (contexto autenticado do tenant)
// ---
// Só o TenantResolver constrói isto: os repositórios nunca recebem um mess_id solto do cliente.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessScope {
    mess_id: Uuid,
    user_id: Uuid,
    profile_id: Uuid,
    role: Role,
}

impl MessScope {
    pub(crate) fn new(mess_id: Uuid, user_id: Uuid, profile_id: Uuid, role: Role) -> Self {
        Self { mess_id, user_id, profile_id, role }
    }

    pub fn mess_id(&self) -> Uuid {
        self.mess_id
    }

    pub fn user_id(&self) -> Uuid {
        self.user_id
    }

    pub fn profile_id(&self) -> Uuid {
        self.profile_id
    }

    pub fn role(&self) -> Role {
        self.role
    }

    /// Falha com `PermissionDenied` quando o cargo do membro está abaixo de `minimum`.
    pub fn ensure_role(&self, minimum: Role) -> Result<(), AppError> {
        if self.role >= minimum {
            return Ok(());
        }
        Err(AppError::PermissionDenied(format!(
            "Esta ação exige o cargo '{}'.",
            minimum.as_str()
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scope_with(role: Role) -> MessScope {
        MessScope::new(Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4(), role)
    }

    #[test]
    fn roles_rank_member_manager_admin() {
        assert!(Role::Member < Role::Manager);
        assert!(Role::Manager < Role::Admin);
        assert_eq!(Role::default(), Role::Member);
    }

    #[test]
    fn ensure_role_allows_equal_or_higher() {
        assert!(scope_with(Role::Manager).ensure_role(Role::Manager).is_ok());
        assert!(scope_with(Role::Admin).ensure_role(Role::Manager).is_ok());
    }

    #[test]
    fn ensure_role_denies_lower() {
        let err = scope_with(Role::Member).ensure_role(Role::Admin).unwrap_err();
        assert!(matches!(err, AppError::PermissionDenied(_)));
    }
}
