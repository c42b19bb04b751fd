// src/models/auth.rs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::tenancy::{Mess, Profile};

// Claims emitidas pelo provedor de identidade. Este servidor só verifica, nunca emite.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,  // Subject (ID do usuário)
    pub exp: usize, // Expiration time
    #[serde(default)]
    pub iat: Option<usize>,
    #[serde(default)]
    pub email: Option<String>,
}

// Usuário autenticado, injetado nas extensions da requisição pelo auth_guard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser {
    pub id: Uuid,
    pub email: Option<String>,
}

// Resposta do GET /me: o perfil e, se houver, o mess atual.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MeResponse {
    pub profile: Profile,
    pub mess: Option<Mess>,
    pub email: Option<String>,
}
