// src/services/member_service.rs

use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    db::{MemberRepo, Repository},
    models::tenancy::{MemberFilter, MemberPatch, MessScope, Profile, Role},
};

#[derive(Clone)]
pub struct MemberService {
    members: MemberRepo,
}

impl MemberService {
    pub fn new(members: MemberRepo) -> Self {
        Self { members }
    }

    pub async fn list(&self, scope: &MessScope, filter: &MemberFilter) -> Result<Vec<Profile>, AppError> {
        self.members.list(scope, filter).await
    }

    /// Gerente ou admin edita dados do membro; mudar cargo é só para admin.
    /// O repositório garante que o mess nunca fica sem admin.
    pub async fn update(&self, scope: &MessScope, member_id: Uuid, patch: MemberPatch) -> Result<Profile, AppError> {
        scope.ensure_role(Role::Manager)?;
        patch.validate()?;
        if patch.role.is_some() {
            scope.ensure_role(Role::Admin)?;
        }

        self.members.update(scope, member_id, patch).await
    }

    /// Remove do mess (o perfil continua existindo, só fica sem mess).
    pub async fn remove(&self, scope: &MessScope, member_id: Uuid) -> Result<(), AppError> {
        scope.ensure_role(Role::Admin)?;
        self.members.delete(scope, member_id).await
    }
}
