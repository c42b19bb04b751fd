// src/services/tenancy_service.rs

use std::sync::Arc;

use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    db::{MessStore, ProfileDirectory},
    models::{
        activity::NewActivity,
        auth::{CurrentUser, MeResponse},
        tenancy::{Mess, MessPatch, MessScope, NewMess, Profile, ProfileUpdate, Role},
    },
    services::{activity_service::ActivityLogger, report_cache::ReportCache},
};

// Quantos messes a tela de "entrar em um mess" mostra
pub const AVAILABLE_MESS_LIMIT: i64 = 10;

/// Resolve o usuário autenticado para o seu mess.
#[derive(Clone)]
pub struct TenantResolver {
    profiles: Arc<dyn ProfileDirectory>,
}

impl TenantResolver {
    pub fn new(profiles: Arc<dyn ProfileDirectory>) -> Self {
        Self { profiles }
    }

    /// `ProfileNotFound` sem perfil; `MessNotAssigned` quando o perfil ainda não tem mess
    /// (o cliente deve mostrar o onboarding, não um erro).
    pub async fn resolve_mess_id(&self, user_id: Uuid) -> Result<Uuid, AppError> {
        Ok(self.resolve_scope(user_id).await?.mess_id())
    }

    pub async fn resolve_scope(&self, user_id: Uuid) -> Result<MessScope, AppError> {
        let profile = self
            .profiles
            .find_by_user(user_id)
            .await?
            .ok_or(AppError::ProfileNotFound)?;

        let mess_id = profile.mess_id.ok_or(AppError::MessNotAssigned)?;
        Ok(MessScope::new(mess_id, user_id, profile.id, profile.role))
    }
}

/// Onboarding (criar / entrar) e dados do mess atual.
#[derive(Clone)]
pub struct MessService {
    messes: Arc<dyn MessStore>,
    profiles: Arc<dyn ProfileDirectory>,
    logger: ActivityLogger,
    cache: ReportCache,
}

impl MessService {
    pub fn new(
        messes: Arc<dyn MessStore>,
        profiles: Arc<dyn ProfileDirectory>,
        logger: ActivityLogger,
        cache: ReportCache,
    ) -> Self {
        Self { messes, profiles, logger, cache }
    }

    /// Perfil do usuário (criado no primeiro acesso) e o mess, se houver.
    pub async fn me(&self, user: &CurrentUser) -> Result<MeResponse, AppError> {
        let profile = self.profiles.ensure(user.id, None).await?;
        let mess = match profile.mess_id {
            Some(mess_id) => Some(self.messes.get(mess_id).await?),
            None => None,
        };
        Ok(MeResponse { profile, mess, email: user.email.clone() })
    }

    pub async fn update_me(&self, user: &CurrentUser, update: ProfileUpdate) -> Result<Profile, AppError> {
        update.validate()?;
        self.profiles.ensure(user.id, None).await?;
        let profile = self.profiles.update_own(user.id, update).await?;
        if let Some(mess_id) = profile.mess_id {
            self.cache.invalidate(mess_id);
        }
        Ok(profile)
    }

    pub async fn available(&self) -> Result<Vec<Mess>, AppError> {
        self.messes.list_available(AVAILABLE_MESS_LIMIT).await
    }

    /// Cria o mess e torna o criador admin, atomicamente.
    pub async fn create(&self, user: &CurrentUser, new: NewMess) -> Result<Mess, AppError> {
        new.validate()?;
        let profile = self.profiles.ensure(user.id, None).await?;
        if profile.mess_id.is_some() {
            return Err(AppError::ConstraintViolation("Você já pertence a um mess.".into()));
        }

        let (mess, _admin) = self.messes.create_with_admin(user.id, new).await?;

        self.logger.record(
            NewActivity::new(mess.id, user.id, "mess_created", format!("Mess '{}' criado", mess.name))
                .with_entity("mess", mess.id),
        );
        Ok(mess)
    }

    pub async fn join(&self, user: &CurrentUser, mess_id: Uuid) -> Result<Profile, AppError> {
        let profile = self.profiles.ensure(user.id, None).await?;
        if profile.mess_id.is_some() {
            return Err(AppError::ConstraintViolation("Você já pertence a um mess.".into()));
        }

        let mess = self.messes.get(mess_id).await?;
        let profile = self.profiles.assign_mess(user.id, mess.id, Role::Member).await?;

        self.cache.invalidate(mess.id);
        self.logger.record(
            NewActivity::new(
                mess.id,
                user.id,
                "member_joined",
                format!("{} entrou no mess", profile.display_name()),
            )
            .with_entity("member", profile.id),
        );
        Ok(profile)
    }

    pub async fn current(&self, scope: &MessScope) -> Result<Mess, AppError> {
        self.messes.get(scope.mess_id()).await
    }

    pub async fn update(&self, scope: &MessScope, patch: MessPatch) -> Result<Mess, AppError> {
        scope.ensure_role(Role::Admin)?;
        let mess = self.messes.update(scope.mess_id(), patch).await?;

        self.logger.record(
            NewActivity::new(mess.id, scope.user_id(), "mess_updated", format!("Dados do mess '{}' alterados", mess.name))
                .with_entity("mess", mess.id),
        );
        Ok(mess)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{settle, user, World};

    #[tokio::test]
    async fn resolver_distinguishes_missing_profile_from_missing_mess() {
        let world = World::new();
        let someone = user();

        assert!(matches!(
            world.resolver.resolve_mess_id(someone.id).await,
            Err(AppError::ProfileNotFound)
        ));

        world.mess_service.me(&someone).await.unwrap();
        assert!(matches!(
            world.resolver.resolve_mess_id(someone.id).await,
            Err(AppError::MessNotAssigned)
        ));
    }

    #[tokio::test]
    async fn create_makes_the_creator_admin_and_logs_once() {
        let world = World::new();
        let founder = user();

        let mess = world
            .mess_service
            .create(&founder, NewMess { name: "ITD Mess".into(), description: None, address: None })
            .await
            .unwrap();
        settle().await;

        let scope = world.resolver.resolve_scope(founder.id).await.unwrap();
        assert_eq!(scope.mess_id(), mess.id);
        assert_eq!(scope.role(), Role::Admin);

        let logged = world.activities.all();
        assert_eq!(logged.len(), 1);
        assert_eq!(logged[0].action, "mess_created");
    }

    #[tokio::test]
    async fn cannot_create_or_join_while_already_in_a_mess() {
        let world = World::new();
        let (founder, mess) = world.mess_with_admin("A").await;

        let again = world
            .mess_service
            .create(&founder, NewMess { name: "B".into(), description: None, address: None })
            .await;
        assert!(matches!(again, Err(AppError::ConstraintViolation(_))));
        assert!(matches!(
            world.mess_service.join(&founder, mess.id).await,
            Err(AppError::ConstraintViolation(_))
        ));
    }

    #[tokio::test]
    async fn join_assigns_member_role() {
        let world = World::new();
        let (_founder, mess) = world.mess_with_admin("A").await;
        let newcomer = user();

        let profile = world.mess_service.join(&newcomer, mess.id).await.unwrap();
        assert_eq!(profile.role, Role::Member);
        assert_eq!(world.resolver.resolve_mess_id(newcomer.id).await.unwrap(), mess.id);

        assert!(matches!(
            world.mess_service.join(&user(), Uuid::new_v4()).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn only_admins_edit_the_mess() {
        let world = World::new();
        let (founder, mess) = world.mess_with_admin("A").await;
        let member = user();
        world.mess_service.join(&member, mess.id).await.unwrap();

        let member_scope = world.resolver.resolve_scope(member.id).await.unwrap();
        let denied = world
            .mess_service
            .update(&member_scope, MessPatch { name: Some("B".into()), ..Default::default() })
            .await;
        assert!(matches!(denied, Err(AppError::PermissionDenied(_))));

        let admin_scope = world.resolver.resolve_scope(founder.id).await.unwrap();
        let updated = world
            .mess_service
            .update(&admin_scope, MessPatch { name: Some("B".into()), ..Default::default() })
            .await
            .unwrap();
        assert_eq!(updated.name, "B");
    }

    #[tokio::test]
    async fn available_is_limited() {
        let world = World::new();
        for i in 0..12 {
            world.mess_with_admin(&format!("Mess {}", i)).await;
        }
        assert_eq!(world.mess_service.available().await.unwrap().len(), AVAILABLE_MESS_LIMIT as usize);
    }
}
