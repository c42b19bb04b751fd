// src/db/profile_repo.rs

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder, Transaction};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::{db_utils::{begin_for_user, begin_scoped}, error::AppError},
    db::repository::{Entity, Patch, ProfileDirectory, Repository},
    models::{
        notification::{ChangedRecord, Table},
        tenancy::{MemberFilter, MemberPatch, MessScope, NewMember, Profile, ProfileUpdate, Role},
    },
};

impl Entity for Profile {
    const NAME: &'static str = "member";
    const LABEL: &'static str = "membro";
    const TABLE: Table = Table::Profiles;

    fn id(&self) -> Uuid {
        self.id
    }

    fn summary(&self) -> String {
        format!("{} ({})", self.display_name(), self.role.as_str())
    }

    fn check(&self) -> Result<(), AppError> {
        if self.full_name.as_deref().is_some_and(|n| n.trim().is_empty()) {
            return Err(AppError::ConstraintViolation("O nome não pode ficar vazio.".into()));
        }
        Ok(())
    }

    fn to_change(&self) -> ChangedRecord {
        ChangedRecord::Profile(self.clone())
    }
}

impl Patch<Profile> for MemberPatch {
    fn apply(self, profile: &mut Profile) {
        if let Some(full_name) = self.full_name {
            profile.full_name = Some(full_name);
        }
        if let Some(phone) = self.phone {
            profile.phone = Some(phone);
        }
        if let Some(role) = self.role {
            profile.role = role;
        }
    }
}

// Tabela `profiles`: vista como membros (com escopo) e como diretório por user_id (sem escopo).
#[derive(Clone)]
pub struct ProfileRepository {
    pool: PgPool,
}

impl ProfileRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Repository for ProfileRepository {
    type Record = Profile;
    type New = NewMember;
    type Patch = MemberPatch;
    type Filter = MemberFilter;

    async fn list(&self, scope: &MessScope, filter: &MemberFilter) -> Result<Vec<Profile>, AppError> {
        let mut tx = begin_scoped(&self.pool, scope).await?;

        let mut qb = QueryBuilder::<Postgres>::new("SELECT * FROM profiles WHERE mess_id = ");
        qb.push_bind(scope.mess_id());
        if let Some(role) = filter.role {
            qb.push(" AND role = ").push_bind(role);
        }
        qb.push(" ORDER BY created_at DESC");

        let members = qb.build_query_as::<Profile>().fetch_all(&mut *tx).await?;
        tx.commit().await?;
        Ok(members)
    }

    async fn get(&self, scope: &MessScope, id: Uuid) -> Result<Profile, AppError> {
        let mut tx = begin_scoped(&self.pool, scope).await?;

        let member = sqlx::query_as::<_, Profile>(
            "SELECT * FROM profiles WHERE id = $1 AND mess_id = $2",
        )
            .bind(id)
            .bind(scope.mess_id())
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(AppError::NotFound(Profile::LABEL))?;

        tx.commit().await?;
        Ok(member)
    }

    async fn insert(&self, _scope: &MessScope, _new: NewMember) -> Result<Profile, AppError> {
        Err(AppError::ConstraintViolation("Membros entram no mess pelo convite de entrada.".into()))
    }

    async fn update(&self, scope: &MessScope, id: Uuid, patch: MemberPatch) -> Result<Profile, AppError> {
        let mut tx = begin_scoped(&self.pool, scope).await?;
        let admins = lock_admins(&mut tx, scope.mess_id()).await?;

        let mut member = sqlx::query_as::<_, Profile>(
            "SELECT * FROM profiles WHERE id = $1 AND mess_id = $2 FOR UPDATE",
        )
            .bind(id)
            .bind(scope.mess_id())
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(AppError::NotFound(Profile::LABEL))?;

        patch.apply(&mut member);
        member.check()?;
        if member.role < Role::Admin {
            ensure_admin_remains(&admins, id)?;
        }

        let updated = sqlx::query_as::<_, Profile>(
            r#"
            UPDATE profiles
            SET full_name = $3, phone = $4, role = $5, updated_at = NOW()
            WHERE id = $1 AND mess_id = $2
            RETURNING *
            "#,
        )
            .bind(id)
            .bind(scope.mess_id())
            .bind(&member.full_name)
            .bind(&member.phone)
            .bind(member.role)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(updated)
    }

    // O perfil pertence à identidade do usuário: remover do mess = desvincular.
    async fn delete(&self, scope: &MessScope, id: Uuid) -> Result<(), AppError> {
        let mut tx = begin_scoped(&self.pool, scope).await?;
        let admins = lock_admins(&mut tx, scope.mess_id()).await?;
        ensure_admin_remains(&admins, id)?;

        let result = sqlx::query(
            r#"
            UPDATE profiles
            SET mess_id = NULL, role = 'member', updated_at = NOW()
            WHERE id = $1 AND mess_id = $2
            "#,
        )
            .bind(id)
            .bind(scope.mess_id())
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(Profile::LABEL));
        }

        tx.commit().await?;
        Ok(())
    }
}

// Trava as linhas de admin do mess até o fim da transação. Duas retiradas de admin
// simultâneas ficam em fila e a segunda já enxerga o resultado da primeira.
async fn lock_admins(tx: &mut Transaction<'_, Postgres>, mess_id: Uuid) -> Result<Vec<Uuid>, AppError> {
    let admins = sqlx::query_scalar::<_, Uuid>(
        "SELECT id FROM profiles WHERE mess_id = $1 AND role = 'admin' ORDER BY id FOR UPDATE",
    )
        .bind(mess_id)
        .fetch_all(&mut **tx)
        .await?;
    Ok(admins)
}

/// O mess precisa de pelo menos um admin depois que `leaving` deixa de sê-lo.
pub(crate) fn ensure_admin_remains(admins: &[Uuid], leaving: Uuid) -> Result<(), AppError> {
    if admins.iter().any(|id| *id != leaving) {
        return Ok(());
    }
    Err(AppError::ConstraintViolation("O mess precisa de pelo menos um admin.".into()))
}

#[async_trait]
impl ProfileDirectory for ProfileRepository {
    async fn find_by_user(&self, user_id: Uuid) -> Result<Option<Profile>, AppError> {
        let profile = sqlx::query_as::<_, Profile>("SELECT * FROM profiles WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(profile)
    }

    async fn ensure(&self, user_id: Uuid, full_name: Option<String>) -> Result<Profile, AppError> {
        let mut tx = begin_for_user(&self.pool, user_id).await?;

        sqlx::query(
            "INSERT INTO profiles (user_id, full_name) VALUES ($1, $2) ON CONFLICT (user_id) DO NOTHING",
        )
            .bind(user_id)
            .bind(full_name)
            .execute(&mut *tx)
            .await?;

        let profile = sqlx::query_as::<_, Profile>("SELECT * FROM profiles WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(profile)
    }

    async fn assign_mess(&self, user_id: Uuid, mess_id: Uuid, role: Role) -> Result<Profile, AppError> {
        let mut tx = begin_for_user(&self.pool, user_id).await?;

        let profile = sqlx::query_as::<_, Profile>(
            r#"
            UPDATE profiles
            SET mess_id = $2, role = $3, updated_at = NOW()
            WHERE user_id = $1
            RETURNING *
            "#,
        )
            .bind(user_id)
            .bind(mess_id)
            .bind(role)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(AppError::ProfileNotFound)?;

        tx.commit().await?;
        Ok(profile)
    }

    async fn update_own(&self, user_id: Uuid, update: ProfileUpdate) -> Result<Profile, AppError> {
        update.validate()?;

        let profile = sqlx::query_as::<_, Profile>(
            r#"
            UPDATE profiles
            SET full_name = COALESCE($2, full_name),
                phone = COALESCE($3, phone),
                updated_at = NOW()
            WHERE user_id = $1
            RETURNING *
            "#,
        )
            .bind(user_id)
            .bind(update.full_name)
            .bind(update.phone)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(AppError::ProfileNotFound)?;

        Ok(profile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn member_patch_only_touches_given_fields() {
        let mut profile = Profile {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            full_name: Some("Asha".into()),
            phone: Some("111".into()),
            role: Role::Member,
            mess_id: Some(Uuid::new_v4()),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        MemberPatch { role: Some(Role::Manager), ..Default::default() }.apply(&mut profile);

        assert_eq!(profile.role, Role::Manager);
        assert_eq!(profile.full_name.as_deref(), Some("Asha"));
        assert_eq!(profile.phone.as_deref(), Some("111"));
        assert_eq!(profile.summary(), "Asha (manager)");
    }

    #[test]
    fn admin_may_leave_only_when_another_remains() {
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());

        assert!(ensure_admin_remains(&[a, b], a).is_ok());
        // Quem sai não é admin: nada muda
        assert!(ensure_admin_remains(&[a], b).is_ok());
        assert!(matches!(ensure_admin_remains(&[a], a), Err(AppError::ConstraintViolation(_))));
        assert!(matches!(ensure_admin_remains(&[], a), Err(AppError::ConstraintViolation(_))));
    }

    #[tokio::test]
    async fn members_are_never_inserted_directly() {
        // Pool preguiçoso: a recusa acontece antes de qualquer conexão.
        let pool = PgPool::connect_lazy("postgres://localhost/mess").unwrap();
        let repo = ProfileRepository::new(pool);
        let scope = MessScope::new(Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4(), Role::Admin);

        let attempt = repo.insert(&scope, NewMember { user_id: Uuid::new_v4() }).await;
        assert!(matches!(attempt, Err(AppError::ConstraintViolation(_))));
    }
}
