use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::common::error::AppError;
use crate::models::tenancy::MessScope;

// ---
// Helper RLS: a "chave" para o banco de dados
// ---
/// Abre uma transação com as variáveis RLS do mess (`app.mess_id`, `app.user_id`).
/// `set_config(..., true)` vale só até o fim da transação, então a conexão volta limpa para a pool.
pub(crate) async fn begin_scoped(
    pool: &PgPool,
    scope: &MessScope,
) -> Result<Transaction<'static, Postgres>, AppError> {
    let mut tx = pool.begin().await?;

    sqlx::query("SELECT set_config('app.mess_id', $1, true)")
        .bind(scope.mess_id().to_string())
        .execute(&mut *tx)
        .await?;

    sqlx::query("SELECT set_config('app.user_id', $1, true)")
        .bind(scope.user_id().to_string())
        .execute(&mut *tx)
        .await?;

    Ok(tx)
}

/// Para operações de um usuário que ainda não tem mess (onboarding): só `app.user_id`.
pub(crate) async fn begin_for_user(
    pool: &PgPool,
    user_id: Uuid,
) -> Result<Transaction<'static, Postgres>, AppError> {
    let mut tx = pool.begin().await?;

    sqlx::query("SELECT set_config('app.user_id', $1, true)")
        .bind(user_id.to_string())
        .execute(&mut *tx)
        .await?;

    Ok(tx)
}
