// src/middleware/tenancy.rs

use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};

use crate::{
    common::error::ApiError,
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::tenancy::MessScope,
};

/// Mess do usuário autenticado, resolvido pelo perfil. O cliente nunca informa o mess_id.
/// Sem mess associado a rejeição é `MessNotAssigned` (o front mostra o onboarding).
#[derive(Debug, Clone)]
pub struct MessContext(pub MessScope);

impl<S> FromRequestParts<S> for MessContext
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let AuthenticatedUser(user) = AuthenticatedUser::from_request_parts(parts, state).await?;
        let app_state = AppState::from_ref(state);

        let scope = app_state.resolver.resolve_scope(user.id).await?;
        Ok(MessContext(scope))
    }
}
