// src/middleware/rbac.rs

use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use uuid::Uuid;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{auth::AuthenticatedUser, i18n::Locale, tenancy::TenantContext},
};

/// Guardião das rotas de criação: só o Owner passa (403 para os demais).
pub struct RequireOwner(pub AuthenticatedUser);

impl RequireOwner {
    fn check(current: AuthenticatedUser) -> Result<Self, AppError> {
        if !current.user.can_create() {
            tracing::warn!(
                tenant_id = %current.tenant_id,
                user_id = current.user.id,
                role = ?current.user.role,
                "criação recusada: usuário não é Owner"
            );
            return Err(AppError::OwnerRequired);
        }
        Ok(RequireOwner(current))
    }
}

impl<S> FromRequestParts<S> for RequireOwner
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);
        let locale = Locale::from_headers(&parts.headers);

        let current = AuthenticatedUser::resolve(parts, &app_state)
            .await
            .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

        RequireOwner::check(current).map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))
    }
}

/// Quem pode criar usuários: o Owner, ou qualquer um enquanto o tenant não tem usuários.
pub enum UserCreator {
    Owner(AuthenticatedUser),
    FirstOwner(Uuid),
}

impl UserCreator {
    async fn resolve(parts: &Parts, app_state: &AppState) -> Result<Self, AppError> {
        let tenant = TenantContext::from_parts(parts)?;
        if !app_state.auth_service.has_users(tenant.0).await {
            return Ok(UserCreator::FirstOwner(tenant.0));
        }

        let current = AuthenticatedUser::resolve(parts, app_state).await?;
        let RequireOwner(owner) = RequireOwner::check(current)?;
        Ok(UserCreator::Owner(owner))
    }
}

impl<S> FromRequestParts<S> for UserCreator
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);
        UserCreator::resolve(parts, &app_state).await.map_err(|e| {
            e.to_api_error(&Locale::from_headers(&parts.headers), &app_state.i18n_store)
        })
    }
}
