// src/middleware/auth.rs

use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use uuid::Uuid;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{i18n::Locale, tenancy::TenantContext},
    models::auth::User,
};

pub const USER_ID_HEADER: &str = "x-user-id";

/// Usuário da requisição, já resolvido no store do tenant.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub tenant_id: Uuid,
    pub user: User,
}

impl AuthenticatedUser {
    pub(crate) async fn resolve(parts: &Parts, app_state: &AppState) -> Result<Self, AppError> {
        let tenant = TenantContext::from_parts(parts)?;

        let user_id = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.trim().parse::<i64>().ok())
            .ok_or(AppError::Unauthenticated)?;

        let user = app_state.auth_service.resolve_user(tenant.0, user_id).await?;
        Ok(AuthenticatedUser { tenant_id: tenant.0, user })
    }
}

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);
        AuthenticatedUser::resolve(parts, &app_state).await.map_err(|e| {
            tracing::debug!("requisição sem usuário válido: {}", e);
            e.to_api_error(&Locale::from_headers(&parts.headers), &app_state.i18n_store)
        })
    }
}
