// src/middleware/tenancy.rs

use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use uuid::Uuid;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::i18n::Locale,
};

// O nome do nosso cabeçalho HTTP customizado
pub const TENANT_ID_HEADER: &str = "x-tenant-id";

/// Tenant da requisição. Cada tenant tem o seu próprio EntityStore.
#[derive(Debug, Clone, Copy)]
pub struct TenantContext(pub Uuid);

impl TenantContext {
    pub fn from_parts(parts: &Parts) -> Result<Self, AppError> {
        parts
            .headers
            .get(TENANT_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| Uuid::parse_str(value.trim()).ok())
            .map(TenantContext)
            .ok_or(AppError::InvalidTenant)
    }
}

impl<S> FromRequestParts<S> for TenantContext
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        TenantContext::from_parts(parts).map_err(|e| {
            let app_state = AppState::from_ref(state);
            e.to_api_error(&Locale::from_headers(&parts.headers), &app_state.i18n_store)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn parts(tenant: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri("/api/leads");
        if let Some(value) = tenant {
            builder = builder.header(TENANT_ID_HEADER, value);
        }
        builder.body(()).expect("request").into_parts().0
    }

    #[test]
    fn parses_a_uuid_header() {
        let id = Uuid::new_v4();
        let ctx = TenantContext::from_parts(&parts(Some(&id.to_string()))).expect("tenant");
        assert_eq!(ctx.0, id);
    }

    #[test]
    fn missing_or_malformed_header_is_rejected() {
        assert!(matches!(TenantContext::from_parts(&parts(None)), Err(AppError::InvalidTenant)));
        assert!(matches!(
            TenantContext::from_parts(&parts(Some("loja-1"))),
            Err(AppError::InvalidTenant)
        ));
    }
}
