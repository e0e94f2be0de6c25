// src/common/error.rs

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use thiserror::Error;

use crate::{
    common::i18n::I18nStore,
    middleware::i18n::Locale,
    models::auth::AuthFailure,
};

// Erros de domínio. Os handlers convertem para ApiError (com idioma).
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("{entity} {id} não encontrado")]
    ResourceNotFound { entity: &'static str, id: i64 },

    #[error("Transição inválida de '{from}' para '{to}'")]
    InvalidTransition { from: String, to: String },

    #[error("{entity} {id} ainda é referenciado por {count} registro(s) de {dependent}")]
    ReferenceConflict {
        entity: &'static str,
        id: i64,
        dependent: &'static str,
        count: usize,
    },

    #[error("Usuário não autenticado")]
    Unauthenticated,

    #[error("Ação permitida apenas ao proprietário")]
    OwnerRequired,

    #[error("Cabeçalho X-Tenant-ID inválido ou ausente")]
    InvalidTenant,

    #[error("Sessão expirada")]
    SessionExpired,

    #[error("Falha de autenticação: {0:?}")]
    AuthFailure(AuthFailure),

    #[error("Backend remoto respondeu {status}: {message}")]
    Upstream { status: u16, message: String },

    #[error("Backend remoto não configurado")]
    RemoteNotConfigured,

    #[error("Falha de comunicação com o backend remoto: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Erro de I/O: {0}")]
    Io(#[from] std::io::Error),

    #[error("Erro de JSON: {0}")]
    Json(#[from] serde_json::Error),

    // `anyhow::Error` captura o contexto de qualquer outra falha.
    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),
}

impl AppError {
    /// Código estável da mensagem; a tradução fica no I18nStore.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::ValidationError(_) => "validation_failed",
            AppError::ResourceNotFound { .. } => "not_found",
            AppError::InvalidTransition { .. } => "invalid_transition",
            AppError::ReferenceConflict { .. } => "reference_conflict",
            AppError::Unauthenticated => "unauthenticated",
            AppError::OwnerRequired => "owner_required",
            AppError::InvalidTenant => "invalid_tenant",
            AppError::SessionExpired => "session_expired",
            AppError::AuthFailure(failure) => failure.code(),
            AppError::Upstream { .. } | AppError::HttpError(_) => "upstream_error",
            AppError::RemoteNotConfigured => "remote_not_configured",
            AppError::Io(_) | AppError::Json(_) | AppError::InternalServerError(_) => {
                "internal_error"
            }
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::ResourceNotFound { .. } => StatusCode::NOT_FOUND,
            AppError::InvalidTransition { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::ReferenceConflict { .. } => StatusCode::CONFLICT,
            AppError::Unauthenticated | AppError::SessionExpired => StatusCode::UNAUTHORIZED,
            AppError::OwnerRequired => StatusCode::FORBIDDEN,
            AppError::InvalidTenant => StatusCode::BAD_REQUEST,
            AppError::AuthFailure(AuthFailure::InactiveAccount) => StatusCode::FORBIDDEN,
            AppError::AuthFailure(_) => StatusCode::UNAUTHORIZED,
            AppError::Upstream { .. } | AppError::HttpError(_) => StatusCode::BAD_GATEWAY,
            AppError::RemoteNotConfigured => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Io(_) | AppError::Json(_) | AppError::InternalServerError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Converte o erro de domínio na resposta HTTP, no idioma do cliente.
    pub fn to_api_error(self, locale: &Locale, i18n: &I18nStore) -> ApiError {
        let status = self.status();
        let error = i18n.message(locale.0, self.code());

        let details = match &self {
            AppError::ValidationError(errors) => {
                let mut fields = serde_json::Map::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<Value> = field_errors
                        .iter()
                        .map(|e| {
                            let code = e.message.as_deref().unwrap_or(e.code.as_ref());
                            Value::String(i18n.message(locale.0, code))
                        })
                        .collect();
                    fields.insert(field.to_string(), Value::Array(messages));
                }
                Some(Value::Object(fields))
            }
            AppError::ResourceNotFound { entity, id } => {
                Some(json!({ "entity": entity, "id": id }))
            }
            AppError::InvalidTransition { from, to } => Some(json!({ "from": from, "to": to })),
            AppError::ReferenceConflict { entity, id, dependent, count } => Some(json!({
                "entity": entity,
                "id": id,
                "dependent": dependent,
                "count": count,
            })),
            AppError::SessionExpired | AppError::AuthFailure(AuthFailure::SessionExpired) => {
                Some(json!({ "redirect": "/login" }))
            }
            AppError::Upstream { status, .. } => Some(json!({ "upstreamStatus": status })),
            _ => None,
        };

        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!("Erro Interno do Servidor: {}", self);
        }

        ApiError { status, error, details }
    }
}

// O erro que efetivamente vai para o cliente.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub error: String,
    pub details: Option<Value>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = match self.details {
            Some(details) => json!({ "error": self.error, "details": details }),
            None => json!({ "error": self.error }),
        };
        (self.status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::settings::Language;

    #[test]
    fn validation_errors_carry_translated_field_details() {
        let mut errors = validator::ValidationErrors::new();
        let mut err = validator::ValidationError::new("must_match");
        err.message = Some("password_mismatch".into());
        errors.add("confirmPassword", err);

        let api = AppError::ValidationError(errors)
            .to_api_error(&Locale(Language::En), &I18nStore::new());

        assert_eq!(api.status, StatusCode::BAD_REQUEST);
        let details = api.details.expect("details");
        let messages = details["confirmPassword"].as_array().expect("array");
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0], "Passwords do not match.");
    }

    #[test]
    fn session_expiry_points_the_client_to_login() {
        let api = AppError::SessionExpired.to_api_error(&Locale(Language::En), &I18nStore::new());
        assert_eq!(api.status, StatusCode::UNAUTHORIZED);
        assert_eq!(api.details.expect("details")["redirect"], "/login");
    }

    #[test]
    fn reference_conflict_maps_to_409() {
        let err = AppError::ReferenceConflict {
            entity: "lead",
            id: 3,
            dependent: "deal",
            count: 2,
        };
        assert_eq!(err.status(), StatusCode::CONFLICT);
        assert_eq!(err.code(), "reference_conflict");
    }
}
