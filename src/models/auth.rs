// src/models/auth.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::models::{crm::default_true, Record};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum UserRole {
    Owner,
    Admin,
    Manager,
    Sales,
}

// Representa um usuário do tenant
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    #[validate(length(min = 1, message = "required"))]
    pub name: String,
    #[validate(email(message = "invalid_email"))]
    pub email: String,
    pub phone: Option<String>,
    pub role: UserRole,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Só o proprietário vê (e executa) ações de criação.
    pub fn can_create(&self) -> bool {
        self.role == UserRole::Owner
    }
}

impl Record for User {
    const ENTITY: &'static str = "user";

    fn id(&self) -> i64 {
        self.id
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    #[validate(length(min = 1, message = "required"))]
    #[schema(example = "Omar Khaled")]
    pub name: String,
    #[validate(email(message = "invalid_email"))]
    #[schema(example = "omar@agency.com")]
    pub email: String,
    pub phone: Option<String>,
    pub role: UserRole,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

// Dados para login (repassados ao backend remoto)
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct LoginPayload {
    #[validate(email(message = "invalid_email"))]
    pub email: String,
    #[validate(length(min = 1, message = "required"))]
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterPayload {
    #[validate(length(min = 1, message = "required"))]
    pub name: String,
    #[validate(email(message = "invalid_email"))]
    pub email: String,
    #[validate(length(min = 8, message = "password_too_short"))]
    pub password: String,
}

/// Troca de senha. Validada localmente antes de qualquer chamada remota.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordPayload {
    #[validate(length(min = 1, message = "required"))]
    pub current_password: String,
    #[validate(length(min = 8, message = "password_too_short"))]
    pub new_password: String,
    #[validate(must_match(other = "new_password", message = "password_mismatch"))]
    pub confirm_password: String,
}

// Tokens devolvidos pelo backend remoto
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthTokens {
    pub access_token: String,
    pub refresh_token: String,
}

/// Classificação das mensagens de erro de autenticação do backend remoto.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthFailure {
    InactiveAccount,
    InvalidCredentials,
    PasswordMismatch,
    SessionExpired,
    Unknown,
}

impl AuthFailure {
    pub fn code(self) -> &'static str {
        match self {
            AuthFailure::InactiveAccount => "account_inactive",
            AuthFailure::InvalidCredentials => "invalid_credentials",
            AuthFailure::PasswordMismatch => "password_mismatch",
            AuthFailure::SessionExpired => "session_expired",
            AuthFailure::Unknown => "auth_failed",
        }
    }
}
