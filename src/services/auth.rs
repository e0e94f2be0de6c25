// src/services/auth.rs

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    db::StoreRegistry,
    models::{
        auth::{
            AuthFailure, AuthTokens, ChangePasswordPayload, LoginPayload, NewUser,
            RegisterPayload, User, UserRole,
        },
        session::{EntityRef, Selection},
    },
    services::crm_service::log_delete,
};

/// Operações de conta que vivem no backend remoto.
#[async_trait]
pub trait AuthApi: Send + Sync {
    async fn login(&self, payload: &LoginPayload) -> Result<AuthTokens, AppError>;
    async fn register(&self, payload: &RegisterPayload) -> Result<Value, AppError>;
    async fn change_password(&self, payload: &ChangePasswordPayload) -> Result<(), AppError>;
    async fn logout(&self) -> Result<(), AppError>;
}

/// Classifica a mensagem de erro do backend por palavra-chave.
pub fn classify_auth_error(message: &str) -> AuthFailure {
    let message = message.to_lowercase();
    let has = |words: &[&str]| words.iter().any(|w| message.contains(w));

    if has(&["inactive"]) {
        AuthFailure::InactiveAccount
    } else if has(&["invalid", "incorrect", "credentials", "wrong"]) {
        AuthFailure::InvalidCredentials
    } else if has(&["match"]) {
        AuthFailure::PasswordMismatch
    } else if has(&["expired"]) {
        AuthFailure::SessionExpired
    } else {
        AuthFailure::Unknown
    }
}

// Erros "de negócio" do backend viram AuthFailure; falhas de rede e de sessão passam direto.
fn classify(err: AppError) -> AppError {
    match err {
        AppError::Upstream { status, message } if (400..500).contains(&status) => {
            match classify_auth_error(&message) {
                AuthFailure::SessionExpired => AppError::SessionExpired,
                failure => AppError::AuthFailure(failure),
            }
        }
        other => other,
    }
}

#[derive(Clone)]
pub struct AuthService {
    registry: StoreRegistry,
    remote: Option<Arc<dyn AuthApi>>,
}

impl AuthService {
    pub fn new(registry: StoreRegistry, remote: Option<Arc<dyn AuthApi>>) -> Self {
        Self { registry, remote }
    }

    fn remote(&self) -> Result<&Arc<dyn AuthApi>, AppError> {
        self.remote.as_ref().ok_or(AppError::RemoteNotConfigured)
    }

    // =========================================================================
    //  1. SESSÃO REMOTA
    // =========================================================================

    pub async fn login(&self, payload: LoginPayload) -> Result<AuthTokens, AppError> {
        payload.validate()?;
        let tokens = self.remote()?.login(&payload).await.map_err(classify)?;
        tracing::info!(email = %payload.email, "login aceito pelo backend");
        Ok(tokens)
    }

    pub async fn register(&self, payload: RegisterPayload) -> Result<Value, AppError> {
        payload.validate()?;
        let body = self.remote()?.register(&payload).await.map_err(classify)?;
        tracing::info!(email = %payload.email, "conta registrada no backend");
        Ok(body)
    }

    /// Confirmação divergente ou senha curta: erro de campo, sem chamada de rede.
    pub async fn change_password(&self, payload: ChangePasswordPayload) -> Result<(), AppError> {
        payload.validate()?;
        self.remote()?.change_password(&payload).await.map_err(classify)?;
        tracing::info!("senha alterada");
        Ok(())
    }

    pub async fn logout(&self) -> Result<(), AppError> {
        self.remote()?.logout().await
    }

    // =========================================================================
    //  2. USUÁRIOS DO TENANT
    // =========================================================================

    /// Resolve o usuário do cabeçalho. Conta inativa não passa.
    pub async fn resolve_user(&self, tenant_id: Uuid, user_id: i64) -> Result<User, AppError> {
        let store = self.registry.tenant(tenant_id).await;
        let guard = store.read().await;
        let user = guard.users.get(user_id).ok_or(AppError::Unauthenticated)?;
        if !user.is_active {
            return Err(AppError::AuthFailure(AuthFailure::InactiveAccount));
        }
        Ok(user.clone())
    }

    pub async fn create_user(&self, tenant_id: Uuid, payload: NewUser) -> Result<User, AppError> {
        let store = self.registry.tenant(tenant_id).await;
        let user = store.write().await.add_user(payload);
        tracing::info!(%tenant_id, user_id = user.id, role = ?user.role, "usuário criado");
        Ok(user)
    }

    pub async fn has_users(&self, tenant_id: Uuid) -> bool {
        let store = self.registry.tenant(tenant_id).await;
        !store.read().await.users.is_empty()
    }

    /// Primeiro usuário de um tenant vazio: vira Owner ativo.
    /// A checagem de "vazio" e a inserção acontecem sob o mesmo write lock.
    pub async fn bootstrap_owner(&self, tenant_id: Uuid, mut payload: NewUser) -> Result<User, AppError> {
        payload.role = UserRole::Owner;
        payload.is_active = true;

        let store = self.registry.tenant(tenant_id).await;
        let mut guard = store.write().await;
        if !guard.users.is_empty() {
            return Err(AppError::Unauthenticated);
        }
        let user = guard.add_user(payload);
        tracing::info!(%tenant_id, user_id = user.id, "primeiro Owner do tenant criado");
        Ok(user)
    }

    pub async fn list_users(&self, tenant_id: Uuid) -> Result<Vec<User>, AppError> {
        let store = self.registry.tenant(tenant_id).await;
        let users = store.read().await.users.all().to_vec();
        Ok(users)
    }

    pub async fn update_user(&self, tenant_id: Uuid, user: User) -> Result<User, AppError> {
        let store = self.registry.tenant(tenant_id).await;
        let user = store.write().await.update_user(user)?;
        Ok(user)
    }

    pub async fn delete_user(&self, tenant_id: Uuid, user_id: i64) -> Result<bool, AppError> {
        let store = self.registry.tenant(tenant_id).await;
        let removed = store.write().await.delete_user(user_id);
        log_delete(tenant_id, "user", user_id, removed);
        Ok(removed)
    }

    // --- Seleção atual do usuário ---

    pub async fn selection(&self, tenant_id: Uuid, user_id: i64) -> Result<Selection, AppError> {
        let store = self.registry.tenant(tenant_id).await;
        let selected = store.read().await.selection(user_id);
        Ok(Selection { selected })
    }

    /// Só aceita apontar para um registro que existe; `None` limpa a seleção.
    pub async fn select(
        &self,
        tenant_id: Uuid,
        user_id: i64,
        target: Option<EntityRef>,
    ) -> Result<Selection, AppError> {
        let store = self.registry.tenant(tenant_id).await;
        let mut guard = store.write().await;
        if let Some(target) = target {
            if !guard.contains_ref(target) {
                return Err(AppError::ResourceNotFound { entity: target.entity(), id: target.id() });
            }
        }
        guard.set_selection(user_id, target);
        Ok(Selection { selected: target })
    }
}
