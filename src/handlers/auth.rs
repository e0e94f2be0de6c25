// src/handlers/auth.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{auth::AuthenticatedUser, i18n::Locale, rbac::UserCreator},
    models::{
        auth::{AuthTokens, ChangePasswordPayload, LoginPayload, NewUser, RegisterPayload, User},
        session::Selection,
    },
};

// =============================================================================
//  ÁREA 1: CONTA (BACKEND REMOTO)
// =============================================================================

// POST /api/auth/login
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "Auth",
    request_body = LoginPayload,
    responses(
        (status = 200, description = "Tokens emitidos pelo backend", body = AuthTokens),
        (status = 401, description = "Credenciais inválidas"),
        (status = 403, description = "Conta inativa"),
        (status = 503, description = "Backend remoto não configurado")
    )
)]
pub async fn login(
    State(app_state): State<AppState>,
    locale: Locale,
    Json(payload): Json<LoginPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let tokens = app_state
        .auth_service
        .login(payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(tokens)))
}

// POST /api/auth/register
#[utoipa::path(
    post,
    path = "/api/auth/register",
    tag = "Auth",
    request_body = RegisterPayload,
    responses(
        (status = 201, description = "Conta criada no backend"),
        (status = 400, description = "Dados inválidos")
    )
)]
pub async fn register(
    State(app_state): State<AppState>,
    locale: Locale,
    Json(payload): Json<RegisterPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let body = app_state
        .auth_service
        .register(payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(body)))
}

// POST /api/auth/change-password
#[utoipa::path(
    post,
    path = "/api/auth/change-password",
    tag = "Auth",
    request_body = ChangePasswordPayload,
    responses(
        (status = 200, description = "Senha alterada"),
        (status = 400, description = "Confirmação divergente ou senha curta (nada é enviado)"),
        (status = 401, description = "Senha atual incorreta ou sessão expirada")
    )
)]
pub async fn change_password(
    State(app_state): State<AppState>,
    locale: Locale,
    _current: AuthenticatedUser,
    Json(payload): Json<ChangePasswordPayload>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .auth_service
        .change_password(payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(json!({ "changed": true }))))
}

// POST /api/auth/logout
#[utoipa::path(
    post,
    path = "/api/auth/logout",
    tag = "Auth",
    responses((status = 204, description = "Tokens locais apagados"))
)]
pub async fn logout(
    State(app_state): State<AppState>,
    locale: Locale,
    _current: AuthenticatedUser,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .auth_service
        .logout()
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
//  ÁREA 2: USUÁRIOS DO TENANT
// =============================================================================

// GET /api/users/me
#[utoipa::path(
    get,
    path = "/api/users/me",
    tag = "Users",
    params(
        ("x-tenant-id" = Uuid, Header, description = "ID do tenant"),
        ("x-user-id" = i64, Header, description = "Usuário atual")
    ),
    responses((status = 200, description = "Usuário atual", body = User))
)]
pub async fn get_me(current: AuthenticatedUser) -> Json<User> {
    Json(current.user)
}

// GET /api/users
#[utoipa::path(
    get,
    path = "/api/users",
    tag = "Users",
    responses((status = 200, description = "Usuários do tenant", body = Vec<User>))
)]
pub async fn list_users(
    State(app_state): State<AppState>,
    locale: Locale,
    current: AuthenticatedUser,
) -> Result<impl IntoResponse, ApiError> {
    let users = app_state
        .auth_service
        .list_users(current.tenant_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(users)))
}

// POST /api/users
#[utoipa::path(
    post,
    path = "/api/users",
    tag = "Users",
    request_body = NewUser,
    responses(
        (status = 201, description = "Usuário criado (o primeiro de um tenant vazio vira Owner)", body = User),
        (status = 401, description = "Tenant já tem usuários e o cabeçalho x-user-id não resolve"),
        (status = 403, description = "Apenas o Owner cria registros")
    )
)]
pub async fn create_user(
    State(app_state): State<AppState>,
    locale: Locale,
    creator: UserCreator,
    Json(payload): Json<NewUser>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let user = match creator {
        UserCreator::Owner(current) => app_state.auth_service.create_user(current.tenant_id, payload).await,
        UserCreator::FirstOwner(tenant_id) => {
            app_state.auth_service.bootstrap_owner(tenant_id, payload).await
        }
    }
    .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(user)))
}

// PUT /api/users/{id}
#[utoipa::path(
    put,
    path = "/api/users/{id}",
    tag = "Users",
    request_body = User,
    params(("id" = i64, Path, description = "ID do usuário")),
    responses(
        (status = 200, description = "Usuário atualizado", body = User),
        (status = 404, description = "Usuário não encontrado")
    )
)]
pub async fn update_user(
    State(app_state): State<AppState>,
    locale: Locale,
    current: AuthenticatedUser,
    Path(user_id): Path<i64>,
    Json(mut user): Json<User>,
) -> Result<impl IntoResponse, ApiError> {
    user.id = user_id;
    user.validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let user = app_state
        .auth_service
        .update_user(current.tenant_id, user)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(user)))
}

// DELETE /api/users/{id}
#[utoipa::path(
    delete,
    path = "/api/users/{id}",
    tag = "Users",
    params(("id" = i64, Path, description = "ID do usuário")),
    responses((status = 204, description = "Removido (ou já inexistente)"))
)]
pub async fn delete_user(
    State(app_state): State<AppState>,
    locale: Locale,
    current: AuthenticatedUser,
    Path(user_id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .auth_service
        .delete_user(current.tenant_id, user_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
//  ÁREA 3: SELEÇÃO ATUAL
// =============================================================================

// GET /api/selection
#[utoipa::path(
    get,
    path = "/api/selection",
    tag = "Users",
    responses((status = 200, description = "Registro selecionado pelo usuário", body = Selection))
)]
pub async fn get_selection(
    State(app_state): State<AppState>,
    locale: Locale,
    current: AuthenticatedUser,
) -> Result<impl IntoResponse, ApiError> {
    let selection = app_state
        .auth_service
        .selection(current.tenant_id, current.user.id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(selection)))
}

// PUT /api/selection
#[utoipa::path(
    put,
    path = "/api/selection",
    tag = "Users",
    request_body = Selection,
    responses(
        (status = 200, description = "Seleção trocada (null limpa)", body = Selection),
        (status = 404, description = "Registro apontado não existe")
    )
)]
pub async fn set_selection(
    State(app_state): State<AppState>,
    locale: Locale,
    current: AuthenticatedUser,
    Json(payload): Json<Selection>,
) -> Result<impl IntoResponse, ApiError> {
    let selection = app_state
        .auth_service
        .select(current.tenant_id, current.user.id, payload.selected)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(selection)))
}
