// src/handlers/settings.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use validator::Validate;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{auth::AuthenticatedUser, i18n::Locale},
    models::settings::{BrandColorPayload, LanguagePayload, LogoPayload, Preferences},
};

// GET /api/settings
#[utoipa::path(
    get,
    path = "/api/settings",
    tag = "Settings",
    responses((status = 200, description = "Preferências atuais (com defaults)", body = Preferences))
)]
pub async fn get_settings(
    State(app_state): State<AppState>,
    locale: Locale,
    _current: AuthenticatedUser,
) -> Result<impl IntoResponse, ApiError> {
    let prefs = app_state
        .settings_service
        .preferences()
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(prefs)))
}

// POST /api/settings/theme/toggle
#[utoipa::path(
    post,
    path = "/api/settings/theme/toggle",
    tag = "Settings",
    responses((status = 200, description = "Tema alternado e gravado", body = Preferences))
)]
pub async fn toggle_theme(
    State(app_state): State<AppState>,
    locale: Locale,
    _current: AuthenticatedUser,
) -> Result<impl IntoResponse, ApiError> {
    let prefs = app_state
        .settings_service
        .toggle_theme()
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(prefs)))
}

// PUT /api/settings/language
#[utoipa::path(
    put,
    path = "/api/settings/language",
    tag = "Settings",
    request_body = LanguagePayload,
    responses((status = 200, description = "Idioma gravado", body = Preferences))
)]
pub async fn set_language(
    State(app_state): State<AppState>,
    locale: Locale,
    _current: AuthenticatedUser,
    Json(payload): Json<LanguagePayload>,
) -> Result<impl IntoResponse, ApiError> {
    let prefs = app_state
        .settings_service
        .set_language(payload.language)
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(prefs)))
}

// PUT /api/settings/brand-color
#[utoipa::path(
    put,
    path = "/api/settings/brand-color",
    tag = "Settings",
    request_body = BrandColorPayload,
    responses(
        (status = 200, description = "Cor da marca gravada", body = Preferences),
        (status = 400, description = "Cor fora do formato #rrggbb")
    )
)]
pub async fn set_brand_color(
    State(app_state): State<AppState>,
    locale: Locale,
    _current: AuthenticatedUser,
    Json(payload): Json<BrandColorPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let prefs = app_state
        .settings_service
        .set_brand_color(&payload.brand_color)
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(prefs)))
}

// PUT /api/settings/logo
#[utoipa::path(
    put,
    path = "/api/settings/logo",
    tag = "Settings",
    request_body = LogoPayload,
    responses((status = 200, description = "Logo gravado", body = Preferences))
)]
pub async fn set_logo(
    State(app_state): State<AppState>,
    locale: Locale,
    _current: AuthenticatedUser,
    Json(payload): Json<LogoPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let prefs = app_state
        .settings_service
        .set_logo(&payload.logo)
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(prefs)))
}

// DELETE /api/settings/logo
#[utoipa::path(
    delete,
    path = "/api/settings/logo",
    tag = "Settings",
    responses((status = 200, description = "Logo removido", body = Preferences))
)]
pub async fn clear_logo(
    State(app_state): State<AppState>,
    locale: Locale,
    _current: AuthenticatedUser,
) -> Result<impl IntoResponse, ApiError> {
    let prefs = app_state
        .settings_service
        .clear_logo()
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(prefs)))
}
