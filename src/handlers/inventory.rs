// src/handlers/inventory.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use utoipa::IntoParams;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{auth::AuthenticatedUser, i18n::Locale, rbac::RequireOwner},
    models::inventory::{
        Developer, NewDeveloper, NewOwner, NewProject, NewService, NewUnit, Owner, Project,
        Service, Unit,
    },
};

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ProjectFilter {
    pub developer_id: Option<i64>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct UnitFilter {
    pub project_id: Option<i64>,
}

// =============================================================================
//  ÁREA 1: DEVELOPERS
// =============================================================================

// GET /api/developers
#[utoipa::path(
    get,
    path = "/api/developers",
    tag = "Inventory",
    params(("x-tenant-id" = Uuid, Header, description = "ID do tenant")),
    responses((status = 200, description = "Lista completa, mais recentes primeiro", body = Vec<Developer>))
)]
pub async fn list_developers(
    State(app_state): State<AppState>,
    locale: Locale,
    current: AuthenticatedUser,
) -> Result<impl IntoResponse, ApiError> {
    let items = app_state
        .inventory_service
        .list_developers(current.tenant_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(items)))
}

// POST /api/developers
#[utoipa::path(
    post,
    path = "/api/developers",
    tag = "Inventory",
    request_body = NewDeveloper,
    responses(
        (status = 201, description = "Incorporadora criada com código sequencial", body = Developer),
        (status = 400, description = "Dados inválidos"),
        (status = 403, description = "Apenas o Owner cria registros")
    )
)]
pub async fn create_developer(
    State(app_state): State<AppState>,
    locale: Locale,
    RequireOwner(current): RequireOwner,
    Json(payload): Json<NewDeveloper>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let developer = app_state
        .inventory_service
        .create_developer(current.tenant_id, payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(developer)))
}

// PUT /api/developers/{id}
#[utoipa::path(
    put,
    path = "/api/developers/{id}",
    tag = "Inventory",
    request_body = Developer,
    params(("id" = i64, Path, description = "ID do registro")),
    responses(
        (status = 200, description = "Atualizado; código e data de criação são preservados", body = Developer),
        (status = 404, description = "Registro não encontrado")
    )
)]
pub async fn update_developer(
    State(app_state): State<AppState>,
    locale: Locale,
    current: AuthenticatedUser,
    Path(developer_id): Path<i64>,
    Json(mut developer): Json<Developer>,
) -> Result<impl IntoResponse, ApiError> {
    developer.id = developer_id;
    developer
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let developer = app_state
        .inventory_service
        .update_developer(current.tenant_id, developer)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(developer)))
}

// DELETE /api/developers/{id}
#[utoipa::path(
    delete,
    path = "/api/developers/{id}",
    tag = "Inventory",
    params(("id" = i64, Path, description = "ID do registro")),
    responses(
        (status = 204, description = "Removido (ou já inexistente)"),
        (status = 409, description = "Ainda há registros dependentes")
    )
)]
pub async fn delete_developer(
    State(app_state): State<AppState>,
    locale: Locale,
    current: AuthenticatedUser,
    Path(developer_id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .inventory_service
        .delete_developer(current.tenant_id, developer_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
//  ÁREA 2: PROJECTS
// =============================================================================

// GET /api/projects
#[utoipa::path(
    get,
    path = "/api/projects",
    tag = "Inventory",
    params(
        ProjectFilter,
        ("x-tenant-id" = Uuid, Header, description = "ID do tenant")
    ),
    responses((status = 200, description = "Lista filtrada", body = Vec<Project>))
)]
pub async fn list_projects(
    State(app_state): State<AppState>,
    locale: Locale,
    current: AuthenticatedUser,
    Query(filter): Query<ProjectFilter>,
) -> Result<impl IntoResponse, ApiError> {
    let items = app_state
        .inventory_service
        .list_projects(current.tenant_id, filter.developer_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(items)))
}

// POST /api/projects
#[utoipa::path(
    post,
    path = "/api/projects",
    tag = "Inventory",
    request_body = NewProject,
    responses(
        (status = 201, description = "Projeto criado com código sequencial", body = Project),
        (status = 400, description = "Dados inválidos"),
        (status = 403, description = "Apenas o Owner cria registros")
    )
)]
pub async fn create_project(
    State(app_state): State<AppState>,
    locale: Locale,
    RequireOwner(current): RequireOwner,
    Json(payload): Json<NewProject>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let project = app_state
        .inventory_service
        .create_project(current.tenant_id, payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(project)))
}

// PUT /api/projects/{id}
#[utoipa::path(
    put,
    path = "/api/projects/{id}",
    tag = "Inventory",
    request_body = Project,
    params(("id" = i64, Path, description = "ID do registro")),
    responses(
        (status = 200, description = "Atualizado; código e data de criação são preservados", body = Project),
        (status = 404, description = "Registro não encontrado")
    )
)]
pub async fn update_project(
    State(app_state): State<AppState>,
    locale: Locale,
    current: AuthenticatedUser,
    Path(project_id): Path<i64>,
    Json(mut project): Json<Project>,
) -> Result<impl IntoResponse, ApiError> {
    project.id = project_id;
    project
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let project = app_state
        .inventory_service
        .update_project(current.tenant_id, project)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(project)))
}

// DELETE /api/projects/{id}
#[utoipa::path(
    delete,
    path = "/api/projects/{id}",
    tag = "Inventory",
    params(("id" = i64, Path, description = "ID do registro")),
    responses(
        (status = 204, description = "Removido (ou já inexistente)"),
        (status = 409, description = "Ainda há registros dependentes")
    )
)]
pub async fn delete_project(
    State(app_state): State<AppState>,
    locale: Locale,
    current: AuthenticatedUser,
    Path(project_id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .inventory_service
        .delete_project(current.tenant_id, project_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
//  ÁREA 3: OWNERS
// =============================================================================

// GET /api/owners
#[utoipa::path(
    get,
    path = "/api/owners",
    tag = "Inventory",
    params(("x-tenant-id" = Uuid, Header, description = "ID do tenant")),
    responses((status = 200, description = "Lista completa, mais recentes primeiro", body = Vec<Owner>))
)]
pub async fn list_owners(
    State(app_state): State<AppState>,
    locale: Locale,
    current: AuthenticatedUser,
) -> Result<impl IntoResponse, ApiError> {
    let items = app_state
        .inventory_service
        .list_owners(current.tenant_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(items)))
}

// POST /api/owners
#[utoipa::path(
    post,
    path = "/api/owners",
    tag = "Inventory",
    request_body = NewOwner,
    responses(
        (status = 201, description = "Proprietário criado com código sequencial", body = Owner),
        (status = 400, description = "Dados inválidos"),
        (status = 403, description = "Apenas o Owner cria registros")
    )
)]
pub async fn create_owner(
    State(app_state): State<AppState>,
    locale: Locale,
    RequireOwner(current): RequireOwner,
    Json(payload): Json<NewOwner>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let owner = app_state
        .inventory_service
        .create_owner(current.tenant_id, payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(owner)))
}

// PUT /api/owners/{id}
#[utoipa::path(
    put,
    path = "/api/owners/{id}",
    tag = "Inventory",
    request_body = Owner,
    params(("id" = i64, Path, description = "ID do registro")),
    responses(
        (status = 200, description = "Atualizado; código e data de criação são preservados", body = Owner),
        (status = 404, description = "Registro não encontrado")
    )
)]
pub async fn update_owner(
    State(app_state): State<AppState>,
    locale: Locale,
    current: AuthenticatedUser,
    Path(owner_id): Path<i64>,
    Json(mut owner): Json<Owner>,
) -> Result<impl IntoResponse, ApiError> {
    owner.id = owner_id;
    owner
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let owner = app_state
        .inventory_service
        .update_owner(current.tenant_id, owner)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(owner)))
}

// DELETE /api/owners/{id}
#[utoipa::path(
    delete,
    path = "/api/owners/{id}",
    tag = "Inventory",
    params(("id" = i64, Path, description = "ID do registro")),
    responses(
        (status = 204, description = "Removido (ou já inexistente)"),
        (status = 409, description = "Ainda há registros dependentes")
    )
)]
pub async fn delete_owner(
    State(app_state): State<AppState>,
    locale: Locale,
    current: AuthenticatedUser,
    Path(owner_id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .inventory_service
        .delete_owner(current.tenant_id, owner_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
//  ÁREA 4: UNITS
// =============================================================================

// GET /api/units
#[utoipa::path(
    get,
    path = "/api/units",
    tag = "Inventory",
    params(
        UnitFilter,
        ("x-tenant-id" = Uuid, Header, description = "ID do tenant")
    ),
    responses((status = 200, description = "Lista filtrada", body = Vec<Unit>))
)]
pub async fn list_units(
    State(app_state): State<AppState>,
    locale: Locale,
    current: AuthenticatedUser,
    Query(filter): Query<UnitFilter>,
) -> Result<impl IntoResponse, ApiError> {
    let items = app_state
        .inventory_service
        .list_units(current.tenant_id, filter.project_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(items)))
}

// POST /api/units
#[utoipa::path(
    post,
    path = "/api/units",
    tag = "Inventory",
    request_body = NewUnit,
    responses(
        (status = 201, description = "Unidade criada com código sequencial", body = Unit),
        (status = 400, description = "Dados inválidos"),
        (status = 403, description = "Apenas o Owner cria registros")
    )
)]
pub async fn create_unit(
    State(app_state): State<AppState>,
    locale: Locale,
    RequireOwner(current): RequireOwner,
    Json(payload): Json<NewUnit>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let unit = app_state
        .inventory_service
        .create_unit(current.tenant_id, payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(unit)))
}

// PUT /api/units/{id}
#[utoipa::path(
    put,
    path = "/api/units/{id}",
    tag = "Inventory",
    request_body = Unit,
    params(("id" = i64, Path, description = "ID do registro")),
    responses(
        (status = 200, description = "Atualizado; código e data de criação são preservados", body = Unit),
        (status = 404, description = "Registro não encontrado")
    )
)]
pub async fn update_unit(
    State(app_state): State<AppState>,
    locale: Locale,
    current: AuthenticatedUser,
    Path(unit_id): Path<i64>,
    Json(mut unit): Json<Unit>,
) -> Result<impl IntoResponse, ApiError> {
    unit.id = unit_id;
    unit
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let unit = app_state
        .inventory_service
        .update_unit(current.tenant_id, unit)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(unit)))
}

// DELETE /api/units/{id}
#[utoipa::path(
    delete,
    path = "/api/units/{id}",
    tag = "Inventory",
    params(("id" = i64, Path, description = "ID do registro")),
    responses((status = 204, description = "Removido (ou já inexistente)"))
)]
pub async fn delete_unit(
    State(app_state): State<AppState>,
    locale: Locale,
    current: AuthenticatedUser,
    Path(unit_id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .inventory_service
        .delete_unit(current.tenant_id, unit_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
//  ÁREA 5: SERVICES
// =============================================================================

// GET /api/services
#[utoipa::path(
    get,
    path = "/api/services",
    tag = "Inventory",
    params(("x-tenant-id" = Uuid, Header, description = "ID do tenant")),
    responses((status = 200, description = "Lista completa, mais recentes primeiro", body = Vec<Service>))
)]
pub async fn list_services(
    State(app_state): State<AppState>,
    locale: Locale,
    current: AuthenticatedUser,
) -> Result<impl IntoResponse, ApiError> {
    let items = app_state
        .inventory_service
        .list_services(current.tenant_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(items)))
}

// POST /api/services
#[utoipa::path(
    post,
    path = "/api/services",
    tag = "Inventory",
    request_body = NewService,
    responses(
        (status = 201, description = "Serviço criado com código sequencial", body = Service),
        (status = 400, description = "Dados inválidos"),
        (status = 403, description = "Apenas o Owner cria registros")
    )
)]
pub async fn create_service(
    State(app_state): State<AppState>,
    locale: Locale,
    RequireOwner(current): RequireOwner,
    Json(payload): Json<NewService>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let service = app_state
        .inventory_service
        .create_service(current.tenant_id, payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(service)))
}

// PUT /api/services/{id}
#[utoipa::path(
    put,
    path = "/api/services/{id}",
    tag = "Inventory",
    request_body = Service,
    params(("id" = i64, Path, description = "ID do registro")),
    responses(
        (status = 200, description = "Atualizado; código e data de criação são preservados", body = Service),
        (status = 404, description = "Registro não encontrado")
    )
)]
pub async fn update_service(
    State(app_state): State<AppState>,
    locale: Locale,
    current: AuthenticatedUser,
    Path(service_id): Path<i64>,
    Json(mut service): Json<Service>,
) -> Result<impl IntoResponse, ApiError> {
    service.id = service_id;
    service
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let service = app_state
        .inventory_service
        .update_service(current.tenant_id, service)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(service)))
}

// DELETE /api/services/{id}
#[utoipa::path(
    delete,
    path = "/api/services/{id}",
    tag = "Inventory",
    params(("id" = i64, Path, description = "ID do registro")),
    responses((status = 204, description = "Removido (ou já inexistente)"))
)]
pub async fn delete_service(
    State(app_state): State<AppState>,
    locale: Locale,
    current: AuthenticatedUser,
    Path(service_id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .inventory_service
        .delete_service(current.tenant_id, service_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}
