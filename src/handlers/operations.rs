// src/handlers/operations.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{auth::AuthenticatedUser, i18n::Locale, rbac::RequireOwner},
    models::operations::{NewTodo, Todo, TodoQuery},
};

// GET /api/todos
#[utoipa::path(
    get,
    path = "/api/todos",
    tag = "Operations",
    params(
        TodoQuery,
        ("x-tenant-id" = Uuid, Header, description = "ID do tenant")
    ),
    responses((status = 200, description = "Tarefas do dia/etapa pedidos", body = Vec<Todo>))
)]
pub async fn list_todos(
    State(app_state): State<AppState>,
    locale: Locale,
    current: AuthenticatedUser,
    Query(query): Query<TodoQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let todos = app_state
        .operations_service
        .list_todos(current.tenant_id, &query)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(todos)))
}

// POST /api/todos
#[utoipa::path(
    post,
    path = "/api/todos",
    tag = "Operations",
    request_body = NewTodo,
    responses(
        (status = 201, description = "Tarefa criada (confirmada pelo backend, se configurado)", body = Todo),
        (status = 403, description = "Apenas o Owner cria registros"),
        (status = 404, description = "Negócio não encontrado"),
        (status = 502, description = "Backend remoto recusou; nada foi gravado")
    )
)]
pub async fn create_todo(
    State(app_state): State<AppState>,
    locale: Locale,
    RequireOwner(current): RequireOwner,
    Json(payload): Json<NewTodo>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let todo = app_state
        .operations_service
        .create_todo(current.tenant_id, payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(todo)))
}

// GET /api/deals/{id}/todos
#[utoipa::path(
    get,
    path = "/api/deals/{id}/todos",
    tag = "Operations",
    params(("id" = i64, Path, description = "ID do negócio")),
    responses(
        (status = 200, description = "Tarefas do negócio", body = Vec<Todo>),
        (status = 404, description = "Negócio não encontrado")
    )
)]
pub async fn list_deal_todos(
    State(app_state): State<AppState>,
    locale: Locale,
    current: AuthenticatedUser,
    Path(deal_id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let todos = app_state
        .operations_service
        .todos_for_deal(current.tenant_id, deal_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(todos)))
}

// PUT /api/todos/{id}
#[utoipa::path(
    put,
    path = "/api/todos/{id}",
    tag = "Operations",
    request_body = Todo,
    params(("id" = i64, Path, description = "ID da tarefa")),
    responses(
        (status = 200, description = "Tarefa atualizada", body = Todo),
        (status = 404, description = "Tarefa não encontrada")
    )
)]
pub async fn update_todo(
    State(app_state): State<AppState>,
    locale: Locale,
    current: AuthenticatedUser,
    Path(todo_id): Path<i64>,
    Json(mut todo): Json<Todo>,
) -> Result<impl IntoResponse, ApiError> {
    todo.id = todo_id;
    todo.validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let todo = app_state
        .operations_service
        .update_todo(current.tenant_id, todo)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(todo)))
}

// DELETE /api/todos/{id}
#[utoipa::path(
    delete,
    path = "/api/todos/{id}",
    tag = "Operations",
    params(("id" = i64, Path, description = "ID da tarefa")),
    responses((status = 204, description = "Removida (ou já inexistente)"))
)]
pub async fn delete_todo(
    State(app_state): State<AppState>,
    locale: Locale,
    current: AuthenticatedUser,
    Path(todo_id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .operations_service
        .delete_todo(current.tenant_id, todo_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}
