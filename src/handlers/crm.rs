// src/handlers/crm.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::{error::{ApiError, AppError}, money::DealAmounts},
    config::AppState,
    middleware::{auth::AuthenticatedUser, i18n::Locale, rbac::RequireOwner},
    models::crm::{
        Campaign, CampaignQuery, Deal, DealAmountsQuery, DealView, Lead, LeadNotePayload,
        LeadQuery, NewCampaign, NewDeal, NewLead, NewStage, Stage,
    },
};

// =============================================================================
//  ÁREA 1: LEADS
// =============================================================================

// GET /api/leads
#[utoipa::path(
    get,
    path = "/api/leads",
    tag = "CRM",
    params(
        LeadQuery,
        ("x-tenant-id" = Uuid, Header, description = "ID do tenant"),
        ("x-user-id" = i64, Header, description = "Usuário atual")
    ),
    responses(
        (status = 200, description = "Leads da categoria pedida", body = Vec<Lead>)
    )
)]
pub async fn list_leads(
    State(app_state): State<AppState>,
    locale: Locale,
    current: AuthenticatedUser,
    Query(query): Query<LeadQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let leads = app_state
        .crm_service
        .list_leads(current.tenant_id, &query, current.user.id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(leads)))
}

// POST /api/leads
#[utoipa::path(
    post,
    path = "/api/leads",
    tag = "CRM",
    request_body = NewLead,
    params(
        ("x-tenant-id" = Uuid, Header, description = "ID do tenant"),
        ("x-user-id" = i64, Header, description = "Usuário atual (Owner)")
    ),
    responses(
        (status = 201, description = "Lead criado como Untouched", body = Lead),
        (status = 400, description = "Dados inválidos"),
        (status = 403, description = "Apenas o Owner cria registros")
    )
)]
pub async fn create_lead(
    State(app_state): State<AppState>,
    locale: Locale,
    RequireOwner(current): RequireOwner,
    Json(payload): Json<NewLead>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let lead = app_state
        .crm_service
        .create_lead(current.tenant_id, payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(lead)))
}

// GET /api/leads/{id}
#[utoipa::path(
    get,
    path = "/api/leads/{id}",
    tag = "CRM",
    params(("id" = i64, Path, description = "ID do lead")),
    responses(
        (status = 200, description = "Lead com o histórico", body = Lead),
        (status = 404, description = "Lead não encontrado")
    )
)]
pub async fn get_lead(
    State(app_state): State<AppState>,
    locale: Locale,
    current: AuthenticatedUser,
    Path(lead_id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let lead = app_state
        .crm_service
        .get_lead(current.tenant_id, lead_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(lead)))
}

// PUT /api/leads/{id}
#[utoipa::path(
    put,
    path = "/api/leads/{id}",
    tag = "CRM",
    request_body = Lead,
    params(("id" = i64, Path, description = "ID do lead")),
    responses(
        (status = 200, description = "Lead atualizado; mudança de status entra no histórico", body = Lead),
        (status = 400, description = "Nome ou telefone em branco"),
        (status = 404, description = "Lead não encontrado"),
        (status = 422, description = "Transição de status não permitida")
    )
)]
pub async fn update_lead(
    State(app_state): State<AppState>,
    locale: Locale,
    current: AuthenticatedUser,
    Path(lead_id): Path<i64>,
    Json(mut lead): Json<Lead>,
) -> Result<impl IntoResponse, ApiError> {
    // O id da rota manda.
    lead.id = lead_id;
    lead.validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let lead = app_state
        .crm_service
        .update_lead(current.tenant_id, lead, current.user.id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(lead)))
}

// POST /api/leads/{id}/notes
#[utoipa::path(
    post,
    path = "/api/leads/{id}/notes",
    tag = "CRM",
    request_body = LeadNotePayload,
    params(("id" = i64, Path, description = "ID do lead")),
    responses(
        (status = 200, description = "Nota anexada ao histórico", body = Lead),
        (status = 404, description = "Lead não encontrado")
    )
)]
pub async fn add_lead_note(
    State(app_state): State<AppState>,
    locale: Locale,
    current: AuthenticatedUser,
    Path(lead_id): Path<i64>,
    Json(payload): Json<LeadNotePayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let lead = app_state
        .crm_service
        .add_lead_note(current.tenant_id, lead_id, payload.note, current.user.id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(lead)))
}

// DELETE /api/leads/{id}
#[utoipa::path(
    delete,
    path = "/api/leads/{id}",
    tag = "CRM",
    params(("id" = i64, Path, description = "ID do lead")),
    responses(
        (status = 204, description = "Removido (ou já inexistente)"),
        (status = 409, description = "Lead ainda tem negócios")
    )
)]
pub async fn delete_lead(
    State(app_state): State<AppState>,
    locale: Locale,
    current: AuthenticatedUser,
    Path(lead_id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .crm_service
        .delete_lead(current.tenant_id, lead_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
//  ÁREA 2: NEGÓCIOS
// =============================================================================

// GET /api/deals
#[utoipa::path(
    get,
    path = "/api/deals",
    tag = "CRM",
    responses(
        (status = 200, description = "Negócios com o lead resolvido", body = Vec<DealView>)
    )
)]
pub async fn list_deals(
    State(app_state): State<AppState>,
    locale: Locale,
    current: AuthenticatedUser,
) -> Result<impl IntoResponse, ApiError> {
    let deals = app_state
        .crm_service
        .list_deals(current.tenant_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(deals)))
}

// POST /api/deals
#[utoipa::path(
    post,
    path = "/api/deals",
    tag = "CRM",
    request_body = NewDeal,
    responses(
        (status = 201, description = "Negócio criado com desconto e comissão calculados", body = DealView),
        (status = 400, description = "Percentual fora de 0..100 ou valor negativo"),
        (status = 403, description = "Apenas o Owner cria registros")
    )
)]
pub async fn create_deal(
    State(app_state): State<AppState>,
    locale: Locale,
    RequireOwner(current): RequireOwner,
    Json(payload): Json<NewDeal>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let deal = app_state
        .crm_service
        .create_deal(current.tenant_id, payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(deal)))
}

// GET /api/deals/amounts
#[utoipa::path(
    get,
    path = "/api/deals/amounts",
    tag = "CRM",
    params(DealAmountsQuery),
    responses(
        (status = 200, description = "Desconto e comissão para os valores informados", body = DealAmounts)
    )
)]
pub async fn preview_deal_amounts(
    State(app_state): State<AppState>,
    locale: Locale,
    _current: AuthenticatedUser,
    Query(query): Query<DealAmountsQuery>,
) -> Result<impl IntoResponse, ApiError> {
    query
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let amounts: DealAmounts = app_state.crm_service.preview_amounts(&query);
    Ok((StatusCode::OK, Json(amounts)))
}

// GET /api/deals/{id}
#[utoipa::path(
    get,
    path = "/api/deals/{id}",
    tag = "CRM",
    params(("id" = i64, Path, description = "ID do negócio")),
    responses(
        (status = 200, description = "Negócio com o lead resolvido", body = DealView),
        (status = 404, description = "Negócio não encontrado")
    )
)]
pub async fn get_deal(
    State(app_state): State<AppState>,
    locale: Locale,
    current: AuthenticatedUser,
    Path(deal_id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let deal = app_state
        .crm_service
        .get_deal(current.tenant_id, deal_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(deal)))
}

// PUT /api/deals/{id}
#[utoipa::path(
    put,
    path = "/api/deals/{id}",
    tag = "CRM",
    request_body = Deal,
    params(("id" = i64, Path, description = "ID do negócio")),
    responses(
        (status = 200, description = "Negócio atualizado e recalculado", body = DealView),
        (status = 422, description = "Transição de status não permitida")
    )
)]
pub async fn update_deal(
    State(app_state): State<AppState>,
    locale: Locale,
    current: AuthenticatedUser,
    Path(deal_id): Path<i64>,
    Json(mut deal): Json<Deal>,
) -> Result<impl IntoResponse, ApiError> {
    deal.id = deal_id;
    deal
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let deal = app_state
        .crm_service
        .update_deal(current.tenant_id, deal)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(deal)))
}

// DELETE /api/deals/{id}
#[utoipa::path(
    delete,
    path = "/api/deals/{id}",
    tag = "CRM",
    params(("id" = i64, Path, description = "ID do negócio")),
    responses(
        (status = 204, description = "Removido (ou já inexistente)"),
        (status = 409, description = "Negócio ainda tem tarefas")
    )
)]
pub async fn delete_deal(
    State(app_state): State<AppState>,
    locale: Locale,
    current: AuthenticatedUser,
    Path(deal_id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .crm_service
        .delete_deal(current.tenant_id, deal_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
//  ÁREA 3: CAMPANHAS
// =============================================================================

// GET /api/campaigns
#[utoipa::path(
    get,
    path = "/api/campaigns",
    tag = "CRM",
    params(CampaignQuery),
    responses(
        (status = 200, description = "Campanhas filtradas", body = Vec<Campaign>)
    )
)]
pub async fn list_campaigns(
    State(app_state): State<AppState>,
    locale: Locale,
    current: AuthenticatedUser,
    Query(query): Query<CampaignQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let campaigns = app_state
        .crm_service
        .list_campaigns(current.tenant_id, &query)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(campaigns)))
}

// POST /api/campaigns
#[utoipa::path(
    post,
    path = "/api/campaigns",
    tag = "CRM",
    request_body = NewCampaign,
    responses(
        (status = 201, description = "Campanha criada", body = Campaign),
        (status = 403, description = "Apenas o Owner cria registros")
    )
)]
pub async fn create_campaign(
    State(app_state): State<AppState>,
    locale: Locale,
    RequireOwner(current): RequireOwner,
    Json(payload): Json<NewCampaign>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let campaign = app_state
        .crm_service
        .create_campaign(current.tenant_id, payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(campaign)))
}

// PUT /api/campaigns/{id}
#[utoipa::path(
    put,
    path = "/api/campaigns/{id}",
    tag = "CRM",
    request_body = Campaign,
    params(("id" = i64, Path, description = "ID da campanha")),
    responses(
        (status = 200, description = "Campanha atualizada", body = Campaign),
        (status = 404, description = "Campanha não encontrada")
    )
)]
pub async fn update_campaign(
    State(app_state): State<AppState>,
    locale: Locale,
    current: AuthenticatedUser,
    Path(campaign_id): Path<i64>,
    Json(mut campaign): Json<Campaign>,
) -> Result<impl IntoResponse, ApiError> {
    campaign.id = campaign_id;
    campaign
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let campaign = app_state
        .crm_service
        .update_campaign(current.tenant_id, campaign)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(campaign)))
}

// DELETE /api/campaigns/{id}
#[utoipa::path(
    delete,
    path = "/api/campaigns/{id}",
    tag = "CRM",
    params(("id" = i64, Path, description = "ID da campanha")),
    responses((status = 204, description = "Removida (ou já inexistente)"))
)]
pub async fn delete_campaign(
    State(app_state): State<AppState>,
    locale: Locale,
    current: AuthenticatedUser,
    Path(campaign_id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .crm_service
        .delete_campaign(current.tenant_id, campaign_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
//  ÁREA 4: ETAPAS DO FUNIL
// =============================================================================

// GET /api/stages
#[utoipa::path(
    get,
    path = "/api/stages",
    tag = "CRM",
    responses((status = 200, description = "Etapas por posição", body = Vec<Stage>))
)]
pub async fn list_stages(
    State(app_state): State<AppState>,
    locale: Locale,
    current: AuthenticatedUser,
) -> Result<impl IntoResponse, ApiError> {
    let stages = app_state
        .crm_service
        .list_stages(current.tenant_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(stages)))
}

// POST /api/stages
#[utoipa::path(
    post,
    path = "/api/stages",
    tag = "CRM",
    request_body = NewStage,
    responses(
        (status = 201, description = "Etapa criada", body = Stage),
        (status = 403, description = "Apenas o Owner cria registros")
    )
)]
pub async fn create_stage(
    State(app_state): State<AppState>,
    locale: Locale,
    RequireOwner(current): RequireOwner,
    Json(payload): Json<NewStage>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let stage = app_state
        .crm_service
        .create_stage(current.tenant_id, payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(stage)))
}

// PUT /api/stages/{id}
#[utoipa::path(
    put,
    path = "/api/stages/{id}",
    tag = "CRM",
    request_body = Stage,
    params(("id" = i64, Path, description = "ID da etapa")),
    responses(
        (status = 200, description = "Etapa atualizada", body = Stage),
        (status = 404, description = "Etapa não encontrada")
    )
)]
pub async fn update_stage(
    State(app_state): State<AppState>,
    locale: Locale,
    current: AuthenticatedUser,
    Path(stage_id): Path<i64>,
    Json(mut stage): Json<Stage>,
) -> Result<impl IntoResponse, ApiError> {
    stage.id = stage_id;
    stage
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let stage = app_state
        .crm_service
        .update_stage(current.tenant_id, stage)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(stage)))
}

// DELETE /api/stages/{id}
#[utoipa::path(
    delete,
    path = "/api/stages/{id}",
    tag = "CRM",
    params(("id" = i64, Path, description = "ID da etapa")),
    responses((status = 204, description = "Removida (ou já inexistente)"))
)]
pub async fn delete_stage(
    State(app_state): State<AppState>,
    locale: Locale,
    current: AuthenticatedUser,
    Path(stage_id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .crm_service
        .delete_stage(current.tenant_id, stage_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}
