// src/services/crm_service.rs

use uuid::Uuid;

use crate::{
    common::{error::AppError, money::DealAmounts},
    db::StoreRegistry,
    models::crm::{
        Campaign, CampaignQuery, Deal, DealAmountsQuery, DealView, Lead, LeadQuery, NewCampaign,
        NewDeal, NewLead, NewStage, Stage,
    },
};

// Os payloads chegam validados pelos handlers; aqui ficam as regras do store
// (transições, integridade referencial) e o log.
#[derive(Clone)]
pub struct CrmService {
    registry: StoreRegistry,
}

impl CrmService {
    pub fn new(registry: StoreRegistry) -> Self {
        Self { registry }
    }

    // =========================================================================
    //  1. LEADS
    // =========================================================================

    pub async fn create_lead(&self, tenant_id: Uuid, payload: NewLead) -> Result<Lead, AppError> {
        let store = self.registry.tenant(tenant_id).await;
        let lead = store.write().await.add_lead(payload);
        tracing::info!(%tenant_id, lead_id = lead.id, "lead criado");
        Ok(lead)
    }

    pub async fn list_leads(
        &self,
        tenant_id: Uuid,
        query: &LeadQuery,
        viewer_id: i64,
    ) -> Result<Vec<Lead>, AppError> {
        let store = self.registry.tenant(tenant_id).await;
        let leads = store.read().await.filter_leads(query, viewer_id);
        Ok(leads)
    }

    pub async fn get_lead(&self, tenant_id: Uuid, lead_id: i64) -> Result<Lead, AppError> {
        let store = self.registry.tenant(tenant_id).await;
        let guard = store.read().await;
        guard.leads.require(lead_id).cloned()
    }

    pub async fn update_lead(
        &self,
        tenant_id: Uuid,
        lead: Lead,
        author_id: i64,
    ) -> Result<Lead, AppError> {
        let store = self.registry.tenant(tenant_id).await;
        let result = store.write().await.update_lead(lead, Some(author_id));
        if let Err(AppError::InvalidTransition { from, to }) = &result {
            tracing::warn!(%tenant_id, %from, %to, "transição de lead recusada");
        }
        result
    }

    pub async fn add_lead_note(
        &self,
        tenant_id: Uuid,
        lead_id: i64,
        note: String,
        author_id: i64,
    ) -> Result<Lead, AppError> {
        let store = self.registry.tenant(tenant_id).await;
        let lead = store.write().await.append_lead_note(lead_id, note, Some(author_id))?;
        Ok(lead)
    }

    pub async fn delete_lead(&self, tenant_id: Uuid, lead_id: i64) -> Result<bool, AppError> {
        let store = self.registry.tenant(tenant_id).await;
        let removed = store.write().await.delete_lead(lead_id)?;
        log_delete(tenant_id, "lead", lead_id, removed);
        Ok(removed)
    }

    // =========================================================================
    //  2. NEGÓCIOS
    // =========================================================================

    pub async fn create_deal(&self, tenant_id: Uuid, payload: NewDeal) -> Result<DealView, AppError> {
        let store = self.registry.tenant(tenant_id).await;
        let mut guard = store.write().await;
        let deal = guard.add_deal(payload);
        tracing::info!(%tenant_id, deal_id = deal.id, lead_id = deal.lead_id, "negócio criado");
        Ok(guard.deal_view(&deal))
    }

    pub async fn list_deals(&self, tenant_id: Uuid) -> Result<Vec<DealView>, AppError> {
        let store = self.registry.tenant(tenant_id).await;
        let views = store.read().await.deal_views();
        Ok(views)
    }

    pub async fn get_deal(&self, tenant_id: Uuid, deal_id: i64) -> Result<DealView, AppError> {
        let store = self.registry.tenant(tenant_id).await;
        let guard = store.read().await;
        let deal = guard.deals.require(deal_id)?;
        Ok(guard.deal_view(deal))
    }

    /// Troca o registro inteiro e recalcula desconto e comissão no mesmo lock.
    pub async fn update_deal(&self, tenant_id: Uuid, deal: Deal) -> Result<DealView, AppError> {
        let store = self.registry.tenant(tenant_id).await;
        let mut guard = store.write().await;
        let deal = match guard.update_deal(deal) {
            Ok(deal) => deal,
            Err(e) => {
                if let AppError::InvalidTransition { from, to } = &e {
                    tracing::warn!(%tenant_id, %from, %to, "transição de negócio recusada");
                }
                return Err(e);
            }
        };
        Ok(guard.deal_view(&deal))
    }

    pub async fn delete_deal(&self, tenant_id: Uuid, deal_id: i64) -> Result<bool, AppError> {
        let store = self.registry.tenant(tenant_id).await;
        let removed = store.write().await.delete_deal(deal_id)?;
        log_delete(tenant_id, "deal", deal_id, removed);
        Ok(removed)
    }

    /// Mesma conta do store, para o formulário mostrar os valores enquanto edita.
    pub fn preview_amounts(&self, query: &DealAmountsQuery) -> DealAmounts {
        DealAmounts::compute(
            query.value,
            query.discount_percentage,
            query.sales_commission_percentage,
        )
    }

    // =========================================================================
    //  3. CAMPANHAS
    // =========================================================================

    pub async fn create_campaign(&self, tenant_id: Uuid, payload: NewCampaign) -> Result<Campaign, AppError> {
        let store = self.registry.tenant(tenant_id).await;
        let campaign = store.write().await.add_campaign(payload);
        tracing::info!(%tenant_id, campaign_id = campaign.id, "campanha criada");
        Ok(campaign)
    }

    pub async fn list_campaigns(&self, tenant_id: Uuid, query: &CampaignQuery) -> Result<Vec<Campaign>, AppError> {
        let store = self.registry.tenant(tenant_id).await;
        let campaigns = store.read().await.filter_campaigns(query);
        Ok(campaigns)
    }

    pub async fn update_campaign(&self, tenant_id: Uuid, campaign: Campaign) -> Result<Campaign, AppError> {
        let store = self.registry.tenant(tenant_id).await;
        let campaign = store.write().await.update_campaign(campaign)?;
        Ok(campaign)
    }

    pub async fn delete_campaign(&self, tenant_id: Uuid, campaign_id: i64) -> Result<bool, AppError> {
        let store = self.registry.tenant(tenant_id).await;
        let removed = store.write().await.delete_campaign(campaign_id);
        log_delete(tenant_id, "campaign", campaign_id, removed);
        Ok(removed)
    }

    // =========================================================================
    //  4. ETAPAS
    // =========================================================================

    pub async fn create_stage(&self, tenant_id: Uuid, payload: NewStage) -> Result<Stage, AppError> {
        let store = self.registry.tenant(tenant_id).await;
        let stage = store.write().await.add_stage(payload);
        Ok(stage)
    }

    pub async fn list_stages(&self, tenant_id: Uuid) -> Result<Vec<Stage>, AppError> {
        let store = self.registry.tenant(tenant_id).await;
        let stages = store.read().await.ordered_stages();
        Ok(stages)
    }

    pub async fn update_stage(&self, tenant_id: Uuid, stage: Stage) -> Result<Stage, AppError> {
        let store = self.registry.tenant(tenant_id).await;
        let stage = store.write().await.update_stage(stage)?;
        Ok(stage)
    }

    pub async fn delete_stage(&self, tenant_id: Uuid, stage_id: i64) -> Result<bool, AppError> {
        let store = self.registry.tenant(tenant_id).await;
        let removed = store.write().await.delete_stage(stage_id);
        log_delete(tenant_id, "stage", stage_id, removed);
        Ok(removed)
    }
}

pub(crate) fn log_delete(tenant_id: Uuid, entity: &'static str, id: i64, removed: bool) {
    if removed {
        tracing::info!(%tenant_id, entity, id, "registro removido");
    } else {
        tracing::debug!(%tenant_id, entity, id, "remoção ignorada: id inexistente");
    }
}
