// src/db/crm_repo.rs

use chrono::Utc;

use crate::{
    common::{error::AppError, money::DealAmounts},
    db::store::{EntityStore, ReferencePolicy},
    models::{
        crm::{
            Campaign, CampaignQuery, Deal, DealView, HistoryEntry, Lead, LeadCategory, LeadQuery,
            LeadRef, LeadStatus, LeadType, NewCampaign, NewDeal, NewLead, NewStage, Stage,
        },
        session::EntityRef,
    },
};

impl EntityStore {
    // =========================================================================
    //  LEADS
    // =========================================================================

    /// Todo lead nasce Untouched, com histórico vazio.
    pub fn add_lead(&mut self, new: NewLead) -> Lead {
        let lead = Lead {
            id: self.next_id(),
            name: new.name,
            phone: new.phone,
            email: new.email,
            project: new.project,
            campaign_id: new.campaign_id,
            assigned_to: new.assigned_to,
            lead_type: new.lead_type,
            status: LeadStatus::Untouched,
            last_stage: LeadStatus::Untouched,
            notes: new.notes,
            history: Vec::new(),
            created_at: Utc::now(),
        };
        self.leads.prepend(lead.clone());
        lead
    }

    /// Substitui o lead inteiro. Histórico e data de criação vêm do registro
    /// guardado; uma troca de status vira uma nova entrada no histórico.
    pub fn update_lead(&mut self, mut lead: Lead, author_id: Option<i64>) -> Result<Lead, AppError> {
        let current = self.leads.require(lead.id)?;

        if !current.status.can_transition_to(lead.status) {
            return Err(AppError::InvalidTransition {
                from: current.status.to_string(),
                to: lead.status.to_string(),
            });
        }

        lead.history = current.history.clone();
        lead.created_at = current.created_at;
        lead.last_stage = current.last_stage;

        if current.status != lead.status {
            lead.history.push(HistoryEntry {
                at: Utc::now(),
                from: Some(current.status),
                to: Some(lead.status),
                note: None,
                author_id,
            });
            lead.last_stage = current.status;
        }

        self.leads.replace(lead.clone())?;
        Ok(lead)
    }

    pub fn append_lead_note(
        &mut self,
        lead_id: i64,
        note: String,
        author_id: Option<i64>,
    ) -> Result<Lead, AppError> {
        let lead = self
            .leads
            .get_mut(lead_id)
            .ok_or(AppError::ResourceNotFound { entity: "lead", id: lead_id })?;

        lead.history.push(HistoryEntry {
            at: Utc::now(),
            from: None,
            to: None,
            note: Some(note),
            author_id,
        });
        Ok(lead.clone())
    }

    /// Remove o lead. Negócios que apontam para ele seguem a ReferencePolicy.
    pub fn delete_lead(&mut self, lead_id: i64) -> Result<bool, AppError> {
        if !self.leads.contains(lead_id) {
            return Ok(false);
        }

        let deal_ids: Vec<i64> = self
            .deals
            .iter()
            .filter(|deal| deal.lead_id == lead_id)
            .map(|deal| deal.id)
            .collect();

        if !deal_ids.is_empty() {
            match self.policy {
                ReferencePolicy::Restrict => {
                    return Err(AppError::ReferenceConflict {
                        entity: "lead",
                        id: lead_id,
                        dependent: "deal",
                        count: deal_ids.len(),
                    });
                }
                ReferencePolicy::Cascade => {
                    for deal_id in deal_ids {
                        self.delete_deal(deal_id)?;
                    }
                }
            }
        }

        self.leads.remove(lead_id);
        self.forget(EntityRef::Lead(lead_id));
        Ok(true)
    }

    /// Filtro do menu lateral + status + busca. Recalculado a cada leitura.
    pub fn filter_leads(&self, query: &LeadQuery, viewer_id: i64) -> Vec<Lead> {
        let needle = query
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase);

        self.leads
            .iter()
            .filter(|lead| match query.category {
                LeadCategory::All => true,
                LeadCategory::Fresh => lead.lead_type == LeadType::Fresh,
                LeadCategory::Cold => lead.lead_type == LeadType::Cold,
                LeadCategory::Rotated => lead.lead_type == LeadType::Rotated,
                LeadCategory::My => lead.assigned_to == Some(viewer_id),
            })
            .filter(|lead| query.status.is_none_or(|status| lead.status == status))
            .filter(|lead| match &needle {
                None => true,
                Some(needle) => {
                    lead.name.to_lowercase().contains(needle)
                        || lead.phone.contains(needle.as_str())
                        || lead
                            .email
                            .as_deref()
                            .is_some_and(|email| email.to_lowercase().contains(needle))
                }
            })
            .cloned()
            .collect()
    }

    // =========================================================================
    //  NEGÓCIOS (DEALS)
    // =========================================================================

    /// O lead é referência fraca: não precisa existir (ver `deal_view`).
    pub fn add_deal(&mut self, new: NewDeal) -> Deal {
        let amounts = DealAmounts::compute(
            new.value,
            new.discount_percentage,
            new.sales_commission_percentage,
        );
        let deal = Deal {
            id: self.next_id(),
            lead_id: new.lead_id,
            client_name: new.client_name,
            project: new.project,
            unit_id: new.unit_id,
            status: new.status,
            value: new.value,
            discount_percentage: new.discount_percentage,
            discount_amount: amounts.discount_amount,
            sales_commission_percentage: new.sales_commission_percentage,
            sales_commission_amount: amounts.sales_commission_amount,
            notes: new.notes,
            created_at: Utc::now(),
        };
        self.deals.prepend(deal.clone());
        deal
    }

    /// Substitui o negócio; valores derivados são sempre recalculados.
    pub fn update_deal(&mut self, mut deal: Deal) -> Result<Deal, AppError> {
        let current = self.deals.require(deal.id)?;

        if !current.status.can_transition_to(deal.status) {
            return Err(AppError::InvalidTransition {
                from: current.status.to_string(),
                to: deal.status.to_string(),
            });
        }

        let amounts = DealAmounts::compute(
            deal.value,
            deal.discount_percentage,
            deal.sales_commission_percentage,
        );
        deal.discount_amount = amounts.discount_amount;
        deal.sales_commission_amount = amounts.sales_commission_amount;
        deal.created_at = current.created_at;

        self.deals.replace(deal.clone())?;
        Ok(deal)
    }

    pub fn delete_deal(&mut self, deal_id: i64) -> Result<bool, AppError> {
        if !self.deals.contains(deal_id) {
            return Ok(false);
        }

        let todo_count = self.todos.count_where(|todo| todo.deal_id == deal_id);
        if todo_count > 0 {
            match self.policy {
                ReferencePolicy::Restrict => {
                    return Err(AppError::ReferenceConflict {
                        entity: "deal",
                        id: deal_id,
                        dependent: "todo",
                        count: todo_count,
                    });
                }
                ReferencePolicy::Cascade => {
                    for todo in self.todos.remove_where(|todo| todo.deal_id == deal_id) {
                        self.forget(EntityRef::Todo(todo.id));
                    }
                }
            }
        }

        self.deals.remove(deal_id);
        self.forget(EntityRef::Deal(deal_id));
        Ok(true)
    }

    /// Resolve o lead do negócio na leitura, com sentinela explícito.
    pub fn deal_view(&self, deal: &Deal) -> DealView {
        let lead = match self.leads.get(deal.lead_id) {
            Some(lead) => LeadRef::Found {
                id: lead.id,
                name: lead.name.clone(),
                phone: lead.phone.clone(),
            },
            None => LeadRef::Missing { id: deal.lead_id },
        };
        DealView { deal: deal.clone(), lead }
    }

    pub fn deal_views(&self) -> Vec<DealView> {
        self.deals.iter().map(|deal| self.deal_view(deal)).collect()
    }

    // =========================================================================
    //  CAMPANHAS
    // =========================================================================

    pub fn add_campaign(&mut self, new: NewCampaign) -> Campaign {
        let campaign = Campaign {
            id: self.next_id(),
            name: new.name,
            platform: new.platform,
            is_active: new.is_active,
            budget: new.budget,
            start_date: new.start_date,
            end_date: new.end_date,
            created_at: Utc::now(),
        };
        self.campaigns.prepend(campaign.clone());
        campaign
    }

    pub fn update_campaign(&mut self, mut campaign: Campaign) -> Result<Campaign, AppError> {
        campaign.created_at = self.campaigns.require(campaign.id)?.created_at;
        self.campaigns.replace(campaign.clone())?;
        Ok(campaign)
    }

    // `lead.campaign_id` é só a origem do lead; remover a campanha não mexe nos leads.
    pub fn delete_campaign(&mut self, campaign_id: i64) -> bool {
        let removed = self.campaigns.remove(campaign_id).is_some();
        if removed {
            self.forget(EntityRef::Campaign(campaign_id));
        }
        removed
    }

    pub fn filter_campaigns(&self, query: &CampaignQuery) -> Vec<Campaign> {
        let needle = query.search.as_deref().map(|s| s.trim().to_lowercase());

        self.campaigns
            .iter()
            .filter(|c| query.active.is_none_or(|active| c.is_active == active))
            .filter(|c| {
                needle
                    .as_deref()
                    .is_none_or(|needle| c.name.to_lowercase().contains(needle))
            })
            .cloned()
            .collect()
    }

    // =========================================================================
    //  ETAPAS DO FUNIL
    // =========================================================================

    pub fn add_stage(&mut self, new: NewStage) -> Stage {
        let stage = Stage {
            id: self.next_id(),
            name: new.name,
            color: new.color,
            position: new.position,
        };
        self.stages.prepend(stage.clone());
        stage
    }

    pub fn update_stage(&mut self, stage: Stage) -> Result<Stage, AppError> {
        self.stages.replace(stage.clone())?;
        Ok(stage)
    }

    pub fn delete_stage(&mut self, stage_id: i64) -> bool {
        let removed = self.stages.remove(stage_id).is_some();
        if removed {
            self.forget(EntityRef::Stage(stage_id));
        }
        removed
    }

    /// Etapas na ordem do funil.
    pub fn ordered_stages(&self) -> Vec<Stage> {
        let mut stages = self.stages.all().to_vec();
        stages.sort_by_key(|stage| (stage.position, stage.id));
        stages
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        crm::DealStatus,
        operations::{NewTodo, TodoStage},
    };
    use rust_decimal::Decimal;

    fn d(s: &str) -> Decimal {
        s.parse().expect("decimal")
    }

    fn new_lead(name: &str, lead_type: LeadType, assigned_to: Option<i64>) -> NewLead {
        NewLead {
            name: name.into(),
            phone: "0100".into(),
            email: None,
            project: None,
            campaign_id: None,
            assigned_to,
            lead_type,
            notes: None,
        }
    }

    fn new_deal(lead_id: i64) -> NewDeal {
        NewDeal {
            lead_id,
            client_name: "Client".into(),
            project: None,
            unit_id: None,
            status: DealStatus::Reservation,
            value: d("1000000"),
            discount_percentage: d("10"),
            sales_commission_percentage: d("3"),
            notes: None,
        }
    }

    #[test]
    fn new_leads_start_untouched_with_empty_history() {
        let mut store = EntityStore::new(ReferencePolicy::Restrict);
        let lead = store.add_lead(new_lead("Ali", LeadType::Cold, None));

        assert_eq!(lead.status, LeadStatus::Untouched);
        assert_eq!(lead.last_stage, LeadStatus::Untouched);
        assert!(lead.history.is_empty());
        assert_eq!(store.leads.all()[0].id, lead.id);
    }

    #[test]
    fn status_change_is_recorded_in_history() {
        let mut store = EntityStore::new(ReferencePolicy::Restrict);
        let mut lead = store.add_lead(new_lead("Ali", LeadType::Fresh, None));

        lead.status = LeadStatus::Touched;
        lead.history = Vec::new();
        let updated = store.update_lead(lead.clone(), Some(9)).expect("update");

        assert_eq!(updated.history.len(), 1);
        assert_eq!(updated.history[0].from, Some(LeadStatus::Untouched));
        assert_eq!(updated.history[0].to, Some(LeadStatus::Touched));
        assert_eq!(updated.history[0].author_id, Some(9));
        assert_eq!(updated.last_stage, LeadStatus::Untouched);

        // Atualizar de novo sem trocar status não cria entrada nova.
        let same = store.update_lead(updated.clone(), None).expect("update");
        assert_eq!(same.history.len(), 1);
    }

    #[test]
    fn forbidden_lead_transition_leaves_record_untouched() {
        let mut store = EntityStore::new(ReferencePolicy::Restrict);
        let mut lead = store.add_lead(new_lead("Ali", LeadType::Fresh, None));
        lead.status = LeadStatus::Meeting;

        let err = store.update_lead(lead.clone(), None).expect_err("Untouched -> Meeting");
        assert!(matches!(err, AppError::InvalidTransition { .. }));
        assert_eq!(store.leads.require(lead.id).expect("lead").status, LeadStatus::Untouched);
    }

    #[test]
    fn notes_append_to_history() {
        let mut store = EntityStore::new(ReferencePolicy::Restrict);
        let lead = store.add_lead(new_lead("Ali", LeadType::Fresh, None));
        let lead = store.append_lead_note(lead.id, "asked for brochure".into(), Some(1)).expect("note");
        assert_eq!(lead.history.len(), 1);
        assert_eq!(lead.history[0].note.as_deref(), Some("asked for brochure"));
        assert!(store.append_lead_note(999, "x".into(), None).is_err());
    }

    #[test]
    fn lead_filters_combine_category_status_and_search() {
        let mut store = EntityStore::new(ReferencePolicy::Restrict);
        store.add_lead(new_lead("Ahmed Fresh", LeadType::Fresh, Some(1)));
        store.add_lead(new_lead("Basma Cold", LeadType::Cold, Some(2)));
        store.add_lead(new_lead("Carla Fresh", LeadType::Fresh, Some(2)));

        let fresh = store.filter_leads(
            &LeadQuery { category: LeadCategory::Fresh, ..Default::default() },
            1,
        );
        assert_eq!(fresh.len(), 2);

        let mine = store.filter_leads(&LeadQuery { category: LeadCategory::My, ..Default::default() }, 2);
        assert_eq!(mine.iter().map(|l| l.name.as_str()).collect::<Vec<_>>(), vec!["Carla Fresh", "Basma Cold"]);

        let search = store.filter_leads(
            &LeadQuery { search: Some("  ahmed ".into()), ..Default::default() },
            1,
        );
        assert_eq!(search.len(), 1);

        let touched = store.filter_leads(
            &LeadQuery { status: Some(LeadStatus::Touched), ..Default::default() },
            1,
        );
        assert!(touched.is_empty());
    }

    #[test]
    fn deal_amounts_are_computed_not_trusted() {
        let mut store = EntityStore::new(ReferencePolicy::Restrict);
        let mut deal = store.add_deal(new_deal(1));
        assert_eq!(deal.discount_amount, d("100000"));
        assert_eq!(deal.sales_commission_amount, d("27000"));

        deal.discount_percentage = d("2.5");
        deal.discount_amount = d("1");
        deal.sales_commission_amount = d("1");
        let updated = store.update_deal(deal).expect("update");

        assert_eq!(updated.discount_amount, d("25000"));
        assert_eq!(updated.sales_commission_amount, d("29250"));
    }

    #[test]
    fn closed_deals_cannot_reopen() {
        let mut store = EntityStore::new(ReferencePolicy::Restrict);
        let mut deal = store.add_deal(new_deal(1));
        deal.status = DealStatus::Closed;
        let mut deal = store.update_deal(deal).expect("close");
        deal.status = DealStatus::Reservation;
        assert!(matches!(store.update_deal(deal), Err(AppError::InvalidTransition { .. })));
    }

    #[test]
    fn deal_view_flags_missing_leads() {
        let mut store = EntityStore::new(ReferencePolicy::Restrict);
        let lead = store.add_lead(new_lead("Ali", LeadType::Fresh, None));
        let linked = store.add_deal(new_deal(lead.id));
        let orphan = store.add_deal(new_deal(4242));

        assert!(matches!(store.deal_view(&linked).lead, LeadRef::Found { .. }));
        assert_eq!(store.deal_view(&orphan).lead, LeadRef::Missing { id: 4242 });
    }

    #[test]
    fn deal_may_be_repointed_to_a_missing_lead_and_reads_as_missing() {
        let mut store = EntityStore::new(ReferencePolicy::Restrict);
        let lead = store.add_lead(new_lead("Ali", LeadType::Fresh, None));
        let mut deal = store.add_deal(new_deal(lead.id));

        deal.lead_id = 9999;
        let updated = store.update_deal(deal).expect("soft link");

        assert_eq!(store.deal_view(&updated).lead, LeadRef::Missing { id: 9999 });
        // O lead antigo ficou livre: nada mais o referencia.
        assert!(store.delete_lead(lead.id).expect("free"));
    }

    #[test]
    fn restrict_policy_blocks_deleting_a_referenced_lead() {
        let mut store = EntityStore::new(ReferencePolicy::Restrict);
        let lead = store.add_lead(new_lead("Ali", LeadType::Fresh, None));
        store.add_deal(new_deal(lead.id));

        let err = store.delete_lead(lead.id).expect_err("restricted");
        assert!(matches!(err, AppError::ReferenceConflict { dependent: "deal", count: 1, .. }));
        assert!(store.leads.contains(lead.id));
    }

    #[test]
    fn cascade_policy_removes_deals_todos_and_selections() {
        let mut store = EntityStore::new(ReferencePolicy::Cascade);
        let lead = store.add_lead(new_lead("Ali", LeadType::Fresh, None));
        let deal = store.add_deal(new_deal(lead.id));
        let other = store.add_deal(new_deal(77));
        store.add_todo(NewTodo {
            deal_id: deal.id,
            title: "call".into(),
            stage: TodoStage::Following,
            reminder_date: Utc::now(),
            notes: None,
        });
        store.set_selection(1, Some(EntityRef::Deal(deal.id)));

        assert!(store.delete_lead(lead.id).expect("cascade"));

        assert!(store.leads.is_empty());
        assert_eq!(store.deals.len(), 1);
        assert_eq!(store.deals.all()[0].id, other.id);
        assert!(store.todos.is_empty());
        assert_eq!(store.selection(1), None);
    }

    #[test]
    fn deleting_unknown_records_is_not_an_error() {
        let mut store = EntityStore::new(ReferencePolicy::Restrict);
        assert!(!store.delete_lead(5).expect("no-op"));
        assert!(!store.delete_deal(5).expect("no-op"));
        assert!(!store.delete_campaign(5));
    }

    #[test]
    fn campaign_search_is_case_insensitive() {
        let mut store = EntityStore::new(ReferencePolicy::Restrict);
        for (name, active) in [("Summer Launch", true), ("Winter Promo", false), ("summer retarget", true)] {
            store.add_campaign(NewCampaign {
                name: name.into(),
                platform: None,
                is_active: active,
                budget: Decimal::ZERO,
                start_date: None,
                end_date: None,
            });
        }

        let found = store.filter_campaigns(&CampaignQuery { search: Some("SUMMER".into()), active: None });
        assert_eq!(found.len(), 2);
        let inactive = store.filter_campaigns(&CampaignQuery { search: None, active: Some(false) });
        assert_eq!(inactive.len(), 1);
        assert_eq!(inactive[0].name, "Winter Promo");
    }

    #[test]
    fn stages_are_listed_by_position() {
        let mut store = EntityStore::new(ReferencePolicy::Restrict);
        store.add_stage(NewStage { name: "Closing".into(), color: None, position: 3 });
        store.add_stage(NewStage { name: "Intro".into(), color: None, position: 1 });
        let names: Vec<String> = store.ordered_stages().into_iter().map(|s| s.name).collect();
        assert_eq!(names, vec!["Intro", "Closing"]);
    }
}
