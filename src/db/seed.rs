// src/db/seed.rs

use chrono::{Duration, Utc};
use rust_decimal::Decimal;

use crate::{
    db::store::EntityStore,
    models::{
        auth::{NewUser, UserRole},
        crm::{DealStatus, LeadType, NewCampaign, NewDeal, NewLead, NewStage},
        inventory::{NewDeveloper, NewOwner, NewProject, NewUnit, UnitStatus},
        operations::{NewTodo, TodoStage},
    },
};

/// Dados de demonstração para um tenant novo (SEED_DEMO_DATA=true).
/// Passa pelas mesmas operações do store, então ids e códigos seguem as regras normais.
pub fn load_demo_data(store: &mut EntityStore) {
    let owner = store.add_user(NewUser {
        name: "Demo Owner".into(),
        email: "owner@demo.local".into(),
        phone: None,
        role: UserRole::Owner,
        is_active: true,
    });
    let sales = store.add_user(NewUser {
        name: "Demo Sales".into(),
        email: "sales@demo.local".into(),
        phone: None,
        role: UserRole::Sales,
        is_active: true,
    });

    for (position, (name, color)) in [("New", "#64748b"), ("Negotiation", "#f59e0b"), ("Won", "#16a34a")]
        .into_iter()
        .enumerate()
    {
        store.add_stage(NewStage {
            name: name.into(),
            color: Some(color.into()),
            position: position as i32,
        });
    }

    let campaign = store.add_campaign(NewCampaign {
        name: "Launch Campaign".into(),
        platform: Some("Facebook".into()),
        is_active: true,
        budget: Decimal::new(50_000, 0),
        start_date: None,
        end_date: None,
    });

    let developer = store.add_developer(NewDeveloper {
        name: "Demo Developments".into(),
        phone: None,
        email: None,
        notes: None,
    });
    // Pais recém-criados: os add_* abaixo não falham.
    let Ok(project) = store.add_project(NewProject {
        developer_id: developer.id,
        name: "Bay Residence".into(),
        location: Some("North Coast".into()),
    }) else {
        return;
    };
    let unit_owner = store.add_owner(NewOwner {
        name: "Demo Unit Owner".into(),
        phone: None,
        email: None,
    });
    let _ = store.add_unit(NewUnit {
        project_id: project.id,
        owner_id: Some(unit_owner.id),
        unit_type: Some("Chalet".into()),
        area: Some(Decimal::new(120, 0)),
        price: Decimal::new(4_200_000, 0),
        status: UnitStatus::Available,
    });

    let lead = store.add_lead(NewLead {
        name: "Youssef Adel".into(),
        phone: "+201000000001".into(),
        email: None,
        project: Some(project.name.clone()),
        campaign_id: Some(campaign.id),
        assigned_to: Some(sales.id),
        lead_type: LeadType::Fresh,
        notes: None,
    });
    store.add_lead(NewLead {
        name: "Laila Samir".into(),
        phone: "+201000000002".into(),
        email: Some("laila@example.com".into()),
        project: None,
        campaign_id: None,
        assigned_to: Some(owner.id),
        lead_type: LeadType::Cold,
        notes: None,
    });

    let deal = store.add_deal(NewDeal {
        lead_id: lead.id,
        client_name: lead.name.clone(),
        project: Some(project.name),
        unit_id: None,
        status: DealStatus::Reservation,
        value: Decimal::new(4_200_000, 0),
        discount_percentage: Decimal::new(5, 0),
        sales_commission_percentage: Decimal::new(25, 1),
        notes: None,
    });
    store.add_todo(NewTodo {
        deal_id: deal.id,
        title: "Confirm reservation payment".into(),
        stage: TodoStage::Following,
        reminder_date: Utc::now() + Duration::days(1),
        notes: None,
    });

    store.sync_id_sequence();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::store::ReferencePolicy;

    #[test]
    fn demo_data_is_consistent() {
        let mut store = EntityStore::new(ReferencePolicy::Restrict);
        load_demo_data(&mut store);

        assert_eq!(store.users.len(), 2);
        assert_eq!(store.developers.all()[0].code, "DEV001");
        assert_eq!(store.units.all()[0].code, "UNIT001");
        for deal in store.deals.iter() {
            assert!(store.leads.contains(deal.lead_id));
        }
        let next = store.next_id();
        assert!(store.todos.iter().all(|t| t.id < next));
    }
}
