// src/services/operation_service.rs

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::StoreRegistry,
    models::operations::{NewTodo, Todo, TodoQuery},
    services::crm_service::log_delete,
};

/// Confirmação remota de uma tarefa antes de gravá-la localmente.
#[async_trait]
pub trait TodoGateway: Send + Sync {
    async fn create_todo(&self, todo: &NewTodo) -> Result<(), AppError>;
}

#[derive(Clone)]
pub struct OperationsService {
    registry: StoreRegistry,
    gateway: Option<Arc<dyn TodoGateway>>,
}

impl OperationsService {
    pub fn new(registry: StoreRegistry, gateway: Option<Arc<dyn TodoGateway>>) -> Self {
        Self { registry, gateway }
    }

    /// Com gateway configurado, a tarefa só entra no store depois do backend aceitar.
    /// Falha remota: nada é gravado e o erro sobe para o chamador.
    pub async fn create_todo(&self, tenant_id: Uuid, payload: NewTodo) -> Result<Todo, AppError> {
        let store = self.registry.tenant(tenant_id).await;
        store.read().await.deals.require(payload.deal_id)?;

        // Chamada remota fora do lock do store.
        if let Some(gateway) = &self.gateway {
            if let Err(e) = gateway.create_todo(&payload).await {
                tracing::warn!(%tenant_id, deal_id = payload.deal_id, "backend recusou a tarefa: {}", e);
                return Err(e);
            }
        }

        // O negócio pode ter sido removido durante a chamada remota.
        let mut guard = store.write().await;
        if let Err(e) = guard.deals.require(payload.deal_id) {
            tracing::warn!(
                %tenant_id,
                deal_id = payload.deal_id,
                "negócio removido durante a confirmação remota; tarefa descartada localmente"
            );
            return Err(e);
        }
        let todo = guard.add_todo(payload);
        drop(guard);
        tracing::info!(%tenant_id, todo_id = todo.id, deal_id = todo.deal_id, "tarefa criada");
        Ok(todo)
    }

    pub async fn list_todos(&self, tenant_id: Uuid, query: &TodoQuery) -> Result<Vec<Todo>, AppError> {
        let today = query.today.unwrap_or_else(|| Utc::now().date_naive());
        self.list_todos_on(tenant_id, query, today).await
    }

    pub async fn list_todos_on(
        &self,
        tenant_id: Uuid,
        query: &TodoQuery,
        today: NaiveDate,
    ) -> Result<Vec<Todo>, AppError> {
        let store = self.registry.tenant(tenant_id).await;
        let todos = store.read().await.filter_todos(query, today);
        Ok(todos)
    }

    pub async fn todos_for_deal(&self, tenant_id: Uuid, deal_id: i64) -> Result<Vec<Todo>, AppError> {
        let store = self.registry.tenant(tenant_id).await;
        let guard = store.read().await;
        guard.deals.require(deal_id)?;
        Ok(guard.todos_for_deal(deal_id))
    }

    pub async fn update_todo(&self, tenant_id: Uuid, todo: Todo) -> Result<Todo, AppError> {
        let store = self.registry.tenant(tenant_id).await;
        let todo = store.write().await.update_todo(todo)?;
        Ok(todo)
    }

    pub async fn delete_todo(&self, tenant_id: Uuid, todo_id: i64) -> Result<bool, AppError> {
        let store = self.registry.tenant(tenant_id).await;
        let removed = store.write().await.delete_todo(todo_id);
        log_delete(tenant_id, "todo", todo_id, removed);
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        db::ReferencePolicy,
        models::{
            crm::{DealStatus, LeadType, NewDeal, NewLead},
            operations::{TodoDay, TodoStage},
        },
    };
    use chrono::TimeZone;
    use rust_decimal::Decimal;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FakeGateway {
        accept: bool,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl TodoGateway for FakeGateway {
        async fn create_todo(&self, _todo: &NewTodo) -> Result<(), AppError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.accept {
                Ok(())
            } else {
                Err(AppError::Upstream { status: 500, message: "boom".into() })
            }
        }
    }

    async fn seeded(registry: &StoreRegistry, tenant: Uuid) -> i64 {
        let store = registry.tenant(tenant).await;
        let mut guard = store.write().await;
        let lead = guard.add_lead(NewLead {
            name: "Nour".into(),
            phone: "0100".into(),
            email: None,
            project: None,
            campaign_id: None,
            assigned_to: None,
            lead_type: LeadType::Cold,
            notes: None,
        });
        guard
            .add_deal(NewDeal {
                lead_id: lead.id,
                client_name: lead.name,
                project: None,
                unit_id: None,
                status: DealStatus::Reservation,
                value: Decimal::new(500_000, 0),
                discount_percentage: Decimal::ZERO,
                sales_commission_percentage: Decimal::ZERO,
                notes: None,
            })
            .id
    }

    fn new_todo(deal_id: i64, day: u32) -> NewTodo {
        NewTodo {
            deal_id,
            title: "Follow up".into(),
            stage: TodoStage::Following,
            reminder_date: Utc.with_ymd_and_hms(2024, 6, day, 9, 0, 0).unwrap(),
            notes: None,
        }
    }

    #[tokio::test]
    async fn gateway_failure_stores_nothing() {
        let registry = StoreRegistry::new(ReferencePolicy::Restrict, false);
        let tenant = Uuid::new_v4();
        let deal_id = seeded(&registry, tenant).await;
        let gateway = Arc::new(FakeGateway { accept: false, calls: AtomicUsize::new(0) });
        let ops = OperationsService::new(registry.clone(), Some(gateway.clone()));

        let err = ops.create_todo(tenant, new_todo(deal_id, 3)).await.expect_err("rejected");

        assert!(matches!(err, AppError::Upstream { status: 500, .. }));
        assert_eq!(gateway.calls.load(Ordering::SeqCst), 1);
        assert!(registry.tenant(tenant).await.read().await.todos.is_empty());
    }

    /// Remove o negócio enquanto "confirma" a tarefa (delete concorrente).
    struct DealRemovingGateway {
        registry: StoreRegistry,
        tenant: Uuid,
        deal_id: i64,
    }

    #[async_trait]
    impl TodoGateway for DealRemovingGateway {
        async fn create_todo(&self, _todo: &NewTodo) -> Result<(), AppError> {
            let store = self.registry.tenant(self.tenant).await;
            store.write().await.delete_deal(self.deal_id)?;
            Ok(())
        }
    }

    #[tokio::test]
    async fn deal_deleted_during_confirmation_stores_nothing() {
        let registry = StoreRegistry::new(ReferencePolicy::Restrict, false);
        let tenant = Uuid::new_v4();
        let deal_id = seeded(&registry, tenant).await;
        let gateway = Arc::new(DealRemovingGateway { registry: registry.clone(), tenant, deal_id });
        let ops = OperationsService::new(registry.clone(), Some(gateway));

        let err = ops.create_todo(tenant, new_todo(deal_id, 3)).await.expect_err("deal gone");

        assert!(matches!(err, AppError::ResourceNotFound { entity: "deal", id } if id == deal_id));
        let store = registry.tenant(tenant).await;
        let guard = store.read().await;
        assert!(guard.todos.is_empty());
        assert!(!guard.deals.contains(deal_id));
    }

    #[tokio::test]
    async fn unknown_deal_never_reaches_the_gateway() {
        let registry = StoreRegistry::new(ReferencePolicy::Restrict, false);
        let gateway = Arc::new(FakeGateway { accept: true, calls: AtomicUsize::new(0) });
        let ops = OperationsService::new(registry, Some(gateway.clone()));

        let err = ops.create_todo(Uuid::new_v4(), new_todo(77, 3)).await.expect_err("no deal");

        assert!(matches!(err, AppError::ResourceNotFound { entity: "deal", id: 77 }));
        assert_eq!(gateway.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn day_filter_uses_the_supplied_today() {
        let registry = StoreRegistry::new(ReferencePolicy::Restrict, false);
        let tenant = Uuid::new_v4();
        let deal_id = seeded(&registry, tenant).await;
        let ops = OperationsService::new(registry, None);
        for day in [2, 3, 4] {
            ops.create_todo(tenant, new_todo(deal_id, day)).await.expect("todo");
        }

        let query = TodoQuery {
            day: TodoDay::Overdue,
            stage: None,
            today: NaiveDate::from_ymd_opt(2024, 6, 3),
        };
        let overdue = ops.list_todos(tenant, &query).await.expect("list");

        assert_eq!(overdue.len(), 1);
        assert_eq!(overdue[0].reminder_date.date_naive(), NaiveDate::from_ymd_opt(2024, 6, 2).unwrap());
        assert_eq!(ops.todos_for_deal(tenant, deal_id).await.expect("deal todos").len(), 3);
    }
}
