// src/services/inventory_service.rs

use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::StoreRegistry,
    models::inventory::{
        Developer, NewDeveloper, NewOwner, NewProject, NewService, NewUnit, Owner, Project,
        Service, Unit,
    },
    services::crm_service::log_delete,
};

#[derive(Clone)]
pub struct InventoryService {
    registry: StoreRegistry,
}

impl InventoryService {
    pub fn new(registry: StoreRegistry) -> Self {
        Self { registry }
    }

    // --- Incorporadoras ---

    pub async fn create_developer(&self, tenant_id: Uuid, payload: NewDeveloper) -> Result<Developer, AppError> {
        let store = self.registry.tenant(tenant_id).await;
        let developer = store.write().await.add_developer(payload);
        tracing::info!(%tenant_id, code = %developer.code, "incorporadora criada");
        Ok(developer)
    }

    pub async fn list_developers(&self, tenant_id: Uuid) -> Result<Vec<Developer>, AppError> {
        let store = self.registry.tenant(tenant_id).await;
        let developers = store.read().await.developers.all().to_vec();
        Ok(developers)
    }

    pub async fn update_developer(&self, tenant_id: Uuid, developer: Developer) -> Result<Developer, AppError> {
        let store = self.registry.tenant(tenant_id).await;
        let developer = store.write().await.update_developer(developer)?;
        Ok(developer)
    }

    pub async fn delete_developer(&self, tenant_id: Uuid, developer_id: i64) -> Result<bool, AppError> {
        let store = self.registry.tenant(tenant_id).await;
        let removed = store.write().await.delete_developer(developer_id)?;
        log_delete(tenant_id, "developer", developer_id, removed);
        Ok(removed)
    }

    // --- Projetos ---

    pub async fn create_project(&self, tenant_id: Uuid, payload: NewProject) -> Result<Project, AppError> {
        let store = self.registry.tenant(tenant_id).await;
        let project = store.write().await.add_project(payload)?;
        tracing::info!(%tenant_id, code = %project.code, developer_id = project.developer_id, "projeto criado");
        Ok(project)
    }

    pub async fn list_projects(&self, tenant_id: Uuid, developer_id: Option<i64>) -> Result<Vec<Project>, AppError> {
        let store = self.registry.tenant(tenant_id).await;
        let guard = store.read().await;
        let projects = guard
            .projects
            .iter()
            .filter(|p| developer_id.is_none_or(|id| p.developer_id == id))
            .cloned()
            .collect();
        Ok(projects)
    }

    pub async fn update_project(&self, tenant_id: Uuid, project: Project) -> Result<Project, AppError> {
        let store = self.registry.tenant(tenant_id).await;
        let project = store.write().await.update_project(project)?;
        Ok(project)
    }

    pub async fn delete_project(&self, tenant_id: Uuid, project_id: i64) -> Result<bool, AppError> {
        let store = self.registry.tenant(tenant_id).await;
        let removed = store.write().await.delete_project(project_id)?;
        log_delete(tenant_id, "project", project_id, removed);
        Ok(removed)
    }

    // --- Proprietários ---

    pub async fn create_owner(&self, tenant_id: Uuid, payload: NewOwner) -> Result<Owner, AppError> {
        let store = self.registry.tenant(tenant_id).await;
        let owner = store.write().await.add_owner(payload);
        tracing::info!(%tenant_id, code = %owner.code, "proprietário criado");
        Ok(owner)
    }

    pub async fn list_owners(&self, tenant_id: Uuid) -> Result<Vec<Owner>, AppError> {
        let store = self.registry.tenant(tenant_id).await;
        let owners = store.read().await.owners.all().to_vec();
        Ok(owners)
    }

    pub async fn update_owner(&self, tenant_id: Uuid, owner: Owner) -> Result<Owner, AppError> {
        let store = self.registry.tenant(tenant_id).await;
        let owner = store.write().await.update_owner(owner)?;
        Ok(owner)
    }

    pub async fn delete_owner(&self, tenant_id: Uuid, owner_id: i64) -> Result<bool, AppError> {
        let store = self.registry.tenant(tenant_id).await;
        let removed = store.write().await.delete_owner(owner_id)?;
        log_delete(tenant_id, "owner", owner_id, removed);
        Ok(removed)
    }

    // --- Unidades ---

    pub async fn create_unit(&self, tenant_id: Uuid, payload: NewUnit) -> Result<Unit, AppError> {
        let store = self.registry.tenant(tenant_id).await;
        let unit = store.write().await.add_unit(payload)?;
        tracing::info!(%tenant_id, code = %unit.code, project_id = unit.project_id, "unidade criada");
        Ok(unit)
    }

    pub async fn list_units(&self, tenant_id: Uuid, project_id: Option<i64>) -> Result<Vec<Unit>, AppError> {
        let store = self.registry.tenant(tenant_id).await;
        let guard = store.read().await;
        let units = guard
            .units
            .iter()
            .filter(|u| project_id.is_none_or(|id| u.project_id == id))
            .cloned()
            .collect();
        Ok(units)
    }

    pub async fn update_unit(&self, tenant_id: Uuid, unit: Unit) -> Result<Unit, AppError> {
        let store = self.registry.tenant(tenant_id).await;
        let unit = store.write().await.update_unit(unit)?;
        Ok(unit)
    }

    pub async fn delete_unit(&self, tenant_id: Uuid, unit_id: i64) -> Result<bool, AppError> {
        let store = self.registry.tenant(tenant_id).await;
        let removed = store.write().await.delete_unit(unit_id);
        log_delete(tenant_id, "unit", unit_id, removed);
        Ok(removed)
    }

    // --- Serviços ---

    pub async fn create_service(&self, tenant_id: Uuid, payload: NewService) -> Result<Service, AppError> {
        let store = self.registry.tenant(tenant_id).await;
        let service = store.write().await.add_service(payload);
        tracing::info!(%tenant_id, code = %service.code, "serviço criado");
        Ok(service)
    }

    pub async fn list_services(&self, tenant_id: Uuid) -> Result<Vec<Service>, AppError> {
        let store = self.registry.tenant(tenant_id).await;
        let services = store.read().await.services.all().to_vec();
        Ok(services)
    }

    pub async fn update_service(&self, tenant_id: Uuid, service: Service) -> Result<Service, AppError> {
        let store = self.registry.tenant(tenant_id).await;
        let service = store.write().await.update_service(service)?;
        Ok(service)
    }

    pub async fn delete_service(&self, tenant_id: Uuid, service_id: i64) -> Result<bool, AppError> {
        let store = self.registry.tenant(tenant_id).await;
        let removed = store.write().await.delete_service(service_id);
        log_delete(tenant_id, "service", service_id, removed);
        Ok(removed)
    }
}
