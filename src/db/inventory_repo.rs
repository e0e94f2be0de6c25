// src/db/inventory_repo.rs

use chrono::Utc;

use crate::{
    common::error::AppError,
    db::store::{EntityStore, ReferencePolicy},
    models::{
        inventory::{
            Developer, NewDeveloper, NewOwner, NewProject, NewService, NewUnit, Owner, Project,
            Service, Unit,
        },
        session::EntityRef,
    },
};

// Códigos são do sistema: o update mantém o código e a data de criação guardados.

impl EntityStore {
    // =========================================================================
    //  INCORPORADORAS
    // =========================================================================

    pub fn add_developer(&mut self, new: NewDeveloper) -> Developer {
        let developer = Developer {
            id: self.next_id(),
            code: self.developers.next_code(),
            name: new.name,
            phone: new.phone,
            email: new.email,
            notes: new.notes,
            created_at: Utc::now(),
        };
        self.developers.prepend(developer.clone());
        developer
    }

    pub fn update_developer(&mut self, mut developer: Developer) -> Result<Developer, AppError> {
        let current = self.developers.require(developer.id)?;
        developer.code = current.code.clone();
        developer.created_at = current.created_at;
        self.developers.replace(developer.clone())?;
        Ok(developer)
    }

    pub fn delete_developer(&mut self, developer_id: i64) -> Result<bool, AppError> {
        if !self.developers.contains(developer_id) {
            return Ok(false);
        }

        let project_ids: Vec<i64> = self
            .projects
            .iter()
            .filter(|p| p.developer_id == developer_id)
            .map(|p| p.id)
            .collect();

        if !project_ids.is_empty() {
            match self.policy {
                ReferencePolicy::Restrict => {
                    return Err(AppError::ReferenceConflict {
                        entity: "developer",
                        id: developer_id,
                        dependent: "project",
                        count: project_ids.len(),
                    });
                }
                ReferencePolicy::Cascade => {
                    for project_id in project_ids {
                        self.delete_project(project_id)?;
                    }
                }
            }
        }

        self.developers.remove(developer_id);
        self.forget(EntityRef::Developer(developer_id));
        Ok(true)
    }

    // =========================================================================
    //  PROJETOS
    // =========================================================================

    pub fn add_project(&mut self, new: NewProject) -> Result<Project, AppError> {
        self.developers.require(new.developer_id)?;

        let project = Project {
            id: self.next_id(),
            code: self.projects.next_code(),
            developer_id: new.developer_id,
            name: new.name,
            location: new.location,
            created_at: Utc::now(),
        };
        self.projects.prepend(project.clone());
        Ok(project)
    }

    pub fn update_project(&mut self, mut project: Project) -> Result<Project, AppError> {
        self.developers.require(project.developer_id)?;
        let current = self.projects.require(project.id)?;
        project.code = current.code.clone();
        project.created_at = current.created_at;
        self.projects.replace(project.clone())?;
        Ok(project)
    }

    pub fn delete_project(&mut self, project_id: i64) -> Result<bool, AppError> {
        if !self.projects.contains(project_id) {
            return Ok(false);
        }

        let unit_count = self.units.count_where(|u| u.project_id == project_id);
        if unit_count > 0 {
            match self.policy {
                ReferencePolicy::Restrict => {
                    return Err(AppError::ReferenceConflict {
                        entity: "project",
                        id: project_id,
                        dependent: "unit",
                        count: unit_count,
                    });
                }
                ReferencePolicy::Cascade => {
                    for unit in self.units.remove_where(|u| u.project_id == project_id) {
                        self.forget(EntityRef::Unit(unit.id));
                    }
                }
            }
        }

        self.projects.remove(project_id);
        self.forget(EntityRef::Project(project_id));
        Ok(true)
    }

    // =========================================================================
    //  PROPRIETÁRIOS
    // =========================================================================

    pub fn add_owner(&mut self, new: NewOwner) -> Owner {
        let owner = Owner {
            id: self.next_id(),
            code: self.owners.next_code(),
            name: new.name,
            phone: new.phone,
            email: new.email,
            created_at: Utc::now(),
        };
        self.owners.prepend(owner.clone());
        owner
    }

    pub fn update_owner(&mut self, mut owner: Owner) -> Result<Owner, AppError> {
        let current = self.owners.require(owner.id)?;
        owner.code = current.code.clone();
        owner.created_at = current.created_at;
        self.owners.replace(owner.clone())?;
        Ok(owner)
    }

    /// Em Cascade a unidade continua existindo; só perde o proprietário.
    pub fn delete_owner(&mut self, owner_id: i64) -> Result<bool, AppError> {
        if !self.owners.contains(owner_id) {
            return Ok(false);
        }

        let unit_count = self.units.count_where(|u| u.owner_id == Some(owner_id));
        if unit_count > 0 {
            match self.policy {
                ReferencePolicy::Restrict => {
                    return Err(AppError::ReferenceConflict {
                        entity: "owner",
                        id: owner_id,
                        dependent: "unit",
                        count: unit_count,
                    });
                }
                ReferencePolicy::Cascade => {
                    let unit_ids: Vec<i64> = self
                        .units
                        .iter()
                        .filter(|u| u.owner_id == Some(owner_id))
                        .map(|u| u.id)
                        .collect();
                    for unit_id in unit_ids {
                        if let Some(unit) = self.units.get_mut(unit_id) {
                            unit.owner_id = None;
                        }
                    }
                }
            }
        }

        self.owners.remove(owner_id);
        self.forget(EntityRef::Owner(owner_id));
        Ok(true)
    }

    // =========================================================================
    //  UNIDADES
    // =========================================================================

    fn check_unit_references(&self, project_id: i64, owner_id: Option<i64>) -> Result<(), AppError> {
        self.projects.require(project_id)?;
        if let Some(owner_id) = owner_id {
            self.owners.require(owner_id)?;
        }
        Ok(())
    }

    pub fn add_unit(&mut self, new: NewUnit) -> Result<Unit, AppError> {
        self.check_unit_references(new.project_id, new.owner_id)?;

        let unit = Unit {
            id: self.next_id(),
            code: self.units.next_code(),
            project_id: new.project_id,
            owner_id: new.owner_id,
            unit_type: new.unit_type,
            area: new.area,
            price: new.price,
            status: new.status,
            created_at: Utc::now(),
        };
        self.units.prepend(unit.clone());
        Ok(unit)
    }

    pub fn update_unit(&mut self, mut unit: Unit) -> Result<Unit, AppError> {
        self.check_unit_references(unit.project_id, unit.owner_id)?;
        let current = self.units.require(unit.id)?;
        unit.code = current.code.clone();
        unit.created_at = current.created_at;
        self.units.replace(unit.clone())?;
        Ok(unit)
    }

    pub fn delete_unit(&mut self, unit_id: i64) -> bool {
        let removed = self.units.remove(unit_id).is_some();
        if removed {
            self.forget(EntityRef::Unit(unit_id));
        }
        removed
    }

    // =========================================================================
    //  SERVIÇOS / PRODUTOS
    // =========================================================================

    pub fn add_service(&mut self, new: NewService) -> Service {
        let service = Service {
            id: self.next_id(),
            code: self.services.next_code(),
            name: new.name,
            category: new.category,
            price: new.price,
            is_active: new.is_active,
            created_at: Utc::now(),
        };
        self.services.prepend(service.clone());
        service
    }

    pub fn update_service(&mut self, mut service: Service) -> Result<Service, AppError> {
        let current = self.services.require(service.id)?;
        service.code = current.code.clone();
        service.created_at = current.created_at;
        self.services.replace(service.clone())?;
        Ok(service)
    }

    pub fn delete_service(&mut self, service_id: i64) -> bool {
        let removed = self.services.remove(service_id).is_some();
        if removed {
            self.forget(EntityRef::Service(service_id));
        }
        removed
    }
}
