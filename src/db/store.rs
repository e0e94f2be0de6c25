// src/db/store.rs

use std::{collections::HashMap, str::FromStr, sync::Arc};

use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    db::{collection::Collection, seed},
    models::{
        auth::User,
        crm::{Campaign, Deal, Lead, Stage},
        inventory::{Developer, Owner, Project, Service, Unit},
        operations::Todo,
        session::EntityRef,
    },
};

/// O que fazer ao remover um registro que ainda tem dependentes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReferencePolicy {
    /// Recusa a remoção (ReferenceConflict).
    #[default]
    Restrict,
    /// Remove os dependentes junto.
    Cascade,
}

impl FromStr for ReferencePolicy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "restrict" => Ok(ReferencePolicy::Restrict),
            "cascade" => Ok(ReferencePolicy::Cascade),
            other => Err(anyhow::anyhow!("REFERENCE_POLICY inválida: '{other}'")),
        }
    }
}

/// Sequência de ids do tenant. Monotônica, sem colisão dentro do store.
#[derive(Debug, Clone, Default)]
pub struct IdSequence {
    last: i64,
}

impl IdSequence {
    pub fn next(&mut self) -> i64 {
        self.last += 1;
        self.last
    }

    /// Garante que os próximos ids fiquem acima de `id` (usado após seed).
    pub fn bump_past(&mut self, id: i64) {
        self.last = self.last.max(id);
    }
}

// O store de um tenant: todas as coleções + seleções transitórias.
#[derive(Debug, Clone, Default)]
pub struct EntityStore {
    pub(crate) ids: IdSequence,
    pub(crate) policy: ReferencePolicy,

    pub leads: Collection<Lead>,
    pub deals: Collection<Deal>,
    pub campaigns: Collection<Campaign>,
    pub stages: Collection<Stage>,

    pub developers: Collection<Developer>,
    pub projects: Collection<Project>,
    pub units: Collection<Unit>,
    pub owners: Collection<Owner>,
    pub services: Collection<Service>,

    pub todos: Collection<Todo>,
    pub users: Collection<User>,

    // user_id -> entidade selecionada
    selections: HashMap<i64, EntityRef>,
}

impl EntityStore {
    pub fn new(policy: ReferencePolicy) -> Self {
        Self { policy, ..Self::default() }
    }

    pub fn policy(&self) -> ReferencePolicy {
        self.policy
    }

    pub(crate) fn next_id(&mut self) -> i64 {
        self.ids.next()
    }

    // --- Seleção (ponteiros transitórios por usuário) ---

    pub fn selection(&self, user_id: i64) -> Option<EntityRef> {
        self.selections.get(&user_id).copied()
    }

    pub fn set_selection(&mut self, user_id: i64, target: Option<EntityRef>) {
        match target {
            Some(target) => {
                self.selections.insert(user_id, target);
            }
            None => {
                self.selections.remove(&user_id);
            }
        }
    }

    /// A entidade apontada existe neste store?
    pub fn contains_ref(&self, target: EntityRef) -> bool {
        match target {
            EntityRef::Lead(id) => self.leads.contains(id),
            EntityRef::Deal(id) => self.deals.contains(id),
            EntityRef::Campaign(id) => self.campaigns.contains(id),
            EntityRef::Stage(id) => self.stages.contains(id),
            EntityRef::Developer(id) => self.developers.contains(id),
            EntityRef::Project(id) => self.projects.contains(id),
            EntityRef::Unit(id) => self.units.contains(id),
            EntityRef::Owner(id) => self.owners.contains(id),
            EntityRef::Service(id) => self.services.contains(id),
            EntityRef::Todo(id) => self.todos.contains(id),
            EntityRef::User(id) => self.users.contains(id),
        }
    }

    /// Chamado em toda remoção: ninguém fica apontando para um registro apagado.
    pub(crate) fn forget(&mut self, target: EntityRef) {
        self.selections.retain(|_, selected| *selected != target);
        if let EntityRef::User(user_id) = target {
            self.selections.remove(&user_id);
        }
    }

    /// Acerta a sequência de ids depois de carregar registros prontos.
    pub(crate) fn sync_id_sequence(&mut self) {
        let max = [
            self.leads.max_id(),
            self.deals.max_id(),
            self.campaigns.max_id(),
            self.stages.max_id(),
            self.developers.max_id(),
            self.projects.max_id(),
            self.units.max_id(),
            self.owners.max_id(),
            self.services.max_id(),
            self.todos.max_id(),
            self.users.max_id(),
        ]
        .into_iter()
        .max()
        .unwrap_or(0);
        self.ids.bump_past(max);
    }
}

pub type SharedStore = Arc<RwLock<EntityStore>>;

/// Um EntityStore por tenant, criado sob demanda no primeiro acesso.
#[derive(Clone, Default)]
pub struct StoreRegistry {
    tenants: Arc<RwLock<HashMap<Uuid, SharedStore>>>,
    policy: ReferencePolicy,
    seed_demo_data: bool,
}

impl StoreRegistry {
    pub fn new(policy: ReferencePolicy, seed_demo_data: bool) -> Self {
        Self {
            tenants: Arc::default(),
            policy,
            seed_demo_data,
        }
    }

    pub async fn tenant(&self, tenant_id: Uuid) -> SharedStore {
        if let Some(store) = self.tenants.read().await.get(&tenant_id) {
            return store.clone();
        }

        let mut tenants = self.tenants.write().await;
        tenants
            .entry(tenant_id)
            .or_insert_with(|| {
                let mut store = EntityStore::new(self.policy);
                if self.seed_demo_data {
                    seed::load_demo_data(&mut store);
                }
                tracing::info!(%tenant_id, seeded = self.seed_demo_data, "store do tenant criado");
                Arc::new(RwLock::new(store))
            })
            .clone()
    }

    pub async fn tenant_count(&self) -> usize {
        self.tenants.read().await.len()
    }
}
