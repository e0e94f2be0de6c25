// src/models/session.rs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Ponteiro para a entidade selecionada por um usuário.
/// O store limpa a seleção quando a entidade apontada é removida.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "kind", content = "id", rename_all = "camelCase")]
pub enum EntityRef {
    Lead(i64),
    Deal(i64),
    Campaign(i64),
    Stage(i64),
    Developer(i64),
    Project(i64),
    Unit(i64),
    Owner(i64),
    Service(i64),
    Todo(i64),
    User(i64),
}

impl EntityRef {
    pub fn entity(self) -> &'static str {
        match self {
            EntityRef::Lead(_) => "lead",
            EntityRef::Deal(_) => "deal",
            EntityRef::Campaign(_) => "campaign",
            EntityRef::Stage(_) => "stage",
            EntityRef::Developer(_) => "developer",
            EntityRef::Project(_) => "project",
            EntityRef::Unit(_) => "unit",
            EntityRef::Owner(_) => "owner",
            EntityRef::Service(_) => "service",
            EntityRef::Todo(_) => "todo",
            EntityRef::User(_) => "user",
        }
    }

    pub fn id(self) -> i64 {
        match self {
            EntityRef::Lead(id)
            | EntityRef::Deal(id)
            | EntityRef::Campaign(id)
            | EntityRef::Stage(id)
            | EntityRef::Developer(id)
            | EntityRef::Project(id)
            | EntityRef::Unit(id)
            | EntityRef::Owner(id)
            | EntityRef::Service(id)
            | EntityRef::Todo(id)
            | EntityRef::User(id) => id,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Selection {
    pub selected: Option<EntityRef>,
}
