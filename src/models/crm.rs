// src/models/crm.rs

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationError};

use crate::models::Record;

// --- ENUMS ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum LeadStatus {
    Untouched,
    Touched,
    Following,
    Meeting,
    #[serde(rename = "No Answer")]
    NoAnswer,
    #[serde(rename = "Out Of Service")]
    OutOfService,
}

impl LeadStatus {
    pub fn label(self) -> &'static str {
        match self {
            LeadStatus::Untouched => "Untouched",
            LeadStatus::Touched => "Touched",
            LeadStatus::Following => "Following",
            LeadStatus::Meeting => "Meeting",
            LeadStatus::NoAnswer => "No Answer",
            LeadStatus::OutOfService => "Out Of Service",
        }
    }

    /// Tabela de transições do funil de leads.
    /// - ninguém volta para Untouched;
    /// - Out Of Service só sai para Following;
    /// - Meeting exige contato prévio (Touched, Following ou No Answer).
    pub fn can_transition_to(self, next: LeadStatus) -> bool {
        use LeadStatus::*;

        if self == next {
            return true;
        }
        match (self, next) {
            (_, Untouched) => false,
            (OutOfService, to) => to == Following,
            (from, Meeting) => matches!(from, Touched | Following | NoAnswer),
            _ => true,
        }
    }
}

impl fmt::Display for LeadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum LeadType {
    Fresh,
    Cold,
    Rotated,
    My,
}

/// Categorias do menu lateral de leads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum LeadCategory {
    #[default]
    All,
    Fresh,
    Cold,
    Rotated,
    /// Leads atribuídos ao usuário que faz a consulta.
    My,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum DealStatus {
    Reservation,
    Contracted,
    Closed,
}

impl DealStatus {
    /// Reservation -> Contracted -> Closed (ou direto para Closed). Sem volta.
    pub fn can_transition_to(self, next: DealStatus) -> bool {
        use DealStatus::*;

        self == next
            || matches!(
                (self, next),
                (Reservation, Contracted) | (Reservation, Closed) | (Contracted, Closed)
            )
    }
}

impl fmt::Display for DealStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            DealStatus::Reservation => "Reservation",
            DealStatus::Contracted => "Contracted",
            DealStatus::Closed => "Closed",
        };
        f.write_str(label)
    }
}

// --- Validações customizadas ---

pub(crate) fn validate_percentage(val: &Decimal) -> Result<(), ValidationError> {
    if val.is_sign_negative() || *val > Decimal::ONE_HUNDRED {
        let mut err = ValidationError::new("range");
        err.message = Some("invalid_percentage".into());
        return Err(err);
    }
    Ok(())
}

pub(crate) fn validate_not_negative(val: &Decimal) -> Result<(), ValidationError> {
    if val.is_sign_negative() {
        let mut err = ValidationError::new("range");
        err.message = Some("negative_amount".into());
        return Err(err);
    }
    Ok(())
}

// --- LEADS ---

/// Entrada da linha do tempo do lead. Só cresce.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub at: DateTime<Utc>,
    pub from: Option<LeadStatus>,
    pub to: Option<LeadStatus>,
    pub note: Option<String>,
    pub author_id: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Lead {
    pub id: i64,
    #[validate(length(min = 1, message = "required"))]
    pub name: String,
    #[validate(length(min = 1, message = "required"))]
    pub phone: String,
    #[validate(email(message = "invalid_email"))]
    pub email: Option<String>,
    pub project: Option<String>,
    pub campaign_id: Option<i64>,
    pub assigned_to: Option<i64>,
    #[serde(rename = "type")]
    pub lead_type: LeadType,
    pub status: LeadStatus,
    pub last_stage: LeadStatus,
    pub notes: Option<String>,
    #[serde(default)]
    pub history: Vec<HistoryEntry>,
    pub created_at: DateTime<Utc>,
}

impl Record for Lead {
    const ENTITY: &'static str = "lead";

    fn id(&self) -> i64 {
        self.id
    }
}

// Status, lastStage e history não existem aqui: o store sempre define.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewLead {
    #[validate(length(min = 1, message = "required"))]
    #[schema(example = "Mona Hassan")]
    pub name: String,

    #[validate(length(min = 1, message = "required"))]
    #[schema(example = "+201001234567")]
    pub phone: String,

    #[validate(email(message = "invalid_email"))]
    pub email: Option<String>,
    pub project: Option<String>,
    pub campaign_id: Option<i64>,
    pub assigned_to: Option<i64>,
    #[serde(rename = "type")]
    pub lead_type: LeadType,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct LeadQuery {
    #[serde(default)]
    pub category: LeadCategory,
    pub status: Option<LeadStatus>,
    pub search: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LeadNotePayload {
    #[validate(length(min = 1, message = "required"))]
    pub note: String,
}

// --- DEALS ---

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Deal {
    pub id: i64,
    /// Referência fraca: o lead pode não existir mais (ver LeadRef).
    pub lead_id: i64,
    #[validate(length(min = 1, message = "required"))]
    pub client_name: String,
    pub project: Option<String>,
    pub unit_id: Option<i64>,
    pub status: DealStatus,
    #[validate(custom(function = "validate_not_negative"))]
    pub value: Decimal,
    #[validate(custom(function = "validate_percentage"))]
    pub discount_percentage: Decimal,
    #[serde(default)]
    pub discount_amount: Decimal,
    #[validate(custom(function = "validate_percentage"))]
    pub sales_commission_percentage: Decimal,
    #[serde(default)]
    pub sales_commission_amount: Decimal,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Record for Deal {
    const ENTITY: &'static str = "deal";

    fn id(&self) -> i64 {
        self.id
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewDeal {
    pub lead_id: i64,

    #[validate(length(min = 1, message = "required"))]
    pub client_name: String,

    pub project: Option<String>,
    pub unit_id: Option<i64>,

    #[serde(default = "default_deal_status")]
    pub status: DealStatus,

    #[validate(custom(function = "validate_not_negative"))]
    #[schema(example = "2500000")]
    pub value: Decimal,

    #[serde(default)]
    #[validate(custom(function = "validate_percentage"))]
    pub discount_percentage: Decimal,

    #[serde(default)]
    #[validate(custom(function = "validate_percentage"))]
    pub sales_commission_percentage: Decimal,

    pub notes: Option<String>,
}

fn default_deal_status() -> DealStatus {
    DealStatus::Reservation
}

/// Pré-visualização dos valores derivados, sem gravar nada.
#[derive(Debug, Clone, Deserialize, Validate, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct DealAmountsQuery {
    #[validate(custom(function = "validate_not_negative"))]
    pub value: Decimal,
    #[serde(default)]
    #[validate(custom(function = "validate_percentage"))]
    pub discount_percentage: Decimal,
    #[serde(default)]
    #[validate(custom(function = "validate_percentage"))]
    pub sales_commission_percentage: Decimal,
}

/// Lead resolvido na leitura. `Missing` é o sentinela explícito de referência quebrada.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum LeadRef {
    Found { id: i64, name: String, phone: String },
    Missing { id: i64 },
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DealView {
    #[serde(flatten)]
    pub deal: Deal,
    pub lead: LeadRef,
}

// --- CAMPANHAS ---

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Campaign {
    pub id: i64,
    #[validate(length(min = 1, message = "required"))]
    pub name: String,
    pub platform: Option<String>,
    pub is_active: bool,
    #[validate(custom(function = "validate_not_negative"))]
    pub budget: Decimal,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

impl Record for Campaign {
    const ENTITY: &'static str = "campaign";

    fn id(&self) -> i64 {
        self.id
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewCampaign {
    #[validate(length(min = 1, message = "required"))]
    #[schema(example = "Summer Launch")]
    pub name: String,
    #[schema(example = "Facebook")]
    pub platform: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    #[validate(custom(function = "validate_not_negative"))]
    pub budget: Decimal,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

pub(crate) fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct CampaignQuery {
    pub search: Option<String>,
    pub active: Option<bool>,
}

// --- ETAPAS DO FUNIL ---

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Stage {
    pub id: i64,
    #[validate(length(min = 1, message = "required"))]
    #[schema(example = "Negotiation")]
    pub name: String,
    #[schema(example = "#FF5733")]
    pub color: Option<String>,
    pub position: i32,
}

impl Record for Stage {
    const ENTITY: &'static str = "stage";

    fn id(&self) -> i64 {
        self.id
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewStage {
    #[validate(length(min = 1, message = "required"))]
    pub name: String,
    pub color: Option<String>,
    #[serde(default)]
    pub position: i32,
}
