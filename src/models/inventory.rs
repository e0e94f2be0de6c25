// src/models/inventory.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::models::{
    crm::{default_true, validate_not_negative},
    Coded, Record,
};

// Implementa Record + Coded para as entidades com código sequencial.
macro_rules! coded_record {
    ($ty:ty, $entity:literal, $prefix:literal) => {
        impl Record for $ty {
            const ENTITY: &'static str = $entity;

            fn id(&self) -> i64 {
                self.id
            }
        }

        impl Coded for $ty {
            const CODE_PREFIX: &'static str = $prefix;

            fn code(&self) -> &str {
                &self.code
            }
        }
    };
}

// --- 1. Incorporadoras ---
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Developer {
    pub id: i64,
    #[schema(example = "DEV001")]
    pub code: String,
    #[validate(length(min = 1, message = "required"))]
    pub name: String,
    pub phone: Option<String>,
    #[validate(email(message = "invalid_email"))]
    pub email: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

coded_record!(Developer, "developer", "DEV");

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewDeveloper {
    #[validate(length(min = 1, message = "required"))]
    #[schema(example = "Palm Hills")]
    pub name: String,
    pub phone: Option<String>,
    #[validate(email(message = "invalid_email"))]
    pub email: Option<String>,
    pub notes: Option<String>,
}

// --- 2. Projetos (de uma incorporadora) ---
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: i64,
    #[schema(example = "PROJ001")]
    pub code: String,
    pub developer_id: i64,
    #[validate(length(min = 1, message = "required"))]
    pub name: String,
    pub location: Option<String>,
    pub created_at: DateTime<Utc>,
}

coded_record!(Project, "project", "PROJ");

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewProject {
    pub developer_id: i64,
    #[validate(length(min = 1, message = "required"))]
    pub name: String,
    pub location: Option<String>,
}

// --- 3. Proprietários ---
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Owner {
    pub id: i64,
    #[schema(example = "OWN001")]
    pub code: String,
    #[validate(length(min = 1, message = "required"))]
    pub name: String,
    pub phone: Option<String>,
    #[validate(email(message = "invalid_email"))]
    pub email: Option<String>,
    pub created_at: DateTime<Utc>,
}

coded_record!(Owner, "owner", "OWN");

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewOwner {
    #[validate(length(min = 1, message = "required"))]
    pub name: String,
    pub phone: Option<String>,
    #[validate(email(message = "invalid_email"))]
    pub email: Option<String>,
}

// --- 4. Unidades (de um projeto, opcionalmente de um proprietário) ---
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum UnitStatus {
    Available,
    Reserved,
    Sold,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Unit {
    pub id: i64,
    #[schema(example = "UNIT001")]
    pub code: String,
    pub project_id: i64,
    pub owner_id: Option<i64>,
    #[schema(example = "Apartment")]
    pub unit_type: Option<String>,
    pub area: Option<Decimal>,
    #[validate(custom(function = "validate_not_negative"))]
    pub price: Decimal,
    pub status: UnitStatus,
    pub created_at: DateTime<Utc>,
}

coded_record!(Unit, "unit", "UNIT");

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewUnit {
    pub project_id: i64,
    pub owner_id: Option<i64>,
    pub unit_type: Option<String>,
    pub area: Option<Decimal>,
    #[validate(custom(function = "validate_not_negative"))]
    pub price: Decimal,
    #[serde(default = "default_unit_status")]
    pub status: UnitStatus,
}

fn default_unit_status() -> UnitStatus {
    UnitStatus::Available
}

// --- 5. Serviços / Produtos ---
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    pub id: i64,
    #[schema(example = "SRV001")]
    pub code: String,
    #[validate(length(min = 1, message = "required"))]
    pub name: String,
    pub category: Option<String>,
    #[validate(custom(function = "validate_not_negative"))]
    pub price: Decimal,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

coded_record!(Service, "service", "SRV");

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewService {
    #[validate(length(min = 1, message = "required"))]
    pub name: String,
    pub category: Option<String>,
    #[validate(custom(function = "validate_not_negative"))]
    pub price: Decimal,
    #[serde(default = "default_true")]
    pub is_active: bool,
}
