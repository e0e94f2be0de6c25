// src/models/operations.rs

use chrono::{DateTime, Days, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::models::Record;

// --- Enums ---

/// Etapa do follow-up de um negócio. Qualquer etapa pode seguir qualquer outra.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum TodoStage {
    Hold,
    Meeting,
    DoneMeeting,
    Following,
    NoAnswer,
    WhatsappPending,
    OutOfService,
    Cancellation,
    NotInterested,
    FollowAfterMeeting,
    RescheduleMeeting,
    Broker,
    Resale,
}

/// Filtro por dia relativo a "hoje".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum TodoDay {
    #[default]
    All,
    Today,
    Tomorrow,
    Overdue,
    Upcoming,
}

impl TodoDay {
    pub fn matches(self, reminder: NaiveDate, today: NaiveDate) -> bool {
        let tomorrow = today.checked_add_days(Days::new(1));
        match self {
            TodoDay::All => true,
            TodoDay::Today => reminder == today,
            TodoDay::Tomorrow => Some(reminder) == tomorrow,
            TodoDay::Overdue => reminder < today,
            TodoDay::Upcoming => reminder > today,
        }
    }
}

// --- Structs ---

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: i64,
    pub deal_id: i64,
    #[validate(length(min = 1, message = "required"))]
    pub title: String,
    pub stage: TodoStage,
    pub reminder_date: DateTime<Utc>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Record for Todo {
    const ENTITY: &'static str = "todo";

    fn id(&self) -> i64 {
        self.id
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewTodo {
    pub deal_id: i64,
    #[validate(length(min = 1, message = "required"))]
    #[schema(example = "Call back about the down payment")]
    pub title: String,
    pub stage: TodoStage,
    pub reminder_date: DateTime<Utc>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct TodoQuery {
    #[serde(default)]
    pub day: TodoDay,
    pub stage: Option<TodoStage>,
    /// Data de referência; sem ela, usa a data UTC atual.
    pub today: Option<NaiveDate>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("date")
    }

    #[test]
    fn day_filter_is_relative_to_today() {
        let today = date(2024, 3, 31);
        assert!(TodoDay::Today.matches(today, today));
        assert!(TodoDay::Tomorrow.matches(date(2024, 4, 1), today));
        assert!(TodoDay::Overdue.matches(date(2024, 3, 30), today));
        assert!(!TodoDay::Overdue.matches(today, today));
        assert!(TodoDay::Upcoming.matches(date(2024, 4, 1), today));
        assert!(TodoDay::All.matches(date(1999, 1, 1), today));
    }

    #[test]
    fn stages_use_snake_case_on_the_wire() {
        let json = serde_json::to_string(&TodoStage::FollowAfterMeeting).expect("json");
        assert_eq!(json, "\"follow_after_meeting\"");
        let stage: TodoStage = serde_json::from_str("\"whatsapp_pending\"").expect("stage");
        assert_eq!(stage, TodoStage::WhatsappPending);
    }
}
