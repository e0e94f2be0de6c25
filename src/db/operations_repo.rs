// src/db/operations_repo.rs

use chrono::{NaiveDate, Utc};

use crate::{
    common::error::AppError,
    db::store::EntityStore,
    models::{
        operations::{NewTodo, Todo, TodoQuery},
        session::EntityRef,
    },
};

impl EntityStore {
    // =========================================================================
    //  TAREFAS (TODOS)
    // =========================================================================

    pub fn add_todo(&mut self, new: NewTodo) -> Todo {
        let todo = Todo {
            id: self.next_id(),
            deal_id: new.deal_id,
            title: new.title,
            stage: new.stage,
            reminder_date: new.reminder_date,
            notes: new.notes,
            created_at: Utc::now(),
        };
        self.todos.prepend(todo.clone());
        todo
    }

    /// Etapas de tarefas não têm tabela de transição.
    /// O negócio apontado precisa existir: tarefa órfã não entra no store.
    pub fn update_todo(&mut self, mut todo: Todo) -> Result<Todo, AppError> {
        todo.created_at = self.todos.require(todo.id)?.created_at;
        self.deals.require(todo.deal_id)?;
        self.todos.replace(todo.clone())?;
        Ok(todo)
    }

    pub fn delete_todo(&mut self, todo_id: i64) -> bool {
        let removed = self.todos.remove(todo_id).is_some();
        if removed {
            self.forget(EntityRef::Todo(todo_id));
        }
        removed
    }

    pub fn todos_for_deal(&self, deal_id: i64) -> Vec<Todo> {
        self.todos.iter().filter(|t| t.deal_id == deal_id).cloned().collect()
    }

    /// Filtro por dia + etapa, sempre a partir da coleção completa.
    pub fn filter_todos(&self, query: &TodoQuery, today: NaiveDate) -> Vec<Todo> {
        self.todos
            .iter()
            .filter(|t| query.day.matches(t.reminder_date.date_naive(), today))
            .filter(|t| query.stage.is_none_or(|stage| t.stage == stage))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        db::store::ReferencePolicy,
        models::{
            crm::{DealStatus, NewDeal},
            operations::{TodoDay, TodoStage},
        },
    };
    use chrono::{TimeZone, Utc};
    use rust_decimal::Decimal;

    fn todo(deal_id: i64, day: u32, stage: TodoStage) -> NewTodo {
        NewTodo {
            deal_id,
            title: format!("todo {day}"),
            stage,
            reminder_date: Utc.with_ymd_and_hms(2024, 5, day, 10, 0, 0).unwrap(),
            notes: None,
        }
    }

    #[test]
    fn filters_by_day_and_stage() {
        let mut store = EntityStore::new(ReferencePolicy::Restrict);
        store.add_todo(todo(1, 9, TodoStage::Meeting));
        store.add_todo(todo(1, 10, TodoStage::Meeting));
        store.add_todo(todo(2, 10, TodoStage::NoAnswer));
        store.add_todo(todo(2, 11, TodoStage::Broker));
        let today = NaiveDate::from_ymd_opt(2024, 5, 10).unwrap();

        let today_all = store.filter_todos(&TodoQuery { day: TodoDay::Today, ..Default::default() }, today);
        assert_eq!(today_all.len(), 2);

        let today_meetings = store.filter_todos(
            &TodoQuery { day: TodoDay::Today, stage: Some(TodoStage::Meeting), today: None },
            today,
        );
        assert_eq!(today_meetings.len(), 1);

        let overdue = store.filter_todos(&TodoQuery { day: TodoDay::Overdue, ..Default::default() }, today);
        assert_eq!(overdue[0].title, "todo 9");

        let tomorrow = store.filter_todos(&TodoQuery { day: TodoDay::Tomorrow, ..Default::default() }, today);
        assert_eq!(tomorrow[0].stage, TodoStage::Broker);

        assert_eq!(store.todos_for_deal(2).len(), 2);
    }

    fn store_with_deal() -> (EntityStore, i64) {
        let mut store = EntityStore::new(ReferencePolicy::Restrict);
        let deal = store.add_deal(NewDeal {
            lead_id: 1,
            client_name: "Hana".into(),
            project: None,
            unit_id: None,
            status: DealStatus::Reservation,
            value: Decimal::new(100_000, 0),
            discount_percentage: Decimal::ZERO,
            sales_commission_percentage: Decimal::ZERO,
            notes: None,
        });
        (store, deal.id)
    }

    #[test]
    fn any_stage_may_follow_any_other() {
        let (mut store, deal_id) = store_with_deal();
        let mut t = store.add_todo(todo(deal_id, 9, TodoStage::Resale));
        t.stage = TodoStage::Hold;
        assert_eq!(store.update_todo(t).expect("update").stage, TodoStage::Hold);
    }

    #[test]
    fn todo_cannot_move_to_a_missing_deal() {
        let (mut store, deal_id) = store_with_deal();
        let original = store.add_todo(todo(deal_id, 9, TodoStage::Meeting));

        let mut moved = original.clone();
        moved.deal_id = 9999;
        let err = store.update_todo(moved).expect_err("orphan");

        assert!(matches!(err, AppError::ResourceNotFound { entity: "deal", id: 9999 }));
        assert_eq!(store.todos.require(original.id).expect("todo").deal_id, deal_id);
        assert!(matches!(
            store.delete_deal(deal_id),
            Err(AppError::ReferenceConflict { dependent: "todo", count: 1, .. })
        ));
    }
}
