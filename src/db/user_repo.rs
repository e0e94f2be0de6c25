// src/db/user_repo.rs

use chrono::Utc;

use crate::{
    common::error::AppError,
    db::store::EntityStore,
    models::{
        auth::{NewUser, User},
        session::EntityRef,
    },
};

// Usuários do tenant. Leads atribuídos a um usuário removido ficam com o id
// antigo; o filtro "My" simplesmente deixa de encontrá-los.
impl EntityStore {
    pub fn add_user(&mut self, new: NewUser) -> User {
        let user = User {
            id: self.next_id(),
            name: new.name,
            email: new.email,
            phone: new.phone,
            role: new.role,
            is_active: new.is_active,
            created_at: Utc::now(),
        };
        self.users.prepend(user.clone());
        user
    }

    pub fn find_user_by_email(&self, email: &str) -> Option<&User> {
        self.users.iter().find(|u| u.email.eq_ignore_ascii_case(email))
    }

    pub fn update_user(&mut self, mut user: User) -> Result<User, AppError> {
        user.created_at = self.users.require(user.id)?.created_at;
        self.users.replace(user.clone())?;
        Ok(user)
    }

    /// Id inexistente: coleção intacta, sem erro.
    pub fn delete_user(&mut self, user_id: i64) -> bool {
        let removed = self.users.remove(user_id).is_some();
        if removed {
            self.forget(EntityRef::User(user_id));
        }
        removed
    }
}
