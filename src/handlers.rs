pub mod auth;
pub mod crm;
pub mod inventory;
pub mod operations;
pub mod settings;
