pub mod auth;
pub mod crm_service;
pub mod inventory_service;
pub mod operation_service;
pub mod settings_service;

pub use auth::{AuthApi, AuthService};
pub use crm_service::CrmService;
pub use inventory_service::InventoryService;
pub use operation_service::{OperationsService, TodoGateway};
pub use settings_service::SettingsService;
