pub mod collection;
pub mod store;
pub mod seed;
pub mod crm_repo;
pub mod inventory_repo;
pub mod operations_repo;
pub mod user_repo;

pub use store::{EntityStore, ReferencePolicy, SharedStore, StoreRegistry};
