pub mod auth;
pub mod crm;
pub mod inventory;
pub mod operations;
pub mod session;
pub mod settings;

/// Registro guardado numa coleção do EntityStore.
pub trait Record: Clone {
    /// Nome usado em erros e logs ("lead", "deal", ...).
    const ENTITY: &'static str;

    fn id(&self) -> i64;
}

/// Registro com código sequencial legível (DEV001, PROJ002, ...).
pub trait Coded: Record {
    const CODE_PREFIX: &'static str;

    fn code(&self) -> &str;
}
