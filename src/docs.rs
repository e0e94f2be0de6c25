// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use crate::common;
use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::login,
        handlers::auth::register,
        handlers::auth::change_password,
        handlers::auth::logout,

        // --- Users ---
        handlers::auth::get_me,
        handlers::auth::list_users,
        handlers::auth::create_user,
        handlers::auth::update_user,
        handlers::auth::delete_user,
        handlers::auth::get_selection,
        handlers::auth::set_selection,

        // --- CRM ---
        handlers::crm::list_leads,
        handlers::crm::create_lead,
        handlers::crm::get_lead,
        handlers::crm::update_lead,
        handlers::crm::add_lead_note,
        handlers::crm::delete_lead,
        handlers::crm::list_deals,
        handlers::crm::create_deal,
        handlers::crm::preview_deal_amounts,
        handlers::crm::get_deal,
        handlers::crm::update_deal,
        handlers::crm::delete_deal,
        handlers::crm::list_campaigns,
        handlers::crm::create_campaign,
        handlers::crm::update_campaign,
        handlers::crm::delete_campaign,
        handlers::crm::list_stages,
        handlers::crm::create_stage,
        handlers::crm::update_stage,
        handlers::crm::delete_stage,

        // --- INVENTORY ---
        handlers::inventory::list_developers,
        handlers::inventory::create_developer,
        handlers::inventory::update_developer,
        handlers::inventory::delete_developer,
        handlers::inventory::list_projects,
        handlers::inventory::create_project,
        handlers::inventory::update_project,
        handlers::inventory::delete_project,
        handlers::inventory::list_owners,
        handlers::inventory::create_owner,
        handlers::inventory::update_owner,
        handlers::inventory::delete_owner,
        handlers::inventory::list_units,
        handlers::inventory::create_unit,
        handlers::inventory::update_unit,
        handlers::inventory::delete_unit,
        handlers::inventory::list_services,
        handlers::inventory::create_service,
        handlers::inventory::update_service,
        handlers::inventory::delete_service,

        // --- OPERATIONS ---
        handlers::operations::list_todos,
        handlers::operations::create_todo,
        handlers::operations::list_deal_todos,
        handlers::operations::update_todo,
        handlers::operations::delete_todo,

        // --- Settings ---
        handlers::settings::get_settings,
        handlers::settings::toggle_theme,
        handlers::settings::set_language,
        handlers::settings::set_brand_color,
        handlers::settings::set_logo,
        handlers::settings::clear_logo,
    ),
    components(
        schemas(
            // --- Auth ---
            models::auth::UserRole,
            models::auth::User,
            models::auth::NewUser,
            models::auth::LoginPayload,
            models::auth::RegisterPayload,
            models::auth::ChangePasswordPayload,
            models::auth::AuthTokens,
            models::session::EntityRef,
            models::session::Selection,

            // --- CRM ---
            models::crm::LeadStatus,
            models::crm::LeadType,
            models::crm::LeadCategory,
            models::crm::HistoryEntry,
            models::crm::Lead,
            models::crm::NewLead,
            models::crm::LeadNotePayload,
            models::crm::DealStatus,
            models::crm::Deal,
            models::crm::NewDeal,
            models::crm::LeadRef,
            models::crm::DealView,
            models::crm::Campaign,
            models::crm::NewCampaign,
            models::crm::Stage,
            models::crm::NewStage,
            common::money::DealAmounts,

            // --- Inventory ---
            models::inventory::Developer,
            models::inventory::NewDeveloper,
            models::inventory::Project,
            models::inventory::NewProject,
            models::inventory::Owner,
            models::inventory::NewOwner,
            models::inventory::UnitStatus,
            models::inventory::Unit,
            models::inventory::NewUnit,
            models::inventory::Service,
            models::inventory::NewService,

            // --- Operations ---
            models::operations::TodoStage,
            models::operations::TodoDay,
            models::operations::Todo,
            models::operations::NewTodo,

            // --- Settings ---
            models::settings::Theme,
            models::settings::Language,
            models::settings::Preferences,
            models::settings::BrandColorPayload,
            models::settings::LanguagePayload,
            models::settings::LogoPayload,
        )
    ),
    tags(
        (name = "Auth", description = "Login, registro e senha (backend remoto)"),
        (name = "Users", description = "Usuários do tenant e seleção atual"),
        (name = "CRM", description = "Leads, negócios, campanhas e etapas"),
        (name = "Inventory", description = "Incorporadoras, projetos, proprietários, unidades e serviços"),
        (name = "Operations", description = "Tarefas ligadas a negócios"),
        (name = "Settings", description = "Preferências da interface")
    ),
    modifiers(&SecurityAddon),
    security(("tenant_header" = []), ("user_header" = []))
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "tenant_header",
            SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::new("x-tenant-id"))),
        );
        components.add_security_scheme(
            "user_header",
            SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::new("x-user-id"))),
        );
    }
}
