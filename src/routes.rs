// src/routes.rs

use axum::{
    routing::{get, post, put},
    Json, Router,
};
use utoipa::OpenApi;

use crate::{config::AppState, docs::ApiDoc, handlers};

pub fn build_router(app_state: AppState) -> Router {
    // Rotas públicas de conta (repassadas ao backend remoto)
    let auth_routes = Router::new()
        .route("/login", post(handlers::auth::login))
        .route("/register", post(handlers::auth::register))
        .route("/change-password", post(handlers::auth::change_password))
        .route("/logout", post(handlers::auth::logout));

    let user_routes = Router::new()
        .route("/", get(handlers::auth::list_users).post(handlers::auth::create_user))
        .route("/me", get(handlers::auth::get_me))
        .route(
            "/{id}",
            put(handlers::auth::update_user).delete(handlers::auth::delete_user),
        );

    let crm_routes = Router::new()
        .route("/leads", get(handlers::crm::list_leads).post(handlers::crm::create_lead))
        .route(
            "/leads/{id}",
            get(handlers::crm::get_lead)
                .put(handlers::crm::update_lead)
                .delete(handlers::crm::delete_lead),
        )
        .route("/leads/{id}/notes", post(handlers::crm::add_lead_note))
        .route("/deals", get(handlers::crm::list_deals).post(handlers::crm::create_deal))
        .route("/deals/amounts", get(handlers::crm::preview_deal_amounts))
        .route(
            "/deals/{id}",
            get(handlers::crm::get_deal)
                .put(handlers::crm::update_deal)
                .delete(handlers::crm::delete_deal),
        )
        .route("/deals/{id}/todos", get(handlers::operations::list_deal_todos))
        .route(
            "/campaigns",
            get(handlers::crm::list_campaigns).post(handlers::crm::create_campaign),
        )
        .route(
            "/campaigns/{id}",
            put(handlers::crm::update_campaign).delete(handlers::crm::delete_campaign),
        )
        .route("/stages", get(handlers::crm::list_stages).post(handlers::crm::create_stage))
        .route(
            "/stages/{id}",
            put(handlers::crm::update_stage).delete(handlers::crm::delete_stage),
        );

    let inventory_routes = Router::new()
        .route(
            "/developers",
            get(handlers::inventory::list_developers).post(handlers::inventory::create_developer),
        )
        .route(
            "/developers/{id}",
            put(handlers::inventory::update_developer).delete(handlers::inventory::delete_developer),
        )
        .route(
            "/projects",
            get(handlers::inventory::list_projects).post(handlers::inventory::create_project),
        )
        .route(
            "/projects/{id}",
            put(handlers::inventory::update_project).delete(handlers::inventory::delete_project),
        )
        .route(
            "/owners",
            get(handlers::inventory::list_owners).post(handlers::inventory::create_owner),
        )
        .route(
            "/owners/{id}",
            put(handlers::inventory::update_owner).delete(handlers::inventory::delete_owner),
        )
        .route(
            "/units",
            get(handlers::inventory::list_units).post(handlers::inventory::create_unit),
        )
        .route(
            "/units/{id}",
            put(handlers::inventory::update_unit).delete(handlers::inventory::delete_unit),
        )
        .route(
            "/services",
            get(handlers::inventory::list_services).post(handlers::inventory::create_service),
        )
        .route(
            "/services/{id}",
            put(handlers::inventory::update_service).delete(handlers::inventory::delete_service),
        );

    let operations_routes = Router::new()
        .route(
            "/todos",
            get(handlers::operations::list_todos).post(handlers::operations::create_todo),
        )
        .route(
            "/todos/{id}",
            put(handlers::operations::update_todo).delete(handlers::operations::delete_todo),
        )
        .route(
            "/selection",
            get(handlers::auth::get_selection).put(handlers::auth::set_selection),
        );

    let settings_routes = Router::new()
        .route("/", get(handlers::settings::get_settings))
        .route("/theme/toggle", post(handlers::settings::toggle_theme))
        .route("/language", put(handlers::settings::set_language))
        .route("/brand-color", put(handlers::settings::set_brand_color))
        .route(
            "/logo",
            put(handlers::settings::set_logo).delete(handlers::settings::clear_logo),
        );

    // Combina tudo no router principal
    Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .route("/api/openapi.json", get(|| async { Json(ApiDoc::openapi()) }))
        .nest("/api/auth", auth_routes)
        .nest("/api/users", user_routes)
        .nest("/api/settings", settings_routes)
        .nest(
            "/api",
            crm_routes.merge(inventory_routes).merge(operations_routes),
        )
        .with_state(app_state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        client::rest::tests::{reply, ScriptedTransport},
        config::AppConfig,
        db::ReferencePolicy,
        middleware::{auth::USER_ID_HEADER, tenancy::TENANT_ID_HEADER},
        models::auth::{NewUser, UserRole},
        storage::MemoryStorage,
    };
    use axum::{
        body::{to_bytes, Body},
        http::{header, Method, Request, StatusCode},
        response::Response,
    };
    use serde_json::{json, Value};
    use std::{sync::Arc, time::Duration};
    use tower::ServiceExt;
    use uuid::Uuid;

    fn test_config() -> AppConfig {
        AppConfig {
            bind_addr: ([127, 0, 0, 1], 0).into(),
            api_base_url: None,
            api_timeout: Duration::from_secs(1),
            preferences_path: None,
            reference_policy: ReferencePolicy::Restrict,
            seed_demo_data: false,
        }
    }

    struct TestApp {
        state: AppState,
        tenant: Uuid,
        owner_id: i64,
        sales_id: i64,
    }

    /// Tenant sem nenhum usuário, como numa instalação nova.
    fn empty_app(transport: Option<Arc<ScriptedTransport>>) -> TestApp {
        let transport = transport.map(|t| t as Arc<dyn crate::client::Transport>);
        let state = AppState::assemble(test_config(), Arc::new(MemoryStorage::new()), transport)
            .expect("state");
        TestApp { state, tenant: Uuid::new_v4(), owner_id: 0, sales_id: 0 }
    }

    async fn test_app(transport: Option<Arc<ScriptedTransport>>) -> TestApp {
        let TestApp { state, tenant, .. } = empty_app(transport);

        let mut users = Vec::new();
        for (name, role) in [("Owner", UserRole::Owner), ("Sales", UserRole::Sales)] {
            let user = state
                .auth_service
                .create_user(
                    tenant,
                    NewUser {
                        name: name.into(),
                        email: format!("{}@agency.com", name.to_lowercase()),
                        phone: None,
                        role,
                        is_active: true,
                    },
                )
                .await
                .expect("user");
            users.push(user.id);
        }

        TestApp { state, tenant, owner_id: users[0], sales_id: users[1] }
    }

    impl TestApp {
        async fn call(&self, method: Method, uri: &str, user_id: i64, body: Option<Value>) -> Response {
            let mut builder = Request::builder()
                .method(method)
                .uri(uri)
                .header(TENANT_ID_HEADER, self.tenant.to_string())
                .header(USER_ID_HEADER, user_id.to_string());
            let body = match body {
                Some(json) => {
                    builder = builder.header(header::CONTENT_TYPE, "application/json");
                    Body::from(json.to_string())
                }
                None => Body::empty(),
            };
            build_router(self.state.clone())
                .oneshot(builder.body(body).expect("request"))
                .await
                .expect("response")
        }
    }

    async fn json_body(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("body");
        serde_json::from_slice(&bytes).expect("json")
    }

    fn new_lead_json() -> Value {
        json!({ "name": "Mona", "phone": "0100", "type": "Fresh" })
    }

    #[tokio::test]
    async fn health_is_public() {
        let app = test_app(None).await;
        let response = build_router(app.state.clone())
            .oneshot(Request::builder().uri("/api/health").body(Body::empty()).expect("request"))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn openapi_document_is_served() {
        let app = test_app(None).await;
        let response = build_router(app.state.clone())
            .oneshot(Request::builder().uri("/api/openapi.json").body(Body::empty()).expect("request"))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);
        let doc = json_body(response).await;
        assert!(doc["paths"]["/api/leads"].is_object());
    }

    #[tokio::test]
    async fn missing_tenant_header_is_a_bad_request() {
        let app = test_app(None).await;
        let response = build_router(app.state.clone())
            .oneshot(
                Request::builder()
                    .uri("/api/leads")
                    .header(USER_ID_HEADER, "1")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn unknown_user_is_unauthenticated() {
        let app = test_app(None).await;
        let response = app.call(Method::GET, "/api/leads", 999, None).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn only_the_owner_creates() {
        let app = test_app(None).await;

        let denied = app.call(Method::POST, "/api/leads", app.sales_id, Some(new_lead_json())).await;
        assert_eq!(denied.status(), StatusCode::FORBIDDEN);

        let created = app.call(Method::POST, "/api/leads", app.owner_id, Some(new_lead_json())).await;
        assert_eq!(created.status(), StatusCode::CREATED);
        let lead = json_body(created).await;
        assert_eq!(lead["status"], "Untouched");
        assert_eq!(lead["lastStage"], "Untouched");
        assert_eq!(lead["history"], json!([]));
    }

    #[tokio::test]
    async fn fresh_tenant_bootstraps_its_owner_over_http() {
        let app = empty_app(None);
        let mariam = json!({ "name": "Mariam", "email": "mariam@agency.com", "role": "Sales" });

        let created = app.call(Method::POST, "/api/users", 0, Some(mariam.clone())).await;
        assert_eq!(created.status(), StatusCode::CREATED);
        let owner = json_body(created).await;
        assert_eq!(owner["role"], "Owner");
        let owner_id = owner["id"].as_i64().expect("id");

        // Depois do primeiro, só o Owner cria usuários.
        let anonymous = app.call(Method::POST, "/api/users", 0, Some(mariam)).await;
        assert_eq!(anonymous.status(), StatusCode::UNAUTHORIZED);

        let sales = app
            .call(
                Method::POST,
                "/api/users",
                owner_id,
                Some(json!({ "name": "Karim", "email": "karim@agency.com", "role": "Sales" })),
            )
            .await;
        assert_eq!(sales.status(), StatusCode::CREATED);
        assert_eq!(json_body(sales).await["role"], "Sales");
        assert_eq!(app.state.auth_service.list_users(app.tenant).await.expect("users").len(), 2);

        let created = app.call(Method::POST, "/api/leads", owner_id, Some(new_lead_json())).await;
        assert_eq!(created.status(), StatusCode::CREATED);
        let mut lead = json_body(created).await;
        let uri = format!("/api/leads/{}", lead["id"]);

        lead["status"] = json!("Touched");
        let touched = app.call(Method::PUT, &uri, owner_id, Some(lead.clone())).await;
        assert_eq!(touched.status(), StatusCode::OK);
        assert_eq!(json_body(touched).await["history"].as_array().map(Vec::len), Some(1));

        let deleted = app.call(Method::DELETE, &uri, owner_id, None).await;
        assert_eq!(deleted.status(), StatusCode::NO_CONTENT);
        let gone = app.call(Method::GET, &uri, owner_id, None).await;
        assert_eq!(gone.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn blank_lead_fields_are_rejected_on_update() {
        let app = test_app(None).await;
        let created = app.call(Method::POST, "/api/leads", app.owner_id, Some(new_lead_json())).await;
        let mut lead = json_body(created).await;
        let uri = format!("/api/leads/{}", lead["id"]);

        lead["name"] = json!("");
        lead["phone"] = json!("");
        let response = app.call(Method::PUT, &uri, app.owner_id, Some(lead)).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert!(body["details"]["name"].is_array());
        assert!(body["details"]["phone"].is_array());

        let stored = app.call(Method::GET, &uri, app.owner_id, None).await;
        assert_eq!(json_body(stored).await["name"], "Mona");
    }

    #[tokio::test]
    async fn validation_errors_are_translated() {
        let app = test_app(None).await;
        let response = build_router(app.state.clone())
            .oneshot(
                Request::builder()
                    .method(Method::PUT)
                    .uri("/api/settings/brand-color")
                    .header(TENANT_ID_HEADER, app.tenant.to_string())
                    .header(USER_ID_HEADER, app.owner_id.to_string())
                    .header(header::ACCEPT_LANGUAGE, "ar")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(json!({ "brandColor": "blue" }).to_string()))
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert_eq!(body["error"], "حقل واحد أو أكثر غير صالح.");
        assert!(body["details"]["brand_color"].is_array());
    }

    #[tokio::test]
    async fn illegal_lead_transition_is_unprocessable() {
        let app = test_app(None).await;
        let created = app.call(Method::POST, "/api/leads", app.owner_id, Some(new_lead_json())).await;
        let mut lead = json_body(created).await;
        let uri = format!("/api/leads/{}", lead["id"]);

        lead["status"] = json!("Out Of Service");
        let moved = app.call(Method::PUT, &uri, app.owner_id, Some(lead.clone())).await;
        assert_eq!(moved.status(), StatusCode::OK);

        lead["status"] = json!("Meeting");
        let refused = app.call(Method::PUT, &uri, app.owner_id, Some(lead)).await;
        assert_eq!(refused.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn deleting_twice_is_still_no_content() {
        let app = test_app(None).await;
        let uri = format!("/api/users/{}", 5_000);
        let response = app.call(Method::DELETE, &uri, app.owner_id, None).await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert_eq!(app.state.auth_service.list_users(app.tenant).await.expect("users").len(), 2);
    }

    #[tokio::test]
    async fn deal_amounts_preview() {
        let app = test_app(None).await;
        let response = app
            .call(
                Method::GET,
                "/api/deals/amounts?value=1000000&discountPercentage=5&salesCommissionPercentage=2.5",
                app.sales_id,
                None,
            )
            .await;
        assert_eq!(response.status(), StatusCode::OK);
        let amounts = json_body(response).await;
        assert_eq!(amounts["discountAmount"].as_f64(), Some(50_000.0));
        assert_eq!(amounts["salesCommissionAmount"].as_f64(), Some(23_750.0));
    }

    #[tokio::test]
    async fn theme_toggle_reports_the_dark_class() {
        let app = test_app(None).await;
        let response = app.call(Method::POST, "/api/settings/theme/toggle", app.sales_id, None).await;
        assert_eq!(response.status(), StatusCode::OK);
        let prefs = json_body(response).await;
        assert_eq!(prefs["theme"], "dark");
        assert_eq!(prefs["rootClasses"], json!(["dark"]));
    }

    #[tokio::test]
    async fn change_password_mismatch_never_reaches_the_backend() {
        let transport = ScriptedTransport::new(vec![reply(200, json!({}))]);
        let app = test_app(Some(transport.clone())).await;

        let response = app
            .call(
                Method::POST,
                "/api/auth/change-password",
                app.sales_id,
                Some(json!({
                    "currentPassword": "old-secret",
                    "newPassword": "new-secret-1",
                    "confirmPassword": "new-secret-2"
                })),
            )
            .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert!(body["details"]["confirm_password"].is_array());
        assert_eq!(transport.call_count(), 0);
    }

    #[tokio::test]
    async fn expired_session_redirects_to_login() {
        let transport = ScriptedTransport::new(vec![
            reply(401, Value::Null),
            reply(401, json!({ "message": "refresh token expired" })),
        ]);
        let app = test_app(Some(transport.clone())).await;

        let response = app
            .call(
                Method::POST,
                "/api/auth/change-password",
                app.sales_id,
                Some(json!({
                    "currentPassword": "old-secret",
                    "newPassword": "new-secret-1",
                    "confirmPassword": "new-secret-1"
                })),
            )
            .await;

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body = json_body(response).await;
        assert_eq!(body["details"]["redirect"], "/login");
    }

    #[tokio::test]
    async fn login_without_remote_backend_is_unavailable() {
        let app = test_app(None).await;
        let response = build_router(app.state.clone())
            .oneshot(
                Request::builder()
                    .method(Method::POST)
                    .uri("/api/auth/login")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(json!({ "email": "a@b.com", "password": "x" }).to_string()))
                    .expect("request"),
            )
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
