// src/client/remote.rs

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::{
    client::{rest::RestClient, transport::ApiRequest},
    common::error::AppError,
    models::{
        auth::{AuthTokens, ChangePasswordPayload, LoginPayload, RegisterPayload},
        operations::NewTodo,
    },
    services::{auth::AuthApi, operation_service::TodoGateway},
};

// Rotas do backend remoto.
const LOGIN_PATH: &str = "/auth/login";
const REGISTER_PATH: &str = "/auth/register";
const CHANGE_PASSWORD_PATH: &str = "/auth/change-password";
const TODOS_PATH: &str = "/todos";

/// Backend remoto visto pelos serviços: conta e tarefas.
#[derive(Clone)]
pub struct RemoteBackend {
    client: RestClient,
}

impl RemoteBackend {
    pub fn new(client: RestClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl AuthApi for RemoteBackend {
    async fn login(&self, payload: &LoginPayload) -> Result<AuthTokens, AppError> {
        let request = ApiRequest::post(LOGIN_PATH, serde_json::to_value(payload)?).public();
        let body = self.client.send(request).await?;
        let tokens: AuthTokens = serde_json::from_value(body)?;
        self.client.store_tokens(&tokens)?;
        Ok(tokens)
    }

    async fn register(&self, payload: &RegisterPayload) -> Result<Value, AppError> {
        let request = ApiRequest::post(REGISTER_PATH, serde_json::to_value(payload)?).public();
        self.client.send(request).await
    }

    async fn change_password(&self, payload: &ChangePasswordPayload) -> Result<(), AppError> {
        let body = json!({
            "currentPassword": payload.current_password,
            "newPassword": payload.new_password,
        });
        self.client.send(ApiRequest::post(CHANGE_PASSWORD_PATH, body)).await?;
        Ok(())
    }

    async fn logout(&self) -> Result<(), AppError> {
        self.client.clear_credentials()
    }
}

#[async_trait]
impl TodoGateway for RemoteBackend {
    async fn create_todo(&self, todo: &NewTodo) -> Result<(), AppError> {
        let body = serde_json::to_value(todo)?;
        self.client.send(ApiRequest::post(TODOS_PATH, body)).await?;
        Ok(())
    }
}
