// src/client/rest.rs

use std::sync::Arc;

use serde_json::{json, Value};

use crate::{
    client::transport::{ApiRequest, ApiResponse, Transport},
    common::error::AppError,
    models::auth::AuthTokens,
    storage::KeyValueStorage,
};

pub const ACCESS_TOKEN_KEY: &str = "accessToken";
pub const REFRESH_TOKEN_KEY: &str = "refreshToken";

const REFRESH_PATH: &str = "/auth/refresh";

/// Cliente do backend remoto com bearer token.
/// Regra do 401: renova o token uma única vez e repete a requisição uma única vez.
/// Se a renovação falhar, apaga as credenciais e devolve SessionExpired.
#[derive(Clone)]
pub struct RestClient {
    transport: Arc<dyn Transport>,
    storage: Arc<dyn KeyValueStorage>,
}

impl RestClient {
    pub fn new(transport: Arc<dyn Transport>, storage: Arc<dyn KeyValueStorage>) -> Self {
        Self { transport, storage }
    }

    pub async fn send(&self, request: ApiRequest) -> Result<Value, AppError> {
        if !request.authenticated {
            let response = self.transport.send(&request, None).await?;
            return into_result(response);
        }

        let access = self.storage.get(ACCESS_TOKEN_KEY)?;
        let response = self.transport.send(&request, access.as_deref()).await?;
        if response.status != 401 {
            return into_result(response);
        }

        tracing::info!(path = %request.path, "401 do backend remoto; renovando o token");
        let tokens = match self.refresh().await {
            Ok(tokens) => tokens,
            Err(e) => {
                tracing::warn!("renovação do token falhou: {}", e);
                self.clear_credentials()?;
                return Err(AppError::SessionExpired);
            }
        };

        let retry = self.transport.send(&request, Some(&tokens.access_token)).await?;
        into_result(retry)
    }

    async fn refresh(&self) -> Result<AuthTokens, AppError> {
        let refresh_token = self
            .storage
            .get(REFRESH_TOKEN_KEY)?
            .ok_or(AppError::SessionExpired)?;

        let request = ApiRequest::post(REFRESH_PATH, json!({ "refreshToken": refresh_token })).public();
        let response = self.transport.send(&request, None).await?;
        if !response.is_success() {
            return Err(AppError::SessionExpired);
        }

        let tokens: AuthTokens = serde_json::from_value(response.body)?;
        self.store_tokens(&tokens)?;
        Ok(tokens)
    }

    pub fn store_tokens(&self, tokens: &AuthTokens) -> Result<(), AppError> {
        self.storage.set(ACCESS_TOKEN_KEY, &tokens.access_token)?;
        self.storage.set(REFRESH_TOKEN_KEY, &tokens.refresh_token)
    }

    pub fn clear_credentials(&self) -> Result<(), AppError> {
        self.storage.remove(ACCESS_TOKEN_KEY)?;
        self.storage.remove(REFRESH_TOKEN_KEY)
    }

    pub fn has_session(&self) -> Result<bool, AppError> {
        Ok(self.storage.get(ACCESS_TOKEN_KEY)?.is_some())
    }
}

/// 2xx vira o corpo; 401 vira SessionExpired; o resto vira Upstream com a mensagem remota.
fn into_result(response: ApiResponse) -> Result<Value, AppError> {
    if response.is_success() {
        return Ok(response.body);
    }
    if response.status == 401 && response.body.get("message").is_none() {
        return Err(AppError::SessionExpired);
    }

    let message = ["message", "error", "detail"]
        .iter()
        .find_map(|key| response.body.get(*key).and_then(Value::as_str))
        .unwrap_or("")
        .to_string();

    Err(AppError::Upstream { status: response.status, message })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::{client::transport::Method, storage::MemoryStorage};
    use async_trait::async_trait;
    use std::{collections::VecDeque, sync::Mutex};

    /// Transport roteirizado: devolve as respostas na ordem e grava as chamadas.
    #[derive(Default)]
    pub(crate) struct ScriptedTransport {
        responses: Mutex<VecDeque<ApiResponse>>,
        pub(crate) calls: Mutex<Vec<(ApiRequest, Option<String>)>>,
    }

    impl ScriptedTransport {
        pub(crate) fn new(responses: Vec<ApiResponse>) -> Arc<Self> {
            Arc::new(Self {
                responses: Mutex::new(responses.into()),
                calls: Mutex::default(),
            })
        }

        pub(crate) fn call_count(&self) -> usize {
            self.calls.lock().expect("calls").len()
        }
    }

    #[async_trait]
    impl Transport for ScriptedTransport {
        async fn send(&self, request: &ApiRequest, bearer: Option<&str>) -> Result<ApiResponse, AppError> {
            self.calls
                .lock()
                .expect("calls")
                .push((request.clone(), bearer.map(str::to_string)));
            Ok(self
                .responses
                .lock()
                .expect("responses")
                .pop_front()
                .unwrap_or(ApiResponse { status: 500, body: Value::Null }))
        }
    }

    pub(crate) fn reply(status: u16, body: Value) -> ApiResponse {
        ApiResponse { status, body }
    }

    fn client_with(transport: Arc<ScriptedTransport>) -> (RestClient, Arc<MemoryStorage>) {
        let storage = Arc::new(MemoryStorage::new());
        storage.set(ACCESS_TOKEN_KEY, "old-access").expect("set");
        storage.set(REFRESH_TOKEN_KEY, "refresh-1").expect("set");
        (RestClient::new(transport, storage.clone()), storage)
    }

    #[tokio::test]
    async fn sends_the_stored_bearer_token() {
        let transport = ScriptedTransport::new(vec![reply(200, json!({ "ok": true }))]);
        let (client, _) = client_with(transport.clone());

        let body = client.send(ApiRequest::get("/todos")).await.expect("ok");

        assert_eq!(body["ok"], true);
        let calls = transport.calls.lock().expect("calls");
        assert_eq!(calls[0].1.as_deref(), Some("old-access"));
    }

    #[tokio::test]
    async fn refreshes_once_and_retries_once_on_401() {
        let transport = ScriptedTransport::new(vec![
            reply(401, Value::Null),
            reply(200, json!({ "accessToken": "new-access", "refreshToken": "refresh-2" })),
            reply(200, json!({ "id": 1 })),
        ]);
        let (client, storage) = client_with(transport.clone());

        let body = client.send(ApiRequest::get("/todos")).await.expect("retried");

        assert_eq!(body["id"], 1);
        assert_eq!(transport.call_count(), 3);
        let calls = transport.calls.lock().expect("calls");
        assert_eq!(calls[1].0.path, "/auth/refresh");
        assert_eq!(calls[1].0.method, Method::Post);
        assert_eq!(calls[1].1, None);
        assert_eq!(calls[2].1.as_deref(), Some("new-access"));
        assert_eq!(storage.get(REFRESH_TOKEN_KEY).expect("get").as_deref(), Some("refresh-2"));
    }

    #[tokio::test]
    async fn failed_refresh_clears_credentials_and_expires_the_session() {
        let transport = ScriptedTransport::new(vec![
            reply(401, Value::Null),
            reply(400, json!({ "message": "refresh token revoked" })),
        ]);
        let (client, storage) = client_with(transport.clone());

        let err = client.send(ApiRequest::get("/todos")).await.expect_err("expired");

        assert!(matches!(err, AppError::SessionExpired));
        assert_eq!(transport.call_count(), 2);
        assert_eq!(storage.get(ACCESS_TOKEN_KEY).expect("get"), None);
        assert_eq!(storage.get(REFRESH_TOKEN_KEY).expect("get"), None);
    }

    #[tokio::test]
    async fn second_401_is_not_retried_again() {
        let transport = ScriptedTransport::new(vec![
            reply(401, Value::Null),
            reply(200, json!({ "accessToken": "a2", "refreshToken": "r2" })),
            reply(401, Value::Null),
        ]);
        let (client, _) = client_with(transport.clone());

        let err = client.send(ApiRequest::get("/todos")).await.expect_err("still 401");

        assert!(matches!(err, AppError::SessionExpired));
        assert_eq!(transport.call_count(), 3);
    }

    #[tokio::test]
    async fn public_requests_never_refresh() {
        let transport = ScriptedTransport::new(vec![reply(401, json!({ "message": "Invalid credentials" }))]);
        let (client, storage) = client_with(transport.clone());

        let request = ApiRequest::post("/auth/login", json!({})).public();
        let err = client.send(request).await.expect_err("401");

        match err {
            AppError::Upstream { status, message } => {
                assert_eq!(status, 401);
                assert_eq!(message, "Invalid credentials");
            }
            other => panic!("erro inesperado: {other:?}"),
        }
        assert_eq!(transport.call_count(), 1);
        assert!(storage.get(ACCESS_TOKEN_KEY).expect("get").is_some());
    }
}
