// src/config.rs

use std::{env, net::SocketAddr, path::PathBuf, sync::Arc, time::Duration};

use anyhow::Context;

use crate::{
    client::{remote::RemoteBackend, ReqwestTransport, RestClient, Transport},
    common::i18n::I18nStore,
    db::{ReferencePolicy, StoreRegistry},
    services::{
        AuthApi, AuthService, CrmService, InventoryService, OperationsService, SettingsService,
        TodoGateway,
    },
    storage::{JsonFileStorage, KeyValueStorage, MemoryStorage},
};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Configuração lida do ambiente (.env incluído). Valor inválido aborta a inicialização.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub api_base_url: Option<String>,
    pub api_timeout: Duration,
    pub preferences_path: Option<PathBuf>,
    pub reference_policy: ReferencePolicy,
    pub seed_demo_data: bool,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Variável definida mas vazia conta como ausente.
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let bind_addr = var("BIND_ADDR")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
            .parse::<SocketAddr>()
            .context("BIND_ADDR deve ser host:porta")?;

        let api_timeout = match var("API_TIMEOUT_SECS") {
            Some(raw) => Duration::from_secs(
                raw.trim()
                    .parse::<u64>()
                    .context("API_TIMEOUT_SECS deve ser um inteiro de segundos")?,
            ),
            None => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        };

        let reference_policy = match var("REFERENCE_POLICY") {
            Some(raw) => raw.parse::<ReferencePolicy>()?,
            None => ReferencePolicy::default(),
        };

        let seed_demo_data = match var("SEED_DEMO_DATA") {
            Some(raw) => parse_bool(&raw).context("SEED_DEMO_DATA deve ser true ou false")?,
            None => false,
        };

        Ok(Self {
            bind_addr,
            api_base_url: var("API_BASE_URL"),
            api_timeout,
            preferences_path: var("PREFERENCES_PATH").map(PathBuf::from),
            reference_policy,
            seed_demo_data,
        })
    }
}

fn parse_bool(raw: &str) -> anyhow::Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(anyhow::anyhow!("valor booleano inválido: '{other}'")),
    }
}

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub registry: StoreRegistry,
    pub i18n_store: Arc<I18nStore>,
    pub auth_service: AuthService,
    pub crm_service: CrmService,
    pub inventory_service: InventoryService,
    pub operations_service: OperationsService,
    pub settings_service: SettingsService,
}

impl AppState {
    pub async fn new() -> anyhow::Result<Self> {
        let config = AppConfig::from_env()?;
        Self::from_config(config)
    }

    pub fn from_config(config: AppConfig) -> anyhow::Result<Self> {
        let storage: Arc<dyn KeyValueStorage> = match &config.preferences_path {
            Some(path) => Arc::new(JsonFileStorage::open(path)?),
            None => Arc::new(MemoryStorage::new()),
        };

        let transport: Option<Arc<dyn Transport>> = match &config.api_base_url {
            Some(url) => {
                tracing::info!(%url, "backend remoto configurado");
                Some(Arc::new(ReqwestTransport::new(url, config.api_timeout)?))
            }
            None => {
                tracing::warn!("API_BASE_URL ausente: login e confirmação remota desativados");
                None
            }
        };

        Self::assemble(config, storage, transport)
    }

    // --- Monta o gráfico de dependências ---
    pub(crate) fn assemble(
        config: AppConfig,
        storage: Arc<dyn KeyValueStorage>,
        transport: Option<Arc<dyn Transport>>,
    ) -> anyhow::Result<Self> {
        let registry = StoreRegistry::new(config.reference_policy, config.seed_demo_data);

        // Tokens e preferências moram no mesmo storage.
        let remote = transport
            .map(|transport| Arc::new(RemoteBackend::new(RestClient::new(transport, storage.clone()))));
        let auth_api = remote.clone().map(|r| r as Arc<dyn AuthApi>);
        let todo_gateway = remote.map(|r| r as Arc<dyn TodoGateway>);

        let settings_service = SettingsService::new(storage)?;

        Ok(Self {
            config: Arc::new(config),
            auth_service: AuthService::new(registry.clone(), auth_api),
            crm_service: CrmService::new(registry.clone()),
            inventory_service: InventoryService::new(registry.clone()),
            operations_service: OperationsService::new(registry.clone(), todo_gateway),
            settings_service,
            i18n_store: Arc::new(I18nStore::new()),
            registry,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> anyhow::Result<AppConfig> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let config = config_from(&[]).expect("config");
        assert_eq!(config.bind_addr.port(), 3000);
        assert_eq!(config.api_timeout, Duration::from_secs(10));
        assert_eq!(config.reference_policy, ReferencePolicy::Restrict);
        assert!(config.api_base_url.is_none());
        assert!(!config.seed_demo_data);
    }

    #[test]
    fn explicit_values_are_parsed() {
        let config = config_from(&[
            ("BIND_ADDR", "127.0.0.1:8080"),
            ("API_BASE_URL", "https://crm.example.com/api"),
            ("API_TIMEOUT_SECS", "3"),
            ("REFERENCE_POLICY", "Cascade"),
            ("SEED_DEMO_DATA", "yes"),
        ])
        .expect("config");
        assert_eq!(config.bind_addr.port(), 8080);
        assert_eq!(config.api_base_url.as_deref(), Some("https://crm.example.com/api"));
        assert_eq!(config.api_timeout, Duration::from_secs(3));
        assert_eq!(config.reference_policy, ReferencePolicy::Cascade);
        assert!(config.seed_demo_data);
    }

    #[test]
    fn invalid_values_abort() {
        assert!(config_from(&[("REFERENCE_POLICY", "soft")]).is_err());
        assert!(config_from(&[("API_TIMEOUT_SECS", "ten")]).is_err());
        assert!(config_from(&[("SEED_DEMO_DATA", "maybe")]).is_err());
        assert!(config_from(&[("BIND_ADDR", "nowhere")]).is_err());
    }
}
