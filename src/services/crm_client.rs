//! services/crm_client.rs
//! Cliente de la API del CRM (header `authtoken`).

use reqwest::{Client, RequestBuilder};
use serde_json::Value;

use crate::config::app_config::SyncSettings;
use crate::errors::SyncError;
use crate::models::configuration_model::ServiceConfiguration;
use crate::services::remote::{created_id, ensure_success, read_json, records_from};
use crate::services::retry::with_retry;

#[derive(Clone, Debug)]
pub struct CrmClient {
    http: Client,
    base_url: String,
    auth_token: String,
    settings: SyncSettings,
}

impl CrmClient {
    pub fn new(http: Client, config: &ServiceConfiguration, settings: &SyncSettings) -> Self {
        CrmClient {
            http,
            base_url: config.api_root().to_string(),
            auth_token: config.auth_token.clone().unwrap_or_default(),
            settings: settings.clone(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    /// GET /clients sin enviar; lo usa el probe.
    pub fn list_clients_request(&self) -> RequestBuilder {
        self.http
            .get(self.url("clients"))
            .header("authtoken", &self.auth_token)
    }

    /// Colección completa de clientes en una sola petición.
    pub async fn list_clients(&self) -> Result<Vec<Value>, SyncError> {
        let body = with_retry(&self.settings, "list_clients", move || async move {
            let resp = self.list_clients_request().send().await?;
            let resp = ensure_success(resp).await?;
            read_json(resp).await
        })
        .await?;

        records_from(body)
    }

    pub async fn create_asset(&self, asset: &Value) -> Result<String, SyncError> {
        let url = self.url("assets");
        let url = &url;
        with_retry(&self.settings, "create_asset", move || async move {
            let resp = self
                .http
                .post(url)
                .header("authtoken", &self.auth_token)
                .json(asset)
                .send()
                .await?;
            created_id(resp).await
        })
        .await
    }

    pub async fn update_asset(&self, id: &str, asset: &Value) -> Result<String, SyncError> {
        let url = self.url(&format!("assets/{}", id));
        let url = &url;
        with_retry(&self.settings, "update_asset", move || async move {
            let resp = self
                .http
                .put(url)
                .header("authtoken", &self.auth_token)
                .json(asset)
                .send()
                .await?;
            ensure_success(resp).await?;
            Ok(id.to_string())
        })
        .await
    }
}
