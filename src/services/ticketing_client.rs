//! services/ticketing_client.rs
//! Cliente de la API REST del sistema de tickets/inventario (sesión por corrida).

use reqwest::{Client, RequestBuilder};
use serde_json::{json, Value};

use crate::config::app_config::SyncSettings;
use crate::errors::SyncError;
use crate::models::configuration_model::ServiceConfiguration;
use crate::services::remote::{
    content_range_total, created_id, ensure_success, read_json, records_from,
};
use crate::services::retry::with_retry;

/// Tope de registros leídos de la colección origen en una corrida.
pub const MAX_SOURCE_RECORDS: usize = 100_000;

#[derive(Clone, Debug)]
pub struct TicketingClient {
    http: Client,
    base_url: String,
    app_token: String,
    user_token: String,
    settings: SyncSettings,
}

impl TicketingClient {
    pub fn new(http: Client, config: &ServiceConfiguration, settings: &SyncSettings) -> Self {
        TicketingClient {
            http,
            base_url: config.api_root().to_string(),
            app_token: config.app_token.clone().unwrap_or_default(),
            user_token: config.user_token.clone().unwrap_or_default(),
            settings: settings.clone(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    fn with_session(&self, req: RequestBuilder, session: &str) -> RequestBuilder {
        req.header("App-Token", &self.app_token)
            .header("Session-Token", session)
    }

    /// GET /initSession sin enviar; lo usa el probe (un solo intento).
    pub fn init_session_request(&self) -> RequestBuilder {
        self.http
            .get(self.url("initSession"))
            .header("App-Token", &self.app_token)
            .header("Authorization", format!("user_token {}", self.user_token))
    }

    pub async fn init_session(&self) -> Result<String, SyncError> {
        let body = with_retry(&self.settings, "init_session", move || async move {
            let resp = self.init_session_request().send().await?;
            let resp = ensure_success(resp).await?;
            read_json(resp).await
        })
        .await?;

        body.get("session_token")
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .ok_or_else(|| {
                SyncError::InvalidResponse(format!("initSession without session_token: {}", body))
            })
    }

    /// GET /killSession. Un solo intento; el llamador decide qué hacer con el error.
    pub async fn kill_session(&self, session: &str) -> Result<(), SyncError> {
        let resp = self
            .with_session(self.http.get(self.url("killSession")), session)
            .send()
            .await?;
        ensure_success(resp).await?;
        Ok(())
    }

    /// Lista de computadores, pidiendo páginas `range=a-b` hasta agotar.
    ///
    /// Corta en una página corta, al alcanzar el total de `Content-Range`, cuando el
    /// servidor ignora `range` (página más grande que la pedida o la misma página
    /// repetida) o al llegar a `MAX_SOURCE_RECORDS`.
    pub async fn list_computers(&self, session: &str) -> Result<Vec<Value>, SyncError> {
        let page_size = self.settings.page_size.max(1);
        let url = self.url("Computer");
        let url = &url;
        let mut records: Vec<Value> = Vec::new();
        let mut start = 0usize;

        loop {
            let end = start.saturating_add(page_size - 1);
            let range = format!("{}-{}", start, end);
            let range_param = range.as_str();
            let (page, total) = with_retry(&self.settings, "list_computers", move || async move {
                let resp = self
                    .with_session(self.http.get(url), session)
                    .query(&[("range", range_param)])
                    .send()
                    .await?;
                let total = content_range_total(resp.headers());
                let resp = ensure_success(resp).await?;
                Ok((records_from(read_json(resp).await?)?, total))
            })
            .await?;

            let fetched = page.len();
            log::info!(
                "(list_computers) range={} -> {} registros (total={:?})",
                range,
                fetched,
                total
            );

            if start > 0 && fetched > 0 && page.first() == records.first() {
                log::warn!("(list_computers) El servidor repite la primera página; se ignora");
                break;
            }
            records.extend(page);

            let reached_total = total.map_or(false, |t| start.saturating_add(fetched) >= t);
            if fetched != page_size || reached_total {
                if fetched > page_size {
                    log::warn!(
                        "(list_computers) {} registros en una página de {}: se ignoró range",
                        fetched,
                        page_size
                    );
                }
                break;
            }

            start = match start.checked_add(page_size) {
                Some(next) if next < MAX_SOURCE_RECORDS => next,
                _ => {
                    log::warn!(
                        "(list_computers) Límite de {} registros alcanzado, se corta la lectura",
                        MAX_SOURCE_RECORDS
                    );
                    break;
                }
            };
        }

        Ok(records)
    }

    /// POST /Entity con `{ "input": ... }`; devuelve el id asignado.
    pub async fn create_entity(&self, session: &str, input: &Value) -> Result<String, SyncError> {
        let url = self.url("Entity");
        let url = &url;
        let body = json!({ "input": input });
        let body = &body;
        with_retry(&self.settings, "create_entity", move || async move {
            let resp = self
                .with_session(self.http.post(url), session)
                .json(body)
                .send()
                .await?;
            created_id(resp).await
        })
        .await
    }

    /// PUT /Entity/{id}; la respuesta no trae id, se devuelve el conocido.
    pub async fn update_entity(
        &self,
        session: &str,
        id: &str,
        input: &Value,
    ) -> Result<String, SyncError> {
        let url = self.url(&format!("Entity/{}", id));
        let url = &url;
        let body = json!({ "input": input });
        let body = &body;
        with_retry(&self.settings, "update_entity", move || async move {
            let resp = self
                .with_session(self.http.put(url), session)
                .json(body)
                .send()
                .await?;
            ensure_success(resp).await?;
            Ok(id.to_string())
        })
        .await
    }
}
