use std::time::Instant;

use reqwest::Client;

use crate::config::app_config::SyncSettings;
use crate::errors::{error_chain, SyncError};
use crate::models::configuration_model::ServiceName;
use crate::models::sync_model::{ProbeResult, ProbeStatus};
use crate::services::configuration_service::ConfigurationService;
use crate::services::crm_client::CrmClient;
use crate::services::ticketing_client::TicketingClient;

#[derive(Clone)]
pub struct ProbeService {
    config_service: ConfigurationService,
    http_client: Client,
    settings: SyncSettings,
}

impl ProbeService {
    pub fn new(
        config_service: ConfigurationService,
        http_client: Client,
        settings: SyncSettings,
    ) -> Self {
        ProbeService {
            config_service,
            http_client,
            settings,
        }
    }

    /// Una sola petición GET liviana contra el servicio, sin reintentos.
    pub async fn probe(
        &self,
        user_id: &str,
        service: ServiceName,
    ) -> Result<ProbeResult, SyncError> {
        let config = self.config_service.require_ready(user_id, service).await?;

        let request = match service {
            ServiceName::Crm => {
                CrmClient::new(self.http_client.clone(), &config, &self.settings)
                    .list_clients_request()
            }
            ServiceName::Ticketing => {
                TicketingClient::new(self.http_client.clone(), &config, &self.settings)
                    .init_session_request()
            }
        };

        log::info!(
            "(probe) Probando '{}' en {} para user_id={}",
            service,
            config.base_url,
            user_id
        );

        let start = Instant::now();
        let outcome = request.send().await;
        let response_time_ms = start.elapsed().as_millis() as u64;

        let result = match outcome {
            Ok(resp) => {
                let status = resp.status();
                let message = if status.is_success() {
                    "Connection established".to_string()
                } else {
                    format!(
                        "HTTP {}: {}",
                        status.as_u16(),
                        status.canonical_reason().unwrap_or("Unknown status")
                    )
                };
                ProbeResult {
                    success: status.is_success(),
                    status: ProbeStatus::Http(status.as_u16()),
                    response_time_ms,
                    message,
                }
            }
            Err(e) => {
                log::error!("(probe) Error al probar '{}': {:?}", service, e);
                ProbeResult {
                    success: false,
                    status: ProbeStatus::Error,
                    response_time_ms,
                    message: error_chain(&e),
                }
            }
        };

        log::info!(
            "(probe) '{}' -> success={} en {} ms",
            service,
            result.success,
            result.response_time_ms
        );

        if let Err(e) = self
            .config_service
            .record_test_result(user_id, service, result.success, &result.message)
            .await
        {
            log::error!(
                "(probe) No se pudo guardar el resultado del test de '{}': {:?}",
                service,
                e
            );
        }

        Ok(result)
    }
}
