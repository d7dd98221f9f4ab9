use std::sync::Arc;
use std::time::Instant;

use reqwest::Client;
use serde_json::Value;

use crate::config::app_config::SyncSettings;
use crate::errors::SyncError;
use crate::models::configuration_model::ServiceName;
use crate::models::mapping_model::{FieldMap, FieldMapSet};
use crate::models::sync_log_model::{NewSyncLog, SyncOperation, SyncStatus};
use crate::models::sync_model::{RunSummary, SyncDirection, SyncRequestKind};
use crate::services::{
    configuration_service::ConfigurationService, crm_client::CrmClient, field_mapping,
    run_guard::RunRegistry, sync_log_service::SyncLogService,
    sync_mapping_service::SyncMappingService, ticketing_client::TicketingClient,
};

/// Destino de los registros de una corrida.
enum Target<'a> {
    Ticketing {
        client: &'a TicketingClient,
        session: &'a str,
    },
    Crm(&'a CrmClient),
}

impl Target<'_> {
    /// Crea (o actualiza si hay `existing`) y devuelve el id del lado destino.
    async fn submit(&self, payload: &Value, existing: Option<&str>) -> Result<String, SyncError> {
        match (self, existing) {
            (Target::Ticketing { client, session }, None) => {
                client.create_entity(session, payload).await
            }
            (Target::Ticketing { client, session }, Some(id)) => {
                client.update_entity(session, id, payload).await
            }
            (Target::Crm(client), None) => client.create_asset(payload).await,
            (Target::Crm(client), Some(id)) => client.update_asset(id, payload).await,
        }
    }
}

#[derive(Clone)]
pub struct SyncService {
    config_service: ConfigurationService,
    log_service: SyncLogService,
    mapping_service: SyncMappingService,
    field_maps: Arc<FieldMapSet>,
    settings: SyncSettings,
    http_client: Client,
    runs: RunRegistry,
}

impl SyncService {
    pub fn new(
        config_service: ConfigurationService,
        log_service: SyncLogService,
        mapping_service: SyncMappingService,
        field_maps: FieldMapSet,
        settings: SyncSettings,
        http_client: Client,
    ) -> Self {
        SyncService {
            config_service,
            log_service,
            mapping_service,
            field_maps: Arc::new(field_maps),
            settings,
            http_client,
            runs: RunRegistry::default(),
        }
    }

    pub fn runs(&self) -> &RunRegistry {
        &self.runs
    }

    /// Una dirección, o ambas en orden. En bidireccional se intentan las dos
    /// y se devuelve el primer error.
    pub async fn run(
        &self,
        user_id: &str,
        kind: SyncRequestKind,
    ) -> Result<Vec<RunSummary>, SyncError> {
        let mut summaries = Vec::new();
        let mut first_error = None;

        for direction in kind.directions() {
            match self.run_sync(user_id, direction).await {
                Ok(summary) => summaries.push(summary),
                Err(e) => {
                    log::error!("(run) Corrida {} falló: {}", direction, e);
                    if first_error.is_none() {
                        first_error = Some(e);
                    }
                }
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(summaries),
        }
    }

    /// Corre una sincronización completa en una dirección.
    ///
    /// Las precondiciones (configuraciones listas, sin otra corrida igual en curso)
    /// se validan antes de escribir cualquier log. Los fallos por registro quedan en
    /// el log y no cortan la corrida; solo un fallo al obtener la colección origen
    /// (o al abrir la sesión) se propaga.
    pub async fn run_sync(
        &self,
        user_id: &str,
        direction: SyncDirection,
    ) -> Result<RunSummary, SyncError> {
        let crm_config = self
            .config_service
            .require_ready(user_id, ServiceName::Crm)
            .await?;
        let ticketing_config = self
            .config_service
            .require_ready(user_id, ServiceName::Ticketing)
            .await?;

        let _guard = self
            .runs
            .try_acquire(user_id, direction)
            .ok_or_else(|| SyncError::RunInProgress(direction.to_string()))?;

        let crm = CrmClient::new(self.http_client.clone(), &crm_config, &self.settings);
        let ticketing =
            TicketingClient::new(self.http_client.clone(), &ticketing_config, &self.settings);
        let sync_type = direction.sync_type();

        log::info!(
            "(run_sync) Iniciando {} para user_id={}...",
            direction,
            user_id
        );
        self.log_service
            .record(
                user_id,
                NewSyncLog::new(
                    sync_type,
                    SyncOperation::Sync,
                    SyncStatus::Success,
                    format!(
                        "Starting {} sync ({})",
                        direction.label().to_lowercase(),
                        direction.route()
                    ),
                ),
            )
            .await;

        let result = match direction {
            SyncDirection::CrmToTicketing => {
                self.sync_customers(user_id, &crm, &ticketing).await
            }
            SyncDirection::TicketingToCrm => self.sync_assets(user_id, &ticketing, &crm).await,
        };

        match result {
            Ok(summary) => {
                self.log_service
                    .record(
                        user_id,
                        NewSyncLog::new(
                            sync_type,
                            SyncOperation::Sync,
                            SyncStatus::Success,
                            format!(
                                "{} sync completed: {} successes, {} errors",
                                direction.label(),
                                summary.successes,
                                summary.errors
                            ),
                        ),
                    )
                    .await;
                log::info!(
                    "(run_sync) Finalizado {} para user_id={}: {}/{} ok",
                    direction,
                    user_id,
                    summary.successes,
                    summary.total
                );
                Ok(summary)
            }
            Err(e) => {
                log::error!("(run_sync) {} abortado: {}", direction, e);
                self.log_service
                    .record(
                        user_id,
                        NewSyncLog::new(
                            sync_type,
                            SyncOperation::Sync,
                            SyncStatus::Error,
                            format!("{} sync failed", direction.label()),
                        )
                        .details(e.to_string()),
                    )
                    .await;
                Err(e)
            }
        }
    }

    /// Clientes del CRM -> entidades. La sesión se abre después de leer el origen.
    async fn sync_customers(
        &self,
        user_id: &str,
        crm: &CrmClient,
        ticketing: &TicketingClient,
    ) -> Result<RunSummary, SyncError> {
        let records = crm
            .list_clients()
            .await
            .map_err(|e| SyncError::SourceFetch(e.to_string()))?;
        log::info!("(sync_customers) {} clientes encontrados", records.len());

        let session = ticketing
            .init_session()
            .await
            .map_err(|e| SyncError::Session(e.to_string()))?;

        let target = Target::Ticketing {
            client: ticketing,
            session: &session,
        };
        let summary = self
            .push_records(
                user_id,
                SyncDirection::CrmToTicketing,
                &self.field_maps.customer,
                &records,
                &target,
            )
            .await;

        self.close_session(ticketing, &session).await;
        Ok(summary)
    }

    /// Computadores -> activos del CRM. El origen necesita la sesión.
    async fn sync_assets(
        &self,
        user_id: &str,
        ticketing: &TicketingClient,
        crm: &CrmClient,
    ) -> Result<RunSummary, SyncError> {
        let session = ticketing
            .init_session()
            .await
            .map_err(|e| SyncError::Session(e.to_string()))?;

        let records = match ticketing.list_computers(&session).await {
            Ok(records) => records,
            Err(e) => {
                self.close_session(ticketing, &session).await;
                return Err(SyncError::SourceFetch(e.to_string()));
            }
        };
        log::info!("(sync_assets) {} activos encontrados", records.len());

        let summary = self
            .push_records(
                user_id,
                SyncDirection::TicketingToCrm,
                &self.field_maps.asset,
                &records,
                &Target::Crm(crm),
            )
            .await;

        self.close_session(ticketing, &session).await;
        Ok(summary)
    }

    /// killSession best-effort
    async fn close_session(&self, ticketing: &TicketingClient, session: &str) {
        match ticketing.kill_session(session).await {
            Ok(()) => log::info!("(close_session) Sesión cerrada"),
            Err(e) => log::warn!("(close_session) No se pudo cerrar la sesión: {}", e),
        }
    }

    /// Procesa cada registro por separado. Nunca falla: cada error queda en el log.
    async fn push_records(
        &self,
        user_id: &str,
        direction: SyncDirection,
        map: &FieldMap,
        records: &[Value],
        target: &Target<'_>,
    ) -> RunSummary {
        let sync_type = direction.sync_type();
        let kind = direction.label().to_lowercase();
        let mut successes = 0usize;
        let mut errors = 0usize;

        for (index, record) in records.iter().enumerate() {
            let source_id = field_mapping::source_id(map, record);
            let name = field_mapping::label(map, record)
                .or_else(|| source_id.clone())
                .unwrap_or_else(|| format!("#{}", index + 1));
            let payload = field_mapping::apply(map, record);

            let existing = match (&source_id, self.settings.update_existing) {
                (Some(id), true) => self
                    .mapping_service
                    .find_target(user_id, sync_type, id)
                    .await
                    .unwrap_or_else(|e| {
                        log::warn!("(push_records) No se pudo consultar sync_mappings: {:?}", e);
                        None
                    }),
                _ => None,
            };
            let operation = if existing.is_some() {
                SyncOperation::Update
            } else {
                SyncOperation::Create
            };

            log::info!(
                "(push_records) [{}/{}] {} '{}' ({:?})",
                index + 1,
                records.len(),
                operation.as_str(),
                name,
                source_id
            );

            let started = Instant::now();
            let outcome = target.submit(&payload, existing.as_deref()).await;
            let elapsed_ms = started.elapsed().as_millis() as i64;

            match outcome {
                Ok(target_id) => {
                    successes += 1;
                    if let Some(id) = &source_id {
                        if let Err(e) = self
                            .mapping_service
                            .record(user_id, sync_type, id, &target_id)
                            .await
                        {
                            log::warn!("(push_records) No se pudo guardar sync_mapping: {:?}", e);
                        }
                    }
                    self.log_service
                        .record(
                            user_id,
                            NewSyncLog::new(
                                sync_type,
                                operation,
                                SyncStatus::Success,
                                format!("{} \"{}\" synchronized", direction.label(), name),
                            )
                            .details(format!(
                                "source id: {} | target id: {}",
                                source_id.as_deref().unwrap_or("N/A"),
                                target_id
                            ))
                            .source_id(source_id.clone())
                            .target_id(Some(target_id))
                            .processing_time_ms(elapsed_ms),
                        )
                        .await;
                }
                Err(e) => {
                    errors += 1;
                    log::error!("(push_records) '{}' falló: {}", name, e);
                    self.log_service
                        .record(
                            user_id,
                            NewSyncLog::new(
                                sync_type,
                                operation,
                                SyncStatus::Error,
                                format!("Failed to synchronize {} \"{}\"", kind, name),
                            )
                            .details(e.to_string())
                            .source_id(source_id.clone())
                            .processing_time_ms(elapsed_ms),
                        )
                        .await;
                }
            }
        }

        RunSummary {
            direction,
            sync_type,
            total: records.len(),
            successes,
            errors,
        }
    }
}
