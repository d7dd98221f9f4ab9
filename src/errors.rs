//! errors.rs
//! Errores del motor de sincronización y del probe.

use std::error::Error as StdError;

#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    /// Falta la configuración, está deshabilitada o sin credenciales
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    /// La petición no llegó a tener respuesta (DNS, conexión, timeout...)
    #[error("Transport error: {0}")]
    Transport(String),

    /// El sistema remoto respondió con un status no 2xx
    #[error("HTTP {status}: {body}")]
    Remote { status: u16, body: String },

    /// Respuesta 2xx pero con un cuerpo inesperado
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Failed to open ticketing session: {0}")]
    Session(String),

    #[error("Failed to fetch source records: {0}")]
    SourceFetch(String),

    #[error("A {0} run is already in progress")]
    RunInProgress(String),

    #[error("Storage error: {0:#}")]
    Storage(#[from] anyhow::Error),
}

impl SyncError {
    /// Fallos transitorios que vale la pena reintentar.
    pub fn is_retryable(&self) -> bool {
        match self {
            SyncError::Transport(_) => true,
            SyncError::Remote { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

impl From<reqwest::Error> for SyncError {
    fn from(e: reqwest::Error) -> Self {
        SyncError::Transport(error_chain(&e))
    }
}

/// Une el mensaje del error con todas sus causas: "a: b: c".
pub fn error_chain(err: &(dyn StdError + 'static)) -> String {
    let mut text = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let msg = cause.to_string();
        if !text.contains(&msg) {
            text.push_str(": ");
            text.push_str(&msg);
        }
        source = cause.source();
    }
    text
}
