use std::future::Future;
use std::time::Duration;

use rand::Rng;

use crate::config::app_config::SyncSettings;
use crate::errors::SyncError;

/// Backoff exponencial con "equal jitter": mitad fija, mitad aleatoria.
pub fn backoff_delay(settings: &SyncSettings, attempt: u32) -> Duration {
    let exp = settings
        .backoff_base_ms
        .saturating_mul(1u64 << (attempt.saturating_sub(1)).min(20))
        .min(settings.backoff_max_ms);
    let half = exp / 2;
    let jitter = if half > 0 {
        rand::thread_rng().gen_range(0..=half)
    } else {
        0
    };
    Duration::from_millis(half + jitter)
}

/// Ejecuta `op` hasta `settings.max_attempts` veces mientras el error sea transitorio.
pub async fn with_retry<T, F, Fut>(
    settings: &SyncSettings,
    what: &str,
    mut op: F,
) -> Result<T, SyncError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, SyncError>>,
{
    let max_attempts = settings.max_attempts.max(1);
    let mut attempt = 1;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(e) if e.is_retryable() && attempt < max_attempts => {
                let delay = backoff_delay(settings, attempt);
                log::warn!(
                    "({}) Intento {}/{} falló: {}. Reintentando en {:?}",
                    what,
                    attempt,
                    max_attempts,
                    e,
                    delay
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}
