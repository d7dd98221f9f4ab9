//! logger.rs
//! Configuración del logger usando env_logger.

/// Filtro por defecto si RUST_LOG no está definido: sqlx es muy ruidoso en info.
const DEFAULT_FILTER: &str = "info,sqlx=warn";

pub fn init_logger() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(DEFAULT_FILTER))
        .format_timestamp_secs()
        .init();
}

/// Para tests: no falla si otro test ya inicializó el logger.
#[cfg(test)]
pub fn init_test_logger() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .is_test(true)
        .try_init();
}
