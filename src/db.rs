//! db.rs
//! Conexión a SQLite y migraciones embebidas.

use std::path::Path;
use std::str::FromStr;

use anyhow::{Context, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};

pub async fn setup_database(database_url: &str) -> Result<Pool<Sqlite>> {
    let in_memory = database_url.contains(":memory:");

    // Crear la carpeta del archivo si hace falta (p.ej. ./data)
    if !in_memory {
        let file_part = database_url
            .trim_start_matches("sqlite://")
            .trim_start_matches("sqlite:")
            .split('?')
            .next()
            .unwrap_or_default();
        if let Some(parent) = Path::new(file_part).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("No se pudo crear el directorio {:?}", parent))?;
            }
        }
    }

    log::info!("Conectando a SQLite en {}", database_url);

    let options = SqliteConnectOptions::from_str(database_url)
        .with_context(|| format!("DATABASE_URL inválida: {}", database_url))?
        .create_if_missing(true);

    // Una base en memoria vive mientras viva su única conexión
    let pool_options = if in_memory {
        SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
    } else {
        SqlitePoolOptions::new().max_connections(5)
    };

    let db_pool = pool_options
        .connect_with(options)
        .await
        .context("No se pudo conectar a la base de datos SQLite")?;

    Ok(db_pool)
}

/// Corre migraciones con sqlx
pub async fn run_migrations(db_pool: &Pool<Sqlite>) -> Result<()> {
    sqlx::migrate!("./migrations")
        .run(db_pool)
        .await
        .context("Fallo en migraciones")?;
    Ok(())
}
