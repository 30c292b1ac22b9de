use std::time::Duration;

use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use tracing::info;

pub use configs::DatabaseConfig;

/// `DATABASE_URL` from the environment (after loading `.env`).
pub fn database_url() -> anyhow::Result<String> {
    let _ = dotenvy::dotenv();
    std::env::var("DATABASE_URL").map_err(|_| anyhow::anyhow!("DATABASE_URL is not set"))
}

/// Connect with pool sizing and timeouts from config.
/// The connect/acquire timeouts are the only bound on how long a storage call may wait.
pub async fn connect_with_config(cfg: &DatabaseConfig) -> anyhow::Result<DatabaseConnection> {
    let mut opt = ConnectOptions::new(cfg.url.clone());
    opt.max_connections(cfg.max_connections)
        .min_connections(cfg.min_connections)
        .connect_timeout(Duration::from_secs(cfg.connect_timeout_secs))
        .acquire_timeout(Duration::from_secs(cfg.acquire_timeout_secs))
        .idle_timeout(Duration::from_secs(cfg.idle_timeout_secs))
        .max_lifetime(Duration::from_secs(cfg.max_lifetime_secs))
        .sqlx_logging(cfg.sqlx_logging);
    let db = Database::connect(opt).await?;
    info!(max_connections = cfg.max_connections, "database pool ready");
    Ok(db)
}

/// Connect using `DATABASE_URL` and default pool settings.
pub async fn connect() -> anyhow::Result<DatabaseConnection> {
    let cfg = DatabaseConfig { url: database_url()?, ..DatabaseConfig::default() };
    cfg.validate()?;
    connect_with_config(&cfg).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_no_built_in_url() {
        let cfg = DatabaseConfig::default();
        assert!(cfg.url.is_empty());
        assert!(cfg.validate().is_err());
    }
}
