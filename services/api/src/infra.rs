use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use talent_hub::config::AppConfig;
use talent_hub::error::AppError;
use talent_hub::store::SqliteStore;
use talent_hub::talent::TalentApi;
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Opens the configured database and wires every service over it.
pub(crate) fn connect(config: &AppConfig) -> Result<TalentApi<SqliteStore>, AppError> {
    let store = Arc::new(SqliteStore::open(&config.database)?);
    info!(
        database = %config.database.url,
        pool_size = config.database.pool_size,
        "database ready"
    );
    Ok(TalentApi::from_config(store, config)?)
}
