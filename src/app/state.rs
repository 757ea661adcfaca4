// ==========================================
// Lot Cost Engine - application state
// ==========================================
// Responsibility: wire config, repository, engine and API
// on one shared SQLite connection
// ==========================================

use crate::api::ReportApi;
use crate::config::{ConfigManager, CostingConfig};
use crate::db::open_sqlite_connection;
use crate::engine::CostingEngine;
use crate::repository::SqliteCostingRepository;
use chrono::NaiveDate;
use std::sync::{Arc, Mutex};

/// Environment variable naming the database file
pub const DB_PATH_ENV: &str = "LOT_COST_DB_PATH";

pub struct AppState {
    pub db_path: String,
    pub config: CostingConfig,
    pub report_api: Arc<ReportApi>,
}

impl AppState {
    /// Open `db_path` and build the API.
    ///
    /// `as_of` overrides the configured `costing.as_of_date`.
    pub fn new(db_path: String, as_of: Option<NaiveDate>) -> Result<Self, String> {
        tracing::info!(db_path = %db_path, "initializing AppState");

        let conn = open_sqlite_connection(&db_path)
            .map_err(|e| format!("cannot open database {}: {}", db_path, e))?;
        let conn = Arc::new(Mutex::new(conn));

        let config_manager = ConfigManager::from_connection(conn.clone())
            .map_err(|e| format!("cannot create ConfigManager: {}", e))?;
        let mut config = config_manager
            .get_costing_config()
            .map_err(|e| format!("cannot load costing config: {}", e))?;
        if let Some(date) = as_of {
            config = config.with_as_of_date(date);
        }
        tracing::debug!(?config, "costing config loaded");

        let repo = Arc::new(SqliteCostingRepository::from_connection(conn));
        let engine = Arc::new(CostingEngine::new(repo, config.clone()));
        let report_api = Arc::new(ReportApi::new(engine));

        tracing::info!("AppState ready");
        Ok(Self {
            db_path,
            config,
            report_api,
        })
    }
}

/// Default database path.
///
/// `LOT_COST_DB_PATH` if set, else `<data dir>/lot-cost/lot_cost.db`,
/// else `./lot_cost.db`.
pub fn get_default_db_path() -> String {
    use std::path::PathBuf;

    if let Ok(path) = std::env::var(DB_PATH_ENV) {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let mut path = PathBuf::from("./lot_cost.db");
    if let Some(data_dir) = dirs::data_dir() {
        let dir = data_dir.join("lot-cost");
        if std::fs::create_dir_all(&dir).is_ok() {
            path = dir.join("lot_cost.db");
        }
    }
    path.to_string_lossy().to_string()
}
