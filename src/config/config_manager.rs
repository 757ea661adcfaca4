// ==========================================
// Lot Cost Engine - configuration manager
// ==========================================
// Storage: config_kv table (key-value, scope_id = 'global')
// ==========================================

use crate::config::costing_config::{CostingConfig, DEFAULT_INDICATOR_SCALE, MAX_INDICATOR_SCALE};
use crate::db::open_sqlite_connection;
use crate::domain::types::AreaBasis;
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

// ==========================================
// ConfigManager
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// Open a dedicated connection on `db_path`
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)
            .map_err(|e| RepositoryError::DatabaseConnectionError(e.to_string()))?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Build on an existing connection.
    ///
    /// The shared PRAGMAs are applied again (idempotent).
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> RepositoryResult<Self> {
        {
            let guard = conn
                .lock()
                .map_err(|e| RepositoryError::LockError(e.to_string()))?;
            crate::db::configure_sqlite_connection(&guard)?;
        }
        Ok(Self { conn })
    }

    /// Raw value of a global key
    pub fn get_global_config_value(&self, key: &str) -> RepositoryResult<Option<String>> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))?;
        let value = conn
            .query_row(
                "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
                params![key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    /// Every global key/value, ordered by key
    pub fn get_config_snapshot(&self) -> RepositoryResult<BTreeMap<String, String>> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))?;
        let mut stmt =
            conn.prepare("SELECT key, value FROM config_kv WHERE scope_id = 'global' ORDER BY key")?;
        let rows = stmt
            .query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)))?
            .collect::<rusqlite::Result<BTreeMap<_, _>>>()?;
        Ok(rows)
    }

    // ===== costing =====

    /// Load `CostingConfig`; missing or unparsable keys fall back to their defaults
    pub fn get_costing_config(&self) -> RepositoryResult<CostingConfig> {
        Ok(CostingConfig {
            as_of_date: self.get_as_of_date()?,
            area_basis: self.get_area_basis()?,
            indicator_scale: self.get_indicator_scale()?,
        })
    }

    pub fn get_as_of_date(&self) -> RepositoryResult<Option<NaiveDate>> {
        let value = match self.get_global_config_value(config_keys::AS_OF_DATE)? {
            Some(v) if !v.trim().is_empty() => v,
            _ => return Ok(None),
        };
        match NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d") {
            Ok(date) => Ok(Some(date)),
            Err(e) => {
                tracing::warn!(
                    config_key = config_keys::AS_OF_DATE,
                    raw_value = %value,
                    error = %e,
                    "unparsable as-of date, using the local date"
                );
                Ok(None)
            }
        }
    }

    pub fn get_area_basis(&self) -> RepositoryResult<AreaBasis> {
        let value = self
            .get_global_config_value(config_keys::AREA_BASIS)?
            .unwrap_or_else(|| AreaBasis::Current.to_db_str().to_string());
        Ok(AreaBasis::from_db_str(&value).unwrap_or_else(|| {
            tracing::warn!(
                config_key = config_keys::AREA_BASIS,
                raw_value = %value,
                "unknown area basis, using CURRENT"
            );
            AreaBasis::Current
        }))
    }

    pub fn get_indicator_scale(&self) -> RepositoryResult<u32> {
        let value = match self.get_global_config_value(config_keys::INDICATOR_SCALE)? {
            Some(v) => v,
            None => return Ok(DEFAULT_INDICATOR_SCALE),
        };
        match value.trim().parse::<u32>() {
            Ok(scale) => Ok(scale.min(MAX_INDICATOR_SCALE)),
            Err(_) => {
                tracing::warn!(
                    config_key = config_keys::INDICATOR_SCALE,
                    raw_value = %value,
                    "unparsable indicator scale, using default"
                );
                Ok(DEFAULT_INDICATOR_SCALE)
            }
        }
    }
}

// ==========================================
// Configuration keys
// ==========================================
pub mod config_keys {
    pub const AS_OF_DATE: &str = "costing.as_of_date";
    pub const AREA_BASIS: &str = "costing.area_basis";
    pub const INDICATOR_SCALE: &str = "costing.indicator_scale";
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_schema;

    fn manager_with(entries: &[(&str, &str)]) -> ConfigManager {
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();
        for (key, value) in entries {
            conn.execute(
                "INSERT INTO config_kv (scope_id, key, value) VALUES ('global', ?1, ?2)",
                params![key, value],
            )
            .unwrap();
        }
        ConfigManager::from_connection(Arc::new(Mutex::new(conn))).unwrap()
    }

    #[test]
    fn test_defaults_when_unset() {
        let cfg = manager_with(&[]).get_costing_config().unwrap();
        assert_eq!(cfg, CostingConfig::default());
    }

    #[test]
    fn test_reads_configured_values() {
        let cfg = manager_with(&[
            (config_keys::AS_OF_DATE, "2024-03-01"),
            (config_keys::AREA_BASIS, "historical"),
            (config_keys::INDICATOR_SCALE, "4"),
        ])
        .get_costing_config()
        .unwrap();
        assert_eq!(cfg.as_of_date, NaiveDate::from_ymd_opt(2024, 3, 1));
        assert_eq!(cfg.area_basis, AreaBasis::Historical);
        assert_eq!(cfg.indicator_scale, 4);
    }

    #[test]
    fn test_garbage_falls_back_to_defaults() {
        let cfg = manager_with(&[
            (config_keys::AS_OF_DATE, "yesterday"),
            (config_keys::AREA_BASIS, "SOMETIMES"),
            (config_keys::INDICATOR_SCALE, "-1"),
        ])
        .get_costing_config()
        .unwrap();
        assert_eq!(cfg, CostingConfig::default());
    }

    #[test]
    fn test_snapshot_is_ordered() {
        let snapshot = manager_with(&[("b", "2"), ("a", "1")])
            .get_config_snapshot()
            .unwrap();
        assert_eq!(snapshot.keys().collect::<Vec<_>>(), vec!["a", "b"]);
    }
}
