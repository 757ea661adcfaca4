// ==========================================
// Lot Cost Engine - configuration layer
// ==========================================
// Storage: config_kv table
// ==========================================

pub mod config_manager;
pub mod costing_config;

pub use config_manager::{config_keys, ConfigManager};
pub use costing_config::CostingConfig;
