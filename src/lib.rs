// ==========================================
// Lot Cost Engine - core library
// ==========================================
// Full cost of livestock lots that share pens and a monthly
// expense pool. Read-only over an SQLite store.
// ==========================================

// ==========================================
// Modules
// ==========================================

// Domain layer - entities and value types
pub mod domain;

// Repository layer - read contract and implementations
pub mod repository;

// Engine layer - costing rules
pub mod engine;

// Configuration layer
pub mod config;

// Database plumbing (connection setup, schema)
pub mod db;

// Logging
pub mod logging;

// API layer - caller-facing queries
pub mod api;

// Application layer - wiring
pub mod app;

// ==========================================
// Re-exports
// ==========================================

pub use domain::types::{
    AreaBasis, DirectExpenseCategory, FeedCategory, LotStatus, SharedExpenseCategory,
};

pub use domain::{
    DirectExpense, FeedConsumption, HarvestRecord, Lot, MortalityRecord, Pen, PenAssignment,
    PenOccupancy, SharedMonthlyExpense, YearMonth,
};

pub use engine::{
    CostingEngine, CostingError, CostingResult, EfficiencyIndicators, LotCostReport, LotSummary,
    MonthProration,
};

pub use repository::{
    CostingReadRepository, InMemoryCostingRepository, RepositoryError, SqliteCostingRepository,
};

pub use api::{ApiError, ApiResult, ReportApi};

pub use config::CostingConfig;

// ==========================================
// Constants
// ==========================================

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
