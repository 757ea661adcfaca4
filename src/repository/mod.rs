// ==========================================
// Lot Cost Engine - repository layer
// ==========================================
// Responsibility: data access behind a read contract, database details hidden
// Rule: parameterized queries only; no business logic
// ==========================================

pub mod costing_read_repo;
pub mod costing_read_repo_impl;
pub mod error;
pub mod memory_repo;

pub use costing_read_repo::CostingReadRepository;
pub use costing_read_repo_impl::SqliteCostingRepository;
pub use error::{RepositoryError, RepositoryResult};
pub use memory_repo::InMemoryCostingRepository;
