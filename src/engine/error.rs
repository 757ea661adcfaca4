// ==========================================
// Lot Cost Engine - engine error types
// ==========================================

use crate::repository::error::RepositoryError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CostingError {
    #[error("{entity} not found: id={id}")]
    NotFound { entity: String, id: String },

    #[error("invalid period: year={year}, month={month}")]
    InvalidPeriod { year: i32, month: u32 },

    /// Guard violation that entity invariants should have prevented
    #[error("invalid state: {0}")]
    InvalidState(String),

    #[error("upstream read failed: {0}")]
    Upstream(#[from] RepositoryError),
}

impl CostingError {
    pub fn lot_not_found(lot_id: &str) -> Self {
        CostingError::NotFound {
            entity: "Lot".to_string(),
            id: lot_id.to_string(),
        }
    }
}

pub type CostingResult<T> = Result<T, CostingError>;
