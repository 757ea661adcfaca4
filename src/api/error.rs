// ==========================================
// Lot Cost Engine - API error types
// ==========================================
// Responsibility: map engine and repository failures onto
// caller-facing categories
// ==========================================

use crate::engine::error::CostingError;
use crate::repository::error::RepositoryError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    // ===== caller errors =====
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("not found: {0}")]
    NotFound(String),

    // ===== server errors =====
    /// Records contradict an invariant the engine relies on
    #[error("invalid state: {0}")]
    InvalidState(String),

    #[error("upstream failure: {0}")]
    UpstreamFailure(String),

    #[error("internal error: {0}")]
    InternalError(String),
}

impl ApiError {
    /// True for failures the caller can fix (4xx-like)
    pub fn is_client_error(&self) -> bool {
        matches!(self, ApiError::InvalidInput(_) | ApiError::NotFound(_))
    }
}

// ==========================================
// From RepositoryError
// ==========================================
impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound { entity, id } => {
                ApiError::NotFound(format!("{}(id={})", entity, id))
            }
            RepositoryError::DatabaseConnectionError(msg) => {
                ApiError::UpstreamFailure(format!("database connection failed: {}", msg))
            }
            RepositoryError::LockError(msg) => {
                ApiError::UpstreamFailure(format!("database lock failed: {}", msg))
            }
            RepositoryError::DatabaseQueryError(msg) => {
                ApiError::UpstreamFailure(format!("database query failed: {}", msg))
            }
            RepositoryError::FieldValueError { field, message } => {
                ApiError::UpstreamFailure(format!("malformed value in {}: {}", field, message))
            }
            RepositoryError::InternalError(msg) => ApiError::InternalError(msg),
            RepositoryError::Other(e) => ApiError::InternalError(e.to_string()),
        }
    }
}

// ==========================================
// From CostingError
// ==========================================
impl From<CostingError> for ApiError {
    fn from(err: CostingError) -> Self {
        match err {
            CostingError::NotFound { entity, id } => {
                ApiError::NotFound(format!("{}(id={})", entity, id))
            }
            CostingError::InvalidPeriod { year, month } => {
                ApiError::InvalidInput(format!("invalid period {}-{}", year, month))
            }
            CostingError::InvalidState(msg) => ApiError::InvalidState(msg),
            // A row missing in the middle of a join is a data problem, not a caller one
            CostingError::Upstream(RepositoryError::NotFound { entity, id }) => {
                ApiError::UpstreamFailure(format!("dangling reference to {}(id={})", entity, id))
            }
            CostingError::Upstream(e) => e.into(),
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
