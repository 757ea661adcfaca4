// ==========================================
// Lot Cost Engine - API layer
// ==========================================
// Responsibility: caller-facing queries; results are Serialize
// ==========================================

pub mod error;
pub mod report_api;

pub use error::{ApiError, ApiResult};
pub use report_api::ReportApi;
