// ==========================================
// Lot Cost Engine - report API
// ==========================================
// Responsibility: input validation and error mapping around
// the read-only cost queries
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::engine::{
    CostingEngine, EfficiencyIndicators, LotCostReport, LotSummary, MonthProration,
};
use std::sync::Arc;
use tracing::{debug, warn};

pub struct ReportApi {
    engine: Arc<CostingEngine>,
}

impl ReportApi {
    pub fn new(engine: Arc<CostingEngine>) -> Self {
        Self { engine }
    }

    pub fn engine(&self) -> &CostingEngine {
        &self.engine
    }

    /// Purchase, feed, direct and prorated cost of a lot, with per-month detail
    pub fn get_total_cost(&self, lot_id: &str) -> ApiResult<LotCostReport> {
        let lot_id = validate_lot_id(lot_id)?;
        debug!(lot_id, "get_total_cost");
        self.engine.total_cost(lot_id).map_err(log_failure)
    }

    pub fn get_efficiency_indicators(&self, lot_id: &str) -> ApiResult<EfficiencyIndicators> {
        let lot_id = validate_lot_id(lot_id)?;
        debug!(lot_id, "get_efficiency_indicators");
        self.engine.efficiency_indicators(lot_id).map_err(log_failure)
    }

    pub fn get_month_proration(
        &self,
        lot_id: &str,
        year: i32,
        month: u32,
    ) -> ApiResult<MonthProration> {
        let lot_id = validate_lot_id(lot_id)?;
        debug!(lot_id, year, month, "get_month_proration");
        self.engine
            .prorate_month(lot_id, year, month)
            .map_err(log_failure)
    }

    pub fn get_lot_summary(&self, lot_id: &str) -> ApiResult<LotSummary> {
        let lot_id = validate_lot_id(lot_id)?;
        debug!(lot_id, "get_lot_summary");
        self.engine.lot_summary(lot_id).map_err(log_failure)
    }
}

fn validate_lot_id(lot_id: &str) -> ApiResult<&str> {
    let trimmed = lot_id.trim();
    if trimmed.is_empty() {
        return Err(ApiError::InvalidInput("lot_id must not be empty".to_string()));
    }
    Ok(trimmed)
}

fn log_failure(err: crate::engine::CostingError) -> ApiError {
    let api_err = ApiError::from(err);
    if !api_err.is_client_error() {
        warn!(error = %api_err, "report query failed");
    }
    api_err
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CostingConfig;
    use crate::domain::types::LotStatus;
    use crate::domain::Lot;
    use crate::repository::InMemoryCostingRepository;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    fn api() -> ReportApi {
        let repo = InMemoryCostingRepository::new().with_lot(Lot {
            lot_id: "L1".to_string(),
            lot_code: "2024-001".to_string(),
            start_date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            close_date: None,
            status: LotStatus::Active,
            initial_head_count: 100,
            initial_avg_weight: Decimal::new(25, 0),
            purchase_cost: Decimal::new(10_000_000, 0),
        });
        let config = CostingConfig::default()
            .with_as_of_date(NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());
        ReportApi::new(Arc::new(CostingEngine::new(Arc::new(repo), config)))
    }

    #[test]
    fn test_blank_lot_id_is_invalid_input() {
        let err = api().get_total_cost("  ").unwrap_err();
        assert!(matches!(err, ApiError::InvalidInput(_)));
    }

    #[test]
    fn test_lot_id_is_trimmed() {
        let report = api().get_total_cost(" L1 ").unwrap();
        assert_eq!(report.lot_id, "L1");
        assert_eq!(report.grand_total, Decimal::new(10_000_000, 0));
    }

    #[test]
    fn test_missing_lot_is_not_found() {
        assert!(matches!(
            api().get_lot_summary("NOPE").unwrap_err(),
            ApiError::NotFound(_)
        ));
        assert!(matches!(
            api().get_efficiency_indicators("NOPE").unwrap_err(),
            ApiError::NotFound(_)
        ));
    }

    #[test]
    fn test_bad_month_is_invalid_input() {
        let err = api().get_month_proration("L1", 2024, 13).unwrap_err();
        assert!(matches!(err, ApiError::InvalidInput(_)));
        assert!(err.is_client_error());
    }

    #[test]
    fn test_month_proration_missing_lot_is_empty() {
        let result = api().get_month_proration("NOPE", 2024, 1).unwrap();
        assert_eq!(result.total, Decimal::ZERO);
    }
}
