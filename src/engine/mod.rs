// ==========================================
// Lot Cost Engine - engine layer
// ==========================================
// Responsibility: costing rules over the read contract
// Rule: no SQL here, every read goes through CostingReadRepository
// ==========================================

pub mod calendar;
pub mod cost_report;
pub mod direct_cost;
pub mod error;
pub mod indicators;
pub mod occupancy;
pub mod proration;

pub use calendar::{days_in_month, days_of_overlap, month_bounds, MonthRange};
pub use cost_report::{CostBreakdown, CostReportAggregator, LotCostReport, LotSummary};
pub use direct_cost::{
    DirectCostAggregator, DirectExpenseSummary, FeedCategoryBucket, FeedCostSummary,
};
pub use error::{CostingError, CostingResult};
pub use indicators::{EfficiencyIndicators, IndicatorCalculator, IndicatorInputs};
pub use occupancy::{ActiveBasis, OccupancyResolver};
pub use proration::{MonthProration, ProratedExpense, ProrationEngine, ProrationMetadata};

use crate::config::CostingConfig;
use crate::repository::CostingReadRepository;
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::{info, instrument};

// ==========================================
// CostingEngine
// ==========================================
// Stateless between calls; "today" is resolved once per call
pub struct CostingEngine {
    repo: Arc<dyn CostingReadRepository>,
    config: CostingConfig,
    occupancy: OccupancyResolver,
    reports: CostReportAggregator,
    indicators: IndicatorCalculator,
}

impl CostingEngine {
    /// Wire every calculator over one shared repository
    ///
    /// # Arguments
    /// * `repo` - read side of the farm records
    /// * `config` - area basis, indicator scale and the pinned `today`
    pub fn new(repo: Arc<dyn CostingReadRepository>, config: CostingConfig) -> Self {
        Self {
            occupancy: OccupancyResolver::new(repo.clone(), config.area_basis),
            reports: CostReportAggregator::new(repo.clone(), &config),
            indicators: IndicatorCalculator::new(config.indicator_scale),
            repo,
            config,
        }
    }

    pub fn config(&self) -> &CostingConfig {
        &self.config
    }

    // ===== occupancy =====

    pub fn occupied_area(&self, lot_id: &str) -> CostingResult<Decimal> {
        self.occupancy.occupied_area(lot_id)
    }

    pub fn active_days_in_month(&self, lot_id: &str, year: i32, month: u32) -> CostingResult<i64> {
        self.occupancy
            .active_days_in_month(lot_id, year, month, self.config.today())
    }

    pub fn active_lots_and_area_sum(&self, year: i32, month: u32) -> CostingResult<ActiveBasis> {
        self.occupancy
            .active_lots_and_area_sum(calendar::year_month(year, month)?)
    }

    // ===== direct costs =====

    pub fn feed_cost(&self, lot_id: &str) -> CostingResult<FeedCostSummary> {
        self.reports.direct().feed_cost(lot_id)
    }

    pub fn direct_expenses(&self, lot_id: &str) -> CostingResult<DirectExpenseSummary> {
        self.reports.direct().direct_expenses(lot_id)
    }

    pub fn purchase_cost(&self, lot_id: &str) -> CostingResult<Decimal> {
        self.reports.direct().purchase_cost(lot_id)
    }

    // ===== reports =====

    pub fn prorate_month(&self, lot_id: &str, year: i32, month: u32) -> CostingResult<MonthProration> {
        self.reports
            .proration()
            .prorate_month(lot_id, year, month, self.config.today())
    }

    /// Full cost report of a lot up to its close date, or `today` while open
    pub fn total_cost(&self, lot_id: &str) -> CostingResult<LotCostReport> {
        self.reports.total_cost(lot_id, self.config.today())
    }

    /// Efficiency ratios on top of the total cost report
    ///
    /// # Arguments
    /// * `lot_id` - lot identifier
    ///
    /// # Returns
    /// * `Ok(EfficiencyIndicators)` - ratios rounded to the indicator scale
    /// * `Err(NotFound)` - unknown lot
    /// * `Err(InvalidState)` - counts or ratios overflow
    #[instrument(skip(self, lot_id), fields(lot_id = %lot_id))]
    pub fn efficiency_indicators(&self, lot_id: &str) -> CostingResult<EfficiencyIndicators> {
        let report = self.total_cost(lot_id)?;
        // total_cost already failed with NotFound when the lot is missing
        let lot = self
            .repo
            .get_lot(lot_id)?
            .ok_or_else(|| CostingError::lot_not_found(lot_id))?;
        let mortality = self.repo.get_mortality(lot_id)?;
        let harvests = self.repo.get_harvests(lot_id)?;
        let indicators = self.indicators.compute(IndicatorInputs {
            lot: &lot,
            mortality: &mortality,
            harvests: &harvests,
            feed_mass_total: report.feed_detail.total_mass,
            grand_total: report.grand_total,
        })?;
        info!(
            mortality_pct = %indicators.mortality_pct,
            cost_per_kg = %indicators.cost_per_kg,
            "efficiency indicators computed"
        );
        Ok(indicators)
    }

    pub fn lot_summary(&self, lot_id: &str) -> CostingResult<LotSummary> {
        self.reports.lot_summary(lot_id)
    }
}
