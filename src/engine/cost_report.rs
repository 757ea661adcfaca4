// ==========================================
// Lot Cost Engine - total cost report
// ==========================================
// grand_total = purchase + feed + direct + sum(monthly proration)
// ==========================================

use crate::config::CostingConfig;
use crate::domain::{Lot, PenOccupancy};
use crate::engine::calendar::MonthRange;
use crate::engine::direct_cost::{DirectCostAggregator, DirectExpenseSummary, FeedCostSummary};
use crate::engine::error::{CostingError, CostingResult};
use crate::engine::indicators::sum_counts;
use crate::engine::proration::{MonthProration, ProrationEngine};
use crate::repository::CostingReadRepository;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CostBreakdown {
    pub purchase: Decimal,
    pub feed: Decimal,
    pub direct: Decimal,
    pub prorated: Decimal,
}

impl CostBreakdown {
    pub fn total(&self) -> Decimal {
        self.purchase + self.feed + self.direct + self.prorated
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LotCostReport {
    pub lot_id: String,
    pub lot_code: String,
    pub start_date: NaiveDate,
    pub close_date: Option<NaiveDate>,
    /// close_date, or "today" for an open lot
    pub effective_end: NaiveDate,
    pub grand_total: Decimal,
    pub breakdown: CostBreakdown,
    pub feed_detail: FeedCostSummary,
    pub direct_expense_detail: DirectExpenseSummary,
    /// Keyed "YYYY-MM"
    pub monthly_proration: BTreeMap<String, MonthProration>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LotSummary {
    pub lot: Lot,
    pub current_pens: Vec<PenOccupancy>,
    pub occupied_area: Decimal,
    pub mortality_total: i64,
    pub sold_total: i64,
    /// initial - mortality - sold; negative on inconsistent records
    pub current_head_count: i64,
}

// ==========================================
// CostReportAggregator
// ==========================================
pub struct CostReportAggregator {
    repo: Arc<dyn CostingReadRepository>,
    direct: DirectCostAggregator,
    proration: ProrationEngine,
}

impl CostReportAggregator {
    pub fn new(repo: Arc<dyn CostingReadRepository>, config: &CostingConfig) -> Self {
        Self {
            direct: DirectCostAggregator::new(repo.clone()),
            proration: ProrationEngine::new(repo.clone(), config.area_basis),
            repo,
        }
    }

    pub fn direct(&self) -> &DirectCostAggregator {
        &self.direct
    }

    pub fn proration(&self) -> &ProrationEngine {
        &self.proration
    }

    fn require_lot(&self, lot_id: &str) -> CostingResult<Lot> {
        self.repo
            .get_lot(lot_id)?
            .ok_or_else(|| CostingError::lot_not_found(lot_id))
    }

    /// Build the cost report of one lot
    ///
    /// # Arguments
    /// * `lot_id` - lot identifier
    /// * `today` - end of the interval while the lot is open
    ///
    /// # Returns
    /// * `Ok(LotCostReport)` - grand total with every monthly share keyed `YYYY-MM`
    /// * `Err(NotFound)` - unknown lot
    /// * `Err(InvalidState)` - a monthly share overflowed
    #[instrument(skip(self, lot_id, today), fields(lot_id = %lot_id, today = %today))]
    pub fn total_cost(&self, lot_id: &str, today: NaiveDate) -> CostingResult<LotCostReport> {
        info!("building total cost report");

        // Step 1: lot
        let lot = self.require_lot(lot_id)?;

        // Step 2: effective interval
        let (start, end) = lot.effective_interval(today);
        if end < start {
            warn!(start = %start, end = %end, "lot ends before it starts, no months prorated");
        }

        // Step 3: direct costs
        let feed_detail = self.direct.feed_cost(lot_id)?;
        let direct_expense_detail = self.direct.direct_expenses(lot_id)?;

        // Step 4: every month of the interval
        let mut prorated = Decimal::ZERO;
        let mut monthly_proration = BTreeMap::new();
        for period in MonthRange::spanning(start, end) {
            let month = self.proration.prorate_lot_month(&lot, period, today)?;
            prorated += month.total;
            monthly_proration.insert(period.key(), month);
        }
        debug!(months = monthly_proration.len(), prorated = %prorated, "months prorated");

        // Step 5: totals
        let breakdown = CostBreakdown {
            purchase: lot.purchase_cost,
            feed: feed_detail.total_cost,
            direct: direct_expense_detail.total,
            prorated,
        };
        let grand_total = breakdown.total();
        info!(grand_total = %grand_total, "total cost report built");

        Ok(LotCostReport {
            lot_id: lot.lot_id.clone(),
            lot_code: lot.lot_code.clone(),
            start_date: lot.start_date,
            close_date: lot.close_date,
            effective_end: end,
            grand_total,
            breakdown,
            feed_detail,
            direct_expense_detail,
            monthly_proration,
        })
    }

    /// Current pens, head counts and occupied area of a lot.
    ///
    /// A negative head count is returned as is and only logged.
    #[instrument(skip(self, lot_id), fields(lot_id = %lot_id))]
    pub fn lot_summary(&self, lot_id: &str) -> CostingResult<LotSummary> {
        let lot = self.require_lot(lot_id)?;
        let current_pens = self.repo.get_current_pen_assignments(lot_id)?;
        let occupied_area: Decimal = current_pens.iter().map(|p| p.area).sum();
        let mortality_total = sum_counts(
            self.repo.get_mortality(lot_id)?.iter().map(|r| r.count),
            "mortality",
        )?;
        let sold_total = sum_counts(
            self.repo.get_harvests(lot_id)?.iter().map(|h| h.animal_count),
            "sold animals",
        )?;
        let current_head_count = lot
            .initial_head_count
            .checked_sub(mortality_total)
            .and_then(|n| n.checked_sub(sold_total))
            .ok_or_else(|| {
                CostingError::InvalidState(format!(
                    "overflow computing head count of lot {}",
                    lot.lot_id
                ))
            })?;
        if current_head_count < 0 {
            warn!(
                initial = lot.initial_head_count,
                mortality_total,
                sold_total,
                current_head_count,
                "more animals removed than received"
            );
        }
        Ok(LotSummary {
            lot,
            current_pens,
            occupied_area,
            mortality_total,
            sold_total,
            current_head_count,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::{
        DirectExpenseCategory, FeedCategory, LotStatus, SharedExpenseCategory,
    };
    use crate::domain::{
        DirectExpense, FeedConsumption, HarvestRecord, MortalityRecord, Pen, PenAssignment,
        SharedMonthlyExpense,
    };
    use crate::repository::InMemoryCostingRepository;
    use std::str::FromStr;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn shared(year: i32, month: u32, concept: &str, amount: &str) -> SharedMonthlyExpense {
        SharedMonthlyExpense {
            expense_id: format!("S-{}-{}-{}", year, month, concept),
            year,
            month,
            concept: concept.to_string(),
            category: SharedExpenseCategory::Rent,
            amount: dec(amount),
        }
    }

    fn repo() -> InMemoryCostingRepository {
        InMemoryCostingRepository::new()
            .with_lot(Lot {
                lot_id: "L1".to_string(),
                lot_code: "2024-001".to_string(),
                start_date: date(2024, 1, 15),
                close_date: Some(date(2024, 2, 10)),
                status: LotStatus::Closed,
                initial_head_count: 100,
                initial_avg_weight: dec("25"),
                purchase_cost: dec("10000000"),
            })
            .with_pen(Pen {
                pen_id: "P1".to_string(),
                name: "Pen 1".to_string(),
                area: dec("100"),
                active: true,
            })
            .with_assignment(PenAssignment {
                assignment_id: "A1".to_string(),
                lot_id: "L1".to_string(),
                pen_id: "P1".to_string(),
                assigned_date: Some(date(2024, 1, 15)),
                release_date: None,
            })
            .with_feed(FeedConsumption {
                consumption_id: "C1".to_string(),
                lot_id: "L1".to_string(),
                date: date(2024, 1, 20),
                units_consumed: dec("10"),
                feed_type_id: "F1".to_string(),
                feed_name: "Grower 18".to_string(),
                category: FeedCategory::Grower,
                cost_per_unit: dec("50000"),
                weight_per_unit: dec("40"),
            })
            .with_direct_expense(DirectExpense {
                expense_id: "E1".to_string(),
                lot_id: "L1".to_string(),
                date: date(2024, 1, 15),
                concept: "freight in".to_string(),
                category: DirectExpenseCategory::Transport,
                amount: dec("300000"),
            })
            .with_shared_expense(shared(2024, 1, "rent", "3100000"))
            .with_shared_expense(shared(2024, 2, "rent", "2900000"))
            .with_shared_expense(shared(2024, 3, "rent", "9999999"))
            .with_mortality(MortalityRecord {
                record_id: "M1".to_string(),
                lot_id: "L1".to_string(),
                date: date(2024, 1, 25),
                count: 3,
            })
            .with_harvest(HarvestRecord {
                record_id: "H1".to_string(),
                lot_id: "L1".to_string(),
                date: date(2024, 2, 10),
                animal_count: 97,
                total_weight: dec("10670"),
                is_final: true,
            })
    }

    fn aggregator(repo: InMemoryCostingRepository) -> CostReportAggregator {
        CostReportAggregator::new(Arc::new(repo), &CostingConfig::default())
    }

    #[test]
    fn test_total_cost_reconstructs_from_parts() {
        let report = aggregator(repo()).total_cost("L1", date(2024, 6, 1)).unwrap();

        // sole lot: January 3,100,000 * 17/31, February 2,900,000 * 10/29
        assert_eq!(report.monthly_proration.len(), 2);
        assert_eq!(report.monthly_proration["2024-01"].total, dec("1700000"));
        assert_eq!(report.monthly_proration["2024-02"].total, dec("1000000"));
        assert_eq!(report.breakdown.prorated, dec("2700000"));
        assert_eq!(report.breakdown.feed, dec("500000"));
        assert_eq!(report.breakdown.direct, dec("300000"));

        let months: Decimal = report.monthly_proration.values().map(|m| m.total).sum();
        assert_eq!(
            report.grand_total,
            report.breakdown.purchase + report.breakdown.feed + report.breakdown.direct + months
        );
        assert_eq!(report.grand_total, dec("13500000"));
        assert_eq!(report.effective_end, date(2024, 2, 10));
    }

    #[test]
    fn test_open_lot_runs_through_today() {
        let mut repo = repo();
        repo.lots[0].close_date = None;
        let report = aggregator(repo).total_cost("L1", date(2024, 3, 5)).unwrap();
        assert_eq!(report.effective_end, date(2024, 3, 5));
        assert_eq!(report.monthly_proration.len(), 3);
        assert!(report.monthly_proration.contains_key("2024-03"));
    }

    #[test]
    fn test_total_cost_missing_lot_is_not_found() {
        let err = aggregator(repo()).total_cost("NOPE", date(2024, 6, 1)).unwrap_err();
        assert!(matches!(err, CostingError::NotFound { .. }));
    }

    #[test]
    fn test_end_before_start_prorates_nothing() {
        let mut repo = repo();
        repo.lots[0].close_date = None;
        let report = aggregator(repo).total_cost("L1", date(2023, 12, 1)).unwrap();
        assert!(report.monthly_proration.is_empty());
        assert_eq!(report.breakdown.prorated, Decimal::ZERO);
    }

    #[test]
    fn test_lot_summary_counts_heads() {
        let summary = aggregator(repo()).lot_summary("L1").unwrap();
        assert_eq!(summary.current_pens.len(), 1);
        assert_eq!(summary.occupied_area, dec("100"));
        assert_eq!(summary.mortality_total, 3);
        assert_eq!(summary.sold_total, 97);
        assert_eq!(summary.current_head_count, 0);
    }

    #[test]
    fn test_lot_summary_reports_negative_head_count() {
        let mut repo = repo();
        repo.harvests[0].animal_count = 150;
        let summary = aggregator(repo).lot_summary("L1").unwrap();
        assert_eq!(summary.current_head_count, -53);
    }

    #[test]
    fn test_lot_summary_count_overflow_is_invalid_state() {
        let mut repo = repo();
        repo.mortality[0].count = i64::MAX;
        repo.harvests[0].animal_count = i64::MAX;
        let err = aggregator(repo).lot_summary("L1").unwrap_err();
        assert!(matches!(err, CostingError::InvalidState(_)), "got {:?}", err);
    }
}
