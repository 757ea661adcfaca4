// ==========================================
// Lot Cost Engine - monthly proration engine
// ==========================================
// Shares of a month's shared expenses charged to one lot:
//   RENT  : amount * area_lot * days_lot / (area_sum_active * days_month)
//   other : amount * area_lot / area_sum_active
// A single division per figure; nothing is rounded here
// ==========================================

use crate::domain::types::{AreaBasis, SharedExpenseCategory};
use crate::domain::{Lot, SharedMonthlyExpense, YearMonth};
use crate::engine::calendar::year_month;
use crate::engine::error::{CostingError, CostingResult};
use crate::engine::occupancy::{active_days, OccupancyResolver};
use crate::repository::CostingReadRepository;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, instrument, warn};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProratedExpense {
    pub category: SharedExpenseCategory,
    pub amount_total: Decimal,
    pub amount_prorated: Decimal,
}

/// Inputs the figures of one month were computed from
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProrationMetadata {
    pub area_lot: Decimal,
    pub days_lot: i64,
    pub days_month: u32,
    pub area_sum_active: Decimal,
    pub active_lot_count: usize,
    pub area_basis: AreaBasis,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthProration {
    pub period: YearMonth,
    pub total: Decimal,
    /// Keyed by expense concept
    pub detail: BTreeMap<String, ProratedExpense>,
    /// None when the lot held no area or no days in the month
    pub metadata: Option<ProrationMetadata>,
}

impl MonthProration {
    pub fn empty(period: YearMonth) -> Self {
        Self {
            period,
            total: Decimal::ZERO,
            detail: BTreeMap::new(),
            metadata: None,
        }
    }
}

// ==========================================
// ProrationEngine
// ==========================================
pub struct ProrationEngine {
    repo: Arc<dyn CostingReadRepository>,
    occupancy: OccupancyResolver,
}

impl ProrationEngine {
    pub fn new(repo: Arc<dyn CostingReadRepository>, area_basis: AreaBasis) -> Self {
        let occupancy = OccupancyResolver::new(repo.clone(), area_basis);
        Self { repo, occupancy }
    }

    /// Month share of shared expenses for one lot.
    ///
    /// # Arguments
    /// * `lot_id` - lot identifier
    /// * `year`, `month` - period to prorate
    /// * `today` - end of an open lot's interval
    ///
    /// # Returns
    /// * `Ok(MonthProration)` - empty when the lot does not exist
    /// * `Err(InvalidPeriod)` - month outside 1-12
    #[instrument(skip(self, lot_id, today), fields(lot_id = %lot_id))]
    pub fn prorate_month(
        &self,
        lot_id: &str,
        year: i32,
        month: u32,
        today: NaiveDate,
    ) -> CostingResult<MonthProration> {
        let period = year_month(year, month)?;
        match self.repo.get_lot(lot_id)? {
            Some(lot) => self.prorate_lot_month(&lot, period, today),
            None => {
                debug!("lot not found, nothing to prorate");
                Ok(MonthProration::empty(period))
            }
        }
    }

    pub fn prorate_lot_month(
        &self,
        lot: &Lot,
        period: YearMonth,
        today: NaiveDate,
    ) -> CostingResult<MonthProration> {
        // Step 1: area held by the lot
        let area_lot = self.occupancy.area_for_month(lot, period)?;
        if area_lot.is_zero() {
            debug!(lot_id = %lot.lot_id, period = %period, "no occupied area");
            return Ok(MonthProration::empty(period));
        }

        // Step 2: days present in the month
        let days_lot = active_days(lot, period, today);
        if days_lot == 0 {
            debug!(lot_id = %lot.lot_id, period = %period, "not present in month");
            return Ok(MonthProration::empty(period));
        }

        // Step 3-4: month length and active basis
        let days_month = period.days();
        let basis = self.occupancy.active_lots_and_area_sum(period)?;

        // Step 5: shares
        let expenses = self.repo.get_shared_monthly_expenses(period)?;
        let mut total = Decimal::ZERO;
        let mut detail: BTreeMap<String, ProratedExpense> = BTreeMap::new();
        for expense in &expenses {
            let prorated = prorated_amount(
                expense,
                area_lot,
                basis.total_area,
                days_lot,
                days_month,
            )?;
            total += prorated;
            match detail.entry(expense.concept.clone()) {
                Entry::Vacant(slot) => {
                    slot.insert(ProratedExpense {
                        category: expense.category,
                        amount_total: expense.amount,
                        amount_prorated: prorated,
                    });
                }
                Entry::Occupied(mut slot) => {
                    let entry = slot.get_mut();
                    if entry.category != expense.category {
                        warn!(
                            concept = %expense.concept,
                            kept = %entry.category,
                            ignored = %expense.category,
                            period = %period,
                            "duplicate concept with another category"
                        );
                    } else {
                        warn!(concept = %expense.concept, period = %period, "duplicate concept accumulated");
                    }
                    entry.amount_total += expense.amount;
                    entry.amount_prorated += prorated;
                }
            }
        }

        debug!(
            lot_id = %lot.lot_id,
            period = %period,
            expenses = expenses.len(),
            total = %total,
            "month prorated"
        );

        Ok(MonthProration {
            period,
            total,
            detail,
            metadata: Some(ProrationMetadata {
                area_lot,
                days_lot,
                days_month,
                area_sum_active: basis.total_area,
                active_lot_count: basis.lot_ids.len(),
                area_basis: self.occupancy.area_basis(),
            }),
        })
    }
}

/// Share of one expense; 0 when the active basis holds no area
pub fn prorated_amount(
    expense: &SharedMonthlyExpense,
    area_lot: Decimal,
    area_sum_active: Decimal,
    days_lot: i64,
    days_month: u32,
) -> CostingResult<Decimal> {
    if area_sum_active.is_zero() {
        return Ok(Decimal::ZERO);
    }
    let (numerator, denominator) = if expense.category.is_time_weighted() {
        (
            area_lot.checked_mul(Decimal::from(days_lot)),
            area_sum_active.checked_mul(Decimal::from(days_month)),
        )
    } else {
        (Some(area_lot), Some(area_sum_active))
    };
    numerator
        .and_then(|n| expense.amount.checked_mul(n))
        .zip(denominator)
        .and_then(|(n, d)| n.checked_div(d))
        .ok_or_else(|| {
            CostingError::InvalidState(format!(
                "decimal overflow prorating concept '{}' of {}-{:02}",
                expense.concept, expense.year, expense.month
            ))
        })
}
