// ==========================================
// Lot Cost Engine - occupancy resolver
// ==========================================
// Area a lot holds and days it is present in a month,
// plus the active basis every lot of the month is weighed against
// ==========================================

use crate::domain::types::AreaBasis;
use crate::domain::{Lot, PenOccupancy, YearMonth};
use crate::engine::calendar::{days_of_overlap, year_month};
use crate::engine::error::CostingResult;
use crate::repository::CostingReadRepository;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use std::sync::Arc;
use tracing::debug;

/// Lots present in a month and the sum of their areas
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActiveBasis {
    pub lot_ids: Vec<String>,
    pub total_area: Decimal,
}

// ==========================================
// OccupancyResolver
// ==========================================
pub struct OccupancyResolver {
    repo: Arc<dyn CostingReadRepository>,
    area_basis: AreaBasis,
}

impl OccupancyResolver {
    /// `area_basis` picks between pens held during the month and pens held now
    pub fn new(repo: Arc<dyn CostingReadRepository>, area_basis: AreaBasis) -> Self {
        Self { repo, area_basis }
    }

    pub fn area_basis(&self) -> AreaBasis {
        self.area_basis
    }

    /// Sum of pen area over the lot's unreleased assignments; 0 is valid
    pub fn occupied_area(&self, lot_id: &str) -> CostingResult<Decimal> {
        let pens = self.repo.get_current_pen_assignments(lot_id)?;
        Ok(sum_area(pens.iter()))
    }

    /// Area weighing `lot` in `period` under the configured basis
    pub fn area_for_month(&self, lot: &Lot, period: YearMonth) -> CostingResult<Decimal> {
        match self.area_basis {
            AreaBasis::Current => self.occupied_area(&lot.lot_id),
            AreaBasis::Historical => {
                let history = self.repo.get_pen_assignment_history(&lot.lot_id)?;
                let (first, last) = (period.first_day(), period.last_day());
                Ok(sum_area(
                    history
                        .iter()
                        .filter(|occ| occ.overlaps_period(lot.start_date, first, last)),
                ))
            }
        }
    }

    /// Days the lot is present in the month. A missing lot yields 0.
    pub fn active_days_in_month(
        &self,
        lot_id: &str,
        year: i32,
        month: u32,
        today: NaiveDate,
    ) -> CostingResult<i64> {
        let period = year_month(year, month)?;
        match self.repo.get_lot(lot_id)? {
            Some(lot) => Ok(active_days(&lot, period, today)),
            None => {
                debug!(lot_id, "lot not found, no active days");
                Ok(0)
            }
        }
    }

    /// Every lot overlapping the month together with the sum of their areas
    pub fn active_lots_and_area_sum(&self, period: YearMonth) -> CostingResult<ActiveBasis> {
        let lots = self.repo.get_lots_overlapping(period)?;
        let mut total_area = Decimal::ZERO;
        let mut lot_ids = Vec::with_capacity(lots.len());
        for lot in &lots {
            total_area += self.area_for_month(lot, period)?;
            lot_ids.push(lot.lot_id.clone());
        }
        debug!(
            period = %period,
            active_lots = lot_ids.len(),
            total_area = %total_area,
            "active basis resolved"
        );
        Ok(ActiveBasis { lot_ids, total_area })
    }
}

/// Effective interval of the lot intersected with the month
pub fn active_days(lot: &Lot, period: YearMonth, today: NaiveDate) -> i64 {
    days_of_overlap(
        lot.effective_interval(today),
        (period.first_day(), period.last_day()),
    )
}

fn sum_area<'a>(pens: impl Iterator<Item = &'a PenOccupancy>) -> Decimal {
    pens.map(|p| p.area).sum()
}
