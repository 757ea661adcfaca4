// ==========================================
// Lot Cost Engine - in-memory costing repository
// ==========================================
// Fixed rows supplied up front; used by tests and by callers that
// already hold the records (e.g. an export from another system)
// ==========================================

use crate::domain::{
    DirectExpense, FeedConsumption, HarvestRecord, Lot, MortalityRecord, Pen, PenAssignment,
    PenOccupancy, SharedMonthlyExpense, YearMonth,
};
use crate::repository::costing_read_repo::CostingReadRepository;
use crate::repository::error::{RepositoryError, RepositoryResult};

/// In-memory rows. Pen assignments are joined with pens on read, the
/// same shape the SQLite repository returns.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCostingRepository {
    pub lots: Vec<Lot>,
    pub pens: Vec<Pen>,
    pub assignments: Vec<PenAssignment>,
    pub feed_consumption: Vec<FeedConsumption>,
    pub direct_expenses: Vec<DirectExpense>,
    pub shared_expenses: Vec<SharedMonthlyExpense>,
    pub mortality: Vec<MortalityRecord>,
    pub harvests: Vec<HarvestRecord>,
}

impl InMemoryCostingRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_lot(mut self, lot: Lot) -> Self {
        self.lots.push(lot);
        self
    }

    pub fn with_pen(mut self, pen: Pen) -> Self {
        self.pens.push(pen);
        self
    }

    pub fn with_assignment(mut self, assignment: PenAssignment) -> Self {
        self.assignments.push(assignment);
        self
    }

    pub fn with_feed(mut self, row: FeedConsumption) -> Self {
        self.feed_consumption.push(row);
        self
    }

    pub fn with_direct_expense(mut self, expense: DirectExpense) -> Self {
        self.direct_expenses.push(expense);
        self
    }

    pub fn with_shared_expense(mut self, expense: SharedMonthlyExpense) -> Self {
        self.shared_expenses.push(expense);
        self
    }

    pub fn with_mortality(mut self, record: MortalityRecord) -> Self {
        self.mortality.push(record);
        self
    }

    pub fn with_harvest(mut self, record: HarvestRecord) -> Self {
        self.harvests.push(record);
        self
    }

    fn occupancies<'a>(
        &'a self,
        lot_id: &'a str,
    ) -> impl Iterator<Item = RepositoryResult<PenOccupancy>> + 'a {
        self.assignments
            .iter()
            .filter(move |a| a.lot_id == lot_id)
            .map(move |a| {
                self.pens
                    .iter()
                    .find(|p| p.pen_id == a.pen_id)
                    .map(|pen| a.with_pen(pen))
                    .ok_or_else(|| RepositoryError::NotFound {
                        entity: "Pen".to_string(),
                        id: a.pen_id.clone(),
                    })
            })
    }
}

impl CostingReadRepository for InMemoryCostingRepository {
    fn get_lot(&self, lot_id: &str) -> RepositoryResult<Option<Lot>> {
        Ok(self.lots.iter().find(|l| l.lot_id == lot_id).cloned())
    }

    fn get_current_pen_assignments(&self, lot_id: &str) -> RepositoryResult<Vec<PenOccupancy>> {
        let mut rows = Vec::new();
        for occupancy in self.occupancies(lot_id) {
            let occupancy = occupancy?;
            if occupancy.is_current() {
                rows.push(occupancy);
            }
        }
        Ok(rows)
    }

    fn get_pen_assignment_history(&self, lot_id: &str) -> RepositoryResult<Vec<PenOccupancy>> {
        self.occupancies(lot_id).collect()
    }

    fn get_lots_overlapping(&self, period: YearMonth) -> RepositoryResult<Vec<Lot>> {
        let (first, last) = (period.first_day(), period.last_day());
        Ok(self
            .lots
            .iter()
            .filter(|l| l.overlaps_period(first, last))
            .cloned()
            .collect())
    }

    fn get_feed_consumption(&self, lot_id: &str) -> RepositoryResult<Vec<FeedConsumption>> {
        Ok(self
            .feed_consumption
            .iter()
            .filter(|r| r.lot_id == lot_id)
            .cloned()
            .collect())
    }

    fn get_direct_expenses(&self, lot_id: &str) -> RepositoryResult<Vec<DirectExpense>> {
        Ok(self
            .direct_expenses
            .iter()
            .filter(|e| e.lot_id == lot_id)
            .cloned()
            .collect())
    }

    fn get_shared_monthly_expenses(
        &self,
        period: YearMonth,
    ) -> RepositoryResult<Vec<SharedMonthlyExpense>> {
        Ok(self
            .shared_expenses
            .iter()
            .filter(|e| e.year == period.year() && e.month == period.month())
            .cloned()
            .collect())
    }

    fn get_mortality(&self, lot_id: &str) -> RepositoryResult<Vec<MortalityRecord>> {
        Ok(self
            .mortality
            .iter()
            .filter(|r| r.lot_id == lot_id)
            .cloned()
            .collect())
    }

    fn get_harvests(&self, lot_id: &str) -> RepositoryResult<Vec<HarvestRecord>> {
        Ok(self
            .harvests
            .iter()
            .filter(|r| r.lot_id == lot_id)
            .cloned()
            .collect())
    }
}
