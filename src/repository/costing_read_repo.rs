// ==========================================
// Lot Cost Engine - costing read contract
// ==========================================
// Responsibility: the rows the cost engine needs, already joined
// Rule: read-only, no business rules (no proration, no sums)
// ==========================================

use crate::domain::{
    DirectExpense, FeedConsumption, HarvestRecord, Lot, MortalityRecord, PenOccupancy,
    SharedMonthlyExpense, YearMonth,
};
use crate::repository::error::RepositoryResult;

// ==========================================
// CostingReadRepository Trait
// ==========================================
// Implementors: SqliteCostingRepository (rusqlite), InMemoryCostingRepository (fixed rows)
pub trait CostingReadRepository: Send + Sync {
    /// Lot by id; Ok(None) when it does not exist
    fn get_lot(&self, lot_id: &str) -> RepositoryResult<Option<Lot>>;

    /// Unreleased assignments of the lot, joined with pen area
    fn get_current_pen_assignments(&self, lot_id: &str) -> RepositoryResult<Vec<PenOccupancy>>;

    /// Every assignment the lot ever held, released ones included
    fn get_pen_assignment_history(&self, lot_id: &str) -> RepositoryResult<Vec<PenOccupancy>>;

    /// Lots matching `(close_date IS NULL OR close_date >= first_day) AND start_date <= last_day`
    fn get_lots_overlapping(&self, period: YearMonth) -> RepositoryResult<Vec<Lot>>;

    /// Feed consumption rows joined with their feed type
    fn get_feed_consumption(&self, lot_id: &str) -> RepositoryResult<Vec<FeedConsumption>>;

    fn get_direct_expenses(&self, lot_id: &str) -> RepositoryResult<Vec<DirectExpense>>;

    fn get_shared_monthly_expenses(
        &self,
        period: YearMonth,
    ) -> RepositoryResult<Vec<SharedMonthlyExpense>>;

    fn get_mortality(&self, lot_id: &str) -> RepositoryResult<Vec<MortalityRecord>>;

    fn get_harvests(&self, lot_id: &str) -> RepositoryResult<Vec<HarvestRecord>>;
}
