// ==========================================
// Lot Cost Engine - direct cost aggregator
// ==========================================
// Costs attributable to one lot without proration:
// feed, per-lot expenses and purchase
// ==========================================

use crate::domain::types::{DirectExpenseCategory, FeedCategory};
use crate::domain::{DirectExpense, FeedConsumption};
use crate::engine::error::CostingResult;
use crate::repository::CostingReadRepository;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FeedCategoryBucket {
    pub cost: Decimal,
    pub mass: Decimal,
    pub units: Decimal,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FeedCostSummary {
    pub total_cost: Decimal,
    /// kg
    pub total_mass: Decimal,
    pub by_category: BTreeMap<FeedCategory, FeedCategoryBucket>,
}

impl FeedCostSummary {
    pub fn from_rows(rows: &[FeedConsumption]) -> Self {
        let mut summary = Self::default();
        for row in rows {
            let (cost, mass) = (row.cost(), row.mass());
            summary.total_cost += cost;
            summary.total_mass += mass;
            let bucket = summary.by_category.entry(row.category).or_default();
            bucket.cost += cost;
            bucket.mass += mass;
            bucket.units += row.units_consumed;
        }
        summary
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DirectExpenseSummary {
    pub total: Decimal,
    pub by_category: BTreeMap<DirectExpenseCategory, Decimal>,
}

impl DirectExpenseSummary {
    pub fn from_rows(rows: &[DirectExpense]) -> Self {
        let mut summary = Self::default();
        for row in rows {
            summary.total += row.amount;
            *summary.by_category.entry(row.category).or_default() += row.amount;
        }
        summary
    }
}

// ==========================================
// DirectCostAggregator
// ==========================================
pub struct DirectCostAggregator {
    repo: Arc<dyn CostingReadRepository>,
}

impl DirectCostAggregator {
    pub fn new(repo: Arc<dyn CostingReadRepository>) -> Self {
        Self { repo }
    }

    /// Feed rows of the lot priced at their recorded unit cost
    pub fn feed_cost(&self, lot_id: &str) -> CostingResult<FeedCostSummary> {
        let rows = self.repo.get_feed_consumption(lot_id)?;
        let summary = FeedCostSummary::from_rows(&rows);
        debug!(
            lot_id,
            rows = rows.len(),
            total_cost = %summary.total_cost,
            total_mass = %summary.total_mass,
            "feed cost aggregated"
        );
        Ok(summary)
    }

    /// All direct expenses of the lot; dates are not filtered
    pub fn direct_expenses(&self, lot_id: &str) -> CostingResult<DirectExpenseSummary> {
        let rows = self.repo.get_direct_expenses(lot_id)?;
        let summary = DirectExpenseSummary::from_rows(&rows);
        debug!(lot_id, rows = rows.len(), total = %summary.total, "direct expenses aggregated");
        Ok(summary)
    }

    /// Purchase cost, 0 when the lot does not exist
    pub fn purchase_cost(&self, lot_id: &str) -> CostingResult<Decimal> {
        Ok(self
            .repo
            .get_lot(lot_id)?
            .map(|lot| lot.purchase_cost)
            .unwrap_or(Decimal::ZERO))
    }
}
