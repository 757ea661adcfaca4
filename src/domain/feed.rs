// ==========================================
// Lot Cost Engine - feed consumption
// ==========================================

use crate::domain::types::FeedCategory;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// ==========================================
// FeedConsumption - consumption row joined with its feed type
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedConsumption {
    pub consumption_id: String,
    pub lot_id: String,
    pub date: NaiveDate,
    pub units_consumed: Decimal, // sacks

    // ===== resolved from feed_type =====
    pub feed_type_id: String,
    pub feed_name: String,
    pub category: FeedCategory,
    pub cost_per_unit: Decimal,
    pub weight_per_unit: Decimal, // kg per sack
}

impl FeedConsumption {
    /// Monetary cost of the row: `units_consumed * cost_per_unit`
    pub fn cost(&self) -> Decimal {
        self.units_consumed * self.cost_per_unit
    }

    /// Feed mass of the row: `units_consumed * weight_per_unit`
    pub fn mass(&self) -> Decimal {
        self.units_consumed * self.weight_per_unit
    }
}
