// ==========================================
// Lot Cost Engine - mortality and harvest records
// ==========================================

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MortalityRecord {
    pub record_id: String,
    pub lot_id: String,
    pub date: NaiveDate,
    pub count: i64,
}

// ==========================================
// HarvestRecord - animals leaving the lot for sale
// ==========================================
// is_final closes the lot; that transition belongs to the record keeper, not this engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HarvestRecord {
    pub record_id: String,
    pub lot_id: String,
    pub date: NaiveDate,
    pub animal_count: i64,
    pub total_weight: Decimal, // kg
    pub is_final: bool,
}
