// ==========================================
// Lot Cost Engine - lot domain model
// ==========================================

use crate::domain::types::LotStatus;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// ==========================================
// Lot - a cohort raised together from intake to final harvest
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lot {
    // ===== identity =====
    pub lot_id: String,
    pub lot_code: String, // human lot number

    // ===== lifetime =====
    pub start_date: NaiveDate,
    pub close_date: Option<NaiveDate>, // None: still open
    pub status: LotStatus,

    // ===== intake =====
    pub initial_head_count: i64,
    pub initial_avg_weight: Decimal, // kg per animal
    pub purchase_cost: Decimal,
}

impl Lot {
    /// Last day the lot counts as present: its close date, or `today` while open
    pub fn effective_end(&self, today: NaiveDate) -> NaiveDate {
        self.close_date.unwrap_or(today)
    }

    /// Closed interval `[start_date, close_date or today]`
    pub fn effective_interval(&self, today: NaiveDate) -> (NaiveDate, NaiveDate) {
        (self.start_date, self.effective_end(today))
    }

    /// Active-set policy for a month:
    /// `(close_date IS NULL OR close_date >= first_day) AND start_date <= last_day`
    pub fn overlaps_period(&self, first_day: NaiveDate, last_day: NaiveDate) -> bool {
        let closed_before = matches!(self.close_date, Some(close) if close < first_day);
        !closed_before && self.start_date <= last_day
    }

    pub fn is_open(&self) -> bool {
        self.close_date.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn lot(start: NaiveDate, close: Option<NaiveDate>) -> Lot {
        Lot {
            lot_id: "L1".to_string(),
            lot_code: "2024-01".to_string(),
            start_date: start,
            close_date: close,
            status: if close.is_some() { LotStatus::Closed } else { LotStatus::Active },
            initial_head_count: 100,
            initial_avg_weight: Decimal::new(25, 0),
            purchase_cost: Decimal::new(10_000_000, 0),
        }
    }

    #[test]
    fn test_open_lot_runs_through_today() {
        let l = lot(date(2024, 1, 15), None);
        assert_eq!(l.effective_end(date(2024, 3, 1)), date(2024, 3, 1));
        assert!(l.is_open());
    }

    #[test]
    fn test_overlap_policy_boundaries() {
        let l = lot(date(2024, 1, 15), Some(date(2024, 2, 1)));
        // closes on the first day of February: still part of February's basis
        assert!(l.overlaps_period(date(2024, 2, 1), date(2024, 2, 29)));
        assert!(!l.overlaps_period(date(2024, 3, 1), date(2024, 3, 31)));
        // starts after December
        assert!(!l.overlaps_period(date(2023, 12, 1), date(2023, 12, 31)));
        assert!(l.overlaps_period(date(2024, 1, 1), date(2024, 1, 31)));
    }
}
