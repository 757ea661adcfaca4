// ==========================================
// Lot Cost Engine - pen and pen assignment
// ==========================================

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// ==========================================
// Pen - physical enclosure with a fixed area
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pen {
    pub pen_id: String,
    pub name: String,
    pub area: Decimal, // square meters
    pub active: bool,
}

// ==========================================
// PenAssignment - links one lot to one pen
// ==========================================
// Immutable once released
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PenAssignment {
    pub assignment_id: String,
    pub lot_id: String,
    pub pen_id: String,
    pub assigned_date: Option<NaiveDate>,
    pub release_date: Option<NaiveDate>,
}

impl PenAssignment {
    /// Join with the assigned pen
    pub fn with_pen(&self, pen: &Pen) -> PenOccupancy {
        PenOccupancy {
            assignment_id: self.assignment_id.clone(),
            lot_id: self.lot_id.clone(),
            pen_id: pen.pen_id.clone(),
            pen_name: pen.name.clone(),
            area: pen.area,
            assigned_date: self.assigned_date,
            release_date: self.release_date,
        }
    }
}

// ==========================================
// PenOccupancy - assignment row joined with its pen
// ==========================================
// Denormalized by the repository; the engine never joins on its own
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PenOccupancy {
    pub assignment_id: String,
    pub lot_id: String,
    pub pen_id: String,
    pub pen_name: String,
    pub area: Decimal,
    pub assigned_date: Option<NaiveDate>, // None: since the lot started
    pub release_date: Option<NaiveDate>,  // None: still occupying
}

impl PenOccupancy {
    pub fn is_current(&self) -> bool {
        self.release_date.is_none()
    }

    /// Whether the assignment held the pen at some point of `[first_day, last_day]`.
    ///
    /// A missing assigned date falls back to the lot start date.
    pub fn overlaps_period(
        &self,
        lot_start: NaiveDate,
        first_day: NaiveDate,
        last_day: NaiveDate,
    ) -> bool {
        let from = self.assigned_date.unwrap_or(lot_start);
        let released_before = matches!(self.release_date, Some(release) if release < first_day);
        from <= last_day && !released_before
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_overlap_uses_lot_start_when_assigned_date_missing() {
        let occ = PenOccupancy {
            assignment_id: "A1".to_string(),
            lot_id: "L1".to_string(),
            pen_id: "P1".to_string(),
            pen_name: "Pen 1".to_string(),
            area: Decimal::new(100, 0),
            assigned_date: None,
            release_date: Some(date(2024, 2, 10)),
        };
        let start = date(2024, 1, 15);
        assert!(occ.overlaps_period(start, date(2024, 1, 1), date(2024, 1, 31)));
        assert!(occ.overlaps_period(start, date(2024, 2, 1), date(2024, 2, 29)));
        assert!(!occ.overlaps_period(start, date(2024, 3, 1), date(2024, 3, 31)));
        assert!(!occ.overlaps_period(start, date(2023, 12, 1), date(2023, 12, 31)));
        assert!(!occ.is_current());
    }
}
