// ==========================================
// Lot Cost Engine - calendar helpers
// ==========================================
// Inclusive day intervals and month sequences; no repository access
// ==========================================

use crate::domain::period::YearMonth;
use crate::engine::error::{CostingError, CostingResult};
use chrono::NaiveDate;

/// Validated month, `InvalidPeriod` otherwise
pub fn year_month(year: i32, month: u32) -> CostingResult<YearMonth> {
    YearMonth::new(year, month).ok_or(CostingError::InvalidPeriod { year, month })
}

/// Number of days of `month` in `year`; None for a month outside 1-12
pub fn days_in_month(year: i32, month: u32) -> Option<u32> {
    YearMonth::new(year, month).map(|ym| ym.days())
}

/// First and last day of the month; None for a month outside 1-12
pub fn month_bounds(year: i32, month: u32) -> Option<(NaiveDate, NaiveDate)> {
    YearMonth::new(year, month).map(|ym| (ym.first_day(), ym.last_day()))
}

/// Days shared by two inclusive intervals, 0 when disjoint
pub fn days_of_overlap(a: (NaiveDate, NaiveDate), b: (NaiveDate, NaiveDate)) -> i64 {
    let start = a.0.max(b.0);
    let end = a.1.min(b.1);
    ((end - start).num_days() + 1).max(0)
}

// ==========================================
// MonthRange
// ==========================================

/// Months from the one containing `start` through the one containing `end`.
///
/// Iterating does not consume the range; clone it or iterate `&range` again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthRange {
    start: YearMonth,
    end: YearMonth,
}

impl MonthRange {
    pub fn new(start: YearMonth, end: YearMonth) -> Self {
        Self { start, end }
    }

    pub fn spanning(start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self::new(YearMonth::of(start_date), YearMonth::of(end_date))
    }

    pub fn is_empty(&self) -> bool {
        self.end < self.start
    }

    pub fn iter(&self) -> MonthIter {
        MonthIter {
            next: if self.is_empty() { None } else { Some(self.start) },
            end: self.end,
        }
    }
}

impl IntoIterator for MonthRange {
    type Item = YearMonth;
    type IntoIter = MonthIter;

    fn into_iter(self) -> MonthIter {
        self.iter()
    }
}

impl IntoIterator for &MonthRange {
    type Item = YearMonth;
    type IntoIter = MonthIter;

    fn into_iter(self) -> MonthIter {
        self.iter()
    }
}

#[derive(Debug, Clone)]
pub struct MonthIter {
    next: Option<YearMonth>,
    end: YearMonth,
}

impl Iterator for MonthIter {
    type Item = YearMonth;

    fn next(&mut self) -> Option<YearMonth> {
        let current = self.next?;
        self.next = if current < self.end { current.succ() } else { None };
        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_days_in_month() {
        assert_eq!(days_in_month(2024, 2), Some(29));
        assert_eq!(days_in_month(2023, 2), Some(28));
        assert_eq!(days_in_month(2024, 1), Some(31));
        assert_eq!(days_in_month(2024, 13), None);
    }

    #[test]
    fn test_year_month_rejects_month_zero() {
        assert!(matches!(
            year_month(2024, 0),
            Err(CostingError::InvalidPeriod { year: 2024, month: 0 })
        ));
    }

    #[test]
    fn test_month_bounds() {
        assert_eq!(
            month_bounds(2024, 1),
            Some((date(2024, 1, 1), date(2024, 1, 31)))
        );
        assert_eq!(month_bounds(2024, 0), None);
    }

    #[test]
    fn test_overlap_is_inclusive() {
        let jan = (date(2024, 1, 1), date(2024, 1, 31));
        assert_eq!(days_of_overlap((date(2024, 1, 15), date(2024, 2, 10)), jan), 17);
        assert_eq!(days_of_overlap((date(2024, 1, 31), date(2024, 1, 31)), jan), 1);
        assert_eq!(days_of_overlap((date(2024, 2, 1), date(2024, 2, 10)), jan), 0);
    }

    #[test]
    fn test_month_range_crosses_year() {
        let months: Vec<String> = MonthRange::spanning(date(2023, 11, 20), date(2024, 2, 3))
            .into_iter()
            .map(|m| m.key())
            .collect();
        assert_eq!(months, vec!["2023-11", "2023-12", "2024-01", "2024-02"]);
    }

    #[test]
    fn test_month_range_is_restartable() {
        let range = MonthRange::spanning(date(2024, 1, 15), date(2024, 2, 10));
        assert_eq!(range.iter().count(), 2);
        assert_eq!((&range).into_iter().count(), 2);
    }

    #[test]
    fn test_month_range_empty_when_reversed() {
        let range = MonthRange::spanning(date(2024, 3, 1), date(2024, 1, 31));
        assert!(range.is_empty());
        assert_eq!(range.iter().next(), None);
    }

    fn arb_date() -> impl Strategy<Value = NaiveDate> {
        (2000i32..2030, 1u32..=12, 1u32..=28).prop_map(|(y, m, d)| date(y, m, d))
    }

    proptest! {
        #[test]
        fn prop_overlap_is_symmetric_and_bounded(
            a0 in arb_date(), a_len in 0i64..400,
            b0 in arb_date(), b_len in 0i64..400,
        ) {
            let a = (a0, a0 + chrono::Duration::days(a_len));
            let b = (b0, b0 + chrono::Duration::days(b_len));
            let ab = days_of_overlap(a, b);
            prop_assert_eq!(ab, days_of_overlap(b, a));
            prop_assert!(ab >= 0);
            prop_assert!(ab <= a_len.min(b_len) + 1);
        }

        #[test]
        fn prop_month_range_covers_every_day(start in arb_date(), len in 0i64..800) {
            let end = start + chrono::Duration::days(len);
            let covered: i64 = MonthRange::spanning(start, end)
                .iter()
                .map(|m| days_of_overlap((start, end), (m.first_day(), m.last_day())))
                .sum();
            prop_assert_eq!(covered, len + 1);
        }
    }
}
