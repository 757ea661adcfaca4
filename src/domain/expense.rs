// ==========================================
// Lot Cost Engine - expenses
// ==========================================

use crate::domain::types::{DirectExpenseCategory, SharedExpenseCategory};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// ==========================================
// DirectExpense - charged to exactly one lot
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DirectExpense {
    pub expense_id: String,
    pub lot_id: String,
    pub date: NaiveDate,
    pub concept: String,
    pub category: DirectExpenseCategory,
    pub amount: Decimal,
}

// ==========================================
// SharedMonthlyExpense - billed once per month for the whole facility
// ==========================================
// `concept` is the detail key of a proration; unique per (year, month) by convention only
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SharedMonthlyExpense {
    pub expense_id: String,
    pub year: i32,
    pub month: u32, // 1-12
    pub concept: String,
    pub category: SharedExpenseCategory,
    pub amount: Decimal,
}
