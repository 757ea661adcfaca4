// ==========================================
// Lot Cost Engine - domain enumerations
// ==========================================
// Stored in the database as SCREAMING_SNAKE_CASE text
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// Lot status
// ==========================================
// Informational only: the engine derives activity from start/close dates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LotStatus {
    Active, // still in the facility
    Closed, // final harvest recorded
}

impl LotStatus {
    /// Parse the database representation
    pub fn from_db_str(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "ACTIVE" => Some(LotStatus::Active),
            "CLOSED" => Some(LotStatus::Closed),
            _ => None,
        }
    }

    /// Database representation
    pub fn to_db_str(&self) -> &'static str {
        match self {
            LotStatus::Active => "ACTIVE",
            LotStatus::Closed => "CLOSED",
        }
    }
}

impl fmt::Display for LotStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_db_str())
    }
}

// ==========================================
// Feed category
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FeedCategory {
    Prestarter, // first weeks after intake
    Grower,
    Finisher,
}

impl FeedCategory {
    pub fn from_db_str(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "PRESTARTER" => Some(FeedCategory::Prestarter),
            "GROWER" => Some(FeedCategory::Grower),
            "FINISHER" => Some(FeedCategory::Finisher),
            _ => None,
        }
    }

    pub fn to_db_str(&self) -> &'static str {
        match self {
            FeedCategory::Prestarter => "PRESTARTER",
            FeedCategory::Grower => "GROWER",
            FeedCategory::Finisher => "FINISHER",
        }
    }
}

impl fmt::Display for FeedCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_db_str())
    }
}

// ==========================================
// Direct (per-lot) expense category
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DirectExpenseCategory {
    Transport, // freight in/out
    Procedure, // veterinary procedures, immunocastration
    Other,
}

impl DirectExpenseCategory {
    pub fn from_db_str(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "TRANSPORT" => Some(DirectExpenseCategory::Transport),
            "PROCEDURE" => Some(DirectExpenseCategory::Procedure),
            "OTHER" => Some(DirectExpenseCategory::Other),
            _ => None,
        }
    }

    pub fn to_db_str(&self) -> &'static str {
        match self {
            DirectExpenseCategory::Transport => "TRANSPORT",
            DirectExpenseCategory::Procedure => "PROCEDURE",
            DirectExpenseCategory::Other => "OTHER",
        }
    }
}

impl fmt::Display for DirectExpenseCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_db_str())
    }
}

// ==========================================
// Shared monthly expense category
// ==========================================
// Only RENT is weighted by occupancy time; everything else by area share alone
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SharedExpenseCategory {
    Rent,
    Utilities,
    Payroll,
    Medication,
    Supplies,
    Other,
}

impl SharedExpenseCategory {
    pub fn from_db_str(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "RENT" => Some(SharedExpenseCategory::Rent),
            "UTILITIES" => Some(SharedExpenseCategory::Utilities),
            "PAYROLL" => Some(SharedExpenseCategory::Payroll),
            "MEDICATION" => Some(SharedExpenseCategory::Medication),
            "SUPPLIES" => Some(SharedExpenseCategory::Supplies),
            "OTHER" => Some(SharedExpenseCategory::Other),
            _ => None,
        }
    }

    pub fn to_db_str(&self) -> &'static str {
        match self {
            SharedExpenseCategory::Rent => "RENT",
            SharedExpenseCategory::Utilities => "UTILITIES",
            SharedExpenseCategory::Payroll => "PAYROLL",
            SharedExpenseCategory::Medication => "MEDICATION",
            SharedExpenseCategory::Supplies => "SUPPLIES",
            SharedExpenseCategory::Other => "OTHER",
        }
    }

    /// Whether the prorated amount also scales with days present in the month
    pub fn is_time_weighted(&self) -> bool {
        matches!(self, SharedExpenseCategory::Rent)
    }
}

impl fmt::Display for SharedExpenseCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_db_str())
    }
}

// ==========================================
// Area basis
// ==========================================
// Which pen occupancy is used to weigh a lot in a given month
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AreaBasis {
    /// Pens held right now, applied to every month (source behavior)
    #[default]
    Current,
    /// Pens whose assignment interval overlaps the month being prorated
    Historical,
}

impl AreaBasis {
    pub fn from_db_str(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "CURRENT" => Some(AreaBasis::Current),
            "HISTORICAL" => Some(AreaBasis::Historical),
            _ => None,
        }
    }

    pub fn to_db_str(&self) -> &'static str {
        match self {
            AreaBasis::Current => "CURRENT",
            AreaBasis::Historical => "HISTORICAL",
        }
    }
}

impl fmt::Display for AreaBasis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_db_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_db_str_is_case_insensitive() {
        assert_eq!(
            SharedExpenseCategory::from_db_str("rent"),
            Some(SharedExpenseCategory::Rent)
        );
        assert_eq!(FeedCategory::from_db_str(" Grower "), Some(FeedCategory::Grower));
        assert_eq!(DirectExpenseCategory::from_db_str("bogus"), None);
    }

    #[test]
    fn test_only_rent_is_time_weighted() {
        assert!(SharedExpenseCategory::Rent.is_time_weighted());
        for category in [
            SharedExpenseCategory::Utilities,
            SharedExpenseCategory::Payroll,
            SharedExpenseCategory::Medication,
            SharedExpenseCategory::Supplies,
            SharedExpenseCategory::Other,
        ] {
            assert!(!category.is_time_weighted(), "{} should not be time weighted", category);
        }
    }

    #[test]
    fn test_serde_uses_db_representation() {
        let json = serde_json::to_string(&AreaBasis::Historical).unwrap();
        assert_eq!(json, "\"HISTORICAL\"");
        let back: LotStatus = serde_json::from_str("\"CLOSED\"").unwrap();
        assert_eq!(back, LotStatus::Closed);
    }
}
