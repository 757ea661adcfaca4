// ==========================================
// Lot Cost Engine - costing configuration
// ==========================================

use crate::domain::types::AreaBasis;
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

/// Default decimal places of presentation figures
pub const DEFAULT_INDICATOR_SCALE: u32 = 2;

/// Upper bound accepted for `indicator_scale`
pub const MAX_INDICATOR_SCALE: u32 = 10;

/// Parameters of one engine instance. Loaded by `ConfigManager`, overridable by callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostingConfig {
    /// Stand-in for "today" when resolving open lots; None uses the local date
    pub as_of_date: Option<NaiveDate>,
    /// Which pen occupancy weighs a lot in a month
    pub area_basis: AreaBasis,
    /// Decimal places of indicator ratios
    pub indicator_scale: u32,
}

impl Default for CostingConfig {
    fn default() -> Self {
        Self {
            as_of_date: None,
            area_basis: AreaBasis::Current,
            indicator_scale: DEFAULT_INDICATOR_SCALE,
        }
    }
}

impl CostingConfig {
    /// Effective "today"
    pub fn today(&self) -> NaiveDate {
        self.as_of_date.unwrap_or_else(|| Local::now().date_naive())
    }

    pub fn with_as_of_date(mut self, date: NaiveDate) -> Self {
        self.as_of_date = Some(date);
        self
    }

    pub fn with_area_basis(mut self, basis: AreaBasis) -> Self {
        self.area_basis = basis;
        self
    }

    pub fn with_indicator_scale(mut self, scale: u32) -> Self {
        self.indicator_scale = scale.min(MAX_INDICATOR_SCALE);
        self
    }
}
