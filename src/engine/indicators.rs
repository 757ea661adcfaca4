// ==========================================
// Lot Cost Engine - efficiency indicators
// ==========================================
// Sums stay exact; only the derived ratios are rounded
// (round_dp, midpoint to even) to the configured scale
// ==========================================

use crate::domain::{HarvestRecord, Lot, MortalityRecord};
use crate::engine::error::{CostingError, CostingResult};
use rust_decimal::Decimal;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EfficiencyIndicators {
    pub lot_id: String,
    pub lot_code: String,

    // ===== raw counts and sums =====
    pub initial_head_count: i64,
    pub initial_avg_weight: Decimal,
    pub mortality_total: i64,
    pub sold_total: i64,
    pub weight_sold_total: Decimal,
    pub feed_mass_total: Decimal,
    pub grand_total: Decimal,

    // ===== derived ratios (rounded) =====
    pub mortality_pct: Decimal,
    pub avg_exit_weight: Decimal,
    pub weight_gain: Decimal,
    pub feed_conversion_ratio: Decimal,
    pub cost_per_animal: Decimal,
    pub cost_per_kg: Decimal,
}

/// Inputs gathered from the repository and the cost report
pub struct IndicatorInputs<'a> {
    pub lot: &'a Lot,
    pub mortality: &'a [MortalityRecord],
    pub harvests: &'a [HarvestRecord],
    pub feed_mass_total: Decimal,
    pub grand_total: Decimal,
}

pub struct IndicatorCalculator {
    scale: u32,
}

impl IndicatorCalculator {
    pub fn new(scale: u32) -> Self {
        Self { scale }
    }

    /// Derive the indicators of one lot.
    ///
    /// # Arguments
    /// - inputs: the lot, its mortality and harvest rows, feed mass and grand total
    ///
    /// # Returns
    /// - Ok(EfficiencyIndicators): exact sums, ratios rounded to the configured scale
    /// - Err(CostingError::InvalidState): a count or decimal overflowed
    ///
    /// A zero or negative denominator yields a 0 ratio: nothing sold,
    /// no weight sold, or a weight gain that is not positive.
    pub fn compute(&self, inputs: IndicatorInputs<'_>) -> CostingResult<EfficiencyIndicators> {
        let lot = inputs.lot;
        let mortality_total = sum_counts(inputs.mortality.iter().map(|r| r.count), "mortality")?;
        let sold_total = sum_counts(inputs.harvests.iter().map(|h| h.animal_count), "sold animals")?;
        let weight_sold_total = inputs
            .harvests
            .iter()
            .try_fold(Decimal::ZERO, |acc, h| acc.checked_add(h.total_weight))
            .ok_or_else(|| overflow("weight sold"))?;

        let head_count = Decimal::from(lot.initial_head_count);
        let sold = Decimal::from(sold_total);

        let mortality_scaled = Decimal::from(mortality_total)
            .checked_mul(Decimal::ONE_HUNDRED)
            .ok_or_else(|| overflow("mortality percentage"))?;
        let mortality_pct = ratio(mortality_scaled, head_count, "mortality percentage")?;
        let avg_exit_weight = ratio(weight_sold_total, sold, "average exit weight")?;
        let weight_gain = avg_exit_weight
            .checked_sub(lot.initial_avg_weight)
            .ok_or_else(|| overflow("weight gain"))?;
        let gain_mass = sold
            .checked_mul(weight_gain)
            .ok_or_else(|| overflow("feed conversion"))?;
        let feed_conversion_ratio = ratio(inputs.feed_mass_total, gain_mass, "feed conversion")?;
        let cost_per_animal = ratio(inputs.grand_total, sold, "cost per animal")?;
        let cost_per_kg = ratio(inputs.grand_total, weight_sold_total, "cost per kg")?;

        Ok(EfficiencyIndicators {
            lot_id: lot.lot_id.clone(),
            lot_code: lot.lot_code.clone(),
            initial_head_count: lot.initial_head_count,
            initial_avg_weight: lot.initial_avg_weight,
            mortality_total,
            sold_total,
            weight_sold_total,
            feed_mass_total: inputs.feed_mass_total,
            grand_total: inputs.grand_total,
            mortality_pct: mortality_pct.round_dp(self.scale),
            avg_exit_weight: avg_exit_weight.round_dp(self.scale),
            weight_gain: weight_gain.round_dp(self.scale),
            feed_conversion_ratio: feed_conversion_ratio.round_dp(self.scale),
            cost_per_animal: cost_per_animal.round_dp(self.scale),
            cost_per_kg: cost_per_kg.round_dp(self.scale),
        })
    }
}

/// Sum of head counts; overflow is an invalid state
pub fn sum_counts(mut counts: impl Iterator<Item = i64>, what: &str) -> CostingResult<i64> {
    counts
        .try_fold(0i64, |acc, c| acc.checked_add(c))
        .ok_or_else(|| overflow(what))
}

/// numerator / denominator, 0 unless the denominator is positive
fn ratio(numerator: Decimal, denominator: Decimal, what: &str) -> CostingResult<Decimal> {
    if denominator > Decimal::ZERO {
        numerator
            .checked_div(denominator)
            .ok_or_else(|| overflow(what))
    } else {
        Ok(Decimal::ZERO)
    }
}

fn overflow(what: &str) -> CostingError {
    CostingError::InvalidState(format!("overflow computing {}", what))
}
