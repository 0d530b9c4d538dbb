//! Mileage rate band resolution.
//!
//! Rate bands are flat brackets, not marginal tiers: the total batch
//! distance selects exactly one band, and that band's rate prices the
//! entire distance. Crossing a threshold therefore moves the whole batch
//! onto the next band's rate.

use rust_decimal::Decimal;

use crate::error::{EngineError, EngineResult};
use crate::models::{AuditStep, RateBand};

/// The result of a rate band resolution, including the audit step.
#[derive(Debug, Clone)]
pub struct RateBandResult {
    /// The selected band.
    pub band: RateBand,
    /// The selected band's per-distance rate.
    pub rate: Decimal,
    /// The rate applied to the entire distance.
    pub mileage_pay: Decimal,
    /// The audit step recording this selection.
    pub audit_step: AuditStep,
}

/// Selects the rate band for a batch's total distance and prices it.
///
/// Bands are evaluated in ascending threshold order regardless of input
/// order, with the unbounded band last. The first band whose threshold is
/// greater than or equal to the distance wins; the unbounded band catches
/// everything above the bounded thresholds.
///
/// # Errors
///
/// Returns [`EngineError::NoApplicableBand`] when the band list is empty
/// or no band covers the distance (a malformed table with no unbounded
/// band), and [`EngineError::CalculationError`] for a negative distance.
pub fn resolve_rate_band(
    bands: &[RateBand],
    total_distance: Decimal,
    step_number: u32,
) -> EngineResult<RateBandResult> {
    if total_distance < Decimal::ZERO {
        return Err(EngineError::CalculationError {
            message: format!("total distance cannot be negative: {total_distance}"),
        });
    }

    let mut ordered: Vec<&RateBand> = bands.iter().collect();
    ordered.sort_by_key(|b| b.mileage_threshold.unwrap_or(Decimal::MAX));

    let band = ordered
        .iter()
        .copied()
        .find(|b| b.mileage_threshold.is_none_or(|t| total_distance <= t))
        .ok_or(EngineError::NoApplicableBand {
            distance: total_distance,
        })?;

    let mileage_pay = band.rate * total_distance;

    let reasoning = match band.mileage_threshold {
        Some(threshold) => format!(
            "Total distance {} falls within the '{}' band (up to {}); the entire distance is priced at {}",
            total_distance, band.label, threshold, band.rate
        ),
        None => format!(
            "Total distance {} exceeds every bounded threshold; the unbounded '{}' band prices the entire distance at {}",
            total_distance, band.label, band.rate
        ),
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "rate_band".to_string(),
        rule_name: "Resolve Mileage Rate Band".to_string(),
        input: serde_json::json!({
            "total_distance": total_distance.to_string(),
            "band_count": bands.len(),
        }),
        output: serde_json::json!({
            "band": band.label,
            "mileage_threshold": band.mileage_threshold.map(|t| t.to_string()),
            "rate": band.rate.to_string(),
            "mileage_pay": mileage_pay.to_string(),
        }),
        reasoning,
    };

    Ok(RateBandResult {
        band: band.clone(),
        rate: band.rate,
        mileage_pay,
        audit_step,
    })
}
