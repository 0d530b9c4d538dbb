//! Fuel surcharge calculation.
//!
//! Five contract modes share one entry point. Two of them depend on
//! collaborators the engine does not own: sliding-scale contracts follow a
//! posted fuel price index, and custom contracts carry their own formula.
//! Both are injected through [`FscCollaborators`] so the calculator stays
//! a pure function.

use rust_decimal::Decimal;

use crate::error::{EngineError, EngineResult};
use crate::models::{AuditStep, BatchPeriod, FscMode};

/// Source of period surcharge rates for sliding-scale contracts.
///
/// Implementations typically wrap a published diesel price table and
/// return the per-distance surcharge rate in force for the period.
pub trait FuelPriceIndex: Send + Sync {
    /// The surcharge rate per distance unit for the given period.
    fn rate_per_distance(&self, period: &BatchPeriod) -> Decimal;
}

/// A caller-supplied surcharge formula for custom contracts.
///
/// Arguments are the batch's total distance and its mileage pay.
pub type CustomFscFormula = dyn Fn(Decimal, Decimal) -> Decimal + Send + Sync;

/// Optional injected collaborators for the surcharge modes that need them.
#[derive(Default, Clone, Copy)]
pub struct FscCollaborators<'a> {
    /// Fuel price index backing [`FscMode::SlidingScale`].
    pub fuel_index: Option<&'a dyn FuelPriceIndex>,
    /// Formula backing [`FscMode::Custom`].
    pub custom_formula: Option<&'a CustomFscFormula>,
}

/// The result of a fuel surcharge calculation, including the audit step.
#[derive(Debug, Clone)]
pub struct FuelSurchargeResult {
    /// The computed surcharge.
    pub fuel_surcharge: Decimal,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Computes the fuel surcharge for a batch under the contract's mode.
///
/// - `None`: no surcharge.
/// - `Percentage`: `fsc_rate` is a fraction of mileage pay.
/// - `Fixed`: `fsc_rate` is a flat amount per distance unit.
/// - `SlidingScale`: the injected index supplies the per-distance rate.
/// - `Custom`: the injected formula computes the surcharge outright.
///
/// # Errors
///
/// Returns [`EngineError::UnsupportedMode`] for a sliding-scale contract
/// without a fuel price index, and [`EngineError::MissingCustomFormula`]
/// for a custom contract without a formula.
pub fn compute_fuel_surcharge(
    mode: FscMode,
    fsc_rate: Decimal,
    total_distance: Decimal,
    mileage_pay: Decimal,
    period: &BatchPeriod,
    collaborators: &FscCollaborators<'_>,
    step_number: u32,
) -> EngineResult<FuelSurchargeResult> {
    let (fuel_surcharge, reasoning) = match mode {
        FscMode::None => (
            Decimal::ZERO,
            "Contract carries no fuel surcharge".to_string(),
        ),
        FscMode::Percentage => {
            let surcharge = fsc_rate * mileage_pay;
            (
                surcharge,
                format!(
                    "Percentage mode: {fsc_rate} of mileage pay {mileage_pay} = {surcharge}"
                ),
            )
        }
        FscMode::Fixed => {
            let surcharge = fsc_rate * total_distance;
            (
                surcharge,
                format!(
                    "Fixed mode: {fsc_rate} per distance unit over {total_distance} = {surcharge}"
                ),
            )
        }
        FscMode::SlidingScale => {
            let index =
                collaborators
                    .fuel_index
                    .ok_or_else(|| EngineError::UnsupportedMode {
                        mode,
                        message: "sliding scale requires a fuel price index".to_string(),
                    })?;
            let index_rate = index.rate_per_distance(period);
            let surcharge = index_rate * total_distance;
            (
                surcharge,
                format!(
                    "Sliding scale: index rate {index_rate} for {} to {} over {total_distance} = {surcharge}",
                    period.start_date, period.end_date
                ),
            )
        }
        FscMode::Custom => {
            let formula = collaborators
                .custom_formula
                .ok_or(EngineError::MissingCustomFormula)?;
            let surcharge = formula(total_distance, mileage_pay);
            (
                surcharge,
                format!(
                    "Custom formula over distance {total_distance} and mileage pay {mileage_pay} = {surcharge}"
                ),
            )
        }
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "fuel_surcharge".to_string(),
        rule_name: "Compute Fuel Surcharge".to_string(),
        input: serde_json::json!({
            "mode": mode.to_string(),
            "fsc_rate": fsc_rate.to_string(),
            "total_distance": total_distance.to_string(),
            "mileage_pay": mileage_pay.to_string(),
        }),
        output: serde_json::json!({
            "fuel_surcharge": fuel_surcharge.to_string(),
        }),
        reasoning,
    };

    Ok(FuelSurchargeResult {
        fuel_surcharge,
        audit_step,
    })
}
