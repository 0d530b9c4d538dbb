//! Hourly pay calculation for non-driving work.
//!
//! Yard shunting, training days, and similar activities are paid by the
//! hour at the contract's hourly rate, with per-line overrides honoured.

use rust_decimal::Decimal;

use crate::error::{EngineError, EngineResult};
use crate::models::{AuditStep, DriverBatchHourly};

/// The result of an hourly pay calculation, including the audit step.
#[derive(Debug, Clone)]
pub struct HourlyPayResult {
    /// Total hours across all lines.
    pub total_hours: Decimal,
    /// Pay for those hours.
    pub hourly_pay: Decimal,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Sums hourly lines at the contract rate, honouring per-line overrides.
///
/// # Errors
///
/// Returns [`EngineError::CalculationError`] if any line carries negative
/// hours.
pub fn calculate_hourly_pay(
    lines: &[DriverBatchHourly],
    default_rate: Decimal,
    step_number: u32,
) -> EngineResult<HourlyPayResult> {
    let mut total_hours = Decimal::ZERO;
    let mut hourly_pay = Decimal::ZERO;
    let mut overridden = 0usize;

    for line in lines {
        if line.hours < Decimal::ZERO {
            return Err(EngineError::CalculationError {
                message: format!(
                    "Hourly line '{}' has negative hours: {}",
                    line.description, line.hours
                ),
            });
        }
        let rate = line.rate_override.unwrap_or(default_rate);
        if line.rate_override.is_some() {
            overridden += 1;
        }
        total_hours += line.hours;
        hourly_pay += line.hours * rate;
    }

    let audit_step = AuditStep {
        step_number,
        rule_id: "hourly_pay".to_string(),
        rule_name: "Calculate Hourly Pay".to_string(),
        input: serde_json::json!({
            "line_count": lines.len(),
            "default_rate": default_rate.to_string(),
            "overridden_lines": overridden,
        }),
        output: serde_json::json!({
            "total_hours": total_hours.to_string(),
            "hourly_pay": hourly_pay.to_string(),
        }),
        reasoning: format!(
            "{} hourly lines totalling {total_hours} hours at {default_rate}/hour \
             ({overridden} overridden) = {hourly_pay}",
            lines.len()
        ),
    };

    Ok(HourlyPayResult {
        total_hours,
        hourly_pay,
        audit_step,
    })
}
