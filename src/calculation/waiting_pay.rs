//! Waiting pay aggregation.
//!
//! Detention at a customer dock and delays at a terminal are compensated
//! per minute at the contract's waiting rate. Minutes are also subtotalled
//! by wait type for the audit trail, since accessorial time is frequently
//! rebilled to the customer.

use std::collections::BTreeMap;

use rust_decimal::Decimal;

use crate::error::{EngineError, EngineResult};
use crate::models::{AuditStep, DriverBatchWait};

/// The result of a waiting pay aggregation, including the audit step.
#[derive(Debug, Clone)]
pub struct WaitingPayResult {
    /// Total minutes across all wait entries.
    pub total_minutes: Decimal,
    /// Pay for those minutes.
    pub waiting_pay: Decimal,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Sums wait entries and prices the total at the per-minute rate.
///
/// # Errors
///
/// Returns [`EngineError::InvalidWaitDuration`] if any entry carries
/// negative minutes.
pub fn aggregate_waiting_pay(
    waits: &[DriverBatchWait],
    per_minute_rate: Decimal,
    step_number: u32,
) -> EngineResult<WaitingPayResult> {
    let mut total_minutes = Decimal::ZERO;
    let mut minutes_by_type: BTreeMap<String, Decimal> = BTreeMap::new();

    for wait in waits {
        if wait.minutes < Decimal::ZERO {
            return Err(EngineError::InvalidWaitDuration {
                reference: wait.reference.clone(),
                minutes: wait.minutes,
            });
        }
        total_minutes += wait.minutes;
        *minutes_by_type
            .entry(wait.wait_type.to_string())
            .or_insert(Decimal::ZERO) += wait.minutes;
    }

    let waiting_pay = total_minutes * per_minute_rate;

    let by_type_json: BTreeMap<String, String> = minutes_by_type
        .iter()
        .map(|(kind, minutes)| (kind.clone(), minutes.to_string()))
        .collect();

    let audit_step = AuditStep {
        step_number,
        rule_id: "waiting_pay".to_string(),
        rule_name: "Aggregate Waiting Pay".to_string(),
        input: serde_json::json!({
            "entry_count": waits.len(),
            "per_minute_rate": per_minute_rate.to_string(),
        }),
        output: serde_json::json!({
            "total_minutes": total_minutes.to_string(),
            "minutes_by_type": by_type_json,
            "waiting_pay": waiting_pay.to_string(),
        }),
        reasoning: format!(
            "{} wait entries totalling {total_minutes} minutes at {per_minute_rate}/minute \
             = {waiting_pay}",
            waits.len()
        ),
    };

    Ok(WaitingPayResult {
        total_minutes,
        waiting_pay,
        audit_step,
    })
}
