//! Driver contract resolution.
//!
//! This module selects the contract that governs a settlement batch: the
//! one whose validity window covers the resolution date. Contract data
//! entry is expected to keep windows disjoint per driver; when an overlap
//! slips through anyway, resolution still succeeds deterministically and
//! flags the ambiguity instead of failing the batch.

use chrono::NaiveDate;
use tracing::warn;

use crate::error::{EngineError, EngineResult};
use crate::models::{AuditStep, AuditWarning, DriverContract};

/// The result of a contract resolution, including the audit step.
#[derive(Debug, Clone)]
pub struct ContractResolution {
    /// A cloned snapshot of the selected contract. Downstream pricing
    /// works from this value, so later edits to the contract store never
    /// leak into a batch that already resolved.
    pub contract: DriverContract,
    /// Present when more than one window covered the resolution date.
    pub warning: Option<AuditWarning>,
    /// The audit step recording this resolution.
    pub audit_step: AuditStep,
}

/// Selects the contract in force for a driver on a date.
///
/// Candidates are the contracts whose `driver_id` matches and whose
/// half-open validity window covers `as_of`. With exactly one candidate
/// it is returned as-is. With several (overlapping windows, a data
/// inconsistency) the one with the latest `start_date` wins, ties broken
/// by the highest contract id, and an `ambiguous_contract` warning is
/// attached so the overlap gets cleaned up.
///
/// # Errors
///
/// Returns [`EngineError::NoActiveContract`] when no window covers the
/// date.
pub fn resolve_contract(
    contracts: &[DriverContract],
    driver_id: &str,
    as_of: NaiveDate,
    step_number: u32,
) -> EngineResult<ContractResolution> {
    let candidates: Vec<&DriverContract> = contracts
        .iter()
        .filter(|c| c.driver_id == driver_id && c.covers(as_of))
        .collect();

    let selected = candidates
        .iter()
        .copied()
        .max_by_key(|c| (c.start_date, c.id))
        .ok_or_else(|| EngineError::NoActiveContract {
            driver_id: driver_id.to_string(),
            date: as_of,
        })?;

    let warning = if candidates.len() > 1 {
        let competing: Vec<String> = candidates.iter().map(|c| c.id.to_string()).collect();
        warn!(
            driver_id = %driver_id,
            date = %as_of,
            selected = %selected.id,
            candidates = candidates.len(),
            "Multiple contracts cover the resolution date"
        );
        Some(AuditWarning {
            code: "ambiguous_contract".to_string(),
            message: format!(
                "{} contracts cover {} for driver '{}' ({}); selected {} by latest start date",
                candidates.len(),
                as_of,
                driver_id,
                competing.join(", "),
                selected.id
            ),
            severity: "medium".to_string(),
        })
    } else {
        None
    };

    let reasoning = if candidates.len() > 1 {
        format!(
            "{} validity windows covered {}; selected contract {} with the latest start date {}",
            candidates.len(),
            as_of,
            selected.id,
            selected.start_date
        )
    } else {
        format!(
            "Contract {} (effective {}) covers {} for driver '{}'",
            selected.id, selected.start_date, as_of, driver_id
        )
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "contract_resolution".to_string(),
        rule_name: "Resolve Driver Contract".to_string(),
        input: serde_json::json!({
            "driver_id": driver_id,
            "as_of": as_of.to_string(),
            "contracts_considered": contracts.len(),
        }),
        output: serde_json::json!({
            "contract_id": selected.id.to_string(),
            "start_date": selected.start_date.to_string(),
            "end_date": selected.end_date.map(|d| d.to_string()),
            "candidates": candidates.len(),
        }),
        reasoning,
    };

    Ok(ContractResolution {
        contract: selected.clone(),
        warning,
        audit_step,
    })
}
