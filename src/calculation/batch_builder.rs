//! Batch assembly and totals computation.
//!
//! This is the ordered pipeline behind every batch: resolve the contract,
//! price mileage through the band table, add the fuel surcharge, hourly
//! work, and waiting pay, deduct the administration fee, and collect sales
//! tax. Each stage contributes one audit step so the final trace reads as
//! the worked calculation a driver could check line by line.

use std::time::Instant;

use rust_decimal::Decimal;
use tracing::info;

use crate::error::{EngineError, EngineResult};
use crate::models::{
    AuditStep, AuditTrace, AuditWarning, BatchPeriod, BatchStatus, BatchTotals, DriverBatch,
    DriverBatchHourly, DriverBatchLoad, DriverBatchWait, DriverContract,
};

use super::{
    ContractResolution, FscCollaborators, aggregate_waiting_pay, apply_admin_fee,
    calculate_hourly_pay, compute_fuel_surcharge, compute_tax, resolve_contract,
    resolve_rate_band,
};

/// Totals plus the audit material produced alongside them.
struct ComputedTotals {
    totals: BatchTotals,
    steps: Vec<AuditStep>,
    warnings: Vec<AuditWarning>,
}

fn outside_period_warning(
    kind: &str,
    reference: &str,
    date: chrono::NaiveDate,
    period: BatchPeriod,
) -> AuditWarning {
    AuditWarning {
        code: "activity_outside_period".to_string(),
        message: format!(
            "{kind} '{reference}' dated {date} falls outside the batch period {} to {}",
            period.start_date, period.end_date
        ),
        severity: "low".to_string(),
    }
}

/// Runs the pricing pipeline over a batch's line items.
///
/// Steps are numbered from `start_step` so the caller can prepend its own
/// steps (contract resolution) without renumbering.
fn run_pipeline(
    contract: &DriverContract,
    period: BatchPeriod,
    loads: &[DriverBatchLoad],
    hourly_lines: &[DriverBatchHourly],
    waits: &[DriverBatchWait],
    collaborators: &FscCollaborators<'_>,
    start_step: u32,
) -> EngineResult<ComputedTotals> {
    let mut steps = Vec::new();
    let mut warnings = Vec::new();
    let mut step = start_step;

    let mut total_distance = Decimal::ZERO;
    for load in loads {
        if load.distance < Decimal::ZERO {
            return Err(EngineError::CalculationError {
                message: format!(
                    "Load '{}' has negative distance: {}",
                    load.reference, load.distance
                ),
            });
        }
        if let Some(rate) = load.rate_override {
            if rate < Decimal::ZERO {
                return Err(EngineError::CalculationError {
                    message: format!(
                        "Load '{}' has negative rate override: {rate}",
                        load.reference
                    ),
                });
            }
        }
        if !period.contains_date(load.date) {
            warnings.push(outside_period_warning(
                "Load",
                &load.reference,
                load.date,
                period,
            ));
        }
        total_distance += load.distance;
    }
    for line in hourly_lines {
        if !period.contains_date(line.date) {
            warnings.push(outside_period_warning(
                "Hourly line",
                &line.description,
                line.date,
                period,
            ));
        }
    }
    for wait in waits {
        if !period.contains_date(wait.date) {
            warnings.push(outside_period_warning(
                "Wait",
                &wait.reference,
                wait.date,
                period,
            ));
        }
    }

    let band_result = resolve_rate_band(&contract.rate_bands, total_distance, step)?;
    step += 1;
    let mileage_rate = band_result.rate;
    let mut mileage_pay = band_result.mileage_pay;
    steps.push(band_result.audit_step);

    // Per-load overrides reprice individual loads; the band rate still
    // stands for every load without one and remains the recorded rate.
    let overridden = loads.iter().filter(|l| l.rate_override.is_some()).count();
    if overridden > 0 {
        let mut adjusted = Decimal::ZERO;
        for load in loads {
            adjusted += load.distance * load.rate_override.unwrap_or(mileage_rate);
        }
        steps.push(AuditStep {
            step_number: step,
            rule_id: "mileage_overrides".to_string(),
            rule_name: "Apply Load Rate Overrides".to_string(),
            input: serde_json::json!({
                "band_rate": mileage_rate.to_string(),
                "load_count": loads.len(),
                "overridden_loads": overridden,
            }),
            output: serde_json::json!({
                "mileage_pay": adjusted.to_string(),
            }),
            reasoning: format!(
                "{overridden} of {} loads carry a rate override; mileage pay repriced \
                 per load at the override or band rate {mileage_rate} = {adjusted}",
                loads.len()
            ),
        });
        step += 1;
        mileage_pay = adjusted;
    }

    let fsc_result = compute_fuel_surcharge(
        contract.settings.fsc_mode,
        contract.settings.fsc_rate,
        total_distance,
        mileage_pay,
        &period,
        collaborators,
        step,
    )?;
    step += 1;
    let fuel_surcharge = fsc_result.fuel_surcharge;
    steps.push(fsc_result.audit_step);

    let hourly_result = calculate_hourly_pay(hourly_lines, contract.settings.hourly_rate, step)?;
    step += 1;
    let total_hours = hourly_result.total_hours;
    let hourly_pay = hourly_result.hourly_pay;
    steps.push(hourly_result.audit_step);

    let waiting_result = aggregate_waiting_pay(waits, contract.settings.waiting_per_minute, step)?;
    step += 1;
    let total_wait_minutes = waiting_result.total_minutes;
    let waiting_pay = waiting_result.waiting_pay;
    steps.push(waiting_result.audit_step);

    let gross_pay = mileage_pay + fuel_surcharge + hourly_pay + waiting_pay;
    steps.push(AuditStep {
        step_number: step,
        rule_id: "gross_pay".to_string(),
        rule_name: "Total Gross Pay".to_string(),
        input: serde_json::json!({
            "mileage_pay": mileage_pay.to_string(),
            "fuel_surcharge": fuel_surcharge.to_string(),
            "hourly_pay": hourly_pay.to_string(),
            "waiting_pay": waiting_pay.to_string(),
        }),
        output: serde_json::json!({
            "gross_pay": gross_pay.to_string(),
        }),
        reasoning: format!(
            "Mileage {mileage_pay} + fuel surcharge {fuel_surcharge} + hourly {hourly_pay} \
             + waiting {waiting_pay} = {gross_pay}"
        ),
    });
    step += 1;

    let fee_result = apply_admin_fee(gross_pay, contract.settings.admin_fee, step);
    step += 1;
    let admin_fee = fee_result.admin_fee;
    let taxable_base = fee_result.taxable_base;
    steps.push(fee_result.audit_step);

    let tax_result = compute_tax(taxable_base, &contract.settings.tax_profile, step)?;
    step += 1;
    let gst_amount = tax_result.gst_amount;
    let qst_amount = tax_result.qst_amount;
    let pst_amount = tax_result.pst_amount;
    let hst_amount = tax_result.hst_amount;
    let tax_amount = tax_result.tax_amount;
    steps.push(tax_result.audit_step);

    let net_pay = taxable_base + tax_amount;
    steps.push(AuditStep {
        step_number: step,
        rule_id: "net_pay".to_string(),
        rule_name: "Total Net Pay".to_string(),
        input: serde_json::json!({
            "taxable_base": taxable_base.to_string(),
            "tax_amount": tax_amount.to_string(),
        }),
        output: serde_json::json!({
            "net_pay": net_pay.to_string(),
        }),
        reasoning: format!(
            "Settlement pays the taxable base {taxable_base} plus the sales tax \
             {tax_amount} collected on the driver's behalf = {net_pay}"
        ),
    });

    let totals = BatchTotals {
        total_distance,
        mileage_rate,
        mileage_pay,
        fuel_surcharge,
        total_hours,
        hourly_pay,
        total_wait_minutes,
        waiting_pay,
        gross_pay,
        admin_fee,
        taxable_base,
        gst_amount,
        qst_amount,
        pst_amount,
        hst_amount,
        tax_amount,
        net_pay,
    };

    Ok(ComputedTotals {
        totals,
        steps,
        warnings,
    })
}

/// Builds a Draft batch for a driver over a period.
///
/// The pipeline:
/// 1. Resolve the contract in force on the period start date
/// 2. Resolve the mileage rate band for the summed distance
/// 3. Apply per-load rate overrides (when any exist)
/// 4. Compute the fuel surcharge under the contract's mode
/// 5. Calculate hourly pay
/// 6. Aggregate waiting pay
/// 7. Total gross pay
/// 8. Deduct the administration fee
/// 9. Compute sales tax and total net pay
///
/// # Errors
///
/// Returns [`EngineError::NoActiveContract`] when no contract covers the
/// period start date, [`EngineError::InvalidContract`] when the resolved
/// contract fails validation, and propagates any pipeline stage error.
pub fn build_batch(
    driver_id: &str,
    period: BatchPeriod,
    contracts: &[DriverContract],
    loads: Vec<DriverBatchLoad>,
    hourly_lines: Vec<DriverBatchHourly>,
    waits: Vec<DriverBatchWait>,
    collaborators: &FscCollaborators<'_>,
) -> EngineResult<DriverBatch> {
    let started = Instant::now();

    let ContractResolution {
        contract,
        warning,
        audit_step,
    } = resolve_contract(contracts, driver_id, period.start_date, 1)?;
    contract.validate()?;

    let computed = run_pipeline(
        &contract,
        period,
        &loads,
        &hourly_lines,
        &waits,
        collaborators,
        2,
    )?;

    let mut steps = vec![audit_step];
    steps.extend(computed.steps);
    let mut warnings = Vec::new();
    if let Some(warning) = warning {
        warnings.push(warning);
    }
    warnings.extend(computed.warnings);

    let gross_pay = computed.totals.gross_pay;
    let net_pay = computed.totals.net_pay;

    let mut batch = DriverBatch::new(
        driver_id.to_string(),
        contract.id,
        period,
        loads,
        hourly_lines,
        waits,
    );
    batch.install_totals(
        computed.totals,
        AuditTrace {
            steps,
            warnings,
            duration_us: started.elapsed().as_micros() as u64,
        },
    );

    info!(
        driver_id = %batch.driver_id(),
        batch_id = %batch.id(),
        contract_id = %batch.contract_id(),
        gross_pay = %gross_pay,
        net_pay = %net_pay,
        "Batch build completed"
    );

    Ok(batch)
}

/// Recomputes a Draft batch's totals from its current line items.
///
/// The caller supplies the contract the batch was built under; batches
/// are priced against a contract snapshot, so swapping in a different
/// contract is refused rather than silently repriced.
///
/// # Errors
///
/// Returns [`EngineError::BatchLocked`] unless the batch is Draft,
/// [`EngineError::ContractMismatch`] if the contract is not the one the
/// batch references, and propagates any pipeline stage error.
pub fn recompute_batch(
    batch: &mut DriverBatch,
    contract: &DriverContract,
    collaborators: &FscCollaborators<'_>,
) -> EngineResult<()> {
    if batch.status() != BatchStatus::Draft {
        return Err(EngineError::BatchLocked {
            batch_id: batch.id(),
            status: batch.status(),
        });
    }
    if contract.id != batch.contract_id() {
        return Err(EngineError::ContractMismatch {
            batch_id: batch.id(),
            expected: batch.contract_id(),
            provided: contract.id,
        });
    }
    contract.validate()?;

    let started = Instant::now();
    let computed = run_pipeline(
        contract,
        batch.period(),
        batch.loads(),
        batch.hourly_lines(),
        batch.waits(),
        collaborators,
        1,
    )?;

    let gross_pay = computed.totals.gross_pay;
    let net_pay = computed.totals.net_pay;
    batch.install_totals(
        computed.totals,
        AuditTrace {
            steps: computed.steps,
            warnings: computed.warnings,
            duration_us: started.elapsed().as_micros() as u64,
        },
    );

    info!(
        batch_id = %batch.id(),
        contract_id = %contract.id,
        gross_pay = %gross_pay,
        net_pay = %net_pay,
        "Batch totals recomputed"
    );

    Ok(())
}
