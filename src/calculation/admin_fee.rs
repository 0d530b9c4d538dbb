//! Administration fee deduction.
//!
//! Carriers commonly deduct a flat per-batch fee from contractor drivers
//! before tax. The deduction produces the taxable base the tax engine
//! works from; a fee larger than gross pay leaves a negative base rather
//! than being clamped, so the shortfall carries into net pay.

use rust_decimal::Decimal;

use crate::models::AuditStep;

/// The result of applying the administration fee, including the audit step.
#[derive(Debug, Clone)]
pub struct AdminFeeResult {
    /// The fee deducted.
    pub admin_fee: Decimal,
    /// Gross pay less the fee.
    pub taxable_base: Decimal,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Deducts the contract's flat administration fee from gross pay.
pub fn apply_admin_fee(gross_pay: Decimal, admin_fee: Decimal, step_number: u32) -> AdminFeeResult {
    let taxable_base = gross_pay - admin_fee;

    let mut reasoning = format!(
        "Gross pay {gross_pay} less administration fee {admin_fee} = taxable base {taxable_base}"
    );
    if taxable_base < Decimal::ZERO {
        reasoning.push_str("; fee exceeds gross pay, base is negative");
    }

    let audit_step = AuditStep {
        step_number,
        rule_id: "admin_fee".to_string(),
        rule_name: "Apply Administration Fee".to_string(),
        input: serde_json::json!({
            "gross_pay": gross_pay.to_string(),
            "admin_fee": admin_fee.to_string(),
        }),
        output: serde_json::json!({
            "taxable_base": taxable_base.to_string(),
        }),
        reasoning,
    };

    AdminFeeResult {
        admin_fee,
        taxable_base,
        audit_step,
    }
}
