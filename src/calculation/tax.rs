//! Sales tax calculation for contractor settlements.
//!
//! Contractor drivers invoice the carrier, so the settlement collects
//! GST/HST (and provincial taxes where they apply) on top of the taxable
//! base. Quebec is the awkward one: historically QST applied to the
//! GST-inclusive amount, and carriers still settle on that basis, so the
//! profile carries an explicit compounding flag rather than hard-coding
//! the province.

use rust_decimal::Decimal;

use crate::error::EngineResult;
use crate::models::{AuditStep, TaxProfile};

/// The result of a sales tax calculation, including the audit step.
#[derive(Debug, Clone)]
pub struct TaxResult {
    /// GST collected on the base.
    pub gst_amount: Decimal,
    /// QST collected (on the GST-inclusive amount when compounding).
    pub qst_amount: Decimal,
    /// PST collected on the base.
    pub pst_amount: Decimal,
    /// HST collected on the base.
    pub hst_amount: Decimal,
    /// Sum of all four components.
    pub tax_amount: Decimal,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Computes sales tax on the taxable base under the given profile.
///
/// Each component applies its rate to the base, except QST under a
/// compounding profile, which applies to the base plus GST. A negative
/// base produces negative tax amounts, which is the correct treatment
/// for a settlement that nets to a deduction.
///
/// # Errors
///
/// Returns [`EngineError::InvalidTaxRate`](crate::error::EngineError::InvalidTaxRate)
/// if any profile rate falls outside `[0, 1]`.
pub fn compute_tax(
    taxable_base: Decimal,
    profile: &TaxProfile,
    step_number: u32,
) -> EngineResult<TaxResult> {
    profile.validate()?;

    let gst_amount = taxable_base * profile.gst_rate;
    let qst_base = if profile.compound_qst_over_gst {
        taxable_base + gst_amount
    } else {
        taxable_base
    };
    let qst_amount = qst_base * profile.qst_rate;
    let pst_amount = taxable_base * profile.pst_rate;
    let hst_amount = taxable_base * profile.hst_rate;
    let tax_amount = gst_amount + qst_amount + pst_amount + hst_amount;

    let reasoning = if profile.compound_qst_over_gst && profile.qst_rate > Decimal::ZERO {
        format!(
            "GST {} on base {taxable_base}; QST {} compounded on GST-inclusive {qst_base}; \
             total tax {tax_amount}",
            profile.gst_rate, profile.qst_rate
        )
    } else {
        format!(
            "GST {} + QST {} + PST {} + HST {} applied to base {taxable_base}; \
             total tax {tax_amount}",
            profile.gst_rate, profile.qst_rate, profile.pst_rate, profile.hst_rate
        )
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "sales_tax".to_string(),
        rule_name: "Compute Sales Tax".to_string(),
        input: serde_json::json!({
            "taxable_base": taxable_base.to_string(),
            "gst_rate": profile.gst_rate.to_string(),
            "qst_rate": profile.qst_rate.to_string(),
            "pst_rate": profile.pst_rate.to_string(),
            "hst_rate": profile.hst_rate.to_string(),
            "compound_qst_over_gst": profile.compound_qst_over_gst,
        }),
        output: serde_json::json!({
            "gst_amount": gst_amount.to_string(),
            "qst_amount": qst_amount.to_string(),
            "pst_amount": pst_amount.to_string(),
            "hst_amount": hst_amount.to_string(),
            "tax_amount": tax_amount.to_string(),
        }),
        reasoning,
    };

    Ok(TaxResult {
        gst_amount,
        qst_amount,
        pst_amount,
        hst_amount,
        tax_amount,
        audit_step,
    })
}
