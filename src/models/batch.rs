//! Settlement batch model and related types.
//!
//! This module defines the [`DriverBatch`] aggregate: the line items a
//! batch settles, the itemized [`BatchTotals`] the engine computes for it,
//! and the [`BatchStatus`] lifecycle it moves through. Batch fields are
//! private so line items can only change while the batch is in Draft and
//! status can only change through the lifecycle module.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::error::{EngineError, EngineResult};

use super::{AuditTrace, BatchPeriod};

/// The lifecycle state of a settlement batch.
///
/// Allowed transitions: Draft -> Finalized, Finalized -> Approved,
/// Finalized -> Draft (reopen), Approved -> Paid. Paid is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchStatus {
    /// Line items editable; totals recomputed on demand.
    Draft,
    /// Totals frozen; awaiting approval.
    Finalized,
    /// Approved for payment.
    Approved,
    /// Payment issued; terminal.
    Paid,
}

impl BatchStatus {
    /// Returns true if a batch in this status may move to `target`.
    ///
    /// # Example
    ///
    /// ```
    /// use fleetpay_engine::models::BatchStatus;
    ///
    /// assert!(BatchStatus::Draft.can_transition_to(BatchStatus::Finalized));
    /// assert!(BatchStatus::Finalized.can_transition_to(BatchStatus::Draft)); // reopen
    /// assert!(!BatchStatus::Draft.can_transition_to(BatchStatus::Paid));
    /// assert!(!BatchStatus::Paid.can_transition_to(BatchStatus::Draft));
    /// ```
    pub fn can_transition_to(self, target: BatchStatus) -> bool {
        matches!(
            (self, target),
            (BatchStatus::Draft, BatchStatus::Finalized)
                | (BatchStatus::Finalized, BatchStatus::Approved)
                | (BatchStatus::Finalized, BatchStatus::Draft)
                | (BatchStatus::Approved, BatchStatus::Paid)
        )
    }
}

impl fmt::Display for BatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BatchStatus::Draft => "draft",
            BatchStatus::Finalized => "finalized",
            BatchStatus::Approved => "approved",
            BatchStatus::Paid => "paid",
        };
        f.write_str(name)
    }
}

/// The category of a waiting record.
///
/// Categories do not change the waiting rate; they are retained for
/// reporting and appear as subtotals on the audit trace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WaitType {
    /// Detention at a customer site.
    CustomerAccessorial,
    /// Detention at a terminal or yard.
    TerminalAccessorial,
    /// Any other compensable waiting.
    Other,
}

impl fmt::Display for WaitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            WaitType::CustomerAccessorial => "customer_accessorial",
            WaitType::TerminalAccessorial => "terminal_accessorial",
            WaitType::Other => "other",
        };
        f.write_str(name)
    }
}

/// A completed load settled by distance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriverBatchLoad {
    /// Load or trip reference (e.g., "LD-4821").
    pub reference: String,
    /// The date the load was completed.
    pub date: NaiveDate,
    /// Distance driven for the load.
    pub distance: Decimal,
    /// Optional per-load rate replacing the resolved band rate.
    #[serde(default)]
    pub rate_override: Option<Decimal>,
}

/// Work settled by the hour (yard shunting, training, local runs).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriverBatchHourly {
    /// What the hours were for.
    pub description: String,
    /// The date the work was performed.
    pub date: NaiveDate,
    /// Hours worked.
    pub hours: Decimal,
    /// Optional rate replacing the contract hourly rate.
    #[serde(default)]
    pub rate_override: Option<Decimal>,
}

/// A recorded period of compensable waiting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriverBatchWait {
    /// Reference tying the wait to a load or site.
    pub reference: String,
    /// The date of the wait.
    pub date: NaiveDate,
    /// The category of the wait.
    pub wait_type: WaitType,
    /// Duration in minutes.
    pub minutes: Decimal,
}

/// Itemized computed totals for a batch.
///
/// Every component that contributes to the driver's statement appears as
/// its own field so nothing on the statement needs to be re-derived.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchTotals {
    /// Sum of load distances.
    pub total_distance: Decimal,
    /// The resolved rate band's per-distance rate.
    pub mileage_rate: Decimal,
    /// Pay for distance driven.
    pub mileage_pay: Decimal,
    /// Fuel surcharge.
    pub fuel_surcharge: Decimal,
    /// Sum of hourly line hours.
    pub total_hours: Decimal,
    /// Pay for hourly work.
    pub hourly_pay: Decimal,
    /// Sum of wait minutes across all categories.
    pub total_wait_minutes: Decimal,
    /// Pay for recorded waiting.
    pub waiting_pay: Decimal,
    /// Mileage + fuel surcharge + hourly + waiting.
    pub gross_pay: Decimal,
    /// Flat administration fee deducted from gross.
    pub admin_fee: Decimal,
    /// Gross pay less the administration fee.
    pub taxable_base: Decimal,
    /// GST collected on the taxable base.
    pub gst_amount: Decimal,
    /// QST collected (on the GST-inclusive base when compounding).
    pub qst_amount: Decimal,
    /// PST collected on the taxable base.
    pub pst_amount: Decimal,
    /// HST collected on the taxable base.
    pub hst_amount: Decimal,
    /// Sum of all tax components.
    pub tax_amount: Decimal,
    /// Amount payable to the driver: taxable base plus collected tax.
    pub net_pay: Decimal,
}

/// A settlement batch for one driver over one period.
///
/// A batch owns the activity line items being settled, a reference to the
/// contract snapshot it was priced under, the computed totals, and the
/// audit trace explaining them. The `version` field is an optimistic lock:
/// lifecycle transitions must present the version they read, and every
/// successful mutation increments it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriverBatch {
    id: Uuid,
    driver_id: String,
    contract_id: Uuid,
    period: BatchPeriod,
    status: BatchStatus,
    version: u64,
    loads: Vec<DriverBatchLoad>,
    hourly_lines: Vec<DriverBatchHourly>,
    waits: Vec<DriverBatchWait>,
    totals: Option<BatchTotals>,
    audit_trace: AuditTrace,
    approved_by: Option<String>,
    payment_reference: Option<String>,
    created_at: DateTime<Utc>,
    engine_version: String,
}

impl DriverBatch {
    /// Creates a new Draft batch with no computed totals.
    ///
    /// Only the batch builder creates batches, so the contract reference
    /// is known to have resolved for the period.
    pub(crate) fn new(
        driver_id: String,
        contract_id: Uuid,
        period: BatchPeriod,
        loads: Vec<DriverBatchLoad>,
        hourly_lines: Vec<DriverBatchHourly>,
        waits: Vec<DriverBatchWait>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            driver_id,
            contract_id,
            period,
            status: BatchStatus::Draft,
            version: 0,
            loads,
            hourly_lines,
            waits,
            totals: None,
            audit_trace: AuditTrace::empty(),
            approved_by: None,
            payment_reference: None,
            created_at: Utc::now(),
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    /// Unique identifier for the batch.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// The driver this batch settles.
    pub fn driver_id(&self) -> &str {
        &self.driver_id
    }

    /// The contract snapshot the batch was priced under.
    pub fn contract_id(&self) -> Uuid {
        self.contract_id
    }

    /// The settlement period the batch covers.
    pub fn period(&self) -> BatchPeriod {
        self.period
    }

    /// Current lifecycle status.
    pub fn status(&self) -> BatchStatus {
        self.status
    }

    /// Current optimistic-lock version.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Load line items.
    pub fn loads(&self) -> &[DriverBatchLoad] {
        &self.loads
    }

    /// Hourly work line items.
    pub fn hourly_lines(&self) -> &[DriverBatchHourly] {
        &self.hourly_lines
    }

    /// Waiting line items.
    pub fn waits(&self) -> &[DriverBatchWait] {
        &self.waits
    }

    /// Computed totals, or `None` when the batch has been edited since the
    /// last computation.
    pub fn totals(&self) -> Option<&BatchTotals> {
        self.totals.as_ref()
    }

    /// The audit trace for the current totals.
    pub fn audit_trace(&self) -> &AuditTrace {
        &self.audit_trace
    }

    /// Who approved the batch, once Approved.
    pub fn approved_by(&self) -> Option<&str> {
        self.approved_by.as_deref()
    }

    /// The payment reference, once Paid.
    pub fn payment_reference(&self) -> Option<&str> {
        self.payment_reference.as_deref()
    }

    /// When the batch was created.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// The engine version that built the batch.
    pub fn engine_version(&self) -> &str {
        &self.engine_version
    }

    /// Adds a load line item.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::BatchLocked`] unless the batch is Draft.
    pub fn add_load(&mut self, load: DriverBatchLoad) -> EngineResult<()> {
        self.ensure_draft()?;
        self.loads.push(load);
        self.invalidate_totals();
        Ok(())
    }

    /// Adds an hourly work line item.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::BatchLocked`] unless the batch is Draft.
    pub fn add_hourly(&mut self, line: DriverBatchHourly) -> EngineResult<()> {
        self.ensure_draft()?;
        self.hourly_lines.push(line);
        self.invalidate_totals();
        Ok(())
    }

    /// Adds a waiting line item.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::BatchLocked`] unless the batch is Draft.
    pub fn add_wait(&mut self, wait: DriverBatchWait) -> EngineResult<()> {
        self.ensure_draft()?;
        self.waits.push(wait);
        self.invalidate_totals();
        Ok(())
    }

    fn ensure_draft(&self) -> EngineResult<()> {
        if self.status != BatchStatus::Draft {
            return Err(EngineError::BatchLocked {
                batch_id: self.id,
                status: self.status,
            });
        }
        Ok(())
    }

    /// Successful edits leave no stale totals behind and move the version
    /// forward so in-flight transitions fail their version check.
    fn invalidate_totals(&mut self) {
        self.totals = None;
        self.audit_trace = AuditTrace::empty();
        self.version += 1;
    }

    /// Installs freshly computed totals and their trace.
    pub(crate) fn install_totals(&mut self, totals: BatchTotals, trace: AuditTrace) {
        self.totals = Some(totals);
        self.audit_trace = trace;
    }

    /// Drops computed totals and trace; used when reopening.
    pub(crate) fn clear_totals(&mut self) {
        self.totals = None;
        self.audit_trace = AuditTrace::empty();
    }

    pub(crate) fn set_status(&mut self, status: BatchStatus) {
        self.status = status;
    }

    pub(crate) fn set_approved_by(&mut self, approver: String) {
        self.approved_by = Some(approver);
    }

    pub(crate) fn set_payment_reference(&mut self, reference: String) {
        self.payment_reference = Some(reference);
    }

    pub(crate) fn bump_version(&mut self) {
        self.version += 1;
    }
}
