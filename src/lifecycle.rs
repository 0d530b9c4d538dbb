//! Batch lifecycle transitions.
//!
//! A batch moves Draft -> Finalized -> Approved -> Paid, with one backward
//! edge: a Finalized batch can reopen to Draft for correction. Every
//! transition is guarded by an optimistic version check so two operators
//! working from the same read cannot both win; the loser gets
//! [`EngineError::ConcurrentModification`] and must re-read.
//!
//! Finalizing recomputes totals from the batch's current line items, so a
//! batch can never freeze with stale or missing figures. Reopening clears
//! them, making "Finalized" and "has current totals" the same fact.

use tracing::info;

use crate::calculation::{FscCollaborators, recompute_batch};
use crate::error::{EngineError, EngineResult};
use crate::models::{BatchStatus, DriverBatch, DriverContract};

/// A requested lifecycle transition, carrying what the transition needs.
pub enum Transition<'a> {
    /// Freeze the batch for review, recomputing totals first.
    Finalize {
        /// The contract the batch was built under.
        contract: &'a DriverContract,
        /// Collaborators for surcharge modes that need them.
        collaborators: &'a FscCollaborators<'a>,
    },
    /// Return a finalized batch to Draft for correction.
    Reopen,
    /// Record sign-off and lock the batch against reopening.
    Approve {
        /// Who approved the batch.
        approver: String,
    },
    /// Record payment and close the batch permanently.
    MarkPaid {
        /// External payment reference.
        payment_reference: String,
    },
}

impl Transition<'_> {
    fn target(&self) -> BatchStatus {
        match self {
            Transition::Finalize { .. } => BatchStatus::Finalized,
            Transition::Reopen => BatchStatus::Draft,
            Transition::Approve { .. } => BatchStatus::Approved,
            Transition::MarkPaid { .. } => BatchStatus::Paid,
        }
    }
}

/// Applies a lifecycle transition to a batch.
///
/// The version check runs before anything else: `expected_version` must
/// match the batch's current version, and every successful transition
/// increments it.
///
/// # Errors
///
/// Returns [`EngineError::ConcurrentModification`] on a version mismatch,
/// [`EngineError::InvalidTransition`] when the batch's current status does
/// not allow the requested move, and propagates recomputation errors when
/// finalizing.
pub fn advance(
    batch: &mut DriverBatch,
    transition: Transition<'_>,
    expected_version: u64,
) -> EngineResult<()> {
    if batch.version() != expected_version {
        return Err(EngineError::ConcurrentModification {
            batch_id: batch.id(),
            expected: expected_version,
            actual: batch.version(),
        });
    }

    let from = batch.status();
    let to = transition.target();
    if !from.can_transition_to(to) {
        return Err(EngineError::InvalidTransition { from, to });
    }

    match transition {
        Transition::Finalize {
            contract,
            collaborators,
        } => {
            recompute_batch(batch, contract, collaborators)?;
            batch.set_status(BatchStatus::Finalized);
        }
        Transition::Reopen => {
            batch.clear_totals();
            batch.set_status(BatchStatus::Draft);
        }
        Transition::Approve { approver } => {
            batch.set_approved_by(approver);
            batch.set_status(BatchStatus::Approved);
        }
        Transition::MarkPaid { payment_reference } => {
            batch.set_payment_reference(payment_reference);
            batch.set_status(BatchStatus::Paid);
        }
    }
    batch.bump_version();

    info!(
        batch_id = %batch.id(),
        from = %from,
        to = %to,
        version = batch.version(),
        "Batch transition applied"
    );

    Ok(())
}

/// Finalizes a Draft batch, recomputing totals from its line items.
///
/// # Errors
///
/// See [`advance`].
pub fn finalize(
    batch: &mut DriverBatch,
    contract: &DriverContract,
    collaborators: &FscCollaborators<'_>,
    expected_version: u64,
) -> EngineResult<()> {
    advance(
        batch,
        Transition::Finalize {
            contract,
            collaborators,
        },
        expected_version,
    )
}

/// Reopens a Finalized batch back to Draft, clearing its totals.
///
/// # Errors
///
/// See [`advance`].
pub fn reopen(batch: &mut DriverBatch, expected_version: u64) -> EngineResult<()> {
    advance(batch, Transition::Reopen, expected_version)
}

/// Approves a Finalized batch, recording who signed it off.
///
/// # Errors
///
/// See [`advance`].
pub fn approve(
    batch: &mut DriverBatch,
    approver: String,
    expected_version: u64,
) -> EngineResult<()> {
    advance(batch, Transition::Approve { approver }, expected_version)
}

/// Marks an Approved batch as paid, recording the payment reference.
///
/// # Errors
///
/// See [`advance`].
pub fn mark_paid(
    batch: &mut DriverBatch,
    payment_reference: String,
    expected_version: u64,
) -> EngineResult<()> {
    advance(
        batch,
        Transition::MarkPaid { payment_reference },
        expected_version,
    )
}
