//! Error types for the driver settlement engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for all error conditions that can occur during settlement calculation
//! and batch lifecycle management.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{BatchStatus, FscMode, Province};

/// The main error type for the driver settlement engine.
///
/// All operations in the engine return this error type, making it easy
/// to handle errors consistently throughout the application.
///
/// # Example
///
/// ```
/// use fleetpay_engine::error::EngineError;
///
/// let error = EngineError::ConfigNotFound {
///     path: "/missing/file.yaml".to_string(),
/// };
/// assert_eq!(error.to_string(), "Configuration file not found: /missing/file.yaml");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// No tax table carries a profile for the province on the given date.
    #[error("No tax profile for province {province} on date {date}")]
    TaxProfileNotFound {
        /// The province whose profile was requested.
        province: Province,
        /// The date for which the profile was requested.
        date: NaiveDate,
    },

    /// No contract window covers the requested date for the driver.
    #[error("No active contract for driver '{driver_id}' on date {date}")]
    NoActiveContract {
        /// The driver whose contract was requested.
        driver_id: String,
        /// The date no contract covers.
        date: NaiveDate,
    },

    /// A contract failed structural validation.
    #[error("Invalid contract {contract_id}: {message}")]
    InvalidContract {
        /// The ID of the invalid contract.
        contract_id: Uuid,
        /// A description of what made the contract invalid.
        message: String,
    },

    /// No rate band in the contract covers the batch distance.
    #[error("No rate band applies to distance {distance}")]
    NoApplicableBand {
        /// The total distance that fell outside every band.
        distance: Decimal,
    },

    /// The fuel surcharge mode cannot be evaluated as configured.
    #[error("Unsupported fuel surcharge mode '{mode}': {message}")]
    UnsupportedMode {
        /// The mode that could not be evaluated.
        mode: FscMode,
        /// A description of the missing configuration.
        message: String,
    },

    /// Custom fuel surcharge mode was requested without a formula.
    #[error("Custom fuel surcharge mode requires a formula collaborator")]
    MissingCustomFormula,

    /// A wait record carried a negative duration.
    #[error("Invalid wait duration on '{reference}': {minutes} minutes")]
    InvalidWaitDuration {
        /// The reference of the offending wait record.
        reference: String,
        /// The rejected duration.
        minutes: Decimal,
    },

    /// A tax rate fell outside the valid fractional range.
    #[error("Invalid tax rate for {component}: {rate} is outside [0, 1]")]
    InvalidTaxRate {
        /// The tax component with the bad rate (gst, qst, pst or hst).
        component: String,
        /// The rejected rate.
        rate: Decimal,
    },

    /// The requested batch status transition is not allowed.
    #[error("Invalid batch transition: {from} -> {to}")]
    InvalidTransition {
        /// The current status of the batch.
        from: BatchStatus,
        /// The requested target status.
        to: BatchStatus,
    },

    /// The batch is past Draft and its line items can no longer change.
    #[error("Batch {batch_id} is {status} and cannot be edited")]
    BatchLocked {
        /// The ID of the locked batch.
        batch_id: Uuid,
        /// The status that locks the batch.
        status: BatchStatus,
    },

    /// A recomputation was attempted with the wrong contract snapshot.
    #[error("Batch {batch_id} was built from contract {expected}, not {provided}")]
    ContractMismatch {
        /// The ID of the batch being recomputed.
        batch_id: Uuid,
        /// The contract the batch was built from.
        expected: Uuid,
        /// The contract that was supplied.
        provided: Uuid,
    },

    /// A transition raced another writer and lost.
    #[error("Concurrent modification of batch {batch_id}: expected version {expected}, found {actual}")]
    ConcurrentModification {
        /// The ID of the contested batch.
        batch_id: Uuid,
        /// The version the caller expected.
        expected: u64,
        /// The version actually on the batch.
        actual: u64,
    },

    /// A general calculation error occurred.
    #[error("Calculation error: {message}")]
    CalculationError {
        /// A description of the calculation error.
        message: String,
    },
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
