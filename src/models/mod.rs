//! Core data models for the driver settlement engine.
//!
//! This module contains all the domain models used throughout the engine.

mod audit;
mod batch;
mod contract;
mod period;
mod tax;

pub use audit::{AuditStep, AuditTrace, AuditWarning};
pub use batch::{
    BatchStatus, BatchTotals, DriverBatch, DriverBatchHourly, DriverBatchLoad, DriverBatchWait,
    WaitType,
};
pub use contract::{DriverContract, DriverSettings, FscMode, RateBand};
pub use period::BatchPeriod;
pub use tax::{Province, TaxProfile};
