//! Driver Settlement Engine for Cargo Fleet Payroll
//!
//! This crate provides functionality for settling contractor driver pay:
//! resolving the contract in force for a period, pricing mileage through
//! rate bands, adding fuel surcharge, hourly, and waiting pay, deducting
//! fees, collecting Canadian sales tax, and walking each batch through its
//! Draft/Finalized/Approved/Paid lifecycle with an auditable trace.

#![warn(missing_docs)]

pub mod calculation;
pub mod config;
pub mod error;
pub mod lifecycle;
pub mod models;
