//! Calculation logic for the driver settlement engine.
//!
//! This module contains all the calculation functions for pricing a batch,
//! including contract resolution over validity windows, mileage rate band
//! lookup, fuel surcharge calculation under the contract's surcharge mode,
//! hourly pay for non-driving work, waiting pay aggregation, administration
//! fee deduction, Canadian sales tax calculation, and the batch builder
//! that orders them into one audited pipeline.

mod admin_fee;
mod batch_builder;
mod contract_resolver;
mod fuel_surcharge;
mod hourly_pay;
mod rate_bands;
mod tax;
mod waiting_pay;

pub use admin_fee::{AdminFeeResult, apply_admin_fee};
pub use batch_builder::{build_batch, recompute_batch};
pub use contract_resolver::{ContractResolution, resolve_contract};
pub use fuel_surcharge::{
    CustomFscFormula, FscCollaborators, FuelPriceIndex, FuelSurchargeResult,
    compute_fuel_surcharge,
};
pub use hourly_pay::{HourlyPayResult, calculate_hourly_pay};
pub use rate_bands::{RateBandResult, resolve_rate_band};
pub use tax::{TaxResult, compute_tax};
pub use waiting_pay::{WaitingPayResult, aggregate_waiting_pay};
