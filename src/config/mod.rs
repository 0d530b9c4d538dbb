//! Configuration loading and management for the driver settlement engine.
//!
//! This module provides functionality to load dated provincial tax tables
//! from YAML files and look up the profile in force for a province on a
//! given date.
//!
//! # Example
//!
//! ```no_run
//! use fleetpay_engine::config::TaxTableLoader;
//! use fleetpay_engine::models::Province;
//! use chrono::NaiveDate;
//!
//! let loader = TaxTableLoader::load("./config/tax_tables").unwrap();
//! let date = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
//! let profile = loader.profile_for(Province::Quebec, date).unwrap();
//! println!("QST rate: {}", profile.qst_rate);
//! ```

mod loader;
mod types;

pub use loader::TaxTableLoader;
pub use types::TaxTableFile;
