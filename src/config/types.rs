//! Configuration data structures.
//!
//! This module defines the types that YAML tax table files deserialize
//! into. Tax rates change on legislated dates, so each file carries the
//! date its profiles take effect and the loader picks between files.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::Deserialize;

use crate::models::{Province, TaxProfile};

/// One tax table file: the profiles in force from an effective date.
///
/// # YAML Structure
///
/// ```yaml
/// effective_date: 2025-04-01
/// profiles:
///   QC:
///     gst_rate: "0.05"
///     qst_rate: "0.09975"
///     pst_rate: "0"
///     hst_rate: "0"
///     compound_qst_over_gst: true
///   ON:
///     gst_rate: "0"
///     qst_rate: "0"
///     pst_rate: "0"
///     hst_rate: "0.13"
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct TaxTableFile {
    /// First date these profiles apply.
    pub effective_date: NaiveDate,
    /// The profile per province, keyed by two-letter code.
    pub profiles: HashMap<Province, TaxProfile>,
}
