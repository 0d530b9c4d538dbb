//! Batch period model.
//!
//! This module contains the [`BatchPeriod`] type that defines the settlement
//! window a batch of driver activity is paid against.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Represents a settlement period with its date range.
///
/// A batch period defines the time window a settlement batch covers.
/// Activity records (loads, hourly work, waits) are expected to fall
/// within it; records dated outside the period are still paid but are
/// flagged with a warning on the audit trace.
///
/// # Example
///
/// ```
/// use fleetpay_engine::models::BatchPeriod;
/// use chrono::NaiveDate;
///
/// let period = BatchPeriod {
///     start_date: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
///     end_date: NaiveDate::from_ymd_opt(2025, 6, 14).unwrap(),
/// };
///
/// assert!(period.contains_date(NaiveDate::from_ymd_opt(2025, 6, 7).unwrap()));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchPeriod {
    /// The start date of the period (inclusive).
    pub start_date: NaiveDate,
    /// The end date of the period (inclusive).
    pub end_date: NaiveDate,
}

impl BatchPeriod {
    /// Checks if a given date falls within this period.
    ///
    /// The check is inclusive of both start and end dates.
    ///
    /// # Example
    ///
    /// ```
    /// use fleetpay_engine::models::BatchPeriod;
    /// use chrono::NaiveDate;
    ///
    /// let period = BatchPeriod {
    ///     start_date: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
    ///     end_date: NaiveDate::from_ymd_opt(2025, 6, 14).unwrap(),
    /// };
    ///
    /// assert!(period.contains_date(NaiveDate::from_ymd_opt(2025, 6, 1).unwrap())); // start date
    /// assert!(period.contains_date(NaiveDate::from_ymd_opt(2025, 6, 14).unwrap())); // end date
    /// assert!(!period.contains_date(NaiveDate::from_ymd_opt(2025, 5, 31).unwrap())); // before
    /// assert!(!period.contains_date(NaiveDate::from_ymd_opt(2025, 6, 15).unwrap())); // after
    /// ```
    pub fn contains_date(&self, date: NaiveDate) -> bool {
        date >= self.start_date && date <= self.end_date
    }
}
