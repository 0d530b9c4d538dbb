//! Driver contract model and related types.
//!
//! This module defines the [`DriverContract`] struct and its supporting
//! types: the per-driver commercial settings, the mileage rate band table,
//! and the fuel surcharge mode.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::error::{EngineError, EngineResult};

use super::{Province, TaxProfile};

/// How the fuel surcharge is calculated for a contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FscMode {
    /// No fuel surcharge.
    None,
    /// Percentage of mileage pay (`fsc_rate` is the fraction).
    Percentage,
    /// Flat amount per distance unit (`fsc_rate` is the per-unit amount).
    Fixed,
    /// Per-distance rate supplied by an injected fuel price index.
    SlidingScale,
    /// Caller-supplied formula over distance and mileage pay.
    Custom,
}

impl fmt::Display for FscMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FscMode::None => "none",
            FscMode::Percentage => "percentage",
            FscMode::Fixed => "fixed",
            FscMode::SlidingScale => "sliding_scale",
            FscMode::Custom => "custom",
        };
        f.write_str(name)
    }
}

/// A single mileage rate band.
///
/// Bands partition total batch distance by upper threshold; the final band
/// leaves `mileage_threshold` unset and covers everything above the last
/// bounded threshold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateBand {
    /// Human-readable band label (e.g., "Tier 1").
    pub label: String,
    /// The per-distance rate paid when this band is selected.
    pub rate: Decimal,
    /// Upper distance bound (inclusive); `None` marks the unbounded band.
    pub mileage_threshold: Option<Decimal>,
}

/// Commercial settings attached to a driver contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriverSettings {
    /// How many rate bands the contract's band table must carry.
    pub num_pay_bands: u32,
    /// Default rate for hourly work lines.
    pub hourly_rate: Decimal,
    /// Fuel surcharge rate; meaning depends on `fsc_mode`.
    pub fsc_rate: Decimal,
    /// How the fuel surcharge is calculated.
    pub fsc_mode: FscMode,
    /// Rate paid per minute of recorded waiting.
    pub waiting_per_minute: Decimal,
    /// Flat administration fee deducted from gross each batch.
    pub admin_fee: Decimal,
    /// The province whose sales tax regime applies.
    pub province: Province,
    /// The tax profile applied to this driver's settlements.
    pub tax_profile: TaxProfile,
}

/// Represents a driver's pay agreement over a validity window.
///
/// The window is half-open: a contract covers dates from `start_date`
/// inclusive up to but excluding `end_date`. An open-ended contract has no
/// `end_date`. Batch calculation snapshots the contract it resolves, so
/// later edits to contract data never change an already-built batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriverContract {
    /// Unique identifier for the contract.
    pub id: Uuid,
    /// The driver this contract belongs to.
    pub driver_id: String,
    /// Commercial settings for the contract.
    pub settings: DriverSettings,
    /// The mileage rate band table, bounded bands first.
    pub rate_bands: Vec<RateBand>,
    /// First date the contract is in force (inclusive).
    pub start_date: NaiveDate,
    /// Date the contract stops being in force (exclusive); `None` = open-ended.
    pub end_date: Option<NaiveDate>,
}

impl DriverContract {
    /// Returns true if the contract's validity window covers the date.
    ///
    /// # Examples
    ///
    /// ```
    /// use fleetpay_engine::models::{
    ///     DriverContract, DriverSettings, FscMode, Province, RateBand, TaxProfile,
    /// };
    /// use chrono::NaiveDate;
    /// use rust_decimal::Decimal;
    /// use uuid::Uuid;
    ///
    /// let contract = DriverContract {
    ///     id: Uuid::new_v4(),
    ///     driver_id: "drv_001".to_string(),
    ///     settings: DriverSettings {
    ///         num_pay_bands: 1,
    ///         hourly_rate: Decimal::new(2500, 2),
    ///         fsc_rate: Decimal::ZERO,
    ///         fsc_mode: FscMode::None,
    ///         waiting_per_minute: Decimal::new(50, 2),
    ///         admin_fee: Decimal::ZERO,
    ///         province: Province::Quebec,
    ///         tax_profile: TaxProfile::quebec(),
    ///     },
    ///     rate_bands: vec![RateBand {
    ///         label: "Base".to_string(),
    ///         rate: Decimal::new(95, 2),
    ///         mileage_threshold: None,
    ///     }],
    ///     start_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
    ///     end_date: Some(NaiveDate::from_ymd_opt(2026, 1, 1).unwrap()),
    /// };
    ///
    /// assert!(contract.covers(NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()));
    /// assert!(!contract.covers(NaiveDate::from_ymd_opt(2026, 1, 1).unwrap())); // end excluded
    /// ```
    pub fn covers(&self, date: NaiveDate) -> bool {
        date >= self.start_date && self.end_date.is_none_or(|end| date < end)
    }

    /// Returns true if this contract's window intersects another's.
    ///
    /// Two contracts for the same driver should never overlap; the editing
    /// workflow uses this check before saving, and the resolver flags any
    /// overlap it still encounters as an ambiguity warning.
    pub fn overlaps(&self, other: &DriverContract) -> bool {
        let self_starts_in_time = other.end_date.is_none_or(|end| self.start_date < end);
        let other_starts_in_time = self.end_date.is_none_or(|end| other.start_date < end);
        self_starts_in_time && other_starts_in_time
    }

    /// Validates the structural integrity of the contract.
    ///
    /// Checks the validity window, the rate band table shape (band count
    /// matching `num_pay_bands`, exactly one unbounded band in final
    /// position, strictly ascending positive thresholds, non-negative
    /// rates), and that no monetary setting is negative.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidContract`] describing the first
    /// violation found.
    pub fn validate(&self) -> EngineResult<()> {
        if let Some(end) = self.end_date {
            if end <= self.start_date {
                return Err(self.invalid(format!(
                    "end date {end} is not after start date {}",
                    self.start_date
                )));
            }
        }

        if self.rate_bands.is_empty() {
            return Err(self.invalid("contract has no rate bands".to_string()));
        }
        if self.rate_bands.len() != self.settings.num_pay_bands as usize {
            return Err(self.invalid(format!(
                "expected {} rate bands, found {}",
                self.settings.num_pay_bands,
                self.rate_bands.len()
            )));
        }

        let unbounded = self
            .rate_bands
            .iter()
            .filter(|b| b.mileage_threshold.is_none())
            .count();
        if unbounded != 1 {
            return Err(self.invalid(format!(
                "exactly one unbounded rate band is required, found {unbounded}"
            )));
        }
        if self
            .rate_bands
            .last()
            .is_some_and(|b| b.mileage_threshold.is_some())
        {
            return Err(self.invalid("the unbounded rate band must be last".to_string()));
        }

        let mut previous: Option<Decimal> = None;
        for band in &self.rate_bands {
            if band.rate < Decimal::ZERO {
                return Err(self.invalid(format!("rate band '{}' has a negative rate", band.label)));
            }
            if let Some(threshold) = band.mileage_threshold {
                if threshold <= Decimal::ZERO {
                    return Err(self.invalid(format!(
                        "rate band '{}' threshold must be positive",
                        band.label
                    )));
                }
                if previous.is_some_and(|p| threshold <= p) {
                    return Err(
                        self.invalid("rate band thresholds must be strictly ascending".to_string())
                    );
                }
                previous = Some(threshold);
            }
        }

        let monetary = [
            ("hourly_rate", self.settings.hourly_rate),
            ("fsc_rate", self.settings.fsc_rate),
            ("waiting_per_minute", self.settings.waiting_per_minute),
            ("admin_fee", self.settings.admin_fee),
        ];
        for (field, value) in monetary {
            if value < Decimal::ZERO {
                return Err(self.invalid(format!("{field} must not be negative, got {value}")));
            }
        }

        Ok(())
    }

    fn invalid(&self, message: String) -> EngineError {
        EngineError::InvalidContract {
            contract_id: self.id,
            message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    /// Helper function to create Decimal values from strings
    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn create_test_settings() -> DriverSettings {
        DriverSettings {
            num_pay_bands: 2,
            hourly_rate: dec("25.00"),
            fsc_rate: dec("0.08"),
            fsc_mode: FscMode::Percentage,
            waiting_per_minute: dec("0.50"),
            admin_fee: dec("45.00"),
            province: Province::Quebec,
            tax_profile: TaxProfile::quebec(),
        }
    }

    fn create_test_contract() -> DriverContract {
        DriverContract {
            id: Uuid::new_v4(),
            driver_id: "drv_001".to_string(),
            settings: create_test_settings(),
            rate_bands: vec![
                RateBand {
                    label: "Tier 1".to_string(),
                    rate: dec("1.20"),
                    mileage_threshold: Some(dec("500")),
                },
                RateBand {
                    label: "Base".to_string(),
                    rate: dec("0.95"),
                    mileage_threshold: None,
                },
            ],
            start_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            end_date: Some(NaiveDate::from_ymd_opt(2026, 1, 1).unwrap()),
        }
    }

    /// DC-001: covers is inclusive of start, exclusive of end
    #[test]
    fn test_covers_half_open_window() {
        let contract = create_test_contract();
        assert!(contract.covers(NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()));
        assert!(contract.covers(NaiveDate::from_ymd_opt(2025, 12, 31).unwrap()));
        assert!(!contract.covers(NaiveDate::from_ymd_opt(2026, 1, 1).unwrap()));
        assert!(!contract.covers(NaiveDate::from_ymd_opt(2024, 12, 31).unwrap()));
    }

    /// DC-002: open-ended contract covers any future date
    #[test]
    fn test_covers_open_ended() {
        let mut contract = create_test_contract();
        contract.end_date = None;
        assert!(contract.covers(NaiveDate::from_ymd_opt(2040, 6, 1).unwrap()));
        assert!(!contract.covers(NaiveDate::from_ymd_opt(2024, 12, 31).unwrap()));
    }

    /// DC-003: adjacent windows do not overlap
    #[test]
    fn test_adjacent_windows_do_not_overlap() {
        let first = create_test_contract();
        let mut second = create_test_contract();
        second.start_date = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        second.end_date = None;

        assert!(!first.overlaps(&second));
        assert!(!second.overlaps(&first));
    }

    #[test]
    fn test_overlapping_windows_detected() {
        let first = create_test_contract();
        let mut second = create_test_contract();
        second.start_date = NaiveDate::from_ymd_opt(2025, 7, 1).unwrap();
        second.end_date = None;

        assert!(first.overlaps(&second));
        assert!(second.overlaps(&first));
    }

    #[test]
    fn test_two_open_ended_contracts_overlap() {
        let mut first = create_test_contract();
        first.end_date = None;
        let mut second = create_test_contract();
        second.start_date = NaiveDate::from_ymd_opt(2025, 9, 1).unwrap();
        second.end_date = None;

        assert!(first.overlaps(&second));
    }

    /// DC-004: a well-formed contract validates
    #[test]
    fn test_validate_accepts_well_formed_contract() {
        let contract = create_test_contract();
        assert!(contract.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_end_before_start() {
        let mut contract = create_test_contract();
        contract.end_date = Some(NaiveDate::from_ymd_opt(2024, 12, 1).unwrap());
        let err = contract.validate().unwrap_err();
        assert!(err.to_string().contains("is not after start date"));
    }

    #[test]
    fn test_validate_rejects_band_count_mismatch() {
        let mut contract = create_test_contract();
        contract.settings.num_pay_bands = 3;
        let err = contract.validate().unwrap_err();
        assert!(err.to_string().contains("expected 3 rate bands, found 2"));
    }

    #[test]
    fn test_validate_rejects_missing_unbounded_band() {
        let mut contract = create_test_contract();
        contract.rate_bands[1].mileage_threshold = Some(dec("1000"));
        let err = contract.validate().unwrap_err();
        assert!(err.to_string().contains("exactly one unbounded rate band"));
    }

    #[test]
    fn test_validate_rejects_unbounded_band_not_last() {
        let mut contract = create_test_contract();
        contract.rate_bands.swap(0, 1);
        let err = contract.validate().unwrap_err();
        assert!(err.to_string().contains("must be last"));
    }

    #[test]
    fn test_validate_rejects_descending_thresholds() {
        let mut contract = create_test_contract();
        contract.settings.num_pay_bands = 3;
        contract.rate_bands.insert(
            1,
            RateBand {
                label: "Tier 2".to_string(),
                rate: dec("1.05"),
                mileage_threshold: Some(dec("300")),
            },
        );
        let err = contract.validate().unwrap_err();
        assert!(err.to_string().contains("strictly ascending"));
    }

    #[test]
    fn test_validate_rejects_negative_band_rate() {
        let mut contract = create_test_contract();
        contract.rate_bands[0].rate = dec("-1.20");
        let err = contract.validate().unwrap_err();
        assert!(err.to_string().contains("negative rate"));
    }

    #[test]
    fn test_validate_rejects_zero_threshold() {
        let mut contract = create_test_contract();
        contract.rate_bands[0].mileage_threshold = Some(Decimal::ZERO);
        let err = contract.validate().unwrap_err();
        assert!(err.to_string().contains("threshold must be positive"));
    }

    #[test]
    fn test_validate_rejects_negative_admin_fee() {
        let mut contract = create_test_contract();
        contract.settings.admin_fee = dec("-45.00");
        let err = contract.validate().unwrap_err();
        assert!(err.to_string().contains("admin_fee must not be negative"));
    }

    #[test]
    fn test_fsc_mode_serialization() {
        assert_eq!(serde_json::to_string(&FscMode::None).unwrap(), "\"none\"");
        assert_eq!(
            serde_json::to_string(&FscMode::Percentage).unwrap(),
            "\"percentage\""
        );
        assert_eq!(
            serde_json::to_string(&FscMode::SlidingScale).unwrap(),
            "\"sliding_scale\""
        );
    }

    #[test]
    fn test_fsc_mode_display_matches_serde() {
        assert_eq!(FscMode::SlidingScale.to_string(), "sliding_scale");
        assert_eq!(FscMode::Custom.to_string(), "custom");
    }

    #[test]
    fn test_contract_serde_round_trip() {
        let contract = create_test_contract();
        let json = serde_json::to_string(&contract).unwrap();
        assert!(json.contains("\"driver_id\":\"drv_001\""));
        assert!(json.contains("\"fsc_mode\":\"percentage\""));
        assert!(json.contains("\"mileage_threshold\":\"500\""));

        let deserialized: DriverContract = serde_json::from_str(&json).unwrap();
        assert_eq!(contract, deserialized);
    }

    #[test]
    fn test_deserialize_contract_from_json() {
        let json = r#"{
            "id": "12345678-1234-1234-1234-123456789012",
            "driver_id": "drv_002",
            "settings": {
                "num_pay_bands": 1,
                "hourly_rate": "28.00",
                "fsc_rate": "0",
                "fsc_mode": "none",
                "waiting_per_minute": "0.45",
                "admin_fee": "0",
                "province": "ON",
                "tax_profile": {
                    "gst_rate": "0",
                    "qst_rate": "0",
                    "pst_rate": "0",
                    "hst_rate": "0.13"
                }
            },
            "rate_bands": [
                { "label": "Base", "rate": "1.10", "mileage_threshold": null }
            ],
            "start_date": "2025-01-01",
            "end_date": null
        }"#;

        let contract: DriverContract = serde_json::from_str(json).unwrap();
        assert_eq!(contract.driver_id, "drv_002");
        assert_eq!(contract.settings.fsc_mode, FscMode::None);
        assert_eq!(contract.settings.province, Province::Ontario);
        assert!(contract.end_date.is_none());
        assert!(contract.validate().is_ok());
    }
}
