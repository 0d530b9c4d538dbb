//! Tax profile and jurisdiction models.
//!
//! This module defines the [`TaxProfile`] struct holding the sales tax
//! components applied to a settlement and the [`Province`] enum covering
//! the Canadian jurisdictions the engine ships profiles for.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{EngineError, EngineResult};

/// The sales tax components applied to a driver settlement.
///
/// All rates are fractions (0.05 means 5%). A profile carries every
/// component; jurisdictions that don't levy one simply leave it at zero,
/// so the tax engine never needs to branch on province.
///
/// When `compound_qst_over_gst` is set, QST is computed on the base plus
/// the GST already charged rather than on the base alone. PST and HST are
/// never compounded.
///
/// # Example
///
/// ```
/// use fleetpay_engine::models::TaxProfile;
/// use rust_decimal::Decimal;
///
/// let quebec = TaxProfile::quebec();
/// assert_eq!(quebec.gst_rate, Decimal::new(5, 2));
/// assert!(quebec.compound_qst_over_gst);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxProfile {
    /// Federal goods and services tax rate.
    pub gst_rate: Decimal,
    /// Quebec sales tax rate.
    pub qst_rate: Decimal,
    /// Provincial sales tax rate.
    pub pst_rate: Decimal,
    /// Harmonized sales tax rate (replaces GST + PST where levied).
    pub hst_rate: Decimal,
    /// Whether QST is computed on the GST-inclusive base.
    #[serde(default)]
    pub compound_qst_over_gst: bool,
}

impl TaxProfile {
    /// GST 5% + QST 9.975%, QST compounded over GST.
    pub fn quebec() -> Self {
        Self {
            gst_rate: Decimal::new(5, 2),
            qst_rate: Decimal::new(9975, 5),
            pst_rate: Decimal::ZERO,
            hst_rate: Decimal::ZERO,
            compound_qst_over_gst: true,
        }
    }

    /// HST 13%.
    pub fn ontario() -> Self {
        Self::hst_only(Decimal::new(13, 2))
    }

    /// GST 5% only, no provincial component.
    pub fn alberta() -> Self {
        Self::gst_only()
    }

    /// GST 5% + PST 7%.
    pub fn british_columbia() -> Self {
        Self::gst_plus_pst(Decimal::new(7, 2))
    }

    /// GST 5% + PST 6%.
    pub fn saskatchewan() -> Self {
        Self::gst_plus_pst(Decimal::new(6, 2))
    }

    /// GST 5% + RST 7% (Manitoba's retail sales tax, carried as PST).
    pub fn manitoba() -> Self {
        Self::gst_plus_pst(Decimal::new(7, 2))
    }

    /// HST 15%.
    pub fn new_brunswick() -> Self {
        Self::hst_only(Decimal::new(15, 2))
    }

    /// HST 14% (rate effective April 2025; earlier books use the tax tables).
    pub fn nova_scotia() -> Self {
        Self::hst_only(Decimal::new(14, 2))
    }

    /// HST 15%.
    pub fn prince_edward_island() -> Self {
        Self::hst_only(Decimal::new(15, 2))
    }

    /// HST 15%.
    pub fn newfoundland_and_labrador() -> Self {
        Self::hst_only(Decimal::new(15, 2))
    }

    /// GST 5% with no provincial component (territories, Alberta).
    pub fn gst_only() -> Self {
        Self {
            gst_rate: Decimal::new(5, 2),
            qst_rate: Decimal::ZERO,
            pst_rate: Decimal::ZERO,
            hst_rate: Decimal::ZERO,
            compound_qst_over_gst: false,
        }
    }

    /// All components zero, for zero-rated or exempt settlements.
    pub fn zero_rated() -> Self {
        Self {
            gst_rate: Decimal::ZERO,
            qst_rate: Decimal::ZERO,
            pst_rate: Decimal::ZERO,
            hst_rate: Decimal::ZERO,
            compound_qst_over_gst: false,
        }
    }

    fn hst_only(hst_rate: Decimal) -> Self {
        Self {
            gst_rate: Decimal::ZERO,
            qst_rate: Decimal::ZERO,
            pst_rate: Decimal::ZERO,
            hst_rate,
            compound_qst_over_gst: false,
        }
    }

    fn gst_plus_pst(pst_rate: Decimal) -> Self {
        Self {
            gst_rate: Decimal::new(5, 2),
            qst_rate: Decimal::ZERO,
            pst_rate,
            hst_rate: Decimal::ZERO,
            compound_qst_over_gst: false,
        }
    }

    /// Validates that every component rate is a fraction in `[0, 1]`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidTaxRate`] naming the first component
    /// whose rate falls outside the range.
    pub fn validate(&self) -> EngineResult<()> {
        let components = [
            ("gst", self.gst_rate),
            ("qst", self.qst_rate),
            ("pst", self.pst_rate),
            ("hst", self.hst_rate),
        ];
        for (component, rate) in components {
            if rate < Decimal::ZERO || rate > Decimal::ONE {
                return Err(EngineError::InvalidTaxRate {
                    component: component.to_string(),
                    rate,
                });
            }
        }
        Ok(())
    }
}

/// Canadian provinces and territories, serialized as two-letter codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Province {
    /// Alberta.
    #[serde(rename = "AB")]
    Alberta,
    /// British Columbia.
    #[serde(rename = "BC")]
    BritishColumbia,
    /// Manitoba.
    #[serde(rename = "MB")]
    Manitoba,
    /// New Brunswick.
    #[serde(rename = "NB")]
    NewBrunswick,
    /// Newfoundland and Labrador.
    #[serde(rename = "NL")]
    NewfoundlandAndLabrador,
    /// Northwest Territories.
    #[serde(rename = "NT")]
    NorthwestTerritories,
    /// Nova Scotia.
    #[serde(rename = "NS")]
    NovaScotia,
    /// Nunavut.
    #[serde(rename = "NU")]
    Nunavut,
    /// Ontario.
    #[serde(rename = "ON")]
    Ontario,
    /// Prince Edward Island.
    #[serde(rename = "PE")]
    PrinceEdwardIsland,
    /// Quebec.
    #[serde(rename = "QC")]
    Quebec,
    /// Saskatchewan.
    #[serde(rename = "SK")]
    Saskatchewan,
    /// Yukon.
    #[serde(rename = "YT")]
    Yukon,
}

impl Province {
    /// The two-letter postal code for the province.
    pub fn code(&self) -> &'static str {
        match self {
            Province::Alberta => "AB",
            Province::BritishColumbia => "BC",
            Province::Manitoba => "MB",
            Province::NewBrunswick => "NB",
            Province::NewfoundlandAndLabrador => "NL",
            Province::NorthwestTerritories => "NT",
            Province::NovaScotia => "NS",
            Province::Nunavut => "NU",
            Province::Ontario => "ON",
            Province::PrinceEdwardIsland => "PE",
            Province::Quebec => "QC",
            Province::Saskatchewan => "SK",
            Province::Yukon => "YT",
        }
    }

    /// The built-in standard tax profile for the province.
    ///
    /// Contract editors use this as the default when creating driver
    /// settings; effective-dated overrides come from the tax tables.
    pub fn standard_profile(&self) -> TaxProfile {
        match self {
            Province::Alberta => TaxProfile::alberta(),
            Province::BritishColumbia => TaxProfile::british_columbia(),
            Province::Manitoba => TaxProfile::manitoba(),
            Province::NewBrunswick => TaxProfile::new_brunswick(),
            Province::NewfoundlandAndLabrador => TaxProfile::newfoundland_and_labrador(),
            Province::NorthwestTerritories => TaxProfile::gst_only(),
            Province::NovaScotia => TaxProfile::nova_scotia(),
            Province::Nunavut => TaxProfile::gst_only(),
            Province::Ontario => TaxProfile::ontario(),
            Province::PrinceEdwardIsland => TaxProfile::prince_edward_island(),
            Province::Quebec => TaxProfile::quebec(),
            Province::Saskatchewan => TaxProfile::saskatchewan(),
            Province::Yukon => TaxProfile::gst_only(),
        }
    }
}

impl fmt::Display for Province {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
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

    /// TP-001: Quebec profile compounds QST over GST
    #[test]
    fn test_quebec_profile_rates() {
        let profile = TaxProfile::quebec();
        assert_eq!(profile.gst_rate, dec("0.05"));
        assert_eq!(profile.qst_rate, dec("0.09975"));
        assert_eq!(profile.pst_rate, Decimal::ZERO);
        assert_eq!(profile.hst_rate, Decimal::ZERO);
        assert!(profile.compound_qst_over_gst);
    }

    /// TP-002: HST provinces carry a single harmonized component
    #[test]
    fn test_hst_profiles() {
        assert_eq!(TaxProfile::ontario().hst_rate, dec("0.13"));
        assert_eq!(TaxProfile::new_brunswick().hst_rate, dec("0.15"));
        assert_eq!(TaxProfile::nova_scotia().hst_rate, dec("0.14"));
        assert_eq!(TaxProfile::prince_edward_island().hst_rate, dec("0.15"));
        assert_eq!(TaxProfile::newfoundland_and_labrador().hst_rate, dec("0.15"));
        assert_eq!(TaxProfile::ontario().gst_rate, Decimal::ZERO);
    }

    /// TP-003: PST provinces stack PST on GST without compounding
    #[test]
    fn test_pst_profiles() {
        let bc = TaxProfile::british_columbia();
        assert_eq!(bc.gst_rate, dec("0.05"));
        assert_eq!(bc.pst_rate, dec("0.07"));
        assert!(!bc.compound_qst_over_gst);

        assert_eq!(TaxProfile::saskatchewan().pst_rate, dec("0.06"));
        assert_eq!(TaxProfile::manitoba().pst_rate, dec("0.07"));
    }

    #[test]
    fn test_zero_rated_profile_is_all_zero() {
        let profile = TaxProfile::zero_rated();
        assert_eq!(profile.gst_rate, Decimal::ZERO);
        assert_eq!(profile.qst_rate, Decimal::ZERO);
        assert_eq!(profile.pst_rate, Decimal::ZERO);
        assert_eq!(profile.hst_rate, Decimal::ZERO);
    }

    /// TP-004: validate accepts fractional rates
    #[test]
    fn test_validate_accepts_standard_profiles() {
        assert!(TaxProfile::quebec().validate().is_ok());
        assert!(TaxProfile::ontario().validate().is_ok());
        assert!(TaxProfile::gst_only().validate().is_ok());
        assert!(TaxProfile::zero_rated().validate().is_ok());
    }

    /// TP-005: validate rejects rates outside [0, 1]
    #[test]
    fn test_validate_rejects_rate_above_one() {
        let mut profile = TaxProfile::quebec();
        profile.qst_rate = dec("1.5");

        let err = profile.validate().unwrap_err();
        match err {
            EngineError::InvalidTaxRate { component, rate } => {
                assert_eq!(component, "qst");
                assert_eq!(rate, dec("1.5"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_validate_rejects_negative_rate() {
        let mut profile = TaxProfile::ontario();
        profile.hst_rate = dec("-0.13");
        assert!(profile.validate().is_err());
    }

    #[test]
    fn test_validate_accepts_boundary_rates() {
        let mut profile = TaxProfile::zero_rated();
        profile.gst_rate = Decimal::ONE;
        assert!(profile.validate().is_ok());
    }

    #[test]
    fn test_province_serializes_as_postal_code() {
        assert_eq!(serde_json::to_string(&Province::Quebec).unwrap(), "\"QC\"");
        assert_eq!(serde_json::to_string(&Province::Ontario).unwrap(), "\"ON\"");
        assert_eq!(
            serde_json::to_string(&Province::NewfoundlandAndLabrador).unwrap(),
            "\"NL\""
        );
    }

    #[test]
    fn test_province_deserializes_from_postal_code() {
        let province: Province = serde_json::from_str("\"BC\"").unwrap();
        assert_eq!(province, Province::BritishColumbia);
    }

    #[test]
    fn test_province_display_matches_code() {
        assert_eq!(Province::Quebec.to_string(), "QC");
        assert_eq!(Province::NorthwestTerritories.to_string(), "NT");
    }

    #[test]
    fn test_standard_profile_per_province() {
        assert_eq!(Province::Quebec.standard_profile(), TaxProfile::quebec());
        assert_eq!(Province::Ontario.standard_profile(), TaxProfile::ontario());
        assert_eq!(Province::Yukon.standard_profile(), TaxProfile::gst_only());
        assert_eq!(Province::Nunavut.standard_profile(), TaxProfile::gst_only());
    }

    #[test]
    fn test_profile_serde_round_trip() {
        let profile = TaxProfile::quebec();
        let json = serde_json::to_string(&profile).unwrap();
        assert!(json.contains("\"gst_rate\":\"0.05\""));
        assert!(json.contains("\"compound_qst_over_gst\":true"));

        let deserialized: TaxProfile = serde_json::from_str(&json).unwrap();
        assert_eq!(profile, deserialized);
    }

    #[test]
    fn test_profile_deserialize_defaults_compound_flag() {
        let json = r#"{
            "gst_rate": "0.05",
            "qst_rate": "0",
            "pst_rate": "0.07",
            "hst_rate": "0"
        }"#;
        let profile: TaxProfile = serde_json::from_str(json).unwrap();
        assert!(!profile.compound_qst_over_gst);
        assert_eq!(profile.pst_rate, dec("0.07"));
    }
}
