//! Configuration loading functionality.
//!
//! This module provides the [`TaxTableLoader`] type for loading dated
//! provincial tax tables from YAML files.

use chrono::NaiveDate;
use std::fs;
use std::path::Path;

use crate::error::{EngineError, EngineResult};
use crate::models::{Province, TaxProfile};

use super::types::TaxTableFile;

/// Loads and provides access to dated provincial tax tables.
///
/// The `TaxTableLoader` reads every `*.yaml` file in a directory. Each
/// file carries an `effective_date` and one profile per province, and a
/// lookup answers "which profile applied in this province on this date"
/// by picking the most recent table effective on or before the date.
///
/// # Directory Structure
///
/// ```text
/// config/tax_tables/
/// ├── 2024-01-01.yaml
/// └── 2025-04-01.yaml
/// ```
///
/// # Example
///
/// ```no_run
/// use fleetpay_engine::config::TaxTableLoader;
/// use fleetpay_engine::models::Province;
/// use chrono::NaiveDate;
///
/// let loader = TaxTableLoader::load("./config/tax_tables")?;
/// let date = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
/// let profile = loader.profile_for(Province::Quebec, date)?;
/// println!("QST rate: {}", profile.qst_rate);
/// # Ok::<(), fleetpay_engine::error::EngineError>(())
/// ```
#[derive(Debug, Clone)]
pub struct TaxTableLoader {
    tables: Vec<TaxTableFile>,
}

impl TaxTableLoader {
    /// Loads every tax table file from the specified directory.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::ConfigNotFound`] if the directory is missing
    /// or holds no `*.yaml` files, [`EngineError::ConfigParseError`] if a
    /// file is not valid YAML, and [`EngineError::InvalidTaxRate`] if any
    /// loaded profile carries a rate outside `[0, 1]`.
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let dir = path.as_ref();
        let dir_str = dir.display().to_string();

        if !dir.exists() {
            return Err(EngineError::ConfigNotFound { path: dir_str });
        }

        let entries = fs::read_dir(dir).map_err(|_| EngineError::ConfigNotFound {
            path: dir_str.clone(),
        })?;

        let mut tables = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|_| EngineError::ConfigNotFound {
                path: dir_str.clone(),
            })?;

            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "yaml") {
                tables.push(Self::load_yaml::<TaxTableFile>(&path)?);
            }
        }

        if tables.is_empty() {
            return Err(EngineError::ConfigNotFound {
                path: format!("{} (no tax table files found)", dir_str),
            });
        }

        // Directory read order is unspecified; date lookups need ascending order.
        tables.sort_by_key(|t| t.effective_date);

        // Bad rates should fail at load time, not in the middle of a batch run.
        for table in &tables {
            for profile in table.profiles.values() {
                profile.validate()?;
            }
        }

        Ok(Self { tables })
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Gets the tax profile for a province on a given date.
    ///
    /// The method finds the most recent table effective on or before the
    /// date, then the province's entry within it.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::TaxProfileNotFound`] if no table is effective
    /// on the date or the table has no entry for the province.
    pub fn profile_for(&self, province: Province, date: NaiveDate) -> EngineResult<TaxProfile> {
        let table = self
            .tables
            .iter()
            .rev()
            .find(|t| t.effective_date <= date)
            .ok_or(EngineError::TaxProfileNotFound { province, date })?;

        table
            .profiles
            .get(&province)
            .cloned()
            .ok_or(EngineError::TaxProfileNotFound { province, date })
    }

    /// The effective dates of the loaded tables, ascending.
    pub fn effective_dates(&self) -> Vec<NaiveDate> {
        self.tables.iter().map(|t| t.effective_date).collect()
    }
}
