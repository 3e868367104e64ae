//! Registry records: credit types, classes, projects and batches.
//!
//! These records form the lookup chain `batch → project → class → credit
//! type` that fixes the [`Precision`] of every amount in a batch. None of
//! them is mutated by the balance protocols.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::MAX_ABBREVIATION_LENGTH;
use crate::{Address, BatchKey, ClassKey, LedgerError, Precision, ProjectKey, Result};

/// A kind of credit (e.g. carbon) and the precision its amounts use.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreditType {
    /// Short uppercase code, e.g. `"C"`.
    pub abbreviation: String,
    /// Human-readable name.
    #[serde(default)]
    pub name: String,
    /// Measurement unit, e.g. `"metric ton CO2 equivalent"`.
    #[serde(default)]
    pub unit: String,
    /// Maximum fractional digits of any amount of this type.
    pub precision: u32,
}

impl CreditType {
    /// The validated precision of this credit type.
    ///
    /// # Errors
    /// Returns [`LedgerError::InvalidPrecision`] if the stored value is not
    /// one of the permitted precisions.
    pub fn precision(&self) -> Result<Precision> {
        Precision::new(self.precision)
    }

    /// Stateless validation of the record.
    ///
    /// # Errors
    /// Returns `InvalidRequest` for a malformed abbreviation and
    /// `InvalidPrecision` for a precision outside the permitted set.
    pub fn validate(&self) -> Result<()> {
        validate_abbreviation(&self.abbreviation)?;
        self.precision().map(|_| ())
    }
}

/// Credit type abbreviations are 1–3 uppercase ASCII letters.
///
/// # Errors
/// Returns [`LedgerError::InvalidRequest`] otherwise.
pub fn validate_abbreviation(abbreviation: &str) -> Result<()> {
    let len = abbreviation.len();
    if len == 0
        || len > MAX_ABBREVIATION_LENGTH
        || !abbreviation.bytes().all(|b| b.is_ascii_uppercase())
    {
        return Err(LedgerError::invalid_request(format!(
            "credit type abbreviation must be 1-{MAX_ABBREVIATION_LENGTH} uppercase letters, got {abbreviation:?}"
        )));
    }
    Ok(())
}

/// A credit class; every class issues exactly one credit type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Class {
    pub key: ClassKey,
    /// Public identifier, e.g. `"C01"`.
    pub id: String,
    pub admin: Address,
    pub credit_type_abbrev: String,
}

/// A project issuing credits under one class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub key: ProjectKey,
    /// Public identifier, e.g. `"C01-001"`.
    pub id: String,
    pub class_key: ClassKey,
    #[serde(default)]
    pub jurisdiction: String,
    pub admin: Address,
}

/// A time-bounded issuance cohort of credits from one project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Batch {
    pub key: BatchKey,
    /// Unique public denomination, e.g. `"C01-001-20200101-20210101-001"`.
    pub denom: String,
    pub project_key: ProjectKey,
    pub issuer: Address,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    /// Whether further issuance is permitted.
    #[serde(default)]
    pub open: bool,
}

impl Batch {
    /// Stateless validation of the record.
    ///
    /// # Errors
    /// Returns `InvalidRequest` if the denom is empty or the end date does
    /// not fall after the start date.
    pub fn validate(&self) -> Result<()> {
        if self.denom.trim().is_empty() {
            return Err(LedgerError::invalid_request("batch denom cannot be empty"));
        }
        if self.end_date <= self.start_date {
            return Err(LedgerError::invalid_request(format!(
                "batch {} end date {} must be after start date {}",
                self.denom, self.end_date, self.start_date
            )));
        }
        Ok(())
    }

    /// Close the batch to further issuance. Sealing is one-way.
    pub fn seal(&mut self) {
        self.open = false;
    }
}

// ---------------------------------------------------------------------------
// Test helpers
// ---------------------------------------------------------------------------

#[cfg(any(test, feature = "test-helpers"))]
impl CreditType {
    /// Carbon credit type with the given precision.
    #[must_use]
    pub fn dummy(precision: u32) -> Self {
        Self {
            abbreviation: "C".to_string(),
            name: "carbon".to_string(),
            unit: "metric ton CO2 equivalent".to_string(),
            precision,
        }
    }
}

#[cfg(any(test, feature = "test-helpers"))]
impl Batch {
    /// An open batch covering calendar year 2020.
    #[must_use]
    pub fn dummy(key: BatchKey, denom: &str, project_key: ProjectKey) -> Self {
        use chrono::TimeZone;

        Self {
            key,
            denom: denom.to_string(),
            project_key,
            issuer: Address::new("regen1issuer"),
            start_date: Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap(),
            end_date: Utc.with_ymd_and_hms(2021, 1, 1, 0, 0, 0).unwrap(),
            open: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credit_type_validation() {
        assert!(CreditType::dummy(6).validate().is_ok());
        assert!(matches!(
            CreditType::dummy(5).validate().unwrap_err(),
            LedgerError::InvalidPrecision(5)
        ));
        let mut ct = CreditType::dummy(6);
        ct.abbreviation = "carbon".into();
        assert!(ct.validate().is_err());
        ct.abbreviation = String::new();
        assert!(ct.validate().is_err());
        ct.abbreviation = "BIO".into();
        assert!(ct.validate().is_ok());
    }

    #[test]
    fn batch_dates_must_be_ordered() {
        let mut batch = Batch::dummy(BatchKey(1), "C01-001-2020-001", ProjectKey(1));
        assert!(batch.validate().is_ok());
        batch.end_date = batch.start_date;
        assert!(batch.validate().is_err());
    }

    #[test]
    fn sealing_is_one_way() {
        let mut batch = Batch::dummy(BatchKey(1), "C01-001-2020-001", ProjectKey(1));
        assert!(batch.open);
        batch.seal();
        assert!(!batch.open);
        batch.seal();
        assert!(!batch.open);
    }

    #[test]
    fn credit_type_defaults_optional_fields() {
        let ct: CreditType =
            serde_json::from_str(r#"{"abbreviation":"C","precision":6}"#).unwrap();
        assert_eq!(ct.precision().unwrap().digits(), 6);
        assert!(ct.name.is_empty());
    }
}
