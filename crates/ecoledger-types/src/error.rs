//! Error types for the ecoledger accounting core.
//!
//! All errors use the `EL_ERR_` prefix convention for easy grepping in logs.
//! Error codes are grouped by subsystem:
//! - 1xx: Lookup errors (batch, class, project, credit type, balance)
//! - 2xx: Amount errors (syntax, precision)
//! - 3xx: Balance errors
//! - 4xx: Request errors
//! - 5xx: Genesis errors
//! - 9xx: General / internal errors

use std::fmt;

use thiserror::Error;

use crate::{Address, Amount, BatchKey, ClassKey, ProjectKey};

/// Coarse classification of every [`LedgerError`].
///
/// Callers that only care about *what kind* of failure happened (for
/// example to map onto a response code) match on this instead of on the
/// individual variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A batch, class, project, credit type or balance is missing.
    NotFound,
    /// An amount is not a well-formed non-negative decimal.
    InvalidAmount,
    /// An amount has more fractional digits than its credit type allows.
    PrecisionExceeded,
    /// A subtraction would drive a balance or supply negative.
    InsufficientBalance,
    /// Declared and calculated supply disagree (genesis only).
    SupplyMismatch,
    /// A request or record failed stateless validation.
    InvalidRequest,
    /// Serialization, configuration or I/O failure.
    Internal,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "NOT_FOUND"),
            Self::InvalidAmount => write!(f, "INVALID_AMOUNT"),
            Self::PrecisionExceeded => write!(f, "PRECISION_EXCEEDED"),
            Self::InsufficientBalance => write!(f, "INSUFFICIENT_BALANCE"),
            Self::SupplyMismatch => write!(f, "SUPPLY_MISMATCH"),
            Self::InvalidRequest => write!(f, "INVALID_REQUEST"),
            Self::Internal => write!(f, "INTERNAL"),
        }
    }
}

/// Central error enum for all ecoledger operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    // =================================================================
    // Lookup Errors (1xx)
    // =================================================================
    /// No batch carries this denom.
    #[error("EL_ERR_100: Batch not found: {denom}")]
    BatchNotFound { denom: String },

    /// No batch carries this surrogate key.
    #[error("EL_ERR_101: Batch not found for key {0}")]
    BatchKeyNotFound(BatchKey),

    /// The project referenced by a batch does not exist.
    #[error("EL_ERR_102: Project not found: {0}")]
    ProjectNotFound(ProjectKey),

    /// The class referenced by a project does not exist.
    #[error("EL_ERR_103: Class not found: {0}")]
    ClassNotFound(ClassKey),

    /// The credit type referenced by a class does not exist.
    #[error("EL_ERR_104: Credit type not found: {abbreviation}")]
    CreditTypeNotFound { abbreviation: String },

    /// The holder has no balance record for the batch.
    #[error("EL_ERR_105: No {batch_denom} balance for {address}")]
    BalanceNotFound {
        address: Address,
        batch_denom: String,
    },

    /// The batch has no supply record.
    #[error("EL_ERR_106: Supply not found for batch {batch_denom}")]
    SupplyNotFound { batch_denom: String },

    // =================================================================
    // Amount Errors (2xx)
    // =================================================================
    /// Not a well-formed non-negative base-10 number, or out of range.
    #[error("EL_ERR_200: Invalid amount {value:?}: {reason}")]
    InvalidAmount { value: String, reason: String },

    /// More fractional digits than the credit type permits.
    #[error("EL_ERR_201: Amount {value} exceeds precision of {precision} decimal places")]
    PrecisionExceeded { value: String, precision: u32 },

    /// A credit type declares a precision outside the permitted set.
    #[error("EL_ERR_202: Invalid precision {0}")]
    InvalidPrecision(u32),

    // =================================================================
    // Balance Errors (3xx)
    // =================================================================
    /// Subtraction would produce a negative value.
    #[error("EL_ERR_300: Insufficient balance: need {needed}, have {available}")]
    InsufficientBalance { needed: Amount, available: Amount },

    // =================================================================
    // Request Errors (4xx)
    // =================================================================
    /// The request failed stateless validation.
    #[error("EL_ERR_400: Invalid request: {reason}")]
    InvalidRequest { reason: String },

    /// A record with this key already exists.
    #[error("EL_ERR_401: Duplicate record: {reason}")]
    DuplicateRecord { reason: String },

    // =================================================================
    // Genesis Errors (5xx)
    // =================================================================
    /// Declared supply differs from the supply calculated from balances.
    #[error(
        "EL_ERR_500: Supply mismatch for batch {batch_denom}: declared {declared}, calculated {calculated}"
    )]
    SupplyMismatch {
        batch_denom: String,
        declared: Amount,
        calculated: Amount,
    },

    /// Supply records exist but no balance records do.
    #[error("EL_ERR_501: Batch supply was given but no balances were found")]
    SupplyWithoutBalances,

    /// Balance records exist but no supply records do.
    #[error("EL_ERR_502: Batch balances were given but no supplies were found")]
    BalancesWithoutSupply,

    /// A snapshot record is structurally invalid.
    #[error("EL_ERR_503: Invalid genesis: {reason}")]
    InvalidGenesis { reason: String },

    // =================================================================
    // General / Internal (9xx)
    // =================================================================
    /// Serialization / deserialization error.
    #[error("EL_ERR_901: Serialization error: {0}")]
    Serialization(String),

    /// Configuration error (invalid config file, missing fields, etc.).
    #[error("EL_ERR_902: Configuration error: {0}")]
    Configuration(String),

    /// I/O error.
    #[error("EL_ERR_903: I/O error: {0}")]
    Io(String),
}

impl LedgerError {
    /// Project this error onto its [`ErrorKind`].
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::BatchNotFound { .. }
            | Self::BatchKeyNotFound(_)
            | Self::ProjectNotFound(_)
            | Self::ClassNotFound(_)
            | Self::CreditTypeNotFound { .. }
            | Self::BalanceNotFound { .. }
            | Self::SupplyNotFound { .. } => ErrorKind::NotFound,
            Self::InvalidAmount { .. } => ErrorKind::InvalidAmount,
            Self::PrecisionExceeded { .. } => ErrorKind::PrecisionExceeded,
            Self::InsufficientBalance { .. } => ErrorKind::InsufficientBalance,
            Self::SupplyMismatch { .. }
            | Self::SupplyWithoutBalances
            | Self::BalancesWithoutSupply => ErrorKind::SupplyMismatch,
            Self::InvalidPrecision(_)
            | Self::InvalidRequest { .. }
            | Self::DuplicateRecord { .. }
            | Self::InvalidGenesis { .. } => ErrorKind::InvalidRequest,
            Self::Serialization(_) | Self::Configuration(_) | Self::Io(_) => ErrorKind::Internal,
        }
    }

    /// Shorthand for [`LedgerError::InvalidRequest`].
    pub fn invalid_request(reason: impl Into<String>) -> Self {
        Self::InvalidRequest {
            reason: reason.into(),
        }
    }
}

/// Crate-wide `Result` alias.
pub type Result<T> = std::result::Result<T, LedgerError>;

impl From<std::io::Error> for LedgerError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for LedgerError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Precision;

    #[test]
    fn error_display_contains_prefix() {
        let err = LedgerError::BatchNotFound {
            denom: "C01-001-20200101-20210101-001".into(),
        };
        let msg = format!("{err}");
        assert!(msg.starts_with("EL_ERR_100"), "Got: {msg}");
        assert!(msg.contains("C01-001"));
    }

    #[test]
    fn insufficient_balance_display() {
        let err = LedgerError::InsufficientBalance {
            needed: Amount::parse("100", Precision::ZERO).unwrap(),
            available: Amount::parse("50", Precision::ZERO).unwrap(),
        };
        let msg = format!("{err}");
        assert!(msg.contains("EL_ERR_300"));
        assert!(msg.contains("100"));
        assert!(msg.contains("50"));
    }

    #[test]
    fn kinds_group_variants() {
        assert_eq!(
            LedgerError::ClassNotFound(ClassKey(3)).kind(),
            ErrorKind::NotFound
        );
        assert_eq!(
            LedgerError::SupplyWithoutBalances.kind(),
            ErrorKind::SupplyMismatch
        );
        assert_eq!(
            LedgerError::PrecisionExceeded {
                value: "1.234".into(),
                precision: 2
            }
            .kind(),
            ErrorKind::PrecisionExceeded
        );
        assert_eq!(
            LedgerError::invalid_request("empty owner").kind(),
            ErrorKind::InvalidRequest
        );
    }

    #[test]
    fn all_errors_have_el_err_prefix() {
        let errors: Vec<Box<dyn std::error::Error>> = vec![
            Box::new(LedgerError::SupplyWithoutBalances),
            Box::new(LedgerError::BalancesWithoutSupply),
            Box::new(LedgerError::InvalidPrecision(5)),
            Box::new(LedgerError::Configuration("test".into())),
            Box::new(LedgerError::SupplyMismatch {
                batch_denom: "A".into(),
                declared: Amount::parse("1", Precision::ZERO).unwrap(),
                calculated: Amount::ZERO,
            }),
        ];
        for err in errors {
            let msg = format!("{err}");
            assert!(
                msg.starts_with("EL_ERR_"),
                "Error missing EL_ERR_ prefix: {msg}"
            );
        }
    }

    #[test]
    fn serde_json_error_converts() {
        let err: LedgerError = serde_json::from_str::<u32>("nope").unwrap_err().into();
        assert_eq!(err.kind(), ErrorKind::Internal);
    }
}
