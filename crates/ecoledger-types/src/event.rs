//! Structured events emitted by successful balance operations.
//!
//! Events are returned to the caller only after an operation commits, so a
//! failed operation never produces any.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::Address;

/// Credits moved from one holder to another.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventTransfer {
    pub sender: Address,
    pub recipient: Address,
    pub batch_denom: String,
    pub tradable_amount: String,
    pub retired_amount: String,
}

/// Credits retired on behalf of `owner`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRetire {
    pub owner: Address,
    pub batch_denom: String,
    pub amount: String,
    pub jurisdiction: String,
}

/// Credits permanently removed from circulation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventCancel {
    pub owner: Address,
    pub batch_denom: String,
    pub amount: String,
    pub reason: String,
}

/// Any event the ledger emits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LedgerEvent {
    Transfer(EventTransfer),
    Retire(EventRetire),
    Cancel(EventCancel),
}

impl LedgerEvent {
    /// Denom of the batch the event concerns.
    #[must_use]
    pub fn batch_denom(&self) -> &str {
        match self {
            Self::Transfer(e) => &e.batch_denom,
            Self::Retire(e) => &e.batch_denom,
            Self::Cancel(e) => &e.batch_denom,
        }
    }
}

impl fmt::Display for LedgerEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transfer(_) => write!(f, "TRANSFER"),
            Self::Retire(_) => write!(f, "RETIRE"),
            Self::Cancel(_) => write!(f, "CANCEL"),
        }
    }
}
