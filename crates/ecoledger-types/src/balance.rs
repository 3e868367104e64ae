//! Balance records and their decoded views.
//!
//! At rest every amount is a base-10 string, so the precision rule of the
//! owning credit type is re-checked each time a record is read. The
//! protocols work on the decoded [`SupplyAmounts`] / [`BalanceAmounts`]
//! and encode them back before writing.

use serde::{Deserialize, Serialize};

use crate::{Address, Amount, BatchKey, Precision, Result};

fn zero() -> String {
    "0".to_string()
}

// ---------------------------------------------------------------------------
// BatchSupply
// ---------------------------------------------------------------------------

/// Aggregate supply of one batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchSupply {
    pub batch_key: BatchKey,
    #[serde(default = "zero")]
    pub tradable_amount: String,
    #[serde(default = "zero")]
    pub retired_amount: String,
    #[serde(default = "zero")]
    pub cancelled_amount: String,
}

impl BatchSupply {
    /// The all-zero supply a batch starts with.
    #[must_use]
    pub fn zero(batch_key: BatchKey) -> Self {
        Self {
            batch_key,
            tradable_amount: zero(),
            retired_amount: zero(),
            cancelled_amount: zero(),
        }
    }
}

/// Decoded amounts of a [`BatchSupply`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SupplyAmounts {
    pub tradable: Amount,
    pub retired: Amount,
    pub cancelled: Amount,
}

impl SupplyAmounts {
    /// Parse every pool of `record` at `precision`.
    pub fn decode(record: &BatchSupply, precision: Precision) -> Result<Self> {
        Ok(Self {
            tradable: Amount::parse_or_zero(&record.tradable_amount, precision)?,
            retired: Amount::parse_or_zero(&record.retired_amount, precision)?,
            cancelled: Amount::parse_or_zero(&record.cancelled_amount, precision)?,
        })
    }

    /// Supply still accounted for by holders: tradable + retired.
    pub fn circulating(&self) -> Result<Amount> {
        self.tradable.add(self.retired)
    }

    #[must_use]
    pub fn encode(&self, batch_key: BatchKey) -> BatchSupply {
        BatchSupply {
            batch_key,
            tradable_amount: self.tradable.to_string(),
            retired_amount: self.retired.to_string(),
            cancelled_amount: self.cancelled.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// BatchBalance
// ---------------------------------------------------------------------------

/// One holder's pools in one batch. A missing record reads as all-zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchBalance {
    pub batch_key: BatchKey,
    pub address: Address,
    #[serde(default = "zero")]
    pub tradable_amount: String,
    #[serde(default = "zero")]
    pub retired_amount: String,
    /// Held in custody by the basket subsystem on the holder's behalf.
    #[serde(default = "zero")]
    pub escrowed_amount: String,
}

impl BatchBalance {
    #[must_use]
    pub fn zero(batch_key: BatchKey, address: Address) -> Self {
        Self {
            batch_key,
            address,
            tradable_amount: zero(),
            retired_amount: zero(),
            escrowed_amount: zero(),
        }
    }
}

/// Decoded amounts of a [`BatchBalance`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BalanceAmounts {
    pub tradable: Amount,
    pub retired: Amount,
    pub escrowed: Amount,
}

impl BalanceAmounts {
    pub fn decode(record: &BatchBalance, precision: Precision) -> Result<Self> {
        Ok(Self {
            tradable: Amount::parse_or_zero(&record.tradable_amount, precision)?,
            retired: Amount::parse_or_zero(&record.retired_amount, precision)?,
            escrowed: Amount::parse_or_zero(&record.escrowed_amount, precision)?,
        })
    }

    /// tradable + retired + escrowed.
    pub fn total(&self) -> Result<Amount> {
        self.tradable.add(self.retired)?.add(self.escrowed)
    }

    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.tradable.is_zero() && self.retired.is_zero() && self.escrowed.is_zero()
    }

    #[must_use]
    pub fn encode(&self, batch_key: BatchKey, address: Address) -> BatchBalance {
        BatchBalance {
            batch_key,
            address,
            tradable_amount: self.tradable.to_string(),
            retired_amount: self.retired.to_string(),
            escrowed_amount: self.escrowed.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// BasketBalance
// ---------------------------------------------------------------------------

/// Credits of one batch held by a basket. Owned by the basket subsystem;
/// the core only reads it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BasketBalance {
    pub basket_id: u64,
    pub batch_denom: String,
    pub balance: String,
}
