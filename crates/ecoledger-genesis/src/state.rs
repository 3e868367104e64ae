//! Snapshot format.

use ecoledger_types::{
    BasketBalance, Batch, BatchBalance, BatchSupply, Class, CreditType, LedgerError, Project,
    Result,
};
use serde::{Deserialize, Serialize};

/// Every record needed to rebuild a ledger. Missing tables read as empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenesisState {
    pub credit_types: Vec<CreditType>,
    pub classes: Vec<Class>,
    pub projects: Vec<Project>,
    pub batches: Vec<Batch>,
    pub batch_supplies: Vec<BatchSupply>,
    pub batch_balances: Vec<BatchBalance>,
    pub basket_balances: Vec<BasketBalance>,
}

impl GenesisState {
    /// Parse a JSON snapshot. The snapshot is not validated.
    ///
    /// # Errors
    /// Returns [`LedgerError::Serialization`] if the document is malformed.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(LedgerError::from)
    }

    /// Total number of records across all tables.
    #[must_use]
    pub fn record_count(&self) -> usize {
        self.credit_types.len()
            + self.classes.len()
            + self.projects.len()
            + self.batches.len()
            + self.batch_supplies.len()
            + self.batch_balances.len()
            + self.basket_balances.len()
    }
}
