//! Store traits consumed by the protocols and the audit.

use ecoledger_types::{
    Address, BasketBalance, Batch, BatchBalance, BatchKey, BatchSupply, Class, ClassKey,
    CreditType, Project, ProjectKey, Result,
};

/// Read access to ledger state.
///
/// Lookups return owned records; a missing record is `None`, never an error.
pub trait StateReader {
    fn credit_type(&self, abbreviation: &str) -> Option<CreditType>;

    fn class(&self, key: ClassKey) -> Option<Class>;

    fn project(&self, key: ProjectKey) -> Option<Project>;

    fn batch(&self, key: BatchKey) -> Option<Batch>;

    fn batch_by_denom(&self, denom: &str) -> Option<Batch>;

    fn batch_supply(&self, key: BatchKey) -> Option<BatchSupply>;

    fn batch_balance(&self, address: &Address, key: BatchKey) -> Option<BatchBalance>;

    /// Every holder balance of one batch, ordered by address.
    fn batch_balances(&self, key: BatchKey) -> Vec<BatchBalance>;

    /// Basket-held balances of one batch.
    fn basket_balances(&self, batch_denom: &str) -> Vec<BasketBalance>;
}

/// Write access to ledger state.
///
/// Registry inserts reject duplicates; supply and balance saves are
/// upserts and cannot fail.
pub trait StateStore: StateReader {
    fn insert_credit_type(&mut self, credit_type: CreditType) -> Result<()>;

    fn insert_class(&mut self, class: Class) -> Result<()>;

    fn insert_project(&mut self, project: Project) -> Result<()>;

    /// Insert a batch together with its all-zero supply record.
    fn insert_batch(&mut self, batch: Batch) -> Result<()>;

    fn save_batch_supply(&mut self, supply: BatchSupply);

    fn save_batch_balance(&mut self, balance: BatchBalance);

    fn insert_basket_balance(&mut self, balance: BasketBalance);
}
