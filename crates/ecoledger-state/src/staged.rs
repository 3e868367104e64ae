//! Staged writes for all-or-nothing operations.
//!
//! A [`StagedState`] reads through to a borrowed store and keeps every
//! supply/balance write in its own overlay, so later entries of the same
//! operation observe earlier ones. The overlay becomes a [`ChangeSet`]
//! only when the caller decides to commit; dropping it discards every
//! write.

use std::collections::BTreeMap;

use ecoledger_types::{
    Address, BasketBalance, Batch, BatchBalance, BatchKey, BatchSupply, Class, ClassKey,
    CreditType, Project, ProjectKey,
};

use crate::store::{StateReader, StateStore};

/// Write-buffering overlay over a read-only store.
pub struct StagedState<'a, S: StateReader + ?Sized> {
    base: &'a S,
    supplies: BTreeMap<BatchKey, BatchSupply>,
    balances: BTreeMap<(BatchKey, Address), BatchBalance>,
}

impl<'a, S: StateReader + ?Sized> StagedState<'a, S> {
    #[must_use]
    pub fn new(base: &'a S) -> Self {
        Self {
            base,
            supplies: BTreeMap::new(),
            balances: BTreeMap::new(),
        }
    }

    pub fn save_batch_supply(&mut self, supply: BatchSupply) {
        self.supplies.insert(supply.batch_key, supply);
    }

    pub fn save_batch_balance(&mut self, balance: BatchBalance) {
        self.balances
            .insert((balance.batch_key, balance.address.clone()), balance);
    }

    /// Whether no write has been staged.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.supplies.is_empty() && self.balances.is_empty()
    }

    /// Release the borrow of the base store and hand back the staged writes.
    #[must_use]
    pub fn into_changes(self) -> ChangeSet {
        ChangeSet {
            supplies: self.supplies.into_values().collect(),
            balances: self.balances.into_values().collect(),
        }
    }
}

impl<S: StateReader + ?Sized> StateReader for StagedState<'_, S> {
    fn credit_type(&self, abbreviation: &str) -> Option<CreditType> {
        self.base.credit_type(abbreviation)
    }

    fn class(&self, key: ClassKey) -> Option<Class> {
        self.base.class(key)
    }

    fn project(&self, key: ProjectKey) -> Option<Project> {
        self.base.project(key)
    }

    fn batch(&self, key: BatchKey) -> Option<Batch> {
        self.base.batch(key)
    }

    fn batch_by_denom(&self, denom: &str) -> Option<Batch> {
        self.base.batch_by_denom(denom)
    }

    fn batch_supply(&self, key: BatchKey) -> Option<BatchSupply> {
        self.supplies
            .get(&key)
            .cloned()
            .or_else(|| self.base.batch_supply(key))
    }

    fn batch_balance(&self, address: &Address, key: BatchKey) -> Option<BatchBalance> {
        self.balances
            .get(&(key, address.clone()))
            .cloned()
            .or_else(|| self.base.batch_balance(address, key))
    }

    fn batch_balances(&self, key: BatchKey) -> Vec<BatchBalance> {
        let mut merged: BTreeMap<Address, BatchBalance> = self
            .base
            .batch_balances(key)
            .into_iter()
            .map(|b| (b.address.clone(), b))
            .collect();
        for ((batch_key, address), balance) in &self.balances {
            if *batch_key == key {
                merged.insert(address.clone(), balance.clone());
            }
        }
        merged.into_values().collect()
    }

    fn basket_balances(&self, batch_denom: &str) -> Vec<BasketBalance> {
        self.base.basket_balances(batch_denom)
    }
}

/// Writes produced by one successful operation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSet {
    supplies: Vec<BatchSupply>,
    balances: Vec<BatchBalance>,
}

impl ChangeSet {
    #[must_use]
    pub fn len(&self) -> usize {
        self.supplies.len() + self.balances.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Write every staged record to `store`.
    pub fn apply<S: StateStore + ?Sized>(self, store: &mut S) {
        tracing::debug!(
            supplies = self.supplies.len(),
            balances = self.balances.len(),
            "applying change set"
        );
        for supply in self.supplies {
            store.save_batch_supply(supply);
        }
        for balance in self.balances {
            store.save_batch_balance(balance);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{DENOM, standard_store};
    use crate::memory::MemStore;

    fn alice() -> Address {
        Address::new("regen1alice")
    }

    #[test]
    fn reads_fall_through_to_base() {
        let store = standard_store(2);
        let staged = StagedState::new(&store);
        let batch = staged.batch_by_denom(DENOM).unwrap();
        assert_eq!(staged.batch_supply(batch.key), store.batch_supply(batch.key));
        assert!(staged.is_empty());
    }

    #[test]
    fn staged_writes_shadow_base_until_applied() {
        let mut store = standard_store(2);
        let key = store.batch_by_denom(DENOM).unwrap().key;

        let mut staged = StagedState::new(&store);
        let mut balance = BatchBalance::zero(key, alice());
        balance.tradable_amount = "7.00".into();
        staged.save_batch_balance(balance.clone());
        assert_eq!(staged.batch_balance(&alice(), key), Some(balance.clone()));
        assert_eq!(staged.batch_balances(key), vec![balance.clone()]);

        let changes = staged.into_changes();
        assert_eq!(changes.len(), 1);
        assert!(store.batch_balance(&alice(), key).is_none());

        changes.apply(&mut store);
        assert_eq!(store.batch_balance(&alice(), key), Some(balance));
    }

    #[test]
    fn dropping_staged_state_discards_writes() {
        let store = MemStore::new();
        {
            let mut staged = StagedState::new(&store);
            staged.save_batch_supply(BatchSupply::zero(BatchKey(1)));
            assert!(!staged.is_empty());
        }
        assert!(store.batch_supply(BatchKey(1)).is_none());
    }
}
