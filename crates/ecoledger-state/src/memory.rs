//! In-memory reference store.
//!
//! Ordered maps keep iteration deterministic, which the state digest and
//! the audit rely on.

use std::collections::{BTreeMap, HashMap};

use ecoledger_types::{
    Address, Amount, BalanceAmounts, BasketBalance, Batch, BatchBalance, BatchKey, BatchSupply,
    Class, ClassKey, CreditType, LedgerError, Precision, Project, ProjectKey, Result,
};
use sha2::{Digest, Sha256};

use crate::store::{StateReader, StateStore};

/// Ledger state held in memory.
#[derive(Debug, Clone, Default)]
pub struct MemStore {
    credit_types: BTreeMap<String, CreditType>,
    classes: BTreeMap<ClassKey, Class>,
    projects: BTreeMap<ProjectKey, Project>,
    batches: BTreeMap<BatchKey, Batch>,
    /// Unique denom index over `batches`.
    denoms: HashMap<String, BatchKey>,
    supplies: BTreeMap<BatchKey, BatchSupply>,
    balances: BTreeMap<(BatchKey, Address), BatchBalance>,
    basket_balances: Vec<BasketBalance>,
}

impl MemStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored holder balances across all batches.
    #[must_use]
    pub fn balance_count(&self) -> usize {
        self.balances.len()
    }

    /// Close a batch to further issuance.
    ///
    /// # Errors
    /// Returns `BatchNotFound` if no batch has `denom`.
    pub fn seal_batch(&mut self, denom: &str) -> Result<()> {
        let key = self
            .denoms
            .get(denom)
            .copied()
            .ok_or_else(|| LedgerError::BatchNotFound {
                denom: denom.to_string(),
            })?;
        if let Some(batch) = self.batches.get_mut(&key) {
            batch.seal();
        }
        Ok(())
    }

    /// Remove balance records whose every pool is zero.
    ///
    /// Absent records read as zero, so this never changes any holder's
    /// balance or the supply invariant. Records that fail to parse are kept.
    /// Returns the number of records removed.
    pub fn compact_zero_balances(&mut self) -> usize {
        let before = self.balances.len();
        self.balances.retain(|_, record| {
            !BalanceAmounts::decode(record, Precision::MAX).is_ok_and(|amounts| amounts.is_zero())
        });
        let removed = before - self.balances.len();
        if removed > 0 {
            tracing::debug!(removed, "compacted zero balances");
        }
        removed
    }

    /// SHA-256 digest over every supply and balance record, hex-encoded.
    ///
    /// Records are hashed in key order with length-prefixed fields, so two
    /// stores holding the same records (with the same amount strings)
    /// always produce the same digest.
    #[must_use]
    pub fn state_hash(&self) -> String {
        let mut hasher = Sha256::new();
        for (key, supply) in &self.supplies {
            hasher.update(b"supply");
            hasher.update(key.to_be_bytes());
            for field in [
                &supply.tradable_amount,
                &supply.retired_amount,
                &supply.cancelled_amount,
            ] {
                hash_field(&mut hasher, field);
            }
        }
        for ((key, address), balance) in &self.balances {
            hasher.update(b"balance");
            hasher.update(key.to_be_bytes());
            hash_field(&mut hasher, address.as_str());
            for field in [
                &balance.tradable_amount,
                &balance.retired_amount,
                &balance.escrowed_amount,
            ] {
                hash_field(&mut hasher, field);
            }
        }
        hex::encode(hasher.finalize())
    }

    /// Sum of tradable + retired + escrowed over every holder of `key`,
    /// parsed at `precision`.
    pub fn holder_total(&self, key: BatchKey, precision: Precision) -> Result<Amount> {
        self.balances
            .range((key, Address::new(""))..)
            .take_while(|((k, _), _)| *k == key)
            .try_fold(Amount::ZERO, |acc, (_, record)| {
                acc.add(BalanceAmounts::decode(record, precision)?.total()?)
            })
    }
}

fn hash_field(hasher: &mut Sha256, field: &str) {
    hasher.update((field.len() as u64).to_be_bytes());
    hasher.update(field.as_bytes());
}

impl StateReader for MemStore {
    fn credit_type(&self, abbreviation: &str) -> Option<CreditType> {
        self.credit_types.get(abbreviation).cloned()
    }

    fn class(&self, key: ClassKey) -> Option<Class> {
        self.classes.get(&key).cloned()
    }

    fn project(&self, key: ProjectKey) -> Option<Project> {
        self.projects.get(&key).cloned()
    }

    fn batch(&self, key: BatchKey) -> Option<Batch> {
        self.batches.get(&key).cloned()
    }

    fn batch_by_denom(&self, denom: &str) -> Option<Batch> {
        self.denoms
            .get(denom)
            .and_then(|key| self.batches.get(key))
            .cloned()
    }

    fn batch_supply(&self, key: BatchKey) -> Option<BatchSupply> {
        self.supplies.get(&key).cloned()
    }

    fn batch_balance(&self, address: &Address, key: BatchKey) -> Option<BatchBalance> {
        self.balances.get(&(key, address.clone())).cloned()
    }

    fn batch_balances(&self, key: BatchKey) -> Vec<BatchBalance> {
        self.balances
            .range((key, Address::new(""))..)
            .take_while(|((k, _), _)| *k == key)
            .map(|(_, record)| record.clone())
            .collect()
    }

    fn basket_balances(&self, batch_denom: &str) -> Vec<BasketBalance> {
        self.basket_balances
            .iter()
            .filter(|b| b.batch_denom == batch_denom)
            .cloned()
            .collect()
    }
}

impl StateStore for MemStore {
    fn insert_credit_type(&mut self, credit_type: CreditType) -> Result<()> {
        if self.credit_types.contains_key(&credit_type.abbreviation) {
            return Err(LedgerError::DuplicateRecord {
                reason: format!("credit type {}", credit_type.abbreviation),
            });
        }
        self.credit_types
            .insert(credit_type.abbreviation.clone(), credit_type);
        Ok(())
    }

    fn insert_class(&mut self, class: Class) -> Result<()> {
        if self.classes.contains_key(&class.key) {
            return Err(LedgerError::DuplicateRecord {
                reason: format!("{}", class.key),
            });
        }
        self.classes.insert(class.key, class);
        Ok(())
    }

    fn insert_project(&mut self, project: Project) -> Result<()> {
        if self.projects.contains_key(&project.key) {
            return Err(LedgerError::DuplicateRecord {
                reason: format!("{}", project.key),
            });
        }
        self.projects.insert(project.key, project);
        Ok(())
    }

    fn insert_batch(&mut self, batch: Batch) -> Result<()> {
        if self.batches.contains_key(&batch.key) || self.denoms.contains_key(&batch.denom) {
            return Err(LedgerError::DuplicateRecord {
                reason: format!("batch {} ({})", batch.denom, batch.key),
            });
        }
        self.denoms.insert(batch.denom.clone(), batch.key);
        self.supplies
            .insert(batch.key, BatchSupply::zero(batch.key));
        self.batches.insert(batch.key, batch);
        Ok(())
    }

    fn save_batch_supply(&mut self, supply: BatchSupply) {
        self.supplies.insert(supply.batch_key, supply);
    }

    fn save_batch_balance(&mut self, balance: BatchBalance) {
        self.balances
            .insert((balance.batch_key, balance.address.clone()), balance);
    }

    fn insert_basket_balance(&mut self, balance: BasketBalance) {
        self.basket_balances.push(balance);
    }
}
