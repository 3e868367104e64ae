//! Test fixtures: a populated registry and direct issuance.
//!
//! Issuance is not one of the ledger's operations; [`issue`] exists so
//! tests can start from a consistent state (holder balances and batch
//! supply raised together).

use ecoledger_types::{
    Address, Amount, BalanceAmounts, Batch, BatchBalance, BatchKey, Class, ClassKey, CreditType,
    Project, ProjectKey, SupplyAmounts,
};

use crate::memory::MemStore;
use crate::resolve::resolve_batch;
use crate::store::{StateReader, StateStore};

/// Denom of the batch created by [`standard_store`].
pub const DENOM: &str = "C01-001-20200101-20210101-001";

/// Denom of the second batch created by [`two_batch_store`].
pub const DENOM_B: &str = "C01-001-20210101-20220101-002";

/// A store holding credit type `C` at `precision`, class `C01`, project
/// `C01-001` and the open batch [`DENOM`].
#[must_use]
pub fn standard_store(precision: u32) -> MemStore {
    let mut store = MemStore::new();
    store
        .insert_credit_type(CreditType::dummy(precision))
        .unwrap();
    store
        .insert_class(Class {
            key: ClassKey(1),
            id: "C01".to_string(),
            admin: Address::new("regen1admin"),
            credit_type_abbrev: "C".to_string(),
        })
        .unwrap();
    store
        .insert_project(Project {
            key: ProjectKey(1),
            id: "C01-001".to_string(),
            class_key: ClassKey(1),
            jurisdiction: "US-WA".to_string(),
            admin: Address::new("regen1admin"),
        })
        .unwrap();
    store
        .insert_batch(Batch::dummy(BatchKey(1), DENOM, ProjectKey(1)))
        .unwrap();
    store
}

/// [`standard_store`] plus the batch [`DENOM_B`] under the same project.
#[must_use]
pub fn two_batch_store(precision: u32) -> MemStore {
    let mut store = standard_store(precision);
    store
        .insert_batch(Batch::dummy(BatchKey(2), DENOM_B, ProjectKey(1)))
        .unwrap();
    store
}

/// Credit `holder` with `tradable` and `retired` credits of `denom`,
/// raising the batch supply by the same amounts.
///
/// # Panics
/// Panics if the batch does not exist or an amount does not parse.
pub fn issue(store: &mut MemStore, denom: &str, holder: &Address, tradable: &str, retired: &str) {
    let resolved = resolve_batch(&*store, denom).unwrap();
    let key = resolved.batch.key;
    let precision = resolved.precision;
    let tradable = Amount::parse(tradable, precision).unwrap();
    let retired = Amount::parse(retired, precision).unwrap();

    let record = store
        .batch_balance(holder, key)
        .unwrap_or_else(|| BatchBalance::zero(key, holder.clone()));
    let mut balance = BalanceAmounts::decode(&record, precision).unwrap();
    balance.tradable = balance.tradable.add(tradable).unwrap();
    balance.retired = balance.retired.add(retired).unwrap();

    let mut supply =
        SupplyAmounts::decode(&store.batch_supply(key).unwrap(), precision).unwrap();
    supply.tradable = supply.tradable.add(tradable).unwrap();
    supply.retired = supply.retired.add(retired).unwrap();

    store.save_batch_balance(balance.encode(key, holder.clone()));
    store.save_batch_supply(supply.encode(key));
}
