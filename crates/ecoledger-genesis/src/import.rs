//! Validated import of a snapshot into a store.

use std::collections::BTreeSet;

use ecoledger_state::{StateReader, StateStore};
use ecoledger_types::{LedgerError, Result};

use crate::state::GenesisState;
use crate::validate::validate_genesis;

/// Validate `state` and, only if it passes, write every record to `store`.
///
/// Registry records are inserted parents first. For projects sharing a key
/// only the first record is imported, matching what validation resolved.
///
/// # Errors
/// Any error of [`validate_genesis`], or `DuplicateRecord` if a registry
/// record of the snapshot already exists in `store`. On error `store` is
/// untouched.
pub fn import_genesis<S: StateStore + ?Sized>(store: &mut S, state: &GenesisState) -> Result<()> {
    validate_genesis(state)?;
    check_collisions(&*store, state)?;

    for credit_type in &state.credit_types {
        store.insert_credit_type(credit_type.clone())?;
    }
    for class in &state.classes {
        store.insert_class(class.clone())?;
    }
    let mut seen = BTreeSet::new();
    for project in &state.projects {
        if seen.insert(project.key) {
            store.insert_project(project.clone())?;
        } else {
            tracing::debug!(project = %project.key, "skipping shadowed project record");
        }
    }
    for batch in &state.batches {
        store.insert_batch(batch.clone())?;
    }
    for supply in &state.batch_supplies {
        store.save_batch_supply(supply.clone());
    }
    for balance in &state.batch_balances {
        store.save_batch_balance(balance.clone());
    }
    for basket in &state.basket_balances {
        store.insert_basket_balance(basket.clone());
    }

    tracing::info!(
        batches = state.batches.len(),
        balances = state.batch_balances.len(),
        "genesis imported"
    );
    Ok(())
}

/// Reject the snapshot if any of its registry keys or denoms is already held
/// by `store`. Runs before the first write.
fn check_collisions<S: StateReader + ?Sized>(store: &S, state: &GenesisState) -> Result<()> {
    let duplicate = |reason: String| LedgerError::DuplicateRecord { reason };

    if let Some(ct) = state
        .credit_types
        .iter()
        .find(|ct| store.credit_type(&ct.abbreviation).is_some())
    {
        return Err(duplicate(format!("credit type {}", ct.abbreviation)));
    }
    if let Some(class) = state.classes.iter().find(|c| store.class(c.key).is_some()) {
        return Err(duplicate(format!("class {}", class.key)));
    }
    if let Some(project) = state.projects.iter().find(|p| store.project(p.key).is_some()) {
        return Err(duplicate(format!("project {}", project.key)));
    }
    if let Some(batch) = state
        .batches
        .iter()
        .find(|b| store.batch(b.key).is_some() || store.batch_by_denom(&b.denom).is_some())
    {
        return Err(duplicate(format!("batch {} ({})", batch.denom, batch.key)));
    }
    Ok(())
}
