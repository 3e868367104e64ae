//! Genesis consistency validation.
//!
//! Steps:
//! 1. Credit types: abbreviation → precision
//! 2. Classes: class key → credit type (the credit type must exist)
//! 3. Projects: project key → class key, first record wins
//! 4. Batches: batch key → precision and denom → batch key
//! 5. Declared supply per batch: tradable + retired
//! 6. Calculated supply per batch: Σ tradable + retired + escrowed over
//!    every holder, plus every basket balance of the batch
//! 7. Compare the two per batch
//!
//! Every amount is parsed at the precision of its batch.

use std::collections::{BTreeMap, BTreeSet};

use ecoledger_types::{
    Address, Amount, BalanceAmounts, BatchKey, ClassKey, LedgerError, Precision, ProjectKey,
    Result, SupplyAmounts,
};

use crate::state::GenesisState;

/// Check that `state` is internally consistent.
///
/// # Errors
/// - `InvalidPrecision` / `InvalidRequest` for a malformed registry record
/// - `InvalidGenesis` for duplicate keys or denoms
/// - `CreditTypeNotFound`, `ClassNotFound`, `ProjectNotFound` for a broken
///   lookup chain
/// - `BatchKeyNotFound` / `BatchNotFound` for supplies, balances or basket
///   balances of an unknown batch
/// - `InvalidAmount` / `PrecisionExceeded` for a malformed amount
/// - `SupplyWithoutBalances` / `BalancesWithoutSupply` when one side of the
///   comparison is entirely empty
/// - `SupplyMismatch` naming the first batch whose sides differ
pub fn validate_genesis(state: &GenesisState) -> Result<()> {
    match check(state) {
        Ok(batches) => {
            tracing::info!(
                batches,
                records = state.record_count(),
                "genesis snapshot validated"
            );
            Ok(())
        }
        Err(err) => {
            tracing::warn!(kind = %err.kind(), error = %err, "genesis snapshot rejected");
            Err(err)
        }
    }
}

/// Returns the number of batches compared.
fn check(state: &GenesisState) -> Result<usize> {
    let registry = Registry::build(state)?;
    let declared = declared_supply(state, &registry)?;
    let calculated = calculated_supply(state, &registry)?;

    if calculated.is_empty() && !declared.is_empty() {
        return Err(LedgerError::SupplyWithoutBalances);
    }
    if declared.is_empty() && !calculated.is_empty() {
        return Err(LedgerError::BalancesWithoutSupply);
    }

    let keys: BTreeSet<BatchKey> = declared.keys().chain(calculated.keys()).copied().collect();
    for key in &keys {
        let d = declared.get(key).copied().unwrap_or(Amount::ZERO);
        let c = calculated.get(key).copied().unwrap_or(Amount::ZERO);
        if d != c {
            return Err(LedgerError::SupplyMismatch {
                batch_denom: registry.denom(*key),
                declared: d,
                calculated: c,
            });
        }
    }
    Ok(keys.len())
}

/// Lookup tables derived from the registry records of one snapshot.
struct Registry<'a> {
    precisions: BTreeMap<BatchKey, Precision>,
    denoms: BTreeMap<&'a str, BatchKey>,
    keys: BTreeMap<BatchKey, &'a str>,
}

impl<'a> Registry<'a> {
    fn build(state: &'a GenesisState) -> Result<Self> {
        let mut type_precision: BTreeMap<&str, Precision> = BTreeMap::new();
        for credit_type in &state.credit_types {
            credit_type.validate()?;
            let precision = credit_type.precision()?;
            if type_precision
                .insert(credit_type.abbreviation.as_str(), precision)
                .is_some()
            {
                return Err(duplicate(format!(
                    "credit type {}",
                    credit_type.abbreviation
                )));
            }
        }

        let mut class_type: BTreeMap<ClassKey, &str> = BTreeMap::new();
        for class in &state.classes {
            let abbrev = class.credit_type_abbrev.as_str();
            if !type_precision.contains_key(abbrev) {
                return Err(LedgerError::CreditTypeNotFound {
                    abbreviation: abbrev.to_string(),
                });
            }
            if class_type.insert(class.key, abbrev).is_some() {
                return Err(duplicate(format!("class {}", class.key)));
            }
        }

        let mut project_class: BTreeMap<ProjectKey, ClassKey> = BTreeMap::new();
        for project in &state.projects {
            project_class
                .entry(project.key)
                .or_insert(project.class_key);
        }

        let mut registry = Self {
            precisions: BTreeMap::new(),
            denoms: BTreeMap::new(),
            keys: BTreeMap::new(),
        };
        for batch in &state.batches {
            batch.validate()?;
            let class_key = project_class
                .get(&batch.project_key)
                .copied()
                .ok_or(LedgerError::ProjectNotFound(batch.project_key))?;
            let abbrev = class_type
                .get(&class_key)
                .copied()
                .ok_or(LedgerError::ClassNotFound(class_key))?;
            let precision = type_precision.get(abbrev).copied().ok_or_else(|| {
                LedgerError::CreditTypeNotFound {
                    abbreviation: abbrev.to_string(),
                }
            })?;

            if registry.keys.insert(batch.key, batch.denom.as_str()).is_some() {
                return Err(duplicate(format!("batch {}", batch.key)));
            }
            if registry.denoms.insert(batch.denom.as_str(), batch.key).is_some() {
                return Err(duplicate(format!("batch denom {}", batch.denom)));
            }
            registry.precisions.insert(batch.key, precision);
        }
        Ok(registry)
    }

    fn precision(&self, key: BatchKey) -> Result<Precision> {
        self.precisions
            .get(&key)
            .copied()
            .ok_or(LedgerError::BatchKeyNotFound(key))
    }

    fn denom(&self, key: BatchKey) -> String {
        self.keys
            .get(&key)
            .map_or_else(|| key.to_string(), |denom| (*denom).to_string())
    }
}

fn declared_supply(state: &GenesisState, registry: &Registry<'_>) -> Result<BTreeMap<BatchKey, Amount>> {
    let mut declared = BTreeMap::new();
    for supply in &state.batch_supplies {
        let precision = registry.precision(supply.batch_key)?;
        let amounts = SupplyAmounts::decode(supply, precision)?;
        if declared
            .insert(supply.batch_key, amounts.circulating()?)
            .is_some()
        {
            return Err(duplicate(format!("supply for {}", supply.batch_key)));
        }
    }
    Ok(declared)
}

fn calculated_supply(
    state: &GenesisState,
    registry: &Registry<'_>,
) -> Result<BTreeMap<BatchKey, Amount>> {
    let mut calculated: BTreeMap<BatchKey, Amount> = BTreeMap::new();
    let mut holders: BTreeSet<(BatchKey, &Address)> = BTreeSet::new();

    for balance in &state.batch_balances {
        let precision = registry.precision(balance.batch_key)?;
        if !holders.insert((balance.batch_key, &balance.address)) {
            return Err(duplicate(format!(
                "balance of {} in {}",
                balance.address, balance.batch_key
            )));
        }
        let total = BalanceAmounts::decode(balance, precision)?.total()?;
        let sum = calculated.entry(balance.batch_key).or_insert(Amount::ZERO);
        *sum = sum.add(total)?;
    }

    for basket in &state.basket_balances {
        let key = registry
            .denoms
            .get(basket.batch_denom.as_str())
            .copied()
            .ok_or_else(|| LedgerError::BatchNotFound {
                denom: basket.batch_denom.clone(),
            })?;
        let amount = Amount::parse(&basket.balance, registry.precision(key)?)?;
        let sum = calculated.entry(key).or_insert(Amount::ZERO);
        *sum = sum.add(amount)?;
    }
    Ok(calculated)
}

fn duplicate(what: String) -> LedgerError {
    LedgerError::InvalidGenesis {
        reason: format!("duplicate {what}"),
    }
}
