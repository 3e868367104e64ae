use ecoledger_state::StateReader;
use ecoledger_types::{
    Address, BalanceAmounts, BatchKey, LedgerError, Precision, Result, SupplyAmounts,
};

/// Decoded supply of `key`; a batch without a supply record is an error.
pub(crate) fn load_supply<S: StateReader + ?Sized>(
    state: &S,
    key: BatchKey,
    denom: &str,
    precision: Precision,
) -> Result<SupplyAmounts> {
    let record = state
        .batch_supply(key)
        .ok_or_else(|| LedgerError::SupplyNotFound {
            batch_denom: denom.to_string(),
        })?;
    SupplyAmounts::decode(&record, precision)
}

/// Decoded balance of a holder that must already own credits of `key`.
pub(crate) fn load_holder<S: StateReader + ?Sized>(
    state: &S,
    address: &Address,
    key: BatchKey,
    denom: &str,
    precision: Precision,
) -> Result<BalanceAmounts> {
    let record = state
        .batch_balance(address, key)
        .ok_or_else(|| LedgerError::BalanceNotFound {
            address: address.clone(),
            batch_denom: denom.to_string(),
        })?;
    BalanceAmounts::decode(&record, precision)
}

/// Decoded balance of a holder, all-zero if absent.
pub(crate) fn load_or_zero<S: StateReader + ?Sized>(
    state: &S,
    address: &Address,
    key: BatchKey,
    precision: Precision,
) -> Result<BalanceAmounts> {
    match state.batch_balance(address, key) {
        Some(record) => BalanceAmounts::decode(&record, precision),
        None => Ok(BalanceAmounts::default()),
    }
}
