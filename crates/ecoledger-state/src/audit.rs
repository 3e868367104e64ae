//! Supply conservation check for a single batch on a live store.
//!
//! Invariant checked:
//! ```text
//! Σ holders (tradable + retired + escrowed) + Σ basket balances
//!     == supply.tradable + supply.retired
//! ```
//!
//! Cancelled supply has left the accounted pool and is not part of either
//! side. The genesis validator runs the same equation over a whole
//! snapshot; this is the per-batch form used after operations.

use ecoledger_types::{Amount, BalanceAmounts, LedgerError, Result, SupplyAmounts};

use crate::resolve::{ResolvedBatch, resolve_batch};
use crate::store::StateReader;

/// Recompute the calculated supply of `denom` and compare it with the
/// declared supply.
///
/// # Errors
/// - `BatchNotFound` / `SupplyNotFound` and the registry lookup errors
/// - `InvalidAmount` / `PrecisionExceeded` for a malformed stored amount
/// - [`LedgerError::SupplyMismatch`] if the two sides differ
pub fn verify_batch_supply<S: StateReader + ?Sized>(store: &S, denom: &str) -> Result<()> {
    let ResolvedBatch { batch, precision } = resolve_batch(store, denom)?;
    let record = store
        .batch_supply(batch.key)
        .ok_or_else(|| LedgerError::SupplyNotFound {
            batch_denom: denom.to_string(),
        })?;
    let declared = SupplyAmounts::decode(&record, precision)?.circulating()?;

    let mut calculated = Amount::ZERO;
    for balance in store.batch_balances(batch.key) {
        calculated = calculated.add(BalanceAmounts::decode(&balance, precision)?.total()?)?;
    }
    for basket in store.basket_balances(denom) {
        calculated = calculated.add(Amount::parse(&basket.balance, precision)?)?;
    }

    if declared != calculated {
        return Err(LedgerError::SupplyMismatch {
            batch_denom: denom.to_string(),
            declared,
            calculated,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use ecoledger_types::{Address, BasketBalance, BatchSupply, ErrorKind};

    use super::*;
    use crate::fixtures::{DENOM, issue, standard_store};
    use crate::store::StateStore;

    #[test]
    fn empty_batch_is_consistent() {
        let store = standard_store(6);
        assert!(verify_batch_supply(&store, DENOM).is_ok());
    }

    #[test]
    fn issued_batch_is_consistent() {
        let mut store = standard_store(2);
        issue(&mut store, DENOM, &Address::new("regen1a"), "100.00", "3.50");
        issue(&mut store, DENOM, &Address::new("regen1b"), "0.01", "0");
        assert!(verify_batch_supply(&store, DENOM).is_ok());
    }

    #[test]
    fn tampered_supply_is_detected() {
        let mut store = standard_store(2);
        issue(&mut store, DENOM, &Address::new("regen1a"), "100", "0");
        let key = store.batch_by_denom(DENOM).unwrap().key;
        let mut supply = store.batch_supply(key).unwrap();
        supply.tradable_amount = "99.99".into();
        store.save_batch_supply(supply);

        let err = verify_batch_supply(&store, DENOM).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::SupplyMismatch);
    }

    #[test]
    fn cancelled_supply_is_outside_the_equation() {
        let mut store = standard_store(2);
        issue(&mut store, DENOM, &Address::new("regen1a"), "10", "0");
        let key = store.batch_by_denom(DENOM).unwrap().key;
        let mut supply = store.batch_supply(key).unwrap();
        supply.cancelled_amount = "1000".into();
        store.save_batch_supply(supply);
        assert!(verify_batch_supply(&store, DENOM).is_ok());
    }

    #[test]
    fn basket_balances_count_toward_calculated_supply() {
        let mut store = standard_store(2);
        issue(&mut store, DENOM, &Address::new("regen1a"), "10", "0");
        let key = store.batch_by_denom(DENOM).unwrap().key;
        store.save_batch_supply(BatchSupply {
            batch_key: key,
            tradable_amount: "15".into(),
            retired_amount: "0".into(),
            cancelled_amount: "0".into(),
        });
        assert!(verify_batch_supply(&store, DENOM).is_err());

        store.insert_basket_balance(BasketBalance {
            basket_id: 1,
            batch_denom: DENOM.into(),
            balance: "5".into(),
        });
        assert!(verify_batch_supply(&store, DENOM).is_ok());
    }
}
