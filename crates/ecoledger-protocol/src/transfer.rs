//! Transfer protocol: move credits between holders, optionally retiring
//! them on receipt.
//!
//! Per entry:
//! 1. Resolve the batch and its precision
//! 2. Load sender balance (must exist), recipient balance (zero if absent)
//!    and batch supply
//! 3. Debit the sender's **tradable** pool by `tradable + retired`
//! 4. Credit the recipient's tradable pool by `tradable`
//! 5. If `retired > 0`: credit the recipient's retired pool and move the
//!    same amount from supply tradable to supply retired
//!
//! The retired part of a transfer always comes out of the sender's
//! tradable pool. Retired credits never move.

use ecoledger_state::{ResolvedBatch, StagedState, StateReader, resolve_batch};
use ecoledger_types::{
    Address, Amount, EventRetire, EventTransfer, LedgerEvent, MsgSend, Result, SendCredits,
};

use crate::common::{load_holder, load_or_zero, load_supply};
use crate::meter::CostMeter;

const COST_DESCRIPTOR: &str = "ecoledger/send credit entry";

/// Apply every entry of `msg` to `state`, in order.
///
/// On error the caller must discard `state`; entries processed before the
/// failing one have only been staged.
///
/// # Errors
/// - `InvalidRequest` / `InvalidAmount` from stateless validation
/// - `BatchNotFound` and the registry lookup errors
/// - `BalanceNotFound` if the sender holds nothing in a batch
/// - `InsufficientBalance` if the sender's tradable pool is too small
/// - `PrecisionExceeded` if an amount is finer than the batch precision
pub fn send<S: StateReader + ?Sized>(
    state: &mut StagedState<'_, S>,
    msg: &MsgSend,
    meter: &mut dyn CostMeter,
    cost_per_entry: u64,
) -> Result<Vec<LedgerEvent>> {
    msg.validate()?;

    let mut events = Vec::with_capacity(msg.credits.len());
    for credit in &msg.credits {
        send_entry(state, &msg.sender, &msg.recipient, credit, &mut events)?;
        meter.consume(cost_per_entry, COST_DESCRIPTOR);
    }
    Ok(events)
}

fn send_entry<S: StateReader + ?Sized>(
    state: &mut StagedState<'_, S>,
    sender: &Address,
    recipient: &Address,
    credit: &SendCredits,
    events: &mut Vec<LedgerEvent>,
) -> Result<()> {
    let denom = credit.batch_denom.as_str();
    let ResolvedBatch { batch, precision } = resolve_batch(&*state, denom)?;
    let key = batch.key;

    let mut supply = load_supply(&*state, key, denom, precision)?;
    let mut from = load_holder(&*state, sender, key, denom, precision)?;
    let mut to = load_or_zero(&*state, recipient, key, precision)?;
    let tradable = Amount::parse(&credit.tradable_amount, precision)?;
    let retired = Amount::parse(&credit.retired_amount, precision)?;

    from.tradable = from.tradable.safe_sub(tradable.add(retired)?)?;
    to.tradable = to.tradable.add(tradable)?;

    let retiring = retired.is_positive();
    if retiring {
        to.retired = to.retired.add(retired)?;
        supply.tradable = supply.tradable.safe_sub(retired)?;
        supply.retired = supply.retired.add(retired)?;
    }

    state.save_batch_balance(to.encode(key, recipient.clone()));
    state.save_batch_balance(from.encode(key, sender.clone()));
    if retiring {
        state.save_batch_supply(supply.encode(key));
        events.push(LedgerEvent::Retire(EventRetire {
            owner: recipient.clone(),
            batch_denom: denom.to_string(),
            amount: retired.to_string(),
            jurisdiction: credit.retirement_jurisdiction.clone(),
        }));
    }
    events.push(LedgerEvent::Transfer(EventTransfer {
        sender: sender.clone(),
        recipient: recipient.clone(),
        batch_denom: denom.to_string(),
        tradable_amount: tradable.to_string(),
        retired_amount: retired.to_string(),
    }));

    tracing::debug!(
        batch_denom = denom,
        sender = %sender,
        recipient = %recipient,
        tradable = %tradable,
        retired = %retired,
        "credits sent"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use ecoledger_state::fixtures::{DENOM, issue, standard_store};
    use ecoledger_state::{MemStore, StateStore};
    use ecoledger_types::{BatchBalance, BatchKey, ErrorKind, LedgerError};

    use super::*;
    use crate::meter::{GasMeter, NoopMeter};

    fn alice() -> Address {
        Address::new("regen1alice")
    }

    fn bob() -> Address {
        Address::new("regen1bob")
    }

    fn msg(tradable: &str, retired: &str) -> MsgSend {
        MsgSend {
            sender: alice(),
            recipient: bob(),
            credits: vec![SendCredits {
                batch_denom: DENOM.into(),
                tradable_amount: tradable.into(),
                retired_amount: retired.into(),
                retirement_jurisdiction: "US-WA".into(),
            }],
        }
    }

    fn batch_key(store: &MemStore) -> BatchKey {
        store.batch_by_denom(DENOM).unwrap().key
    }

    fn run(store: &mut MemStore, msg: &MsgSend) -> Result<Vec<LedgerEvent>> {
        let mut staged = StagedState::new(&*store);
        let events = send(&mut staged, msg, &mut NoopMeter, 10)?;
        staged.into_changes().apply(store);
        Ok(events)
    }

    #[test]
    fn tradable_only_send_leaves_supply_untouched() {
        let mut store = standard_store(2);
        issue(&mut store, DENOM, &alice(), "100.00", "0");
        let supply_before = store.batch_supply(batch_key(&store)).unwrap();

        let events = run(&mut store, &msg("25.00", "0")).unwrap();
        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], LedgerEvent::Transfer(_)));

        let key = batch_key(&store);
        assert_eq!(store.batch_balance(&alice(), key).unwrap().tradable_amount, "75.00");
        assert_eq!(store.batch_balance(&bob(), key).unwrap().tradable_amount, "25.00");
        assert_eq!(store.batch_supply(key).unwrap(), supply_before);
    }

    #[test]
    fn retiring_send_emits_retire_then_transfer() {
        let mut store = standard_store(2);
        issue(&mut store, DENOM, &alice(), "100.00", "0");

        let events = run(&mut store, &msg("0", "10.00")).unwrap();
        assert_eq!(events.len(), 2);
        match &events[0] {
            LedgerEvent::Retire(e) => {
                assert_eq!(e.owner, bob());
                assert_eq!(e.amount, "10.00");
                assert_eq!(e.jurisdiction, "US-WA");
            }
            other => panic!("expected retire event, got {other:?}"),
        }
        assert!(matches!(events[1], LedgerEvent::Transfer(_)));
    }

    #[test]
    fn missing_sender_balance_is_not_found() {
        let mut store = standard_store(2);
        let err = run(&mut store, &msg("1", "0")).unwrap_err();
        assert!(matches!(err, LedgerError::BalanceNotFound { .. }));
    }

    #[test]
    fn combined_debit_checked_against_tradable() {
        let mut store = standard_store(2);
        issue(&mut store, DENOM, &alice(), "10", "50");
        // 6 + 5 > 10 tradable, even though alice holds 50 retired
        let err = run(&mut store, &msg("6", "5")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InsufficientBalance);
    }

    #[test]
    fn escrowed_pool_is_preserved() {
        let mut store = standard_store(2);
        issue(&mut store, DENOM, &alice(), "10", "0");
        let key = batch_key(&store);
        let mut record = store.batch_balance(&alice(), key).unwrap();
        record.escrowed_amount = "4.25".into();
        store.save_batch_balance(record);

        run(&mut store, &msg("1", "0")).unwrap();
        let after: BatchBalance = store.batch_balance(&alice(), key).unwrap();
        assert_eq!(after.escrowed_amount, "4.25");
        assert_eq!(after.tradable_amount, "9");
    }

    #[test]
    fn meter_charged_per_entry() {
        let mut store = standard_store(2);
        issue(&mut store, DENOM, &alice(), "10", "0");
        let mut m = msg("1", "0");
        m.credits.push(m.credits[0].clone());

        let mut meter = GasMeter::new();
        let mut staged = StagedState::new(&store);
        send(&mut staged, &m, &mut meter, 10).unwrap();
        assert_eq!(meter.charges(), 2);
        assert_eq!(meter.consumed(), 20);
    }
}
