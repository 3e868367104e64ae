//! Cancellation protocol: remove tradable credits from circulation.
//!
//! Cancelled credits leave the holder's tradable pool and the batch's
//! tradable supply, and are added to the batch's cancelled supply. They
//! can never be reinstated. The holder's retired pool is untouched.

use ecoledger_state::{ResolvedBatch, StagedState, StateReader, resolve_batch};
use ecoledger_types::{Amount, EventCancel, LedgerEvent, MsgCancel, Result};

use crate::common::{load_holder, load_supply};
use crate::meter::CostMeter;

const COST_DESCRIPTOR: &str = "ecoledger/cancel credit entry";

/// Apply every entry of `msg` to `state`, in order.
///
/// # Errors
/// Same kinds as [`crate::retire`].
pub fn cancel<S: StateReader + ?Sized>(
    state: &mut StagedState<'_, S>,
    msg: &MsgCancel,
    meter: &mut dyn CostMeter,
    cost_per_entry: u64,
) -> Result<Vec<LedgerEvent>> {
    msg.validate()?;

    let mut events = Vec::with_capacity(msg.credits.len());
    for credit in &msg.credits {
        let denom = credit.batch_denom.as_str();
        let ResolvedBatch { batch, precision } = resolve_batch(&*state, denom)?;
        let key = batch.key;

        let mut balance = load_holder(&*state, &msg.owner, key, denom, precision)?;
        let mut supply = load_supply(&*state, key, denom, precision)?;
        let amount = Amount::parse(&credit.amount, precision)?;

        balance.tradable = balance.tradable.safe_sub(amount)?;
        supply.tradable = supply.tradable.safe_sub(amount)?;
        supply.cancelled = supply.cancelled.add(amount)?;

        state.save_batch_balance(balance.encode(key, msg.owner.clone()));
        state.save_batch_supply(supply.encode(key));
        events.push(LedgerEvent::Cancel(EventCancel {
            owner: msg.owner.clone(),
            batch_denom: denom.to_string(),
            amount: amount.to_string(),
            reason: msg.reason.clone(),
        }));

        tracing::debug!(batch_denom = denom, owner = %msg.owner, amount = %amount, "credits cancelled");
        meter.consume(cost_per_entry, COST_DESCRIPTOR);
    }
    Ok(events)
}
