//! Retirement protocol: tradable → retired for one holder.
//!
//! Retirement is permanent. No operation moves value from a retired pool
//! back to a tradable one. The batch supply moves the same amount from
//! tradable to retired, so circulating supply is unchanged.

use ecoledger_state::{ResolvedBatch, StagedState, StateReader, resolve_batch};
use ecoledger_types::{Amount, EventRetire, LedgerEvent, MsgRetire, Result};

use crate::common::{load_holder, load_supply};
use crate::meter::CostMeter;

const COST_DESCRIPTOR: &str = "ecoledger/retire credit entry";

/// Apply every entry of `msg` to `state`, in order.
///
/// # Errors
/// - `InvalidRequest` / `InvalidAmount` from stateless validation
/// - `BatchNotFound` and the registry lookup errors
/// - `BalanceNotFound` if the owner holds nothing in a batch
/// - `InsufficientBalance` if the owner's tradable pool is too small
/// - `PrecisionExceeded` if an amount is finer than the batch precision
pub fn retire<S: StateReader + ?Sized>(
    state: &mut StagedState<'_, S>,
    msg: &MsgRetire,
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
        balance.retired = balance.retired.add(amount)?;
        supply.tradable = supply.tradable.safe_sub(amount)?;
        supply.retired = supply.retired.add(amount)?;

        state.save_batch_balance(balance.encode(key, msg.owner.clone()));
        state.save_batch_supply(supply.encode(key));
        events.push(LedgerEvent::Retire(EventRetire {
            owner: msg.owner.clone(),
            batch_denom: denom.to_string(),
            amount: amount.to_string(),
            jurisdiction: msg.jurisdiction.clone(),
        }));

        tracing::debug!(batch_denom = denom, owner = %msg.owner, amount = %amount, "credits retired");
        meter.consume(cost_per_entry, COST_DESCRIPTOR);
    }
    Ok(events)
}
