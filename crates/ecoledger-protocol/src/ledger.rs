//! Single entry point for balance-mutating requests.

use ecoledger_state::{StagedState, StateStore};
use ecoledger_types::{LedgerConfig, LedgerEvent, Msg, Result};

use crate::meter::CostMeter;
use crate::{cancel, retire, send};

/// Owns a store and runs every request against it all-or-nothing.
///
/// Requests are executed one at a time; `&mut self` is the serialization
/// point for writes to the store.
pub struct Ledger<S: StateStore> {
    store: S,
    config: LedgerConfig,
}

impl<S: StateStore> Ledger<S> {
    #[must_use]
    pub fn new(store: S, config: LedgerConfig) -> Self {
        Self { store, config }
    }

    /// Read access to the underlying store.
    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    #[must_use]
    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    /// Give the store back, ending the ledger.
    #[must_use]
    pub fn into_store(self) -> S {
        self.store
    }

    /// Execute `msg` and commit its writes if, and only if, every entry
    /// succeeds.
    ///
    /// On success the events are returned in emission order. On failure the
    /// store is unchanged and no event is returned. Charges already made to
    /// `meter` by a failed request are not refunded.
    ///
    /// # Errors
    /// Whatever the dispatched protocol returns; see [`send`], [`retire`]
    /// and [`cancel`].
    pub fn execute(&mut self, msg: &Msg, meter: &mut dyn CostMeter) -> Result<Vec<LedgerEvent>> {
        let cost = self.config.gas_cost_per_entry;
        let mut staged = StagedState::new(&self.store);
        let outcome = match msg {
            Msg::Send(m) => send(&mut staged, m, meter, cost),
            Msg::Retire(m) => retire(&mut staged, m, meter, cost),
            Msg::Cancel(m) => cancel(&mut staged, m, meter, cost),
        };

        match outcome {
            Ok(events) => {
                let changes = staged.into_changes();
                let writes = changes.len();
                changes.apply(&mut self.store);
                tracing::info!(
                    msg = msg.type_name(),
                    events = events.len(),
                    writes,
                    "request committed"
                );
                Ok(events)
            }
            Err(err) => {
                tracing::warn!(
                    msg = msg.type_name(),
                    kind = %err.kind(),
                    error = %err,
                    "request rejected"
                );
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use ecoledger_state::fixtures::{DENOM, issue, standard_store};
    use ecoledger_state::{MemStore, StateReader};
    use ecoledger_types::{Address, Credits, MsgRetire};

    use super::*;
    use crate::meter::GasMeter;

    fn retire_msg(amount: &str) -> Msg {
        Msg::Retire(MsgRetire {
            owner: Address::new("regen1owner"),
            credits: vec![Credits {
                batch_denom: DENOM.into(),
                amount: amount.into(),
            }],
            jurisdiction: "CA".into(),
        })
    }

    fn ledger() -> Ledger<MemStore> {
        let mut store = standard_store(3);
        issue(&mut store, DENOM, &Address::new("regen1owner"), "5", "0");
        Ledger::new(store, LedgerConfig::default())
    }

    #[test]
    fn committed_request_updates_store() {
        let mut ledger = ledger();
        let mut meter = GasMeter::new();
        let events = ledger.execute(&retire_msg("1.5"), &mut meter).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(meter.consumed(), 10);

        let key = ledger.store().batch_by_denom(DENOM).unwrap().key;
        let supply = ledger.store().batch_supply(key).unwrap();
        assert_eq!(supply.retired_amount, "1.5");
    }

    #[test]
    fn rejected_request_leaves_store_untouched() {
        let mut ledger = ledger();
        let before = ledger.store().state_hash();
        assert!(ledger.execute(&retire_msg("6"), &mut GasMeter::new()).is_err());
        assert_eq!(ledger.store().state_hash(), before);
    }

    #[test]
    fn configured_cost_is_charged() {
        let config = LedgerConfig {
            gas_cost_per_entry: 7,
            ..LedgerConfig::default()
        };
        let mut ledger = Ledger::new(ledger().into_store(), config);
        let mut meter = GasMeter::new();
        ledger.execute(&retire_msg("1"), &mut meter).unwrap();
        assert_eq!(meter.consumed(), 7);
        assert_eq!(ledger.config().gas_cost_per_entry, 7);
    }
}
