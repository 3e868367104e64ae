//! Randomized request sequences against the ledger invariants.
//!
//! After every request, committed or rejected:
//! - declared supply (tradable + retired) equals the sum over holders
//! - no stored amount is negative or malformed
//! - supply retired and cancelled never decrease, nor does any holder's
//!   retired pool
//! - a rejected request leaves the state digest unchanged

use std::collections::BTreeMap;

use ecoledger_protocol::{Ledger, NoopMeter};
use ecoledger_state::fixtures::{DENOM, DENOM_B, issue, two_batch_store};
use ecoledger_state::{MemStore, StateReader, verify_batch_supply};
use ecoledger_types::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const DENOMS: [&str; 2] = [DENOM, DENOM_B];

fn precision() -> Precision {
    Precision::new(2).unwrap()
}

fn holders() -> Vec<Address> {
    ["regen1a", "regen1b", "regen1c"]
        .into_iter()
        .map(Address::new)
        .collect()
}

/// Amount in hundredths, rendered at precision 2.
fn cents(rng: &mut StdRng, max: u64) -> String {
    let v = rng.gen_range(0..=max);
    format!("{}.{:02}", v / 100, v % 100)
}

fn random_msg(rng: &mut StdRng, holders: &[Address]) -> Msg {
    let owner = holders[rng.gen_range(0..holders.len())].clone();
    let entries = rng.gen_range(1..=3);
    match rng.gen_range(0..3) {
        0 => {
            let mut recipient = holders[rng.gen_range(0..holders.len())].clone();
            if recipient == owner {
                recipient = Address::new("regen1fresh");
            }
            Msg::Send(MsgSend {
                sender: owner,
                recipient,
                credits: (0..entries)
                    .map(|_| SendCredits {
                        batch_denom: DENOMS[rng.gen_range(0..2)].into(),
                        tradable_amount: cents(rng, 3_000),
                        retired_amount: cents(rng, 1_000),
                        retirement_jurisdiction: "FR".into(),
                    })
                    .collect(),
            })
        }
        kind => {
            let credits = (0..entries)
                .map(|_| Credits {
                    batch_denom: DENOMS[rng.gen_range(0..2)].into(),
                    amount: cents(rng, 2_000),
                })
                .collect();
            if kind == 1 {
                Msg::Retire(MsgRetire {
                    owner,
                    credits,
                    jurisdiction: "FR".into(),
                })
            } else {
                Msg::Cancel(MsgCancel {
                    owner,
                    credits,
                    reason: String::new(),
                })
            }
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
struct Snapshot {
    supply_retired: BTreeMap<BatchKey, Amount>,
    supply_cancelled: BTreeMap<BatchKey, Amount>,
    holder_retired: BTreeMap<(BatchKey, Address), Amount>,
}

fn snapshot(store: &MemStore) -> Snapshot {
    let mut snap = Snapshot::default();
    for denom in DENOMS {
        let key = store.batch_by_denom(denom).unwrap().key;
        let supply = SupplyAmounts::decode(&store.batch_supply(key).unwrap(), precision()).unwrap();
        snap.supply_retired.insert(key, supply.retired);
        snap.supply_cancelled.insert(key, supply.cancelled);
        for record in store.batch_balances(key) {
            let amounts = BalanceAmounts::decode(&record, precision()).unwrap();
            snap.holder_retired
                .insert((key, record.address.clone()), amounts.retired);
        }
    }
    snap
}

fn assert_monotone(before: &Snapshot, after: &Snapshot) {
    for (key, prev) in &before.supply_retired {
        assert!(after.supply_retired[key] >= *prev);
    }
    for (key, prev) in &before.supply_cancelled {
        assert!(after.supply_cancelled[key] >= *prev);
    }
    for (slot, prev) in &before.holder_retired {
        assert!(after.holder_retired[slot] >= *prev);
    }
}

fn run_sequence(seed: u64, steps: usize) {
    let mut rng = StdRng::seed_from_u64(seed);
    let holders = holders();

    let mut store = two_batch_store(2);
    for holder in &holders {
        for denom in DENOMS {
            issue(&mut store, denom, holder, "50.00", "0");
        }
    }
    let mut ledger = Ledger::new(store, LedgerConfig::default());

    let mut committed = 0;
    for _ in 0..steps {
        let msg = random_msg(&mut rng, &holders);
        let before = snapshot(ledger.store());
        let digest = ledger.store().state_hash();

        match ledger.execute(&msg, &mut NoopMeter) {
            Ok(events) => {
                committed += 1;
                assert!(!events.is_empty());
            }
            Err(err) => {
                assert_eq!(ledger.store().state_hash(), digest, "{err}");
            }
        }

        for denom in DENOMS {
            verify_batch_supply(ledger.store(), denom).unwrap();
        }
        assert_monotone(&before, &snapshot(ledger.store()));
    }
    assert!(committed > 0, "seed {seed} committed nothing");
}

#[test]
fn invariants_hold_over_random_sequences() {
    for seed in [1, 7, 42, 2024, 9_999] {
        run_sequence(seed, 200);
    }
}
