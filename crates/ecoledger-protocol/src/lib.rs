//! # ecoledger-protocol
//!
//! **Balance protocols**: transfer, retirement and cancellation of batch
//! credits, dispatched through a single [`Ledger`].
//!
//! ## Architecture
//!
//! Every operation runs in three steps:
//! 1. Stateless validation of the request ([`Msg::validate`])
//! 2. Per-entry processing against a [`StagedState`] overlay, in list
//!    order; later entries see the writes of earlier ones
//! 3. Commit: the staged [`ChangeSet`] is applied to the store and the
//!    events are returned
//!
//! If any entry fails, the overlay is dropped and the store is untouched.
//! No event is returned for a failed operation.
//!
//! [`Msg::validate`]: ecoledger_types::Msg::validate
//! [`StagedState`]: ecoledger_state::StagedState
//! [`ChangeSet`]: ecoledger_state::ChangeSet

mod common;
pub mod cancel;
pub mod ledger;
pub mod meter;
pub mod retire;
pub mod telemetry;
pub mod transfer;

pub use cancel::cancel;
pub use ledger::Ledger;
pub use meter::{CostMeter, GasMeter, NoopMeter};
pub use retire::retire;
pub use transfer::send;
