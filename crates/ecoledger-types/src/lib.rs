//! # ecoledger-types
//!
//! Shared types, errors, and configuration for the **ecoledger** credit
//! accounting core.
//!
//! This crate is the leaf dependency of the workspace; every other crate
//! depends on it. It defines:
//!
//! - **Decimal engine**: [`Amount`], [`Precision`]
//! - **Identifiers**: [`Address`], [`BatchKey`], [`ClassKey`], [`ProjectKey`]
//! - **Registry records**: [`CreditType`], [`Class`], [`Project`], [`Batch`]
//! - **Balance records**: [`BatchSupply`], [`BatchBalance`], [`BasketBalance`]
//!   and their decoded views [`SupplyAmounts`], [`BalanceAmounts`]
//! - **Requests**: [`Msg`], [`MsgSend`], [`MsgRetire`], [`MsgCancel`]
//! - **Events**: [`LedgerEvent`], [`EventTransfer`], [`EventRetire`], [`EventCancel`]
//! - **Configuration**: [`LedgerConfig`], [`LoggingConfig`]
//! - **Errors**: [`LedgerError`] with `EL_ERR_` prefix codes
//! - **Constants**: system-wide limits and defaults

pub mod balance;
pub mod config;
pub mod constants;
pub mod credit;
pub mod error;
pub mod event;
pub mod ids;
pub mod math;
pub mod msg;

// Re-export all primary types at crate root for ergonomic imports:
//   use ecoledger_types::{Amount, Batch, BatchBalance, MsgSend, ...};

pub use balance::*;
pub use config::*;
pub use credit::*;
pub use error::*;
pub use event::*;
pub use ids::*;
pub use math::*;
pub use msg::*;

// Constants are accessed via `ecoledger_types::constants::FOO`
// (not re-exported to avoid name collisions).
