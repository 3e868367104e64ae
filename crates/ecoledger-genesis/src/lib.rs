//! # ecoledger-genesis
//!
//! **Genesis snapshots**: the serialized form of a complete ledger state,
//! the consistency check run over it, and validated import into a store.
//!
//! ## Pipeline
//!
//! ```text
//! JSON ─from_json→ GenesisState ─validate_genesis→ ok ─import_genesis→ StateStore
//! ```
//!
//! Validation only reads the snapshot. Its registries are local maps built
//! per call and dropped when it returns.

pub mod import;
pub mod state;
pub mod validate;

pub use import::import_genesis;
pub use state::GenesisState;
pub use validate::validate_genesis;
