//! # ecoledger-state
//!
//! **Balance store interface** for the ecoledger accounting core.
//!
//! ## Architecture
//!
//! The protocols never write to a store directly:
//! 1. **[`StateReader`] / [`StateStore`]**: keyed access to registry
//!    records, batch supplies, holder balances and basket balances
//! 2. **[`StagedState`]**: an overlay that buffers every write of one
//!    operation on top of a read-only store
//! 3. **[`ChangeSet`]**: the buffered writes, applied to the store in one
//!    step once the whole operation has validated
//! 4. **[`MemStore`]**: the in-memory reference store
//!
//! ```text
//! StateStore ─borrow→ StagedState ─into_changes→ ChangeSet ─apply→ StateStore
//! ```
//!
//! A failed operation drops its `StagedState`; nothing reaches the store.

pub mod audit;
#[cfg(any(test, feature = "test-helpers"))]
pub mod fixtures;
pub mod memory;
pub mod resolve;
pub mod staged;
pub mod store;

pub use audit::verify_batch_supply;
pub use memory::MemStore;
pub use resolve::{ResolvedBatch, batch_precision, resolve_batch};
pub use staged::{ChangeSet, StagedState};
pub use store::{StateReader, StateStore};
