//! System-wide constants for the ecoledger accounting core.

/// Fractional digit counts a credit type may declare.
pub const VALID_PRECISIONS: [u32; 11] = [0, 1, 2, 3, 6, 9, 12, 15, 18, 21, 24];

/// Largest precision in [`VALID_PRECISIONS`].
pub const MAX_PRECISION: u32 = 24;

/// Default cost charged to the meter for every processed credit entry.
pub const DEFAULT_GAS_COST_PER_ENTRY: u64 = 10;

/// Maximum length of a cancellation reason.
pub const MAX_REASON_LENGTH: usize = 512;

/// Maximum length of the free-text part of a jurisdiction code.
pub const MAX_JURISDICTION_POSTAL_LENGTH: usize = 64;

/// Maximum length of a credit type abbreviation.
pub const MAX_ABBREVIATION_LENGTH: usize = 3;

/// Default log level when `RUST_LOG` is unset.
pub const DEFAULT_LOG_LEVEL: &str = "info";
