//! Identifiers used throughout ecoledger.
//!
//! Registry records carry a `u64` surrogate key assigned by the store;
//! holders are identified by an opaque address string whose format is
//! validated upstream.

use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Address
// ---------------------------------------------------------------------------

/// Account address of a credit holder.
///
/// The core treats addresses as opaque; encoding and checksum validation
/// happen before a request reaches it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Address(pub String);

impl Address {
    #[must_use]
    pub fn new(addr: impl Into<String>) -> Self {
        Self(addr.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Address {
    fn from(addr: &str) -> Self {
        Self(addr.to_string())
    }
}

// ---------------------------------------------------------------------------
// ClassKey
// ---------------------------------------------------------------------------

/// Surrogate key of a credit class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClassKey(pub u64);

impl fmt::Display for ClassKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "class:{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// ProjectKey
// ---------------------------------------------------------------------------

/// Surrogate key of a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectKey(pub u64);

impl fmt::Display for ProjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "project:{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// BatchKey
// ---------------------------------------------------------------------------

/// Surrogate key of a credit batch. Batches are also unique by denom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BatchKey(pub u64);

impl BatchKey {
    /// Big-endian bytes, used for canonical state encoding.
    #[must_use]
    pub fn to_be_bytes(self) -> [u8; 8] {
        self.0.to_be_bytes()
    }
}

impl fmt::Display for BatchKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "batch:{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_prefixes() {
        assert_eq!(BatchKey(7).to_string(), "batch:7");
        assert_eq!(ClassKey(1).to_string(), "class:1");
        assert_eq!(ProjectKey(2).to_string(), "project:2");
        assert_eq!(Address::new("regen1abc").to_string(), "regen1abc");
    }

    #[test]
    fn blank_address_is_empty() {
        assert!(Address::new("  ").is_empty());
        assert!(!Address::from("regen1abc").is_empty());
    }

    #[test]
    fn keys_serialize_transparently() {
        assert_eq!(serde_json::to_string(&BatchKey(42)).unwrap(), "42");
        let addr: Address = serde_json::from_str("\"regen1xyz\"").unwrap();
        assert_eq!(addr.as_str(), "regen1xyz");
    }
}
