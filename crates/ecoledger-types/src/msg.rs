//! Request shapes for the three balance operations.
//!
//! [`Msg`] is the single entry type the ledger dispatches on. Each variant
//! carries only what its protocol needs. `validate()` performs every check
//! that does not need state; the protocols re-parse amounts at the batch
//! precision once the batch is known.

use serde::{Deserialize, Serialize};

use crate::constants::{MAX_JURISDICTION_POSTAL_LENGTH, MAX_REASON_LENGTH};
use crate::{Address, Amount, LedgerError, Precision, Result};

/// One batch worth of credits in a [`MsgSend`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendCredits {
    pub batch_denom: String,
    /// Amount the recipient receives as tradable.
    pub tradable_amount: String,
    /// Amount retired on receipt, debited from the sender's tradable pool.
    pub retired_amount: String,
    /// Required when `retired_amount` is positive.
    #[serde(default)]
    pub retirement_jurisdiction: String,
}

/// Transfer credits from `sender` to `recipient`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgSend {
    pub sender: Address,
    pub recipient: Address,
    pub credits: Vec<SendCredits>,
}

/// One batch worth of credits in a [`MsgRetire`] or [`MsgCancel`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credits {
    pub batch_denom: String,
    pub amount: String,
}

/// Retire tradable credits held by `owner`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgRetire {
    pub owner: Address,
    pub credits: Vec<Credits>,
    pub jurisdiction: String,
}

/// Cancel tradable credits held by `owner`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgCancel {
    pub owner: Address,
    pub credits: Vec<Credits>,
    pub reason: String,
}

/// A balance-mutating request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Msg {
    Send(MsgSend),
    Retire(MsgRetire),
    Cancel(MsgCancel),
}

impl Msg {
    /// Stateless validation of the wrapped request.
    pub fn validate(&self) -> Result<()> {
        match self {
            Self::Send(msg) => msg.validate(),
            Self::Retire(msg) => msg.validate(),
            Self::Cancel(msg) => msg.validate(),
        }
    }

    /// Short name used in logs and cost descriptors.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Send(_) => "send",
            Self::Retire(_) => "retire",
            Self::Cancel(_) => "cancel",
        }
    }
}

impl MsgSend {
    /// # Errors
    /// - `InvalidRequest` for empty addresses, self-sends, an empty credit
    ///   list, empty denoms or a missing/malformed retirement jurisdiction
    /// - `InvalidAmount` for malformed amounts
    pub fn validate(&self) -> Result<()> {
        require_address(&self.sender, "sender")?;
        require_address(&self.recipient, "recipient")?;
        if self.sender == self.recipient {
            return Err(LedgerError::invalid_request(
                "sender and recipient cannot be the same",
            ));
        }
        require_credits(self.credits.len())?;
        for credit in &self.credits {
            require_denom(&credit.batch_denom)?;
            Amount::parse(&credit.tradable_amount, Precision::MAX)?;
            let retired = Amount::parse(&credit.retired_amount, Precision::MAX)?;
            if retired.is_positive() {
                validate_jurisdiction(&credit.retirement_jurisdiction)?;
            }
        }
        Ok(())
    }
}

impl MsgRetire {
    /// # Errors
    /// `InvalidRequest` for an empty owner, an empty credit list, empty
    /// denoms, zero amounts or a malformed jurisdiction; `InvalidAmount` for
    /// malformed amounts.
    pub fn validate(&self) -> Result<()> {
        require_address(&self.owner, "owner")?;
        require_credits(self.credits.len())?;
        for credit in &self.credits {
            credit.validate()?;
        }
        validate_jurisdiction(&self.jurisdiction)
    }
}

impl MsgCancel {
    /// # Errors
    /// `InvalidRequest` for an empty owner, an empty credit list, empty
    /// denoms, zero amounts or an over-long reason; `InvalidAmount` for
    /// malformed amounts.
    pub fn validate(&self) -> Result<()> {
        require_address(&self.owner, "owner")?;
        require_credits(self.credits.len())?;
        for credit in &self.credits {
            credit.validate()?;
        }
        if self.reason.len() > MAX_REASON_LENGTH {
            return Err(LedgerError::invalid_request(format!(
                "reason exceeds {MAX_REASON_LENGTH} characters"
            )));
        }
        Ok(())
    }
}

impl Credits {
    fn validate(&self) -> Result<()> {
        require_denom(&self.batch_denom)?;
        let amount = Amount::parse(&self.amount, Precision::MAX)?;
        if amount.is_zero() {
            return Err(LedgerError::invalid_request(format!(
                "amount for {} must be positive",
                self.batch_denom
            )));
        }
        Ok(())
    }
}

fn require_address(addr: &Address, field: &str) -> Result<()> {
    if addr.is_empty() {
        return Err(LedgerError::invalid_request(format!("{field} cannot be empty")));
    }
    Ok(())
}

fn require_credits(count: usize) -> Result<()> {
    if count == 0 {
        return Err(LedgerError::invalid_request("credits cannot be empty"));
    }
    Ok(())
}

fn require_denom(denom: &str) -> Result<()> {
    if denom.trim().is_empty() {
        return Err(LedgerError::invalid_request("batch denom cannot be empty"));
    }
    Ok(())
}

/// Check a jurisdiction code of the form `CC[-RRR[ postal]]`.
///
/// `CC` is a two-letter uppercase country code, `RRR` one to three
/// uppercase letters or digits, and `postal` up to 64 characters of
/// letters, digits, spaces and hyphens.
///
/// # Errors
/// Returns [`LedgerError::InvalidRequest`] if `jurisdiction` does not match.
pub fn validate_jurisdiction(jurisdiction: &str) -> Result<()> {
    let bad = || LedgerError::invalid_request(format!("invalid jurisdiction {jurisdiction:?}"));

    let (country, rest) = match jurisdiction.split_once('-') {
        Some((country, rest)) => (country, Some(rest)),
        None => (jurisdiction, None),
    };
    if country.len() != 2 || !country.bytes().all(|b| b.is_ascii_uppercase()) {
        return Err(bad());
    }
    let Some(rest) = rest else {
        return Ok(());
    };

    let (region, postal) = match rest.split_once(' ') {
        Some((region, postal)) => (region, Some(postal)),
        None => (rest, None),
    };
    if region.is_empty()
        || region.len() > 3
        || !region
            .bytes()
            .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit())
    {
        return Err(bad());
    }
    if let Some(postal) = postal {
        if postal.is_empty()
            || postal.len() > MAX_JURISDICTION_POSTAL_LENGTH
            || !postal
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || b == b' ' || b == b'-')
        {
            return Err(bad());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    const DENOM: &str = "C01-001-20200101-20210101-001";

    fn retire(amount: &str, jurisdiction: &str) -> MsgRetire {
        MsgRetire {
            owner: Address::new("regen1owner"),
            credits: vec![Credits {
                batch_denom: DENOM.into(),
                amount: amount.into(),
            }],
            jurisdiction: jurisdiction.into(),
        }
    }

    fn send(tradable: &str, retired: &str, jurisdiction: &str) -> MsgSend {
        MsgSend {
            sender: Address::new("regen1sender"),
            recipient: Address::new("regen1recipient"),
            credits: vec![SendCredits {
                batch_denom: DENOM.into(),
                tradable_amount: tradable.into(),
                retired_amount: retired.into(),
                retirement_jurisdiction: jurisdiction.into(),
            }],
        }
    }

    #[test]
    fn valid_retire() {
        assert!(retire("10", "AB-CDE FG1 345").validate().is_ok());
    }

    #[test]
    fn retire_requires_owner_and_credits() {
        let mut msg = retire("10", "AB-CDE FG1 345");
        msg.owner = Address::new("");
        assert_eq!(msg.validate().unwrap_err().kind(), ErrorKind::InvalidRequest);

        let mut msg = retire("10", "AB-CDE FG1 345");
        msg.credits.clear();
        assert_eq!(msg.validate().unwrap_err().kind(), ErrorKind::InvalidRequest);

        let mut msg = retire("10", "AB-CDE FG1 345");
        msg.credits[0].batch_denom = String::new();
        assert_eq!(msg.validate().unwrap_err().kind(), ErrorKind::InvalidRequest);
    }

    #[test]
    fn retire_rejects_bad_amounts() {
        assert_eq!(
            retire("", "US").validate().unwrap_err().kind(),
            ErrorKind::InvalidAmount
        );
        assert_eq!(
            retire("-10", "US").validate().unwrap_err().kind(),
            ErrorKind::InvalidAmount
        );
        assert_eq!(
            retire("0", "US").validate().unwrap_err().kind(),
            ErrorKind::InvalidRequest
        );
    }

    #[test]
    fn retire_rejects_bad_jurisdiction() {
        for j in ["", "A", "us", "USA", "US-", "US-ABCD", "US-WA ", "US-WA $$"] {
            assert!(retire("10", j).validate().is_err(), "jurisdiction {j:?}");
        }
        for j in ["US", "US-WA", "US-WA 98101", "AB-CDE FG1 345", "CD-1 a-b"] {
            assert!(retire("10", j).validate().is_ok(), "jurisdiction {j:?}");
        }
    }

    #[test]
    fn send_requires_jurisdiction_only_when_retiring() {
        assert!(send("10", "0", "").validate().is_ok());
        assert!(send("10", "5", "").validate().is_err());
        assert!(send("10", "5", "US-OR").validate().is_ok());
    }

    #[test]
    fn send_to_self_rejected() {
        let mut msg = send("10", "0", "");
        msg.recipient = msg.sender.clone();
        assert_eq!(msg.validate().unwrap_err().kind(), ErrorKind::InvalidRequest);
    }

    #[test]
    fn cancel_reason_length_bounded() {
        let mut msg = MsgCancel {
            owner: Address::new("regen1owner"),
            credits: vec![Credits {
                batch_denom: DENOM.into(),
                amount: "5".into(),
            }],
            reason: "bridge-out".into(),
        };
        assert!(msg.validate().is_ok());
        msg.reason = "x".repeat(MAX_REASON_LENGTH + 1);
        assert!(msg.validate().is_err());
    }

    #[test]
    fn msg_dispatch_names_and_serde() {
        let msg = Msg::Retire(retire("1", "US"));
        assert_eq!(msg.type_name(), "retire");
        assert!(msg.validate().is_ok());
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["type"], "retire");
        let back: Msg = serde_json::from_value(json).unwrap();
        assert_eq!(back, msg);
    }
}
