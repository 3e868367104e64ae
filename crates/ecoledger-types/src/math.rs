//! Fixed-precision decimal engine.
//!
//! Every amount in the ledger is an [`Amount`]: an exact, non-negative
//! decimal whose fractional digit count never exceeds the [`Precision`] of
//! the credit type it belongs to. Amounts are parsed from and rendered to
//! plain base-10 strings; no floating point is involved anywhere.
//!
//! Two invariants make negative balances unrepresentable:
//! - [`Amount::parse`] rejects signs, exponents and anything that is not
//!   `digits[.digits]`.
//! - [`Amount::safe_sub`] is the only subtraction and fails with
//!   [`LedgerError::InsufficientBalance`] instead of going below zero.
//!
//! The mantissa is a `u128` scaled by `10^scale`. Parsing and arithmetic are
//! checked: a value that does not fit is [`LedgerError::InvalidAmount`],
//! never a rounded or wrapped result. Conversions to and from
//! `rust_decimal::Decimal` exist for callers on that type and fail rather
//! than round when the 96-bit mantissa is too narrow.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::constants::{MAX_PRECISION, VALID_PRECISIONS};
use crate::{LedgerError, Result};

// ---------------------------------------------------------------------------
// Precision
// ---------------------------------------------------------------------------

/// Maximum number of fractional digits permitted for a credit type.
///
/// Only the values in [`VALID_PRECISIONS`] can be constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Precision(u32);

impl Precision {
    /// The widest precision any credit type may declare.
    pub const MAX: Self = Self(MAX_PRECISION);

    /// Whole units only.
    pub const ZERO: Self = Self(0);

    /// # Errors
    /// Returns [`LedgerError::InvalidPrecision`] unless `digits` is one of
    /// [`VALID_PRECISIONS`].
    pub fn new(digits: u32) -> Result<Self> {
        if VALID_PRECISIONS.contains(&digits) {
            Ok(Self(digits))
        } else {
            Err(LedgerError::InvalidPrecision(digits))
        }
    }

    #[must_use]
    pub fn digits(self) -> u32 {
        self.0
    }
}

impl TryFrom<u32> for Precision {
    type Error = LedgerError;

    fn try_from(digits: u32) -> Result<Self> {
        Self::new(digits)
    }
}

impl From<Precision> for u32 {
    fn from(p: Precision) -> Self {
        p.0
    }
}

impl fmt::Display for Precision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Amount
// ---------------------------------------------------------------------------

/// An exact non-negative decimal amount: `units / 10^scale`.
///
/// `scale` never exceeds [`MAX_PRECISION`], so the mantissa holds 38
/// significant digits at any precision a credit type may declare.
///
/// Equality and ordering are numeric: `"5"` and `"5.00"` compare equal,
/// but each keeps its own scale when rendered.
#[derive(Debug, Clone, Copy, Default)]
pub struct Amount {
    units: u128,
    scale: u32,
}

impl Amount {
    pub const ZERO: Self = Self { units: 0, scale: 0 };

    /// Parse `s` as a non-negative decimal with at most `precision`
    /// fractional digits.
    ///
    /// Accepted grammar is `digit+ ( "." digit+ )?`. Signs, exponents,
    /// whitespace, digit separators and bare dots are rejected.
    ///
    /// # Errors
    /// - [`LedgerError::InvalidAmount`] if `s` is malformed, negative or out
    ///   of the representable range
    /// - [`LedgerError::PrecisionExceeded`] if `s` has more than
    ///   `precision` fractional digits
    pub fn parse(s: &str, precision: Precision) -> Result<Self> {
        let (whole, fraction) = split_digits(s)?;
        let scale = u32::try_from(fraction.len()).map_err(|_| invalid(s, "too many fractional digits"))?;
        if scale > precision.digits() {
            return Err(LedgerError::PrecisionExceeded {
                value: s.to_string(),
                precision: precision.digits(),
            });
        }

        let units = format!("{whole}{fraction}")
            .parse::<u128>()
            .map_err(|_| invalid(s, "exceeds representable range"))?;
        Ok(Self { units, scale })
    }

    /// Like [`Amount::parse`], but an empty string reads as zero.
    ///
    /// Stored records may leave a pool empty; request amounts must use
    /// [`Amount::parse`].
    pub fn parse_or_zero(s: &str, precision: Precision) -> Result<Self> {
        if s.is_empty() {
            Ok(Self::ZERO)
        } else {
            Self::parse(s, precision)
        }
    }

    /// Exact addition. The sum carries the wider of the two scales.
    ///
    /// # Errors
    /// Returns [`LedgerError::InvalidAmount`] if the sum cannot be held
    /// without losing digits.
    pub fn add(self, other: Self) -> Result<Self> {
        let scale = self.scale.max(other.scale);
        self.units_at(scale)
            .zip(other.units_at(scale))
            .and_then(|(a, b)| a.checked_add(b))
            .map(|units| Self { units, scale })
            .ok_or_else(|| invalid(&format!("{self} + {other}"), "sum exceeds representable range"))
    }

    /// Subtraction that refuses to go below zero.
    ///
    /// # Errors
    /// - [`LedgerError::InsufficientBalance`] if `other > self`
    /// - [`LedgerError::InvalidAmount`] if the difference cannot be held
    ///   without losing digits
    pub fn safe_sub(self, other: Self) -> Result<Self> {
        if other > self {
            return Err(LedgerError::InsufficientBalance {
                needed: other,
                available: self,
            });
        }
        let scale = self.scale.max(other.scale);
        self.units_at(scale)
            .zip(other.units_at(scale))
            .and_then(|(a, b)| a.checked_sub(b))
            .map(|units| Self { units, scale })
            .ok_or_else(|| {
                invalid(
                    &format!("{self} - {other}"),
                    "difference exceeds representable range",
                )
            })
    }

    /// Numeric three-way comparison.
    #[must_use]
    pub fn compare(&self, other: &Self) -> Ordering {
        match self.scale.cmp(&other.scale) {
            Ordering::Equal => self.units.cmp(&other.units),
            // a mantissa that overflows when widened is the larger value
            Ordering::Less => self
                .units_at(other.scale)
                .map_or(Ordering::Greater, |a| a.cmp(&other.units)),
            Ordering::Greater => other
                .units_at(self.scale)
                .map_or(Ordering::Less, |b| self.units.cmp(&b)),
        }
    }

    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.units == 0
    }

    #[must_use]
    pub fn is_positive(&self) -> bool {
        self.units != 0
    }

    /// Number of fractional digits this amount renders with.
    #[must_use]
    pub fn scale(&self) -> u32 {
        self.scale
    }

    /// Mantissa rescaled to `scale` fractional digits, if it fits.
    fn units_at(self, scale: u32) -> Option<u128> {
        let factor = 10u128.checked_pow(scale.checked_sub(self.scale)?)?;
        self.units.checked_mul(factor)
    }

    /// Same value with trailing fractional zeros removed.
    fn trimmed(self) -> Self {
        let Self { mut units, mut scale } = self;
        while scale > 0 && units % 10 == 0 {
            units /= 10;
            scale -= 1;
        }
        Self { units, scale }
    }
}

impl PartialEq for Amount {
    fn eq(&self, other: &Self) -> bool {
        self.compare(other) == Ordering::Equal
    }
}

impl Eq for Amount {}

impl PartialOrd for Amount {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Amount {
    fn cmp(&self, other: &Self) -> Ordering {
        self.compare(other)
    }
}

impl Hash for Amount {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let trimmed = self.trimmed();
        trimmed.units.hash(state);
        trimmed.scale.hash(state);
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.scale == 0 {
            return write!(f, "{}", self.units);
        }
        let scale = self.scale as usize;
        let digits = format!("{:0>width$}", self.units, width = scale + 1);
        let (whole, fraction) = digits.split_at(digits.len() - scale);
        write!(f, "{whole}.{fraction}")
    }
}

/// Lossless conversion for hosts that keep their books in `rust_decimal`.
///
/// # Errors
/// Returns [`LedgerError::InvalidAmount`] if the value has more significant
/// digits than a 96-bit mantissa can hold.
impl TryFrom<Amount> for Decimal {
    type Error = LedgerError;

    fn try_from(amount: Amount) -> Result<Self> {
        i128::try_from(amount.units)
            .ok()
            .and_then(|units| Decimal::try_from_i128_with_scale(units, amount.scale).ok())
            .ok_or_else(|| invalid(&amount.to_string(), "exceeds decimal range"))
    }
}

impl TryFrom<Decimal> for Amount {
    type Error = LedgerError;

    fn try_from(value: Decimal) -> Result<Self> {
        if value.scale() > MAX_PRECISION {
            return Err(LedgerError::PrecisionExceeded {
                value: value.to_string(),
                precision: MAX_PRECISION,
            });
        }
        let units = u128::try_from(value.mantissa())
            .map_err(|_| invalid(&value.to_string(), "negative amounts are not allowed"))?;
        Ok(Self {
            units,
            scale: value.scale(),
        })
    }
}

/// Split `s` into its whole and fractional digit runs after checking its
/// grammar. The fractional run is empty for whole numbers.
fn split_digits(s: &str) -> Result<(&str, &str)> {
    if s.is_empty() {
        return Err(invalid(s, "empty string"));
    }
    if s.starts_with('-') {
        return Err(invalid(s, "negative amounts are not allowed"));
    }

    let (whole, fraction) = match s.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (s, None),
    };
    if whole.is_empty() || !whole.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid(s, "expected base-10 digits"));
    }
    match fraction {
        None => Ok((whole, "")),
        Some(f) if f.is_empty() || !f.bytes().all(|b| b.is_ascii_digit()) => {
            Err(invalid(s, "expected base-10 digits after the decimal point"))
        }
        Some(f) => Ok((whole, f)),
    }
}

fn invalid(value: &str, reason: impl Into<String>) -> LedgerError {
    LedgerError::InvalidAmount {
        value: value.to_string(),
        reason: reason.into(),
    }
}
