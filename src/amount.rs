// Fixed-point monetary amounts
//
// Every stake, price, share count and balance in the ledger is an unsigned
// fixed-point number scaled by 10^18 (one base unit = 1/10^18 of the market's
// value unit). Arithmetic is checked: anything that would overflow fails the
// enclosing operation instead of wrapping.

use alloy_primitives::U256;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::MarketError;

/// Base units per whole value unit (18 decimals).
pub const WEI_PER_UNIT: u128 = 1_000_000_000_000_000_000;

/// Unsigned fixed-point amount in base units (10^18 per unit).
///
/// Wire representation is a decimal string of base units, so JSON round-trips
/// never lose precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Hash)]
pub struct Amount(u128);

impl Amount {
    pub const ZERO: Amount = Amount(0);

    pub const fn from_wei(wei: u128) -> Self {
        Amount(wei)
    }

    /// Whole value units, exact (`3` -> 3 * 10^18 base units).
    pub const fn from_units(units: u64) -> Self {
        Amount(units as u128 * WEI_PER_UNIT)
    }

    pub const fn wei(&self) -> u128 {
        self.0
    }

    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub fn checked_add(self, rhs: Amount) -> Result<Amount, MarketError> {
        self.0
            .checked_add(rhs.0)
            .map(Amount)
            .ok_or(MarketError::ArithmeticOverflow)
    }

    pub fn checked_sub(self, rhs: Amount) -> Result<Amount, MarketError> {
        self.0
            .checked_sub(rhs.0)
            .map(Amount)
            .ok_or(MarketError::ArithmeticOverflow)
    }

    /// `self * numerator / denominator`, truncating toward zero.
    ///
    /// The intermediate product is taken in 256 bits: two 10^18-scaled u128
    /// amounts multiplied together overflow u128 at entirely ordinary
    /// volumes (~340 units each).
    pub fn mul_div(self, numerator: Amount, denominator: Amount) -> Result<Amount, MarketError> {
        if denominator.is_zero() {
            return Err(MarketError::ArithmeticOverflow);
        }
        let product = U256::from(self.0) * U256::from(numerator.0);
        let quotient = product / U256::from(denominator.0);
        u128::try_from(quotient)
            .map(Amount)
            .map_err(|_| MarketError::ArithmeticOverflow)
    }

    /// Fixed-point divide: `self / divisor` where both are 10^18-scaled.
    /// Result is 10^18-scaled, truncating toward zero.
    pub fn fixed_div(self, divisor: Amount) -> Result<Amount, MarketError> {
        self.mul_div(Amount(WEI_PER_UNIT), divisor)
    }

    /// Parse a human decimal string of whole units (e.g. `"0.01"`) into base
    /// units, exactly. Fails on negatives and on more than 18 fractional
    /// digits.
    pub fn from_unit_str(s: &str) -> Result<Amount, MarketError> {
        let decimal = Decimal::from_str(s.trim())
            .map_err(|_| MarketError::InvalidAmount(s.to_string()))?;
        if decimal.is_sign_negative() {
            return Err(MarketError::InvalidAmount(s.to_string()));
        }
        let scaled = decimal
            .checked_mul(Decimal::from(WEI_PER_UNIT as u64))
            .ok_or_else(|| MarketError::InvalidAmount(s.to_string()))?;
        if scaled.fract() != Decimal::ZERO {
            return Err(MarketError::InvalidAmount(s.to_string()));
        }
        scaled
            .trunc()
            .to_u128()
            .map(Amount)
            .ok_or_else(|| MarketError::InvalidAmount(s.to_string()))
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Amount {
    type Err = MarketError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u128>()
            .map(Amount)
            .map_err(|_| MarketError::InvalidAmount(s.to_string()))
    }
}

impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0.to_string())
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
