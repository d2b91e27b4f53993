//! Token unit scaling.
//!
//! Reward amounts come off the contract as raw integers. Operators think in
//! "M" units (millions of whole tokens), so the threshold is configured in
//! display units and converted here. Conversions are exact integer math; the
//! result of `to_raw` is what the claim decision compares against.

use alloy::primitives::U256;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{JagerError, Result};

/// Largest power of ten that fits in a U256.
const MAX_TOTAL_EXPONENT: u32 = 77;

/// Decimal layout of the reward token plus the display unit exponent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenScale {
    decimals: u8,
    display_exponent: u8,
}

impl TokenScale {
    pub fn new(decimals: u8, display_exponent: u8) -> Result<Self> {
        let total = decimals as u32 + display_exponent as u32;
        if total > MAX_TOTAL_EXPONENT {
            return Err(JagerError::Validation(format!(
                "token decimals ({}) + display exponent ({}) exceeds {}",
                decimals, display_exponent, MAX_TOTAL_EXPONENT
            )));
        }
        Ok(Self {
            decimals,
            display_exponent,
        })
    }

    pub fn decimals(&self) -> u8 {
        self.decimals
    }

    pub fn display_exponent(&self) -> u8 {
        self.display_exponent
    }

    fn total_exponent(&self) -> u32 {
        self.decimals as u32 + self.display_exponent as u32
    }

    /// Raw units per one display unit.
    pub fn divisor(&self) -> U256 {
        pow10(self.total_exponent())
    }

    /// Unit label for the display exponent ("M" for millions).
    pub fn unit_suffix(&self) -> &'static str {
        match self.display_exponent {
            0 => "",
            3 => "K",
            6 => "M",
            9 => "B",
            _ => "",
        }
    }

    /// Convert a display amount to raw units.
    ///
    /// Fails if the amount is negative, has more fractional digits than the
    /// token can represent, or overflows 256 bits.
    pub fn to_raw(&self, display: Decimal) -> Result<U256> {
        if display.is_sign_negative() && !display.is_zero() {
            return Err(JagerError::Validation(format!(
                "amount must not be negative: {}",
                display
            )));
        }

        let display = display.normalize();
        let mantissa = display.mantissa().unsigned_abs();
        let scale = display.scale();
        let exponent = self.total_exponent();

        if scale <= exponent {
            U256::from(mantissa)
                .checked_mul(pow10(exponent - scale))
                .ok_or_else(|| {
                    JagerError::Validation(format!("amount {} overflows uint256", display))
                })
        } else {
            let excess = 10u128.pow(scale - exponent);
            if mantissa % excess != 0 {
                return Err(JagerError::Validation(format!(
                    "amount {} has more than {} fractional digits",
                    display, exponent
                )));
            }
            Ok(U256::from(mantissa / excess))
        }
    }

    /// Render a raw amount in display units, truncated to `precision` digits.
    pub fn format(&self, raw: U256, precision: u32) -> String {
        let divisor = self.divisor();
        let whole = raw / divisor;
        let remainder = raw % divisor;

        if precision == 0 {
            return whole.to_string();
        }

        let exponent = self.total_exponent();
        let fraction = if exponent >= precision {
            remainder / pow10(exponent - precision)
        } else {
            remainder * pow10(precision - exponent)
        };

        format!(
            "{}.{:0>width$}",
            whole,
            fraction.to_string(),
            width = precision as usize
        )
    }

    /// A display value bound to this scale, for log lines.
    pub fn display(&self, raw: U256) -> ScaledAmount {
        ScaledAmount { raw, scale: *self }
    }
}

impl Default for TokenScale {
    fn default() -> Self {
        Self {
            decimals: 18,
            display_exponent: 6,
        }
    }
}

fn pow10(exponent: u32) -> U256 {
    U256::from(10u64).pow(U256::from(exponent))
}

/// Raw amount plus its scale; `Display` prints e.g. `13784.00M`.
#[derive(Debug, Clone, Copy)]
pub struct ScaledAmount {
    raw: U256,
    scale: TokenScale,
}

impl fmt::Display for ScaledAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}",
            self.scale.format(self.raw, 2),
            self.scale.unit_suffix()
        )
    }
}
