use std::fmt;

use bigdecimal::BigDecimal;
use ruint::aliases::U256;
use thiserror::Error;

/// Fixed-point precision of the emitted prices.
pub const PRICE_DECIMALS: u32 = 18;

/// Literal written in place of a price that could not be determined.
pub const ABSENCE_MARKER: &str = "None";

/// A USD price as an 18-decimal fixed-point integer, or the explicit lack of one.
///
/// `Absent` renders as [`ABSENCE_MARKER`], never as zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScaledPrice {
    Value(U256),
    Absent,
}

impl ScaledPrice {
    pub fn from_price(price: Option<&BigDecimal>) -> Result<Self, ScalePriceError> {
        match price {
            Some(price) => Ok(ScaledPrice::Value(scale_price(price)?)),
            None => Ok(ScaledPrice::Absent),
        }
    }
}

impl fmt::Display for ScaledPrice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScaledPrice::Value(value) => write!(f, "{}", value),
            ScaledPrice::Absent => f.write_str(ABSENCE_MARKER),
        }
    }
}

/// Prices at or above 10^60 exceed `U256::MAX` (~1.16e77) once scaled by 10^18.
const MAX_PRICE_MAGNITUDE: i64 = 60;

/// `floor(price * 10^18)` in exact decimal arithmetic.
pub fn scale_price(price: &BigDecimal) -> Result<U256, ScalePriceError> {
    if *price < BigDecimal::from(0) {
        return Err(ScalePriceError::Negative(price.clone()));
    }

    // price < 10^magnitude; bail out before rescaling by a huge exponent
    let (_, scale) = price.as_bigint_and_exponent();
    let magnitude = (price.digits() as i64).saturating_sub(scale);
    if magnitude <= -(PRICE_DECIMALS as i64) {
        return Ok(U256::ZERO);
    }
    if magnitude > MAX_PRICE_MAGNITUDE {
        return Err(ScalePriceError::Overflow(price.clone()));
    }

    // Non-negative, so dropping the fractional digits is the floor
    let scaled = (price * BigDecimal::from(10u64.pow(PRICE_DECIMALS))).with_scale(0);
    let (digits, _) = scaled.into_bigint_and_exponent();

    digits.to_string().parse::<U256>().map_err(|_| ScalePriceError::Overflow(price.clone()))
}

#[derive(Debug, Error)]
pub enum ScalePriceError {
    #[error("Price {0} is negative")]
    Negative(BigDecimal),

    #[error("Price {0} does not fit in 256 bits once scaled")]
    Overflow(BigDecimal),
}
