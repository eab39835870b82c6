//! Price Calculator
//!
//! Mid price of a constant-product (x * y = k) pool from its reserves,
//! normalized for each token's decimals. All arithmetic is exact on
//! 512-bit integers; the only rounding is the final cut to a fixed
//! number of significant digits (half-up).

use alloy::primitives::{U256, U512};

/// Significant digits kept in a quoted price
pub const PRICE_SIGNIFICANT_DIGITS: usize = 18;

pub struct PriceCalculator;

impl PriceCalculator {
    /// Price of one whole `base` token in whole `quote` tokens, as an exact
    /// ratio `(numerator, denominator)`:
    ///
    /// (reserve_quote / 10^quote_decimals) / (reserve_base / 10^base_decimals)
    ///
    /// None if a reserve is zero or the scaled values do not fit.
    pub fn mid_price_ratio(
        reserve_base: U256,
        base_decimals: u8,
        reserve_quote: U256,
        quote_decimals: u8,
    ) -> Option<(U512, U512)> {
        if reserve_base.is_zero() || reserve_quote.is_zero() {
            return None;
        }

        let base = U512::from(reserve_base);
        let quote = U512::from(reserve_quote);
        let (numerator, denominator) = if base_decimals >= quote_decimals {
            (quote.checked_mul(pow10(base_decimals - quote_decimals)?)?, base)
        } else {
            (quote, base.checked_mul(pow10(quote_decimals - base_decimals)?)?)
        };

        // long division multiplies remainders (< denominator) by 10
        denominator.checked_mul(U512::from(10u8))?;
        Some((numerator, denominator))
    }

    /// Decimal string of `numerator / denominator` rounded half-up to
    /// `digits` significant digits, without trailing zeros.
    pub fn to_significant(numerator: U512, denominator: U512, digits: usize) -> String {
        if numerator.is_zero() || denominator.is_zero() || digits == 0 {
            return "0".to_string();
        }

        let ten = U512::from(10u8);
        let integer = numerator / denominator;
        let mut remainder = numerator % denominator;

        let mut out: Vec<u8> = if integer.is_zero() {
            Vec::new()
        } else {
            integer.to_string().bytes().map(|b| b - b'0').collect()
        };
        let mut point = out.len();
        let mut first = out.iter().position(|&d| d != 0);

        // one digit past the cut, for rounding
        while !remainder.is_zero() && first.map_or(true, |f| out.len() <= f + digits) {
            remainder *= ten;
            let digit = (remainder / denominator).to::<u8>();
            remainder %= denominator;
            out.push(digit);
            if first.is_none() && digit != 0 {
                first = Some(out.len() - 1);
            }
        }

        let keep = first.unwrap_or(0) + digits;
        if out.len() > keep {
            let round_up = out[keep] >= 5;
            out.truncate(keep);
            if round_up && carry(&mut out) {
                out.insert(0, 1);
                point += 1;
            }
        }
        // integer digits dropped by the cut become zeros
        while out.len() < point {
            out.push(0);
        }

        let to_str = |ds: &[u8]| ds.iter().map(|d| char::from(b'0' + d)).collect::<String>();
        let integer_part = if point == 0 {
            "0".to_string()
        } else {
            to_str(&out[..point])
        };
        let fraction = to_str(&out[point..]);
        let fraction = fraction.trim_end_matches('0');

        if fraction.is_empty() {
            integer_part
        } else {
            format!("{}.{}", integer_part, fraction)
        }
    }
}

fn pow10(exp: u8) -> Option<U512> {
    U512::from(10u8).checked_pow(U512::from(exp))
}

/// Add one at the last digit; true if the carry runs off the front
fn carry(digits: &mut [u8]) -> bool {
    for d in digits.iter_mut().rev() {
        if *d == 9 {
            *d = 0;
        } else {
            *d += 1;
            return false;
        }
    }
    true
}
