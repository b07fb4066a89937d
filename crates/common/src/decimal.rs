//! Exact conversion between decimal text and `BigRational`.

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{Signed, Zero};

use crate::error::ParseError;

/// Largest exponent magnitude accepted by [`parse_decimal`].
pub const MAX_EXPONENT: u32 = 6144;

/// Parse `[+-]digits[.digits][(e|E)[+-]digits]` into an exact rational.
///
/// Unlike a float parse, no precision is lost: `"0.1"` is exactly `1/10`.
pub fn parse_decimal(text: &str) -> Result<BigRational, ParseError> {
    let invalid = || ParseError::InvalidDecimal(text.to_string());
    let bytes = text.as_bytes();
    let mut pos = 0;

    let negative = match bytes.first() {
        Some(b'-') => {
            pos += 1;
            true
        }
        Some(b'+') => {
            pos += 1;
            false
        }
        _ => false,
    };

    let int_start = pos;
    while pos < bytes.len() && bytes[pos].is_ascii_digit() {
        pos += 1;
    }
    if pos == int_start {
        return Err(invalid());
    }
    let mut digits = text[int_start..pos].to_string();

    let mut frac_len = 0u32;
    if pos < bytes.len() && bytes[pos] == b'.' {
        pos += 1;
        let frac_start = pos;
        while pos < bytes.len() && bytes[pos].is_ascii_digit() {
            pos += 1;
        }
        if pos == frac_start {
            return Err(invalid());
        }
        digits.push_str(&text[frac_start..pos]);
        frac_len = u32::try_from(pos - frac_start).map_err(|_| invalid())?;
    }

    let mut exponent: i64 = 0;
    if pos < bytes.len() && (bytes[pos] == b'e' || bytes[pos] == b'E') {
        pos += 1;
        let exp_text = &text[pos..];
        let unsigned = exp_text.strip_prefix(|c: char| c == '+' || c == '-').unwrap_or(exp_text);
        if unsigned.is_empty() || !unsigned.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        exponent = exp_text.parse().map_err(|_| invalid())?;
        if exponent.unsigned_abs() > u64::from(MAX_EXPONENT) {
            return Err(invalid());
        }
        pos = bytes.len();
    }

    if pos != bytes.len() {
        return Err(invalid());
    }

    let mut mantissa: BigInt = digits.parse().map_err(|_| invalid())?;
    if negative {
        mantissa = -mantissa;
    }

    let scale = i64::from(frac_len) - exponent;
    let ten = BigInt::from(10u32);
    let value = if scale >= 0 {
        let power = u32::try_from(scale).map_err(|_| invalid())?;
        BigRational::new(mantissa, ten.pow(power))
    } else {
        let power = u32::try_from(-scale).map_err(|_| invalid())?;
        BigRational::from_integer(mantissa * ten.pow(power))
    };
    Ok(value)
}

/// Render a rational as exact decimal text.
///
/// Values whose reduced denominator has prime factors other than 2 and 5
/// have no finite decimal expansion and are rendered as `numer/denom`.
pub fn format_decimal(value: &BigRational) -> String {
    let numer = value.numer();
    let denom = value.denom();
    if value.is_integer() {
        return numer.to_string();
    }

    let two = BigInt::from(2u32);
    let five = BigInt::from(5u32);
    let mut rest = denom.clone();
    let mut twos = 0u32;
    let mut fives = 0u32;
    while (&rest % &two).is_zero() {
        rest /= &two;
        twos += 1;
    }
    while (&rest % &five).is_zero() {
        rest /= &five;
        fives += 1;
    }
    if rest != BigInt::from(1u32) {
        return format!("{numer}/{denom}");
    }

    let scale = twos.max(fives);
    let scaled = numer.abs() * BigInt::from(10u32).pow(scale) / denom;
    let mut digits = scaled.to_string();
    let scale = scale as usize;
    if digits.len() <= scale {
        digits = format!("{}{digits}", "0".repeat(scale + 1 - digits.len()));
    }
    let split = digits.len() - scale;
    let sign = if numer.is_negative() { "-" } else { "" };
    format!("{sign}{}.{}", &digits[..split], &digits[split..])
}
