use bigdecimal::{num_bigint::BigInt, BigDecimal};

use crate::hex::HexParseError;

/// Arbitrary-precision decimal used for `difficulty` and `total_difficulty`.
///
/// Ethereum mainnet's `total_difficulty` exceeds `u64::MAX` well before The
/// Merge, so these columns are carried as decimals rather than machine
/// integers all the way from parse to storage schema.
pub type Difficulty = BigDecimal;

/// Decodes a `0x`-prefixed hex quantity into a [`Difficulty`].
///
/// `eth_getBlockByNumber` returns `difficulty` and `totalDifficulty` as hex
/// quantities of unbounded width, so this cannot go through [`crate::parse_hex_u64`].
pub fn parse_hex_difficulty(raw: &str) -> Result<Difficulty, HexParseError> {
    let digits = raw
        .strip_prefix("0x")
        .or_else(|| raw.strip_prefix("0X"))
        .ok_or_else(|| HexParseError::MissingPrefix(raw.to_owned()))?;
    let digits = if digits.is_empty() { "0" } else { digits };
    let value = BigInt::parse_bytes(digits.as_bytes(), 16)
        .ok_or_else(|| HexParseError::InvalidDigits(raw.to_owned()))?;
    Ok(BigDecimal::from(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn decodes_mainnet_scale_total_difficulty() {
        // Total difficulty at The Merge overflows u64 by a wide margin.
        let td = parse_hex_difficulty("0x39a16c269fa8cd0d843a").unwrap();
        assert_eq!(td, BigDecimal::from_str("17422071407543892740158").unwrap());
    }

    #[test]
    fn decodes_zero() {
        assert_eq!(parse_hex_difficulty("0x0").unwrap(), BigDecimal::from(0));
    }
}
