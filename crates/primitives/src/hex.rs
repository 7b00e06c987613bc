use std::fmt;

use serde::{Deserialize, Serialize};

/// A lowercase, `0x`-prefixed hex blob.
///
/// Every hex-bytes field in the record model (hashes, addresses, blooms,
/// arbitrary byte strings) is carried as one of these rather than as a raw
/// `String`, so normalization happens exactly once, at construction time.
/// Normalizing an already-normalized value is a no-op, which is what makes
/// hex normalization idempotent end to end.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HexData(String);

/// A raw payload field was not valid lowercase-or-uppercase `0x`-prefixed hex.
#[derive(Debug, thiserror::Error)]
pub enum HexParseError {
    /// The string had no `0x` prefix.
    #[error("hex value {0:?} is missing the 0x prefix")]
    MissingPrefix(String),
    /// The string contained non-hex-digit characters after the prefix.
    #[error("hex value {0:?} contains non-hex-digit characters")]
    InvalidDigits(String),
    /// The hex-encoded integer does not fit the target integer width.
    #[error("hex integer {0:?} overflows u64")]
    IntegerOverflow(String),
}

impl HexData {
    /// Normalizes an RPC-supplied hex string: lowercases it and requires the
    /// `0x` prefix already be present, which every JSON-RPC hex quantity and
    /// byte string carries by specification.
    pub fn normalize(raw: &str) -> Result<Self, HexParseError> {
        if !raw.starts_with("0x") && !raw.starts_with("0X") {
            return Err(HexParseError::MissingPrefix(raw.to_owned()));
        }
        let digits = &raw[2..];
        if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(HexParseError::InvalidDigits(raw.to_owned()));
        }
        Ok(Self(format!("0x{}", digits.to_ascii_lowercase())))
    }

    /// Builds a normalized hex string directly from raw bytes.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let mut s = String::with_capacity(2 + bytes.len() * 2);
        s.push_str("0x");
        for b in bytes {
            s.push_str(&format!("{b:02x}"));
        }
        Self(s)
    }

    /// The normalized string, e.g. `"0xdeadbeef"`.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes `self`, returning the normalized string.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for HexData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for HexData {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Decodes a `0x`-prefixed hex quantity (e.g. `l1BatchNumber`) to a `u64`.
///
/// Returns an error rather than silently truncating when the value does not
/// fit, per the invariant that optional hex-int fields are either a correct
/// integer or absent — never a sentinel.
pub fn parse_hex_u64(raw: &str) -> Result<u64, HexParseError> {
    let digits = raw
        .strip_prefix("0x")
        .or_else(|| raw.strip_prefix("0X"))
        .ok_or_else(|| HexParseError::MissingPrefix(raw.to_owned()))?;
    u64::from_str_radix(digits, 16).map_err(|_| {
        if digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            HexParseError::IntegerOverflow(raw.to_owned())
        } else {
            HexParseError::InvalidDigits(raw.to_owned())
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_lowercases_and_keeps_prefix() {
        let h = HexData::normalize("0xABCDEF").unwrap();
        assert_eq!(h.as_str(), "0xabcdef");
    }

    #[test]
    fn normalize_is_idempotent() {
        let once = HexData::normalize("0xABCDEF").unwrap();
        let twice = HexData::normalize(once.as_str()).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn normalize_rejects_missing_prefix() {
        assert!(HexData::normalize("abcdef").is_err());
    }

    #[test]
    fn parse_hex_u64_decodes_quantity() {
        assert_eq!(parse_hex_u64("0x2f45a1").unwrap(), 0x2f45a1);
    }

    #[test]
    fn parse_hex_u64_rejects_overflow_instead_of_truncating() {
        assert!(parse_hex_u64("0xffffffffffffffffff").is_err());
    }

    proptest::proptest! {
        #[test]
        fn normalize_is_idempotent_for_any_hex_digit_string(digits in "[0-9a-fA-F]{0,64}") {
            let raw = format!("0x{digits}");
            let once = HexData::normalize(&raw).unwrap();
            let twice = HexData::normalize(once.as_str()).unwrap();
            proptest::prop_assert_eq!(once, twice);
        }

        #[test]
        fn parse_hex_u64_round_trips_through_format(value: u64) {
            let raw = format!("0x{value:x}");
            proptest::prop_assert_eq!(parse_hex_u64(&raw).unwrap(), value);
        }
    }
}
