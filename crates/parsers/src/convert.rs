use indexer_primitives::{parse_hex_difficulty, parse_hex_u64, Difficulty, HexData};

use crate::error::ParseError;

pub(crate) fn hex(field: &'static str, raw: &str) -> Result<HexData, ParseError> {
    HexData::normalize(raw).map_err(|source| ParseError::InvalidHex { field, source })
}

pub(crate) fn opt_hex(field: &'static str, raw: Option<&str>) -> Result<Option<HexData>, ParseError> {
    raw.map(|v| hex(field, v)).transpose()
}

pub(crate) fn quantity(field: &'static str, raw: &str) -> Result<u64, ParseError> {
    parse_hex_u64(raw).map_err(|source| ParseError::InvalidHex { field, source })
}

pub(crate) fn opt_quantity(field: &'static str, raw: Option<&str>) -> Result<Option<u64>, ParseError> {
    raw.map(|v| quantity(field, v)).transpose()
}

pub(crate) fn decimal(field: &'static str, raw: &str) -> Result<Difficulty, ParseError> {
    parse_hex_difficulty(raw).map_err(|source| ParseError::InvalidHex { field, source })
}

pub(crate) fn require<'a, T>(field: &'static str, value: &'a Option<T>) -> Result<&'a T, ParseError> {
    value.as_ref().ok_or(ParseError::MissingField(field))
}
