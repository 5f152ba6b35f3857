use crate::api::errors::ApiError;

const MONTH_NAMES: &[(&str, u8)] = &[
    ("january", 1),
    ("february", 2),
    ("march", 3),
    ("april", 4),
    ("may", 5),
    ("june", 6),
    ("july", 7),
    ("august", 8),
    ("september", 9),
    ("october", 10),
    ("november", 11),
    ("december", 12),
];

/// Month parameter: a 1-12 number or an English month name,
/// case-insensitive.
pub(crate) fn parse_month(raw: &str) -> Result<u8, ApiError> {
    let trimmed = raw.trim();

    if let Ok(value) = trimmed.parse::<i64>() {
        if (1..=12).contains(&value) {
            return Ok(value as u8);
        }
        return Err(ApiError::BadRequest(format!("Month must be between 1 and 12, got {value}")));
    }

    let lowered = trimmed.to_ascii_lowercase();
    MONTH_NAMES
        .iter()
        .find(|(name, _)| *name == lowered)
        .map(|(_, value)| *value)
        .ok_or_else(|| ApiError::BadRequest(format!("Invalid month: '{trimmed}'")))
}
