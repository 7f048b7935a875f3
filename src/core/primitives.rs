use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};

use crate::core::CellValue;
use crate::error::{ChartError, ChartResult};

pub fn decimal_to_f64(value: Decimal, field_name: &str) -> ChartResult<f64> {
    value.to_f64().ok_or_else(|| {
        ChartError::InvalidData(format!("{field_name} cannot be represented as f64"))
    })
}

/// Coerces a cell into an exact decimal for aggregation.
///
/// Text cells are parsed after trimming; thousands separators are not
/// accepted. Returns `None` for anything that is not a finite number.
#[must_use]
pub fn coerce_decimal(cell: &CellValue) -> Option<Decimal> {
    match cell {
        CellValue::Number(value) if value.is_finite() => Decimal::from_f64(*value),
        CellValue::Text(text) => parse_decimal_text(text),
        _ => None,
    }
}

#[must_use]
pub fn parse_decimal_text(text: &str) -> Option<Decimal> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .ok()
}

/// Parses RFC 3339 timestamps and plain `YYYY-MM-DD` dates (midnight UTC).
#[must_use]
pub fn parse_timestamp_text(text: &str) -> Option<DateTime<Utc>> {
    let trimmed = text.trim();
    if let Ok(time) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(time.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
