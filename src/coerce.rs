/// Type Coercion Module
///
/// This module is the bridge between the untyped string cells of a
/// [`RowGrid`](crate::grid::RowGrid) and strongly-typed column values. It
/// converts in both directions with a fixed precedence order — numeric, then
/// date/time, then text — so that a numeric-looking string can never silently
/// become a date and boolean literals always land as 1/0.
///
/// Everything here is pure; parsing is culture-invariant (Rust float grammar,
/// a fixed date-time format list) regardless of the process locale.
use crate::core::{Result, SimqlError};
use chrono::{NaiveDate, NaiveDateTime};

/// The declared kind of a destination column, as reported by the caller's
/// schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Numeric,
    DateTime,
    Text,
}

/// A typed column value, the intermediate between a raw grid cell and a
/// destination column.
#[derive(Debug, Clone, PartialEq)]
pub enum TypedValue {
    Numeric(f64),
    DateTime(NaiveDateTime),
    Text(String),
}

impl From<f64> for TypedValue {
    fn from(value: f64) -> Self {
        TypedValue::Numeric(value)
    }
}

impl From<NaiveDateTime> for TypedValue {
    fn from(value: NaiveDateTime) -> Self {
        TypedValue::DateTime(value)
    }
}

impl From<&str> for TypedValue {
    fn from(value: &str) -> Self {
        TypedValue::Text(value.to_string())
    }
}

impl From<String> for TypedValue {
    fn from(value: String) -> Self {
        TypedValue::Text(value)
    }
}

/// Display form used for every date-time the engine writes out.
pub const DATETIME_DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Accepted date-time input forms, tried in order. The list replaces the
/// invariant-culture parse of the original runtime; anything outside it is
/// not a date-time to this engine.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

/// Date-only input forms, promoted to midnight.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y"];

/// Parses a culture-invariant floating-point number.
///
/// Non-finite results are rejected so that `NaN`/`inf` spellings fall
/// through the precedence chain instead of masquerading as usable numbers.
pub fn parse_numeric(raw: &str) -> Option<f64> {
    match raw.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => Some(value),
        _ => None,
    }
}

/// Parses a culture-invariant date-time against the fixed format list.
pub fn parse_datetime(raw: &str) -> Option<NaiveDateTime> {
    let trimmed = raw.trim();
    for format in DATETIME_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(parsed);
        }
    }
    for format in DATE_FORMATS {
        if let Ok(parsed) = NaiveDate::parse_from_str(trimmed, format) {
            return parsed.and_hms_opt(0, 0, 0);
        }
    }
    None
}

/// Direction A: coerces a raw string cell into the typed value a destination
/// column of `kind` can hold.
///
/// Exactly one branch runs, selected by the destination kind; the other
/// branches are skipped, not failed:
///
/// - `Numeric`: invariant float parse; failing that, case-insensitive
///   `"true"` becomes 1.0 and `"false"` becomes 0.0.
/// - `DateTime`: invariant date-time parse; failing that, a plain number is
///   accepted and returned as [`TypedValue::Numeric`] — an offset in hours
///   from the start of the run that the host anchors onto its own clock.
/// - `Text`: always succeeds, copying the raw string unchanged.
///
/// `None` means the cell could not be read into that destination; callers
/// leave the destination unset and move on, never failing the whole row.
pub fn coerce_cell(kind: ColumnKind, raw: &str) -> Option<TypedValue> {
    match kind {
        ColumnKind::Numeric => {
            if let Some(value) = parse_numeric(raw) {
                return Some(TypedValue::Numeric(value));
            }
            let trimmed = raw.trim();
            if trimmed.eq_ignore_ascii_case("true") {
                Some(TypedValue::Numeric(1.0))
            } else if trimmed.eq_ignore_ascii_case("false") {
                Some(TypedValue::Numeric(0.0))
            } else {
                None
            }
        }
        ColumnKind::DateTime => {
            if let Some(parsed) = parse_datetime(raw) {
                return Some(TypedValue::DateTime(parsed));
            }
            parse_numeric(raw).map(TypedValue::Numeric)
        }
        ColumnKind::Text => Some(TypedValue::Text(raw.to_string())),
    }
}

/// Direction B, WHERE-literal form: renders a typed value as a SQL literal
/// token.
///
/// Numbers are bare, date-times are `yyyy-MM-dd HH:mm:ss` in single quotes,
/// text is single-quoted raw, and an absent value renders as the empty
/// string (the caller's filter then fails at the database, which is the
/// surfaced diagnostic).
pub fn sql_literal(value: Option<&TypedValue>) -> String {
    match value {
        Some(TypedValue::Numeric(n)) => format_numeric(*n),
        Some(TypedValue::DateTime(dt)) => format!("'{}'", dt.format(DATETIME_DISPLAY_FORMAT)),
        Some(TypedValue::Text(s)) => format!("'{}'", s),
        None => String::new(),
    }
}

/// Direction B, cell form: renders a typed value as a plain grid cell, with
/// no quoting. Used when a source row is serialized before a write.
pub fn serialize_cell(value: Option<&TypedValue>) -> String {
    match value {
        Some(TypedValue::Numeric(n)) => format_numeric(*n),
        Some(TypedValue::DateTime(dt)) => dt.format(DATETIME_DISPLAY_FORMAT).to_string(),
        Some(TypedValue::Text(s)) => s.clone(),
        None => String::new(),
    }
}

/// Direction B for a value of unknown static kind: normalizes a raw string
/// for the write path by successful parse, mirroring Direction A's
/// precedence.
///
/// A finite number wins first and is re-rendered in invariant decimal form;
/// then a date-time is re-rendered in the display format; anything else
/// passes through unchanged.
pub fn normalize_cell(raw: &str) -> String {
    if let Some(value) = parse_numeric(raw) {
        return format_numeric(value);
    }
    if let Some(parsed) = parse_datetime(raw) {
        return parsed.format(DATETIME_DISPLAY_FORMAT).to_string();
    }
    raw.to_string()
}

/// Renders an execute-statement parameter as a bare token for positional
/// substitution.
///
/// # Errors
///
/// Returns `SimqlError::BadParameterFormat` for a non-finite numeric, the
/// one typed value with no SQL token form.
pub fn render_param(value: &TypedValue) -> Result<String> {
    match value {
        TypedValue::Numeric(n) if !n.is_finite() => Err(SimqlError::BadParameterFormat(format!(
            "numeric value {} cannot be rendered as a SQL token",
            n
        ))),
        TypedValue::Numeric(n) => Ok(format_numeric(*n)),
        TypedValue::DateTime(dt) => Ok(dt.format(DATETIME_DISPLAY_FORMAT).to_string()),
        TypedValue::Text(s) => Ok(s.clone()),
    }
}

/// Invariant decimal rendering for a finite double.
fn format_numeric(value: f64) -> String {
    value.to_string()
}
