//! Raw leave records as handed to the engine by the I/O layer.
//!
//! A [`RawRecord`] is a flat map from field name to [`FieldValue`]. Values
//! are kept as supplied and coerced lazily by the typed accessors, so a
//! record carrying `"40"` and one carrying `40` derive the same variables.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// Date-time layouts accepted for date fields, tried in order after the
/// plain date layouts.
const DATETIME_FORMATS: [&str; 6] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %I:%M:%S %p",
];

/// Plain date layouts accepted for date fields.
const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%m/%d/%Y"];

/// A single value in a raw record.
///
/// Deserialization is untagged: JSON `null` is [`FieldValue::Null`], strings
/// are [`FieldValue::Text`] and numbers are [`FieldValue::Number`]. Dates
/// arrive as text and are recognised by [`RawRecord::date`];
/// [`FieldValue::Date`] exists for callers building records in code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// An explicit null.
    Null,
    /// A string value. Blank strings are treated as absent.
    Text(String),
    /// A numeric value.
    Number(Decimal),
    /// A calendar date.
    Date(NaiveDate),
}

impl FieldValue {
    /// Returns true for null and blank text.
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Null => true,
            Self::Text(text) => text.trim().is_empty(),
            Self::Number(_) | Self::Date(_) => false,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => Ok(()),
            Self::Text(text) => f.write_str(text.trim()),
            Self::Number(number) => write!(f, "{}", number.normalize()),
            Self::Date(date) => write!(f, "{}", date.format("%Y-%m-%d")),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<Decimal> for FieldValue {
    fn from(value: Decimal) -> Self {
        Self::Number(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        Self::Number(Decimal::from(value))
    }
}

impl From<NaiveDate> for FieldValue {
    fn from(value: NaiveDate) -> Self {
        Self::Date(value)
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

/// A flat leave record keyed by field name.
///
/// # Example
///
/// ```
/// use leave_engine::models::RawRecord;
/// use rust_decimal::Decimal;
///
/// let record = RawRecord::new()
///     .with("SCHED_HRS", "40")
///     .with("PAY_RATE", Decimal::new(20, 0))
///     .with("CHECK_SEQ", "");
///
/// assert_eq!(record.decimal("SCHED_HRS").unwrap(), Some(Decimal::new(40, 0)));
/// assert!(!record.is_present("CHECK_SEQ"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawRecord {
    fields: BTreeMap<String, FieldValue>,
}

impl RawRecord {
    /// Creates an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the record with `field` set to `value`.
    pub fn with(mut self, field: &str, value: impl Into<FieldValue>) -> Self {
        self.insert(field, value);
        self
    }

    /// Sets `field` to `value`, replacing any previous value.
    pub fn insert(&mut self, field: &str, value: impl Into<FieldValue>) {
        self.fields.insert(field.to_string(), value.into());
    }

    /// Returns the value of `field` when it is present and not blank.
    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.fields.get(field).filter(|value| !value.is_blank())
    }

    /// Returns true when `field` holds a non-blank value.
    pub fn is_present(&self, field: &str) -> bool {
        self.get(field).is_some()
    }

    /// Iterates over every stored field, blank ones included.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Number of stored fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true when the record stores no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Returns the trimmed text form of `field`.
    pub fn text(&self, field: &str) -> Option<String> {
        self.get(field).map(ToString::to_string)
    }

    /// Returns true when `field` is the flag `Y` (case-insensitive).
    pub fn is_yes(&self, field: &str) -> bool {
        self.text(field)
            .is_some_and(|value| value.eq_ignore_ascii_case("Y"))
    }

    /// Coerces `field` to a decimal.
    ///
    /// Absent and blank values yield `Ok(None)`; text that is not a number
    /// is a [`EngineError::ParseError`].
    pub fn decimal(&self, field: &str) -> EngineResult<Option<Decimal>> {
        match self.get(field) {
            None => Ok(None),
            Some(FieldValue::Number(number)) => Ok(Some(*number)),
            Some(FieldValue::Text(text)) => parse_decimal(text.trim())
                .map(Some)
                .ok_or_else(|| EngineError::parse(field, text.trim(), "a decimal number")),
            Some(other) => Err(EngineError::parse(
                field,
                other.to_string(),
                "a decimal number",
            )),
        }
    }

    /// Coerces `field` to a whole number.
    pub fn integer(&self, field: &str) -> EngineResult<Option<i64>> {
        let Some(number) = self.decimal(field).map_err(|_| self.not_integer(field))? else {
            return Ok(None);
        };
        if !number.fract().is_zero() {
            return Err(self.not_integer(field));
        }
        i64::try_from(number.trunc())
            .map(Some)
            .map_err(|_| self.not_integer(field))
    }

    /// Coerces `field` to a calendar date.
    ///
    /// Accepts `YYYY-MM-DD`, `MM/DD/YYYY` and ISO-8601 style date-times, whose
    /// time component is discarded.
    pub fn date(&self, field: &str) -> EngineResult<Option<NaiveDate>> {
        match self.get(field) {
            None => Ok(None),
            Some(FieldValue::Date(date)) => Ok(Some(*date)),
            Some(FieldValue::Text(text)) => parse_date(text.trim())
                .map(Some)
                .ok_or_else(|| EngineError::parse(field, text.trim(), "a date")),
            Some(other) => Err(EngineError::parse(field, other.to_string(), "a date")),
        }
    }

    fn not_integer(&self, field: &str) -> EngineError {
        EngineError::parse(field, self.text(field).unwrap_or_default(), "an integer")
    }
}

impl<K: Into<String>, V: Into<FieldValue>> FromIterator<(K, V)> for RawRecord {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(name, value)| (name.into(), value.into()))
                .collect(),
        }
    }
}

fn parse_decimal(text: &str) -> Option<Decimal> {
    Decimal::from_str(text)
        .or_else(|_| Decimal::from_scientific(text))
        .ok()
}

/// Parses a date in any of the accepted layouts.
pub(crate) fn parse_date(text: &str) -> Option<NaiveDate> {
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(text, format).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
                .map(|datetime| datetime.date())
        })
        .or_else(|| {
            chrono::DateTime::parse_from_rfc3339(text)
                .ok()
                .map(|datetime| datetime.date_naive())
        })
}
