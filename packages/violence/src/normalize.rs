//! Raw row to typed record conversion.
//!
//! Numeric fields use a lenient integer parse: leading whitespace and an
//! optional sign are accepted, digits are read up to the first non-digit,
//! and anything without a leading number becomes `0`. Years outside
//! `0..=9999` and months above 12 also become `0`, so a date key always
//! renders as `YYYY-MM`. A defaulted field never fails the batch, but it
//! is reported back to the caller as a [`DefaultedField`].

use std::fmt;
use std::ops::RangeInclusive;

use memorial_violence_models::{NormalizedRecord, RawRecord, RecordCategory};

/// Why a numeric field fell back to zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefaultReason {
    /// The field was empty or whitespace.
    Empty,
    /// The field did not start with a number.
    NotANumber,
    /// The value was negative where only non-negative values are valid.
    Negative,
    /// The value did not fit the target integer type.
    OutOfRange,
}

impl fmt::Display for DefaultReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Empty => "empty",
            Self::NotANumber => "not a number",
            Self::Negative => "negative",
            Self::OutOfRange => "out of range",
        })
    }
}

/// Outcome of a lenient numeric parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParsedCount<T> {
    /// A number was read.
    Parsed(T),
    /// No usable number; the value is `T::default()` (zero).
    Defaulted(DefaultReason),
}

impl<T: Default + Copy> ParsedCount<T> {
    /// The parsed value, or zero when defaulted.
    #[must_use]
    pub fn value(self) -> T {
        match self {
            Self::Parsed(value) => value,
            Self::Defaulted(_) => T::default(),
        }
    }
}

/// Reads the leading integer of `s`.
fn leading_integer(s: &str) -> Result<i128, DefaultReason> {
    let s = s.trim_start();
    if s.trim_end().is_empty() {
        return Err(DefaultReason::Empty);
    }

    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return Err(DefaultReason::NotANumber);
    }

    let magnitude: i128 = digits[..end]
        .parse()
        .map_err(|_| DefaultReason::OutOfRange)?;

    Ok(if negative { -magnitude } else { magnitude })
}

/// Leniently parses a signed or unsigned integer.
///
/// Negative input for an unsigned target is reported as
/// [`DefaultReason::Negative`].
#[must_use]
pub fn parse_count<T>(s: &str) -> ParsedCount<T>
where
    T: TryFrom<i128>,
{
    match leading_integer(s) {
        Ok(value) => match T::try_from(value) {
            Ok(value) => ParsedCount::Parsed(value),
            Err(_) if value < 0 => ParsedCount::Defaulted(DefaultReason::Negative),
            Err(_) => ParsedCount::Defaulted(DefaultReason::OutOfRange),
        },
        Err(reason) => ParsedCount::Defaulted(reason),
    }
}

/// A numeric field that was replaced by zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefaultedField {
    /// Source column name.
    pub field: &'static str,
    /// The raw value.
    pub raw: String,
    /// Why it was not parsed.
    pub reason: DefaultReason,
}

/// A normalized record plus the fields that were defaulted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Normalized {
    /// The typed record.
    pub record: NormalizedRecord,
    /// Numeric fields that fell back to zero.
    pub defaulted: Vec<DefaultedField>,
}

/// Highest year that fits the four-digit date key.
const MAX_YEAR: i32 = 9999;

/// Highest valid month. `0` is kept as the defaulted value.
const MAX_MONTH: u32 = 12;

/// Parses one numeric field, recording it in `defaulted` when it falls
/// back to zero or lies outside `range`.
fn numeric_field<T>(
    defaulted: &mut Vec<DefaultedField>,
    field: &'static str,
    raw: &str,
    range: Option<RangeInclusive<T>>,
) -> T
where
    T: TryFrom<i128> + Default + Copy + PartialOrd,
{
    let parsed = match parse_count::<T>(raw) {
        ParsedCount::Parsed(value) if range.as_ref().is_some_and(|r| !r.contains(&value)) => {
            ParsedCount::Defaulted(DefaultReason::OutOfRange)
        }
        parsed => parsed,
    };
    if let ParsedCount::Defaulted(reason) = parsed {
        defaulted.push(DefaultedField {
            field,
            raw: raw.to_owned(),
            reason,
        });
    }
    parsed.value()
}

/// Converts a raw row into a typed record.
#[must_use]
pub fn normalize(raw: &RawRecord) -> Normalized {
    let mut defaulted = Vec::new();

    let year: i32 = numeric_field(&mut defaulted, "ANO", &raw.year, Some(0..=MAX_YEAR));
    let month: u32 = numeric_field(&mut defaulted, "MES", &raw.month, Some(0..=MAX_MONTH));
    let victims: u64 = numeric_field(&mut defaulted, "QT_VITIMAS", &raw.victims, None);

    Normalized {
        record: NormalizedRecord {
            year,
            month,
            municipality: raw.municipality.clone(),
            region: raw.region.clone(),
            category: RecordCategory::from_label(&raw.category),
            victims,
        },
        defaulted,
    }
}
