//! Standard 5-field crontab parsing and serialization.
//!
//! Minute, hour, day-of-month and month are expanded into explicit sorted sets
//! of integers. Day-of-week is kept as written: conversion never looks at it.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::aws::STANDARD_FIELDS;
use crate::error::{tokens_with_spans, ConvertError, Span};

/// Expanded values of one cron field.
pub type FieldValues = BTreeSet<i32>;

/// The numeric cron fields and their domains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    Minute,
    Hour,
    DayOfMonth,
    Month,
}

impl FieldKind {
    pub fn name(self) -> &'static str {
        match self {
            Self::Minute => "minute",
            Self::Hour => "hour",
            Self::DayOfMonth => "day-of-month",
            Self::Month => "month",
        }
    }

    pub fn min(self) -> i32 {
        match self {
            Self::Minute | Self::Hour => 0,
            Self::DayOfMonth | Self::Month => 1,
        }
    }

    pub fn max(self) -> i32 {
        match self {
            Self::Minute => 59,
            Self::Hour => 23,
            Self::DayOfMonth => 31,
            Self::Month => 12,
        }
    }

    pub fn contains(self, value: i32) -> bool {
        (self.min()..=self.max()).contains(&value)
    }

    /// Every value of the domain.
    pub fn full(self) -> FieldValues {
        (self.min()..=self.max()).collect()
    }

    /// Whether `values` is exactly the whole domain, i.e. the wildcard.
    pub fn is_full(self, values: &FieldValues) -> bool {
        values.len() == (self.max() - self.min() + 1) as usize
            && values.iter().all(|v| self.contains(*v))
    }
}

/// A crontab with its numeric fields expanded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CronFieldSet {
    pub minute: FieldValues,
    pub hour: FieldValues,
    pub day_of_month: FieldValues,
    pub month: FieldValues,
    /// Day-of-week token, carried through untouched.
    pub day_of_week: String,
}

impl CronFieldSet {
    /// Parse a standard 5-field crontab.
    ///
    /// ```
    /// use local_crontab::CronFieldSet;
    ///
    /// let fields = CronFieldSet::parse("*/20 9-11 1,15 JAN-MAR *").unwrap();
    /// assert_eq!(fields.minute.iter().copied().collect::<Vec<_>>(), vec![0, 20, 40]);
    /// assert_eq!(fields.month.len(), 3);
    /// assert_eq!(fields.to_string(), "0,20,40 9,10,11 1,15 1,2,3 *");
    /// ```
    pub fn parse(expr: &str) -> Result<Self, ConvertError> {
        let tokens = tokens_with_spans(expr);
        if tokens.len() != STANDARD_FIELDS {
            return Err(ConvertError::malformed(
                format!("expected 5 cron fields, got {}", tokens.len()),
                Span::whole(expr),
                expr,
            ));
        }

        let field = |i: usize, kind: FieldKind| {
            let (token, span) = tokens[i];
            parse_field(token, kind, span, expr)
        };

        Ok(Self {
            minute: field(0, FieldKind::Minute)?,
            hour: field(1, FieldKind::Hour)?,
            day_of_month: field(2, FieldKind::DayOfMonth)?,
            month: field(3, FieldKind::Month)?,
            day_of_week: tokens[4].0.to_string(),
        })
    }

    /// Minute and hour sets are equal.
    pub fn same_time_of_day(&self, other: &Self) -> bool {
        self.minute == other.minute && self.hour == other.hour
    }
}

impl FromStr for CronFieldSet {
    type Err = ConvertError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for CronFieldSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {} {}",
            FieldDisplay(FieldKind::Minute, &self.minute),
            FieldDisplay(FieldKind::Hour, &self.hour),
            FieldDisplay(FieldKind::DayOfMonth, &self.day_of_month),
            FieldDisplay(FieldKind::Month, &self.month),
            self.day_of_week
        )
    }
}

/// Renders a field as `*` when it covers its domain, else as a comma list.
struct FieldDisplay<'a>(FieldKind, &'a FieldValues);

impl fmt::Display for FieldDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (kind, values) = (self.0, self.1);
        if kind.is_full(values) {
            return write!(f, "*");
        }
        for (i, value) in values.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{value}")?;
        }
        Ok(())
    }
}

/// Expand one field: comma lists of `*`, `n`, `a-b`, each optionally `/step`.
fn parse_field(
    token: &str,
    kind: FieldKind,
    span: Span,
    input: &str,
) -> Result<FieldValues, ConvertError> {
    let mut values = FieldValues::new();
    let mut offset = span.start;

    for part in token.split(',') {
        let part_span = Span::new(offset, offset + part.len());
        offset += part.len() + 1;
        let err = |message: String| ConvertError::malformed(message, part_span, input);

        if part.is_empty() {
            return Err(err(format!("empty value in {} field", kind.name())));
        }

        let (range, step) = match part.split_once('/') {
            Some((range, step)) => {
                let step: i32 = step
                    .parse::<u8>()
                    .map_err(|_| err(format!("invalid {} step: {}", kind.name(), step)))?
                    .into();
                if step == 0 {
                    return Err(err("step cannot be 0".to_string()));
                }
                (range, Some(step))
            }
            None => (part, None),
        };

        let (start, end) = if range == "*" {
            (kind.min(), kind.max())
        } else if let Some((s, e)) = range.split_once('-') {
            let start = parse_value(s, kind).map_err(&err)?;
            let end = parse_value(e, kind).map_err(&err)?;
            if start > end {
                return Err(err(format!("range start must be <= end: {s}-{e}")));
            }
            (start, end)
        } else {
            let value = parse_value(range, kind).map_err(&err)?;
            // `a/n` runs from a to the end of the domain
            (value, if step.is_some() { kind.max() } else { value })
        };

        let step = step.unwrap_or(1) as usize;
        values.extend((start..=end).step_by(step));
    }

    Ok(values)
}

/// Parse a single value (numeric, or a month name in the month field).
fn parse_value(s: &str, kind: FieldKind) -> Result<i32, String> {
    let value = match s.parse::<u8>() {
        Ok(n) => i32::from(n),
        Err(_) if kind == FieldKind::Month => {
            month_from_name(s).ok_or_else(|| format!("invalid month: {s}"))?
        }
        Err(_) => return Err(format!("invalid {} value: {}", kind.name(), s)),
    };
    if !kind.contains(value) {
        return Err(format!(
            "{} must be {}-{}, got {}",
            kind.name(),
            kind.min(),
            kind.max(),
            value
        ));
    }
    Ok(value)
}

fn month_from_name(s: &str) -> Option<i32> {
    let month = match s.to_uppercase().as_str() {
        "JAN" => 1,
        "FEB" => 2,
        "MAR" => 3,
        "APR" => 4,
        "MAY" => 5,
        "JUN" => 6,
        "JUL" => 7,
        "AUG" => 8,
        "SEP" => 9,
        "OCT" => 10,
        "NOV" => 11,
        "DEC" => 12,
        _ => return None,
    };
    Some(month)
}
