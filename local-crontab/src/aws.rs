//! Translation between AWS cron syntax and standard 5-field cron.
//!
//! AWS schedule expressions carry a sixth `year` field and use `?` where a
//! standard crontab would use `*`. Both are stripped before conversion and
//! restored afterwards from [`AwsRoundtripDetails`].

use std::collections::BTreeSet;

#[cfg(feature = "serde")]
use serde::Serialize;

use crate::error::{tokens_with_spans, ConvertError, Span};

/// Number of fields in a standard crontab.
pub const STANDARD_FIELDS: usize = 5;

/// AWS-only syntax removed by [`to_standard`], needed to rebuild the AWS form.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct AwsRoundtripDetails {
    /// The year field, verbatim.
    pub year: String,
    /// Positions of fields that were written as `?`.
    pub wildcard_fields: BTreeSet<usize>,
}

/// Convert an AWS cron expression to a standard crontab.
///
/// ```
/// let (crontab, details) = local_crontab::aws::to_standard("0 9 ? * MON-FRI 2024").unwrap();
/// assert_eq!(crontab, "0 9 * * MON-FRI");
/// assert_eq!(details.year, "2024");
/// assert!(details.wildcard_fields.contains(&2));
/// ```
pub fn to_standard(aws_expr: &str) -> Result<(String, AwsRoundtripDetails), ConvertError> {
    let mut tokens = tokens_with_spans(aws_expr);
    if tokens.len() != STANDARD_FIELDS + 1 {
        let span = tokens
            .get(STANDARD_FIELDS + 1)
            .map(|(_, span)| Span::new(span.start, aws_expr.len()))
            .unwrap_or_else(|| Span::whole(aws_expr));
        return Err(ConvertError::malformed(
            format!(
                "expected 6 AWS cron fields (minute hour day-of-month month day-of-week year), got {}",
                tokens.len()
            ),
            span,
            aws_expr,
        ));
    }

    // standard crontabs have no year
    let year = tokens.pop().map(|(t, _)| t.to_string()).unwrap_or_default();

    let mut wildcard_fields = BTreeSet::new();
    let parts: Vec<&str> = tokens
        .iter()
        .enumerate()
        .map(|(i, &(token, _))| {
            if token == "?" {
                wildcard_fields.insert(i);
                "*"
            } else {
                token
            }
        })
        .collect();

    Ok((
        parts.join(" "),
        AwsRoundtripDetails {
            year,
            wildcard_fields,
        },
    ))
}

/// Convert a standard crontab back to AWS syntax using the details captured by
/// [`to_standard`].
///
/// Only the first `*` of a recorded field becomes `?`. A recorded field that no
/// longer contains `*` is left as it is.
pub fn to_aws(standard_expr: &str, details: &AwsRoundtripDetails) -> String {
    let mut parts: Vec<String> = standard_expr
        .split_whitespace()
        .map(str::to_string)
        .collect();
    for &index in &details.wildcard_fields {
        if let Some(part) = parts.get_mut(index) {
            *part = part.replacen('*', "?", 1);
        }
    }
    parts.push(details.year.clone());
    parts.join(" ")
}
