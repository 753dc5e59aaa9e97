//! The conversion pipeline, from a local AWS expression to UTC expressions.

use jiff::tz::{TimeZone, TimeZoneDatabase};
use jiff::Zoned;
use tracing::debug;

use crate::aws;
use crate::candidate::{self, ShiftPolicy};
use crate::compact::{self, YearWrapFold};
use crate::error::ConvertError;
use crate::fields::CronFieldSet;

/// Converts local-time crontabs to UTC crontabs.
///
/// Holds the timezone database and conversion options; cheap to clone and
/// reusable across calls.
#[derive(Debug, Clone)]
pub struct Converter {
    tzdb: TimeZoneDatabase,
    year: Option<i16>,
    policy: ShiftPolicy,
    year_wrap: YearWrapFold,
}

impl Default for Converter {
    /// A converter over jiff's global timezone database.
    fn default() -> Self {
        Self::new(jiff::tz::db().clone())
    }
}

impl Converter {
    pub fn new(tzdb: TimeZoneDatabase) -> Self {
        Self {
            tzdb,
            year: None,
            policy: ShiftPolicy::default(),
            year_wrap: YearWrapFold::default(),
        }
    }

    /// Sample offsets in `year` instead of the current year.
    pub fn with_year(mut self, year: i16) -> Self {
        self.year = Some(year);
        self
    }

    pub fn with_policy(mut self, policy: ShiftPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> ShiftPolicy {
        self.policy
    }

    /// Choose when December is joined onto January during compaction.
    pub fn with_year_wrap(mut self, year_wrap: YearWrapFold) -> Self {
        self.year_wrap = year_wrap;
        self
    }

    pub fn year_wrap(&self) -> YearWrapFold {
        self.year_wrap
    }

    /// Year in which offsets are sampled.
    pub fn year(&self) -> i16 {
        self.year.unwrap_or_else(|| Zoned::now().year())
    }

    /// Look up `name` in the timezone database.
    pub fn timezone(&self, name: &str) -> Result<TimeZone, ConvertError> {
        self.tzdb
            .get(name)
            .map_err(|e| ConvertError::unknown_timezone(name, e))
    }

    /// Convert an AWS cron expression in `timezone` to AWS cron expressions in
    /// UTC.
    ///
    /// ```
    /// use local_crontab::Converter;
    ///
    /// let converter = Converter::default().with_year(2024);
    /// let utc = converter.convert("0 9 * * ? *", "America/Bogota").unwrap();
    /// assert_eq!(utc, vec!["0 14 * * ? *"]);
    /// ```
    pub fn convert(&self, aws_expr: &str, timezone: &str) -> Result<Vec<String>, ConvertError> {
        let (crontab, details) = aws::to_standard(aws_expr)?;
        let utc: Vec<String> = self
            .local_to_utc(&crontab, timezone)?
            .iter()
            .map(|crontab| aws::to_aws(crontab, &details))
            .collect();
        debug!(expression = aws_expr, timezone, ?utc, "converted local crontab");
        Ok(utc)
    }

    /// Convert a standard 5-field crontab in `timezone` to UTC crontabs.
    pub fn local_to_utc(&self, crontab: &str, timezone: &str) -> Result<Vec<String>, ConvertError> {
        Ok(self
            .local_fields_to_utc(&CronFieldSet::parse(crontab)?, timezone)?
            .iter()
            .map(ToString::to_string)
            .collect())
    }

    /// Convert already parsed fields, returning the compacted UTC field-sets.
    pub fn local_fields_to_utc(
        &self,
        local: &CronFieldSet,
        timezone: &str,
    ) -> Result<Vec<CronFieldSet>, ConvertError> {
        let tz = self.timezone(timezone)?;
        let candidates = candidate::generate(local, &tz, self.year(), self.policy)?;
        Ok(compact::compact(candidates, self.year_wrap))
    }
}

/// Convert with a default [`Converter`] (global timezone database, current
/// year, [`ShiftPolicy::Preserve`], [`YearWrapFold::TimeOfDay`]).
pub fn convert(aws_expr: &str, timezone: &str) -> Result<Vec<String>, ConvertError> {
    Converter::default().convert(aws_expr, timezone)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn converter() -> Converter {
        Converter::default().with_year(2024)
    }

    #[test]
    fn test_unknown_timezone() {
        let err = converter().convert("0 9 * * ? *", "Mars/Olympus_Mons").unwrap_err();
        assert!(matches!(err, ConvertError::UnknownTimezone { ref name, .. } if name == "Mars/Olympus_Mons"));
    }

    #[test]
    fn test_malformed_expression() {
        let err = converter().convert("0 9 * *", "UTC").unwrap_err();
        assert!(matches!(err, ConvertError::Malformed { .. }));
    }

    #[test]
    fn test_malformed_field_reported_before_timezone() {
        let err = converter().convert("0 25 * * ? *", "Nowhere/Land").unwrap_err();
        assert_eq!(err.to_string(), "hour must be 0-23, got 25");
    }

    #[test]
    fn test_utc_is_identity() {
        let utc = converter().convert("0/30 8-9 1,15 * ? 2025", "UTC").unwrap();
        assert_eq!(utc, vec!["0,30 8,9 1,15 * ? 2025"]);
    }

    #[test]
    fn test_local_to_utc_standard_form() {
        let utc = converter().local_to_utc("0 9 * * 1-5", "America/Bogota").unwrap();
        assert_eq!(utc, vec!["0 14 * * 1-5"]);
    }

    #[test]
    fn test_year_override() {
        assert_eq!(converter().year(), 2024);
    }

    #[test]
    fn test_year_wrap_option() {
        let expr = "0 12 * 3,11 ? *";
        let joined = converter().convert(expr, "America/New_York").unwrap();
        assert_eq!(joined.len(), 3);
        let kept_apart = converter()
            .with_year_wrap(YearWrapFold::MatchingDays)
            .convert(expr, "America/New_York")
            .unwrap();
        assert_eq!(kept_apart.len(), 4);
    }

    #[test]
    fn test_custom_database() {
        let converter = Converter::new(TimeZoneDatabase::none()).with_year(2024);
        assert!(matches!(
            converter.convert("0 9 * * ? *", "America/New_York"),
            Err(ConvertError::UnknownTimezone { .. })
        ));
    }
}
