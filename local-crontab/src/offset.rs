//! Local-to-UTC offset sampling.

use jiff::civil::Date;
use jiff::tz::TimeZone;
#[cfg(feature = "serde")]
use serde::Serialize;
use tracing::trace;

use crate::error::ConvertError;

/// Local hour at which offsets are sampled.
///
/// Most DST transitions happen in the small hours, so noon is a safe sample.
/// A zone that switches around midday gets the post-transition offset.
pub const ANCHOR_HOUR: i8 = 12;

/// Signed local-minus-UTC offset split into whole hours and remainder minutes.
///
/// `minutes` is always in `0..60`, so `UTC = local - hours - minutes` for
/// both halves: UTC-3:30 is `{ hours: -4, minutes: 30 }`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct UtcOffset {
    pub hours: i32,
    pub minutes: i32,
}

impl UtcOffset {
    pub fn from_minutes(total: i32) -> Self {
        Self {
            hours: total.div_euclid(60),
            minutes: total.rem_euclid(60),
        }
    }

    pub fn total_minutes(self) -> i32 {
        self.hours * 60 + self.minutes
    }
}

/// The calendar date a cron `(month, day)` pair denotes in `year`.
///
/// Days past the end of the month roll forward into the next month, so
/// `(2, 30)` in 2024 is March 1st.
pub fn reference_date(year: i16, month: i32, day: i32) -> Result<Date, ConvertError> {
    let month = i8::try_from(month)
        .map_err(|_| ConvertError::offset(format!("invalid month: {month}")))?;
    let first = Date::new(year, month, 1)
        .map_err(|e| ConvertError::offset(format!("invalid date {year}-{month}: {e}")))?;
    first
        .checked_add(jiff::Span::new().days(i64::from(day) - 1))
        .map_err(|e| ConvertError::offset(format!("cannot add {day} days to {first}: {e}")))
}

/// Offset of `tz` at local noon on `(year, month, day)`.
pub fn offset_for(
    tz: &TimeZone,
    year: i16,
    month: i32,
    day: i32,
) -> Result<UtcOffset, ConvertError> {
    let date = reference_date(year, month, day)?;
    let zoned = date
        .at(ANCHOR_HOUR, 0, 0, 0)
        .to_zoned(tz.clone())
        .map_err(|e| ConvertError::offset(format!("cannot create zoned datetime: {e}")))?;
    let offset = UtcOffset::from_minutes(zoned.offset().seconds() / 60);
    trace!(%date, hours = offset.hours, minutes = offset.minutes, "sampled utc offset");
    Ok(offset)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tz(name: &str) -> TimeZone {
        TimeZone::get(name).unwrap()
    }

    #[test]
    fn test_from_minutes_keeps_minutes_positive() {
        assert_eq!(UtcOffset::from_minutes(-300), UtcOffset { hours: -5, minutes: 0 });
        assert_eq!(UtcOffset::from_minutes(330), UtcOffset { hours: 5, minutes: 30 });
        assert_eq!(UtcOffset::from_minutes(-210), UtcOffset { hours: -4, minutes: 30 });
        assert_eq!(UtcOffset::from_minutes(-210).total_minutes(), -210);
    }

    #[test]
    fn test_new_york_standard_and_daylight() {
        let ny = tz("America/New_York");
        assert_eq!(offset_for(&ny, 2024, 1, 15).unwrap(), UtcOffset::from_minutes(-300));
        assert_eq!(offset_for(&ny, 2024, 7, 4).unwrap(), UtcOffset::from_minutes(-240));
    }

    #[test]
    fn test_new_york_transition_days() {
        let ny = tz("America/New_York");
        // DST starts 2024-03-10 02:00, ends 2024-11-03 02:00
        assert_eq!(offset_for(&ny, 2024, 3, 9).unwrap().hours, -5);
        assert_eq!(offset_for(&ny, 2024, 3, 10).unwrap().hours, -4);
        assert_eq!(offset_for(&ny, 2024, 11, 2).unwrap().hours, -4);
        assert_eq!(offset_for(&ny, 2024, 11, 3).unwrap().hours, -5);
    }

    #[test]
    fn test_southern_hemisphere() {
        let sydney = tz("Australia/Sydney");
        assert_eq!(offset_for(&sydney, 2024, 1, 1).unwrap().hours, 11);
        assert_eq!(offset_for(&sydney, 2024, 7, 1).unwrap().hours, 10);
    }

    #[test]
    fn test_fractional_offsets() {
        let kolkata = tz("Asia/Kolkata");
        assert_eq!(
            offset_for(&kolkata, 2024, 6, 1).unwrap(),
            UtcOffset { hours: 5, minutes: 30 }
        );
        let st_johns = tz("America/St_Johns");
        assert_eq!(
            offset_for(&st_johns, 2024, 1, 1).unwrap(),
            UtcOffset { hours: -4, minutes: 30 }
        );
    }

    #[test]
    fn test_utc() {
        assert_eq!(offset_for(&TimeZone::UTC, 2024, 2, 29).unwrap(), UtcOffset::default());
    }

    #[test]
    fn test_reference_date_rolls_over() {
        assert_eq!(reference_date(2024, 2, 30).unwrap(), Date::new(2024, 3, 1).unwrap());
        assert_eq!(reference_date(2023, 2, 31).unwrap(), Date::new(2023, 3, 3).unwrap());
        assert_eq!(reference_date(2024, 4, 31).unwrap(), Date::new(2024, 5, 1).unwrap());
        assert_eq!(reference_date(2024, 12, 31).unwrap(), Date::new(2024, 12, 31).unwrap());
    }

    #[test]
    fn test_reference_date_invalid_month() {
        assert!(reference_date(2024, 13, 1).is_err());
    }
}
