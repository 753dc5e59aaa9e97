//! Expansion of a local crontab into per-date UTC field-sets.

use std::collections::BTreeMap;

use jiff::tz::TimeZone;
use tracing::warn;

use crate::error::ConvertError;
use crate::fields::{CronFieldSet, FieldKind, FieldValues};
use crate::offset::{self, UtcOffset};

/// What to do with minute/hour values that leave their domain after shifting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShiftPolicy {
    /// Subtract the offset and keep the raw result, even if it is negative or
    /// past 59/23. One candidate per local (month, day).
    #[default]
    Preserve,
    /// Wrap minutes into the hour and hours into the day, moving the date by
    /// the day carry. A local (month, day) may yield several candidates.
    Wrap,
}

/// One local `(month, day)` shifted to UTC.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UtcCandidate {
    pub local_month: i32,
    pub local_day: i32,
    pub fields: CronFieldSet,
}

/// Generate UTC candidates for every month × day of `local`.
///
/// Candidates come out months-outer, days-inner, both ascending. Compaction
/// only merges neighbours, so this order matters.
pub fn generate(
    local: &CronFieldSet,
    tz: &TimeZone,
    year: i16,
    policy: ShiftPolicy,
) -> Result<Vec<UtcCandidate>, ConvertError> {
    let mut candidates = Vec::with_capacity(local.month.len() * local.day_of_month.len());
    for &month in &local.month {
        for &day in &local.day_of_month {
            let offset = offset::offset_for(tz, year, month, day)?;
            match policy {
                ShiftPolicy::Preserve => {
                    candidates.push(shift_preserving(local, month, day, offset));
                }
                ShiftPolicy::Wrap => {
                    candidates.extend(shift_wrapping(local, year, month, day, offset)?);
                }
            }
        }
    }
    Ok(candidates)
}

fn shift_preserving(local: &CronFieldSet, month: i32, day: i32, offset: UtcOffset) -> UtcCandidate {
    let minute: FieldValues = local.minute.iter().map(|m| m - offset.minutes).collect();
    let hour: FieldValues = local.hour.iter().map(|h| h - offset.hours).collect();

    for (kind, values) in [(FieldKind::Minute, &minute), (FieldKind::Hour, &hour)] {
        if let Some(v) = values.iter().find(|v| !kind.contains(**v)) {
            warn!(
                month,
                day,
                value = v,
                field = kind.name(),
                "shifted value is outside its domain"
            );
        }
    }

    UtcCandidate {
        local_month: month,
        local_day: day,
        fields: CronFieldSet {
            minute,
            hour,
            day_of_month: FieldValues::from([day]),
            month: FieldValues::from([month]),
            day_of_week: local.day_of_week.clone(),
        },
    }
}

fn shift_wrapping(
    local: &CronFieldSet,
    year: i16,
    month: i32,
    day: i32,
    offset: UtcOffset,
) -> Result<Vec<UtcCandidate>, ConvertError> {
    // Dates that do not exist (Feb 30) never fire; keep them in place.
    let date = offset::reference_date(year, month, day)?;
    let exists = i32::from(date.month()) == month;

    let mut by_hour_carry: BTreeMap<i32, FieldValues> = BTreeMap::new();
    for m in &local.minute {
        let shifted = m - offset.minutes;
        by_hour_carry
            .entry(shifted.div_euclid(60))
            .or_default()
            .insert(shifted.rem_euclid(60));
    }

    let mut candidates = Vec::new();
    for (hour_carry, minute) in by_hour_carry {
        let mut by_day_carry: BTreeMap<i32, FieldValues> = BTreeMap::new();
        for h in &local.hour {
            let shifted = h - offset.hours + hour_carry;
            by_day_carry
                .entry(shifted.div_euclid(24))
                .or_default()
                .insert(shifted.rem_euclid(24));
        }

        for (day_carry, hour) in by_day_carry {
            let (utc_month, utc_day) = if exists && day_carry != 0 {
                let utc = date
                    .checked_add(jiff::Span::new().days(i64::from(day_carry)))
                    .map_err(|e| ConvertError::offset(format!("cannot shift {date}: {e}")))?;
                (i32::from(utc.month()), i32::from(utc.day()))
            } else {
                (month, day)
            };
            candidates.push(UtcCandidate {
                local_month: month,
                local_day: day,
                fields: CronFieldSet {
                    minute: minute.clone(),
                    hour,
                    day_of_month: FieldValues::from([utc_day]),
                    month: FieldValues::from([utc_month]),
                    day_of_week: local.day_of_week.clone(),
                },
            });
        }
    }
    Ok(candidates)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tz(name: &str) -> TimeZone {
        TimeZone::get(name).unwrap()
    }

    fn values(v: &[i32]) -> FieldValues {
        v.iter().copied().collect()
    }

    #[test]
    fn test_cross_product_count_and_order() {
        let local = CronFieldSet::parse("0 9 1,15,28 3,1 *").unwrap();
        let candidates =
            generate(&local, &TimeZone::UTC, 2024, ShiftPolicy::Preserve).unwrap();
        let pairs: Vec<(i32, i32)> = candidates
            .iter()
            .map(|c| (c.local_month, c.local_day))
            .collect();
        assert_eq!(
            pairs,
            vec![(1, 1), (1, 15), (1, 28), (3, 1), (3, 15), (3, 28)]
        );
    }

    #[test]
    fn test_preserve_shifts_by_offset() {
        let local = CronFieldSet::parse("30 8 1 1,6 MON").unwrap();
        let candidates =
            generate(&local, &tz("America/New_York"), 2024, ShiftPolicy::Preserve).unwrap();
        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0].fields.to_string(), "30 13 1 1 MON");
        assert_eq!(candidates[1].fields.to_string(), "30 12 1 6 MON");
    }

    #[test]
    fn test_preserve_keeps_out_of_domain_values() {
        let local = CronFieldSet::parse("0 22,23 1 1 *").unwrap();
        let candidates =
            generate(&local, &tz("America/New_York"), 2024, ShiftPolicy::Preserve).unwrap();
        assert_eq!(candidates[0].fields.hour, values(&[27, 28]));

        let local = CronFieldSet::parse("15 9 1 1 *").unwrap();
        let candidates =
            generate(&local, &tz("Asia/Kolkata"), 2024, ShiftPolicy::Preserve).unwrap();
        assert_eq!(candidates[0].fields.minute, values(&[-15]));
        assert_eq!(candidates[0].fields.hour, values(&[4]));
    }

    #[test]
    fn test_wrap_carries_minutes_into_hours() {
        let local = CronFieldSet::parse("15,45 9 1 1 *").unwrap();
        let candidates =
            generate(&local, &tz("Asia/Kolkata"), 2024, ShiftPolicy::Wrap).unwrap();
        // 09:15 IST = 03:45 UTC, 09:45 IST = 04:15 UTC
        let rendered: Vec<String> = candidates.iter().map(|c| c.fields.to_string()).collect();
        assert_eq!(rendered, vec!["45 3 1 1 *", "15 4 1 1 *"]);
    }

    #[test]
    fn test_wrap_carries_hours_into_previous_day() {
        let local = CronFieldSet::parse("0 0,12 1 1 *").unwrap();
        let candidates = generate(&local, &tz("Asia/Tokyo"), 2024, ShiftPolicy::Wrap).unwrap();
        // 00:00 JST on Jan 1 is 15:00 UTC on Dec 31; the year is not adjusted
        let rendered: Vec<String> = candidates.iter().map(|c| c.fields.to_string()).collect();
        assert_eq!(rendered, vec!["0 15 31 12 *", "0 3 1 1 *"]);
    }

    #[test]
    fn test_wrap_carries_hours_into_next_day() {
        let local = CronFieldSet::parse("0 20 29 2 *").unwrap();
        let candidates =
            generate(&local, &tz("America/New_York"), 2024, ShiftPolicy::Wrap).unwrap();
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].fields.to_string(), "0 1 1 3 *");
    }

    #[test]
    fn test_wrap_keeps_nonexistent_dates_in_place() {
        let local = CronFieldSet::parse("0 22 30 2 *").unwrap();
        let candidates =
            generate(&local, &tz("America/New_York"), 2024, ShiftPolicy::Wrap).unwrap();
        assert_eq!(candidates[0].fields.to_string(), "0 3 30 2 *");
    }

    #[test]
    fn test_wrap_stays_in_domain() {
        let local = CronFieldSet::parse("* * 1 * *").unwrap();
        let candidates =
            generate(&local, &tz("Asia/Kathmandu"), 2024, ShiftPolicy::Wrap).unwrap();
        for c in &candidates {
            assert!(c.fields.minute.iter().all(|m| FieldKind::Minute.contains(*m)));
            assert!(c.fields.hour.iter().all(|h| FieldKind::Hour.contains(*h)));
        }
    }
}
