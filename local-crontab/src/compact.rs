//! Merging of generated UTC candidates into as few crontabs as possible.
//!
//! Each pass folds left to right and only ever compares an entry with the one
//! accumulated just before it. Equal entries separated by a different one stay
//! apart.

use crate::candidate::UtcCandidate;
use crate::fields::CronFieldSet;

/// When the last entry of the year is joined onto the first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum YearWrapFold {
    /// Join when minute and hour sets match. The first entry keeps its own
    /// days, so the last entry's days are replaced by them.
    #[default]
    TimeOfDay,
    /// Join only when the day sets match too. Lossless, and compaction is
    /// then unchanged by a second run.
    MatchingDays,
}

/// Compact candidates in generation order.
pub fn compact(candidates: Vec<UtcCandidate>, year_wrap: YearWrapFold) -> Vec<CronFieldSet> {
    compact_fields(candidates.into_iter().map(|c| c.fields).collect(), year_wrap)
}

/// Run the day, month and year-wrap folds over `entries`.
pub fn compact_fields(entries: Vec<CronFieldSet>, year_wrap: YearWrapFold) -> Vec<CronFieldSet> {
    let entries = fold_days(entries);
    let entries = fold_months(entries);
    fold_year_wrap(entries, year_wrap)
}

/// Group days together by month and time of day.
pub fn fold_days(entries: Vec<CronFieldSet>) -> Vec<CronFieldSet> {
    fold_adjacent(entries, |prev, next| {
        if prev.same_time_of_day(next) && prev.month == next.month {
            prev.day_of_month.extend(next.day_of_month.iter().copied());
            true
        } else {
            false
        }
    })
}

/// Group months together by days and time of day.
pub fn fold_months(entries: Vec<CronFieldSet>) -> Vec<CronFieldSet> {
    fold_adjacent(entries, |prev, next| {
        if prev.same_time_of_day(next) && prev.day_of_month == next.day_of_month {
            prev.month.extend(next.month.iter().copied());
            true
        } else {
            false
        }
    })
}

/// Join the end of the year onto its start when they match.
///
/// The last entry's months move onto the first and the last entry is dropped.
/// A single entry is left alone.
pub fn fold_year_wrap(mut entries: Vec<CronFieldSet>, year_wrap: YearWrapFold) -> Vec<CronFieldSet> {
    if entries.len() < 2 {
        return entries;
    }
    let last_index = entries.len() - 1;
    let mergeable = {
        let (first, last) = (&entries[0], &entries[last_index]);
        first.same_time_of_day(last)
            && match year_wrap {
                YearWrapFold::TimeOfDay => true,
                YearWrapFold::MatchingDays => first.day_of_month == last.day_of_month,
            }
    };
    if mergeable {
        if let Some(last) = entries.pop() {
            entries[0].month.extend(last.month);
        }
    }
    entries
}

/// Fold `entries`, letting `merge` absorb each entry into its predecessor.
fn fold_adjacent<F>(entries: Vec<CronFieldSet>, mut merge: F) -> Vec<CronFieldSet>
where
    F: FnMut(&mut CronFieldSet, &CronFieldSet) -> bool,
{
    let mut acc: Vec<CronFieldSet> = Vec::with_capacity(entries.len());
    for entry in entries {
        if let Some(prev) = acc.last_mut() {
            if merge(prev, &entry) {
                continue;
            }
        }
        acc.push(entry);
    }
    acc
}
