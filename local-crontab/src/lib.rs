//! local-crontab: local-time cron schedules for UTC-only schedulers.
//!
//! Converts an AWS cron expression (`minute hour day-of-month month
//! day-of-week year`) written in a local timezone into the AWS cron
//! expressions that fire at the same instants in UTC. Because the UTC offset
//! changes with daylight saving, one local expression can need several UTC
//! expressions; these are merged wherever their time of day agrees.
//!
//! # Examples
//!
//! ```
//! use local_crontab::Converter;
//!
//! let converter = Converter::default().with_year(2024);
//! let utc = converter.convert("30 8 1 1,6 ? *", "America/New_York").unwrap();
//! assert_eq!(utc, vec!["30 13 1 1 ? *", "30 12 1 6 ? *"]);
//! ```
//!
//! # Known limitations
//!
//! - Offsets are sampled at local noon, so a DST change at midday is not seen
//!   until the next day.
//! - With [`ShiftPolicy::Preserve`] (the default) shifted minutes and hours are
//!   not wrapped: `0 22 * * ? *` in New York becomes hour `27`. Use
//!   [`ShiftPolicy::Wrap`] to carry into the day instead.
//! - The year field is never adjusted, even when a shift crosses New Year.
//! - With [`YearWrapFold::TimeOfDay`] (the default) December's entry joins
//!   January's when their times of day agree, taking January's days. Use
//!   [`YearWrapFold::MatchingDays`] to join only entries with the same days.

pub mod aws;
pub mod candidate;
pub mod compact;
pub mod convert;
pub mod error;
#[cfg(feature = "serde")]
pub mod events;
pub mod fields;
pub mod offset;

pub use aws::AwsRoundtripDetails;
pub use candidate::{ShiftPolicy, UtcCandidate};
pub use compact::YearWrapFold;
pub use convert::{convert, Converter};
pub use error::{ConvertError, Span};
pub use fields::{CronFieldSet, FieldKind};
pub use offset::UtcOffset;
