//! Rewriting of schedule events in a service description.
//!
//! A service description is JSON shaped like a Serverless `serverless.yml`:
//!
//! ```json
//! { "functions": { "report": { "events": [
//!     { "schedule": { "rate": "cron(0 9 ? * MON-FRI *)", "timezone": "Europe/Paris" } }
//! ] } } }
//! ```
//!
//! Every schedule that carries a `cron(...)` rate and a `timezone` is replaced
//! by one schedule per UTC crontab, without the timezone. Generated events
//! hold only their `schedule`; other keys of the source event are not copied.

use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::convert::Converter;
use crate::error::ConvertError;

/// The shapes a schedule event can take.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScheduleSpec<'a> {
    /// `rate: "cron(...)"` with a timezone.
    StringRate { rate: &'a str, timezone: &'a str },
    /// `rate: ["cron(...)", "rate(...)", ...]` with a timezone.
    MultiRate {
        rates: Vec<&'a str>,
        timezone: &'a str,
    },
    /// Anything else. Passed through untouched.
    NoTimezone,
}

impl<'a> ScheduleSpec<'a> {
    /// Classify the value of an event's `schedule` key.
    pub fn classify(schedule: &'a Value) -> Self {
        let Some(timezone) = schedule.get("timezone").and_then(Value::as_str) else {
            return Self::NoTimezone;
        };
        match schedule.get("rate") {
            Some(Value::String(rate)) => Self::StringRate { rate, timezone },
            Some(Value::Array(items)) => {
                match items.iter().map(Value::as_str).collect::<Option<Vec<_>>>() {
                    Some(rates) => Self::MultiRate { rates, timezone },
                    None => Self::NoTimezone,
                }
            }
            _ => Self::NoTimezone,
        }
    }
}

/// The expression inside `cron(...)`, if `rate` is a cron rate.
pub fn cron_expression(rate: &str) -> Option<&str> {
    rate.strip_prefix("cron(")?.strip_suffix(')')
}

/// Rewrite an events list.
///
/// Returns the untouched events followed by the generated ones. Fails without
/// producing anything if any conversion fails.
pub fn rewrite_events(events: &[Value], converter: &Converter) -> Result<Vec<Value>, ConvertError> {
    let mut retained = Vec::new();
    let mut generated = Vec::new();

    for event in events {
        let Some(schedule) = event.get("schedule") else {
            retained.push(event.clone());
            continue;
        };

        let (rates, timezone) = match ScheduleSpec::classify(schedule) {
            ScheduleSpec::StringRate { rate, timezone } => (vec![rate], timezone),
            ScheduleSpec::MultiRate { rates, timezone } => (rates, timezone),
            ScheduleSpec::NoTimezone => {
                retained.push(event.clone());
                continue;
            }
        };

        // rate(...) schedules have no timezone to resolve
        let (crons, others): (Vec<&str>, Vec<&str>) =
            rates.into_iter().partition(|rate| cron_expression(rate).is_some());
        if crons.is_empty() {
            retained.push(event.clone());
            continue;
        }

        let mut base = schedule.as_object().cloned().unwrap_or_default();
        base.remove("timezone");
        let name = base.get("name").and_then(Value::as_str).map(str::to_string);

        if !others.is_empty() {
            let mut schedule = base.clone();
            schedule.insert(
                "rate".into(),
                Value::Array(others.iter().map(|r| Value::from(*r)).collect()),
            );
            generated.push(schedule_event(schedule));
        }

        let mut index = 0;
        for rate in crons {
            let expr = cron_expression(rate).unwrap_or(rate);
            let utc = converter.convert(expr, timezone)?;
            debug!(expression = expr, timezone, converted = ?utc, "converted schedule");
            for crontab in utc {
                let mut schedule = base.clone();
                schedule.insert("rate".into(), Value::from(format!("cron({crontab})")));
                if let Some(name) = &name {
                    schedule.insert("name".into(), Value::from(format!("{name}-{index}")));
                }
                generated.push(schedule_event(schedule));
                index += 1;
            }
        }
    }

    retained.extend(generated);
    Ok(retained)
}

fn schedule_event(schedule: Map<String, Value>) -> Value {
    let mut event = Map::new();
    event.insert("schedule".into(), Value::Object(schedule));
    Value::Object(event)
}

/// Rewrite the events of every function in a service description.
///
/// All lists are rewritten before any is replaced, so on error `service` is
/// left as it was.
pub fn rewrite_service(service: &mut Value, converter: &Converter) -> Result<(), ConvertError> {
    info!("converting local crontabs to UTC crontabs");
    let Some(functions) = service.get_mut("functions").and_then(Value::as_object_mut) else {
        return Ok(());
    };

    let mut rewritten = Vec::new();
    for (name, function) in functions.iter() {
        if let Some(events) = function.get("events").and_then(Value::as_array) {
            rewritten.push((name.clone(), rewrite_events(events, converter)?));
        }
    }

    for (name, events) in rewritten {
        if let Some(function) = functions.get_mut(&name) {
            function["events"] = Value::Array(events);
        }
    }
    Ok(())
}
