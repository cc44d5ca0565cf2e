//! Time parsing, zone conversion and rendering
//!
//! Parsed times carry their offset. Zone conversion keeps the instant and
//! only changes the offset, so `epoch` is unaffected by `est`, `et` or `utc`.

use super::{as_str, text};
use crate::action::{ActionDef, ActionFn, ActionResult, Arguments};
use crate::error::DecodeError;
use crate::format::{Format, Value};
use chrono::{DateTime, FixedOffset, SecondsFormat, TimeZone};

/// Fallback layout for ISO 8601 with a colon-less offset, e.g. `+0100`
const ISO_COMPACT_OFFSET: &str = "%Y-%m-%dT%H:%M:%S%z";

pub(super) fn actions() -> Vec<ActionDef> {
    vec![
        ActionDef::new(
            &["jsondate", "isodate"],
            "Parse JSON ISO 8601 from input",
            Format::Time,
            ActionFn::Text(parse_iso),
        ),
        ActionDef::new(
            &["epoch"],
            "Parse Epoch time from input",
            Format::Time,
            ActionFn::Text(parse_epoch),
        ),
        ActionDef::new(
            &["est"],
            "Change time to EST timezone",
            Format::Time,
            ActionFn::Time(to_est),
        ),
        ActionDef::new(&["et"], "Change time to ET timezone", Format::Time, ActionFn::Time(to_et)),
        ActionDef::new(
            &["utc"],
            "Change time to UTC timezone",
            Format::Time,
            ActionFn::Time(to_utc),
        ),
        ActionDef::new(&["iso"], "time to ISO RFC3339 text", Format::Text, ActionFn::Time(iso)),
        ActionDef::new(&["epoch"], "time to Epoch", Format::Text, ActionFn::Time(epoch)),
    ]
}

fn parse_iso(input: &[u8], _: &Arguments<'_>) -> ActionResult {
    let s = as_str(input);
    let s = s.trim();
    let t = DateTime::parse_from_rfc3339(s)
        .or_else(|_| DateTime::parse_from_str(s, ISO_COMPACT_OFFSET))
        .map_err(DecodeError::from)?;
    Ok(Value::Time(t))
}

fn parse_epoch(input: &[u8], _: &Arguments<'_>) -> ActionResult {
    let secs: i64 = as_str(input).trim().parse().map_err(DecodeError::from)?;
    let t = DateTime::from_timestamp(secs, 0).ok_or(DecodeError::TimestampRange(secs))?;
    Ok(Value::Time(t.fixed_offset()))
}

fn in_zone<Tz: TimeZone>(t: &DateTime<FixedOffset>, tz: &Tz) -> ActionResult {
    Ok(Value::Time(t.with_timezone(tz).fixed_offset()))
}

fn to_est(t: &DateTime<FixedOffset>, _: &Arguments<'_>) -> ActionResult {
    in_zone(t, &chrono_tz::EST)
}

fn to_et(t: &DateTime<FixedOffset>, _: &Arguments<'_>) -> ActionResult {
    in_zone(t, &chrono_tz::America::New_York)
}

fn to_utc(t: &DateTime<FixedOffset>, _: &Arguments<'_>) -> ActionResult {
    in_zone(t, &chrono_tz::UTC)
}

fn iso(t: &DateTime<FixedOffset>, _: &Arguments<'_>) -> ActionResult {
    Ok(text(t.to_rfc3339_opts(SecondsFormat::Secs, true)))
}

fn epoch(t: &DateTime<FixedOffset>, _: &Arguments<'_>) -> ActionResult {
    Ok(text(t.timestamp().to_string()))
}
