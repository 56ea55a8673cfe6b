//! Shared utilities for CLI commands.

use std::sync::LazyLock;

use anyhow::Context;
use chrono::{DateTime, Duration, Utc, Weekday};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use regex::Regex;
use sp_core::SubjectInput;

/// Pre-compiled regex for relative time parsing.
static RELATIVE_TIME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)\s+(minute|hour|day|week)s?\s+ago$").unwrap());

/// Conservative bounds for relative time parsing (~1000 years in minutes).
const MAX_RELATIVE_MINUTES: i64 = 1000 * 365 * 24 * 60;

/// Parse a datetime string as ISO 8601, `now`, or relative time.
///
/// Supports:
/// - ISO 8601: "2026-01-15T10:30:00Z"
/// - "now"
/// - Relative: "2 hours ago", "30 minutes ago", "1 day ago", "1 week ago"
pub fn parse_datetime(s: &str) -> anyhow::Result<DateTime<Utc>> {
    parse_datetime_at(s, Utc::now())
}

fn parse_datetime_at(s: &str, now: DateTime<Utc>) -> anyhow::Result<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    if s == "now" {
        return Ok(now);
    }

    let Some(caps) = RELATIVE_TIME_RE.captures(s) else {
        anyhow::bail!(
            "Invalid datetime: {s}. Use ISO 8601 (e.g., 2026-01-15T10:30:00Z), 'now', or relative (e.g., '25 minutes ago')"
        );
    };

    let n: i64 = caps[1]
        .parse()
        .context("failed to parse number in relative time")?;

    let (max_for_unit, minutes_per_unit) = match &caps[2] {
        "minute" => (MAX_RELATIVE_MINUTES, 1),
        "hour" => (MAX_RELATIVE_MINUTES / 60, 60),
        "day" => (MAX_RELATIVE_MINUTES / (60 * 24), 60 * 24),
        "week" => (MAX_RELATIVE_MINUTES / (60 * 24 * 7), 60 * 24 * 7),
        unit => anyhow::bail!("Unknown time unit: {unit}"),
    };

    if n > max_for_unit {
        anyhow::bail!("Relative time value too large: {n} {}", &caps[2]);
    }

    Ok(now - Duration::minutes(n * minutes_per_unit))
}

/// Parse a `NAME:PRIORITY:DIFFICULTY` subject argument.
///
/// The name may itself contain colons; the last two fields are the levels.
pub fn parse_subject(s: &str) -> anyhow::Result<SubjectInput> {
    let mut parts = s.rsplitn(3, ':');
    let (Some(difficulty), Some(priority), Some(name)) = (parts.next(), parts.next(), parts.next())
    else {
        anyhow::bail!("Invalid subject: {s}. Use NAME:PRIORITY:DIFFICULTY (e.g., Physics:high:hard)");
    };

    let subject = SubjectInput::new(name, priority.trim().parse()?, difficulty.trim().parse()?)?;
    Ok(subject)
}

/// Random source for commands that sample; seeded when reproducibility is wanted.
pub fn rng_from_seed(seed: Option<u64>) -> Box<dyn RngCore> {
    match seed {
        Some(seed) => Box::new(StdRng::seed_from_u64(seed)),
        None => Box::new(rand::rng()),
    }
}

/// Formats hours with one decimal place (e.g. `4.0`, `0.5`).
pub fn format_hours(hours: f64) -> String {
    format!("{hours:.1}")
}

/// Full English weekday name.
pub const fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// Truncates by characters, not bytes, adding `...` when shortened.
pub fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() > width {
        format!("{}...", s.chars().take(width.saturating_sub(3)).collect::<String>())
    } else {
        s.to_string()
    }
}

/// Joins study days as `Mon, Wed, Fri`.
pub fn join_days(days: &[Weekday]) -> String {
    days.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
