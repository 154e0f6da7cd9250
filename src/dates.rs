//! Flexible date handling for the dashboard datasets.
//!
//! The source files mix separator and component orders (`2025/06/27`,
//! `27-06-2025`, `27 June 2025`, `June 27, 2025`), so every comparison goes
//! through one canonical form: `M/D/YYYY` without zero padding.
//!
//! Numeric three-part dates are disambiguated heuristically: a leading
//! 4-digit component is a year, a first component above 12 is a day, and
//! anything else is read month-first. When both leading components are 12 or
//! below the string alone cannot decide the order; month-first is assumed,
//! matching the convention of the bundled files.

use chrono::{Datelike, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;

static ORDINAL_SUFFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(\d{1,2})(st|nd|rd|th)\b").unwrap());

static YEAR_FIRST: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d{4})[/\-](\d{1,2})[/\-](\d{1,2})").unwrap());

static DAY_OR_MONTH_FIRST: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d{1,2})[/\-](\d{1,2})[/\-](\d{4})").unwrap());

const MONTH_NAMES: &str =
    "January|February|March|April|May|June|July|August|September|October|November|December";

static DAY_MONTH_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!(r"(?i)(\d{{1,2}})\s+({MONTH_NAMES})\s+(\d{{4}})")).unwrap());

static MONTH_NAME_DAY: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!(r"(?i)({MONTH_NAMES})\s+(\d{{1,2}}),?\s+(\d{{4}})")).unwrap());

fn month_number(name: &str) -> Option<u32> {
    let index = MONTH_NAMES
        .split('|')
        .position(|m| m.eq_ignore_ascii_case(name))?;
    Some(index as u32 + 1)
}

/// Canonical `M/D/YYYY` rendering of a parsed date.
pub fn canonical(date: NaiveDate) -> String {
    format!("{}/{}/{}", date.month(), date.day(), date.year())
}

/// Canonicalize a numeric date string to `M/D/YYYY`.
///
/// Ordinal suffixes are stripped and slash, dash, and space separators all
/// accepted. Input that does not look like a three-part numeric date is
/// returned unchanged, which makes the function idempotent.
pub fn normalize_date(raw: &str) -> String {
    let cleaned = ORDINAL_SUFFIX.replace_all(raw.trim(), "$1");
    let parts: Vec<&str> = cleaned
        .split(|c: char| c == '/' || c == '-' || c.is_whitespace())
        .filter(|p| !p.is_empty())
        .collect();

    if parts.len() == 3 {
        let numbers: Vec<Option<u32>> = parts.iter().map(|p| p.parse().ok()).collect();
        if let (Some(a), Some(b), Some(c)) = (numbers[0], numbers[1], numbers[2]) {
            if parts[0].len() == 4 {
                return format!("{}/{}/{}", b, c, a);
            }
            if parts[2].len() == 4 {
                if a > 12 {
                    return format!("{}/{}/{}", b, a, c);
                }
                return format!("{}/{}/{}", a, b, c);
            }
        }
    }

    raw.trim().to_string()
}

/// Parse any supported date form into a calendar date.
///
/// Returns `None` for text that is not a date or names an impossible one.
pub fn parse_flexible(raw: &str) -> Option<NaiveDate> {
    let normalized = normalize_date(raw);
    let parts: Vec<&str> = normalized.split('/').collect();
    if parts.len() == 3 {
        if let (Ok(m), Ok(d), Ok(y)) = (
            parts[0].parse::<u32>(),
            parts[1].parse::<u32>(),
            parts[2].parse::<i32>(),
        ) {
            return NaiveDate::from_ymd_opt(y, m, d);
        }
    }

    let trimmed = raw.trim();
    if let Some(caps) = DAY_MONTH_NAME.captures(trimmed) {
        let day = caps[1].parse().ok()?;
        let month = month_number(&caps[2])?;
        let year = caps[3].parse().ok()?;
        return NaiveDate::from_ymd_opt(year, month, day);
    }
    if let Some(caps) = MONTH_NAME_DAY.captures(trimmed) {
        let month = month_number(&caps[1])?;
        let day = caps[2].parse().ok()?;
        let year = caps[3].parse().ok()?;
        return NaiveDate::from_ymd_opt(year, month, day);
    }

    None
}

/// Find the first date mentioned anywhere in free text.
///
/// Matchers are tried in order: year-first numeric, day/month-first numeric,
/// `D Month YYYY`, `Month D, YYYY`. A match that names an impossible
/// calendar date is skipped in favour of the next matcher.
pub fn extract_date(text: &str) -> Option<NaiveDate> {
    if let Some(caps) = YEAR_FIRST.captures(text) {
        let year = caps[1].parse().ok()?;
        let month = caps[2].parse().ok()?;
        let day = caps[3].parse().ok()?;
        if let Some(date) = NaiveDate::from_ymd_opt(year, month, day) {
            return Some(date);
        }
    }

    if let Some(caps) = DAY_OR_MONTH_FIRST.captures(text) {
        let a: u32 = caps[1].parse().ok()?;
        let b: u32 = caps[2].parse().ok()?;
        let year: i32 = caps[3].parse().ok()?;
        let (month, day) = if a > 12 { (b, a) } else { (a, b) };
        if let Some(date) = NaiveDate::from_ymd_opt(year, month, day) {
            return Some(date);
        }
    }

    if let Some(caps) = DAY_MONTH_NAME.captures(text) {
        let day = caps[1].parse().ok()?;
        let month = month_number(&caps[2])?;
        let year = caps[3].parse().ok()?;
        if let Some(date) = NaiveDate::from_ymd_opt(year, month, day) {
            return Some(date);
        }
    }

    if let Some(caps) = MONTH_NAME_DAY.captures(text) {
        let month = month_number(&caps[1])?;
        let day = caps[2].parse().ok()?;
        let year = caps[3].parse().ok()?;
        return NaiveDate::from_ymd_opt(year, month, day);
    }

    None
}
