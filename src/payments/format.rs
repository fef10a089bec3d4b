//! Display formatting for amounts and dates (Nigerian conventions)

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use rust_decimal::Decimal;

use super::calculator::round_money;

pub const CURRENCY_CODE: &str = "NGN";

/// Format an amount as `NGN 1,234.56`; a missing amount reads as zero
pub fn format_currency(amount: Option<Decimal>) -> String {
    format!("{} {}", CURRENCY_CODE, group_thousands(amount.unwrap_or_default()))
}

/// Format an amount as `₦1,234.56`, the form used inside emails
pub fn format_naira(amount: Option<Decimal>) -> String {
    format!("₦{}", group_thousands(amount.unwrap_or_default()))
}

fn group_thousands(amount: Decimal) -> String {
    let fixed = format!("{:.2}", round_money(amount).abs());
    let (whole, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if amount.is_sign_negative() && !round_money(amount).is_zero() {
        "-"
    } else {
        ""
    };
    format!("{}{}.{}", sign, grouped, fraction)
}

pub fn format_date(date: Option<NaiveDate>) -> String {
    match date {
        Some(date) => date.format("%-d %b %Y").to_string(),
        None => "-".to_string(),
    }
}

pub fn format_datetime(datetime: Option<DateTime<Utc>>) -> String {
    match datetime {
        Some(datetime) => datetime.format("%-d %b %Y, %H:%M").to_string(),
        None => "-".to_string(),
    }
}

/// Parse the date part of a stored date or timestamp column
pub fn parse_stored_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(datetime) = DateTime::parse_from_rfc3339(raw) {
        return Some(datetime.date_naive());
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f"))
        .ok()
        .map(|datetime| datetime.date())
}

/// Format a stored date column; unparseable values are shown as-is
pub fn format_stored_date(raw: Option<&str>) -> String {
    match raw.map(str::trim).filter(|r| !r.is_empty()) {
        None => "-".to_string(),
        Some(raw) => parse_stored_date(raw)
            .map(|date| format_date(Some(date)))
            .unwrap_or_else(|| raw.to_string()),
    }
}
