//! Text formatting shared by the renderer and the page shell.

use chrono::{DateTime, Local, NaiveDateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};

pub const POSITIVE_CLASS: &str = "positive";
pub const NEGATIVE_CLASS: &str = "negative";

/// Rounds to cents, half away from zero. A result of zero is always
/// positive so the sign and the printed digits agree.
fn round2(value: Decimal) -> Decimal {
    let mut rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    if rounded.is_zero() {
        rounded.set_sign_positive(true);
    }
    rounded.rescale(2);
    rounded
}

/// Two decimal places, half away from zero.
pub fn fixed2(value: Decimal) -> String {
    round2(value).to_string()
}

pub fn money(value: Decimal) -> String {
    format!("${}", fixed2(value))
}

/// `+` for zero and up, judged on the rounded value. Negatives already
/// carry their `-`.
pub fn sign_prefix(value: Decimal) -> &'static str {
    if round2(value) >= Decimal::ZERO {
        "+"
    } else {
        ""
    }
}

pub fn sign_class(value: Decimal) -> &'static str {
    if round2(value) >= Decimal::ZERO {
        POSITIVE_CLASS
    } else {
        NEGATIVE_CLASS
    }
}

/// `+$12.50`, `$-3.10`
pub fn signed_money(value: Decimal) -> String {
    format!("{}${}", sign_prefix(value), fixed2(value))
}

/// `+3.20%`, `-1.05%`
pub fn signed_percent(value: Decimal) -> String {
    format!("{}{}%", sign_prefix(value), fixed2(value))
}

/// YES price in cents, e.g. `0.245` -> `24.5¢`
pub fn cents(price: f64) -> String {
    format!("{:.1}¢", price * 100.0)
}

/// Win rate in whole percent, e.g. `0.714` -> `71%`
pub fn percent0(rate: f64) -> String {
    format!("{:.0}%", rate * 100.0)
}

/// Rounds to a whole number and groups thousands: `12345.6` -> `12,346`.
pub fn grouped(value: f64) -> String {
    let rounded = value.round();
    let digits = format!("{:.0}", rounded.abs());
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if rounded < 0.0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Parses the backend's ISO timestamps. Offsets are honoured; naive values
/// are taken as UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f"))
        .ok()
        .map(|naive| naive.and_utc())
}

/// Local wall-clock `HH:MM`, or `--:--` when the timestamp is unusable.
pub fn local_hhmm(raw: &str) -> String {
    parse_timestamp(raw)
        .map(|dt| dt.with_timezone(&Local).format("%H:%M").to_string())
        .unwrap_or_else(|| "--:--".to_string())
}

pub fn local_day_time(raw: &str) -> Option<String> {
    parse_timestamp(raw).map(|dt| dt.with_timezone(&Local).format("%d/%m %H:%M").to_string())
}

/// Escapes text for interpolation into element content or attribute values.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}
