// src/utils/format.rs
use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};

/// Fixed decimals with thousands separators, half away from zero.
/// Example: 1234567.891, 2 -> "1,234,567.89"
pub fn fmt_num(value: Decimal, decimals: u32) -> String {
    let rounded = value.round_dp_with_strategy(decimals, RoundingStrategy::MidpointAwayFromZero);
    let text = format!("{:.*}", decimals as usize, rounded.abs());
    let (int_part, frac_part) = match text.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (text.as_str(), None),
    };

    let mut grouped = String::with_capacity(text.len() + int_part.len() / 3 + 1);
    if rounded.is_sign_negative() && !rounded.is_zero() {
        grouped.push('-');
    }
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if let Some(frac) = frac_part {
        grouped.push('.');
        grouped.push_str(frac);
    }
    grouped
}

pub fn fmt_usd(value: Decimal) -> String {
    format!("${}", fmt_num(value, 2))
}

/// Always signed: "+5.00%", "-1.25%".
pub fn fmt_pct(value: Decimal) -> String {
    let sign = if value.is_sign_negative() && !value.is_zero() { "" } else { "+" };
    format!("{}{}%", sign, fmt_num(value, 2))
}

pub fn fmt_date(ts: &DateTime<Utc>) -> String {
    ts.format("%b %d %H:%M").to_string()
}

pub fn fmt_time(ts: &DateTime<Utc>) -> String {
    ts.format("%H:%M").to_string()
}

/// "htf_ema_trend" -> "HTF EMA trend"
pub fn humanize_condition(name: &str) -> String {
    name.split('_')
        .map(|word| match word.to_ascii_lowercase().as_str() {
            "htf" | "rsi" | "ema" | "atr" => word.to_ascii_uppercase(),
            _ => word.to_string(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}
