//! Tick and annotation label formatting.

use chrono::NaiveDate;
use num_format::{Locale, ToFormattedString};

/// SI prefixes by power of ten, as used on the value axis.
const ENG_PREFIXES: [(i32, &str); 17] = [
    (-24, "y"),
    (-21, "z"),
    (-18, "a"),
    (-15, "f"),
    (-12, "p"),
    (-9, "n"),
    (-6, "µ"),
    (-3, "m"),
    (0, ""),
    (3, "k"),
    (6, "M"),
    (9, "G"),
    (12, "T"),
    (15, "P"),
    (18, "E"),
    (21, "Z"),
    (24, "Y"),
];

/// `%g`-style: six significant digits, trailing zeros and dot trimmed.
fn fmt_general(m: f64) -> String {
    if m == 0.0 {
        return "0".into();
    }
    let digits_before = m.abs().log10().floor() as i32 + 1;
    let decimals = (6 - digits_before).max(0) as usize;
    let s = format!("{:.*}", decimals, m);
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        s
    }
}

/// Compact engineering notation with no separator: `1200 → "1.2k"`, `2.5e6 → "2.5M"`.
pub fn format_eng(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    let (min_pow, max_pow) = (ENG_PREFIXES[0].0, ENG_PREFIXES[ENG_PREFIXES.len() - 1].0);
    let sign = if value < 0.0 { -1.0 } else { 1.0 };
    let abs = value.abs();

    let mut pow10 = if abs == 0.0 {
        0
    } else {
        ((abs.log10() / 3.0).floor() as i32) * 3
    };
    pow10 = pow10.clamp(min_pow, max_pow);

    let mut mant = sign * abs / 10f64.powi(pow10);
    // rounding can push the mantissa to 1000 (e.g. 999_999.9 → "1000k")
    let rounded: f64 = fmt_general(mant).parse().unwrap_or(mant);
    if rounded.abs() >= 1000.0 && pow10 < max_pow {
        mant /= 1000.0;
        pow10 += 3;
    }

    let prefix = ENG_PREFIXES
        .iter()
        .find(|(p, _)| *p == pow10)
        .map(|(_, s)| *s)
        .unwrap_or("");
    format!("{}{}", fmt_general(mant), prefix)
}

/// Comma-grouped whole number, e.g. `12,345,678`.
pub fn format_count(value: u64) -> String {
    value.to_formatted_string(&Locale::en)
}

/// Date tick label, e.g. `05 Jan`.
pub fn format_date_tick(d: NaiveDate) -> String {
    d.format("%d %b").to_string()
}
