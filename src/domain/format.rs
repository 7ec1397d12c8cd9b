//! Display formatting for monetary and percentage figures.

/// Format a monetary value with thousands separators, e.g. `$2,050.00`.
/// Negative values carry a leading minus: `-$1,234.56`. Currencies other
/// than USD are rendered as `CODE 2,050.00`.
pub fn format_currency(value: f64, currency: &str) -> String {
    let negative = value < 0.0;
    let cents = (value.abs() * 100.0).round() as u64;
    let whole = cents / 100;
    let frac = cents % 100;

    let digits = whole.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if negative { "-" } else { "" };
    if currency == "USD" {
        format!("{sign}${grouped}.{frac:02}")
    } else {
        format!("{sign}{currency} {grouped}.{frac:02}")
    }
}

/// Format a percentage with an explicit sign, e.g. `+2.50%` / `-1.20%`.
pub fn format_percent(value: f64) -> String {
    if value >= 0.0 {
        format!("+{value:.2}%")
    } else {
        format!("{value:.2}%")
    }
}
