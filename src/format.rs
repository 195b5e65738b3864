//! Fixed en-US display formatting. No currency conversion happens here;
//! amounts are rendered in dollars exactly as stored.

pub fn format_currency(value: f64) -> String {
    let value = finite(value);
    let cents = (value.abs() * 100.0).round() as u64;
    let sign = if value < 0.0 && cents > 0 { "-" } else { "" };

    format!("{}${}.{:02}", sign, group_thousands(cents / 100), cents % 100)
}

pub fn format_number(value: u64) -> String {
    group_thousands(value)
}

/// `2.6125` renders as `2.61%`; the value is already a percentage.
pub fn format_percent(value: f64) -> String {
    format!("{:.2}%", finite(value))
}

pub fn format_ratio(value: f64) -> String {
    format!("{:.2}", finite(value))
}

fn finite(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
