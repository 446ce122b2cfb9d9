use rust_decimal::Decimal;
use rust_decimal_macros::dec;

const LAKH: Decimal = dec!(100000);

/// Format an amount in rupees, abbreviating to lakhs when `|value|` is at
/// least 1,00,000. Rounds half to even, as the UI's float formatting does.
///
/// `4160000` → `₹41.60L`, `-20200` → `₹-20,200`.
pub fn format_currency(value: Decimal) -> String {
    if value.abs() >= LAKH {
        format!("₹{:.2}L", non_negative_zero((value / LAKH).round_dp(2)))
    } else {
        let whole = non_negative_zero(value.round());
        let sign = if whole.is_sign_negative() { "-" } else { "" };
        format!("₹{sign}{}", group_thousands(&whole.abs().to_string()))
    }
}

/// Format a 0–100 percentage with one decimal.
pub fn format_percent(value: Decimal) -> String {
    format!("{:.1}%", non_negative_zero(value.round_dp(1)))
}

/// Drop the sign of a value that rounded to zero.
fn non_negative_zero(value: Decimal) -> Decimal {
    if value.is_zero() {
        Decimal::ZERO
    } else {
        value
    }
}

fn group_thousands(digits: &str) -> String {
    let bytes = digits.as_bytes();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, b) in bytes.iter().enumerate() {
        if i > 0 && (bytes.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(*b as char);
    }
    out
}
