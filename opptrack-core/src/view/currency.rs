//! Currency formatting for opportunity values

use rust_decimal::{Decimal, RoundingStrategy};

/// Format an amount the way the list shows it: `$1,234,567.89`
///
/// Two decimal places, half away from zero, comma thousands separators
/// (en-US grouping). The sign sits after the dollar sign, so a negative
/// amount reads `$-12.00`.
pub fn format_currency(value: Decimal) -> String {
    format!("${}", format_number(value))
}

/// en-US grouping with exactly two fraction digits
fn format_number(value: Decimal) -> String {
    let rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let negative = rounded.is_sign_negative() && !rounded.is_zero();
    let text = format!("{:.2}", rounded.abs());
    let (whole, fraction) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    format!("{}{}.{}", if negative { "-" } else { "" }, grouped, fraction)
}
