use chrono::NaiveDate;
use rust_decimal::Decimal;

/// Parse free-form amount text, falling back to zero when it is empty or
/// not a number. Form submission relies on this fallback.
pub fn coerce_amount(s: &str) -> Decimal {
    Decimal::from_str_exact(s.trim()).unwrap_or(Decimal::ZERO)
}

/// US-style currency rendering: "$1,234.50".
pub fn fmt_currency(amount: &Decimal) -> String {
    let rounded = amount.round_dp(2);
    let negative = rounded.is_sign_negative();
    let fixed = format!("{:.2}", rounded.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let digits: Vec<char> = int_part.chars().collect();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.iter().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(*ch);
    }

    if negative {
        format!("-${grouped}.{frac_part}")
    } else {
        format!("${grouped}.{frac_part}")
    }
}

/// US short date, the equivalent of `toLocaleDateString()` under en-US.
pub fn fmt_date(d: &NaiveDate) -> String {
    d.format("%-m/%-d/%Y").to_string()
}

pub fn today() -> NaiveDate {
    chrono::Utc::now().date_naive()
}

pub fn iso(d: &NaiveDate) -> String {
    d.format("%Y-%m-%d").to_string()
}

pub fn parse_iso(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str_exact(s).unwrap()
    }

    #[test]
    fn coerce_amount_parses_decimals() {
        assert_eq!(coerce_amount("12.5"), dec("12.5"));
        assert_eq!(coerce_amount(" 7 "), dec("7"));
    }

    #[test]
    fn coerce_amount_defaults_to_zero() {
        assert_eq!(coerce_amount("abc"), Decimal::ZERO);
        assert_eq!(coerce_amount(""), Decimal::ZERO);
    }

    #[test]
    fn currency_groups_thousands() {
        assert_eq!(fmt_currency(&dec("1234.5")), "$1,234.50");
        assert_eq!(fmt_currency(&dec("1000000")), "$1,000,000.00");
    }

    #[test]
    fn currency_small_values() {
        assert_eq!(fmt_currency(&dec("0")), "$0.00");
        assert_eq!(fmt_currency(&dec("12.3")), "$12.30");
        assert_eq!(fmt_currency(&dec("999.99")), "$999.99");
    }

    #[test]
    fn date_renders_us_short_form() {
        let d = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        assert_eq!(fmt_date(&d), "1/15/2024");
        assert_eq!(iso(&d), "2024-01-15");
    }

    #[test]
    fn parse_iso_round_trips() {
        let d = parse_iso("2024-01-15").unwrap();
        assert_eq!(iso(&d), "2024-01-15");
        assert!(parse_iso("01/15/2024").is_none());
    }
}
