use crate::models::parse_amount;

/// Format a float as a dollar amount with thousands separators: $1,234.56
pub fn money(val: f64) -> String {
    let negative = val < 0.0;
    let cents = format!("{:.2}", val.abs());
    let (int_part, dec_part) = cents.split_once('.').unwrap_or((cents.as_str(), "00"));

    let mut with_commas = String::new();
    for (i, c) in int_part.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            with_commas.push(',');
        }
        with_commas.push(c);
    }
    let with_commas: String = with_commas.chars().rev().collect();

    if negative {
        format!("-${with_commas}.{dec_part}")
    } else {
        format!("${with_commas}.{dec_part}")
    }
}

/// Preview of a typed amount, or None while it doesn't parse yet.
pub fn amount_preview(raw: &str) -> Option<String> {
    parse_amount(raw).map(money)
}

/// Installment suffix like "(2/12)", empty when neither part is set.
pub fn installments(index: &str, total: &str) -> String {
    match (index.trim(), total.trim()) {
        ("", "") => String::new(),
        (i, "") => format!("({i})"),
        ("", t) => format!("(?/{t})"),
        (i, t) => format!("({i}/{t})"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_money_formatting() {
        assert_eq!(money(1234.56), "$1,234.56");
        assert_eq!(money(-500.00), "-$500.00");
        assert_eq!(money(0.0), "$0.00");
        assert_eq!(money(1000000.99), "$1,000,000.99");
        assert_eq!(money(42.10), "$42.10");
    }

    #[test]
    fn test_amount_preview() {
        assert_eq!(amount_preview("1500.5").as_deref(), Some("$1,500.50"));
        assert_eq!(amount_preview("12."), Some("$12.00".to_string()));
        assert_eq!(amount_preview("abc"), None);
    }

    #[test]
    fn test_installments() {
        assert_eq!(installments("", ""), "");
        assert_eq!(installments("2", "12"), "(2/12)");
        assert_eq!(installments("3", ""), "(3)");
        assert_eq!(installments("", "6"), "(?/6)");
    }
}
