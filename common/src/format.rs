//! Formatação para exibição (pt-BR)

use chrono::{DateTime, Utc};

/// Valor em reais: `R$ 1.234,56`
///
/// Valores não finitos são exibidos como `R$ 0,00`.
///
/// ```
/// use maxfama_common::format::format_currency;
///
/// assert_eq!(format_currency(1234.56), "R$ 1.234,56");
/// assert_eq!(format_currency(6.0), "R$ 6,00");
/// ```
pub fn format_currency(value: f64) -> String {
    let value = if value.is_finite() { value } else { 0.0 };
    let cents = (value.abs() * 100.0).round() as u64;
    let sign = if value < 0.0 && cents > 0 { "-" } else { "" };

    format!(
        "{}R$ {},{:02}",
        sign,
        group_thousands(cents / 100),
        cents % 100
    )
}

fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push('.');
        }
        out.push(c);
    }
    out
}

/// Data no formato `dd/MM/yyyy`
pub fn format_date_br(date: &DateTime<Utc>) -> String {
    date.format("%d/%m/%Y").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coerce::parse_currency;
    use chrono::TimeZone;

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(0.0), "R$ 0,00");
        assert_eq!(format_currency(6.5), "R$ 6,50");
        assert_eq!(format_currency(999.999), "R$ 1.000,00");
        assert_eq!(format_currency(1234567.8), "R$ 1.234.567,80");
        assert_eq!(format_currency(-10.0), "-R$ 10,00");
        assert_eq!(format_currency(f64::NAN), "R$ 0,00");
    }

    #[test]
    fn test_format_currency_after_parse() {
        for input in ["R$ 1.234,56", "1.234,56", "1234.56"] {
            assert_eq!(format_currency(parse_currency(input)), "R$ 1.234,56");
        }
        assert_eq!(format_currency(parse_currency("R$6")), "R$ 6,00");
    }

    #[test]
    fn test_format_date_br() {
        let date = Utc.with_ymd_and_hms(2024, 3, 5, 10, 0, 0).unwrap();
        assert_eq!(format_date_br(&date), "05/03/2024");
    }
}
