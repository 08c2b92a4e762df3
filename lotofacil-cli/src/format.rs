use anyhow::{Context, Result, bail};

/// Formata um valor em reais : `R$ 1.234,56`, negativo como `-R$ 36,00`.
/// Entre `R$` e o valor vai um espaço não separável (U+00A0), como no padrão pt-BR.
pub fn format_brl(value: f64) -> String {
    let cents = (value.abs() * 100.0).round() as u64;
    let sign = if value < 0.0 && cents > 0 { "-" } else { "" };
    format!("{sign}R$\u{a0}{},{:02}", group_thousands(cents / 100), cents % 100)
}

fn group_thousands(units: u64) -> String {
    let digits = units.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push('.');
        }
        out.push(ch);
    }
    out
}

/// Lê um valor digitado no formato brasileiro (`1.500,50`, `R$ 30`).
///
/// O ponto só é separador de milhar em grupos de três dígitos (`1.500`,
/// `1.500.000,00`). Sem vírgula, `1500.50` e `1.5` usam o ponto como decimal.
pub fn parse_brl_decimal(s: &str) -> Result<f64> {
    let s = s.trim();
    let s = s.strip_prefix("R$").unwrap_or(s).trim_start_matches([' ', '\u{a0}']);
    if s.is_empty() {
        return Ok(0.0);
    }

    let (integer, fraction) = match s.rsplit_once(',') {
        Some((integer, fraction)) => (integer, Some(fraction)),
        None => (s, None),
    };

    let normalized = if !integer.contains('.') {
        match fraction {
            Some(fraction) => format!("{}.{}", integer, fraction),
            None => integer.to_string(),
        }
    } else if is_thousands_grouped(integer) {
        let digits = integer.replace('.', "");
        match fraction {
            Some(fraction) => format!("{}.{}", digits, fraction),
            None => digits,
        }
    } else if fraction.is_none() {
        integer.to_string()
    } else {
        bail!("Separador de milhar inválido : '{}'", s);
    };

    let value = normalized
        .parse::<f64>()
        .with_context(|| format!("Valor inválido : '{}'", s))?;
    if !value.is_finite() || value < 0.0 {
        bail!("Valor fora do intervalo : '{}'", s);
    }
    Ok(value)
}

/// `1.500` ou `12.345.678` : primeiro grupo com 1 a 3 dígitos, os demais com 3.
fn is_thousands_grouped(integer: &str) -> bool {
    let mut groups = integer.split('.');
    let all_digits = |g: &str| g.chars().all(|c| c.is_ascii_digit());
    match groups.next() {
        Some(first) if (1..=3).contains(&first.len()) && all_digits(first) => {
            groups.all(|g| g.len() == 3 && all_digits(g))
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_brl() {
        assert_eq!(format_brl(0.0), "R$\u{a0}0,00");
        assert_eq!(format_brl(6.0), "R$\u{a0}6,00");
        assert_eq!(format_brl(24.5), "R$\u{a0}24,50");
        assert_eq!(format_brl(1234.56), "R$\u{a0}1.234,56");
        assert_eq!(format_brl(1_000_000.0), "R$\u{a0}1.000.000,00");
        assert_eq!(format_brl(999.999), "R$\u{a0}1.000,00");
    }

    #[test]
    fn test_format_brl_negative() {
        assert_eq!(format_brl(-36.0), "-R$\u{a0}36,00");
        assert_eq!(format_brl(-1500.0), "-R$\u{a0}1.500,00");
        assert_eq!(format_brl(-0.001), "R$\u{a0}0,00");
    }

    #[test]
    fn test_parse_brl_decimal() {
        assert!((parse_brl_decimal("1.500,50").unwrap() - 1500.50).abs() < 0.001);
        assert!((parse_brl_decimal("R$ 30").unwrap() - 30.0).abs() < 0.001);
        assert!((parse_brl_decimal("  12,5  ").unwrap() - 12.5).abs() < 0.001);
        assert!((parse_brl_decimal("").unwrap() - 0.0).abs() < 0.001);
        assert!(parse_brl_decimal("abc").is_err());
        assert!(parse_brl_decimal("-10").is_err());
    }

    #[test]
    fn test_parse_brl_decimal_dot_as_decimal_point() {
        assert!((parse_brl_decimal("1500.50").unwrap() - 1500.50).abs() < 0.001);
        assert!((parse_brl_decimal("1.5").unwrap() - 1.5).abs() < 0.001);
        assert!((parse_brl_decimal("0.75").unwrap() - 0.75).abs() < 0.001);
    }

    #[test]
    fn test_parse_brl_decimal_thousands_groups() {
        assert!((parse_brl_decimal("1.500").unwrap() - 1500.0).abs() < 0.001);
        assert!((parse_brl_decimal("1.500.000,00").unwrap() - 1_500_000.0).abs() < 0.001);
        assert!((parse_brl_decimal("R$\u{a0}2.000,10").unwrap() - 2000.10).abs() < 0.001);
        assert!(parse_brl_decimal("1.50,00").is_err());
        assert!(parse_brl_decimal("1.5.5").is_err());
    }

    #[test]
    fn test_format_then_parse_keeps_value() {
        let text = format_brl(1_234_567.89);
        assert!((parse_brl_decimal(&text).unwrap() - 1_234_567.89).abs() < 0.001);
    }
}
