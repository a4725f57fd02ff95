use std::fmt;

/// Money is kept in integer minor units (cents), so 1 unit = 100, and "12.50" = 1250.
pub type Money = i64;

/// Render minor units as a decimal string: 1250 -> "12.50", -5 -> "-0.05".
pub fn format_money(amount: Money) -> String {
    let sign = if amount < 0 { "-" } else { "" };
    let abs = amount.unsigned_abs();
    format!("{}{}.{:02}", sign, abs / 100, abs % 100)
}

/// Parse a decimal string into minor units.
/// "50" -> 5000, "12.5" -> 1250, ".05" -> 5. Digits past the second decimal are truncated.
pub fn parse_money(input: &str) -> Result<Money, ParseMoneyError> {
    let input = input.trim();
    let (negative, digits) = match input.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, input),
    };

    if digits.is_empty() {
        return Err(ParseMoneyError::Empty);
    }

    let (units_str, fraction_str) = match digits.split_once('.') {
        Some((units, fraction)) => (units, fraction),
        None => (digits, ""),
    };

    if !fraction_str.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ParseMoneyError::InvalidFormat);
    }

    let units: i64 = if units_str.is_empty() {
        0
    } else {
        parse_digits(units_str)?
    };

    let fraction: i64 = match fraction_str.len() {
        0 => 0,
        1 => parse_digits(fraction_str)? * 10,
        _ => parse_digits(&fraction_str[..2])?,
    };

    let amount = units
        .checked_mul(100)
        .and_then(|cents| cents.checked_add(fraction))
        .ok_or(ParseMoneyError::Overflow)?;

    Ok(if negative { -amount } else { amount })
}

fn parse_digits(s: &str) -> Result<i64, ParseMoneyError> {
    if !s.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ParseMoneyError::InvalidFormat);
    }
    s.parse().map_err(|_| ParseMoneyError::Overflow)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseMoneyError {
    Empty,
    InvalidFormat,
    Overflow,
}

impl fmt::Display for ParseMoneyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseMoneyError::Empty => write!(f, "empty money amount"),
            ParseMoneyError::InvalidFormat => write!(f, "invalid money format"),
            ParseMoneyError::Overflow => write!(f, "money amount out of range"),
        }
    }
}

impl std::error::Error for ParseMoneyError {}
