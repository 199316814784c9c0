//! Parsing and rendering of comma-grouped amounts as typed into the forms
//! ("12,00,000", "1,50,000.50").

use super::ScoringError;

/// Parses a comma-grouped decimal. `field` names the input in the error.
pub fn parse_formatted_number(field: &str, value: &str) -> Result<f64, ScoringError> {
    let cleaned = strip_separators(value);
    if cleaned.is_empty() {
        return Err(ScoringError::parse(field, value));
    }
    match cleaned.parse::<f64>() {
        Ok(n) if n.is_finite() => Ok(n),
        _ => Err(ScoringError::parse(field, value)),
    }
}

/// Parses a comma-grouped whole number ("4", "1,200").
pub fn parse_formatted_integer(field: &str, value: &str) -> Result<u32, ScoringError> {
    let cleaned = strip_separators(value);
    cleaned
        .parse::<u32>()
        .map_err(|_| ScoringError::parse(field, value))
}

/// Re-renders user input with `,` between every three integer digits.
/// Characters other than digits and `.` are dropped; only the first
/// fractional segment is kept ("1.2.3" renders as "1.2").
pub fn format_with_commas(value: &str) -> String {
    let cleaned: String = value
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();

    let mut parts = cleaned.split('.');
    let integer = parts.next().unwrap_or_default();
    let fraction = parts.next();

    let mut grouped = String::with_capacity(integer.len() + integer.len() / 3);
    for (i, ch) in integer.chars().enumerate() {
        if i > 0 && (integer.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    match fraction {
        Some(f) if !f.is_empty() => format!("{grouped}.{f}"),
        _ => grouped,
    }
}

fn strip_separators(value: &str) -> String {
    value.trim().chars().filter(|c| *c != ',').collect()
}
