//! Portuguese (pt-PT) number formatting for result panels and reports.
//!
//! - comma as decimal separator
//! - no-break space (U+00A0) thousands grouping, only from 10 000 upward
//! - non-finite values render as an en dash
//!
//! ```rust
//! use calc_core::format::fmt2;
//!
//! assert_eq!(fmt2(1.2), "1,20");
//! assert_eq!(fmt2(12345.678), "12\u{a0}345,68");
//! assert_eq!(fmt2(f64::NAN), "–");
//! ```

/// Placeholder for undefined values
pub const UNDEFINED: &str = "–";

const GROUP_SEPARATOR: char = '\u{a0}';

/// Format with a fixed number of decimals
pub fn fmt_decimals(value: f64, decimals: usize) -> String {
    if !value.is_finite() {
        return UNDEFINED.to_string();
    }

    let fixed = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match fixed.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (fixed.as_str(), None),
    };

    let mut out = String::with_capacity(fixed.len() + 4);
    // "-0,00" is not shown
    if value < 0.0 && fixed.chars().any(|c| c.is_ascii_digit() && c != '0') {
        out.push('-');
    }
    out.push_str(&group_thousands(int_part));
    if let Some(frac) = frac_part {
        out.push(',');
        out.push_str(frac);
    }
    out
}

/// Two decimals, the default for every displayed result
pub fn fmt2(value: f64) -> String {
    fmt_decimals(value, 2)
}

/// One decimal (currents in the circuit schedule)
pub fn fmt1(value: f64) -> String {
    fmt_decimals(value, 1)
}

/// Two decimals followed by a percent sign
pub fn fmt_percent(value: f64) -> String {
    if !value.is_finite() {
        return UNDEFINED.to_string();
    }
    format!("{}%", fmt2(value))
}

fn group_thousands(digits: &str) -> String {
    if digits.len() < 5 {
        return digits.to_string();
    }
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(GROUP_SEPARATOR);
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_decimals() {
        assert_eq!(fmt2(0.2), "0,20");
        assert_eq!(fmt2(1.199), "1,20");
        assert_eq!(fmt2(66.56), "66,56");
        assert_eq!(fmt2(-3.5), "-3,50");
    }

    #[test]
    fn test_grouping_starts_at_five_digits() {
        assert_eq!(fmt2(1234.5), "1234,50");
        assert_eq!(fmt2(9999.994), "9999,99");
        assert_eq!(fmt2(10000.0), "10\u{a0}000,00");
        assert_eq!(fmt2(1234567.0), "1\u{a0}234\u{a0}567,00");
        assert_eq!(fmt2(-25000.0), "-25\u{a0}000,00");
    }

    #[test]
    fn test_non_finite() {
        assert_eq!(fmt2(f64::NAN), UNDEFINED);
        assert_eq!(fmt2(f64::INFINITY), UNDEFINED);
        assert_eq!(fmt1(f64::NEG_INFINITY), UNDEFINED);
        assert_eq!(fmt_percent(f64::NAN), UNDEFINED);
    }

    #[test]
    fn test_negative_zero() {
        assert_eq!(fmt2(-0.001), "0,00");
        assert_eq!(fmt2(-0.0), "0,00");
    }

    #[test]
    fn test_variants() {
        assert_eq!(fmt1(28.99), "29,0");
        assert_eq!(fmt_percent(2.2826), "2,28%");
        assert_eq!(fmt_decimals(3.0, 0), "3");
    }
}
