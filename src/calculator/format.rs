//! Number formatting for results.
//!
//! The parser only ever produces `f64`; everything that turns those into
//! text for the terminal, the history or the clipboard lives here.

/// Significant digits used when nothing else is configured.
pub const DEFAULT_PRECISION: usize = 10;

/// Integers up to this magnitude are printed without a fractional part.
const INTEGER_DISPLAY_LIMIT: f64 = 1e15;

/// How results are rendered for display.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DisplayOptions {
    /// Maximum number of significant digits.
    pub precision: usize,
    /// Group the integer part in threes with commas.
    pub thousands_separators: bool,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            precision: DEFAULT_PRECISION,
            thousands_separators: false,
        }
    }
}

impl DisplayOptions {
    pub fn format(&self, value: f64) -> String {
        let text = format_significant(value, self.precision);
        if self.thousands_separators {
            group_thousands(&text)
        } else {
            text
        }
    }
}

/// Format with at most `digits` significant digits, like C's `%.{digits}g`.
///
/// Trailing zeros are stripped. Scientific notation is used when the decimal
/// exponent is below -4 or at least `digits`.
pub fn format_significant(value: f64, digits: usize) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value.is_sign_positive() { "inf" } else { "-inf" }.to_string();
    }
    if value == 0.0 {
        return "0".to_string();
    }

    let digits = digits.max(1);

    // Rounding to `digits` can bump the exponent (9.99.. -> 1.0e1), so read
    // it back from the rounded scientific form.
    let scientific = format!("{:.*e}", digits - 1, value);
    let Some((mantissa, exponent)) = scientific.split_once('e') else {
        return scientific;
    };
    let exponent: i32 = exponent.parse().unwrap_or(0);

    if exponent < -4 || exponent >= digits as i32 {
        let mantissa = strip_trailing_zeros(mantissa);
        let sign = if exponent < 0 { '-' } else { '+' };
        format!("{}e{}{:02}", mantissa, sign, exponent.unsigned_abs())
    } else {
        let decimals = (digits as i32 - 1 - exponent).max(0) as usize;
        strip_trailing_zeros(&format!("{:.*}", decimals, value)).to_string()
    }
}

fn strip_trailing_zeros(text: &str) -> &str {
    if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.')
    } else {
        text
    }
}

/// Insert thousands separators into the integer part of a plain decimal.
///
/// Text in scientific notation is returned unchanged.
pub fn group_thousands(text: &str) -> String {
    if text.contains(['e', 'n', 'i']) {
        return text.to_string();
    }

    let (sign, unsigned) = match text.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", text),
    };
    let (int_part, frac_part) = match unsigned.find('.') {
        Some(dot) => unsigned.split_at(dot),
        None => (unsigned, ""),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, c) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    format!("{}{}{}", sign, grouped, frac_part)
}

/// Format a number for display with thousand separators.
pub fn format_display(value: f64) -> String {
    group_thousands(&format_clipboard(value))
}

/// Format a number for clipboard (raw number, no separators).
pub fn format_clipboard(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < INTEGER_DISPLAY_LIMIT {
        format!("{}", value as i64)
    } else {
        let formatted = format!("{:.10}", value);
        strip_trailing_zeros(&formatted).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_significant_plain() {
        assert_eq!(format_significant(11.0, 10), "11");
        assert_eq!(format_significant(3.5, 10), "3.5");
        assert_eq!(format_significant(-2.25, 10), "-2.25");
        assert_eq!(format_significant(10.0 / 3.0, 10), "3.333333333");
        assert_eq!(format_significant(0.1 + 0.2, 10), "0.3");
        assert_eq!(format_significant(0.0001, 10), "0.0001");
        assert_eq!(format_significant(-0.0, 10), "0");
    }

    #[test]
    fn test_significant_scientific() {
        assert_eq!(format_significant(1e20, 10), "1e+20");
        assert_eq!(format_significant(0.00001, 10), "1e-05");
        assert_eq!(format_significant(1234567890123.0, 10), "1.23456789e+12");
        assert_eq!(format_significant(12345.0, 3), "1.23e+04");
    }

    #[test]
    fn test_significant_rounding_carries() {
        assert_eq!(format_significant(9.9999999999, 10), "10");
        assert_eq!(format_significant(999.96, 4), "1000");
        assert_eq!(format_significant(99999.6, 5), "1e+05");
    }

    #[test]
    fn test_significant_non_finite() {
        assert_eq!(format_significant(f64::INFINITY, 10), "inf");
        assert_eq!(format_significant(f64::NEG_INFINITY, 10), "-inf");
        assert_eq!(format_significant(f64::NAN, 10), "nan");
    }

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands("1000000"), "1,000,000");
        assert_eq!(group_thousands("-1234.5"), "-1,234.5");
        assert_eq!(group_thousands("-0.5"), "-0.5");
        assert_eq!(group_thousands("999"), "999");
        assert_eq!(group_thousands("1e+20"), "1e+20");
    }

    #[test]
    fn test_display_and_clipboard() {
        assert_eq!(format_display(1234567.0), "1,234,567");
        assert_eq!(format_clipboard(1234567.0), "1234567");
        assert_eq!(format_display(-1234.125), "-1,234.125");
        assert_eq!(format_clipboard(0.5), "0.5");
    }

    #[test]
    fn test_display_options() {
        let options = DisplayOptions {
            precision: 6,
            thousands_separators: true,
        };
        assert_eq!(options.format(1234.5678), "1,234.57");
        assert_eq!(DisplayOptions::default().format(1234.5678), "1234.5678");
    }
}
