//! Experience values
//!
//! The EXP integer type plus parsing and formatting helpers for
//! user-typed cumulative values.

/// Cumulative experience points.
///
/// 128 bits because the block extrapolation triples its step every 500
/// ranks, which leaves 64-bit range long before rank 20000.
pub type Exp = u128;

/// Parse a user-typed EXP value, ignoring anything that isn't a digit.
///
/// `"1,234,567"`, `" 1 234 "` and `"12345exp"` all parse. Returns `None`
/// when no digits remain or the value doesn't fit in [`Exp`].
pub fn parse_exp(input: &str) -> Option<Exp> {
    let digits: String = input.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return None;
    }
    digits.parse().ok()
}

/// Parse a plain base-10 EXP value from a data file.
///
/// Only ASCII digits are accepted after trimming, so `-500`, `1.5e3` and
/// `1,000` are all rejected rather than reinterpreted.
pub fn parse_exp_exact(input: &str) -> Option<Exp> {
    let input = input.trim();
    if input.is_empty() || !input.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    input.parse().ok()
}

/// Format an EXP value with `,` every three digits.
pub fn format_exp(exp: Exp) -> String {
    let raw = exp.to_string();
    let mut out = String::with_capacity(raw.len() + raw.len() / 3);
    for (i, c) in raw.chars().enumerate() {
        if i > 0 && (raw.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Clamp an arbitrary float into a valid EXP value.
///
/// Negative, NaN and infinite inputs become 0. Fractions truncate.
pub fn clamp_raw_exp(value: f64) -> Exp {
    if !value.is_finite() || value <= 0.0 {
        return 0;
    }
    // `as` saturates at Exp::MAX
    value as Exp
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_exp_strips_separators() {
        assert_eq!(parse_exp("1,234,567"), Some(1_234_567));
        assert_eq!(parse_exp(" 1 234 "), Some(1234));
        assert_eq!(parse_exp("0"), Some(0));
        assert_eq!(parse_exp("12345exp"), Some(12345));
    }

    #[test]
    fn test_parse_exp_rejects_digit_free_input() {
        assert_eq!(parse_exp(""), None);
        assert_eq!(parse_exp("xyz"), None);
        assert_eq!(parse_exp(" , "), None);
    }

    #[test]
    fn test_parse_exp_overflow() {
        let too_big = "9".repeat(50);
        assert_eq!(parse_exp(&too_big), None);
    }

    #[test]
    fn test_parse_exp_exact() {
        assert_eq!(parse_exp_exact("1250"), Some(1_250));
        assert_eq!(parse_exp_exact(" 0 "), Some(0));
        assert_eq!(parse_exp_exact("-500"), None);
        assert_eq!(parse_exp_exact("1.5e3"), None);
        assert_eq!(parse_exp_exact("1,000"), None);
        assert_eq!(parse_exp_exact(""), None);
        assert_eq!(parse_exp_exact(&"9".repeat(50)), None);
    }

    #[test]
    fn test_format_exp() {
        assert_eq!(format_exp(0), "0");
        assert_eq!(format_exp(999), "999");
        assert_eq!(format_exp(1000), "1,000");
        assert_eq!(format_exp(1_234_567), "1,234,567");
        assert_eq!(format_exp(100_000), "100,000");
    }

    #[test]
    fn test_clamp_raw_exp() {
        assert_eq!(clamp_raw_exp(-5.0), 0);
        assert_eq!(clamp_raw_exp(f64::NAN), 0);
        assert_eq!(clamp_raw_exp(f64::INFINITY), 0);
        assert_eq!(clamp_raw_exp(f64::NEG_INFINITY), 0);
        assert_eq!(clamp_raw_exp(1250.9), 1250);
        assert_eq!(clamp_raw_exp(f64::MAX), Exp::MAX);
    }
}
