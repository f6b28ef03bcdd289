//! Body size limits
//!
//! Limits are written the way server configuration usually writes them:
//! `8M`, `512k`, `2G`, `0x100000`. Suffixes are binary multiples.

/// Parse a size-limit literal into bytes.
///
/// Rules:
/// - surrounding whitespace and leading `+` signs are ignored
/// - a `0x` prefix reads hexadecimal digits, another leading `0` reads octal
///   digits, anything else reads decimal digits; parsing stops at the first
///   character that is not a digit of the base
/// - a final `k`, `m`, `g` or `t` (any case) multiplies by 1024, 1024²,
///   1024³ or 1024⁴
///
/// Returns `None` when there is no limit: an empty literal, or one that
/// evaluates to zero or less.
#[must_use]
pub fn parse_size_limit(literal: &str) -> Option<u64> {
    let lowered = literal.trim().to_ascii_lowercase();
    if lowered.is_empty() {
        return None;
    }

    let unsigned = lowered.trim_start_matches('+');
    let (negative, digits) = match unsigned.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, unsigned),
    };

    let base_value = if let Some(hex) = digits.strip_prefix("0x") {
        leading_digits(hex, 16)
    } else if digits.starts_with('0') {
        leading_digits(digits, 8)
    } else {
        leading_digits(digits, 10)
    };

    if negative || base_value == 0 {
        return None;
    }

    let exponent = match lowered.chars().last() {
        Some('t') => 4,
        Some('g') => 3,
        Some('m') => 2,
        Some('k') => 1,
        _ => 0,
    };

    Some(base_value.saturating_mul(1024u64.saturating_pow(exponent)))
}

fn leading_digits(input: &str, radix: u32) -> u64 {
    input
        .chars()
        .map_while(|c| c.to_digit(radix))
        .fold(0u64, |acc, d| {
            acc.saturating_mul(u64::from(radix))
                .saturating_add(u64::from(d))
        })
}

/// Whether `content_length` exceeds the limit described by `literal`
#[must_use]
pub fn exceeds_limit(literal: &str, content_length: u64) -> bool {
    parse_size_limit(literal).is_some_and(|max| content_length > max)
}
