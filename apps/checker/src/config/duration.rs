//! Parsing of unit-suffixed duration strings such as `500ms`, `5s` or `1m30s`.

use std::time::Duration;

use thiserror::Error;

use crate::error::ConfigError;

const NANOS_PER_SEC: u128 = 1_000_000_000;

/// Largest accepted duration, about 2562047h.
const MAX_NANOS: u128 = i64::MAX as u128;

/// Fraction digits beyond this are dropped; they are below nanosecond precision for every unit.
const MAX_FRACTION_DIGITS: usize = 18;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseDurationError {
    #[error("empty duration")]
    Empty,
    #[error("negative duration")]
    Negative,
    #[error("expected a number before '{0}'")]
    InvalidNumber(String),
    #[error("missing unit after '{0}' (use ns, us, ms, s, m or h)")]
    MissingUnit(String),
    #[error("unknown unit '{0}' (use ns, us, ms, s, m or h)")]
    UnknownUnit(String),
    #[error("duration out of range")]
    Overflow,
}

/// Parse a duration made of one or more `<number><unit>` terms.
///
/// A bare `0` is accepted as zero. Negative values are reported as
/// [`ParseDurationError::Negative`] so callers can tell them apart from bad syntax.
pub fn parse_duration(input: &str) -> Result<Duration, ParseDurationError> {
    let trimmed = input.trim();
    let (negative, mut rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    if rest == "0" {
        return Ok(Duration::ZERO);
    }
    if rest.is_empty() {
        return Err(ParseDurationError::Empty);
    }

    let mut total: u128 = 0;
    while !rest.is_empty() {
        let int_end = rest.find(|c: char| !c.is_ascii_digit()).unwrap_or(rest.len());
        let (int_part, after_int) = rest.split_at(int_end);

        let (frac_part, after_number) = match after_int.strip_prefix('.') {
            Some(stripped) => {
                let frac_end = stripped.find(|c: char| !c.is_ascii_digit()).unwrap_or(stripped.len());
                stripped.split_at(frac_end)
            }
            None => ("", after_int),
        };

        if int_part.is_empty() && frac_part.is_empty() {
            return Err(ParseDurationError::InvalidNumber(rest.to_string()));
        }

        let unit_end = after_number
            .find(|c: char| c.is_ascii_digit() || c == '.')
            .unwrap_or(after_number.len());
        let (unit, remainder) = after_number.split_at(unit_end);
        if unit.is_empty() {
            return Err(ParseDurationError::MissingUnit(rest.to_string()));
        }
        let unit_nanos = unit_nanos(unit)?;

        let whole: u128 = if int_part.is_empty() {
            0
        } else {
            int_part.parse().map_err(|_| ParseDurationError::Overflow)?
        };
        let mut nanos = whole.checked_mul(unit_nanos).ok_or(ParseDurationError::Overflow)?;

        if !frac_part.is_empty() {
            let digits = &frac_part[..frac_part.len().min(MAX_FRACTION_DIGITS)];
            let fraction: u128 = digits.parse().map_err(|_| ParseDurationError::Overflow)?;
            let scale = 10u128.pow(digits.len() as u32);
            nanos = nanos
                .checked_add(fraction * unit_nanos / scale)
                .ok_or(ParseDurationError::Overflow)?;
        }

        total = total.checked_add(nanos).ok_or(ParseDurationError::Overflow)?;
        if total > MAX_NANOS {
            return Err(ParseDurationError::Overflow);
        }
        rest = remainder;
    }

    if negative && total > 0 {
        return Err(ParseDurationError::Negative);
    }

    Ok(Duration::from_nanos(total as u64))
}

fn unit_nanos(unit: &str) -> Result<u128, ParseDurationError> {
    match unit {
        "ns" => Ok(1),
        "us" | "µs" | "μs" => Ok(1_000),
        "ms" => Ok(1_000_000),
        "s" => Ok(NANOS_PER_SEC),
        "m" => Ok(60 * NANOS_PER_SEC),
        "h" => Ok(3_600 * NANOS_PER_SEC),
        other => Err(ParseDurationError::UnknownUnit(other.to_string())),
    }
}

/// Parse a duration that has to be strictly positive.
///
/// Bad syntax becomes [`ConfigError::InvalidDuration`]; zero or negative values
/// become [`ConfigError::NonPositive`].
pub fn parse_positive(field: &'static str, value: &str) -> Result<Duration, ConfigError> {
    match parse_duration(value) {
        Ok(duration) if duration.is_zero() => Err(ConfigError::NonPositive { field }),
        Ok(duration) => Ok(duration),
        Err(ParseDurationError::Negative) => Err(ConfigError::NonPositive { field }),
        Err(err) => Err(ConfigError::InvalidDuration {
            field,
            value: value.to_string(),
            reason: err.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_single_units() {
        assert_eq!(parse_duration("60s"), Ok(Duration::from_secs(60)));
        assert_eq!(parse_duration("500ms"), Ok(Duration::from_millis(500)));
        assert_eq!(parse_duration("1m"), Ok(Duration::from_secs(60)));
        assert_eq!(parse_duration("2h"), Ok(Duration::from_secs(7_200)));
        assert_eq!(parse_duration("250us"), Ok(Duration::from_micros(250)));
        assert_eq!(parse_duration("250µs"), Ok(Duration::from_micros(250)));
        assert_eq!(parse_duration("42ns"), Ok(Duration::from_nanos(42)));
    }

    #[test]
    fn parses_compound_and_fractional_values() {
        assert_eq!(parse_duration("1m30s"), Ok(Duration::from_secs(90)));
        assert_eq!(parse_duration("1h2m3s"), Ok(Duration::from_secs(3_723)));
        assert_eq!(parse_duration("1.5s"), Ok(Duration::from_millis(1_500)));
        assert_eq!(parse_duration(".5h"), Ok(Duration::from_secs(1_800)));
        assert_eq!(parse_duration("1.2s"), Ok(Duration::from_millis(1_200)));
    }

    #[test]
    fn zero_and_signs() {
        assert_eq!(parse_duration("0"), Ok(Duration::ZERO));
        assert_eq!(parse_duration("0s"), Ok(Duration::ZERO));
        assert_eq!(parse_duration("-0s"), Ok(Duration::ZERO));
        assert_eq!(parse_duration("+5s"), Ok(Duration::from_secs(5)));
        assert_eq!(parse_duration("-5s"), Err(ParseDurationError::Negative));
    }

    #[test]
    fn rejects_malformed_input() {
        assert_eq!(parse_duration(""), Err(ParseDurationError::Empty));
        assert_eq!(parse_duration("5"), Err(ParseDurationError::MissingUnit("5".to_string())));
        assert_eq!(parse_duration("5d"), Err(ParseDurationError::UnknownUnit("d".to_string())));
        assert_eq!(parse_duration("abc"), Err(ParseDurationError::InvalidNumber("abc".to_string())));
        assert_eq!(parse_duration("1s5"), Err(ParseDurationError::MissingUnit("5".to_string())));
    }

    #[test]
    fn rejects_durations_beyond_range() {
        assert_eq!(parse_duration("2562047h"), Ok(Duration::from_secs(2_562_047 * 3_600)));
        assert_eq!(parse_duration("2562048h"), Err(ParseDurationError::Overflow));
        assert_eq!(parse_duration("3000000000000000h"), Err(ParseDurationError::Overflow));
        assert_eq!(parse_duration("2562047h47m16s854775807ns"), Ok(Duration::from_nanos(i64::MAX as u64)));
        assert_eq!(parse_duration("2562047h47m16s854775808ns"), Err(ParseDurationError::Overflow));
        assert!(matches!(
            parse_positive("interval", "3000000000000000h"),
            Err(ConfigError::InvalidDuration { field: "interval", .. })
        ));
    }

    #[test]
    fn positive_parse_distinguishes_zero_from_bad_format() {
        assert_eq!(parse_positive("timeout", "5s").unwrap(), Duration::from_secs(5));
        assert!(matches!(
            parse_positive("latency-threshold", "0s"),
            Err(ConfigError::NonPositive { field: "latency-threshold" })
        ));
        assert!(matches!(
            parse_positive("latency-threshold", "-1s"),
            Err(ConfigError::NonPositive { .. })
        ));
        assert!(matches!(
            parse_positive("interval", "soon"),
            Err(ConfigError::InvalidDuration { field: "interval", .. })
        ));
    }
}
