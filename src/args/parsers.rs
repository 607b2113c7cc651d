use std::time::Duration;

use super::types::PositiveUsize;
use crate::error::{AppError, AppResult, ValidationError};

pub(super) fn parse_positive_usize(s: &str) -> AppResult<PositiveUsize> {
    s.parse::<PositiveUsize>().map_err(AppError::from)
}

pub(crate) fn parse_bool_env(s: &str) -> AppResult<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "y" | "on" => Ok(true),
        "0" | "false" | "no" | "n" | "off" => Ok(false),
        _ => Err(AppError::validation(ValidationError::InvalidBoolean {
            value: s.to_owned(),
        })),
    }
}

pub(crate) fn parse_duration_arg(s: &str) -> AppResult<Duration> {
    parse_duration_value(s).map_err(AppError::from)
}

/// Parses `<number><unit>` segments (`ms`, `s`, `m`, `h`), e.g. `1m30s`.
///
/// A bare number is seconds and zero is allowed.
pub(crate) fn parse_duration_value(s: &str) -> Result<Duration, ValidationError> {
    let value = s.trim();
    if value.is_empty() {
        return Err(ValidationError::DurationEmpty);
    }
    if value.bytes().all(|byte| byte.is_ascii_digit()) {
        let secs = parse_number(value, value)?;
        return Ok(Duration::from_secs(secs));
    }

    let mut total = Duration::ZERO;
    let mut rest = value;
    while !rest.is_empty() {
        let digits_len = rest.bytes().take_while(u8::is_ascii_digit).count();
        if digits_len == 0 {
            return Err(ValidationError::InvalidDurationFormat {
                value: value.to_owned(),
            });
        }
        let (num_part, tail) = rest.split_at(digits_len);
        let unit_len = tail
            .bytes()
            .take_while(|byte| byte.is_ascii_alphabetic())
            .count();
        let (unit, tail) = tail.split_at(unit_len);
        let number = parse_number(num_part, value)?;
        let segment = match unit {
            "ms" => Duration::from_millis(number),
            "s" => Duration::from_secs(number),
            "m" => Duration::from_secs(
                number
                    .checked_mul(60)
                    .ok_or(ValidationError::DurationOverflow)?,
            ),
            "h" => Duration::from_secs(
                number
                    .checked_mul(60)
                    .and_then(|minutes| minutes.checked_mul(60))
                    .ok_or(ValidationError::DurationOverflow)?,
            ),
            "" => {
                return Err(ValidationError::InvalidDurationFormat {
                    value: value.to_owned(),
                });
            }
            other => {
                return Err(ValidationError::InvalidDurationUnit {
                    unit: other.to_owned(),
                });
            }
        };
        total = total
            .checked_add(segment)
            .ok_or(ValidationError::DurationOverflow)?;
        rest = tail;
    }
    Ok(total)
}

fn parse_number(digits: &str, value: &str) -> Result<u64, ValidationError> {
    digits
        .parse()
        .map_err(|err| ValidationError::InvalidDurationNumber {
            value: value.to_owned(),
            source: err,
        })
}
