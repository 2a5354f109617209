//! Validation utilities shared between the engine and command layers

use crate::CoreError;

/// Largest winner count a single contest may pay out.
pub const MAX_WINNER_COUNT: u32 = 20;

/// Parse a compact duration string of the form `<digits><unit>` into seconds.
///
/// Units are `s`, `m`, `h`, `d` (case-insensitive). The parser accepts `0s`
/// and similar; rejecting non-positive durations is the caller's job since a
/// zero-length contest is syntactically valid but semantically useless.
pub fn parse_duration(input: &str) -> Result<u64, CoreError> {
    let trimmed = input.trim();
    if trimmed.len() < 2 {
        return Err(CoreError::InvalidDuration(format!(
            "expected <number><unit>, got {trimmed:?}"
        )));
    }

    let (digits, unit) = trimmed.split_at(trimmed.len() - 1);
    if !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(CoreError::InvalidDuration(format!(
            "{digits:?} is not a number"
        )));
    }

    let value: u64 = digits.parse().map_err(|_| {
        CoreError::InvalidDuration(format!("{digits:?} is out of range"))
    })?;

    let multiplier = match unit.to_ascii_lowercase().as_str() {
        "s" => 1,
        "m" => 60,
        "h" => 3_600,
        "d" => 86_400,
        other => {
            return Err(CoreError::InvalidDuration(format!(
                "unknown unit {other:?}, expected one of s/m/h/d"
            )))
        }
    };

    value.checked_mul(multiplier).ok_or_else(|| {
        CoreError::InvalidDuration(format!("{trimmed:?} overflows seconds"))
    })
}

/// Validate a winner count against the 1..=20 contract.
pub fn validate_winner_count(count: u32) -> Result<(), CoreError> {
    if count == 0 {
        return Err(CoreError::Validation(
            "winner count must be positive".into(),
        ));
    }
    if count > MAX_WINNER_COUNT {
        return Err(CoreError::Validation(format!(
            "winner count must be at most {MAX_WINNER_COUNT}"
        )));
    }
    Ok(())
}

/// Validate a contest duration in seconds.
pub fn validate_duration_secs(seconds: u64) -> Result<(), CoreError> {
    if seconds == 0 {
        return Err(CoreError::Validation("duration must be positive".into()));
    }
    Ok(())
}
