//! Local argument validation shared by every command builder.
//!
//! All checks here are pure: they run before a command string is built, so a
//! failure never reaches the wire.

use crate::error::{ConnectError, Result};

pub const MAX_NAME_LENGTH: usize = 64;

/// Names the remote application reserves, compared case-insensitively.
pub const RESERVED_NAMES: [&str; 2] = ["_default", "end"];

/// Check that `name` is usable as an object name.
pub fn validate_name(name: &str) -> Result<()> {
    let invalid = |reason| {
        Err(ConnectError::InvalidIdentifier {
            name: name.to_string(),
            reason,
        })
    };

    if name.is_empty() {
        return invalid("name cannot be empty");
    }

    if name.chars().count() > MAX_NAME_LENGTH {
        return invalid("name cannot be more than 64 characters in length");
    }

    if !name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    {
        return invalid("name can contain only alphanumeric characters, underscores and hyphens");
    }

    if RESERVED_NAMES
        .iter()
        .any(|reserved| reserved.eq_ignore_ascii_case(name))
    {
        return invalid("\"_Default\" and \"end\" are reserved words");
    }

    Ok(())
}

/// Check `value` against optional inclusive bounds. `None` means the feature
/// is disabled and always passes.
pub fn validate_range(value: Option<f64>, min: Option<f64>, max: Option<f64>) -> Result<()> {
    let Some(value) = value else {
        return Ok(());
    };

    let below = min.is_some_and(|min| value < min);
    let above = max.is_some_and(|max| value > max);

    if below || above || !value.is_finite() {
        return Err(ConnectError::OutOfRange { value, min, max });
    }

    Ok(())
}

/// Reject NaN and infinite components of a position or state vector.
pub fn validate_finite(values: &[f64]) -> Result<()> {
    values
        .iter()
        .try_for_each(|&value| validate_range(Some(value), None, None))
}

/// Look `value` up in `choices` ignoring case and return the table's spelling.
pub fn validate_choice(
    value: &str,
    choices: &[&'static str],
    label: &'static str,
) -> Result<&'static str> {
    choices
        .iter()
        .copied()
        .find(|choice| choice.eq_ignore_ascii_case(value))
        .ok_or_else(|| ConnectError::InvalidChoice {
            label,
            value: value.to_string(),
            choices: choices.to_vec(),
        })
}
