//! Descriptor validation.
//!
//! Errors make a descriptor unusable (empty text, unknown modifier token).
//! Warnings flag keys the validator cannot vouch for; those still register.

use serde::Serialize;
use tracing::{error, warn};

use super::constants::{is_known_key, normalize_key_name};
use super::parse::is_modifier;
use crate::error::{HotkeyError, Result};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
    pub valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

pub fn validate_hotkey(hotkey: &str) -> ValidationResult {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    if hotkey.trim().is_empty() {
        errors.push("Hotkey cannot be empty".to_string());
        return ValidationResult {
            valid: false,
            errors,
            warnings,
        };
    }

    let parts: Vec<&str> = hotkey.split('+').map(str::trim).collect();
    let (key_part, modifier_parts) = match parts.split_last() {
        Some(split) => split,
        None => (&"", &[][..]),
    };

    for part in modifier_parts {
        if !is_modifier(part) {
            errors.push(format!("Unknown modifier: '{part}'"));
        }
    }

    if key_part.is_empty() {
        errors.push("Hotkey is missing a key after the last '+'".to_string());
    } else if is_modifier(key_part) {
        warnings.push(format!(
            "Hotkey '{hotkey}' contains only modifiers and will never match an action key"
        ));
    } else {
        let key = normalize_key_name(key_part);
        if !is_known_key(&key) {
            warnings.push(format!(
                "Unknown key: '{key}'. It may still match if the browser reports it verbatim"
            ));
        }
    }

    ValidationResult {
        valid: errors.is_empty(),
        errors,
        warnings,
    }
}

/// Fail with [`HotkeyError::InvalidHotkey`] when the descriptor has errors.
pub fn assert_valid_hotkey(hotkey: &str) -> Result<()> {
    let result = validate_hotkey(hotkey);
    if result.valid {
        return Ok(());
    }
    Err(HotkeyError::InvalidHotkey {
        hotkey: hotkey.to_string(),
        errors: result.errors,
    })
}

/// Validate and log. Returns whether the descriptor is usable.
pub fn check_hotkey(hotkey: &str) -> bool {
    let result = validate_hotkey(hotkey);

    if !result.errors.is_empty() {
        error!(
            hotkey = %hotkey,
            errors = ?result.errors,
            "Invalid hotkey '{}'", hotkey
        );
    }
    if !result.warnings.is_empty() {
        warn!(
            hotkey = %hotkey,
            warnings = ?result.warnings,
            "Hotkey '{}' has warnings", hotkey
        );
    }

    result.valid
}

#[cfg(test)]
#[path = "validate_tests.rs"]
mod tests;
