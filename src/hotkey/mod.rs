//! Hotkey descriptors: normalization, parsing, formatting, matching and
//! validation.
//!
//! Everything in this module is pure and safe to call without a [`Dom`].
//!
//! The descriptor grammar is `Modifier+Modifier+Key`, `+`-delimited and
//! case-insensitive. `Mod` is the platform's primary modifier: Command on
//! macOS, Control on Windows and Linux.
//!
//! ```
//! use hotkeys::hotkey::{format_for_display, parse_hotkey, Platform};
//!
//! let parsed = parse_hotkey("mod+shift+k", Platform::Mac);
//! assert_eq!(format_for_display(&parsed, Platform::Mac), "⇧⌘K");
//! ```
//!
//! [`Dom`]: crate::dom::Dom

mod constants;
mod format;
mod matching;
mod parse;
mod types;
mod validate;

pub use constants::{
    detect_platform, is_known_key, is_modifier_key_name, key_display_symbol, modifier_alias,
    normalize_key_name, resolve_alias, resolve_modifier, CanonicalModifier, ModifierAlias,
    Platform, PlatformParseError, MODIFIER_ORDER,
};

pub use format::{
    format_descriptor_for_display, format_for_display, format_hotkey,
    format_key_for_debugging_display, format_with_labels, KeySource,
};

pub use matching::{
    create_hotkey_handler, create_multi_hotkey_handler, create_parsed_hotkey_handler,
    matches_descriptor, matches_keyboard_event, HotkeyHandlerOptions,
};

pub use parse::{
    convert_to_mod_format, descriptor_has_non_modifier_key, has_non_modifier_key, is_modifier,
    is_modifier_key, keyboard_event_to_hotkey, normalize_hotkey, parse_hotkey,
    parse_keyboard_event, raw_hotkey_to_parsed_hotkey,
};

pub use types::{
    HotkeyCallback, HotkeyCallbackContext, ModifierList, ParsedHotkey, RawHotkey,
    RegisterableHotkey,
};

pub use validate::{assert_valid_hotkey, check_hotkey, validate_hotkey, ValidationResult};

/// Resolve any registerable form to its parsed hotkey and display string.
///
/// Text keeps its original spelling; the object form is formatted
/// canonically.
pub fn resolve_registerable(hotkey: &RegisterableHotkey, platform: Platform) -> (ParsedHotkey, String) {
    match hotkey {
        RegisterableHotkey::Text(text) => (parse_hotkey(text, platform), text.clone()),
        RegisterableHotkey::Raw(raw) => {
            let parsed = raw_hotkey_to_parsed_hotkey(raw, platform);
            let text = format_hotkey(&parsed);
            (parsed, text)
        }
    }
}
